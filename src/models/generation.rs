//! Portrait generation records.

use serde::{Deserialize, Serialize};

/// Supported pet types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
    Rabbit,
    Bird,
    Other,
}

impl PetType {
    /// Parse a form-field value. Returns `None` for anything outside the
    /// supported set so the handler can reject with a 400.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dog" => Some(PetType::Dog),
            "cat" => Some(PetType::Cat),
            "rabbit" => Some(PetType::Rabbit),
            "bird" => Some(PetType::Bird),
            "other" => Some(PetType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
            PetType::Rabbit => "rabbit",
            PetType::Bird => "bird",
            PetType::Other => "other",
        }
    }
}

/// A completed portrait generation, keyed by its opaque ID.
///
/// No intermediate states are modeled; a record only exists once the
/// provider has produced a result, so `status` is always "ready".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: String,
    /// Owner email; the only identity allowed to read this record
    pub email: String,
    pub pet_name: String,
    pub pet_type: PetType,
    pub style: String,
    /// Where the uploaded source photo was saved. The file itself is deleted
    /// right after the portrait is rendered; the path is kept for reference.
    pub uploaded_image_path: String,
    /// Provider URL of the rendered portrait
    pub portrait_url: String,
    /// Local copy of the rendered portrait
    pub portrait_path: String,
    /// Creation instant (RFC 3339)
    pub created_at: String,
    pub status: String,
}
