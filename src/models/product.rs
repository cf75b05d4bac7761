//! Static print-product catalog.
//!
//! Mirrors the product templates offered at checkout. Pricing is flat:
//! $29.99 retail, $9.99 print cost, per item.

use serde::{Deserialize, Serialize};

/// Retail price per item, in cents.
pub const UNIT_PRICE_CENTS: u32 = 2999;
/// Print cost per item, in cents.
pub const UNIT_COST_CENTS: u32 = 999;
/// Retail price as a decimal string, the form payment APIs expect.
pub const UNIT_PRICE: &str = "29.99";

/// Product types that can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    CanvasPrint,
    FramedPrint,
    Poster,
    Mug,
    Tshirt,
}

/// One print size/style option within a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: u32,
    pub title: &'static str,
    pub sku: &'static str,
}

/// Catalog entry for a product type.
#[derive(Debug, Clone, Serialize)]
pub struct ProductTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub variants: Vec<ProductVariant>,
}

impl ProductType {
    pub const ALL: [ProductType; 5] = [
        ProductType::CanvasPrint,
        ProductType::FramedPrint,
        ProductType::Poster,
        ProductType::Mug,
        ProductType::Tshirt,
    ];

    /// Parse a request value. Returns `None` for unknown types so handlers
    /// can reject with a 400/404 instead of a serde rejection.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "canvas-print" => Some(ProductType::CanvasPrint),
            "framed-print" => Some(ProductType::FramedPrint),
            "poster" => Some(ProductType::Poster),
            "mug" => Some(ProductType::Mug),
            "tshirt" => Some(ProductType::Tshirt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::CanvasPrint => "canvas-print",
            ProductType::FramedPrint => "framed-print",
            ProductType::Poster => "poster",
            ProductType::Mug => "mug",
            ProductType::Tshirt => "tshirt",
        }
    }

    /// Catalog template for this product type.
    pub fn template(&self) -> ProductTemplate {
        let variant = |id, title, sku| ProductVariant { id, title, sku };
        match self {
            ProductType::CanvasPrint => ProductTemplate {
                name: "Canvas Print",
                description: "High-quality canvas print of your pet portrait",
                variants: vec![
                    variant(1, "8x10", "canvas-8x10"),
                    variant(2, "11x14", "canvas-11x14"),
                    variant(3, "16x20", "canvas-16x20"),
                ],
            },
            ProductType::FramedPrint => ProductTemplate {
                name: "Framed Print",
                description: "Elegant framed portrait print",
                variants: vec![
                    variant(1, "8x10", "framed-8x10"),
                    variant(2, "11x14", "framed-11x14"),
                ],
            },
            ProductType::Poster => ProductTemplate {
                name: "Poster Print",
                description: "Beautiful poster of your pet portrait",
                variants: vec![
                    variant(1, "12x18", "poster-12x18"),
                    variant(2, "18x24", "poster-18x24"),
                ],
            },
            ProductType::Mug => ProductTemplate {
                name: "Coffee Mug",
                description: "Ceramic mug with pet portrait",
                variants: vec![variant(1, "11oz", "mug-11oz")],
            },
            ProductType::Tshirt => ProductTemplate {
                name: "T-Shirt",
                description: "High-quality t-shirt with pet portrait",
                variants: vec![
                    variant(1, "S", "tshirt-s"),
                    variant(2, "M", "tshirt-m"),
                    variant(3, "L", "tshirt-l"),
                    variant(4, "XL", "tshirt-xl"),
                ],
            },
        }
    }
}
