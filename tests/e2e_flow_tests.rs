// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end scenario: login, verify, generate a portrait, check out,
//! capture, and confirm ownership scoping along the way.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

const BOUNDARY: &str = "e2e-boundary-9f1c2aa0";

fn json_post(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_full_purchase_flow() {
    let app = common::create_test_app();

    // Login and verify as a@x.com
    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/auth/login",
            None,
            serde_json::json!({"email": "a@x.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login_token = app.mailer.last_login_token();
    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/auth/verify",
            None,
            serde_json::json!({"token": login_token}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let credential = common::body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Generate a portrait for a cat
    let mut multipart = Vec::new();
    multipart.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"petPhoto\"; filename=\"cat.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nfake-cat-photo\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"petName\"\r\n\r\nWhiskers\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"petType\"\r\n\r\ncat\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/portrait/generate")
                .header(header::AUTHORIZATION, format!("Bearer {}", credential))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let generation_id = common::body_json(response).await["generationId"]
        .as_str()
        .unwrap()
        .to_string();

    // Check out a mug for that generation
    let response = app
        .router
        .clone()
        .oneshot(json_post(
            "/payment/checkout",
            Some(&credential),
            serde_json::json!({
                "generationId": generation_id,
                "petName": "Whiskers",
                "productType": "mug",
                "variant": "11oz",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let provider_order_id = common::body_json(response).await["orderId"]
        .as_str()
        .unwrap()
        .to_string();

    // A stranger cannot capture the order
    let stranger = common::make_session_token("b@y.com", &app.state.config.jwt_signing_key);
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/payment/capture/{}", provider_order_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", stranger))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner captures it
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/payment/capture/{}", provider_order_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", credential))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Order is paid, under the same provider ID, and a confirmation went out
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/payment/orders/{}", provider_order_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", credential))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let order = common::body_json(response).await;
    assert_eq!(order["status"], "paid");
    assert_eq!(order["id"], provider_order_id);
    assert_eq!(order["metadata"]["generationId"], generation_id);

    let sent = app.mailer.sent.lock().unwrap();
    let confirmation = sent.last().unwrap();
    assert_eq!(confirmation.to, "a@x.com");
    assert!(confirmation.subject.contains("Order Confirmation"));
    assert!(confirmation.html.contains(&provider_order_id));
}
