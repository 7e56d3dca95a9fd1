// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! In-process stand-in for the scoring service

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One multipart field as the server saw it
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Every `/analyze` request body received, in order
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Vec<ReceivedPart>>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<Vec<ReceivedPart>> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
    recorder: Recorder,
}

async fn analyze(State(reply): State<Reply>, mut multipart: Multipart) -> (StatusCode, String) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    reply.recorder.0.lock().unwrap().push(parts);
    tokio::time::sleep(reply.delay).await;
    (reply.status, reply.body.clone())
}

/// Router answering `/analyze` with a fixed status and body
pub fn scoring_router(status: StatusCode, body: Value, recorder: Recorder) -> Router {
    slow_scoring_router(status, body, Duration::ZERO, recorder)
}

/// Same as [`scoring_router`] but waits `delay` before answering
pub fn slow_scoring_router(
    status: StatusCode,
    body: Value,
    delay: Duration,
    recorder: Recorder,
) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "service": "ThumbScore AI"})) }),
        )
        .route(
            "/metrics",
            get(|| async {
                Json(json!({"total_analyses": 12, "average_score": 81.4, "api_version": "1.0.0"}))
            }),
        )
        .with_state(Reply {
            status,
            body: body.to_string(),
            delay,
            recorder,
        })
}

/// Serve `router` on an ephemeral port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// The payload of a successful analysis of a well-made thumbnail
pub fn great_crop_payload() -> Value {
    json!({
        "success": true,
        "filename": "thumb.png",
        "analysis": {
            "score": 91,
            "breakdown": {
                "visual_impact": 95,
                "clarity": 90,
                "contrast": 88,
                "color_harmony": 85,
                "composition": 92,
                "text_readability": 80
            },
            "suggestions": ["Great crop"],
            "analysis_timestamp": "2025-06-01T12:00:00"
        }
    })
}

/// A small valid PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut buffer = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}
