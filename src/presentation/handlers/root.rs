use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct CapabilityResponse {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn root_handler() -> Json<CapabilityResponse> {
    let endpoints = BTreeMap::from([
        ("POST /predict", "Upload audio file to detect emotion"),
        ("GET /playlist/{emotion}", "Get Spotify playlist for emotion"),
    ]);

    Json(CapabilityResponse {
        message: "Emotion-Based Music Recommender API",
        endpoints,
    })
}
