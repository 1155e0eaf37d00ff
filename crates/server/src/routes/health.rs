//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "MenuPulse sales content service is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
