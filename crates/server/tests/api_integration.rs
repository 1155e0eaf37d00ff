//! API tests driven through the router without binding a socket.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use server::{build_router, AppState, ServerConfig};
use tower::ServiceExt;

const BOUNDARY: &str = "menupulse-test-boundary";

fn app() -> axum::Router {
    build_router(AppState::new(ServerConfig::default()))
}

fn multipart_upload(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/upload-csv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn liveness_reports_ok() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn upload_returns_a_summary() {
    let csv = "date,item_name,quantity_sold,category\n\
        2025-01-01,Pho Beef,120,Noodles\n\
        2025-01-02,Banh Mi,60,Sandwich\n";
    let response = app().oneshot(multipart_upload("sales.csv", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["top_items"][0]["item_name"], "Pho Beef");
    assert_eq!(json["date_range"]["start"], "2025-01-01");
    assert!(json["insights"].as_array().map_or(false, |a| !a.is_empty()));
}

#[tokio::test]
async fn upload_rejects_non_csv_filename() {
    let response = app()
        .oneshot(multipart_upload("sales.xlsx", "not,a,csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["detail"], "File must be a CSV");
}

#[tokio::test]
async fn upload_rejects_unknown_columns() {
    let response = app()
        .oneshot(multipart_upload("sales.csv", "sku,units,price\nA1,5,2.00\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("not recognized"));
}

#[tokio::test]
async fn upload_rejects_all_malformed_rows() {
    let csv = "date,item_name,quantity_sold,category\n\
        bad,Pho Beef,25,Noodles\n";
    let response = app().oneshot(multipart_upload("sales.csv", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["detail"].as_str().unwrap().contains("malformed"));
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         hello\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload-csv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["detail"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn generate_stream_reports_bad_key_as_sse_error() {
    let request_body = serde_json::json!({
        "top_items": [],
        "top_categories": [],
        "insights": [],
        "api_key": "short",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/generate-content-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(request_body.to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8_lossy(&bytes);
    assert!(body.contains(r#""status":"connecting""#));
    assert!(body.contains(r#""error""#));
    // Exactly one terminal frame.
    assert_eq!(body.matches(r#"{"error""#).count(), 1);
}
