//! Integration test — build router, call `/`, assert response; unmatched
//! paths fall through to a JSON 404.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{TestApp, body_bytes, body_json};
use tower::ServiceExt;

#[tokio::test]
async fn index_returns_greeting() {
    let app = TestApp::new().await;

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.router().oneshot(req).await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(
        body.starts_with("Hello, CodeOne!"),
        "unexpected greeting: {body}"
    );
    assert_eq!(app.store.lookup_count(), 0);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::new().await;

    for uri in ["/nope", "/api/nope", "/api/users"] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.router().oneshot(req).await.expect("request");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri: {uri}");
        let json = body_json(resp).await;
        assert_eq!(json["error"], "not_found");
    }
}
