// tests/metrics_route.rs
// The exposition endpoint, driven through the real recorder. One test
// only: the recorder installs process-wide once.

use axum::body::Body;
use http::Request;
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn metrics_endpoint_renders_ttl_gauge() {
    let handle = noticia_aggregator::metrics::install(3600).expect("install recorder");
    let app = noticia_aggregator::metrics::router(handle);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("call /metrics");
    assert!(resp.status().is_success());

    let bytes = resp.into_body().collect().await.expect("read body").to_bytes();
    let body = String::from_utf8(bytes.to_vec()).expect("utf8 exposition");
    assert!(body.contains("source_cache_ttl_secs"));
    assert!(body.contains("3600"));
}
