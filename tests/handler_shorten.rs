mod common;

use axum_test::TestServer;
use serde_json::json;

fn server(ctx: &common::TestContext) -> TestServer {
    TestServer::new(common::test_router(ctx.state.clone())).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    let slug = body["slug"].as_str().unwrap();

    assert_eq!(slug.len(), 6);
    assert!(
        slug.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
    assert_eq!(
        body["short_url"],
        format!("{}/{}", common::TEST_BASE_URL, slug)
    );

    let stored = ctx.links.get(slug).unwrap();
    assert_eq!(stored.long_url, "https://example.com/some/long/path");
    assert_eq!(stored.visits, 0);
}

#[tokio::test]
async fn test_shorten_anonymous_has_no_owner() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let slug = response.json::<serde_json::Value>()["slug"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(ctx.links.get(&slug).unwrap().created_by, None);
}

#[tokio::test]
async fn test_shorten_with_token_records_owner() {
    let ctx = common::create_test_context();
    let token = ctx.seed_token("alice");
    let server = server(&ctx);

    let response = server
        .post("/api/shorten")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let slug = response.json::<serde_json::Value>()["slug"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        ctx.links.get(&slug).unwrap().created_by.as_deref(),
        Some("alice")
    );
}

#[tokio::test]
async fn test_shorten_rejects_invalid_token() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    // A present-but-invalid token is a 401, not a silent anonymous fallback.
    let response = server
        .post("/api/shorten")
        .add_header("Authorization", "Bearer not-a-real-token")
        .json(&json!({ "long_url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(ctx.links.len(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_shorten_rejects_non_http_scheme() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    for url in ["javascript:alert(1)", "file:///etc/passwd"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "long_url": url }))
            .await;

        response.assert_status_bad_request();
    }

    assert_eq!(ctx.links.len(), 0);
}

#[tokio::test]
async fn test_shorten_primes_cache() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com/cached" }))
        .await;

    response.assert_status_ok();

    let slug = response.json::<serde_json::Value>()["slug"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        ctx.cache.cached_url(&slug).as_deref(),
        Some("https://example.com/cached")
    );
}

#[tokio::test]
async fn test_custom_slug_success() {
    let ctx = common::create_test_context();
    let token = ctx.seed_token("alice");
    let server = server(&ctx);

    let response = server
        .post("/api/shorten/custom")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "long_url": "https://example.com", "slug": "my-link" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["slug"], "my-link");
    assert_eq!(
        body["short_url"],
        format!("{}/my-link", common::TEST_BASE_URL)
    );

    assert_eq!(
        ctx.links.get("my-link").unwrap().created_by.as_deref(),
        Some("alice")
    );
}

#[tokio::test]
async fn test_custom_slug_requires_auth() {
    let ctx = common::create_test_context();
    let server = server(&ctx);

    let response = server
        .post("/api/shorten/custom")
        .json(&json!({ "long_url": "https://example.com", "slug": "my-link" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_custom_slug_reserved_rejected() {
    let ctx = common::create_test_context();
    let token = ctx.seed_token("alice");
    let server = server(&ctx);

    for slug in ["api", "healthz", "dashboard", "API"] {
        let response = server
            .post("/api/shorten/custom")
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({ "long_url": "https://example.com", "slug": slug }))
            .await;

        response.assert_status_bad_request();
    }

    assert_eq!(ctx.links.len(), 0);
}

#[tokio::test]
async fn test_custom_slug_taken_conflict() {
    let ctx = common::create_test_context();
    let token = ctx.seed_token("alice");
    ctx.seed_link("taken", "https://existing.example.com", Some("bob"))
        .await;
    let server = server(&ctx);

    let response = server
        .post("/api/shorten/custom")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "long_url": "https://example.com", "slug": "taken" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "CONFLICT");

    // The existing mapping is untouched.
    assert_eq!(
        ctx.links.get("taken").unwrap().long_url,
        "https://existing.example.com"
    );
}

#[tokio::test]
async fn test_custom_slug_malformed_rejected() {
    let ctx = common::create_test_context();
    let token = ctx.seed_token("alice");
    let server = server(&ctx);

    for slug in ["ab", "has space", "has/slash", "x".repeat(21).as_str()] {
        let response = server
            .post("/api/shorten/custom")
            .add_header("Authorization", format!("Bearer {token}"))
            .json(&json!({ "long_url": "https://example.com", "slug": slug }))
            .await;

        response.assert_status_bad_request();
    }
}
