//! Integration tests for the `/ingest` endpoint.

mod common;

use anyhow::Result;
use common::TestApp;
use httpmock::prelude::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_ingest_chunks_embeds_and_stores() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let (identity_mock, role_mock) = app.mock_auth("user-1", "admin");

    // "hello world" with size 5 / overlap 0 splits into exactly these
    // three windows, in order.
    let embedding_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings").json_body(json!({
            "model": "mock-embedding-model",
            "input": ["hello", " worl", "d"]
        }));
        then.status(200).json_body(json!({
            "data": [
                { "index": 0, "embedding": [1.0, 0.0] },
                { "index": 1, "embedding": [0.0, 1.0] },
                { "index": 2, "embedding": [1.0, 1.0] }
            ]
        }));
    });

    let store_mock = app.mock_server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/documents")
            .header("prefer", "return=minimal")
            .header("apikey", "test-service-key")
            .json_body_partial(
                json!([
                    {
                        "content": "hello",
                        "source": "docs",
                        "chunk_index": 0,
                        "embedding": [1.0, 0.0],
                        "metadata": { "model": "mock-embedding-model" }
                    },
                    {
                        "content": " worl",
                        "source": "docs",
                        "chunk_index": 1,
                        "embedding": [0.0, 1.0]
                    },
                    {
                        "content": "d",
                        "source": "docs",
                        "chunk_index": 2,
                        "embedding": [1.0, 1.0]
                    }
                ])
                .to_string(),
            );
        then.status(201);
    });

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({
            "text": "hello world",
            "source": "docs",
            "chunkSize": 5,
            "chunkOverlap": 0
        }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(3));
    assert_eq!(
        body["message"],
        json!("Successfully ingested 3 chunks from docs")
    );

    identity_mock.assert();
    role_mock.assert();
    embedding_mock.assert();
    store_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_ingest_zero_overlap_is_honored_and_zero_size_falls_back() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    app.mock_auth("user-1", "admin");

    // An explicit zero overlap keeps the windows disjoint instead of
    // reverting to the configured default of 200.
    let disjoint_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings").json_body(json!({
            "model": "mock-embedding-model",
            "input": ["ab", "cd", "ef"]
        }));
        then.status(200).json_body(json!({
            "data": [
                { "index": 0, "embedding": [1.0] },
                { "index": 1, "embedding": [2.0] },
                { "index": 2, "embedding": [3.0] }
            ]
        }));
    });
    // A zero chunk size is meaningless and falls back to the default,
    // which swallows this text whole.
    let whole_text_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings").json_body(json!({
            "model": "mock-embedding-model",
            "input": ["tiny text"]
        }));
        then.status(200).json_body(json!({
            "data": [{ "index": 0, "embedding": [4.0] }]
        }));
    });
    app.mock_server.mock(|when, then| {
        when.method(POST).path("/rest/v1/documents");
        then.status(201);
    });

    // Act
    let disjoint = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({ "text": "abcdef", "chunkSize": 2, "chunkOverlap": 0 }))
        .send()
        .await?;
    let whole_text = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({ "text": "tiny text", "chunkSize": 0 }))
        .send()
        .await?;

    // Assert
    assert_eq!(disjoint.status(), 201);
    let body: Value = disjoint.json().await?;
    assert_eq!(body["count"], json!(3));
    assert_eq!(whole_text.status(), 201);
    let body: Value = whole_text.json().await?;
    assert_eq!(body["count"], json!(1));
    disjoint_mock.assert();
    whole_text_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_ingest_rejects_empty_text() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    app.mock_auth("user-1", "admin");
    let embedding_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200);
    });

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({ "text": "   " }))
        .send()
        .await?;

    // Assert: rejected before any provider is contacted.
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], json!("Missing required field: text"));
    assert_eq!(embedding_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_ingest_embedding_count_mismatch_writes_nothing() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    app.mock_auth("user-1", "admin");

    // Two chunks go out, only one vector comes back.
    let embedding_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200).json_body(json!({
            "data": [{ "index": 0, "embedding": [1.0, 0.0] }]
        }));
    });
    let store_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/rest/v1/documents");
        then.status(201);
    });

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({ "text": "hello world", "chunkSize": 6, "chunkOverlap": 0 }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"],
        json!("Partial failure in embedding generation")
    );
    embedding_mock.assert();
    assert_eq!(store_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_ingest_requires_bearer_token() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .json(&json!({ "text": "hello" }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], json!("Missing Authorization bearer token."));
    Ok(())
}

#[tokio::test]
async fn test_ingest_rejects_invalid_token() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let identity_mock = app.mock_server.mock(|when, then| {
        when.method(GET).path("/auth/v1/user");
        then.status(401).body("invalid JWT");
    });

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("expired-token")
        .json(&json!({ "text": "hello" }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], json!("Invalid or expired token."));
    identity_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_ingest_rejects_non_admin_role() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let (identity_mock, role_mock) = app.mock_auth("user-2", "editor");
    let embedding_mock = app.mock_server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(200);
    });

    // Act
    let response = app
        .client
        .post(format!("{}/ingest", app.address))
        .bearer_auth("admin-token")
        .json(&json!({ "text": "hello" }))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"],
        json!("Forbidden: administrator role required.")
    );
    identity_mock.assert();
    role_mock.assert();
    assert_eq!(embedding_mock.hits(), 0);
    Ok(())
}
