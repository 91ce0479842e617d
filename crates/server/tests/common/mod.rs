//! # Common Test Utilities
//!
//! The `TestApp` harness spawns the real Axum server on a random port
//! with every external collaborator (embeddings, chat completions,
//! knowledge store, identity service, lead webhook) pointed at one
//! `httpmock::MockServer` instance.

// Allow unused code because this is a test utility module and not all
// helpers are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::{prelude::*, Mock, MockServer};
use ragsite_server::{
    config::{
        AppConfig, ChatConfig, EmbeddingConfig, IdentityConfig, LeadsConfig, SearchConfig,
        StoreConfig,
    },
    router::create_router,
    state::build_app_state,
};
use reqwest::Client;
use std::net::SocketAddr;
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with mocked external services.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_inner(false).await
    }

    /// Like [`TestApp::spawn`], but with a lead webhook configured and
    /// pointed at the mock server's `/leads-webhook` path.
    pub async fn spawn_with_leads_webhook() -> Result<Self> {
        Self::spawn_inner(true).await
    }

    async fn spawn_inner(with_leads_webhook: bool) -> Result<Self> {
        // `try_init` prevents a panic when the logger is already set up.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;

        let config = AppConfig {
            port: 0,
            embedding: EmbeddingConfig {
                api_url: mock_server.url("/v1/embeddings"),
                model_name: "mock-embedding-model".to_string(),
                api_key: None,
            },
            chat: ChatConfig {
                api_url: mock_server.url("/v1/chat/completions"),
                model_name: "mock-chat-model".to_string(),
                api_key: None,
                system_prompt: None,
            },
            store: StoreConfig {
                api_url: mock_server.base_url(),
                service_role_key: "test-service-key".to_string(),
            },
            identity: IdentityConfig {
                api_url: mock_server.url("/auth/v1"),
                api_key: "test-anon-key".to_string(),
            },
            ingest: Default::default(),
            search: Default::default(),
            leads: with_leads_webhook.then(|| LeadsConfig {
                webhook_url: mock_server.url("/leads-webhook"),
            }),
        };

        let app_state = build_app_state(config)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Mocks the identity service and role lookup so that the token
    /// `admin-token` resolves to `user_id` with the given role.
    pub fn mock_auth<'a>(&'a self, user_id: &str, role: &str) -> (Mock<'a>, Mock<'a>) {
        let identity_mock = self.mock_server.mock(|when, then| {
            when.method(GET)
                .path("/auth/v1/user")
                .header("authorization", "Bearer admin-token");
            then.status(200)
                .json_body(serde_json::json!({ "id": user_id }));
        });
        let role_mock = self.mock_server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/users")
                .query_param("select", "role")
                .query_param("id", format!("eq.{user_id}"));
            then.status(200)
                .json_body(serde_json::json!([{ "role": role }]));
        });
        (identity_mock, role_mock)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver may already be gone if the server task
            // panicked, so the send result is ignored.
            let _ = tx.send(());
        }
    }
}
