//! Integration test harness for Store Ratings.
//!
//! Each [`TestContext`] starts the real router on an ephemeral port with a
//! fresh copy of the demo dataset, so tests never share state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p store-ratings-integration-tests
//! ```

use std::net::SocketAddr;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use store_ratings_server::config::ServerConfig;
use store_ratings_server::db::{DataStore, SeedData};
use store_ratings_server::state::AppState;

/// Demo administrator credentials.
pub const ADMIN: (&str, &str) = ("admin@platform.com", "Admin123!");
/// Demo customer credentials.
pub const CUSTOMER: (&str, &str) = ("john@example.com", "User123!");
/// Demo store owner credentials.
pub const OWNER: (&str, &str) = ("mike@store.com", "Store123!");

/// A running server.
pub struct TestContext {
    pub addr: SocketAddr,
}

impl TestContext {
    /// Start a server loaded with the demo dataset.
    ///
    /// # Panics
    ///
    /// Panics if the dataset cannot be loaded or no port can be bound.
    pub async fn new() -> Self {
        let seed = SeedData::demo().expect("demo dataset parses");
        Self::with_seed(seed).await
    }

    /// Start a server loaded with `seed`.
    ///
    /// # Panics
    ///
    /// Panics if the dataset cannot be loaded or no port can be bound.
    pub async fn with_seed(seed: SeedData) -> Self {
        let store = DataStore::from_seed(seed).expect("seed dataset loads");
        let app = store_ratings_server::app(AppState::new(ServerConfig::default(), store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server runs");
        });

        Self { addr }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client with its own cookie jar, i.e. its own session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// A client logged in with `credentials`.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&self, credentials: (&str, &str)) -> Client {
        let client = self.client();
        let resp = client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({
                "email": credentials.0,
                "password": credentials.1,
            }))
            .send()
            .await
            .expect("login request");
        assert_eq!(resp.status(), StatusCode::OK, "login as {}", credentials.0);
        client
    }
}

/// Assert the status and decode the JSON body.
///
/// # Panics
///
/// Panics if the status differs or the body is not JSON.
pub async fn expect_json(resp: Response, status: StatusCode) -> Value {
    let actual = resp.status();
    let body = resp.text().await.expect("response body");
    assert_eq!(actual, status, "unexpected status, body: {body}");
    serde_json::from_str(&body).expect("JSON body")
}

/// Compare two averages.
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
