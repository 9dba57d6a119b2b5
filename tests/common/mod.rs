#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use catalog_api::auth::TokenService;
use catalog_api::config::AppConfig;
use catalog_api::database::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use catalog_api::AppState;
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const SIGNING_KEY: &str = "integration-test-signing-key-0123456789";
pub const ISSUER: &str = "catalog-api-tests";
pub const AUDIENCE: &str = "catalog-api-test-clients";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("JWT_KEY", SIGNING_KEY),
        ("JWT_ISSUER", ISSUER),
        ("JWT_AUDIENCE", AUDIENCE),
        ("JWT_EXPIRY_MINUTES", "120"),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

impl TestServer {
    /// Start the router on a free port with an empty in-memory catalog. The server
    /// lives on the calling test's runtime and stops with it.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(test_config(), Arc::new(MemoryCatalogStore::new())).await
    }

    /// Start the router against a migrated Postgres catalog, or `None` when
    /// DATABASE_URL is not set.
    pub async fn spawn_postgres() -> Result<Option<Self>> {
        let Some(url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()) else {
            eprintln!("DATABASE_URL not set; skipping Postgres suite");
            return Ok(None);
        };

        let mut config = test_config();
        config.database.url = Some(url);
        let store = PgCatalogStore::connect(&config.database)
            .await
            .context("failed to connect to DATABASE_URL")?;
        store.migrate().await.context("failed to migrate test database")?;

        Self::spawn_with(config, Arc::new(store)).await.map(Some)
    }

    async fn spawn_with(config: AppConfig, store: Arc<dyn CatalogStore>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::new(config.clone(), store);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, catalog_api::app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            config,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token service sharing the server's key, issuer and audience.
    pub fn tokens(&self) -> TokenService {
        TokenService::new(&self.config.auth)
    }

    /// Log in as the configured admin and return the bearer token.
    pub async fn login(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "UserName": "admin", "Password": "admin" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn create_category(&self, token: &str, name: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/categorias"))
            .bearer_auth(token)
            .json(&json!({ "nome": name, "descricao": format!("{} em geral", name) }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create category: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }

    pub async fn create_product(&self, token: &str, name: &str, category_id: i64) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/produtos"))
            .bearer_auth(token)
            .json(&json!({
                "nome": name,
                "descricao": "produto de teste",
                "preco": 12.5,
                "imagem": "produto.jpg",
                "dataCompra": "2024-05-10T10:00:00Z",
                "estoque": 4,
                "categoriaId": category_id
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create product: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }
}
