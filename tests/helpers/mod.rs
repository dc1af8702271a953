use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use hearth::config::{Config, DatabaseConfig, ObservabilityConfig, ServerConfig, ShoppingConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const HOUSEHOLD: &str = "household-1";

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

fn test_config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        shopping: ShoppingConfig::default(),
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("hearth.db");
    let config = test_config(format!("sqlite:{}", path.display()));

    let pool = hearth::db::create_pool(&config.database.url, 1).await?;
    hearth::migrate::run_migrations(&pool).await?;

    Ok(TestApp {
        router: hearth::router(hearth::app_state(&config, pool)),
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", "user-1");

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, json))
    }

    pub async fn post(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None).await
    }
}
