use super::error::StoreError;
use super::store::{ConstraintSnapshot, ConstraintStore};
use crate::config::StoreConfig;
use crate::models::PlayerName;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const CONSTRAINTS_PATH: &str = "/api/admin/constraints";
const COUPLE_PATH: &str = "/api/admin/constraints/couple";
const GENERIC_FAILURE: &str = "Request failed";

#[derive(Serialize)]
struct CouplingRequest<'a> {
    players: &'a [PlayerName],
}

/// Constraint store behind the admin HTTP API.
///
/// - `GET    /api/admin/constraints`        current couplings and decouplings
/// - `DELETE /api/admin/constraints`        clear both lists
/// - `POST   /api/admin/constraints/couple` add one coupling `{"players": [...]}`
pub struct HttpConstraintStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpConstraintStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected { status: status.as_u16(), detail: extract_detail(&body) })
    }
}

/// Pull the human-readable reason out of an error body.
///
/// The API reports `{"detail": "..."}` or `{"detail": {"message": "..."}}`.
pub(crate) fn extract_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(detail) => detail.get("message").and_then(Value::as_str).map(str::to_owned),
            None => None,
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[async_trait]
impl ConstraintStore for HttpConstraintStore {
    async fn fetch(&self) -> Result<ConstraintSnapshot, StoreError> {
        log::debug!("GET {}", CONSTRAINTS_PATH);
        let response = self.send(self.request(Method::GET, CONSTRAINTS_PATH)).await?;
        response.json::<ConstraintSnapshot>().await.map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        log::debug!("DELETE {}", CONSTRAINTS_PATH);
        self.send(self.request(Method::DELETE, CONSTRAINTS_PATH)).await?;
        Ok(())
    }

    async fn create_coupling(&self, players: &[PlayerName]) -> Result<(), StoreError> {
        log::debug!("POST {} ({} players)", COUPLE_PATH, players.len());
        let builder = self.request(Method::POST, COUPLE_PATH).json(&CouplingRequest { players });
        self.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_variants() {
        assert_eq!(extract_detail(r#"{"detail":"no matchday today"}"#), "no matchday today");
        assert_eq!(extract_detail(r#"{"detail":{"message":"bad names"}}"#), "bad names");
        assert_eq!(extract_detail(r#"{"detail":{"code":7}}"#), GENERIC_FAILURE);
        assert_eq!(extract_detail("<html>502</html>"), GENERIC_FAILURE);
        assert_eq!(extract_detail(""), GENERIC_FAILURE);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = StoreConfig {
            base_url: "http://localhost:8000/".to_string(),
            token: Some(String::new()),
            timeout_secs: None,
        };
        let store = HttpConstraintStore::new(&config).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8000");
        assert_eq!(store.url(COUPLE_PATH), "http://localhost:8000/api/admin/constraints/couple");
        assert!(store.token.is_none());
    }

    #[test]
    fn test_coupling_body_shape() {
        let players = vec!["A".to_string(), "B".to_string()];
        let body = serde_json::to_value(CouplingRequest { players: &players }).unwrap();
        assert_eq!(body, serde_json::json!({ "players": ["A", "B"] }));
    }
}
