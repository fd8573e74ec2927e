//! HTTP transport seam for the API layer.
//!
//! The gateway only needs "GET a path" and "POST JSON to a path", both with
//! credentials. `ReqwestTransport` provides that over a cookie-storing
//! reqwest client; tests substitute a scripted fake.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::ApiSettings;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Credential-bearing HTTP transport.
///
/// Implementations must include session cookies on every request and must
/// send `Content-Type: application/json` on `post_json`. A non-2xx status is
/// NOT an error at this level; only transport failures are.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, path: &str) -> AppResult<HttpResponse>;

    async fn post_json(&self, path: &str, body: &str) -> AppResult<HttpResponse>;
}

pub struct ReqwestTransport {
    http: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(settings: &ApiSettings) -> AppResult<Self> {
        let mut builder = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true);
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn into_response(resp: reqwest::Response) -> AppResult<HttpResponse> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, path: &str) -> AppResult<HttpResponse> {
        let resp = self.http.get(self.url(path)).send().await?;
        Self::into_response(resp).await
    }

    async fn post_json(&self, path: &str, body: &str) -> AppResult<HttpResponse> {
        let resp = self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.to_string())
            .send()
            .await?;
        Self::into_response(resp).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let settings = ApiSettings {
            base_url: "http://localhost:8080/".to_string(),
            ..ApiSettings::default()
        };
        let transport = ReqwestTransport::new(&settings).unwrap();
        assert_eq!(transport.url("/session"), "http://localhost:8080/session");
        assert_eq!(
            transport.url("api/translate/start"),
            "http://localhost:8080/api/translate/start"
        );
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
