//! Single chokepoint for authenticated API calls.
//!
//! Every call ensures a session first, POSTs JSON, and on a 401 refreshes the
//! session and re-sends the exact same bytes once. Non-2xx results become
//! [`AppError::Request`] carrying the server's `error` message when it sent one.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::session::SessionManager;
use super::transport::{HttpResponse, HttpTransport};
use crate::shared::error::{AppError, AppResult};

const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Improve,
    Preview,
    Identify,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Start => "/api/translate/start",
            Endpoint::Improve => "/api/translate/improve",
            Endpoint::Preview => "/api/translate/preview",
            Endpoint::Identify => "/api/translate/identify",
        }
    }
}

/// Body of a successful response.
///
/// Production endpoints always answer JSON; anything unparseable is handed
/// back verbatim instead of failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    /// Decode into the caller's expected shape.
    pub fn decode<T: DeserializeOwned>(self, endpoint: Endpoint) -> AppResult<T> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value).map_err(|e| {
                AppError::Decode(format!("{} returned an unexpected body: {}", endpoint.path(), e))
            }),
            ResponseBody::Text(text) => Err(AppError::Decode(format!(
                "{} returned a non-JSON body: {}",
                endpoint.path(),
                text
            ))),
        }
    }
}

pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    session: SessionManager,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, session_path: impl Into<String>) -> Self {
        let session = SessionManager::new(Arc::clone(&transport), session_path);
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// POST `body` to `endpoint` with session handling and one retry on 401.
    pub async fn call<B>(&self, endpoint: Endpoint, body: &B) -> AppResult<ResponseBody>
    where
        B: Serialize + ?Sized,
    {
        let path = endpoint.path();
        // Serialized once so a retry sends identical bytes.
        let payload = serde_json::to_string(body)?;

        self.session.ensure().await;
        let mut response = self.transport.post_json(path, &payload).await?;

        if response.status == STATUS_UNAUTHORIZED {
            debug!(endpoint = path, "unauthorized, refreshing session and retrying once");
            self.session.invalidate();
            self.session.ensure().await;
            response = self.transport.post_json(path, &payload).await?;
        }

        if !response.is_success() {
            return Err(request_error(path, &response));
        }

        Ok(ResponseBody::parse(response.body))
    }

    pub async fn call_typed<B, T>(&self, endpoint: Endpoint, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(endpoint, body).await?.decode(endpoint)
    }
}

fn request_error(path: &str, response: &HttpResponse) -> AppError {
    let message = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|data| {
            data.get("error")
                .and_then(|v| v.as_str())
                .filter(|msg| !msg.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("{} failed: {}", path, response.status));

    AppError::Request {
        endpoint: path.to_string(),
        status: response.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::{RecordedCall, ScriptedTransport};
    use crate::shared::types::{StartRequest, StartResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const START_OK: &str = r#"{"contextId":"ctx-1","result":"hola","sourceLang":"en"}"#;

    fn gateway(transport: &Arc<ScriptedTransport>) -> ApiGateway {
        ApiGateway::new(transport.clone(), "/session")
    }

    fn hello(lang: &str) -> StartRequest {
        StartRequest {
            source: "Hello".to_string(),
            lang: lang.to_string(),
        }
    }

    #[tokio::test]
    async fn test_start_with_fresh_session() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, "").respond(200, START_OK));
        let api = gateway(&transport);

        let resp: StartResponse = api.call_typed(Endpoint::Start, &hello("es")).await.unwrap();

        assert_eq!(
            resp,
            StartResponse {
                context_id: "ctx-1".to_string(),
                result: "hola".to_string(),
                source_lang: "en".to_string(),
            }
        );
        assert_eq!(
            transport.calls(),
            vec![
                RecordedCall::Get { path: "/session".to_string() },
                RecordedCall::Post {
                    path: "/api/translate/start".to_string(),
                    body: r#"{"source":"Hello","lang":"es"}"#.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_retries_once_after_unauthorized() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(401, "")
                .respond(200, "")
                .respond(200, r#"{"contextId":"ctx-2","result":"salut","sourceLang":"en"}"#),
        );
        let api = gateway(&transport);

        let resp: StartResponse = api.call_typed(Endpoint::Start, &hello("fr")).await.unwrap();

        assert_eq!(resp.context_id, "ctx-2");
        assert_eq!(resp.result, "salut");
        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(transport.count_gets(), 2);
        assert_eq!(transport.count_posts(), 2);
        assert!(calls[0].is_get() && calls[2].is_get());
        // Retry carries the identical body.
        assert_eq!(calls[1], calls[3]);
    }

    #[tokio::test]
    async fn test_never_retries_twice() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(401, "")
                .respond(200, "")
                .respond(401, r#"{"error":"session rejected"}"#),
        );
        let api = gateway(&transport);

        let err = api.call(Endpoint::Start, &hello("fr")).await.unwrap_err();

        assert_eq!(transport.count_posts(), 2);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "session rejected");
    }

    #[tokio::test]
    async fn test_error_message_from_body() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(400, r#"{"error":"Bad request"}"#),
        );
        let api = gateway(&transport);

        let err = api.call(Endpoint::Start, &hello("es")).await.unwrap_err();

        assert_eq!(err.to_string(), "Bad request");
        assert_eq!(transport.count_posts(), 1);
    }

    #[tokio::test]
    async fn test_fallback_message_for_non_json_body() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(502, "<html>Bad Gateway</html>"),
        );
        let api = gateway(&transport);

        let err = api
            .call(Endpoint::Preview, &json!({ "source": "Hello", "lang": "de" }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "/api/translate/preview failed: 502");
    }

    #[tokio::test]
    async fn test_fallback_message_when_error_field_missing() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(500, r#"{"detail":"boom"}"#),
        );
        let api = gateway(&transport);

        let err = api
            .call(Endpoint::Identify, &json!({ "source": "Hallo" }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "/api/translate/identify failed: 500");
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(429, r#"{"error":"rate limit exceeded"}"#),
        );
        let api = gateway(&transport);

        let err = api.call(Endpoint::Start, &hello("es")).await.unwrap_err();

        assert_eq!(err.status(), Some(429));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, "").fail("connection reset"));
        let api = gateway(&transport);

        let err = api.call(Endpoint::Start, &hello("es")).await.unwrap_err();

        assert!(matches!(err, AppError::Network(ref msg) if msg == "connection reset"));
        assert_eq!(transport.count_posts(), 1);
    }

    #[tokio::test]
    async fn test_session_failure_does_not_block_call() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .fail("session endpoint unreachable")
                .respond(200, START_OK),
        );
        let api = gateway(&transport);

        let resp: StartResponse = api.call_typed(Endpoint::Start, &hello("es")).await.unwrap();
        assert_eq!(resp.result, "hola");
    }

    #[tokio::test]
    async fn test_non_json_success_returns_raw_text() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, "").respond(200, "plain hola"));
        let api = gateway(&transport);

        let body = api.call(Endpoint::Start, &hello("es")).await.unwrap();
        assert_eq!(body, ResponseBody::Text("plain hola".to_string()));

        let typed = body.decode::<StartResponse>(Endpoint::Start);
        assert!(matches!(typed, Err(AppError::Decode(_))));
    }

    #[tokio::test]
    async fn test_session_reused_across_calls() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(200, START_OK)
                .respond(200, r#"{"result":"hallo"}"#),
        );
        let api = gateway(&transport);

        api.call(Endpoint::Start, &hello("es")).await.unwrap();
        api.call(Endpoint::Preview, &hello("de")).await.unwrap();

        assert_eq!(transport.count_gets(), 1);
        assert_eq!(transport.count_posts(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_session_request() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, "")
                .respond(200, START_OK)
                .respond(200, START_OK)
                .respond(200, START_OK),
        );
        let api = gateway(&transport);
        let req = hello("es");

        let (a, b, c) = tokio::join!(
            api.call(Endpoint::Start, &req),
            api.call(Endpoint::Start, &req),
            api.call(Endpoint::Start, &req),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());

        let calls = transport.calls();
        assert_eq!(transport.count_gets(), 1);
        assert!(calls[0].is_get());
        assert!(calls[1..].iter().all(|c| !c.is_get()));
    }

    /// Routes by method: session GETs take a few scheduler turns, the first
    /// `unauthorized` POSTs answer 401 and the rest succeed.
    struct SlowSessionTransport {
        unauthorized: usize,
        gets: AtomicUsize,
        gets_in_flight: AtomicUsize,
        max_gets_in_flight: AtomicUsize,
        posts: AtomicUsize,
    }

    impl SlowSessionTransport {
        fn new(unauthorized: usize) -> Self {
            Self {
                unauthorized,
                gets: AtomicUsize::new(0),
                gets_in_flight: AtomicUsize::new(0),
                max_gets_in_flight: AtomicUsize::new(0),
                posts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for SlowSessionTransport {
        async fn get(&self, _path: &str) -> AppResult<HttpResponse> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.gets_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_gets_in_flight.fetch_max(in_flight, Ordering::SeqCst);
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            self.gets_in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(HttpResponse::new(200, ""))
        }

        async fn post_json(&self, _path: &str, _body: &str) -> AppResult<HttpResponse> {
            if self.posts.fetch_add(1, Ordering::SeqCst) < self.unauthorized {
                Ok(HttpResponse::new(401, ""))
            } else {
                Ok(HttpResponse::new(200, r#"{"result":"ok"}"#))
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_unauthorized_share_one_refresh() {
        let transport = Arc::new(SlowSessionTransport::new(2));
        let api = ApiGateway::new(transport.clone(), "/session");
        let body = json!({"source": "Hello", "lang": "es"});

        let (a, b) = tokio::join!(
            api.call(Endpoint::Preview, &body),
            api.call(Endpoint::Preview, &body),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.max_gets_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(transport.gets.load(Ordering::SeqCst), 2);
        assert_eq!(transport.posts.load(Ordering::SeqCst), 4);
    }
}
