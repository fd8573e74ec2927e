//! The four public translation operations.

use async_trait::async_trait;

use super::gateway::{ApiGateway, Endpoint};
use crate::shared::error::AppResult;
use crate::shared::types::{
    IdentifyRequest, IdentifyResponse, ImproveRequest, ImproveResponse, PreviewRequest,
    PreviewResponse, StartRequest, StartResponse,
};

#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Begin a new context and return its first translation.
    async fn start_translation(&self, req: &StartRequest) -> AppResult<StartResponse>;

    /// Refine the output of an existing context.
    async fn improve_translation(&self, req: &ImproveRequest) -> AppResult<ImproveResponse>;

    /// Stateless translation; no context is created.
    async fn preview_translation(&self, req: &PreviewRequest) -> AppResult<PreviewResponse>;

    async fn identify_language(&self, req: &IdentifyRequest) -> AppResult<IdentifyResponse>;
}

#[async_trait]
impl TranslationBackend for ApiGateway {
    async fn start_translation(&self, req: &StartRequest) -> AppResult<StartResponse> {
        self.call_typed(Endpoint::Start, req).await
    }

    async fn improve_translation(&self, req: &ImproveRequest) -> AppResult<ImproveResponse> {
        self.call_typed(Endpoint::Improve, req).await
    }

    async fn preview_translation(&self, req: &PreviewRequest) -> AppResult<PreviewResponse> {
        self.call_typed(Endpoint::Preview, req).await
    }

    async fn identify_language(&self, req: &IdentifyRequest) -> AppResult<IdentifyResponse> {
        self.call_typed(Endpoint::Identify, req).await
    }
}
