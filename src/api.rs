//! Session-authenticated access to the translation API.

pub mod transport;
pub mod session;
pub mod gateway;
pub mod translate;

pub use gateway::{ApiGateway, Endpoint, ResponseBody};
pub use session::{SessionManager, SessionState};
pub use translate::TranslationBackend;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
