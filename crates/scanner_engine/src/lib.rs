//! Scanner engine: backend HTTP client and effect execution.
mod api;
mod engine;
mod types;
mod wire;

pub use api::{ApiSettings, Backend, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::EngineHandle;
pub use types::{ApiError, EngineEvent, FailureKind, RequestSeq, SourceCollection, TimerToken};
pub use wire::{ApiSearchResult, ApiSource};
