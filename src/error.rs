//! Engine error types

use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host could not provide a drawing surface; the engine cannot run
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// A settings document could not be parsed
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
