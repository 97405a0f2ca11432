//! crates/lucid_logs_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the journal's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of how sessions are held and which text-generation API is used.

use async_trait::async_trait;
use crate::domain::{InsightResult, SessionRecord};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, decoding).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Everything sent to the text-generation service for one insight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightPrompt {
    /// Fixed behavioural constraints for the model.
    pub system_instruction: String,
    /// Serialized session projections followed by the task prompt.
    pub contents: String,
    pub session_count: usize,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Ordered, append-only session history. Operations are total.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts at the front; the newest record is always first.
    async fn append(&self, record: SessionRecord);

    /// Current contents, newest first.
    async fn all(&self) -> Vec<SessionRecord>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
pub trait InsightGenerationService: Send + Sync {
    /// Produces a structured insight. A response without exactly the three
    /// expected fields is an error, never a partially filled result.
    async fn generate_insight(&self, prompt: &InsightPrompt) -> PortResult<InsightResult>;
}
