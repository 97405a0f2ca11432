//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the insight request state machine.

use crate::config::Config;
use lucid_logs_core::domain::InsightResult;
use lucid_logs_core::ports::{InsightGenerationService, SessionStore};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub insight_adapter: Arc<dyn InsightGenerationService>,
    pub insight_phase: Arc<Mutex<InsightPhase>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        insight_adapter: Arc<dyn InsightGenerationService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            store,
            insight_adapter,
            insight_phase: Arc::new(Mutex::new(InsightPhase::Idle)),
            config,
        }
    }

    /// Feeds an event to the insight state machine and returns the resulting phase.
    /// Events the current phase does not accept leave it unchanged.
    pub async fn apply_insight_event(&self, event: InsightEvent) -> (InsightPhase, bool) {
        let mut phase = self.insight_phase.lock().await;
        match phase.transition(event) {
            Some(next) => {
                *phase = next;
                (phase.clone(), true)
            }
            None => (phase.clone(), false),
        }
    }

    pub async fn current_insight_phase(&self) -> InsightPhase {
        self.insight_phase.lock().await.clone()
    }
}

//=========================================================================================
// Insight State Machine
//=========================================================================================

/// Where the single on-screen insight currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightPhase {
    /// No result is held; a request may be started.
    Idle,
    /// A request is outstanding. It cannot be cancelled. `stale` is set when the
    /// session history changed after the request read it.
    Requesting { stale: bool },
    /// A result (possibly the fallback) is cached until cleared.
    Ready(InsightResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightEvent {
    Request,
    Complete(InsightResult),
    Clear,
    /// The session history changed, so a cached result describes stale data.
    RecordsChanged,
}

impl InsightPhase {
    /// The transition table. `None` means the event is ignored in this phase.
    pub fn transition(&self, event: InsightEvent) -> Option<InsightPhase> {
        match (self, event) {
            (InsightPhase::Idle, InsightEvent::Request) => {
                Some(InsightPhase::Requesting { stale: false })
            }
            (InsightPhase::Requesting { stale: false }, InsightEvent::Complete(result)) => {
                Some(InsightPhase::Ready(result))
            }
            // The result describes a window that no longer matches the journal.
            (InsightPhase::Requesting { stale: true }, InsightEvent::Complete(_)) => {
                Some(InsightPhase::Idle)
            }
            (InsightPhase::Requesting { stale: false }, InsightEvent::RecordsChanged) => {
                Some(InsightPhase::Requesting { stale: true })
            }
            (InsightPhase::Ready(_), InsightEvent::Clear) => Some(InsightPhase::Idle),
            (InsightPhase::Ready(_), InsightEvent::RecordsChanged) => Some(InsightPhase::Idle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InsightPhase::Idle => "idle",
            InsightPhase::Requesting { .. } => "requesting",
            InsightPhase::Ready(_) => "ready",
        }
    }

    pub fn result(&self) -> Option<&InsightResult> {
        match self {
            InsightPhase::Ready(result) => Some(result),
            _ => None,
        }
    }
}
