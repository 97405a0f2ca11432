//! services/api/src/web/insight_task.rs
//!
//! This module contains the asynchronous "worker" function that drives one insight
//! request through the state machine.

use crate::web::state::{AppState, InsightEvent, InsightPhase};
use lucid_logs_core::domain::InsightResult;
use lucid_logs_core::insight::request_insight;
use std::time::Instant;
use tracing::{error, info};

/// Represents the outcome of the `insight_process` task.
#[derive(Debug, PartialEq, Eq)]
pub enum InsightOutcome {
    /// A request ran to completion. The phase is `Ready`, or `Idle` when the
    /// journal changed while it was in flight.
    Completed(InsightPhase),
    /// Nothing was started: a request is already in flight or a result is cached.
    Ignored(InsightPhase),
}

/// Runs a single insight request if the state machine allows one.
///
/// The request runs in its own task, so it still reaches `Complete` when the
/// caller is dropped mid-flight. The phase lock is only held for the transitions,
/// never across the network call, so concurrent callers observe `Requesting`.
pub async fn insight_process(app_state: &AppState) -> InsightOutcome {
    let (phase, started) = app_state.apply_insight_event(InsightEvent::Request).await;
    if !started {
        info!("Insight request ignored while {}.", phase.name());
        return InsightOutcome::Ignored(phase);
    }

    let task_state = app_state.clone();
    let handle = tokio::spawn(async move { run_request(&task_state).await });

    match handle.await {
        Ok(phase) => InsightOutcome::Completed(phase),
        Err(e) => {
            error!("Insight task failed: {}", e);
            let (phase, _) = app_state
                .apply_insight_event(InsightEvent::Complete(InsightResult::fallback()))
                .await;
            InsightOutcome::Completed(phase)
        }
    }
}

async fn run_request(app_state: &AppState) -> InsightPhase {
    let start_time = Instant::now();
    let records = app_state.store.all().await;
    let result = request_insight(
        app_state.insight_adapter.as_ref(),
        &records,
        app_state.config.insight_window,
    )
    .await;
    info!("⏱️ Insight request took: {:?}", start_time.elapsed());

    let (phase, _) = app_state
        .apply_insight_event(InsightEvent::Complete(result))
        .await;
    if phase == InsightPhase::Idle {
        info!("Journal changed during the insight request; result discarded.");
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::config::Config;
    use async_trait::async_trait;
    use lucid_logs_core::ports::{InsightGenerationService, InsightPrompt, PortError, PortResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    struct CountingService {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl InsightGenerationService for CountingService {
        async fn generate_insight(&self, _prompt: &InsightPrompt) -> PortResult<InsightResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PortError::Unexpected("offline".to_string()))
            } else {
                Ok(InsightResult::new("S", "U", "C"))
            }
        }
    }

    /// Blocks inside the call until released, so a request stays in flight.
    struct GatedService {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl InsightGenerationService for GatedService {
        async fn generate_insight(&self, _prompt: &InsightPrompt) -> PortResult<InsightResult> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(InsightResult::new("late", "late", "late"))
        }
    }

    fn app_state(service: Arc<dyn InsightGenerationService>) -> AppState {
        AppState::new(
            Arc::new(InMemorySessionStore::seeded()),
            service,
            Arc::new(Config::default()),
        )
    }

    #[tokio::test]
    async fn completed_request_caches_the_result() {
        let service = Arc::new(CountingService { calls: AtomicUsize::new(0), fail: false });
        let state = app_state(service.clone());

        let first = insight_process(&state).await;
        assert_eq!(
            first,
            InsightOutcome::Completed(InsightPhase::Ready(InsightResult::new("S", "U", "C")))
        );

        let second = insight_process(&state).await;
        assert!(matches!(second, InsightOutcome::Ignored(InsightPhase::Ready(_))));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_shown_as_the_fallback_result() {
        let service = Arc::new(CountingService { calls: AtomicUsize::new(0), fail: true });
        let state = app_state(service);

        let outcome = insight_process(&state).await;
        assert_eq!(
            outcome,
            InsightOutcome::Completed(InsightPhase::Ready(InsightResult::fallback()))
        );
    }

    #[tokio::test]
    async fn second_request_while_in_flight_is_a_no_op() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let state = app_state(service.clone());

        let background_state = state.clone();
        let first = tokio::spawn(async move { insight_process(&background_state).await });
        service.entered.notified().await;

        assert_eq!(
            insight_process(&state).await,
            InsightOutcome::Ignored(InsightPhase::Requesting { stale: false })
        );

        service.release.notify_one();
        let completed = first.await.unwrap();
        assert!(matches!(completed, InsightOutcome::Completed(InsightPhase::Ready(_))));
    }

    #[tokio::test]
    async fn clearing_allows_a_fresh_request() {
        let service = Arc::new(CountingService { calls: AtomicUsize::new(0), fail: false });
        let state = app_state(service.clone());

        insight_process(&state).await;
        let (phase, applied) = state.apply_insight_event(InsightEvent::Clear).await;
        assert!(applied);
        assert_eq!(phase, InsightPhase::Idle);

        insight_process(&state).await;
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_caller_still_completes_the_request() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let state = app_state(service.clone());

        let caller_state = state.clone();
        let caller = tokio::spawn(async move { insight_process(&caller_state).await });
        service.entered.notified().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        service.release.notify_one();
        let landed = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let phase = state.current_insight_phase().await;
                if !matches!(phase, InsightPhase::Requesting { .. }) {
                    return phase;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(landed, InsightPhase::Ready(InsightResult::new("late", "late", "late")));

        let (phase, cleared) = state.apply_insight_event(InsightEvent::Clear).await;
        assert!(cleared);
        assert_eq!(phase, InsightPhase::Idle);
    }

    #[tokio::test]
    async fn session_saved_mid_flight_discards_the_result() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let state = app_state(service.clone());

        let background_state = state.clone();
        let first = tokio::spawn(async move { insight_process(&background_state).await });
        service.entered.notified().await;

        let (phase, marked) = state.apply_insight_event(InsightEvent::RecordsChanged).await;
        assert!(marked);
        assert_eq!(phase, InsightPhase::Requesting { stale: true });

        service.release.notify_one();
        assert_eq!(first.await.unwrap(), InsightOutcome::Completed(InsightPhase::Idle));
        assert_eq!(state.current_insight_phase().await, InsightPhase::Idle);
    }
}
