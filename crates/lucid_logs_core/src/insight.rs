//! crates/lucid_logs_core/src/insight.rs
//!
//! Shapes recent sessions into an insight request and guarantees a usable result.
//! Failures of the external service never reach the caller; they are logged and
//! replaced by the fixed fallback triple.

use crate::domain::{
    ConsumptionMethod, EffectRating, InsightResult, SessionRecord, StrainCategory,
};
use crate::ports::{InsightGenerationService, InsightPrompt, PortError, PortResult};
use serde::Serialize;
use tracing::{info, warn};

/// How many of the most recent sessions are analysed by default.
pub const DEFAULT_INSIGHT_WINDOW: usize = 5;

pub const SYSTEM_INSTRUCTION: &str = r#"You are a sensory pattern analyzer for a private journal called "Lucid Logs".
Analyze the user's cannabis session logs to identify patterns in how different strains, methods, or terpenes affect them.
Your tone is objective, calm, and helpful.
ABSOLUTELY NO MEDICAL ADVICE. Do not diagnose or treat.
ABSOLUTELY NO SOURCING OR SELLING ADVICE.
Focus on the "Job to be done" (e.g., "You seem to prefer Sativas for creative work").
Keep the response concise and structured."#;

/// The analysis-relevant part of a record. Names, ids, dosage, flavors and
/// timestamps stay on the device.
#[derive(Debug, Serialize)]
pub struct SessionProjection<'a> {
    pub strain: StrainCategory,
    pub method: ConsumptionMethod,
    pub effects: &'a EffectRating,
    pub notes: &'a str,
    pub rating: u8,
}

impl<'a> From<&'a SessionRecord> for SessionProjection<'a> {
    fn from(record: &'a SessionRecord) -> Self {
        Self {
            strain: record.category(),
            method: record.method(),
            effects: record.effects(),
            notes: record.notes(),
            rating: record.rating().value(),
        }
    }
}

fn task_prompt(session_count: usize) -> String {
    format!(
        "Analyze these last {} sessions. Provide a summary of what seems to work best \
         for the user, a suggestion for their next session based on high ratings, and a \
         caution based on any negative notes or low ratings.",
        session_count
    )
}

/// Builds the request for a window of sessions, in the order given.
pub fn build_prompt(window: &[SessionRecord]) -> PortResult<InsightPrompt> {
    let projections: Vec<SessionProjection<'_>> =
        window.iter().map(SessionProjection::from).collect();
    let serialized = serde_json::to_string(&projections)
        .map_err(|e| PortError::Unexpected(format!("Failed to serialize sessions: {}", e)))?;

    Ok(InsightPrompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        contents: format!("{}\n\n{}", serialized, task_prompt(window.len())),
        session_count: window.len(),
    })
}

/// Requests an insight over the first `limit` records. Always returns a complete result.
///
/// The caller decides what "recent" means by the order of `records`; the store
/// hands them out newest first. A single attempt is made.
pub async fn request_insight(
    service: &dyn InsightGenerationService,
    records: &[SessionRecord],
    limit: usize,
) -> InsightResult {
    let window = &records[..records.len().min(limit)];
    if window.is_empty() {
        info!("No sessions in the analysis window; skipping the insight request.");
        return InsightResult::insufficient_data();
    }

    let outcome = async {
        let prompt = build_prompt(window)?;
        service.generate_insight(&prompt).await
    }
    .await;

    match outcome {
        Ok(result) => {
            info!("Insight generated from {} sessions.", window.len());
            result
        }
        Err(e) => {
            warn!("Insight analysis failed, returning fallback: {}", e);
            InsightResult::fallback()
        }
    }
}
