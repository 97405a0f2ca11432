//! services/api/src/web/protocol.rs
//!
//! Defines the JSON message shapes exchanged between the journal client and the API server.

use crate::web::state::InsightPhase;
use chrono::{DateTime, Utc};
use lucid_logs_core::domain::{
    ConsumptionMethod, DomainError, EffectAxis, EffectRating, EffectScore, InsightResult,
    JournalStats, SessionRecord, StarRating, StrainCategory, FLAVOR_TAGS,
};
use lucid_logs_core::entry::SessionDraft;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client TO the Server
//=========================================================================================

/// Five slider values, each 1..=10.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct EffectsPayload {
    pub focus: u8,
    pub relaxation: u8,
    pub euphoria: u8,
    pub creativity: u8,
    pub sleepiness: u8,
}

impl TryFrom<EffectsPayload> for EffectRating {
    type Error = DomainError;

    fn try_from(payload: EffectsPayload) -> Result<Self, Self::Error> {
        Ok(EffectRating {
            focus: EffectScore::try_from(payload.focus)?,
            relaxation: EffectScore::try_from(payload.relaxation)?,
            euphoria: EffectScore::try_from(payload.euphoria)?,
            creativity: EffectScore::try_from(payload.creativity)?,
            sleepiness: EffectScore::try_from(payload.sleepiness)?,
        })
    }
}

/// A completed entry form. Omitted fields take the form's starting values.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct SessionPayload {
    pub product_name: String,
    /// One of "Sativa", "Indica", "Hybrid", "CBD Only".
    pub category: Option<String>,
    /// One of "Flower", "Vape", "Edible", "Concentrate", "Tincture".
    pub method: Option<String>,
    #[serde(default)]
    pub dosage: String,
    pub effects: Option<EffectsPayload>,
    #[serde(default)]
    pub flavor_tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// One to five stars.
    pub rating: Option<u8>,
}

impl SessionPayload {
    /// Fills a draft the same way the step-by-step form would.
    pub fn into_draft(self) -> Result<SessionDraft, DomainError> {
        let mut draft = SessionDraft::new();
        draft.set_product_name(self.product_name);
        if let Some(category) = self.category {
            draft.set_category(category.parse::<StrainCategory>()?);
        }
        if let Some(method) = self.method {
            draft.set_method(method.parse::<ConsumptionMethod>()?);
        }
        draft.set_dosage(self.dosage);
        if let Some(effects) = self.effects {
            draft.set_effects(EffectRating::try_from(effects)?);
        }
        draft.set_flavor_tags(self.flavor_tags);
        draft.set_notes(self.notes);
        if let Some(rating) = self.rating {
            draft.set_rating(StarRating::try_from(rating)?);
        }
        Ok(draft)
    }
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub category: String,
    pub method: String,
    pub dosage: String,
    pub effects: EffectsPayload,
    pub flavor_tags: Vec<String>,
    pub notes: String,
    pub rating: u8,
}

impl From<&SessionRecord> for SessionView {
    fn from(record: &SessionRecord) -> Self {
        let effects = record.effects();
        Self {
            id: record.id(),
            created_at: record.created_at(),
            product_name: record.product_name().to_string(),
            category: record.category().to_string(),
            method: record.method().to_string(),
            dosage: record.dosage().to_string(),
            effects: EffectsPayload {
                focus: effects.focus.value(),
                relaxation: effects.relaxation.value(),
                euphoria: effects.euphoria.value(),
                creativity: effects.creativity.value(),
                sleepiness: effects.sleepiness.value(),
            },
            flavor_tags: record.flavor_tags().iter().cloned().collect(),
            notes: record.notes().to_string(),
            rating: record.rating().value(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct InsightView {
    pub summary: String,
    pub suggestion: String,
    pub caution: String,
}

impl From<&InsightResult> for InsightView {
    fn from(result: &InsightResult) -> Self {
        Self {
            summary: result.summary.clone(),
            suggestion: result.suggestion.clone(),
            caution: result.caution.clone(),
        }
    }
}

/// The insight panel: which phase it is in and the result when there is one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct InsightStateView {
    /// "idle", "requesting" or "ready".
    pub state: String,
    pub insight: Option<InsightView>,
}

impl From<&InsightPhase> for InsightStateView {
    fn from(phase: &InsightPhase) -> Self {
        Self {
            state: phase.name().to_string(),
            insight: phase.result().map(InsightView::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DashboardView {
    pub total_sessions: usize,
    /// Mean star rating to one decimal; absent for an empty journal.
    pub average_rating: Option<f64>,
    pub latest: Option<SessionView>,
    /// The few entries right after the latest one.
    pub echoes: Vec<SessionView>,
}

/// How many entries follow the latest one on the dashboard.
pub const DASHBOARD_ECHOES: usize = 3;

impl DashboardView {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let stats = JournalStats::from_records(records);
        Self {
            total_sessions: stats.total_sessions,
            average_rating: stats.average_rating,
            latest: stats.latest.as_ref().map(SessionView::from),
            echoes: records
                .iter()
                .skip(1)
                .take(DASHBOARD_ECHOES)
                .map(SessionView::from)
                .collect(),
        }
    }
}

/// The choices the entry form offers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CatalogView {
    pub categories: Vec<String>,
    pub methods: Vec<String>,
    pub flavor_tags: Vec<String>,
    pub effect_axes: Vec<String>,
}

impl CatalogView {
    pub fn current() -> Self {
        Self {
            categories: StrainCategory::ALL.iter().map(|c| c.to_string()).collect(),
            methods: ConsumptionMethod::ALL.iter().map(|m| m.to_string()).collect(),
            flavor_tags: FLAVOR_TAGS.iter().map(|t| t.to_string()).collect(),
            effect_axes: EffectAxis::ALL.iter().map(|a| a.as_str().to_string()).collect(),
        }
    }
}
