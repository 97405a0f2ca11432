pub mod domain;
pub mod entry;
pub mod insight;
pub mod ports;

pub use domain::{
    sample_sessions, ConsumptionMethod, DomainError, EffectAxis, EffectRating, EffectScore,
    InsightResult, JournalStats, SessionRecord, StarRating, StrainCategory, FLAVOR_TAGS,
};
pub use entry::{DraftError, EntryStep, SessionDraft};
pub use insight::{build_prompt, request_insight, DEFAULT_INSIGHT_WINDOW};
pub use ports::{InsightGenerationService, InsightPrompt, PortError, PortResult, SessionStore};
