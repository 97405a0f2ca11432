//! crates/lucid_logs_core/src/domain.rs
//!
//! Defines the pure, core data structures for the journal.
//! Closed enumerations and range-checked newtypes keep invalid records unrepresentable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Flavor suggestions offered by the entry form. Tags outside this list are still accepted.
pub const FLAVOR_TAGS: [&str; 11] = [
    "Citrus", "Pine", "Earthy", "Sweet", "Berry", "Chemical", "Floral", "Spicy", "Woody", "Mint",
    "Cheese",
];

/// Errors raised when a raw value cannot become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Effect score {0} is outside 1..=10")]
    EffectScoreOutOfRange(u8),
    #[error("Star rating {0} is outside 1..=5")]
    StarRatingOutOfRange(u8),
    #[error("Unknown strain category: {0}")]
    UnknownCategory(String),
    #[error("Unknown consumption method: {0}")]
    UnknownMethod(String),
}

//=========================================================================================
// Closed Enumerations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrainCategory {
    Sativa,
    Indica,
    Hybrid,
    #[serde(rename = "CBD Only")]
    CbdOnly,
}

impl StrainCategory {
    pub const ALL: [StrainCategory; 4] = [
        StrainCategory::Sativa,
        StrainCategory::Indica,
        StrainCategory::Hybrid,
        StrainCategory::CbdOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrainCategory::Sativa => "Sativa",
            StrainCategory::Indica => "Indica",
            StrainCategory::Hybrid => "Hybrid",
            StrainCategory::CbdOnly => "CBD Only",
        }
    }
}

impl fmt::Display for StrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrainCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sativa" => Ok(StrainCategory::Sativa),
            "indica" => Ok(StrainCategory::Indica),
            "hybrid" => Ok(StrainCategory::Hybrid),
            "cbd only" | "cbd-only" | "cbd" => Ok(StrainCategory::CbdOnly),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConsumptionMethod {
    #[default]
    Flower,
    Vape,
    Edible,
    Concentrate,
    Tincture,
}

impl ConsumptionMethod {
    pub const ALL: [ConsumptionMethod; 5] = [
        ConsumptionMethod::Flower,
        ConsumptionMethod::Vape,
        ConsumptionMethod::Edible,
        ConsumptionMethod::Concentrate,
        ConsumptionMethod::Tincture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumptionMethod::Flower => "Flower",
            ConsumptionMethod::Vape => "Vape",
            ConsumptionMethod::Edible => "Edible",
            ConsumptionMethod::Concentrate => "Concentrate",
            ConsumptionMethod::Tincture => "Tincture",
        }
    }
}

impl fmt::Display for ConsumptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsumptionMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsumptionMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownMethod(s.to_string()))
    }
}

//=========================================================================================
// Ratings
//=========================================================================================

/// A single effect intensity on the 1..=10 slider scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EffectScore(u8);

impl EffectScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Pins an arbitrary value onto the slider range.
    pub const fn clamped(value: u8) -> Self {
        if value < Self::MIN {
            EffectScore(Self::MIN)
        } else if value > Self::MAX {
            EffectScore(Self::MAX)
        } else {
            EffectScore(value)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for EffectScore {
    fn default() -> Self {
        EffectScore(5)
    }
}

impl TryFrom<u8> for EffectScore {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(EffectScore(value))
        } else {
            Err(DomainError::EffectScoreOutOfRange(value))
        }
    }
}

impl From<EffectScore> for u8 {
    fn from(score: EffectScore) -> Self {
        score.0
    }
}

/// The five effect axes, in the order the radar chart draws them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectAxis {
    Focus,
    Relaxation,
    Euphoria,
    Creativity,
    Sleepiness,
}

impl EffectAxis {
    pub const ALL: [EffectAxis; 5] = [
        EffectAxis::Focus,
        EffectAxis::Relaxation,
        EffectAxis::Euphoria,
        EffectAxis::Creativity,
        EffectAxis::Sleepiness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectAxis::Focus => "focus",
            EffectAxis::Relaxation => "relaxation",
            EffectAxis::Euphoria => "euphoria",
            EffectAxis::Creativity => "creativity",
            EffectAxis::Sleepiness => "sleepiness",
        }
    }
}

/// All five axes are always present; there is no partial rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectRating {
    pub focus: EffectScore,
    pub relaxation: EffectScore,
    pub euphoria: EffectScore,
    pub creativity: EffectScore,
    pub sleepiness: EffectScore,
}

impl EffectRating {
    pub fn get(&self, axis: EffectAxis) -> EffectScore {
        match axis {
            EffectAxis::Focus => self.focus,
            EffectAxis::Relaxation => self.relaxation,
            EffectAxis::Euphoria => self.euphoria,
            EffectAxis::Creativity => self.creativity,
            EffectAxis::Sleepiness => self.sleepiness,
        }
    }

    pub fn set(&mut self, axis: EffectAxis, score: EffectScore) {
        match axis {
            EffectAxis::Focus => self.focus = score,
            EffectAxis::Relaxation => self.relaxation = score,
            EffectAxis::Euphoria => self.euphoria = score,
            EffectAxis::Creativity => self.creativity = score,
            EffectAxis::Sleepiness => self.sleepiness = score,
        }
    }

    pub fn axes(&self) -> impl Iterator<Item = (EffectAxis, EffectScore)> + '_ {
        EffectAxis::ALL.into_iter().map(|axis| (axis, self.get(axis)))
    }
}

/// Overall session rating, one to five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for StarRating {
    fn default() -> Self {
        StarRating(3)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(StarRating(value))
        } else {
            Err(DomainError::StarRatingOutOfRange(value))
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

//=========================================================================================
// Session Record
//=========================================================================================

/// One logged consumption event. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    id: Uuid,
    created_at: DateTime<Utc>,
    product_name: String,
    category: StrainCategory,
    method: ConsumptionMethod,
    dosage: String,
    effects: EffectRating,
    flavor_tags: BTreeSet<String>,
    notes: String,
    rating: StarRating,
}

impl SessionRecord {
    /// Only reachable through the entry form and the sample seed; both check the product name.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create(
        created_at: DateTime<Utc>,
        product_name: String,
        category: StrainCategory,
        method: ConsumptionMethod,
        dosage: String,
        effects: EffectRating,
        flavor_tags: BTreeSet<String>,
        notes: String,
        rating: StarRating,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            product_name,
            category,
            method,
            dosage,
            effects,
            flavor_tags,
            notes,
            rating,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn category(&self) -> StrainCategory {
        self.category
    }

    pub fn method(&self) -> ConsumptionMethod {
        self.method
    }

    pub fn dosage(&self) -> &str {
        &self.dosage
    }

    pub fn effects(&self) -> &EffectRating {
        &self.effects
    }

    pub fn flavor_tags(&self) -> &BTreeSet<String> {
        &self.flavor_tags
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn rating(&self) -> StarRating {
        self.rating
    }
}

//=========================================================================================
// Insight Result
//=========================================================================================

/// A three-part reading of recent sessions. Transient; replaced on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    pub summary: String,
    pub suggestion: String,
    pub caution: String,
}

impl InsightResult {
    pub fn new(
        summary: impl Into<String>,
        suggestion: impl Into<String>,
        caution: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            suggestion: suggestion.into(),
            caution: caution.into(),
        }
    }

    /// The fixed triple returned whenever the text-generation service cannot be used.
    pub fn fallback() -> Self {
        Self::new(
            "Unable to analyze patterns at this time.",
            "Try logging more sessions to generate data.",
            "Ensure you are connected to the internet.",
        )
    }

    /// Returned when there is nothing to analyse.
    pub fn insufficient_data() -> Self {
        Self::new(
            "There are no logged sessions to analyze yet.",
            "Log a few sessions to start seeing patterns.",
            "Patterns drawn from very few sessions can be misleading.",
        )
    }
}

//=========================================================================================
// Dashboard Figures
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    pub total_sessions: usize,
    /// Mean star rating rounded to one decimal; `None` for an empty journal.
    pub average_rating: Option<f64>,
    pub latest: Option<SessionRecord>,
}

impl JournalStats {
    /// Expects records newest first, as the store returns them.
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let total_sessions = records.len();
        let average_rating = if total_sessions == 0 {
            None
        } else {
            let sum: u32 = records.iter().map(|r| u32::from(r.rating.value())).sum();
            let mean = f64::from(sum) / total_sessions as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        Self {
            total_sessions,
            average_rating,
            latest: records.first().cloned(),
        }
    }
}

/// The journal's starter entries, newest first.
pub fn sample_sessions(now: DateTime<Utc>) -> Vec<SessionRecord> {
    let effects = |focus, relaxation, euphoria, creativity, sleepiness| EffectRating {
        focus: EffectScore::clamped(focus),
        relaxation: EffectScore::clamped(relaxation),
        euphoria: EffectScore::clamped(euphoria),
        creativity: EffectScore::clamped(creativity),
        sleepiness: EffectScore::clamped(sleepiness),
    };
    let tags = |list: &[&str]| list.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>();

    vec![
        SessionRecord::create(
            now - Duration::days(2),
            "Blue Dream Haze".to_string(),
            StrainCategory::Sativa,
            ConsumptionMethod::Flower,
            "0.3g".to_string(),
            effects(8, 3, 7, 9, 2),
            tags(&["Berry", "Sweet", "Earthy"]),
            "Great for painting. Felt very clear-headed but energetic.".to_string(),
            StarRating(5),
        ),
        SessionRecord::create(
            now - Duration::days(5),
            "Granddaddy Purple".to_string(),
            StrainCategory::Indica,
            ConsumptionMethod::Vape,
            "3 puffs".to_string(),
            effects(2, 9, 5, 4, 10),
            tags(&["Grape", "Floral"]),
            "Used for sleep aid. Out like a light within 30 mins.".to_string(),
            StarRating(4),
        ),
        SessionRecord::create(
            now - Duration::days(10),
            "GSC".to_string(),
            StrainCategory::Hybrid,
            ConsumptionMethod::Edible,
            "10mg".to_string(),
            effects(4, 7, 8, 5, 4),
            tags(&["Dough", "Mint"]),
            "Social gathering. Felt giggly and relaxed, but dry mouth was annoying.".to_string(),
            StarRating(3),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_display_and_hyphenated_forms() {
        assert_eq!("CBD Only".parse::<StrainCategory>(), Ok(StrainCategory::CbdOnly));
        assert_eq!("cbd-only".parse::<StrainCategory>(), Ok(StrainCategory::CbdOnly));
        assert_eq!(" sativa ".parse::<StrainCategory>(), Ok(StrainCategory::Sativa));
        assert!(matches!(
            "Ruderalis".parse::<StrainCategory>(),
            Err(DomainError::UnknownCategory(_))
        ));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("tincture".parse::<ConsumptionMethod>(), Ok(ConsumptionMethod::Tincture));
        assert!("Smoke signal".parse::<ConsumptionMethod>().is_err());
    }

    #[test]
    fn category_serializes_with_display_name() {
        let json = serde_json::to_string(&StrainCategory::CbdOnly).unwrap();
        assert_eq!(json, "\"CBD Only\"");
    }

    #[test]
    fn effect_score_rejects_out_of_range_values() {
        assert_eq!(EffectScore::try_from(0), Err(DomainError::EffectScoreOutOfRange(0)));
        assert_eq!(EffectScore::try_from(11), Err(DomainError::EffectScoreOutOfRange(11)));
        assert_eq!(EffectScore::try_from(10).map(EffectScore::value), Ok(10));
        assert_eq!(EffectScore::clamped(42).value(), 10);
        assert_eq!(EffectScore::clamped(0).value(), 1);
    }

    #[test]
    fn effect_score_deserialization_enforces_range() {
        assert!(serde_json::from_str::<EffectScore>("7").is_ok());
        assert!(serde_json::from_str::<EffectScore>("12").is_err());
    }

    #[test]
    fn star_rating_rejects_zero_and_six() {
        assert!(StarRating::try_from(0).is_err());
        assert!(StarRating::try_from(6).is_err());
        assert_eq!(StarRating::default().value(), 3);
    }

    #[test]
    fn effect_rating_iterates_all_five_axes_in_order() {
        let mut rating = EffectRating::default();
        rating.set(EffectAxis::Creativity, EffectScore::clamped(9));

        let axes: Vec<_> = rating.axes().collect();
        assert_eq!(axes.len(), 5);
        assert_eq!(axes[0].0, EffectAxis::Focus);
        assert_eq!(axes[3], (EffectAxis::Creativity, EffectScore::clamped(9)));
        assert_eq!(axes[4].1.value(), 5);
    }

    #[test]
    fn stats_for_empty_journal_have_no_average() {
        let stats = JournalStats::from_records(&[]);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.average_rating, None);
        assert!(stats.latest.is_none());
    }

    #[test]
    fn stats_average_is_rounded_to_one_decimal() {
        let records = sample_sessions(Utc::now());
        let stats = JournalStats::from_records(&records);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.average_rating, Some(4.0));
        assert_eq!(
            stats.latest.map(|r| r.product_name().to_string()),
            Some("Blue Dream Haze".to_string())
        );

        let two = &records[1..];
        assert_eq!(JournalStats::from_records(two).average_rating, Some(3.5));
    }

    #[test]
    fn sample_sessions_are_newest_first_with_unique_ids() {
        let now = Utc::now();
        let records = sample_sessions(now);
        assert!(records.windows(2).all(|w| w[0].created_at() > w[1].created_at()));
        assert_ne!(records[0].id(), records[1].id());
        assert_ne!(records[1].id(), records[2].id());
    }

    #[test]
    fn fallback_triple_is_stable() {
        assert_eq!(InsightResult::fallback(), InsightResult::fallback());
        assert_eq!(InsightResult::fallback().summary, "Unable to analyze patterns at this time.");
    }
}
