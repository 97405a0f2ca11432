//! crates/lucid_logs_core/src/entry.rs
//!
//! The guided, three-step entry form that is the only way to create a `SessionRecord`.

use crate::domain::{
    ConsumptionMethod, EffectAxis, EffectRating, EffectScore, SessionRecord, StarRating,
    StrainCategory,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("A product name is required before continuing")]
    MissingProductName,
    #[error("The entry form has no step after the last one")]
    AlreadyAtLastStep,
}

/// The pages of the entry form, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStep {
    /// Product name, category, method and dosage.
    Vessel,
    /// The five effect sliders.
    Effects,
    /// Flavors, notes and the star rating.
    Reflection,
}

impl EntryStep {
    fn next(self) -> Option<EntryStep> {
        match self {
            EntryStep::Vessel => Some(EntryStep::Effects),
            EntryStep::Effects => Some(EntryStep::Reflection),
            EntryStep::Reflection => None,
        }
    }

    fn previous(self) -> Option<EntryStep> {
        match self {
            EntryStep::Vessel => None,
            EntryStep::Effects => Some(EntryStep::Vessel),
            EntryStep::Reflection => Some(EntryStep::Effects),
        }
    }
}

/// A session being filled in. Nothing is recorded until `finish` succeeds.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    step: EntryStep,
    product_name: String,
    category: Option<StrainCategory>,
    method: ConsumptionMethod,
    dosage: String,
    effects: EffectRating,
    flavor_tags: BTreeSet<String>,
    notes: String,
    rating: StarRating,
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionDraft {
    pub fn new() -> Self {
        Self {
            step: EntryStep::Vessel,
            product_name: String::new(),
            category: None,
            method: ConsumptionMethod::default(),
            dosage: String::new(),
            effects: EffectRating::default(),
            flavor_tags: BTreeSet::new(),
            notes: String::new(),
            rating: StarRating::default(),
        }
    }

    pub fn step(&self) -> EntryStep {
        self.step
    }

    pub fn set_product_name(&mut self, name: impl Into<String>) {
        self.product_name = name.into();
    }

    pub fn set_category(&mut self, category: StrainCategory) {
        self.category = Some(category);
    }

    pub fn set_method(&mut self, method: ConsumptionMethod) {
        self.method = method;
    }

    pub fn set_dosage(&mut self, dosage: impl Into<String>) {
        self.dosage = dosage.into();
    }

    pub fn set_effects(&mut self, effects: EffectRating) {
        self.effects = effects;
    }

    pub fn set_effect(&mut self, axis: EffectAxis, score: EffectScore) {
        self.effects.set(axis, score);
    }

    /// Adds the tag if it is absent, removes it otherwise.
    pub fn toggle_flavor(&mut self, tag: &str) {
        if !self.flavor_tags.remove(tag) {
            self.flavor_tags.insert(tag.to_string());
        }
    }

    /// Replaces the selection wholesale; blank tags are dropped and duplicates collapse.
    pub fn set_flavor_tags<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.flavor_tags = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    pub fn flavor_tags(&self) -> &BTreeSet<String> {
        &self.flavor_tags
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_rating(&mut self, rating: StarRating) {
        self.rating = rating;
    }

    fn has_product_name(&self) -> bool {
        !self.product_name.trim().is_empty()
    }

    pub fn can_advance(&self) -> bool {
        self.has_product_name() && self.step.next().is_some()
    }

    pub fn advance(&mut self) -> Result<EntryStep, DraftError> {
        if !self.has_product_name() {
            return Err(DraftError::MissingProductName);
        }
        let next = self.step.next().ok_or(DraftError::AlreadyAtLastStep)?;
        self.step = next;
        Ok(next)
    }

    pub fn retreat(&mut self) -> EntryStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Turns the draft into an immutable record stamped with `now`.
    pub fn finish(self, now: DateTime<Utc>) -> Result<SessionRecord, DraftError> {
        if !self.has_product_name() {
            return Err(DraftError::MissingProductName);
        }

        Ok(SessionRecord::create(
            now,
            self.product_name.trim().to_string(),
            self.category.unwrap_or(StrainCategory::Hybrid),
            self.method,
            self.dosage,
            self.effects,
            self.flavor_tags,
            self.notes,
            self.rating,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_starts_on_first_step_with_form_defaults() {
        let draft = SessionDraft::new();
        assert_eq!(draft.step(), EntryStep::Vessel);
        assert!(!draft.can_advance());

        let record = {
            let mut d = draft.clone();
            d.set_product_name("Defaults");
            d.finish(Utc::now()).unwrap()
        };
        assert_eq!(record.method(), ConsumptionMethod::Flower);
        assert_eq!(record.category(), StrainCategory::Hybrid);
        assert_eq!(record.rating().value(), 3);
        assert!(record.effects().axes().all(|(_, score)| score.value() == 5));
    }

    #[test]
    fn advance_is_refused_without_product_name() {
        let mut draft = SessionDraft::new();
        draft.set_product_name("   ");
        assert_eq!(draft.advance(), Err(DraftError::MissingProductName));
        assert_eq!(draft.step(), EntryStep::Vessel);
    }

    #[test]
    fn walks_forward_and_back_through_the_steps() {
        let mut draft = SessionDraft::new();
        draft.set_product_name("Blue Dream");

        assert_eq!(draft.advance(), Ok(EntryStep::Effects));
        assert_eq!(draft.advance(), Ok(EntryStep::Reflection));
        assert!(!draft.can_advance());
        assert_eq!(draft.advance(), Err(DraftError::AlreadyAtLastStep));

        assert_eq!(draft.retreat(), EntryStep::Effects);
        assert_eq!(draft.retreat(), EntryStep::Vessel);
        assert_eq!(draft.retreat(), EntryStep::Vessel);
    }

    #[test]
    fn toggling_a_flavor_twice_removes_it() {
        let mut draft = SessionDraft::new();
        draft.toggle_flavor("Citrus");
        draft.toggle_flavor("Pine");
        draft.toggle_flavor("Citrus");
        assert_eq!(draft.flavor_tags().iter().collect::<Vec<_>>(), vec!["Pine"]);
    }

    #[test]
    fn set_flavor_tags_collapses_duplicates_and_blanks() {
        let mut draft = SessionDraft::new();
        draft.set_flavor_tags(vec![
            "Mint".to_string(),
            " Mint ".to_string(),
            "".to_string(),
            "Grape".to_string(),
        ]);
        assert_eq!(draft.flavor_tags().iter().collect::<Vec<_>>(), vec!["Grape", "Mint"]);
    }

    #[test]
    fn empty_product_name_never_produces_a_record() {
        let combinations = [
            (StrainCategory::Sativa, ConsumptionMethod::Vape, "", 1u8),
            (StrainCategory::Indica, ConsumptionMethod::Edible, "10mg", 5),
            (StrainCategory::CbdOnly, ConsumptionMethod::Tincture, "2 drops", 3),
        ];

        for (category, method, dosage, stars) in combinations {
            for name in ["", " ", "\t\n"] {
                let mut draft = SessionDraft::new();
                draft.set_product_name(name);
                draft.set_category(category);
                draft.set_method(method);
                draft.set_dosage(dosage);
                draft.set_notes("notes");
                draft.set_rating(StarRating::try_from(stars).unwrap());
                draft.toggle_flavor("Mint");
                assert_eq!(draft.finish(Utc::now()), Err(DraftError::MissingProductName));
            }
        }
    }

    #[test]
    fn finish_keeps_every_captured_field() {
        let now = Utc::now();
        let mut draft = SessionDraft::new();
        draft.set_product_name("  Sour Diesel ");
        draft.set_category(StrainCategory::Sativa);
        draft.set_method(ConsumptionMethod::Concentrate);
        draft.set_dosage("one dab");
        draft.set_effect(EffectAxis::Focus, EffectScore::clamped(9));
        draft.toggle_flavor("Chemical");
        draft.set_notes("Sharp and quick.");
        draft.set_rating(StarRating::try_from(4).unwrap());

        let record = draft.finish(now).unwrap();
        assert_eq!(record.product_name(), "Sour Diesel");
        assert_eq!(record.created_at(), now);
        assert_eq!(record.category(), StrainCategory::Sativa);
        assert_eq!(record.method(), ConsumptionMethod::Concentrate);
        assert_eq!(record.dosage(), "one dab");
        assert_eq!(record.effects().focus.value(), 9);
        assert!(record.flavor_tags().contains("Chemical"));
        assert_eq!(record.notes(), "Sharp and quick.");
        assert_eq!(record.rating().value(), 4);
    }
}
