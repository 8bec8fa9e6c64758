//! Scenario Domain Types
//!
//! Value records exchanged between the coordinator, the caches and the
//! external collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Observation ==
/// Lightweight projection of a field observation attached to a case.
///
/// Only the fields that participate in the cache-key fingerprint are
/// carried: the id plus the two volatile revision signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation identifier
    pub id: String,
    /// Current review status ("open", "verified", ...)
    #[serde(default)]
    pub status: String,
    /// Last-modified timestamp as reported by the backend
    #[serde(default)]
    pub updated_at: String,
}

// == Probability Class ==
/// Coarse likelihood bucket assigned to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityClass {
    High,
    Medium,
    Low,
}

// == Scenario ==
/// One resolution narrative for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Short headline
    pub title: String,
    /// Narrative description
    pub narrative: String,
    /// Likelihood bucket
    pub probability: ProbabilityClass,
    /// Ordered list of recommended actions
    #[serde(default)]
    pub actions: Vec<String>,
    /// Rough timeline estimate, free text
    #[serde(default)]
    pub timeline: String,
    /// Factors that make this scenario more or less likely
    #[serde(default)]
    pub key_factors: Vec<String>,
    /// Resources worth involving
    #[serde(default)]
    pub resources: Vec<String>,
}

// == Scenario Bundle ==
/// The pair of alternative resolution scenarios produced by one
/// generation, plus an overall summary and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub scenario_one: Scenario,
    pub scenario_two: Scenario,
    /// Overall assessment across both scenarios
    #[serde(default)]
    pub summary: String,
    /// Cross-scenario recommendations
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ScenarioBundle {
    // == Fallback ==
    /// Best-effort default returned when the upstream model produced
    /// output we could not parse. Deliberately marked low-probability so
    /// it reads as low-confidence; upstream format instability is never
    /// surfaced to the user.
    pub fn fallback() -> Self {
        let generic = |title: &str, narrative: &str| Scenario {
            title: title.to_string(),
            narrative: narrative.to_string(),
            probability: ProbabilityClass::Low,
            actions: vec![
                "Continue coordinating with local authorities".to_string(),
                "Re-verify the most recent observations".to_string(),
            ],
            timeline: "Unknown".to_string(),
            key_factors: vec!["Insufficient structured data from analysis".to_string()],
            resources: vec!["Local search and rescue".to_string()],
        };

        Self {
            scenario_one: generic(
                "Voluntary absence",
                "The person may have left the area on their own and could return \
                 or make contact. Automated analysis was inconclusive.",
            ),
            scenario_two: generic(
                "Involuntary circumstances",
                "The disappearance may involve circumstances outside the person's \
                 control. Automated analysis was inconclusive.",
            ),
            summary: "Automated analysis could not produce a detailed assessment; \
                      treat both scenarios as open."
                .to_string(),
            recommendations: vec![
                "Gather additional field observations".to_string(),
                "Retry the analysis once more data is available".to_string(),
            ],
        }
    }
}

// == Generation Outcome ==
/// Result of one generation attempt.
///
/// Cached regardless of `success`, so repeated failing generations within
/// the TTL window short-circuit without re-invoking the AI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Whether generation itself produced a bundle
    pub success: bool,
    /// The generated bundle, present on success
    pub bundle: Option<ScenarioBundle>,
    /// Fatal error on failure; non-fatal persistence error on success
    pub error: Option<String>,
    /// Id assigned by the persistence collaborator, when the save landed
    pub persisted_id: Option<String>,
}

impl GenerationOutcome {
    /// Successful generation whose bundle was also persisted.
    pub fn saved(bundle: ScenarioBundle, persisted_id: String) -> Self {
        Self {
            success: true,
            bundle: Some(bundle),
            error: None,
            persisted_id: Some(persisted_id),
        }
    }

    /// Successful generation whose save failed; the persistence error is
    /// surfaced as display-only.
    pub fn unsaved(bundle: ScenarioBundle, persistence_error: String) -> Self {
        Self {
            success: true,
            bundle: Some(bundle),
            error: Some(persistence_error),
            persisted_id: None,
        }
    }

    /// Failed generation.
    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            bundle: None,
            error: Some(error),
            persisted_id: None,
        }
    }
}

// == Saved Scenario Record ==
/// A persisted scenario bundle with its storage metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenarioRecord {
    /// Persistence id
    pub id: String,
    /// The stored bundle
    pub bundle: ScenarioBundle,
    /// When the bundle was generated
    pub generated_at: DateTime<Utc>,
    /// Model identifier used for generation
    pub model: String,
    /// Serialization schema version
    pub schema_version: u32,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_class_serde() {
        let json = serde_json::to_string(&ProbabilityClass::Medium).unwrap();
        assert_eq!(json, r#""medium""#);
        let back: ProbabilityClass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProbabilityClass::Medium);
    }

    #[test]
    fn test_observation_defaults_volatile_fields() {
        let obs: Observation = serde_json::from_str(r#"{"id":"o1"}"#).unwrap();
        assert_eq!(obs.id, "o1");
        assert_eq!(obs.status, "");
        assert_eq!(obs.updated_at, "");
    }

    #[test]
    fn test_bundle_roundtrip() {
        let bundle = ScenarioBundle::fallback();
        let json = serde_json::to_string(&bundle).unwrap();
        let back: ScenarioBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn test_fallback_reads_low_confidence() {
        let bundle = ScenarioBundle::fallback();
        assert_eq!(bundle.scenario_one.probability, ProbabilityClass::Low);
        assert_eq!(bundle.scenario_two.probability, ProbabilityClass::Low);
        assert!(!bundle.summary.is_empty());
    }

    #[test]
    fn test_outcome_constructors() {
        let bundle = ScenarioBundle::fallback();

        let saved = GenerationOutcome::saved(bundle.clone(), "rec-1".to_string());
        assert!(saved.success);
        assert!(saved.error.is_none());
        assert_eq!(saved.persisted_id.as_deref(), Some("rec-1"));

        let unsaved = GenerationOutcome::unsaved(bundle, "save failed".to_string());
        assert!(unsaved.success);
        assert!(unsaved.persisted_id.is_none());
        assert_eq!(unsaved.error.as_deref(), Some("save failed"));

        let failed = GenerationOutcome::failed("quota exhausted".to_string());
        assert!(!failed.success);
        assert!(failed.bundle.is_none());
    }
}
