//! Generation Collaborator
//!
//! Trait boundary for the generative-AI backend plus the bundled HTTP
//! implementation. Upstream output is parsed best-effort: any malformed
//! response degrades to a low-confidence fallback bundle instead of an
//! error, so upstream format instability never reaches the user.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, ScenarioError};
use crate::models::{Observation, ScenarioBundle};

// == Generator Trait ==
/// External AI collaborator producing scenario bundles.
#[async_trait]
pub trait ScenarioGenerator: Send + Sync {
    /// Whether the collaborator has the configuration it needs.
    /// Queried before every generation to short-circuit doomed calls.
    fn is_configured(&self) -> bool;

    /// Generates a scenario bundle for the given case and observations.
    /// May take seconds. Errors represent transport or quota problems;
    /// malformed upstream output is not an error (see module docs).
    async fn generate(
        &self,
        entity_id: &str,
        observations: &[Observation],
    ) -> Result<ScenarioBundle>;
}

// == HTTP Implementation ==
/// Generator backed by a generative-AI HTTP endpoint.
pub struct HttpScenarioGenerator {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: String,
}

/// Wire request sent to the AI endpoint.
#[derive(Debug, Serialize)]
struct GenerateApiRequest<'a> {
    model: &'a str,
    prompt: String,
}

/// Wire envelope returned by the AI endpoint; `output` carries the
/// model's raw text.
#[derive(Debug, Deserialize)]
struct GenerateApiResponse {
    output: String,
}

impl HttpScenarioGenerator {
    /// Creates a generator from service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.ai_endpoint.clone(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        }
    }

    /// Builds the analysis prompt for a case and its observations.
    fn build_prompt(&self, entity_id: &str, observations: &[Observation]) -> String {
        let mut prompt = format!(
            "Analyze missing-person case {entity_id} and produce exactly two \
             alternative resolution scenarios as a single JSON object with keys \
             scenario_one, scenario_two, summary, recommendations. Each scenario \
             needs title, narrative, probability (high|medium|low), actions, \
             timeline, key_factors, resources.\n"
        );
        if observations.is_empty() {
            prompt.push_str("No field observations have been recorded yet.\n");
        } else {
            prompt.push_str("Field observations (id, status, last update):\n");
            for obs in observations {
                prompt.push_str(&format!("- {} [{}] {}\n", obs.id, obs.status, obs.updated_at));
            }
        }
        prompt
    }

    /// Calls the upstream endpoint and returns the raw model text.
    async fn call(&self, prompt: String) -> anyhow::Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .context("AI endpoint not configured")?;
        let api_key = self.api_key.as_deref().context("AI API key not configured")?;

        let request = GenerateApiRequest {
            model: &self.model,
            prompt,
        };

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("AI request failed")?
            .error_for_status()
            .context("AI endpoint returned an error status")?;

        let envelope: GenerateApiResponse = response
            .json()
            .await
            .context("AI response envelope was not valid JSON")?;

        Ok(envelope.output)
    }
}

#[async_trait]
impl ScenarioGenerator for HttpScenarioGenerator {
    fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    async fn generate(
        &self,
        entity_id: &str,
        observations: &[Observation],
    ) -> Result<ScenarioBundle> {
        if !self.is_configured() {
            return Err(ScenarioError::NotConfigured(
                "AI endpoint or API key missing".to_string(),
            ));
        }

        let prompt = self.build_prompt(entity_id, observations);
        let text = self
            .call(prompt)
            .await
            .map_err(|err| ScenarioError::GenerationFailed(format!("{err:#}")))?;

        debug!(entity_id, chars = text.len(), "AI response received");
        Ok(parse_bundle(&text))
    }
}

// == Best-Effort Parsing ==
/// Parses model output into a bundle, degrading to the fallback on any
/// parse problem. Never errors.
pub fn parse_bundle(text: &str) -> ScenarioBundle {
    match extract_json(text).and_then(|json| serde_json::from_str::<ScenarioBundle>(json).ok()) {
        Some(bundle) => bundle,
        None => {
            warn!("AI output could not be parsed, using fallback bundle");
            ScenarioBundle::fallback()
        }
    }
}

/// Extracts the outermost JSON object from free-form model text,
/// tolerating code fences and surrounding prose.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
