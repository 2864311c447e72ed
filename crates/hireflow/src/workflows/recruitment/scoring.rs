use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{FactSheet, JobProfile};

/// Externally computed 0–100 suitability number plus its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessScore {
    pub score: f64,
    pub reason: String,
}

/// Failure raised by a scoring strategy before its fallback kicks in.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("model artifact unavailable: {0}")]
    Artifact(String),
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("scoring transport unavailable: {0}")]
    Transport(String),
}

/// Strategy interface for fitness scoring. Implementations must clamp their
/// output to [0, 100]; callers treat a failure as "no score available".
pub trait ScoreProvider: Send + Sync {
    fn score(&self, facts: &FactSheet, job: &JobProfile) -> Result<FitnessScore, ScoreError>;
}

/// Black-box learned model: feature vector in, raw score out.
pub trait ScoreModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ScoreError>;
}

/// Black-box generative assessor consuming a prose summary of the facts.
pub trait GenerativeClient: Send + Sync {
    fn assess(&self, facts: &FactSheet, job: &JobProfile) -> Result<FitnessScore, ScoreError>;
}

pub(crate) fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Weighted heuristic recovered from the production fallback path:
/// experience 30, education 25, skills 25, projects 20, normalized to 0–100.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    const EXPERIENCE_WEIGHT: f64 = 30.0;
    const EDUCATION_WEIGHT: f64 = 25.0;
    const SKILLS_WEIGHT: f64 = 25.0;
    const PROJECTS_WEIGHT: f64 = 20.0;

    fn education_points(education: Option<&str>) -> f64 {
        match education {
            Some("PhD") => Self::EDUCATION_WEIGHT,
            Some("M.Tech") | Some("MBA") => Self::EDUCATION_WEIGHT * 0.8,
            Some("B.Tech") | Some("B.Sc") => Self::EDUCATION_WEIGHT * 0.6,
            _ => 0.0,
        }
    }
}

impl ScoreProvider for HeuristicScorer {
    fn score(&self, facts: &FactSheet, _job: &JobProfile) -> Result<FitnessScore, ScoreError> {
        let experience = (facts.experience_years as f64 * 3.0).min(Self::EXPERIENCE_WEIGHT);
        let education = Self::education_points(facts.education.as_deref());
        let skills = (facts.skills.len() as f64 * 3.0).min(Self::SKILLS_WEIGHT);
        let projects = (facts.projects_count as f64 * 2.0).min(Self::PROJECTS_WEIGHT);

        let total_weight = Self::EXPERIENCE_WEIGHT
            + Self::EDUCATION_WEIGHT
            + Self::SKILLS_WEIGHT
            + Self::PROJECTS_WEIGHT;
        let score = (experience + education + skills + projects) / total_weight * 100.0;

        Ok(FitnessScore {
            score: clamp_score(score),
            reason: "Score computed with the heuristic fallback.".to_string(),
        })
    }
}

/// Learned-model scorer with an always-available heuristic fallback.
///
/// Construction never fails: a missing artifact produces a provider that
/// answers every request with the fallback instead of crashing the process.
pub struct ModelScorer {
    model: Option<Box<dyn ScoreModel>>,
    fallback: HeuristicScorer,
}

impl ModelScorer {
    pub fn new(model: Box<dyn ScoreModel>) -> Self {
        Self {
            model: Some(model),
            fallback: HeuristicScorer,
        }
    }

    /// Build from a loader result, degrading to fallback-only on failure.
    pub fn from_artifact(loaded: Result<Box<dyn ScoreModel>, ScoreError>) -> Self {
        match loaded {
            Ok(model) => Self::new(model),
            Err(error) => {
                warn!(%error, "score model unavailable, falling back to heuristic scoring");
                Self {
                    model: None,
                    fallback: HeuristicScorer,
                }
            }
        }
    }

    fn feature_vector(facts: &FactSheet) -> Vec<f64> {
        vec![
            facts.experience_years as f64,
            facts.projects_count as f64,
            facts.skills.len() as f64,
            facts.certifications.len() as f64,
        ]
    }
}

impl ScoreProvider for ModelScorer {
    fn score(&self, facts: &FactSheet, job: &JobProfile) -> Result<FitnessScore, ScoreError> {
        let Some(model) = &self.model else {
            return self.fallback.score(facts, job);
        };

        match model.predict(&Self::feature_vector(facts)) {
            Ok(raw) => Ok(FitnessScore {
                score: clamp_score(raw),
                reason: "Score computed by the learned model.".to_string(),
            }),
            Err(error) => {
                warn!(%error, "model prediction failed, using heuristic fallback");
                self.fallback.score(facts, job)
            }
        }
    }
}

/// Generative-service scorer with the same heuristic fallback contract.
pub struct GenerativeScorer {
    client: Box<dyn GenerativeClient>,
    fallback: HeuristicScorer,
}

impl GenerativeScorer {
    pub fn new(client: Box<dyn GenerativeClient>) -> Self {
        Self {
            client,
            fallback: HeuristicScorer,
        }
    }
}

impl ScoreProvider for GenerativeScorer {
    fn score(&self, facts: &FactSheet, job: &JobProfile) -> Result<FitnessScore, ScoreError> {
        match self.client.assess(facts, job) {
            Ok(assessment) => Ok(FitnessScore {
                score: clamp_score(assessment.score),
                reason: assessment.reason,
            }),
            Err(error) => {
                warn!(%error, "generative scoring failed, using heuristic fallback");
                self.fallback.score(facts, job)
            }
        }
    }
}
