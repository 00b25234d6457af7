//! Rubric criteria and AI assessment payloads.
//!
//! The rubric is an ordered list of weighted criteria; the assessment is
//! whatever came back from the scoring step — a structured score report when
//! the scorer ran in JSON mode, a plain feedback message when scoring was
//! skipped or ran in free-text mode, or an embedded error when the scoring
//! call failed. Scoring failures never fail the job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One scoring criterion: a name, its weight in points, and what the grader
/// should look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Criterion {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Maximum points awarded for this criterion
    #[validate(range(min = 0.0, max = 1000.0))]
    pub score: f64,
    #[validate(length(max = 2000))]
    pub description: String,
}

/// Built-in rubric used when the caller supplies no criteria.
pub fn default_criteria() -> Vec<Criterion> {
    vec![
        Criterion {
            name: "Eye contact".into(),
            score: 25.0,
            description: "Rates the share of forward-facing gaze, where gaze_h and gaze_v \
                          stay within -0.1 to 0.1."
                .into(),
        },
        Criterion {
            name: "Facial expression".into(),
            score: 25.0,
            description: "Rates positive versus negative expression from the smile and frown \
                          signals."
                .into(),
        },
        Criterion {
            name: "Delivery and vocal stability".into(),
            score: 50.0,
            description: "Rates voice steadiness from the prosody jitter and shimmer values."
                .into(),
        },
    ]
}

/// Per-criterion verdict from the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Review {
    /// Criterion name, echoed back from the rubric
    pub name: String,
    /// Awarded points
    pub score: f64,
    /// Two-to-three sentences of concrete feedback
    pub feedback: String,
}

/// Structured scoring result (JSON-mode scorer output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    pub reviews: Vec<Review>,
    pub overall_summary: String,
    pub video_summary: String,
}

/// Outcome of the scoring step, embedded in the final report.
///
/// Serialized untagged: a structured report keeps its own shape, the
/// feedback and error variants collapse to `{"ai_feedback": ...}` /
/// `{"error": ...}` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Assessment {
    Scored(ScoreReport),
    Feedback { ai_feedback: String },
    Error { error: String },
}

impl Assessment {
    pub fn feedback(message: impl Into<String>) -> Self {
        Self::Feedback {
            ai_feedback: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_weights_sum_to_100() {
        let total: f64 = default_criteria().iter().map(|c| c.score).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_criterion_validation_rejects_empty_name() {
        let criterion = Criterion {
            name: String::new(),
            score: 10.0,
            description: "anything".into(),
        };
        assert!(criterion.validate().is_err());
    }

    #[test]
    fn test_assessment_untagged_shapes() {
        let feedback = Assessment::feedback("scoring disabled");
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["ai_feedback"], "scoring disabled");

        let error = Assessment::error("parse failure");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error"], "parse failure");

        let scored: Assessment = serde_json::from_str(
            r#"{"reviews":[{"name":"Eye contact","score":20.0,"feedback":"ok"}],
                "overall_summary":"good","video_summary":"a talk"}"#,
        )
        .unwrap();
        assert!(matches!(scored, Assessment::Scored(_)));
    }
}
