//! Gemini scoring client.
//!
//! Sends the aligned timeline and the rubric to the Gemini API and parses
//! the verdict. Depending on configuration the scorer asks for a structured
//! JSON score report or a free-text coaching report. Failures here are
//! always recoverable — the pipeline embeds them in the result instead of
//! failing the job.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use podium_models::{Assessment, AlignedEntry, Criterion, ScoreReport};

pub type ScorerResult<T> = Result<T, ScorerError>;

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("No analysis data to score")]
    NoData,

    #[error("Scoring request failed: {0}")]
    Request(String),

    #[error("Malformed scoring response: {0}")]
    Malformed(String),
}

/// Models tried in order until one answers.
const SCORING_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
];

/// Serialized timeline is truncated to this many bytes before prompting.
const DATA_BYTE_BUDGET: usize = 15_000;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Scorer configuration.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub api_key: String,
    /// Ask for the structured JSON score report instead of free text
    pub structured: bool,
    pub base_url: String,
}

impl ScorerConfig {
    /// Read scorer configuration from the environment.
    ///
    /// Returns None when no API key is set — scoring is then disabled and
    /// the pipeline substitutes a fixed explanatory message.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())?;
        let structured = std::env::var("SCORER_FORMAT")
            .map(|v| v.to_lowercase() != "text")
            .unwrap_or(true);
        Some(Self {
            api_key,
            structured,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini API client.
pub struct GeminiScorer {
    config: ScorerConfig,
    client: Client,
}

impl GeminiScorer {
    /// Create a scorer with explicit configuration.
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create a scorer from environment configuration, if any.
    pub fn from_env() -> Option<Self> {
        ScorerConfig::from_env().map(Self::new)
    }

    /// Score the aligned timeline against the rubric.
    pub async fn score(
        &self,
        aligned: &[AlignedEntry],
        criteria: &[Criterion],
    ) -> ScorerResult<Assessment> {
        if aligned.is_empty() {
            return Err(ScorerError::NoData);
        }

        let prompt = self.build_prompt(criteria, aligned)?;

        let mut last_error = None;
        for model in SCORING_MODELS {
            info!("Attempting Gemini scoring with model: {}", model);
            match self.call_model(model, &prompt).await {
                Ok(assessment) => {
                    info!("Scored with {}", model);
                    return Ok(assessment);
                }
                Err(e) => {
                    warn!("Scoring failed with model {}: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScorerError::Request("All scoring models failed".into())))
    }

    /// Build the scoring prompt.
    fn build_prompt(&self, criteria: &[Criterion], aligned: &[AlignedEntry]) -> ScorerResult<String> {
        let mut criteria_lines = String::new();
        let mut total = 0.0;
        for criterion in criteria {
            criteria_lines.push_str(&format!(
                "- **{}** (weight: {} points): {}\n",
                criterion.name, criterion.score, criterion.description
            ));
            total += criterion.score;
        }

        let mut data = serde_json::to_string(aligned)
            .map_err(|e| ScorerError::Malformed(format!("Timeline serialization: {e}")))?;
        truncate_at_char_boundary(&mut data, DATA_BYTE_BUDGET);

        let format_block = if self.config.structured {
            r#"[Required response format (JSON)]
{
    "reviews": [
        {
            "name": "criterion name, exactly as listed above",
            "score": 0,
            "feedback": "specific feedback for this criterion (2-3 sentences)"
        }
    ],
    "overall_summary": "overall verdict and what to improve (about 3 sentences)",
    "video_summary": "one or two sentences summarizing what the talk was about"
}

Respond ONLY with a single JSON object in this format. No other text."#
        } else {
            "Write a concise coaching report in markdown, one short section per criterion."
        };

        Ok(format!(
            r#"You are a professional presentation coaching AI.
You are given the transcript of a presentation, with the averaged gaze/expression
signals and the vocal prosody measured while each sentence was spoken.
Evaluate the data against the scoring criteria below.

[Scoring criteria]
{criteria_lines}(maximum total: {total} points)

[Data field reference]
- text: recognized transcript for the sentence
- speech_rate_cps: speaking speed, characters per second (3.0-4.5 is appropriate)
- vision_avg: averaged gaze/expression over the sentence window
    - gaze_h: 0 is straight ahead (+: left, -: right)
    - gaze_v: 0 is straight ahead (+: up, -: down)
    - smile: smile score (0.25 or more is meaningful)
    - frown: frown score (0.25 or more is meaningful)
    - error: "no face detected in window" means the speaker left the camera view
- prosody: vocal stability
    - jitter (%): pitch instability (below 1.0 steady, above 2.0 unstable)
    - shimmer (%): roughness (below 3.0 steady, above 5.0 rough)

{format_block}

[Data]
{data}
"#
        ))
    }

    /// Call one Gemini model and parse its reply.
    async fn call_model(&self, model: &str, prompt: &str) -> ScorerResult<Assessment> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let mime = if self.config.structured {
            "application/json"
        } else {
            "text/plain"
        };

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: mime.to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScorerError::Request(format!("Gemini API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScorerError::Request(format!(
                "Gemini API returned {status}: {error_text}"
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ScorerError::Malformed(format!("Response decode: {e}")))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ScorerError::Malformed("No content in Gemini response".into()))?;

        if self.config.structured {
            let report: ScoreReport = serde_json::from_str(strip_code_fences(text))
                .map_err(|e| ScorerError::Malformed(format!("Score report parse: {e}")))?;
            Ok(Assessment::Scored(report))
        } else {
            Ok(Assessment::feedback(text.trim()))
        }
    }
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Truncate a string to at most `max` bytes without splitting a character.
fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
