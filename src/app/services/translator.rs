//! The boundary to the remote text-generation service.
//!
//! One call is one HTTP POST bounded by a timeout: no retries, no streaming. Every failure
//! collapses into a single human-readable message.

use serde::{Deserialize, Serialize};

use crate::app::domain::{Settings, TranslationTicket};

/// Everything a worker needs to run one translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub ticket: TranslationTicket,
    pub source_text: String,
    pub file_name_hint: String,
}

pub trait Translator: Send + Sync {
    /// Translate `source_text`, returning the generated text verbatim.
    fn translate(&self, source_text: &str, file_name_hint: &str) -> Result<String, String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    timeout_secs: u64,
    source_language: String,
    target_language: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            temperature: settings.temperature,
            top_k: settings.top_k,
            top_p: settings.top_p,
            max_output_tokens: settings.max_output_tokens,
            timeout_secs: settings.request_timeout_secs,
            source_language: settings.source_language.clone(),
            target_language: settings.target_language.clone(),
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    pub fn build_prompt(&self, source_text: &str, file_name_hint: &str) -> String {
        format!(
            "Transpile the following {src} code to {dst}:\n\
             File name: {file}\n\n\
             {source}\n\n\
             Please provide only the transpiled {dst} code without any explanations or comments.",
            src = self.source_language,
            dst = self.target_language,
            file = file_name_hint,
            source = source_text,
        )
    }

    fn request_body(&self, prompt: &str) -> Result<String, String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_k: self.top_k,
                top_p: self.top_p,
                max_output_tokens: self.max_output_tokens,
            },
        };
        serde_json::to_string(&body).map_err(|e| format!("Failed to encode request: {}", e))
    }
}

impl Translator for GeminiClient {
    fn translate(&self, source_text: &str, file_name_hint: &str) -> Result<String, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "No API key configured".to_string())?;

        let prompt = self.build_prompt(source_text, file_name_hint);
        let body = self.request_body(&prompt)?;

        tracing::debug!(url = %self.url(), bytes = body.len(), "Sending translation request");
        let response = minreq::post(self.url())
            .with_header("Content-Type", "application/json")
            .with_header("x-goog-api-key", api_key)
            .with_body(body)
            .with_timeout(self.timeout_secs)
            .send()
            .map_err(|e| format!("Failed to reach translation service: {}", e))?;

        let text = response
            .as_str()
            .map_err(|e| format!("Failed to read response: {}", e))?;
        parse_response(response.status_code, &response.reason_phrase, text)
    }
}

/// Turn a raw HTTP response into translated text or a failure message.
pub fn parse_response(status: i32, reason: &str, body: &str) -> Result<String, String> {
    let parsed: Option<GenerateResponse> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let detail = parsed
            .and_then(|r| r.error)
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| reason.to_string());
        return Err(format!("API request failed: {} {}", status, detail).trim_end().to_string());
    }

    let response = parsed.ok_or_else(|| "Failed to parse translation response".to_string())?;
    if let Some(error) = response.error {
        return Err(format!("API request failed: {}", error.message));
    }

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| "Response did not contain any generated text".to_string())
}
