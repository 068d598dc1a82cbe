use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{EnhancementError, TextEnhancer};
use crate::config::EnhancerSettings;

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(settings: &EnhancerSettings, api_key: String) -> Result<Self> {
        let base = url::Url::parse(&settings.base_url).context("Invalid enhancer base URL")?;

        if base.scheme() != "https" {
            anyhow::bail!("Enhancer base URL must use HTTPS (got: {})", base.scheme());
        }

        let client = Client::builder()
            .user_agent(format!("biblio-burkina/{}", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .https_only(true)
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            settings.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    async fn generate(
        &self,
        prompt: String,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, EnhancementError> {
        tracing::debug!("Calling generative-text endpoint: {}", self.endpoint);

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                extract_text(&body)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(EnhancementError::Unavailable(
                format!("access denied ({}), check the API key", response.status()),
            )),
            status => Err(EnhancementError::Unavailable(format!(
                "service returned unexpected status: {}",
                status
            ))),
        }
    }
}

impl TextEnhancer for GeminiClient {
    async fn expand_query(&self, query: &str) -> Result<Vec<String>, EnhancementError> {
        let text = self.generate(keyword_prompt(query), None).await?;
        parse_keywords(&text)
    }

    async fn summarize(&self, title: &str, author: &str) -> Result<String, EnhancementError> {
        let config = GenerationConfig {
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        };
        self.generate(summary_prompt(title, author), Some(config)).await
    }
}

fn keyword_prompt(query: &str) -> String {
    format!(
        "The user is searching for \"{}\" in a digital library in Burkina Faso. \
         If the query uses local terms (e.g. dolo, Faso, Mossi), translate or explain them \
         to improve semantic search. \
         Return only a list of 3 relevant search keywords in French, separated by commas.",
        query
    )
}

fn summary_prompt(title: &str, author: &str) -> String {
    format!(
        "Write a short summary (3 sentences) of the book \"{}\" by {}. \
         If it is a fictional Burkinabe book, imagine a summary consistent with local culture.",
        title, author
    )
}

/// Concatenated text parts of the first candidate
fn extract_text(body: &str) -> Result<String, EnhancementError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| EnhancementError::Unavailable(format!("malformed response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(EnhancementError::Unavailable(
            "response contained no text".to_string(),
        ));
    }

    Ok(text)
}

fn parse_keywords(text: &str) -> Result<Vec<String>, EnhancementError> {
    let keywords: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();

    if keywords.is_empty() {
        return Err(EnhancementError::Unavailable(
            "no keywords in response".to_string(),
        ));
    }

    Ok(keywords)
}
