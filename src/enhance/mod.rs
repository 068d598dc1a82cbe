// Text enhancement through a generative-text service
//
// Two best-effort helpers sit on top of the `TextEnhancer` trait: keyword
// expansion for search and short book summaries. Neither ever fails; when the
// service is unreachable they fall back to a fixed value.

mod gemini;

pub use gemini::GeminiClient;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Book, Catalog};
use crate::config::EnhancerSettings;

/// Shown when no summary could be generated
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable at the moment.";

/// The service could not produce a usable answer
#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("text enhancement unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for EnhancementError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnhancementError::Unavailable("request timed out".to_string())
        } else {
            EnhancementError::Unavailable(err.to_string())
        }
    }
}

/// A generative-text collaborator
#[allow(async_fn_in_trait)]
pub trait TextEnhancer {
    /// Ordered search keywords for a free-text query
    async fn expand_query(&self, query: &str) -> Result<Vec<String>, EnhancementError>;

    /// Short prose summary of a work
    async fn summarize(&self, title: &str, author: &str) -> Result<String, EnhancementError>;
}

/// Used when no API key is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineEnhancer;

impl TextEnhancer for OfflineEnhancer {
    async fn expand_query(&self, _query: &str) -> Result<Vec<String>, EnhancementError> {
        Err(EnhancementError::Unavailable("no API key configured".to_string()))
    }

    async fn summarize(&self, _title: &str, _author: &str) -> Result<String, EnhancementError> {
        Err(EnhancementError::Unavailable("no API key configured".to_string()))
    }
}

/// Either a live client or the offline fallback, picked from settings
pub enum Enhancer {
    Gemini(GeminiClient),
    Offline(OfflineEnhancer),
}

impl Enhancer {
    pub fn from_settings(settings: &EnhancerSettings) -> Self {
        let Some(api_key) = settings.resolve_api_key() else {
            debug!("No generative-text API key, smart features run offline");
            return Enhancer::Offline(OfflineEnhancer);
        };

        match GeminiClient::new(settings, api_key) {
            Ok(client) => Enhancer::Gemini(client),
            Err(e) => {
                warn!("Could not create generative-text client: {}", e);
                Enhancer::Offline(OfflineEnhancer)
            }
        }
    }
}

impl TextEnhancer for Enhancer {
    async fn expand_query(&self, query: &str) -> Result<Vec<String>, EnhancementError> {
        match self {
            Enhancer::Gemini(client) => client.expand_query(query).await,
            Enhancer::Offline(offline) => offline.expand_query(query).await,
        }
    }

    async fn summarize(&self, title: &str, author: &str) -> Result<String, EnhancementError> {
        match self {
            Enhancer::Gemini(client) => client.summarize(title, author).await,
            Enhancer::Offline(offline) => offline.summarize(title, author).await,
        }
    }
}

/// Expand a search query, falling back to the query itself
pub async fn expand_keywords<E: TextEnhancer>(enhancer: &E, query: &str) -> Vec<String> {
    match enhancer.expand_query(query).await {
        Ok(keywords) if !keywords.is_empty() => keywords,
        Ok(_) => {
            warn!("Search enhancement returned no keywords");
            vec![query.to_string()]
        }
        Err(e) => {
            warn!("Search enhancement failed: {}", e);
            vec![query.to_string()]
        }
    }
}

/// Summarize a work, falling back to [`SUMMARY_UNAVAILABLE`]
pub async fn summarize_book<E: TextEnhancer>(enhancer: &E, title: &str, author: &str) -> String {
    match enhancer.summarize(title, author).await {
        Ok(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
        Ok(_) => SUMMARY_UNAVAILABLE.to_string(),
        Err(e) => {
            warn!("Summary generation failed for '{}': {}", title, e);
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

/// Expand the query, then search the catalog with the first keyword
pub async fn smart_search<'a, E: TextEnhancer>(
    enhancer: &E,
    catalog: &'a Catalog,
    query: &str,
) -> (Vec<String>, Vec<&'a Book>) {
    let keywords = expand_keywords(enhancer, query).await;
    let first = keywords.first().map(String::as_str).unwrap_or(query);
    let results = catalog.search(first);
    (keywords, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers from a fixed script
    struct ScriptedEnhancer {
        keywords: Vec<String>,
        summary: String,
    }

    impl TextEnhancer for ScriptedEnhancer {
        async fn expand_query(&self, _query: &str) -> Result<Vec<String>, EnhancementError> {
            Ok(self.keywords.clone())
        }

        async fn summarize(&self, _title: &str, _author: &str) -> Result<String, EnhancementError> {
            Ok(self.summary.clone())
        }
    }

    #[tokio::test]
    async fn failed_expansion_returns_original_query_unchanged() {
        let keywords = expand_keywords(&OfflineEnhancer, "  Dolo & Faso ").await;
        assert_eq!(keywords, vec!["  Dolo & Faso ".to_string()]);
    }

    #[tokio::test]
    async fn empty_expansion_falls_back_to_query() {
        let enhancer = ScriptedEnhancer {
            keywords: vec![],
            summary: String::new(),
        };
        assert_eq!(expand_keywords(&enhancer, "sahel").await, vec!["sahel"]);
    }

    #[tokio::test]
    async fn failed_summary_uses_fixed_text() {
        let summary = summarize_book(&OfflineEnhancer, "Histoire du Burkina Faso", "Roger Bila Kaboré").await;
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn blank_summary_uses_fixed_text() {
        let enhancer = ScriptedEnhancer {
            keywords: vec![],
            summary: "   ".to_string(),
        };
        assert_eq!(summarize_book(&enhancer, "t", "a").await, SUMMARY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn smart_search_uses_first_keyword() {
        let enhancer = ScriptedEnhancer {
            keywords: vec!["agriculture".into(), "sésame".into(), "irrigation".into()],
            summary: String::new(),
        };
        let catalog = Catalog::builtin();

        let (keywords, results) = smart_search(&enhancer, &catalog, "culture du sésame").await;
        assert_eq!(keywords.len(), 3);
        assert_eq!(results.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["2"]);
    }

    #[tokio::test]
    async fn smart_search_offline_searches_the_raw_query() {
        let catalog = Catalog::builtin();
        let (keywords, results) = smart_search(&OfflineEnhancer, &catalog, "Kourouma").await;
        assert_eq!(keywords, vec!["Kourouma"]);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn missing_api_key_selects_offline() {
        let settings = EnhancerSettings {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(Enhancer::from_settings(&settings), Enhancer::Offline(_)));
    }
}
