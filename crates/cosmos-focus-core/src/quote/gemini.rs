//! Gemini `generateContent` client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::QuoteSource;
use crate::error::QuoteError;
use crate::storage::QuoteConfig;

pub struct GeminiQuoteSource {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated. Empty if absent.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiQuoteSource {
    /// Build a client from configuration. A missing API key is reported on
    /// the first request, not here.
    pub fn from_config(config: &QuoteConfig) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolved_api_key(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl QuoteSource for GeminiQuoteSource {
    async fn generate(&self, prompt: &str, temperature: f64) -> Result<String, QuoteError> {
        let api_key = self.api_key.as_deref().ok_or(QuoteError::MissingApiKey)?;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": temperature },
        });

        tracing::debug!(model = %self.model, "requesting quote");
        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(QuoteError::Status { status, body });
        }

        let parsed: GenerateResponse = resp.json().await?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{fetch_quote, EMPTY_FALLBACK, ERROR_FALLBACK, QUOTE_PROMPT};
    use mockito::Matcher;

    fn source_for(server: &mockito::ServerGuard, key: Option<&str>) -> GeminiQuoteSource {
        let config = QuoteConfig {
            base_url: server.url(),
            api_key: key.unwrap_or_default().to_string(),
            ..QuoteConfig::default()
        };
        let mut source = GeminiQuoteSource::from_config(&config).unwrap();
        source.api_key = key.map(str::to_string);
        source
    }

    #[tokio::test]
    async fn posts_prompt_and_reads_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": QUOTE_PROMPT }] }],
                "generationConfig": { "temperature": 0.7 },
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"  Even comets "},{"text":"keep their course. "}]}}]}"#,
            )
            .create_async()
            .await;

        let source = source_for(&server, Some("test-key"));
        let quote = fetch_quote(&source, 0.7).await;
        assert_eq!(quote, "Even comets keep their course.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_candidates_is_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let source = source_for(&server, Some("k"));
        assert_eq!(source.generate(QUOTE_PROMPT, 0.7).await.unwrap(), "");
        assert_eq!(fetch_quote(&source, 0.7).await, EMPTY_FALLBACK);
    }

    #[tokio::test]
    async fn http_error_maps_to_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let source = source_for(&server, Some("k"));
        let err = source.generate(QUOTE_PROMPT, 0.7).await.unwrap_err();
        assert!(matches!(err, QuoteError::Status { status: 503, ref body } if body == "overloaded"));
        assert_eq!(fetch_quote(&source, 0.7).await, ERROR_FALLBACK);
    }

    #[tokio::test]
    async fn missing_key_never_hits_the_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let source = source_for(&server, None);
        assert!(matches!(
            source.generate(QUOTE_PROMPT, 0.7).await,
            Err(QuoteError::MissingApiKey)
        ));
        mock.assert_async().await;
    }
}
