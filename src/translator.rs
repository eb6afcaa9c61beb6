use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Request body for a LibreTranslate-compatible endpoint
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for the external translation service.
///
/// Every call is attempted exactly once; callers decide whether a failure
/// aborts the operation (save hooks) or is swallowed (language probe).
#[derive(Clone)]
pub struct Translator {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl Translator {
    pub fn new(api_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key,
        }
    }

    /// Translate `text` from `source` to `target`, returning the translated text
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to translation service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Translation service error ({}): {}", status, body);
        }

        let translate_response: TranslateResponse = response
            .json()
            .await
            .context("Failed to parse translation service response")?;

        Ok(translate_response.translated_text)
    }
}
