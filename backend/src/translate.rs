use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// English to Latin lookup used for English term searches.
pub trait Translator {
    fn translate(&self, english: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: MyMemoryResponseData,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

/// Client for the MyMemory translation API.
pub struct MyMemoryTranslator {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl MyMemoryTranslator {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(MyMemoryTranslator {
            client,
            api_url: api_url.to_string(),
        })
    }
}

impl Translator for MyMemoryTranslator {
    fn translate(&self, english: &str) -> Result<String> {
        let response = self.client
            .get(&self.api_url)
            .query(&[("q", english), ("langpair", "en|la")])
            .send()
            .map_err(|e| anyhow!("Failed to reach translation service: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Translation service returned error status: {}", response.status()));
        }

        let body = response
            .text()
            .map_err(|e| anyhow!("Failed to read translation response: {}", e))?;

        parse_translation(&body, english)
    }
}

/// The best translation from a MyMemory response body. An empty translation
/// falls back to the English phrase.
pub fn parse_translation(body: &str, english: &str) -> Result<String> {
    let parsed: MyMemoryResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse translation response: {}", e))?;

    let translated = parsed.response_data.translated_text.unwrap_or_default();
    let translated = translated.trim();

    if translated.is_empty() {
        Ok(english.to_string())
    } else {
        Ok(translated.to_string())
    }
}
