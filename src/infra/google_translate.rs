use serde_json::Value;
use tracing::{debug, error};

use crate::app::ports::Translator;
use crate::constants::{TRANSLATE_API_KEY_VAR, TRANSLATE_ENDPOINT, TRANSLATE_SOURCE_LANGUAGE};
use crate::error::Result;
use crate::observability::metrics::{emit_counter, MetricName};

/// Google Translate v2 client. One blocking POST per call, no retries.
pub struct GoogleTranslateClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTranslateClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            endpoint: TRANSLATE_ENDPOINT.to_string(),
        }
    }

    /// Read the API key from the environment, loading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let api_key = std::env::var(TRANSLATE_API_KEY_VAR)?;
        Ok(Self::new(api_key))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request(&self, text: &str, target_language: &str) -> Result<(u16, Value)> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("q", text),
                ("source", TRANSLATE_SOURCE_LANGUAGE),
                ("target", target_language),
                ("key", self.api_key.as_str()),
            ])
            .send()?;
        let status = response.status().as_u16();
        let body: Value = response.json()?;
        Ok((status, body))
    }
}

impl Translator for GoogleTranslateClient {
    fn translate(&self, text: &str, target_language: &str) -> Option<String> {
        let translated = match self.request(text, target_language) {
            Ok((200, body)) => {
                let translated = extract_translation(&body);
                if translated.is_none() {
                    error!("Translation response had no translated text: {}", body);
                }
                translated
            }
            Ok((status, body)) => {
                error!("Translation request failed with status {}: {}", status, body);
                None
            }
            Err(e) => {
                error!("Translation request failed: {}", e);
                None
            }
        };

        match &translated {
            Some(t) => {
                debug!("Translated '{}' to '{}'", text, t);
                emit_counter(MetricName::TranslationRequestsSuccess, 1.0);
            }
            None => emit_counter(MetricName::TranslationRequestsError, 1.0),
        }
        translated
    }
}

/// Pull `data.translations[0].translatedText` out of a v2 response body
pub fn extract_translation(body: &Value) -> Option<String> {
    body.pointer("/data/translations/0/translatedText")
        .and_then(Value::as_str)
        .map(str::to_string)
}
