//! Gemini generator adapter.
//!
//! Calls the Gemini `generateContent` REST endpoint: once with a JSON
//! response schema for the plan, and once per prompt for images.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tracing::debug;

use hero_db::models::{ImageRef, Profile};
use hero_db::plan::Plan;

use super::trait_def::Generator;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::plan::{SYSTEM_INSTRUCTION, build_plan_prompt, parse_plan_response, plan_response_schema};

/// Connection settings for [`GeminiAdapter`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub plan_model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_PLAN_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default endpoint and models with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            plan_model: Self::DEFAULT_PLAN_MODEL.to_string(),
            image_model: Self::DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// URL of `generateContent` for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("plan_model", &self.plan_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`Generator`] backed by Google's Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiAdapter {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.config.endpoint(model);
        debug!(%url, "calling generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .with_context(|| format!("request to {model} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{model} returned HTTP {status}: {body:.300}");
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .with_context(|| format!("failed to decode {model} response"))
    }
}

/// Request for a plan: system instruction, profile prompt, JSON schema.
pub fn plan_request(profile: &Profile) -> GenerateContentRequest {
    let mut request = GenerateContentRequest::from_text(build_plan_prompt(profile));
    request.system_instruction = Some(Content {
        role: None,
        parts: vec![Part::text(SYSTEM_INSTRUCTION)],
    });
    request.generation_config = Some(GenerationConfig {
        response_mime_type: Some("application/json".to_string()),
        response_schema: Some(plan_response_schema()),
    });
    request
}

/// Request for one image from a scene prompt.
pub fn image_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest::from_text(prompt)
}

/// Turn a plan response into a validated plan.
pub fn plan_from_response(response: &GenerateContentResponse) -> Result<Plan> {
    let text = response.text().unwrap_or_default();
    Ok(parse_plan_response(&text)?)
}

/// Extract the first inline image of a response.
pub fn image_from_response(response: &GenerateContentResponse) -> Option<ImageRef> {
    response
        .first_inline_data()
        .map(|d| ImageRef::from_inline(&d.mime_type, &d.data))
}

#[async_trait]
impl Generator for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_plan(&self, profile: &Profile) -> Result<Plan> {
        let response = self
            .generate_content(&self.config.plan_model, &plan_request(profile))
            .await?;
        plan_from_response(&response).context("generated plan was rejected")
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageRef>> {
        let response = self
            .generate_content(&self.config.image_model, &image_request(prompt))
            .await?;
        Ok(image_from_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_db::models::EducationLevel;

    fn profile() -> Profile {
        Profile::new("Sara", 9, EducationLevel::Primary, ["English"]).unwrap()
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let mut cfg = GeminiConfig::new("k");
        assert_eq!(
            cfg.endpoint("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        cfg.base_url = "http://localhost:9999/".to_string();
        assert_eq!(
            cfg.endpoint("m"),
            "http://localhost:9999/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = GeminiConfig::new("super-secret");
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn plan_request_carries_schema_and_instruction() {
        let value = serde_json::to_value(plan_request(&profile())).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
        let instruction = value["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.contains("educator"));
        let prompt = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Sara"));
    }

    #[test]
    fn image_request_is_plain_text() {
        let value = serde_json::to_value(image_request("a lantern")).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "a lantern");
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn plan_from_empty_response_is_an_error() {
        let resp = GenerateContentResponse::default();
        assert!(plan_from_response(&resp).is_err());
    }

    #[test]
    fn image_from_response_builds_data_url() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/jpeg","data":"/9j/4AAQ"}}]}}]}"#,
        )
        .unwrap();
        let img = image_from_response(&resp).unwrap();
        assert_eq!(img.as_str(), "data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(img.mime_type(), "image/jpeg");
    }

    #[test]
    fn image_from_text_only_response_is_none() {
        let resp: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#,
        )
        .unwrap();
        assert!(image_from_response(&resp).is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let mut cfg = GeminiConfig::new("k");
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        cfg.base_url = "http://127.0.0.1:9".to_string();
        cfg.timeout = Duration::from_secs(2);
        let adapter = GeminiAdapter::new(cfg).unwrap();
        assert!(adapter.generate_plan(&profile()).await.is_err());
        assert!(adapter.generate_image("x").await.is_err());
    }
}
