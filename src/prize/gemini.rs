//! Gemini-backed prize generation
//!
//! Two requests per prize: a text model invents the item (name, description
//! and an image prompt, as JSON), then an image model renders it.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{PrizeError, PrizeSource};
use crate::sim::Prize;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

const CONCEPT_PROMPT: &str = "Create a unique, magical Hanukkah-themed item for a game reward. \
It should be one of: Neon Dreidel, Glowing Menorah, Golden Sufganiyot, Ancient Oil Jug, \
Magical Flashlight, or Cyberpunk Gelt. Provide a cool fantasy name, a 1-sentence magical \
description, and a detailed visual prompt for an image generator. Return JSON.";

const IMAGE_STYLE_SUFFIX: &str = ", 3d render, isometric, magical glow, high quality, dark background";

/// Where and how to reach the generative service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// None disables prize generation
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub text_model: String,
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Read the key baked in at build time (`API_KEY`)
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self {
            api_key: option_env!("API_KEY").map(str::to_string),
            ..Self::default()
        }
    }

    /// Read `API_KEY` from the environment, falling back to the build-time value
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let api_key = std::env::var("API_KEY")
            .ok()
            .or_else(|| option_env!("API_KEY").map(str::to_string));
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// Step one output: what the item is and how to draw it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrizeConcept {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    visual_prompt: String,
}

fn text_request(prompt: &str, generation_config: Option<serde_json::Value>) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt.to_string()),
                inline_data: None,
            }],
        }],
        generation_config,
    }
}

fn concept_request() -> GenerateRequest {
    text_request(
        CONCEPT_PROMPT,
        Some(json!({
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "visualPrompt": { "type": "STRING" }
                },
                "required": ["name", "description", "visualPrompt"]
            }
        })),
    )
}

fn image_request(visual_prompt: &str) -> GenerateRequest {
    text_request(
        &format!("{}{}", visual_prompt, IMAGE_STYLE_SUFFIX),
        Some(json!({
            "imageConfig": { "aspectRatio": "1:1" }
        })),
    )
}

fn parse_concept(response: &GenerateResponse) -> Result<PrizeConcept, PrizeError> {
    let text = response.text();
    let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
    let concept: PrizeConcept = serde_json::from_str(text)?;
    if concept.visual_prompt.trim().is_empty() {
        return Err(PrizeError::MissingField("visualPrompt"));
    }
    Ok(concept)
}

/// First inline image of the response as a `data:` URI
fn extract_image(response: &GenerateResponse) -> Result<String, PrizeError> {
    response
        .parts()
        .iter()
        .find_map(|p| p.inline_data.as_ref())
        .filter(|d| !d.data.is_empty())
        .map(|d| format!("data:image/png;base64,{}", d.data))
        .ok_or(PrizeError::MissingImage)
}

/// Prize source calling the Gemini REST API
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        if config.api_key().is_none() {
            log::warn!("API_KEY is not set. Prize generation will fall back.");
        }
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, PrizeError> {
        let response = self
            .client
            .post(self.config.model_url(model))
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Run both steps, surfacing the first failure
    pub async fn try_generate(&self) -> Result<Prize, PrizeError> {
        let api_key = self.config.api_key().ok_or(PrizeError::MissingApiKey)?;

        let concept_response = self
            .generate(api_key, &self.config.text_model, &concept_request())
            .await?;
        let concept = parse_concept(&concept_response)?;
        log::info!("Prize concept: {}", concept.name);

        let image_response = self
            .generate(
                api_key,
                &self.config.image_model,
                &image_request(&concept.visual_prompt),
            )
            .await?;
        let image = extract_image(&image_response)?;

        Ok(Prize {
            name: concept.name,
            description: concept.description,
            image,
        })
    }
}

impl PrizeSource for GeminiClient {
    async fn generate_prize(&self) -> Option<Prize> {
        match self.try_generate().await {
            Ok(prize) => Some(prize),
            Err(PrizeError::MissingApiKey) => {
                log::warn!("API_KEY is not set. Skipping prize generation.");
                None
            }
            Err(e) => {
                log::error!("Failed to generate prize: {}", e);
                None
            }
        }
    }
}
