// Generator Agent: structured generation against the hosted language model

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;
use crate::models::{Completion, Message, Role, TokenUsage};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub output_schema: Value,
}

#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub completion: Option<Completion>,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, GenerationError>;
}

// Vertex AI `generateContent` wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

impl From<&Message> for GeminiContent {
    fn from(message: &Message) -> Self {
        GeminiContent {
            role: Some(message.role),
            parts: message
                .content
                .iter()
                .map(|part| GeminiPart {
                    text: Some(part.text.clone()),
                })
                .collect(),
        }
    }
}

impl GeminiResponse {
    fn completion_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
            .filter(|text| !text.trim().is_empty())
    }

    fn into_generation(self) -> Result<Generation, GenerationError> {
        let completion = match self.completion_text() {
            Some(text) => Some(serde_json::from_str::<Completion>(text)?),
            None => None,
        };
        let usage = self.usage_metadata.unwrap_or_default();

        Ok(Generation {
            completion,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            },
        })
    }
}

pub struct VertexGeminiClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    location: String,
    access_token: Option<String>,
}

impl VertexGeminiClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: String,
        project_id: String,
        location: String,
        access_token: Option<String>,
    ) -> Self {
        Self {
            http,
            endpoint,
            project_id,
            location,
            access_token,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.endpoint, self.project_id, self.location, model
        )
    }
}

#[async_trait]
impl Generator for VertexGeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation, GenerationError> {
        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(request.system),
                }],
            },
            contents: request.messages.iter().map(GeminiContent::from).collect(),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                response_mime_type: "application/json",
                response_schema: request.output_schema,
            },
        };

        let mut builder = self.http.post(self.model_url(&request.model)).json(&body);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        resp.json::<GeminiResponse>().await?.into_generation()
    }
}
