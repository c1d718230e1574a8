use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Search service models

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub document: Option<SearchDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    #[serde(default)]
    pub struct_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub derived_struct_data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip)]
    pub serving_config: String,
    pub query: String,
    pub page_size: u32,
    pub content_search_spec: ContentSearchSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSearchSpec {
    pub extractive_content_spec: ExtractiveContentSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractiveContentSpec {
    pub max_extractive_answer_count: u32,
}

// Extractive answers may lack either sub-field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub reference_id: Option<String>,
    pub content: Option<String>,
}

impl Passage {
    pub fn new(reference_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            reference_id: Some(reference_id.into()),
            content: Some(content.into()),
        }
    }

    pub fn reference_id(&self) -> &str {
        self.reference_id.as_deref().unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

// Language model models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Part>,
}

impl Message {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub can_answer: bool,
    pub reply: String,
    pub reason: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

// API Request/Response models

#[derive(Debug, Deserialize)]
pub struct FlowRequest {
    pub data: FlowInput,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowInput {
    pub user_prompts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FlowReply {
    pub result: AssistantResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantResponse {
    pub completion: Completion,
    pub citations: Vec<String>,
    pub model: String,
    pub usage: Usage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}
