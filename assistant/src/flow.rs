use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::agents::{GenerateRequest, Generator, ParseMode, RetrieverAgent};
use crate::config::Config;
use crate::error::FlowError;
use crate::models::{AssistantResponse, FlowInput};
use crate::prompt::{self, Clock};
use crate::response;

pub const FLOW_NAME: &str = "faqAssistantFlow";

#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub project_id: String,
    pub collection_id: String,
    pub datastore_id: String,
    pub parse_mode: ParseMode,
    pub model: String,
}

impl From<&Config> for FlowSettings {
    fn from(config: &Config) -> Self {
        Self {
            project_id: config.project_id.clone(),
            collection_id: config.collection_id.clone(),
            datastore_id: config.datastore_id.clone(),
            parse_mode: config.parse_mode,
            model: config.model.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AssistantFlow {
    retriever: RetrieverAgent,
    generator: Arc<dyn Generator>,
    clock: Arc<dyn Clock>,
    settings: FlowSettings,
}

impl AssistantFlow {
    pub fn new(
        retriever: RetrieverAgent,
        generator: Arc<dyn Generator>,
        clock: Arc<dyn Clock>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            retriever,
            generator,
            clock,
            settings,
        }
    }

    pub async fn run(&self, input: FlowInput) -> Result<AssistantResponse, FlowError> {
        let request_id = Uuid::new_v4();
        let FlowInput { user_prompts } = input;
        info!(%request_id, prompts = user_prompts.len(), "Running {}", FLOW_NAME);

        let passages = self
            .retriever
            .retrieve(
                &user_prompts.join("\n"),
                &self.settings.project_id,
                &self.settings.collection_id,
                &self.settings.datastore_id,
                self.settings.parse_mode,
            )
            .await
            .map_err(|e| {
                error!(%request_id, "Retrieval failed: {}", e);
                e
            })?;
        info!(%request_id, passages = passages.len(), "Retrieved reference passages");

        let request = GenerateRequest {
            model: self.settings.model.clone(),
            system: prompt::system_prompt(self.clock.as_ref()),
            messages: prompt::assemble_messages(&user_prompts, &passages),
            temperature: 0.0,
            output_schema: prompt::completion_schema(),
        };

        let generation = self.generator.generate(request).await.map_err(|e| {
            error!(%request_id, "Generation failed: {}", e);
            e
        })?;

        let response = response::map_response(
            generation.completion,
            &passages,
            &self.settings.model,
            generation.usage,
        )
        .map_err(|e| {
            error!(%request_id, "{}", e);
            e
        })?;

        info!(
            %request_id,
            can_answer = response.completion.can_answer,
            total_tokens = response.usage.total_tokens,
            "Flow completed"
        );
        Ok(response)
    }
}
