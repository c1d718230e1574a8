// Retriever Agent: queries the managed search index and normalizes the hits

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::agents::normalizer::{self, ParseMode};
use crate::error::SearchError;
use crate::models::{
    ContentSearchSpec, ExtractiveContentSpec, Passage, SearchRequest, SearchResponse,
};

const LOCATION: &str = "global";
const SERVING_CONFIG_ID: &str = "default_serving_config";
const PAGE_SIZE: u32 = 10;
const MAX_EXTRACTIVE_ANSWER_COUNT: u32 = 5;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

pub fn serving_config_path(
    project_id: &str,
    location: &str,
    collection_id: &str,
    data_store_id: &str,
    serving_config_id: &str,
) -> String {
    format!(
        "projects/{project_id}/locations/{location}/collections/{collection_id}/dataStores/{data_store_id}/servingConfigs/{serving_config_id}"
    )
}

// Discovery Engine REST client; one page per call, nextPageToken is never followed
pub struct DiscoveryEngineClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl DiscoveryEngineClient {
    pub fn new(http: reqwest::Client, endpoint: String, access_token: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            access_token,
        }
    }
}

#[async_trait]
impl SearchBackend for DiscoveryEngineClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/v1/{}:search", self.endpoint, request.serving_config);

        let mut builder = self.http.post(url).json(request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        Ok(resp.json::<SearchResponse>().await?)
    }
}

#[derive(Clone)]
pub struct RetrieverAgent {
    backend: Arc<dyn SearchBackend>,
}

impl RetrieverAgent {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        project_id: &str,
        collection_id: &str,
        data_store_id: &str,
        mode: ParseMode,
    ) -> Result<Vec<Passage>, SearchError> {
        let request = SearchRequest {
            serving_config: serving_config_path(
                project_id,
                LOCATION,
                collection_id,
                data_store_id,
                SERVING_CONFIG_ID,
            ),
            query: query.to_string(),
            page_size: PAGE_SIZE,
            content_search_spec: ContentSearchSpec {
                extractive_content_spec: ExtractiveContentSpec {
                    max_extractive_answer_count: MAX_EXTRACTIVE_ANSWER_COUNT,
                },
            },
        };

        let response = self.backend.search(&request).await?;
        let results = response.results.unwrap_or_default();
        debug!(
            serving_config = %request.serving_config,
            results = results.len(),
            mode = %mode,
            "search completed"
        );

        Ok(normalizer::normalize(&results, mode))
    }
}
