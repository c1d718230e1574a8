use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::agents::normalizer::ParseMode;

const DEFAULT_COLLECTION_ID: &str = "default_collection";
const DEFAULT_SEARCH_ENDPOINT: &str = "https://discoveryengine.googleapis.com";
const DEFAULT_VERTEX_LOCATION: &str = "us-central1";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("required environment variable `{0}` is missing or empty")]
    Missing(&'static str),
    #[error("invalid value for `{key}`: `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    port: u16,
    log_level: String,
    gcloud_project_id: Option<String>,
    datastore_id: Option<String>,
    collection_id: String,
    parse_mode: String,
    search_endpoint: String,
    vertex_location: String,
    vertex_endpoint: Option<String>,
    model: String,
    gcloud_access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub project_id: String,
    pub datastore_id: String,
    pub collection_id: String,
    pub parse_mode: ParseMode,
    pub search_endpoint: String,
    pub vertex_location: String,
    pub vertex_endpoint: String,
    pub model: String,
    pub access_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::default())
    }

    pub fn load(environment: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .set_default("port", 3400)?
            .set_default("log_level", "info")?
            .set_default("collection_id", DEFAULT_COLLECTION_ID)?
            .set_default("parse_mode", "structData")?
            .set_default("search_endpoint", DEFAULT_SEARCH_ENDPOINT)?
            .set_default("vertex_location", DEFAULT_VERTEX_LOCATION)?
            .set_default("model", DEFAULT_MODEL)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        let project_id = required(raw.gcloud_project_id, "GCLOUD_PROJECT_ID")?;
        let datastore_id = required(raw.datastore_id, "DATASTORE_ID")?;
        let parse_mode = ParseMode::from_str(&raw.parse_mode).map_err(|_| ConfigError::Invalid {
            key: "PARSE_MODE",
            value: raw.parse_mode.clone(),
        })?;

        let vertex_endpoint = non_empty(raw.vertex_endpoint)
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", raw.vertex_location));

        Ok(Config {
            port: raw.port,
            log_level: raw.log_level,
            project_id,
            datastore_id,
            collection_id: raw.collection_id,
            parse_mode,
            search_endpoint: raw.search_endpoint.trim_end_matches('/').to_string(),
            vertex_location: raw.vertex_location,
            vertex_endpoint: vertex_endpoint.trim_end_matches('/').to_string(),
            model: raw.model,
            access_token: non_empty(raw.gcloud_access_token),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::Missing(key))
}
