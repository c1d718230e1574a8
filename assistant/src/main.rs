use std::sync::Arc;

use tracing::info;

use faq_assistant::agents::{DiscoveryEngineClient, RetrieverAgent, VertexGeminiClient};
use faq_assistant::api;
use faq_assistant::config::Config;
use faq_assistant::flow::{AssistantFlow, FlowSettings, FLOW_NAME};
use faq_assistant::metrics::Metrics;
use faq_assistant::prompt::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before anything else; missing values abort startup
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting FAQ email assistant");
    info!(
        project = %config.project_id,
        datastore = %config.datastore_id,
        mode = %config.parse_mode,
        model = %config.model,
        "Configuration loaded"
    );

    // One shared HTTP client for both outbound services
    let http = reqwest::Client::new();

    let search = DiscoveryEngineClient::new(
        http.clone(),
        config.search_endpoint.clone(),
        config.access_token.clone(),
    );
    let generator = VertexGeminiClient::new(
        http,
        config.vertex_endpoint.clone(),
        config.project_id.clone(),
        config.vertex_location.clone(),
        config.access_token.clone(),
    );

    let flow = AssistantFlow::new(
        RetrieverAgent::new(Arc::new(search)),
        Arc::new(generator),
        Arc::new(SystemClock),
        FlowSettings::from(&config),
    );
    let metrics = Metrics::new()?;

    let routes = api::service(flow, metrics);

    let addr = ([0, 0, 0, 0], config.port);
    info!("Serving {} on port {}", FLOW_NAME, addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}
