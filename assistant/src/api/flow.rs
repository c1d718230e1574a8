use tracing::info;
use warp::{Rejection, Reply};

use crate::error::ApiError;
use crate::flow::AssistantFlow;
use crate::metrics::Metrics;
use crate::models::{FlowReply, FlowRequest};

pub async fn handle_run_flow(
    request: FlowRequest,
    flow: AssistantFlow,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    info!("Received inquiry with {} prompt(s)", request.data.user_prompts.len());

    match flow.run(request.data).await {
        Ok(result) => {
            metrics.record_success(&result);
            Ok(warp::reply::json(&FlowReply { result }))
        }
        Err(e) => {
            metrics.record_failure(e.outcome());
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}
