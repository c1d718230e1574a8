use warp::{Filter, Rejection, Reply};

use crate::error::handle_rejection;
use crate::flow::{AssistantFlow, FLOW_NAME};
use crate::metrics::Metrics;
use crate::middleware;

mod flow;
mod health;

const MAX_FLOW_BODY_BYTES: u64 = 1024 * 1024;

pub fn routes(
    flow: AssistantFlow,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path(FLOW_NAME)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FLOW_BODY_BYTES))
        .and(warp::body::json())
        .and(with_flow(flow))
        .and(with_metrics(metrics))
        .and_then(flow::handle_run_flow)
}

pub fn service(
    flow: AssistantFlow,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::get())
        .map(health::handle_health);

    let metrics_route = warp::path("metrics")
        .and(warp::get())
        .and(with_metrics(metrics.clone()))
        .and_then(health::handle_metrics);

    health
        .or(metrics_route)
        .or(routes(flow, metrics))
        .recover(handle_rejection)
        .with(warp::log("api"))
        .with(middleware::cors())
}

fn with_flow(
    flow: AssistantFlow,
) -> impl Filter<Extract = (AssistantFlow,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || flow.clone())
}

fn with_metrics(
    metrics: Metrics,
) -> impl Filter<Extract = (Metrics,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || metrics.clone())
}
