use warp::{Rejection, Reply};

use crate::error::ApiError;
use crate::metrics::Metrics;

pub fn handle_health() -> impl Reply {
    warp::reply::json(&serde_json::json!({"status": "healthy"}))
}

pub async fn handle_metrics(metrics: Metrics) -> Result<impl Reply, Rejection> {
    match metrics.render() {
        Ok((buffer, content_type)) => Ok(warp::reply::with_header(
            buffer,
            "Content-Type",
            content_type,
        )),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            Err(warp::reject::custom(ApiError::Internal(format!(
                "metrics encoding failed: {e}"
            ))))
        }
    }
}
