use thiserror::Error;
use warp::http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Search service returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model output does not match the completion schema: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Retrieval(#[from] SearchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("No completion returned from the model.")]
    NoCompletion,
}

impl FlowError {
    pub fn outcome(&self) -> &'static str {
        match self {
            FlowError::Retrieval(_) => "retrieval_error",
            FlowError::Generation(_) => "generation_error",
            FlowError::NoCompletion => "no_completion",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Reject for ApiError {}

impl ApiError {
    fn status_and_summary(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            ApiError::Flow(FlowError::Retrieval(_)) => {
                (StatusCode::BAD_GATEWAY, "Retrieval failed")
            }
            ApiError::Flow(FlowError::Generation(_)) => {
                (StatusCode::BAD_GATEWAY, "Generation failed")
            }
            ApiError::Flow(FlowError::NoCompletion) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "No completion produced")
            }
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_reply(code: StatusCode, message: &str, details: String) -> warp::reply::Response {
    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "details": details,
    }));
    warp::reply::with_status(json, code).into_response()
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(api_err) = err.find::<ApiError>() {
        let (code, message) = api_err.status_and_summary();
        Ok(error_reply(code, message, api_err.to_string()))
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        let api_err = ApiError::BadRequest(body_err.to_string());
        let (code, message) = api_err.status_and_summary();
        Ok(error_reply(code, message, api_err.to_string()))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        Ok(error_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload too large",
            "request body exceeds the flow input limit".to_string(),
        ))
    } else {
        Err(err)
    }
}
