// Local HTTP stand-in for the hosted APIs, used by client tests

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct StubUpstream {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

// Answers every POST with `status` and `reply`, recording what was sent.
pub fn spawn_upstream(status: StatusCode, reply: String) -> StubUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    let route = warp::post()
        .and(warp::path::full())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::json())
        .map(
            move |path: warp::path::FullPath, authorization: Option<String>, body: Value| {
                captured.lock().unwrap().push(CapturedRequest {
                    path: path.as_str().to_string(),
                    authorization,
                    body,
                });
                warp::reply::with_status(reply.clone(), status)
            },
        );

    let (addr, server): (SocketAddr, _) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    StubUpstream {
        base_url: format!("http://{addr}"),
        requests,
    }
}
