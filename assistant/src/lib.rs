pub mod agents;
pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod response;

#[cfg(test)]
mod test_support;
