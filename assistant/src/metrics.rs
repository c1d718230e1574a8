use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::models::AssistantResponse;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    flow_requests: IntCounterVec,
    retrieved_passages: IntCounter,
    tokens: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let flow_requests = IntCounterVec::new(
            Opts::new("assistant_flow_requests_total", "Flow invocations by outcome"),
            &["outcome"],
        )?;
        let retrieved_passages = IntCounter::new(
            "assistant_retrieved_passages_total",
            "Passages returned by retrieval",
        )?;
        let tokens = IntCounterVec::new(
            Opts::new("assistant_tokens_total", "Model tokens consumed"),
            &["kind"],
        )?;

        registry.register(Box::new(flow_requests.clone()))?;
        registry.register(Box::new(retrieved_passages.clone()))?;
        registry.register(Box::new(tokens.clone()))?;

        Ok(Self {
            registry,
            flow_requests,
            retrieved_passages,
            tokens,
        })
    }

    pub fn record_success(&self, response: &AssistantResponse) {
        self.flow_requests.with_label_values(&["success"]).inc();
        self.retrieved_passages.inc_by(response.citations.len() as u64);
        self.tokens
            .with_label_values(&["prompt"])
            .inc_by(response.usage.prompt_tokens);
        self.tokens
            .with_label_values(&["completion"])
            .inc_by(response.usage.completion_tokens);
    }

    pub fn record_failure(&self, outcome: &str) {
        self.flow_requests.with_label_values(&[outcome]).inc();
    }

    pub fn render(&self) -> Result<(Vec<u8>, String), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
