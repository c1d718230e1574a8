use crate::error::FlowError;
use crate::models::{AssistantResponse, Completion, Passage, TokenUsage, Usage};

pub fn citation(passage: &Passage) -> String {
    format!(
        "Reference ID: {}\n{}",
        passage.reference_id(),
        passage.content()
    )
}

pub fn map_response(
    completion: Option<Completion>,
    passages: &[Passage],
    model: &str,
    usage: TokenUsage,
) -> Result<AssistantResponse, FlowError> {
    let completion = completion.ok_or(FlowError::NoCompletion)?;

    Ok(AssistantResponse {
        completion,
        citations: passages.iter().map(citation).collect(),
        model: model.to_string(),
        usage: Usage {
            prompt_tokens: usage.input_tokens.unwrap_or(0),
            completion_tokens: usage.output_tokens.unwrap_or(0),
            total_tokens: usage.total_tokens.unwrap_or(0),
        },
    })
}
