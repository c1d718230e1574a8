use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde_json::{json, Value};

use crate::models::{Message, Passage, Role};

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("../prompts/faq_assistant.md");
const CURRENT_TIME_PLACEHOLDER: &str = "{{current_time}}";

pub const RETRIEVAL_PREAMBLE: &str = "Relevant information was found in the FAQ.";

// Asia/Tokyo, no daylight saving
const TOKYO_OFFSET_SECS: i32 = 9 * 3600;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

fn tokyo_offset() -> FixedOffset {
    FixedOffset::east_opt(TOKYO_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

// ja-JP style, e.g. 2025/3/4 9:05:07
pub fn format_local_time(now: DateTime<Utc>) -> String {
    now.with_timezone(&tokyo_offset())
        .format("%Y/%-m/%-d %-H:%M:%S")
        .to_string()
}

pub fn system_prompt(clock: &dyn Clock) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace(CURRENT_TIME_PLACEHOLDER, &format_local_time(clock.now()))
}

pub fn assemble_messages(user_prompts: &[String], passages: &[Passage]) -> Vec<Message> {
    let mut messages: Vec<Message> = user_prompts
        .iter()
        .map(|prompt| Message::text(Role::User, prompt.as_str()))
        .collect();

    if !passages.is_empty() {
        let context = passages
            .iter()
            .map(Passage::content)
            .collect::<Vec<_>>()
            .join("\n\n");
        messages.push(Message::text(
            Role::Model,
            format!("{RETRIEVAL_PREAMBLE}\n{context}"),
        ));
    }

    messages
}

pub fn completion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "canAnswer": {
                "type": "BOOLEAN",
                "description": "Whether the provided information allows an accurate answer. When it does not, set false and describe the needed information or action in note."
            },
            "reply": {
                "type": "STRING",
                "description": "The reply to the customer, following the format in the instructions."
            },
            "reason": {
                "type": "STRING",
                "description": "The referenced material and the quoted passage, copied verbatim."
            },
            "note": {
                "type": "STRING",
                "nullable": true,
                "description": "Items for staff to check. May request information or actions."
            }
        },
        "required": ["canAnswer", "reply", "reason", "note"]
    })
}
