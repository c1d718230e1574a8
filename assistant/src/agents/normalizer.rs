// Normalizer: flattens search results into passages

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::models::{Passage, SearchResult};

const EXTRACTIVE_ANSWERS_FIELD: &str = "extractive_answers";
const UNKNOWN_REFERENCE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    ExtractiveAnswer,
    // FAQ records: faq_id, question, answer, action
    StructData,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::ExtractiveAnswer => "extractiveAnswer",
            ParseMode::StructData => "structData",
        }
    }

    fn parse_result(self, result: &SearchResult) -> Vec<Passage> {
        let Some(document) = result.document.as_ref() else {
            return Vec::new();
        };

        match self {
            ParseMode::ExtractiveAnswer => document
                .derived_struct_data
                .as_ref()
                .and_then(|fields| fields.get(EXTRACTIVE_ANSWERS_FIELD))
                .map(parse_extractive_answers)
                .unwrap_or_default(),
            ParseMode::StructData => document
                .struct_data
                .as_ref()
                .and_then(parse_struct_data)
                .into_iter()
                .collect(),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParseMode(pub String);

impl FromStr for ParseMode {
    type Err = UnknownParseMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "extractiveAnswer" => Ok(ParseMode::ExtractiveAnswer),
            "structData" => Ok(ParseMode::StructData),
            other => Err(UnknownParseMode(other.to_string())),
        }
    }
}

pub fn normalize(results: &[SearchResult], mode: ParseMode) -> Vec<Passage> {
    results
        .iter()
        .flat_map(|result| mode.parse_result(result))
        .collect()
}

fn parse_extractive_answers(value: &Value) -> Vec<Passage> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let fields = entry.as_object();
            Passage {
                reference_id: fields
                    .and_then(|f| f.get("pageNumber"))
                    .and_then(scalar_text),
                content: fields
                    .and_then(|f| f.get("content"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        })
        .collect()
}

fn parse_struct_data(fields: &Map<String, Value>) -> Option<Passage> {
    let question = fields.get("question")?;
    let answer = fields.get("answer")?;

    let reference_id = fields
        .get("faq_id")
        .and_then(scalar_text)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| UNKNOWN_REFERENCE.to_string());

    let mut content = format!(
        "Question: {}\nAnswer: {}",
        question.as_str().unwrap_or_default(),
        answer.as_str().unwrap_or_default()
    );
    if let Some(action) = fields
        .get("action")
        .and_then(Value::as_str)
        .filter(|a| !a.is_empty())
    {
        content.push_str("\nAction: ");
        content.push_str(action);
    }

    Some(Passage {
        reference_id: Some(reference_id),
        content: Some(content),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        // 12.0 renders as "12", like any other whole number
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => Some(f.to_string()),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(document: Value) -> SearchResult {
        serde_json::from_value(json!({ "id": "doc", "document": document })).unwrap()
    }

    fn faq(fields: Value) -> SearchResult {
        result(json!({ "id": "doc", "structData": fields }))
    }

    fn extractive(answers: Value) -> SearchResult {
        result(json!({ "id": "doc", "derivedStructData": { "extractive_answers": answers } }))
    }

    #[test]
    fn struct_data_composes_question_and_answer() {
        let passages = normalize(
            &[faq(json!({ "faq_id": 12, "question": "How do I join?", "answer": "Apply online." }))],
            ParseMode::StructData,
        );

        assert_eq!(
            passages,
            vec![Passage::new("12", "Question: How do I join?\nAnswer: Apply online.")]
        );
    }

    #[test]
    fn struct_data_appends_action_last() {
        let passages = normalize(
            &[faq(json!({
                "faq_id": 3,
                "action": "Forward to staff",
                "answer": "A",
                "question": "Q"
            }))],
            ParseMode::StructData,
        );

        assert_eq!(passages[0].content(), "Question: Q\nAnswer: A\nAction: Forward to staff");
    }

    #[test]
    fn struct_data_skips_empty_action() {
        let passages = normalize(
            &[faq(json!({ "faq_id": 3, "question": "Q", "answer": "A", "action": "" }))],
            ParseMode::StructData,
        );

        assert_eq!(passages[0].content(), "Question: Q\nAnswer: A");
    }

    #[test]
    fn struct_data_requires_question_and_answer() {
        let passages = normalize(
            &[
                faq(json!({ "faq_id": 1, "question": "Q only" })),
                faq(json!({ "faq_id": 2, "answer": "A only" })),
                faq(json!({ "faq_id": 3, "question": "Q", "answer": "A" })),
            ],
            ParseMode::StructData,
        );

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].reference_id(), "3");
    }

    #[test]
    fn struct_data_defaults_reference_id() {
        let passages = normalize(
            &[
                faq(json!({ "question": "Q", "answer": "A" })),
                faq(json!({ "faq_id": "FAQ-7", "question": "Q", "answer": "A" })),
                faq(json!({ "faq_id": true, "question": "Q", "answer": "A" })),
            ],
            ParseMode::StructData,
        );

        let ids: Vec<&str> = passages.iter().map(Passage::reference_id).collect();
        assert_eq!(ids, vec!["unknown", "FAQ-7", "unknown"]);
    }

    #[test]
    fn struct_data_renders_whole_float_ids_without_fraction() {
        let passages = normalize(
            &[
                faq(json!({ "faq_id": 12.0, "question": "Q", "answer": "A" })),
                faq(json!({ "faq_id": 12.5, "question": "Q", "answer": "A" })),
            ],
            ParseMode::StructData,
        );

        let ids: Vec<&str> = passages.iter().map(Passage::reference_id).collect();
        assert_eq!(ids, vec!["12", "12.5"]);
    }

    #[test]
    fn struct_data_present_non_string_fields_give_empty_segments() {
        let passages = normalize(
            &[
                faq(json!({ "faq_id": 5, "question": null, "answer": "A" })),
                faq(json!({ "faq_id": 6, "question": "Q", "answer": 42 })),
            ],
            ParseMode::StructData,
        );

        assert_eq!(
            passages,
            vec![
                Passage::new("5", "Question: \nAnswer: A"),
                Passage::new("6", "Question: Q\nAnswer: "),
            ]
        );
    }

    #[test]
    fn extractive_answers_keep_order_and_duplicates() {
        let passages = normalize(
            &[
                extractive(json!([
                    { "pageNumber": "4", "content": "first" },
                    { "pageNumber": "4", "content": "first" }
                ])),
                extractive(json!([{ "pageNumber": 9, "content": "second" }])),
            ],
            ParseMode::ExtractiveAnswer,
        );

        assert_eq!(
            passages,
            vec![
                Passage::new("4", "first"),
                Passage::new("4", "first"),
                Passage::new("9", "second"),
            ]
        );
    }

    #[test]
    fn extractive_answers_are_lenient_about_missing_fields() {
        let passages = normalize(
            &[extractive(json!([{ "content": "no page" }, {}]))],
            ParseMode::ExtractiveAnswer,
        );

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].reference_id, None);
        assert_eq!(passages[0].content(), "no page");
        assert_eq!(passages[1], Passage { reference_id: None, content: None });
    }

    #[test]
    fn extractive_answers_must_be_a_list() {
        let passages = normalize(
            &[extractive(json!({ "pageNumber": "1", "content": "x" }))],
            ParseMode::ExtractiveAnswer,
        );
        assert!(passages.is_empty());
    }

    #[test]
    fn modes_select_only_their_own_shape() {
        let struct_only = vec![faq(json!({ "faq_id": 1, "question": "Q", "answer": "A" }))];
        let extractive_only = vec![extractive(json!([{ "pageNumber": "1", "content": "x" }]))];

        assert!(normalize(&struct_only, ParseMode::ExtractiveAnswer).is_empty());
        assert!(normalize(&extractive_only, ParseMode::StructData).is_empty());
    }

    #[test]
    fn results_without_document_contribute_nothing() {
        let bare = SearchResult::default();
        assert!(normalize(&[bare.clone()], ParseMode::StructData).is_empty());
        assert!(normalize(&[bare], ParseMode::ExtractiveAnswer).is_empty());
    }

    #[test]
    fn parse_mode_round_trips_through_its_name() {
        for mode in [ParseMode::ExtractiveAnswer, ParseMode::StructData] {
            assert_eq!(mode.as_str().parse::<ParseMode>(), Ok(mode));
        }
        assert!("vectors".parse::<ParseMode>().is_err());
    }
}
