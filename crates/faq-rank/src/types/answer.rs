//! Ranked answers and the request/response bodies of the ask endpoints

use serde::{Deserialize, Serialize};

/// A corpus candidate with its relevance score for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAnswer {
    /// Candidate answer text
    pub answer: String,
    /// Model probability, higher is more relevant
    pub score: f32,
}

/// One page of a ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub answers: Vec<RankedAnswer>,
    /// Number of pages served so far for the question
    pub next_page: usize,
}

/// Body of `/ask` and `/ask/next`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// A page of answers for a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answers: Vec<RankedAnswer>,
    pub next_page: usize,
}

impl AskResponse {
    pub fn from_page(question: String, page: Page) -> Self {
        Self {
            question,
            answers: page.answers,
            next_page: page.next_page,
        }
    }
}

/// Plain `{message}` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `/ask/next`: another page, or the exhausted message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextPageResponse {
    Page(AskResponse),
    Exhausted(MessageResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_serializes_as_message() {
        let body = NextPageResponse::Exhausted(MessageResponse::new("no more answers"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "no more answers" }));
    }

    #[test]
    fn test_page_serializes_flat() {
        let body = NextPageResponse::Page(AskResponse {
            question: "q".to_string(),
            answers: vec![RankedAnswer {
                answer: "a".to_string(),
                score: 0.5,
            }],
            next_page: 2,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["question"], "q");
        assert_eq!(json["answers"][0]["answer"], "a");
        assert_eq!(json["next_page"], 2);
    }
}
