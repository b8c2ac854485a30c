//! Feedback types

use serde::{Deserialize, Serialize};

/// A user's chosen best answer for a question, persisted permanently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub question: String,
    pub chosen_answer: String,
}

impl FeedbackEntry {
    pub fn new(question: impl Into<String>, chosen_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            chosen_answer: chosen_answer.into(),
        }
    }
}

/// Body of `/feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub chosen_answer: String,
}

impl From<FeedbackRequest> for FeedbackEntry {
    fn from(request: FeedbackRequest) -> Self {
        Self {
            question: request.question,
            chosen_answer: request.chosen_answer,
        }
    }
}
