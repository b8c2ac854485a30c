//! Relevance scoring of candidate answers

pub mod onnx_qa;
pub mod scorer;

pub use onnx_qa::OnnxQaScorer;
pub use scorer::{AnswerScorer, ScoredSpan, TimedScorer};
