//! Scorer trait for question/context relevance

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// Result of scoring one context against a question
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSpan {
    /// Probability of the best answer span, higher is more relevant
    pub probability: f32,
    /// The extracted answer span
    pub span: String,
}

/// Trait for scoring a candidate context against a question
///
/// Implementations:
/// - `OnnxQaScorer`: local extractive QA model via ONNX Runtime
/// - `TimedScorer`: deadline wrapper around another scorer
#[async_trait]
pub trait AnswerScorer: Send + Sync {
    /// Score `context` as an answer source for `question`
    async fn score(&self, question: &str, context: &str) -> Result<ScoredSpan>;

    /// Get scorer name for logging
    fn name(&self) -> &str;
}

/// Bounds every call of the inner scorer by a timeout
pub struct TimedScorer {
    inner: Arc<dyn AnswerScorer>,
    timeout: Duration,
}

impl TimedScorer {
    pub fn new(inner: Arc<dyn AnswerScorer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl AnswerScorer for TimedScorer {
    async fn score(&self, question: &str, context: &str) -> Result<ScoredSpan> {
        match tokio::time::timeout(self.timeout, self.inner.score(question, context)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "{} scorer exceeded {:?} on a {}-byte context",
                    self.inner.name(),
                    self.timeout,
                    context.len()
                );
                Err(Error::ScorerTimeout(self.timeout))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowScorer(Duration);

    #[async_trait]
    impl AnswerScorer for SlowScorer {
        async fn score(&self, _question: &str, context: &str) -> Result<ScoredSpan> {
            tokio::time::sleep(self.0).await;
            Ok(ScoredSpan {
                probability: 1.0,
                span: context.to_string(),
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_timeout_expires() {
        let scorer = TimedScorer::new(
            Arc::new(SlowScorer(Duration::from_millis(500))),
            Duration::from_millis(10),
        );
        let result = scorer.score("q", "c").await;
        assert!(matches!(result, Err(Error::ScorerTimeout(_))));
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let scorer = TimedScorer::new(
            Arc::new(SlowScorer(Duration::from_millis(1))),
            Duration::from_secs(5),
        );
        let scored = scorer.score("q", "ctx").await.unwrap();
        assert_eq!(scored.span, "ctx");
        assert_eq!(scorer.name(), "slow");
    }
}
