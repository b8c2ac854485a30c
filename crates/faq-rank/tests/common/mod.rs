#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use faq_rank::corpus::AnswerCorpus;
use faq_rank::learning::FeedbackStore;
use faq_rank::scoring::{AnswerScorer, ScoredSpan};
use faq_rank::{Error, RankingSessionManager};

/// Fixed score per context; unknown contexts score 0
#[derive(Default)]
pub struct StubScorer {
    scores: HashMap<String, f32>,
    pub calls: AtomicUsize,
}

impl StubScorer {
    pub fn new(scores: &[(&str, f32)]) -> Self {
        Self {
            scores: scores.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnswerScorer for StubScorer {
    async fn score(&self, _question: &str, context: &str) -> faq_rank::Result<ScoredSpan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScoredSpan {
            probability: self.scores.get(context).copied().unwrap_or(0.0),
            span: context.to_string(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Scores like `StubScorer` but fails on one context
pub struct FailingScorer {
    inner: StubScorer,
    fail_on: String,
    timeout: bool,
}

impl FailingScorer {
    /// Fail with `ScorerTimeout` when scoring `fail_on`
    pub fn timeout(inner: StubScorer, fail_on: &str) -> Self {
        Self {
            inner,
            fail_on: fail_on.to_string(),
            timeout: true,
        }
    }

    /// Fail with a model error when scoring `fail_on`
    pub fn broken(inner: StubScorer, fail_on: &str) -> Self {
        Self {
            inner,
            fail_on: fail_on.to_string(),
            timeout: false,
        }
    }
}

#[async_trait]
impl AnswerScorer for FailingScorer {
    async fn score(&self, question: &str, context: &str) -> faq_rank::Result<ScoredSpan> {
        if context != self.fail_on {
            return self.inner.score(question, context).await;
        }
        if self.timeout {
            Err(Error::ScorerTimeout(std::time::Duration::from_secs(30)))
        } else {
            Err(Error::scorer("inference failed"))
        }
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Candidates `c0..cN` scoring in descending order
pub fn descending_corpus(n: usize) -> (Vec<String>, StubScorer) {
    let answers: Vec<String> = (0..n).map(|i| format!("c{}", i)).collect();
    let scorer = StubScorer {
        scores: answers
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), 1.0 - i as f32 / 100.0))
            .collect(),
        calls: AtomicUsize::new(0),
    };
    (answers, scorer)
}

pub struct Fixture {
    pub manager: RankingSessionManager,
    pub store: Arc<FeedbackStore>,
    pub corpus: Arc<AnswerCorpus>,
    _dir: tempfile::TempDir,
}

pub fn fixture(answers: Vec<String>, scorer: impl AnswerScorer + 'static) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FeedbackStore::new(dir.path().join("feedback.json")));
    let corpus = Arc::new(AnswerCorpus::from_answers(answers));
    let manager = RankingSessionManager::new(
        Arc::clone(&corpus),
        Arc::new(scorer),
        Arc::clone(&store),
    );
    Fixture {
        manager,
        store,
        corpus,
        _dir: dir,
    }
}
