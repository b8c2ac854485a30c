//! Application state for the ranking server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RankerConfig;
use crate::corpus::{load_corpus, AnswerCorpus, FaqScraper};
use crate::error::Result;
use crate::learning::FeedbackStore;
use crate::ranking::RankingSessionManager;
use crate::scoring::{AnswerScorer, OnnxQaScorer, TimedScorer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RankerConfig,
    /// Ranking sessions over the answer corpus
    manager: RankingSessionManager,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state
    ///
    /// Scrapes the FAQ page and loads the QA model; any failure here is fatal.
    pub async fn new(config: RankerConfig) -> Result<Self> {
        tracing::info!("Initializing FAQ ranking state...");

        let feedback = Arc::new(FeedbackStore::new(config.feedback.path.clone()));
        tracing::info!("Feedback store at {}", feedback.path().display());

        let scraper = FaqScraper::new(&config.source)?;
        let corpus = Arc::new(load_corpus(&scraper, &feedback).await?);

        let model = OnnxQaScorer::new(&config.scorer).await?;
        let scorer: Arc<dyn AnswerScorer> = Arc::new(TimedScorer::new(
            Arc::new(model),
            Duration::from_secs(config.scorer.timeout_secs),
        ));
        tracing::info!("Scorer initialized ({})", scorer.name());

        Ok(Self::from_parts(config, corpus, scorer, feedback))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: RankerConfig,
        corpus: Arc<AnswerCorpus>,
        scorer: Arc<dyn AnswerScorer>,
        feedback: Arc<FeedbackStore>,
    ) -> Self {
        let manager = RankingSessionManager::new(corpus, scorer, feedback)
            .with_scoring_concurrency(config.ranking.scoring_concurrency)
            .with_live_enrichment(config.ranking.enrich_live_corpus);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                manager,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RankerConfig {
        &self.inner.config
    }

    /// Get the ranking session manager
    pub fn manager(&self) -> &RankingSessionManager {
        &self.inner.manager
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
