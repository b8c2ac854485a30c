//! Ranking session manager: rank, paginate, and record feedback

use futures::stream::{self, StreamExt, TryStreamExt};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::corpus::AnswerCorpus;
use crate::error::{Error, Result};
use crate::learning::FeedbackStore;
use crate::scoring::AnswerScorer;
use crate::types::{FeedbackEntry, Page, RankedAnswer};

use super::session::{RankingSession, SessionStore};

/// Outcome of asking for another page
#[derive(Debug, Clone, PartialEq)]
pub enum NextPage {
    Page(Page),
    Exhausted,
}

/// Owns the ranking sessions and coordinates corpus, scorer and feedback
pub struct RankingSessionManager {
    corpus: Arc<AnswerCorpus>,
    scorer: Arc<dyn AnswerScorer>,
    feedback: Arc<FeedbackStore>,
    sessions: SessionStore,
    scoring_concurrency: usize,
    enrich_live_corpus: bool,
}

impl RankingSessionManager {
    pub fn new(
        corpus: Arc<AnswerCorpus>,
        scorer: Arc<dyn AnswerScorer>,
        feedback: Arc<FeedbackStore>,
    ) -> Self {
        Self {
            corpus,
            scorer,
            feedback,
            sessions: SessionStore::new(),
            scoring_concurrency: 1,
            enrich_live_corpus: false,
        }
    }

    /// Score up to `n` candidates at once
    pub fn with_scoring_concurrency(mut self, n: usize) -> Self {
        self.scoring_concurrency = n.max(1);
        self
    }

    /// Add chosen answers to the live corpus as feedback arrives
    pub fn with_live_enrichment(mut self, enabled: bool) -> Self {
        self.enrich_live_corpus = enabled;
        self
    }

    pub fn corpus(&self) -> &AnswerCorpus {
        &self.corpus
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Number of questions with an active ranking
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Rank the whole corpus for `question` and return the first page
    ///
    /// Replaces any earlier session for the same question.
    pub async fn rank(&self, question: &str) -> Result<Page> {
        let _guard = self.sessions.lock(question).await;
        let start = Instant::now();

        let candidates = self.corpus.answers();
        let scores: Vec<f32> = stream::iter(candidates.clone())
            .map(|candidate| async move {
                self.scorer
                    .score(question, &candidate)
                    .await
                    .map(|scored| scored.probability)
            })
            .buffered(self.scoring_concurrency)
            .try_collect()
            .await?;

        let ranked = sort_ranked(
            candidates
                .into_iter()
                .zip(scores)
                .map(|(answer, score)| RankedAnswer { answer, score })
                .collect(),
        );

        let total = ranked.len();
        let session = RankingSession::new(ranked);
        let page = session.first_page();
        self.sessions.put(question, session);

        tracing::info!(
            "Ranked {} candidates for \"{}\" in {}ms",
            total,
            question,
            start.elapsed().as_millis()
        );
        Ok(page)
    }

    /// Serve the next page of an existing ranking
    pub async fn next_page(&self, question: &str) -> Result<NextPage> {
        let _guard = self.sessions.lock(question).await;

        match self.sessions.advance(question) {
            None => Err(Error::SessionNotFound(question.to_string())),
            Some(Some(page)) => {
                tracing::debug!("Serving page {} for \"{}\"", page.next_page, question);
                Ok(NextPage::Page(page))
            }
            Some(None) => {
                tracing::debug!("No more answers for \"{}\"", question);
                Ok(NextPage::Exhausted)
            }
        }
    }

    /// Persist the chosen answer and drop the question's ranking
    pub async fn record_feedback(&self, question: &str, chosen_answer: &str) -> Result<()> {
        let _guard = self.sessions.lock(question).await;

        // File lock plus fsync: keep it off the async workers
        let store = Arc::clone(&self.feedback);
        let entry = FeedbackEntry::new(question, chosen_answer);
        tokio::task::spawn_blocking(move || store.append(entry))
            .await
            .map_err(|e| Error::internal(format!("Feedback task failed: {}", e)))??;

        let cleared = self.sessions.delete(question);
        tracing::info!(
            "Recorded feedback for \"{}\" (session cleared: {})",
            question,
            cleared
        );

        if self.enrich_live_corpus {
            self.corpus
                .push(question.to_string(), chosen_answer.to_string());
        }
        Ok(())
    }
}

/// Stable sort by descending score; equal scores keep corpus order, NaN last
fn sort_ranked(mut ranked: Vec<RankedAnswer>) -> Vec<RankedAnswer> {
    ranked.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ra(answer: &str, score: f32) -> RankedAnswer {
        RankedAnswer {
            answer: answer.to_string(),
            score,
        }
    }

    #[test]
    fn test_sort_descending() {
        let sorted = sort_ranked(vec![ra("a", 0.1), ra("b", 0.9), ra("c", 0.5)]);
        let order: Vec<_> = sorted.iter().map(|r| r.answer.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let sorted = sort_ranked(vec![
            ra("first", 0.5),
            ra("top", 0.7),
            ra("second", 0.5),
            ra("third", 0.5),
        ]);
        let order: Vec<_> = sorted.iter().map(|r| r.answer.as_str()).collect();
        assert_eq!(order, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_nan_sorts_last() {
        let sorted = sort_ranked(vec![ra("nan", f32::NAN), ra("low", 0.0), ra("high", 1.0)]);
        let order: Vec<_> = sorted.iter().map(|r| r.answer.as_str()).collect();
        assert_eq!(order, vec!["high", "low", "nan"]);
    }
}
