//! Ranking sessions keyed by exact question text
//!
//! A session holds the full ranked list and the page cursor together, so a
//! cursor never outlives its list. Keys are compared byte for byte: no case
//! folding, no whitespace normalization.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::{Page, RankedAnswer};

/// Fixed number of answers per page
pub const PAGE_SIZE: usize = 5;

/// A question's ranked answers and how many pages have been served
#[derive(Debug, Clone, PartialEq)]
pub struct RankingSession {
    ranked: Vec<RankedAnswer>,
    pages_served: usize,
}

impl RankingSession {
    /// New session with the first page already served
    pub fn new(ranked: Vec<RankedAnswer>) -> Self {
        Self {
            ranked,
            pages_served: 1,
        }
    }

    /// The first page, as returned by a fresh ranking
    pub fn first_page(&self) -> Page {
        Page {
            answers: self.ranked.iter().take(PAGE_SIZE).cloned().collect(),
            next_page: 1,
        }
    }

    /// Serve the next page; `None` when exhausted, leaving the cursor as is
    pub fn advance(&mut self) -> Option<Page> {
        let start = self.pages_served * PAGE_SIZE;
        if start >= self.ranked.len() {
            return None;
        }
        let end = (start + PAGE_SIZE).min(self.ranked.len());

        self.pages_served += 1;
        Some(Page {
            answers: self.ranked[start..end].to_vec(),
            next_page: self.pages_served,
        })
    }

    pub fn pages_served(&self) -> usize {
        self.pages_served
    }
}

/// Process-wide session store
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, RankingSession>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question: &str) -> Option<RankingSession> {
        self.sessions.get(question).map(|s| s.clone())
    }

    /// Insert or replace the session for `question`
    pub fn put(&self, question: &str, session: RankingSession) {
        self.sessions.insert(question.to_string(), session);
    }

    /// Remove the session; returns whether one existed
    pub fn delete(&self, question: &str) -> bool {
        self.sessions.remove(question).is_some()
    }

    /// Advance the cursor in place. Outer `None`: no session.
    pub fn advance(&self, question: &str) -> Option<Option<Page>> {
        self.sessions
            .get_mut(question)
            .map(|mut session| session.advance())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Acquire the per-question lock serializing rank/next/feedback
    pub async fn lock(&self, question: &str) -> QuestionGuard<'_> {
        let mutex = self
            .locks
            .entry(question.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        QuestionGuard {
            store: self,
            question: question.to_string(),
            guard: Some(guard),
        }
    }
}

/// Held while operating on one question's session
pub struct QuestionGuard<'a> {
    store: &'a SessionStore,
    question: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for QuestionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Forget the lock once nobody else holds or waits on it
        self.store
            .locks
            .remove_if(&self.question, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
