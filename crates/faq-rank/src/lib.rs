//! faq-rank: FAQ answer ranking with an extractive question-answering model
//!
//! Answers scraped from a public FAQ page, plus answers users chose as best,
//! form the candidate corpus. Each question ranks every candidate by the
//! probability the QA model assigns to its best span, and the ranking is
//! served five answers at a time.

pub mod config;
pub mod corpus;
pub mod error;
pub mod learning;
pub mod ranking;
pub mod scoring;
pub mod server;
pub mod types;

pub use config::RankerConfig;
pub use error::{Error, Result};
pub use ranking::{NextPage, RankingSessionManager, PAGE_SIZE};
pub use types::{FeedbackEntry, Page, RankedAnswer};
