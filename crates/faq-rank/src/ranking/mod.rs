//! Per-question answer ranking with pagination

pub mod manager;
pub mod session;

pub use manager::{NextPage, RankingSessionManager};
pub use session::{RankingSession, SessionStore, PAGE_SIZE};
