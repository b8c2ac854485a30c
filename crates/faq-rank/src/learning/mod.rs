//! Learning from user feedback

pub mod feedback_store;

pub use feedback_store::FeedbackStore;
