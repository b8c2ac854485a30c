//! Core types for the FAQ ranking service

pub mod answer;
pub mod feedback;

pub use answer::{AskRequest, AskResponse, MessageResponse, NextPageResponse, Page, RankedAnswer};
pub use feedback::{FeedbackEntry, FeedbackRequest};
