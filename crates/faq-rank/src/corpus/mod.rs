//! FAQ scraping and the in-memory answer corpus

pub mod loader;
pub mod faq_page;

pub use loader::{load_corpus, AnswerCorpus};
pub use faq_page::{extract_pairs, FaqPairs, FaqScraper};
