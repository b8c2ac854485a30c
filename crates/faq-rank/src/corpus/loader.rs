//! Answer corpus assembled from the scraped FAQ and stored feedback

use parking_lot::RwLock;

use crate::error::Result;
use crate::learning::FeedbackStore;
use crate::types::FeedbackEntry;

use super::faq_page::{FaqPairs, FaqScraper};

#[derive(Debug, Default)]
struct CorpusInner {
    questions: Vec<String>,
    answers: Vec<String>,
}

/// Ranking candidates: scraped answers in page order, then feedback answers in
/// submission order. Grows by appending only.
#[derive(Debug, Default)]
pub struct AnswerCorpus {
    inner: RwLock<CorpusInner>,
}

impl AnswerCorpus {
    /// Build from scraped pairs followed by stored feedback
    pub fn from_parts(pairs: FaqPairs, feedback: Vec<FeedbackEntry>) -> Self {
        let FaqPairs {
            mut questions,
            mut answers,
        } = pairs;

        questions.reserve(feedback.len());
        answers.reserve(feedback.len());
        for entry in feedback {
            questions.push(entry.question);
            answers.push(entry.chosen_answer);
        }

        Self {
            inner: RwLock::new(CorpusInner { questions, answers }),
        }
    }

    /// Build directly from candidate answers
    pub fn from_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let answers: Vec<String> = answers.into_iter().map(Into::into).collect();
        Self::from_parts(
            FaqPairs {
                questions: vec![String::new(); answers.len()],
                answers,
            },
            Vec::new(),
        )
    }

    /// Number of candidate answers
    pub fn len(&self) -> usize {
        self.inner.read().answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current candidates, in corpus order
    pub fn answers(&self) -> Vec<String> {
        self.inner.read().answers.clone()
    }

    /// Copy of the questions aligned with `answers`
    pub fn questions(&self) -> Vec<String> {
        self.inner.read().questions.clone()
    }

    /// Append one question/answer pair
    pub fn push(&self, question: String, answer: String) {
        let mut inner = self.inner.write();
        inner.questions.push(question);
        inner.answers.push(answer);
    }
}

/// Scrape the FAQ page and merge in stored feedback
///
/// Any fetch failure is returned unchanged; the caller treats it as fatal.
pub async fn load_corpus(scraper: &FaqScraper, store: &FeedbackStore) -> Result<AnswerCorpus> {
    let pairs = scraper.fetch().await?;
    let scraped = pairs.len();
    let feedback = store.load()?;
    let stored = feedback.len();

    let corpus = AnswerCorpus::from_parts(pairs, feedback);
    tracing::info!(
        "Answer corpus ready: {} candidates ({} scraped, {} from feedback)",
        corpus.len(),
        scraped,
        stored
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraped_answers_precede_feedback() {
        let pairs = FaqPairs {
            questions: vec!["q1".into(), "q2".into()],
            answers: vec!["a1".into(), "a2".into()],
        };
        let feedback = vec![
            FeedbackEntry::new("fq1", "fa1"),
            FeedbackEntry::new("fq2", "fa2"),
        ];

        let corpus = AnswerCorpus::from_parts(pairs, feedback);
        assert_eq!(corpus.answers(), vec!["a1", "a2", "fa1", "fa2"]);
        assert_eq!(corpus.questions(), vec!["q1", "q2", "fq1", "fq2"]);
    }

    #[test]
    fn test_push_appends_at_end() {
        let corpus = AnswerCorpus::from_answers(["a", "b"]);
        corpus.push("q".into(), "c".into());
        assert_eq!(corpus.answers(), vec!["a", "b", "c"]);
        assert_eq!(corpus.questions().len(), 3);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = AnswerCorpus::from_parts(FaqPairs::default(), Vec::new());
        assert!(corpus.is_empty());
    }
}
