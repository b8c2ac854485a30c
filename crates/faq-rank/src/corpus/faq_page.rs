//! FAQ page fetching and question/answer extraction

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::config::SourceConfig;
use crate::error::{Error, Result};

/// Aligned question/answer text extracted from the FAQ page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqPairs {
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl FaqPairs {
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Fetches the FAQ page once and extracts its question/answer blocks
pub struct FaqScraper {
    client: reqwest::Client,
    config: SourceConfig,
    question_selector: Selector,
    answer_selector: Selector,
}

impl FaqScraper {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            question_selector: parse_selector(&config.question_selector)?,
            answer_selector: parse_selector(&config.answer_selector)?,
        })
    }

    /// Fetch and parse the page, retrying up to `max_retries` extra times
    pub async fn fetch(&self) -> Result<FaqPairs> {
        let mut attempt = 0;
        let html = loop {
            match self.fetch_html().await {
                Ok(html) => break html,
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "FAQ fetch failed (attempt {}/{}): {}",
                        attempt,
                        self.config.max_retries + 1,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(
                        self.config.retry_backoff_ms * attempt as u64,
                    ))
                    .await;
                }
                Err(e) => return Err(e),
            }
        };

        let pairs = extract_with(&html, &self.question_selector, &self.answer_selector);
        tracing::info!(
            "Scraped {} question/answer pairs from {}",
            pairs.len(),
            self.config.url
        );
        Ok(pairs)
    }

    async fn fetch_html(&self) -> Result<String> {
        tracing::info!("Fetching FAQ page: {}", self.config.url);

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Failed to fetch {}: {}", self.config.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::upstream(format!(
                "FAQ fetch failed: HTTP {} from {}",
                response.status(),
                self.config.url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::upstream(format!("Failed to read FAQ body: {}", e)))
    }
}

/// Extract aligned pairs from raw HTML using CSS selectors
pub fn extract_pairs(html: &str, question_selector: &str, answer_selector: &str) -> Result<FaqPairs> {
    Ok(extract_with(
        html,
        &parse_selector(question_selector)?,
        &parse_selector(answer_selector)?,
    ))
}

fn extract_with(html: &str, question_selector: &Selector, answer_selector: &Selector) -> FaqPairs {
    let document = Html::parse_document(html);

    let mut questions: Vec<String> = document.select(question_selector).map(block_text).collect();
    let mut answers: Vec<String> = document.select(answer_selector).map(block_text).collect();

    // Never pair mismatched content: drop the unmatched tail
    if questions.len() != answers.len() {
        let keep = questions.len().min(answers.len());
        tracing::warn!(
            "FAQ page has {} questions but {} answers; keeping the first {}",
            questions.len(),
            answers.len(),
            keep
        );
        questions.truncate(keep);
        answers.truncate(keep);
    }

    FaqPairs { questions, answers }
}

/// Text of a block with inline markup flattened and whitespace collapsed
fn block_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Config(format!("Invalid CSS selector '{}': {}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="faq">
            <div class="question">How do I reset my <b>password</b>?</div>
            <div class="answer">
              Use the <a href="/reset">reset link</a> on the login page.
            </div>
            <div class="question">Can I change my username?</div>
            <div class="answer">No.</div>
            <div class="question">Is there a mobile app?</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_text_from_nested_markup() {
        let pairs = extract_pairs(PAGE, ".question", ".answer").unwrap();
        assert_eq!(pairs.questions[0], "How do I reset my password?");
        assert_eq!(pairs.answers[0], "Use the reset link on the login page.");
        assert_eq!(pairs.answers[1], "No.");
    }

    #[test]
    fn test_inline_markup_does_not_split_punctuation() {
        let html = "<div class=\"answer\">Is <code>len</code>() O(1)? Use <em>dict</em>,\n   not list.</div>";
        let pairs = extract_pairs(html, ".answer", ".answer").unwrap();
        assert_eq!(pairs.answers[0], "Is len() O(1)? Use dict, not list.");
    }

    #[test]
    fn test_truncates_to_shorter_list() {
        let pairs = extract_pairs(PAGE, ".question", ".answer").unwrap();
        assert_eq!(pairs.questions.len(), 2);
        assert_eq!(pairs.answers.len(), 2);
        assert_eq!(pairs.questions[1], "Can I change my username?");
    }

    #[test]
    fn test_no_matches_is_empty() {
        let pairs = extract_pairs("<html><body></body></html>", ".question", ".answer").unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let result = extract_pairs(PAGE, "..bad", ".answer");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
