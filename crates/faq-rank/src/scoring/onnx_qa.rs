//! ONNX-based extractive question answering
//!
//! Runs a SQuAD-style model (DistilBERT by default) over a question/context
//! pair and reports the probability of the best answer span.

use async_trait::async_trait;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

use crate::config::ScorerConfig;
use crate::error::{Error, Result};

use super::scorer::{AnswerScorer, ScoredSpan};

/// Extractive QA scorer backed by ONNX Runtime
#[derive(Clone)]
pub struct OnnxQaScorer {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Arc<Mutex<Session>>,
    /// HuggingFace tokenizer, truncating the context side to `max_length`
    tokenizer: Arc<Tokenizer>,
    max_answer_tokens: usize,
    use_token_type_ids: bool,
}

impl OnnxQaScorer {
    /// Create a new scorer, downloading the model on first use
    pub async fn new(config: &ScorerConfig) -> Result<Self> {
        tracing::info!("Initializing ONNX QA scorer with model: {}", config.model);

        let model_dir = config.cache_dir.join(config.model.replace('/', "--"));
        tokio::fs::create_dir_all(&model_dir).await.map_err(|e| {
            Error::Config(format!("Failed to create cache directory: {}", e))
        })?;

        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            download_file(&model_url(&config.model, "onnx/model.onnx"), &model_path).await?;
        }
        if !tokenizer_path.exists() {
            download_file(&model_url(&config.model, "tokenizer.json"), &tokenizer_path).await?;
        }

        let session = Session::builder()
            .map_err(|e| Error::scorer(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::scorer(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(config.intra_threads)
            .map_err(|e| Error::scorer(format!("Failed to set threads: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::scorer(format!("Failed to load model: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::scorer(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                strategy: TruncationStrategy::OnlySecond,
                ..Default::default()
            }))
            .map_err(|e| Error::scorer(format!("Failed to configure truncation: {}", e)))?;

        tracing::info!("ONNX QA scorer initialized successfully");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            max_answer_tokens: config.max_answer_tokens.max(1),
            use_token_type_ids: config.use_token_type_ids,
        })
    }

    fn infer(&self, question: &str, context: &str) -> Result<ScoredSpan> {
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| Error::scorer(format!("Tokenization failed: {}", e)))?;

        let seq_len = encoding.get_ids().len();
        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let input_ids_tensor = Tensor::from_array((vec![1, seq_len], input_ids.into_boxed_slice()))
            .map_err(|e| Error::scorer(format!("Input tensor creation failed: {}", e)))?;
        let attention_mask_tensor =
            Tensor::from_array((vec![1, seq_len], attention_mask.into_boxed_slice()))
                .map_err(|e| {
                    Error::scorer(format!("Attention mask tensor creation failed: {}", e))
                })?;

        let mut inputs = vec![
            ("input_ids", input_ids_tensor.into_dyn()),
            ("attention_mask", attention_mask_tensor.into_dyn()),
        ];
        if self.use_token_type_ids {
            let token_type_ids: Vec<i64> =
                encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let token_type_ids_tensor =
                Tensor::from_array((vec![1, seq_len], token_type_ids.into_boxed_slice()))
                    .map_err(|e| {
                        Error::scorer(format!("Token type tensor creation failed: {}", e))
                    })?;
            inputs.push(("token_type_ids", token_type_ids_tensor.into_dyn()));
        }

        let (start_logits, end_logits) = {
            let mut session = self.session.lock();
            let outputs = session
                .run(inputs)
                .map_err(|e| Error::scorer(format!("Inference failed: {}", e)))?;

            let output_iter: Vec<_> = outputs.iter().collect();
            let extract = |name: &str, position: usize| -> Result<Vec<f32>> {
                let value = output_iter
                    .iter()
                    .find(|(output_name, _)| *output_name == name)
                    .or_else(|| output_iter.get(position))
                    .map(|(_, v)| v)
                    .ok_or_else(|| Error::scorer(format!("No {} tensor", name)))?;
                let (_, data) = value
                    .try_extract_tensor::<f32>()
                    .map_err(|e| Error::scorer(format!("Failed to extract {}: {}", name, e)))?;
                Ok(data.to_vec())
            };
            (extract("start_logits", 0)?, extract("end_logits", 1)?)
        };

        let context_mask: Vec<bool> = encoding
            .get_sequence_ids()
            .iter()
            .map(|seq| *seq == Some(1))
            .collect();

        let Some(best) = best_span(&start_logits, &end_logits, &context_mask, self.max_answer_tokens)
        else {
            return Ok(ScoredSpan {
                probability: 0.0,
                span: String::new(),
            });
        };

        let offsets = encoding.get_offsets();
        let span = match (offsets.get(best.start), offsets.get(best.end)) {
            (Some(&(from, _)), Some(&(_, to))) => context.get(from..to).unwrap_or_default(),
            _ => "",
        };

        Ok(ScoredSpan {
            probability: best.probability,
            span: span.trim().to_string(),
        })
    }
}

#[async_trait]
impl AnswerScorer for OnnxQaScorer {
    async fn score(&self, question: &str, context: &str) -> Result<ScoredSpan> {
        let scorer = self.clone();
        let question = question.to_string();
        let context = context.to_string();

        tokio::task::spawn_blocking(move || scorer.infer(&question, &context))
            .await
            .map_err(|e| Error::internal(format!("Scoring task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "onnx-qa"
    }
}

/// Best answer span over context tokens, by token index (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanChoice {
    pub start: usize,
    pub end: usize,
    pub probability: f32,
}

/// Pick the span maximizing `p_start * p_end`
///
/// Start and end logits are softmaxed over context positions only. Spans run
/// forward from their start and are at most `max_answer_tokens` long.
pub fn best_span(
    start_logits: &[f32],
    end_logits: &[f32],
    context_mask: &[bool],
    max_answer_tokens: usize,
) -> Option<SpanChoice> {
    let n = start_logits.len().min(end_logits.len()).min(context_mask.len());
    let start_probs = masked_softmax(&start_logits[..n], &context_mask[..n])?;
    let end_probs = masked_softmax(&end_logits[..n], &context_mask[..n])?;

    let mut best: Option<SpanChoice> = None;
    for start in (0..n).filter(|&i| context_mask[i]) {
        let last = (start + max_answer_tokens).min(n);
        for end in (start..last).filter(|&j| context_mask[j]) {
            let probability = start_probs[start] * end_probs[end];
            if best.map_or(true, |b| probability > b.probability) {
                best = Some(SpanChoice {
                    start,
                    end,
                    probability,
                });
            }
        }
    }
    best
}

fn masked_softmax(logits: &[f32], mask: &[bool]) -> Option<Vec<f32>> {
    let max = logits
        .iter()
        .zip(mask)
        .filter(|&(_, &m)| m)
        .map(|(&l, _)| l)
        .fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return None;
    }

    let exps: Vec<f32> = logits
        .iter()
        .zip(mask)
        .map(|(&l, &m)| if m { (l - max).exp() } else { 0.0 })
        .collect();
    let sum: f32 = exps.iter().sum();
    Some(exps.into_iter().map(|e| e / sum).collect())
}

fn model_url(model: &str, file: &str) -> String {
    format!("https://huggingface.co/{}/resolve/main/{}", model, file)
}

/// Download a model artifact into the cache
async fn download_file(url: &str, path: &Path) -> Result<()> {
    tracing::info!("Downloading {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::scorer(format!("Failed to download {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::scorer(format!(
            "Download of {} failed: HTTP {}",
            url,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::scorer(format!("Failed to read {}: {}", url, e)))?;

    // Write beside the target first so an interrupted download is not cached
    let partial: PathBuf = path.with_extension("part");
    tokio::fs::write(&partial, &bytes).await?;
    tokio::fs::rename(&partial, path).await?;

    tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_span_ignores_question_tokens() {
        // [CLS] q q [SEP] c c c [SEP]
        let mask = [false, false, false, false, true, true, true, false];
        let start = [9.0, 9.0, 9.0, 9.0, 1.0, 3.0, 0.0, 9.0];
        let end = [9.0, 9.0, 9.0, 9.0, 0.0, 1.0, 4.0, 9.0];

        let best = best_span(&start, &end, &mask, 30).unwrap();
        assert_eq!((best.start, best.end), (5, 6));
        assert!(best.probability > 0.0 && best.probability <= 1.0);
    }

    #[test]
    fn test_best_span_respects_max_length() {
        let mask = [true; 6];
        let start = [5.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let end = [0.0, 0.0, 0.0, 0.0, 0.0, 5.0];

        let best = best_span(&start, &end, &mask, 2).unwrap();
        assert!(best.end - best.start < 2);
    }

    #[test]
    fn test_best_span_never_ends_before_start() {
        let mask = [true; 4];
        let start = [0.0, 0.0, 0.0, 8.0];
        let end = [8.0, 0.0, 0.0, 0.0];

        let best = best_span(&start, &end, &mask, 10).unwrap();
        assert!(best.end >= best.start);
    }

    #[test]
    fn test_no_context_tokens() {
        assert!(best_span(&[1.0, 2.0], &[1.0, 2.0], &[false, false], 5).is_none());
    }

    #[test]
    fn test_masked_softmax_sums_to_one() {
        let probs = masked_softmax(&[1.0, 2.0, 3.0], &[true, false, true]).unwrap();
        assert_eq!(probs[1], 0.0);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }
}
