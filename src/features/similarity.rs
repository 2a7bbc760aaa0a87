use anyhow::Result;
use std::collections::HashMap;

use super::text;

/// Anything that can compare two texts for meaning.
pub trait SimilarityModel: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn similarity(&self, a: &str, b: &str) -> Result<f64>;
}

/// Bag-of-words cosine; needs no model files.
#[derive(Debug, Default)]
pub struct TermFrequency;

impl SimilarityModel for TermFrequency {
    fn name(&self) -> &'static str {
        "term_frequency"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        Ok(cosine_similarity(a, b))
    }
}

/// Cosine of sentence embeddings from a local MiniLM model.
#[cfg(feature = "embeddings")]
pub struct SentenceEmbeddings {
    model: std::sync::Mutex<fastembed::TextEmbedding>,
}

#[cfg(feature = "embeddings")]
impl SentenceEmbeddings {
    /// Load (downloading on first use) the all-MiniLM-L6-v2 model.
    pub fn new() -> Result<Self> {
        use anyhow::Context;

        let options = fastembed::TextInitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2);
        let model = fastembed::TextEmbedding::try_new(options)
            .context("Failed to load sentence embedding model")?;
        Ok(Self {
            model: std::sync::Mutex::new(model),
        })
    }
}

#[cfg(feature = "embeddings")]
impl SimilarityModel for SentenceEmbeddings {
    fn name(&self) -> &'static str {
        "embeddings"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        use anyhow::Context;

        if text::word_count(a) == 0 || text::word_count(b) == 0 {
            return Ok(0.0);
        }

        #[allow(unused_mut)]
        let mut model = self
            .model
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding model lock poisoned"))?;
        let vectors = model
            .embed(vec![a, b], None)
            .context("Failed to embed texts")?;

        match vectors.as_slice() {
            [va, vb] => Ok(vector_cosine(va, vb)),
            other => anyhow::bail!("expected 2 embeddings, got {}", other.len()),
        }
    }
}

/// Cosine of two dense vectors; 0.0 when either is all zeros or the
/// lengths differ.
pub fn vector_cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut tf = HashMap::new();
    for token in text::tokens(text) {
        *tf.entry(token).or_insert(0.0) += 1.0;
    }
    tf
}

/// Cosine similarity between the term-frequency vectors of two texts.
///
/// Returns 0.0 when either text has no words. Term counts are non-negative,
/// so the result stays in `[0, 1]`.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);
    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }

    let dot: f64 = tf_a
        .iter()
        .filter_map(|(term, wa)| tf_b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = tf_a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = tf_b.values().map(|w| w * w).sum::<f64>().sqrt();

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
