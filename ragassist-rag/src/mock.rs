//! Deterministic embedding provider for tests and offline demos.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Hash-based embeddings: identical text gives identical, L2-normalised vectors.
///
/// The vectors carry no semantics, but a query equal to a stored chunk's text
/// lands at distance zero from that chunk, which is enough to exercise the
/// retrieval path without downloading a model.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    /// Create a provider producing vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // FNV-1a over the bytes, then one splitmix round per component
        let hash = text
            .bytes()
            .fold(0xCBF2_9CE4_8422_2325u64, |acc, b| (acc ^ b as u64).wrapping_mul(0x0100_0000_01B3));
        let mut emb: Vec<f32> = (0..self.dimensions as u64)
            .map(|i| {
                let mut h = hash ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15);
                h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
                h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
                h ^= h >> 31;
                // top 24 bits map exactly onto an f32 in [-1, 1)
                ((h >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
            })
            .collect();
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let provider = MockEmbeddingProvider::new(16);
        let a = provider.embed("rayleigh").await.unwrap();
        let b = provider.embed("rayleigh").await.unwrap();
        let c = provider.embed("mie").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    #[tokio::test]
    async fn distinct_texts_spread_apart() {
        let provider = MockEmbeddingProvider::new(32);
        let a = provider.embed("The sky is blue because of Rayleigh scattering.").await.unwrap();
        let b = provider.embed("Sunsets are red because blue light is scattered away.").await.unwrap();

        let mut components = a.clone();
        components.sort_by(f32::total_cmp);
        components.dedup();
        assert!(components.len() > 1, "all components equal: {a:?}");
        assert!(distance(&a, &b) > 0.1, "distance {}", distance(&a, &b));

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn near_identical_texts_do_not_collide() {
        let provider = MockEmbeddingProvider::new(64);
        let six = provider.embed("Document number 6 talks about topic 42.").await.unwrap();
        let seven = provider.embed("Document number 7 talks about topic 49.").await.unwrap();
        assert!(distance(&six, &seven) > 0.1);
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let provider = MockEmbeddingProvider::new(8);
        let batch = provider.embed_batch(&["one", "two"]).await.unwrap();
        assert_eq!(batch[0], provider.embed("one").await.unwrap());
        assert_eq!(batch[1], provider.embed("two").await.unwrap());
    }
}
