use crate::traits::PullFeed;
use crate::types::{RawItem, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

pub const SYNTHETIC_SOURCE: &str = "MockStream";
pub const DEFAULT_SYNTHETIC_COUNT: usize = 5;

const TOPICS: [&str; 5] = [
    "Biohacking",
    "Digital Minimalist",
    "Rust Programming",
    "Obsidian Workflows",
    "Neuromorphic Computing",
];

/// Plausible filler content. Only used to top up a thin batch.
pub struct SyntheticSource {
    pub count: usize,
    rng_seed: Option<u64>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_COUNT)
    }
}

impl SyntheticSource {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            rng_seed: None,
        }
    }

    /// Fix the generator seed so topic and engagement picks repeat.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn generate(&self) -> Vec<RawItem> {
        let mut rng = StdRng::seed_from_u64(self.rng_seed.unwrap_or_else(rand::random));
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;

        (0..self.count)
            .map(|i| {
                let topic = TOPICS.choose(&mut rng).copied().unwrap_or(TOPICS[0]);
                let likes: u32 = rng.random_range(0..=100);

                let mut raw_metadata = Map::new();
                raw_metadata.insert("likes".to_string(), Value::from(likes));

                RawItem {
                    id: format!("mock_{i}"),
                    source: SYNTHETIC_SOURCE.to_string(),
                    content: format!(
                        "Discovering the benefits of {topic} for mental clarity. #wellness #tech"
                    ),
                    author: format!("WellnessBot_{i}"),
                    timestamp: now,
                    raw_metadata,
                }
            })
            .collect()
    }
}

#[async_trait]
impl PullFeed for SyntheticSource {
    fn source_name(&self) -> String {
        SYNTHETIC_SOURCE.to_string()
    }

    async fn pull(&self) -> Result<Vec<RawItem>> {
        Ok(self.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_count_with_mock_shape() {
        let items = SyntheticSource::new(5).generate();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].id, "mock_0");
        assert_eq!(items[4].author, "WellnessBot_4");
        assert!(items.iter().all(|i| i.source == SYNTHETIC_SOURCE));
        assert!(items
            .iter()
            .all(|i| i.raw_metadata["likes"].as_u64().is_some_and(|l| l <= 100)));
    }

    #[test]
    fn seeded_generator_repeats() {
        let a = SyntheticSource::new(3).with_rng_seed(7).generate();
        let b = SyntheticSource::new(3).with_rng_seed(7).generate();
        let contents = |v: &[RawItem]| v.iter().map(|i| i.content.clone()).collect::<Vec<_>>();
        assert_eq!(contents(&a), contents(&b));
        assert_eq!(a[1].raw_metadata, b[1].raw_metadata);
    }
}
