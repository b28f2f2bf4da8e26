pub mod types;
pub mod config;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod aggregator;
pub mod normalizer;
pub mod pipeline;

pub use types::*;
pub use config::IngestConfig;
pub use traits::PullFeed;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::{FeedSource, SeedSource, SourceConnector, SyntheticSource};
pub use aggregator::{Aggregator, IngestReport};
pub use normalizer::{standardize, standardize_records};
