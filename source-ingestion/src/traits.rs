use crate::types::{RawItem, Result};
use async_trait::async_trait;

/// Trait for pulling raw content from one source (seed file, syndication feed, generator).
#[async_trait]
pub trait PullFeed: Send + Sync {
    /// Label stamped into `RawItem::source` and used in logs.
    fn source_name(&self) -> String;

    /// Fetch the current items of this source. Errors are reported to the
    /// caller, which decides whether they are fatal.
    async fn pull(&self) -> Result<Vec<RawItem>>;
}
