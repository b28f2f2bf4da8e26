pub mod archive;
pub mod clock;
pub mod config;
pub mod marker;
pub mod publisher;
pub mod queue;
pub mod scheduler;
pub mod types;
pub mod window;

pub use archive::ArchiveWriter;
pub use clock::{Clock, MockClock, SystemClock};
pub use config::PublishConfig;
pub use marker::{MarkerStore, PublishMarker};
pub use publisher::Publisher;
pub use queue::{InMemoryQueue, ReleaseQueue};
pub use scheduler::{Scheduler, SchedulerState};
pub use types::*;
pub use window::{is_push_time, PublicationWindow};
