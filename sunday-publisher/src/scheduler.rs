use crate::clock::Clock;
use crate::config::PublishConfig;
use crate::publisher::Publisher;
use crate::types::PublishOutcome;
use crate::window::PublicationWindow;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Eligible { window_start: DateTime<Utc> },
    Publishing { window_start: DateTime<Utc> },
    Cooldown,
}

/// Weekly publication loop, one state transition per `step`.
pub struct Scheduler<C: Clock> {
    publisher: Publisher,
    clock: C,
    window: PublicationWindow,
    poll_interval: Duration,
    cooldown: Duration,
    state: SchedulerState,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(publisher: Publisher, clock: C, config: &PublishConfig) -> Self {
        Self {
            publisher,
            clock,
            window: PublicationWindow::default(),
            poll_interval: config.poll_interval,
            cooldown: config.cooldown,
            state: SchedulerState::Idle,
        }
    }

    pub fn with_window(mut self, window: PublicationWindow) -> Self {
        self.window = window;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Perform one transition and return how long to sleep before the next.
    pub fn step(&mut self) -> Duration {
        let now = self.clock.now();

        match self.state {
            SchedulerState::Idle => match self.window.window_start(now) {
                Some(window_start) => {
                    info!("It is publication time ({} UTC), releasing the digest", now);
                    self.state = SchedulerState::Eligible { window_start };
                    Duration::ZERO
                }
                None => {
                    debug!("Not time yet. Current UTC: {}", now);
                    self.poll_interval
                }
            },

            SchedulerState::Eligible { window_start } => {
                match self.publisher.already_published(window_start) {
                    Ok(true) => {
                        info!("Window {} was already published, cooling down", window_start);
                        self.state = SchedulerState::Cooldown;
                    }
                    Ok(false) => self.state = SchedulerState::Publishing { window_start },
                    Err(e) => {
                        error!("Could not read publish marker: {}", e);
                        self.state = SchedulerState::Idle;
                        return self.poll_interval;
                    }
                }
                Duration::ZERO
            }

            SchedulerState::Publishing { window_start } => {
                match self.publisher.publish_scheduled(now, window_start) {
                    Ok(outcome) => {
                        log_outcome(&outcome);
                        self.state = SchedulerState::Cooldown;
                        Duration::ZERO
                    }
                    Err(e) => {
                        error!("Publish attempt failed: {}", e);
                        self.state = SchedulerState::Idle;
                        self.poll_interval
                    }
                }
            }

            SchedulerState::Cooldown => {
                self.state = SchedulerState::Idle;
                self.cooldown
            }
        }
    }

    /// Poll forever. Only process termination stops the loop.
    pub async fn run(&mut self) {
        info!(
            "Scheduler started: {:?} {:02}:00 UTC, poll every {}s{}",
            self.window.weekday,
            self.window.hour,
            self.poll_interval.as_secs(),
            if self.publisher.is_dry_run() { " (dry-run)" } else { "" }
        );
        loop {
            let pause = self.step();
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    }
}

fn log_outcome(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::Archived { record, released } => {
            info!("Published {} entries, archive record {}", released, record.display())
        }
        PublishOutcome::DryRun { would_archive, .. } => {
            info!("[DRY-RUN] cycle complete, would archive {}", would_archive.display())
        }
        PublishOutcome::NothingToPublish => warn!("No digest this week"),
        PublishOutcome::AlreadyPublished => debug!("Nothing to do, window already published"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::TimeZone;
    use std::fs;
    use std::path::Path;

    fn config_in(dir: &Path) -> PublishConfig {
        PublishConfig {
            digest_path: dir.join("index.html"),
            archive_dir: dir.join("archive"),
            marker_path: dir.join("archive").join(".last_published.json"),
            ..PublishConfig::default()
        }
    }

    fn scheduler_at(dir: &Path, time: DateTime<Utc>) -> (Scheduler<MockClock>, MockClock) {
        let config = config_in(dir);
        let clock = MockClock::new(time);
        let publisher = Publisher::with_demo_queue(&config);
        (Scheduler::new(publisher, clock.clone(), &config), clock)
    }

    #[test]
    fn idle_outside_the_window_polls() {
        let dir = tempfile::tempdir().unwrap();
        let (mut scheduler, _) =
            scheduler_at(dir.path(), Utc.with_ymd_and_hms(2024, 10, 6, 17, 59, 0).unwrap());

        assert_eq!(scheduler.step(), Duration::from_secs(60));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn full_cycle_publishes_then_cools_down() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "digest").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 10, 6, 17, 59, 30).unwrap();
        let (mut scheduler, clock) = scheduler_at(dir.path(), start);

        let pause = scheduler.step();
        clock.advance(pause);
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let window_start = Utc.with_ymd_and_hms(2024, 10, 6, 18, 0, 0).unwrap();
        assert_eq!(scheduler.step(), Duration::ZERO);
        assert_eq!(scheduler.state(), SchedulerState::Eligible { window_start });
        scheduler.step();
        assert_eq!(scheduler.state(), SchedulerState::Publishing { window_start });
        scheduler.step();
        assert_eq!(scheduler.state(), SchedulerState::Cooldown);
        assert_eq!(scheduler.publisher().archive_writer().records().unwrap().len(), 1);
        assert_eq!(scheduler.publisher().queued(), 0);

        let pause = scheduler.step();
        assert!(pause >= Duration::from_secs(3600));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        clock.advance(pause);
        assert_eq!(scheduler.step(), Duration::from_secs(60));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn missing_digest_still_cools_down() {
        let dir = tempfile::tempdir().unwrap();
        let (mut scheduler, _) =
            scheduler_at(dir.path(), Utc.with_ymd_and_hms(2024, 10, 6, 18, 10, 0).unwrap());

        scheduler.step();
        scheduler.step();
        scheduler.step();
        assert_eq!(scheduler.state(), SchedulerState::Cooldown);
        assert!(scheduler.publisher().archive_writer().records().unwrap().is_empty());
    }
}
