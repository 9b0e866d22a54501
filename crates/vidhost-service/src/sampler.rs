//! Progress sampler
//!
//! Runs next to an upload. The transfer overwrites the latest `(current, total)`
//! sample in a watch slot without ever waiting; once per tick the sampler
//! publishes that sample if it changed since the previous tick. When the upload
//! result arrives the sampler publishes the terminal event, drops its end of
//! the slot and exits.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use vidhost_core::{ProgressEvent, UploadInfos, Video};
use vidhost_infra::ProgressPublisher;

/// Published when the orchestration is dropped before sending its result
pub const CANCELLED_MESSAGE: &str = "upload cancelled before completion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProgressSample {
    pub current: u64,
    pub total: u64,
}

/// Outcome handed to the sampler once the host call returns
pub(crate) type UploadOutcome = Result<Video, String>;

pub(crate) struct ProgressSampler {
    job_id: String,
    publisher: Arc<dyn ProgressPublisher>,
    every: Duration,
}

impl ProgressSampler {
    pub fn new(job_id: String, publisher: Arc<dyn ProgressPublisher>, every: Duration) -> Self {
        Self {
            job_id,
            publisher,
            every,
        }
    }

    pub async fn run(
        self,
        mut samples: watch::Receiver<Option<ProgressSample>>,
        mut outcome: oneshot::Receiver<UploadOutcome>,
    ) {
        // First tick one period after start, not immediately
        let mut ticker = interval_at(Instant::now() + self.every, self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let terminal = loop {
            tokio::select! {
                biased;

                result = &mut outcome => {
                    break match result {
                        Ok(Ok(video)) => UploadInfos::new(
                            self.job_id.clone(),
                            ProgressEvent::Done {
                                id: video.id,
                                watch_prefix: video.watch_prefix,
                                duration_seconds: video.duration_seconds,
                            },
                        ),
                        Ok(Err(message)) => UploadInfos::error(self.job_id.clone(), message),
                        Err(_) => {
                            tracing::warn!(job_id = %self.job_id, "Upload dropped without a result");
                            UploadInfos::error(self.job_id.clone(), CANCELLED_MESSAGE)
                        }
                    };
                }
                _ = ticker.tick() => {
                    // Unchanged since the last tick: nothing new to report
                    let latest = match samples.has_changed() {
                        Ok(true) => *samples.borrow_and_update(),
                        _ => None,
                    };
                    if let Some(sample) = latest {
                        self.publish(&UploadInfos::in_progress(
                            self.job_id.clone(),
                            sample.current,
                            sample.total,
                        ))
                        .await;
                    }
                }
            }
        };

        self.publish(&terminal).await;

        // Releases the orchestrator waiting on `Sender::closed`
        drop(samples);
        tracing::debug!(job_id = %self.job_id, state = ?terminal.state(), "Progress sampler finished");
    }

    async fn publish(&self, infos: &UploadInfos) {
        if let Err(e) = self.publisher.publish(infos).await {
            tracing::error!(
                job_id = %self.job_id,
                state = ?infos.state(),
                error = %e,
                "Failed to publish upload progress"
            );
        }
    }
}
