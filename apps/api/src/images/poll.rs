//! Async Poll Engine: submit-then-poll driver for asynchronous job APIs.
//!
//! State machine: Submitted → {Pending (loop), Done, TimedOut, Failed}.
//! The status is checked immediately, then once per interval. A status
//! request that errors aborts the loop at once; there is no retry and no
//! cancellation token, only the timeout.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::images::provider::ProviderError;

pub const POLL_INTERVAL: Duration = Duration::from_millis(5_000);
pub const POLL_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Opaque id handed back by the job API on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
}

/// Status of a submitted job. Done is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Done { payload: String },
}

/// What an asynchronous job API has to offer the poll engine.
#[async_trait]
pub trait JobBackend: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<JobHandle, ProviderError>;

    /// Reports `Done` only with a usable payload; a finished job whose
    /// result is structurally absent is `MalformedResponse`.
    async fn status(&self, job: &JobHandle) -> Result<JobStatus, ProviderError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            timeout: POLL_TIMEOUT,
        }
    }
}

/// Submits `prompt` and waits for the job's payload.
pub async fn run_job(
    backend: &dyn JobBackend,
    prompt: &str,
    settings: PollSettings,
) -> Result<String, ProviderError> {
    let job = backend.submit(prompt).await?;
    if job.id.trim().is_empty() {
        return Err(ProviderError::MalformedResponse(
            "submission returned no job id".to_string(),
        ));
    }
    debug!(job_id = %job.id, "job submitted");
    poll_until_done(backend, &job, settings).await
}

/// Polls `job` until it is done, a status check fails, or the timeout elapses.
pub async fn poll_until_done(
    backend: &dyn JobBackend,
    job: &JobHandle,
    settings: PollSettings,
) -> Result<String, ProviderError> {
    let started = Instant::now();
    let mut polls = 0u32;

    while started.elapsed() < settings.timeout {
        polls += 1;
        match backend.status(job).await {
            Ok(JobStatus::Done { payload }) => {
                debug!(job_id = %job.id, polls, "job done");
                return Ok(payload);
            }
            Ok(JobStatus::Pending) => {}
            Err(e) => {
                warn!(job_id = %job.id, polls, "status check failed: {e}");
                return Err(e);
            }
        }
        tokio::time::sleep(settings.interval).await;
    }

    warn!(job_id = %job.id, polls, "job timed out");
    Err(ProviderError::Timeout {
        waited_ms: started.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted backend: reports Pending until `done_after` polls, then the
    /// scripted final answer.
    struct ScriptedBackend {
        job_id: String,
        done_after: Option<usize>,
        final_status: Mutex<Option<Result<JobStatus, ProviderError>>>,
        fail_on_poll: Option<usize>,
        polls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn done_after(polls: usize, payload: &str) -> Self {
            Self {
                job_id: "job-1".to_string(),
                done_after: Some(polls),
                final_status: Mutex::new(Some(Ok(JobStatus::Done {
                    payload: payload.to_string(),
                }))),
                fail_on_poll: None,
                polls: AtomicUsize::new(0),
            }
        }

        fn never_done() -> Self {
            Self {
                job_id: "job-1".to_string(),
                done_after: None,
                final_status: Mutex::new(None),
                fail_on_poll: None,
                polls: AtomicUsize::new(0),
            }
        }

        fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobBackend for ScriptedBackend {
        async fn submit(&self, _prompt: &str) -> Result<JobHandle, ProviderError> {
            Ok(JobHandle {
                id: self.job_id.clone(),
            })
        }

        async fn status(&self, _job: &JobHandle) -> Result<JobStatus, ProviderError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_poll == Some(n) {
                return Err(ProviderError::MalformedResponse("boom".to_string()));
            }
            match self.done_after {
                Some(after) if n >= after => self
                    .final_status
                    .lock()
                    .unwrap()
                    .take()
                    .unwrap_or(Ok(JobStatus::Pending)),
                _ => Ok(JobStatus::Pending),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_payload_after_n_polls() {
        let backend = ScriptedBackend::done_after(4, "aW1n");
        let started = Instant::now();

        let payload = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap();

        assert_eq!(payload, "aW1n");
        assert_eq!(backend.poll_count(), 4);
        // Three sleeps between four checks.
        assert_eq!(started.elapsed(), POLL_INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_done_times_out_at_bound() {
        let backend = ScriptedBackend::never_done();
        let started = Instant::now();

        let err = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Timeout { .. }));
        let elapsed = started.elapsed();
        assert!(elapsed >= POLL_TIMEOUT, "stopped early: {elapsed:?}");
        assert!(
            elapsed <= POLL_TIMEOUT + POLL_INTERVAL,
            "overran: {elapsed:?}"
        );
        assert_eq!(backend.poll_count(), 24);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_aborts_immediately() {
        let mut backend = ScriptedBackend::never_done();
        backend.fail_on_poll = Some(1);
        let started = Instant::now();

        let err = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
        assert_eq!(backend.poll_count(), 1, "no polling after a failed check");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_mid_loop_stops_polling() {
        let mut backend = ScriptedBackend::never_done();
        backend.fail_on_poll = Some(3);

        let err = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
        assert_eq!(backend.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_without_payload_is_failed_not_done() {
        let backend = ScriptedBackend::done_after(2, "unused");
        *backend.final_status.lock().unwrap() = Some(Err(ProviderError::MalformedResponse(
            "no generations".to_string(),
        )));

        let err = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
        assert_eq!(backend.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_job_id_fails_before_polling() {
        let mut backend = ScriptedBackend::done_after(1, "aW1n");
        backend.job_id = String::new();

        let err = run_job(&backend, "a cat", PollSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
        assert_eq!(backend.poll_count(), 0);
    }
}
