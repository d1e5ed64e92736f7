//! One round at a time: check, fetch, parse, replace.

use crate::error::{Error, ErrorKind, Result};
use crate::fetch::{Sources, fetch_all};
use crate::oracle::VersionOracle;
use crate::state::{SyncOutcome, SyncReason, SyncState};
use horadric_cache::{Repository, SyncMetadata};
use horadric_extract::Catalog;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use time::UtcDateTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Clears the in-flight flag however the round ends, including when its
/// future is dropped.
struct InFlight<'a>(&'a AtomicBool);
impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the lifecycle state and runs sync rounds against one store.
pub struct Synchronizer {
    oracle: VersionOracle,
    sources: Sources,
    repo: Repository,
    timeout: Duration,
    state: watch::Sender<SyncState>,
    running: AtomicBool,
    cancel: CancellationToken,
}

impl Synchronizer {
    pub fn new(sources: Sources, product: impl Into<String>, repo: Repository) -> Self {
        let oracle = VersionOracle::new(sources.site.clone(), sources.pages.changelog.clone(), product);
        Self {
            oracle,
            sources,
            repo,
            timeout: DEFAULT_TIMEOUT,
            state: watch::Sender::new(SyncState::Idle),
            running: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Per-request timeout for every fetch, the changelog included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.oracle = self.oracle.with_timeout(timeout);
        self.timeout = timeout;
        self
    }

    /// Share a cancellation token with the caller. Cancelling it aborts a
    /// round that is still fetching and stops a spawned task.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The store this synchronizer writes to. Reads are fine at any time,
    /// they see the previous round's data until a replacement commits.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Run one round.
    ///
    /// Returns `Ok(None)` without doing anything when another round is
    /// already in flight. Any failure leaves the store exactly as it was and
    /// is also published as [`SyncState::Error`].
    #[instrument(skip(self))]
    pub async fn run(&self, reason: SyncReason) -> Result<Option<SyncOutcome>> {
        if self.running.swap(true, Ordering::AcqRel) {
            tracing::debug!("Sync already in progress; ignoring request");
            return Ok(None);
        }
        let _in_flight = InFlight(&self.running);
        self.state.send_replace(SyncState::Loading);
        match self.round(reason).await {
            Ok(outcome) => {
                tracing::info!(%outcome, "Sync finished");
                self.state.send_replace(SyncState::Success(outcome.clone()));
                Ok(Some(outcome))
            },
            Err(err) => {
                // If even this read fails the store is unusable, which is
                // the same as having nothing to show.
                let stale_data = self.repo.has_data().await.unwrap_or(false);
                let message = (*err).to_string();
                tracing::warn!(error = %message, stale_data, "Sync failed");
                self.state.send_replace(SyncState::Error { message, stale_data });
                Err(err)
            },
        }
    }

    async fn round(&self, reason: SyncReason) -> Result<SyncOutcome> {
        let stored = self.repo.sync_metadata().await.map_err(ErrorKind::persistence)?;
        let has_data = self.repo.has_data().await.map_err(ErrorKind::persistence)?;
        let check = self.cancellable(self.oracle.check(stored.as_ref().map(|m| &m.version))).await?;
        let version = check.release.version.clone();
        if reason == SyncReason::Routine && !check.changed && has_data {
            return Ok(SyncOutcome::UpToDate(version));
        }

        let fetched = self.cancellable(fetch_all(&self.sources, self.timeout)).await?;
        let fingerprint = fetched.fingerprint();
        let synced_at = UtcDateTime::now();
        let stored_fingerprint = stored.as_ref().and_then(|m| m.fingerprint.as_deref());
        if !check.changed && has_data && stored_fingerprint == Some(fingerprint.as_str()) {
            self.repo.touch_synced_at(synced_at).await.map_err(ErrorKind::persistence)?;
            return Ok(SyncOutcome::Unchanged(version));
        }

        // From here on the round runs to completion: no cancellation, no
        // timeouts.
        let inputs = fetched.into_inputs();
        let catalog = tokio::task::spawn_blocking(move || Catalog::build(&inputs))
            .await
            .map_err(|err| {
                Error::from(ErrorKind::Parse {
                    resource: "source tables".to_string(),
                    reason: err.to_string(),
                })
            })?
            .map_err(|err| {
                let reason = (*err).to_string();
                err.raise(ErrorKind::Parse {
                    resource: "source tables".to_string(),
                    reason,
                })
            })?;
        let metadata = SyncMetadata::new(&check.release, synced_at, fingerprint);
        self.repo.replace_all(&catalog, &metadata).await.map_err(ErrorKind::persistence)?;
        Ok(SyncOutcome::Updated(version))
    }

    async fn cancellable<T>(&self, stage: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::from(ErrorKind::Cancelled)),
            result = stage => result,
        }
    }

    /// Move the synchronizer onto its own task, driven through the returned
    /// handle. Must be called from within a Tokio runtime.
    pub fn spawn(self) -> SyncHandle {
        let sync = Arc::new(self);
        // One request can wait behind the current round; more are dropped.
        let (requests, mut incoming) = mpsc::channel::<SyncReason>(1);
        let task = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move {
                loop {
                    let reason = tokio::select! {
                        () = sync.cancel.cancelled() => break,
                        reason = incoming.recv() => match reason {
                            Some(reason) => reason,
                            None => break,
                        },
                    };
                    // Failures are published through the state channel.
                    _ = sync.run(reason).await;
                }
                tracing::debug!("Sync task stopped");
            }
        });
        SyncHandle { sync, requests, task }
    }
}

/// Handle to a spawned [`Synchronizer`].
pub struct SyncHandle {
    sync: Arc<Synchronizer>,
    requests: mpsc::Sender<SyncReason>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Ask for a round. Returns `false` when the request was ignored because
    /// a round is already in flight or queued.
    pub fn start(&self, reason: SyncReason) -> bool {
        if self.sync.is_running() {
            tracing::debug!(%reason, "Sync already in progress; ignoring request");
            return false;
        }
        self.requests.try_send(reason).is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.sync.subscribe()
    }

    pub fn status(&self) -> SyncState {
        self.sync.state()
    }

    pub fn repository(&self) -> &Repository {
        self.sync.repository()
    }

    /// Cancel any fetch in progress and wait for the task to stop.
    pub async fn shutdown(self) {
        self.sync.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::error!(error = %err, "Sync task panicked");
        }
    }
}
