//! Session driver: polling, smoothing and the one-shot completion handler

use super::listener::MonitorListener;
use super::session::{MonitorSession, Transition};
use super::trigger::DownloadTrigger;
use super::types::{ArtifactKind, CompletionSummary, DisplayState, DownloadUrls, ProgressSnapshot};
use crate::api::ApiClient;
use crate::config::MonitorConfig;
use crate::error::PollError;
use futures_util::future::{join_all, BoxFuture, Fuse, FusedFuture, FutureExt};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// How a monitoring session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    /// The backend reported `failed`.
    Failed,
    /// A status request failed; carries the error text.
    PollFailed(String),
    /// Hidden, switched to another job, or dropped.
    Cancelled,
}

struct Shared {
    client: ApiClient,
    config: MonitorConfig,
    listener: Arc<dyn MonitorListener>,
    downloads: Arc<dyn DownloadTrigger>,
    session: Mutex<MonitorSession>,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, MonitorSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct ActiveSession {
    job_id: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<SessionEnd>>,
    outcome: Option<SessionEnd>,
}

/// Watches one processing job at a time.
///
/// `show` starts a session (an immediate poll, then one per poll interval,
/// plus the smoothing ticks); `hide` cancels it and resets all state.
/// Dropping the monitor hides it. Must be used inside a Tokio runtime.
pub struct ProgressMonitor {
    shared: Arc<Shared>,
    active: Option<ActiveSession>,
}

impl ProgressMonitor {
    pub fn new(
        client: ApiClient,
        config: MonitorConfig,
        listener: Arc<dyn MonitorListener>,
        downloads: Arc<dyn DownloadTrigger>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                config,
                listener,
                downloads,
                session: Mutex::new(MonitorSession::new()),
            }),
            active: None,
        }
    }

    /// Make the monitor visible for `job_id`.
    ///
    /// Showing the job already on screen is a no-op; showing another job
    /// replaces the current session.
    pub fn show(&mut self, job_id: &str) {
        if self.active.as_ref().is_some_and(|a| a.job_id == job_id) {
            return;
        }
        self.hide();

        let generation = self.shared.session().begin(job_id);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_session(
            self.shared.clone(),
            job_id.to_string(),
            generation,
            cancel.clone(),
        ));

        self.active = Some(ActiveSession {
            job_id: job_id.to_string(),
            cancel,
            handle: Some(handle),
            outcome: None,
        });
    }

    /// Stop the current session and reset everything, completion latch included.
    pub fn hide(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("monitor_hide: {}", active.job_id);
            active.cancel.cancel();
        }
        self.shared.session().end();
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.job_id.as_str())
    }

    pub fn display(&self) -> DisplayState {
        self.shared.session().display()
    }

    /// Wait for the current session to stop. `None` when hidden.
    ///
    /// A completed session is only reported after its downloads finished.
    pub async fn wait(&mut self) -> Option<SessionEnd> {
        let active = self.active.as_mut()?;
        // The handle stays in place until it resolves, so a dropped `wait`
        // can be retried.
        if let Some(handle) = active.handle.as_mut() {
            let outcome = handle.await.unwrap_or(SessionEnd::Cancelled);
            active.handle = None;
            active.outcome = Some(outcome);
        }
        active.outcome.clone()
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

async fn run_session(
    shared: Arc<Shared>,
    job_id: String,
    generation: u64,
    cancel: CancellationToken,
) -> SessionEnd {
    info!("monitor_start: {} generation={}", job_id, generation);

    let mut poll = interval(shared.config.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut smoothing = interval(shared.config.smoothing_interval);
    smoothing.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut request: Fuse<BoxFuture<'_, Result<ProgressSnapshot, PollError>>> = Fuse::terminated();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("monitor_cancelled: {}", job_id);
                return SessionEnd::Cancelled;
            }
            result = &mut request, if !request.is_terminated() => {
                let snapshot = match result {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        warn!("monitor_poll_failed: {} error={}", job_id, err);
                        if shared.session().is_current(generation) {
                            shared.listener.on_error(&err);
                        }
                        return SessionEnd::PollFailed(err.to_string());
                    }
                };

                let (transition, state) = {
                    let mut session = shared.session();
                    let transition = session.apply(generation, snapshot);
                    (transition, session.display())
                };

                match transition {
                    Transition::Stale => return SessionEnd::Cancelled,
                    Transition::Progress => shared.listener.on_update(&state),
                    Transition::AlreadyCompleted => {
                        shared.listener.on_update(&state);
                        return SessionEnd::Completed;
                    }
                    Transition::Failed => {
                        info!("monitor_failed: {} message={:?}", job_id, state.message);
                        shared.listener.on_update(&state);
                        return SessionEnd::Failed;
                    }
                    Transition::Completed(summary) => {
                        info!("monitor_completed: {}", job_id);
                        shared.listener.on_update(&state);
                        complete(&shared, summary, &cancel).await;
                        return SessionEnd::Completed;
                    }
                }
            }
            _ = poll.tick(), if request.is_terminated() => {
                request = shared.client.fetch_progress(&job_id).boxed().fuse();
            }
            _ = smoothing.tick() => {
                let moved = {
                    let mut session = shared.session();
                    session.tick(generation).then(|| session.display())
                };
                if let Some(state) = moved {
                    shared.listener.on_update(&state);
                }
            }
        }
    }
}

/// Completion handler body. Runs once per session, guarded by the latch in
/// `MonitorSession::apply`.
async fn complete(shared: &Arc<Shared>, summary: CompletionSummary, cancel: &CancellationToken) {
    let artifacts = artifact_urls(&shared.config, summary.download_urls.as_ref());
    let downloads = start_downloads(shared, artifacts);

    // Notify from a separate task, never from inside the update that saw completion.
    let listener = shared.listener.clone();
    let notify = tokio::spawn(async move { listener.on_complete(summary) });
    let _ = notify.await;

    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = downloads => {}
    }
}

fn artifact_urls(config: &MonitorConfig, urls: Option<&DownloadUrls>) -> Vec<(ArtifactKind, String)> {
    urls.map(|urls| {
        urls.in_order(config.download_package)
            .into_iter()
            .map(|(kind, url)| (kind, config.resolve(url)))
            .collect()
    })
    .unwrap_or_default()
}

/// Trigger the first artifact now and each following one after the configured
/// delay, so two back-to-back downloads are never started together.
fn start_downloads(shared: &Arc<Shared>, artifacts: Vec<(ArtifactKind, String)>) -> JoinHandle<()> {
    let mut artifacts = artifacts.into_iter();
    let first = artifacts
        .next()
        .map(|(kind, url)| fire_download(&shared.downloads, kind, url));
    let rest: Vec<_> = artifacts.collect();

    let downloads = shared.downloads.clone();
    let delay = shared.config.second_download_delay;
    tokio::spawn(async move {
        let mut pending: Vec<JoinHandle<()>> = first.into_iter().collect();
        for (kind, url) in rest {
            sleep(delay).await;
            pending.push(fire_download(&downloads, kind, url));
        }
        join_all(pending).await;
    })
}

fn fire_download(downloads: &Arc<dyn DownloadTrigger>, kind: ArtifactKind, url: String) -> JoinHandle<()> {
    info!("artifact_trigger: {} {}", kind, url);
    let download = downloads.trigger(kind, url.clone());
    tokio::spawn(async move {
        if let Err(e) = download.await {
            warn!("artifact_download_failed: {} {} error={}", kind, url, e);
        }
    })
}
