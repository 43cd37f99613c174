//! Widget refresh scheduler
//!
//! Each widget gets one tokio task that fetches immediately, then again
//! every interval, and whenever [`PollerHandle::refresh`] is called. Fetches
//! are spawned rather than awaited inline, so a slow fetch can overlap the
//! next tick; ticket ordering in [`WidgetState`] decides which result wins.
//! At most [`MAX_IN_FLIGHT`] fetches run at once, so a source that never
//! answers cannot pile up requests.
//!
//! Stopping a poller cancels its timer, aborts fetches still in flight and
//! refuses any result that races the stop.

mod backoff;
mod state;

pub use backoff::Backoff;
pub use state::{Phase, Ticket, WidgetError, WidgetSnapshot, WidgetState};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

/// One widget's data source
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    fn name(&self) -> &str;

    /// Text shown in place of data after a failed fetch
    fn failure_message(&self) -> &str {
        "Unavailable"
    }

    async fn fetch(&self) -> anyhow::Result<Self::Output>;
}

async fn fetch_result<F: Fetch + ?Sized>(fetcher: &F) -> Result<F::Output, WidgetError> {
    fetcher.fetch().await.map_err(|e| {
        tracing::warn!(widget = fetcher.name(), "Fetch failed: {:#}", e);
        WidgetError::new(fetcher.failure_message(), format!("{:#}", e))
    })
}

/// Fetch once without a poller
pub async fn poll_once<F: Fetch + ?Sized>(fetcher: &F) -> WidgetSnapshot<F::Output> {
    let mut state = WidgetState::new(fetcher.name());
    let ticket = state.begin();
    state.commit(ticket, fetch_result(fetcher).await);
    state.snapshot()
}

/// Type-erased control over a running poller
pub trait WidgetControl: Send + Sync {
    fn name(&self) -> &str;
    fn refresh(&self);
    fn stop(&self);
}

pub struct Poller<F: Fetch> {
    fetcher: Arc<F>,
    interval: Duration,
    backoff: Backoff,
}

impl<F: Fetch> Poller<F> {
    pub fn new(fetcher: F, interval: Duration) -> Self {
        Self::from_arc(Arc::new(fetcher), interval)
    }

    pub fn from_arc(fetcher: Arc<F>, interval: Duration) -> Self {
        Self {
            fetcher,
            interval,
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Start polling on the current runtime
    pub fn spawn(self) -> PollerHandle<F::Output> {
        let name = self.fetcher.name().to_string();
        let state = WidgetState::new(name.clone());
        let (updates, _) = watch::channel(state.snapshot());

        let inner = Arc::new(PollerInner {
            state: Mutex::new(state),
            updates,
            refresh: Notify::new(),
            stop: Notify::new(),
            task: Mutex::new(None),
        });

        tracing::debug!(widget = %name, "Polling every {:?}", self.interval);
        let task = tokio::spawn(run(self, inner.clone()));
        *inner.task.lock() = Some(task);

        PollerHandle { name, inner }
    }
}

struct PollerInner<T> {
    state: Mutex<WidgetState<T>>,
    updates: watch::Sender<WidgetSnapshot<T>>,
    refresh: Notify,
    stop: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone> PollerInner<T> {
    fn begin(&self) -> Option<Ticket> {
        let mut state = self.state.lock();
        if state.is_stopped() {
            return None;
        }
        let ticket = state.begin();
        self.updates.send_replace(state.snapshot());
        Some(ticket)
    }

    fn commit(&self, ticket: Ticket, result: Result<T, WidgetError>) -> bool {
        let mut state = self.state.lock();
        let applied = state.commit(ticket, result);
        if applied {
            self.updates.send_replace(state.snapshot());
        }
        applied
    }

    fn failures(&self) -> u32 {
        self.state.lock().consecutive_failures()
    }
}

/// Fetches one poller may have outstanding; ticks beyond this are skipped
pub const MAX_IN_FLIGHT: usize = 2;

async fn run<F: Fetch>(poller: Poller<F>, inner: Arc<PollerInner<F::Output>>) {
    let Poller {
        fetcher,
        interval,
        backoff,
    } = poller;
    let mut in_flight = JoinSet::new();
    let mut issued_at = Instant::now();

    loop {
        if in_flight.len() < MAX_IN_FLIGHT {
            let Some(ticket) = inner.begin() else {
                return;
            };
            issued_at = Instant::now();
            let fetcher = fetcher.clone();
            in_flight.spawn(async move { (ticket, fetch_result(&*fetcher).await) });
        } else {
            tracing::debug!(
                widget = fetcher.name(),
                "Skipping tick, {} fetches still running",
                in_flight.len()
            );
        }

        let next = tokio::time::sleep(backoff.delay(interval, inner.failures()));
        tokio::pin!(next);

        loop {
            tokio::select! {
                biased;

                _ = inner.stop.notified() => {
                    in_flight.abort_all();
                    return;
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok((ticket, result)) => {
                        if inner.commit(ticket, result) {
                            let delay = backoff.delay(interval, inner.failures());
                            next.as_mut().reset(issued_at + delay);
                        }
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::error!("Widget fetch panicked: {}", e),
                },
                _ = inner.refresh.notified() => break,
                _ = &mut next => break,
            }
        }
    }
}

/// Handle to a running poller
pub struct PollerHandle<T> {
    name: String,
    inner: Arc<PollerInner<T>>,
}

impl<T> Clone for PollerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PollerHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot<T>> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> WidgetSnapshot<T> {
        self.inner.state.lock().snapshot()
    }

    /// Fetch now; the regular timer restarts from this fetch
    pub fn refresh(&self) {
        self.inner.refresh.notify_one();
    }

    /// Fetch once after `delay`
    pub fn refresh_after(&self, delay: Duration) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.refresh.notify_one();
        });
    }

    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        if state.is_stopped() {
            return;
        }
        state.stop();
        self.inner.updates.send_replace(state.snapshot());
        drop(state);

        self.inner.stop.notify_one();
        tracing::debug!(widget = %self.name, "Poller stopped");
    }

    /// Stop and wait for the polling task to exit
    pub async fn shutdown(&self) {
        self.stop();
        let task = self.inner.task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

impl<T: Clone + Send + Sync + 'static> WidgetControl for PollerHandle<T> {
    fn name(&self) -> &str {
        PollerHandle::name(self)
    }

    fn refresh(&self) {
        PollerHandle::refresh(self)
    }

    fn stop(&self) {
        PollerHandle::stop(self)
    }
}
