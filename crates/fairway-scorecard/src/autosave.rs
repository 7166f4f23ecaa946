use std::ops::Add;
use std::time::Duration;

/// Fires once a quiet period has passed since the last change.
///
/// Callers supply the current instant; `I` is `std::time::Instant` or
/// `tokio::time::Instant`.
#[derive(Debug, Clone)]
pub struct Debouncer<I> {
    quiet: Duration,
    last_touch: Option<I>,
}

impl<I> Debouncer<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_touch: None,
        }
    }

    /// Record a change. Any pending deadline moves out.
    pub fn touch(&mut self, now: I) {
        self.last_touch = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_touch.is_some()
    }

    pub fn deadline(&self) -> Option<I> {
        self.last_touch.map(|t| t + self.quiet)
    }

    pub fn is_due(&self, now: I) -> bool {
        self.deadline().is_some_and(|d| now >= d)
    }

    /// True at most once per burst of changes.
    pub fn take_due(&mut self, now: I) -> bool {
        if self.is_due(now) {
            self.last_touch = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.last_touch = None;
    }
}

#[cfg(not(target_family = "wasm"))]
pub use worker::{AutosaveHandle, spawn_autosave};

#[cfg(not(target_family = "wasm"))]
mod worker {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    use super::Debouncer;
    use crate::persist::save;
    use crate::round::RoundState;
    use crate::storage::KeyValueStore;

    /// Sender side of a running autosave worker.
    pub struct AutosaveHandle<S> {
        tx: mpsc::UnboundedSender<RoundState>,
        task: JoinHandle<S>,
    }

    impl<S> AutosaveHandle<S> {
        /// Queue a snapshot. It replaces any snapshot still waiting to be written.
        pub fn submit(&self, state: RoundState) -> bool {
            self.tx.send(state).is_ok()
        }

        /// Flush the pending snapshot and hand the store back.
        pub async fn shutdown(self) -> Option<S> {
            drop(self.tx);
            match self.task.await {
                Ok(store) => Some(store),
                Err(e) => {
                    tracing::error!(error = %e, "autosave worker failed");
                    None
                },
            }
        }
    }

    /// Start a worker that writes the latest snapshot under `key` once no new
    /// snapshot has arrived for `quiet`.
    pub fn spawn_autosave<S>(store: S, key: String, quiet: Duration) -> AutosaveHandle<S>
    where
        S: KeyValueStore + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_autosave(store, key, quiet, rx));
        AutosaveHandle { tx, task }
    }

    async fn run_autosave<S: KeyValueStore>(
        mut store: S,
        key: String,
        quiet: Duration,
        mut rx: mpsc::UnboundedReceiver<RoundState>,
    ) -> S {
        let mut debounce = Debouncer::<Instant>::new(quiet);
        let mut pending: Option<RoundState> = None;

        loop {
            let wake = debounce.deadline().unwrap_or_else(|| Instant::now() + quiet);
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(state) => {
                        pending = Some(state);
                        debounce.touch(Instant::now());
                    },
                    None => break,
                },
                _ = tokio::time::sleep_until(wake), if debounce.is_pending() => {
                    if debounce.take_due(Instant::now())
                        && let Some(state) = pending.take()
                    {
                        save(&mut store, &key, &state);
                    }
                },
            }
        }

        if let Some(state) = pending.take() {
            tracing::debug!("flushing pending autosave");
            save(&mut store, &key, &state);
        }
        store
    }
}
