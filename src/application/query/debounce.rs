//! Trailing-edge debouncing for values and callbacks.
//!
//! Every update cancels the pending timer and starts a new one, so a steady
//! stream of updates keeps the settled side unchanged until a pause of at
//! least `delay`. There is no leading edge and no max-wait ceiling.
//!
//! Timers are tokio tasks: updates must happen inside a tokio runtime.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// At most one scheduled task; scheduling a new one aborts the previous.
#[derive(Debug, Default)]
struct PendingTimer {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PendingTimer {
    fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Deadline is fixed now, not when the task is first polled.
        let deadline = Instant::now() + delay;
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            previous.abort();
        }
        *task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action.await;
        }));
    }

    fn cancel(&self) -> bool {
        match self.task.lock().take() {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    fn is_pending(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PendingTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

/// A value with an immediate side, written on every update, and a settled
/// side, written once updates have been quiet for `delay`.
pub struct Debounced<T> {
    delay: Duration,
    immediate: Mutex<T>,
    settled: Arc<watch::Sender<T>>,
    timer: PendingTimer,
}

impl<T> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Both sides start at `value`.
    pub fn new(value: T, delay: Duration) -> Self {
        let (settled, _) = watch::channel(value.clone());
        Self {
            delay,
            immediate: Mutex::new(value),
            settled: Arc::new(settled),
            timer: PendingTimer::default(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Write the immediate side and restart the quiescence window.
    pub fn set(&self, value: T) {
        *self.immediate.lock() = value.clone();
        let settled = Arc::clone(&self.settled);
        self.timer.schedule(self.delay, async move {
            settled.send_replace(value);
        });
    }

    pub fn immediate(&self) -> T {
        self.immediate.lock().clone()
    }

    pub fn settled(&self) -> T {
        self.settled.borrow().clone()
    }

    /// Receiver notified each time the settled side is written.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.subscribe()
    }

    /// Whether an update is still waiting for its quiescence window.
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Settle the current immediate value now, dropping the pending timer.
    pub fn flush(&self) {
        if self.timer.cancel() {
            self.settled.send_replace(self.immediate());
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.delay)
            .field("immediate", &*self.immediate.lock())
            .field("settled", &*self.settled.borrow())
            .finish()
    }
}

/// A side-effecting function whose invocations are debounced.
///
/// Only the arguments of the last call in a burst are delivered. Dropping
/// the callback cancels any pending invocation.
pub struct DebouncedCallback<A> {
    callback: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    timer: PendingTimer,
}

impl<A> DebouncedCallback<A>
where
    A: Send + 'static,
{
    pub fn new<F>(callback: F, delay: Duration) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            delay,
            timer: PendingTimer::default(),
        }
    }

    pub fn call(&self, args: A) {
        let callback = Arc::clone(&self.callback);
        self.timer.schedule(self.delay, async move {
            callback(args);
        });
    }

    /// Drop the pending invocation, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        self.timer.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
