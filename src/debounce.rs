//! Collapsing bursts of calls into one trailing call.
//!
//! A [`Debounced`] function keeps a single timer. Every [`call`] restarts
//! it, replaces the pending arguments and adds the caller to the waiting
//! list. When the timer fires the function runs once, with the most recent
//! arguments, and every waiting caller receives a clone of that result.
//!
//! [`call`]: Debounced::call

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Why a debounced call did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DebounceError<E> {
    /// The call was cancelled, or flushed, before its timer fired.
    #[error("debounced call was cancelled")]
    Cancelled,
    /// The underlying function failed.
    #[error(transparent)]
    Failed(E),
}

type Outcome<T, E> = Result<T, DebounceError<E>>;
type Func<A, T, E> = dyn Fn(A) -> Result<T, E> + Send + Sync;

struct State<A, T, E> {
    args: Option<A>,
    waiters: Vec<oneshot::Sender<Outcome<T, E>>>,
    timer: Option<JoinHandle<()>>,
    // bumped on every call and cancel so a stale timer cannot fire
    epoch: u64,
}

struct Shared<A, T, E> {
    func: Box<Func<A, T, E>>,
    delay: Duration,
    state: Mutex<State<A, T, E>>,
}

impl<A, T, E> Shared<A, T, E> {
    fn lock(&self) -> MutexGuard<'_, State<A, T, E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A function whose calls are debounced by a fixed delay.
///
/// Timers run on the ambient tokio runtime, so [`Debounced::call`] must be
/// made from within one.
pub struct Debounced<A, T, E> {
    shared: Arc<Shared<A, T, E>>,
}

impl<A, T, E> Clone for Debounced<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, T, E> Debounced<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new<F>(delay: Duration, func: F) -> Self
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                func: Box::new(func),
                delay,
                state: Mutex::new(State {
                    args: None,
                    waiters: Vec::new(),
                    timer: None,
                    epoch: 0,
                }),
            }),
        }
    }

    /// Schedules a call with `args`, restarting the delay.
    ///
    /// The returned future resolves once the timer fires (with the result of
    /// the one call made for the whole burst) or with
    /// [`DebounceError::Cancelled`] if the burst is cancelled or flushed.
    pub fn call(&self, args: A) -> Pending<T, E> {
        let (tx, rx) = oneshot::channel();
        let mut state = self.shared.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.epoch += 1;
        state.args = Some(args);
        state.waiters.push(tx);

        let epoch = state.epoch;
        let shared = Arc::clone(&self.shared);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.delay).await;
            fire(&shared, epoch);
        }));
        Pending { rx }
    }

    /// Fails every pending caller with [`DebounceError::Cancelled`] and
    /// stops the timer.
    pub fn cancel(&self) {
        let waiters = {
            let mut state = self.shared.lock();
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.epoch += 1;
            state.args = None;
            std::mem::take(&mut state.waiters)
        };
        if !waiters.is_empty() {
            tracing::debug!(callers = waiters.len(), "cancelling debounced call");
        }
        for waiter in waiters {
            let _ = waiter.send(Err(DebounceError::Cancelled));
        }
    }

    /// Cancels any pending burst, then runs the function right away with
    /// `args` and returns its result.
    pub fn flush(&self, args: A) -> Result<T, E> {
        self.cancel();
        (self.shared.func)(args)
    }

    /// Whether a call is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().timer.is_some()
    }
}

fn fire<A, T, E>(shared: &Shared<A, T, E>, epoch: u64)
where
    T: Clone,
    E: Clone,
{
    let (args, waiters) = {
        let mut state = shared.lock();
        if state.epoch != epoch {
            return;
        }
        state.timer = None;
        (state.args.take(), std::mem::take(&mut state.waiters))
    };
    let Some(args) = args else {
        return;
    };
    tracing::trace!(callers = waiters.len(), "firing debounced call");
    let result = (shared.func)(args);
    for waiter in waiters {
        let _ = waiter.send(result.clone().map_err(DebounceError::Failed));
    }
}

/// The eventual result of a [`Debounced::call`].
#[must_use = "a pending call does nothing unless awaited"]
pub struct Pending<T, E> {
    rx: oneshot::Receiver<Outcome<T, E>>,
}

impl<T, E> Future for Pending<T, E> {
    type Output = Outcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // a dropped sender means the debouncer itself went away
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(DebounceError::Cancelled)))
    }
}
