//! Debounce and throttle for async callbacks on a tokio runtime.
//!
//! Both wrappers only ever cancel their own *timer*. Once a callback has
//! started it runs to completion even if newer calls arrive.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

type BoxedCallback<T> =
    Arc<dyn Fn(T) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

fn boxed<T, F, Fut>(callback: F) -> BoxedCallback<T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |args| Box::pin(callback(args)))
}

/// Runs `callback` with the arguments of the most recent `call`, once `delay`
/// has passed without another call.
pub struct Debouncer<T> {
    handle: Handle,
    delay: Duration,
    callback: BoxedCallback<T>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            delay: self.delay,
            callback: self.callback.clone(),
            pending: self.pending.clone(),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(handle: Handle, delay: Duration, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle,
            delay,
            callback: boxed(callback),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Restart the quiet period; `args` replaces any previously pending arguments.
    pub fn call(&self, args: T) {
        let mut pending = self.pending.lock();
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        let callback = self.callback.clone();
        let delay = self.delay;
        let handle = self.handle.clone();
        *pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later call cannot abort a running callback.
            handle.spawn(callback(args));
        }));
    }

    /// Whether a trailing execution is still waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

struct ThrottleState {
    last_run: Option<Instant>,
    trailing: Option<JoinHandle<()>>,
}

/// Runs `callback` at most once per `window`.
///
/// A call outside the window runs immediately. Calls inside the window
/// schedule a single trailing run at the end of the window, carrying the
/// arguments of the call that scheduled it; further calls are dropped until
/// that trailing run fires.
pub struct Throttler<T> {
    handle: Handle,
    window: Duration,
    callback: BoxedCallback<T>,
    state: Arc<Mutex<ThrottleState>>,
}

impl<T: Send + 'static> Throttler<T> {
    pub fn new<F, Fut>(handle: Handle, window: Duration, callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle,
            window,
            callback: boxed(callback),
            state: Arc::new(Mutex::new(ThrottleState {
                last_run: None,
                trailing: None,
            })),
        }
    }

    pub fn call(&self, args: T) {
        let now = Instant::now();
        let mut state = self.state.lock();

        let remaining = match state.last_run {
            Some(last) => self.window.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        };

        if remaining.is_zero() {
            state.last_run = Some(now);
            drop(state);
            self.handle.spawn((self.callback)(args));
            return;
        }

        if state.trailing.as_ref().is_some_and(|t| !t.is_finished()) {
            tracing::trace!("Throttled call dropped, trailing run already scheduled");
            return;
        }

        let callback = self.callback.clone();
        let shared = self.state.clone();
        let handle = self.handle.clone();
        state.trailing = Some(self.handle.spawn(async move {
            tokio::time::sleep(remaining).await;
            {
                let mut state = shared.lock();
                state.last_run = Some(Instant::now());
                state.trailing = None;
            }
            handle.spawn(callback(args));
        }));
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
