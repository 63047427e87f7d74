//! # Movie Tracker Runtime
//!
//! Runtime implementation for the movie tracker state container.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **`EffectHandle`**: Lets callers wait until the effects of one action are done
//!
//! ## Example
//!
//! ```ignore
//! use movie_tracker_runtime::Store;
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), environment);
//!
//! // Send an action
//! store.send(AppAction::Mount).await?;
//!
//! // Read state
//! let logged_in = store.state(|s| s.logged_in).await;
//! ```

use movie_tracker_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned by `send()` after shutdown was initiated. Actions produced by
        /// effects that finish after shutdown are dropped for the same reason.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects to settle or for a terminal action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that one action. Effects started by the actions those effects feed back are
/// not tracked here; use [`Store::settle`] to wait for the whole cascade.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects from this action that are still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: counter shared between an [`EffectHandle`] and the effects it tracks
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counters on drop
///
/// Ensures the counters are always decremented, even if the effect panics.
struct DecrementGuard {
    tracking: EffectTracking,
    pending: Arc<AtomicUsize>,
}

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.tracking.decrement();
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, DecrementGuard, Duration, Effect, EffectHandle,
        EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; reducers run one at a time)
    /// 2. Reducer (state transitions)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap and yields a handle to the same state.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action produced by an effect is broadcast here before it is
        /// reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast buffers 64 actions per observer.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 64)
        }

        /// Create a new Store with custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity);

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// The injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Whether [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Number of effects currently running, across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects asynchronously
        ///
        /// `send()` returns after starting effect execution, not completion.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.is_shut_down() {
                tracing::warn!(?action, "Rejecting action, store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(?action, "Reducing action");
            metrics::counter!("store.actions.sent").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &self.environment)
            };

            let (handle, tracking) = EffectHandle::new();
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by its effects
        ///
        /// Subscribes to the action broadcast before sending so the result
        /// cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the timeout
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read state via a closure
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Wait until no effect is running anywhere in the store
        ///
        /// Unlike [`EffectHandle::wait`] this covers effects started by
        /// fed-back actions too.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// the timeout expires.
        pub async fn settle(&self, timeout: Duration) -> Result<(), StoreError> {
            let start = std::time::Instant::now();

            while self.pending_effects() > 0 {
                if start.elapsed() >= timeout {
                    return Err(StoreError::Timeout);
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }

            Ok(())
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions and dropping actions
        /// fed back by in-flight effects), then waits for pending effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            match self.settle(timeout).await {
                Ok(()) => {
                    tracing::info!("All effects completed, shutdown successful");
                    Ok(())
                },
                Err(_) => {
                    let pending = self.pending_effects();
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    Err(StoreError::ShutdownTimeout(pending))
                },
            }
        }

        /// Feed an action produced by an effect back into the store
        async fn feed_back(&self, action: A) {
            if self.is_shut_down() {
                tracing::debug!(?action, "Dropping effect result, store was torn down");
                metrics::counter!("store.actions.dropped").increment(1);
                return;
            }

            let _ = self.action_broadcast.send(action.clone());

            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Effect result was not reduced");
                metrics::counter!("store.actions.dropped").increment(1);
            }
        }

        fn guard(&self, tracking: &EffectTracking) -> DecrementGuard {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            DecrementGuard {
                tracking: tracking.clone(),
                pending: Arc::clone(&self.pending_effects),
            }
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, feeds resulting action back if `Some`
        /// - `Parallel`: Executes effects concurrently
        /// - `Sequential`: Executes effects in order, waiting for each to complete
        ///
        /// Counters are incremented before spawning so `settle` never observes
        /// a gap between an effect finishing and the effects its action starts.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into tasks
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let guard = self.guard(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;

                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);

                    let guard = self.guard(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: Arc::new(sub_tx),
                            };

                            store.execute_effect(effect, sub_tracking.clone());

                            while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                if sub_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
            }
        }
    }
}
