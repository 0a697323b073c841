//! # Auction Desk Runtime
//!
//! The [`Store`] owns a workflow's state, runs its reducer and executes the
//! effects the reducer returns.
//!
//! ## Effect execution
//!
//! ```text
//! send(action)
//!   ├─ write-lock state, reduce → effects
//!   ├─ release lock
//!   └─ spawn effect task ──► Effect::Future resolves ──► Some(action)
//!                                   ▲                        │
//!                                   └──── reduce again ◄─────┘
//! ```
//!
//! The state lock is never held across an effect, so readers observe
//! intermediate states such as "submitting" while a request is in flight.
//! [`EffectHandle::wait`] resolves once the whole feedback cascade settles.

pub use error::StoreError;

/// Error types for store operations
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// The spawned effect task failed
        ///
        /// This typically means an effect panicked.
        #[error("Effect task failed: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),
    }
}

use auction_desk_core::{SmallVec, effect::Effect, reducer::Reducer};
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

/// Capacity of the channel that broadcasts effect-produced actions
const ACTION_BROADCAST_CAPACITY: usize = 64;

/// Handle to the effects started by one [`Store::send`] call
#[derive(Debug)]
pub struct EffectHandle {
    task: JoinHandle<()>,
}

impl EffectHandle {
    /// Wait until every effect of the action, and every effect of the
    /// actions they fed back, has settled.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoinError`] if the effect task panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        self.task.await?;
        Ok(())
    }

    /// Whether the effect cascade has already settled
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

struct StoreInner<S, A, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    action_broadcast: broadcast::Sender<A>,
}

/// The Store - runtime for one reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(BidderNumberState::default(), BidderNumberReducer::new(), env);
///
/// store
///     .send_and_settle(BidderNumberAction::Submit { event_id, guest_id, input: "150".into() })
///     .await?;
///
/// let status = store.state(|s| s.status(&guest_id).clone()).await;
/// ```
pub struct Store<S, A, E, R> {
    inner: Arc<StoreInner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (action_broadcast, _) = broadcast::channel(ACTION_BROADCAST_CAPACITY);

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                action_broadcast,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// The reducer runs before this returns; its effects run on a spawned
    /// task tracked by the returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        let effects = self.reduce(action).await;
        let store = self.clone();
        let task = tokio::spawn(async move { store.run_effects(effects).await });

        Ok(EffectHandle { task })
    }

    /// Send an action and wait for its whole effect cascade to settle
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down, or [`StoreError::TaskJoinError`] if an effect panicked.
    pub async fn send_and_settle(&self, action: A) -> Result<(), StoreError> {
        self.send(action).await?.wait().await
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let selected = store.state(|s| s.selection_len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Subscribe to actions produced by effects
    ///
    /// Only feedback actions are broadcast, never the action passed to `send`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<A> {
        self.inner.action_broadcast.subscribe()
    }

    /// Stop accepting new actions
    ///
    /// Effects already running still complete, but the actions they produce
    /// are dropped instead of being reduced.
    pub fn shutdown(&self) {
        if !self.inner.shutdown.swap(true, Ordering::AcqRel) {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);
        }
    }

    /// Whether [`Store::shutdown`] has been called
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }

    async fn reduce(&self, action: A) -> SmallVec<[Effect<A>; 4]> {
        metrics::counter!("store.actions.total").increment(1);

        let mut state = self.inner.state.write().await;
        let effects = self
            .inner
            .reducer
            .reduce(&mut state, action, &self.inner.environment);

        tracing::trace!("Reducer completed, returned {} effects", effects.len());
        effects
    }

    fn run_effects(&self, effects: SmallVec<[Effect<A>; 4]>) -> BoxFuture<'static, ()> {
        let pending: Vec<_> = effects
            .into_iter()
            .map(|effect| self.execute_effect(effect))
            .collect();

        Box::pin(async move {
            future::join_all(pending).await;
        })
    }

    fn execute_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                Box::pin(future::ready(()))
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);

                let pending: Vec<_> = effects
                    .into_iter()
                    .map(|effect| self.execute_effect(effect))
                    .collect();

                Box::pin(async move {
                    future::join_all(pending).await;
                })
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let store = self.clone();

                Box::pin(async move {
                    let Some(action) = fut.await else {
                        tracing::trace!("Effect::Future completed with no action");
                        return;
                    };

                    // Broadcast to observers before reducing
                    let _ = store.inner.action_broadcast.send(action.clone());

                    if store.is_shutting_down() {
                        tracing::warn!("Dropping feedback action: store is shutting down");
                        metrics::counter!("store.shutdown.dropped_actions").increment(1);
                        return;
                    }

                    let effects = store.reduce(action).await;
                    store.run_effects(effects).await;
                })
            },
        }
    }
}
