//! # Auction Desk Core
//!
//! Reducer, effect and environment abstractions shared by the auction desk
//! workflows (bidder-number assignment, bulk attendee cancellation, attendee
//! import).
//!
//! ## Core Concepts
//!
//! - **State**: the view model of one workflow (per-guest assignment status,
//!   current selection, pending notices)
//! - **Action**: every input to a reducer, user intents and network outcomes alike
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: description of a side effect, executed by the runtime `Store`
//! - **Environment**: injected dependencies (API client, read models, clock)
//!
//! Network round trips never happen inside a reducer. A reducer returns an
//! [`effect::Effect::Future`] that performs the call and yields the outcome
//! action, which the store feeds back into the same reducer.
//!
//! ## Example
//!
//! ```ignore
//! use auction_desk_core::{effect::Effect, reducer::Reducer, SmallVec, smallvec};
//!
//! impl Reducer for BidderNumberReducer {
//!     type State = BidderNumberState;
//!     type Action = BidderNumberAction;
//!     type Environment = DeskEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BidderNumberState,
//!         action: BidderNumberAction,
//!         env: &DeskEnvironment,
//!     ) -> SmallVec<[Effect<BidderNumberAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

mod effect_macros;

/// Reducer module - the core trait for workflow logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Type Parameters
    ///
    /// - `State`: The view model this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns the effects the runtime should
        /// execute. Most actions produce at most a couple of effects, so the
        /// result is a `SmallVec` with inline capacity for four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    use futures::future::BoxFuture;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are values returned from reducers. The runtime `Store`
    /// executes them and feeds any produced action back into the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently; the store waits for all of them to settle
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Notices and batch records are timestamped through this trait so tests
    /// can pin the time with a fixed clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
