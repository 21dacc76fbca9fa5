//! # Todolist Core
//!
//! The two abstractions everything else in the workspace is built on:
//!
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`. All
//!   view-model logic lives in reducers and is deterministic.
//! - **Effect**: a *description* of a side effect (usually an API call).
//!   Reducers return effects; the runtime executes them and feeds the
//!   resulting actions back into the reducer.
//!
//! ## Example
//!
//! ```
//! use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Count(u32);
//!
//! enum CountAction {
//!     Bump,
//! }
//!
//! struct CountReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = Count;
//!     type Action = CountAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Count,
//!         action: CountAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CountAction>; 4]> {
//!         match action {
//!             CountAction::Bump => state.0 += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Count::default();
//! CountReducer.reduce(&mut state, CountAction::Bump, &());
//! assert_eq!(state.0, 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for view-model logic
pub mod reducer {
    use super::{effect::Effect, SmallVec};

    /// Pure state transition function.
    ///
    /// Reducers mutate state in place and return the effects that should run
    /// as a consequence. They never perform I/O themselves.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
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
    use std::future::Future;
    use std::pin::Pin;

    /// Describes a side effect to be executed by the runtime.
    ///
    /// Effects are values: building one does nothing until the `Store`
    /// executes it.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
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
        /// Wrap an async computation that always produces a feedback action.
        pub fn run<F>(fut: F) -> Self
        where
            F: Future<Output = Action> + Send + 'static,
            Action: 'static,
        {
            Effect::Future(Box::pin(async move { Some(fut.await) }))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Returns `true` for [`Effect::None`] and for empty `Parallel` groups.
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
