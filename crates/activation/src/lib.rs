#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Activation primitives for guarded routes.
//!
//! A route activation runs three independent evaluation channels before its
//! view may render:
//!
//! - **Guards** ([`GuardEvaluator`]): ordered boolean checks, awaited one at a
//!   time and short-circuited on the first denial.
//! - **Resolvers** ([`ResolverEvaluator`]): named data providers, awaited
//!   concurrently and failed as a set.
//! - **Lazy load** ([`LazyLoadEvaluator`]): the deferred fetch of the view
//!   itself, observed only for its outcome.
//!
//! Every channel reports through the same [`Status`] model, and every
//! subscriber sees de-duplicated transitions through a [`StatusNotifier`].
//! Evaluations are scoped to one activation by an [`ActivationToken`]; results
//! carrying a stale generation are dropped by the owner.

pub mod channel;
pub mod error;
pub mod guard;
pub mod lazy;
pub mod notifier;
pub mod resolver;
mod spawn;
pub mod status;
pub mod token;

pub use channel::Channel;
pub use error::{BoxError, EvalError, FailureKind, Result, SharedError};
pub use guard::{Guard, GuardEvaluator, GuardFuture, GuardSpec, IntoGuardResult};
pub use lazy::{LazyLoadEvaluator, LazyLoader, LazyOutcome, LoadFuture};
pub use notifier::StatusNotifier;
pub use resolver::{ResolvedData, ResolvedValue, Resolver, ResolverEvaluator, ResolverFuture, ResolverSpec};
pub use spawn::spawn_evaluation;
pub use status::Status;
pub use token::{ActivationToken, GenerationClock};
