//! Ordered, fail-fast execution of named asynchronous steps.
//!
//! A [`Chain`] holds an explicit sequence of named steps. Running it executes
//! the steps strictly in order: each step starts only after the previous one
//! has settled, and each step is handed the mapping of results accumulated
//! from every step completed so far. The first failure aborts the chain and
//! reports which named step failed.
//!
//! # Example
//!
//! ```
//! use shoplite_chain::Chain;
//! use futures::FutureExt;
//!
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("boom")]
//! # struct Boom;
//! # async fn demo() -> Result<(), shoplite_chain::ChainError<Boom>> {
//! let results = Chain::new()
//!     .step("base", |_| async { Ok::<_, Boom>(40) }.boxed())
//!     .step("total", |done| {
//!         let base = done["base"];
//!         async move { Ok(base + 2) }.boxed()
//!     })
//!     .run()
//!     .await?;
//!
//! assert_eq!(results["total"], 42);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use futures::future::BoxFuture;
use indexmap::IndexMap;
use thiserror::Error;

/// Results accumulated by a chain, keyed by step name in execution order.
pub type StepResults<T> = IndexMap<String, T>;

/// A single boxed step: reads the results so far, returns one async result.
///
/// The closure is invoked with the accumulated results and must extract
/// whatever it needs before going async; the returned future does not
/// borrow the results map.
type Step<'a, T, E> = Box<dyn FnOnce(&StepResults<T>) -> BoxFuture<'a, Result<T, E>> + Send + 'a>;

/// Error produced when a chain step fails.
///
/// Carries the name of the failed step and the underlying error unchanged.
/// Steps after the failed one are never invoked.
#[derive(Debug, Error)]
#[error("step `{step}` failed: {source}")]
pub struct ChainError<E>
where
    E: std::error::Error + 'static,
{
    /// Name of the step that failed.
    pub step: String,
    /// The error returned by the step.
    #[source]
    pub source: E,
}

/// An ordered sequence of named asynchronous steps.
///
/// Steps run strictly one at a time in insertion order; no two steps of one
/// chain ever run concurrently. Results are homogeneous (`T`) per chain, as
/// are step errors (`E`).
pub struct Chain<'a, T, E> {
    steps: Vec<(String, Step<'a, T, E>)>,
}

impl<'a, T, E> Chain<'a, T, E>
where
    E: std::error::Error + 'static,
{
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a named step.
    ///
    /// Names should be unique within a chain; a repeated name overwrites the
    /// earlier step's entry in the results map (both steps still run).
    #[must_use]
    pub fn step<F>(mut self, name: impl Into<String>, step: F) -> Self
    where
        F: FnOnce(&StepResults<T>) -> BoxFuture<'a, Result<T, E>> + Send + 'a,
    {
        self.steps.push((name.into(), Box::new(step)));
        self
    }

    /// Append a step named by its 0-based position in the sequence.
    #[must_use]
    pub fn push<F>(self, step: F) -> Self
    where
        F: FnOnce(&StepResults<T>) -> BoxFuture<'a, Result<T, E>> + Send + 'a,
    {
        let name = self.steps.len().to_string();
        self.step(name, step)
    }

    /// Number of steps queued in this chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order, threading accumulated results forward.
    ///
    /// Resolves with the complete `{name → result}` mapping once every step
    /// has succeeded. An empty chain resolves immediately with an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] naming the first step whose future resolved to
    /// an error; later steps are not invoked.
    pub async fn run(self) -> Result<StepResults<T>, ChainError<E>> {
        let mut results = StepResults::with_capacity(self.steps.len());
        for (name, step) in self.steps {
            match step(&results).await {
                Ok(value) => {
                    results.insert(name, value);
                }
                Err(source) => return Err(ChainError { step: name, source }),
            }
        }
        Ok(results)
    }
}

impl<T, E> Default for Chain<'_, T, E>
where
    E: std::error::Error + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
