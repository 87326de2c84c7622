//! Babel Validation assertions
//!
//! Test declarations embedded in issue bodies name an assertion type and one
//! or more parameter sets. This crate turns those [`TestCase`]s into ordered
//! [`TestResult`]s by running them against NodeNorm and NameRes:
//!
//! - **handlers**: the built-in assertion types (`Resolves`, `SearchByName`, ...)
//! - **AssertionRegistry**: case-insensitive lookup from name to handler
//! - **Evaluator**: dispatches a test case and concatenates per-service results
//! - **docs**: renders the assertion reference README

#![deny(unsafe_code)]

pub mod case;
pub mod docs;
pub mod error;
pub mod evaluator;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod result;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use case::{ParamSet, TestCase};
pub use error::{AssertionError, AssertionResult};
pub use evaluator::{Evaluator, DEFAULT_PASS_IF_FOUND_IN_TOP};
pub use handler::{evaluate_nameres, evaluate_nodenorm, AppliesTo, AssertionHandler, HandlerDoc};
pub use registry::AssertionRegistry;
pub use result::{ResultSink, TestResult, TestStatus};
