//! Transform pipeline infrastructure
//!
//! Processing is split into stages that can be chained whenever their types line up.
//! Both the loader and the tests go through the same pipelines, so a stage can be run on
//! its own or as part of the full path from source text to sections.
//!
//! # Architecture Overview
//!
//! ## 1. The `Runnable` Trait
//!
//! The interface of every stage: `Runnable<I, O>` turns an `I` into an `O`.
//!
//! ```rust,ignore
//! pub trait Runnable<I, O> {
//!     fn run(&self, input: I) -> Result<O, TransformError>;
//! }
//! ```
//!
//! ## 2. The `Transform<I, O>` Type
//!
//! A wrapper that composes stages with `.then()`. The compiler checks that each stage
//! takes what the previous one produced:
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(Ok)
//!     .then(FormReading::new())            // String → FormBatch
//!     .then(Arrangement::default());       // FormBatch → Vec<Section>
//! ```
//!
//! ## 3. Static Lazy Transforms
//!
//! Common pipelines are pre-built as statics with `once_cell::sync::Lazy`, see
//! [`standard`].
//!
//! # Module Organization
//!
//! - [`stages`]: form reading and section arrangement
//! - [`standard`]: pre-built pipelines

pub mod stages;
pub mod standard;

use crate::sidenote::reading::SyntaxError;
use std::fmt;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The source could not be read
    Syntax(SyntaxError),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Syntax(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TransformError {}

impl From<SyntaxError> for TransformError {
    fn from(err: SyntaxError) -> Self {
        TransformError::Syntax(err)
    }
}

/// Trait for anything that can transform an input to an output
///
/// This is implemented by individual transformation stages.
/// The `Transform` struct composes multiple `Runnable` implementations.
pub trait Runnable<I, O> {
    /// Execute this transformation on the input
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable transformation pipeline
///
/// `Transform<I, O>` represents a transformation from type `I` to type `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Add a stage to this transform, returning a new transform with extended output type
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a pre-built static transform to this transform
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

// Implement Runnable for Transform so transforms can be used as stages
impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}
