//! Shared primitives and traits for the pal alignment crates.
//!
//! `pal-core` provides the foundation that `pal-align` builds on:
//!
//! - **Error types**: [`PalError`] and [`Result`] for structured error handling
//! - **Traits**: [`Sequence`], [`Annotated`], [`Scored`] and [`Summarizable`]

pub mod error;
pub mod traits;

pub use error::{PalError, Result};
pub use traits::*;
