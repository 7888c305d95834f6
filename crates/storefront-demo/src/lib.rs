#![forbid(unsafe_code)]

//! Presentation-host stand-in for the storefront planner and reconciler.
//!
//! Screens come from bundled `.env` profiles; each command resolves a profile
//! into section descriptors from the sample catalog and feeds them through
//! `storefront-layout` or `storefront-reconcile`.

pub mod cli;
pub mod error;
pub mod logging;
pub mod outline;
pub mod plan;
pub mod profile;
pub mod reconcile;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
