#![forbid(unsafe_code)]

//! Core: the catalog data model consumed by the planner and the reconciler.
//!
//! # Role in the storefront
//! `storefront-core` owns the vocabulary every other crate speaks:
//!
//! - **SectionKind**: the closed set of section kinds (promoted carousel,
//!   titled standard list, categories grid).
//! - **Item / ItemId**: the renderable units and their diff identity.
//! - **SectionDescriptor**: one section together with its ordered items.
//! - **EdgeInsets**: directional insets used by layout plans.
//!
//! The layout planner (`storefront-layout`) only looks at section kinds, while
//! the reconciler (`storefront-reconcile`) only looks at identities. Neither
//! needs anything beyond this crate.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod model;

pub use error::ModelError;
pub use geometry::EdgeInsets;
pub use model::{AppRecord, CategoryRecord, Item, ItemId, ItemTag, SectionDescriptor, SectionKind};
