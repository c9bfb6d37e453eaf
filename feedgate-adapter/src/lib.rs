//! Adapter utilities for the `feedgate` crate.
//!
//! The `feedgate` crate is UI-agnostic and focuses on the core reconciliation
//! state. This crate provides small, framework-neutral helpers commonly
//! needed by adapters:
//!
//! - Canonicalized location keys and an in-memory snapshot store
//! - A leave/enter navigator around the store
//! - A tick-driven scroll-restoration episode controller (catch-up fetching
//!   plus convergent scroll correction)
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui
//! bindings): hosts observe their UI, pass a `RestoreView` per frame, and
//! apply the returned `RestoreCommand`.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod location;
mod navigator;
mod restore;
mod snapshot;

#[cfg(test)]
mod tests;

pub use location::{canonical_location_key, nav_key};
pub use navigator::Navigator;
pub use restore::{RestoreCommand, RestoreController, RestoreOptions, RestoreView};
pub use snapshot::{MemorySnapshotStore, ScrollSnapshot, SnapshotStore};
