//! Adapter utilities for the `granule` crate.
//!
//! The `granule` crate is UI-agnostic and focuses on collection state and
//! mount orchestration. This crate provides framework-neutral pieces commonly
//! needed around it:
//!
//! - [`MemoryHost`]: a slab-backed in-memory host tree, useful as a test
//!   double and as a reference `HostTree` implementation
//! - [`MountTracker`]: mount-notification timing for whole batches (std only)
//!
//! This crate is intentionally framework-agnostic (no DOM/GUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod memory;

#[cfg(feature = "std")]
mod tracker;

#[cfg(test)]
mod tests;

pub use memory::{MemoryHost, NodeId, RootId};

#[cfg(feature = "std")]
pub use tracker::{MountStats, MountTracker};
