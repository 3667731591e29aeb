//! A headless scoped-collection rendering engine.
//!
//! A *scope* tracks an ordered collection of keyed items where every item is
//! rendered into its own independent rendering root inside one shared host
//! container. Structural changes (insert, delete, move) go through the scope,
//! which keeps three things in lockstep: the item sequence, the host tree
//! (one tagged node + root per item), and an event fabric of list-level and
//! per-item channels plus an item-to-ancestor upward channel.
//!
//! It is UI-agnostic. A DOM/GUI layer provides a [`HostTree`] implementation
//! (node creation, anchor tagging, sibling ordering, root lifecycle) and
//! drives [`Scope::flush`] from its microtask or frame loop; everything else
//! is plain data. See the `granule-adapter` crate for an in-memory host and
//! mount instrumentation.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod bus;
mod coordinator;
mod error;
mod host;
mod key;
mod registry;
mod scope;
mod store;
mod types;

#[cfg(feature = "std")]
mod perf;


pub use bus::Subscription;
pub use error::ScopeError;
pub use host::HostTree;
pub use key::ScopeKey;
pub use scope::Scope;
pub use types::{
    InsertPayload, ItemChannel, ItemRef, ListChannel, ListEvent, MovePayload, ScopeItem,
};

#[cfg(feature = "std")]
pub use perf::{PerfConfig, PerfLogger};
