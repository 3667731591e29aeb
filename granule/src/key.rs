#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, T> = HashMap<K, T>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, T> = BTreeMap<K, T>;

/// Bounds required of an item id.
///
/// Ids are opaque to the engine: they only need to be comparable, cloneable
/// (payloads and anchor tags carry them by value) and debug-printable (they
/// appear in errors and diagnostics).
#[cfg(feature = "std")]
pub trait ScopeKey: core::hash::Hash + Eq + Clone + core::fmt::Debug {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone + core::fmt::Debug> ScopeKey for K {}

#[cfg(not(feature = "std"))]
pub trait ScopeKey: Ord + Clone + core::fmt::Debug {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone + core::fmt::Debug> ScopeKey for K {}
