//! Record trait for rows fed into a [`TableEngine`](crate::TableEngine).

use std::fmt::Debug;
use std::hash::Hash;

/// One row of application data.
///
/// The engine never inspects attributes directly; columns extract them through
/// their accessors. Only the identifier is needed, to keep a selection pinned
/// to the same record across refreshes.
pub trait Record {
    type Id: Clone + Eq + Hash + Debug;

    /// Unique identifier within one snapshot.
    fn id(&self) -> Self::Id;
}
