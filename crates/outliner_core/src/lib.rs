//! Headless scene outliner engine.
//!
//! Keeps a flattened, filterable view of a host-owned scene hierarchy in sync
//! with the live tree. The host exposes its nodes through [`SceneHost`]; the
//! engine never creates or destroys nodes, it only reads them.

pub mod debounce;
pub mod entry;
pub mod expand;
pub mod filter;
pub mod flatten;
pub mod host;
pub mod navigation;
pub mod outliner;
pub mod selector;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_host;

pub use debounce::Debounce;
pub use entry::{Entry, SequenceId};
pub use expand::ExpandState;
pub use filter::{NodeFilter, filter_entries};
pub use flatten::flatten;
pub use host::SceneHost;
pub use navigation::{KeyResponse, NavKey};
pub use outliner::{Outliner, Row, Signal, Timings};
pub use selector::{Selector, SelectorError};
pub use visibility::is_visible;
