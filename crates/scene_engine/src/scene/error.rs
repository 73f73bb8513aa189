//! Scene graph errors

use super::{ComponentId, NodeId};
use thiserror::Error;

/// Invalid structural operations on a [`SceneGraph`](super::SceneGraph)
///
/// Lookups that simply find nothing return `Option`/`bool`; these errors are
/// reserved for requests that would break the tree if carried out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The key refers to a node that was deleted or never existed
    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Only detached roots can be given a new parent
    #[error("Node {child:?} is already attached to {parent:?}")]
    AlreadyAttached {
        /// Node that was to be attached
        child: NodeId,
        /// Its current parent
        parent: NodeId,
    },

    /// The new parent lives inside the subtree being attached
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Requested parent
        parent: NodeId,
        /// Requested child
        child: NodeId,
    },

    /// Immediate destruction is only for subtrees the caller owns
    #[error("Node {0:?} is still attached; use destroy() for deferred removal")]
    StillAttached(NodeId),

    /// Deep copy hit a component kind without a clone operation
    #[error("Component {type_name} does not support cloning")]
    ComponentNotClonable {
        /// Type name of the offending component
        type_name: &'static str,
    },

    /// Deep copy hit a component that is currently running its update hook
    #[error("Component {0:?} is checked out by its own update hook")]
    ComponentCheckedOut(ComponentId),
}
