//! Errors raised by the editing API.

use super::data::NodeId;
use super::kind::NodeKind;

/// An edit the tree refused. The node is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// A required child was set to nothing.
    #[error("{kind}.{field} is required and cannot be cleared")]
    RequiredField {
        /// Kind of the edited node.
        kind: NodeKind,
        /// Field name.
        field: &'static str,
    },
    /// An enum-like value outside the field's legal subset.
    #[error("{value} is not supported for {kind}.{field}")]
    KindNotSupported {
        /// Kind of the edited node.
        kind: NodeKind,
        /// Field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The node kind has no such field, or not with that arity.
    #[error("{kind} has no field `{field}`")]
    NoSuchField {
        /// Kind of the edited node.
        kind: NodeKind,
        /// Field name.
        field: &'static str,
    },
    /// The child's kind is not accepted by the field.
    #[error("{kind}.{field} cannot hold a {found} node")]
    InvalidChild {
        /// Kind of the edited node.
        kind: NodeKind,
        /// Field name.
        field: &'static str,
        /// Kind of the rejected child.
        found: NodeKind,
    },
    /// The child is still listed by another parent.
    #[error("node {child} is already attached to {parent}; detach or clone it first")]
    AlreadyAttached {
        /// The child being installed.
        child: NodeId,
        /// Its current parent.
        parent: NodeId,
    },
    /// The id does not name a node of this unit.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// The child is the node itself or one of its ancestors.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// The child being installed.
        child: NodeId,
        /// The node it was installed into.
        parent: NodeId,
    },
}
