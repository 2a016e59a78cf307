// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types returned by fallible tree, focus and configuration operations.
//!
//! Benign no-ops (re-adding an existing child, removing an absent one, setting an
//! unchanged value) are not errors; those operations report `Ok(false)` or `false`.

use crate::identity::NodeUid;
use crate::node::NodeId;
use thiserror::Error;

/// An error raised by a structural or property operation on the node tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The handle does not refer to a live node.
    #[error("node {0} does not exist or was destroyed")]
    NodeNotFound(NodeId),
    /// A node was asked to become its own parent.
    #[error("node {0} cannot be its own parent")]
    SelfParenting(NodeId),
    /// The requested parent is a descendant of the node.
    #[error("attaching {node} under {parent} would create a cycle")]
    Cycle {
        /// The node being reparented.
        node: NodeId,
        /// The rejected parent.
        parent: NodeId,
    },
    /// The parent does not accept children of this kind.
    #[error("{parent} does not accept {child} as a child")]
    IncompatibleChild {
        /// The rejected parent.
        parent: NodeId,
        /// The rejected child.
        child: NodeId,
    },
    /// The parent's behavior is running one of its hooks, so its veto cannot be asked.
    #[error("node {0} cannot take children while its behavior is running")]
    BehaviorBusy(NodeId),
    /// The node holds focus and cannot be attached to another tree.
    #[error("node {0} is focused and cannot be attached")]
    FocusedAttach(NodeId),
    /// A behavior's class does not derive from the base class of the node kind.
    #[error("class `{class}` does not derive from `{expected}`")]
    ClassMismatch {
        /// The behavior's class name.
        class: &'static str,
        /// The base class required by the node kind.
        expected: &'static str,
    },
    /// Another node already carries this uid.
    #[error("uid {0} is already in use")]
    DuplicateUid(NodeUid),
    /// The operation needs a transform facet the node does not have.
    #[error("node {0} is not transformable")]
    NotTransformable(NodeId),
    /// The operation needs a GUI facet the node does not have.
    #[error("node {0} is not a GUI node")]
    NotGui(NodeId),
}

/// An error raised by the focus state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The handle does not refer to a live node.
    #[error("node {0} does not exist or was destroyed")]
    NodeNotFound(NodeId),
    /// The node has no GUI facet and can never hold focus.
    #[error("node {0} is not interactive")]
    NotInteractive(NodeId),
    /// The node already holds focus.
    #[error("node {0} is already focused")]
    AlreadyFocused(NodeId),
    /// Linking the chain would leave two focused leaves in one tree.
    #[error("focusing {node} would split the focus chain at {at}")]
    SplitFocus {
        /// The node that was to receive focus.
        node: NodeId,
        /// The ancestor whose focus pointer disagrees.
        at: NodeId,
    },
    /// No screen root has been set on the router.
    #[error("no active screen")]
    NoScreen,
}

/// An error raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration text is not valid RON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
