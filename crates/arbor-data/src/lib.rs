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

//! # Arbor Data
//!
//! The data layer of the component tree: node storage, parent/child links, the
//! cascade engine keeping world values current, the identity registry, and the two
//! per-frame passes (Update and Draw).
//!
//! Everything is single-threaded. Hooks run with exclusive access to the tree and
//! any structural change they make is seen by the next traversal, not the current one.

#![warn(missing_docs)]

pub mod behavior;
pub mod bounds;
pub mod draw;
pub mod gui;
pub mod registry;
pub mod transform;
pub mod tree;
pub mod update;

pub use behavior::{
    ComponentNode, GuiNode, NodeBehavior, TransformableNode, UpdateableNode, COMPONENT_NODE,
    GUI_NODE, TRANSFORMABLE_NODE, UPDATEABLE_NODE,
};
pub use bounds::{BoundsSource, BoxBounds, Primitive, PrimitiveBounds, SourceBounds};
pub use draw::DrawCollector;
pub use gui::GuiState;
pub use registry::NodeRegistry;
pub use transform::{Transform, TransformState};
pub use tree::{NodeBuilder, NodeKind, NodeRecord, NodeTree};
