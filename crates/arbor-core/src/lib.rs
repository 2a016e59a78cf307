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

//! # Arbor Core
//!
//! Foundational crate containing the core types and interface contracts shared by
//! every layer of the component tree: node handles and identity, the type-indexed
//! query collection, tree events, input events, focus channels, geometry, and the
//! configuration and error types.
//!
//! Nothing in this crate knows about the tree storage itself; that lives in
//! `arbor-data`.

#![warn(missing_docs)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod identity;
pub mod input;
pub mod node;
pub mod trait_value;
pub mod type_index;

pub use bounds::BoundingBoxBuilder;
pub use config::TreeConfig;
pub use error::{ConfigError, FocusError, TreeError};
pub use event::{EventBus, TreeEvent};
pub use focus::FocusChannels;
pub use geometry::{Aabb, Rect};
pub use identity::{NameClaim, NameTable, NodeUid};
pub use input::{
    AbstractInput, ButtonState, Direction, GamepadButton, InputEvent, MouseButton,
};
pub use node::{CollectMode, NodeId, WorldProperty};
pub use trait_value::{TraitBag, TraitValue};
pub use type_index::{ClassInfo, TypeIndexedCollection, TypeKey};

pub use glam;
