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

//! Provides the notification primitives of the component tree.
//!
//! Structural and property changes are published as [`TreeEvent`]s on an
//! [`EventBus`]. The tree owns the bus; observers drain it between frames or keep a
//! cloned sender/receiver to forward events elsewhere.

mod bus;
mod tree_event;

pub use self::bus::EventBus;
pub use self::tree_event::TreeEvent;
