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

//! # Arbor GUI
//!
//! The interactive layer over GUI nodes: which node holds focus, how focus moves
//! in response to pointer presses and navigation input, and where input events
//! are delivered.
//!
//! All focus state lives in the tree's GUI facets. A [`FocusRouter`] only knows
//! which node is the active screen and applies the routing rules on top.

#![warn(missing_docs)]

pub mod dispatch;
pub mod navigation;
pub mod router;

pub use dispatch::DispatchOutcome;
pub use navigation::Navigation;
pub use router::FocusRouter;
