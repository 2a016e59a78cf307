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

//! Focus channels of interactive nodes.

use bitflags::bitflags;

bitflags! {
    /// The ways a GUI node can hold focus.
    ///
    /// A node is focused when any channel is set. The same type is used for the
    /// mask of channels a node permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FocusChannels: u8 {
        /// Focus acquired by a pointer click.
        const POINTER = 1 << 0;
        /// Focus acquired by keyboard or gamepad navigation.
        const OTHER_INPUT = 1 << 1;
        /// Focus assigned programmatically, not through user input.
        const NON_INPUT = 1 << 2;
    }
}

impl FocusChannels {
    /// Returns `true` if any channel is set.
    pub fn is_focused(&self) -> bool {
        !self.is_empty()
    }
}
