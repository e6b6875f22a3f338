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

//! Capability traits for discoverable metadata.
//!
//! Discovery tooling queries these capabilities explicitly on registered
//! objects; nothing is scanned or inferred at runtime. All accessors are
//! pure, stable for the object's lifetime, and safe to call concurrently
//! from any thread.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

/// Exposes a stable, human-readable identifier.
pub trait Named {
    /// The identifier, fixed for the object's lifetime.
    fn name(&self) -> &str;
}

/// Exposes the set of free-form tags attached to an object.
pub trait Tagged {
    /// The tag set, fixed for the object's lifetime.
    fn tags(&self) -> &HashSet<String>;
}

/// Exposes the opaque key/value properties attached to an object.
pub trait HasProperties {
    /// The property map, fixed for the object's lifetime.
    fn properties(&self) -> &HashMap<String, Value>;
}
