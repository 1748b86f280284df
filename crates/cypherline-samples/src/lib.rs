// Dweve Cypherline - Type-state Cypher query builder
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ready-made queries built with cypherline.
//!
//! Each function returns a builder handle rather than a string, so callers
//! can keep appending clauses the grammar allows at that point.
//!
//! # Quick Start
//!
//! ```rust
//! use cypherline_samples::read;
//!
//! let q = read::nodes_by_labels("Person", "p");
//! assert_eq!(q.render(), "MATCH (p: Person) RETURN p");
//!
//! // Keep going from where the sample stopped.
//! let q = read::nodes_by_labels("Person", "p").limit(5);
//! assert_eq!(q.render(), "MATCH (p: Person) RETURN p LIMIT 5");
//! ```

#![deny(missing_docs)]

pub mod read;
pub mod write;

pub use read::{
    all_paths, nodes_by_fixed_hops, nodes_by_hop_range, nodes_by_labels,
    nodes_by_labels_and_properties, nodes_with_pagination, related_nodes,
};
pub use write::{create_node, create_relationship, merge_node, merge_relationship, Endpoints};
