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

//! Type-state builder for Cypher query text.
//!
//! Queries are assembled clause by clause through a fluent API. Every clause
//! method returns the builder retyped to the state the clause leads to, and
//! each state only offers the clauses that may legally follow it. A query
//! that calls `ON CREATE` after a `MATCH` pattern, or starts with a node,
//! does not compile.
//!
//! # Building blocks
//!
//! | Concern | Types |
//! |---------|-------|
//! | Property maps | [`Properties`], [`PropertyValue`] |
//! | Patterns | [`NodePattern`], [`RelationPattern`], [`Labels`], [`Hops`] |
//! | Clause arguments | [`Conditions`], [`Mapping`], [`CaseExpression`], [`CaseWhen`], [`ColumnDef`], [`OperatorCall`] |
//! | Grammar | [`StateKind`], [`ClauseKind`], [`state`], [`clause`] |
//! | Builders | [`Query`], [`DynamicQuery`] |
//! | Models | [`model::Schema`], [`model::Entity`], [`model::Expr`] |
//!
//! # Example: typed builder
//!
//! ```rust
//! use cypherline::{Hops, NodePattern, Query, RelationPattern, SortOrder};
//!
//! let query = Query::new()
//!     .match_()
//!     .node(NodePattern::labeled("Person").with_ref_name("p"))
//!     .related_to(RelationPattern::typed("KNOWS").with_hops(Hops::range(1, 3)))
//!     .node(NodePattern::named("friend"))
//!     .where_("friend.age", ">", 30)
//!     .return_mapping([("friend.name", "name")])
//!     .order_by(["name"], SortOrder::Ascending)
//!     .limit(10);
//!
//! assert_eq!(
//!     query.render(),
//!     "MATCH (p: Person)-[: KNOWS*1..3]->(friend) WHERE friend.age > 30 \
//!      RETURN friend.name AS name ORDER BY name ASC LIMIT 10"
//! );
//! ```
//!
//! # Example: merge sub-grammar
//!
//! After `MERGE`, the node pattern leads into states that allow
//! `ON CREATE` and `ON MATCH`:
//!
//! ```rust
//! use cypherline::{NodePattern, Query};
//!
//! let query = Query::new()
//!     .merge()
//!     .node(NodePattern::labeled("Node").with_ref_name("n").with_property("name", "test"))
//!     .on_create()
//!     .set([("n.id", "1")])
//!     .on_match()
//!     .set_unescaped([("n.id", r#"n.id + "1""#)])
//!     .return_literal("n");
//!
//! assert_eq!(
//!     query.render(),
//!     r#"MERGE (n: Node {name : "test"}) ON CREATE SET n.id = "1" ON MATCH SET n.id = n.id + "1" RETURN n"#
//! );
//! ```
//!
//! # Escaping
//!
//! Values are embedded inline. String values are double-quoted and escaped
//! unless the builder configuration ([`BuilderConfig::escape_values`]) or
//! the individual call says otherwise. Labels, reference names and literal
//! fragments (`where_literal`, `return_literal`, `raw`, ...) are emitted
//! verbatim and must come from trusted code.
//!
//! # Unchecked paths
//!
//! [`Query::raw`] appends arbitrary text and moves to a state that allows
//! every clause. `+=` keeps the left operand's state. Both bypass the
//! grammar.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod dynamic;
pub mod error;
pub mod escape;
pub mod fragment;
pub mod grammar;
pub mod model;
pub mod pattern;
pub mod properties;
pub mod query;

// Re-export main types at crate root for convenience
pub use config::{BuilderConfig, BuilderConfigBuilder, DEFAULT_MAX_QUERY_LENGTH};
pub use dynamic::DynamicQuery;
pub use error::{QueryError, Result};
pub use fragment::{
    CaseExpression, CaseWhen, ColumnDef, Conditions, Fragment, Mapping, OperatorCall, SortOrder,
};
pub use grammar::{clause, state, ClauseKind, QueryState, StateKind};
pub use pattern::{Direction, Hops, Labels, NodePattern, RelationPattern, ShortestPath};
pub use properties::{Properties, PropertyValue};
pub use query::{Query, QueryBuilder};
