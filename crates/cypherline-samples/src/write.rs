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

//! Write queries.
//!
//! Nodes and relationships are created with `CREATE` or upserted with
//! `MERGE`. The merge variants return a handle in the merge sub-grammar, so
//! `ON CREATE` / `ON MATCH` can follow directly.

use cypherline::{state, Labels, NodePattern, Properties, Query, RelationPattern};

/// Create a node.
///
/// `CREATE (n: Label {key : "value"})`
pub fn create_node(
    labels: impl Into<Labels>,
    properties: impl Into<Properties>,
) -> Query<state::Node> {
    Query::new().create().node(
        NodePattern::labeled(labels)
            .with_ref_name("n")
            .with_properties(properties),
    )
}

/// Merge a node.
///
/// `MERGE (: Label {key : "value"})`
pub fn merge_node(
    labels: impl Into<Labels>,
    properties: impl Into<Properties>,
) -> Query<state::NodeAfterMerge> {
    Query::new()
        .merge()
        .node(NodePattern::labeled(labels).with_properties(properties))
}

/// Endpoints of a relationship, matched by labels and properties.
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    /// Labels of the source node.
    pub src_labels: Labels,
    /// Properties of the source node.
    pub src_properties: Properties,
    /// Labels of the destination node.
    pub dst_labels: Labels,
    /// Properties of the destination node.
    pub dst_properties: Properties,
}

impl Endpoints {
    /// Endpoints matched by labels only.
    pub fn new(src_labels: impl Into<Labels>, dst_labels: impl Into<Labels>) -> Self {
        Self {
            src_labels: src_labels.into(),
            dst_labels: dst_labels.into(),
            ..Self::default()
        }
    }

    /// Set the source node properties.
    pub fn with_src_properties(mut self, properties: impl Into<Properties>) -> Self {
        self.src_properties = properties.into();
        self
    }

    /// Set the destination node properties.
    pub fn with_dst_properties(mut self, properties: impl Into<Properties>) -> Self {
        self.dst_properties = properties.into();
        self
    }

    fn match_both(self) -> Query<state::Node> {
        Query::new()
            .match_()
            .node(
                NodePattern::labeled(self.src_labels)
                    .with_ref_name("src")
                    .with_properties(self.src_properties),
            )
            .match_()
            .node(
                NodePattern::labeled(self.dst_labels)
                    .with_ref_name("dst")
                    .with_properties(self.dst_properties),
            )
    }
}

/// Create a relationship from `src` to `dst`.
///
/// `MATCH (src ..) MATCH (dst ..) CREATE (src)-[: TYPE {..}]->(dst)`
pub fn create_relationship(
    endpoints: Endpoints,
    relationship_type: &str,
    properties: impl Into<Properties>,
) -> Query<state::Node> {
    endpoints
        .match_both()
        .create()
        .node(NodePattern::named("src"))
        .related_to(RelationPattern::typed(relationship_type).with_properties(properties))
        .node(NodePattern::named("dst"))
}

/// Merge a relationship from `src` to `dst`.
///
/// `MATCH (src ..) MATCH (dst ..) MERGE (src)-[: TYPE {..}]->(dst)`
pub fn merge_relationship(
    endpoints: Endpoints,
    relationship_type: &str,
    properties: impl Into<Properties>,
) -> Query<state::NodeAfterMerge> {
    endpoints
        .match_both()
        .merge()
        .node(NodePattern::named("src"))
        .related_to(RelationPattern::typed(relationship_type).with_properties(properties))
        .node(NodePattern::named("dst"))
}
