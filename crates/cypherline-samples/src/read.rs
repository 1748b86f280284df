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

//! Read queries.

use cypherline::{
    state, DynamicQuery, Hops, Labels, NodePattern, Properties, Query, RelationPattern,
};

/// All nodes with the given labels.
///
/// `MATCH (n: Label) RETURN n`
pub fn nodes_by_labels(labels: impl Into<Labels>, node_name: &str) -> Query<state::Return> {
    Query::new()
        .match_()
        .node(NodePattern::labeled(labels).with_ref_name(node_name))
        .return_literal(node_name)
}

/// All nodes with the given labels and property values.
///
/// `MATCH (n: Label {key : "value"}) RETURN n`
pub fn nodes_by_labels_and_properties(
    labels: impl Into<Labels>,
    properties: impl Into<Properties>,
    node_name: &str,
) -> Query<state::Return> {
    Query::new()
        .match_()
        .node(
            NodePattern::labeled(labels)
                .with_ref_name(node_name)
                .with_properties(properties),
        )
        .return_literal(node_name)
}

/// All paths between two kinds of node over one relationship type.
///
/// `MATCH p = (: Src)-[: TYPE]-(: Dst) RETURN p`
pub fn all_paths(
    src_labels: impl Into<Labels>,
    dst_labels: impl Into<Labels>,
    relationship_type: &str,
    path_name: &str,
) -> Query<state::Return> {
    Query::new()
        .match_()
        .path(path_name)
        .node(NodePattern::labeled(src_labels))
        .related(RelationPattern::typed(relationship_type))
        .node(NodePattern::labeled(dst_labels))
        .return_literal(path_name)
}

/// Nodes directly related to nodes of another kind.
///
/// `MATCH (: Src)-[: TYPE]-(d: Dst) RETURN d`
pub fn related_nodes(
    src_labels: impl Into<Labels>,
    dst_labels: impl Into<Labels>,
    relationship_type: &str,
    dst_name: &str,
) -> Query<state::Return> {
    traversal(
        src_labels,
        RelationPattern::typed(relationship_type),
        dst_labels,
        dst_name,
    )
}

/// Nodes exactly `hops` relationships away.
///
/// `MATCH (: Src)-[*3]-(d: Dst) RETURN d`
pub fn nodes_by_fixed_hops(
    src_labels: impl Into<Labels>,
    dst_labels: impl Into<Labels>,
    hops: u32,
    dst_name: &str,
) -> Query<state::Return> {
    traversal(
        src_labels,
        RelationPattern::new().with_hops(Hops::exactly(hops)),
        dst_labels,
        dst_name,
    )
}

/// Nodes between `min_hops` and `max_hops` relationships away. A negative
/// bound leaves that side open.
///
/// `MATCH (: Src)-[*1..3]-(d: Dst) RETURN d`
pub fn nodes_by_hop_range(
    src_labels: impl Into<Labels>,
    dst_labels: impl Into<Labels>,
    min_hops: i64,
    max_hops: i64,
    dst_name: &str,
) -> Query<state::Return> {
    traversal(
        src_labels,
        RelationPattern::new().with_hops(Hops::from_signed(min_hops, max_hops)),
        dst_labels,
        dst_name,
    )
}

/// One page of nodes with the given labels.
///
/// `MATCH (n: Label) RETURN n SKIP offset [LIMIT limit]`. The result is
/// dynamic because the final clause depends on `limit`.
pub fn nodes_with_pagination(
    labels: impl Into<Labels>,
    node_name: &str,
    offset: u64,
    limit: Option<u64>,
) -> DynamicQuery {
    let page = nodes_by_labels(labels, node_name).skip(offset);
    match limit {
        Some(limit) => page.limit(limit).into_dynamic(),
        None => page.into_dynamic(),
    }
}

fn traversal(
    src_labels: impl Into<Labels>,
    relation: RelationPattern,
    dst_labels: impl Into<Labels>,
    dst_name: &str,
) -> Query<state::Return> {
    Query::new()
        .match_()
        .node(NodePattern::labeled(src_labels))
        .related(relation)
        .node(NodePattern::labeled(dst_labels).with_ref_name(dst_name))
        .return_literal(dst_name)
}
