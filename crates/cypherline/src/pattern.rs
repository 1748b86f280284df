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

//! Node and relationship patterns.
//!
//! Patterns describe the bracketed parts of a graph pattern, `(n: Label {..})`
//! and `-[r: TYPE*1..3 {..}]->`. They only know how to render themselves;
//! where the text lands is decided by the fragment that carries them.

use std::fmt::Write;

use crate::properties::{Properties, PropertyValue};

/// Labels of a node, or types of a relationship.
///
/// # Rendering
///
/// | Variant | Node | Relationship |
/// |---------|------|--------------|
/// | `None` | nothing | nothing |
/// | `One("A")` | `: A` | `: A` |
/// | `Many(["A", "B"])` | `: A: B` | `:A\|:B` |
/// | `Model("A")` | `:A` | `: A` |
///
/// Empty strings and empty lists count as no label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Labels {
    /// No label.
    #[default]
    None,
    /// A single label.
    One(String),
    /// Several labels (a multi-label node, or alternative relationship types).
    Many(Vec<String>),
    /// A label derived from a model schema.
    Model(String),
}

impl Labels {
    /// Check if no label would be rendered.
    pub fn is_empty(&self) -> bool {
        match self {
            Labels::None => true,
            Labels::One(l) | Labels::Model(l) => l.is_empty(),
            Labels::Many(ls) => ls.is_empty(),
        }
    }

    /// Render as node labels.
    pub fn to_node_cypher(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            Labels::None => String::new(),
            Labels::One(l) => format!(": {}", l),
            Labels::Many(ls) => format!(": {}", ls.join(": ").trim()),
            Labels::Model(l) => format!(":{}", l),
        }
    }

    /// Render as relationship types.
    pub fn to_relation_cypher(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            Labels::None => String::new(),
            Labels::One(l) | Labels::Model(l) => format!(": {}", l),
            Labels::Many(ls) => ls
                .iter()
                .map(|l| format!(":{}", l))
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

impl From<&str> for Labels {
    fn from(v: &str) -> Self {
        Labels::One(v.to_string())
    }
}

impl From<String> for Labels {
    fn from(v: String) -> Self {
        Labels::One(v)
    }
}

impl From<&String> for Labels {
    fn from(v: &String) -> Self {
        Labels::One(v.clone())
    }
}

impl From<Vec<String>> for Labels {
    fn from(v: Vec<String>) -> Self {
        Labels::Many(v)
    }
}

impl From<Vec<&str>> for Labels {
    fn from(v: Vec<&str>) -> Self {
        Labels::Many(v.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Labels {
    fn from(v: [&str; N]) -> Self {
        Labels::Many(v.into_iter().map(String::from).collect())
    }
}

impl<T: Into<Labels>> From<Option<T>> for Labels {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

/// A node pattern: `(ref_name: Label {key : value})`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePattern {
    /// Node labels.
    pub labels: Labels,
    /// Reference name bound to the node.
    pub ref_name: Option<String>,
    /// Properties the node is filtered by or created with.
    pub properties: Properties,
    /// Escape flag for property values; `None` uses the builder default.
    pub escape: Option<bool>,
}

impl NodePattern {
    /// An empty node pattern, `()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A node pattern with labels.
    pub fn labeled(labels: impl Into<Labels>) -> Self {
        Self::new().with_labels(labels)
    }

    /// A node pattern with a reference name only.
    pub fn named(ref_name: impl Into<String>) -> Self {
        Self::new().with_ref_name(ref_name)
    }

    /// Set the labels.
    pub fn with_labels(mut self, labels: impl Into<Labels>) -> Self {
        self.labels = labels.into();
        self
    }

    /// Set the reference name.
    pub fn with_ref_name(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// Replace the properties.
    pub fn with_properties(mut self, properties: impl Into<Properties>) -> Self {
        self.properties = properties.into();
        self
    }

    /// Set the escape flag for property values.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Render the pattern.
    pub fn to_cypher(&self, escape_default: bool) -> String {
        let escape = self.escape.unwrap_or(escape_default);
        let mut out = String::from("(");
        if let Some(ref_name) = &self.ref_name {
            out.push_str(ref_name);
        }
        out.push_str(&self.labels.to_node_cypher());
        if !self.properties.is_empty() {
            let _ = write!(out, " {{{}}}", self.properties.to_cypher(":", ", ", escape));
        }
        out.push(')');
        out
    }
}

/// Relationship direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// `-[..]-`
    #[default]
    Undirected,
    /// `-[..]->`
    Forward,
    /// `<-[..]-`
    Backward,
}

/// Shortest-path selector for variable-length relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortestPath {
    /// Plain variable-length match.
    #[default]
    Off,
    /// `SHORTEST`
    Shortest,
    /// `ALL SHORTEST`
    AllShortest,
}

impl From<bool> for ShortestPath {
    fn from(v: bool) -> Self {
        if v {
            ShortestPath::Shortest
        } else {
            ShortestPath::Off
        }
    }
}

/// Hop bounds of a relationship. `None` leaves that side unbounded.
///
/// The default, exactly one hop, renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hops {
    /// Minimum number of hops.
    pub min: Option<u32>,
    /// Maximum number of hops.
    pub max: Option<u32>,
}

impl Default for Hops {
    fn default() -> Self {
        Self {
            min: Some(1),
            max: Some(1),
        }
    }
}

impl Hops {
    /// Exactly `n` hops.
    pub fn exactly(n: u32) -> Self {
        Self {
            min: Some(n),
            max: Some(n),
        }
    }

    /// Between `min` and `max` hops.
    pub fn range(min: u32, max: u32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// At least `min` hops.
    pub fn at_least(min: u32) -> Self {
        Self { min: Some(min), max: None }
    }

    /// At most `max` hops.
    pub fn at_most(max: u32) -> Self {
        Self { min: None, max: Some(max) }
    }

    /// Any number of hops, `*`.
    pub fn unbounded() -> Self {
        Self { min: None, max: None }
    }

    /// Build from signed bounds where any negative value means unbounded.
    ///
    /// Bounds above `u32::MAX` saturate.
    pub fn from_signed(min: i64, max: i64) -> Self {
        let bound = |v: i64| (v >= 0).then(|| u32::try_from(v).unwrap_or(u32::MAX));
        Self {
            min: bound(min),
            max: bound(max),
        }
    }

    /// Check for the single-hop default.
    pub fn is_single(&self) -> bool {
        self.min == Some(1) && self.max == Some(1)
    }

    /// Render the `*` suffix. Empty for the single-hop default.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cypherline::{Hops, ShortestPath};
    /// assert_eq!(Hops::default().to_cypher(ShortestPath::Shortest), "");
    /// assert_eq!(Hops::exactly(3).to_cypher(ShortestPath::Off), "*3");
    /// assert_eq!(Hops::at_least(2).to_cypher(ShortestPath::Off), "*2..");
    /// assert_eq!(Hops::range(2, 4).to_cypher(ShortestPath::Shortest), "*SHORTEST 2..4");
    /// ```
    pub fn to_cypher(&self, shortest: ShortestPath) -> String {
        if self.is_single() {
            return String::new();
        }

        let mut out = String::from("*");
        match shortest {
            ShortestPath::Off => {}
            ShortestPath::Shortest => out.push_str("SHORTEST "),
            ShortestPath::AllShortest => out.push_str("ALL SHORTEST "),
        }

        let bound = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_default();
        if self.min == self.max {
            out.push_str(&bound(self.min));
        } else {
            let _ = write!(out, "{}..{}", bound(self.min), bound(self.max));
        }
        out
    }
}

/// A relationship pattern: `-[ref_name: TYPE*min..max {key : value}]-`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationPattern {
    /// Relationship type or alternative types.
    pub labels: Labels,
    /// Reference name bound to the relationship.
    pub ref_name: Option<String>,
    /// Properties the relationship is filtered by or created with.
    pub properties: Properties,
    /// Hop bounds.
    pub hops: Hops,
    /// Shortest-path selector, only rendered for variable-length patterns.
    pub shortest: ShortestPath,
    /// Escape flag for property values; `None` uses the builder default.
    pub escape: Option<bool>,
}

impl RelationPattern {
    /// An empty relationship pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// A relationship pattern with a type.
    pub fn typed(labels: impl Into<Labels>) -> Self {
        Self::new().with_labels(labels)
    }

    /// Set the relationship type(s).
    pub fn with_labels(mut self, labels: impl Into<Labels>) -> Self {
        self.labels = labels.into();
        self
    }

    /// Set the reference name.
    pub fn with_ref_name(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// Replace the properties.
    pub fn with_properties(mut self, properties: impl Into<Properties>) -> Self {
        self.properties = properties.into();
        self
    }

    /// Set the hop bounds.
    pub fn with_hops(mut self, hops: Hops) -> Self {
        self.hops = hops;
        self
    }

    /// Set the shortest-path selector.
    pub fn with_shortest(mut self, shortest: impl Into<ShortestPath>) -> Self {
        self.shortest = shortest.into();
        self
    }

    /// Set the escape flag for property values.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Render the pattern in the given direction.
    ///
    /// The bracket body is dropped entirely when it would be empty, giving
    /// `--`, `-->` or `<--`.
    pub fn to_cypher(&self, direction: Direction, escape_default: bool) -> String {
        let escape = self.escape.unwrap_or(escape_default);

        let mut body = String::new();
        if let Some(ref_name) = &self.ref_name {
            body.push_str(ref_name);
        }
        body.push_str(&self.labels.to_relation_cypher());
        body.push_str(&self.hops.to_cypher(self.shortest));
        if !self.properties.is_empty() {
            let _ = write!(body, " {{{}}}", self.properties.to_cypher(":", ", ", escape));
        }

        let body = if body.is_empty() {
            body
        } else {
            format!("[{}]", body)
        };

        match direction {
            Direction::Forward => format!("-{}->", body),
            Direction::Backward => format!("<-{}-", body),
            Direction::Undirected => format!("-{}-", body),
        }
    }
}
