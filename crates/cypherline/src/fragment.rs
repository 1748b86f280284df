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

//! Clause fragments and their arguments.
//!
//! A [`Fragment`] is one clause with its typed arguments. Rendering a
//! fragment appends its text to the accumulated query; fragments keep no
//! identity afterwards. Every fragment except node and relationship
//! patterns, `,` and `;` starts with a single separating space.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::grammar::ClauseKind;
use crate::pattern::{Direction, NodePattern, RelationPattern};
use crate::properties::{Properties, PropertyValue};

/// Characters after which a node pattern continues a path without a space.
const CONNECTORS: [char; 3] = ['-', '>', '<'];

/// Property filters for `WHERE` and `CASE WHEN`.
///
/// Renders `key <comparison> value` pairs joined by the boolean operator.
/// Defaults are `=` and ` AND `.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    /// Filters, in order.
    pub properties: Properties,
    /// Operator between a key and its value.
    pub comparison: String,
    /// Operator between two filters.
    pub boolean: String,
    /// Escape flag for values; `None` uses the builder default.
    pub escape: Option<bool>,
}

impl Conditions {
    /// Conditions with the default operators.
    pub fn new(properties: impl Into<Properties>) -> Self {
        Self {
            properties: properties.into(),
            comparison: "=".to_string(),
            boolean: " AND ".to_string(),
            escape: None,
        }
    }

    /// A single `name <comparison> value` condition.
    pub fn single(
        name: impl Into<String>,
        comparison: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        Self::new(Properties::new().with(name, value)).compared_by(comparison)
    }

    /// Set the comparison operator.
    pub fn compared_by(mut self, comparison: impl Into<String>) -> Self {
        self.comparison = comparison.into();
        self
    }

    /// Set the boolean operator. It is inserted verbatim, so include the
    /// surrounding spaces: `" OR "`.
    pub fn joined_by(mut self, boolean: impl Into<String>) -> Self {
        self.boolean = boolean.into();
        self
    }

    /// Set the escape flag.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Render the conditions.
    pub fn to_cypher(&self, escape_default: bool) -> String {
        self.properties.to_cypher(
            &self.comparison,
            &self.boolean,
            self.escape.unwrap_or(escape_default),
        )
    }
}

impl From<Properties> for Conditions {
    fn from(properties: Properties) -> Self {
        Self::new(properties)
    }
}

impl<K: Into<String>, V: Into<PropertyValue>, const N: usize> From<[(K, V); N]> for Conditions {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::new(Properties::from(pairs))
    }
}

/// An `(expression, alias)` pair for `RETURN` and `YIELD`.
///
/// An empty alias counts as no alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Source expression, e.g. `n.name`.
    pub expression: String,
    /// Name the expression is bound to.
    pub alias: Option<String>,
}

impl Mapping {
    /// A mapping without alias.
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: None,
        }
    }

    /// A mapping with alias.
    pub fn aliased(expression: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            expression: expression.into(),
            alias: if alias.is_empty() { None } else { Some(alias) },
        }
    }

    fn underscored(&self) -> String {
        self.expression.replace('.', "_")
    }

    /// Render for `RETURN`.
    ///
    /// Without an alias the expression itself is emitted with every `.`
    /// replaced by `_`, and no `AS` is added: `n.name` becomes `n_name`.
    pub fn to_return_cypher(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.expression, alias),
            None => self.underscored(),
        }
    }

    /// Render for `YIELD`.
    ///
    /// Without an alias one is derived from the expression: `n.name AS n_name`.
    pub fn to_yield_cypher(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.expression, alias),
            None => format!("{} AS {}", self.expression, self.underscored()),
        }
    }
}

impl From<&str> for Mapping {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl From<String> for Mapping {
    fn from(expression: String) -> Self {
        Self::new(expression)
    }
}

impl<E: Into<String>, A: Into<String>> From<(E, A)> for Mapping {
    fn from((expression, alias): (E, A)) -> Self {
        Self::aliased(expression, alias)
    }
}

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// `ASC`
    #[default]
    Ascending,
    /// `DESC`
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ASC"),
            SortOrder::Descending => f.write_str("DESC"),
        }
    }
}

/// A `CASE` expression: `CASE [test] WHEN c THEN r ... ELSE d END [AS alias]`.
///
/// # Examples
///
/// ```
/// # use cypherline::CaseExpression;
/// let case = CaseExpression::new("'other'")
///     .with_test("n.eyes")
///     .when("'blue'", "1")
///     .when_any(["'brown'", "'green'"], "2")
///     .aliased("eye_code");
/// assert_eq!(
///     case.to_cypher(),
///     "CASE n.eyes WHEN 'blue' THEN 1 WHEN 'brown', 'green' THEN 2 ELSE 'other' END AS eye_code"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseExpression {
    /// Expression compared against each `WHEN` value.
    pub test: Option<String>,
    /// `(conditions, result)` branches, in order.
    pub branches: Vec<(Vec<String>, String)>,
    /// Result when no branch matches.
    pub default: String,
    /// Name bound to the result.
    pub alias: Option<String>,
}

impl CaseExpression {
    /// A `CASE` expression with the given `ELSE` result and no branches.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    /// Set the test expression.
    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }

    /// Add a `WHEN condition THEN result` branch.
    pub fn when(mut self, condition: impl Into<String>, result: impl Into<String>) -> Self {
        self.branches.push((vec![condition.into()], result.into()));
        self
    }

    /// Add a branch matching any of several conditions.
    pub fn when_any<I, T>(mut self, conditions: I, result: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.branches.push((
            conditions.into_iter().map(Into::into).collect(),
            result.into(),
        ));
        self
    }

    /// Bind the result to a name.
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Render the expression.
    pub fn to_cypher(&self) -> String {
        let mut out = String::from("CASE");
        if let Some(test) = &self.test {
            let _ = write!(out, " {}", test);
        }
        for (conditions, result) in &self.branches {
            let _ = write!(out, " WHEN {} THEN {}", conditions.join(", "), result);
        }
        let _ = write!(out, " ELSE {} END", self.default);
        if let Some(alias) = &self.alias {
            let _ = write!(out, " AS {}", alias);
        }
        out
    }
}

/// A filter-driven ternary: `CASE WHEN <filters> THEN t ELSE f END AS ref`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    /// Filters forming the predicate.
    pub filters: Conditions,
    /// Result when the predicate holds.
    pub on_true: String,
    /// Result otherwise.
    pub on_false: String,
    /// Name bound to the result.
    pub ref_name: String,
}

impl CaseWhen {
    /// Create a ternary.
    pub fn new(
        filters: impl Into<Conditions>,
        on_true: impl Into<String>,
        on_false: impl Into<String>,
        ref_name: impl Into<String>,
    ) -> Self {
        Self {
            filters: filters.into(),
            on_true: on_true.into(),
            on_false: on_false.into(),
            ref_name: ref_name.into(),
        }
    }

    /// Render the ternary.
    pub fn to_cypher(&self, escape_default: bool) -> String {
        format!(
            "CASE WHEN {} THEN {} ELSE {} END AS {}",
            self.filters.to_cypher(escape_default),
            self.on_true,
            self.on_false,
            self.ref_name
        )
    }
}

/// A column added by `ALTER TABLE .. ADD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type, e.g. `BOOL`.
    pub data_type: String,
    /// Default value, emitted verbatim.
    pub default: Option<String>,
    /// Whether the column is the primary key.
    pub primary_key: bool,
    /// Whether to emit `IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl ColumnDef {
    /// A column with `IF NOT EXISTS`, no default and no primary key.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            default: None,
            primary_key: false,
            if_not_exists: true,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl fmt::Display) -> Self {
        self.default = Some(value.to_string());
        self
    }

    /// Mark the column as primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set whether `IF NOT EXISTS` is emitted.
    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }

    /// Render the `ADD` clause.
    pub fn to_cypher(&self) -> String {
        let mut out = String::from("ADD");
        if self.if_not_exists {
            out.push_str(" IF NOT EXISTS");
        }
        let _ = write!(out, " {} {}", self.name, self.data_type);
        if let Some(default) = &self.default {
            let _ = write!(out, " DEFAULT {}", default);
        }
        if self.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        out
    }
}

/// An operator call opened by `operator_start`: `ref = operator( args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCall {
    /// Operator name, e.g. `shortestPath`.
    pub operator: String,
    /// Name bound to the result.
    pub ref_name: Option<String>,
    /// Literal arguments placed right after the opening parenthesis.
    pub args: Option<String>,
}

impl OperatorCall {
    /// Call an operator.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            ref_name: None,
            args: None,
        }
    }

    /// Bind the result to a name.
    pub fn named(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// Set literal arguments.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Render the opening part of the call.
    pub fn to_cypher(&self) -> String {
        let mut out = String::new();
        if let Some(ref_name) = &self.ref_name {
            let _ = write!(out, "{} = ", ref_name);
        }
        let _ = write!(out, "{}(", self.operator);
        if let Some(args) = &self.args {
            let _ = write!(out, " {}", args);
        }
        out
    }
}

impl From<&str> for OperatorCall {
    fn from(operator: &str) -> Self {
        Self::new(operator)
    }
}

/// One clause with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// `MATCH` or `OPTIONAL MATCH`.
    Match {
        /// Emit `OPTIONAL MATCH`.
        optional: bool,
    },
    /// `MERGE`
    Merge,
    /// `CREATE`
    Create,
    /// `CALL`
    Call,
    /// `ALTER`
    Alter,
    /// `TABLE name`
    Table(String),
    /// `ADD ...`
    AddColumn(ColumnDef),
    /// `DROP [IF EXISTS] name`
    DropColumn {
        /// Column name.
        name: String,
        /// Emit `IF EXISTS`.
        if_exists: bool,
    },
    /// `;`
    NewQuery,
    /// `,`
    And,
    /// `name =`
    Path(String),
    /// A node pattern.
    Node(NodePattern),
    /// A relationship pattern.
    Relation {
        /// The pattern.
        pattern: RelationPattern,
        /// Its direction.
        direction: Direction,
    },
    /// `WHERE` with property filters.
    Where(Conditions),
    /// `WHERE` with a literal predicate.
    WhereLiteral(String),
    /// `SET` with assignments.
    Set {
        /// Assignments.
        properties: Properties,
        /// Escape flag; `None` uses the builder default.
        escape: Option<bool>,
    },
    /// `SET` with a literal assignment list.
    SetLiteral(String),
    /// `REMOVE a, b`
    Remove(Vec<String>),
    /// `DELETE x` or `DETACH DELETE x`.
    Delete {
        /// What to delete.
        ref_name: String,
        /// Emit `DETACH DELETE`.
        detach: bool,
    },
    /// `RETURN` with an optional literal.
    ReturnLiteral(Option<String>),
    /// `RETURN` with mappings.
    ReturnMapping(Vec<Mapping>),
    /// `YIELD` with mappings.
    Yield(Vec<Mapping>),
    /// `WITH variables`
    With(String),
    /// `UNWIND variables`
    Unwind(String),
    /// A literal procedure invocation.
    Procedure(String),
    /// `CASE ... END`
    Case(CaseExpression),
    /// `CASE WHEN ... END AS ..`
    CaseWhen(CaseWhen),
    /// `LIMIT x`
    Limit(String),
    /// `SKIP x`
    Skip(String),
    /// `ORDER BY a, b ASC|DESC`
    OrderBy {
        /// Sort keys.
        properties: Vec<String>,
        /// Direction.
        order: SortOrder,
    },
    /// `UNION` or `UNION ALL`.
    Union {
        /// Emit `UNION ALL`.
        all: bool,
    },
    /// `ON CREATE`
    OnCreate,
    /// `ON MATCH`
    OnMatch,
    /// `ref = operator( args`
    OperatorStart(OperatorCall),
    /// ` )`
    OperatorEnd,
}

impl Fragment {
    /// The clause kind this fragment applies.
    pub fn clause(&self) -> ClauseKind {
        match self {
            Fragment::Match { .. } => ClauseKind::Match,
            Fragment::Merge => ClauseKind::Merge,
            Fragment::Create => ClauseKind::Create,
            Fragment::Call => ClauseKind::Call,
            Fragment::Alter => ClauseKind::Alter,
            Fragment::Table(_) => ClauseKind::Table,
            Fragment::AddColumn(_) => ClauseKind::AddColumn,
            Fragment::DropColumn { .. } => ClauseKind::DropColumn,
            Fragment::NewQuery => ClauseKind::NewQuery,
            Fragment::And => ClauseKind::And,
            Fragment::Path(_) => ClauseKind::Path,
            Fragment::Node(_) => ClauseKind::Node,
            Fragment::Relation { .. } => ClauseKind::Relation,
            Fragment::Where(_) | Fragment::WhereLiteral(_) => ClauseKind::Where,
            Fragment::Set { .. } | Fragment::SetLiteral(_) => ClauseKind::Set,
            Fragment::Remove(_) => ClauseKind::Remove,
            Fragment::Delete { .. } => ClauseKind::Delete,
            Fragment::ReturnLiteral(_) | Fragment::ReturnMapping(_) => ClauseKind::Return,
            Fragment::Yield(_) => ClauseKind::Yield,
            Fragment::With(_) => ClauseKind::With,
            Fragment::Unwind(_) => ClauseKind::Unwind,
            Fragment::Procedure(_) => ClauseKind::Procedure,
            Fragment::Case(_) => ClauseKind::Case,
            Fragment::CaseWhen(_) => ClauseKind::CaseWhen,
            Fragment::Limit(_) => ClauseKind::Limit,
            Fragment::Skip(_) => ClauseKind::Skip,
            Fragment::OrderBy { .. } => ClauseKind::OrderBy,
            Fragment::Union { .. } => ClauseKind::Union,
            Fragment::OnCreate => ClauseKind::OnCreate,
            Fragment::OnMatch => ClauseKind::OnMatch,
            Fragment::OperatorStart(_) => ClauseKind::OperatorStart,
            Fragment::OperatorEnd => ClauseKind::OperatorEnd,
        }
    }

    /// Append this fragment to `text`.
    ///
    /// `escape_default` is used by fragments whose caller did not set an
    /// escape flag.
    pub fn render_onto(&self, text: &mut String, escape_default: bool) {
        match self {
            Fragment::Match { optional: false } => text.push_str(" MATCH"),
            Fragment::Match { optional: true } => text.push_str(" OPTIONAL MATCH"),
            Fragment::Merge => text.push_str(" MERGE"),
            Fragment::Create => text.push_str(" CREATE"),
            Fragment::Call => text.push_str(" CALL"),
            Fragment::Alter => text.push_str(" ALTER"),
            Fragment::Table(name) => {
                let _ = write!(text, " TABLE {}", name);
            }
            Fragment::AddColumn(column) => {
                text.push(' ');
                text.push_str(&column.to_cypher());
            }
            Fragment::DropColumn { name, if_exists } => {
                text.push_str(" DROP ");
                if *if_exists {
                    text.push_str("IF EXISTS ");
                }
                text.push_str(name);
            }
            Fragment::NewQuery => text.push(';'),
            Fragment::And => text.push(','),
            Fragment::Path(name) => {
                let _ = write!(text, " {} =", name);
            }
            Fragment::Node(pattern) => {
                if !text.ends_with(&CONNECTORS[..]) {
                    text.push(' ');
                }
                text.push_str(&pattern.to_cypher(escape_default));
            }
            Fragment::Relation { pattern, direction } => {
                text.push_str(&pattern.to_cypher(*direction, escape_default));
            }
            Fragment::Where(conditions) => {
                text.push_str(" WHERE ");
                text.push_str(&conditions.to_cypher(escape_default));
            }
            Fragment::WhereLiteral(predicate) => {
                text.push_str(" WHERE ");
                text.push_str(predicate);
            }
            Fragment::Set { properties, escape } => {
                text.push_str(" SET ");
                text.push_str(&properties.to_cypher(
                    "=",
                    ", ",
                    escape.unwrap_or(escape_default),
                ));
            }
            Fragment::SetLiteral(assignments) => {
                text.push_str(" SET ");
                text.push_str(assignments);
            }
            Fragment::Remove(items) => {
                text.push_str(" REMOVE ");
                text.push_str(&items.join(", "));
            }
            Fragment::Delete { ref_name, detach } => {
                text.push_str(if *detach { " DETACH DELETE " } else { " DELETE " });
                text.push_str(ref_name);
            }
            Fragment::ReturnLiteral(literal) => {
                text.push_str(" RETURN");
                if let Some(literal) = literal {
                    text.push(' ');
                    text.push_str(literal);
                }
            }
            Fragment::ReturnMapping(mappings) => {
                text.push_str(" RETURN ");
                text.push_str(&join(mappings, Mapping::to_return_cypher));
            }
            Fragment::Yield(mappings) => {
                text.push_str(" YIELD ");
                text.push_str(&join(mappings, Mapping::to_yield_cypher));
            }
            Fragment::With(variables) => {
                let _ = write!(text, " WITH {}", variables);
            }
            Fragment::Unwind(variables) => {
                let _ = write!(text, " UNWIND {}", variables);
            }
            Fragment::Procedure(procedure) => {
                let _ = write!(text, " {}", procedure);
            }
            Fragment::Case(case) => {
                text.push(' ');
                text.push_str(&case.to_cypher());
            }
            Fragment::CaseWhen(case_when) => {
                text.push(' ');
                text.push_str(&case_when.to_cypher(escape_default));
            }
            Fragment::Limit(limit) => {
                let _ = write!(text, " LIMIT {}", limit);
            }
            Fragment::Skip(skip) => {
                let _ = write!(text, " SKIP {}", skip);
            }
            Fragment::OrderBy { properties, order } => {
                let _ = write!(text, " ORDER BY {} {}", properties.join(", "), order);
            }
            Fragment::Union { all: false } => text.push_str(" UNION"),
            Fragment::Union { all: true } => text.push_str(" UNION ALL"),
            Fragment::OnCreate => text.push_str(" ON CREATE"),
            Fragment::OnMatch => text.push_str(" ON MATCH"),
            Fragment::OperatorStart(call) => {
                text.push(' ');
                text.push_str(&call.to_cypher());
            }
            Fragment::OperatorEnd => text.push_str(" )"),
        }
    }
}

fn join(mappings: &[Mapping], render: fn(&Mapping) -> String) -> String {
    mappings.iter().map(render).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Hops;

    fn render(text: &str, fragment: Fragment) -> String {
        let mut text = text.to_string();
        fragment.render_onto(&mut text, true);
        text
    }

    #[test]
    fn test_keyword_fragments() {
        assert_eq!(render("", Fragment::Match { optional: false }), " MATCH");
        assert_eq!(render("", Fragment::Match { optional: true }), " OPTIONAL MATCH");
        assert_eq!(render(" RETURN n", Fragment::NewQuery), " RETURN n;");
        assert_eq!(render(" MATCH (a)", Fragment::And), " MATCH (a),");
        assert_eq!(render(" MATCH", Fragment::Path("p".into())), " MATCH p =");
        assert_eq!(render("", Fragment::Union { all: true }), " UNION ALL");
        assert_eq!(render("", Fragment::OperatorEnd), " )");
    }

    #[test]
    fn test_node_spacing() {
        let node = || Fragment::Node(NodePattern::named("b"));
        assert_eq!(render(" MATCH", node()), " MATCH (b)");
        assert_eq!(render(" MATCH (a)-->", node()), " MATCH (a)-->(b)");
        assert_eq!(render(" MATCH (a)<--", node()), " MATCH (a)<--(b)");
        assert_eq!(render(" MATCH (a)--", node()), " MATCH (a)--(b)");
    }

    #[test]
    fn test_relation_has_no_leading_space() {
        let fragment = Fragment::Relation {
            pattern: RelationPattern::typed("KNOWS").with_hops(Hops::range(1, 3)),
            direction: Direction::Forward,
        };
        assert_eq!(render(" MATCH (a)", fragment), " MATCH (a)-[: KNOWS*1..3]->");
    }

    #[test]
    fn test_where_variants() {
        let single = Fragment::Where(Conditions::single("n.age", ">", 30));
        assert_eq!(render("", single), " WHERE n.age > 30");

        let multiple = Fragment::Where(Conditions::new([("a", "1"), ("b", "2")]).joined_by(" OR "));
        assert_eq!(render("", multiple), r#" WHERE a = "1" OR b = "2""#);

        let literal = Fragment::WhereLiteral("p.lock IS NULL OR p.value IS NULL".into());
        assert_eq!(render("", literal), " WHERE p.lock IS NULL OR p.value IS NULL");
    }

    #[test]
    fn test_where_escape_override() {
        let conditions = Conditions::new([("n.id", "m.id")]).with_escape(false);
        assert_eq!(render("", Fragment::Where(conditions)), " WHERE n.id = m.id");
    }

    #[test]
    fn test_set_escape() {
        let properties = Properties::from([("n.id", r#"n.id + "1""#)]);
        let escaped = Fragment::Set {
            properties: properties.clone(),
            escape: None,
        };
        assert_eq!(render("", escaped), r#" SET n.id = "n.id + \"1\"""#);

        let verbatim = Fragment::Set {
            properties: properties.clone(),
            escape: Some(false),
        };
        assert_eq!(render("", verbatim), r#" SET n.id = n.id + "1""#);

        let mut text = String::new();
        Fragment::Set {
            properties,
            escape: None,
        }
        .render_onto(&mut text, false);
        assert_eq!(text, r#" SET n.id = n.id + "1""#);
    }

    #[test]
    fn test_return_mapping_drops_dots_without_alias() {
        // No alias: the expression itself is rewritten and no AS is emitted.
        let fragment = Fragment::ReturnMapping(vec![
            Mapping::from(("n.name", "name")),
            Mapping::from("n.age"),
            Mapping::from(("m", "")),
        ]);
        assert_eq!(render("", fragment), " RETURN n.name AS name, n_age, m");
    }

    #[test]
    fn test_yield_derives_alias() {
        let fragment = Fragment::Yield(vec![Mapping::from("node.id"), Mapping::from(("x", "y"))]);
        assert_eq!(render("", fragment), " YIELD node.id AS node_id, x AS y");
    }

    #[test]
    fn test_return_literal() {
        assert_eq!(render("", Fragment::ReturnLiteral(None)), " RETURN");
        assert_eq!(render("", Fragment::ReturnLiteral(Some("n".into()))), " RETURN n");
    }

    #[test]
    fn test_case_when() {
        let case_when = CaseWhen::new([("n.attribute_1", "Bob")], "true", "false", "my_boolean");
        assert_eq!(
            render(" WITH n", Fragment::CaseWhen(case_when)),
            r#" WITH n CASE WHEN n.attribute_1 = "Bob" THEN true ELSE false END AS my_boolean"#
        );
    }

    #[test]
    fn test_case_without_test_or_alias() {
        let case = CaseExpression::new("0").when("n.age < 18", "1");
        assert_eq!(render("", Fragment::Case(case)), " CASE WHEN n.age < 18 THEN 1 ELSE 0 END");
    }

    #[test]
    fn test_columns() {
        let add = ColumnDef::new("bool_col", "BOOL").with_default("True").primary_key();
        assert_eq!(
            render(" ALTER TABLE NODE", Fragment::AddColumn(add)),
            " ALTER TABLE NODE ADD IF NOT EXISTS bool_col BOOL DEFAULT True PRIMARY KEY"
        );

        let plain = ColumnDef::new("x", "INT64").if_not_exists(false);
        assert_eq!(render("", Fragment::AddColumn(plain)), " ADD x INT64");

        let drop = Fragment::DropColumn {
            name: "x".into(),
            if_exists: true,
        };
        assert_eq!(render("", drop), " DROP IF EXISTS x");
        let drop = Fragment::DropColumn {
            name: "x".into(),
            if_exists: false,
        };
        assert_eq!(render("", drop), " DROP x");
    }

    #[test]
    fn test_ordering_and_paging() {
        let order = Fragment::OrderBy {
            properties: vec!["n.name".into(), "n.age".into()],
            order: SortOrder::Descending,
        };
        assert_eq!(render("", order), " ORDER BY n.name, n.age DESC");
        assert_eq!(render("", Fragment::Skip("10".into())), " SKIP 10");
        assert_eq!(render("", Fragment::Limit("$limit".into())), " LIMIT $limit");
    }

    #[test]
    fn test_operator_call() {
        let call = OperatorCall::new("shortestPath").named("p");
        assert_eq!(render(" MATCH", Fragment::OperatorStart(call)), " MATCH p = shortestPath(");
        let call = OperatorCall::new("f").with_args("1, 2");
        assert_eq!(call.to_cypher(), "f( 1, 2");
    }

    #[test]
    fn test_remove_and_delete() {
        assert_eq!(
            render("", Fragment::Remove(vec!["n.a".into(), "n.b".into()])),
            " REMOVE n.a, n.b"
        );
        let delete = Fragment::Delete {
            ref_name: "n".into(),
            detach: true,
        };
        assert_eq!(render("", delete), " DETACH DELETE n");
    }

    #[test]
    fn test_fragment_clause_kinds() {
        assert_eq!(Fragment::WhereLiteral("x".into()).clause(), ClauseKind::Where);
        assert_eq!(Fragment::SetLiteral("x".into()).clause(), ClauseKind::Set);
        assert_eq!(Fragment::ReturnLiteral(None).clause(), ClauseKind::Return);
        assert_eq!(Fragment::Match { optional: true }.clause(), ClauseKind::Match);
    }
}
