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

//! Typed query builder handles.
//!
//! [`Query<S>`] carries the accumulated text and the configuration. The
//! state `S` only exists in the type: each clause method consumes the handle
//! and returns it retyped to the clause's successor state, so the compiler
//! rejects clause orders the grammar does not allow.
//!
//! ```compile_fail
//! use cypherline::{NodePattern, Query};
//!
//! // A node cannot start a query.
//! let q = Query::new().node(NodePattern::new());
//! ```
//!
//! ```compile_fail
//! use cypherline::{NodePattern, Query};
//!
//! // ON CREATE is only legal after a MERGE pattern.
//! let q = Query::new().match_().node(NodePattern::named("n")).on_create();
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign};

use tracing::{debug, trace, warn};

use crate::config::BuilderConfig;
use crate::dynamic::DynamicQuery;
use crate::error::{QueryError, Result};
use crate::fragment::{CaseExpression, CaseWhen, ColumnDef, Conditions, Fragment, Mapping, OperatorCall, SortOrder};
use crate::grammar::{clause, state, QueryState, StateKind};
use crate::pattern::{Direction, NodePattern, RelationPattern};
use crate::properties::{Properties, PropertyValue};

/// Accumulated query text shared by typed and dynamic handles.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueryText {
    pub(crate) text: String,
    pub(crate) open_operators: usize,
    pub(crate) config: BuilderConfig,
}

impl QueryText {
    pub(crate) fn new(config: BuilderConfig) -> Self {
        Self {
            text: String::new(),
            open_operators: 0,
            config,
        }
    }

    /// Append a fragment. The caller has already checked the transition.
    pub(crate) fn push(&mut self, fragment: &Fragment, from: StateKind, to: StateKind) {
        match fragment {
            Fragment::OperatorStart(_) => self.open_operators += 1,
            Fragment::OperatorEnd => {
                if self.open_operators == 0 {
                    warn!(state = %from, "operator end without a matching operator start");
                } else {
                    self.open_operators -= 1;
                }
            }
            _ => {}
        }
        fragment.render_onto(&mut self.text, self.config.escape_values);
        trace!(clause = %fragment.clause(), %from, %to, "appended fragment");
    }

    /// Append unchecked text, separated by one space.
    pub(crate) fn push_raw(&mut self, cypher: &str) {
        debug!(len = cypher.len(), "appending unchecked query text");
        self.join(cypher);
    }

    /// Append another query's text, separated by one space.
    pub(crate) fn append(&mut self, other: QueryText) {
        self.join(&other.text);
        self.open_operators += other.open_operators;
    }

    fn join(&mut self, tail: &str) {
        let tail = tail.trim();
        if tail.is_empty() {
            return;
        }
        let head_len = self.text.trim_end().len();
        self.text.truncate(head_len);
        let head_start = self.text.len() - self.text.trim_start().len();
        self.text.drain(..head_start);
        self.text.push(' ');
        self.text.push_str(tail);
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.open_operators = 0;
    }

    pub(crate) fn render(&self) -> String {
        self.text.trim().to_string()
    }

    pub(crate) fn try_render(&self) -> Result<String> {
        if self.config.require_balanced_operators && self.open_operators > 0 {
            warn!(open = self.open_operators, "refusing to render query with open operator calls");
            return Err(QueryError::UnbalancedOperators {
                open: self.open_operators,
            });
        }
        let rendered = self.render();
        if let Some(max_length) = self.config.max_query_length {
            if rendered.len() > max_length {
                warn!(length = rendered.len(), max_length, "rendered query exceeds maximum length");
                return Err(QueryError::QueryTooLong {
                    length: rendered.len(),
                    max_length,
                });
            }
        }
        Ok(rendered)
    }
}

/// A query under construction, in state `S`.
///
/// Only the clauses `S` allows are callable. Start a query with
/// [`Query::new`] or [`Query::with_config`].
///
/// # Examples
///
/// ```
/// use cypherline::{NodePattern, Query};
///
/// let query = Query::new()
///     .match_()
///     .node(NodePattern::labeled("Person").with_ref_name("p"))
///     .return_literal("p");
/// assert_eq!(query.render(), "MATCH (p: Person) RETURN p");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query<S: QueryState = state::Start> {
    buf: QueryText,
    _state: PhantomData<S>,
}

/// Entry point of the builder: an empty query in the start state.
pub type QueryBuilder = Query<state::Start>;

impl Query<state::Start> {
    /// Create an empty query with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create an empty query with a custom configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self::from_text(QueryText::new(config))
    }
}

impl Default for Query<state::Start> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: QueryState> Query<S> {
    pub(crate) fn from_text(buf: QueryText) -> Self {
        Self {
            buf,
            _state: PhantomData,
        }
    }

    pub(crate) fn into_text(self) -> QueryText {
        self.buf
    }

    fn push<N: QueryState>(mut self, fragment: Fragment) -> Query<N> {
        debug_assert_eq!(
            S::KIND.successor(fragment.clause()),
            Some(N::KIND),
            "typed transition disagrees with the grammar table"
        );
        self.buf.push(&fragment, S::KIND, N::KIND);
        Query::from_text(self.buf)
    }

    /// The current state.
    pub fn state(&self) -> StateKind {
        S::KIND
    }

    /// The configuration of this handle.
    pub fn config(&self) -> &BuilderConfig {
        &self.buf.config
    }

    /// Number of operator calls opened and not yet closed.
    pub fn open_operators(&self) -> usize {
        self.buf.open_operators
    }

    /// The query text, trimmed.
    ///
    /// Never fails; use [`try_render`](Self::try_render) to enforce the
    /// configured checks.
    pub fn render(&self) -> String {
        self.buf.render()
    }

    /// The query text, trimmed, after checking operator balance and length.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnbalancedOperators`] if operator calls are still
    /// open and the configuration requires balance, or
    /// [`QueryError::QueryTooLong`] if the text exceeds the configured limit.
    pub fn try_render(&self) -> Result<String> {
        self.buf.try_render()
    }

    /// Append arbitrary query text.
    ///
    /// This is unchecked: the result is in the [`Any`](state::Any) state,
    /// which allows every clause, and nothing verifies that the text or what
    /// follows it is valid.
    ///
    /// ```
    /// use cypherline::{NodePattern, Query};
    ///
    /// let q = Query::new()
    ///     .raw("MATCH (n) WHERE n.x IN [1, 2]")
    ///     .return_literal("n");
    /// assert_eq!(q.render(), "MATCH (n) WHERE n.x IN [1, 2] RETURN n");
    /// ```
    pub fn raw(mut self, cypher: &str) -> Query<state::Any> {
        self.buf.push_raw(cypher);
        Query::from_text(self.buf)
    }

    /// Clear the text and return to the start state, keeping the configuration.
    pub fn reset(mut self) -> Query<state::Start> {
        self.buf.clear();
        Query::from_text(self.buf)
    }

    /// Convert into a runtime-checked builder in the same state.
    pub fn into_dynamic(self) -> DynamicQuery {
        DynamicQuery::from_text(self.buf, S::KIND)
    }
}

impl<S: QueryState> fmt::Display for Query<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.buf.text.trim())
    }
}

/// Concatenation: `left.trim() + " " + right.trim()`.
///
/// The result takes the state of the right operand and the configuration of
/// the left one.
impl<S: QueryState, T: QueryState> Add<Query<T>> for Query<S> {
    type Output = Query<T>;

    fn add(mut self, rhs: Query<T>) -> Query<T> {
        self.buf.append(rhs.buf);
        Query::from_text(self.buf)
    }
}

/// In-place concatenation.
///
/// The handle keeps its own state `S` even though the appended text may end
/// in a different one, so clause methods called afterwards are unchecked.
impl<S: QueryState, T: QueryState> AddAssign<Query<T>> for Query<S> {
    fn add_assign(&mut self, rhs: Query<T>) {
        self.buf.append(rhs.buf);
    }
}

impl<S: clause::Match> Query<S> {
    /// Append `MATCH`.
    pub fn match_(self) -> Query<S::Next> {
        self.push(Fragment::Match { optional: false })
    }

    /// Append `OPTIONAL MATCH`.
    pub fn optional_match(self) -> Query<S::Next> {
        self.push(Fragment::Match { optional: true })
    }
}

impl<S: clause::Merge> Query<S> {
    /// Append `MERGE`. The next node pattern enters the merge sub-grammar,
    /// where `ON CREATE` and `ON MATCH` are available.
    pub fn merge(self) -> Query<S::Next> {
        self.push(Fragment::Merge)
    }
}

impl<S: clause::Create> Query<S> {
    /// Append `CREATE`.
    pub fn create(self) -> Query<S::Next> {
        self.push(Fragment::Create)
    }
}

impl<S: clause::Call> Query<S> {
    /// Append `CALL`.
    pub fn call(self) -> Query<S::Next> {
        self.push(Fragment::Call)
    }
}

impl<S: clause::Procedure> Query<S> {
    /// Append a literal procedure invocation, e.g. `db.labels()`.
    pub fn procedure(self, procedure: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::Procedure(procedure.to_string()))
    }
}

impl<S: clause::With> Query<S> {
    /// Append `WITH variables`.
    pub fn with(self, variables: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::With(variables.to_string()))
    }
}

impl<S: clause::Unwind> Query<S> {
    /// Append `UNWIND variables`.
    pub fn unwind(self, variables: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::Unwind(variables.to_string()))
    }
}

impl<S: clause::Alter> Query<S> {
    /// Append `ALTER`.
    pub fn alter(self) -> Query<S::Next> {
        self.push(Fragment::Alter)
    }
}

impl<S: clause::Table> Query<S> {
    /// Append `TABLE name`.
    pub fn table(self, name: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::Table(name.to_string()))
    }
}

impl<S: clause::AddColumn> Query<S> {
    /// Append `ADD [IF NOT EXISTS] name TYPE [DEFAULT v] [PRIMARY KEY]`.
    ///
    /// The statement must then be closed with [`new_query`](Query::new_query).
    pub fn add_column(self, column: ColumnDef) -> Query<S::Next> {
        self.push(Fragment::AddColumn(column))
    }
}

impl<S: clause::DropColumn> Query<S> {
    /// Append `DROP [IF EXISTS] name`.
    pub fn drop_column(self, name: impl Into<String>, if_exists: bool) -> Query<S::Next> {
        self.push(Fragment::DropColumn {
            name: name.into(),
            if_exists,
        })
    }
}

impl<S: clause::NewQuery> Query<S> {
    /// Append `;` and start a new statement.
    pub fn new_query(self) -> Query<S::Next> {
        self.push(Fragment::NewQuery)
    }
}

impl<S: clause::And> Query<S> {
    /// Append `,` to continue a pattern list.
    pub fn and(self) -> Query<S::Next> {
        self.push(Fragment::And)
    }
}

impl<S: clause::Path> Query<S> {
    /// Bind the following pattern to a path name: `name =`.
    pub fn path(self, name: impl Into<String>) -> Query<S::Next> {
        self.push(Fragment::Path(name.into()))
    }
}

impl<S: clause::Node> Query<S> {
    /// Append a node pattern.
    ///
    /// A separating space is inserted unless the text ends in a relationship
    /// connector, so `(a)-->(b)` stays contiguous.
    pub fn node(self, pattern: impl Into<NodePattern>) -> Query<S::Next> {
        self.push(Fragment::Node(pattern.into()))
    }
}

impl<S: clause::Relation> Query<S> {
    /// Append an undirected relationship, `-[..]-`.
    pub fn related(self, pattern: RelationPattern) -> Query<S::Next> {
        self.relation(pattern, Direction::Undirected)
    }

    /// Append an outgoing relationship, `-[..]->`.
    pub fn related_to(self, pattern: RelationPattern) -> Query<S::Next> {
        self.relation(pattern, Direction::Forward)
    }

    /// Append an incoming relationship, `<-[..]-`.
    pub fn related_from(self, pattern: RelationPattern) -> Query<S::Next> {
        self.relation(pattern, Direction::Backward)
    }

    fn relation(self, pattern: RelationPattern, direction: Direction) -> Query<S::Next> {
        self.push(Fragment::Relation { pattern, direction })
    }
}

impl<S: clause::Where> Query<S> {
    /// Append `WHERE name <comparison> value`.
    pub fn where_(
        self,
        name: impl Into<String>,
        comparison: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Query<S::Next> {
        self.where_multiple(Conditions::single(name, comparison, value))
    }

    /// Append `WHERE` with several property filters.
    ///
    /// ```
    /// use cypherline::{Conditions, Query};
    ///
    /// let q = Query::new()
    ///     .match_()
    ///     .node(cypherline::NodePattern::named("n"))
    ///     .where_multiple(Conditions::new([("n.a", "1"), ("n.b", "2")]).joined_by(" OR "));
    /// assert_eq!(q.render(), r#"MATCH (n) WHERE n.a = "1" OR n.b = "2""#);
    /// ```
    pub fn where_multiple(self, conditions: impl Into<Conditions>) -> Query<S::Next> {
        self.push(Fragment::Where(conditions.into()))
    }

    /// Append `WHERE` with a literal predicate, emitted unchanged.
    pub fn where_literal(self, predicate: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::WhereLiteral(predicate.to_string()))
    }
}

impl<S: clause::Set> Query<S> {
    /// Append `SET` with assignments, escaping values per the configuration.
    pub fn set(self, properties: impl Into<Properties>) -> Query<S::Next> {
        self.push(Fragment::Set {
            properties: properties.into(),
            escape: None,
        })
    }

    /// Append `SET` with assignments whose values are emitted verbatim.
    pub fn set_unescaped(self, properties: impl Into<Properties>) -> Query<S::Next> {
        self.push(Fragment::Set {
            properties: properties.into(),
            escape: Some(false),
        })
    }

    /// Append `SET` with a literal assignment list.
    pub fn set_literal(self, assignments: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::SetLiteral(assignments.to_string()))
    }
}

impl<S: clause::Remove> Query<S> {
    /// Append `REMOVE a, b`.
    pub fn remove<I, T>(self, items: I) -> Query<S::Next>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.push(Fragment::Remove(items.into_iter().map(Into::into).collect()))
    }
}

impl<S: clause::Delete> Query<S> {
    /// Append `DELETE ref`.
    pub fn delete(self, ref_name: impl Into<String>) -> Query<S::Next> {
        self.push(Fragment::Delete {
            ref_name: ref_name.into(),
            detach: false,
        })
    }

    /// Append `DETACH DELETE ref`.
    pub fn detach_delete(self, ref_name: impl Into<String>) -> Query<S::Next> {
        self.push(Fragment::Delete {
            ref_name: ref_name.into(),
            detach: true,
        })
    }
}

impl<S: clause::Return> Query<S> {
    /// Append `RETURN literal`.
    pub fn return_literal(self, literal: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::ReturnLiteral(Some(literal.to_string())))
    }

    /// Append `RETURN` with mappings.
    ///
    /// A mapping without alias renders its expression with `.` replaced by
    /// `_` and no `AS`:
    ///
    /// ```
    /// use cypherline::{NodePattern, Query};
    ///
    /// let q = Query::new()
    ///     .match_()
    ///     .node(NodePattern::named("n"))
    ///     .return_mapping([("n.name", "name")])
    ///     .return_mapping(["n.age"]);
    /// assert_eq!(q.render(), "MATCH (n) RETURN n.name AS name RETURN n_age");
    /// ```
    pub fn return_mapping<I, M>(self, mappings: I) -> Query<S::Next>
    where
        I: IntoIterator<Item = M>,
        M: Into<Mapping>,
    {
        self.push(Fragment::ReturnMapping(mappings.into_iter().map(Into::into).collect()))
    }
}

impl<S: clause::Yield> Query<S> {
    /// Append `YIELD` with mappings; a missing alias is derived from the
    /// expression.
    pub fn yield_<I, M>(self, mappings: I) -> Query<S::Next>
    where
        I: IntoIterator<Item = M>,
        M: Into<Mapping>,
    {
        self.push(Fragment::Yield(mappings.into_iter().map(Into::into).collect()))
    }
}

impl<S: clause::Case> Query<S> {
    /// Append a `CASE` expression.
    pub fn case(self, case: CaseExpression) -> Query<S::Next> {
        self.push(Fragment::Case(case))
    }
}

impl<S: clause::CaseWhen> Query<S> {
    /// Append `CASE WHEN <filters> THEN .. ELSE .. END AS ..`.
    pub fn case_when(self, case_when: CaseWhen) -> Query<S::Next> {
        self.push(Fragment::CaseWhen(case_when))
    }
}

impl<S: clause::Limit> Query<S> {
    /// Append `LIMIT x`.
    pub fn limit(self, limit: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::Limit(limit.to_string()))
    }
}

impl<S: clause::Skip> Query<S> {
    /// Append `SKIP x`.
    pub fn skip(self, skip: impl fmt::Display) -> Query<S::Next> {
        self.push(Fragment::Skip(skip.to_string()))
    }
}

impl<S: clause::OrderBy> Query<S> {
    /// Append `ORDER BY a, b ASC|DESC`.
    pub fn order_by<I, T>(self, properties: I, order: SortOrder) -> Query<S::Next>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.push(Fragment::OrderBy {
            properties: properties.into_iter().map(Into::into).collect(),
            order,
        })
    }
}

impl<S: clause::Union> Query<S> {
    /// Append `UNION`.
    pub fn union(self) -> Query<S::Next> {
        self.push(Fragment::Union { all: false })
    }

    /// Append `UNION ALL`.
    pub fn union_all(self) -> Query<S::Next> {
        self.push(Fragment::Union { all: true })
    }
}

impl<S: clause::OnCreate> Query<S> {
    /// Append `ON CREATE`.
    pub fn on_create(self) -> Query<S::Next> {
        self.push(Fragment::OnCreate)
    }
}

impl<S: clause::OnMatch> Query<S> {
    /// Append `ON MATCH`.
    pub fn on_match(self) -> Query<S::Next> {
        self.push(Fragment::OnMatch)
    }
}

impl<S: clause::OperatorStart> Query<S> {
    /// Open an operator call: `ref = operator( args`.
    ///
    /// Close it with [`operator_end`](Query::operator_end). Open calls are
    /// counted; [`try_render`](Query::try_render) rejects a query that
    /// leaves any open.
    pub fn operator_start(self, call: impl Into<OperatorCall>) -> Query<S::Next> {
        self.push(Fragment::OperatorStart(call.into()))
    }
}

impl<S: clause::OperatorEnd> Query<S> {
    /// Close an operator call: ` )`.
    pub fn operator_end(self) -> Query<S::Next> {
        self.push(Fragment::OperatorEnd)
    }
}
