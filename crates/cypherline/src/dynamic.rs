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

//! Runtime-checked query builder.
//!
//! [`DynamicQuery`] is for clause sequences that are only known at runtime,
//! e.g. assembled from a user interface or a config file. It carries its
//! state as a [`StateKind`] tag and checks every [`Fragment`] against the
//! same transition table the typed builder is generated from.

use std::fmt;
use std::ops::Add;

use crate::config::BuilderConfig;
use crate::error::{QueryError, Result};
use crate::fragment::Fragment;
use crate::grammar::{state, ClauseKind, StateKind};
use crate::query::{Query, QueryText};

/// A query under construction whose state is checked at runtime.
///
/// # Examples
///
/// ```
/// use cypherline::{DynamicQuery, Fragment, NodePattern, QueryError};
///
/// let q = DynamicQuery::new()
///     .apply(Fragment::Match { optional: false })?
///     .apply(Fragment::Node(NodePattern::named("n")))?
///     .apply(Fragment::ReturnLiteral(Some("n".into())))?;
/// assert_eq!(q.render(), "MATCH (n) RETURN n");
///
/// let err = DynamicQuery::new().apply(Fragment::OnCreate).unwrap_err();
/// assert!(matches!(err, QueryError::GrammarViolation { .. }));
/// # Ok::<(), QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicQuery {
    buf: QueryText,
    state: StateKind,
}

impl DynamicQuery {
    /// Create an empty query with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create an empty query with a custom configuration.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self::from_text(QueryText::new(config), StateKind::Start)
    }

    pub(crate) fn from_text(buf: QueryText, state: StateKind) -> Self {
        Self { buf, state }
    }

    /// The current state.
    pub fn state(&self) -> StateKind {
        self.state
    }

    /// The configuration of this handle.
    pub fn config(&self) -> &BuilderConfig {
        &self.buf.config
    }

    /// Number of operator calls opened and not yet closed.
    pub fn open_operators(&self) -> usize {
        self.buf.open_operators
    }

    /// Check if `clause` may be applied next.
    pub fn allows(&self, clause: ClauseKind) -> bool {
        self.state.allows(clause)
    }

    /// Clauses that may be applied next.
    pub fn allowed_clauses(&self) -> Vec<ClauseKind> {
        self.state.clauses()
    }

    /// Append a fragment in place.
    ///
    /// # Errors
    ///
    /// [`QueryError::GrammarViolation`] if the current state does not allow
    /// the fragment's clause, and [`QueryError::UnmatchedOperatorEnd`] for an
    /// operator end with no open operator call. The query is left unchanged
    /// on error.
    pub fn push(&mut self, fragment: Fragment) -> Result<()> {
        let clause = fragment.clause();
        let next = self
            .state
            .successor(clause)
            .ok_or(QueryError::GrammarViolation {
                clause,
                state: self.state,
            })?;
        if matches!(fragment, Fragment::OperatorEnd) && self.buf.open_operators == 0 {
            return Err(QueryError::UnmatchedOperatorEnd);
        }
        self.buf.push(&fragment, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Append a fragment, consuming and returning the handle.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn apply(mut self, fragment: Fragment) -> Result<Self> {
        self.push(fragment)?;
        Ok(self)
    }

    /// Append every fragment in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn extend<I>(mut self, fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = Fragment>,
    {
        for fragment in fragments {
            self.push(fragment)?;
        }
        Ok(self)
    }

    /// Append arbitrary text and move to the [`Any`](StateKind::Any) state.
    /// Unchecked.
    pub fn raw(mut self, cypher: &str) -> Self {
        self.buf.push_raw(cypher);
        self.state = StateKind::Any;
        self
    }

    /// Clear the text and return to the start state, keeping the configuration.
    pub fn reset(mut self) -> Self {
        self.buf.clear();
        self.state = StateKind::Start;
        self
    }

    /// The query text, trimmed.
    pub fn render(&self) -> String {
        self.buf.render()
    }

    /// The query text, trimmed, after checking operator balance and length.
    ///
    /// # Errors
    ///
    /// See [`Query::try_render`].
    pub fn try_render(&self) -> Result<String> {
        self.buf.try_render()
    }

    /// Convert into a typed handle in the unchecked [`Any`](state::Any) state.
    pub fn into_query(self) -> Query<state::Any> {
        Query::from_text(self.buf)
    }
}

impl Default for DynamicQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DynamicQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.buf.text.trim())
    }
}

impl<S: crate::grammar::QueryState> From<Query<S>> for DynamicQuery {
    fn from(query: Query<S>) -> Self {
        query.into_dynamic()
    }
}

/// Concatenation; the result takes the right operand's state and the left
/// operand's configuration.
impl Add for DynamicQuery {
    type Output = DynamicQuery;

    fn add(mut self, rhs: DynamicQuery) -> DynamicQuery {
        self.buf.append(rhs.buf);
        self.state = rhs.state;
        self
    }
}
