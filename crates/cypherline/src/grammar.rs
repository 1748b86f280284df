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

//! The clause grammar: which clause may follow which.
//!
//! The grammar is a finite set of states. Each state allows a fixed set of
//! clauses, and each (state, clause) pair leads to exactly one next state.
//! The table is written once, in the `grammar!` invocation below, and
//! expands into both views of it:
//!
//! - **type level**: a zero-sized marker per state in [`state`], and a trait
//!   per clause in [`clause`] whose associated `Next` type is the target
//!   state. [`Query<S>`](crate::Query) only offers a clause's methods when
//!   `S` implements that clause's trait, so an illegal order does not compile.
//! - **runtime**: [`StateKind`] / [`ClauseKind`] tags and a transition table
//!   consulted by [`StateKind::successor`] and by
//!   [`DynamicQuery`](crate::DynamicQuery).
//!
//! Node, relationship and SET clauses are context sensitive: after `MERGE`
//! they lead into the merge sub-grammar (`NodeAfterMerge`,
//! `RelationAfterMerge`, `SetAfterMerge`), which is the only place
//! `ON CREATE` / `ON MATCH` are legal. That routing is just a different
//! `Next` for the same clause trait.

use serde::{Deserialize, Serialize};
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A builder state known at compile time.
///
/// Implemented only by the markers in [`state`].
pub trait QueryState: sealed::Sealed {
    /// Runtime tag of this state.
    const KIND: StateKind;
}

macro_rules! clauses {
    ($( $(#[$meta:meta])* $clause:ident ),* $(,)?) => {
        /// Runtime tag of a clause kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ClauseKind {
            $( $(#[$meta])* $clause, )*
        }

        impl ClauseKind {
            /// Every clause kind.
            pub const ALL: &'static [ClauseKind] = &[$( ClauseKind::$clause ),*];

            /// The clause name.
            pub fn name(self) -> &'static str {
                match self {
                    $( ClauseKind::$clause => stringify!($clause), )*
                }
            }
        }

        /// One trait per clause kind, implemented by every state that allows it.
        pub mod clause {
            use super::QueryState;

            $(
                $(#[$meta])*
                pub trait $clause: QueryState {
                    /// State reached after this clause.
                    type Next: QueryState;
                }
            )*
        }
    };
}

macro_rules! grammar {
    ($(
        $(#[$meta:meta])*
        $state:ident { $( $clause:ident => $next:ident ),* $(,)? }
    )*) => {
        /// Runtime tag of a builder state.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum StateKind {
            $( $(#[$meta])* $state, )*
        }

        impl StateKind {
            /// Every state.
            pub const ALL: &'static [StateKind] = &[$( StateKind::$state ),*];

            /// The state name.
            pub fn name(self) -> &'static str {
                match self {
                    $( StateKind::$state => stringify!($state), )*
                }
            }
        }

        /// Zero-sized marker types, one per builder state.
        pub mod state {
            $(
                $(#[$meta])*
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
                pub struct $state;

                impl super::sealed::Sealed for $state {}

                impl super::QueryState for $state {
                    const KIND: super::StateKind = super::StateKind::$state;
                }
            )*
        }

        $($(
            impl clause::$clause for state::$state {
                type Next = state::$next;
            }
        )*)*

        /// (from, clause, to) rows of the transition table.
        pub(crate) const TRANSITIONS: &[(StateKind, ClauseKind, StateKind)] = &[
            $($( (StateKind::$state, ClauseKind::$clause, StateKind::$next), )*)*
        ];
    };
}

clauses! {
    /// `ADD [IF NOT EXISTS] column TYPE ...`
    AddColumn,
    /// `ALTER`
    Alter,
    /// `,` continuing a pattern list.
    And,
    /// `CALL`
    Call,
    /// `CASE ... END`
    Case,
    /// `CASE WHEN <filters> THEN .. ELSE .. END AS ..`
    CaseWhen,
    /// `CREATE`
    Create,
    /// `DELETE` / `DETACH DELETE`
    Delete,
    /// `DROP [IF EXISTS] column`
    DropColumn,
    /// `LIMIT`
    Limit,
    /// `MATCH` / `OPTIONAL MATCH`
    Match,
    /// `MERGE`
    Merge,
    /// `;` ending a statement.
    NewQuery,
    /// A node pattern.
    Node,
    /// `ON CREATE`
    OnCreate,
    /// `ON MATCH`
    OnMatch,
    /// ` )` closing an operator call.
    OperatorEnd,
    /// `name = operator(` opening an operator call.
    OperatorStart,
    /// `ORDER BY`
    OrderBy,
    /// `name =` binding a path.
    Path,
    /// A literal procedure invocation after `CALL`.
    Procedure,
    /// A relationship pattern.
    Relation,
    /// `REMOVE`
    Remove,
    /// `RETURN`
    Return,
    /// `SET`
    Set,
    /// `SKIP`
    Skip,
    /// `TABLE name`
    Table,
    /// `UNION` / `UNION ALL`
    Union,
    /// `UNWIND`
    Unwind,
    /// `WHERE`
    Where,
    /// `WITH`
    With,
    /// `YIELD`
    Yield,
}

grammar! {
    /// Beginning of a query.
    Start {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
    }
    /// After `ADD` column; the statement must end.
    AddColumn {
        NewQuery => NewQuery,
    }
    /// After `ALTER`.
    Alter {
        Table => Table,
    }
    /// After `,` in a pattern list.
    And {
        Node => Node, Path => Match,
    }
    /// After `CALL`.
    Call {
        Procedure => Procedure,
    }
    /// After `CASE ... END`.
    Case {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Where => Where, Set => Set, Remove => Remove, CaseWhen => CaseWhen,
        Return => Return, Limit => Limit, Skip => Skip, OrderBy => OrderBy, Union => Union,
    }
    /// After `CASE WHEN ... END AS ..`.
    CaseWhen {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Where => Where, CaseWhen => CaseWhen, Return => Return, Set => Set,
    }
    /// After `CREATE`.
    Create {
        Node => Node, Union => Union,
    }
    /// After `DELETE`.
    Delete {
        Return => Return, CaseWhen => CaseWhen, Union => Union,
    }
    /// After `DROP` column; the statement must end.
    DropColumn {
        NewQuery => NewQuery,
    }
    /// After `LIMIT`.
    Limit {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Where => Where, CaseWhen => CaseWhen, Return => Return, Set => Set,
        Skip => Skip, Union => Union,
    }
    /// After `MATCH` or a path binding.
    Match {
        Node => Node, Return => Return, OperatorStart => OperatorStart, Path => Match,
    }
    /// After `MERGE`.
    Merge {
        Node => NodeAfterMerge, Return => Return, OperatorStart => OperatorStart, Union => Union,
    }
    /// After `;`.
    NewQuery {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
    }
    /// After a node pattern outside a `MERGE`.
    Node {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Relation => Relation, Return => Return, Delete => Delete, Where => Where,
        OperatorStart => OperatorStart, OperatorEnd => OperatorEnd, Set => Set,
        Remove => Remove, And => And,
    }
    /// After a node pattern inside a `MERGE`.
    NodeAfterMerge {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Relation => RelationAfterMerge, Return => Return, Delete => Delete,
        OperatorStart => OperatorStart, OperatorEnd => OperatorEnd, Set => SetAfterMerge,
        OnCreate => OnCreate, OnMatch => OnMatch,
    }
    /// After `ON CREATE`.
    OnCreate {
        Set => SetAfterMerge, OperatorStart => OperatorStart,
    }
    /// After `ON MATCH`.
    OnMatch {
        Set => SetAfterMerge, OperatorStart => OperatorStart,
    }
    /// After ` )` closing an operator call.
    OperatorEnd {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Yield => Yield, Return => Return,
    }
    /// After `name = operator(`.
    OperatorStart {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Node => Node, OperatorEnd => OperatorEnd,
    }
    /// After `ORDER BY`.
    OrderBy {
        Limit => Limit, Skip => Skip, Union => Union,
    }
    /// After a procedure invocation.
    Procedure {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Yield => Yield, Return => Return, Union => Union,
    }
    /// After a relationship pattern outside a `MERGE`.
    Relation {
        Node => Node,
    }
    /// After a relationship pattern inside a `MERGE`.
    RelationAfterMerge {
        Node => NodeAfterMerge,
    }
    /// After `REMOVE`.
    Remove {
        Set => Set, Return => Return, Union => Union,
    }
    /// After `RETURN`.
    Return {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Return => Return, Limit => Limit, Skip => Skip, OrderBy => OrderBy,
        Union => Union, CaseWhen => CaseWhen, Case => Case,
    }
    /// After `SET` outside a `MERGE`.
    Set {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Set => Set, Remove => Remove, Unwind => Unwind, Return => Return, Union => Union,
    }
    /// After `SET` inside a `MERGE`.
    SetAfterMerge {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        OnCreate => OnCreate, OnMatch => OnMatch, Set => SetAfterMerge, Unwind => Unwind,
        Return => Return, Union => Union,
    }
    /// After `SKIP`.
    Skip {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Where => Where, CaseWhen => CaseWhen, Return => Return, Set => Set,
        Remove => Remove, Limit => Limit, Union => Union,
    }
    /// After `TABLE name`.
    Table {
        AddColumn => AddColumn, DropColumn => DropColumn,
    }
    /// After `UNION`.
    Union {
        Call => Call, Create => Create, Delete => Delete, Match => Match, Merge => Merge,
        Remove => Remove, Return => Return, Set => Set, Unwind => Unwind, With => With,
    }
    /// After `UNWIND`.
    Unwind {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Return => Return, Remove => Remove,
    }
    /// After `WHERE`.
    Where {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Return => Return, Delete => Delete, Where => Where, Set => Set, Remove => Remove,
        OperatorStart => OperatorStart,
    }
    /// After `WITH`.
    With {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Unwind => Unwind, Where => Where, Set => Set, Remove => Remove, CaseWhen => CaseWhen,
        Return => Return, Limit => Limit, Skip => Skip, OrderBy => OrderBy, Case => Case,
    }
    /// After `YIELD`.
    Yield {
        Match => Match, Merge => Merge, Call => Call, Create => Create, With => With,
        Alter => Alter,
        Node => Node, Where => Where, Return => Return,
    }
    /// After raw text; every clause is allowed and nothing is checked.
    Any {
        AddColumn => AddColumn, Alter => Alter, And => And, Call => Call, Case => Case,
        CaseWhen => CaseWhen, Create => Create, Delete => Delete, DropColumn => DropColumn,
        Limit => Limit, Match => Match, Merge => Merge, NewQuery => NewQuery, Node => Node,
        OnCreate => OnCreate, OnMatch => OnMatch, OperatorEnd => OperatorEnd,
        OperatorStart => OperatorStart, OrderBy => OrderBy, Path => Match,
        Procedure => Procedure, Relation => Relation, Remove => Remove, Return => Return,
        Set => Set, Skip => Skip, Table => Table, Union => Union, Unwind => Unwind,
        Where => Where, With => With, Yield => Yield,
    }
}

impl StateKind {
    /// The state reached by applying `clause`, or `None` if the clause is not
    /// allowed here.
    pub fn successor(self, clause: ClauseKind) -> Option<StateKind> {
        TRANSITIONS
            .iter()
            .find(|(from, c, _)| *from == self && *c == clause)
            .map(|(_, _, to)| *to)
    }

    /// Check if `clause` may follow this state.
    pub fn allows(self, clause: ClauseKind) -> bool {
        self.successor(clause).is_some()
    }

    /// Clauses allowed in this state, in table order.
    pub fn clauses(self) -> Vec<ClauseKind> {
        TRANSITIONS
            .iter()
            .filter(|(from, _, _)| *from == self)
            .map(|(_, c, _)| *c)
            .collect()
    }

    /// Check if this state sits inside the `MERGE` sub-grammar.
    pub fn is_after_merge(self) -> bool {
        matches!(
            self,
            StateKind::Merge
                | StateKind::NodeAfterMerge
                | StateKind::RelationAfterMerge
                | StateKind::OnCreate
                | StateKind::OnMatch
                | StateKind::SetAfterMerge
        )
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
