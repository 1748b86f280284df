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

//! Error types for query construction and rendering.

use thiserror::Error;

use crate::grammar::{ClauseKind, StateKind};

/// Error type for cypherline operations.
///
/// Typed builders never produce [`QueryError::GrammarViolation`]: an illegal
/// clause order is a compile error there. The variant exists for
/// [`DynamicQuery`](crate::DynamicQuery), whose state is only known at runtime.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A clause was applied to a state that does not allow it.
    #[error("clause {clause} is not allowed after {state}")]
    GrammarViolation {
        /// The rejected clause.
        clause: ClauseKind,
        /// The state the builder was in.
        state: StateKind,
    },

    /// Rendering was requested while operator calls are still open.
    #[error("{open} operator call(s) left open")]
    UnbalancedOperators {
        /// Number of operator starts without a matching end.
        open: usize,
    },

    /// An operator end was applied with no operator call open.
    #[error("operator end without a matching operator start")]
    UnmatchedOperatorEnd,

    /// Query length limit exceeded.
    #[error("query length {length} exceeds maximum allowed length {max_length}")]
    QueryTooLong {
        /// Length of the rendered query in bytes.
        length: usize,
        /// Maximum allowed length.
        max_length: usize,
    },

    /// A model schema does not declare the requested field.
    #[error("field '{field}' is not declared by model '{model}'")]
    UnknownField {
        /// The model type name.
        model: String,
        /// The requested field name.
        field: String,
    },

    /// A property document could not be used as a property map.
    #[error("invalid properties: {0}")]
    InvalidProperties(String),

    /// Deserialization error from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cypherline operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_grammar_violation() {
        let err = QueryError::GrammarViolation {
            clause: ClauseKind::Table,
            state: StateKind::Match,
        };
        let msg = err.to_string();
        assert!(msg.contains("Table"));
        assert!(msg.contains("Match"));
    }

    #[test]
    fn test_error_display_unbalanced() {
        let err = QueryError::UnbalancedOperators { open: 2 };
        assert_eq!(err.to_string(), "2 operator call(s) left open");
    }

    #[test]
    fn test_error_display_too_long() {
        let err = QueryError::QueryTooLong {
            length: 12,
            max_length: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_error_display_unknown_field() {
        let err = QueryError::UnknownField {
            model: "Location".to_string(),
            field: "zip".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Location"));
        assert!(msg.contains("zip"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: QueryError = json_err.into();
        assert!(matches!(err, QueryError::Json(_)));
    }
}
