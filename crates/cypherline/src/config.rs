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

//! Configuration carried by query builder handles.

use serde::{Deserialize, Serialize};

/// Default maximum length of a rendered query: 1 MiB.
///
/// Only enforced by the checked rendering path
/// ([`Query::try_render`](crate::Query::try_render)).
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1024 * 1024;

/// Configuration for building queries.
///
/// The configuration travels with a handle through every clause, so it only
/// has to be set once at the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Escape and quote string property values unless a fragment says
    /// otherwise (default: true).
    pub escape_values: bool,

    /// Maximum rendered query length in bytes (default: 1 MiB, None = unlimited).
    pub max_query_length: Option<usize>,

    /// Reject unclosed operator calls when rendering through the checked
    /// path (default: true).
    pub require_balanced_operators: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            escape_values: true,
            max_query_length: Some(DEFAULT_MAX_QUERY_LENGTH),
            require_balanced_operators: true,
        }
    }
}

/// Builder for BuilderConfig.
///
/// # Examples
///
/// ```
/// # use cypherline::BuilderConfig;
/// let config = BuilderConfig::builder()
///     .escape_values(false)
///     .max_query_length(4096)
///     .build();
/// assert!(!config.escape_values);
/// ```
#[derive(Debug, Default)]
pub struct BuilderConfigBuilder {
    escape_values: Option<bool>,
    max_query_length: Option<Option<usize>>,
    require_balanced_operators: Option<bool>,
}

impl BuilderConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default escape flag for property values.
    pub fn escape_values(mut self, escape: bool) -> Self {
        self.escape_values = Some(escape);
        self
    }

    /// Set the maximum rendered query length.
    pub fn max_query_length(mut self, max: usize) -> Self {
        self.max_query_length = Some(Some(max));
        self
    }

    /// Remove the query length limit.
    pub fn no_query_length_limit(mut self) -> Self {
        self.max_query_length = Some(None);
        self
    }

    /// Set whether checked rendering rejects unclosed operator calls.
    pub fn require_balanced_operators(mut self, require: bool) -> Self {
        self.require_balanced_operators = Some(require);
        self
    }

    /// Build the BuilderConfig instance.
    ///
    /// All unset fields will use their default values.
    pub fn build(self) -> BuilderConfig {
        let defaults = BuilderConfig::default();
        BuilderConfig {
            escape_values: self.escape_values.unwrap_or(defaults.escape_values),
            max_query_length: self.max_query_length.unwrap_or(defaults.max_query_length),
            require_balanced_operators: self
                .require_balanced_operators
                .unwrap_or(defaults.require_balanced_operators),
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for BuilderConfig.
    pub fn builder() -> BuilderConfigBuilder {
        BuilderConfigBuilder::default()
    }

    /// Pass property values through verbatim unless a fragment asks for escaping.
    pub fn without_escaping(mut self) -> Self {
        self.escape_values = false;
        self
    }

    /// Set the maximum rendered query length.
    pub fn with_max_query_length(mut self, max: usize) -> Self {
        self.max_query_length = Some(max);
        self
    }

    /// Remove the query length limit.
    pub fn without_query_length_limit(mut self) -> Self {
        self.max_query_length = None;
        self
    }

    /// Allow checked rendering of queries with unclosed operator calls.
    pub fn allow_unbalanced_operators(mut self) -> Self {
        self.require_balanced_operators = false;
        self
    }

    /// Create a configuration suitable for queries assembled from untrusted input.
    ///
    /// - 64 KiB max query length (vs 1 MiB default)
    /// - Escaping on
    /// - Balanced operators required
    pub fn for_untrusted_input() -> Self {
        Self {
            escape_values: true,
            max_query_length: Some(64 * 1024),
            require_balanced_operators: true,
        }
    }
}
