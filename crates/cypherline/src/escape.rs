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

//! String escaping for values embedded in query text.
//!
//! Values are embedded inline rather than passed as parameters, so every
//! string value that is not explicitly marked verbatim goes through
//! [`escape_string`].

use std::borrow::Cow;

/// Check if a string needs escaping.
#[inline]
fn needs_escaping(s: &str) -> bool {
    s.chars().any(|ch| matches!(ch, '\\' | '"' | '\'' | '\r' | '\n'))
}

/// Escape a string value for embedding inside a quoted literal.
///
/// Backslash, both quote characters, carriage return and line feed are
/// backslash-escaped. Everything else is passed through. Strings without any
/// of those characters are returned borrowed.
///
/// # Examples
///
/// ```
/// # use cypherline::escape::escape_string;
/// assert_eq!(escape_string("plain"), "plain");
/// assert_eq!(escape_string(r#"say "hi""#), r#"say \"hi\""#);
/// assert_eq!(escape_string("it's"), r"it\'s");
/// ```
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !needs_escaping(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Quote a string value with double quotes, escaping its content.
pub fn quote_string(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Quote a string value with single quotes, escaping its content.
///
/// Used for literals inside expression trees.
pub fn quote_single(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Derive a label from a type name.
///
/// An underscore is inserted wherever a lowercase letter is directly followed
/// by an uppercase one, and the result is upper-cased.
///
/// # Examples
///
/// ```
/// # use cypherline::escape::to_label;
/// assert_eq!(to_label("Location"), "LOCATION");
/// assert_eq!(to_label("FindingType"), "FINDING_TYPE");
/// assert_eq!(to_label("CVEType"), "CVETYPE");
/// ```
pub fn to_label(type_name: &str) -> String {
    let mut result = String::with_capacity(type_name.len() + 4);
    let mut prev_lower = false;

    for c in type_name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            result.push('_');
        }
        result.push(c.to_ascii_uppercase());
        prev_lower = c.is_ascii_lowercase();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string_basic() {
        assert_eq!(escape_string("hello").as_ref(), "hello");
        assert_eq!(escape_string("hello world").as_ref(), "hello world");
        assert!(matches!(escape_string("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_string_quotes() {
        assert_eq!(escape_string("it's").as_ref(), "it\\'s");
        assert_eq!(escape_string(r#"say "hello""#).as_ref(), r#"say \"hello\""#);
        assert!(matches!(escape_string("it's"), Cow::Owned(_)));
    }

    #[test]
    fn test_escape_string_backslash() {
        assert_eq!(escape_string(r"path\to\file").as_ref(), r"path\\to\\file");
    }

    #[test]
    fn test_escape_string_newlines() {
        assert_eq!(escape_string("line1\nline2").as_ref(), r"line1\nline2");
        assert_eq!(escape_string("line1\r\nline2").as_ref(), r"line1\r\nline2");
    }

    #[test]
    fn test_escape_string_leaves_tabs() {
        assert_eq!(escape_string("col1\tcol2").as_ref(), "col1\tcol2");
        assert!(matches!(escape_string("col1\tcol2"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_quote_and_backslash_together() {
        assert_eq!(escape_string(r#"a"b\c"#).as_ref(), r#"a\"b\\c"#);
    }

    #[test]
    fn test_needs_escaping() {
        assert!(!needs_escaping(""));
        assert!(!needs_escaping("user_name"));
        assert!(needs_escaping("it's"));
        assert!(needs_escaping(r#"say "hello""#));
        assert!(needs_escaping(r"a\b"));
        assert!(needs_escaping("a\nb"));
        assert!(needs_escaping("a\rb"));
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("hello"), "\"hello\"");
        assert_eq!(quote_string("it's"), "\"it\\'s\"");
    }

    #[test]
    fn test_quote_single() {
        assert_eq!(quote_single("ABC"), "'ABC'");
        assert_eq!(quote_single("it's"), "'it\\'s'");
    }

    #[test]
    fn test_to_label() {
        assert_eq!(to_label("Node"), "NODE");
        assert_eq!(to_label("TableModel"), "TABLE_MODEL");
        assert_eq!(to_label("FindingSourceType"), "FINDING_SOURCE_TYPE");
        assert_eq!(to_label("Node2Edge"), "NODE2EDGE");
        assert_eq!(to_label("already_snake"), "ALREADY_SNAKE");
        assert_eq!(to_label(""), "");
    }
}
