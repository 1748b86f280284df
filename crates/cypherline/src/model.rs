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

//! Schema-described models.
//!
//! A [`Schema`] is a static description of a model type: its name and its
//! declared fields. From it you get
//!
//! - a label (the type name in UPPER_SNAKE_CASE),
//! - alias-qualified [`Field`] references, validated against the schema,
//! - [`Expr`] trees built from fields and literals, for `WHERE` predicates,
//! - [`Entity`] values carrying a validated property map, usable wherever a
//!   node or relationship pattern is expected.
//!
//! ```
//! use cypherline::model::{FieldType, Schema};
//! use cypherline::{NodePattern, Query};
//!
//! static SERVICE_TYPE: Schema = Schema::new(
//!     "ServiceType",
//!     &[("name", FieldType::String), ("port", FieldType::Integer)],
//! );
//!
//! let s = SERVICE_TYPE.alias("s");
//! let predicate = s.field("port")?.gt(1024).and(s.field("name")?.ne("ssh"));
//!
//! let q = Query::new()
//!     .match_()
//!     .node(NodePattern::named("s").with_labels(&SERVICE_TYPE))
//!     .where_literal(predicate)
//!     .return_literal(&s);
//! assert_eq!(
//!     q.render(),
//!     "MATCH (s:SERVICE_TYPE) WHERE ((s.port > 1024) AND (s.name <> 'ssh')) RETURN s"
//! );
//! # Ok::<(), cypherline::QueryError>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::escape::{quote_single, to_label};
use crate::pattern::{Labels, NodePattern, RelationPattern};
use crate::properties::{Properties, PropertyValue};

/// Declared type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Text.
    String,
    /// Integer number.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Anything.
    Any,
}

/// Static description of a model type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: &'static [(&'static str, FieldType)],
}

impl Schema {
    /// Describe a model type by name and declared fields.
    pub const fn new(name: &'static str, fields: &'static [(&'static str, FieldType)]) -> Self {
        Self { name, fields }
    }

    /// The type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &'static [(&'static str, FieldType)] {
        self.fields
    }

    /// The label: the type name in UPPER_SNAKE_CASE.
    pub fn label(&self) -> String {
        to_label(self.name)
    }

    /// Declared type of a field.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, ty)| *ty)
    }

    /// Check if a field is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }

    /// A reference to this model bound to an alias.
    pub fn alias(&self, alias: impl Into<String>) -> ModelRef {
        ModelRef {
            schema: *self,
            alias: Some(alias.into()),
        }
    }

    /// A reference to this model without alias. Its fields render bare.
    pub fn unaliased(&self) -> ModelRef {
        ModelRef {
            schema: *self,
            alias: None,
        }
    }

    /// An entity of this model with no properties, aliased `n`.
    pub fn entity(&self) -> Entity {
        Entity::new(*self)
    }

    fn unknown_field(&self, field: &str) -> QueryError {
        QueryError::UnknownField {
            model: self.name.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<&Schema> for Labels {
    fn from(schema: &Schema) -> Self {
        Labels::Model(schema.label())
    }
}

impl From<Schema> for Labels {
    fn from(schema: Schema) -> Self {
        Labels::Model(schema.label())
    }
}

/// A model bound to an optional alias.
///
/// Displays as the alias, or the label when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    schema: Schema,
    alias: Option<String>,
}

impl ModelRef {
    /// The underlying schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// A field reference qualified by this alias.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] if the schema does not declare `name`.
    pub fn field(&self, name: &str) -> Result<Field> {
        let field_type = self
            .schema
            .field_type(name)
            .ok_or_else(|| self.schema.unknown_field(name))?;
        Ok(Field {
            alias: self.alias.clone(),
            name: name.to_string(),
            field_type,
        })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => f.write_str(alias),
            None => f.write_str(&self.schema.label()),
        }
    }
}

/// A reference to a model field, `alias.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    alias: Option<String>,
    name: String,
    field_type: FieldType,
}

impl Field {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Binary operator of an [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// The operator token.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// An expression over model fields and literals.
///
/// Renders fully parenthesised, `(left op right)`, with string literals in
/// single quotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(PropertyValue),
    /// A field reference.
    Field(Field),
    /// `(left op right)`
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
}

impl Expr {
    /// Combine two expressions.
    pub fn binary(left: impl Into<Expr>, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(PropertyValue::String(s)) => f.write_str(&quote_single(s)),
            Expr::Literal(value) => f.write_str(&value.to_cypher(false)),
            Expr::Field(field) => fmt::Display::fmt(field, f),
            Expr::Binary { left, op, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
        }
    }
}

macro_rules! expr_builders {
    ($($ty:ty),*) => {$(
        #[allow(clippy::should_implement_trait)]
        impl $ty {
            /// `(self = rhs)`
            pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Eq, rhs)
            }

            /// `(self <> rhs)`
            pub fn ne(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Ne, rhs)
            }

            /// `(self < rhs)`
            pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Lt, rhs)
            }

            /// `(self <= rhs)`
            pub fn le(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Le, rhs)
            }

            /// `(self > rhs)`
            pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Gt, rhs)
            }

            /// `(self >= rhs)`
            pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Ge, rhs)
            }

            /// `(self AND rhs)`
            pub fn and(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::And, rhs)
            }

            /// `(self OR rhs)`
            pub fn or(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Or, rhs)
            }

            /// `(self + rhs)`
            pub fn plus(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Add, rhs)
            }

            /// `(self - rhs)`
            pub fn minus(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Sub, rhs)
            }

            /// `(self * rhs)`
            pub fn times(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Mul, rhs)
            }

            /// `(self / rhs)`
            pub fn over(self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(self, BinaryOp::Div, rhs)
            }
        }
    )*};
}

expr_builders!(Expr, Field);

impl From<Field> for Expr {
    fn from(field: Field) -> Self {
        Expr::Field(field)
    }
}

impl From<&Field> for Expr {
    fn from(field: &Field) -> Self {
        Expr::Field(field.clone())
    }
}

impl From<PropertyValue> for Expr {
    fn from(value: PropertyValue) -> Self {
        Expr::Literal(value)
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Expr {
            fn from(value: $ty) -> Self {
                Expr::Literal(PropertyValue::from(value))
            }
        }
    )*};
}

literal_from!(&str, String, bool, i32, i64, u32, f64);

/// An instance of a model: its label and a property map restricted to the
/// declared fields.
///
/// Usable as a node pattern (`(n:LABEL {..})`) or a relationship pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    schema: Schema,
    alias: String,
    properties: Properties,
}

impl Entity {
    /// An entity with no properties, aliased `n`.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            alias: "n".to_string(),
            properties: Properties::new(),
        }
    }

    /// Build an entity from a property map.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] for the first key the schema does not
    /// declare.
    pub fn from_properties(schema: Schema, properties: Properties) -> Result<Self> {
        if let Some((key, _)) = properties.iter().find(|(key, _)| !schema.has_field(key)) {
            return Err(schema.unknown_field(key));
        }
        Ok(Self {
            schema,
            alias: "n".to_string(),
            properties,
        })
    }

    /// Set the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Set a property.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] if the schema does not declare `name`.
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Result<Self> {
        if !self.schema.has_field(name) {
            return Err(self.schema.unknown_field(name));
        }
        self.properties.insert(name, value);
        Ok(self)
    }

    /// The label.
    pub fn label(&self) -> String {
        self.schema.label()
    }

    /// The alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The properties set so far.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// A field reference qualified by this entity's alias.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] if the schema does not declare `name`.
    pub fn field(&self, name: &str) -> Result<Field> {
        self.schema.alias(self.alias.clone()).field(name)
    }

    /// Node pattern with the alias as reference name.
    pub fn to_node_pattern(&self) -> NodePattern {
        NodePattern::labeled(&self.schema)
            .with_ref_name(self.alias.clone())
            .with_properties(self.properties.clone())
    }

    /// Relationship pattern typed by the label, with the alias as reference
    /// name.
    pub fn to_relation_pattern(&self) -> RelationPattern {
        RelationPattern::typed(&self.schema)
            .with_ref_name(self.alias.clone())
            .with_properties(self.properties.clone())
    }
}

impl From<&Entity> for NodePattern {
    fn from(entity: &Entity) -> Self {
        entity.to_node_pattern()
    }
}

impl From<Entity> for NodePattern {
    fn from(entity: Entity) -> Self {
        entity.to_node_pattern()
    }
}

impl From<&Entity> for RelationPattern {
    fn from(entity: &Entity) -> Self {
        entity.to_relation_pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FINDING_TYPE: Schema = Schema::new(
        "FindingType",
        &[
            ("name", FieldType::String),
            ("score", FieldType::Float),
            ("count", FieldType::Integer),
        ],
    );

    #[test]
    fn test_label() {
        assert_eq!(FINDING_TYPE.label(), "FINDING_TYPE");
        assert_eq!(FINDING_TYPE.to_string(), "FINDING_TYPE");
        assert_eq!(FINDING_TYPE.unaliased().to_string(), "FINDING_TYPE");
        assert_eq!(FINDING_TYPE.alias("f").to_string(), "f");
    }

    #[test]
    fn test_field_references() {
        let f = FINDING_TYPE.alias("f");
        assert_eq!(f.field("name").unwrap().to_string(), "f.name");
        assert_eq!(FINDING_TYPE.unaliased().field("name").unwrap().to_string(), "name");
        assert_eq!(f.field("score").unwrap().field_type(), FieldType::Float);
    }

    #[test]
    fn test_unknown_field() {
        let err = FINDING_TYPE.alias("f").field("missing").unwrap_err();
        match err {
            QueryError::UnknownField { model, field } => {
                assert_eq!(model, "FindingType");
                assert_eq!(field, "missing");
            }
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_expr_rendering() {
        let f = FINDING_TYPE.alias("f");
        let name = f.field("name").unwrap();
        let count = f.field("count").unwrap();

        assert_eq!(name.clone().eq("it's").to_string(), r"(f.name = 'it\'s')");
        assert_eq!(count.clone().ge(3).to_string(), "(f.count >= 3)");
        assert_eq!(
            count.clone().plus(1).times(2).le(10).to_string(),
            "(((f.count + 1) * 2) <= 10)"
        );
        assert_eq!(
            name.clone().ne("x").or(count.clone().lt(0)).to_string(),
            "((f.name <> 'x') OR (f.count < 0))"
        );
        assert_eq!(count.clone().minus(&count).over(2.5).to_string(), "((f.count - f.count) / 2.5)");
        assert_eq!(Expr::from(true).and(Expr::from(PropertyValue::Null)).to_string(), "(true AND null)");
    }

    #[test]
    fn test_entity_properties_are_validated() {
        let entity = FINDING_TYPE.entity().with("name", "xss").unwrap();
        assert_eq!(entity.properties().len(), 1);
        assert!(FINDING_TYPE.entity().with("bogus", 1).is_err());

        let props = Properties::new().with("name", "a").with("other", 1);
        assert!(Entity::from_properties(FINDING_TYPE, props).is_err());
    }

    #[test]
    fn test_entity_as_node_pattern() {
        let entity = FINDING_TYPE
            .entity()
            .with_alias("f")
            .with("name", "xss")
            .unwrap();
        assert_eq!(NodePattern::from(&entity).to_cypher(true), r#"(f:FINDING_TYPE {name : "xss"})"#);
        assert_eq!(entity.field("name").unwrap().to_string(), "f.name");
    }

    #[test]
    fn test_entity_as_relation_pattern() {
        let entity = FINDING_TYPE.entity().with_alias("r");
        assert_eq!(
            RelationPattern::from(&entity).to_cypher(crate::pattern::Direction::Forward, true),
            "-[r: FINDING_TYPE]->"
        );
    }
}
