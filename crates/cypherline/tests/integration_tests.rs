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

//! End-to-end query construction tests.
//!
//! Each test builds a complete query through the public API and compares
//! the rendered text.

use cypherline::model::{Expr, FieldType, Schema};
use cypherline::{
    BuilderConfig, CaseExpression, CaseWhen, ColumnDef, Conditions, DynamicQuery, Fragment, Hops,
    Mapping, NodePattern, OperatorCall, Properties, Query, QueryBuilder, QueryError,
    RelationPattern, ShortestPath, SortOrder, StateKind,
};

const FINDING_ID: &str = "THAT_is_MOCK_id";

fn node(labels: &str, ref_name: &str) -> NodePattern {
    NodePattern::labeled(labels).with_ref_name(ref_name)
}

// ============================================================================
// Pattern Queries
// ============================================================================

#[test]
fn test_match_all_by_label() {
    let q = Query::new()
        .match_()
        .node(node("Finding", "n"))
        .return_mapping([("n", "n")]);
    assert_eq!(q.render(), "MATCH (n: Finding) RETURN n AS n");
}

#[test]
fn test_findings_with_types_and_cves() {
    let q = Query::new()
        .match_()
        .node(node("Finding", "f"))
        .related_to(RelationPattern::typed("HAS_FINDING_TYPE"))
        .node(node("FindingType", "t"))
        .related_to(RelationPattern::typed("HAS_CVE"))
        .node(node("CVEType", "ct"))
        .return_mapping([
            ("f.has_id", "id"),
            ("t.has_probability", "probability"),
            ("t.has_severity", "severity"),
            ("ct.has_id", "cve"),
        ]);
    assert_eq!(
        q.render(),
        "MATCH (f: Finding)-[: HAS_FINDING_TYPE]->(t: FindingType)-[: HAS_CVE]->(ct: CVEType) \
         RETURN f.has_id AS id, t.has_probability AS probability, t.has_severity AS severity, \
         ct.has_id AS cve"
    );
}

#[test]
fn test_unnamed_node_with_properties() {
    let q = Query::new()
        .match_()
        .node(NodePattern::labeled("Finding").with_property("has_id", FINDING_ID))
        .related_to(RelationPattern::typed("HAS_REFERENCE"))
        .node(node("ReferenceType", "r"))
        .return_mapping([("r.has_description", "reference")]);
    assert_eq!(
        q.render(),
        r#"MATCH (: Finding {has_id : "THAT_is_MOCK_id"})-[: HAS_REFERENCE]->(r: ReferenceType) RETURN r.has_description AS reference"#
    );
}

#[test]
fn test_backward_relation_and_bare_property_node() {
    let q = Query::new()
        .match_()
        .node(node("FindingType", "t"))
        .related_from(RelationPattern::typed("HAS_FINDING_TYPE"))
        .node(NodePattern::labeled("Finding"))
        .related_to(RelationPattern::typed("HAS_SERVICE"))
        .node(NodePattern::new().with_property("has_id", FINDING_ID))
        .return_mapping([("collect(t.has_severity)", "severities")]);
    assert_eq!(
        q.render(),
        r#"MATCH (t: FindingType)<-[: HAS_FINDING_TYPE]-(: Finding)-[: HAS_SERVICE]->( {has_id : "THAT_is_MOCK_id"}) RETURN collect(t.has_severity) AS severities"#
    );
}

#[test]
fn test_relationship_properties() {
    let q = Query::new()
        .match_()
        .node(NodePattern::labeled("CloudObject"))
        .related_to(RelationPattern::typed("HAS_SERVICE").with_property("has_id", FINDING_ID))
        .node(node("ServiceType", "s").with_property("has_id", FINDING_ID))
        .return_literal("s");
    assert_eq!(
        q.render(),
        r#"MATCH (: CloudObject)-[: HAS_SERVICE {has_id : "THAT_is_MOCK_id"}]->(s: ServiceType {has_id : "THAT_is_MOCK_id"}) RETURN s"#
    );
}

#[test]
fn test_multi_label_node_and_alternative_relationship_types() {
    let q = Query::new()
        .match_()
        .node(NodePattern::labeled(["Person", "Admin"]).with_ref_name("a"))
        .related(RelationPattern::typed(["KNOWS", "LIKES"]))
        .node(NodePattern::named("b"))
        .return_literal("b");
    assert_eq!(q.render(), "MATCH (a: Person: Admin)-[:KNOWS|:LIKES]-(b) RETURN b");
}

#[test]
fn test_empty_relation_bodies() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("a"))
        .related(RelationPattern::new())
        .node(NodePattern::new())
        .related_to(RelationPattern::new())
        .node(NodePattern::new())
        .related_from(RelationPattern::new())
        .node(NodePattern::named("z"));
    assert_eq!(q.render(), "MATCH (a)--()-->()<--(z)");
}

#[test]
fn test_variable_length_shortest() {
    let q = Query::new()
        .match_()
        .node(NodePattern::new())
        .related_to(
            RelationPattern::new()
                .with_hops(Hops::from_signed(2, 4))
                .with_shortest(true),
        )
        .node(NodePattern::new());
    assert_eq!(q.render(), "MATCH ()-[*SHORTEST 2..4]->()");

    let q = Query::new()
        .match_()
        .node(NodePattern::named("a"))
        .related(
            RelationPattern::typed("ROAD")
                .with_ref_name("r")
                .with_hops(Hops::from_signed(-1, 5))
                .with_shortest(ShortestPath::AllShortest),
        )
        .node(NodePattern::named("b"));
    assert_eq!(q.render(), "MATCH (a)-[r: ROAD*ALL SHORTEST ..5]-(b)");
}

#[test]
fn test_empty_properties_render_no_braces() {
    let q = Query::new()
        .match_()
        .node(NodePattern::labeled("Person").with_properties(Properties::new()));
    assert_eq!(q.render(), "MATCH (: Person)");
}

#[test]
fn test_optional_match() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("a"))
        .optional_match()
        .node(NodePattern::named("a"))
        .related_to(RelationPattern::typed("OWNS"))
        .node(NodePattern::named("b"))
        .return_literal("a, b");
    assert_eq!(q.render(), "MATCH (a) OPTIONAL MATCH (a)-[: OWNS]->(b) RETURN a, b");
}

// ============================================================================
// Filtering and Projection
// ============================================================================

#[test]
fn test_where_variants() {
    let base = || Query::new().match_().node(NodePattern::named("n"));

    assert_eq!(
        base().where_("n.attribute_1", "=", "value").render(),
        r#"MATCH (n) WHERE n.attribute_1 = "value""#
    );
    assert_eq!(
        base()
            .where_multiple([("n.attribute_1", "value")])
            .render(),
        r#"MATCH (n) WHERE n.attribute_1 = "value""#
    );
    assert_eq!(
        base()
            .where_multiple(Properties::new().with("n.attribute_1", "value").with("n.attribute_2", 20))
            .render(),
        r#"MATCH (n) WHERE n.attribute_1 = "value" AND n.attribute_2 = 20"#
    );
    assert_eq!(
        base()
            .where_multiple(Conditions::new([("a", "1"), ("b", "2")]).joined_by(" OR "))
            .render(),
        r#"MATCH (n) WHERE a = "1" OR b = "2""#
    );
}

#[test]
fn test_where_unescaped_is_null() {
    let q = Query::new().match_().node(NodePattern::named("p")).where_multiple(
        Conditions::new([("p.lock", "NULL"), ("p.value", "NULL")])
            .compared_by("IS")
            .joined_by(" OR ")
            .with_escape(false),
    );
    assert_eq!(q.render(), "MATCH (p) WHERE p.lock IS NULL OR p.value IS NULL");
}

#[test]
fn test_where_literal() {
    let q = Query::new()
        .match_()
        .node(node("Person", "n"))
        .where_literal("n.age=32 AND NOT n:Teacher");
    assert_eq!(q.render(), "MATCH (n: Person) WHERE n.age=32 AND NOT n:Teacher");
}

#[test]
fn test_with_chain() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .with("n AS n_test")
        .with("[n_test] AS n_list")
        .return_mapping([("n_list", "n_test")]);
    assert_eq!(
        q.render(),
        "MATCH (n) WITH n AS n_test WITH [n_test] AS n_list RETURN n_list AS n_test"
    );
}

#[test]
fn test_return_mapping_without_alias_rewrites_expression() {
    // Surprising but intended: the dots of an unaliased expression are
    // replaced in place, yielding a different expression and no AS.
    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .return_mapping([Mapping::new("n.name"), Mapping::aliased("n.age", "")]);
    assert_eq!(q.render(), "MATCH (n) RETURN n_name, n_age");
}

#[test]
fn test_order_skip_limit() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .return_literal("n")
        .order_by(["n.name", "n.age"], SortOrder::Descending)
        .skip(20)
        .limit(10);
    assert_eq!(
        q.render(),
        "MATCH (n) RETURN n ORDER BY n.name, n.age DESC SKIP 20 LIMIT 10"
    );
}

#[test]
fn test_case_and_case_when() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .with("n")
        .case_when(CaseWhen::new(
            [("n.attribute_1", "Bob")],
            "true",
            "false",
            "my_boolean",
        ));
    assert_eq!(
        q.render(),
        r#"MATCH (n) WITH n CASE WHEN n.attribute_1 = "Bob" THEN true ELSE false END AS my_boolean"#
    );

    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .return_literal("n.name,")
        .case(
            CaseExpression::new("'unknown'")
                .when("n.age < 18", "'minor'")
                .aliased("bracket"),
        );
    assert_eq!(
        q.render(),
        "MATCH (n) RETURN n.name, CASE WHEN n.age < 18 THEN 'minor' ELSE 'unknown' END AS bracket"
    );
}

#[test]
fn test_call_yield() {
    let q = Query::new()
        .call()
        .procedure("db.labels()")
        .yield_(["label"])
        .return_literal("label");
    assert_eq!(q.render(), "CALL db.labels() YIELD label AS label RETURN label");

    let q = Query::new()
        .call()
        .procedure("dbms.components()")
        .yield_([("name", "component"), ("edition", "")]);
    assert_eq!(
        q.render(),
        "CALL dbms.components() YIELD name AS component, edition AS edition"
    );
}

#[test]
fn test_unwind_create() {
    let q = Query::new()
        .with("[1, 2, 3] AS xs")
        .unwind("xs AS x")
        .create()
        .node(NodePattern::labeled("Number").with_property("value", 1));
    assert_eq!(
        q.render(),
        "WITH [1, 2, 3] AS xs UNWIND xs AS x CREATE (: Number {value : 1})"
    );
}

#[test]
fn test_union() {
    let q = Query::new()
        .match_()
        .node(node("Person", "n"))
        .return_literal("n.name AS name")
        .union_all()
        .match_()
        .node(node("Company", "n"))
        .return_literal("n.name AS name");
    assert_eq!(
        q.render(),
        "MATCH (n: Person) RETURN n.name AS name UNION ALL MATCH (n: Company) RETURN n.name AS name"
    );
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_match_set() {
    let q = Query::new()
        .match_()
        .node(node("ServiceType", "s"))
        .set([("has_id", FINDING_ID)])
        .return_literal("s");
    assert_eq!(
        q.render(),
        r#"MATCH (s: ServiceType) SET has_id = "THAT_is_MOCK_id" RETURN s"#
    );
}

#[test]
fn test_merge_on_match_set() {
    let q = Query::new()
        .merge()
        .node(node("ServiceType", "s"))
        .on_match()
        .set([("has_id", FINDING_ID)])
        .return_literal("s");
    assert_eq!(
        q.render(),
        r#"MERGE (s: ServiceType) ON MATCH SET has_id = "THAT_is_MOCK_id" RETURN s"#
    );
}

#[test]
fn test_set_unescaped_after_merge() {
    let q = Query::new()
        .merge()
        .node(node("Node", "n").with_property("name", "test"))
        .on_create()
        .set([("n.id", "1")])
        .on_match()
        .set_unescaped([("n.id", r#"n.id + "1""#)])
        .return_literal("n");
    assert_eq!(
        q.render(),
        r#"MERGE (n: Node {name : "test"}) ON CREATE SET n.id = "1" ON MATCH SET n.id = n.id + "1" RETURN n"#
    );
}

#[test]
fn test_merge_relationship_between_matched_nodes() {
    let q = Query::new()
        .match_()
        .node(node("User", "src").with_property("id", 1))
        .match_()
        .node(node("User", "dst").with_property("id", 2))
        .merge()
        .node(NodePattern::named("src"))
        .related_to(RelationPattern::typed("FOLLOWS").with_property("since", 2024))
        .node(NodePattern::named("dst"))
        .on_create()
        .set_literal("src.follows = coalesce(src.follows, 0) + 1");
    assert_eq!(
        q.render(),
        "MATCH (src: User {id : 1}) MATCH (dst: User {id : 2}) \
         MERGE (src)-[: FOLLOWS {since : 2024}]->(dst) \
         ON CREATE SET src.follows = coalesce(src.follows, 0) + 1"
    );
    assert_eq!(q.state(), StateKind::SetAfterMerge);
}

#[test]
fn test_remove_and_delete() {
    let q = Query::new()
        .match_()
        .node(NodePattern::named("n"))
        .remove(["n.tmp", "n:Stale"])
        .return_literal("n");
    assert_eq!(q.render(), "MATCH (n) REMOVE n.tmp, n:Stale RETURN n");

    let q = Query::new().match_().node(NodePattern::named("n")).delete("n");
    assert_eq!(q.render(), "MATCH (n) DELETE n");

    let q = Query::new().match_().node(NodePattern::named("n")).detach_delete("n");
    assert_eq!(q.render(), "MATCH (n) DETACH DELETE n");
}

#[test]
fn test_alter_table() {
    static NODE: Schema = Schema::new("Node", &[("attribute_1", FieldType::Integer)]);

    let q = Query::new().alter().table(&NODE).add_column(
        ColumnDef::new("bool_col", "BOOL")
            .with_default("True")
            .primary_key(),
    );
    assert_eq!(
        q.render(),
        "ALTER TABLE NODE ADD IF NOT EXISTS bool_col BOOL DEFAULT True PRIMARY KEY"
    );

    let q = q
        .new_query()
        .alter()
        .table("NODE")
        .drop_column("bool_col", false);
    assert_eq!(
        q.render(),
        "ALTER TABLE NODE ADD IF NOT EXISTS bool_col BOOL DEFAULT True PRIMARY KEY; \
         ALTER TABLE NODE DROP bool_col"
    );
}

// ============================================================================
// Models
// ============================================================================

static NODE_MODEL: Schema = Schema::new(
    "Node",
    &[
        ("attribute_1", FieldType::Integer),
        ("attribute_2", FieldType::String),
        ("attribute_3", FieldType::Any),
        ("attribute_4", FieldType::Float),
    ],
);

static REL_MODEL: Schema = Schema::new(
    "Rel",
    &[
        ("attribute_1", FieldType::Integer),
        ("attribute_3", FieldType::Any),
    ],
);

#[test]
fn test_where_literal_from_expression_tree() -> Result<(), QueryError> {
    let n = NODE_MODEL.alias("n");
    let r = REL_MODEL.alias("r");
    let predicate = n
        .field("attribute_2")?
        .eq("10")
        .and(Expr::from(3).le(n.field("attribute_2")?))
        .and(n.field("attribute_3")?.ne(r.field("attribute_3")?));

    let q = Query::new()
        .match_()
        .node(
            NodePattern::named(n.to_string())
                .with_property("attribute_1", 10)
                .with_property("attribute_2", 10),
        )
        .where_literal(predicate);
    assert_eq!(
        q.render(),
        "MATCH (n {attribute_1 : 10, attribute_2 : 10}) \
         WHERE (((n.attribute_2 = '10') AND (3 <= n.attribute_2)) AND (n.attribute_3 <> r.attribute_3))"
    );
    Ok(())
}

#[test]
fn test_model_as_label() -> Result<(), QueryError> {
    let n = NODE_MODEL.alias("n");
    let sum = n.field("attribute_1")?.plus(n.field("attribute_2")?);

    let q = Query::new()
        .match_()
        .node(NodePattern::labeled(&NODE_MODEL).with_ref_name(n.to_string()))
        .where_literal(n.field("attribute_2")?.eq("10").and(n.field("attribute_2")?.ge(3)))
        .return_literal(format!("sum({})", sum));
    assert_eq!(
        q.render(),
        "MATCH (n:NODE) WHERE ((n.attribute_2 = '10') AND (n.attribute_2 >= 3)) \
         RETURN sum((n.attribute_1 + n.attribute_2))"
    );
    Ok(())
}

#[test]
fn test_entity_create() -> Result<(), QueryError> {
    let entity = NODE_MODEL
        .entity()
        .with("attribute_1", 7)?
        .with("attribute_2", "seven")?;
    let q = Query::new().create().node(&entity).return_literal(entity.alias());
    assert_eq!(
        q.render(),
        r#"CREATE (n:NODE {attribute_1 : 7, attribute_2 : "seven"}) RETURN n"#
    );

    assert!(matches!(
        NODE_MODEL.entity().with("nope", 1),
        Err(QueryError::UnknownField { .. })
    ));
    Ok(())
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_query_add() {
    let first = || {
        Query::new()
            .match_()
            .node(NodePattern::labeled("Application"))
            .related_to(RelationPattern::typed("HAS_SERVICE").with_property("has_id", FINDING_ID))
            .node(node("ServiceType", "s").with_property("has_id", FINDING_ID))
            .with("s")
    };
    let second = || Query::new().match_().node(NodePattern::named("s")).return_literal("s");
    let expected = r#"MATCH (: Application)-[: HAS_SERVICE {has_id : "THAT_is_MOCK_id"}]->(s: ServiceType {has_id : "THAT_is_MOCK_id"}) WITH s MATCH (s) RETURN s"#;

    assert_eq!((first() + second()).render(), expected);

    let mut accumulated = first();
    accumulated += second();
    assert_eq!(accumulated.render(), expected);
}

#[test]
fn test_query_builder_alias_and_reset() {
    let q: QueryBuilder = QueryBuilder::new();
    let q = q.match_().node(NodePattern::named("n")).reset();
    assert_eq!(q.render(), "");
    assert_eq!(q.state(), StateKind::Start);
}

#[test]
fn test_path_function_wrapping() {
    let q = Query::new()
        .match_()
        .operator_start(OperatorCall::new("shortestPath").named("p"))
        .node(node("Person", "a"))
        .related_to(RelationPattern::new().with_hops(Hops::at_least(1)))
        .node(node("Person", "b"))
        .operator_end()
        .return_literal("p");
    assert_eq!(
        q.try_render().unwrap(),
        "MATCH p = shortestPath( (a: Person)-[*1..]->(b: Person) ) RETURN p"
    );
}

#[test]
fn test_untrusted_config_limits_length() {
    let long = "x".repeat(70 * 1024);
    let q = Query::with_config(BuilderConfig::for_untrusted_input())
        .match_()
        .node(NodePattern::named("n").with_property("blob", long.as_str()));
    assert!(matches!(q.try_render(), Err(QueryError::QueryTooLong { .. })));
    assert!(Query::new()
        .match_()
        .node(NodePattern::named("n").with_property("blob", long))
        .try_render()
        .is_ok());
}

#[test]
fn test_dynamic_builder_matches_typed_builder() {
    let typed = Query::new()
        .merge()
        .node(node("City", "c").with_property("name", "X"))
        .on_create()
        .set([("c.created", true)])
        .return_literal("c");

    let dynamic = DynamicQuery::new()
        .extend([
            Fragment::Merge,
            Fragment::Node(node("City", "c").with_property("name", "X")),
            Fragment::OnCreate,
            Fragment::Set {
                properties: Properties::from([("c.created", true)]),
                escape: None,
            },
            Fragment::ReturnLiteral(Some("c".into())),
        ])
        .unwrap();

    assert_eq!(typed.render(), dynamic.render());
    assert_eq!(typed.state(), dynamic.state());
}

#[test]
fn test_dynamic_builder_rejects_on_create_after_match() {
    let err = DynamicQuery::new()
        .extend([
            Fragment::Match { optional: false },
            Fragment::Node(NodePattern::named("n")),
            Fragment::OnCreate,
        ])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "clause OnCreate is not allowed after Node"
    );
}
