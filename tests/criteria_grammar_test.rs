//! Integration tests for criteria grammar and compilation.

use examine::prelude::*;
use examine::query::value::escape_text;
use examine::query::{FieldTarget, Predicate, QueryNode};

fn criteria(operation: BooleanOperation) -> Criteria {
    Criteria::new(TypeFilter::from("content"), operation)
}

#[test]
fn test_joiner_errors_are_raised_at_the_call() {
    let err = criteria(BooleanOperation::And).and().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGrammar);

    let err = criteria(BooleanOperation::Or)
        .node_name("home")
        .and_then(|c| c.or())
        .and_then(|c| c.and())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGrammar);
}

#[test]
fn test_arity_mismatch_reports_both_counts() {
    let err = criteria(BooleanOperation::And)
        .grouped_and(["type", "name", "id"], ["a", "b"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    assert!(matches!(
        err,
        ExamineError::ArityMismatch {
            fields: 3,
            values: 2
        }
    ));
}

#[test]
fn test_dangling_not_is_invalid() {
    let result = criteria(BooleanOperation::And)
        .node_name("home")
        .and_then(|c| c.not())
        .and_then(|c| c.compile());
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidGrammar);
}

#[test]
fn test_default_or_compiles_to_top_level_disjunction() -> Result<()> {
    let query = criteria(BooleanOperation::Or)
        .node_name("home")?
        .field("bodyText", "umbraco")?
        .node_type_alias("CWS_Home")?
        .compile()?;

    match query.root() {
        Some(QueryNode::Or(children)) => assert_eq!(children.len(), 3),
        other => panic!("expected a disjunction, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_explicit_and_group_nests_under_default_or() -> Result<()> {
    let query = criteria(BooleanOperation::Or)
        .node_name("home")?
        .grouped_and(["type", "writerName"], ["CWS_Home", "admin"])?
        .compile()?;

    assert_eq!(
        query.to_string(),
        "name:home (+type:cws_home +writerName:admin)"
    );
    Ok(())
}

#[test]
fn test_compile_carries_filter_operation_and_sort() -> Result<()> {
    let query = criteria(BooleanOperation::Or)
        .node_name("home")?
        .order_by("name")
        .order_by_descending("updateDate")
        .compile()?;

    assert_eq!(query.type_filter(), &TypeFilter::from("content"));
    assert_eq!(query.default_operation(), BooleanOperation::Or);
    assert_eq!(
        query.sort_fields(),
        &[SortField::asc("name"), SortField::desc("updateDate")]
    );
    assert_eq!(query.fields().into_iter().collect::<Vec<_>>(), vec!["name"]);
    Ok(())
}

#[test]
fn test_empty_criteria_compiles_to_empty_query() -> Result<()> {
    let query = criteria(BooleanOperation::And).order_by("name").compile()?;
    assert!(query.is_empty());
    assert_eq!(query.to_string(), "");
    Ok(())
}

#[test]
fn test_escape_neutralizes_every_reserved_character() -> Result<()> {
    let raw = r#"a+b-c&d|e!f(g)h{i}j[k]l^m"n~o*p?q:r\s"#;
    let query = criteria(BooleanOperation::And)
        .field("bodyText", escape(raw))?
        .compile()?;

    match query.root() {
        Some(QueryNode::Leaf(leaf)) => {
            assert_eq!(leaf.field, FieldTarget::Named("bodyText".into()));
            match &leaf.predicate {
                Predicate::Literal { text, .. } => assert_eq!(text, raw),
                other => panic!("expected a literal, got {other:?}"),
            }
        }
        other => panic!("expected a single leaf, got {other:?}"),
    }
    assert_eq!(query.to_string(), format!("bodyText:\"{}\"", escape_text(raw)));
    Ok(())
}

#[test]
fn test_escaped_wildcards_stay_literal() -> Result<()> {
    let query = criteria(BooleanOperation::And)
        .field("bodyText", escape("CWS*").wildcarded())?
        .compile()?;

    assert!(matches!(
        query.root(),
        Some(QueryNode::Leaf(leaf)) if matches!(leaf.predicate, Predicate::Literal { .. })
    ));
    Ok(())
}

#[test]
fn test_invalid_boost_is_rejected() {
    for factor in [0.0, -2.0, f32::INFINITY] {
        let err = criteria(BooleanOperation::And)
            .node_name(boost("home", factor))
            .unwrap_err();
        assert!(matches!(err, ExamineError::InvalidValue(_)));
    }
}

#[test]
fn test_compiled_query_outlives_builder_reuse() -> Result<()> {
    let base = criteria(BooleanOperation::And).node_name("home")?;
    let first = base.clone().compile()?;
    let second = base.field("bodyText", "umbraco")?.compile()?;

    assert_eq!(first.to_string(), "name:home");
    assert_eq!(second.to_string(), "+name:home +bodyText:umbraco");
    Ok(())
}
