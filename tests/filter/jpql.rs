use filterdeck::condition::{Condition, ParameterClass, ParameterValue};
use filterdeck::filter::{FilterComponent, FilterError, FilterState, HasCaption, JpqlFilter};

fn jpql_condition(filter: &JpqlFilter) -> filterdeck::condition::JpqlCondition {
    match filter.query_condition().unwrap() {
        Condition::Jpql(condition) => condition,
        other => panic!("expected a JPQL condition, got {:?}", other),
    }
}

#[test]
fn test_placeholder_without_parameter_class_fails() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("e.status = ?", None).unwrap();

    assert_eq!(
        filter.query_condition(),
        Err(FilterError::MissingParameterClass(filter.id()))
    );
}

#[test]
fn test_unconfigured_filter_fails() {
    let filter = JpqlFilter::new();
    assert_eq!(filter.state(), FilterState::Unbound);
    assert_eq!(filter.query_condition(), Err(FilterError::BlankWhere(filter.id())));
}

#[test]
fn test_blank_where_is_rejected() {
    let mut filter = JpqlFilter::new();
    assert_eq!(filter.set_condition("   ", None), Err(FilterError::BlankWhere(filter.id())));
    assert_eq!(filter.state(), FilterState::Unbound);
}

#[test]
fn test_more_than_one_placeholder_is_rejected() {
    let mut filter = JpqlFilter::new();
    assert_eq!(
        filter.set_condition("{E}.a = ? and {E}.b = ?", None),
        Err(FilterError::TooManyPlaceholders {
            id: filter.id(),
            count: 2
        })
    );
}

#[test]
fn test_condition_without_placeholder_needs_no_class() {
    let mut filter = JpqlFilter::new();
    filter
        .set_condition("{E}.active = true", Some("join {E}.customer c"))
        .unwrap();

    let condition = jpql_condition(&filter);
    assert_eq!(condition.where_clause, "{E}.active = true");
    assert_eq!(condition.join.as_deref(), Some("join {E}.customer c"));
    assert!(condition.parameters.is_empty());
}

#[test]
fn test_placeholder_is_bound_to_generated_parameter() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.status = ?", Some("  ")).unwrap();
    filter.set_parameter_class(Some(ParameterClass::String));
    filter.set_value(Some("active".into())).unwrap();

    let condition = jpql_condition(&filter);
    let parameter = filter.parameter_name().to_string();
    assert!(parameter.starts_with("jpqlFilter_"));
    assert_eq!(condition.where_clause, format!("{{E}}.status = :{}", parameter));
    assert_eq!(condition.join, None);
    assert_eq!(condition.parameters.get(&parameter), Some(&ParameterValue::from("active")));
}

#[test]
fn test_changes_invalidate_cached_condition() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.amount > ?", None).unwrap();
    filter.set_parameter_class(Some(ParameterClass::Integer));
    filter.set_value(Some(10i64.into())).unwrap();
    let first = jpql_condition(&filter);

    filter.set_value(Some(20i64.into())).unwrap();
    let second = jpql_condition(&filter);
    assert_ne!(first, second);
    assert_eq!(
        second.parameters.get(filter.parameter_name()),
        Some(&ParameterValue::Integer(20))
    );

    filter.set_condition("{E}.amount < ?", None).unwrap();
    assert!(jpql_condition(&filter).where_clause.starts_with("{E}.amount <"));
}

#[test]
fn test_value_must_match_parameter_class() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.amount > ?", None).unwrap();

    assert_eq!(
        filter.set_value(Some(1i64.into())),
        Err(FilterError::MissingParameterClass(filter.id()))
    );

    filter.set_parameter_class(Some(ParameterClass::Integer));
    assert!(matches!(
        filter.set_value(Some("ten".into())),
        Err(FilterError::ParameterTypeMismatch { .. })
    ));
    assert!(matches!(
        filter.set_value(Some(ParameterValue::List(vec![1i64.into()]))),
        Err(FilterError::ParameterTypeMismatch { .. })
    ));
}

#[test]
fn test_changing_parameter_class_drops_incompatible_value() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.code = ?", None).unwrap();
    filter.set_parameter_class(Some(ParameterClass::String));
    filter.set_value(Some("x".into())).unwrap();

    filter.set_parameter_class(Some(ParameterClass::String));
    assert!(filter.value().is_some());

    filter.set_parameter_class(Some(ParameterClass::Integer));
    assert!(filter.value().is_none());
}

#[test]
fn test_in_expression_wraps_single_value() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.status in ?", None).unwrap();
    filter.set_parameter_class(Some(ParameterClass::String));
    assert!(filter.has_in_expression());

    filter.set_value(Some("open".into())).unwrap();
    assert_eq!(filter.value(), Some(&ParameterValue::List(vec!["open".into()])));

    filter
        .set_value(Some(ParameterValue::List(vec!["open".into(), "closed".into()])))
        .unwrap();
    let condition = jpql_condition(&filter);
    assert_eq!(
        condition.parameters.get(filter.parameter_name()),
        Some(&ParameterValue::List(vec!["open".into(), "closed".into()]))
    );
}

#[test]
fn test_caption() {
    let mut filter = JpqlFilter::new();
    assert_eq!(filter.caption_or("JPQL"), "JPQL");
    filter.set_caption(Some("Active only".to_string()));
    assert_eq!(filter.caption(), Some("Active only"));
}

#[test]
fn test_changing_fragment_reshapes_bound_value() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.status in ?", None).unwrap();
    filter.set_parameter_class(Some(ParameterClass::String));
    filter.set_value(Some("a".into())).unwrap();

    filter.set_condition("{E}.status = ?", None).unwrap();
    assert_eq!(filter.value(), Some(&ParameterValue::from("a")));
    let condition = jpql_condition(&filter);
    assert_eq!(condition.parameters.get(filter.parameter_name()), Some(&ParameterValue::from("a")));

    filter.set_condition("{E}.status in ?", None).unwrap();
    assert_eq!(filter.value(), Some(&ParameterValue::List(vec!["a".into()])));
}

#[test]
fn test_changing_fragment_drops_value_that_no_longer_fits() {
    let mut filter = JpqlFilter::new();
    filter.set_condition("{E}.status in ?", None).unwrap();
    filter.set_parameter_class(Some(ParameterClass::String));
    filter
        .set_value(Some(ParameterValue::List(vec!["a".into(), "b".into()])))
        .unwrap();

    filter.set_condition("{E}.status = ?", None).unwrap();
    assert!(filter.value().is_none());
    assert!(jpql_condition(&filter).parameters.is_empty());

    filter.set_value(Some("a".into())).unwrap();
    filter.set_condition("{E}.active = true", None).unwrap();
    assert!(filter.value().is_none());
    assert!(jpql_condition(&filter).parameters.is_empty());
}
