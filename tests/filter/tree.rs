use filterdeck::condition::{Condition, Operation, ParameterClass, ParameterValue, PropertyOperation};
use filterdeck::config::FilterConfig;
use filterdeck::filter::{
    FilterComponent, FilterError, FilterId, FilterState, FilterTree, GroupFilter, JpqlFilter, PropertyFilter,
};
use filterdeck::query::{DataLoader, JpqlLoader, QueryBuilder};

fn status_filter(tree: &mut FilterTree, value: &str) -> FilterId {
    let mut filter = PropertyFilter::for_property("status", PropertyOperation::Equal).unwrap();
    filter.set_value(Some(value.into())).unwrap();
    tree.insert(filter)
}

fn expected_condition(tree: &FilterTree, group: FilterId) -> Condition {
    let children = tree
        .children(group)
        .unwrap()
        .iter()
        .map(|child| tree.query_condition(*child).unwrap())
        .collect();
    Condition::logical(tree.operation(group).unwrap(), children)
}

#[test]
fn test_and_of_two_children() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "active");
    let b = status_filter(&mut tree, "pending");

    tree.add(group, a).unwrap();
    tree.add(group, b).unwrap();
    tree.set_operation(group, Operation::And).unwrap();

    let condition_a = tree.query_condition(a).unwrap();
    let condition_b = tree.query_condition(b).unwrap();
    assert_eq!(
        tree.query_condition(group).unwrap(),
        Condition::and(vec![condition_a, condition_b])
    );
}

#[test]
fn test_condition_tracks_add_remove_sequence() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "a");
    let b = status_filter(&mut tree, "b");
    let c = status_filter(&mut tree, "c");

    tree.add(group, a).unwrap();
    assert_eq!(tree.query_condition(group).unwrap(), expected_condition(&tree, group));

    tree.add(group, b).unwrap();
    tree.add(group, c).unwrap();
    tree.remove(group, b).unwrap();
    assert_eq!(tree.children(group).unwrap(), &[a, c]);
    assert_eq!(tree.query_condition(group).unwrap(), expected_condition(&tree, group));

    tree.add(group, b).unwrap();
    assert_eq!(tree.children(group).unwrap(), &[a, c, b]);
    assert_eq!(tree.query_condition(group).unwrap(), expected_condition(&tree, group));
}

#[test]
fn test_remove_all_is_idempotent() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "a");
    tree.add(group, a).unwrap();

    tree.remove_all(group).unwrap();
    let once = tree.query_condition(group).unwrap();
    assert!(once.is_empty());
    assert!(tree.children(group).unwrap().is_empty());
    assert_eq!(tree.get(a).unwrap().state(), FilterState::Detached);

    tree.remove_all(group).unwrap();
    assert_eq!(tree.query_condition(group).unwrap(), once);
    assert!(tree.children(group).unwrap().is_empty());
}

#[test]
fn test_set_operation_keeps_children() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "a");
    let b = status_filter(&mut tree, "b");
    tree.add(group, a).unwrap();
    tree.add(group, b).unwrap();

    tree.set_operation(group, Operation::And).unwrap();
    tree.set_operation(group, Operation::Or).unwrap();

    assert_eq!(tree.children(group).unwrap(), &[a, b]);
    let condition = tree.query_condition(group).unwrap();
    let logical = condition.as_logical().unwrap();
    assert_eq!(logical.operation, Operation::Or);
    assert_eq!(logical.conditions.len(), 2);
}

#[test]
fn test_add_to_second_container_fails() {
    let mut tree = FilterTree::new();
    let first = tree.new_group();
    let second = tree.new_group();
    let a = status_filter(&mut tree, "a");

    tree.add(first, a).unwrap();
    assert_eq!(
        tree.add(second, a),
        Err(FilterError::AlreadyAttached {
            component: a,
            parent: first
        })
    );
    assert!(tree.children(second).unwrap().is_empty());

    tree.remove(first, a).unwrap();
    tree.add(second, a).unwrap();
    assert_eq!(tree.parent(a).unwrap(), Some(second));
}

#[test]
fn test_re_adding_to_same_container_is_noop() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "a");

    tree.add(group, a).unwrap();
    tree.add(group, a).unwrap();
    assert_eq!(tree.children(group).unwrap(), &[a]);
}

#[test]
fn test_cycles_are_rejected() {
    let mut tree = FilterTree::new();
    let outer = tree.new_group();
    let inner = tree.new_group();

    assert!(matches!(tree.add(outer, outer), Err(FilterError::Cycle { .. })));

    tree.add(outer, inner).unwrap();
    assert_eq!(
        tree.add(inner, outer),
        Err(FilterError::Cycle {
            component: outer,
            container: inner
        })
    );
}

#[test]
fn test_add_to_leaf_fails() {
    let mut tree = FilterTree::new();
    let a = status_filter(&mut tree, "a");
    let b = status_filter(&mut tree, "b");

    assert_eq!(tree.add(a, b), Err(FilterError::NotLogical(a)));
}

#[test]
fn test_unknown_ids_fail_with_not_found() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let missing = FilterId::new();

    assert_eq!(tree.query_condition(missing), Err(FilterError::NotFound(missing)));
    assert_eq!(tree.add(group, missing), Err(FilterError::NotFound(missing)));
    assert_eq!(tree.remove_all(missing), Err(FilterError::NotFound(missing)));
}

#[test]
fn test_remove_absent_child_is_noop() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let a = status_filter(&mut tree, "a");
    let b = status_filter(&mut tree, "b");
    tree.add(group, a).unwrap();

    tree.remove(group, b).unwrap();
    assert_eq!(tree.children(group).unwrap(), &[a]);
    assert_eq!(tree.get(b).unwrap().state(), FilterState::Configured);
}

#[test]
fn test_nested_leaf_change_reaches_root() {
    let mut tree = FilterTree::new();
    let root = tree.new_group();
    let nested = tree.new_group();
    let a = status_filter(&mut tree, "a");
    tree.add(nested, a).unwrap();
    tree.add(root, nested).unwrap();

    tree.update(a, |node| node.as_property_mut()?.set_value(Some("changed".into())))
        .unwrap()
        .unwrap();

    let root_condition = tree.query_condition(root).unwrap();
    let nested_condition = &root_condition.as_logical().unwrap().conditions[0];
    let Condition::Property(leaf) = &nested_condition.as_logical().unwrap().conditions[0] else {
        panic!("expected a property condition");
    };
    assert_eq!(leaf.parameter_value, Some(ParameterValue::from("changed")));
}

#[test]
fn test_detaching_nested_group_removes_its_contribution() {
    let mut tree = FilterTree::new();
    let root = tree.new_group();
    let nested = tree.new_group();
    let a = status_filter(&mut tree, "a");
    let b = status_filter(&mut tree, "b");
    tree.add(nested, a).unwrap();
    tree.add(root, nested).unwrap();
    tree.add(root, b).unwrap();

    tree.remove(root, nested).unwrap();

    let condition_b = tree.query_condition(b).unwrap();
    assert_eq!(tree.query_condition(root).unwrap(), Condition::and(vec![condition_b]));
    // the detached group keeps its own children
    assert_eq!(tree.children(nested).unwrap(), &[a]);
}

#[test]
fn test_lifecycle_states() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let jpql = tree.insert(JpqlFilter::new());
    assert_eq!(tree.get(jpql).unwrap().state(), FilterState::Unbound);

    tree.update(jpql, |node| node.as_jpql_mut()?.set_condition("{E}.active = true", None))
        .unwrap()
        .unwrap();
    assert_eq!(tree.get(jpql).unwrap().state(), FilterState::Configured);

    tree.add(group, jpql).unwrap();
    assert_eq!(tree.get(jpql).unwrap().state(), FilterState::Attached);

    tree.remove(group, jpql).unwrap();
    assert_eq!(tree.get(jpql).unwrap().state(), FilterState::Detached);

    tree.add(group, jpql).unwrap();
    assert_eq!(tree.get(jpql).unwrap().state(), FilterState::Attached);
}

#[test]
fn test_invalid_child_surfaces_in_group_condition() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let jpql = tree.insert(JpqlFilter::new());
    tree.add(group, jpql).unwrap();

    assert_eq!(tree.query_condition(group), Err(FilterError::BlankWhere(jpql)));

    tree.update(jpql, |node| {
        let filter = node.as_jpql_mut()?;
        filter.set_condition("{E}.status = ?", None)?;
        filter.set_parameter_class(Some(ParameterClass::String));
        filter.set_value(Some("active".into()))
    })
    .unwrap()
    .unwrap();

    assert!(!tree.query_condition(group).unwrap().is_empty());
}

#[test]
fn test_default_operation_from_config() {
    let config = FilterConfig {
        default_operation: Operation::Or,
        ..FilterConfig::default()
    };
    let mut tree = FilterTree::with_config(&config);
    let group = tree.new_group();
    assert_eq!(tree.operation(group).unwrap(), Operation::Or);
}

#[test]
fn test_apply_hands_condition_to_loader() {
    let mut tree = FilterTree::new();
    let root = tree.new_group();
    let mut loader = JpqlLoader::new("select e from app_Order e", QueryBuilder::default());

    tree.apply(root, &mut loader).unwrap();
    assert!(loader.condition().is_none());

    let a = status_filter(&mut tree, "open");
    tree.add(root, a).unwrap();
    tree.apply(root, &mut loader).unwrap();
    assert_eq!(loader.condition(), Some(&tree.query_condition(root).unwrap()));

    tree.remove_all(root).unwrap();
    tree.apply(root, &mut loader).unwrap();
    assert!(loader.condition().is_none());
}

#[test]
fn test_replacing_node_in_update_keeps_identity() {
    let mut tree = FilterTree::new();
    let root = tree.new_group();
    let a = status_filter(&mut tree, "a");
    tree.add(root, a).unwrap();

    let mut replacement = PropertyFilter::for_property("status", PropertyOperation::Equal).unwrap();
    replacement.set_value(Some("b".into())).unwrap();
    tree.update(a, |node| *node = replacement.into()).unwrap();

    let node = tree.get(a).unwrap();
    assert_eq!(node.id(), a);
    assert_eq!(node.parent(), Some(root));
    assert_eq!(node.state(), FilterState::Attached);

    let leaf = tree.query_condition(a).unwrap();
    let Condition::Property(property) = &leaf else {
        panic!("expected a property condition");
    };
    assert_eq!(property.parameter_value, Some(ParameterValue::from("b")));
    assert_eq!(tree.query_condition(root).unwrap(), Condition::and(vec![leaf]));
}

#[test]
fn test_replacing_group_in_update_keeps_children() {
    let mut tree = FilterTree::new();
    let root = tree.new_group();
    let nested = tree.new_group();
    let a = status_filter(&mut tree, "a");
    tree.add(nested, a).unwrap();
    tree.add(root, nested).unwrap();

    tree.update(nested, |node| *node = GroupFilter::new(Operation::Or).into())
        .unwrap();

    assert_eq!(tree.children(nested).unwrap(), &[a]);
    assert_eq!(tree.operation(nested).unwrap(), Operation::Or);
    assert_eq!(tree.parent(a).unwrap(), Some(nested));
    assert_eq!(tree.query_condition(nested).unwrap(), expected_condition(&tree, nested));
    assert_eq!(tree.query_condition(root).unwrap(), expected_condition(&tree, root));
}
