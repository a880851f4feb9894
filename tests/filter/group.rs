use filterdeck::condition::{Condition, Operation};
use filterdeck::filter::{
    Collapsible, FilterComponent, FilterState, FilterTree, GroupFilter, HasCaption, LogicalFilterComponent,
    SupportsColumnsCount,
};

#[test]
fn test_new_group_has_neutral_condition() {
    let group = GroupFilter::new(Operation::Or);
    assert_eq!(group.state(), FilterState::Configured);
    assert_eq!(group.operation(), Operation::Or);
    assert!(group.children().is_empty());

    let condition = group.query_condition().unwrap();
    assert!(condition.is_empty());
    assert_eq!(condition, Condition::or(vec![]));
}

#[test]
fn test_collapsible_presentation() {
    let mut group = GroupFilter::default();
    assert!(group.is_expanded());

    group.set_expanded(false);
    assert!(group.is_expanded(), "non-collapsible groups stay expanded");

    group.set_collapsible(true);
    group.toggle_expanded();
    assert!(!group.is_expanded());

    group.set_collapsible(false);
    assert!(group.is_expanded());
}

#[test]
fn test_columns_count_is_at_least_one() {
    let mut group = GroupFilter::default();
    group.set_columns_count(0);
    assert_eq!(group.columns_count(), 1);
    group.set_columns_count(3);
    assert_eq!(group.columns_count(), 3);
}

#[test]
fn test_presentation_changes_leave_condition_alone() {
    let mut tree = FilterTree::new();
    let group = tree.new_group();
    let before = tree.query_condition(group).unwrap();

    tree.update(group, |node| {
        let group = node.as_group_mut()?;
        group.set_caption(Some("Advanced".to_string()));
        group.set_operation_caption_visible(false);
        Ok::<_, filterdeck::FilterError>(())
    })
    .unwrap()
    .unwrap();

    let node = tree.get(group).unwrap().as_group().unwrap();
    assert_eq!(node.caption(), Some("Advanced"));
    assert!(!node.is_operation_caption_visible());
    assert_eq!(tree.query_condition(group).unwrap(), before);
}
