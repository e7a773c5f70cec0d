//! End-to-end permission resolution over a real group tree.
//!
//! Builds the group hierarchy `Staff → Electronics → Interns`, attaches
//! registers at different depths, and checks precedence: a user's own
//! register beats its group, a group beats its ancestors, and an
//! all-inherit chain falls back to the resolver default.

use depot_authorization::{
    load_register, set_permission, GroupDirectory, MemoryPermissionStore, Operation,
    PermissionResolver, PermissionValue, PrincipalRef, User, UserId,
};
use depot_core::{DepotError, EntityId, Forest, NodeId, NodeKind, StructuralNode};

struct Fixture {
    forest: Forest,
    groups: GroupDirectory,
    staff: NodeId,
    electronics: NodeId,
    interns: NodeId,
}

fn group(name: &str, id: u64) -> StructuralNode {
    StructuralNode::new(NodeKind::Group, name).with_id(EntityId(id))
}

fn fixture() -> Fixture {
    let mut forest = Forest::new();
    let staff = forest.insert(group("Staff", 1)).unwrap();
    let electronics = forest
        .insert(group("Electronics", 2).with_parent(staff))
        .unwrap();
    let interns = forest
        .insert(group("Interns", 3).with_parent(electronics))
        .unwrap();
    Fixture {
        forest,
        groups: GroupDirectory::new(),
        staff,
        electronics,
        interns,
    }
}

#[test]
fn own_register_overrides_group() {
    let mut fx = fixture();
    fx.groups
        .register_mut(fx.interns)
        .set_value(Operation::PartsEdit, PermissionValue::Disallow)
        .unwrap();

    let mut user = User::new(UserId(1), "dana").with_group(fx.interns);
    user.register
        .set_value(Operation::PartsEdit, PermissionValue::Allow)
        .unwrap();

    let resolver = PermissionResolver::default();
    assert!(resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsEdit)
        .unwrap());
}

#[test]
fn inherit_walks_up_to_grandparent() {
    let mut fx = fixture();
    fx.groups
        .register_mut(fx.staff)
        .set_value(Operation::PartsDelete, PermissionValue::Disallow)
        .unwrap();

    // User and immediate group both inherit; the grandparent decides.
    let user = User::new(UserId(1), "dana").with_group(fx.interns);
    let resolver = PermissionResolver::default();
    assert!(!resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsDelete)
        .unwrap());
    assert_eq!(
        resolver
            .resolve_value(&fx.forest, &fx.groups, &user, Operation::PartsDelete)
            .unwrap(),
        Some(false)
    );
}

#[test]
fn nearest_terminal_wins_over_farther_one() {
    let mut fx = fixture();
    fx.groups
        .register_mut(fx.staff)
        .set_value(Operation::PartsRead, PermissionValue::Disallow)
        .unwrap();
    fx.groups
        .register_mut(fx.electronics)
        .set_value(Operation::PartsRead, PermissionValue::Allow)
        .unwrap();

    let user = User::new(UserId(1), "dana").with_group(fx.interns);
    let resolver = PermissionResolver::default();
    assert!(resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsRead)
        .unwrap());
}

#[test]
fn all_inherit_chain_defaults_to_deny() {
    let fx = fixture();
    let user = User::new(UserId(1), "dana").with_group(fx.interns);
    let resolver = PermissionResolver::default();
    assert!(!resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsRead)
        .unwrap());
    assert_eq!(
        resolver
            .resolve_value(&fx.forest, &fx.groups, &user, Operation::PartsRead)
            .unwrap(),
        None
    );
}

#[test]
fn reparenting_a_group_changes_resolution() {
    let mut fx = fixture();
    fx.groups
        .register_mut(fx.staff)
        .set_value(Operation::PartsRead, PermissionValue::Allow)
        .unwrap();

    let user = User::new(UserId(1), "dana").with_group(fx.interns);
    let resolver = PermissionResolver::default();
    assert!(resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsRead)
        .unwrap());

    // Detach the interns subtree from the permissive chain.
    fx.forest.set_parent(fx.interns, None).unwrap();
    assert!(!resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsRead)
        .unwrap());
}

#[test]
fn group_tree_rejects_cycles() {
    let mut fx = fixture();
    let err = fx.forest.set_parent(fx.staff, Some(fx.interns)).unwrap_err();
    assert!(matches!(err, DepotError::CycleDetected { .. }));
}

#[test]
fn registers_loaded_from_store_resolve_identically() {
    let mut fx = fixture();
    let store = MemoryPermissionStore::new();

    set_permission(
        &store,
        PrincipalRef::Group(fx.staff),
        Operation::PartsEdit,
        PermissionValue::Allow,
    )
    .unwrap();
    set_permission(
        &store,
        PrincipalRef::Group(fx.staff),
        Operation::PartsDelete,
        PermissionValue::Disallow,
    )
    .unwrap();

    let register = load_register(&store, PrincipalRef::Group(fx.staff)).unwrap();
    fx.groups.attach(fx.staff, register);

    let user = User::new(UserId(1), "dana").with_group(fx.interns);
    let resolver = PermissionResolver::default();
    assert!(resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsEdit)
        .unwrap());
    assert!(!resolver
        .resolve(&fx.forest, &fx.groups, &user, Operation::PartsDelete)
        .unwrap());
}

#[test]
fn group_breadcrumbs_share_the_walk() {
    let fx = fixture();
    let trail = fx.forest.breadcrumbs(fx.interns, "Groups", true).unwrap();
    let labels: Vec<&str> = trail.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Groups", "Staff", "Electronics", "Interns"]);
    assert_eq!(
        fx.forest.full_path(fx.interns).unwrap(),
        "Staff → Electronics → Interns"
    );
}
