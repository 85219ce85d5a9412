//! Integration tests for relationship snapshots.

use followgraph_core::{Identity, RelationshipSnapshot};
use std::collections::HashSet;

fn ids(names: &[&str]) -> Vec<Identity> {
    names.iter().map(Identity::new).collect()
}

fn set(list: &[Identity]) -> HashSet<Identity> {
    list.iter().cloned().collect()
}

#[test]
fn test_categories_partition_union() {
    let following = ids(&["ann", "bob", "cy", "dee", "Eve"]);
    let followers = ids(&["bob", "eve", "fay", "dee", "gus"]);
    let snapshot = RelationshipSnapshot::compute(&following, &followers);

    let mutuals = set(&snapshot.mutuals);
    let non_mutuals = set(&snapshot.non_mutuals);
    let not_back = set(&snapshot.not_following_back);

    assert!(mutuals.is_disjoint(&non_mutuals));
    assert!(mutuals.is_disjoint(&not_back));
    assert!(non_mutuals.is_disjoint(&not_back));

    let following_union: HashSet<_> = mutuals.union(&non_mutuals).cloned().collect();
    let followers_union: HashSet<_> = mutuals.union(&not_back).cloned().collect();
    assert_eq!(following_union, set(&following));
    assert_eq!(followers_union, set(&followers));

    let total = mutuals.len() + non_mutuals.len() + not_back.len();
    let all: HashSet<_> = set(&following).union(&set(&followers)).cloned().collect();
    assert_eq!(total, all.len());
}

#[test]
fn test_order_follows_input() {
    let following = ids(&["z", "y", "x", "w"]);
    let followers = ids(&["q", "x", "p"]);
    let snapshot = RelationshipSnapshot::compute(&following, &followers);

    assert_eq!(snapshot.non_mutuals, ids(&["z", "y", "w"]));
    assert_eq!(snapshot.not_following_back, ids(&["q", "p"]));
}

#[test]
fn test_snapshot_serialization_roundtrip() {
    let snapshot = RelationshipSnapshot::compute(&ids(&["a", "b"]), &ids(&["b"]));
    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: RelationshipSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}
