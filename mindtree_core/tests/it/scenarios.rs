// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use mindtree_core::NodeError;
use mindtree_core::event::{NodeChangeEvent, NodeProperty};
use mindtree_core::extension::Encrypted;
use mindtree_core::node::{CloneType, NodeMap, Side};

use crate::helpers::{Recorder, Seen, add_child, rooted_map};

#[test]
fn every_node_is_in_its_own_groups() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let loose = map.create_node();
    for node in [root, a, loose] {
        for kind in CloneType::ALL {
            let group = map.clones(node, kind);
            assert!(group.size() >= 1);
            assert!(group.contains(node));
        }
    }
}

#[test]
fn tree_clone_copies_every_node_and_shares_content() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let b = add_child(&mut map, a, "b");
    let c = add_child(&mut map, a, "c");
    let d = add_child(&mut map, c, "d");
    let before = map.node_count();

    let a2 = map.clone_tree(a);
    assert_eq!(map.node_count(), before + 4);

    let originals: Vec<_> = map.descendants(a).collect();
    let copies: Vec<_> = map.descendants(a2).collect();
    assert_eq!(originals, vec![a, b, c, d]);
    assert_eq!(copies.len(), 4);
    for (original, copy) in originals.iter().zip(&copies) {
        assert_ne!(original, copy);
        assert!(map.all_clones(*original).contains(*copy));
        assert!(map.subtree_clones(*original).contains(*copy));
        assert_eq!(map.text(*original), map.text(*copy));
    }
    assert!(map.is_clone_tree_root(a2));
    for &copy in &copies[1..] {
        assert!(map.is_clone_tree_node(copy), "{copy:?} was cloned with its parent");
    }
    assert!(!map.is_attached(a2));
    map.append(root, a2).unwrap();
    assert!(copies.iter().all(|&n| map.is_attached(n)));
}

#[test]
fn text_edits_are_visible_through_every_content_clone() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let a2 = map.clone_content(a).unwrap();
    let a3 = map.clone_content(a2).unwrap();
    map.append(root, a3).unwrap();

    for (editor, text) in [(a, "one"), (a2, "two"), (a3, "three")] {
        map.set_text(editor, text);
        for member in map.all_clones(a).iter().collect::<Vec<_>>() {
            assert_eq!(map.text(member), text);
        }
    }
}

#[test]
fn content_change_fans_out_to_each_clone_view() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let a2 = map.clone_content(a).unwrap();
    let view = Recorder::new();
    map.add_viewer(a, view.clone());
    map.add_viewer(a2, view.clone());

    map.set_text(a2, "edited");
    assert_eq!(view.take(), vec![Seen::ViewChanged(a), Seen::ViewChanged(a2)]);

    map.fire_node_changed(&NodeChangeEvent::refresh(a, NodeProperty::Unknown));
    assert_eq!(view.take().len(), 2);
}

#[test]
fn structural_events_stay_with_their_parent_in_a_content_group() {
    let (mut map, root) = rooted_map();
    let p = add_child(&mut map, root, "p");
    let other = add_child(&mut map, root, "other");
    let p2 = map.clone_content(p).unwrap();
    map.append(root, p2).unwrap();
    let p_view = Recorder::new();
    let p2_view = Recorder::new();
    map.add_viewer(p, p_view.clone());
    map.add_viewer(p2, p2_view.clone());

    let x = add_child(&mut map, p, "x");
    assert_eq!(p_view.take(), vec![Seen::ViewInserted(x)]);
    assert_eq!(map.child_count(p2), 0);

    map.move_node(x, other, 0).unwrap();
    assert_eq!(p_view.take(), vec![Seen::ViewDeleted(x)]);

    map.move_node(x, p, 0).unwrap();
    map.remove(p, 0).unwrap();
    assert_eq!(
        p_view.take(),
        vec![Seen::ViewInserted(x), Seen::ViewDeleted(x)]
    );

    assert!(p2_view.take().is_empty());
    map.set_text(p, "shared");
    assert_eq!(p2_view.take(), vec![Seen::ViewChanged(p2)]);
}

#[test]
fn move_notifies_removal_before_insertion_once() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let b = add_child(&mut map, root, "b");
    let x = add_child(&mut map, a, "x");

    let rec = Recorder::new();
    map.add_viewer(a, rec.clone());
    map.add_viewer(b, rec.clone());
    map.add_map_change_listener(rec.clone());

    map.move_node(x, b, 0).unwrap();
    assert_eq!(
        rec.take(),
        vec![
            Seen::ViewDeleted(x),
            Seen::MapMoved(x),
            Seen::ViewInserted(x),
        ]
    );
    assert_eq!(map.parent(x), Some(b));
}

#[test]
fn repeated_detach_is_harmless() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let a2 = map.clone_content(a).unwrap();
    map.append(root, a2).unwrap();
    assert_eq!(map.all_clones(a).attached_len(), 2);

    map.remove(root, 0).unwrap();
    map.set_parent(a, None).unwrap();
    map.set_parent(a, None).unwrap();
    let group = map.all_clones(a);
    assert_eq!(group.attached_len(), 1);
    assert_eq!(group.size(), 2);
    assert!(group.is_attached(a2));
}

#[test]
fn suggested_side_flips_once_right_dominates() {
    let (mut map, root) = rooted_map();
    assert_eq!(map.suggest_new_child_side(root, root), Side::Right);

    let a = add_child(&mut map, root, "a");
    let b = add_child(&mut map, root, "b");
    // Both DEFAULT children resolve to the right.
    assert!(!map.is_left(a, root));
    assert!(!map.is_left(b, root));
    assert_eq!(map.suggest_new_child_side(root, root), Side::Left);

    let c = add_child(&mut map, root, "c");
    map.set_side(c, Side::Left);
    let d = add_child(&mut map, root, "d");
    map.set_side(d, Side::Left);
    assert_eq!(map.suggest_new_child_side(root, root), Side::Right);
}

#[test]
fn encrypted_node_refuses_content_clone() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    let _first = map.clone_content(a).unwrap();
    let _second = map.clone_content(a).unwrap();
    assert_eq!(map.all_clones(a).size(), 3);

    map.put_extension(a, Encrypted { accessible: true });
    let tree_before = map.subtree_clones(a).size();
    let content_before = map.all_clones(a).size();
    let err = map.clone_content(a).unwrap_err();
    assert_eq!(err, NodeError::CloneEncryptedNode);
    assert!(err.is_clone_restriction());
    assert_eq!(map.subtree_clones(a).size(), tree_before);
    assert_eq!(map.all_clones(a).size(), content_before);
}

#[test]
fn swap_data_exchanges_text_and_clone_identity() {
    let (mut map, root) = rooted_map();
    let x = add_child(&mut map, root, "x");
    let y = add_child(&mut map, root, "y");
    let z = map.clone_content(x).unwrap();
    map.append(root, z).unwrap();

    map.swap_data(x, y);
    assert_eq!(map.text(x), "y");
    assert_eq!(map.text(y), "x");
    // z kept its content and now shares it with y.
    assert_eq!(map.text(z), "x");
    assert!(map.all_clones(z).contains(y));
    assert!(!map.all_clones(z).contains(x));
    // Positions stay with the instances.
    assert_eq!(map.index_in_parent(x), Some(0));
    assert!(map.is_attached(x) && map.is_attached(y));

    map.set_text(y, "shared");
    assert_eq!(map.text(z), "shared");
    assert_eq!(map.text(x), "y");
}

#[test]
fn destroyed_subtree_leaves_surviving_clones_intact() {
    let (mut map, root) = rooted_map();
    let a = add_child(&mut map, root, "a");
    add_child(&mut map, a, "b");
    let a2 = map.clone_tree(a);
    let b2 = map.child_at(a2, 0).unwrap();

    let view = Recorder::new();
    map.add_viewer(a, view.clone());
    map.destroy_node(a2).unwrap();

    assert!(!map.is_alive(a2));
    assert!(!map.is_alive(b2));
    assert_eq!(map.subtree_clones(a).size(), 1);
    assert_eq!(view.take(), vec![Seen::ViewChanged(a)]);
}

#[test]
fn observers_see_the_finished_edit() {
    use std::cell::Cell;
    use std::rc::Rc;

    use mindtree_core::event::{MapChangeListener, NodeInsertionEvent};

    struct ParentCheck(Cell<bool>);
    impl MapChangeListener for ParentCheck {
        fn on_node_inserted(&self, map: &NodeMap, e: &NodeInsertionEvent) {
            self.0.set(
                map.parent(e.child) == Some(e.parent)
                    && map.child_at(e.parent, e.index) == Some(e.child),
            );
        }
    }

    let (mut map, root) = rooted_map();
    let check = Rc::new(ParentCheck(Cell::new(false)));
    map.add_map_change_listener(check.clone());
    add_child(&mut map, root, "a");
    assert!(check.0.get());
}
