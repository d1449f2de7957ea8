// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests: random edit sequences keep the tree and clone bookkeeping
//! consistent.

use mindtree_core::node::{CloneType, NodeId, NodeMap};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Create,
    Insert { parent: usize, child: usize, at: usize },
    Remove { parent: usize, at: usize },
    Move { node: usize, parent: usize, at: usize },
    CloneTree(usize),
    CloneContent(usize),
    Destroy(usize),
    SetText(usize, u8),
    Swap(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        4 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(parent, child, at)| Op::Insert { parent, child, at }),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(parent, at)| Op::Remove { parent, at }),
        2 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(node, parent, at)| Op::Move { node, parent, at }),
        2 => any::<usize>().prop_map(Op::CloneTree),
        2 => any::<usize>().prop_map(Op::CloneContent),
        1 => any::<usize>().prop_map(Op::Destroy),
        2 => (any::<usize>(), any::<u8>()).prop_map(|(n, t)| Op::SetText(n, t)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Swap(a, b)),
    ]
}

struct Harness {
    map: NodeMap,
    root: NodeId,
    nodes: Vec<NodeId>,
}

impl Harness {
    fn new() -> Self {
        let mut map = NodeMap::new();
        let root = map.create_node_with_text("root");
        map.set_root(root).unwrap();
        Self {
            map,
            root,
            nodes: vec![root],
        }
    }

    fn pick(&self, i: usize) -> NodeId {
        self.nodes[i % self.nodes.len()]
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Create => {
                let n = self.map.create_node();
                self.nodes.push(n);
            }
            Op::Insert { parent, child, at } => {
                let (p, c) = (self.pick(parent), self.pick(child));
                let index = at % (self.map.child_count(p) + 1);
                let _ = self.map.insert(p, c, Some(index));
            }
            Op::Remove { parent, at } => {
                let p = self.pick(parent);
                let count = self.map.child_count(p);
                if count > 0 {
                    self.map.remove(p, at % count).unwrap();
                }
            }
            Op::Move { node, parent, at } => {
                let (n, p) = (self.pick(node), self.pick(parent));
                let index = at % (self.map.child_count(p) + 1);
                let _ = self.map.move_node(n, p, index);
            }
            Op::CloneTree(i) => {
                let n = self.map.clone_tree(self.pick(i));
                self.nodes.extend(self.map.descendants(n));
            }
            Op::CloneContent(i) => {
                let n = self.map.clone_content(self.pick(i)).unwrap();
                self.nodes.push(n);
            }
            Op::Destroy(i) => {
                let _ = self.map.destroy_node(self.pick(i));
                let map = &self.map;
                self.nodes.retain(|&n| map.is_alive(n));
            }
            Op::SetText(i, t) => {
                let n = self.pick(i);
                self.map.set_text(n, format!("t{t}"));
            }
            Op::Swap(a, b) => {
                let (a, b) = (self.pick(a), self.pick(b));
                self.map.swap_data(a, b);
            }
        }
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let map = &self.map;
        prop_assert_eq!(map.node_count(), self.nodes.len());
        for &n in &self.nodes {
            prop_assert!(map.is_alive(n));

            for kind in CloneType::ALL {
                let group = map.clones(n, kind);
                prop_assert!(group.size() >= 1);
                prop_assert!(group.contains(n));
            }

            // TREE membership implies CONTENT membership.
            let content = map.all_clones(n);
            for member in map.subtree_clones(n).iter() {
                prop_assert!(content.contains(member));
            }

            // Content clones agree on content.
            for member in content.iter() {
                prop_assert_eq!(map.text(member), map.text(n));
            }

            // Attachment is reachability from the root.
            let reachable = map.path_to_root(n)[0] == self.root;
            prop_assert_eq!(map.is_attached(n), reachable);

            // Links agree in both directions.
            for child in map.children(n) {
                prop_assert_eq!(map.parent(child), Some(n));
            }
            if let Some(parent) = map.parent(n) {
                prop_assert!(map.index_of(parent, n).is_some());
            }
            if let Some(preferred) = map.preferred_child(n) {
                prop_assert_eq!(map.parent(preferred), Some(n));
            }
        }
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every reachable state keeps clone groups, content sharing, links, and
    /// attachment consistent.
    #[test]
    fn random_edits_keep_bookkeeping_consistent(
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
            harness.check()?;
        }
    }

    /// Draining after arbitrary edits never reports freed slots and leaves
    /// nothing behind.
    #[test]
    fn drain_is_clean(ops in prop::collection::vec(op(), 1..40)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
        }
        let changes = harness.map.drain_changes();
        let live: Vec<u32> = harness.nodes.iter().map(|n| n.index()).collect();
        for idx in changes.sides.iter().chain(&changes.content).chain(&changes.topology) {
            prop_assert!(live.contains(idx));
        }
        prop_assert!(harness.map.drain_changes().is_empty());
    }
}
