use coalseq::prelude::*;
use coalseq::{StreamingIterator, TreeFlags};

fn sample(tc: &mut TableCollection) -> NodeId {
    tc.add_sample(Time::from(0.0), PopulationId::from(0usize))
}

fn two_tree_sequence() -> TreeSequence {
    // E2
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 5.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    tc.add_record(5.0, 10.0, NodeId::from(3usize), &[a, b], Time::from(2.0), PopulationId::from(0usize));
    tc.build_index().unwrap()
}

#[test]
fn single_tree_root_and_mrca() {
    // E1
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    let ts = tc.build_index().unwrap();
    let mut tree = ts.tree_iterator(TreeFlags::NONE);
    assert!(tree.first());
    assert_eq!(tree.root(), NodeId::from(2usize));
    assert_eq!(tree.mrca(a, b), Some(NodeId::from(2usize)));
    assert!(!tree.next());
}

#[test]
fn iterates_both_trees_of_a_recombining_sequence() {
    let ts = two_tree_sequence();
    let mut tree = ts.tree_iterator(TreeFlags::NONE);
    assert!(tree.first());
    assert_eq!(tree.interval(), (0.0, 5.0));
    assert_eq!(tree.root(), NodeId::from(2usize));
    assert!(tree.next());
    assert_eq!(tree.interval(), (5.0, 10.0));
    assert_eq!(tree.root(), NodeId::from(3usize));
    assert!(!tree.next());
}

#[test]
fn forward_and_reverse_visit_the_same_topologies() {
    let ts = two_tree_sequence();

    let mut forward_roots = Vec::new();
    let mut tree = ts.tree_iterator(TreeFlags::NONE);
    let mut positioned = tree.first();
    while positioned {
        forward_roots.push(tree.root());
        positioned = tree.next();
    }

    let mut backward_roots = Vec::new();
    let mut tree = ts.tree_iterator(TreeFlags::NONE);
    let mut positioned = tree.last();
    while positioned {
        backward_roots.push(tree.root());
        positioned = tree.prev();
    }
    backward_roots.reverse();

    assert_eq!(forward_roots, backward_roots);
}

#[test]
fn leaf_counts_track_tracked_samples() {
    let ts = two_tree_sequence();
    let mut tree = ts.tree_iterator(TreeFlags::SAMPLE_COUNTS);
    assert!(tree.first());
    assert_eq!(tree.num_leaves(tree.root()), 2);
}

#[test]
fn streaming_iterator_adapter_drives_the_same_walk() {
    let ts = two_tree_sequence();
    let tree = ts.tree_iterator(TreeFlags::NONE);
    let mut roots = Vec::new();
    tree.for_each(|t| roots.push(t.root()));
    assert_eq!(roots, vec![NodeId::from(2usize), NodeId::from(3usize)]);
}
