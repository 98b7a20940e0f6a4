use coalseq::prelude::*;
use std::sync::Arc;
use std::thread;

fn fn_requires_send_sync<T: Send + Sync>(_: &T) {}

fn example_tree_sequence() -> TreeSequence {
    let mut tc = TableCollection::new();
    let a = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    let b = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    tc.build_index().unwrap()
}

#[test]
fn tree_sequence_is_send_and_sync() {
    let ts = example_tree_sequence();
    fn_requires_send_sync(&ts);
}

#[test]
fn a_shared_tree_sequence_can_be_read_from_multiple_threads() {
    let ts = Arc::new(example_tree_sequence());
    let mut handles = Vec::new();
    for _ in 0..4 {
        let ts = Arc::clone(&ts);
        handles.push(thread::spawn(move || {
            let mut tree = ts.tree_iterator(TreeFlags::NONE);
            assert!(tree.first());
            tree.root()
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().unwrap(), NodeId::from(2usize));
    }
}
