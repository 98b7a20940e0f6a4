use coalseq::prelude::*;
use coalseq::GenealogyError;

fn sample(tc: &mut TableCollection) -> NodeId {
    tc.add_sample(Time::from(0.0), PopulationId::from(0usize))
}

#[test]
fn single_tree_two_samples_builds() {
    // E1
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(
        0.0,
        10.0,
        NodeId::from(2usize),
        &[a, b],
        Time::from(1.0),
        PopulationId::from(0usize),
    );
    let ts = tc.build_index().unwrap();
    assert_eq!(ts.sample_size(), 2);
    assert_eq!(ts.sequence_length(), 10.0);
    assert_eq!(ts.num_trees(), 1);
    assert_eq!(ts.breakpoints().to_vec(), vec![0.0, 10.0]);
}

#[test]
fn two_trees_across_a_recombination_breakpoint() {
    // E2
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 5.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    tc.add_record(5.0, 10.0, NodeId::from(3usize), &[a, b], Time::from(2.0), PopulationId::from(0usize));
    let ts = tc.build_index().unwrap();
    assert_eq!(ts.num_trees(), 2);
    assert_eq!(ts.breakpoints().to_vec(), vec![0.0, 5.0, 10.0]);
}

#[test]
fn rejects_child_time_equal_to_parent_time() {
    // E6
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(0.0), PopulationId::from(0usize));
    let err = tc.build_index().unwrap_err();
    assert!(matches!(err, GenealogyError::BadNodeTimeOrdering { .. }));
}

#[test]
fn rejects_unsorted_children() {
    // E6
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[b, a], Time::from(1.0), PopulationId::from(0usize));
    let err = tc.build_index().unwrap_err();
    assert!(matches!(err, GenealogyError::UnsortedChildren(_)));
}

#[test]
fn rejects_zero_children() {
    let mut tc = TableCollection::new();
    let _a = sample(&mut tc);
    let _b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[], Time::from(1.0), PopulationId::from(0usize));
    let err = tc.build_index().unwrap_err();
    assert!(matches!(err, GenealogyError::ZeroChildren(_)));
}

#[test]
fn rejects_zero_records() {
    let mut tc = TableCollection::new();
    let _a = sample(&mut tc);
    let _b = sample(&mut tc);
    let err = tc.build_index().unwrap_err();
    assert_eq!(err, GenealogyError::ZeroRecords);
}

#[test]
fn breakpoints_are_strictly_increasing_and_cover_the_sequence() {
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 3.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    tc.add_record(3.0, 7.0, NodeId::from(3usize), &[a, b], Time::from(2.0), PopulationId::from(0usize));
    tc.add_record(7.0, 10.0, NodeId::from(4usize), &[a, b], Time::from(3.0), PopulationId::from(0usize));
    let ts = tc.build_index().unwrap();
    let bp = ts.breakpoints();
    assert_eq!(bp.first().copied(), Some(0.0));
    assert_eq!(bp.last().copied(), Some(10.0));
    for w in bp.windows(2) {
        assert!(w[0] < w[1]);
    }
}
