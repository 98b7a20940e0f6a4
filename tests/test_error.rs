use coalseq::prelude::*;
use coalseq::GenealogyError;

#[test]
fn refuses_set_mutations_while_a_tree_iterator_is_live() {
    let mut tc = TableCollection::new();
    let a = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    let b = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    let mut ts = tc.build_index().unwrap();

    let tree = ts.tree_iterator(TreeFlags::NONE);
    let err = ts.set_mutations(vec![(Position::from(1.0), a)]).unwrap_err();
    assert!(matches!(err, GenealogyError::RefcountNonzero(1)));
    drop(tree);
    assert!(ts.set_mutations(vec![(Position::from(1.0), a)]).is_ok());
}

#[test]
fn refuses_mutations_at_an_out_of_range_position() {
    let mut tc = TableCollection::new();
    let a = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    let b = tc.add_sample(Time::from(0.0), PopulationId::from(0usize));
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    let mut ts = tc.build_index().unwrap();
    let err = ts.set_mutations(vec![(Position::from(99.0), a)]).unwrap_err();
    assert!(matches!(err, GenealogyError::BadMutation(_)));
}

#[test]
fn error_messages_are_human_readable() {
    let e = GenealogyError::UnsortedChildren(4);
    assert!(format!("{e}").contains("4"));
    let e = GenealogyError::FileVersionTooOld {
        found: (0, 5),
        oldest: (1, 0),
    };
    assert!(format!("{e}").contains("older"));
}
