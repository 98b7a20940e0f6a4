use coalseq::prelude::*;
use coalseq::pairwise_diversity;

fn sample(tc: &mut TableCollection) -> NodeId {
    tc.add_sample(Time::from(0.0), PopulationId::from(0usize))
}

#[test]
fn two_private_mutations_give_the_expected_diversity() {
    // E5
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 5.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    tc.add_record(5.0, 10.0, NodeId::from(3usize), &[a, b], Time::from(2.0), PopulationId::from(0usize));
    let mut ts = tc.build_index().unwrap();
    ts.set_mutations(vec![
        (Position::from(2.0), a),
        (Position::from(7.0), b),
    ])
    .unwrap();

    let diversity = pairwise_diversity(&ts, &[a, b]).unwrap();
    assert_eq!(diversity, 2.0);
}

#[test]
fn no_mutations_gives_zero_diversity() {
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    let ts = tc.build_index().unwrap();
    assert_eq!(pairwise_diversity(&ts, &[a, b]).unwrap(), 0.0);
}

#[test]
fn a_mutation_shared_by_every_sample_contributes_nothing() {
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    let c = sample(&mut tc);
    tc.add_record(
        0.0,
        10.0,
        NodeId::from(3usize),
        &[a, b, c],
        Time::from(1.0),
        PopulationId::from(0usize),
    );
    let mut ts = tc.build_index().unwrap();
    ts.set_mutations(vec![(Position::from(5.0), NodeId::from(3usize))]).unwrap();
    assert_eq!(pairwise_diversity(&ts, &[a, b, c]).unwrap(), 0.0);
}

#[test]
fn rejects_fewer_than_two_samples() {
    let mut tc = TableCollection::new();
    let a = sample(&mut tc);
    let b = sample(&mut tc);
    tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], Time::from(1.0), PopulationId::from(0usize));
    let ts = tc.build_index().unwrap();
    assert!(pairwise_diversity(&ts, &[a]).is_err());
}
