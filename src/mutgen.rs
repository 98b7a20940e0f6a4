//! Poisson mutation generator (§ mutation generator).
//!
//! For every `(parent, child)` branch of every coalescence record, draws
//! the number of mutations on that branch as `Poisson(rate * branch_length
//! * distance)`, then scatters that many positions uniformly over the
//! record's interval. Stable given a seeded source.

use rand::Rng;
use rand_distr::{Distribution, Poisson, Uniform};

use crate::newtypes::{NodeId, Position};
use crate::trees::TreeSequence;

/// Generate mutations over every branch of `ts` at `rate` per unit of
/// (time * genomic length), using `rng`. Output is sorted by position.
pub fn generate<R: Rng + ?Sized>(ts: &TreeSequence, rate: f64, rng: &mut R) -> Vec<(Position, NodeId)> {
    let mut mutations = Vec::new();
    let records = ts.records();
    for i in 0..ts.num_records() {
        let row = records.row(crate::newtypes::RecordId::from(i)).unwrap();
        let distance = row.right - row.left;
        let uniform = Uniform::new(row.left, row.right);
        for &child in row.children {
            let branch_length = row.time.as_f64() - ts.node_time(child).as_f64();
            let mu = branch_length * distance * rate;
            let num_mutations = if mu > 0.0 {
                let poisson = Poisson::new(mu).expect("mutation rate produces a non-finite mean");
                poisson.sample(rng) as usize
            } else {
                0
            };
            for _ in 0..num_mutations {
                let position = uniform.sample(rng);
                mutations.push((Position::from(position), child));
            }
        }
    }
    mutations.sort_by(|a, b| a.0.as_f64().partial_cmp(&b.0.as_f64()).unwrap());
    mutations
}
