//! The immutable tree-sequence store: the output of
//! [`crate::table_collection::TableCollection::build_index`].

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{GenealogyError, GenealogyResult};
use crate::flags::{SimplificationOptions, TreeFlags};
use crate::migration_table::MigrationTable;
use crate::mutation_table::{MutationTable, MutationTableRow};
use crate::newtypes::{NodeId, PopulationId, Position, Time};
use crate::node_table::NodeTable;
use crate::population_table::PopulationTable;
use crate::provenance::ProvenanceTable;
use crate::record_table::RecordTable;

use super::tree::Tree;
use crate::edge_differences::RecordDifferencesIterator;

/// An immutable, indexed tree sequence.
///
/// Built once by [`crate::table_collection::TableCollection::build_index`]
/// and never mutated thereafter, with the single exception of
/// [`TreeSequence::set_mutations`], which is refused while any
/// [`Tree`]/[`RecordDifferencesIterator`] derived from this store is live.
#[derive(Debug)]
pub struct TreeSequence {
    num_nodes: usize,
    sample_size: usize,
    sequence_length: f64,
    nodes: NodeTable,
    records: RecordTable,
    breakpoints: Vec<f64>,
    left_bp: Vec<usize>,
    right_bp: Vec<usize>,
    insertion_order: Vec<usize>,
    removal_order: Vec<usize>,
    mutations: MutationTable,
    populations: PopulationTable,
    migrations: MigrationTable,
    provenance: ProvenanceTable,
    refcount: AtomicUsize,
}

impl TreeSequence {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        num_nodes: usize,
        sample_size: usize,
        sequence_length: f64,
        nodes: NodeTable,
        records: RecordTable,
        breakpoints: Vec<f64>,
        left_bp: Vec<usize>,
        right_bp: Vec<usize>,
        insertion_order: Vec<usize>,
        removal_order: Vec<usize>,
        mutations: MutationTable,
        populations: PopulationTable,
        migrations: MigrationTable,
        provenance: ProvenanceTable,
    ) -> Self {
        Self {
            num_nodes,
            sample_size,
            sequence_length,
            nodes,
            records,
            breakpoints,
            left_bp,
            right_bp,
            insertion_order,
            removal_order,
            mutations,
            populations,
            migrations,
            provenance,
            refcount: AtomicUsize::new(0),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn sequence_length(&self) -> f64 {
        self.sequence_length
    }

    pub fn num_trees(&self) -> usize {
        self.breakpoints.len() - 1
    }

    pub fn num_records(&self) -> usize {
        self.records.num_rows().as_usize()
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn interval(&self, tree_index: usize) -> (f64, f64) {
        (self.breakpoints[tree_index], self.breakpoints[tree_index + 1])
    }

    pub fn is_sample(&self, node: NodeId) -> bool {
        !node.is_null() && node.as_usize() < self.sample_size
    }

    pub fn node_time(&self, node: NodeId) -> Time {
        self.nodes.time(node).expect("node id out of range")
    }

    pub fn node_population(&self, node: NodeId) -> PopulationId {
        self.nodes.population(node).expect("node id out of range")
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn records(&self) -> &RecordTable {
        &self.records
    }

    pub fn mutations(&self) -> &MutationTable {
        &self.mutations
    }

    pub fn populations(&self) -> &PopulationTable {
        &self.populations
    }

    pub fn migrations(&self) -> &MigrationTable {
        &self.migrations
    }

    pub fn provenance(&self) -> &ProvenanceTable {
        &self.provenance
    }

    pub(crate) fn insertion_order(&self) -> &[usize] {
        &self.insertion_order
    }

    pub(crate) fn removal_order(&self) -> &[usize] {
        &self.removal_order
    }

    pub(crate) fn left_bp(&self) -> &[usize] {
        &self.left_bp
    }

    pub(crate) fn right_bp(&self) -> &[usize] {
        &self.right_bp
    }

    /// Mutations with `left <= position < right`, in position order.
    pub fn mutations_in_interval(&self, left: f64, right: f64) -> Vec<MutationTableRow> {
        let positions = self.mutations.position_slice();
        let start = positions.partition_point(|p| p.as_f64() < left);
        let end = positions.partition_point(|p| p.as_f64() < right);
        (start..end)
            .map(|i| self.mutations.row(crate::newtypes::MutationId::from(i)).unwrap())
            .collect()
    }

    pub(crate) fn increment_refcount(&self) {
        self.refcount.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn decrement_refcount(&self) {
        self.refcount.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn num_live_iterators(&self) -> usize {
        self.refcount.load(Ordering::SeqCst)
    }

    /// Allocate a sparse-tree iterator, positioned before the first tree.
    pub fn tree_iterator<F: Into<TreeFlags>>(&self, flags: F) -> Tree<'_> {
        Tree::new(self, flags.into())
    }

    /// Allocate a tree-diff iterator, positioned before the first breakpoint.
    pub fn edge_differences_iterator(&self) -> RecordDifferencesIterator<'_> {
        RecordDifferencesIterator::new(self)
    }

    /// Project this store onto `samples`, per § simplify.
    pub fn simplify(
        &self,
        samples: &[NodeId],
        options: SimplificationOptions,
    ) -> GenealogyResult<(TreeSequence, Vec<NodeId>)> {
        crate::simplify::simplify(self, samples, options)
    }

    /// Replace the mutation overlay. Refused while any derived iterator is live.
    pub fn set_mutations(&mut self, mutations: Vec<(Position, NodeId)>) -> GenealogyResult<()> {
        let live = self.num_live_iterators();
        if live != 0 {
            return Err(GenealogyError::RefcountNonzero(live));
        }
        for &(position, node) in &mutations {
            if position.as_f64() < 0.0 || position.as_f64() >= self.sequence_length {
                return Err(GenealogyError::BadMutation(format!(
                    "position {} is out of range [0, {})",
                    position.as_f64(),
                    self.sequence_length
                )));
            }
            if node.is_null() || node.as_usize() >= self.num_nodes {
                return Err(GenealogyError::BadMutation(format!("node {node} is out of range")));
            }
        }
        let mut table = MutationTable::new();
        for (position, node) in mutations {
            table.add_row(position, node);
        }
        table.sort_by_position();
        self.mutations = table;
        Ok(())
    }

    pub fn add_provenance(&mut self, record: &str) -> crate::newtypes::ProvenanceId {
        self.provenance.add_row(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_collection::TableCollection;
    use crate::newtypes::{PopulationId as Pop, Time as T};

    fn single_tree() -> TreeSequence {
        let mut tc = TableCollection::new();
        let a = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let b = tc.add_sample(T::from(0.0), Pop::from(0usize));
        tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], T::from(1.0), Pop::from(0usize));
        tc.build_index().unwrap()
    }

    #[test]
    fn set_mutations_rejects_out_of_range_position() {
        let mut ts = single_tree();
        let err = ts
            .set_mutations(vec![(Position::from(20.0), NodeId::from(0usize))])
            .unwrap_err();
        assert!(matches!(err, GenealogyError::BadMutation(_)));
    }

    #[test]
    fn set_mutations_refused_while_iterator_live() {
        let mut ts = single_tree();
        ts.increment_refcount();
        let err = ts
            .set_mutations(vec![(Position::from(1.0), NodeId::from(0usize))])
            .unwrap_err();
        assert_eq!(err, GenealogyError::RefcountNonzero(1));
    }
}
