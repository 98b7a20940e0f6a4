//! Owns the input tables and builds the immutable [`crate::trees::TreeSequence`]
//! store from them.
//!
//! This is the mutable, append-only staging area: callers add samples,
//! coalescence records, mutations, populations and migrations here, then
//! call [`TableCollection::build_index`] once to validate everything and
//! produce the indexed, immutable store.

use crate::error::{GenealogyError, GenealogyResult};
use crate::migration_table::MigrationTable;
use crate::mutation_table::MutationTable;
use crate::newtypes::{NodeId, PopulationId, Position, RecordId, Time};
use crate::node_table::NodeTable;
use crate::population_table::PopulationTable;
use crate::provenance::ProvenanceTable;
use crate::record_table::RecordTable;
use crate::trees::TreeSequence;

/// Mutable staging area for the tables that define a tree sequence.
#[derive(Default, Debug, Clone)]
pub struct TableCollection {
    nodes: NodeTable,
    records: RecordTable,
    mutations: MutationTable,
    populations: PopulationTable,
    migrations: MigrationTable,
    provenance: ProvenanceTable,
}

impl TableCollection {
    pub fn new() -> Self {
        Self {
            records: RecordTable::new(),
            ..Default::default()
        }
    }

    /// Add a sample node. Samples must be added before any record references
    /// them; sample ids are assigned `0, 1, 2, ...` by call order.
    pub fn add_sample(&mut self, time: Time, population: PopulationId) -> NodeId {
        self.populations.extend_to_include(population);
        self.nodes.add_row(time, population)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_record(
        &mut self,
        left: f64,
        right: f64,
        parent: NodeId,
        children: &[NodeId],
        time: Time,
        population: PopulationId,
    ) -> RecordId {
        self.populations.extend_to_include(population);
        self.records
            .add_row(left, right, parent, children, time, population)
    }

    pub fn add_mutation(&mut self, position: Position, node: NodeId) -> crate::newtypes::MutationId {
        self.mutations.add_row(position, node)
    }

    pub fn add_population(&mut self) -> PopulationId {
        self.populations.add_row()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_migration(
        &mut self,
        left: Position,
        right: Position,
        node: NodeId,
        source: PopulationId,
        dest: PopulationId,
        time: Time,
    ) -> crate::newtypes::MigrationId {
        self.migrations.add_row(left, right, node, source, dest, time)
    }

    pub fn add_provenance(&mut self, record: &str) -> crate::provenance::ProvenanceId {
        self.provenance.add_row(record)
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

    /// Validate the staged tables (§ record model & validation) and build
    /// the breakpoint vector, insertion order and removal order (§ breakpoint
    /// & index builder), consuming `self` to produce the immutable store.
    pub fn build_index(mut self) -> GenealogyResult<TreeSequence> {
        let n = self.nodes.num_rows().as_usize();
        if n < 2 {
            return Err(GenealogyError::BadCoalescenceRecords(
                "fewer than 2 sample nodes".to_string(),
            ));
        }

        let num_records = self.records.num_rows().as_usize();
        if num_records == 0 {
            return Err(GenealogyError::ZeroRecords);
        }

        let mut min_parent = usize::MAX;
        let mut max_node = n - 1;
        let mut max_right = f64::NEG_INFINITY;
        let mut saw_left_zero = false;
        let mut prev_parent_time = f64::NEG_INFINITY;
        let mut breakpoints: Vec<f64> = Vec::with_capacity(num_records + 1);

        // node id -> (time, population) for nodes discovered as record parents.
        let mut inferred: Vec<Option<(Time, PopulationId)>> = Vec::new();

        for i in 0..num_records {
            let row = self.records.row(RecordId::from(i))?;
            if row.left >= row.right {
                return Err(GenealogyError::BadRecordInterval(i));
            }
            if row.children.is_empty() {
                return Err(GenealogyError::ZeroChildren(i));
            }
            if row.parent.is_null() {
                return Err(GenealogyError::NullNodeInRecord(i));
            }
            for w in row.children.windows(2) {
                if w[0] >= w[1] {
                    return Err(GenealogyError::UnsortedChildren(i));
                }
            }
            for &c in row.children {
                if c.is_null() {
                    return Err(GenealogyError::NullNodeInRecord(i));
                }
            }

            let parent_time = row.time.as_f64();
            if parent_time < prev_parent_time {
                return Err(GenealogyError::RecordsNotTimeSorted(i));
            }
            prev_parent_time = parent_time;

            for &c in row.children {
                let child_time = self.node_time(c, &inferred)?;
                if child_time >= parent_time {
                    return Err(GenealogyError::BadNodeTimeOrdering {
                        record: i,
                        child: c.into(),
                    });
                }
            }

            let parent_idx = row.parent.as_usize();
            if parent_idx >= inferred.len() {
                inferred.resize(parent_idx + 1, None);
            }
            match inferred[parent_idx] {
                Some((t, _)) if !crate::util::partial_cmp_equal(&t.as_f64(), &parent_time) => {
                    return Err(GenealogyError::InconsistentNodeTimes(row.parent.into()));
                }
                Some((_, p)) if p != row.population => {
                    return Err(GenealogyError::InconsistentPopulationIds(row.parent.into()));
                }
                _ => inferred[parent_idx] = Some((row.time, row.population)),
            }

            min_parent = min_parent.min(parent_idx);
            max_node = max_node.max(parent_idx);
            for &c in row.children {
                max_node = max_node.max(c.as_usize());
            }
            max_right = max_right.max(row.right);
            if row.left == 0.0 {
                saw_left_zero = true;
            }
            breakpoints.push(row.left);
        }

        if min_parent != n {
            return Err(GenealogyError::BadCoalescenceRecords(format!(
                "minimum parent node id {min_parent} does not equal sample count {n}"
            )));
        }
        if !(max_right > 0.0) {
            return Err(GenealogyError::BadCoalescenceRecords(
                "sequence length must be positive".to_string(),
            ));
        }
        if !saw_left_zero {
            return Err(GenealogyError::BadCoalescenceRecords(
                "no record begins at position 0".to_string(),
            ));
        }

        let sequence_length = max_right;
        breakpoints.push(sequence_length);
        breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
        breakpoints.dedup_by(|a, b| crate::util::partial_cmp_equal(a, b));

        // Extend the node table with internal nodes inferred from records.
        for idx in n..=max_node {
            match inferred.get(idx).copied().flatten() {
                Some((time, population)) => {
                    self.populations.extend_to_include(population);
                    let id = self.nodes.add_row(time, population);
                    debug_assert_eq!(id.as_usize(), idx);
                }
                None => {
                    return Err(GenealogyError::BadCoalescenceRecords(format!(
                        "node {idx} is never a parent of any record"
                    )));
                }
            }
        }
        let num_nodes = max_node + 1;

        let mut left_bp = Vec::with_capacity(num_records);
        let mut right_bp = Vec::with_capacity(num_records);
        for i in 0..num_records {
            let row = self.records.row(RecordId::from(i))?;
            let l = breakpoint_index(&breakpoints, row.left).ok_or_else(|| {
                GenealogyError::BadCoalescenceRecords(format!(
                    "record {i} left coordinate is not a breakpoint"
                ))
            })?;
            let r = breakpoint_index(&breakpoints, row.right).ok_or_else(|| {
                GenealogyError::BadCoalescenceRecords(format!(
                    "record {i} right coordinate is not a breakpoint"
                ))
            })?;
            left_bp.push(l);
            right_bp.push(r);
        }

        let mut insertion_order: Vec<usize> = (0..num_records).collect();
        insertion_order.sort_by_key(|&i| (left_bp[i], i));

        let mut removal_order: Vec<usize> = (0..num_records).collect();
        removal_order.sort_by(|&a, &b| right_bp[a].cmp(&right_bp[b]).then(b.cmp(&a)));

        for row in self.mutations.iter() {
            self.populations.validate(self.nodes.population(row.node)?)?;
        }
        self.mutations.sort_by_position();

        Ok(TreeSequence::new(
            num_nodes,
            n,
            sequence_length,
            self.nodes,
            self.records,
            breakpoints,
            left_bp,
            right_bp,
            insertion_order,
            removal_order,
            self.mutations,
            self.populations,
            self.migrations,
            self.provenance,
        ))
    }

    fn node_time(
        &self,
        node: NodeId,
        inferred: &[Option<(Time, PopulationId)>],
    ) -> GenealogyResult<f64> {
        let idx = node.as_usize();
        if idx < self.nodes.num_rows().as_usize() {
            return Ok(self.nodes.time(node)?.as_f64());
        }
        match inferred.get(idx).copied().flatten() {
            Some((t, _)) => Ok(t.as_f64()),
            None => Err(GenealogyError::BadCoalescenceRecords(format!(
                "node {idx} used as a child before it is ever a parent"
            ))),
        }
    }
}

fn breakpoint_index(breakpoints: &[f64], value: f64) -> Option<usize> {
    breakpoints
        .iter()
        .position(|&b| crate::util::partial_cmp_equal(&b, &value))
}
