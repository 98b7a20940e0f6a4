//! The coalescence-record table: one row per `(left, right, parent,
//! children, time, population)` assertion, with children flattened into
//! one contiguous arena and sliced per record.
//!
//! This is the input form described in the data model: unlike a
//! one-child-per-row edge table, a single record may list several
//! children sharing one parent over one interval.

use crate::error::{GenealogyError, GenealogyResult};
use crate::newtypes::{NodeId, PopulationId, RecordId, SizeType, Time};
use crate::table_iterator::{make_table_iterator, TableIterator};

/// A row of a [`RecordTable`], with children borrowed from the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordTableRow<'a> {
    pub id: RecordId,
    pub left: f64,
    pub right: f64,
    pub parent: NodeId,
    pub children: &'a [NodeId],
    pub time: Time,
    pub population: PopulationId,
}

/// Columnar coalescence-record table.
///
/// `children` is a single arena; `child_offset[i]..child_offset[i + 1]`
/// slices out record `i`'s children, mirroring the store's own arena
/// layout (§ data model) rather than allocating one `Vec` per record.
#[derive(Default, Debug, Clone)]
pub struct RecordTable {
    pub(crate) left: Vec<f64>,
    pub(crate) right: Vec<f64>,
    pub(crate) parent: Vec<NodeId>,
    pub(crate) time: Vec<Time>,
    pub(crate) population: Vec<PopulationId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) child_offset: Vec<usize>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self {
            child_offset: vec![0],
            ..Default::default()
        }
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.left.len())
    }

    /// Append a record. `children` must already be strictly ascending;
    /// that invariant is checked by `TableCollection::build_index`, not here.
    pub fn add_row(
        &mut self,
        left: f64,
        right: f64,
        parent: NodeId,
        children: &[NodeId],
        time: Time,
        population: PopulationId,
    ) -> RecordId {
        self.left.push(left);
        self.right.push(right);
        self.parent.push(parent);
        self.time.push(time);
        self.population.push(population);
        self.children.extend_from_slice(children);
        self.child_offset.push(self.children.len());
        RecordId::from(self.left.len() - 1)
    }

    pub fn children(&self, row: RecordId) -> GenealogyResult<&[NodeId]> {
        let i = row.as_usize();
        if i >= self.left.len() {
            return Err(GenealogyError::OutOfBounds {
                index: row.into(),
                len: self.left.len(),
            });
        }
        Ok(&self.children[self.child_offset[i]..self.child_offset[i + 1]])
    }

    pub fn num_children(&self, row: RecordId) -> usize {
        let i = row.as_usize();
        self.child_offset[i + 1] - self.child_offset[i]
    }

    pub fn left_slice(&self) -> &[f64] {
        &self.left
    }

    pub fn right_slice(&self) -> &[f64] {
        &self.right
    }

    pub fn parent_slice(&self) -> &[NodeId] {
        &self.parent
    }

    pub fn time_slice(&self) -> &[Time] {
        &self.time
    }

    pub fn population_slice(&self) -> &[PopulationId] {
        &self.population
    }

    pub(crate) fn children_arena(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn child_offset_slice(&self) -> &[usize] {
        &self.child_offset
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordTableRow<'_>> + '_ {
        make_table_iterator::<&RecordTable>(self)
    }

    pub fn row(&self, r: RecordId) -> GenealogyResult<RecordTableRow<'_>> {
        let i = r.as_usize();
        if i >= self.left.len() {
            return Err(GenealogyError::OutOfBounds {
                index: r.into(),
                len: self.left.len(),
            });
        }
        Ok(RecordTableRow {
            id: r,
            left: self.left[i],
            right: self.right[i],
            parent: self.parent[i],
            children: &self.children[self.child_offset[i]..self.child_offset[i + 1]],
            time: self.time[i],
            population: self.population[i],
        })
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.parent.clear();
        self.time.clear();
        self.population.clear();
        self.children.clear();
        self.child_offset.clear();
        self.child_offset.push(0);
    }
}

pub(crate) type RecordTableRefIterator<'a> = TableIterator<&'a RecordTable>;

impl<'a> Iterator for RecordTableRefIterator<'a> {
    type Item = RecordTableRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.pos;
        self.pos += 1;
        if i < 0 || i as usize >= self.table.left.len() {
            return None;
        }
        self.table.row(RecordId::from(i)).ok()
    }
}
