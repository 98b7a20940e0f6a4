//! The node table: one row per node, carrying `(time, population)`.
//!
//! Node ids are assigned by append order. `TableCollection::build_index`
//! (§ record model & validation) is what decides, from the coalescence
//! records, which prefix `[0, n)` of these rows are sample nodes.

use crate::error::{GenealogyError, GenealogyResult};
use crate::newtypes::{NodeId, PopulationId, SizeType, Time};
use crate::table_iterator::{make_table_iterator, TableIterator};

/// A row of a [`NodeTable`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeTableRow {
    pub id: NodeId,
    pub time: Time,
    pub population: PopulationId,
}

fn make_node_table_row(table: &NodeTable, pos: i64) -> Option<NodeTableRow> {
    if pos < 0 || pos as usize >= table.num_rows().as_usize() {
        return None;
    }
    let i = pos as usize;
    Some(NodeTableRow {
        id: NodeId::from(i),
        time: table.time[i],
        population: table.population[i],
    })
}

pub(crate) type NodeTableRefIterator<'a> = TableIterator<&'a NodeTable>;

impl<'a> Iterator for NodeTableRefIterator<'a> {
    type Item = NodeTableRow;

    fn next(&mut self) -> Option<Self::Item> {
        let rv = make_node_table_row(self.table, self.pos);
        self.pos += 1;
        rv
    }
}

/// Columnar node table: `time[0..N)` and `population[0..N)`.
#[derive(Default, Debug, Clone)]
pub struct NodeTable {
    pub(crate) time: Vec<Time>,
    pub(crate) population: Vec<PopulationId>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.time.len())
    }

    pub fn add_row(&mut self, time: Time, population: PopulationId) -> NodeId {
        self.time.push(time);
        self.population.push(population);
        NodeId::from(self.time.len() - 1)
    }

    pub fn time(&self, row: NodeId) -> GenealogyResult<Time> {
        self.time
            .get(row.as_usize())
            .copied()
            .ok_or(GenealogyError::OutOfBounds {
                index: row.into(),
                len: self.time.len(),
            })
    }

    pub fn population(&self, row: NodeId) -> GenealogyResult<PopulationId> {
        self.population
            .get(row.as_usize())
            .copied()
            .ok_or(GenealogyError::OutOfBounds {
                index: row.into(),
                len: self.population.len(),
            })
    }

    pub fn time_slice(&self) -> &[Time] {
        &self.time
    }

    pub fn population_slice(&self) -> &[PopulationId] {
        &self.population
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeTableRow> + '_ {
        make_table_iterator::<&NodeTable>(self)
    }

    pub fn row(&self, r: NodeId) -> GenealogyResult<NodeTableRow> {
        make_node_table_row(self, r.into()).ok_or(GenealogyError::OutOfBounds {
            index: r.into(),
            len: self.time.len(),
        })
    }

    pub fn clear(&mut self) {
        self.time.clear();
        self.population.clear();
    }
}
