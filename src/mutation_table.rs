//! The mutation table: columnar `(position, node)`, sorted ascending by
//! position. Mutations are not threaded along a branch beyond their
//! carrier node (an explicit Non-goal).

use crate::error::{GenealogyError, GenealogyResult};
use crate::newtypes::{MutationId, NodeId, Position, SizeType};
use crate::table_iterator::{make_table_iterator, TableIterator};

/// A row of a [`MutationTable`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MutationTableRow {
    pub id: MutationId,
    pub position: Position,
    pub node: NodeId,
}

fn make_mutation_table_row(table: &MutationTable, pos: i64) -> Option<MutationTableRow> {
    if pos < 0 || pos as usize >= table.position.len() {
        return None;
    }
    let i = pos as usize;
    Some(MutationTableRow {
        id: MutationId::from(i),
        position: table.position[i],
        node: table.node[i],
    })
}

pub(crate) type MutationTableRefIterator<'a> = TableIterator<&'a MutationTable>;

impl<'a> Iterator for MutationTableRefIterator<'a> {
    type Item = MutationTableRow;

    fn next(&mut self) -> Option<Self::Item> {
        let rv = make_mutation_table_row(self.table, self.pos);
        self.pos += 1;
        rv
    }
}

#[derive(Default, Debug, Clone)]
pub struct MutationTable {
    pub(crate) position: Vec<Position>,
    pub(crate) node: Vec<NodeId>,
}

impl MutationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.position.len())
    }

    pub fn add_row(&mut self, position: Position, node: NodeId) -> MutationId {
        self.position.push(position);
        self.node.push(node);
        MutationId::from(self.position.len() - 1)
    }

    pub fn position_slice(&self) -> &[Position] {
        &self.position
    }

    pub fn node_slice(&self) -> &[NodeId] {
        &self.node
    }

    pub fn iter(&self) -> impl Iterator<Item = MutationTableRow> + '_ {
        make_table_iterator::<&MutationTable>(self)
    }

    pub fn row(&self, r: MutationId) -> GenealogyResult<MutationTableRow> {
        make_mutation_table_row(self, r.into()).ok_or(GenealogyError::OutOfBounds {
            index: r.into(),
            len: self.position.len(),
        })
    }

    /// Sort rows ascending by position, stable on ties.
    pub fn sort_by_position(&mut self) {
        let mut order: Vec<usize> = (0..self.position.len()).collect();
        order.sort_by(|&a, &b| {
            self.position[a]
                .as_f64()
                .partial_cmp(&self.position[b].as_f64())
                .unwrap()
        });
        self.position = order.iter().map(|&i| self.position[i]).collect();
        self.node = order.iter().map(|&i| self.node[i]).collect();
    }

    pub fn clear(&mut self) {
        self.position.clear();
        self.node.clear();
    }
}
