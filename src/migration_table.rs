//! The migration table: loaded and stored alongside the other tables but,
//! as in the source this crate is grounded on, not surfaced through the
//! sparse-tree or tree-diff iterators. Read/write-through only.

use crate::newtypes::{MigrationId, NodeId, Position, PopulationId, SizeType, Time};

/// A row of a [`MigrationTable`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MigrationTableRow {
    pub id: MigrationId,
    pub left: Position,
    pub right: Position,
    pub node: NodeId,
    pub source: PopulationId,
    pub dest: PopulationId,
    pub time: Time,
}

#[derive(Default, Debug, Clone)]
pub struct MigrationTable {
    left: Vec<Position>,
    right: Vec<Position>,
    node: Vec<NodeId>,
    source: Vec<PopulationId>,
    dest: Vec<PopulationId>,
    time: Vec<Time>,
}

impl MigrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.left.len())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_row(
        &mut self,
        left: Position,
        right: Position,
        node: NodeId,
        source: PopulationId,
        dest: PopulationId,
        time: Time,
    ) -> MigrationId {
        self.left.push(left);
        self.right.push(right);
        self.node.push(node);
        self.source.push(source);
        self.dest.push(dest);
        self.time.push(time);
        MigrationId::from(self.left.len() - 1)
    }

    pub fn row(&self, r: MigrationId) -> Option<MigrationTableRow> {
        let i = r.as_usize();
        if i >= self.left.len() {
            return None;
        }
        Some(MigrationTableRow {
            id: r,
            left: self.left[i],
            right: self.right[i],
            node: self.node[i],
            source: self.source[i],
            dest: self.dest[i],
            time: self.time[i],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = MigrationTableRow> + '_ {
        (0..self.left.len()).map(|i| self.row(MigrationId::from(i)).unwrap())
    }

    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.node.clear();
        self.source.clear();
        self.dest.clear();
        self.time.clear();
    }
}
