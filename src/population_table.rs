//! The population table. Spec data model references populations only
//! through `node.population[i]`; this table exists to let callers
//! allocate population ids and validate that nodes reference known
//! populations, mirroring the teacher's otherwise-empty population rows.

use crate::error::{GenealogyError, GenealogyResult};
use crate::newtypes::{PopulationId, SizeType};

#[derive(Default, Debug, Clone)]
pub struct PopulationTable {
    num_rows: usize,
}

impl PopulationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.num_rows)
    }

    pub fn add_row(&mut self) -> PopulationId {
        let id = PopulationId::from(self.num_rows);
        self.num_rows += 1;
        id
    }

    /// Ensure population ids up to and including `id` exist, allocating
    /// any missing rows. Used when nodes reference populations that were
    /// never explicitly added.
    pub fn extend_to_include(&mut self, id: PopulationId) {
        let needed = id.as_usize() + 1;
        if needed > self.num_rows {
            self.num_rows = needed;
        }
    }

    pub fn validate(&self, id: PopulationId) -> GenealogyResult<()> {
        if id.as_usize() >= self.num_rows {
            Err(GenealogyError::OutOfBounds {
                index: id.into(),
                len: self.num_rows,
            })
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.num_rows = 0;
    }
}
