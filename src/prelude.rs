//! Export commonly-used types and traits

pub use crate::DoubleEndedStreamingIterator;
pub use crate::StreamingIterator;
pub use {
    crate::MigrationId, crate::MutationId, crate::NodeId, crate::PopulationId, crate::Position,
    crate::ProvenanceId, crate::RecordId, crate::SizeType, crate::Time,
};
pub use crate::{DumpFlags, SimplificationOptions, TreeFlags};
pub use crate::{GenealogyError, GenealogyResult};
pub use crate::{TableCollection, Tree, TreeSequence};
