//! A succinct genealogical sequence engine.
//!
//! Stores a sequence of coalescence records describing how a sample of
//! genomes traces back to common ancestors along a genome, and provides
//! the operations built on that representation: an incremental sparse-tree
//! iterator, a lighter-weight tree-diff iterator, sample-subset
//! simplification, a Poisson mutation generator, and a pairwise-diversity
//! statistic.
//!
//! The tables are assembled in a [`TableCollection`], then indexed into an
//! immutable [`TreeSequence`] via [`TableCollection::build_index`].

pub mod newtypes;

mod error;
mod flags;
mod util;

mod table_iterator;

mod node_table;
mod record_table;
mod mutation_table;
mod population_table;
mod migration_table;
mod provenance;

mod table_collection;
mod trees;

mod edge_differences;
mod simplify;
mod mutgen;
mod statistics;

#[cfg(feature = "serialization")]
mod io;

pub mod prelude;

pub use error::{GenealogyError, GenealogyResult};
pub use flags::{DumpFlags, SimplificationOptions, TreeFlags};

pub use newtypes::{
    MigrationId, MutationId, NodeId, PopulationId, Position, ProvenanceId, RecordId, SizeType, Time,
};

pub use node_table::{NodeTable, NodeTableRow};
pub use record_table::{RecordTable, RecordTableRow};
pub use mutation_table::{MutationTable, MutationTableRow};
pub use population_table::PopulationTable;
pub use migration_table::{MigrationTable, MigrationTableRow};
pub use provenance::{ProvenanceTable, ProvenanceTableRow};

pub use table_collection::TableCollection;
pub use trees::{Tree, TreeSequence};

pub use edge_differences::{
    CurrentTreeRecordDifferences, Insertion, RecordDifference, RecordDifferencesIterator,
    RecordInsertion, RecordInsertionsIterator, RecordRemoval, RecordRemovalsIterator, Removal,
};
pub use mutgen::generate as generate_mutations;
pub use statistics::pairwise_diversity;
pub use simplify::simplify;

#[cfg(feature = "serialization")]
pub use io::{dump, load, FORMAT_VERSION, OLDEST_READABLE_VERSION};

pub use streaming_iterator::{DoubleEndedStreamingIterator, StreamingIterator};
