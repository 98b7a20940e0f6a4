//! Error handling.
//!
//! One variant per failure family from the taxonomy: input, structural,
//! mutation, operational and persistence errors. Every fallible operation
//! in this crate returns [`GenealogyError`] instead of an integer code;
//! nothing recovers silently and validation failures surface before any
//! derived state (a `TreeSequence`, a `Tree`) is handed back to the caller.

use thiserror::Error;

/// The result type returned by every fallible operation in this crate.
pub type GenealogyResult<T> = Result<T, GenealogyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenealogyError {
    // -- input --
    #[error("bad parameter value: {0}")]
    BadParamValue(String),
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds { index: i64, len: usize },
    #[error("sample id {0} is out of range")]
    BadSamples(i64),
    #[error("sample id {0} appears more than once")]
    DuplicateSample(i64),

    // -- structural --
    #[error("coalescence records are invalid: {0}")]
    BadCoalescenceRecords(String),
    #[error("record {0} references the null node")]
    NullNodeInRecord(usize),
    #[error("record {0} has zero children")]
    ZeroChildren(usize),
    #[error("record {0} does not list children in strictly ascending order")]
    UnsortedChildren(usize),
    #[error("records are not sorted by non-decreasing parent time at record {0}")]
    RecordsNotTimeSorted(usize),
    #[error("record {record}: child {child} does not have strictly smaller time than parent")]
    BadNodeTimeOrdering { record: usize, child: i64 },
    #[error("record {0} has left >= right")]
    BadRecordInterval(usize),
    #[error("node {0} is used with inconsistent times across records")]
    InconsistentNodeTimes(i64),
    #[error("node {0} is used with inconsistent population ids across records")]
    InconsistentPopulationIds(i64),
    #[error("no records supplied")]
    ZeroRecords,

    // -- mutation --
    #[error("bad mutation: {0}")]
    BadMutation(String),

    // -- operational --
    #[error("allocation failure")]
    NoMemory,
    #[error("operation refused: {0} live iterator(s) reference this store")]
    RefcountNonzero(usize),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("bad ordering: {0}")]
    BadOrdering(String),
    #[error("cannot simplify: no records survive projection")]
    CannotSimplify,

    // -- persistence --
    #[error("file format error: {0}")]
    FileFormat(String),
    #[error("file format version {found:?} is older than the oldest version this build reads ({oldest:?})")]
    FileVersionTooOld {
        found: (u32, u32),
        oldest: (u32, u32),
    },
    #[error("file format version {found:?} is newer than the newest version this build reads ({newest:?})")]
    FileVersionTooNew {
        found: (u32, u32),
        newest: (u32, u32),
    },
    #[error("persistence failure: {0}")]
    Persistence(String),
}
