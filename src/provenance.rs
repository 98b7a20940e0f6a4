//! The provenance table: an ordered sequence of opaque records describing
//! how a store came to be.
//!
//! Behind the `provenance` feature each row also carries a generated
//! timestamp, mirroring the teacher's `provenance` feature gate
//! (`Cargo.toml`: `provenance = ["chrono"]`). Without the feature the
//! records are still stored, just without a timestamp column.

pub(crate) use crate::newtypes::ProvenanceId;
use crate::newtypes::SizeType;

/// A row of a [`ProvenanceTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvenanceTableRow {
    pub id: ProvenanceId,
    #[cfg(feature = "provenance")]
    pub timestamp: String,
    pub record: String,
}

impl std::fmt::Display for ProvenanceTableRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[cfg(feature = "provenance")]
        {
            write!(f, "id: {}, timestamp: {}, record: {}", self.id, self.timestamp, self.record)
        }
        #[cfg(not(feature = "provenance"))]
        {
            write!(f, "id: {}, record: {}", self.id, self.record)
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct ProvenanceTable {
    records: Vec<String>,
    #[cfg(feature = "provenance")]
    timestamps: Vec<String>,
}

impl ProvenanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> SizeType {
        SizeType::from(self.records.len())
    }

    pub fn add_row(&mut self, record: &str) -> ProvenanceId {
        #[cfg(feature = "provenance")]
        self.timestamps.push(chrono::Local::now().to_rfc3339());
        self.records.push(record.to_string());
        ProvenanceId::from(self.records.len() - 1)
    }

    pub fn row(&self, r: ProvenanceId) -> Option<ProvenanceTableRow> {
        let i = r.as_usize();
        if i >= self.records.len() {
            return None;
        }
        Some(ProvenanceTableRow {
            id: r,
            #[cfg(feature = "provenance")]
            timestamp: self.timestamps[i].clone(),
            record: self.records[i].clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = ProvenanceTableRow> + '_ {
        (0..self.records.len()).map(|i| self.row(ProvenanceId::from(i)).unwrap())
    }

    pub fn clear(&mut self) {
        self.records.clear();
        #[cfg(feature = "provenance")]
        self.timestamps.clear();
    }
}
