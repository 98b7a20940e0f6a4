//! Columnar persistence (§ external interfaces, persistent format).
//!
//! `spec.md` places the real container format (HDF5, in the originating
//! system) out of scope and documents only the dataset layout. This
//! module reproduces that schema — the same datasets, in the same
//! order, each checksummed with Fletcher-32 — over `serde` + `bincode`
//! rather than a real HDF5 writer; see `DESIGN.md` for the reduction.

use serde::{Deserialize, Serialize};

use crate::error::{GenealogyError, GenealogyResult};
use crate::newtypes::{NodeId, PopulationId, Position, RecordId, Time};
use crate::table_collection::TableCollection;
use crate::trees::TreeSequence;

/// `(MAJOR, MINOR)`. Bumped on any incompatible change to the dataset
/// layout below.
pub const FORMAT_VERSION: (u32, u32) = (1, 0);

/// The oldest major version this build still reads.
pub const OLDEST_READABLE_VERSION: (u32, u32) = (1, 0);

#[derive(Serialize, Deserialize)]
struct Datasets {
    node_population: Vec<u32>,
    node_time: Vec<f64>,
    breakpoints: Vec<f64>,
    record_left: Vec<u32>,
    record_right: Vec<u32>,
    record_node: Vec<u32>,
    record_num_children: Vec<u32>,
    record_children: Vec<u32>,
    insertion_order: Vec<u32>,
    removal_order: Vec<u32>,
    mutation_node: Vec<u32>,
    mutation_position: Vec<f64>,
    provenance: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Checksums {
    node_population: u32,
    node_time: u32,
    breakpoints: u32,
    record_left: u32,
    record_right: u32,
    record_node: u32,
    record_num_children: u32,
    record_children: u32,
    insertion_order: u32,
    removal_order: u32,
    mutation_node: u32,
    mutation_position: u32,
    provenance: u32,
}

#[derive(Serialize, Deserialize)]
struct PersistedStore {
    format_version: (u32, u32),
    /// Vestigial: superseded by `datasets.node_population.len()`'s
    /// derived sample count. Kept only for pre-upgrade readers.
    sample_size_placeholder: u64,
    /// Vestigial: superseded by `datasets.breakpoints`'s last entry.
    sequence_length_placeholder: f64,
    datasets: Datasets,
    checksums: Checksums,
}

/// Fletcher-32 checksum over `data`, padded with a trailing zero byte if
/// its length is odd.
fn fletcher32(data: &[u8]) -> u32 {
    let mut sum1: u32 = 0xffff;
    let mut sum2: u32 = 0xffff;
    let mut iter = data.chunks(2);
    for chunk in &mut iter {
        let word = if chunk.len() == 2 {
            u16::from_le_bytes([chunk[0], chunk[1]])
        } else {
            u16::from_le_bytes([chunk[0], 0])
        };
        sum1 = (sum1 + word as u32) % 0xffff;
        sum2 = (sum2 + sum1) % 0xffff;
    }
    (sum2 << 16) | sum1
}

fn checksum_of<T: Serialize>(value: &T) -> GenealogyResult<u32> {
    let bytes = bincode::serialize(value).map_err(|e| GenealogyError::Persistence(e.to_string()))?;
    Ok(fletcher32(&bytes))
}

fn datasets_from(ts: &TreeSequence) -> Datasets {
    let records = ts.records();
    let num_records = ts.num_records();
    let mut record_left = Vec::with_capacity(num_records);
    let mut record_right = Vec::with_capacity(num_records);
    let mut record_node = Vec::with_capacity(num_records);
    let mut record_num_children = Vec::with_capacity(num_records);
    let mut record_children = Vec::new();
    for i in 0..num_records {
        let row = records.row(RecordId::from(i)).expect("index within range");
        record_node.push(row.parent.as_usize() as u32);
        record_num_children.push(row.children.len() as u32);
        record_children.extend(row.children.iter().map(|c| c.as_usize() as u32));
    }
    record_left.extend(ts.left_bp().iter().map(|&i| i as u32));
    record_right.extend(ts.right_bp().iter().map(|&i| i as u32));

    Datasets {
        node_population: ts
            .nodes()
            .population_slice()
            .iter()
            .map(|p| p.as_usize() as u32)
            .collect(),
        node_time: ts.nodes().time_slice().iter().map(|t| t.as_f64()).collect(),
        breakpoints: ts.breakpoints().to_vec(),
        record_left,
        record_right,
        record_node,
        record_num_children,
        record_children,
        insertion_order: ts.insertion_order().iter().map(|&i| i as u32).collect(),
        removal_order: ts.removal_order().iter().map(|&i| i as u32).collect(),
        mutation_node: ts
            .mutations()
            .node_slice()
            .iter()
            .map(|n| n.as_usize() as u32)
            .collect(),
        mutation_position: ts
            .mutations()
            .position_slice()
            .iter()
            .map(|p| p.as_f64())
            .collect(),
        provenance: ts.provenance().iter().map(|r| r.record).collect(),
    }
}

fn checksums_of(d: &Datasets) -> GenealogyResult<Checksums> {
    Ok(Checksums {
        node_population: checksum_of(&d.node_population)?,
        node_time: checksum_of(&d.node_time)?,
        breakpoints: checksum_of(&d.breakpoints)?,
        record_left: checksum_of(&d.record_left)?,
        record_right: checksum_of(&d.record_right)?,
        record_node: checksum_of(&d.record_node)?,
        record_num_children: checksum_of(&d.record_num_children)?,
        record_children: checksum_of(&d.record_children)?,
        insertion_order: checksum_of(&d.insertion_order)?,
        removal_order: checksum_of(&d.removal_order)?,
        mutation_node: checksum_of(&d.mutation_node)?,
        mutation_position: checksum_of(&d.mutation_position)?,
        provenance: checksum_of(&d.provenance)?,
    })
}

fn verify_checksums(d: &Datasets, c: &Checksums) -> GenealogyResult<()> {
    let recomputed = checksums_of(d)?;
    let mismatch = recomputed.node_population != c.node_population
        || recomputed.node_time != c.node_time
        || recomputed.breakpoints != c.breakpoints
        || recomputed.record_left != c.record_left
        || recomputed.record_right != c.record_right
        || recomputed.record_node != c.record_node
        || recomputed.record_num_children != c.record_num_children
        || recomputed.record_children != c.record_children
        || recomputed.insertion_order != c.insertion_order
        || recomputed.removal_order != c.removal_order
        || recomputed.mutation_node != c.mutation_node
        || recomputed.mutation_position != c.mutation_position
        || recomputed.provenance != c.provenance;
    if mismatch {
        return Err(GenealogyError::FileFormat(
            "checksum mismatch on one or more datasets".to_string(),
        ));
    }
    Ok(())
}

/// Write `ts` to `writer` in the columnar dataset layout. `flags` is
/// accepted for interface symmetry with the spec's `ZLIB_COMPRESSION`
/// bit but is currently a no-op: see `DESIGN.md`.
pub fn dump<W: std::io::Write>(
    ts: &TreeSequence,
    mut writer: W,
    _flags: crate::flags::DumpFlags,
) -> GenealogyResult<()> {
    let datasets = datasets_from(ts);
    let checksums = checksums_of(&datasets)?;
    let store = PersistedStore {
        format_version: FORMAT_VERSION,
        sample_size_placeholder: ts.sample_size() as u64,
        sequence_length_placeholder: ts.sequence_length(),
        datasets,
        checksums,
    };
    bincode::serialize_into(&mut writer, &store).map_err(|e| GenealogyError::Persistence(e.to_string()))
}

/// Read a store written by [`dump`] back from `reader`.
pub fn load<R: std::io::Read>(mut reader: R) -> GenealogyResult<TreeSequence> {
    let store: PersistedStore =
        bincode::deserialize_from(&mut reader).map_err(|e| GenealogyError::FileFormat(e.to_string()))?;

    if store.format_version.0 < FORMAT_VERSION.0 {
        return Err(GenealogyError::FileVersionTooOld {
            found: store.format_version,
            oldest: OLDEST_READABLE_VERSION,
        });
    }
    if store.format_version.0 > FORMAT_VERSION.0 {
        return Err(GenealogyError::FileVersionTooNew {
            found: store.format_version,
            newest: FORMAT_VERSION,
        });
    }

    verify_checksums(&store.datasets, &store.checksums)?;
    let d = store.datasets;

    if d.node_time.len() != d.node_population.len() {
        return Err(GenealogyError::FileFormat(
            "node_time and node_population length mismatch".to_string(),
        ));
    }
    if d.record_left.len() != d.record_right.len()
        || d.record_left.len() != d.record_node.len()
        || d.record_left.len() != d.record_num_children.len()
    {
        return Err(GenealogyError::FileFormat(
            "record column length mismatch".to_string(),
        ));
    }

    let n = d
        .record_node
        .iter()
        .min()
        .copied()
        .ok_or_else(|| GenealogyError::FileFormat("no records in file".to_string()))? as usize;

    let mut tc = TableCollection::new();
    for i in 0..n {
        tc.add_sample(Time::from(d.node_time[i]), PopulationId::from(d.node_population[i] as usize));
    }

    let mut child_offset = 0usize;
    for i in 0..d.record_left.len() {
        let left = *d
            .breakpoints
            .get(d.record_left[i] as usize)
            .ok_or_else(|| GenealogyError::FileFormat("record left index out of range".to_string()))?;
        let right = *d
            .breakpoints
            .get(d.record_right[i] as usize)
            .ok_or_else(|| GenealogyError::FileFormat("record right index out of range".to_string()))?;
        let parent = NodeId::from(d.record_node[i] as usize);
        let num_children = d.record_num_children[i] as usize;
        let children: Vec<NodeId> = d.record_children[child_offset..child_offset + num_children]
            .iter()
            .map(|&c| NodeId::from(c as usize))
            .collect();
        child_offset += num_children;
        let parent_idx = parent.as_usize();
        let time = Time::from(d.node_time[parent_idx]);
        let population = PopulationId::from(d.node_population[parent_idx] as usize);
        tc.add_record(left, right, parent, &children, time, population);
    }

    for i in 0..d.mutation_node.len() {
        tc.add_mutation(Position::from(d.mutation_position[i]), NodeId::from(d.mutation_node[i] as usize));
    }

    for record in &d.provenance {
        tc.add_provenance(record);
    }

    let ts = tc.build_index()?;

    let recomputed_insertion: Vec<u32> = ts.insertion_order().iter().map(|&i| i as u32).collect();
    let recomputed_removal: Vec<u32> = ts.removal_order().iter().map(|&i| i as u32).collect();
    if recomputed_insertion != d.insertion_order || recomputed_removal != d.removal_order {
        return Err(GenealogyError::FileFormat(
            "stored index orderings do not match the records".to_string(),
        ));
    }

    Ok(ts)
}
