//! Sample-subset projection (§ simplify).
//!
//! Sweeps the original store tree by tree, maintaining for every node `u`
//! a mapping `m[u]` onto `{NULL, v}`: `NULL` if no retained sample
//! descends from `u`, a single node `v` if exactly one does (a unary
//! node, collapsed out of the projection), or `u` itself once two or
//! more retained lineages have coalesced under it. Mapped-children sets
//! are tracked per node so that a run of trees sharing the same mapped
//! topology is emitted as one record, mirroring how the original input
//! records are themselves runs over intervals.

use std::collections::{HashMap, HashSet};

use crate::error::{GenealogyError, GenealogyResult};
use crate::flags::{SimplificationOptions, TreeFlags};
use crate::newtypes::{NodeId, PopulationId, Position, Time};
use crate::table_collection::TableCollection;
use crate::trees::{Tree, TreeSequence};

struct ActiveRecord {
    left: f64,
    children: Vec<NodeId>,
}

/// Bottom-up mapping of `u` onto its retained representative, memoized
/// per tree. `u` itself need not be active in the current tree; an
/// inactive internal node (no children this tree) maps to `NULL`.
fn compute_mapping(
    u: NodeId,
    tree: &Tree<'_>,
    sample_size: usize,
    retained: &HashSet<NodeId>,
    memo: &mut [Option<NodeId>],
) -> Option<NodeId> {
    if let Some(cached) = memo[u.as_usize()] {
        return if cached.is_null() { None } else { Some(cached) };
    }
    let result = if u.as_usize() < sample_size {
        if retained.contains(&u) {
            Some(u)
        } else {
            None
        }
    } else {
        let children = tree.children(u);
        if children.is_empty() {
            None
        } else {
            let mut mapped: Vec<NodeId> = children
                .iter()
                .filter_map(|&c| compute_mapping(c, tree, sample_size, retained, memo))
                .collect();
            mapped.sort();
            match mapped.len() {
                0 => None,
                1 => Some(mapped[0]),
                _ => Some(u),
            }
        }
    };
    memo[u.as_usize()] = Some(result.unwrap_or(NodeId::NULL));
    result
}

/// `true` if the mutation at `u` sits above every retained branch point
/// in the current tree: walking from `u` to the root never meets a node
/// whose mapping is itself.
fn above_projected_root(
    u: NodeId,
    tree: &Tree<'_>,
    sample_size: usize,
    retained: &HashSet<NodeId>,
    memo: &mut [Option<NodeId>],
) -> bool {
    let mut v = u;
    loop {
        if compute_mapping(v, tree, sample_size, retained, memo) == Some(v) {
            return false;
        }
        let parent = tree.parent(v);
        if parent.is_null() {
            return true;
        }
        v = parent;
    }
}

/// Project `ts` onto `samples`, returning the new store and a map from
/// original node id to new node id (`NodeId::NULL` for nodes not retained).
pub fn simplify(
    ts: &TreeSequence,
    samples: &[NodeId],
    options: SimplificationOptions,
) -> GenealogyResult<(TreeSequence, Vec<NodeId>)> {
    let mut retained = HashSet::new();
    for &s in samples {
        if s.is_null() || s.as_usize() >= ts.sample_size() {
            return Err(GenealogyError::BadSamples(s.into()));
        }
        if !retained.insert(s) {
            return Err(GenealogyError::DuplicateSample(s.into()));
        }
    }

    let num_nodes = ts.num_nodes();
    let mut active: HashMap<NodeId, ActiveRecord> = HashMap::new();
    let mut records: Vec<(f64, f64, NodeId, Vec<NodeId>, Time, PopulationId)> = Vec::new();
    let mut mutations: Vec<(Position, NodeId)> = Vec::new();

    let mut tree = ts.tree_iterator(TreeFlags::NONE);
    let mut positioned = tree.first();
    let mut last_right = 0.0;
    while positioned {
        let mut memo = vec![None; num_nodes];
        let (left, right) = tree.interval();
        last_right = right;

        for node_idx in ts.sample_size()..num_nodes {
            let u = NodeId::from(node_idx);
            let children = tree.children(u);
            let new_children = if children.is_empty() {
                Vec::new()
            } else {
                let mut mapped: Vec<NodeId> = children
                    .iter()
                    .filter_map(|&c| compute_mapping(c, &tree, ts.sample_size(), &retained, &mut memo))
                    .collect();
                mapped.sort();
                mapped
            };

            let changed = match active.get(&u) {
                Some(rec) => rec.children != new_children,
                None => !new_children.is_empty(),
            };

            if changed {
                if let Some(rec) = active.remove(&u) {
                    records.push((
                        rec.left,
                        left,
                        u,
                        rec.children,
                        ts.node_time(u),
                        ts.node_population(u),
                    ));
                }
                if new_children.len() >= 2 {
                    active.insert(
                        u,
                        ActiveRecord {
                            left,
                            children: new_children,
                        },
                    );
                }
            }
        }

        for row in ts.mutations_in_interval(left, right) {
            match compute_mapping(row.node, &tree, ts.sample_size(), &retained, &mut memo) {
                None => {}
                Some(mapped) => {
                    if options.contains(SimplificationOptions::FILTER_ROOT_MUTATIONS)
                        && above_projected_root(row.node, &tree, ts.sample_size(), &retained, &mut memo)
                    {
                        continue;
                    }
                    mutations.push((row.position, mapped));
                }
            }
        }

        positioned = tree.next();
    }

    for (u, rec) in active.into_iter() {
        records.push((
            rec.left,
            last_right,
            u,
            rec.children,
            ts.node_time(u),
            ts.node_population(u),
        ));
    }

    if records.is_empty() {
        return Err(GenealogyError::CannotSimplify);
    }

    records.sort_by(|a, b| {
        a.4.as_f64()
            .partial_cmp(&b.4.as_f64())
            .unwrap()
            .then(a.0.partial_cmp(&b.0).unwrap())
    });

    let mut remap = vec![NodeId::NULL; num_nodes];
    for (i, &s) in samples.iter().enumerate() {
        remap[s.as_usize()] = NodeId::from(i);
    }
    let mut next_id = samples.len();
    for (_, _, parent, children, _, _) in &records {
        if remap[parent.as_usize()].is_null() {
            remap[parent.as_usize()] = NodeId::from(next_id);
            next_id += 1;
        }
        for &c in children {
            if remap[c.as_usize()].is_null() {
                remap[c.as_usize()] = NodeId::from(next_id);
                next_id += 1;
            }
        }
    }

    let mut tc = TableCollection::new();
    for &s in samples {
        tc.add_sample(ts.node_time(s), ts.node_population(s));
    }
    for (left, right, parent, children, time, population) in &records {
        let mut new_children: Vec<NodeId> = children.iter().map(|&c| remap[c.as_usize()]).collect();
        new_children.sort();
        tc.add_record(*left, *right, remap[parent.as_usize()], &new_children, *time, *population);
    }
    let mut out_mutations = mutations;
    out_mutations.sort_by(|a, b| a.0.as_f64().partial_cmp(&b.0.as_f64()).unwrap());
    for (position, node) in out_mutations {
        tc.add_mutation(position, remap[node.as_usize()]);
    }

    let new_ts = tc.build_index()?;
    Ok((new_ts, remap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newtypes::{PopulationId as Pop, Time as T};

    fn three_sample_tree() -> (TreeSequence, NodeId, NodeId, NodeId) {
        let mut tc = TableCollection::new();
        let a = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let b = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let c = tc.add_sample(T::from(0.0), Pop::from(0usize));
        tc.add_record(0.0, 10.0, NodeId::from(3usize), &[a, b], T::from(1.0), Pop::from(0usize));
        tc.add_record(
            0.0,
            10.0,
            NodeId::from(4usize),
            &[c, NodeId::from(3usize)],
            T::from(2.0),
            Pop::from(0usize),
        );
        (tc.build_index().unwrap(), a, b, c)
    }

    #[test]
    fn collapses_unary_node_when_one_sample_dropped() {
        let (ts, a, _b, c) = three_sample_tree();
        let (simplified, map) = ts.simplify(&[a, c], SimplificationOptions::NONE).unwrap();
        assert_eq!(simplified.sample_size(), 2);
        assert_eq!(simplified.num_trees(), 1);
        assert_eq!(map[a.as_usize()], NodeId::from(0usize));
        assert_eq!(map[c.as_usize()], NodeId::from(1usize));
        let mut tree = simplified.tree_iterator(TreeFlags::NONE);
        assert!(tree.first());
        assert_eq!(tree.root(), tree.parent(NodeId::from(0usize)));
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn rejects_out_of_range_sample() {
        let (ts, _a, _b, _c) = three_sample_tree();
        let err = ts
            .simplify(&[NodeId::from(99usize)], SimplificationOptions::NONE)
            .unwrap_err();
        assert_eq!(err, GenealogyError::BadSamples(99));
    }

    #[test]
    fn rejects_duplicate_sample() {
        let (ts, a, _b, _c) = three_sample_tree();
        let err = ts.simplify(&[a, a], SimplificationOptions::NONE).unwrap_err();
        assert_eq!(err, GenealogyError::DuplicateSample(a.into()));
    }
}
