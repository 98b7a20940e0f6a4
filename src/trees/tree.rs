//! The sparse-tree iterator: the rooted tree over node ids at one genomic
//! position, advanced incrementally across breakpoints by inserting and
//! removing coalescence records in the store's precomputed orders.

use std::collections::HashSet;

use crate::error::GenealogyResult;
use crate::flags::TreeFlags;
use crate::mutation_table::MutationTableRow;
use crate::newtypes::{NodeId, PopulationId, Time};

use super::TreeSequence;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Uninitialized,
    Forward,
    Reverse,
    ExhaustedForward,
    ExhaustedReverse,
}

/// A sparse tree, derived from and borrowing a [`TreeSequence`].
///
/// Acts as both the cursor and the current item: call [`Tree::first`] or
/// [`Tree::last`] to position it, then [`Tree::next`]/[`Tree::prev`] to
/// advance, or drive it through [`streaming_iterator::StreamingIterator`].
pub struct Tree<'ts> {
    ts: &'ts TreeSequence,
    flags: TreeFlags,
    state: State,
    tree_index: isize,
    in_idx: usize,
    out_idx: usize,

    parent: Vec<NodeId>,
    /// `Some(record)` for an internal node `u` currently active as the
    /// parent of `record`; `None` otherwise (leaf, or currently unattached).
    node_record: Vec<Option<usize>>,
    root: NodeId,

    num_leaves: Vec<usize>,
    num_tracked_leaves: Vec<usize>,
    tracked: Vec<bool>,
    mark: Vec<u64>,
    epoch: u64,

    leaf_head: Vec<NodeId>,
    leaf_tail: Vec<NodeId>,
    leaf_next: Vec<NodeId>,
}

impl<'ts> Tree<'ts> {
    pub(crate) fn new(ts: &'ts TreeSequence, flags: TreeFlags) -> Self {
        let n = ts.num_nodes();
        let sample_size = ts.sample_size();
        let mut num_leaves = vec![0usize; n];
        for i in 0..sample_size {
            num_leaves[i] = 1;
        }
        let leaf_head: Vec<NodeId> = (0..n)
            .map(|i| if i < sample_size { NodeId::from(i) } else { NodeId::NULL })
            .collect();
        let leaf_tail = leaf_head.clone();
        ts.increment_refcount();
        Self {
            ts,
            flags,
            state: State::Uninitialized,
            tree_index: -1,
            in_idx: 0,
            out_idx: 0,
            parent: vec![NodeId::NULL; n],
            node_record: vec![None; n],
            root: NodeId::NULL,
            num_leaves,
            num_tracked_leaves: vec![0; n],
            tracked: vec![false; n],
            mark: vec![0; n],
            epoch: 0,
            leaf_head,
            leaf_tail,
            leaf_next: vec![NodeId::NULL; n],
        }
    }

    fn num_records(&self) -> usize {
        self.ts.num_records()
    }

    fn num_trees(&self) -> usize {
        self.ts.num_trees()
    }

    fn reset_arrays(&mut self) {
        self.parent.iter_mut().for_each(|p| *p = NodeId::NULL);
        self.node_record.iter_mut().for_each(|r| *r = None);
        self.root = NodeId::NULL;
        let sample_size = self.ts.sample_size();
        for i in sample_size..self.ts.num_nodes() {
            self.num_leaves[i] = 0;
            self.num_tracked_leaves[i] = 0;
            self.leaf_head[i] = NodeId::NULL;
            self.leaf_tail[i] = NodeId::NULL;
        }
        self.in_idx = 0;
        self.out_idx = 0;
    }

    fn insert_record(&mut self, record: usize, touched: &mut HashSet<NodeId>) {
        let row = self.ts.records().row(crate::newtypes::RecordId::from(record)).unwrap();
        let u = row.parent;
        self.node_record[u.as_usize()] = Some(record);
        for &c in row.children {
            self.parent[c.as_usize()] = u;
        }
        if self.root.is_null() || self.ts.node_time(u) > self.ts.node_time(self.root) {
            self.root = u;
        }
        touched.insert(u);
    }

    fn remove_record(&mut self, record: usize, touched: &mut HashSet<NodeId>) {
        let row = self.ts.records().row(crate::newtypes::RecordId::from(record)).unwrap();
        let u = row.parent;
        for &c in row.children {
            self.parent[c.as_usize()] = NodeId::NULL;
        }
        self.node_record[u.as_usize()] = None;
        if u == self.root {
            let mut candidate = NodeId::NULL;
            for &c in row.children {
                if candidate.is_null() || self.ts.node_time(c) > self.ts.node_time(candidate) {
                    candidate = c;
                }
            }
            self.root = candidate;
        }
        touched.insert(u);
    }

    fn root_correction(&mut self) {
        while !self.root.is_null() && !self.parent[self.root.as_usize()].is_null() {
            self.root = self.parent[self.root.as_usize()];
        }
    }

    fn finish_step(&mut self, touched: HashSet<NodeId>) {
        self.root_correction();
        if self.flags.intersects(TreeFlags::SAMPLE_COUNTS | TreeFlags::SAMPLE_LISTS) {
            self.epoch += 1;
            for u in touched {
                self.recompute_up(u);
            }
        }
    }

    fn recompute_up(&mut self, mut u: NodeId) {
        while !u.is_null() {
            self.recompute_node_aux(u);
            u = self.parent[u.as_usize()];
        }
    }

    fn recompute_node_aux(&mut self, u: NodeId) {
        if self.ts.is_sample(u) {
            return;
        }
        let children: &[NodeId] = match self.node_record[u.as_usize()] {
            Some(r) => self.ts.records().row(crate::newtypes::RecordId::from(r)).unwrap().children,
            None => &[],
        };
        if self.flags.contains(TreeFlags::SAMPLE_COUNTS) {
            let mut total = 0usize;
            let mut tracked = 0usize;
            for &c in children {
                total += self.num_leaves[c.as_usize()];
                tracked += self.num_tracked_leaves[c.as_usize()];
            }
            self.num_leaves[u.as_usize()] = total;
            self.num_tracked_leaves[u.as_usize()] = tracked;
            self.mark[u.as_usize()] = self.epoch;
        }
        if self.flags.contains(TreeFlags::SAMPLE_LISTS) {
            let mut head = NodeId::NULL;
            let mut tail = NodeId::NULL;
            for &c in children {
                let (ch, ct) = (self.leaf_head[c.as_usize()], self.leaf_tail[c.as_usize()]);
                if ch.is_null() {
                    continue;
                }
                if head.is_null() {
                    head = ch;
                } else {
                    self.leaf_next[tail.as_usize()] = ch;
                }
                tail = ct;
            }
            self.leaf_head[u.as_usize()] = head;
            self.leaf_tail[u.as_usize()] = tail;
        }
    }

    /// Recompute leaf-count/leaf-list auxiliaries for every currently active
    /// node from scratch. Used by [`Tree::set_tracked_leaves`] and by a
    /// direct seek to an arbitrary tree index, where incremental propagation
    /// does not apply.
    fn recompute_all(&mut self) {
        if !self.flags.intersects(TreeFlags::SAMPLE_COUNTS | TreeFlags::SAMPLE_LISTS) {
            return;
        }
        let sample_size = self.ts.sample_size();
        for i in sample_size..self.ts.num_nodes() {
            self.num_leaves[i] = 0;
            self.num_tracked_leaves[i] = 0;
            self.leaf_head[i] = NodeId::NULL;
            self.leaf_tail[i] = NodeId::NULL;
        }
        loop {
            let mut changed = false;
            for i in sample_size..self.ts.num_nodes() {
                let u = NodeId::from(i);
                if self.node_record[i].is_none() {
                    continue;
                }
                let before = (self.num_leaves[i], self.num_tracked_leaves[i], self.leaf_head[i], self.leaf_tail[i]);
                self.recompute_node_aux(u);
                let after = (self.num_leaves[i], self.num_tracked_leaves[i], self.leaf_head[i], self.leaf_tail[i]);
                if before != after {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Reset to the tree covering breakpoint index `target` directly,
    /// without replaying every intervening event.
    fn materialize_at(&mut self, target: usize) {
        self.reset_arrays();
        let left_bp = self.ts.left_bp();
        let right_bp = self.ts.right_bp();
        let mut touched = HashSet::new();
        for record in 0..self.num_records() {
            if left_bp[record] <= target && right_bp[record] > target {
                self.insert_record(record, &mut touched);
            }
        }
        self.in_idx = self.ts.insertion_order().partition_point(|&r| left_bp[r] <= target);
        self.out_idx = self.ts.removal_order().partition_point(|&r| right_bp[r] <= target);
        self.root_correction();
        self.tree_index = target as isize;
        self.recompute_all();
    }

    fn step_forward(&mut self) -> bool {
        let target = self.tree_index + 1;
        if target as usize >= self.num_trees() {
            self.state = State::ExhaustedForward;
            return false;
        }
        let target = target as usize;
        let mut touched = HashSet::new();
        let removal_order = self.ts.removal_order();
        let right_bp = self.ts.right_bp();
        while self.out_idx < removal_order.len() && right_bp[removal_order[self.out_idx]] == target {
            self.remove_record(removal_order[self.out_idx], &mut touched);
            self.out_idx += 1;
        }
        let insertion_order = self.ts.insertion_order();
        let left_bp = self.ts.left_bp();
        while self.in_idx < insertion_order.len() && left_bp[insertion_order[self.in_idx]] == target {
            self.insert_record(insertion_order[self.in_idx], &mut touched);
            self.in_idx += 1;
        }
        self.tree_index = target as isize;
        self.finish_step(touched);
        self.state = State::Forward;
        true
    }

    fn step_backward(&mut self) -> bool {
        if self.tree_index <= 0 {
            self.state = State::ExhaustedReverse;
            return false;
        }
        let current = self.tree_index as usize;
        let mut touched = HashSet::new();
        let insertion_order = self.ts.insertion_order();
        let left_bp = self.ts.left_bp();
        while self.in_idx > 0 && left_bp[insertion_order[self.in_idx - 1]] == current {
            self.in_idx -= 1;
            self.remove_record(insertion_order[self.in_idx], &mut touched);
        }
        let removal_order = self.ts.removal_order();
        let right_bp = self.ts.right_bp();
        while self.out_idx > 0 && right_bp[removal_order[self.out_idx - 1]] == current {
            self.out_idx -= 1;
            self.insert_record(removal_order[self.out_idx], &mut touched);
        }
        self.tree_index = current as isize - 1;
        self.finish_step(touched);
        self.state = State::Reverse;
        true
    }

    /// Position on the first tree. Always succeeds for a non-empty store.
    pub fn first(&mut self) -> bool {
        self.materialize_at(0);
        self.state = State::Forward;
        true
    }

    /// Position on the last tree. Always succeeds for a non-empty store.
    pub fn last(&mut self) -> bool {
        self.materialize_at(self.num_trees() - 1);
        self.state = State::Reverse;
        true
    }

    /// Advance to the next tree. Returns `false` at the end of the sequence.
    pub fn next(&mut self) -> bool {
        match self.state {
            State::Uninitialized => self.first(),
            State::Forward => self.step_forward(),
            State::ExhaustedForward => false,
            // The in/out cursors already satisfy the step invariant for
            // `tree_index` regardless of which direction placed us there, so
            // turning around is just one ordinary forward step, not a rebuild.
            State::Reverse | State::ExhaustedReverse => self.step_forward(),
        }
    }

    /// Advance to the previous tree. Returns `false` at the start of the sequence.
    pub fn prev(&mut self) -> bool {
        match self.state {
            State::Uninitialized => self.last(),
            State::Reverse => self.step_backward(),
            State::ExhaustedReverse => false,
            // Same reasoning as the turn branch in `next`: the cursors are
            // already valid for `tree_index`, so step backward once in place.
            State::Forward | State::ExhaustedForward => self.step_backward(),
        }
    }

    pub fn is_positioned(&self) -> bool {
        matches!(self.state, State::Forward | State::Reverse)
    }

    pub fn tree_index(&self) -> isize {
        self.tree_index
    }

    pub fn interval(&self) -> (f64, f64) {
        self.ts.interval(self.tree_index.max(0) as usize)
    }

    pub fn parent(&self, u: NodeId) -> NodeId {
        if u.is_null() {
            return NodeId::NULL;
        }
        self.parent[u.as_usize()]
    }

    pub fn children(&self, u: NodeId) -> &[NodeId] {
        match self.node_record[u.as_usize()] {
            Some(r) => {
                self.ts
                    .records()
                    .row(crate::newtypes::RecordId::from(r))
                    .unwrap()
                    .children
            }
            None => &[],
        }
    }

    pub fn time(&self, u: NodeId) -> Time {
        self.ts.node_time(u)
    }

    pub fn population(&self, u: NodeId) -> PopulationId {
        self.ts.node_population(u)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn num_leaves(&self, u: NodeId) -> usize {
        self.num_leaves[u.as_usize()]
    }

    pub fn num_tracked_leaves(&self, u: NodeId) -> usize {
        self.num_tracked_leaves[u.as_usize()]
    }

    pub fn leaf_list(&self, u: NodeId) -> (NodeId, NodeId) {
        (self.leaf_head[u.as_usize()], self.leaf_tail[u.as_usize()])
    }

    pub fn leaf_list_next(&self, sample: NodeId) -> NodeId {
        self.leaf_next[sample.as_usize()]
    }

    pub fn mutations(&self) -> Vec<MutationTableRow> {
        let (left, right) = self.interval();
        self.ts.mutations_in_interval(left, right)
    }

    /// Replace the tracked-sample set and recompute `num_tracked_leaves`
    /// for the currently materialized tree.
    pub fn set_tracked_leaves(&mut self, samples: &[NodeId]) -> GenealogyResult<()> {
        self.tracked.iter_mut().for_each(|t| *t = false);
        for &s in samples {
            if !self.ts.is_sample(s) {
                return Err(crate::error::GenealogyError::BadSamples(s.into()));
            }
            self.tracked[s.as_usize()] = true;
            self.num_tracked_leaves[s.as_usize()] = 1;
        }
        for i in 0..self.ts.sample_size() {
            if !self.tracked[i] {
                self.num_tracked_leaves[i] = 0;
            }
        }
        self.recompute_all();
        Ok(())
    }

    /// Copy cursor position and all derived state from `other`.
    ///
    /// Both trees must derive from the same store.
    pub fn copy_from(&mut self, other: &Tree<'ts>) -> GenealogyResult<()> {
        if !std::ptr::eq(self.ts, other.ts) {
            return Err(crate::error::GenealogyError::UnsupportedOperation(
                "cannot copy between trees from different stores".to_string(),
            ));
        }
        self.flags = other.flags;
        self.state = other.state;
        self.tree_index = other.tree_index;
        self.in_idx = other.in_idx;
        self.out_idx = other.out_idx;
        self.parent.copy_from_slice(&other.parent);
        self.node_record.clone_from(&other.node_record);
        self.root = other.root;
        self.num_leaves.copy_from_slice(&other.num_leaves);
        self.num_tracked_leaves.copy_from_slice(&other.num_tracked_leaves);
        self.tracked.copy_from_slice(&other.tracked);
        self.mark.copy_from_slice(&other.mark);
        self.epoch = other.epoch;
        self.leaf_head.copy_from_slice(&other.leaf_head);
        self.leaf_tail.copy_from_slice(&other.leaf_tail);
        self.leaf_next.copy_from_slice(&other.leaf_next);
        Ok(())
    }

    /// Topology equality: same store, same parent array for every node.
    ///
    /// Trees from different stores are an error rather than `false`.
    pub fn equal(&self, other: &Tree<'ts>) -> GenealogyResult<bool> {
        if !std::ptr::eq(self.ts, other.ts) {
            return Err(crate::error::GenealogyError::UnsupportedOperation(
                "cannot compare trees from different stores".to_string(),
            ));
        }
        Ok(self.parent == other.parent)
    }

    /// Most recent common ancestor of `u` and `v`, by walking both ancestry
    /// chains to the root and popping them in lockstep from the top.
    pub fn mrca(&self, u: NodeId, v: NodeId) -> Option<NodeId> {
        let chain = |mut cur: NodeId| {
            let mut stack = Vec::new();
            loop {
                stack.push(cur);
                if cur.is_null() {
                    break;
                }
                cur = self.parent(cur);
            }
            stack
        };
        let mut stack_u = chain(u);
        let mut stack_v = chain(v);
        let mut last_common = None;
        while let (Some(&au), Some(&av)) = (stack_u.last(), stack_v.last()) {
            if au == av {
                last_common = Some(au);
                stack_u.pop();
                stack_v.pop();
            } else {
                break;
            }
        }
        last_common.filter(|n| !n.is_null())
    }
}

impl<'ts> Drop for Tree<'ts> {
    fn drop(&mut self) {
        self.ts.decrement_refcount();
    }
}

impl<'ts> streaming_iterator::StreamingIterator for Tree<'ts> {
    type Item = Tree<'ts>;

    fn advance(&mut self) {
        Tree::next(self);
    }

    fn get(&self) -> Option<&Self::Item> {
        if self.is_positioned() {
            // SAFETY-free: `self` already *is* the item; this satisfies the
            // `StreamingIterator` contract of handing back a borrow of the
            // current element without a separate materialized value.
            Some(self)
        } else {
            None
        }
    }
}

impl<'ts> streaming_iterator::DoubleEndedStreamingIterator for Tree<'ts> {
    fn advance_back(&mut self) {
        Tree::prev(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newtypes::{PopulationId as Pop, Time as T};
    use crate::table_collection::TableCollection;

    fn two_tree_sequence() -> TreeSequence {
        let mut tc = TableCollection::new();
        let a = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let b = tc.add_sample(T::from(0.0), Pop::from(0usize));
        tc.add_record(0.0, 5.0, NodeId::from(2usize), &[a, b], T::from(1.0), Pop::from(0usize));
        tc.add_record(5.0, 10.0, NodeId::from(3usize), &[a, b], T::from(2.0), Pop::from(0usize));
        tc.build_index().unwrap()
    }

    #[test]
    fn single_tree_root_and_mrca() {
        let mut tc = TableCollection::new();
        let a = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let b = tc.add_sample(T::from(0.0), Pop::from(0usize));
        tc.add_record(0.0, 10.0, NodeId::from(2usize), &[a, b], T::from(1.0), Pop::from(0usize));
        let ts = tc.build_index().unwrap();
        let mut tree = ts.tree_iterator(TreeFlags::default());
        assert!(tree.first());
        assert_eq!(tree.root(), NodeId::from(2usize));
        assert_eq!(tree.mrca(a, b), Some(NodeId::from(2usize)));
        assert!(!tree.next());
    }

    #[test]
    fn forward_and_reverse_visit_same_topologies() {
        let ts = two_tree_sequence();
        let mut fwd = ts.tree_iterator(TreeFlags::default());
        let mut forward_roots = Vec::new();
        assert!(fwd.first());
        loop {
            forward_roots.push(fwd.root());
            if !fwd.next() {
                break;
            }
        }
        let mut rev = ts.tree_iterator(TreeFlags::default());
        let mut reverse_roots = Vec::new();
        assert!(rev.last());
        loop {
            reverse_roots.push(rev.root());
            if !rev.prev() {
                break;
            }
        }
        reverse_roots.reverse();
        assert_eq!(forward_roots, reverse_roots);
    }

    #[test]
    fn leaf_counts_track_samples() {
        let ts = two_tree_sequence();
        let mut tree = ts.tree_iterator(TreeFlags::SAMPLE_COUNTS);
        assert!(tree.first());
        assert_eq!(tree.num_leaves(tree.root()), 2);
    }
}
