//! The tree-diff iterator: a lighter-weight alternative to the sparse-tree
//! iterator that emits the records entering and leaving at each breakpoint
//! without materializing a tree.

use crate::newtypes::NodeId;
use crate::trees::TreeSequence;

/// Marker type for record insertion.
pub struct Insertion {}

/// Marker type for record removal.
pub struct Removal {}

mod private {
    pub trait RecordDifferenceIteration {}

    impl RecordDifferenceIteration for super::Insertion {}
    impl RecordDifferenceIteration for super::Removal {}
}

/// A record entering or leaving the current tree. Differentiated by marker
/// types [`Insertion`] and [`Removal`].
#[derive(Debug, Copy, Clone)]
pub struct RecordDifference<'ts, T: private::RecordDifferenceIteration> {
    left: f64,
    right: f64,
    parent: NodeId,
    children: &'ts [NodeId],
    marker: std::marker::PhantomData<T>,
}

impl<'ts, T: private::RecordDifferenceIteration> RecordDifference<'ts, T> {
    fn new(left: f64, right: f64, parent: NodeId, children: &'ts [NodeId]) -> Self {
        Self {
            left,
            right,
            parent,
            children,
            marker: std::marker::PhantomData::<T> {},
        }
    }

    pub fn left(&self) -> f64 {
        self.left
    }
    pub fn right(&self) -> f64 {
        self.right
    }
    pub fn parent(&self) -> NodeId {
        self.parent
    }
    pub fn children(&self) -> &'ts [NodeId] {
        self.children
    }
}

impl<'ts, T> std::fmt::Display for RecordDifference<'ts, T>
where
    T: private::RecordDifferenceIteration,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "left: {}, right: {}, parent: {}, children: {:?}",
            self.left(),
            self.right(),
            self.parent(),
            self.children()
        )
    }
}

/// Type alias for [`RecordDifference<Insertion>`].
pub type RecordInsertion<'ts> = RecordDifference<'ts, Insertion>;
/// Type alias for [`RecordDifference<Removal>`].
pub type RecordRemoval<'ts> = RecordDifference<'ts, Removal>;

/// Iterates breakpoint-to-breakpoint, emitting the records removed and
/// inserted at each transition without building a [`crate::trees::Tree`].
pub struct RecordDifferencesIterator<'ts> {
    ts: &'ts TreeSequence,
    left_arr: &'ts [f64],
    right_arr: &'ts [f64],
    parent_arr: &'ts [NodeId],
    children_arena: &'ts [NodeId],
    child_offset: &'ts [usize],
    insertion_order: &'ts [usize],
    removal_order: &'ts [usize],
    left_bp: &'ts [usize],
    right_bp: &'ts [usize],
    breakpoints: &'ts [f64],
    num_trees: usize,
    coordinate_index: usize,
    insertion_index: usize,
    removal_index: usize,
}

impl<'ts> RecordDifferencesIterator<'ts> {
    pub(crate) fn new(ts: &'ts TreeSequence) -> Self {
        ts.increment_refcount();
        Self {
            ts,
            left_arr: ts.records().left_slice(),
            right_arr: ts.records().right_slice(),
            parent_arr: ts.records().parent_slice(),
            children_arena: ts.records().children_arena(),
            child_offset: ts.records().child_offset_slice(),
            insertion_order: ts.insertion_order(),
            removal_order: ts.removal_order(),
            left_bp: ts.left_bp(),
            right_bp: ts.right_bp(),
            breakpoints: ts.breakpoints(),
            num_trees: ts.num_trees(),
            coordinate_index: 0,
            insertion_index: 0,
            removal_index: 0,
        }
    }
}

#[derive(Clone)]
pub struct CurrentTreeRecordDifferences<'ts> {
    left_arr: &'ts [f64],
    right_arr: &'ts [f64],
    parent_arr: &'ts [NodeId],
    children_arena: &'ts [NodeId],
    child_offset: &'ts [usize],
    insertion_order: &'ts [usize],
    removal_order: &'ts [usize],
    removals: (usize, usize),
    insertions: (usize, usize),
    left: f64,
    right: f64,
}

#[repr(transparent)]
pub struct RecordRemovalsIterator<'ts>(CurrentTreeRecordDifferences<'ts>);

#[repr(transparent)]
pub struct RecordInsertionsIterator<'ts>(CurrentTreeRecordDifferences<'ts>);

fn children_of<'ts>(arena: &'ts [NodeId], offset: &'ts [usize], record: usize) -> &'ts [NodeId] {
    &arena[offset[record]..offset[record + 1]]
}

impl<'ts> Iterator for RecordRemovalsIterator<'ts> {
    type Item = RecordRemoval<'ts>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0.removals.0 < self.0.removals.1 {
            let index = self.0.removals.0;
            self.0.removals.0 += 1;
            let record = self.0.removal_order[index];
            Some(Self::Item::new(
                self.0.left_arr[record],
                self.0.right_arr[record],
                self.0.parent_arr[record],
                children_of(self.0.children_arena, self.0.child_offset, record),
            ))
        } else {
            None
        }
    }
}

impl<'ts> Iterator for RecordInsertionsIterator<'ts> {
    type Item = RecordInsertion<'ts>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0.insertions.0 < self.0.insertions.1 {
            let index = self.0.insertions.0;
            self.0.insertions.0 += 1;
            let record = self.0.insertion_order[index];
            Some(Self::Item::new(
                self.0.left_arr[record],
                self.0.right_arr[record],
                self.0.parent_arr[record],
                children_of(self.0.children_arena, self.0.child_offset, record),
            ))
        } else {
            None
        }
    }
}

impl<'ts> CurrentTreeRecordDifferences<'ts> {
    pub fn removals(&self) -> impl Iterator<Item = RecordRemoval<'ts>> + '_ {
        RecordRemovalsIterator(self.clone())
    }

    pub fn insertions(&self) -> impl Iterator<Item = RecordInsertion<'ts>> + '_ {
        RecordInsertionsIterator(self.clone())
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    pub fn length(&self) -> f64 {
        self.right - self.left
    }
}

impl<'ts> Drop for RecordDifferencesIterator<'ts> {
    fn drop(&mut self) {
        self.ts.decrement_refcount();
    }
}

impl<'ts> Iterator for RecordDifferencesIterator<'ts> {
    type Item = CurrentTreeRecordDifferences<'ts>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.coordinate_index >= self.num_trees {
            return None;
        }
        let removals_start = self.removal_index;
        while self.removal_index < self.removal_order.len()
            && self.right_bp[self.removal_order[self.removal_index]] == self.coordinate_index
        {
            self.removal_index += 1;
        }
        let insertions_start = self.insertion_index;
        while self.insertion_index < self.insertion_order.len()
            && self.left_bp[self.insertion_order[self.insertion_index]] == self.coordinate_index
        {
            self.insertion_index += 1;
        }
        let diffs = CurrentTreeRecordDifferences {
            left_arr: self.left_arr,
            right_arr: self.right_arr,
            parent_arr: self.parent_arr,
            children_arena: self.children_arena,
            child_offset: self.child_offset,
            insertion_order: self.insertion_order,
            removal_order: self.removal_order,
            removals: (removals_start, self.removal_index),
            insertions: (insertions_start, self.insertion_index),
            left: self.breakpoints[self.coordinate_index],
            right: self.breakpoints[self.coordinate_index + 1],
        };
        self.coordinate_index += 1;
        Some(diffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newtypes::{PopulationId as Pop, Time as T};
    use crate::table_collection::TableCollection;

    #[test]
    fn visits_every_tree_with_correct_length() {
        let mut tc = TableCollection::new();
        let a = tc.add_sample(T::from(0.0), Pop::from(0usize));
        let b = tc.add_sample(T::from(0.0), Pop::from(0usize));
        tc.add_record(0.0, 5.0, NodeId::from(2usize), &[a, b], T::from(1.0), Pop::from(0usize));
        tc.add_record(5.0, 10.0, NodeId::from(3usize), &[a, b], T::from(2.0), Pop::from(0usize));
        let ts = tc.build_index().unwrap();
        let mut iter = ts.edge_differences_iterator();
        let first = iter.next().unwrap();
        assert_eq!(first.interval(), (0.0, 5.0));
        assert_eq!(first.insertions().count(), 1);
        assert_eq!(first.removals().count(), 0);
        let second = iter.next().unwrap();
        assert_eq!(second.interval(), (5.0, 10.0));
        assert_eq!(second.insertions().count(), 1);
        assert_eq!(second.removals().count(), 1);
        assert!(iter.next().is_none());
    }
}
