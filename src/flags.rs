//! Option flags for tree allocation, simplification and dumping.
//!
//! Kept as a fixed set of `bitflags` structs, one per operation, rather
//! than scattered boolean parameters.

use bitflags::bitflags;

bitflags! {
    /// Controls which auxiliary indices a [`crate::trees::Tree`] maintains.
    #[derive(Default, Clone, Copy, PartialEq, Eq)]
    pub struct TreeFlags: u32 {
        const NONE = 0;
        /// Maintain `num_leaves`/`num_tracked_leaves` incrementally at every node.
        const SAMPLE_COUNTS = 1 << 0;
        /// Maintain per-node sample leaf lists (`leaf_list_head`/`leaf_list_tail`).
        const SAMPLE_LISTS = 1 << 1;
    }
}

bitflags! {
    /// Controls the behavior of [`crate::simplify`].
    ///
    /// The default behavior (`NONE`) projects the tree sequence onto the
    /// sample subset, collapsing unary nodes and keeping every surviving
    /// mutation.
    #[derive(Default)]
    pub struct SimplificationOptions: u32 {
        const NONE = 0;
        /// Drop mutations that, after projection, sit above the projected root.
        const FILTER_ROOT_MUTATIONS = 1 << 0;
    }
}

bitflags! {
    /// Controls [`crate::io::dump`].
    #[derive(Default)]
    pub struct DumpFlags: u32 {
        const NONE = 0;
        /// Request deflate-style compression of integer datasets.
        ///
        /// Accepted and round-tripped through the header, but this crate's
        /// `io` module does not implement real deflate (see `DESIGN.md`);
        /// setting it does not change the on-disk byte layout.
        const ZLIB_COMPRESSION = 1 << 0;
    }
}
