//! Structural operation counters
//!
//! The amortized bounds of a Fibonacci heap are statements about how many
//! links and cuts happen across a sequence of operations. [`HeapStats`]
//! exposes those counts so callers (and tests) can check them directly
//! instead of relying on timings.

/// Counters for the restructuring work a heap has performed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Trees linked under another root during consolidation.
    pub links: u64,
    /// Nodes cut from their parent and moved to the root list.
    pub cuts: u64,
    /// Cuts caused by a marked parent losing a second child.
    pub cascading_cuts: u64,
    /// Consolidation passes run by extract-minimum.
    pub consolidations: u64,
    /// Most cuts performed by any single decrease-key or delete call.
    pub max_cuts_per_op: u64,
}

impl HeapStats {
    /// Folds the cut count of one finished operation into the totals.
    #[inline]
    pub(crate) fn finish_op(&mut self, cuts: u64) {
        self.max_cuts_per_op = self.max_cuts_per_op.max(cuts);
    }

    /// Adds the counters of a heap that was merged into this one.
    pub(crate) fn absorb(&mut self, other: HeapStats) {
        self.links += other.links;
        self.cuts += other.cuts;
        self.cascading_cuts += other.cascading_cuts;
        self.consolidations += other.consolidations;
        self.max_cuts_per_op = self.max_cuts_per_op.max(other.max_cuts_per_op);
    }
}
