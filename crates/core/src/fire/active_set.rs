//! Sparse set of burning cell indices
//!
//! A dense membership bitmap answers "is this cell burning" in O(1); an
//! insertion-ordered vector drives iteration. Removal only clears the bitmap,
//! so the vector can be walked by cursor while new fires are appended during
//! the same pass. Stale entries are dropped by [`ActiveFireSet::compact`].
//! A per-index service stamp guarantees a cell is updated at most once per
//! tick even if it was removed and re-added mid-pass.

/// Burning cells
#[derive(Debug, Clone)]
pub struct ActiveFireSet {
    order: Vec<usize>,
    member: Vec<bool>,
    serviced_at: Vec<u64>,
    len: usize,
}

impl ActiveFireSet {
    /// Empty set able to hold indices `0..cell_count`
    #[must_use]
    pub fn new(cell_count: usize) -> Self {
        Self {
            order: Vec::new(),
            member: vec![false; cell_count],
            serviced_at: vec![0; cell_count],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.member.get(idx).copied().unwrap_or(false)
    }

    /// Insert, returning `false` when already present
    pub fn insert(&mut self, idx: usize) -> bool {
        if idx >= self.member.len() || self.member[idx] {
            return false;
        }
        self.member[idx] = true;
        self.order.push(idx);
        self.len += 1;
        true
    }

    /// Remove, returning `false` when absent
    pub fn remove(&mut self, idx: usize) -> bool {
        if !self.contains(idx) {
            return false;
        }
        self.member[idx] = false;
        self.len -= 1;
        true
    }

    /// Entry at iteration position `cursor`, including stale entries
    ///
    /// Returns `None` past the end; callers check [`Self::contains`] on the
    /// returned index.
    #[inline]
    pub(crate) fn entry(&self, cursor: usize) -> Option<usize> {
        self.order.get(cursor).copied()
    }

    /// Claim `idx` for servicing during `tick`; `false` if already serviced
    pub(crate) fn claim_service(&mut self, idx: usize, tick: u64) -> bool {
        if self.serviced_at[idx] == tick {
            return false;
        }
        self.serviced_at[idx] = tick;
        true
    }

    /// Drop stale and duplicate entries from the iteration order
    pub fn compact(&mut self) {
        let member = &mut self.member;
        self.order.retain(|&idx| {
            if member[idx] {
                // Temporarily clear so a duplicate later in the order is dropped
                member[idx] = false;
                true
            } else {
                false
            }
        });
        for &idx in &self.order {
            self.member[idx] = true;
        }
    }

    /// Burning indices in ignition order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied().filter(|&idx| self.member[idx])
    }

    /// Empty the set and forget every service stamp
    pub fn clear(&mut self) {
        for &idx in &self.order {
            self.member[idx] = false;
        }
        self.order.clear();
        self.serviced_at.fill(0);
        self.len = 0;
    }
}
