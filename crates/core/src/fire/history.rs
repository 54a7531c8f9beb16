//! Where fires have recently burned out
//!
//! Consumed cells are recorded at age 0 and aged once per tick. Entries past
//! the horizon are forgotten. Germination and seed adaptation read this map to
//! reward regrowth on freshly burned ground.

use crate::grid::CellGrid;
use rustc_hash::FxHashMap;

/// Map of cell index to ticks since it last burned out
#[derive(Debug, Clone, Default)]
pub struct FireHistory {
    ages: FxHashMap<usize, u32>,
}

impl FireHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a burn-out at `idx`, resetting its age
    pub fn record(&mut self, idx: usize) {
        self.ages.insert(idx, 0);
    }

    /// Advance every entry by one tick and drop those older than `horizon`
    pub fn age_all(&mut self, horizon: u32) {
        self.ages.retain(|_, age| {
            *age = age.saturating_add(1);
            *age <= horizon
        });
    }

    /// Ticks since `idx` burned out, if remembered
    pub fn age(&self, idx: usize) -> Option<u32> {
        self.ages.get(&idx).copied()
    }

    /// Whether `idx` burned out fewer than `window` ticks ago
    pub fn is_recent(&self, idx: usize, window: u32) -> bool {
        self.age(idx).is_some_and(|age| age < window)
    }

    /// Whether any cell within `radius` (square window) of `idx` burned recently
    pub fn any_recent_near(&self, grid: &CellGrid, idx: usize, radius: i32, window: u32) -> bool {
        if self.ages.is_empty() {
            return false;
        }
        let (x, y) = grid.coords(idx);
        (-radius..=radius).any(|dy| {
            (-radius..=radius).any(|dx| {
                grid.index(x + dx, y + dy)
                    .is_some_and(|n| self.is_recent(n, window))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn clear(&mut self) {
        self.ages.clear();
    }
}
