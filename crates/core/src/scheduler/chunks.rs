//! Decaying-activity chunk scheduler
//!
//! The grid is partitioned into `chunk_size x chunk_size` tiles (the last row
//! and column of tiles may be smaller). Each tile carries an activity counter:
//!
//! - a change inside a tile resets its counter to `activity_threshold`
//! - every pass over an active tile decrements the counter
//! - a tile whose counter reaches 0 goes dormant and its cells are not visited
//!
//! Quiet Moore neighbours of a freshly activated tile get a counter of 1, and
//! after each pass the border of the active region is seeded with 1 as well, so
//! activity creeping across tile boundaries is always seen at least once.
//! The active collection is a membership bitmap plus an insertion-ordered
//! vector, giving O(1) membership tests and stable iteration.

use serde::{Deserialize, Serialize};

/// Cell bounds of one chunk, half-open on the max side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkBounds {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl ChunkBounds {
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Number of cells covered
    #[inline]
    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// Per-chunk activity tracking
#[derive(Debug, Clone)]
pub struct ChunkScheduler {
    width: usize,
    height: usize,
    chunk_size: usize,
    chunks_x: usize,
    chunks_y: usize,
    activity_threshold: u32,

    activity: Vec<u32>,
    bounds: Vec<ChunkBounds>,
    /// Moore neighbourhood per chunk, self included
    neighbors: Vec<Vec<usize>>,

    active: Vec<usize>,
    is_active: Vec<bool>,
}

impl ChunkScheduler {
    /// Build the chunk index for a `width x height` grid
    ///
    /// `chunk_size` and `activity_threshold` must be non-zero; callers validate
    /// configuration before construction.
    #[must_use]
    pub fn new(width: usize, height: usize, chunk_size: usize, activity_threshold: u32) -> Self {
        let chunks_x = width.div_ceil(chunk_size);
        let chunks_y = height.div_ceil(chunk_size);
        let chunk_count = chunks_x * chunks_y;

        let mut bounds = Vec::with_capacity(chunk_count);
        let mut neighbors = Vec::with_capacity(chunk_count);
        for cy in 0..chunks_y {
            for cx in 0..chunks_x {
                bounds.push(ChunkBounds {
                    x0: cx * chunk_size,
                    y0: cy * chunk_size,
                    x1: ((cx + 1) * chunk_size).min(width),
                    y1: ((cy + 1) * chunk_size).min(height),
                });

                let mut around = Vec::with_capacity(9);
                for ny in cy.saturating_sub(1)..=(cy + 1).min(chunks_y - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(chunks_x - 1) {
                        around.push(ny * chunks_x + nx);
                    }
                }
                neighbors.push(around);
            }
        }

        Self {
            width,
            height,
            chunk_size,
            chunks_x,
            chunks_y,
            activity_threshold,
            activity: vec![0; chunk_count],
            bounds,
            neighbors,
            active: Vec::new(),
            is_active: vec![false; chunk_count],
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.activity.len()
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk grid dimensions `(chunks_x, chunks_y)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.chunks_x, self.chunks_y)
    }

    #[inline]
    pub fn activity_threshold(&self) -> u32 {
        self.activity_threshold
    }

    /// Chunk owning cell `(x, y)`, `None` when out of bounds
    #[inline]
    pub fn chunk_at(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y / self.chunk_size) * self.chunks_x + x / self.chunk_size)
    }

    #[inline]
    pub fn chunk_bounds(&self, id: usize) -> ChunkBounds {
        self.bounds[id]
    }

    /// Moore neighbourhood of a chunk, self included
    #[inline]
    pub fn chunk_neighbors(&self, id: usize) -> &[usize] {
        &self.neighbors[id]
    }

    #[inline]
    pub fn activity(&self, id: usize) -> u32 {
        self.activity[id]
    }

    #[inline]
    pub fn is_active(&self, id: usize) -> bool {
        self.is_active[id]
    }

    /// Number of chunks scheduled for the next pass
    pub fn active_chunk_count(&self) -> usize {
        self.active.len()
    }

    /// Scheduled chunk ids in insertion order
    pub fn active_chunks(&self) -> &[usize] {
        &self.active
    }

    // ========================================================================
    // ACTIVATION
    // ========================================================================

    #[inline]
    fn insert_active(&mut self, id: usize) {
        if !self.is_active[id] {
            self.is_active[id] = true;
            self.active.push(id);
        }
    }

    /// Record a change at cell `(x, y)`
    ///
    /// Out-of-range coordinates are ignored. A change on a chunk edge also
    /// activates the chunk across that edge.
    pub fn mark_change(&mut self, x: i32, y: i32) {
        let Some(id) = self.chunk_at(x, y) else {
            return;
        };
        self.activate_chunk(id);

        let b = self.bounds[id];
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (id % self.chunks_x, id / self.chunks_x);

        if x == b.x0 && cx > 0 {
            self.activate_chunk(id - 1);
        }
        if x + 1 == b.x1 && cx + 1 < self.chunks_x {
            self.activate_chunk(id + 1);
        }
        if y == b.y0 && cy > 0 {
            self.activate_chunk(id - self.chunks_x);
        }
        if y + 1 == b.y1 && cy + 1 < self.chunks_y {
            self.activate_chunk(id + self.chunks_x);
        }
    }

    /// Set a chunk to full activity and give its dormant neighbours one look
    pub fn activate_chunk(&mut self, id: usize) {
        if id >= self.activity.len() {
            return;
        }
        self.activity[id] = self.activity_threshold;
        self.insert_active(id);

        for i in 0..self.neighbors[id].len() {
            let n = self.neighbors[id][i];
            if self.activity[n] == 0 {
                self.activity[n] = 1;
                self.insert_active(n);
            }
        }
    }

    /// Activate every chunk (start-up and reset)
    pub fn activate_all(&mut self) {
        for id in 0..self.activity.len() {
            self.activity[id] = self.activity_threshold;
            self.insert_active(id);
        }
    }

    /// Drop all activity
    pub fn clear(&mut self) {
        self.activity.fill(0);
        self.is_active.fill(false);
        self.active.clear();
    }

    // ========================================================================
    // PASSES
    // ========================================================================

    /// Visit every cell of every active chunk, then decay the chunk
    ///
    /// `visit` receives the scheduler so rules can report changes while the
    /// pass runs; chunks marked during the pass are scheduled for the next one.
    /// Returns the number of chunks processed.
    pub fn process_active_chunks<F>(&mut self, mut visit: F) -> usize
    where
        F: FnMut(&mut Self, usize, usize),
    {
        let scheduled = std::mem::take(&mut self.active);
        for &id in &scheduled {
            self.is_active[id] = false;
        }

        let mut processed = 0;
        for &id in &scheduled {
            if self.activity[id] == 0 {
                continue;
            }
            let b = self.bounds[id];
            for y in b.y0..b.y1 {
                for x in b.x0..b.x1 {
                    visit(self, x, y);
                }
            }
            processed += 1;

            self.activity[id] = self.activity[id].saturating_sub(1);
            if self.activity[id] > 0 {
                self.insert_active(id);
            }
        }
        processed
    }

    /// Seed dormant chunks bordering the active region with activity 1
    pub fn add_border_chunks(&mut self) {
        let current = self.active.clone();
        for id in current {
            if self.activity[id] == 0 {
                continue;
            }
            for i in 0..self.neighbors[id].len() {
                let n = self.neighbors[id][i];
                if !self.is_active[n] {
                    self.activity[n] = self.activity[n].max(1);
                    self.insert_active(n);
                }
            }
        }
    }
}
