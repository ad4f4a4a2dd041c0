//! Per-cell possibility domains with incremental entropy bookkeeping
//!
//! Every cell keeps a bitset of still-possible oriented tiles together with
//! the running sums needed to recompute its entropy in O(1) after a removal,
//! and one support counter per (tile, direction) recording how many
//! compatible partners remain in the neighbor across that edge. Removals are
//! queued as events for the propagator.

use crate::{
    algorithm::adjacency::CompiledRules,
    algorithm::bitset::TileBitset,
    algorithm::propagation::drain,
    math::probability::{entropy_from_sums, weight_log_weight},
    spatial::grid::TileGrid,
    spatial::symmetry::Direction,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Grid of cell domains for one generation attempt
#[derive(Clone, Debug)]
pub struct Wave {
    rules: Arc<CompiledRules>,
    width: usize,
    height: usize,
    periodic: bool,
    tiles: usize,
    domains: Vec<TileBitset>,
    counts: Vec<usize>,
    weight_sums: Vec<f64>,
    weight_log_weight_sums: Vec<f64>,
    entropies: Vec<f64>,
    /// Flat `[cell][tile][direction]` remaining-partner counters
    support: Vec<u32>,
    queue: VecDeque<(usize, usize)>,
    contradiction: Option<usize>,
    decided: usize,
}

impl Wave {
    /// Allocate a wave and run [`Wave::initialize`]
    pub fn new(rules: Arc<CompiledRules>, width: usize, height: usize, periodic: bool) -> Self {
        let cells = width * height;
        let tiles = rules.oriented_count();
        let mut wave = Self {
            rules,
            width,
            height,
            periodic,
            tiles,
            domains: vec![TileBitset::all(tiles); cells],
            counts: vec![tiles; cells],
            weight_sums: vec![0.0; cells],
            weight_log_weight_sums: vec![0.0; cells],
            entropies: vec![0.0; cells],
            support: vec![0; cells * tiles * Direction::COUNT],
            queue: VecDeque::new(),
            contradiction: None,
            decided: 0,
        };
        wave.initialize();
        wave
    }

    /// Reset every cell to the full oriented-tile set
    ///
    /// Weight sums come from the global weight distribution and support
    /// counters from the compiled partner lists. Tiles that have no partner at
    /// all in a direction where the cell has a neighbor are banned and the
    /// removals drained, so the result is arc-consistent or contradictory.
    pub fn initialize(&mut self) {
        let tiles = self.tiles;
        let weight_sum: f64 = self.rules.weights().iter().sum();
        let weight_log_weight_sum: f64 = self
            .rules
            .weights()
            .iter()
            .map(|&weight| weight_log_weight(weight))
            .sum();
        let entropy = entropy_from_sums(weight_sum, weight_log_weight_sum);

        let mut per_tile = Vec::with_capacity(tiles * Direction::COUNT);
        for tile in 0..tiles {
            for direction in Direction::ALL {
                per_tile.push(self.rules.partners(direction, tile).len() as u32);
            }
        }

        for domain in &mut self.domains {
            *domain = TileBitset::all(tiles);
        }
        self.counts.fill(tiles);
        self.weight_sums.fill(weight_sum);
        self.weight_log_weight_sums.fill(weight_log_weight_sum);
        self.entropies.fill(entropy);
        for (index, counter) in self.support.iter_mut().enumerate() {
            *counter = per_tile.get(index % per_tile.len().max(1)).copied().unwrap_or(0);
        }
        self.queue.clear();
        self.contradiction = None;
        self.decided = if tiles == 1 { self.cell_count() } else { 0 };

        for cell in 0..self.cell_count() {
            for direction in Direction::ALL {
                if self.neighbor(cell, direction).is_none() {
                    continue;
                }
                for tile in 0..tiles {
                    if self.rules.partners(direction, tile).is_empty() {
                        self.ban(cell, tile);
                    }
                }
            }
        }
        drain(self);
    }

    /// Remove a tile from a cell's domain
    ///
    /// Returns `false` if the tile was already absent. Otherwise updates the
    /// cached sums, enqueues the removal and flags a contradiction when the
    /// domain becomes empty.
    pub fn ban(&mut self, cell: usize, tile: usize) -> bool {
        let Some(domain) = self.domains.get_mut(cell) else {
            return false;
        };
        if !domain.remove(tile) {
            return false;
        }

        for direction in Direction::ALL {
            let index = self.support_index(cell, tile, direction);
            if let Some(counter) = self.support.get_mut(index) {
                *counter = 0;
            }
        }

        let weight = self.rules.weight(tile);
        let remaining = if let Some(count) = self.counts.get_mut(cell) {
            *count = count.saturating_sub(1);
            *count
        } else {
            0
        };
        if let (Some(sum), Some(log_sum), Some(entropy)) = (
            self.weight_sums.get_mut(cell),
            self.weight_log_weight_sums.get_mut(cell),
            self.entropies.get_mut(cell),
        ) {
            *sum -= weight;
            *log_sum -= weight_log_weight(weight);
            *entropy = entropy_from_sums(*sum, *log_sum);
        }

        match remaining {
            1 => self.decided += 1,
            0 => {
                self.decided = self.decided.saturating_sub(1);
                if self.contradiction.is_none() {
                    self.contradiction = Some(cell);
                }
            }
            _ => {}
        }

        self.queue.push_back((cell, tile));
        true
    }

    /// Decrement the support of `tile` at `cell` from `direction`
    ///
    /// Returns the remaining support, or `None` when the tile is no longer in
    /// the cell's domain and nothing was counted.
    pub fn decrement_support(
        &mut self,
        cell: usize,
        tile: usize,
        direction: Direction,
    ) -> Option<u32> {
        if !self.domains.get(cell)?.contains(tile) {
            return None;
        }
        let index = self.support_index(cell, tile, direction);
        let counter = self.support.get_mut(index)?;
        *counter = counter.saturating_sub(1);
        Some(*counter)
    }

    /// Remaining partners of `tile` at `cell` across the edge in `direction`
    pub fn support(&self, cell: usize, tile: usize, direction: Direction) -> u32 {
        self.support
            .get(self.support_index(cell, tile, direction))
            .copied()
            .unwrap_or(0)
    }

    const fn support_index(&self, cell: usize, tile: usize, direction: Direction) -> usize {
        (cell * self.tiles + tile) * Direction::COUNT + direction.index()
    }

    /// Take the oldest pending removal event
    pub fn pop_event(&mut self) -> Option<(usize, usize)> {
        self.queue.pop_front()
    }

    /// Number of pending removal events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop all pending removal events
    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Neighbor cell in a direction
    ///
    /// Wraps around when periodic, otherwise `None` across the boundary.
    pub const fn neighbor(&self, cell: usize, direction: Direction) -> Option<usize> {
        if self.width == 0 || cell >= self.cell_count() {
            return None;
        }
        let x = (cell % self.width) as isize;
        let y = (cell / self.width) as isize;
        let (dx, dy) = direction.offset();
        let (width, height) = (self.width as isize, self.height as isize);

        let (mut nx, mut ny) = (x + dx, y + dy);
        if self.periodic {
            nx = nx.rem_euclid(width);
            ny = ny.rem_euclid(height);
        } else if nx < 0 || ny < 0 || nx >= width || ny >= height {
            return None;
        }
        Some(nx as usize + ny as usize * self.width)
    }

    /// Entropy of a cell's remaining weight distribution
    pub fn entropy(&self, cell: usize) -> f64 {
        self.entropies.get(cell).copied().unwrap_or(0.0)
    }

    /// Number of tiles still possible in a cell
    pub fn count(&self, cell: usize) -> usize {
        self.counts.get(cell).copied().unwrap_or(0)
    }

    /// Sum of the weights still possible in a cell
    pub fn weight_sum(&self, cell: usize) -> f64 {
        self.weight_sums.get(cell).copied().unwrap_or(0.0)
    }

    /// Domain of a cell
    pub fn domain(&self, cell: usize) -> Option<&TileBitset> {
        self.domains.get(cell)
    }

    /// The single remaining tile of a decided cell
    pub fn observed(&self, cell: usize) -> Option<usize> {
        if self.count(cell) == 1 {
            self.domains.get(cell).and_then(TileBitset::first)
        } else {
            None
        }
    }

    /// First cell whose domain became empty
    pub const fn contradiction_cell(&self) -> Option<usize> {
        self.contradiction
    }

    /// Whether some domain became empty
    pub const fn is_contradiction(&self) -> bool {
        self.contradiction.is_some()
    }

    /// Number of cells holding exactly one tile
    pub const fn decided_count(&self) -> usize {
        self.decided
    }

    /// Whether every cell holds exactly one tile
    pub const fn is_collapsed(&self) -> bool {
        self.contradiction.is_none() && self.decided == self.cell_count()
    }

    /// Check arc-consistency of every edge from scratch
    ///
    /// Each tile left in a cell must have at least one compatible tile left
    /// in every neighbor. Contradictory waves are never consistent.
    pub fn is_arc_consistent(&self) -> bool {
        if self.is_contradiction() {
            return false;
        }
        (0..self.cell_count()).all(|cell| {
            Direction::ALL.iter().all(|&direction| {
                let Some(neighbor) = self.neighbor(cell, direction) else {
                    return true;
                };
                let (Some(domain), Some(neighbor_domain)) =
                    (self.domains.get(cell), self.domains.get(neighbor))
                else {
                    return false;
                };
                domain.iter().all(|tile| {
                    self.rules
                        .compatibility(direction, tile)
                        .is_some_and(|allowed| allowed.intersects(neighbor_domain))
                })
            })
        })
    }

    /// Snapshot of resolved tiles, unresolved cells as `None`
    pub fn to_grid(&self) -> TileGrid {
        let values = (0..self.cell_count()).map(|cell| self.observed(cell)).collect();
        TileGrid::from_row_major(self.width, self.height, values)
            .unwrap_or_else(|| TileGrid::unresolved(self.width, self.height))
    }

    /// Cell coordinates `(x, y)` of a row-major index
    pub const fn position(&self, cell: usize) -> (usize, usize) {
        if self.width == 0 {
            (0, 0)
        } else {
            (cell % self.width, cell / self.width)
        }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Grid width in cells
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether opposite edges are adjacent
    pub const fn periodic(&self) -> bool {
        self.periodic
    }

    /// Compiled rules shared with the model
    pub const fn rules(&self) -> &Arc<CompiledRules> {
        &self.rules
    }
}
