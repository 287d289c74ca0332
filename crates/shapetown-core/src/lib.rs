//! Core types for the shapetown neighborhood simulation.
//!
//! A `Neighborhood` is a fixed rectangular grid of cells, each empty or
//! holding one of two occupant kinds. Every step, occupants that are unhappy
//! with their immediate surroundings move to a uniformly random vacant cell.
//! Rendering lives in `shapetown-app`; this crate owns the data model and
//! the relocation dynamics.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Monotonic frame counter.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Tick(pub u64);

impl Tick {
    /// The tick before any step has run.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The tick following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Vacant cell, available as a relocation target.
    #[default]
    Empty,
    Triangle,
    Square,
}

impl CellKind {
    /// Whether the cell holds an occupant.
    #[must_use]
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Errors produced by the simulation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NeighborhoodError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// A grid access used a coordinate outside the grid.
    #[error("coordinate ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Relocation was asked to move the contents of a vacant cell.
    #[error("relocation source ({x}, {y}) is empty")]
    EmptySource { x: u32, y: u32 },
    /// The random vacancy search exhausted its attempt budget.
    #[error("no vacant cell found after {attempts} draws")]
    NoVacantCell { attempts: u32 },
}

/// Static configuration for a neighborhood simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeighborhoodConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Target fraction of cells occupied by the initial fill, in `[0, 1)`.
    pub ratio_filled: f64,
    /// Minimum alike/different neighbor ratio for an occupant to stay put.
    pub ratio_alike_happy: f64,
    /// Minimum different/alike neighbor ratio for an occupant to stay put.
    pub ratio_different_happy: f64,
    /// Optional RNG seed for reproducible runs.
    pub rng_seed: Option<u64>,
    /// Maximum random draws per relocation; 0 disables the cap and restores
    /// the unbounded search, which never terminates on a full grid.
    pub relocation_attempt_limit: u32,
    /// Maximum number of recent step summaries retained in-memory.
    pub history_capacity: usize,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 8,
            ratio_filled: 0.5,
            ratio_alike_happy: 0.33,
            ratio_different_happy: 0.05,
            rng_seed: None,
            relocation_attempt_limit: 10_000,
            history_capacity: 256,
        }
    }
}

impl NeighborhoodConfig {
    fn validate(&self) -> Result<(), NeighborhoodError> {
        if self.width == 0 || self.height == 0 {
            return Err(NeighborhoodError::InvalidConfig(
                "grid dimensions must be non-zero",
            ));
        }
        if !self.ratio_filled.is_finite() || !(0.0..1.0).contains(&self.ratio_filled) {
            return Err(NeighborhoodError::InvalidConfig(
                "ratio_filled must be in [0, 1)",
            ));
        }
        if !self.ratio_alike_happy.is_finite() || self.ratio_alike_happy < 0.0 {
            return Err(NeighborhoodError::InvalidConfig(
                "ratio_alike_happy must be non-negative",
            ));
        }
        if !self.ratio_different_happy.is_finite() || self.ratio_different_happy < 0.0 {
            return Err(NeighborhoodError::InvalidConfig(
                "ratio_different_happy must be non-negative",
            ));
        }
        Ok(())
    }

    /// Number of cells the initial fill occupies.
    #[must_use]
    pub fn fill_target(&self) -> usize {
        (f64::from(self.width) * f64::from(self.height) * self.ratio_filled).floor() as usize
    }

    /// Returns the configured RNG seed, generating one from entropy if absent.
    fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}

/// Fixed-size 2D grid of cells in row-major layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Construct a grid with `width * height` vacant cells.
    pub fn new(width: u32, height: u32) -> Result<Self, NeighborhoodError> {
        if width == 0 || height == 0 {
            return Err(NeighborhoodError::InvalidConfig(
                "grid dimensions must be non-zero",
            ));
        }
        Ok(Self {
            width,
            height,
            cells: vec![CellKind::Empty; (width as usize) * (height as usize)],
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell contents in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Returns the flat index for `(x, y)` without bounds checks.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), NeighborhoodError> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(NeighborhoodError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Direct cell read; callers guarantee the coordinate is in range.
    #[inline]
    fn at(&self, x: u32, y: u32) -> CellKind {
        debug_assert!(x < self.width && y < self.height);
        self.cells[self.offset(x, y)]
    }

    #[inline]
    fn put(&mut self, x: u32, y: u32, kind: CellKind) {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.offset(x, y);
        self.cells[idx] = kind;
    }

    /// Read the cell at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Result<CellKind, NeighborhoodError> {
        self.check_bounds(x, y)?;
        Ok(self.at(x, y))
    }

    /// Overwrite the cell at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, kind: CellKind) -> Result<(), NeighborhoodError> {
        self.check_bounds(x, y)?;
        self.put(x, y, kind);
        Ok(())
    }

    /// Number of cells holding `kind`.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }
}

/// Outcome of one relocation pass over the whole grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepSummary {
    /// Tick after the pass completed.
    pub tick: Tick,
    /// Occupied cells grid-wide (invariant across relocations).
    pub occupied: usize,
    pub triangles: usize,
    pub squares: usize,
    /// Occupants moved during the pass.
    pub relocations: usize,
}

/// Aggregate simulation state: grid, RNG stream, and step history.
pub struct Neighborhood {
    config: NeighborhoodConfig,
    grid: Grid,
    rng: SmallRng,
    tick: Tick,
    history: VecDeque<StepSummary>,
}

impl fmt::Debug for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neighborhood")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("occupied", &self.grid.occupied())
            .finish()
    }
}

impl Neighborhood {
    /// Instantiate a neighborhood and run the randomized initial fill.
    pub fn new(config: NeighborhoodConfig) -> Result<Self, NeighborhoodError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height)?;
        let mut neighborhood = Self {
            rng: config.seeded_rng(),
            grid,
            config,
            tick: Tick::zero(),
            history: VecDeque::new(),
        };
        neighborhood.populate();
        Ok(neighborhood)
    }

    /// Instantiate from a pre-built grid, skipping the random fill.
    ///
    /// The grid dimensions must match the configuration.
    pub fn with_grid(config: NeighborhoodConfig, grid: Grid) -> Result<Self, NeighborhoodError> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(NeighborhoodError::InvalidConfig(
                "grid dimensions must match the configuration",
            ));
        }
        Ok(Self {
            rng: config.seeded_rng(),
            grid,
            config,
            tick: Tick::zero(),
            history: VecDeque::new(),
        })
    }

    /// Rejection-sampling fill: draw cells uniformly with replacement,
    /// occupying vacant hits with a fair-coin kind until the target count
    /// is reached. Not a shuffle; repeated misses are expected and cheap
    /// while `ratio_filled < 1`.
    fn populate(&mut self) {
        let target = self.config.fill_target();
        let mut filled = 0;
        while filled < target {
            let x = self.rng.random_range(0..self.grid.width());
            let y = self.rng.random_range(0..self.grid.height());
            if self.grid.at(x, y).is_occupied() {
                continue;
            }
            let kind = if self.rng.random_bool(0.5) {
                CellKind::Triangle
            } else {
                CellKind::Square
            };
            self.grid.put(x, y, kind);
            filled += 1;
        }
    }

    /// Returns an immutable reference to configuration.
    #[must_use]
    pub fn config(&self) -> &NeighborhoodConfig {
        &self.config
    }

    /// Borrow the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutably borrow the underlying grid (for scenario edits).
    #[must_use]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current simulation tick.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    /// Recent step summaries, oldest first.
    #[must_use]
    pub fn history(&self) -> &VecDeque<StepSummary> {
        &self.history
    }

    /// Decide whether the occupant at `(x, y)` stays put this step.
    ///
    /// Vacant cells are trivially happy. Otherwise the 8-connected Moore
    /// neighborhood, clipped to the grid bounds (no wraparound), is tallied
    /// into `alike` and `different` occupant counts; vacant neighbors count
    /// toward neither. The occupant is happy iff it has at least one
    /// occupied neighbor, `alike / different >= ratio_alike_happy` (or no
    /// different neighbors), and `different / alike >= ratio_different_happy`
    /// (or no alike neighbors).
    ///
    /// Pure with respect to the current grid state; results must not be
    /// cached across relocations within the same pass.
    pub fn is_happy(&self, x: u32, y: u32) -> Result<bool, NeighborhoodError> {
        let kind = self.grid.get(x, y)?;
        if !kind.is_occupied() {
            return Ok(true);
        }

        let x_min = x.saturating_sub(1);
        let y_min = y.saturating_sub(1);
        let x_max = (x + 1).min(self.grid.width() - 1);
        let y_max = (y + 1).min(self.grid.height() - 1);

        let mut alike = 0u32;
        let mut different = 0u32;
        for ny in y_min..=y_max {
            for nx in x_min..=x_max {
                if nx == x && ny == y {
                    continue;
                }
                match self.grid.at(nx, ny) {
                    CellKind::Empty => {}
                    neighbor if neighbor == kind => alike += 1,
                    _ => different += 1,
                }
            }
        }

        if alike + different == 0 {
            return Ok(false);
        }
        let alike = f64::from(alike);
        let different = f64::from(different);
        let enough_alike =
            different == 0.0 || alike / different >= self.config.ratio_alike_happy;
        let enough_different =
            alike == 0.0 || different / alike >= self.config.ratio_different_happy;
        Ok(enough_alike && enough_different)
    }

    /// Move the occupant at `(x, y)` to a uniformly random vacant cell,
    /// returning the destination. The move is atomic from the caller's
    /// perspective: the occupant lands before the source is vacated.
    ///
    /// The vacancy search rejection-samples the whole grid. When
    /// `relocation_attempt_limit` is non-zero the search gives up with
    /// [`NeighborhoodError::NoVacantCell`] after that many draws instead of
    /// spinning forever on a full grid.
    pub fn relocate(&mut self, x: u32, y: u32) -> Result<(u32, u32), NeighborhoodError> {
        let occupant = self.grid.get(x, y)?;
        if !occupant.is_occupied() {
            return Err(NeighborhoodError::EmptySource { x, y });
        }

        let limit = self.config.relocation_attempt_limit;
        let mut attempts = 0u32;
        loop {
            if limit != 0 && attempts >= limit {
                return Err(NeighborhoodError::NoVacantCell { attempts });
            }
            attempts += 1;
            let tx = self.rng.random_range(0..self.grid.width());
            let ty = self.rng.random_range(0..self.grid.height());
            if !self.grid.at(tx, ty).is_occupied() {
                self.grid.put(tx, ty, occupant);
                self.grid.put(x, y, CellKind::Empty);
                return Ok((tx, ty));
            }
        }
    }

    /// Run one relocation pass over the grid in row-major scan order.
    ///
    /// Unhappy occupants relocate immediately, mid-scan, so a move decided
    /// for an earlier cell changes the neighborhood later cells observe in
    /// the same pass. This in-place update is deliberate; a snapshot-based
    /// synchronous step would produce different output.
    pub fn step(&mut self) -> Result<StepSummary, NeighborhoodError> {
        let mut relocations = 0;
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if !self.grid.at(x, y).is_occupied() {
                    continue;
                }
                if !self.is_happy(x, y)? {
                    self.relocate(x, y)?;
                    relocations += 1;
                }
            }
        }

        self.tick = self.tick.next();
        let summary = StepSummary {
            tick: self.tick,
            occupied: self.grid.occupied(),
            triangles: self.grid.count(CellKind::Triangle),
            squares: self.grid.count(CellKind::Square),
            relocations,
        };
        self.push_history(summary);
        Ok(summary)
    }

    fn push_history(&mut self, summary: StepSummary) {
        let capacity = self.config.history_capacity;
        if capacity == 0 {
            return;
        }
        if self.history.len() == capacity {
            self.history.pop_front();
        }
        self.history.push_back(summary);
    }
}
