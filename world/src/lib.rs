#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative ocean state and tick scheduler for the Wa-Tor simulation.
//!
//! The [`World`] owns the dense cell grid together with the run's seeded
//! random source. Each [`Command::Tick`] performs one synchronous pass over
//! the grid in row-major order; every position acts at most once per tick and
//! creatures that move or are born into a position claim it for the rest of
//! that tick.

mod behavior;
pub mod neighborhood;
pub mod spawn;

use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::debug;
use wator_core::{Cell, CellCoord, Command, Event, Kind, SpawnPhase};

use crate::behavior::TickFrame;

/// Fully populated starting grid handed to [`World::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Layout {
    /// Wraps a row-major cell vector covering every position of a `width` by `height` grid.
    pub fn new(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, LayoutError> {
        let expected = u64::from(width) * u64::from(height);
        if u64::try_from(cells.len()).ok() != Some(expected) {
            return Err(LayoutError::DimensionMismatch {
                width,
                height,
                actual: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cells of the layout in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Reasons a layout cannot back a world.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The cell vector does not cover the declared grid exactly.
    #[error("layout of {width}x{height} does not match {actual} cells")]
    DimensionMismatch {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Represents the authoritative Wa-Tor ocean state.
#[derive(Debug)]
pub struct World {
    ocean: Ocean,
    phase: SpawnPhase,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world from a validated layout.
    ///
    /// The random source is owned by the world from here on and drives every
    /// neighbour choice and every offspring counter draw, so two worlds built
    /// from equal layouts and equally seeded generators evolve identically.
    #[must_use]
    pub fn new(layout: Layout, phase: SpawnPhase, rng: ChaCha8Rng) -> Self {
        Self {
            ocean: Ocean {
                width: layout.width,
                height: layout.height,
                cells: layout.cells,
            },
            phase,
            rng,
            tick_index: 0,
        }
    }

    /// Performs exactly one simulation tick.
    pub fn act(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
        let first_event = out_events.len();

        let mut frame = TickFrame::new(&mut self.ocean, &mut self.rng, self.phase, out_events);
        frame.sweep();
        debug_assert!(frame.is_fully_processed(), "tick left positions unvisited");

        debug!(
            tick = self.tick_index,
            events = out_events.len() - first_event,
            "tick resolved"
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.act(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wator_core::{Cell, CellCoord, Census, Kind, OceanView, SpawnPhase};

    use super::{neighborhood, World};

    /// Exposes a read-only view of the dense ocean grid.
    #[must_use]
    pub fn ocean_view(world: &World) -> OceanView<'_> {
        OceanView::new(&world.ocean.cells, world.ocean.width, world.ocean.height)
    }

    /// Provides the grid dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.ocean.width, world.ocean.height)
    }

    /// Returns the occupant of the provided position, if it lies inside the grid.
    #[must_use]
    pub fn cell(world: &World, coord: CellCoord) -> Option<Cell> {
        world.ocean.cell(coord)
    }

    /// Lists the occupants of the clipped Moore neighbourhood, center included.
    #[must_use]
    pub fn neighbors(world: &World, coord: CellCoord) -> Vec<(CellCoord, Cell)> {
        neighborhood::moore(world.ocean.width, world.ocean.height, coord)
            .filter_map(|neighbor| world.ocean.cell(neighbor).map(|cell| (neighbor, cell)))
            .collect()
    }

    /// Counts occupants by kind.
    #[must_use]
    pub fn census(world: &World) -> Census {
        ocean_view(world).census()
    }

    /// Counts the occupants whose kind tag equals `kind`.
    #[must_use]
    pub fn count_of_kind(world: &World, kind: Kind) -> usize {
        ocean_view(world).count_of_kind(kind)
    }

    /// Number of ticks executed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Counter policy applied to offspring.
    #[must_use]
    pub fn spawn_phase(world: &World) -> SpawnPhase {
        world.phase
    }
}

#[derive(Clone, Debug)]
struct Ocean {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Ocean {
    fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn kind_at(&self, coord: CellCoord) -> Option<Kind> {
        self.cell(coord).map(|cell| cell.kind())
    }

    fn set(&mut self, coord: CellCoord, cell: Cell) {
        if let Some(index) = self.index(coord) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() < self.width && coord.row() < self.height {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
