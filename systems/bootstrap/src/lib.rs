#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that builds the starting ocean.
//!
//! A run starts either from a literal preset field drawn with the rendering
//! glyphs or from independent per-cell random draws. Either way every
//! position is assigned before the [`Layout`] is handed to the world, and
//! every creature's counters follow the run's [`SpawnPhase`].

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{info, warn};
use wator_core::{Cell, CellCoord, Census, Kind, PredatorParams, PreyParams, SpawnPhase};
use wator_world::{spawn, Layout, LayoutError, World};

/// Validated parameters required to build the starting ocean.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Number of columns in the grid.
    pub width: u32,
    /// Number of rows in the grid.
    pub height: u32,
    /// How the starting occupants are chosen.
    pub seeding: Seeding,
    /// Cycle lengths shared by every prey.
    pub prey: PreyParams,
    /// Cycle lengths shared by every predator.
    pub predator: PredatorParams,
    /// Counter policy for every creature created during the run.
    pub phase: SpawnPhase,
}

impl Settings {
    /// Checks the numeric constraints that the configuration format cannot express.
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.width == 0 || self.height == 0 {
            return Err(BootstrapError::InvalidConfiguration(format!(
                "ocean_state dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.prey.reproduce_cycle == 0 {
            return Err(BootstrapError::InvalidConfiguration(
                "prey_params.reproduceCycle must be at least 1".to_owned(),
            ));
        }
        if self.predator.reproduce_cycle == 0 {
            return Err(BootstrapError::InvalidConfiguration(
                "predator_params.reproduceCycle must be at least 1".to_owned(),
            ));
        }
        if let Seeding::Random(probabilities) = &self.seeding {
            probabilities.validate()?;
        }
        Ok(())
    }
}

/// Strategy used to choose the starting occupants.
#[derive(Clone, Debug, PartialEq)]
pub enum Seeding {
    /// Literal field drawn with the rendering glyphs, one line per row.
    Preset {
        /// Rows of the field, without the configuration's leading delimiter.
        field: String,
    },
    /// Independent draw per position.
    Random(Probabilities),
}

impl Seeding {
    /// Configuration name of the seeding mode.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Preset { .. } => "preset",
            Self::Random(_) => "random",
        }
    }
}

/// Per-cell occupancy probabilities for random seeding.
///
/// A uniform draw `u` in `[0, 1)` selects an obstacle below `obstacle`, a
/// prey below `obstacle + prey`, a predator below `obstacle + prey + predator`
/// and open water otherwise. Sums above one are accepted as-is, which leaves
/// the later thresholds partly unreachable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probabilities {
    /// Probability of an obstacle.
    pub obstacle: f64,
    /// Probability of a prey.
    pub prey: f64,
    /// Probability of a predator.
    pub predator: f64,
}

impl Probabilities {
    fn validate(&self) -> Result<(), BootstrapError> {
        let named = [
            ("obstacleProbability", self.obstacle),
            ("preyProbability", self.prey),
            ("predatorProbability", self.predator),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(BootstrapError::InvalidConfiguration(format!(
                    "ocean_state.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    fn kind_for(&self, draw: f64) -> Kind {
        let obstacle = self.obstacle;
        let prey = obstacle + self.prey;
        let predator = prey + self.predator;
        if draw < obstacle {
            Kind::Obstacle
        } else if draw < prey {
            Kind::Prey
        } else if draw < predator {
            Kind::Predator
        } else {
            Kind::Empty
        }
    }

    fn sum(&self) -> f64 {
        self.obstacle + self.prey + self.predator
    }
}

/// Fatal errors raised while building the starting ocean.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BootstrapError {
    /// A preset field contains a character outside the glyph legend.
    #[error("invalid initial state: unknown glyph {glyph:?} at column {}, row {}", .cell.column(), .cell.row())]
    InvalidInitialState {
        /// Offending character.
        glyph: char,
        /// Position of the offending character.
        cell: CellCoord,
    },
    /// A configuration value is missing, malformed, or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A position was never assigned an occupant.
    #[error("position at column {}, row {} was never initialised", .cell.column(), .cell.row())]
    Unassigned {
        /// Position left without an occupant.
        cell: CellCoord,
    },
    /// The assembled cells do not cover the grid.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Builds starting layouts and worlds from validated settings.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Assembles the starting layout, drawing from `rng` for random seeding
    /// and stochastic counters.
    pub fn build_layout(
        &self,
        settings: &Settings,
        rng: &mut ChaCha8Rng,
    ) -> Result<Layout, BootstrapError> {
        settings.validate()?;

        let cells = match &settings.seeding {
            Seeding::Preset { field } => preset_cells(settings, field, rng)?,
            Seeding::Random(probabilities) => random_cells(settings, probabilities, rng)?,
        };
        let layout = Layout::new(settings.width, settings.height, cells)?;

        let census = Census::of_cells(layout.cells());
        info!(
            mode = settings.seeding.mode(),
            width = settings.width,
            height = settings.height,
            obstacles = census.obstacles,
            prey = census.prey,
            predators = census.predators,
            "ocean initialised"
        );
        Ok(layout)
    }

    /// Builds the starting layout and hands it, together with the run's
    /// random source, to a new world.
    pub fn build_world(
        &self,
        settings: &Settings,
        mut rng: ChaCha8Rng,
    ) -> Result<World, BootstrapError> {
        let layout = self.build_layout(settings, &mut rng)?;
        Ok(World::new(layout, settings.phase, rng))
    }
}

fn preset_cells(
    settings: &Settings,
    field: &str,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Cell>, BootstrapError> {
    let rows = preset_rows(field)
        .enumerate()
        .map(|(row, line)| parse_row(row, line))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.len() != settings.height as usize {
        return Err(BootstrapError::InvalidConfiguration(format!(
            "preset field has {} rows but ocean_state.height is {}",
            rows.len(),
            settings.height
        )));
    }
    if let Some((row, kinds)) = rows
        .iter()
        .enumerate()
        .find(|(_, kinds)| kinds.len() != settings.width as usize)
    {
        return Err(BootstrapError::InvalidConfiguration(format!(
            "preset row {row} has {} cells but ocean_state.width is {}",
            kinds.len(),
            settings.width
        )));
    }

    let mut slots = SlotGrid::new(settings.width, settings.height);
    for (row, kinds) in rows.iter().enumerate() {
        for (column, kind) in kinds.iter().enumerate() {
            let coord = CellCoord::new(column as u32, row as u32);
            slots.assign(coord, occupant(*kind, settings, rng));
        }
    }
    slots.finish()
}

/// Splits a preset field into row strings.
///
/// Ignores a single trailing line break and accepts `\r\n` line endings.
fn preset_rows(field: &str) -> impl Iterator<Item = &str> {
    let body = field
        .strip_suffix("\r\n")
        .or_else(|| field.strip_suffix('\n'))
        .unwrap_or(field);

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn parse_row(row: usize, line: &str) -> Result<Vec<Kind>, BootstrapError> {
    line.chars()
        .enumerate()
        .map(|(column, glyph)| {
            Kind::from_glyph(glyph).ok_or(BootstrapError::InvalidInitialState {
                glyph,
                cell: CellCoord::new(column as u32, row as u32),
            })
        })
        .collect()
}

fn random_cells(
    settings: &Settings,
    probabilities: &Probabilities,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Cell>, BootstrapError> {
    if probabilities.sum() > 1.0 {
        warn!(
            sum = probabilities.sum(),
            "random seeding probabilities exceed 1; predators are under-weighted"
        );
    }

    let mut slots = SlotGrid::new(settings.width, settings.height);
    for row in 0..settings.height {
        for column in 0..settings.width {
            let draw: f64 = rng.gen();
            let kind = probabilities.kind_for(draw);
            slots.assign(CellCoord::new(column, row), occupant(kind, settings, rng));
        }
    }
    slots.finish()
}

fn occupant(kind: Kind, settings: &Settings, rng: &mut ChaCha8Rng) -> Cell {
    match kind {
        Kind::Empty => Cell::Empty,
        Kind::Obstacle => Cell::Obstacle,
        Kind::Prey => Cell::Prey(spawn::prey(settings.prey, settings.phase, rng)),
        Kind::Predator => Cell::Predator(spawn::predator(settings.predator, settings.phase, rng)),
    }
}

/// Grid of optional occupants that must be fully assigned before use.
#[derive(Debug)]
struct SlotGrid {
    width: u32,
    slots: Vec<Option<Cell>>,
}

impl SlotGrid {
    fn new(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            slots: vec![None; capacity],
        }
    }

    fn assign(&mut self, coord: CellCoord, cell: Cell) {
        let index = coord.row() as usize * self.width as usize + coord.column() as usize;
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(cell);
        }
    }

    fn finish(self) -> Result<Vec<Cell>, BootstrapError> {
        let width = self.width.max(1) as usize;
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or(BootstrapError::Unassigned {
                    cell: CellCoord::new((index % width) as u32, (index / width) as u32),
                })
            })
            .collect()
    }
}
