#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wa-Tor ocean simulation.
//!
//! This crate defines the cell variant model and the message surface that
//! connects adapters, the authoritative world, and pure systems. Adapters
//! submit [`Command`] values, the world executes them via its `apply` entry
//! point and reports every mutation as an [`Event`]. Observers read the grid
//! through the borrowed [`OceanView`] projection and never write to it.

use serde::{Deserialize, Serialize};

/// Tag distinguishing the four occupant kinds of the ocean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Passable open water without behaviour.
    Empty,
    /// Impassable rock that never moves and is never a target.
    Obstacle,
    /// Prey that wanders and reproduces.
    Prey,
    /// Predator that hunts prey, reproduces, and starves.
    Predator,
}

impl Kind {
    /// Every kind in legend order.
    pub const ALL: [Kind; 4] = [Kind::Empty, Kind::Obstacle, Kind::Prey, Kind::Predator];

    /// Character used when rendering the kind and when parsing preset layouts.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Obstacle => '*',
            Self::Prey => 'O',
            Self::Predator => 'X',
        }
    }

    /// Resolves a glyph back into its kind, if the glyph belongs to the legend.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' => Some(Self::Empty),
            '*' => Some(Self::Obstacle),
            'O' => Some(Self::Prey),
            'X' => Some(Self::Predator),
            _ => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Countdown pairing a constant cycle length with a mutable remaining counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Countdown {
    cycle: u32,
    remaining: u32,
}

impl Countdown {
    /// Creates a countdown whose counter starts at the full cycle length.
    #[must_use]
    pub const fn full(cycle: u32) -> Self {
        Self {
            cycle,
            remaining: cycle,
        }
    }

    /// Creates a countdown with an explicit starting counter.
    #[must_use]
    pub const fn with_remaining(cycle: u32, remaining: u32) -> Self {
        Self { cycle, remaining }
    }

    /// Constant cycle length the counter resets to.
    #[must_use]
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Ticks left until the countdown is due.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Reports whether the counter reached zero.
    #[must_use]
    pub const fn is_due(&self) -> bool {
        self.remaining == 0
    }

    /// Decrements the counter by a single tick.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Restores the counter to the full cycle length.
    pub fn reset(&mut self) {
        self.remaining = self.cycle;
    }
}

/// Cycle lengths shared by every prey of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreyParams {
    /// Ticks between two reproductions.
    pub reproduce_cycle: u32,
}

/// Cycle lengths shared by every predator of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredatorParams {
    /// Ticks between two reproductions.
    pub reproduce_cycle: u32,
    /// Ticks a predator survives without eating.
    pub starve_cycle: u32,
}

/// Prey occupant state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Prey {
    /// Countdown to the next reproduction.
    pub reproduce: Countdown,
}

impl Prey {
    /// Creates a prey with fully wound counters.
    #[must_use]
    pub const fn new(params: PreyParams) -> Self {
        Self {
            reproduce: Countdown::full(params.reproduce_cycle),
        }
    }

    /// Constant parameters inherited by offspring.
    #[must_use]
    pub const fn params(&self) -> PreyParams {
        PreyParams {
            reproduce_cycle: self.reproduce.cycle(),
        }
    }
}

/// Predator occupant state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Predator {
    /// Countdown to the next reproduction.
    pub reproduce: Countdown,
    /// Countdown to starvation, rewound whenever the predator eats.
    pub starve: Countdown,
}

impl Predator {
    /// Creates a predator with fully wound counters.
    #[must_use]
    pub const fn new(params: PredatorParams) -> Self {
        Self {
            reproduce: Countdown::full(params.reproduce_cycle),
            starve: Countdown::full(params.starve_cycle),
        }
    }

    /// Constant parameters inherited by offspring.
    #[must_use]
    pub const fn params(&self) -> PredatorParams {
        PredatorParams {
            reproduce_cycle: self.reproduce.cycle(),
            starve_cycle: self.starve.cycle(),
        }
    }
}

/// Occupant of a single grid position. Empty water is an explicit variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Open water.
    #[default]
    Empty,
    /// Impassable rock.
    Obstacle,
    /// A prey creature.
    Prey(Prey),
    /// A predator creature.
    Predator(Predator),
}

impl Cell {
    /// Kind tag of the occupant.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Empty => Kind::Empty,
            Self::Obstacle => Kind::Obstacle,
            Self::Prey(_) => Kind::Prey,
            Self::Predator(_) => Kind::Predator,
        }
    }

    /// Rendering glyph of the occupant.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.kind().glyph()
    }
}

/// Run-wide policy for the starting counters of newly created creatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpawnPhase {
    /// Counters start at exactly the cycle length.
    Discrete,
    /// Counters start at a uniform draw from `1..=cycle` so that creatures
    /// created together do not act in lockstep.
    #[default]
    Stochastic,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs one synchronous pass of the scheduler over every grid position.
    Tick,
}

/// Events broadcast by the world while processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces the start of a tick.
    TimeAdvanced {
        /// One-based index of the tick that started.
        tick: u64,
    },
    /// A creature moved into an empty neighbour.
    CreatureMoved {
        /// Kind of the creature that moved.
        kind: Kind,
        /// Cell the creature left.
        from: CellCoord,
        /// Cell the creature now occupies.
        to: CellCoord,
    },
    /// A creature produced offspring in an empty neighbour.
    CreatureBorn {
        /// Kind shared by parent and offspring.
        kind: Kind,
        /// Cell occupied by the parent.
        parent: CellCoord,
        /// Cell occupied by the offspring.
        cell: CellCoord,
    },
    /// A predator starved and left open water behind.
    CreatureStarved {
        /// Cell the predator occupied.
        cell: CellCoord,
    },
    /// A predator ate a neighbouring prey.
    PreyEaten {
        /// Cell occupied by the hunting predator.
        predator: CellCoord,
        /// Cell the eaten prey occupied.
        prey: CellCoord,
    },
}

/// Population counts by kind at a single moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    /// Number of empty cells.
    pub empty: usize,
    /// Number of obstacle cells.
    pub obstacles: usize,
    /// Number of prey.
    pub prey: usize,
    /// Number of predators.
    pub predators: usize,
}

impl Census {
    /// Counts the occupants of the provided cells.
    #[must_use]
    pub fn of_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut census = Self::default();
        for cell in cells {
            *census.slot_mut(cell.kind()) += 1;
        }
        census
    }

    /// Number of occupants of the provided kind.
    #[must_use]
    pub const fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Empty => self.empty,
            Kind::Obstacle => self.obstacles,
            Kind::Prey => self.prey,
            Kind::Predator => self.predators,
        }
    }

    /// Total number of occupants, which always equals the grid area.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.empty + self.obstacles + self.prey + self.predators
    }

    fn slot_mut(&mut self, kind: Kind) -> &mut usize {
        match kind {
            Kind::Empty => &mut self.empty,
            Kind::Obstacle => &mut self.obstacles,
            Kind::Prey => &mut self.prey,
            Kind::Predator => &mut self.predators,
        }
    }
}

/// Read-only view into the dense ocean grid.
#[derive(Clone, Copy, Debug)]
pub struct OceanView<'a> {
    cells: &'a [Cell],
    width: u32,
    height: u32,
}

impl<'a> OceanView<'a> {
    /// Captures a new ocean view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], width: u32, height: u32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Returns the occupant of the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&'a Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter()
    }

    /// Returns an iterator over the grid rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> + 'a {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }

    /// Provides the dimensions of the underlying grid as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Counts the occupants of the grid by kind.
    #[must_use]
    pub fn census(&self) -> Census {
        Census::of_cells(self.cells)
    }

    /// Counts the occupants whose kind tag equals `kind`.
    #[must_use]
    pub fn count_of_kind(&self, kind: Kind) -> usize {
        self.cells.iter().filter(|cell| cell.kind() == kind).count()
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

#[cfg(test)]
mod tests {
    use super::{
        Cell, CellCoord, Census, Countdown, Kind, OceanView, Predator, PredatorParams, Prey,
        PreyParams,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn glyphs_resolve_back_to_their_kind() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(Kind::from_glyph('Z'), None);
        assert_eq!(Kind::from_glyph('o'), None);
    }

    #[test]
    fn countdown_ticks_down_and_resets() {
        let mut countdown = Countdown::full(2);
        assert!(!countdown.is_due());
        countdown.tick();
        countdown.tick();
        assert!(countdown.is_due());
        countdown.tick();
        assert_eq!(countdown.remaining(), 0);
        countdown.reset();
        assert_eq!(countdown.remaining(), 2);
    }

    #[test]
    fn creatures_report_their_constant_parameters() {
        let prey = Prey {
            reproduce: Countdown::with_remaining(5, 1),
        };
        assert_eq!(prey.params(), PreyParams { reproduce_cycle: 5 });

        let params = PredatorParams {
            reproduce_cycle: 7,
            starve_cycle: 3,
        };
        assert_eq!(Predator::new(params).params(), params);
    }

    #[test]
    fn cell_kind_is_an_exact_tag() {
        let prey = Cell::Prey(Prey::new(PreyParams { reproduce_cycle: 1 }));
        assert_eq!(prey.kind(), Kind::Prey);
        assert_ne!(prey.kind(), Kind::Empty);
        assert_eq!(Cell::default().kind(), Kind::Empty);
    }

    #[test]
    fn ocean_view_counts_and_clips_lookups() {
        let cells = [
            Cell::Obstacle,
            Cell::Prey(Prey::new(PreyParams { reproduce_cycle: 5 })),
            Cell::Obstacle,
            Cell::Empty,
        ];
        let view = OceanView::new(&cells, 2, 2);

        assert_eq!(
            view.cell(CellCoord::new(1, 0)).map(Cell::kind),
            Some(Kind::Prey)
        );
        assert_eq!(view.cell(CellCoord::new(2, 0)), None);
        assert_eq!(view.count_of_kind(Kind::Obstacle), 2);
        assert_eq!(view.rows().count(), 2);

        let census = view.census();
        assert_eq!(census.count(Kind::Empty), 1);
        assert_eq!(census.total(), 4);
    }

    #[test]
    fn census_round_trips_through_bincode() {
        assert_round_trip(&Census {
            empty: 3,
            obstacles: 1,
            prey: 4,
            predators: 2,
        });
    }

    #[test]
    fn kind_round_trips_through_bincode() {
        assert_round_trip(&Kind::Predator);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
