//! Per-occupant act-steps executed by the tick scheduler.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use wator_core::{Cell, CellCoord, Event, Kind, Predator, Prey, SpawnPhase};

use crate::{neighborhood, spawn, Ocean};

/// Mutable state threaded through a single tick.
///
/// The processed mask lives only as long as the frame: it is scheduling
/// metadata for one pass, never simulation state.
pub(crate) struct TickFrame<'a> {
    ocean: &'a mut Ocean,
    processed: ProcessedMask,
    rng: &'a mut ChaCha8Rng,
    phase: SpawnPhase,
    events: &'a mut Vec<Event>,
}

impl<'a> TickFrame<'a> {
    pub(crate) fn new(
        ocean: &'a mut Ocean,
        rng: &'a mut ChaCha8Rng,
        phase: SpawnPhase,
        events: &'a mut Vec<Event>,
    ) -> Self {
        let processed = ProcessedMask::new(ocean.cells.len(), ocean.width);
        Self {
            ocean,
            processed,
            rng,
            phase,
            events,
        }
    }

    /// Marks the position processed, returning `false` if it already was.
    pub(crate) fn claim(&mut self, coord: CellCoord) -> bool {
        self.processed.mark(coord)
    }

    /// Visits every position in row-major order, acting on each unclaimed one.
    pub(crate) fn sweep(&mut self) {
        let (width, height) = (self.ocean.width, self.ocean.height);
        for row in 0..height {
            for column in 0..width {
                let coord = CellCoord::new(column, row);
                if self.claim(coord) {
                    act(self, coord);
                }
            }
        }
    }

    pub(crate) fn is_fully_processed(&self) -> bool {
        self.processed.is_complete()
    }

    /// Picks a uniformly random neighbour whose kind tag equals `kind`.
    fn choose_neighbor(&mut self, around: CellCoord, kind: Kind) -> Option<CellCoord> {
        let candidates: Vec<CellCoord> =
            neighborhood::moore(self.ocean.width, self.ocean.height, around)
                .filter(|coord| self.ocean.kind_at(*coord) == Some(kind))
                .collect();
        if candidates.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }

    /// Vacates `from` in favour of a random empty neighbour and claims it.
    ///
    /// The caller places the moving occupant at the returned position.
    fn relocate(&mut self, kind: Kind, from: CellCoord) -> Option<CellCoord> {
        let to = self.choose_neighbor(from, Kind::Empty)?;
        self.ocean.set(from, Cell::Empty);
        let _ = self.processed.mark(to);
        self.events.push(Event::CreatureMoved { kind, from, to });
        Some(to)
    }

    /// Places offspring of `parent` into a random empty neighbour of `at`.
    fn reproduce(&mut self, at: CellCoord, parent: Cell) {
        let Some(cell) = self.choose_neighbor(at, Kind::Empty) else {
            return;
        };
        let offspring = match parent {
            Cell::Prey(prey) => Cell::Prey(spawn::prey(prey.params(), self.phase, &mut *self.rng)),
            Cell::Predator(predator) => Cell::Predator(spawn::predator(
                predator.params(),
                self.phase,
                &mut *self.rng,
            )),
            Cell::Empty | Cell::Obstacle => return,
        };

        self.ocean.set(cell, offspring);
        let _ = self.processed.mark(cell);
        self.events.push(Event::CreatureBorn {
            kind: offspring.kind(),
            parent: at,
            cell,
        });
    }

    /// Eats a random neighbouring prey, reporting whether one was found.
    fn hunt(&mut self, predator: CellCoord) -> bool {
        let Some(prey) = self.choose_neighbor(predator, Kind::Prey) else {
            return false;
        };
        self.ocean.set(prey, Cell::Empty);
        self.events.push(Event::PreyEaten { predator, prey });
        true
    }

    fn starve(&mut self, cell: CellCoord) {
        self.ocean.set(cell, Cell::Empty);
        self.events.push(Event::CreatureStarved { cell });
    }
}

/// Runs the act-step of the occupant at `coord`.
fn act(frame: &mut TickFrame<'_>, coord: CellCoord) {
    match frame.ocean.cell(coord) {
        Some(Cell::Prey(prey)) => act_prey(frame, coord, prey),
        Some(Cell::Predator(predator)) => act_predator(frame, coord, predator),
        Some(Cell::Empty | Cell::Obstacle) | None => {}
    }
}

fn act_prey(frame: &mut TickFrame<'_>, origin: CellCoord, mut prey: Prey) {
    let mut here = origin;
    if prey.reproduce.is_due() {
        frame.reproduce(here, Cell::Prey(prey));
        prey.reproduce.reset();
    } else {
        prey.reproduce.tick();
        if let Some(target) = frame.relocate(Kind::Prey, here) {
            here = target;
        }
    }
    frame.ocean.set(here, Cell::Prey(prey));
}

fn act_predator(frame: &mut TickFrame<'_>, origin: CellCoord, mut predator: Predator) {
    if predator.starve.is_due() {
        frame.starve(origin);
        return;
    }
    predator.starve.tick();

    let mut here = origin;
    if predator.reproduce.is_due() {
        frame.reproduce(here, Cell::Predator(predator));
        predator.reproduce.reset();
    } else {
        predator.reproduce.tick();
        if frame.hunt(here) {
            predator.starve.reset();
        } else if let Some(target) = frame.relocate(Kind::Predator, here) {
            here = target;
        }
    }
    frame.ocean.set(here, Cell::Predator(predator));
}

#[derive(Debug)]
struct ProcessedMask {
    width: u32,
    flags: Vec<bool>,
}

impl ProcessedMask {
    fn new(len: usize, width: u32) -> Self {
        Self {
            width,
            flags: vec![false; len],
        }
    }

    fn mark(&mut self, coord: CellCoord) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };
        match self.flags.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    fn is_complete(&self) -> bool {
        self.flags.iter().all(|flag| *flag)
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.column() >= self.width {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use wator_core::{PredatorParams, PreyParams};

    use super::*;

    fn mixed_ocean() -> Ocean {
        let prey = Cell::Prey(Prey::new(PreyParams { reproduce_cycle: 1 }));
        let predator = Cell::Predator(Predator::new(PredatorParams {
            reproduce_cycle: 1,
            starve_cycle: 2,
        }));
        Ocean {
            width: 4,
            height: 3,
            cells: vec![
                prey,
                Cell::Empty,
                Cell::Obstacle,
                predator,
                Cell::Empty,
                prey,
                Cell::Empty,
                Cell::Empty,
                predator,
                Cell::Obstacle,
                Cell::Empty,
                prey,
            ],
        }
    }

    #[test]
    fn sweep_processes_every_position() {
        let mut ocean = mixed_ocean();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();

        for _ in 0..4 {
            let mut frame =
                TickFrame::new(&mut ocean, &mut rng, SpawnPhase::Discrete, &mut events);
            assert!(!frame.is_fully_processed());
            frame.sweep();
            assert!(frame.is_fully_processed());
        }
        assert!(!events.is_empty());
    }

    #[test]
    fn claimed_positions_are_not_visited_again() {
        let mut ocean = mixed_ocean();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = Vec::new();
        let mut frame = TickFrame::new(&mut ocean, &mut rng, SpawnPhase::Discrete, &mut events);

        assert!(frame.claim(CellCoord::new(1, 0)));
        assert!(!frame.claim(CellCoord::new(1, 0)));
        assert!(!frame.claim(CellCoord::new(4, 0)));
    }
}
