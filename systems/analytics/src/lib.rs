#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population analytics that observe the ocean without touching it.
//!
//! The system consumes the event stream of each tick together with a census
//! of the grid taken after the tick, and accumulates an in-memory population
//! series plus running tallies of births, moves, starvations and kills.

pub mod metrics;

use wator_core::{Census, Event, Kind};

/// Population counts recorded after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PopulationSample {
    /// Tick after which the sample was taken; zero is the starting ocean.
    pub tick: u64,
    /// Number of prey alive.
    pub prey: usize,
    /// Number of predators alive.
    pub predators: usize,
}

impl PopulationSample {
    fn from_census(tick: u64, census: Census) -> Self {
        Self {
            tick,
            prey: census.prey,
            predators: census.predators,
        }
    }
}

/// Running totals of the mutations reported by the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventTally {
    /// Prey offspring placed.
    pub prey_born: u64,
    /// Predator offspring placed.
    pub predators_born: u64,
    /// Successful moves of any creature.
    pub moves: u64,
    /// Predators that starved.
    pub starved: u64,
    /// Prey eaten by predators.
    pub prey_eaten: u64,
}

impl EventTally {
    fn observe(&mut self, event: &Event) {
        let counter = match event {
            Event::TimeAdvanced { .. } => return,
            Event::CreatureMoved { .. } => &mut self.moves,
            Event::CreatureBorn {
                kind: Kind::Prey, ..
            } => &mut self.prey_born,
            Event::CreatureBorn {
                kind: Kind::Predator,
                ..
            } => &mut self.predators_born,
            Event::CreatureBorn { .. } => return,
            Event::CreatureStarved { .. } => &mut self.starved,
            Event::PreyEaten { .. } => &mut self.prey_eaten,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Pure analytics system that records one population sample per tick.
#[derive(Debug, Default)]
pub struct Analytics {
    series: Vec<PopulationSample>,
    tally: EventTally,
}

impl Analytics {
    /// Creates a new analytics system with an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the population of the starting ocean as tick zero.
    pub fn record_initial(&mut self, census: Census) {
        self.series.clear();
        self.series.push(PopulationSample::from_census(0, census));
    }

    /// Consumes the events of a command batch and the census taken after it.
    ///
    /// A sample is appended only when the batch contains a tick; the sample is
    /// attributed to the last tick observed in the batch.
    pub fn handle(&mut self, events: &[Event], census: Census) {
        let mut last_tick = None;
        for event in events {
            if let Event::TimeAdvanced { tick } = event {
                last_tick = Some(*tick);
            }
            self.tally.observe(event);
        }

        if let Some(tick) = last_tick {
            self.series.push(PopulationSample::from_census(tick, census));
        }
    }

    /// Population series recorded so far, oldest first.
    #[must_use]
    pub fn series(&self) -> &[PopulationSample] {
        &self.series
    }

    /// Totals of the events observed so far.
    #[must_use]
    pub fn tally(&self) -> EventTally {
        self.tally
    }
}
