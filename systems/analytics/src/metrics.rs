//! Summary metrics derived from a population series.

use crate::PopulationSample;

/// Largest population observed for one species and the tick it occurred at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Peak {
    /// Tick of the first sample that reached the peak.
    pub tick: u64,
    /// Population at the peak.
    pub population: usize,
}

/// Digest of a population series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PopulationSummary {
    /// Number of ticks covered by the series.
    pub ticks: u64,
    /// Last recorded sample.
    pub last: PopulationSample,
    /// Prey peak.
    pub prey_peak: Peak,
    /// Predator peak.
    pub predator_peak: Peak,
    /// First tick at which no prey remained, if any.
    pub prey_extinct_at: Option<u64>,
    /// First tick at which no predator remained, if any.
    pub predators_extinct_at: Option<u64>,
}

/// Summarises the series, or returns `None` when nothing was recorded.
#[must_use]
pub fn summarize(series: &[PopulationSample]) -> Option<PopulationSummary> {
    let first = series.first()?;
    let last = *series.last()?;

    Some(PopulationSummary {
        ticks: last.tick.saturating_sub(first.tick),
        last,
        prey_peak: peak(series, |sample| sample.prey)?,
        predator_peak: peak(series, |sample| sample.predators)?,
        prey_extinct_at: extinction(series, |sample| sample.prey),
        predators_extinct_at: extinction(series, |sample| sample.predators),
    })
}

fn peak(
    series: &[PopulationSample],
    population: impl Fn(&PopulationSample) -> usize,
) -> Option<Peak> {
    series.iter().fold(None, |best: Option<Peak>, sample| {
        let value = population(sample);
        match best {
            Some(current) if current.population >= value => Some(current),
            _ => Some(Peak {
                tick: sample.tick,
                population: value,
            }),
        }
    })
}

fn extinction(
    series: &[PopulationSample],
    population: impl Fn(&PopulationSample) -> usize,
) -> Option<u64> {
    series
        .iter()
        .find(|sample| population(*sample) == 0)
        .map(|sample| sample.tick)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64, prey: usize, predators: usize) -> PopulationSample {
        PopulationSample {
            tick,
            prey,
            predators,
        }
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn peaks_keep_the_earliest_maximum() {
        let series = [
            sample(0, 4, 2),
            sample(1, 9, 2),
            sample(2, 9, 5),
            sample(3, 0, 5),
        ];

        let summary = summarize(&series).expect("non-empty series");

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.last, sample(3, 0, 5));
        assert_eq!(
            summary.prey_peak,
            Peak {
                tick: 1,
                population: 9
            }
        );
        assert_eq!(
            summary.predator_peak,
            Peak {
                tick: 2,
                population: 5
            }
        );
        assert_eq!(summary.prey_extinct_at, Some(3));
        assert_eq!(summary.predators_extinct_at, None);
    }
}
