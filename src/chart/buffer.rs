use super::sample::Sample;
use indexmap::IndexMap;
use log::debug;

/// Per-series sample storage, each series ordered by time.
///
/// Series keep their first-insertion order; the first series is the
/// reference axis for hit-testing.
#[derive(Debug, Default, Clone)]
pub struct SeriesBuffer {
    series: IndexMap<String, Vec<Sample>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: usize,
    pub drained_series: usize,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the sorted position, so late arrivals land where they belong.
    /// Equal timestamps go after the samples already stored.
    pub fn insert(&mut self, sample: Sample) {
        match self.series.get_mut(&sample.category) {
            None => {
                self.series.insert(sample.category.clone(), vec![sample]);
            }
            Some(samples) => {
                let index = samples.partition_point(|s| s.time <= sample.time);
                samples.insert(index, sample);
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        for sample in samples {
            self.insert(sample);
        }
    }

    /// Drops every sample older than `expanded_limit_secs` relative to `now`.
    /// Emptied series stay in the map.
    pub fn prune(&mut self, now: i64, expanded_limit_secs: f64) -> PruneReport {
        let max_age = expanded_limit_secs * 1000.0;
        let mut report = PruneReport::default();

        for (key, samples) in self.series.iter_mut() {
            if samples.is_empty() {
                continue;
            }
            let keep_from = samples.partition_point(|s| (now - s.time) as f64 > max_age);
            if keep_from == 0 {
                continue;
            }
            samples.drain(..keep_from);
            report.removed += keep_from;
            if samples.is_empty() {
                report.drained_series += 1;
                debug!("series `{}` emptied by pruning", key);
            }
        }

        report
    }

    pub fn wipe(&mut self) {
        self.series.clear();
    }

    pub fn get(&self, key: &str) -> Option<&[Sample]> {
        self.series.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The series every hit-test index is resolved against.
    pub fn reference(&self) -> Option<(&str, &[Sample])> {
        self.series
            .get_index(0)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn sample_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    pub fn time_range(&self) -> Option<(i64, i64)> {
        let first = self.series.values().filter_map(|s| s.first()).map(|s| s.time).min()?;
        let last = self.series.values().filter_map(|s| s.last()).map(|s| s.time).max()?;
        Some((first, last))
    }
}
