use crate::chart::sample::Sample;
use log::{info, warn};
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

const AVERAGE_WINDOW: usize = 10;

/// Bounded random walk for one series.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    value: f64,
    min: f64,
    max: f64,
    max_step: f64,
}

impl RandomWalk {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            value: (min + max) / 2.0,
            min,
            max,
            max_step: (max - min) / 50.0,
        }
    }

    pub fn step<R: Rng>(&mut self, rng: &mut R) -> f64 {
        if self.max_step > 0.0 {
            self.value += rng.gen_range(-self.max_step..=self.max_step);
        }
        self.value = self.value.clamp(self.min, self.max);
        self.value
    }
}

/// Produces one aligned sample per series per step. A series named
/// `AVG_<name>` carries the moving average of `<name>`.
pub struct Simulator {
    walks: Vec<(String, RandomWalk)>,
    averages: Vec<(String, String)>,
    history: HashMap<String, VecDeque<f64>>,
}

impl Simulator {
    pub fn new(series: &[String], min: f64, max: f64) -> Self {
        let mut walks = Vec::new();
        let mut averages = Vec::new();
        for name in series {
            match name.strip_prefix("AVG_") {
                Some(base) if series.iter().any(|s| s == base) => {
                    averages.push((name.clone(), base.to_string()))
                }
                _ => walks.push((name.clone(), RandomWalk::new(min, max))),
            }
        }
        Self {
            walks,
            averages,
            history: HashMap::new(),
        }
    }

    pub fn next_batch<R: Rng>(&mut self, now: i64, rng: &mut R) -> Vec<Sample> {
        let mut batch = Vec::with_capacity(self.walks.len() + self.averages.len());
        for (name, walk) in self.walks.iter_mut() {
            let value = walk.step(rng);
            let history = self.history.entry(name.clone()).or_default();
            history.push_back(value);
            if history.len() > AVERAGE_WINDOW {
                history.pop_front();
            }
            batch.push(Sample::new(now, value, name.as_str()));
        }
        for (name, base) in &self.averages {
            if let Some(history) = self.history.get(base) {
                let mean = history.iter().sum::<f64>() / history.len().max(1) as f64;
                batch.push(Sample::new(now, mean, name.as_str()));
            }
        }
        batch
    }
}

pub fn spawn_simulation(
    series: Vec<String>,
    range: (f64, f64),
    feed: Sender<Vec<Sample>>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut simulator = Simulator::new(&series, range.0, range.1);
        let mut rng = rand::thread_rng();
        info!("simulating {:?}", series);

        loop {
            let now = chrono::Utc::now().timestamp_millis();
            if feed.send(simulator.next_batch(now, &mut rng)).is_err() {
                warn!("chart closed, simulation stopped");
                return;
            }
            thread::sleep(interval);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn walk_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut walk = RandomWalk::new(0.0, 70.0);
        for _ in 0..10_000 {
            let value = walk.step(&mut rng);
            assert!((0.0..=70.0).contains(&value));
        }
    }

    #[test]
    fn average_series_follow_their_base() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = vec!["temp".to_string(), "AVG_temp".to_string()];
        let mut simulator = Simulator::new(&series, 0.0, 70.0);

        let first = simulator.next_batch(1_000, &mut rng);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].category, "temp");
        assert_eq!(first[1].category, "AVG_temp");
        assert_eq!(first[1].value, first[0].value);
        assert!(first.iter().all(|s| s.time == 1_000));
    }

    #[test]
    fn orphan_average_is_walked() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = vec!["AVG_load".to_string()];
        let mut simulator = Simulator::new(&series, 0.0, 70.0);
        assert_eq!(simulator.next_batch(0, &mut rng).len(), 1);
    }
}
