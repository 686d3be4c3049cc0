use crate::chart::sample::Sample;
use crate::error::ChartError;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

/// One CSV row: `time,value,category` with `time` in milliseconds relative
/// to the start of the recording.
#[derive(Debug, Deserialize)]
struct ReplayRow {
    time: i64,
    value: f64,
    category: String,
}

/// Reads a recording, sorted by relative time.
pub fn read_recording<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>, ChartError> {
    read_recording_from(File::open(path)?)
}

pub fn read_recording_from<R: Read>(reader: R) -> Result<Vec<Sample>, ChartError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ReplayRow = result?;
        rows.push(Sample::new(row.time, row.value, row.category));
    }
    rows.sort_by_key(|s| s.time);
    Ok(rows)
}

/// Feeds a recording in real time, starting at `start_ms` on the wall clock.
pub struct Replay {
    rows: Vec<Sample>,
    cursor: usize,
    start_ms: i64,
}

impl Replay {
    pub fn new(rows: Vec<Sample>, start_ms: i64) -> Self {
        Self {
            rows,
            cursor: 0,
            start_ms,
        }
    }

    /// Rows due by `elapsed_ms`, re-stamped onto the wall clock.
    pub fn due(&mut self, elapsed_ms: i64) -> Vec<Sample> {
        let remaining = &self.rows[self.cursor..];
        let count = remaining.partition_point(|s| s.time <= elapsed_ms);
        let batch = remaining[..count]
            .iter()
            .map(|s| Sample::new(self.start_ms + s.time, s.value, s.category.clone()))
            .collect();
        self.cursor += count;
        batch
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.rows.len()
    }
}

pub fn spawn_replay(
    rows: Vec<Sample>,
    feed: Sender<Vec<Sample>>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let started = Instant::now();
        let mut replay = Replay::new(rows, chrono::Utc::now().timestamp_millis());
        info!("replaying {} rows", replay.rows.len());

        while !replay.is_finished() {
            let batch = replay.due(started.elapsed().as_millis() as i64);
            if !batch.is_empty() && feed.send(batch).is_err() {
                warn!("chart closed, replay stopped");
                return;
            }
            thread::sleep(interval);
        }
        info!("replay finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = "time,value,category
1000,2.5,cell_voltage
0,1.5,cell_voltage
0, 30.0 ,AVG_cell_voltage
2500,3.5,cell_voltage
";

    #[test]
    fn rows_are_sorted_by_time() {
        let rows = read_recording_from(RECORDING.as_bytes()).unwrap();
        let times: Vec<i64> = rows.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0, 0, 1000, 2500]);
        assert_eq!(rows[1].value, 30.0);
    }

    #[test]
    fn malformed_rows_are_reported() {
        let result = read_recording_from("time,value,category\nsoon,1.0,a\n".as_bytes());
        assert!(matches!(result, Err(ChartError::Csv(_))));
    }

    #[test]
    fn due_rows_are_restamped_once() {
        let rows = read_recording_from(RECORDING.as_bytes()).unwrap();
        let mut replay = Replay::new(rows, 1_000_000);

        let first = replay.due(999);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].time, 1_000_000);

        let second = replay.due(2_000);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].time, 1_001_000);
        assert!(!replay.is_finished());

        assert_eq!(replay.due(10_000).len(), 1);
        assert!(replay.is_finished());
        assert!(replay.due(20_000).is_empty());
    }
}
