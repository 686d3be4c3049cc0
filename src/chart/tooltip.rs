use super::buffer::SeriesBuffer;
use super::scale::TimeScale;
use chrono::{Local, TimeZone};

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub key: String,
    pub label: String,
    pub value: f64,
}

/// Readout for the sample nearest the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub time: i64,
    /// Index shared by every series.
    pub index: usize,
    /// Pixel x of the guide line.
    pub guide_x: f64,
    /// `TimeStamp: HH:MM:SS` followed by `key: value` lines in key order.
    pub lines: Vec<String>,
    pub rows: Vec<TooltipRow>,
}

/// Finds the sample closest to pixel `x` on the reference series and reads
/// every series at that index.
///
/// Assumes all series share the reference series' timestamps; this is not
/// checked, and series too short for the index are skipped. Returns `None`
/// when the cursor resolves to the first sample or there is no data.
pub fn hit_test(buffer: &SeriesBuffer, scale: &TimeScale, x: f64) -> Option<Tooltip> {
    let cursor_time = scale.invert(x);
    let (_, reference) = buffer.reference()?;
    if reference.is_empty() {
        return None;
    }

    let mut index = reference.partition_point(|s| (s.time as f64) < cursor_time);
    if index == 0 {
        return None;
    }
    if index == reference.len() {
        index -= 1;
    } else {
        let left = (reference[index - 1].time as f64 - cursor_time).abs();
        let right = (reference[index].time as f64 - cursor_time).abs();
        if left <= right {
            index -= 1;
        }
    }

    let time = reference[index].time;
    let mut rows: Vec<TooltipRow> = buffer
        .iter()
        .filter_map(|(key, samples)| {
            samples.get(index).map(|sample| TooltipRow {
                key: key.to_string(),
                label: display_label(key),
                value: sample.value,
            })
        })
        .collect();

    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| format!("{}: {:.2}", row.key, row.value))
        .collect();
    lines.sort();
    lines.insert(0, format!("TimeStamp: {}", format_clock(time)));
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    Some(Tooltip {
        time,
        index,
        guide_x: scale.map(time as f64),
        lines,
        rows,
    })
}

/// `AVG_cell_voltage` reads as `Avg. cell voltage`.
pub fn display_label(key: &str) -> String {
    let title = key.replace('_', " ");
    match title.strip_prefix("AVG") {
        Some(rest) => format!("Avg. {}", rest.trim_start()),
        None => title,
    }
}

pub fn format_clock(time: i64) -> String {
    Local
        .timestamp_millis_opt(time)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}
