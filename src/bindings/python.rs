use crate::chart::sample::Sample;
use crate::chart::TelemetryChart;
use crate::config::ChartConfig;
use crate::error::ChartError;

use std::collections::HashMap;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

impl From<ChartError> for PyErr {
    fn from(err: ChartError) -> PyErr {
        match err {
            ChartError::Io(_) => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Python handle on one chart, driven by the system clock.
#[pyclass(unsendable, name = "TelemetryChart")]
pub struct PyTelemetryChart {
    chart: TelemetryChart,
}

#[pymethods]
impl PyTelemetryChart {
    #[new]
    #[pyo3(signature = (id, width, config_yaml=None))]
    pub fn new(id: String, width: f64, config_yaml: Option<String>) -> PyResult<Self> {
        let mut config = ChartConfig {
            id,
            width,
            ..ChartConfig::default()
        };
        if let Some(yaml) = config_yaml {
            config.merge_yaml(&yaml).map_err(ChartError::from)?;
        }
        Ok(PyTelemetryChart {
            chart: TelemetryChart::new(config)?,
        })
    }

    /// Samples as `(time_ms, value, category)` tuples.
    pub fn update(&mut self, samples: Vec<(i64, f64, String)>) {
        self.chart.update(
            samples
                .into_iter()
                .map(|(time, value, category)| Sample::new(time, value, category)),
        );
    }

    pub fn pause(&mut self) {
        self.chart.pause();
    }

    pub fn resume(&mut self) {
        self.chart.resume();
    }

    pub fn rewind(&mut self) {
        self.chart.rewind();
    }

    pub fn resize_chart(&mut self, expanded: bool) {
        self.chart.resize_chart(expanded);
    }

    pub fn wipe_data(&mut self) {
        self.chart.wipe_data();
    }

    pub fn update_config(&mut self, overrides: String) -> PyResult<()> {
        Ok(self.chart.update_config_yaml(&overrides)?)
    }

    pub fn brush(&mut self, x0: f64, x1: f64) -> bool {
        self.chart.on_brush_end(Some((x0, x1)))
    }

    pub fn double_click(&mut self) {
        self.chart.on_double_click();
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.chart.on_visibility_change(hidden);
    }

    /// Returns the cycle state after completing any due transition.
    pub fn advance(&mut self) -> String {
        format!("{:?}", self.chart.advance())
    }

    pub fn tooltip(&self, x: f64) -> Option<Vec<String>> {
        self.chart.tooltip(x).map(|t| t.lines)
    }

    #[getter]
    pub fn is_animating(&self) -> bool {
        self.chart.is_animating()
    }

    #[getter]
    pub fn window(&self) -> (i64, i64) {
        let window = self.chart.window();
        (window.start_time(), window.end_time())
    }

    #[getter]
    pub fn flags(&self) -> HashMap<String, bool> {
        let flags = self.chart.flags();
        HashMap::from([
            ("zoomed_in".to_string(), flags.zoomed_in),
            ("hidden".to_string(), flags.hidden),
            ("external_stop".to_string(), flags.external_stop),
            ("rewound".to_string(), flags.rewound),
        ])
    }
}

#[pymodule]
pub fn telemetry_chart(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTelemetryChart>()?;
    Ok(())
}
