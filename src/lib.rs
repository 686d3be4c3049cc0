pub mod chart;
pub mod config;
pub mod error;
pub mod local;
pub mod utils;

#[cfg(feature = "visualization")]
pub mod visualization;

#[cfg(feature = "python")]
pub mod bindings {
    pub mod python;
}

pub use chart::sample::Sample;
pub use chart::TelemetryChart;
pub use config::ChartConfig;
pub use error::ChartError;
