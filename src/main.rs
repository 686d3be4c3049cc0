use log::{error, LevelFilter};
use std::sync::mpsc;
use std::time::Duration;
use telemetry_chart::chart::TelemetryChart;
use telemetry_chart::config::{load_config, ChartConfig};
use telemetry_chart::error::ChartError;
use telemetry_chart::local::{replay, simulate};
use telemetry_chart::utils::log as chart_log;
use telemetry_chart::visualization::window::ChartWindow;
use telemetry_chart::visualization::VisualizationConfig;

const USAGE: &str = "usage: main simulate [series...] [--config chart.yaml]
       main replay <file.csv> [--config chart.yaml]";

fn chart_config(args: &mut Vec<String>) -> Result<ChartConfig, ChartError> {
    let mut config = match args.iter().position(|a| a == "--config") {
        Some(index) if index + 1 < args.len() => {
            let path = args.remove(index + 1);
            args.remove(index);
            load_config(path)?
        }
        _ => ChartConfig::default(),
    };
    if config.id.is_empty() {
        config.id = "telemetry".to_string();
    }
    Ok(config)
}

fn run(mut args: Vec<String>) -> Result<(), ChartError> {
    let config = chart_config(&mut args)?;
    let visualization = VisualizationConfig::default();
    let interval = Duration::from_millis(visualization.feed_interval_ms);
    let (tx, rx) = mpsc::channel();

    match args.first().map(String::as_str) {
        Some("simulate") => {
            let mut series: Vec<String> = args[1..].to_vec();
            if series.is_empty() {
                series = vec!["cell_voltage".to_string(), "AVG_cell_voltage".to_string()];
            }
            simulate::spawn_simulation(series, (config.y_min_val, config.y_max_val), tx, interval);
        }
        Some("replay") => {
            let Some(path) = args.get(1) else {
                println!("{}", USAGE);
                return Ok(());
            };
            let rows = replay::read_recording(path)?;
            replay::spawn_replay(rows, tx, interval);
        }
        _ => {
            println!("{}", USAGE);
            return Ok(());
        }
    }

    let chart = TelemetryChart::new(config)?;
    if let Err(e) = ChartWindow::run(chart, rx, visualization) {
        error!("visualization window error: {}", e);
    }
    Ok(())
}

fn main() {
    if let Err(e) = chart_log::init(LevelFilter::Info, Some("telemetry.log")) {
        eprintln!("logging unavailable: {}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
