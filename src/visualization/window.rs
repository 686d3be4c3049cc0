// src/visualization/window.rs

use super::plotter::FramePlotter;
use super::VisualizationConfig;
use crate::chart::sample::Sample;
use crate::chart::TelemetryChart;
use eframe::egui;
use egui_plot::Plot;
use log::debug;
use std::sync::mpsc::Receiver;

/// Native window hosting one chart fed from a channel.
pub struct ChartWindow {
    chart: TelemetryChart,
    feed: Receiver<Vec<Sample>>,
    config: VisualizationConfig,
    expanded: bool,
    /// Pixel extent of the brush being dragged.
    brush: Option<(f64, f64)>,
}

impl ChartWindow {
    pub fn new(
        chart: TelemetryChart,
        feed: Receiver<Vec<Sample>>,
        config: VisualizationConfig,
    ) -> Self {
        Self {
            chart,
            feed,
            config,
            expanded: false,
            brush: None,
        }
    }

    pub fn run(
        chart: TelemetryChart,
        feed: Receiver<Vec<Sample>>,
        config: VisualizationConfig,
    ) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.window_width as f32, config.window_height as f32])
                .with_title(config.title.clone()),
            ..Default::default()
        };
        let app_name = config.title.clone();

        eframe::run_native(
            &app_name,
            options,
            Box::new(|_cc| Ok(Box::new(ChartWindow::new(chart, feed, config)))),
        )
    }

    fn drain_feed(&mut self) {
        let mut batches = 0;
        while let Ok(batch) = self.feed.try_recv() {
            self.chart.update(batch);
            batches += 1;
        }
        if batches > 1 {
            debug!("caught up on {} batches", batches);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Start").clicked() {
                self.chart.resume();
            }
            if ui.button("Stop").clicked() {
                self.chart.pause();
            }
            if ui.button("Rewind").clicked() {
                self.chart.rewind();
            }
            let resize_label = if self.expanded { "Collapse" } else { "Expand" };
            if ui.button(resize_label).clicked() {
                self.expanded = !self.expanded;
                self.chart.resize_chart(self.expanded);
            }
            if ui.button("Wipe").clicked() {
                self.chart.wipe_data();
            }

            ui.separator();
            let window = self.chart.window();
            ui.label(format!(
                "{} s window, {} samples",
                (window.end_time() - window.start_time()) / 1000,
                self.chart.buffer().sample_count()
            ));
        });
    }

    fn plot(&mut self, ui: &mut egui::Ui) {
        let frame = self.chart.frame();
        let chart_config = self.chart.config();
        let plotter = FramePlotter::new(
            &frame,
            chart_config.margin.left,
            chart_config.dimension.x_axis + chart_config.margin.bottom,
        );
        let chart = &self.chart;
        let brush = self.brush;
        let show_tooltip = self.config.show_tooltip;

        let response = Plot::new("telemetry_chart")
            .show_axes([false, false])
            .show_grid([false, false])
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                plotter.draw(plot_ui);
                let pointer = plot_ui.pointer_coordinate();
                match (brush, pointer) {
                    (Some(extent), _) => plotter.draw_brush(plot_ui, extent),
                    (None, Some(point)) if show_tooltip => {
                        if let Some(tooltip) = chart.tooltip(point.x) {
                            plotter.draw_tooltip(plot_ui, &tooltip);
                        }
                    }
                    _ => {}
                }
                pointer.map(|p| p.x.clamp(0.0, frame.graph_width))
            });

        let pointer_x = response.inner;
        let response = response.response;
        if response.double_clicked() {
            self.brush = None;
            self.chart.on_double_click();
        } else if response.drag_started() {
            self.brush = pointer_x.map(|x| (x, x));
        } else if response.dragged() {
            if let (Some(brush), Some(x)) = (self.brush.as_mut(), pointer_x) {
                brush.1 = x;
            }
        }
        if response.drag_stopped() {
            let selection = self.brush.take().filter(|(x0, x1)| (x0 - x1).abs() >= 1.0);
            self.chart.on_brush_end(selection);
        }
    }
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        let minimized = ctx.input(|i| i.viewport().minimized).unwrap_or(false);
        self.chart.set_container_hidden(minimized);
        self.drain_feed();
        self.chart.advance();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.plot(ui));
    }
}
