// src/visualization/plotter.rs

use crate::chart::frame::{Frame, PathFrame};
use crate::chart::tooltip::Tooltip;
use egui::{Align2, Color32};
use egui_plot::{Line, PlotBounds, PlotPoint, PlotPoints, PlotUi, Text, VLine};

const AXIS_COLOR: Color32 = Color32::GRAY;
const BRUSH_COLOR: Color32 = Color32::LIGHT_BLUE;

/// `#RRGGBB` or `RRGGBB`.
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn faded(color: Color32, opacity: f64) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Draws a [`Frame`] into plot space. Plot x is the frame's pixel x, plot y
/// is measured upwards from the bottom of the graph area.
pub struct FramePlotter<'a> {
    frame: &'a Frame,
    left_gutter: f64,
    bottom_gutter: f64,
}

impl<'a> FramePlotter<'a> {
    pub fn new(frame: &'a Frame, left_gutter: f64, bottom_gutter: f64) -> Self {
        Self {
            frame,
            left_gutter,
            bottom_gutter,
        }
    }

    pub fn bounds(&self) -> PlotBounds {
        PlotBounds::from_min_max(
            [-self.left_gutter, -self.bottom_gutter],
            [self.frame.graph_width, self.frame.graph_height],
        )
    }

    fn to_plot(&self, point: &[f64; 2]) -> [f64; 2] {
        [point[0], self.frame.graph_height - point[1]]
    }

    pub fn draw(&self, plot_ui: &mut PlotUi) {
        plot_ui.set_plot_bounds(self.bounds());
        for path in self.frame.retiring.iter().chain(self.frame.paths.iter()) {
            self.draw_path(plot_ui, path);
        }
        self.draw_axes(plot_ui);
    }

    /// Points outside the graph area are dropped.
    fn draw_path(&self, plot_ui: &mut PlotUi, path: &PathFrame) {
        let Some(color) = parse_hex_color(&path.color) else {
            return;
        };
        let points: Vec<[f64; 2]> = path
            .points
            .iter()
            .filter(|p| (0.0..=self.frame.graph_width).contains(&p[0]))
            .map(|p| self.to_plot(p))
            .collect();
        if points.is_empty() {
            return;
        }
        plot_ui.line(
            Line::new(PlotPoints::from(points))
                .color(faded(color, path.opacity))
                .width(path.stroke_width as f32)
                .name(&path.key),
        );
    }

    fn draw_axes(&self, plot_ui: &mut PlotUi) {
        let color = faded(AXIS_COLOR, self.frame.axis_opacity);
        plot_ui.line(
            Line::new(PlotPoints::from(vec![
                [0.0, 0.0],
                [self.frame.graph_width, 0.0],
            ]))
            .color(color),
        );
        plot_ui.line(
            Line::new(PlotPoints::from(vec![
                [0.0, 0.0],
                [0.0, self.frame.graph_height],
            ]))
            .color(AXIS_COLOR),
        );

        for tick in &self.frame.time_ticks {
            if !(0.0..=self.frame.graph_width).contains(&tick.position) {
                continue;
            }
            plot_ui.text(
                Text::new(PlotPoint::new(tick.position, -4.0), tick.label.as_str())
                    .color(color)
                    .anchor(Align2::CENTER_TOP),
            );
        }
        for tick in &self.frame.value_ticks {
            plot_ui.text(
                Text::new(
                    PlotPoint::new(-4.0, self.frame.graph_height - tick.position),
                    tick.label.as_str(),
                )
                .color(AXIS_COLOR)
                .anchor(Align2::RIGHT_CENTER),
            );
        }
    }

    pub fn draw_brush(&self, plot_ui: &mut PlotUi, (x0, x1): (f64, f64)) {
        let top = self.frame.graph_height;
        plot_ui.line(
            Line::new(PlotPoints::from(vec![
                [x0, 0.0],
                [x0, top],
                [x1, top],
                [x1, 0.0],
                [x0, 0.0],
            ]))
            .color(BRUSH_COLOR),
        );
    }

    pub fn draw_tooltip(&self, plot_ui: &mut PlotUi, tooltip: &Tooltip) {
        plot_ui.vline(VLine::new(tooltip.guide_x).color(AXIS_COLOR).width(1.0));
        let anchor = if tooltip.guide_x > self.frame.graph_width / 2.0 {
            Align2::RIGHT_TOP
        } else {
            Align2::LEFT_TOP
        };
        let offset = if anchor == Align2::RIGHT_TOP { -6.0 } else { 6.0 };
        plot_ui.text(
            Text::new(
                PlotPoint::new(tooltip.guide_x + offset, self.frame.graph_height),
                tooltip.lines.join("\n"),
            )
            .anchor(anchor),
        );
    }
}
