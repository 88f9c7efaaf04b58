//! The four render modes.
//!
//! Each mode is a pure function from the magnitude snapshot plus canvas
//! dimensions to drawing shapes in a y-up coordinate space; the UI paints
//! the shapes on a ratatui canvas. Modes share no state, so switching is
//! just rendering with a different function on the next tick.

use ratatui::style::Color;

use super::sampler::{BANDS, MAG_MAX};

/// The accent used by the monochrome modes.
const ACCENT: Color = Color::Rgb(0, 234, 255);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VizMode {
    #[default]
    Bars,
    Circle,
    Wave,
    Spectrum,
}

impl VizMode {
    pub fn cycle(self) -> Self {
        match self {
            Self::Bars => Self::Circle,
            Self::Circle => Self::Wave,
            Self::Wave => Self::Spectrum,
            Self::Spectrum => Self::Bars,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Circle => "circle",
            Self::Wave => "wave",
            Self::Spectrum => "spectrum",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Segment {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
    },
}

/// Render the snapshot in the given mode onto a `width` × `height` canvas.
pub fn render(mode: VizMode, levels: &[f32; BANDS], width: f64, height: f64) -> Vec<Shape> {
    match mode {
        VizMode::Bars => bars(levels, width, height),
        VizMode::Circle => circle(levels, width, height),
        VizMode::Wave => wave(levels, width, height),
        VizMode::Spectrum => spectrum(levels, width, height),
    }
}

fn fraction(level: f32) -> f64 {
    (level.clamp(0.0, MAG_MAX) / MAG_MAX) as f64
}

/// One rectangle per band rising from the floor, 80% of the band slot wide.
fn bars(levels: &[f32; BANDS], width: f64, height: f64) -> Vec<Shape> {
    let slot = width / BANDS as f64;
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| Shape::Rect {
            x: i as f64 * slot,
            y: 0.0,
            width: slot * 0.8,
            height: fraction(level) * height * 0.9,
            color: ACCENT,
        })
        .collect()
}

/// Radial segments from a base ring outward, one per band.
fn circle(levels: &[f32; BANDS], width: f64, height: f64) -> Vec<Shape> {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let radius = width.min(height) / 2.0 * 0.8;

    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / BANDS as f64;
            let length = fraction(level) * radius * 0.5;
            Shape::Segment {
                x1: cx + angle.cos() * radius,
                y1: cy + angle.sin() * radius,
                x2: cx + angle.cos() * (radius + length),
                y2: cy + angle.sin() * (radius + length),
                color: ACCENT,
            }
        })
        .collect()
}

/// A single connected polyline across all bands around mid-height.
fn wave(levels: &[f32; BANDS], width: f64, height: f64) -> Vec<Shape> {
    let mid = height / 2.0;
    let mut points = Vec::with_capacity(BANDS + 1);
    points.push((0.0, mid));
    for (i, &level) in levels.iter().enumerate() {
        let x = i as f64 / BANDS as f64 * width;
        let y = mid + fraction(level) * height * 0.4;
        points.push((x, y));
    }
    vec![Shape::Polyline {
        points,
        color: ACCENT,
    }]
}

/// Bars with the hue interpolated over a fixed range by band index: a
/// frequency-to-color gradient.
fn spectrum(levels: &[f32; BANDS], width: f64, height: f64) -> Vec<Shape> {
    let slot = width / BANDS as f64;
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| {
            let hue = i as f32 / BANDS as f32 * 240.0;
            Shape::Rect {
                x: i as f64 * slot,
                y: 0.0,
                width: slot * 0.9,
                height: fraction(level) * height,
                color: hsb_color(hue, 0.8, 1.0),
            }
        })
        .collect()
}

/// HSB to an RGB terminal color. `hue` in degrees, `saturation` and
/// `brightness` in `[0, 1]`.
fn hsb_color(hue: f32, saturation: f32, brightness: f32) -> Color {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let c = brightness * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = brightness - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color::Rgb(
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}
