//! Colormap trait and utilities.
//!
//! A colormap blends between two endpoint colors for a normalized position.
//! Positions outside [0, 1] extrapolate along the same path.

use colorgrad::Color;

use super::lab::Lab;
use crate::error::{ChoroplethError, Result};

/// Trait for two-color blending implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized position to a color; 0 is the start, 1 the end
    fn map_normalized(&self, t: f64) -> Color;

    /// Map a value to a color given the data range (no clamping)
    fn map(&self, value: f64, min: f64, max: f64) -> Color {
        self.map_normalized(normalize(value, min, max))
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Position of `value` within `[min, max]`; a zero-width range maps to 0
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        0.0
    } else {
        (value - min) / span
    }
}

/// Blend in CIELAB
pub struct LabColormap {
    start: Color,
    end: Color,
    start_lab: Lab,
    end_lab: Lab,
}

impl LabColormap {
    pub fn new(start: Color, end: Color) -> Self {
        let start_lab = Lab::from_color(&start);
        let end_lab = Lab::from_color(&end);
        Self {
            start,
            end,
            start_lab,
            end_lab,
        }
    }

    /// The Lab coordinates at position `t`
    pub fn lab_at(&self, t: f64) -> Lab {
        self.start_lab.lerp(&self.end_lab, t)
    }
}

impl Colormap for LabColormap {
    fn map_normalized(&self, t: f64) -> Color {
        // Endpoints are returned as given so they survive formatting exactly
        if t == 0.0 {
            return self.start.clone();
        }
        if t == 1.0 {
            return self.end.clone();
        }
        let alpha = self.start.a + (self.end.a - self.start.a) * t;
        self.lab_at(t).to_color(alpha.clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "lab"
    }
}

/// Blend channel by channel in sRGB
pub struct RgbColormap {
    start: Color,
    end: Color,
}

impl RgbColormap {
    pub fn new(start: Color, end: Color) -> Self {
        Self { start, end }
    }
}

impl Colormap for RgbColormap {
    fn map_normalized(&self, t: f64) -> Color {
        if t == 0.0 {
            return self.start.clone();
        }
        if t == 1.0 {
            return self.end.clone();
        }
        lerp_color(&self.start, &self.end, t)
    }

    fn name(&self) -> &str {
        "rgb"
    }
}

/// Get a colormap by interpolation name
pub fn get_colormap(name: &str, start: Color, end: Color) -> Result<Box<dyn Colormap>> {
    match name.to_lowercase().as_str() {
        "lab" => Ok(Box::new(LabColormap::new(start, end))),
        "rgb" => Ok(Box::new(RgbColormap::new(start, end))),
        _ => Err(ChoroplethError::InvalidParameter {
            param: "interpolation".to_string(),
            message: format!("Unknown interpolation: {}", name),
        }),
    }
}

/// Linear interpolation between two colors, clamped to the gamut
pub fn lerp_color(c1: &Color, c2: &Color, t: f64) -> Color {
    let mix = |a: f64, b: f64| (a * (1.0 - t) + b * t).clamp(0.0, 1.0);
    Color::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b), mix(c1.a, c2.a))
}

/// Format as `#rrggbb`, rounding each channel
pub fn format_hex(color: &Color) -> String {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// Parse any CSS color string
pub fn parse_color(value: &str) -> Result<Color> {
    Color::from_html(value).map_err(|e| ChoroplethError::InvalidColor {
        value: value.to_string(),
        message: e.to_string(),
    })
}
