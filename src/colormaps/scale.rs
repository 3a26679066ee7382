//! Linear value-to-color scale.

use colorgrad::Color;

use super::colormap::{format_hex, get_colormap, normalize, Colormap, LabColormap};
use crate::error::Result;
use crate::statistics::Extremes;

/// Maps a numeric domain onto a two-color colormap.
///
/// `f(min)` is the start color and `f(max)` the end color. Values outside the
/// domain extrapolate unless clamping is enabled.
pub struct LinearColorScale {
    domain: Extremes,
    colormap: Box<dyn Colormap>,
    clamp: bool,
}

impl LinearColorScale {
    /// Build a scale interpolating in the named color space (`"lab"`, `"rgb"`)
    pub fn new(domain: Extremes, start: Color, end: Color, interpolation: &str) -> Result<Self> {
        Ok(Self {
            domain,
            colormap: get_colormap(interpolation, start, end)?,
            clamp: false,
        })
    }

    /// Lab scale over `extremes`, or over [`Extremes::DEFAULT`] when there are none
    pub fn from_extremes(extremes: Option<Extremes>, start: Color, end: Color) -> Self {
        Self {
            domain: extremes.unwrap_or_default(),
            colormap: Box::new(LabColormap::new(start, end)),
            clamp: false,
        }
    }

    /// Restrict output to the endpoint colors for out-of-domain values
    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain(&self) -> Extremes {
        self.domain
    }

    pub fn interpolation(&self) -> &str {
        self.colormap.name()
    }

    /// Position of `value` along the scale (0 at min, 1 at max)
    pub fn position(&self, value: f64) -> f64 {
        let t = normalize(value, self.domain.min, self.domain.max);
        if self.clamp {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }

    pub fn color(&self, value: f64) -> Color {
        self.colormap.map_normalized(self.position(value))
    }

    /// Color as `#rrggbb`
    pub fn hex(&self, value: f64) -> String {
        format_hex(&self.color(value))
    }
}

impl std::fmt::Debug for LinearColorScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearColorScale")
            .field("domain", &self.domain)
            .field("interpolation", &self.colormap.name())
            .field("clamp", &self.clamp)
            .finish()
    }
}
