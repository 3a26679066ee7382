//! Color scales for choropleth shading.
//!
//! Values are mapped onto a two-color ramp, blended in CIELAB by default.

pub mod colormap;
pub mod lab;
pub mod legend;
pub mod scale;

pub use colormap::{format_hex, get_colormap, parse_color, Colormap, LabColormap, RgbColormap};
pub use lab::Lab;
pub use legend::{build_legend, Classification, Legend, LegendEntry};
pub use scale::LinearColorScale;
