//! CIELAB conversions (D65 white point).
//!
//! Interpolating in Lab rather than sRGB keeps equal numeric steps visually
//! equal, which is what a reader of a choropleth expects.

use colorgrad::Color;

const WHITE_X: f64 = 0.950470;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088830;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// A color in CIELAB space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn from_color(color: &Color) -> Self {
        let r = srgb_to_linear(color.r);
        let g = srgb_to_linear(color.g);
        let b = srgb_to_linear(color.b);

        let x = xyz_to_lab((0.4124564 * r + 0.3575761 * g + 0.1804375 * b) / WHITE_X);
        let y = xyz_to_lab((0.2126729 * r + 0.7151522 * g + 0.0721750 * b) / WHITE_Y);
        let z = xyz_to_lab((0.0193339 * r + 0.1191920 * g + 0.9503041 * b) / WHITE_Z);

        Lab {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }

    /// Back to sRGB; channels outside the gamut are clamped
    pub fn to_color(&self, alpha: f64) -> Color {
        let y = (self.l + 16.0) / 116.0;
        let x = y + self.a / 500.0;
        let z = y - self.b / 200.0;

        let x = lab_to_xyz(x) * WHITE_X;
        let y = lab_to_xyz(y) * WHITE_Y;
        let z = lab_to_xyz(z) * WHITE_Z;

        let r = linear_to_srgb(3.2404542 * x - 1.5371385 * y - 0.4985314 * z);
        let g = linear_to_srgb(-0.9692660 * x + 1.8760108 * y + 0.0415560 * z);
        let b = linear_to_srgb(0.0556434 * x - 0.2040259 * y + 1.0572252 * z);

        Color::new(clamp_unit(r), clamp_unit(g), clamp_unit(b), alpha)
    }

    /// Straight-line interpolation; `t` outside [0, 1] extrapolates
    pub fn lerp(&self, other: &Lab, t: f64) -> Lab {
        Lab {
            l: self.l + (other.l - self.l) * t,
            a: self.a + (other.a - self.a) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

fn clamp_unit(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::colormap::format_hex;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn test_reference_values() {
        let white = Lab::from_color(&Color::new(1.0, 1.0, 1.0, 1.0));
        assert!(approx(white.l, 100.0, 1e-3));
        assert!(approx(white.a, 0.0, 1e-3));
        assert!(approx(white.b, 0.0, 1e-3));

        let black = Lab::from_color(&Color::new(0.0, 0.0, 0.0, 1.0));
        assert!(approx(black.l, 0.0, 1e-9));

        let red = Lab::from_color(&Color::new(1.0, 0.0, 0.0, 1.0));
        assert!(approx(red.l, 53.24, 0.01));
        assert!(approx(red.a, 80.09, 0.01));
        assert!(approx(red.b, 67.20, 0.01));
    }

    #[test]
    fn test_round_trip() {
        let original = Color::from_html("#3c78d8").unwrap();
        let back = Lab::from_color(&original).to_color(1.0);
        assert_eq!(format_hex(&back), "#3c78d8");
    }

    #[test]
    fn test_out_of_gamut_is_clamped() {
        let color = Lab::new(150.0, 120.0, -200.0).to_color(1.0);
        for channel in [color.r, color.g, color.b] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }
}
