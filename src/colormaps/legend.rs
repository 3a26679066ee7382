//! Legend model derived from a color scale.

use serde::Serialize;
use std::str::FromStr;

use super::scale::LinearColorScale;
use crate::error::{ChoroplethError, Result};
use crate::statistics::Extremes;

const DEFAULT_STEPS: usize = 5;

/// How the legend splits the domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Evenly spaced stops sampled from the continuous scale
    Continuous { steps: usize },
    /// Equal-width classes, each colored at its midpoint
    EqualInterval { classes: usize },
}

impl Classification {
    /// Parse `continuous`, `continuous:N`, `equal:N` or `equal-interval:N`
    pub fn parse_classification(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let (kind, count) = match lowered.split_once(':') {
            Some((kind, count)) => {
                let count = count.trim().parse::<usize>().map_err(|_| invalid(s))?;
                (kind.trim().to_string(), Some(count))
            }
            None => (lowered.clone(), None),
        };
        if count == Some(0) {
            return Err(invalid(s));
        }

        match kind.as_str() {
            "continuous" => Ok(Classification::Continuous {
                steps: count.unwrap_or(DEFAULT_STEPS),
            }),
            "equal" | "equal-interval" => Ok(Classification::EqualInterval {
                classes: count.unwrap_or(DEFAULT_STEPS),
            }),
            _ => Err(invalid(s)),
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::Continuous {
            steps: DEFAULT_STEPS,
        }
    }
}

impl FromStr for Classification {
    type Err = ChoroplethError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Classification::parse_classification(s)
    }
}

fn invalid(s: &str) -> ChoroplethError {
    ChoroplethError::InvalidParameter {
        param: "data_classification".to_string(),
        message: format!("Unknown classification: {}", s),
    }
}

/// One legend swatch covering `[from, to]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub from: f64,
    pub to: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub extremes: Extremes,
    pub entries: Vec<LegendEntry>,
}

/// Sample `scale` according to `classification`
pub fn build_legend(scale: &LinearColorScale, classification: Classification) -> Legend {
    let extremes = scale.domain();
    let span = extremes.span();
    let at = |i: usize, n: usize| extremes.min + span * i as f64 / n as f64;

    let entries = if span == 0.0 {
        vec![LegendEntry {
            from: extremes.min,
            to: extremes.max,
            color: scale.hex(extremes.min),
        }]
    } else {
        match classification {
            Classification::Continuous { steps } => (0..=steps)
                .map(|i| {
                    let value = at(i, steps);
                    LegendEntry {
                        from: value,
                        to: value,
                        color: scale.hex(value),
                    }
                })
                .collect(),
            Classification::EqualInterval { classes } => (0..classes)
                .map(|i| {
                    let from = at(i, classes);
                    let to = at(i + 1, classes);
                    LegendEntry {
                        from,
                        to,
                        color: scale.hex((from + to) / 2.0),
                    }
                })
                .collect(),
        }
    };

    Legend { extremes, entries }
}
