// SensorConsole
// Supplied without warranty.
// Use at your own risk.

//! Water-quality bands, matching the controller's status LEDs.

use crate::classifier::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Good => write!(f, "GOOD"),
            Quality::Fair => write!(f, "FAIR"),
            Quality::Poor => write!(f, "POOR"),
        }
    }
}

impl Category {
    /// Band for `value`, or `None` when it is outside every band.
    pub fn quality(self, value: f32) -> Option<Quality> {
        match self {
            Category::Turbidity => match value {
                v if (0.0..=20.0).contains(&v) => Some(Quality::Good),
                v if v > 20.0 && v <= 50.0 => Some(Quality::Fair),
                v if v > 50.0 && v <= 100.0 => Some(Quality::Poor),
                _ => None,
            },
            Category::Microplastic => match value {
                v if (0.0..=500.0).contains(&v) => Some(Quality::Good),
                v if v > 500.0 && v <= 2000.0 => Some(Quality::Fair),
                v if v > 2000.0 && v <= 3000.0 => Some(Quality::Poor),
                _ => None,
            },
            Category::DoLevel => match value {
                v if v > 7.0 && v <= 10.0 => Some(Quality::Good),
                v if (4.0..=7.0).contains(&v) => Some(Quality::Fair),
                v if (0.0..4.0).contains(&v) => Some(Quality::Poor),
                _ => None,
            },
        }
    }

    /// Boundaries between bands, for reference lines on the chart.
    pub fn band_limits(self) -> [f32; 2] {
        match self {
            Category::Turbidity => [20.0, 50.0],
            Category::Microplastic => [500.0, 2000.0],
            Category::DoLevel => [4.0, 7.0],
        }
    }

    /// Full plotted range.
    pub fn display_range(self) -> (f32, f32) {
        match self {
            Category::Turbidity => (0.0, 100.0),
            Category::Microplastic => (0.0, 3000.0),
            Category::DoLevel => (0.0, 10.0),
        }
    }
}
