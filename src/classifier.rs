// SensorConsole
// Supplied without warranty.
// Use at your own risk.

//! Guesses what a streamed value measures from how it is written.
//!
//! The controller prints each sensor with a different `printf` width, so the
//! number of characters in front of the decimal point is the only hint the
//! host gets. Nothing here parses the number.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Turbidity,
    Microplastic,
    DoLevel,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Turbidity, Category::Microplastic, Category::DoLevel];

    pub fn unit(self) -> &'static str {
        match self {
            Category::Turbidity => "NTU",
            Category::Microplastic => "particles/L",
            Category::DoLevel => "mg/L",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Turbidity => write!(f, "Turbidity"),
            Category::Microplastic => write!(f, "Microplastic"),
            Category::DoLevel => write!(f, "DoLevel"),
        }
    }
}

/// Classify one decoded token.
///
/// With a decimal point: one leading character is a DO level, two is
/// turbidity, anything else is unclassified. Without one it is always a
/// microplastic count.
pub fn classify(token: &str) -> Option<Category> {
    match token.split_once('.') {
        Some((before_decimal, _)) => match before_decimal.chars().count() {
            1 => Some(Category::DoLevel),
            2 => Some(Category::Turbidity),
            _ => None,
        },
        None => Some(Category::Microplastic),
    }
}

/// A token together with the category it was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub category: Category,
    pub token: String,
}

impl Reading {
    pub fn classify(token: &str) -> Option<Self> {
        classify(token).map(|category| Reading {
            category,
            token: token.to_string(),
        })
    }

    /// Numeric value of the token, if it happens to be one.
    pub fn value(&self) -> Option<f32> {
        self.token.parse().ok()
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Data: {} {}", self.category, self.token, self.category.unit())
    }
}
