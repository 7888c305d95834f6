#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// Directional insets for padding around items and groups.
///
/// Uses leading/trailing rather than left/right so plans stay valid for
/// right-to-left hosts. Values are in layout points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl EdgeInsets {
    /// No insets on any edge.
    pub const ZERO: Self = Self::all(0.0);

    /// Create new insets with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            leading: val,
            bottom: val,
            trailing: val,
        }
    }

    /// Create new insets on the leading and trailing edges only.
    pub const fn horizontal(val: f64) -> Self {
        Self {
            top: 0.0,
            leading: val,
            bottom: 0.0,
            trailing: val,
        }
    }

    /// Create new insets on the top and bottom edges only.
    pub const fn vertical(val: f64) -> Self {
        Self {
            top: val,
            leading: 0.0,
            bottom: val,
            trailing: 0.0,
        }
    }

    /// Create new insets with specific values.
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// Sum of leading and trailing.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.leading + self.trailing
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }

    /// Shrink a width by the horizontal insets, never going below zero.
    #[inline]
    pub fn inset_width(&self, width: f64) -> f64 {
        (width - self.horizontal_sum()).max(0.0)
    }
}

impl From<f64> for EdgeInsets {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}

impl From<(f64, f64)> for EdgeInsets {
    fn from((vertical, horizontal): (f64, f64)) -> Self {
        Self {
            top: vertical,
            leading: horizontal,
            bottom: vertical,
            trailing: horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeInsets;

    #[test]
    fn horizontal_only_touches_leading_and_trailing() {
        let insets = EdgeInsets::horizontal(5.0);
        assert_eq!(insets.top, 0.0);
        assert_eq!(insets.bottom, 0.0);
        assert_eq!(insets.horizontal_sum(), 10.0);
        assert_eq!(insets.vertical_sum(), 0.0);
    }

    #[test]
    fn tuple_conversion_is_vertical_then_horizontal() {
        let insets = EdgeInsets::from((2.0, 7.0));
        assert_eq!(insets, EdgeInsets::new(2.0, 7.0, 2.0, 7.0));
    }

    #[test]
    fn inset_width_saturates_at_zero() {
        let insets = EdgeInsets::horizontal(8.0);
        assert_eq!(insets.inset_width(100.0), 84.0);
        assert_eq!(insets.inset_width(10.0), 0.0);
    }
}
