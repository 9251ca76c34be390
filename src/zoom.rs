//! Zoom controller for the displayed diagram.

use crate::page::DiagramImage;

/// Smallest scale the image can be shown at, in tenths.
const MIN_TENTHS: u32 = 1;
const INITIAL_TENTHS: u32 = 10;

/// Scale factor applied to the diagram image.
///
/// The level moves in steps of 0.1 and is kept as a whole number of tenths,
/// so `zoom_in` followed by `zoom_out` lands exactly where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomController {
    tenths: u32,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            tenths: INITIAL_TENTHS,
        }
    }
}

impl ZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scale factor (1.0 is unscaled)
    pub fn level(&self) -> f64 {
        f64::from(self.tenths) / 10.0
    }

    /// CSS transform for the current level
    pub fn transform(&self) -> String {
        format!("scale({})", self.level())
    }

    /// Grow by 0.1 and re-apply the transform. There is no upper bound.
    pub fn zoom_in(&mut self, image: &dyn DiagramImage) {
        self.tenths = self.tenths.saturating_add(1);
        image.set_transform(&self.transform());
    }

    /// Shrink by 0.1, never below 0.1, and re-apply the transform.
    pub fn zoom_out(&mut self, image: &dyn DiagramImage) {
        self.tenths = self.tenths.saturating_sub(1).max(MIN_TENTHS);
        image.set_transform(&self.transform());
    }
}
