use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 20.0,
            bottom: 40.0,
            left: 50.0,
        }
    }
}

/// Size of the drawing surface. Charts are stacked in three horizontal bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 860.0,
            margin: Margin::default(),
        }
    }
}

impl LayoutConfig {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of one chart band
    pub fn band_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom * 2.0) / 3.0
    }

    /// Zoom and brush extent of a band: `[[0, 0], [inner_width, band_height]]`
    pub fn band_extent(&self) -> [[f64; 2]; 2] {
        [[0.0, 0.0], [self.inner_width(), self.band_height()]]
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.inner_width() > 0.0) || !(self.band_height() > 0.0) {
            return Err(SalaryVizError::specification(format!(
                "Layout {}x{} leaves no room inside margins",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.inner_width(), 890.0);
        assert_eq!(layout.band_height(), 250.0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_too_small_layout_is_rejected() {
        let layout = LayoutConfig {
            width: 60.0,
            ..Default::default()
        };
        assert!(layout.validate().is_err());
    }
}
