use crate::scale::schemes::{scheme_colors, Rgb};
use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};

/// Continuous mapping from a numeric domain onto a color ramp.
///
/// Colors are linearly interpolated in RGB between the evenly spaced stops of the scheme.
/// Inputs outside the domain are clamped to the end colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialScale {
    pub domain: [f64; 2],
    pub stops: Vec<String>,
}

impl SequentialScale {
    pub fn from_scheme(domain: [f64; 2], scheme: &str) -> Result<Self> {
        let stops = scheme_colors(scheme)?;
        if stops.is_empty() {
            return Err(SalaryVizError::specification(format!(
                "Color scheme {scheme} has no colors"
            )));
        }
        // Validate eagerly so that `scale` cannot fail
        for stop in &stops {
            Rgb::parse(stop)?;
        }
        Ok(Self { domain, stops })
    }

    pub fn scale(&self, value: f64) -> String {
        let [d0, d1] = self.domain;
        let t = if d1 == d0 || !value.is_finite() {
            0.0
        } else {
            ((value - d0) / (d1 - d0)).clamp(0.0, 1.0)
        };
        self.interpolate(t)
    }

    fn interpolate(&self, t: f64) -> String {
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0].clone();
        }
        let position = t * (n - 1) as f64;
        let i = (position.floor() as usize).min(n - 2);
        let local = position - i as f64;
        match (Rgb::parse(&self.stops[i]), Rgb::parse(&self.stops[i + 1])) {
            (Ok(a), Ok(b)) => a.lerp(b, local).to_hex(),
            _ => self.stops[i].clone(),
        }
    }
}
