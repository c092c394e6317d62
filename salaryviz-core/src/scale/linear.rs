use crate::scale::ticks::{nice, ticks};
use crate::transform::extent::extent;
use serde::{Deserialize, Serialize};

/// Continuous linear mapping from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Scale over the observed extent of `values`; `None` when no finite value is present
    pub fn from_values(values: &[f64], range: [f64; 2]) -> Option<Self> {
        extent(values).map(|domain| Self::new(domain, range))
    }

    pub fn nice(self, count: usize) -> Self {
        Self {
            domain: nice(self.domain, count),
            ..self
        }
    }

    pub fn with_domain(self, domain: [f64; 2]) -> Self {
        Self { domain, ..self }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let t = if r1 == r0 { 0.5 } else { (pixel - r0) / (r1 - r0) };
        d0 + t * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_invert() {
        let x = LinearScale::new([0.0, 600000.0], [0.0, 600.0]);
        assert_eq!(x.scale(300000.0), 300.0);
        assert_eq!(x.invert(150.0), 150000.0);

        let y = LinearScale::new([0.0, 40.0], [200.0, 0.0]);
        assert_eq!(y.scale(10.0), 150.0);
        assert_eq!(y.scale(40.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_midpoint() {
        let x = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
        assert_eq!(x.scale(5.0), 50.0);
    }

    #[test]
    fn test_from_values_then_nice() {
        let x = LinearScale::from_values(&[5132.0, f64::NAN, 598000.0], [0.0, 1.0])
            .unwrap()
            .nice(10);
        assert_eq!(x.domain, [0.0, 600000.0]);
        assert_eq!(x.ticks(6).first(), Some(&0.0));
        assert!(LinearScale::from_values(&[], [0.0, 1.0]).is_none());
    }
}
