use serde::{Deserialize, Serialize};

/// Evenly spaced positions for a discrete domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointScale<K> {
    pub domain: Vec<K>,
    pub range: [f64; 2],
    /// Outer padding in multiples of the step
    pub padding: f64,
    /// Distribution of leftover space: 0 start, 0.5 centered, 1 end
    pub align: f64,
}

impl<K: PartialEq> PointScale<K> {
    pub fn new(domain: Vec<K>, range: [f64; 2]) -> Self {
        Self {
            domain,
            range,
            padding: 0.0,
            align: 0.5,
        }
    }

    pub fn with_padding(self, padding: f64) -> Self {
        Self { padding, ..self }
    }

    /// Distance between adjacent points
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let [r0, r1] = self.range;
        (r1 - r0).abs() / (n - 1.0 + self.padding * 2.0).max(1.0)
    }

    pub fn scale(&self, key: &K) -> Option<f64> {
        let index = self.domain.iter().position(|k| k == key)?;
        Some(self.positions()[index])
    }

    pub fn positions(&self) -> Vec<f64> {
        let n = self.domain.len();
        let [r0, r1] = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        let step = self.step();
        let start = start + (stop - start - step * (n as f64 - 1.0)) * self.align;
        let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
        if reverse {
            values.reverse();
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_years() {
        let x = PointScale::new(vec![2020, 2021, 2022, 2023], [0.0, 900.0]);
        assert_eq!(x.step(), 300.0);
        assert_eq!(x.scale(&2020), Some(0.0));
        assert_eq!(x.scale(&2022), Some(600.0));
        assert_eq!(x.scale(&2023), Some(900.0));
        assert_eq!(x.scale(&2019), None);
    }

    #[test]
    fn test_single_point_is_centered() {
        let x = PointScale::new(vec!["EN".to_string()], [0.0, 100.0]);
        assert_eq!(x.scale(&"EN".to_string()), Some(50.0));
    }

    #[test]
    fn test_padding_and_reverse_range() {
        let x = PointScale::new(vec!['a', 'b'], [100.0, 0.0]).with_padding(0.5);
        assert_eq!(x.step(), 50.0);
        assert_eq!(x.positions(), vec![75.0, 25.0]);
    }
}
