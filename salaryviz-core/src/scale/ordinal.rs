use crate::scale::schemes::scheme_colors;
use salaryviz_common::error::Result;
use serde::{Deserialize, Serialize};

/// Discrete mapping from category values to colors. Colors repeat when the domain is longer
/// than the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalScale {
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

impl OrdinalScale {
    pub fn new(domain: Vec<String>, range: Vec<String>) -> Self {
        Self { domain, range }
    }

    pub fn from_scheme(domain: Vec<String>, scheme: &str) -> Result<Self> {
        Ok(Self::new(domain, scheme_colors(scheme)?))
    }

    /// Color for a category; `None` for values outside the domain
    pub fn scale(&self, value: &str) -> Option<&str> {
        if self.range.is_empty() {
            return None;
        }
        let index = self.domain.iter().position(|d| d == value)?;
        Some(self.range[index % self.range.len()].as_str())
    }

    /// Color by position in the domain, for consumers that index groups positionally
    pub fn scale_index(&self, index: usize) -> Option<&str> {
        if self.range.is_empty() || index >= self.domain.len() {
            return None;
        }
        Some(self.range[index % self.range.len()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_colors_cycle() {
        let domain: Vec<String> = (0..12).map(|i| format!("c{i}")).collect();
        let scale = OrdinalScale::from_scheme(domain, "category10").unwrap();
        assert_eq!(scale.scale("c0"), Some("#1f77b4"));
        assert_eq!(scale.scale("c10"), Some("#1f77b4"));
        assert_eq!(scale.scale("c11"), Some("#ff7f0e"));
        assert_eq!(scale.scale("missing"), None);
        assert_eq!(scale.scale_index(1), Some("#ff7f0e"));
        assert_eq!(scale.scale_index(12), None);
    }
}
