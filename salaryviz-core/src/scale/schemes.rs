use ahash::RandomState;
use salaryviz_common::error::{Result, SalaryVizError};
use std::collections::HashMap;

pub enum SchemePalette {
    Discrete(&'static [&'static str]),
    Continuous(&'static str),
}

const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

const BLUES: &str = "f7fbffdeebf7c6dbef9ecae16baed64292c62171b508519c08306b";

const VIRIDIS: &str = concat!(
    "440154470e61481a6c482575472f7d443a834144873d4e8a39568c35608d31688e2d708e",
    "2a788e27818e23888e21918d1f988b1fa08822a8842ab07f35b77943bf7154c56866cc5d",
    "7ad1518fd744a5db36bcdf27d2e21be9e51afde725"
);

lazy_static! {
    static ref SCHEMES: HashMap<&'static str, SchemePalette, RandomState> = {
        let mut schemes = HashMap::default();
        schemes.insert("category10", SchemePalette::Discrete(CATEGORY10));
        schemes.insert("tableau10", SchemePalette::Discrete(TABLEAU10));
        schemes.insert("blues", SchemePalette::Continuous(BLUES));
        schemes.insert("viridis", SchemePalette::Continuous(VIRIDIS));
        schemes
    };
}

pub fn lookup_scheme(name: &str) -> Option<&'static SchemePalette> {
    SCHEMES.get(name.to_ascii_lowercase().as_str())
}

/// Colors of a discrete scheme, or the stops of a continuous one
pub fn scheme_colors(name: &str) -> Result<Vec<String>> {
    match lookup_scheme(name) {
        Some(SchemePalette::Discrete(colors)) => Ok(colors.iter().map(|c| c.to_string()).collect()),
        Some(SchemePalette::Continuous(hex)) => Ok(decode_continuous_scheme(hex)),
        None => Err(SalaryVizError::specification(format!(
            "Unknown color scheme: {name}"
        ))),
    }
}

pub fn decode_continuous_scheme(hex: &str) -> Vec<String> {
    hex.as_bytes()
        .chunks_exact(6)
        .map(|chunk| {
            let color = std::str::from_utf8(chunk).unwrap_or_default();
            format!("#{color}")
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse(color: &str) -> Result<Self> {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SalaryVizError::specification(format!(
                "Expected a #rrggbb color: Received {color}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| {
                SalaryVizError::specification(format!("Invalid hex color: {color}"))
            })
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(matches!(
            lookup_scheme("Category10"),
            Some(SchemePalette::Discrete(_))
        ));
        assert!(matches!(
            lookup_scheme("blues"),
            Some(SchemePalette::Continuous(_))
        ));
        assert!(lookup_scheme("nope").is_none());
        assert!(scheme_colors("nope").is_err());
    }

    #[test]
    fn test_decode_blues() {
        let stops = scheme_colors("blues").unwrap();
        assert_eq!(stops.len(), 9);
        assert_eq!(stops[0], "#f7fbff");
        assert_eq!(stops[8], "#08306b");
    }

    #[test]
    fn test_rgb_roundtrip_and_lerp() {
        let a = Rgb::parse("#000000").unwrap();
        let b = Rgb::parse("ff8040").unwrap();
        assert_eq!(b.to_hex(), "#ff8040");
        assert_eq!(a.lerp(b, 0.5), Rgb(128, 64, 32));
        assert!(Rgb::parse("#fff").is_err());
    }
}
