/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::data::record::{RecordId, SalaryRecord};
use crate::encoding::join::MarkKey;
use crate::encoding::tooltip::format_number;
use crate::encoding::{EncodeTrait, LegendEntry};
use crate::interaction::brush::{is_highlighted, Brush};
use crate::scale::linear::LinearScale;
use crate::scale::ordinal::OrdinalScale;
use crate::scale::point::PointScale;
use crate::spec::chart::{ScatterConfig, YearAxis};
use crate::spec::layout::LayoutConfig;
use crate::transform::extent::{distinct, extent_by};
use salaryviz_common::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum YearScale {
    Point(PointScale<i32>),
    Linear(LinearScale),
}

impl YearScale {
    /// `None` for years a point scale does not know
    pub fn scale(&self, year: i32) -> Option<f64> {
        match self {
            YearScale::Point(scale) => scale.scale(&year),
            YearScale::Linear(scale) => Some(scale.scale(year as f64)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMark {
    pub id: RecordId,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    /// Current fill, which depends on the brush
    pub fill: String,
    /// Category color shown when the point is highlighted
    pub color: String,
    pub stroke: String,
    pub opacity: f64,
    pub category: String,
    pub salary: f64,
    pub year: i32,
}

impl PointMark {
    pub fn key(&self) -> MarkKey {
        MarkKey::Record(self.id)
    }

    pub fn tooltip(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            format!("${}", format_number(self.salary)),
            self.year.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterEncoding {
    pub x: YearScale,
    pub y: LinearScale,
    pub color: OrdinalScale,
    pub points: Vec<PointMark>,
    /// Records that could not be placed, such as years outside a fixed axis
    pub skipped: Vec<RecordId>,
    pub unselected_fill: String,
}

impl EncodeTrait for ScatterConfig {
    type Encoding = ScatterEncoding;

    fn encode(&self, records: &[SalaryRecord], layout: &LayoutConfig) -> Result<ScatterEncoding> {
        let x_range = [0.0, layout.inner_width()];
        let x = match &self.x_axis {
            YearAxis::Fixed { years } => YearScale::Point(PointScale::new(years.clone(), x_range)),
            YearAxis::Extent => {
                let domain = extent_by(records, |r| r.year as f64).unwrap_or([0.0, 0.0]);
                YearScale::Linear(LinearScale::new(domain, x_range).nice(self.nice_count))
            }
        };

        let y_range = [layout.band_height(), 0.0];
        let y = match extent_by(records, |r| r.salary) {
            Some(domain) => LinearScale::new(domain, y_range).nice(self.nice_count),
            None => LinearScale::new([0.0, 0.0], y_range),
        };

        let levels = distinct(records.iter().map(|r| r.category(self.color_field)));
        let color = OrdinalScale::from_scheme(levels, &self.scheme)?;

        let mut points = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for record in records {
            let category = record.category(self.color_field);
            let placed = x
                .scale(record.year)
                .filter(|_| record.salary.is_finite())
                .zip(color.scale(category));
            let Some((cx, fill)) = placed else {
                skipped.push(record.id);
                continue;
            };
            points.push(PointMark {
                id: record.id,
                cx,
                cy: y.scale(record.salary),
                r: self.radius,
                fill: fill.to_string(),
                color: fill.to_string(),
                stroke: self.stroke.clone(),
                opacity: self.opacity,
                category: category.to_string(),
                salary: record.salary,
                year: record.year,
            });
        }

        if !skipped.is_empty() {
            log::warn!(
                "{} records could not be placed on the scatter plot",
                skipped.len()
            );
        }

        Ok(ScatterEncoding {
            x,
            y,
            color,
            points,
            skipped,
            unselected_fill: self.unselected_fill.clone(),
        })
    }
}

impl ScatterEncoding {
    /// Recolor points for `brush` and return the ids it highlights.
    ///
    /// Without a brush every point shows its category color and the returned selection is
    /// empty.
    pub fn apply_brush(&mut self, brush: Option<&Brush>) -> Vec<RecordId> {
        let mut selected = Vec::new();
        for point in self.points.iter_mut() {
            if is_highlighted(brush, point.cx, point.cy) {
                point.fill = point.color.clone();
                if brush.is_some() {
                    selected.push(point.id);
                }
            } else {
                point.fill = self.unselected_fill.clone();
            }
        }
        selected
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.color
            .domain
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                let color = self.color.scale_index(i)?;
                Some(LegendEntry {
                    label: label.clone(),
                    color: color.to_string(),
                })
            })
            .collect()
    }

    pub fn mark_keys(&self) -> Vec<MarkKey> {
        self.points.iter().map(|p| p.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, salary: f64, year: i32, exp: &str) -> SalaryRecord {
        SalaryRecord {
            id: RecordId(id),
            salary,
            year,
            experience_level: exp.to_string(),
            company_size: "M".to_string(),
            employment_type: "FT".to_string(),
        }
    }

    fn sample() -> Vec<SalaryRecord> {
        vec![
            record(0, 100000.0, 2021, "EN"),
            record(1, 300000.0, 2022, "SE"),
            record(2, 50000.0, 2020, "EN"),
            record(3, 120000.0, 2019, "MI"),
        ]
    }

    fn layout() -> LayoutConfig {
        // 900 pixels wide inside the margins
        LayoutConfig {
            width: 970.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_years_skip_unknown_year() {
        let encoding = ScatterConfig::default()
            .encode(&sample(), &layout())
            .unwrap();
        assert_eq!(encoding.skipped, vec![RecordId(3)]);
        assert_eq!(encoding.points.len(), 3);

        let p0 = &encoding.points[0];
        assert_eq!(p0.cx, 300.0);
        assert_eq!(p0.fill, "#1f77b4");
        assert_eq!(p0.r, 3.0);
        assert_eq!(encoding.points[1].fill, "#ff7f0e");
        assert_eq!(encoding.points[2].cx, 0.0);

        // Color domain still comes from every record
        assert_eq!(encoding.color.domain, vec!["EN", "SE", "MI"]);
        assert_eq!(encoding.y.domain, [40000.0, 300000.0]);
        assert_eq!(encoding.y.scale(300000.0), 0.0);
    }

    #[test]
    fn test_year_extent_axis() {
        let config = ScatterConfig {
            x_axis: YearAxis::Extent,
            ..Default::default()
        };
        let encoding = config.encode(&sample(), &LayoutConfig::default()).unwrap();
        assert!(encoding.skipped.is_empty());
        assert_eq!(
            encoding.x,
            YearScale::Linear(LinearScale::new([2019.0, 2022.0], [0.0, 890.0]))
        );
        assert_eq!(encoding.points[3].cx, 0.0);
    }

    #[test]
    fn test_brush_recolors_points() {
        let mut encoding = ScatterConfig::default()
            .encode(&sample(), &layout())
            .unwrap();
        let brush = Brush::from_corners([0.0, 0.0], [400.0, 250.0]);
        let selected = encoding.apply_brush(Some(&brush));
        assert_eq!(selected, vec![RecordId(0), RecordId(2)]);
        assert_eq!(encoding.points[0].fill, "#1f77b4");
        assert_eq!(encoding.points[1].fill, "#ccc");

        let selected = encoding.apply_brush(None);
        assert!(selected.is_empty());
        assert_eq!(encoding.points[1].fill, "#ff7f0e");
    }

    #[test]
    fn test_legend_and_tooltip() {
        let encoding = ScatterConfig::default()
            .encode(&sample(), &LayoutConfig::default())
            .unwrap();
        let legend = encoding.legend();
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[2].label, "MI");
        assert_eq!(legend[2].color, "#2ca02c");
        assert_eq!(
            encoding.points[1].tooltip(),
            vec!["SE".to_string(), "$300,000".to_string(), "2022".to_string()]
        );
    }

    #[test]
    fn test_empty_records() {
        let encoding = ScatterConfig::default()
            .encode(&[], &LayoutConfig::default())
            .unwrap();
        assert!(encoding.points.is_empty());
        assert!(encoding.legend().is_empty());
    }
}
