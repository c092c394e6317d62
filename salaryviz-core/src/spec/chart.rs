/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::data::record::{CategoryField, NumericField};
use crate::interaction::view::ViewKind;
use crate::scale::schemes::{lookup_scheme, SchemePalette};
use crate::spec::layout::LayoutConfig;
use crate::transform::bin::BinConfig;
use salaryviz_common::error::{Result, ResultWithContext, SalaryVizError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_URL: &str = "data/ds_salaries.csv";

/// Everything needed to go from the input file to encoded charts.
///
/// All fields have defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data_url: String,
    pub layout: LayoutConfig,
    pub histogram: HistogramConfig,
    pub scatter: ScatterConfig,
    pub relationship: RelationshipConfig,
    pub normalize: NormalizeConfig,
    pub initial_view: ViewKind,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            layout: Default::default(),
            histogram: Default::default(),
            scatter: Default::default(),
            relationship: Default::default(),
            normalize: Default::default(),
            initial_view: ViewKind::Histogram,
        }
    }
}

impl ChartConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ChartConfig =
            serde_json::from_str(text).with_context(|| "Failed to parse chart configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.histogram.validate()?;
        self.scatter.validate()?;
        self.relationship.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistogramFill {
    Solid { color: String },
    /// Darker colors for higher counts
    Sequential { scheme: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub field: NumericField,
    pub bin: BinConfig,
    /// Tick count used to round the x domain outward
    pub nice_count: usize,
    pub fill: HistogramFill,
    /// Horizontal gap in pixels left between adjacent bars
    pub bar_gap: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            field: NumericField::Salary,
            bin: BinConfig::with_thresholds(20),
            nice_count: 10,
            fill: HistogramFill::Solid {
                color: "#69b3a2".to_string(),
            },
            bar_gap: 1.0,
        }
    }
}

impl HistogramConfig {
    pub fn validate(&self) -> Result<()> {
        self.bin.validate()?;
        if let HistogramFill::Sequential { scheme } = &self.fill {
            validate_scheme(scheme, false)?;
        }
        if !(self.bar_gap >= 0.0) {
            return Err(SalaryVizError::specification("bar_gap must not be negative"));
        }
        Ok(())
    }
}

/// How work years are placed along the scatter x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum YearAxis {
    /// A known, ordered set of years on a point scale
    Fixed { years: Vec<i32> },
    /// Linear scale over the observed year extent
    Extent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub x_axis: YearAxis,
    pub radius: f64,
    pub opacity: f64,
    pub color_field: CategoryField,
    pub scheme: String,
    /// Fill of points outside an active brush selection
    pub unselected_fill: String,
    pub stroke: String,
    pub nice_count: usize,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x_axis: YearAxis::Fixed {
                years: vec![2020, 2021, 2022, 2023],
            },
            radius: 3.0,
            opacity: 0.7,
            color_field: CategoryField::ExperienceLevel,
            scheme: "category10".to_string(),
            unselected_fill: "#ccc".to_string(),
            stroke: "steelblue".to_string(),
            nice_count: 10,
        }
    }
}

impl ScatterConfig {
    pub fn validate(&self) -> Result<()> {
        if let YearAxis::Fixed { years } = &self.x_axis {
            if years.is_empty() {
                return Err(SalaryVizError::specification(
                    "Fixed year axis requires at least one year",
                ));
            }
        }
        if !(self.radius > 0.0) {
            return Err(SalaryVizError::specification("Point radius must be positive"));
        }
        validate_scheme(&self.scheme, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStyle {
    #[default]
    Chord,
    Sankey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordConfig {
    pub source: CategoryField,
    pub target: CategoryField,
    /// Angular gap in radians between adjacent groups
    pub pad_angle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_subgroups: Option<SortOrder>,
    /// Radial thickness of the group arcs
    pub ring_width: f64,
    /// Distance kept between the outer radius and the band edge
    pub radius_inset: f64,
    pub scheme: String,
    pub ribbon_opacity: f64,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            source: CategoryField::ExperienceLevel,
            target: CategoryField::EmploymentType,
            pad_angle: 0.05,
            sort_subgroups: Some(SortOrder::Descending),
            ring_width: 15.0,
            radius_inset: 20.0,
            scheme: "category10".to_string(),
            ribbon_opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SankeyConfig {
    pub source: CategoryField,
    pub target: CategoryField,
    pub node_width: f64,
    pub node_padding: f64,
    /// Relaxation passes applied to node positions
    pub iterations: usize,
    /// Links are drawn at least this wide regardless of their value
    pub min_link_width: f64,
    pub node_fill: String,
    pub link_stroke: String,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            source: CategoryField::ExperienceLevel,
            target: CategoryField::CompanySize,
            node_width: 15.0,
            node_padding: 10.0,
            iterations: 6,
            min_link_width: 1.0,
            node_fill: "#1f77b4".to_string(),
            link_stroke: "#888".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    pub style: RelationshipStyle,
    pub chord: ChordConfig,
    pub sankey: SankeyConfig,
}

impl RelationshipConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chord.source == self.chord.target || self.sankey.source == self.sankey.target {
            return Err(SalaryVizError::specification(
                "Relationship charts need two different category fields",
            ));
        }
        if !(self.chord.pad_angle >= 0.0) || !(self.chord.ring_width > 0.0) {
            return Err(SalaryVizError::specification(
                "Chord pad_angle must be non-negative and ring_width positive",
            ));
        }
        if !(self.sankey.node_width > 0.0) || !(self.sankey.node_padding >= 0.0) {
            return Err(SalaryVizError::specification(
                "Sankey node_width must be positive and node_padding non-negative",
            ));
        }
        validate_scheme(&self.chord.scheme, true)
    }
}

/// What to do with rows holding a missing or unparsable required value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Drop the row and report it
    #[default]
    Skip,
    /// Abort normalization on the first malformed row
    Fail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub malformed_rows: MalformedRowPolicy,
}

fn validate_scheme(name: &str, discrete: bool) -> Result<()> {
    match (lookup_scheme(name), discrete) {
        (Some(SchemePalette::Discrete(_)), true) | (Some(SchemePalette::Continuous(_)), false) => {
            Ok(())
        }
        (Some(_), true) => Err(SalaryVizError::specification(format!(
            "Color scheme {name} is continuous; a discrete scheme is required"
        ))),
        (Some(_), false) => Err(SalaryVizError::specification(format!(
            "Color scheme {name} is discrete; a continuous scheme is required"
        ))),
        (None, _) => Err(SalaryVizError::specification(format!(
            "Unknown color scheme: {name}"
        ))),
    }
}
