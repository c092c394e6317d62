pub mod chord;
pub mod histogram;
pub mod join;
pub mod sankey;
pub mod scatter;
pub mod tooltip;

use crate::data::record::SalaryRecord;
use crate::encoding::chord::ChordEncoding;
use crate::encoding::histogram::HistogramEncoding;
use crate::encoding::join::MarkKey;
use crate::encoding::sankey::SankeyEncoding;
use crate::encoding::scatter::ScatterEncoding;
use crate::interaction::view::ViewKind;
use crate::spec::chart::{ChartConfig, RelationshipStyle};
use crate::spec::layout::LayoutConfig;
use salaryviz_common::error::{Result, ResultWithContext};
use serde::{Deserialize, Serialize};

/// Turns records into the visual primitives of one chart.
///
/// Encoding is pure: it never keeps state between calls and the same records always produce
/// the same encoding.
pub trait EncodeTrait {
    type Encoding;

    fn encode(&self, records: &[SalaryRecord], layout: &LayoutConfig) -> Result<Self::Encoding>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationshipEncoding {
    Chord(ChordEncoding),
    Sankey(SankeyEncoding),
}

impl RelationshipEncoding {
    pub fn mark_keys(&self) -> Vec<MarkKey> {
        match self {
            RelationshipEncoding::Chord(chord) => chord.mark_keys(),
            RelationshipEncoding::Sankey(sankey) => sankey.mark_keys(),
        }
    }
}

/// Encodings of all three views for one record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedCharts {
    pub histogram: HistogramEncoding,
    pub scatter: ScatterEncoding,
    pub relationship: RelationshipEncoding,
}

impl EncodedCharts {
    pub fn mark_keys(&self, view: ViewKind) -> Vec<MarkKey> {
        match view {
            ViewKind::Histogram => self.histogram.mark_keys(),
            ViewKind::Scatter => self.scatter.mark_keys(),
            ViewKind::Relationship => self.relationship.mark_keys(),
        }
    }
}

pub fn encode_charts(config: &ChartConfig, records: &[SalaryRecord]) -> Result<EncodedCharts> {
    let layout = &config.layout;
    let histogram = config
        .histogram
        .encode(records, layout)
        .with_context(|| "Failed to encode histogram")?;
    let scatter = config
        .scatter
        .encode(records, layout)
        .with_context(|| "Failed to encode scatter plot")?;
    let relationship = match config.relationship.style {
        RelationshipStyle::Chord => RelationshipEncoding::Chord(
            config
                .relationship
                .chord
                .encode(records, layout)
                .with_context(|| "Failed to encode chord diagram")?,
        ),
        RelationshipStyle::Sankey => RelationshipEncoding::Sankey(
            config
                .relationship
                .sankey
                .encode(records, layout)
                .with_context(|| "Failed to encode sankey diagram")?,
        ),
    };
    Ok(EncodedCharts {
        histogram,
        scatter,
        relationship,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::RecordId;

    fn records() -> Vec<SalaryRecord> {
        [
            (100000.0, 2021, "EN", "FT"),
            (300000.0, 2022, "SE", "FT"),
            (150000.0, 2022, "SE", "PT"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (salary, year, exp, emp))| SalaryRecord {
            id: RecordId(i as u32),
            salary: *salary,
            year: *year,
            experience_level: exp.to_string(),
            company_size: "M".to_string(),
            employment_type: emp.to_string(),
        })
        .collect()
    }

    #[test]
    fn test_encode_is_deterministic() {
        let config = ChartConfig::default();
        let first = encode_charts(&config, &records()).unwrap();
        let second = encode_charts(&config, &records()).unwrap();
        assert_eq!(first, second);
        assert!(matches!(first.relationship, RelationshipEncoding::Chord(_)));
        assert_eq!(
            first.mark_keys(ViewKind::Scatter),
            vec![
                MarkKey::Record(RecordId(0)),
                MarkKey::Record(RecordId(1)),
                MarkKey::Record(RecordId(2))
            ]
        );
    }

    #[test]
    fn test_sankey_style() {
        let mut config = ChartConfig::default();
        config.relationship.style = RelationshipStyle::Sankey;
        let charts = encode_charts(&config, &records()).unwrap();
        let RelationshipEncoding::Sankey(sankey) = &charts.relationship else {
            panic!("expected a sankey encoding");
        };
        assert_eq!(sankey.graph.nodes.len(), 3);
        assert_eq!(charts.mark_keys(ViewKind::Relationship).len(), 5);
    }

    #[test]
    fn test_encodings_serialize() {
        let charts = encode_charts(&ChartConfig::default(), &records()).unwrap();
        let value = serde_json::to_value(&charts).unwrap();
        assert_eq!(value["relationship"]["type"], "chord");
        assert_eq!(value["scatter"]["points"][0]["id"], 0);
        assert_eq!(value["histogram"]["bars"][0]["fill"], "#69b3a2");
    }
}
