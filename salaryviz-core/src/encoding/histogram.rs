/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::data::record::SalaryRecord;
use crate::encoding::join::MarkKey;
use crate::encoding::tooltip::format_number;
use crate::encoding::EncodeTrait;
use crate::interaction::zoom::ZoomTransform;
use crate::scale::linear::LinearScale;
use crate::scale::sequential::SequentialScale;
use crate::spec::chart::{HistogramConfig, HistogramFill};
use crate::spec::layout::LayoutConfig;
use crate::transform::bin::{bin_values, Bin};
use salaryviz_common::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarMark {
    /// Position of the bin this bar draws
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

impl BarMark {
    pub fn key(&self) -> MarkKey {
        MarkKey::Bin(self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramEncoding {
    pub x: LinearScale,
    pub y: LinearScale,
    pub bins: Vec<Bin>,
    pub bars: Vec<BarMark>,
    /// Records whose binned value was not finite
    pub missing: usize,
    pub bar_gap: f64,
}

impl EncodeTrait for HistogramConfig {
    type Encoding = HistogramEncoding;

    fn encode(&self, records: &[SalaryRecord], layout: &LayoutConfig) -> Result<HistogramEncoding> {
        let values: Vec<f64> = records.iter().map(|r| r.numeric(self.field)).collect();
        let missing = values.iter().filter(|v| !v.is_finite()).count();

        let x_range = [0.0, layout.inner_width()];
        let x = match LinearScale::from_values(&values, x_range) {
            Some(x) => x.nice(self.nice_count),
            None => LinearScale::new([0.0, 0.0], x_range),
        };

        let bins = bin_values(&values, Some(x.domain), &self.bin)?;
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        let y = LinearScale::new([0.0, max_count], [layout.band_height(), 0.0]).nice(self.nice_count);

        let fill = match &self.fill {
            HistogramFill::Solid { color } => BarFill::Solid(color.clone()),
            HistogramFill::Sequential { scheme } => {
                BarFill::Sequential(SequentialScale::from_scheme([0.0, max_count], scheme)?)
            }
        };

        let band_height = layout.band_height();
        let bars = bins
            .iter()
            .enumerate()
            .map(|(index, bin)| {
                let (bar_x, width) = bar_span(&x, bin, self.bar_gap);
                let top = y.scale(bin.count as f64);
                BarMark {
                    index,
                    x: bar_x,
                    y: top,
                    width,
                    height: band_height - top,
                    fill: fill.color(bin.count),
                }
            })
            .collect();

        log::debug!(
            "Encoded histogram with {} bins over [{}, {}]",
            bins.len(),
            x.domain[0],
            x.domain[1]
        );

        Ok(HistogramEncoding {
            x,
            y,
            bins,
            bars,
            missing,
            bar_gap: self.bar_gap,
        })
    }
}

enum BarFill {
    Solid(String),
    Sequential(SequentialScale),
}

impl BarFill {
    fn color(&self, count: usize) -> String {
        match self {
            BarFill::Solid(color) => color.clone(),
            BarFill::Sequential(scale) => scale.scale(count as f64),
        }
    }
}

fn bar_span(x: &LinearScale, bin: &Bin, gap: f64) -> (f64, f64) {
    let x0 = x.scale(bin.x0);
    let x1 = x.scale(bin.x1);
    (x0 + gap, (x1 - x0 - gap).max(0.0))
}

impl HistogramEncoding {
    /// The encoding as seen through `transform`.
    ///
    /// Only the x scale changes. Bars keep their bins, heights and colors and are moved to the
    /// rescaled x positions.
    pub fn zoomed(&self, transform: &ZoomTransform) -> HistogramEncoding {
        let x = transform.rescale_x(&self.x);
        let bars = self
            .bars
            .iter()
            .map(|bar| {
                let (bar_x, width) = bar_span(&x, &self.bins[bar.index], self.bar_gap);
                BarMark {
                    x: bar_x,
                    width,
                    ..bar.clone()
                }
            })
            .collect();
        HistogramEncoding {
            x,
            bars,
            ..self.clone()
        }
    }

    pub fn mark_keys(&self) -> Vec<MarkKey> {
        self.bars.iter().map(|bar| bar.key()).collect()
    }

    pub fn tooltip(&self, index: usize) -> Option<Vec<String>> {
        let bin = self.bins.get(index)?;
        Some(vec![
            format!("${}–${}", format_number(bin.x0), format_number(bin.x1)),
            format!("Count: {}", bin.count),
        ])
    }
}
