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
use crate::encoding::{EncodeTrait, LegendEntry};
use crate::scale::ordinal::OrdinalScale;
use crate::spec::chart::{ChordConfig, SortOrder};
use crate::spec::layout::LayoutConfig;
use crate::transform::aggregate::{group_counts, ChordMatrix};
use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::{PI, TAU};

/// Angular span of one end of a chord, or of a whole group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordArc {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl ChordArc {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub source: ChordArc,
    pub target: ChordArc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordLayout {
    pub groups: Vec<ChordArc>,
    pub chords: Vec<Chord>,
}

/// Lay out an undirected square flow matrix around a circle.
///
/// Each group receives an arc proportional to its row sum, separated by `pad_angle`. Within a
/// group, subgroups are placed in column order, or by value when `sort_subgroups` is set. A
/// chord's source is its end with the larger value.
pub fn chord_layout(
    matrix: &[Vec<f64>],
    pad_angle: f64,
    sort_subgroups: Option<SortOrder>,
) -> Result<ChordLayout> {
    let n = matrix.len();
    if matrix.iter().any(|row| row.len() != n) {
        return Err(SalaryVizError::internal("Chord matrix must be square"));
    }
    let value = |i: usize, j: usize| matrix[i][j];

    let group_sums: Vec<f64> = matrix.iter().map(|row| row.iter().sum()).collect();
    let total: f64 = group_sums.iter().sum();
    let k = if total > 0.0 {
        (TAU - pad_angle * n as f64).max(0.0) / total
    } else {
        0.0
    };
    let dx = if k != 0.0 { pad_angle } else { TAU / n.max(1) as f64 };

    let mut slots: Vec<Option<(Option<ChordArc>, Option<ChordArc>)>> = vec![None; n * n];
    let mut groups = Vec::with_capacity(n);
    let mut x = 0.0;
    for i in 0..n {
        let x0 = x;
        let mut subgroups: Vec<usize> = (0..n)
            .filter(|&j| value(i, j) != 0.0 || value(j, i) != 0.0)
            .collect();
        if let Some(order) = sort_subgroups {
            subgroups.sort_by(|&a, &b| {
                let ordering = value(i, a)
                    .partial_cmp(&value(i, b))
                    .unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        for j in subgroups {
            let start_angle = x;
            x += value(i, j) * k;
            let arc = ChordArc {
                index: i,
                start_angle,
                end_angle: x,
                value: value(i, j),
            };
            let slot = slots[i.min(j) * n + i.max(j)].get_or_insert((None, None));
            if i < j {
                slot.0 = Some(arc);
            } else {
                slot.1 = Some(arc);
                if i == j {
                    slot.0 = Some(arc);
                }
            }
            if let (Some(source), Some(target)) = (slot.0, slot.1) {
                if source.value < target.value {
                    *slot = (Some(target), Some(source));
                }
            }
        }

        groups.push(ChordArc {
            index: i,
            start_angle: x0,
            end_angle: x,
            value: group_sums[i],
        });
        x += dx;
    }

    let chords = slots
        .into_iter()
        .flatten()
        .filter_map(|slot| match slot {
            (Some(source), Some(target)) => Some(Chord { source, target }),
            _ => None,
        })
        .collect();

    Ok(ChordLayout { groups, chords })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordGroupMark {
    pub arc: ChordArc,
    pub label: String,
    pub fill: String,
}

impl ChordGroupMark {
    /// Labels on the left half of the circle are rotated to read left to right
    pub fn label_flipped(&self) -> bool {
        self.arc.mid_angle() > PI
    }

    pub fn key(&self) -> MarkKey {
        MarkKey::Group(self.arc.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonMark {
    pub chord: Chord,
    pub fill: String,
    pub opacity: f64,
}

impl RibbonMark {
    pub fn key(&self) -> MarkKey {
        MarkKey::Link(self.chord.source.index, self.chord.target.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEncoding {
    pub matrix: ChordMatrix,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub groups: Vec<ChordGroupMark>,
    pub ribbons: Vec<RibbonMark>,
}

impl EncodeTrait for ChordConfig {
    type Encoding = ChordEncoding;

    fn encode(&self, records: &[SalaryRecord], layout: &LayoutConfig) -> Result<ChordEncoding> {
        let matrix = group_counts(records, self.source, self.target)
            .to_matrix()
            .to_chord_matrix();
        let chord = chord_layout(&matrix.values, self.pad_angle, self.sort_subgroups)?;

        let outer_radius =
            (layout.inner_width().min(layout.band_height()) / 2.0 - self.radius_inset).max(0.0);
        let inner_radius = (outer_radius - self.ring_width).max(0.0);

        // Groups and labels share matrix order, so colors are looked up by position
        let color = OrdinalScale::from_scheme(matrix.labels.clone(), &self.scheme)?;
        let fill_of = |index: usize| color.scale_index(index).unwrap_or_default().to_string();

        let groups = chord
            .groups
            .iter()
            .map(|arc| ChordGroupMark {
                arc: *arc,
                label: matrix.labels[arc.index].clone(),
                fill: fill_of(arc.index),
            })
            .collect();
        let ribbons = chord
            .chords
            .iter()
            .map(|c| RibbonMark {
                chord: *c,
                fill: fill_of(c.source.index),
                opacity: self.ribbon_opacity,
            })
            .collect();

        Ok(ChordEncoding {
            matrix,
            inner_radius,
            outer_radius,
            groups,
            ribbons,
        })
    }
}

impl ChordEncoding {
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.groups
            .iter()
            .map(|g| LegendEntry {
                label: g.label.clone(),
                color: g.fill.clone(),
            })
            .collect()
    }

    pub fn mark_keys(&self) -> Vec<MarkKey> {
        self.groups
            .iter()
            .map(|g| g.key())
            .chain(self.ribbons.iter().map(|r| r.key()))
            .collect()
    }
}
