/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::data::record::{CategoryField, SalaryRecord};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub a: String,
    pub b: String,
    pub count: usize,
}

/// Record counts per pair of values of two categorical fields.
///
/// Levels are in first-seen order. Groups are ordered by first-seen `a`, then by first-seen
/// `b` within that `a` (nested rollup order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGrouping {
    pub a_field: CategoryField,
    pub b_field: CategoryField,
    pub a_levels: Vec<String>,
    pub b_levels: Vec<String>,
    pub groups: Vec<CategoryGroup>,
}

pub fn group_counts(
    records: &[SalaryRecord],
    a_field: CategoryField,
    b_field: CategoryField,
) -> CategoryGrouping {
    let mut a_index: HashMap<&str, usize, RandomState> = HashMap::default();
    let mut b_index: HashMap<&str, usize, RandomState> = HashMap::default();
    let mut a_levels: Vec<String> = Vec::new();
    let mut b_levels: Vec<String> = Vec::new();

    // Per a-level: (b-level index, count) in first-seen order
    let mut nested: Vec<Vec<(usize, usize)>> = Vec::new();

    for record in records {
        let a = record.category(a_field);
        let b = record.category(b_field);

        let ai = *a_index.entry(a).or_insert_with(|| {
            a_levels.push(a.to_string());
            nested.push(Vec::new());
            a_levels.len() - 1
        });
        let bi = *b_index.entry(b).or_insert_with(|| {
            b_levels.push(b.to_string());
            b_levels.len() - 1
        });

        let inner = &mut nested[ai];
        match inner.iter_mut().find(|(j, _)| *j == bi) {
            Some((_, count)) => *count += 1,
            None => inner.push((bi, 1)),
        }
    }

    let groups = nested
        .iter()
        .enumerate()
        .flat_map(|(ai, inner)| {
            let a_levels = &a_levels;
            let b_levels = &b_levels;
            inner.iter().map(move |(bi, count)| CategoryGroup {
                a: a_levels[ai].clone(),
                b: b_levels[*bi].clone(),
                count: *count,
            })
        })
        .collect();

    CategoryGrouping {
        a_field,
        b_field,
        a_levels,
        b_levels,
        groups,
    }
}

impl CategoryGrouping {
    pub fn count(&self, a: &str, b: &str) -> usize {
        self.groups
            .iter()
            .find(|g| g.a == a && g.b == b)
            .map(|g| g.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    /// Rectangular `a_levels × b_levels` count matrix
    pub fn to_matrix(&self) -> CategoryMatrix {
        let mut counts = vec![vec![0usize; self.b_levels.len()]; self.a_levels.len()];
        let a_pos: HashMap<&str, usize, RandomState> = self
            .a_levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        let b_pos: HashMap<&str, usize, RandomState> = self
            .b_levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        for group in &self.groups {
            counts[a_pos[group.a.as_str()]][b_pos[group.b.as_str()]] += group.count;
        }
        CategoryMatrix {
            row_labels: self.a_levels.clone(),
            column_labels: self.b_levels.clone(),
            counts,
        }
    }
}

/// Counts indexed by (row level index, column level index).
///
/// Row and column labels are the grouping levels in the same order used to fill `counts`;
/// positional consumers must take labels from here, never re-derive them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CategoryMatrix {
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_sums(&self) -> Vec<usize> {
        (0..self.column_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Square bipartite adjacency matrix over `row_labels ++ column_labels`
    pub fn to_chord_matrix(&self) -> ChordMatrix {
        let rows = self.row_labels.len();
        let size = rows + self.column_labels.len();
        let mut values = vec![vec![0.0; size]; size];
        for (i, row) in self.counts.iter().enumerate() {
            for (j, count) in row.iter().enumerate() {
                values[i][rows + j] = *count as f64;
                values[rows + j][i] = *count as f64;
            }
        }
        ChordMatrix {
            labels: self
                .row_labels
                .iter()
                .chain(self.column_labels.iter())
                .cloned()
                .collect(),
            sources: rows,
            values,
        }
    }
}

/// Square flow matrix for a chord layout; `values[i][j]` is the flow from group `i` to `j`.
///
/// The first `sources` labels come from the row field, the rest from the column field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordMatrix {
    pub labels: Vec<String>,
    pub sources: usize,
    pub values: Vec<Vec<f64>>,
}

impl ChordMatrix {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.values.len() == self.labels.len()
            && self.values.iter().all(|row| row.len() == self.labels.len())
    }
}
