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
use crate::encoding::EncodeTrait;
use crate::spec::chart::SankeyConfig;
use crate::spec::layout::LayoutConfig;
use crate::transform::aggregate::{group_counts, CategoryGrouping};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use salaryviz_common::error::{Result, SalaryVizError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub index: usize,
    pub name: String,
    pub column: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    /// Thickness proportional to `value`
    pub width: f64,
    /// Right edge of the source node
    pub x0: f64,
    /// Left edge of the target node
    pub x1: f64,
    /// Vertical center of the link where it leaves the source
    pub y0: f64,
    /// Vertical center of the link where it enters the target
    pub y1: f64,
}

impl SankeyLink {
    /// Horizontal cubic curve from source to target, as SVG path data
    pub fn path(&self) -> String {
        let mid = (self.x0 + self.x1) / 2.0;
        format!(
            "M{},{}C{},{},{},{},{},{}",
            self.x0, self.y0, mid, self.y0, mid, self.y1, self.x1, self.y1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// Link indices of every node, each list ordered by the position of the node at the other end
struct NodeLinks {
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl NodeLinks {
    fn new(n: usize, links: &[SankeyLink]) -> Self {
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        for (l, link) in links.iter().enumerate() {
            outgoing[link.source].push(l);
            incoming[link.target].push(l);
        }
        Self { outgoing, incoming }
    }

    fn sort_outgoing(&mut self, node: usize, nodes: &[SankeyNode], links: &[SankeyLink]) {
        self.outgoing[node].sort_by_key(|l| (OrderedFloat(nodes[links[*l].target].y0), *l));
    }

    fn sort_incoming(&mut self, node: usize, nodes: &[SankeyNode], links: &[SankeyLink]) {
        self.incoming[node].sort_by_key(|l| (OrderedFloat(nodes[links[*l].source].y0), *l));
    }

    /// Re-sort the lists of every neighbor after `node` moved
    fn reorder_around(&mut self, node: usize, nodes: &[SankeyNode], links: &[SankeyLink]) {
        for l in self.outgoing[node].clone() {
            self.sort_incoming(links[l].target, nodes, links);
        }
        for l in self.incoming[node].clone() {
            self.sort_outgoing(links[l].source, nodes, links);
        }
    }
}

struct Relaxation<'a> {
    nodes: &'a mut [SankeyNode],
    links: &'a [SankeyLink],
    node_links: &'a mut NodeLinks,
    py: f64,
    y0: f64,
    y1: f64,
}

impl Relaxation<'_> {
    /// `source.y0` that would make the link from `source` to `target` horizontal
    fn source_top(&self, source: usize, target: usize) -> f64 {
        let incoming = &self.node_links.incoming[target];
        let mut y = self.nodes[target].y0 - (incoming.len() as f64 - 1.0) * self.py / 2.0;
        for l in incoming {
            if self.links[*l].source == source {
                break;
            }
            y += self.links[*l].width + self.py;
        }
        for l in &self.node_links.outgoing[source] {
            if self.links[*l].target == target {
                break;
            }
            y -= self.links[*l].width;
        }
        y
    }

    /// `target.y0` that would make the link from `source` to `target` horizontal
    fn target_top(&self, source: usize, target: usize) -> f64 {
        let outgoing = &self.node_links.outgoing[source];
        let mut y = self.nodes[source].y0 - (outgoing.len() as f64 - 1.0) * self.py / 2.0;
        for l in outgoing {
            if self.links[*l].target == target {
                break;
            }
            y += self.links[*l].width + self.py;
        }
        for l in &self.node_links.incoming[target] {
            if self.links[*l].source == source {
                break;
            }
            y -= self.links[*l].width;
        }
        y
    }

    /// Move every node of `column` toward the weighted ideal position given by its neighbors
    /// in other columns, then push overlapping nodes apart.
    fn relax(&mut self, column: &mut [usize], upstream: bool, alpha: f64, beta: f64) {
        for &node in column.iter() {
            let mut y = 0.0;
            let mut w = 0.0;
            if upstream {
                for l in &self.node_links.incoming[node] {
                    let link = &self.links[*l];
                    let v = link.value
                        * (self.nodes[node].column as f64 - self.nodes[link.source].column as f64);
                    y += self.target_top(link.source, node) * v;
                    w += v;
                }
            } else {
                for l in &self.node_links.outgoing[node] {
                    let link = &self.links[*l];
                    let v = link.value
                        * (self.nodes[link.target].column as f64 - self.nodes[node].column as f64);
                    y += self.source_top(node, link.target) * v;
                    w += v;
                }
            }
            if !(w > 0.0) {
                continue;
            }
            let dy = (y / w - self.nodes[node].y0) * alpha;
            self.nodes[node].y0 += dy;
            self.nodes[node].y1 += dy;
            self.node_links.reorder_around(node, &*self.nodes, self.links);
        }
        column.sort_by_key(|i| OrderedFloat(self.nodes[*i].y0));
        self.resolve_collisions(column, beta);
    }

    fn resolve_collisions(&mut self, column: &[usize], alpha: f64) {
        if column.is_empty() {
            return;
        }
        let middle = column.len() / 2;
        let subject = &self.nodes[column[middle]];
        let (above, below) = (subject.y0 - self.py, subject.y1 + self.py);
        self.push_up(column, above, middle as isize - 1, alpha);
        self.push_down(column, below, middle + 1, alpha);
        self.push_up(column, self.y1, column.len() as isize - 1, alpha);
        self.push_down(column, self.y0, 0, alpha);
    }

    fn push_down(&mut self, column: &[usize], mut y: f64, from: usize, alpha: f64) {
        for &i in column.iter().skip(from) {
            let node = &mut self.nodes[i];
            let dy = (y - node.y0) * alpha;
            if dy > 1e-6 {
                node.y0 += dy;
                node.y1 += dy;
            }
            y = node.y1 + self.py;
        }
    }

    fn push_up(&mut self, column: &[usize], mut y: f64, from: isize, alpha: f64) {
        if from < 0 {
            return;
        }
        for &i in column[..=from as usize].iter().rev() {
            let node = &mut self.nodes[i];
            let dy = (node.y1 - y) * alpha;
            if dy > 1e-6 {
                node.y0 -= dy;
                node.y1 -= dy;
            }
            y = node.y0 - self.py;
        }
    }
}

/// Position nodes in columns and links between them.
///
/// `columns[i]` is the column of node `i`. Nodes start in input order inside a column with
/// spare vertical space spread evenly around them. Each of the `iterations` relaxation passes
/// then sweeps right to left and left to right, moving nodes toward the nodes they link to
/// and resolving overlaps, with the step size decaying as passes go on.
pub fn sankey_layout(
    names: Vec<String>,
    columns: &[usize],
    links: &[(usize, usize, f64)],
    extent: [[f64; 2]; 2],
    node_width: f64,
    node_padding: f64,
    iterations: usize,
) -> Result<SankeyGraph> {
    let n = names.len();
    if columns.len() != n {
        return Err(SalaryVizError::internal(
            "Every sankey node needs a column",
        ));
    }
    if let Some((s, t, _)) = links.iter().find(|(s, t, _)| *s >= n || *t >= n) {
        return Err(SalaryVizError::internal(format!(
            "Sankey link {s} -> {t} references a missing node"
        )));
    }
    let [[x0, y0], [x1, y1]] = extent;

    let mut out_sum = vec![0.0; n];
    let mut in_sum = vec![0.0; n];
    for (s, t, v) in links {
        out_sum[*s] += v;
        in_sum[*t] += v;
    }

    let column_count = columns.iter().max().map(|c| c + 1).unwrap_or(0);
    let mut members: Vec<Vec<usize>> = (0..column_count)
        .map(|c| (0..n).filter(|i| columns[*i] == c).collect())
        .collect();

    let kx = if column_count > 1 {
        (x1 - x0 - node_width) / (column_count - 1) as f64
    } else {
        0.0
    };
    let max_len = members.iter().map(|m| m.len()).max().unwrap_or(0);
    let py = if max_len > 1 {
        node_padding.min((y1 - y0) / (max_len - 1) as f64)
    } else {
        node_padding
    };

    let mut nodes: Vec<SankeyNode> = names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let left = x0 + columns[index] as f64 * kx;
            SankeyNode {
                index,
                name,
                column: columns[index],
                value: out_sum[index].max(in_sum[index]),
                x0: left,
                x1: left + node_width,
                y0: 0.0,
                y1: 0.0,
            }
        })
        .collect();

    let ky = members
        .iter()
        .filter_map(|m| {
            let total: f64 = m.iter().map(|i| nodes[*i].value).sum();
            (total > 0.0).then(|| (y1 - y0 - (m.len() as f64 - 1.0) * py) / total)
        })
        .map(OrderedFloat)
        .min()
        .map(|k| k.0.max(0.0))
        .unwrap_or(0.0);

    for column in &members {
        let mut y = y0;
        for i in column {
            let node = &mut nodes[*i];
            node.y0 = y;
            node.y1 = y + node.value * ky;
            y = node.y1 + py;
        }
        let spare = (y1 - y + py) / (column.len() + 1) as f64;
        for (position, i) in column.iter().enumerate() {
            let node = &mut nodes[*i];
            node.y0 += spare * (position + 1) as f64;
            node.y1 += spare * (position + 1) as f64;
        }
    }

    let mut links: Vec<SankeyLink> = links
        .iter()
        .map(|(s, t, v)| SankeyLink {
            source: *s,
            target: *t,
            value: *v,
            width: v * ky,
            x0: nodes[*s].x1,
            x1: nodes[*t].x0,
            y0: 0.0,
            y1: 0.0,
        })
        .collect();

    let mut node_links = NodeLinks::new(n, &links);
    for i in 0..n {
        node_links.sort_outgoing(i, &nodes, &links);
        node_links.sort_incoming(i, &nodes, &links);
    }

    let mut relaxation = Relaxation {
        nodes: &mut nodes,
        links: &links,
        node_links: &mut node_links,
        py,
        y0,
        y1,
    };
    for i in 0..iterations {
        let alpha = 0.99f64.powi(i as i32);
        let beta = (1.0 - alpha).max((i + 1) as f64 / iterations as f64);
        for c in (0..column_count.saturating_sub(1)).rev() {
            relaxation.relax(&mut members[c], false, alpha, beta);
        }
        for column in members.iter_mut().skip(1) {
            relaxation.relax(column, true, alpha, beta);
        }
    }

    // Stack links on each node edge in list order
    for node in &nodes {
        let mut y = node.y0;
        for l in &node_links.outgoing[node.index] {
            links[*l].y0 = y + links[*l].width / 2.0;
            y += links[*l].width;
        }
        let mut y = node.y0;
        for l in &node_links.incoming[node.index] {
            links[*l].y1 = y + links[*l].width / 2.0;
            y += links[*l].width;
        }
    }

    Ok(SankeyGraph { nodes, links })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyEncoding {
    pub grouping: CategoryGrouping,
    pub graph: SankeyGraph,
    pub node_fill: String,
    pub link_stroke: String,
    pub min_link_width: f64,
}

impl EncodeTrait for SankeyConfig {
    type Encoding = SankeyEncoding;

    fn encode(&self, records: &[SalaryRecord], layout: &LayoutConfig) -> Result<SankeyEncoding> {
        let grouping = group_counts(records, self.source, self.target);
        let sources = grouping.a_levels.len();

        // Nodes are indexed by position, so a value shared by both fields still gets two nodes
        let names: Vec<String> = grouping
            .a_levels
            .iter()
            .chain(grouping.b_levels.iter())
            .cloned()
            .collect();
        let columns: Vec<usize> = (0..names.len()).map(|i| usize::from(i >= sources)).collect();
        let links: Vec<(usize, usize, f64)> = grouping
            .groups
            .iter()
            .filter_map(|g| {
                let s = grouping.a_levels.iter().position(|l| *l == g.a)?;
                let t = grouping.b_levels.iter().position(|l| *l == g.b)?;
                Some((s, sources + t, g.count as f64))
            })
            .collect();

        let graph = sankey_layout(
            names,
            &columns,
            &links,
            layout.band_extent(),
            self.node_width,
            self.node_padding,
            self.iterations,
        )?;

        Ok(SankeyEncoding {
            grouping,
            graph,
            node_fill: self.node_fill.clone(),
            link_stroke: self.link_stroke.clone(),
            min_link_width: self.min_link_width,
        })
    }
}

impl SankeyEncoding {
    /// Drawn thickness of a link
    pub fn stroke_width(&self, link: &SankeyLink) -> f64 {
        link.width.max(self.min_link_width)
    }

    pub fn mark_keys(&self) -> Vec<MarkKey> {
        self.graph
            .nodes
            .iter()
            .map(|n| MarkKey::Group(n.index))
            .chain(
                self.graph
                    .links
                    .iter()
                    .map(|l| MarkKey::Link(l.source, l.target)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::RecordId;

    fn record(id: u32, exp: &str, size: &str) -> SalaryRecord {
        SalaryRecord {
            id: RecordId(id),
            salary: 90000.0,
            year: 2022,
            experience_level: exp.to_string(),
            company_size: size.to_string(),
            employment_type: "FT".to_string(),
        }
    }

    #[test]
    fn test_two_column_layout() {
        let records = vec![record(0, "EN", "S"), record(1, "SE", "L")];
        let encoding = SankeyConfig::default()
            .encode(&records, &LayoutConfig::default())
            .unwrap();
        let nodes = &encoding.graph.nodes;
        let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["EN", "SE", "S", "L"]);

        assert_eq!((nodes[0].x0, nodes[0].x1), (0.0, 15.0));
        assert_eq!((nodes[2].x0, nodes[2].x1), (875.0, 890.0));
        assert_eq!((nodes[0].y0, nodes[0].y1), (0.0, 120.0));
        assert_eq!((nodes[1].y0, nodes[1].y1), (130.0, 250.0));

        let link = &encoding.graph.links[0];
        assert_eq!((link.source, link.target), (0, 2));
        assert_eq!(link.width, 120.0);
        assert_eq!((link.x0, link.x1), (15.0, 875.0));
        assert_eq!((link.y0, link.y1), (60.0, 60.0));
        assert_eq!(link.path(), "M15,60C445,60,445,60,875,60");
    }

    #[test]
    fn test_link_values_sum_to_record_count() {
        let records = vec![
            record(0, "SE", "L"),
            record(1, "SE", "M"),
            record(2, "MI", "M"),
            record(3, "SE", "L"),
            record(4, "EN", "S"),
        ];
        let encoding = SankeyConfig::default()
            .encode(&records, &LayoutConfig::default())
            .unwrap();
        let total: f64 = encoding.graph.links.iter().map(|l| l.value).sum();
        assert_eq!(total, records.len() as f64);

        // Every node lies inside the band and nodes in a column do not overlap
        for column in 0..2 {
            let mut spans: Vec<_> = encoding
                .graph
                .nodes
                .iter()
                .filter(|n| n.column == column)
                .map(|n| (n.y0, n.y1))
                .collect();
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            assert!(spans.iter().all(|(y0, y1)| *y0 >= -1e-6 && *y1 <= 250.0 + 1e-6));
            assert!(spans.windows(2).all(|w| w[0].1 <= w[1].0 + 1e-6));
        }
        assert!(encoding
            .graph
            .links
            .iter()
            .all(|l| encoding.stroke_width(l) >= 1.0));
    }

    fn crossing_layout(iterations: usize) -> SankeyGraph {
        let names = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        sankey_layout(
            names,
            &[0, 0, 1, 1],
            &[(0, 3, 1.0), (1, 2, 1.0)],
            [[0.0, 0.0], [890.0, 250.0]],
            15.0,
            10.0,
            iterations,
        )
        .unwrap()
    }

    #[test]
    fn test_relaxation_uncrosses_links() {
        let initial = crossing_layout(0);
        assert_eq!((initial.nodes[0].y0, initial.nodes[1].y0), (0.0, 130.0));
        assert_eq!((initial.links[0].y0, initial.links[0].y1), (60.0, 190.0));

        let relaxed = crossing_layout(6);
        let spans: Vec<_> = relaxed.nodes.iter().map(|n| (n.y0, n.y1)).collect();
        assert_eq!(
            spans,
            vec![(130.0, 250.0), (0.0, 120.0), (0.0, 120.0), (130.0, 250.0)]
        );
        assert_eq!((relaxed.links[0].y0, relaxed.links[0].y1), (190.0, 190.0));
        assert_eq!((relaxed.links[1].y0, relaxed.links[1].y1), (60.0, 60.0));
    }

    #[test]
    fn test_shared_value_gets_two_nodes() {
        let records = vec![record(0, "M", "M")];
        let encoding = SankeyConfig::default()
            .encode(&records, &LayoutConfig::default())
            .unwrap();
        assert_eq!(encoding.graph.nodes.len(), 2);
        assert_eq!(encoding.graph.links[0].source, 0);
        assert_eq!(encoding.graph.links[0].target, 1);
    }

    #[test]
    fn test_empty_and_invalid() {
        let encoding = SankeyConfig::default()
            .encode(&[], &LayoutConfig::default())
            .unwrap();
        assert!(encoding.graph.nodes.is_empty());
        assert!(encoding.mark_keys().is_empty());

        let result = sankey_layout(
            vec!["a".to_string()],
            &[0],
            &[(0, 3, 1.0)],
            [[0.0, 0.0], [10.0, 10.0]],
            1.0,
            1.0,
            6,
        );
        assert!(result.is_err());
    }
}
