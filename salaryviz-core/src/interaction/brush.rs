use serde::{Deserialize, Serialize};

/// A rectangular pixel selection `[[x0, y0], [x1, y1]]` with `x0 <= x1` and `y0 <= y1`.
///
/// Containment is half-open: left and top edges are inside, right and bottom edges are not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub selection: [[f64; 2]; 2],
}

impl Brush {
    /// Brush spanning two arbitrary corners, as produced by a drag in any direction
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            selection: [[a[0].min(b[0]), a[1].min(b[1])], [a[0].max(b[0]), a[1].max(b[1])]],
        }
    }

    /// Restrict the selection to `extent`, the area the brush is attached to
    pub fn clamp_to(self, extent: [[f64; 2]; 2]) -> Self {
        let [[ex0, ey0], [ex1, ey1]] = extent;
        let clamp = |v: f64, lo: f64, hi: f64| v.max(lo).min(hi);
        let [[x0, y0], [x1, y1]] = self.selection;
        Self {
            selection: [
                [clamp(x0, ex0, ex1), clamp(y0, ey0, ey1)],
                [clamp(x1, ex0, ex1), clamp(y1, ey0, ey1)],
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        let [[x0, y0], [x1, y1]] = self.selection;
        !(x0 < x1 && y0 < y1)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        let [[x0, y0], [x1, y1]] = self.selection;
        x0 <= px && px < x1 && y0 <= py && py < y1
    }
}

/// A point is highlighted when there is no brush, or when the brush contains it
pub fn is_highlighted(brush: Option<&Brush>, px: f64, py: f64) -> bool {
    match brush {
        None => true,
        Some(brush) => brush.contains(px, py),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_containment() {
        let brush = Brush::from_corners([10.0, 10.0], [20.0, 30.0]);
        assert!(brush.contains(10.0, 10.0));
        assert!(brush.contains(19.9, 29.9));
        assert!(!brush.contains(20.0, 15.0));
        assert!(!brush.contains(15.0, 30.0));
        assert!(!brush.contains(9.9, 15.0));
    }

    #[test]
    fn test_corners_are_normalized() {
        let brush = Brush::from_corners([20.0, 30.0], [10.0, 10.0]);
        assert_eq!(brush.selection, [[10.0, 10.0], [20.0, 30.0]]);
    }

    #[test]
    fn test_clamp_and_empty() {
        let brush = Brush::from_corners([-5.0, 100.0], [50.0, 400.0])
            .clamp_to([[0.0, 0.0], [890.0, 250.0]]);
        assert_eq!(brush.selection, [[0.0, 100.0], [50.0, 250.0]]);
        assert!(!brush.is_empty());
        assert!(Brush::from_corners([5.0, 5.0], [5.0, 9.0]).is_empty());
    }

    #[test]
    fn test_no_brush_highlights_everything() {
        assert!(is_highlighted(None, -1000.0, 1e9));
        let brush = Brush::from_corners([0.0, 0.0], [1.0, 1.0]);
        assert!(!is_highlighted(Some(&brush), 2.0, 0.5));
    }

    #[test]
    fn test_enlarging_never_shrinks_selection() {
        let points: Vec<(f64, f64)> = (0..200)
            .map(|i| ((i * 37 % 890) as f64, (i * 53 % 250) as f64))
            .collect();
        let mut previous = 0;
        for grow in 0..10 {
            let g = grow as f64 * 40.0;
            let brush = Brush::from_corners([300.0 - g, 100.0 - g], [400.0 + g, 150.0 + g]);
            let selected = points.iter().filter(|(x, y)| brush.contains(*x, *y)).count();
            assert!(selected >= previous);
            previous = selected;
        }
    }
}
