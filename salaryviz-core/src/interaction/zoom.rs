use crate::scale::linear::LinearScale;
use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};

/// Uniform scale `k` followed by a translation `(x, y)`: a point `p` is displayed at `p * k + t`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [point[0] * self.k + self.x, point[1] * self.k + self.y]
    }

    pub fn invert(&self, point: [f64; 2]) -> [f64; 2] {
        [(point[0] - self.x) / self.k, (point[1] - self.y) / self.k]
    }

    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Translate by `(dx, dy)` in untransformed units
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            k: self.k,
            x: self.x + self.k * dx,
            y: self.y + self.k * dy,
        }
    }

    /// Copy of `scale` whose domain is what is visible under this transform
    pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
        let [r0, r1] = scale.range;
        let domain = [
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        ];
        scale.with_domain(domain)
    }
}

/// Zoom and pan limits for one chart band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBehavior {
    pub scale_extent: [f64; 2],
    /// Viewport, in pixels
    pub extent: [[f64; 2]; 2],
    /// Region the viewport may never leave
    pub translate_extent: [[f64; 2]; 2],
}

impl ZoomBehavior {
    pub fn new(extent: [[f64; 2]; 2]) -> Self {
        Self {
            scale_extent: [1.0, 8.0],
            extent,
            translate_extent: extent,
        }
    }

    pub fn with_scale_extent(self, scale_extent: [f64; 2]) -> Result<Self> {
        let [k0, k1] = scale_extent;
        if !(k0 > 0.0 && k0 <= k1) {
            return Err(SalaryVizError::specification(format!(
                "Invalid zoom scale extent: [{k0}, {k1}]"
            )));
        }
        Ok(Self {
            scale_extent,
            ..self
        })
    }

    /// Center of the viewport, the default zoom anchor
    pub fn center(&self) -> [f64; 2] {
        let [[x0, y0], [x1, y1]] = self.extent;
        [(x0 + x1) / 2.0, (y0 + y1) / 2.0]
    }

    /// Multiply the scale by `factor`, keeping the content under `anchor` fixed
    pub fn scale_by(
        &self,
        transform: &ZoomTransform,
        factor: f64,
        anchor: [f64; 2],
    ) -> ZoomTransform {
        self.scale_to(transform, transform.k * factor, anchor)
    }

    pub fn scale_to(&self, transform: &ZoomTransform, k: f64, anchor: [f64; 2]) -> ZoomTransform {
        let [k_min, k_max] = self.scale_extent;
        let k = if k.is_finite() {
            k.max(k_min).min(k_max)
        } else {
            transform.k
        };
        let p0 = transform.invert(anchor);
        let scaled = ZoomTransform {
            k,
            x: anchor[0] - p0[0] * k,
            y: anchor[1] - p0[1] * k,
        };
        self.constrain(&scaled)
    }

    /// Pan by a pixel offset
    pub fn pan_by(&self, transform: &ZoomTransform, dx: f64, dy: f64) -> ZoomTransform {
        self.constrain(&ZoomTransform {
            k: transform.k,
            x: transform.x + dx,
            y: transform.y + dy,
        })
    }

    /// Shift `transform` so that the viewport stays inside the translate extent. When the
    /// viewport is larger than the translate extent along an axis, it is centered on it.
    pub fn constrain(&self, transform: &ZoomTransform) -> ZoomTransform {
        let [[ex0, ey0], [ex1, ey1]] = self.extent;
        let [[tx0, ty0], [tx1, ty1]] = self.translate_extent;
        let dx0 = transform.invert_x(ex0) - tx0;
        let dx1 = transform.invert_x(ex1) - tx1;
        let dy0 = transform.invert_y(ey0) - ty0;
        let dy1 = transform.invert_y(ey1) - ty1;
        transform.translate(shift(dx0, dx1), shift(dy0, dy1))
    }
}

fn shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        (d0 + d1) / 2.0
    } else if d0.min(0.0) != 0.0 {
        d0.min(0.0)
    } else {
        d1.max(0.0)
    }
}
