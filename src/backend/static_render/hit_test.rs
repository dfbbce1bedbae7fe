use serde::{Deserialize, Serialize};

/// Pointer-sensitive geometry of one rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum HitShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Annular sector, same angle convention as `WedgePrimitive`.
    Wedge {
        center_x: f64,
        center_y: f64,
        inner_radius: f64,
        outer_radius: f64,
        start_angle_deg: f64,
        sweep_deg: f64,
    },
    /// Disc around a plotted point.
    Point { x: f64, y: f64, radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitRegion {
    pub original_index: usize,
    pub shape: HitShape,
}

impl HitRegion {
    #[must_use]
    pub fn new(original_index: usize, shape: HitShape) -> Self {
        Self {
            original_index,
            shape,
        }
    }

    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self.shape {
            HitShape::Rect {
                x,
                y,
                width,
                height,
            } => px >= x && px <= x + width && py >= y && py <= y + height,
            HitShape::Wedge {
                center_x,
                center_y,
                inner_radius,
                outer_radius,
                start_angle_deg,
                sweep_deg,
            } => {
                let dx = px - center_x;
                let dy = py - center_y;
                let radius = dx.hypot(dy);
                if radius < inner_radius || radius > outer_radius {
                    return false;
                }
                let angle = dy.atan2(dx).to_degrees();
                (angle - start_angle_deg).rem_euclid(360.0) <= sweep_deg
            }
            HitShape::Point { x, y, radius } => (px - x).hypot(py - y) <= radius,
        }
    }

    /// Where a tooltip for this element is anchored.
    #[must_use]
    pub fn anchor(&self) -> (f64, f64) {
        match self.shape {
            HitShape::Rect {
                x,
                y,
                width,
                height,
            } => (x + width / 2.0, y + height / 2.0),
            HitShape::Wedge {
                center_x,
                center_y,
                inner_radius,
                outer_radius,
                start_angle_deg,
                sweep_deg,
            } => {
                let mid = (start_angle_deg + sweep_deg / 2.0).to_radians();
                let radius = (inner_radius + outer_radius) / 2.0;
                (
                    center_x + radius * mid.cos(),
                    center_y + radius * mid.sin(),
                )
            }
            HitShape::Point { x, y, .. } => (x, y),
        }
    }
}

/// First region (in push order) containing the point.
#[must_use]
pub fn hit_test_regions(regions: &[HitRegion], x: f64, y: f64) -> Option<usize> {
    regions
        .iter()
        .find(|region| region.contains(x, y))
        .map(|region| region.original_index)
}

#[cfg(test)]
mod tests {
    use super::{HitRegion, HitShape, hit_test_regions};

    #[test]
    fn wedge_hit_wraps_across_zero_degrees() {
        let region = HitRegion::new(
            3,
            HitShape::Wedge {
                center_x: 100.0,
                center_y: 100.0,
                inner_radius: 20.0,
                outer_radius: 50.0,
                start_angle_deg: -90.0,
                sweep_deg: 180.0,
            },
        );
        assert!(region.contains(140.0, 100.0));
        assert!(region.contains(100.0, 65.0));
        assert!(!region.contains(60.0, 100.0));
        assert!(!region.contains(100.0, 100.0));
    }

    #[test]
    fn first_matching_region_wins() {
        let regions = [
            HitRegion::new(
                0,
                HitShape::Rect {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
            ),
            HitRegion::new(
                1,
                HitShape::Point {
                    x: 5.0,
                    y: 5.0,
                    radius: 8.0,
                },
            ),
        ];
        assert_eq!(hit_test_regions(&regions, 5.0, 5.0), Some(0));
        assert_eq!(hit_test_regions(&regions, 12.0, 5.0), Some(1));
        assert_eq!(hit_test_regions(&regions, 40.0, 40.0), None);
    }
}
