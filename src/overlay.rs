use serde::{Deserialize, Serialize};

use crate::region::Region;

/// A selectable element of the design with its box in analyzed-pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// On-screen rectangle in rendered pixels, relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open: the left/top edges hit, the right/bottom edges don't.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// Project analyzed-space boxes onto the screen. The blocks themselves are left untouched.
pub fn project_overlay(blocks: &[Block], scale: f64) -> Vec<ScreenRect> {
    blocks
        .iter()
        .map(|b| ScreenRect {
            left: b.x * scale,
            top: b.y * scale,
            width: b.width * scale,
            height: b.height * scale,
        })
        .collect()
}

/// Project slice regions as full-width bands. Degenerate regions project to zero height.
pub fn project_regions(regions: &[Region], natural_w: u32, scale: f64) -> Vec<ScreenRect> {
    regions
        .iter()
        .map(|r| ScreenRect {
            left: 0.0,
            top: r.top as f64 * scale,
            width: natural_w as f64 * scale,
            height: r.h() as f64 * scale,
        })
        .collect()
}

/// Index of the top-most rect under the point. Later rects draw over earlier ones.
pub fn hit_test(rects: &[ScreenRect], x: f64, y: f64) -> Option<usize> {
    rects.iter().rposition(|r| r.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, x: f64, y: f64, width: f64, height: f64) -> Block {
        Block {
            id: id.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn projects_by_scale() {
        let rects = project_overlay(&[block("hero", 10.0, 20.0, 100.0, 50.0)], 2.0);
        assert_eq!(
            rects,
            vec![ScreenRect {
                left: 20.0,
                top: 40.0,
                width: 200.0,
                height: 100.0
            }]
        );
    }

    #[test]
    fn projection_leaves_blocks_alone() {
        let blocks = vec![block("a", 1.0, 2.0, 3.0, 4.0)];
        let before = blocks.clone();
        let _ = project_overlay(&blocks, 0.5);
        assert_eq!(blocks, before);
    }

    #[test]
    fn regions_project_as_full_width_bands() {
        let regions = [Region { top: 0, bottom: 300 }, Region { top: 300, bottom: 600 }];
        let rects = project_regions(&regions, 600, 0.5);
        assert_eq!(rects[1], ScreenRect { left: 0.0, top: 150.0, width: 300.0, height: 150.0 });

        let degenerate = project_regions(&[Region { top: 50, bottom: 40 }], 10, 1.0);
        assert_eq!(degenerate[0].height, 0.0);
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let rects = project_overlay(
            &[
                block("background", 0.0, 0.0, 100.0, 100.0),
                block("button", 40.0, 40.0, 20.0, 10.0),
            ],
            1.0,
        );
        assert_eq!(hit_test(&rects, 45.0, 45.0), Some(1));
        assert_eq!(hit_test(&rects, 5.0, 5.0), Some(0));
        assert_eq!(hit_test(&rects, 100.0, 50.0), None, "right edge is exclusive");
        assert_eq!(hit_test(&rects, -1.0, 50.0), None);
    }
}
