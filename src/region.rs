//! Cut-line percentages to pixel bands.
//!
//! A cut line is a percentage of the source image's natural height. The footer cutoff is a
//! percentage too; everything at or below it is left out of the slices. Regions are built fresh
//! every time slicing runs and are never stored.

use crate::im::ROI;

/// `round(percent / 100 * natural_h)`.
///
/// No clamping: `percent` is expected in `[0, 100]`. Out-of-range values saturate at the
/// `u32` bounds.
pub fn percent_to_pixel(percent: f64, natural_h: u32) -> u32 {
    (percent / 100.0 * natural_h as f64).round() as u32
}

/// Vertical pixel band `[top, bottom)` in source-image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub top: u32,
    pub bottom: u32,
}

impl Region {
    /// Zero when the region is degenerate (`bottom <= top`).
    pub fn h(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_degenerate(&self) -> bool {
        self.bottom <= self.top
    }

    /// Full-width ROI over an image `w` pixels wide.
    pub fn roi(&self, w: usize) -> ROI {
        ROI::band(self.top as usize, self.bottom as usize, w)
    }
}

/// Build contiguous regions covering `[0, footer)` from the cut percentages.
///
/// `cut_pcts` need not be sorted. There is no dedup or minimum-gap enforcement here: two cuts
/// at the same spot produce a zero-height region and a cut below the footer produces an
/// inverted final region. Callers keep cuts apart (see `CutLineSet`).
pub fn build_regions(cut_pcts: &[f64], footer_pct: f64, natural_h: u32) -> Vec<Region> {
    let mut sorted: Vec<f64> = cut_pcts.to_vec();
    sorted.sort_by(f64::total_cmp);

    let footer = percent_to_pixel(footer_pct, natural_h);

    let mut regions: Vec<Region> = Vec::with_capacity(sorted.len() + 1);
    let mut prev = 0_u32;
    for pct in sorted {
        let cur = percent_to_pixel(pct, natural_h);
        regions.push(Region {
            top: prev,
            bottom: cur,
        });
        prev = cur;
    }
    regions.push(Region {
        top: prev,
        bottom: footer,
    });

    regions
}
