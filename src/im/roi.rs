#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ROI {
    pub l: usize,
    pub t: usize,
    /// Exclusive right bound.
    pub r: usize,
    /// Exclusive bottom bound.
    pub b: usize,
}

impl ROI {
    /// Full-width horizontal band `[t, b)` of an image `w` pixels wide.
    pub fn band(t: usize, b: usize, w: usize) -> ROI {
        ROI { l: 0, t, r: w, b }
    }

    /// Width of the ROI.
    pub fn w(&self) -> usize {
        self.r.saturating_sub(self.l)
    }

    /// Height of the ROI.
    pub fn h(&self) -> usize {
        self.b.saturating_sub(self.t)
    }

    pub fn is_empty(&self) -> bool {
        self.w() == 0 || self.h() == 0
    }

    /// Clamp to an image of the given dims.
    pub fn clipped(&self, max_w: usize, max_h: usize) -> ROI {
        let r = self.r.min(max_w);
        let b = self.b.min(max_h);
        ROI {
            l: self.l.min(r),
            t: self.t.min(b),
            r,
            b,
        }
    }
}
