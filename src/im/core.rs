#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Im<T, const N_CH: usize> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in elements (w * N_CH)
    pub arr: Vec<T>,
}

// Constructor
// -----------------------------------------------------------------------------
impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    pub fn new(w: usize, h: usize) -> Self {
        let s = w * N_CH;
        let arr = vec![T::default(); s * h];
        Self { w, h, s, arr }
    }
}

impl<T, const N_CH: usize> Im<T, N_CH> {
    /// An image with a zero dimension has nothing to slice (e.g. a decode that never finished).
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The `w * N_CH` elements of row `y`.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.s;
        &self.arr[start..start + self.w * N_CH]
    }
}

impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    /// Copy rows `[t, b)` into a new, tightly packed image of the same width.
    ///
    /// Bounds are clipped to the image, so an inverted or out-of-range pair yields
    /// an image with zero height rather than a panic.
    pub fn crop_rows(&self, t: usize, b: usize) -> Self {
        let b = b.min(self.h);
        let t = t.min(b);

        let mut out = Self::new(self.w, b - t);
        for (dst_y, src_y) in (t..b).enumerate() {
            let dst0 = dst_y * out.s;
            out.arr[dst0..dst0 + out.w * N_CH].copy_from_slice(self.row(src_y));
        }
        out
    }
}

pub type RGBAIm = Im<u8, 4>;

impl RGBAIm {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let base = y * self.s + x * 4;
        Some([
            self.arr[base],
            self.arr[base + 1],
            self.arr[base + 2],
            self.arr[base + 3],
        ])
    }

    pub fn fill_rows(&mut self, t: usize, b: usize, rgba: [u8; 4]) {
        let b = b.min(self.h);
        for y in t.min(b)..b {
            let row0 = y * self.s;
            for px in self.arr[row0..row0 + self.w * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_rows_copies_band() {
        let mut im = RGBAIm::new(3, 4);
        im.fill_rows(1, 3, [9, 8, 7, 255]);

        let band = im.crop_rows(1, 3);
        assert_eq!(band.w, 3);
        assert_eq!(band.h, 2);
        assert_eq!(band.s, 12);
        assert!(band.arr.chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
    }

    #[test]
    fn crop_rows_clips_to_image() {
        let im = RGBAIm::new(2, 5);
        assert_eq!(im.crop_rows(3, 99).h, 2);
        assert_eq!(im.crop_rows(4, 2).h, 0);
        assert_eq!(im.crop_rows(7, 9).h, 0);
    }

    #[test]
    fn zero_dim_is_empty() {
        assert!(RGBAIm::new(0, 10).is_empty());
        assert!(RGBAIm::new(10, 0).is_empty());
        assert!(!RGBAIm::new(1, 1).is_empty());
    }
}
