use serde::{Deserialize, Serialize};

/// Width/height pair in pixels. Rendered sizes can be fractional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dims {
    pub w: f64,
    pub h: f64,
}

impl Dims {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Ratio of the on-screen image height to the height its geometry was analyzed at.
///
/// Height drives the scale since the renderer preserves aspect ratio. A zero (or otherwise
/// unusable) analyzed height falls back to `1.0`.
pub fn compute_display_scale(rendered: Dims, analyzed: Dims) -> f64 {
    if !(analyzed.h.is_finite() && analyzed.h > 0.0) {
        return 1.0;
    }
    rendered.h / analyzed.h
}

/// Size an image of `analyzed` dims renders at when fit to `container_w` and zoomed.
pub fn rendered_dims(container_w: f64, zoom: f64, analyzed: Dims) -> Dims {
    let w = container_w * zoom;
    let h = if analyzed.w > 0.0 {
        w * analyzed.h / analyzed.w
    } else {
        0.0
    };
    Dims { w, h }
}

/// Keeps the display scale current as the host reports size changes.
///
/// `observe` is idempotent: feeding the same rendered size twice yields the same scale and
/// reports no change the second time.
#[derive(Debug, Clone)]
pub struct ScaleTracker {
    analyzed: Dims,
    scale: f64,
}

impl ScaleTracker {
    pub fn new(analyzed: Dims) -> Self {
        Self {
            analyzed,
            scale: 1.0,
        }
    }

    pub fn analyzed(&self) -> Dims {
        self.analyzed
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Recompute from a new rendered size. Returns `Some(scale)` only when the value moved.
    pub fn observe(&mut self, rendered: Dims) -> Option<f64> {
        let scale = compute_display_scale(rendered, self.analyzed);
        if scale == self.scale {
            return None;
        }
        tracing::trace!(from = self.scale, to = scale, "display scale changed");
        self.scale = scale;
        Some(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_height_ratio() {
        let s = compute_display_scale(Dims::new(300.0, 500.0), Dims::new(600.0, 1000.0));
        assert_eq!(s, 0.5);
    }

    #[test]
    fn zero_analyzed_height_falls_back_to_one() {
        let s = compute_display_scale(Dims::new(0.0, 300.0), Dims::new(0.0, 0.0));
        assert_eq!(s, 1.0);
        assert!(s.is_finite());

        assert_eq!(compute_display_scale(Dims::new(10.0, 300.0), Dims::new(10.0, f64::NAN)), 1.0);
        assert_eq!(compute_display_scale(Dims::new(10.0, 300.0), Dims::new(10.0, -4.0)), 1.0);
    }

    #[test]
    fn rendered_dims_preserve_aspect() {
        let analyzed = Dims::new(600.0, 1800.0);
        assert_eq!(rendered_dims(300.0, 1.0, analyzed), Dims::new(300.0, 900.0));
        assert_eq!(rendered_dims(300.0, 2.0, analyzed), Dims::new(600.0, 1800.0));
        assert_eq!(rendered_dims(300.0, 1.0, Dims::default()), Dims::new(300.0, 0.0));
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut t = ScaleTracker::new(Dims::new(600.0, 1000.0));
        assert_eq!(t.scale(), 1.0);

        assert_eq!(t.observe(Dims::new(600.0, 1000.0)), None, "same as the initial scale");
        assert_eq!(t.observe(Dims::new(300.0, 500.0)), Some(0.5));
        assert_eq!(t.observe(Dims::new(300.0, 500.0)), None);
        assert_eq!(t.scale(), 0.5);
        assert_eq!(t.observe(Dims::new(1200.0, 2000.0)), Some(2.0));
    }

    #[test]
    fn tracker_with_unloaded_analysis_stays_neutral() {
        let mut t = ScaleTracker::new(Dims::default());
        assert_eq!(t.observe(Dims::new(320.0, 900.0)), None);
        assert_eq!(t.scale(), 1.0);
    }
}
