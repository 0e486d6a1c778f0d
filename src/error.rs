use std::path::PathBuf;

use crate::desc::LineId;

/// Errors raised by slicing sessions, cut-line edits and image/JSON IO.
///
/// The pure geometry functions (`region`, `scale`, `overlay`) never fail.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    /// The source image has a zero dimension, so no region means anything.
    #[error("source image is not loaded (zero width or height)")]
    ImageNotLoaded,
    /// A cut line was placed or moved too close to a sibling.
    #[error("cut line at {pct:.2}% is closer than the minimum separation to the line at {neighbor:.2}%")]
    CutTooClose { pct: f64, neighbor: f64 },
    /// A cut line fell outside `(0, footer)`.
    #[error("cut line at {pct:.2}% is outside (0, {footer:.2})")]
    CutOutOfRange { pct: f64, footer: f64 },
    /// Job limits that would make the footer or separation rules meaningless.
    #[error("invalid limits: min_separation_pct={min_separation_pct}, min_footer_pct={min_footer_pct}")]
    InvalidLimits { min_separation_pct: f64, min_footer_pct: f64 },
    #[error("unsupported slice description version {0}")]
    UnsupportedVersion(u32),
    #[error("no cut line with id {0}")]
    UnknownLine(LineId),
    #[error("no slice at index {0}")]
    NoSuchSlice(usize),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("slice JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T, E = SliceError> = std::result::Result<T, E>;
