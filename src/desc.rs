use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Result, SliceError};
use crate::overlay::Block;
use crate::scale::Dims;

macro_rules! transparent_newtype {
    ($name:ident($inner:ty)) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);
    };
}

macro_rules! transparent_newtype_copy {
    ($name:ident($inner:ty)) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);
    };
}

transparent_newtype_copy!(LineId(u32));
impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

transparent_newtype!(Guid(String));
impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_MIN_SEPARATION_PCT: f64 = 3.0;
pub const DEFAULT_MIN_FOOTER_PCT: f64 = 10.0;
pub const NO_FOOTER_PCT: f64 = 100.0;
pub const SLICE_DESC_VERSION: u32 = 1;

/// Editing constraints applied to cut lines and the footer cutoff.
///
/// These are enforced when lines are placed or dragged, never inside the region builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceLimits {
    #[serde(default = "default_min_separation_pct")]
    pub min_separation_pct: f64,
    #[serde(default = "default_min_footer_pct")]
    pub min_footer_pct: f64,
}

impl Default for SliceLimits {
    fn default() -> Self {
        Self {
            min_separation_pct: DEFAULT_MIN_SEPARATION_PCT,
            min_footer_pct: DEFAULT_MIN_FOOTER_PCT,
        }
    }
}

impl SliceLimits {
    /// `min_separation_pct` in `[0, 50)`, `min_footer_pct` in `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        let sep_ok = (0.0..50.0).contains(&self.min_separation_pct);
        let footer_ok = (0.0..=NO_FOOTER_PCT).contains(&self.min_footer_pct);
        if sep_ok && footer_ok {
            Ok(())
        } else {
            Err(SliceError::InvalidLimits {
                min_separation_pct: self.min_separation_pct,
                min_footer_pct: self.min_footer_pct,
            })
        }
    }
}

fn default_min_separation_pct() -> f64 {
    DEFAULT_MIN_SEPARATION_PCT
}

fn default_min_footer_pct() -> f64 {
    DEFAULT_MIN_FOOTER_PCT
}

fn default_version() -> u32 {
    SLICE_DESC_VERSION
}

fn default_footer_pct() -> f64 {
    NO_FOOTER_PCT
}

/// Per-slice metadata carried into the output, matched by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceMetaDesc {
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A slicing job as saved next to a design image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDesc {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub guid: Option<Guid>,
    /// Cut positions in percent of image height. Order doesn't matter.
    #[serde(default)]
    pub cut_lines: Vec<f64>,
    #[serde(default = "default_footer_pct")]
    pub footer_pct: f64,
    #[serde(default)]
    pub limits: SliceLimits,
    /// Dimensions the `blocks` geometry was measured against.
    #[serde(default)]
    pub analyzed: Option<Dims>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub slices: Vec<SliceMetaDesc>,
}

impl Default for SliceDesc {
    fn default() -> Self {
        Self {
            version: SLICE_DESC_VERSION,
            guid: None,
            cut_lines: Vec::new(),
            footer_pct: NO_FOOTER_PCT,
            limits: SliceLimits::default(),
            analyzed: None,
            blocks: Vec::new(),
            slices: Vec::new(),
        }
    }
}

impl SliceDesc {
    pub fn validate(&self) -> Result<()> {
        if self.version != SLICE_DESC_VERSION {
            return Err(SliceError::UnsupportedVersion(self.version));
        }
        self.limits.validate()
    }
}

pub fn parse_slice_json(json_text: &str) -> Result<SliceDesc, serde_json::Error> {
    serde_json::from_str(json_text)
}

pub fn load_slice_desc<P: AsRef<Path>>(path: P) -> Result<SliceDesc> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SliceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let desc = parse_slice_json(&text)?;
    desc.validate()?;
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_desc_deserializes_sample_json() {
        let sample = r#"
        {
            "version": 1,
            "guid": "JGYYJQBHTX",
            "cut_lines": [60.0, 30.0],
            "footer_pct": 90,
            "limits": { "min_separation_pct": 5 },
            "analyzed": { "w": 600, "h": 1000 },
            "blocks": [
                { "id": "hero", "x": 10, "y": 20, "width": 100, "height": 50 }
            ],
            "slices": [
                { "alt_text": "Spring sale hero", "link": "https://shop.example.com/sale" },
                {},
                { "alt_text": "Footer-adjacent promo" }
            ],
            "unknown_field": true
        }
        "#;

        let desc = parse_slice_json(sample).expect("sample json should deserialize");

        assert_eq!(desc.version, 1);
        assert_eq!(desc.guid, Some(Guid("JGYYJQBHTX".to_string())));
        assert_eq!(desc.cut_lines, vec![60.0, 30.0]);
        assert_eq!(desc.footer_pct, 90.0);
        assert_eq!(desc.limits.min_separation_pct, 5.0);
        assert_eq!(desc.limits.min_footer_pct, DEFAULT_MIN_FOOTER_PCT, "missing limit keeps default");
        assert_eq!(desc.analyzed, Some(Dims { w: 600.0, h: 1000.0 }));
        assert_eq!(desc.blocks.len(), 1);
        assert_eq!(desc.blocks[0].id, "hero");
        assert_eq!(desc.slices.len(), 3);
        assert_eq!(desc.slices[1], SliceMetaDesc::default());
        assert_eq!(desc.slices[2].link, None);
    }

    #[test]
    fn minimal_desc_uses_defaults() {
        let desc = parse_slice_json("{}").unwrap();
        assert_eq!(desc.version, SLICE_DESC_VERSION);
        assert!(desc.cut_lines.is_empty());
        assert_eq!(desc.footer_pct, NO_FOOTER_PCT);
        assert_eq!(desc.limits, SliceLimits::default());
        assert!(desc.analyzed.is_none());
    }

    #[test]
    fn load_reports_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        match load_slice_desc(&missing) {
            Err(SliceError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn limits_outside_percent_range_are_rejected() {
        let desc = parse_slice_json(r#"{ "limits": { "min_footer_pct": 150 } }"#).unwrap();
        assert!(matches!(desc.validate(), Err(SliceError::InvalidLimits { .. })));

        let bad_sep = SliceLimits {
            min_separation_pct: -1.0,
            ..SliceLimits::default()
        };
        assert!(bad_sep.validate().is_err());
        let nan_footer = SliceLimits {
            min_footer_pct: f64::NAN,
            ..SliceLimits::default()
        };
        assert!(nan_footer.validate().is_err());
        assert!(SliceLimits::default().validate().is_ok());
    }

    #[test]
    fn load_rejects_unknown_version_and_bad_limits() {
        let dir = tempfile::tempdir().unwrap();

        let v2 = dir.path().join("v2.json");
        std::fs::write(&v2, r#"{ "version": 2 }"#).unwrap();
        assert!(matches!(load_slice_desc(&v2), Err(SliceError::UnsupportedVersion(2))));

        let limits = dir.path().join("limits.json");
        std::fs::write(&limits, r#"{ "version": 1, "limits": { "min_footer_pct": 150 } }"#).unwrap();
        assert!(matches!(load_slice_desc(&limits), Err(SliceError::InvalidLimits { .. })));

        let ok = dir.path().join("ok.json");
        std::fs::write(&ok, r#"{ "cut_lines": [40] }"#).unwrap();
        assert_eq!(load_slice_desc(&ok).unwrap().cut_lines, vec![40.0]);
    }

    #[test]
    fn line_id_displays_with_hash() {
        assert_eq!(LineId(7).to_string(), "#7");
    }
}
