use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::desc::SliceMetaDesc;
use crate::error::{Result, SliceError};
use crate::im::{RGBAIm, png_data_url};
use crate::region::{Region, build_regions};
use crate::scale::Dims;

/// The design image being sliced. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    im: RGBAIm,
}

impl SourceImage {
    pub fn new(im: RGBAIm) -> Self {
        Self { im }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(RGBAIm::load(path)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(RGBAIm::from_bytes(bytes)?))
    }

    pub fn im(&self) -> &RGBAIm {
        &self.im
    }

    pub fn natural_w(&self) -> u32 {
        self.im.w as u32
    }

    pub fn natural_h(&self) -> u32 {
        self.im.h as u32
    }

    pub fn natural_dims(&self) -> Dims {
        Dims::new(self.im.w as f64, self.im.h as f64)
    }

    /// False until the image has non-zero dimensions.
    pub fn is_loaded(&self) -> bool {
        !self.im.is_empty()
    }
}

/// One horizontal band of the design, ready to drop into an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...` until replaced by a hosted URL.
    pub image_url: String,
    pub alt_text: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub is_clickable: bool,
    /// Encoded PNG. Kept in memory for upload/writing; not part of the saved record.
    #[serde(skip)]
    pub png: Vec<u8>,
}

impl Slice {
    pub fn default_alt_text(index: usize) -> String {
        format!("Email section {}", index + 1)
    }

    pub fn set_alt_text(&mut self, alt_text: impl Into<String>) {
        self.alt_text = alt_text.into();
    }

    /// A non-empty link makes the slice clickable; `None` or an empty string clears it.
    pub fn set_link(&mut self, link: Option<String>) {
        let link = link.filter(|l| !l.trim().is_empty());
        self.is_clickable = link.is_some();
        self.link = link;
    }

    /// Swap the inline data URL for wherever the PNG ended up being hosted.
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = url.into();
    }

    pub fn apply_meta(&mut self, meta: &SliceMetaDesc) {
        if let Some(alt) = &meta.alt_text {
            self.set_alt_text(alt.clone());
        }
        if meta.link.is_some() {
            self.set_link(meta.link.clone());
        }
    }
}

/// Copy each region's rows out of the source at 1:1.
///
/// Every output is an independent buffer `natural_w` wide. Regions are clipped to the
/// source, so a degenerate or out-of-range region produces a zero-height band.
pub fn slice_raster(source: &RGBAIm, regions: &[Region]) -> Vec<RGBAIm> {
    regions
        .iter()
        .map(|region| {
            let roi = region.roi(source.w).clipped(source.w, source.h);
            source.crop_rows(roi.t, roi.b)
        })
        .collect()
}

/// Encode already-built regions into slices.
///
/// Degenerate regions are still emitted (zero height, no image) so indices line up with the
/// regions; detecting and reporting them is up to the caller.
pub fn slices_from_regions(source: &SourceImage, regions: &[Region]) -> Result<Vec<Slice>> {
    let bands = slice_raster(source.im(), regions);

    let mut slices: Vec<Slice> = Vec::with_capacity(bands.len());
    for (index, (region, band)) in regions.iter().zip(bands).enumerate() {
        if band.h == 0 {
            tracing::warn!(index, top = region.top, bottom = region.bottom, "degenerate slice region");
        } else {
            tracing::debug!(index, top = region.top, bottom = region.bottom, "slicing band");
        }

        // PNG can't hold a zero-height image; an empty slice has no image at all.
        let (png, image_url) = if band.is_empty() {
            (Vec::new(), String::new())
        } else {
            let png = band.encode_png()?;
            let url = png_data_url(&png);
            (png, url)
        };

        slices.push(Slice {
            index,
            width: band.w as u32,
            height: band.h as u32,
            image_url,
            alt_text: Slice::default_alt_text(index),
            link: None,
            is_clickable: false,
            png,
        });
    }

    Ok(slices)
}

/// Build regions from cut percentages and the footer cutoff, then slice and encode them.
///
/// The source must be loaded; see `EditSession` for the guarded entry point.
pub fn compute_slices(source: &SourceImage, cut_pcts: &[f64], footer_pct: f64) -> Result<Vec<Slice>> {
    let regions = build_regions(cut_pcts, footer_pct, source.natural_h());
    slices_from_regions(source, &regions)
}

pub const MANIFEST_FILE_NAME: &str = "slices.json";

pub fn slice_file_name(index: usize) -> String {
    format!("slice_{index:02}.png")
}

/// Write each slice's PNG plus a `slices.json` manifest into `out_dir`.
///
/// Unless `inline` is set, every written slice's `image_url` is replaced by its file name.
/// Imageless slices are listed in the manifest but no file is written for them. Returns the
/// manifest path.
pub fn write_slices<P: AsRef<Path>>(slices: &mut [Slice], out_dir: P, inline: bool) -> Result<PathBuf> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| SliceError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    for slice in slices.iter_mut() {
        if slice.png.is_empty() {
            tracing::warn!(index = slice.index, "skipping imageless slice");
            continue;
        }
        let name = slice_file_name(slice.index);
        let path = out_dir.join(&name);
        fs::write(&path, &slice.png).map_err(|source| SliceError::Io { path: path.clone(), source })?;
        tracing::debug!(index = slice.index, path = %path.display(), "wrote slice");
        if !inline {
            slice.set_image_url(name);
        }
    }

    let manifest_path = out_dir.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(&*slices)?;
    fs::write(&manifest_path, json).map_err(|source| SliceError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    Ok(manifest_path)
}
