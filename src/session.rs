use crate::cut_lines::CutLineSet;
use crate::desc::{SliceDesc, SliceLimits};
use crate::error::{Result, SliceError};
use crate::region::Region;
use crate::slicer::{Slice, SourceImage, slices_from_regions};

/// One editing pass over a design image.
///
/// Owns the source image and the cut geometry. `process` consumes the session: once slices
/// exist the cut lines and footer position are gone, only the slices remain.
#[derive(Debug)]
pub struct EditSession {
    source: SourceImage,
    cut_lines: CutLineSet,
}

impl EditSession {
    /// Start a session. Fails if the image hasn't finished loading (zero dimensions) or the
    /// limits are out of range.
    pub fn new(source: SourceImage, limits: SliceLimits) -> Result<Self> {
        if !source.is_loaded() {
            return Err(SliceError::ImageNotLoaded);
        }
        limits.validate()?;
        Ok(Self {
            source,
            cut_lines: CutLineSet::new(limits),
        })
    }

    /// Resume from a saved description: its limits, cut lines and footer.
    pub fn from_desc(source: SourceImage, desc: &SliceDesc) -> Result<Self> {
        desc.validate()?;
        let mut session = Self::new(source, desc.limits)?;
        session.cut_lines = CutLineSet::with_lines(desc.limits, &desc.cut_lines, desc.footer_pct);
        Ok(session)
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn cut_lines(&self) -> &CutLineSet {
        &self.cut_lines
    }

    pub fn cut_lines_mut(&mut self) -> &mut CutLineSet {
        &mut self.cut_lines
    }

    /// Swap in geometry edited elsewhere (e.g. the preview window).
    pub fn set_cut_lines(&mut self, cut_lines: CutLineSet) {
        self.cut_lines = cut_lines;
    }

    /// Apply command-line style overrides on top of the loaded geometry.
    ///
    /// The footer goes first so it can drop loaded lines; then, if any cuts are given, they
    /// replace the loaded ones and each is validated by `CutLineSet::add`.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(footer) = overrides.footer_pct {
            let dropped = self.cut_lines.set_footer(footer);
            if !dropped.is_empty() {
                tracing::info!(dropped = dropped.len(), "cut lines below the footer removed");
            }
        }
        if !overrides.cut_pcts.is_empty() {
            self.cut_lines.clear();
            for &pct in &overrides.cut_pcts {
                self.cut_lines.add(pct)?;
            }
        }
        Ok(())
    }

    /// Regions the current geometry would slice into.
    pub fn regions(&self) -> Vec<Region> {
        self.cut_lines.regions(self.source.natural_h())
    }

    /// Slice the image with the current geometry.
    pub fn process(self) -> Result<Vec<Slice>> {
        let regions = self.regions();
        let slices = slices_from_regions(&self.source, &regions)?;
        tracing::info!(
            w = self.source.natural_w(),
            h = self.source.natural_h(),
            cuts = self.cut_lines.len(),
            footer_pct = self.cut_lines.footer_pct(),
            slices = slices.len(),
            "processed slices"
        );
        Ok(slices)
    }

    /// `process`, then the description's per-slice alt text and links.
    pub fn process_with_meta(self, desc: &SliceDesc) -> Result<Vec<Slice>> {
        let mut slices = self.process()?;
        apply_slice_meta(&mut slices, desc);
        Ok(slices)
    }
}

/// Footer and cut positions that take precedence over a loaded description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub footer_pct: Option<f64>,
    pub cut_pcts: Vec<f64>,
}

/// Apply per-slice metadata from a description by position. Extra entries are ignored.
pub fn apply_slice_meta(slices: &mut [Slice], desc: &SliceDesc) {
    for (slice, meta) in slices.iter_mut().zip(&desc.slices) {
        slice.apply_meta(meta);
    }
}

/// Look up a slice for an edit (alt text, link) by its index.
pub fn slice_mut(slices: &mut [Slice], index: usize) -> Result<&mut Slice> {
    slices
        .iter_mut()
        .find(|s| s.index == index)
        .ok_or(SliceError::NoSuchSlice(index))
}
