use crate::desc::{LineId, NO_FOOTER_PCT, SliceLimits};
use crate::error::{Result, SliceError};
use crate::region::{Region, build_regions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutLine {
    pub id: LineId,
    pub pct: f64,
}

/// The user-placed cut lines plus the footer cutoff for one editing session.
///
/// Invariants kept after every mutation:
///   * `lines` is sorted by `pct` ascending.
///   * every line satisfies `0 < pct < footer_pct`.
///   * `footer_pct` is in `[limits.min_footer_pct, 100]`.
///
/// Minimum separation is enforced when a line is added and when it is dragged; lines that
/// were loaded through `with_lines` are taken as given.
#[derive(Debug, Clone, PartialEq)]
pub struct CutLineSet {
    lines: Vec<CutLine>,
    footer_pct: f64,
    limits: SliceLimits,
    next_id: u32,
}

impl CutLineSet {
    pub fn new(limits: SliceLimits) -> Self {
        Self {
            lines: Vec::new(),
            footer_pct: NO_FOOTER_PCT,
            limits,
            next_id: 1,
        }
    }

    /// Seed from saved percentages, e.g. a job description.
    ///
    /// The footer is applied first so the footer invariant drops any line at or below it.
    pub fn with_lines(limits: SliceLimits, cut_pcts: &[f64], footer_pct: f64) -> Self {
        let mut set = Self::new(limits);
        set.set_footer(footer_pct);
        for &pct in cut_pcts {
            if pct > 0.0 && pct < set.footer_pct {
                let id = set.alloc_id();
                set.lines.push(CutLine { id, pct });
            }
        }
        set.sort();
        set
    }

    pub fn lines(&self) -> &[CutLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn footer_pct(&self) -> f64 {
        self.footer_pct
    }

    pub fn limits(&self) -> SliceLimits {
        self.limits
    }

    pub fn get(&self, id: LineId) -> Option<&CutLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Sorted cut positions in percent.
    pub fn percentages(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.pct).collect()
    }

    pub fn regions(&self, natural_h: u32) -> Vec<Region> {
        build_regions(&self.percentages(), self.footer_pct, natural_h)
    }

    /// Place a new line. Rejects positions outside `(0, footer)` and positions closer than
    /// the minimum separation to an existing line, the top edge or the footer. A line `add`
    /// accepts is already inside the range `move_line` clamps to.
    pub fn add(&mut self, pct: f64) -> Result<LineId> {
        if !(pct > 0.0 && pct < self.footer_pct) {
            return Err(SliceError::CutOutOfRange {
                pct,
                footer: self.footer_pct,
            });
        }

        let sep = self.limits.min_separation_pct;
        let near_edge = [0.0, self.footer_pct].into_iter().find(|edge| (edge - pct).abs() < sep);
        let near_line = || self.lines.iter().map(|l| l.pct).find(|p| (p - pct).abs() < sep);
        if let Some(neighbor) = near_edge.or_else(near_line) {
            return Err(SliceError::CutTooClose { pct, neighbor });
        }

        let id = self.alloc_id();
        self.lines.push(CutLine { id, pct });
        self.sort();
        tracing::debug!(%id, pct, "cut line added");
        Ok(id)
    }

    /// Drag a line to `pct`, clamped into the range bounded by its neighbours (or the top edge
    /// and the footer) minus the minimum separation. Returns the position actually applied.
    ///
    /// If the neighbours are already closer than twice the separation the line stays put.
    pub fn move_line(&mut self, id: LineId, pct: f64) -> Result<f64> {
        let i = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(SliceError::UnknownLine(id))?;

        if !pct.is_finite() {
            return Err(SliceError::CutOutOfRange {
                pct,
                footer: self.footer_pct,
            });
        }

        let sep = self.limits.min_separation_pct;
        let prev = i.checked_sub(1).map_or(0.0, |j| self.lines[j].pct);
        let next = self.lines.get(i + 1).map_or(self.footer_pct, |l| l.pct);
        let lo = prev + sep;
        let hi = next - sep;

        let cur = self.lines[i].pct;
        let applied = if lo <= hi { pct.clamp(lo, hi) } else { cur };

        self.lines[i].pct = applied;
        self.sort();
        Ok(applied)
    }

    pub fn remove(&mut self, id: LineId) -> Result<CutLine> {
        let i = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(SliceError::UnknownLine(id))?;
        Ok(self.lines.remove(i))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Move the footer cutoff, clamped to `[min_footer_pct, 100]`.
    ///
    /// Any line at or below the new footer is removed; their ids are returned. NaN is ignored.
    pub fn set_footer(&mut self, footer_pct: f64) -> Vec<LineId> {
        if footer_pct.is_nan() {
            return Vec::new();
        }
        // A minimum above 100 collapses to 100.
        let footer_pct = footer_pct.max(self.limits.min_footer_pct).min(NO_FOOTER_PCT);
        self.footer_pct = footer_pct;

        let mut dropped: Vec<LineId> = Vec::new();
        self.lines.retain(|l| {
            let keep = l.pct < footer_pct;
            if !keep {
                dropped.push(l.id);
            }
            keep
        });

        if !dropped.is_empty() {
            tracing::debug!(footer_pct, dropped = dropped.len(), "footer moved above cut lines");
        }
        dropped
    }

    fn alloc_id(&mut self) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        id
    }

    fn sort(&mut self) {
        self.lines.sort_by(|a, b| a.pct.total_cmp(&b.pct));
    }
}

impl Default for CutLineSet {
    fn default() -> Self {
        Self::new(SliceLimits::default())
    }
}
