// Library crate root.
//
// This crate is used both as a binary (src/main.rs) and as a library.
// Keeping modules here prevents "dead_code" warnings for public APIs that are
// intentionally exported for downstream crates.

pub mod im;
pub mod desc;
pub mod error;
pub mod region;
pub mod cut_lines;
pub mod scale;
pub mod overlay;
pub mod slicer;
pub mod session;
pub mod logging;
pub mod debug_ui;

pub use error::{Result, SliceError};
pub use overlay::project_overlay;
pub use region::build_regions;
pub use scale::compute_display_scale;
pub use slicer::compute_slices;

#[cfg(test)]
pub mod test_helpers;
