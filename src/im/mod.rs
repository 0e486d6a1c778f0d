pub mod core;
pub use core::{Im, RGBAIm};

pub mod roi;
pub use roi::ROI;

pub mod io;
pub use io::{decode_png_data_url, png_data_url};
