use super::core::RGBAIm;
use base64::Engine;
use image::{ImageFormat, ImageResult};
use std::io::Cursor;
use std::path::Path;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

fn dim_mismatch_err() -> image::ImageError {
    image::ImageError::Parameter(image::error::ParameterError::from_kind(
        image::error::ParameterErrorKind::DimensionMismatch,
    ))
}

// Decode
// -----------------------------------------------------------------------------
impl RGBAIm {
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let w = img.width() as usize;
        let h = img.height() as usize;
        Self {
            w,
            h,
            s: w * 4,
            arr: img.into_raw(),
        }
    }

    /// Decode any format `image` understands into RGBA8.
    pub fn load<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        let img = image::open(path)?.into_rgba8();
        Ok(Self::from_rgba_image(img))
    }

    pub fn from_bytes(bytes: &[u8]) -> ImageResult<Self> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        Ok(Self::from_rgba_image(img))
    }

    fn to_rgba_image(&self) -> ImageResult<image::RgbaImage> {
        // Repack in case the stride has padding.
        let mut raw: Vec<u8> = Vec::with_capacity(self.w * self.h * 4);
        for y in 0..self.h {
            raw.extend_from_slice(self.row(y));
        }
        image::RgbaImage::from_raw(self.w as u32, self.h as u32, raw).ok_or_else(dim_mismatch_err)
    }
}

// Encode
// -----------------------------------------------------------------------------
impl RGBAIm {
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_rgba_image()?
            .save_with_format(path, ImageFormat::Png)
    }

    /// Lossless PNG bytes, suitable for upload.
    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut out: Vec<u8> = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        Ok(out)
    }
}

/// Wrap PNG bytes as an inline `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png);
    format!("{PNG_DATA_URL_PREFIX}{b64}")
}

/// Inverse of [`png_data_url`]. Returns `None` for anything that isn't a base64 PNG data URL.
pub fn decode_png_data_url(url: &str) -> Option<Vec<u8>> {
    let b64 = url.strip_prefix(PNG_DATA_URL_PREFIX)?;
    base64::engine::general_purpose::STANDARD.decode(b64).ok()
}

// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bytes_decode_to_same_pixels() {
        let mut im = RGBAIm::new(4, 3);
        im.fill_rows(0, 1, [255, 0, 0, 255]);
        im.fill_rows(1, 3, [0, 0, 255, 128]);

        let png = im.encode_png().unwrap();
        assert_eq!(&png[..4], b"\x89PNG");

        let back = RGBAIm::from_bytes(&png).unwrap();
        assert_eq!(back, im);
    }

    #[test]
    fn data_url_has_png_prefix_and_decodes() {
        let im = RGBAIm::new(2, 2);
        let png = im.encode_png().unwrap();
        let url = png_data_url(&png);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_png_data_url(&url).unwrap(), png);
        assert!(decode_png_data_url("https://cdn.example.com/a.png").is_none());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.png");

        let mut im = RGBAIm::new(5, 2);
        im.fill_rows(0, 2, [1, 2, 3, 255]);
        im.save_png(&path).unwrap();

        let back = RGBAIm::load(&path).unwrap();
        assert_eq!(back, im);
    }
}
