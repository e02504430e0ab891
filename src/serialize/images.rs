//! Image loading and display-box fitting.
use std::io::Cursor;
use std::path::Path;

use log::debug;

use crate::common::{Error, Result};
use crate::ooxml::OoxmlError;
use crate::ooxml::docx::ImageFormat;

/// Largest displayed width in pixels.
pub const MAX_WIDTH: f64 = 600.0;
/// Largest displayed height in pixels.
pub const MAX_HEIGHT: f64 = 800.0;

/// An image file read from disk.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Intrinsic size in pixels
    pub width: u32,
    pub height: u32,
}

/// Read `src` relative to `workdir`.
///
/// The extension decides whether the file is accepted at all; the pixel
/// size comes from the image header.
pub fn load_image(workdir: &Path, src: &str) -> Result<LoadedImage> {
    let path = workdir.join(src);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let format = ImageFormat::from_extension(&extension).ok_or_else(|| Error::UnsupportedImage {
        extension,
        path: path.clone(),
    })?;
    if !path.is_file() {
        return Err(Error::MissingFile(path));
    }
    let data = std::fs::read(&path)?;
    let (width, height) = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(OoxmlError::from)?;
    debug!("image {} is {}x{} px", path.display(), width, height);
    Ok(LoadedImage {
        data,
        format,
        width,
        height,
    })
}

/// Display size of an image in pixels.
///
/// Explicit width and height are used as given; a single explicit side keeps
/// the intrinsic aspect ratio. A zero side counts as not given. The result is
/// then scaled down to fit the `MAX_WIDTH` x `MAX_HEIGHT` box, height first,
/// and never drops below one pixel per side.
pub fn fit(intrinsic: (u32, u32), width: Option<u32>, height: Option<u32>) -> (u32, u32) {
    let (iw, ih) = (intrinsic.0.max(1) as f64, intrinsic.1.max(1) as f64);
    let width = width.filter(|&w| w > 0);
    let height = height.filter(|&h| h > 0);
    let (mut w, mut h) = match (width, height) {
        (Some(w), Some(h)) => (w as f64, h as f64),
        (Some(w), None) => (w as f64, ih / iw * w as f64),
        (None, Some(h)) => (iw / ih * h as f64, h as f64),
        (None, None) => (iw, ih),
    };
    if h > MAX_HEIGHT {
        w = w / h * MAX_HEIGHT;
        h = MAX_HEIGHT;
    }
    if w > MAX_WIDTH {
        h = h / w * MAX_WIDTH;
        w = MAX_WIDTH;
    }
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_explicit_box_is_kept() {
        assert_eq!(fit((1000, 1000), Some(300), Some(200)), (300, 200));
    }

    #[test]
    fn test_single_side_keeps_ratio() {
        assert_eq!(fit((400, 200), Some(300), None), (300, 150));
        assert_eq!(fit((400, 200), None, Some(100)), (200, 100));
    }

    #[test]
    fn test_large_image_is_scaled_down() {
        assert_eq!(fit((1200, 600), None, None), (600, 300));
        assert_eq!(fit((300, 1600), None, None), (150, 800));
    }

    #[test]
    fn test_zero_size_means_intrinsic() {
        assert_eq!(fit((100, 50), Some(0), Some(0)), (100, 50));
        assert_eq!(fit((400, 200), Some(0), Some(100)), (200, 100));
    }

    #[test]
    fn test_extreme_ratio_keeps_one_pixel() {
        assert_eq!(fit((1, 5000), Some(5000), None), (1, 800));
        assert_eq!(fit((5000, 1), None, None), (600, 1));
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(40, 20).save(dir.path().join("pic.png")).unwrap();
        let loaded = load_image(dir.path(), "pic.png").unwrap();
        assert_eq!((loaded.width, loaded.height), (40, 20));
        assert_eq!(loaded.format, ImageFormat::Png);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path(), "diagram.svg").unwrap_err();
        assert!(matches!(err, Error::UnsupportedImage { ref extension, .. } if extension == "svg"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path(), "absent.png").unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    proptest! {
        #[test]
        fn test_fit_stays_in_box(
            iw in 1u32..5000,
            ih in 1u32..5000,
            w in proptest::option::of(1u32..5000),
            h in proptest::option::of(1u32..5000),
        ) {
            let (fw, fh) = fit((iw, ih), w, h);
            prop_assert!(fw as f64 <= MAX_WIDTH);
            prop_assert!(fh as f64 <= MAX_HEIGHT);
            prop_assert!(fw >= 1 && fh >= 1);
        }

        #[test]
        fn test_fit_keeps_intrinsic_ratio(
            iw in 50u32..5000,
            ih in 50u32..5000,
            side in proptest::option::of(50u32..5000),
            by_width in any::<bool>(),
        ) {
            let (w, h) = match (side, by_width) {
                (Some(s), true) => (Some(s), None),
                (Some(s), false) => (None, Some(s)),
                (None, _) => (None, None),
            };
            let (fw, fh) = fit((iw, ih), w, h);
            // Each side is off by at most half a pixel after rounding.
            let skew = (fw as f64 * ih as f64 - fh as f64 * iw as f64).abs();
            prop_assert!(skew <= (iw + ih) as f64 / 2.0 + 1.0);
        }
    }
}
