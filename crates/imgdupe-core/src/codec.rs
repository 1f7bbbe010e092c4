//! Adapter between the image decoder and the resampler's source formats.

use crate::error::{Error, Result};
use crate::resample::SourceImage;
use image::DynamicImage;
use std::path::Path;

/// Decode the image at `path` into a resampling source.
///
/// Decode failures carry the offending path so they can be reported per file
/// without stopping a batch.
pub fn load(path: &Path) -> Result<SourceImage> {
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(from_dynamic(img))
}

/// Map a decoded image onto the closest native storage variant.
pub fn from_dynamic(img: DynamicImage) -> SourceImage {
    let (w, h) = (img.width() as usize, img.height() as usize);
    match img {
        DynamicImage::ImageLuma8(buf) => SourceImage::gray8(w, h, buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => SourceImage::gray16(w, h, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => {
            let mut pix = Vec::with_capacity(w * h * 4);
            for p in buf.into_raw().chunks_exact(2) {
                pix.extend_from_slice(&[p[0], p[0], p[0], p[1]]);
            }
            SourceImage::nrgba8(w, h, pix)
        }
        DynamicImage::ImageLumaA16(buf) => {
            let mut pix = Vec::with_capacity(w * h * 4);
            for p in buf.into_raw().chunks_exact(2) {
                pix.extend_from_slice(&[p[0], p[0], p[0], p[1]]);
            }
            SourceImage::nrgba16(w, h, pix)
        }
        DynamicImage::ImageRgb8(buf) => {
            let mut pix = Vec::with_capacity(w * h * 4);
            for p in buf.into_raw().chunks_exact(3) {
                pix.extend_from_slice(&[p[0], p[1], p[2], 0xff]);
            }
            SourceImage::nrgba8(w, h, pix)
        }
        DynamicImage::ImageRgba8(buf) => SourceImage::nrgba8(w, h, buf.into_raw()),
        DynamicImage::ImageRgb16(buf) => {
            let mut pix = Vec::with_capacity(w * h * 4);
            for p in buf.into_raw().chunks_exact(3) {
                pix.extend_from_slice(&[p[0], p[1], p[2], 0xffff]);
            }
            SourceImage::nrgba16(w, h, pix)
        }
        DynamicImage::ImageRgba16(buf) => SourceImage::nrgba16(w, h, buf.into_raw()),
        other => SourceImage::nrgba8(w, h, other.to_rgba8().into_raw()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn rgb_gains_an_opaque_alpha_channel() {
        let buf = RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]));
        let src = from_dynamic(DynamicImage::ImageRgb8(buf));
        let mut out = vec![0u8; 8];
        src.scan(0, 0, 2, 1, &mut out);
        assert_eq!(out, vec![10, 20, 30, 255, 10, 20, 30, 255]);
    }

    #[test]
    fn rgba_passes_through() {
        let buf = RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
        let src = from_dynamic(DynamicImage::ImageRgba8(buf));
        let mut out = vec![0u8; 4];
        src.scan(0, 0, 1, 1, &mut out);
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn grayscale_stays_single_channel_until_scanned() {
        let buf = GrayImage::from_pixel(1, 1, image::Luma([77]));
        let src = from_dynamic(DynamicImage::ImageLuma8(buf));
        let mut out = vec![0u8; 4];
        src.scan(0, 0, 1, 1, &mut out);
        assert_eq!(out, vec![77, 77, 77, 255]);
    }

    #[test]
    fn load_reports_the_failing_path() {
        let err = load(Path::new("definitely-not-here.png")).unwrap_err();
        match err {
            Error::Decode { path, .. } => {
                assert_eq!(path, Path::new("definitely-not-here.png"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
