//! Helpers for generating the synthetic images the scenarios run on.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// A smooth "photograph": gaussian blobs on a dark background. Centers and
/// radii are relative to the image size so the same layout can be rendered
/// at any resolution.
pub fn blob_image(width: u32, height: u32, blobs: &[(f32, f32, f32)]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let mut v = 20.0f32;
        for &(cx, cy, sigma) in blobs {
            let d2 = (fx - cx).powi(2) + (fy - cy).powi(2);
            v += 235.0 * (-d2 / (2.0 * sigma * sigma)).exp();
        }
        let v = v.min(255.0) as u8;
        Rgb([v, v, v])
    })
}

/// Photometric negative of an image. Negation flips every AC coefficient of
/// the DCT, which pushes the hash about as far away as it can get.
pub fn inverted(img: &RgbImage) -> RgbImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        p.0 = [255 - p.0[0], 255 - p.0[1], 255 - p.0[2]];
    }
    out
}

/// The standard layout most scenarios start from.
pub fn base_layout() -> Vec<(f32, f32, f32)> {
    vec![(0.30, 0.35, 0.18), (0.72, 0.60, 0.14), (0.55, 0.20, 0.10)]
}

pub fn save_png(img: &RgbImage, path: &Path) {
    img.save(path).unwrap();
}

pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) {
    let file = File::create(path).unwrap();
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    img.write_with_encoder(encoder).unwrap();
}

/// Render `img` scaled by `percent` and save it as a PNG.
pub fn save_resized_png(img: &RgbImage, path: &Path, percent: u32) -> PathBuf {
    let w = img.width() * percent / 100;
    let h = img.height() * percent / 100;
    let scaled = image::imageops::resize(img, w, h, FilterType::Lanczos3);
    scaled.save(path).unwrap();
    path.to_path_buf()
}

pub fn solid_white(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
}
