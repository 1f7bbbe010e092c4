//! Image resampling.
//!
//! Downscaling is separable: a horizontal 1-D pass followed by a vertical 1-D
//! pass, each driven by a precomputed table of source indices and normalized
//! kernel weights per destination pixel. Filtering of RGBA sources happens in
//! premultiplied-alpha space so transparent regions do not bleed into their
//! neighbors. Nearest-neighbor skips the weight machinery entirely.

mod filter;
mod source;

pub use filter::Filter;
pub use source::{Pixels, SourceImage, Subsampling};

use rayon::prelude::*;

/// An 8-bit non-premultiplied RGBA raster, the output format of every resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgba {
    pub width: usize,
    pub height: usize,
    /// Interleaved RGBA, row stride `width * 4`.
    pub pix: Vec<u8>,
}

impl Rgba {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pix: vec![0; width * height * 4],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [self.pix[i], self.pix[i + 1], self.pix[i + 2], self.pix[i + 3]]
    }

    /// Reinterpret as a resampling source for a follow-up pass.
    pub fn into_source(self) -> SourceImage {
        SourceImage::nrgba8(self.width, self.height, self.pix)
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexWeight {
    index: usize,
    weight: f64,
}

/// Kernel weights for one axis: for each destination pixel, the contributing
/// source indices and their normalized weights.
fn precompute_weights(dst_size: usize, src_size: usize, filter: Filter) -> Vec<Vec<IndexWeight>> {
    let du = src_size as f64 / dst_size as f64;
    let scale = du.max(1.0);
    let ru = (scale * filter.support()).ceil();

    let mut out = Vec::with_capacity(dst_size);
    for v in 0..dst_size {
        let fu = (v as f64 + 0.5) * du - 0.5;

        let begin = (fu - ru).ceil().max(0.0) as usize;
        let end = (((fu + ru).floor()) as isize).min(src_size as isize - 1) as usize;

        let mut weights = Vec::with_capacity(end + 1 - begin);
        let mut sum = 0.0;
        for u in begin..=end {
            let w = filter.kernel((u as f64 - fu) / scale);
            if w != 0.0 {
                sum += w;
                weights.push(IndexWeight {
                    index: u,
                    weight: w,
                });
            }
        }
        if sum != 0.0 {
            for iw in &mut weights {
                iw.weight /= sum;
            }
        }
        out.push(weights);
    }
    out
}

/// Round half-up and clamp to the 8-bit channel range.
fn clamp(x: f64) -> u8 {
    let v = (x + 0.5) as i64;
    if v > 255 {
        255
    } else if v > 0 {
        v as u8
    } else {
        0
    }
}

/// Resize `img` to `width` x `height` with the given filter.
///
/// Returns an empty raster when either requested dimension or the source is
/// degenerate.
pub fn resize(img: &SourceImage, width: usize, height: usize, filter: Filter) -> Rgba {
    if width == 0 || height == 0 || img.width() == 0 || img.height() == 0 {
        return Rgba::new(0, 0);
    }

    if filter.support() <= 0.0 {
        return resize_nearest(img, width, height);
    }

    if img.width() != width && img.height() != height {
        let horizontal = resize_horizontal(img, width, filter);
        return resize_vertical(&horizontal.into_source(), height, filter);
    }
    if img.width() != width {
        return resize_horizontal(img, width, filter);
    }
    resize_vertical(img, height, filter)
}

fn resize_horizontal(img: &SourceImage, width: usize, filter: Filter) -> Rgba {
    let src_w = img.width();
    let src_h = img.height();
    let mut dst = Rgba::new(width, src_h);
    let weights = precompute_weights(width, src_w, filter);

    // output rows only depend on the matching source row
    dst.pix
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let mut scan_line = vec![0u8; src_w * 4];
            img.scan(0, y, src_w, y + 1, &mut scan_line);
            for (x, taps) in weights.iter().enumerate() {
                let (mut r, mut g, mut b, mut a) = (0.0, 0.0, 0.0, 0.0);
                for tap in taps {
                    let i = tap.index * 4;
                    let s = &scan_line[i..i + 4];
                    let aw = s[3] as f64 * tap.weight;
                    r += s[0] as f64 * aw;
                    g += s[1] as f64 * aw;
                    b += s[2] as f64 * aw;
                    a += aw;
                }
                if a != 0.0 {
                    let inv = 1.0 / a;
                    let d = &mut row[x * 4..x * 4 + 4];
                    d[0] = clamp(r * inv);
                    d[1] = clamp(g * inv);
                    d[2] = clamp(b * inv);
                    d[3] = clamp(a);
                }
            }
        });
    dst
}

fn resize_vertical(img: &SourceImage, height: usize, filter: Filter) -> Rgba {
    let src_w = img.width();
    let src_h = img.height();
    let mut dst = Rgba::new(src_w, height);
    let weights = precompute_weights(height, src_h, filter);
    let stride = src_w * 4;

    let mut scan_line = vec![0u8; src_h * 4];
    for x in 0..src_w {
        img.scan(x, 0, x + 1, src_h, &mut scan_line);
        for (y, taps) in weights.iter().enumerate() {
            let (mut r, mut g, mut b, mut a) = (0.0, 0.0, 0.0, 0.0);
            for tap in taps {
                let i = tap.index * 4;
                let s = &scan_line[i..i + 4];
                let aw = s[3] as f64 * tap.weight;
                r += s[0] as f64 * aw;
                g += s[1] as f64 * aw;
                b += s[2] as f64 * aw;
                a += aw;
            }
            if a != 0.0 {
                let inv = 1.0 / a;
                let j = y * stride + x * 4;
                let d = &mut dst.pix[j..j + 4];
                d[0] = clamp(r * inv);
                d[1] = clamp(g * inv);
                d[2] = clamp(b * inv);
                d[3] = clamp(a);
            }
        }
    }
    dst
}

/// Fast nearest-neighbor resize, no filtering.
fn resize_nearest(img: &SourceImage, width: usize, height: usize) -> Rgba {
    let src = clone_to_rgba(img);
    let mut dst = Rgba::new(width, height);
    let dx = img.width() as f64 / width as f64;
    let dy = img.height() as f64 / height as f64;

    let src_stride = src.width * 4;
    let dst_stride = width * 4;
    for y in 0..height {
        let src_y = (((y as f64 + 0.5) * dy) as usize).min(src.height - 1);
        let src_off0 = src_y * src_stride;
        let dst_off0 = y * dst_stride;
        for x in 0..width {
            let src_x = (((x as f64 + 0.5) * dx) as usize).min(src.width - 1);
            let src_off = src_off0 + src_x * 4;
            let dst_off = dst_off0 + x * 4;
            dst.pix[dst_off..dst_off + 4].copy_from_slice(&src.pix[src_off..src_off + 4]);
        }
    }
    dst
}

/// Copy an entire source into an RGBA raster.
fn clone_to_rgba(img: &SourceImage) -> Rgba {
    let mut dst = Rgba::new(img.width(), img.height());
    img.scan(0, 0, img.width(), img.height(), &mut dst.pix);
    dst
}
