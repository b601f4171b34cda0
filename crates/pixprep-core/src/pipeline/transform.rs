//! Image normalization: alpha flattening, RGB conversion, Lanczos resize.
//!
//! The steps run in a fixed order. Transparency is composited onto white
//! *before* the alpha channel is dropped and *before* resampling, so the
//! filter never blends in the color of fully transparent pixels.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba};

/// Background color transparent pixels are composited onto.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Turns decoded source images into fixed-size RGB images.
#[derive(Debug, Clone, Copy)]
pub struct ImageTransformer {
    width: u32,
    height: u32,
}

impl ImageTransformer {
    /// Create a transformer producing `width × height` images.
    pub fn new((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }

    /// Target size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Flatten, convert and resize one image.
    pub fn transform(&self, image: &DynamicImage) -> RgbImage {
        let flattened = flatten_alpha(image);
        self.resize(flattened)
    }

    fn resize(&self, image: RgbImage) -> RgbImage {
        if image.dimensions() == (self.width, self.height) {
            return image;
        }
        imageops::resize(&image, self.width, self.height, FilterType::Lanczos3)
    }
}

/// Composite an image over [`BACKGROUND`] and drop its alpha channel.
///
/// Images without alpha are treated as fully opaque and only converted.
pub fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| composite_over_background(*rgba.get_pixel(x, y)))
}

/// `alpha * src + (1 - alpha) * background`, per channel.
fn composite_over_background(pixel: Rgba<u8>) -> Rgb<u8> {
    let alpha = f32::from(pixel[3]) / 255.0;
    let blend = |src: u8, bg: u8| -> u8 {
        let value = alpha * f32::from(src) + (1.0 - alpha) * f32::from(bg);
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgb([
        blend(pixel[0], BACKGROUND[0]),
        blend(pixel[1], BACKGROUND[1]),
        blend(pixel[2], BACKGROUND[2]),
    ])
}
