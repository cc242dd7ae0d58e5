use crate::{LayoutError, Mm};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use std::path::Path;
use std::sync::Arc;

/// An already-decoded raster image with known pixel dimensions.
///
/// Assets are cheap to clone (the pixel data is shared) so the same header,
/// footer or watermark can be referenced from every page's draw commands.
#[derive(Clone)]
pub struct ImageAsset {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub data: Arc<DynamicImage>,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("pixel_width", &self.pixel_width)
            .field("pixel_height", &self.pixel_height)
            .finish_non_exhaustive()
    }
}

/// Two assets are equal when they share the same pixel data
impl PartialEq for ImageAsset {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl ImageAsset {
    pub fn from_image(image: DynamicImage) -> ImageAsset {
        let (pixel_width, pixel_height) = image.dimensions();
        ImageAsset {
            pixel_width,
            pixel_height,
            data: Arc::new(image),
        }
    }

    /// Decode an image from an in-memory encoded file (PNG, JPEG, ...)
    pub fn decode(bytes: &[u8]) -> Result<ImageAsset, LayoutError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(ImageAsset::from_image(image))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<ImageAsset, LayoutError> {
        let bytes = std::fs::read(path)?;
        ImageAsset::decode(&bytes)
    }

    /// Images without both dimensions can't be placed at the right aspect
    /// ratio and are skipped wherever they would be drawn.
    pub fn is_usable(&self) -> bool {
        self.pixel_width > 0 && self.pixel_height > 0
    }

    /// Scale the image to fit inside a `max_width` x `max_height` box while
    /// preserving its aspect ratio. Returns the fitted (width, height), or
    /// `None` if the image has no usable dimensions.
    pub fn fit_within(&self, max_width: Mm, max_height: Mm) -> Option<(Mm, Mm)> {
        if !self.is_usable() {
            return None;
        }
        let (w, h) = (self.pixel_width as f32, self.pixel_height as f32);
        let scale = (max_width.0 / w).min(max_height.0 / h);
        Some((Mm(w * scale), Mm(h * scale)))
    }

    /// A copy of the image with `opacity` (0.0 to 1.0) baked into the colour
    /// channels by blending every pixel against a white page. The result
    /// looks translucent even on output sinks without alpha compositing;
    /// the original alpha channel is kept so transparent areas stay clear.
    pub fn with_opacity(&self, opacity: f32) -> ImageAsset {
        let opacity = opacity.clamp(0.0, 1.0);
        let source = self.data.to_rgba8();
        let faded = RgbaImage::from_fn(source.width(), source.height(), |x, y| {
            let Rgba([r, g, b, a]) = *source.get_pixel(x, y);
            let coverage = opacity * a as f32 / 255.0;
            let blend = |c: u8| (255.0 - (255.0 - c as f32) * coverage).round() as u8;
            Rgba([blend(r), blend(g), blend(b), a])
        });
        ImageAsset::from_image(DynamicImage::ImageRgba8(faded))
    }
}
