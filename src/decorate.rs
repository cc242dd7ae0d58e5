//! # Decorations
//!
//! Running headers, footers and the watermark are composited onto pages
//! after all content has been flowed, so they land on every page no matter
//! how many the content ended up needing. Each image is fitted into its box
//! preserving its own aspect ratio; images that can't be fitted (missing, or
//! without dimensions) are skipped without affecting the other decorations.

use crate::asset::ImageAsset;
use crate::geometry::PageGeometry;
use crate::page::{DrawCommand, Layer, Page};
use crate::Mm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Boxes the decoration images are fitted into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationOptions {
    pub header_max_width: Mm,
    pub header_max_height: Mm,
    /// Space kept between the bottom of the header and the top margin
    pub header_gutter: Mm,
    pub footer_max_width: Mm,
    pub footer_max_height: Mm,
    /// Width the watermark is scaled to (less if the page is too short)
    pub watermark_width: Mm,
    /// 0.0 is invisible, 1.0 is the image as-is
    pub watermark_opacity: f32,
}

impl Default for DecorationOptions {
    fn default() -> Self {
        DecorationOptions {
            header_max_width: Mm(170.0),
            header_max_height: Mm(25.0),
            header_gutter: Mm(3.0),
            footer_max_width: Mm(170.0),
            footer_max_height: Mm(20.0),
            watermark_width: Mm(120.0),
            watermark_opacity: 0.15,
        }
    }
}

/// A fitted image box, in page coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub x: Mm,
    pub y: Mm,
    pub w: Mm,
    pub h: Mm,
}

impl Placement {
    pub fn center(&self) -> (Mm, Mm) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// The decoration images of one document, resolved before layout starts
#[derive(Debug, Clone, Default)]
pub struct DecorationAssets {
    pub header: Option<ImageAsset>,
    pub footer: Option<ImageAsset>,
    pub watermark: Option<ImageAsset>,
}

/// Where to find the decoration images on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSources {
    pub header: Option<PathBuf>,
    pub footer: Option<PathBuf>,
    pub watermark: Option<PathBuf>,
}

fn load_or_skip(role: &str, path: Option<&Path>) -> Option<ImageAsset> {
    let path = path?;
    match ImageAsset::open(path) {
        Ok(asset) => Some(asset),
        Err(e) => {
            log::warn!(
                "{} image {} could not be loaded, skipping it: {}",
                role,
                path.display(),
                e
            );
            None
        }
    }
}

impl DecorationSources {
    /// Read and decode every configured image. An image that fails to load
    /// is logged and left out; the remaining decorations still apply.
    pub fn load(&self) -> DecorationAssets {
        DecorationAssets {
            header: load_or_skip("header", self.header.as_deref()),
            footer: load_or_skip("footer", self.footer.as_deref()),
            watermark: load_or_skip("watermark", self.watermark.as_deref()),
        }
    }

    /// [DecorationSources::load] without blocking the async runtime: files
    /// are read with `tokio::fs` and decoded on the blocking pool
    #[cfg(feature = "async")]
    pub async fn load_async(&self) -> DecorationAssets {
        async fn one(role: &'static str, path: Option<PathBuf>) -> Option<ImageAsset> {
            let path = path?;
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("{} image {} could not be read, skipping it: {}", role, path.display(), e);
                    return None;
                }
            };
            match tokio::task::spawn_blocking(move || ImageAsset::decode(&bytes)).await {
                Ok(Ok(asset)) => Some(asset),
                Ok(Err(e)) => {
                    log::warn!("{} image {} could not be decoded, skipping it: {}", role, path.display(), e);
                    None
                }
                Err(e) => {
                    log::warn!("decoding {} image {} was aborted: {}", role, path.display(), e);
                    None
                }
            }
        }

        DecorationAssets {
            header: one("header", self.header.clone()).await,
            footer: one("footer", self.footer.clone()).await,
            watermark: one("watermark", self.watermark.clone()).await,
        }
    }
}

/// The decorator compositor for one document
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    header: Option<ImageAsset>,
    footer: Option<ImageAsset>,
    /// already faded to the configured opacity
    watermark: Option<ImageAsset>,
    options: DecorationOptions,
}

fn usable(role: &str, asset: Option<ImageAsset>) -> Option<ImageAsset> {
    match asset {
        Some(asset) if !asset.is_usable() => {
            log::warn!("{} image has no usable dimensions and will be skipped", role);
            None
        }
        asset => asset,
    }
}

impl Decorations {
    /// Prepare the decorations. The watermark's translucent copy is made
    /// here, once, rather than per page.
    pub fn new(assets: DecorationAssets, options: DecorationOptions) -> Decorations {
        let watermark = usable("watermark", assets.watermark)
            .map(|asset| asset.with_opacity(options.watermark_opacity));
        Decorations {
            header: usable("header", assets.header),
            footer: usable("footer", assets.footer),
            watermark,
            options,
        }
    }

    pub fn options(&self) -> &DecorationOptions {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none() && self.watermark.is_none()
    }

    /// Centred horizontally, bottom edge a gutter above the top margin. The
    /// header is shrunk to fit between the page edge and the gutter so it
    /// never covers content; `None` if the top margin leaves no room at all.
    pub fn header_placement(&self, geometry: &PageGeometry) -> Option<Placement> {
        let room = geometry.margins.top - self.options.header_gutter;
        if room <= Mm::ZERO {
            return None;
        }
        let (w, h) = self
            .header
            .as_ref()?
            .fit_within(self.options.header_max_width, self.options.header_max_height.min(room))?;
        Some(Placement {
            x: (geometry.width - w) / 2.0,
            y: room - h,
            w,
            h,
        })
    }

    /// Centred horizontally, sitting on the bottom edge of the page
    pub fn footer_placement(&self, geometry: &PageGeometry) -> Option<Placement> {
        let (w, h) = self
            .footer
            .as_ref()?
            .fit_within(self.options.footer_max_width, self.options.footer_max_height)?;
        Some(Placement {
            x: (geometry.width - w) / 2.0,
            y: geometry.height - h,
            w,
            h,
        })
    }

    /// Centred on the page both ways
    pub fn watermark_placement(&self, geometry: &PageGeometry) -> Option<Placement> {
        let (w, h) = self
            .watermark
            .as_ref()?
            .fit_within(self.options.watermark_width, geometry.height)?;
        let (cx, cy) = geometry.center();
        Some(Placement {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        })
    }

    fn command(
        asset: Option<&ImageAsset>,
        placement: Option<Placement>,
        layer: Layer,
    ) -> Option<DrawCommand> {
        let asset = asset?;
        let Placement { x, y, w, h } = placement?;
        Some(DrawCommand::ImageDraw {
            x,
            y,
            w,
            h,
            asset: asset.clone(),
            layer,
        })
    }

    /// The watermark draw for a page. Both the post-pass and any on-new-page
    /// hook use this, so a watermark drawn early ends up exactly where the
    /// post-pass would have put it.
    pub fn watermark_command(&self, geometry: &PageGeometry) -> Option<DrawCommand> {
        Self::command(
            self.watermark.as_ref(),
            self.watermark_placement(geometry),
            Layer::Watermark,
        )
    }

    pub fn header_command(&self, geometry: &PageGeometry) -> Option<DrawCommand> {
        Self::command(
            self.header.as_ref(),
            self.header_placement(geometry),
            Layer::Header,
        )
    }

    pub fn footer_command(&self, geometry: &PageGeometry) -> Option<DrawCommand> {
        Self::command(
            self.footer.as_ref(),
            self.footer_placement(geometry),
            Layer::Footer,
        )
    }

    /// Put the watermark underneath the content of a single page, replacing
    /// any watermark already there
    pub fn apply_watermark(&self, page: &mut Page, geometry: &PageGeometry) {
        page.commands
            .retain(|c| c.layer() != Some(Layer::Watermark));
        if let Some(watermark) = self.watermark_command(geometry) {
            page.commands.insert(0, watermark);
        }
    }

    /// Decorate every page: watermark first (behind the content), header
    /// and footer last (on top of it). Decorations from an earlier pass are
    /// replaced, so applying twice is the same as applying once.
    pub fn apply(&self, pages: &mut [Page], geometry: &PageGeometry) {
        let watermark = self.watermark_command(geometry);
        let header = self.header_command(geometry);
        let footer = self.footer_command(geometry);
        if self.header.is_some() && header.is_none() {
            log::warn!(
                "a {} top margin leaves no room for the header above its {} gutter, skipping it",
                geometry.margins.top,
                self.options.header_gutter
            );
        }
        log::debug!(
            "decorating {} page(s): watermark {}, header {}, footer {}",
            pages.len(),
            watermark.is_some(),
            header.is_some(),
            footer.is_some()
        );

        for page in pages.iter_mut() {
            page.commands.retain(|c| !c.is_decoration());
            if let Some(watermark) = &watermark {
                page.commands.insert(0, watermark.clone());
            }
            page.commands.extend(header.iter().cloned());
            page.commands.extend(footer.iter().cloned());
        }
    }
}
