//! # PDF output
//!
//! Writes laid out pages as a PDF with [pdf_writer]. Text is set in the PDF
//! base fonts (Helvetica, Times, Courier and their variants) selected by the
//! font name of each run; names that aren't base fonts are drawn in
//! Helvetica. Images are embedded once each, however many pages draw them.

use crate::asset::ImageAsset;
use crate::geometry::PageGeometry;
use crate::info::Info;
use crate::metrics::GlyphMetrics;
use crate::page::{DrawCommand, Page};
use crate::refs::{ObjectReferences, RefType};
use crate::{LayoutError, Mm, Pt};
use image::GenericImageView;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect};
use std::collections::HashMap;
use std::io::Write;

/// The fonts every PDF reader provides without embedding
pub const BASE_FONTS: [&str; 12] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
];

const RULE_WIDTH: Pt = Pt(0.5);

/// The base font a run set in `font` is drawn with
pub fn base_font(font: &str) -> Option<&'static str> {
    BASE_FONTS
        .iter()
        .find(|base| base.eq_ignore_ascii_case(font))
        .copied()
}

/// Fonts and images referenced by the pages, numbered in order of first use
#[derive(Default)]
struct Resources<'p> {
    fonts: Vec<&'static str>,
    font_index: HashMap<&'p str, usize>,
    images: Vec<&'p ImageAsset>,
    image_index: HashMap<*const image::DynamicImage, usize>,
}

impl<'p> Resources<'p> {
    fn collect(pages: &'p [Page]) -> Resources<'p> {
        let mut resources = Resources::default();
        for command in pages.iter().flat_map(|page| page.commands.iter()) {
            match command {
                DrawCommand::TextRun { font, .. } | DrawCommand::JustifiedTextRun { font, .. } => {
                    resources.add_font(font)
                }
                DrawCommand::ImageDraw { asset, .. } => resources.add_image(asset),
                DrawCommand::Rule { .. } => {}
            }
        }
        resources
    }

    fn add_font(&mut self, font: &'p str) {
        if self.font_index.contains_key(font) {
            return;
        }
        let base = base_font(font).unwrap_or_else(|| {
            log::warn!("font '{}' is not a PDF base font, drawing it in Helvetica", font);
            "Helvetica"
        });
        let index = match self.fonts.iter().position(|&b| b == base) {
            Some(index) => index,
            None => {
                self.fonts.push(base);
                self.fonts.len() - 1
            }
        };
        self.font_index.insert(font, index);
    }

    fn add_image(&mut self, asset: &'p ImageAsset) {
        let key = std::sync::Arc::as_ptr(&asset.data);
        if !self.image_index.contains_key(&key) {
            self.image_index.insert(key, self.images.len());
            self.images.push(asset);
        }
    }

    fn font(&self, font: &str) -> usize {
        self.font_index.get(font).copied().unwrap_or_default()
    }

    fn image(&self, asset: &ImageAsset) -> usize {
        self.image_index
            .get(&std::sync::Arc::as_ptr(&asset.data))
            .copied()
            .unwrap_or_default()
    }
}

/// Write `pages` to `w` as a PDF document. `metrics` must be the provider
/// the pages were laid out with, so text baselines land where layout
/// expected them.
///
/// Note: the entire document is rendered in memory before being written.
pub fn write_pdf<W: Write>(
    pages: &[Page],
    geometry: &PageGeometry,
    metrics: &dyn GlyphMetrics,
    info: Option<&Info>,
    mut w: W,
) -> Result<(), LayoutError> {
    let resources = Resources::collect(pages);
    let mut refs = ObjectReferences::new();
    let mut writer = Pdf::new();

    let catalog_id = refs.gen(RefType::Catalog);
    let page_tree_id = refs.gen(RefType::PageTree);

    if let Some(info) = info {
        info.write(&mut refs, &mut writer);
    }

    let page_refs: Vec<_> = (0..pages.len())
        .map(|i| refs.gen(RefType::Page(i)))
        .collect();
    writer
        .pages(page_tree_id)
        .count(page_refs.len() as i32)
        .kids(page_refs);

    for (i, base) in resources.fonts.iter().enumerate() {
        let id = refs.gen(RefType::Font(i));
        writer
            .type1_font(id)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (i, asset) in resources.images.iter().enumerate() {
        write_image(&mut refs, i, asset, &mut writer);
    }

    let media_box = Rect::new(0.0, 0.0, geometry.width.to_pt().0, geometry.height.to_pt().0);
    let art_box = Rect::new(
        geometry.content_left().to_pt().0,
        (geometry.height - geometry.content_bottom()).to_pt().0,
        (geometry.content_left() + geometry.content_width()).to_pt().0,
        (geometry.height - geometry.content_top()).to_pt().0,
    );

    for (page_index, page) in pages.iter().enumerate() {
        let id = refs.get_or_gen(RefType::Page(page_index));
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut pdf_page = writer.page(id);
        pdf_page.media_box(media_box);
        pdf_page.art_box(art_box);
        pdf_page.parent(page_tree_id);
        pdf_page.contents(content_id);

        let mut page_resources = pdf_page.resources();
        let mut fonts = page_resources.fonts();
        for i in 0..resources.fonts.len() {
            fonts.pair(Name(format!("F{i}").as_bytes()), refs.get_or_gen(RefType::Font(i)));
        }
        fonts.finish();
        let mut x_objects = page_resources.x_objects();
        for i in 0..resources.images.len() {
            x_objects.pair(Name(format!("I{i}").as_bytes()), refs.get_or_gen(RefType::Image(i)));
        }
        x_objects.finish();
        page_resources.finish();
        pdf_page.finish();

        let content = render_page(page, geometry, metrics, &resources)?;
        let compressed = compress_to_vec_zlib(&content, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
    }

    writer.catalog(catalog_id).pages(page_tree_id);
    log::debug!(
        "wrote {} page(s), {} font(s), {} image(s)",
        pages.len(),
        resources.fonts.len(),
        resources.images.len()
    );

    w.write_all(writer.finish().as_slice()).map_err(Into::into)
}

fn write_image(refs: &mut ObjectReferences, index: usize, asset: &ImageAsset, writer: &mut Pdf) {
    let level = CompressionLevel::DefaultLevel as u8;
    let image = &asset.data;

    let mask = image.color().has_alpha().then(|| {
        let alphas: Vec<u8> = image.pixels().map(|p| (p.2).0[3]).collect();
        compress_to_vec_zlib(&alphas, level)
    });
    let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

    let id = refs.gen(RefType::Image(index));
    let mask_id = mask.as_ref().map(|_| refs.gen(RefType::ImageMask(index)));

    let mut xobject = writer.image_xobject(id, bytes.as_slice());
    xobject.filter(Filter::FlateDecode);
    xobject.width(asset.pixel_width as i32);
    xobject.height(asset.pixel_height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if let Some(mask_id) = mask_id {
        xobject.s_mask(mask_id);
    }
    xobject.finish();

    // alpha goes in its own greyscale image
    if let (Some(mask_id), Some(mask)) = (mask_id, mask) {
        let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
        s_mask.filter(Filter::FlateDecode);
        s_mask.width(asset.pixel_width as i32);
        s_mask.height(asset.pixel_height as i32);
        s_mask.color_space().device_gray();
        s_mask.bits_per_component(8);
    }
}

/// Encode text for a WinAnsi encoded base font. Characters outside the
/// encoding become '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' | '\u{a0}'..='\u{ff}' => ch as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[allow(clippy::write_with_newline)]
fn write_text(content: &mut Vec<u8>, x: Pt, baseline: Pt, text: &str) -> std::io::Result<()> {
    write!(content, "1 0 0 1 {} {} Tm\n", x.0, baseline.0)?;
    write!(content, "<")?;
    for byte in win_ansi(text) {
        write!(content, "{byte:02x}")?;
    }
    write!(content, "> Tj\n")
}

/// The content stream of one page. Page coordinates (mm from the top-left,
/// y down) are converted to PDF user space (pt from the bottom-left, y up).
#[allow(clippy::write_with_newline)]
fn render_page(
    page: &Page,
    geometry: &PageGeometry,
    metrics: &dyn GlyphMetrics,
    resources: &Resources,
) -> Result<Vec<u8>, std::io::Error> {
    let flip = |y: Mm| (geometry.height - y).to_pt();
    let mut content: Vec<u8> = Vec::default();

    for command in page.commands.iter() {
        match command {
            DrawCommand::TextRun {
                x,
                y,
                text,
                font,
                size,
            } => {
                let baseline = flip(*y + metrics.ascent(font, *size));
                write!(&mut content, "BT\n")?;
                write!(&mut content, "/F{} {} Tf\n", resources.font(font), size.0)?;
                write_text(&mut content, x.to_pt(), baseline, text)?;
                write!(&mut content, "ET\n")?;
            }
            DrawCommand::JustifiedTextRun {
                x,
                y,
                words,
                font,
                size,
            } => {
                let baseline = flip(*y + metrics.ascent(font, *size));
                write!(&mut content, "BT\n")?;
                write!(&mut content, "/F{} {} Tf\n", resources.font(font), size.0)?;
                for word in words {
                    write_text(&mut content, (*x + word.x_offset).to_pt(), baseline, &word.text)?;
                }
                write!(&mut content, "ET\n")?;
            }
            DrawCommand::ImageDraw {
                x, y, w, h, asset, ..
            } => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    w.to_pt().0,
                    h.to_pt().0,
                    x.to_pt().0,
                    flip(*y + *h).0
                )?;
                write!(&mut content, "/I{} Do\n", resources.image(asset))?;
                write!(&mut content, "Q\n")?;
            }
            DrawCommand::Rule { x, y, width } => {
                let y = flip(*y).0;
                write!(&mut content, "q\n")?;
                write!(&mut content, "{} w\n", RULE_WIDTH.0)?;
                write!(&mut content, "{} {} m\n", x.to_pt().0, y)?;
                write!(&mut content, "{} {} l\n", (*x + *width).to_pt().0, y)?;
                write!(&mut content, "S\n")?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::UnitMetrics;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn page_with(commands: Vec<DrawCommand>) -> Page {
        let mut page = Page::new(0);
        page.commands = commands;
        page
    }

    #[test]
    fn maps_font_names_to_base_fonts() {
        assert_eq!(base_font("Helvetica-Bold"), Some("Helvetica-Bold"));
        assert_eq!(base_font("times-roman"), Some("Times-Roman"));
        assert_eq!(base_font("Comic Sans"), None);
    }

    #[test]
    fn encodes_win_ansi() {
        assert_eq!(win_ansi("Aé€"), vec![b'A', 0xe9, 0x80]);
        assert_eq!(win_ansi("ж"), vec![b'?']);
    }

    #[test]
    fn shares_fonts_and_images_between_pages() {
        let asset = ImageAsset::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([0, 0, 0, 128]),
        )));
        let draw = |asset: &ImageAsset| DrawCommand::ImageDraw {
            x: Mm(0.0),
            y: Mm(0.0),
            w: Mm(10.0),
            h: Mm(10.0),
            asset: asset.clone(),
            layer: crate::Layer::Watermark,
        };
        let text = |font: &str| DrawCommand::TextRun {
            x: Mm(20.0),
            y: Mm(20.0),
            text: "hi".into(),
            font: font.into(),
            size: Pt(10.0),
        };
        let pages = vec![
            page_with(vec![draw(&asset), text("Helvetica"), text("Unknown")]),
            page_with(vec![draw(&asset), text("Times-Bold")]),
        ];

        let resources = Resources::collect(&pages);
        assert_eq!(resources.images.len(), 1);
        assert_eq!(resources.fonts, vec!["Helvetica", "Times-Bold"]);
        assert_eq!(resources.font("Unknown"), 0);
        assert_eq!(resources.font("Times-Bold"), 1);
    }

    #[test]
    fn flips_text_to_the_baseline() {
        let geometry = PageGeometry::a4();
        let metrics = UnitMetrics {
            char_width: 1.0,
            line_height: 10.0,
        };
        let page = page_with(vec![DrawCommand::TextRun {
            x: Mm(25.4),
            y: Mm(20.0),
            text: "A".into(),
            font: "Helvetica".into(),
            size: Pt(12.0),
        }]);
        let resources = Resources::collect(std::slice::from_ref(&page));
        let content = render_page(&page, &geometry, &metrics, &resources).expect("renders");
        let content = String::from_utf8(content).expect("ascii");

        // baseline at 20mm + 8mm ascent, from the top of a 297mm page
        let baseline = Mm(297.0 - 28.0).to_pt().0;
        let x = Mm(25.4).to_pt().0;
        assert!(content.contains(&format!("1 0 0 1 {x} {baseline} Tm")));
        assert!(content.contains("<41> Tj"));
        assert!(content.contains("/F0 12 Tf"));
    }

    #[test]
    fn writes_a_complete_document() {
        let geometry = PageGeometry::a4();
        let metrics = UnitMetrics::default();
        let pages = vec![
            page_with(vec![DrawCommand::Rule {
                x: Mm(20.0),
                y: Mm(50.0),
                width: Mm(70.0),
            }]),
            Page::new(1),
        ];
        let mut info = Info::new();
        info.title("Test");

        let mut out = Vec::new();
        write_pdf(&pages, &geometry, &metrics, Some(&info), &mut out).expect("writes");
        assert!(out.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Count 2"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}
