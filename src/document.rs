use crate::{
    block::ContentBlock,
    config::RenderConfig,
    decorate::{DecorationAssets, Decorations},
    flow::{FlowController, FlowOptions, FlowOutput, LayoutWarning},
    geometry::PageGeometry,
    info::Info,
    metrics::GlyphMetrics,
    page::Page,
    LayoutError,
};
use std::io::Write;

/// Turns one kind of business record into the blocks that make up its
/// document. Drivers only decide *what* goes on the pages; how it is flowed
/// is always up to the [Document] rendering it.
pub trait DocumentDriver {
    type Record;

    /// The blocks for `record`, in reading order
    fn blocks(&self, record: &Self::Record) -> Result<Vec<ContentBlock>, LayoutError>;

    /// Metadata for the rendered document, if the driver has any
    fn info(&self, _record: &Self::Record) -> Option<Info> {
        None
    }
}

/// The finished pages of one render, ready for an output sink
#[derive(Debug, Clone)]
pub struct Rendered {
    pub geometry: PageGeometry,
    pub info: Option<Info>,
    pub pages: Vec<Page>,
    /// Cosmetic problems met along the way; the pages are complete regardless
    pub warnings: Vec<LayoutWarning>,
}

impl Rendered {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write the pages out as a PDF, measuring baselines with `metrics`.
    /// See [write_pdf](crate::write_pdf).
    pub fn write_pdf<W: Write>(&self, metrics: &dyn GlyphMetrics, w: W) -> Result<(), LayoutError> {
        crate::pdf::write_pdf(&self.pages, &self.geometry, metrics, self.info.as_ref(), w)
    }
}

/// A document is the main entry point of the engine: it binds the page
/// geometry, text metrics, flow tunables and decorations together, and
/// renders block sequences into decorated pages with a call to
/// [Document::render].
///
/// A document holds no state between renders, so one can render any number
/// of records; every render owns its own cursor and page list.
pub struct Document<'a> {
    pub info: Option<Info>,
    pub geometry: PageGeometry,
    pub metrics: &'a dyn GlyphMetrics,
    pub flow: FlowOptions,
    pub decorations: Decorations,
    /// Also draw the watermark as each page opens, as an authoring preview
    /// would. The decorator pass places it identically either way.
    pub preview_watermark: bool,
}

impl<'a> Document<'a> {
    /// A4 with default flow options and no decorations
    pub fn new(metrics: &'a dyn GlyphMetrics) -> Document<'a> {
        Document {
            info: None,
            geometry: PageGeometry::default(),
            metrics,
            flow: FlowOptions::default(),
            decorations: Decorations::default(),
            preview_watermark: false,
        }
    }

    /// Build a document from configuration and already resolved decoration
    /// images
    pub fn from_config(
        config: &RenderConfig,
        assets: DecorationAssets,
        metrics: &'a dyn GlyphMetrics,
    ) -> Document<'a> {
        Document {
            info: None,
            geometry: config.geometry,
            metrics,
            flow: config.flow.clone(),
            decorations: Decorations::new(assets, config.decorations.clone()),
            preview_watermark: config.preview_watermark,
        }
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Flow `blocks` onto as many pages as they need, then decorate every
    /// page. Fails fast on invalid geometry, before anything is placed.
    pub fn render(&self, blocks: &[ContentBlock]) -> Result<Rendered, LayoutError> {
        self.render_with_info(blocks, self.info.clone())
    }

    /// Render the blocks a driver emits for `record`. Driver supplied
    /// metadata takes precedence over [Document::info].
    pub fn render_record<D: DocumentDriver>(
        &self,
        driver: &D,
        record: &D::Record,
    ) -> Result<Rendered, LayoutError> {
        let blocks = driver.blocks(record)?;
        let info = driver.info(record).or_else(|| self.info.clone());
        self.render_with_info(&blocks, info)
    }

    fn render_with_info(
        &self,
        blocks: &[ContentBlock],
        info: Option<Info>,
    ) -> Result<Rendered, LayoutError> {
        let mut flow = FlowController::new(self.geometry, self.metrics, self.flow.clone())?;

        if self.preview_watermark {
            let decorations = &self.decorations;
            let geometry = self.geometry;
            flow.on_new_page(move |page, _cursor| decorations.apply_watermark(page, &geometry));
        }

        flow.push_all(blocks)?;
        let FlowOutput {
            mut pages,
            warnings,
        } = flow.finalize();

        self.decorations.apply(&mut pages, &self.geometry);
        log::debug!(
            "rendered {} block(s) onto {} page(s) with {} warning(s)",
            blocks.len(),
            pages.len(),
            warnings.len()
        );

        Ok(Rendered {
            geometry: self.geometry,
            info,
            pages,
            warnings,
        })
    }
}
