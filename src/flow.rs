//! # Page flow
//!
//! The [FlowController] owns the render cursor and the growing list of
//! pages for a single document. Content arrives as [ContentBlock]s, gets cut
//! into atomic units (one wrapped line, one table row, one image, one whole
//! clause title) and each unit is either placed at the cursor or, when it
//! would cross the bottom margin, placed at the top of a freshly opened page.
//!
//! Nothing is ever truncated. A unit taller than the whole content area is
//! placed on a page of its own and allowed to overflow the bottom margin,
//! with a [LayoutWarning] recording the fact.

use crate::asset::ImageAsset;
use crate::block::{Align, ContentBlock, TableCell};
use crate::geometry::PageGeometry;
use crate::layout::{justify, wrap, Line};
use crate::metrics::GlyphMetrics;
use crate::page::{DrawCommand, Layer, Page};
use crate::{LayoutError, Mm, Pt};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Slack allowed when comparing accumulated positions against the bottom
/// margin, so float rounding alone never forces a page break
const EPSILON: Mm = Mm(1e-4);

/// Tunables for how blocks are turned into placed units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    /// Multiplier applied to every font's natural line height
    pub line_spacing: f32,
    /// Vertical space after each paragraph
    pub paragraph_spacing: Mm,
    /// Vertical space between a clause title and its body
    pub title_spacing: Mm,
    /// How many of the title's own line heights must still fit below a
    /// clause title and its spacing, else the title moves to the next page
    pub orphan_lookahead_lines: f32,
    /// When a clause title moves to the next page, take the last line of
    /// the paragraph right before it along
    pub carry_last_line_with_title: bool,
    /// Inner padding of table cells, on every side
    pub table_cell_padding: Mm,
    /// Draw a rule under every table row
    pub table_rules: bool,
    /// Blank space left above a signature line for the signature itself
    pub signature_space: Mm,
    /// Length of the line signed on
    pub signature_width: Mm,
    pub signature_font: String,
    pub signature_size: Pt,
}

impl Default for FlowOptions {
    fn default() -> Self {
        FlowOptions {
            line_spacing: 1.0,
            paragraph_spacing: Mm(2.0),
            title_spacing: Mm(1.0),
            orphan_lookahead_lines: 1.0,
            carry_last_line_with_title: false,
            table_cell_padding: Mm(1.0),
            table_rules: true,
            signature_space: Mm(15.0),
            signature_width: Mm(70.0),
            signature_font: "Helvetica".into(),
            signature_size: Pt(10.0),
        }
    }
}

/// Where the next unit will be placed
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderCursor {
    pub page_index: usize,
    pub y: Mm,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Accepting blocks
    Flowing,
    /// The pages have been handed out; no further blocks are accepted
    Finalizing,
}

/// Recoverable layout problems. The document is still produced, but may not
/// look the way its author intended.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum LayoutWarning {
    #[display("a {height} tall unit exceeds the {available} content height and overflows page {page_index}")]
    OversizedUnit {
        page_index: usize,
        height: Mm,
        available: Mm,
    },
    #[display("skipped an image without usable dimensions on page {page_index}")]
    SkippedImage { page_index: usize },
    #[display("table columns span {width}, more than the {available} content width, on page {page_index}")]
    ColumnOverflow {
        page_index: usize,
        width: Mm,
        available: Mm,
    },
}

/// Everything the controller produced for one document
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOutput {
    pub pages: Vec<Page>,
    pub warnings: Vec<LayoutWarning>,
}

/// Called with every page opened while it is registered
pub type NewPageHook<'a> = Box<dyn FnMut(&mut Page, &RenderCursor) + 'a>;

/// The most recent paragraph line, remembered so it can follow a clause
/// title onto the next page
#[derive(Debug, Copy, Clone)]
struct PlacedLine {
    page_index: usize,
    command_index: usize,
    height: Mm,
}

/// The pagination state machine for one document render.
///
/// The controller is the only thing that moves the [RenderCursor]; drivers
/// feed it blocks with [FlowController::push] (or place custom units with
/// [FlowController::place_unit]) and collect the pages with
/// [FlowController::finalize].
pub struct FlowController<'a> {
    geometry: PageGeometry,
    metrics: &'a dyn GlyphMetrics,
    options: FlowOptions,
    cursor: RenderCursor,
    pages: Vec<Page>,
    state: FlowState,
    on_new_page: Option<NewPageHook<'a>>,
    warnings: Vec<LayoutWarning>,
    last_line: Option<PlacedLine>,
}

impl<'a> FlowController<'a> {
    /// Start a document with one blank page. Fails if the geometry leaves no
    /// content area.
    pub fn new(
        geometry: PageGeometry,
        metrics: &'a dyn GlyphMetrics,
        options: FlowOptions,
    ) -> Result<FlowController<'a>, LayoutError> {
        geometry.validate()?;
        Ok(FlowController {
            geometry,
            metrics,
            options,
            cursor: RenderCursor {
                page_index: 0,
                y: geometry.content_top(),
            },
            pages: vec![Page::new(0)],
            state: FlowState::Flowing,
            on_new_page: None,
            warnings: Vec::default(),
            last_line: None,
        })
    }

    /// Register a hook run on every page opened by a page break. If the
    /// current page is still blank the hook runs on it straight away, so a
    /// hook registered before any content covers the first page too.
    pub fn on_new_page<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Page, &RenderCursor) + 'a,
    {
        let mut hook: NewPageHook<'a> = Box::new(hook);
        if self.state == FlowState::Flowing && self.is_fresh() {
            hook(&mut self.pages[self.cursor.page_index], &self.cursor);
        }
        self.on_new_page = Some(hook);
    }

    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// The pages produced so far
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Space left between the cursor and the bottom margin
    pub fn remaining(&self) -> Mm {
        self.geometry.content_bottom() - self.cursor.y
    }

    /// Flow one block onto the pages
    pub fn push(&mut self, block: &ContentBlock) -> Result<(), LayoutError> {
        self.ensure_flowing()?;
        block.validate()?;
        let previous_line = self.last_line.take();

        match block {
            ContentBlock::Paragraph {
                text,
                font,
                size,
                justified,
            } => self.push_paragraph(text, font, *size, *justified),
            ContentBlock::ClauseTitle { text, font, size } => {
                self.push_title(text, font, *size, previous_line)
            }
            ContentBlock::TableRow {
                cells,
                column_widths,
                font,
                size,
            } => self.push_table_row(cells, column_widths, font, *size),
            ContentBlock::Spacer { height } => self.advance(*height),
            ContentBlock::ImageBlock {
                asset,
                max_width,
                max_height,
            } => self.push_image(asset, *max_width, *max_height),
            ContentBlock::SignatureLine { label } => self.push_signature(label),
            ContentBlock::PageBreak => {
                if !self.is_fresh() {
                    self.open_page();
                }
            }
        }
        Ok(())
    }

    /// Flow a sequence of blocks in order
    pub fn push_all<'b, I>(&mut self, blocks: I) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = &'b ContentBlock>,
    {
        for block in blocks {
            self.push(block)?;
        }
        Ok(())
    }

    /// Place a custom atomic unit of the given height. `build` receives the
    /// left content margin and the y coordinate the unit starts at, after
    /// any page break, and returns the commands to draw; it is free to
    /// offset x for indented content. Returns the index of the page the unit
    /// landed on.
    pub fn place_unit<F>(&mut self, height: Mm, build: F) -> Result<usize, LayoutError>
    where
        F: FnOnce(Mm, Mm) -> Vec<DrawCommand>,
    {
        self.ensure_flowing()?;
        self.last_line = None;
        Ok(self.place(height, build))
    }

    /// Close the current page and continue at the top of a new one
    pub fn break_page(&mut self) -> Result<(), LayoutError> {
        self.ensure_flowing()?;
        self.open_page();
        Ok(())
    }

    fn open_page(&mut self) {
        let next = self.cursor.page_index + 1;
        log::debug!(
            "page {} closed at y = {}, opening page {}",
            self.cursor.page_index,
            self.cursor.y,
            next
        );

        self.pages.push(Page::new(next));
        self.cursor = RenderCursor {
            page_index: next,
            y: self.geometry.content_top(),
        };
        self.last_line = None;

        if let Some(hook) = self.on_new_page.as_mut() {
            hook(&mut self.pages[next], &self.cursor);
        }
    }

    /// Stop accepting blocks and hand out the pages and any warnings
    pub fn finalize(&mut self) -> FlowOutput {
        if self.state == FlowState::Flowing {
            log::debug!("flow finalized with {} page(s)", self.pages.len());
        }
        self.state = FlowState::Finalizing;
        FlowOutput {
            pages: std::mem::take(&mut self.pages),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn ensure_flowing(&self) -> Result<(), LayoutError> {
        match self.state {
            FlowState::Flowing => Ok(()),
            FlowState::Finalizing => Err(LayoutError::Finalized),
        }
    }

    /// Nothing placed on the current page yet
    fn is_fresh(&self) -> bool {
        self.cursor.y <= self.geometry.content_top() + EPSILON
            && self
                .pages
                .get(self.cursor.page_index)
                .map_or(true, Page::is_blank)
    }

    fn fits(&self, height: Mm) -> bool {
        self.cursor.y + height <= self.geometry.content_bottom() + EPSILON
    }

    fn line_height(&self, font: &str, size: Pt) -> Mm {
        self.metrics.line_height(font, size) * self.options.line_spacing
    }

    fn warn(&mut self, warning: LayoutWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Break the page if a unit of `height` can't fit below the cursor
    fn make_room(&mut self, height: Mm) {
        if !self.fits(height) && !self.is_fresh() {
            self.open_page();
        }
        let available = self.geometry.content_height();
        if height > available + EPSILON {
            self.warn(LayoutWarning::OversizedUnit {
                page_index: self.cursor.page_index,
                height,
                available,
            });
        }
    }

    fn place<F>(&mut self, height: Mm, build: F) -> usize
    where
        F: FnOnce(Mm, Mm) -> Vec<DrawCommand>,
    {
        self.make_room(height);
        let page = &mut self.pages[self.cursor.page_index];
        for command in build(self.geometry.content_left(), self.cursor.y) {
            page.add_command(command);
        }
        self.cursor.y += height;
        self.cursor.page_index
    }

    /// Move the cursor down by blank space. Space that doesn't fit ends the
    /// page and is not carried over to the top of the next one.
    fn advance(&mut self, height: Mm) {
        if height <= Mm::ZERO {
            return;
        }
        if self.fits(height) {
            self.cursor.y += height;
        } else if !self.is_fresh() {
            self.open_page();
        }
    }

    fn push_paragraph(&mut self, text: &str, font: &str, size: Pt, justified: bool) {
        let metrics = self.metrics;
        let line_height = self.line_height(font, size);
        let width = self.geometry.content_width();
        let mut placed = false;

        for line in wrap(text, font, size, width, metrics) {
            if line.is_empty() {
                // blank lines separate text, they don't start pages
                if !self.is_fresh() {
                    self.advance(line_height);
                }
                continue;
            }

            let command = line_command(&line, font, size, width, justified, metrics);
            let page_index = self.place(line_height, |x, y| {
                let mut command = command;
                match &mut command {
                    DrawCommand::TextRun { x: cx, .. } | DrawCommand::JustifiedTextRun { x: cx, .. } => {
                        *cx = x
                    }
                    _ => {}
                }
                command.set_y(y);
                vec![command]
            });
            self.last_line = Some(PlacedLine {
                page_index,
                command_index: self.pages[page_index].commands.len() - 1,
                height: line_height,
            });
            placed = true;
        }

        if placed {
            let last_line = self.last_line;
            self.advance(self.options.paragraph_spacing);
            // spacing can close the page, in which case there is nothing to carry
            if self.cursor.page_index == last_line.map(|l| l.page_index).unwrap_or_default() {
                self.last_line = last_line;
            }
        }
    }

    fn push_title(&mut self, text: &str, font: &str, size: Pt, previous: Option<PlacedLine>) {
        let line_height = self.line_height(font, size);
        let lines: Vec<Line> = wrap(text, font, size, self.geometry.content_width(), self.metrics)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return;
        }

        let title_height = line_height * lines.len() as f32;
        let lookahead = self.options.title_spacing
            + line_height * self.options.orphan_lookahead_lines.max(0.0);
        let stranded = self.fits(title_height) && !self.fits(title_height + lookahead);
        let moving = !self.is_fresh() && (stranded || !self.fits(title_height));

        if moving {
            log::debug!(
                "clause title '{}' moves to page {} to stay with its body",
                text,
                self.cursor.page_index + 1
            );
            let carried = self.options.carry_last_line_with_title
                && previous.map(|line| self.carry_line(line)).unwrap_or(false);
            if !carried {
                self.open_page();
            }
        }

        self.place(title_height, |x, y| {
            lines
                .into_iter()
                .enumerate()
                .map(|(i, line)| DrawCommand::TextRun {
                    x,
                    y: y + line_height * i as f32,
                    text: line.text,
                    font: font.to_string(),
                    size,
                })
                .collect()
        });
        self.advance(self.options.title_spacing);
    }

    /// Move the last line of the preceding paragraph to the top of a new
    /// page. Only done when that line is the last thing on the current page
    /// and isn't the only content there.
    fn carry_line(&mut self, line: PlacedLine) -> bool {
        let page = &mut self.pages[self.cursor.page_index];
        if line.page_index != self.cursor.page_index || line.command_index + 1 != page.commands.len()
        {
            return false;
        }
        let Some(mut command) = page.commands.pop() else {
            return false;
        };
        if page.is_blank() {
            page.add_command(command);
            return false;
        }

        self.open_page();
        command.set_y(self.cursor.y);
        self.pages[self.cursor.page_index].add_command(command);
        self.cursor.y += line.height;
        self.advance(self.options.paragraph_spacing);
        true
    }

    fn push_table_row(&mut self, cells: &[TableCell], column_widths: &[Mm], font: &str, size: Pt) {
        let metrics = self.metrics;
        let padding = self.options.table_cell_padding;
        let line_height = self.line_height(font, size);

        let total_width: Mm = column_widths.iter().copied().sum();
        let available = self.geometry.content_width();
        if total_width > available + EPSILON {
            self.warn(LayoutWarning::ColumnOverflow {
                page_index: self.cursor.page_index,
                width: total_width,
                available,
            });
        }

        let cell_lines: Vec<(Align, Mm, Vec<Line>)> = cells
            .iter()
            .zip(column_widths)
            .map(|(cell, &width)| {
                let inner = (width - padding * 2.0).max(Mm::ZERO);
                let lines = wrap(&cell.text, font, size, inner, metrics)
                    .filter(|line| !line.is_empty())
                    .collect();
                (cell.align, width, lines)
            })
            .collect();
        let row_lines = cell_lines
            .iter()
            .map(|(_, _, lines)| lines.len())
            .max()
            .unwrap_or(0)
            .max(1);
        let height = line_height * row_lines as f32 + padding * 2.0;
        let rules = self.options.table_rules;

        self.place(height, |left, y| {
            let mut commands = Vec::default();
            let mut x = left;
            for (align, width, lines) in cell_lines {
                let inner = (width - padding * 2.0).max(Mm::ZERO);
                for (i, line) in lines.into_iter().enumerate() {
                    let slack = (inner - metrics.measure(&line.text, font, size)).max(Mm::ZERO);
                    let offset = match align {
                        Align::Left => Mm::ZERO,
                        Align::Center => slack / 2.0,
                        Align::Right => slack,
                    };
                    commands.push(DrawCommand::TextRun {
                        x: x + padding + offset,
                        y: y + padding + line_height * i as f32,
                        text: line.text,
                        font: font.to_string(),
                        size,
                    });
                }
                x += width;
            }
            if rules {
                commands.push(DrawCommand::Rule {
                    x: left,
                    y: y + height,
                    width: total_width,
                });
            }
            commands
        });
    }

    fn push_image(&mut self, asset: &ImageAsset, max_width: Mm, max_height: Mm) {
        let max_width = max_width.min(self.geometry.content_width());
        match asset.fit_within(max_width, max_height) {
            Some((w, h)) => {
                self.place(h, |x, y| {
                    vec![DrawCommand::ImageDraw {
                        x,
                        y,
                        w,
                        h,
                        asset: asset.clone(),
                        layer: Layer::Content,
                    }]
                });
            }
            None => self.warn(LayoutWarning::SkippedImage {
                page_index: self.cursor.page_index,
            }),
        }
    }

    fn push_signature(&mut self, label: &str) {
        let font = self.options.signature_font.clone();
        let size = self.options.signature_size;
        let space = self.options.signature_space;
        let width = self.options.signature_width;
        let height = space + self.line_height(&font, size);

        self.place(height, |x, y| {
            vec![
                DrawCommand::Rule {
                    x,
                    y: y + space,
                    width,
                },
                DrawCommand::TextRun {
                    x,
                    y: y + space,
                    text: label.to_string(),
                    font,
                    size,
                },
            ]
        });
    }
}

/// The command for one wrapped line, positioned at the origin. Lines are
/// justified unless they end their paragraph or have a single word.
fn line_command(
    line: &Line,
    font: &str,
    size: Pt,
    width: Mm,
    justified: bool,
    metrics: &dyn GlyphMetrics,
) -> DrawCommand {
    let words = line.words();
    if justified && !line.last && words.len() >= 2 {
        DrawCommand::JustifiedTextRun {
            x: Mm::ZERO,
            y: Mm::ZERO,
            words: justify(&words, font, size, width, metrics),
            font: font.to_string(),
            size,
        }
    } else {
        DrawCommand::TextRun {
            x: Mm::ZERO,
            y: Mm::ZERO,
            text: line.text.clone(),
            font: font.to_string(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Margins;
    use crate::test_support::UnitMetrics;
    use image::DynamicImage;
    use std::cell::RefCell;

    /// 100mm square page with a 10mm margin: content runs from y = 10 to 90
    fn geometry() -> PageGeometry {
        PageGeometry::new((Mm(100.0), Mm(100.0)), Margins::all(Mm(10.0))).expect("valid")
    }

    /// 10mm lines, 1mm per character
    fn metrics() -> UnitMetrics {
        UnitMetrics {
            char_width: 1.0,
            line_height: 10.0,
        }
    }

    fn tight() -> FlowOptions {
        FlowOptions {
            paragraph_spacing: Mm::ZERO,
            title_spacing: Mm::ZERO,
            table_cell_padding: Mm::ZERO,
            table_rules: false,
            ..FlowOptions::default()
        }
    }

    fn text_positions(pages: &[Page]) -> Vec<(usize, String, f32)> {
        pages
            .iter()
            .flat_map(|page| {
                page.commands
                    .iter()
                    .filter_map(move |c| c.text().map(|t| (page.index, t, c.y().0)))
            })
            .collect()
    }

    /// One word per line: each word is wider than half the 80mm content width
    fn word(c: char) -> String {
        std::iter::repeat(c).take(45).collect()
    }

    #[test]
    fn breaks_a_paragraph_between_lines() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(65.0))).expect("flowing");
        assert_eq!(flow.cursor().y, Mm(75.0));

        let text = format!("{} {} {}", word('a'), word('b'), word('c'));
        flow.push(&ContentBlock::paragraph(text, "body", Pt(10.0), false))
            .expect("flowing");
        let output = flow.finalize();

        let placed = text_positions(&output.pages);
        assert_eq!(
            placed,
            vec![
                (0, word('a'), 75.0),
                (1, word('b'), 10.0),
                (1, word('c'), 20.0)
            ]
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn table_rows_move_whole_to_the_next_page() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(15.0))).expect("flowing");

        for row in 1..=10 {
            let block = ContentBlock::table_row(
                vec![TableCell::left(format!("row {row}")), TableCell::right("9.99")],
                vec![Mm(50.0), Mm(30.0)],
                "body",
                Pt(10.0),
            )
            .expect("valid row");
            flow.push(&block).expect("flowing");
        }
        let output = flow.finalize();
        assert_eq!(output.pages.len(), 2);

        let first = output.pages[0].texts();
        let second = output.pages[1].texts();
        assert_eq!(first.len(), 12);
        assert_eq!(first[10], "row 6");
        assert_eq!(second[0], "row 7");
        assert_eq!(second.len(), 8);

        // both cells of a row always share a y coordinate
        for page in &output.pages {
            for pair in page.commands.chunks(2) {
                assert_eq!(pair[0].y(), pair[1].y());
            }
        }
    }

    #[test]
    fn table_cells_align_within_their_column() {
        let m = metrics();
        let options = FlowOptions {
            table_cell_padding: Mm(2.0),
            ..tight()
        };
        let mut flow = FlowController::new(geometry(), &m, options).expect("valid");
        let row = ContentBlock::table_row(
            vec![
                TableCell::left("ab"),
                TableCell::center("cd"),
                TableCell::right("ef"),
            ],
            vec![Mm(20.0), Mm(20.0), Mm(20.0)],
            "body",
            Pt(10.0),
        )
        .expect("valid row");
        flow.push(&row).expect("flowing");
        let output = flow.finalize();

        let xs: Vec<f32> = output.pages[0]
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::TextRun { x, .. } => x.0,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        // columns start at 10, 30, 50; inner width 16mm; text 2mm wide
        assert_eq!(xs, vec![12.0, 39.0, 66.0]);
        assert_eq!(output.pages[0].commands[0].y(), Mm(12.0));
    }

    #[test]
    fn clause_titles_are_not_stranded_at_the_bottom() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::paragraph("intro", "body", Pt(10.0), false))
            .expect("flowing");
        flow.push(&ContentBlock::spacer(Mm(55.0))).expect("flowing");
        // the title itself fits (75 + 10 <= 90), but not with a body line
        flow.push(&ContentBlock::clause_title("1. Terms", "bold", Pt(12.0)))
            .expect("flowing");
        let output = flow.finalize();

        assert_eq!(output.pages.len(), 2);
        assert_eq!(text_positions(&output.pages)[1], (1, "1. Terms".into(), 10.0));
    }

    #[test]
    fn clause_titles_stay_when_a_body_line_fits() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(60.0))).expect("flowing");
        flow.push(&ContentBlock::clause_title("2. Payment", "bold", Pt(12.0)))
            .expect("flowing");
        let output = flow.finalize();

        assert_eq!(output.pages.len(), 1);
        assert_eq!(text_positions(&output.pages), vec![(0, "2. Payment".into(), 70.0)]);
    }

    #[test]
    fn optionally_carries_the_paragraph_tail_with_a_moved_title() {
        let m = metrics();
        let options = FlowOptions {
            carry_last_line_with_title: true,
            ..tight()
        };
        let mut flow = FlowController::new(geometry(), &m, options).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(55.0))).expect("flowing");
        let text = format!("{} {}", word('a'), word('b'));
        flow.push(&ContentBlock::paragraph(text, "body", Pt(10.0), false))
            .expect("flowing");
        flow.push(&ContentBlock::clause_title("3. Term", "bold", Pt(12.0)))
            .expect("flowing");
        let output = flow.finalize();

        assert_eq!(
            text_positions(&output.pages),
            vec![
                (0, word('a'), 65.0),
                (1, word('b'), 10.0),
                (1, "3. Term".into(), 20.0)
            ]
        );
    }

    #[test]
    fn justifies_all_but_the_last_line() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll mmmm nnnn oooo pppp qqqq rrrr";
        flow.push(&ContentBlock::paragraph(text, "body", Pt(10.0), true))
            .expect("flowing");
        let output = flow.finalize();
        let commands = &output.pages[0].commands;

        assert_eq!(commands.len(), 2);
        match &commands[0] {
            DrawCommand::JustifiedTextRun { x, words, .. } => {
                assert_eq!(*x, Mm(10.0));
                let last = words.last().expect("words");
                assert!((last.x_offset + Mm(4.0)).approx_eq(Mm(80.0), 1e-3));
            }
            other => panic!("expected a justified line, got {other:?}"),
        }
        assert!(matches!(commands[1], DrawCommand::TextRun { .. }));
    }

    #[test]
    fn page_breaks_reset_the_cursor_and_run_the_hook() {
        let m = metrics();
        let seen = RefCell::new(Vec::new());
        {
            let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
            flow.on_new_page(|page, cursor| {
                seen.borrow_mut().push((page.index, cursor.page_index, cursor.y));
            });

            let mut last_page = 0;
            for _ in 0..25 {
                flow.push(&ContentBlock::paragraph("line", "body", Pt(10.0), false))
                    .expect("flowing");
                let cursor = flow.cursor();
                assert!(cursor.page_index >= last_page);
                last_page = cursor.page_index;
            }
            assert_eq!(flow.finalize().pages.len(), 4);
        }

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 4);
        for (i, (page, cursor_page, y)) in seen.into_iter().enumerate() {
            assert_eq!(page, i);
            assert_eq!(cursor_page, i);
            assert_eq!(y, Mm(10.0));
        }
    }

    #[test]
    fn oversized_units_overflow_instead_of_being_dropped() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::paragraph("before", "body", Pt(10.0), false))
            .expect("flowing");

        let tall = ImageAsset::from_image(DynamicImage::new_rgba8(10, 200));
        flow.push(&ContentBlock::image(tall, Mm(50.0), Mm(150.0)))
            .expect("flowing");
        let output = flow.finalize();

        assert_eq!(output.pages.len(), 2);
        match &output.pages[1].commands[0] {
            DrawCommand::ImageDraw { y, h, .. } => {
                assert_eq!(*y, Mm(10.0));
                assert!(h.approx_eq(Mm(150.0), 1e-3));
            }
            other => panic!("expected the image, got {other:?}"),
        }
        assert!(matches!(
            output.warnings[..],
            [LayoutWarning::OversizedUnit { page_index: 1, .. }]
        ));
    }

    #[test]
    fn oversized_unit_on_a_blank_page_opens_no_extra_page() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        let tall = ImageAsset::from_image(DynamicImage::new_rgba8(10, 200));
        flow.push(&ContentBlock::image(tall, Mm(50.0), Mm(150.0)))
            .expect("flowing");
        let output = flow.finalize();
        assert_eq!(output.pages.len(), 1);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn unusable_images_are_skipped_with_a_warning() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        let empty = ImageAsset::from_image(DynamicImage::new_rgba8(0, 0));
        flow.push(&ContentBlock::image(empty, Mm(50.0), Mm(50.0)))
            .expect("flowing");
        let output = flow.finalize();
        assert!(output.pages[0].commands.is_empty());
        assert_eq!(
            output.warnings,
            vec![LayoutWarning::SkippedImage { page_index: 0 }]
        );
    }

    #[test]
    fn spacers_do_not_carry_over_a_page_break() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(70.0))).expect("flowing");
        flow.push(&ContentBlock::spacer(Mm(30.0))).expect("flowing");
        assert_eq!(
            flow.cursor(),
            RenderCursor {
                page_index: 1,
                y: Mm(10.0)
            }
        );
    }

    #[test]
    fn explicit_page_breaks_skip_blank_pages() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::PageBreak).expect("flowing");
        flow.push(&ContentBlock::paragraph("text", "body", Pt(10.0), false))
            .expect("flowing");
        flow.push(&ContentBlock::PageBreak).expect("flowing");
        flow.push(&ContentBlock::PageBreak).expect("flowing");
        assert_eq!(flow.finalize().pages.len(), 2);
    }

    #[test]
    fn signatures_leave_room_above_the_rule() {
        let m = metrics();
        let options = FlowOptions {
            signature_space: Mm(15.0),
            signature_width: Mm(60.0),
            ..tight()
        };
        let mut flow = FlowController::new(geometry(), &m, options).expect("valid");
        flow.push(&ContentBlock::signature("Client")).expect("flowing");
        assert_eq!(flow.cursor().y, Mm(35.0));
        let output = flow.finalize();
        assert_eq!(
            output.pages[0].commands[0],
            DrawCommand::Rule {
                x: Mm(10.0),
                y: Mm(25.0),
                width: Mm(60.0)
            }
        );
        assert_eq!(output.pages[0].texts(), vec!["Client".to_string()]);
    }

    #[test]
    fn custom_units_receive_the_placement_origin() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.push(&ContentBlock::spacer(Mm(75.0))).expect("flowing");
        let page = flow
            .place_unit(Mm(20.0), |x, y| {
                vec![DrawCommand::Rule {
                    x: x + Mm(5.0),
                    y,
                    width: Mm(10.0),
                }]
            })
            .expect("flowing");
        assert_eq!(page, 1);
        let output = flow.finalize();
        assert_eq!(
            output.pages[1].commands,
            vec![DrawCommand::Rule {
                x: Mm(15.0),
                y: Mm(10.0),
                width: Mm(10.0)
            }]
        );
    }

    #[test]
    fn finalized_controllers_reject_blocks() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.finalize();
        assert_eq!(flow.state(), FlowState::Finalizing);
        let err = flow
            .push(&ContentBlock::spacer(Mm(1.0)))
            .unwrap_err();
        assert!(matches!(err, LayoutError::Finalized));
    }

    #[test]
    fn finalized_controllers_open_no_more_pages() {
        let m = metrics();
        let opened = RefCell::new(0);
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        flow.on_new_page(|_, _| *opened.borrow_mut() += 1);
        flow.push(&ContentBlock::paragraph("text", "body", Pt(10.0), false))
            .expect("flowing");
        flow.break_page().expect("flowing");
        assert_eq!(flow.cursor().page_index, 1);

        let output = flow.finalize();
        assert_eq!(output.pages.len(), 2);
        assert!(matches!(flow.break_page(), Err(LayoutError::Finalized)));
        assert!(flow.pages().is_empty());
        drop(flow);
        assert_eq!(opened.into_inner(), 2);
    }

    #[test]
    fn hand_built_rows_with_missing_widths_are_rejected() {
        let m = metrics();
        let mut flow = FlowController::new(geometry(), &m, tight()).expect("valid");
        let short = ContentBlock::TableRow {
            cells: vec![TableCell::left("a"), TableCell::left("b")],
            column_widths: vec![Mm(20.0)],
            font: "body".into(),
            size: Pt(10.0),
        };
        assert!(matches!(
            flow.push(&short),
            Err(LayoutError::TableShape {
                cells: 2,
                columns: 1
            })
        ));

        let zero = ContentBlock::TableRow {
            cells: vec![TableCell::left("a"), TableCell::left("b")],
            column_widths: vec![Mm(20.0), Mm(-1.0)],
            font: "body".into(),
            size: Pt(10.0),
        };
        assert!(matches!(
            flow.push(&zero),
            Err(LayoutError::InvalidColumn { index: 1 })
        ));

        let output = flow.finalize();
        assert!(output.pages[0].commands.is_empty());
    }

    #[test]
    fn rejects_invalid_geometry_up_front() {
        let m = metrics();
        let geometry = PageGeometry {
            width: Mm(100.0),
            height: Mm(100.0),
            margins: Margins::symmetric(Mm(50.0), Mm(10.0)),
        };
        assert!(FlowController::new(geometry, &m, tight()).is_err());
    }
}
