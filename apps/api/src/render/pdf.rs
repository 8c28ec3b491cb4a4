//! PDF rendering with lopdf.
//!
//! Text is set in the standard Helvetica faces with WinAnsi encoding, which
//! matches the width tables the layout engine measures with. Layout coordinates
//! are millimetres from the top-left corner; PDF user space is points from the
//! bottom-left, so every y is flipped.

use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::layout::font_metrics::{FontWeight, TextMeasure, MM_PER_PT};
use crate::layout::page::{Align, Block, BlockContent, Page, PageGeometry, TypeScale};
use crate::render::{ExportError, PageRenderer};

const PDF_VERSION: &str = "1.5";
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";
/// Baseline offset from the top of the line box, as a fraction of the font size.
const ASCENT: f32 = 0.75;

pub struct PdfRenderer {
    scale: TypeScale,
    measure: Arc<dyn TextMeasure>,
}

impl PdfRenderer {
    pub fn new(scale: TypeScale, measure: Arc<dyn TextMeasure>) -> Self {
        Self { scale, measure }
    }

    fn page_content(&self, page: &Page, geometry: &PageGeometry) -> Content {
        let page_height = mm_to_pt(geometry.height);
        let mut operations = Vec::new();

        for block in &page.blocks {
            match &block.content {
                BlockContent::Text { text } => {
                    self.text_operations(&mut operations, block, text, page_height)
                }
                BlockContent::Rule { thickness } => {
                    rule_operations(&mut operations, block, *thickness, page_height)
                }
            }
        }

        Content { operations }
    }

    fn text_operations(
        &self,
        ops: &mut Vec<Operation>,
        block: &Block,
        text: &str,
        page_height: f32,
    ) {
        if text.is_empty() {
            return;
        }
        let style = self.scale.style(block.role);
        let font = match style.weight {
            FontWeight::Normal => REGULAR_FONT,
            FontWeight::Bold => BOLD_FONT,
        };
        let x = mm_to_pt(block.x);
        let baseline = page_height - mm_to_pt(block.y) - style.size_pt * ASCENT;

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), real(style.size_pt)],
        ));
        let word_spacing = match block.align {
            Align::Justify => self.justify_spacing(block, text),
            _ => 0.0,
        };
        ops.push(Operation::new("Tw", vec![real(word_spacing)]));
        ops.push(Operation::new("Td", vec![real(x), real(baseline)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Extra space per word gap, in points, that stretches `text` to the block width.
    fn justify_spacing(&self, block: &Block, text: &str) -> f32 {
        let gaps = text.chars().filter(|c| *c == ' ').count();
        if gaps == 0 {
            return 0.0;
        }
        let natural = self.measure.measure(text, block.role);
        let slack = block.width - natural;
        if slack <= 0.0 {
            return 0.0;
        }
        mm_to_pt(slack) / gaps as f32
    }
}

fn rule_operations(ops: &mut Vec<Operation>, block: &Block, thickness: f32, page_height: f32) {
    let y = page_height - mm_to_pt(block.y);
    let x0 = mm_to_pt(block.x);
    let x1 = mm_to_pt(block.x + block.width);

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("w", vec![real(mm_to_pt(thickness))]));
    ops.push(Operation::new("m", vec![real(x0), real(y)]));
    ops.push(Operation::new("l", vec![real(x1), real(y)]));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

impl PageRenderer for PdfRenderer {
    fn render(&self, pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
        if pages.is_empty() {
            return Err(ExportError::NoPages);
        }

        let mut doc = PdfDocument::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        fonts.set(REGULAR_FONT, Object::Reference(add_font(&mut doc, FontWeight::Normal)));
        fonts.set(BOLD_FONT, Object::Reference(add_font(&mut doc, FontWeight::Bold)));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        let resources_id = doc.add_object(Object::Dictionary(resources));

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let content = self.page_content(page, geometry);
            let bytes = content.encode().map_err(|e| ExportError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set("Contents", Object::Reference(content_id));
            page_dict.set("Resources", Object::Reference(resources_id));
            kids.push(Object::Reference(doc.add_object(Object::Dictionary(page_dict))));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                real(mm_to_pt(geometry.width)),
                real(mm_to_pt(geometry.height)),
            ]),
        );
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal(env!("CARGO_PKG_NAME")));
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        debug!(pages = pages.len(), bytes = out.len(), "pdf rendered");
        Ok(out)
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

fn add_font(doc: &mut PdfDocument, weight: FontWeight) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(weight.base_font().as_bytes().to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

#[allow(clippy::useless_conversion)]
fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Maps text onto WinAnsi bytes. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
