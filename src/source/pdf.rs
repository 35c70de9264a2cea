//! lopdf-backed document source.
//!
//! Rebuilds per-page text blocks from the content stream: each shown string
//! becomes a span positioned by the current text matrix, spans sharing a
//! baseline become lines, and lines separated by more than the typical
//! leading start a new block. The outline (bookmarks) doubles as the table
//! of contents.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{content::Content, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

use super::{BlockLine, DocumentSource, PageBlock, TocEntry};

/// Y variance tolerated within one line, as a fraction of the font size.
const LINE_Y_TOLERANCE: f32 = 0.3;

/// A line gap beyond this multiple of the typical leading starts a new block.
const BLOCK_GAP_FACTOR: f32 = 1.5;

/// TJ adjustments larger than this (in 1/1000 text space units) are word
/// spaces the font encoding does not carry.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// The Quick Reference Guide opened through lopdf.
///
/// The document is held for the lifetime of the source value; one extraction
/// opens it, reads what it needs, and drops it.
pub struct PdfSource {
    doc: LopdfDocument,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path.as_ref())?;
        Ok(Self { doc })
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Collect outline items depth-first into a flat, document-ordered list.
    fn collect_outline(
        &self,
        item_ref: ObjectId,
        level: u8,
        entries: &mut Vec<TocEntry>,
    ) -> Result<()> {
        if let Ok(item_dict) = self.doc.get_dictionary(item_ref) {
            let title = get_string_from_dict(item_dict, b"Title").unwrap_or_default();
            let page = self.outline_destination(item_dict).unwrap_or(0);
            entries.push(TocEntry::new(level, title, page));

            // Children (First), then siblings (Next).
            if let Ok(first) = item_dict.get(b"First") {
                if let Ok(first_ref) = first.as_reference() {
                    self.collect_outline(first_ref, level + 1, entries)?;
                }
            }
            if let Ok(next) = item_dict.get(b"Next") {
                if let Ok(next_ref) = next.as_reference() {
                    self.collect_outline(next_ref, level, entries)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve an outline item's destination to a 1-based page number.
    fn outline_destination(&self, item_dict: &lopdf::Dictionary) -> Option<u32> {
        if let Ok(dest) = item_dict.get(b"Dest") {
            return self.resolve_destination(dest);
        }

        // Fall back to the action dictionary.
        if let Ok(action) = item_dict.get(b"A") {
            if let Ok(action_ref) = action.as_reference() {
                if let Ok(action_dict) = self.doc.get_dictionary(action_ref) {
                    if let Ok(dest) = action_dict.get(b"D") {
                        return self.resolve_destination(dest);
                    }
                }
            }
        }

        None
    }

    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        let pages = self.doc.get_pages();

        if let Ok(dest_array) = dest.as_array() {
            if let Some(first) = dest_array.first() {
                if let Ok(page_ref) = first.as_reference() {
                    for (num, id) in pages.iter() {
                        if *id == page_ref {
                            return Some(*num);
                        }
                    }
                }
            }
        }

        None
    }

    /// Page height from the MediaBox, defaulting to Letter.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(792.0);
                    }
                }
            }
        }
        792.0
    }

    /// Get a page's decompressed content stream.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Extract positioned text spans from a 1-based page number.
    fn extract_page_spans(&self, page_num: u32) -> Result<Vec<PositionedSpan>> {
        let pages = self.doc.get_pages();
        let page_id = *pages.get(&page_num).ok_or(Error::PageRange {
            start: page_num - 1,
            end: page_num,
            pages: pages.len() as u32,
        })?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.get_page_content(page_id)?;
        self.parse_content_stream(&content, &fonts)
    }

    /// Walk the content stream tracking the text matrix.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<PositionedSpan>> {
        let content =
            Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if in_text_block {
                        let text = self.decode_show_text(&op, fonts, &current_font_name);
                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.get_position();
                            let size = current_font_size * text_matrix.get_scale();
                            spans.push(PositionedSpan { text, x, y, font_size: size });
                        }
                    }
                }
                "'" | "\"" => {
                    text_matrix.next_line();
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let text = self.decode_string(bytes, fonts, &current_font_name);
                            if !text.trim().is_empty() {
                                let (x, y) = text_matrix.get_position();
                                let size = current_font_size * text_matrix.get_scale();
                                spans.push(PositionedSpan { text, x, y, font_size: size });
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode the operand of a Tj/TJ operator.
    fn decode_show_text(
        &self,
        op: &lopdf::content::Operation,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
    ) -> String {
        if op.operator == "TJ" {
            // TJ interleaves strings with kerning adjustments; large negative
            // adjustments stand in for word spaces.
            if let Some(Object::Array(arr)) = op.operands.first() {
                let mut combined = String::new();
                for item in arr {
                    match item {
                        Object::String(bytes, _) => {
                            combined.push_str(&self.decode_string(bytes, fonts, font_name));
                        }
                        Object::Integer(n) => {
                            if -(*n as f32) > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                            {
                                combined.push(' ');
                            }
                        }
                        Object::Real(n) => {
                            if -n > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                            {
                                combined.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
                combined
            } else {
                String::new()
            }
        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
            self.decode_string(bytes, fonts, font_name)
        } else {
            String::new()
        }
    }

    fn decode_string(
        &self,
        bytes: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        font_name: &[u8],
    ) -> String {
        let encoding = fonts
            .get(font_name)
            .and_then(|f| f.get_font_encoding(&self.doc).ok());

        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }
}

impl DocumentSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn toc(&self) -> Result<Vec<TocEntry>> {
        let mut entries = Vec::new();

        if let Ok(catalog) = self.doc.catalog() {
            if let Ok(outlines) = catalog.get(b"Outlines") {
                if let Ok(outlines_ref) = outlines.as_reference() {
                    if let Ok(outlines_dict) = self.doc.get_dictionary(outlines_ref) {
                        if let Ok(first) = outlines_dict.get(b"First") {
                            if let Ok(first_ref) = first.as_reference() {
                                self.collect_outline(first_ref, 1, &mut entries)?;
                            }
                        }
                    }
                }
            }
        }

        Ok(entries)
    }

    fn page_blocks(&self, page_index: u32) -> Result<Vec<PageBlock>> {
        let page_num = page_index + 1;
        let pages = self.doc.get_pages();
        let page_id = *pages.get(&page_num).ok_or(Error::PageRange {
            start: page_index,
            end: page_index + 1,
            pages: pages.len() as u32,
        })?;

        let spans = self.extract_page_spans(page_num)?;
        let height = self.page_height(page_id);
        Ok(assemble_blocks(spans, height))
    }
}

/// A shown string with its text-space position.
#[derive(Debug, Clone)]
struct PositionedSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

/// A baseline-grouped line during block assembly.
#[derive(Debug)]
struct RawLine {
    y: f32,
    spans: Vec<PositionedSpan>,
}

/// Group spans into lines by baseline, then lines into blocks by gap.
///
/// `top` is measured from the page top so callers can sort blocks into
/// visual reading order regardless of the PDF's bottom-up Y axis.
fn assemble_blocks(mut spans: Vec<PositionedSpan>, page_height: f32) -> Vec<PageBlock> {
    if spans.is_empty() {
        return vec![];
    }

    // Top-to-bottom, then left-to-right.
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<RawLine> = Vec::new();
    for span in spans {
        let tolerance = span.font_size * LINE_Y_TOLERANCE;
        match lines.last_mut() {
            Some(line) if (span.y - line.y).abs() <= tolerance => line.spans.push(span),
            _ => lines.push(RawLine {
                y: span.y,
                spans: vec![span],
            }),
        }
    }
    for line in &mut lines {
        line.spans
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }

    let leading = typical_leading(&lines);

    let mut blocks: Vec<PageBlock> = Vec::new();
    let mut current: Vec<RawLine> = Vec::new();
    for line in lines {
        if let Some(prev) = current.last() {
            if (prev.y - line.y).abs() > leading * BLOCK_GAP_FACTOR {
                blocks.push(finish_block(std::mem::take(&mut current), page_height));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(finish_block(current, page_height));
    }

    log::debug!("assembled {} blocks (leading {:.1}pt)", blocks.len(), leading);
    blocks
}

/// Typical baseline-to-baseline distance on the page.
fn typical_leading(lines: &[RawLine]) -> f32 {
    if lines.len() < 2 {
        return 12.0;
    }

    let gaps: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|g| *g > 0.1)
        .collect();

    if gaps.is_empty() {
        return 12.0;
    }
    gaps.iter().sum::<f32>() / gaps.len() as f32
}

fn finish_block(lines: Vec<RawLine>, page_height: f32) -> PageBlock {
    let top = lines
        .first()
        .map(|l| (page_height - l.y).max(0.0))
        .unwrap_or(0.0);
    let lines = lines
        .into_iter()
        .map(|l| BlockLine {
            spans: l.spans.into_iter().map(|s| s.text).collect(),
        })
        .collect();
    PageBlock::new(top, lines)
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; the guide does not rely on the TL operator.
        self.f -= 12.0 * self.d;
    }

    fn get_position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn get_scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Text decoding fallback when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM (the PDF convention for Unicode strings).
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback.
    bytes.iter().map(|&b| b as char).collect()
}
