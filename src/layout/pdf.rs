//! Layout source that reads spans and image placements straight from PDF
//! content streams.
//!
//! Text positions come from the text and graphics state operators; span
//! widths are estimated from character counts because glyph metrics are not
//! consulted. Coordinates are flipped so that y grows downward from the top
//! of the media box.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{check_pdf_bytes, check_pdf_path};
use crate::error::{Error, Result};
use crate::model::BBox;

use super::source::LayoutSource;
use super::types::{ImageData, ImageFormat, Line, PageLayout, Span};

/// Default text leading when a stream never sets `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// Kerning (in thousandths of a text space unit) treated as a word break in `TJ`.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph width as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Depth limit when walking `/Parent` links for inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// A PDF document opened for layout extraction.
pub struct PdfLayoutSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl std::fmt::Debug for PdfLayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfLayoutSource")
            .field("pages", &self.pages.len())
            .finish_non_exhaustive()
    }
}

impl PdfLayoutSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = check_pdf_path(path)?;
        log::debug!("Opening {} ({})", path.display(), header);

        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_number)
            .copied()
            .ok_or(Error::PageOutOfRange(page_number, self.pages.len() as u32))
    }

    /// Look up a page attribute, following `/Parent` links for inherited keys.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_TREE_DEPTH {
            let dict = current?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Dictionary(d) => Some(d),
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            _ => None,
        }
    }

    /// Media box as (left, top, width, height) in PDF user space.
    fn media_box(&self, page_id: ObjectId) -> (f32, f32, f32, f32) {
        let values: Option<Vec<f32>> = self
            .inherited(page_id, b"MediaBox")
            .and_then(|obj| match obj {
                Object::Reference(id) => self.doc.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| arr.iter().filter_map(get_number).collect());

        match values.as_deref() {
            Some([x0, y0, x1, y1]) => {
                let (left, right) = (x0.min(*x1), x0.max(*x1));
                let (bottom, top) = (y0.min(*y1), y0.max(*y1));
                (left, top, right - left, top - bottom)
            }
            // Letter size
            _ => (0.0, 792.0, 612.0, 792.0),
        }
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        let stream_bytes = |id: ObjectId| -> Option<Vec<u8>> {
            match self.doc.get_object(id) {
                Ok(Object::Stream(s)) => Some(if s.dict.get(b"Filter").is_ok() {
                    s.decompressed_content().unwrap_or_else(|_| s.content.clone())
                } else {
                    s.content.clone()
                }),
                _ => None,
            }
        };

        match contents {
            Object::Reference(r) => stream_bytes(*r)
                .ok_or_else(|| Error::PdfParse("Invalid content stream".to_string())),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for id in arr.iter().filter_map(|o| o.as_reference().ok()) {
                    if let Some(data) = stream_bytes(id) {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Image XObjects of a page by resource name.
    fn page_images(&self, page_id: ObjectId) -> HashMap<Vec<u8>, Option<ImageData>> {
        let mut images = HashMap::new();
        let xobjects = self
            .inherited(page_id, b"Resources")
            .and_then(|res| self.resolve_dict(res))
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|x| self.resolve_dict(x));

        let Some(xobjects) = xobjects else {
            return images;
        };

        for (name, obj) in xobjects.iter() {
            let Ok(id) = obj.as_reference() else { continue };
            let Ok(Object::Stream(stream)) = self.doc.get_object(id) else {
                continue;
            };
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|s| s == b"Image")
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            let format = match last_filter(&stream.dict).as_deref() {
                Some(b"DCTDecode") => Some(ImageFormat::Jpeg),
                Some(b"JPXDecode") => Some(ImageFormat::Jpeg2000),
                _ => None,
            };
            let data = format.map(|format| ImageData {
                bytes: stream.content.clone(),
                format,
            });
            images.insert(name.clone(), data);
        }
        images
    }
}

impl LayoutSource for PdfLayoutSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_layout(&self, page_number: u32) -> Result<PageLayout> {
        let page_id = self.page_id(page_number)?;
        let (left, top, width, height) = self.media_box(page_id);

        let fonts = self.doc.get_page_fonts(page_id)?;
        let images = self.page_images(page_id);
        let content = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content)?;

        let mut walker = ContentWalker {
            source: self,
            fonts: &fonts,
            images: &images,
            origin: (left, top),
            gs: GraphicsState::default(),
            stack: Vec::new(),
            text: TextState::default(),
            spans: Vec::new(),
            placed: Vec::new(),
        };
        for op in &content.operations {
            walker.apply(&op.operator, &op.operands);
        }

        let ContentWalker { spans, placed, .. } = walker;
        log::debug!(
            "Page {}: {} span(s), {} image(s)",
            page_number,
            spans.len(),
            placed.len()
        );

        let mut layout = PageLayout::new(page_number, width, height);
        let lines = group_spans_into_lines(spans);
        if !lines.is_empty() {
            layout.push_text(lines);
        }
        for (bbox, data) in placed {
            layout.push_image(bbox, data);
        }
        Ok(layout)
    }
}

/// Last entry of a stream's `/Filter` (a name or an array of names).
fn last_filter(dict: &Dictionary) -> Option<Vec<u8>> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.clone()),
        Object::Array(arr) => arr.last().and_then(|o| o.as_name().ok()).map(|n| n.to_vec()),
        _ => None,
    }
}

/// A 2D affine transform `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Self {
            a: get_number(&operands[0])?,
            b: get_number(&operands[1])?,
            c: get_number(&operands[2])?,
            d: get_number(&operands[3])?,
            e: get_number(&operands[4])?,
            f: get_number(&operands[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GraphicsState {
    ctm: Matrix,
}

/// Text object state: the text matrix, the line matrix and the font.
#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix,
    line: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            line: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            in_text: false,
        }
    }
}

impl TextState {
    fn begin(&mut self) {
        self.matrix = Matrix::IDENTITY;
        self.line = Matrix::IDENTITY;
        self.in_text = true;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line = Matrix::translation(tx, ty).then(&self.line);
        self.matrix = self.line;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.matrix = m;
        self.line = m;
    }

    fn advance(&mut self, tx: f32) {
        self.matrix = Matrix::translation(tx, 0.0).then(&self.matrix);
    }
}

struct ContentWalker<'a> {
    source: &'a PdfLayoutSource,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    images: &'a HashMap<Vec<u8>, Option<ImageData>>,
    /// Media box (left, top) in user space
    origin: (f32, f32),
    gs: GraphicsState,
    stack: Vec<GraphicsState>,
    text: TextState,
    spans: Vec<PlacedSpan>,
    placed: Vec<(BBox, Option<ImageData>)>,
}

/// A span plus its baseline in page coordinates.
#[derive(Debug, Clone)]
struct PlacedSpan {
    span: Span,
    baseline: f32,
}

impl ContentWalker<'_> {
    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.stack.push(self.gs),
            "Q" => {
                if let Some(gs) = self.stack.pop() {
                    self.gs = gs;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.gs.ctm = m.then(&self.gs.ctm);
                }
            }
            "BT" => self.text.begin(),
            "ET" => self.text.in_text = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(name) = &operands[0] {
                        self.text.font = name.clone();
                    }
                    self.text.font_size = get_number(&operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    self.text.leading = leading;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if operator == "TD" {
                        self.text.leading = -ty;
                    }
                    self.text.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text.set_matrix(m);
                }
            }
            "T*" => self.text.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            "'" | "\"" => {
                self.text.next_line();
                let idx = if operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(idx) {
                    let text = self.decode(bytes);
                    self.show(text, 0.0);
                }
            }
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.place_image(name);
                }
            }
            _ => {}
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(&self.text.font)
            .and_then(|f| f.get_font_encoding(&self.source.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    /// `TJ`: strings interleaved with kerning; large negative kerns are word breaks.
    fn show_array(&mut self, items: &[Object]) {
        let mut combined = String::new();
        let mut kerning = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(bytes)),
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    kerning += adjustment / 1000.0 * self.text.font_size;
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        self.show(combined, kerning);
    }

    /// Emit a span at the current text position and advance past it.
    fn show(&mut self, text: String, extra_advance: f32) {
        if !self.text.in_text {
            return;
        }
        let width = text.chars().count() as f32 * self.text.font_size * AVG_CHAR_WIDTH;
        let device = self.text.matrix.then(&self.gs.ctm);
        self.text.advance(width + extra_advance);

        if text.trim().is_empty() {
            return;
        }

        let (x, y) = device.apply(0.0, 0.0);
        let size = self.text.font_size * device.vertical_scale();
        let x0 = x - self.origin.0;
        let baseline = self.origin.1 - y;
        let bbox = BBox::new(
            x0,
            baseline - size * 0.8,
            x0 + width * device.horizontal_scale(),
            baseline + size * 0.2,
        );
        self.spans.push(PlacedSpan {
            span: Span::new(text, size, bbox),
            baseline,
        });
    }

    /// `Do` on an image XObject: the image fills the unit square under the CTM.
    fn place_image(&mut self, name: &[u8]) {
        let Some(data) = self.images.get(name) else {
            return;
        };
        let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
            .map(|(u, v)| self.gs.ctm.apply(u, v));
        let xs = corners.map(|(x, _)| x - self.origin.0);
        let ys = corners.map(|(_, y)| self.origin.1 - y);
        let bbox = BBox::new(
            xs.iter().copied().fold(f32::INFINITY, f32::min),
            ys.iter().copied().fold(f32::INFINITY, f32::min),
            xs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            ys.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        );
        self.placed.push((bbox, data.clone()));
    }
}

/// Group spans sharing a baseline into lines, top to bottom.
///
/// Spans within 30% of the font size of the line's first baseline join it.
/// A space is prefixed to a span when the horizontal gap to its
/// predecessor suggests a word break.
fn group_spans_into_lines(mut spans: Vec<PlacedSpan>) -> Vec<Line> {
    spans.sort_by(|a, b| {
        a.baseline
            .partial_cmp(&b.baseline)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.span
                    .bbox
                    .x0
                    .partial_cmp(&b.span.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_y: Option<f32> = None;

    for placed in spans {
        let tolerance = placed.span.size * 0.3;
        match current_y {
            Some(y) if (placed.baseline - y).abs() <= tolerance => {}
            _ => {
                if !current.is_empty() {
                    lines.push(finish_line(std::mem::take(&mut current)));
                }
                current_y = Some(placed.baseline);
            }
        }
        current.push(placed.span);
    }
    if !current.is_empty() {
        lines.push(finish_line(current));
    }
    lines
}

fn finish_line(mut spans: Vec<Span>) -> Line {
    spans.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for i in 1..spans.len() {
        let (before, after) = spans.split_at_mut(i);
        let prev = &before[i - 1];
        let span = &mut after[0];

        let gap = span.bbox.x0 - prev.bbox.x1;
        let chars = span.text.chars().count();
        let avg_char_width = if chars > 0 && span.bbox.x1 > span.bbox.x0 {
            (span.bbox.x1 - span.bbox.x0) / chars as f32
        } else {
            span.size * AVG_CHAR_WIDTH
        };

        let both_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char)
            && span.text.chars().next().is_some_and(is_spaceless_script_char);
        let already_spaced = prev.text.ends_with([' ', '\u{00A0}'])
            || span.text.starts_with([' ', '\u{00A0}']);

        if gap > avg_char_width * 0.2 && !both_spaceless && !already_spaced {
            span.text.insert(0, ' ');
        }
    }
    Line::new(spans)
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without spaces between words (Han, Hiragana, Katakana).
/// Hangul is not included: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Decoding used when a font has no usable encoding: UTF-16BE with BOM,
/// then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutBlock;
    use lopdf::{dictionary, Stream};

    /// One Letter page with a Helvetica font and an optional JPEG image.
    fn build_pdf(content: &[u8]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let image_id = doc.add_object(Object::Stream(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2i64,
                "Height" => 2i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            vec![0xFF, 0xD8, 0xFF, 0xD9],
        )));
        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            content.to_vec(),
        )));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => Object::Dictionary(dictionary! {
                "Font" => Object::Dictionary(dictionary! { "F1" => font_id }),
                "XObject" => Object::Dictionary(dictionary! { "Im0" => image_id }),
            }),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1i64,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn text_lines(layout: &PageLayout) -> Vec<String> {
        layout
            .blocks
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::Text { lines } => Some(lines),
                _ => None,
            })
            .flatten()
            .map(|l| l.spans.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect()
    }

    #[test]
    fn test_text_spans_are_flipped_and_sized() {
        let pdf = build_pdf(
            b"BT /F1 18 Tf 72 720 Td (Title) Tj ET \
              BT /F1 10 Tf 72 690 Td (Body text) Tj 0 -12 Td (more body) Tj ET",
        );
        let source = PdfLayoutSource::from_bytes(&pdf).unwrap();
        assert_eq!(source.page_count(), 1);

        let layout = source.page_layout(1).unwrap();
        assert_eq!(layout.width, 612.0);
        assert_eq!(layout.height, 792.0);
        assert_eq!(text_lines(&layout), vec!["Title", "Body text", "more body"]);

        let spans: Vec<&Span> = layout.spans().collect();
        assert_eq!(spans[0].size, 18.0);
        assert!((spans[0].bbox.y1 - (792.0 - 720.0 + 18.0 * 0.2)).abs() < 1e-3);
        assert!(spans[0].bbox.top() < spans[1].bbox.top());
        assert!(spans[1].bbox.top() < spans[2].bbox.top());
    }

    #[test]
    fn test_spans_on_one_baseline_form_a_line() {
        let pdf = build_pdf(b"BT /F1 12 Tf 72 700 Td (1) Tj 30 0 Td (Introduction) Tj ET");
        let layout = PdfLayoutSource::from_bytes(&pdf)
            .unwrap()
            .page_layout(1)
            .unwrap();
        assert_eq!(text_lines(&layout), vec!["1 Introduction"]);
    }

    #[test]
    fn test_tj_kerning_inserts_spaces() {
        let pdf = build_pdf(b"BT /F1 12 Tf 72 700 Td [(Hello) -300 (World)] TJ ET");
        let layout = PdfLayoutSource::from_bytes(&pdf)
            .unwrap()
            .page_layout(1)
            .unwrap();
        assert_eq!(text_lines(&layout), vec!["Hello World"]);
    }

    #[test]
    fn test_image_placement_under_ctm() {
        let pdf = build_pdf(b"q 200 0 0 150 100 300 cm /Im0 Do Q");
        let layout = PdfLayoutSource::from_bytes(&pdf)
            .unwrap()
            .page_layout(1)
            .unwrap();

        assert_eq!(layout.blocks.len(), 1);
        match &layout.blocks[0] {
            LayoutBlock::Image { bbox, data } => {
                assert_eq!(*bbox, BBox::new(100.0, 342.0, 300.0, 492.0));
                assert_eq!(data.as_ref().unwrap().format, ImageFormat::Jpeg);
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_page_out_of_range() {
        let pdf = build_pdf(b"");
        let source = PdfLayoutSource::from_bytes(&pdf).unwrap();
        assert!(matches!(
            source.page_layout(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
        assert!(source.page_layout(1).unwrap().blocks.is_empty());
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(matches!(
            PdfLayoutSource::from_bytes(b"PK\x03\x04 not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_matrix_composition() {
        let scale = Matrix {
            a: 2.0,
            d: 2.0,
            ..Matrix::IDENTITY
        };
        let moved = Matrix::translation(10.0, 20.0).then(&scale);
        assert_eq!(moved.apply(1.0, 1.0), (22.0, 42.0));
        assert_eq!(moved.vertical_scale(), 2.0);
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"abc"), "abc");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0xE9]), "\u{e9}");
    }
}
