use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::fonts::encode_winansi;
use super::{ReportError, LETTER};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    fn resource_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

/// An embedded raster image and its pixel size.
#[derive(Debug, Clone, Copy)]
pub struct ImageHandle {
    id: ObjectId,
    pub width: f32,
    pub height: f32,
}

/// The first page of another PDF, embedded as a form XObject.
#[derive(Debug, Clone, Copy)]
pub struct FormHandle {
    id: ObjectId,
    bbox: [f32; 4],
}

impl FormHandle {
    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Drawing operations for one page.
#[derive(Debug, Default)]
pub struct Canvas {
    operations: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn xobject_name(&mut self, id: ObjectId) -> String {
        if let Some((name, _)) = self.xobjects.iter().find(|(_, existing)| *existing == id) {
            return name.clone();
        }
        let name = format!("X{}", self.xobjects.len() + 1);
        self.xobjects.push((name.clone(), id));
        name
    }

    pub fn text(&mut self, face: FontFace, size: f32, color: Rgb, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(face.resource_name().into()), real(size)]),
            Operation::new("rg", vec![real(color.0), real(color.1), real(color.2)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_winansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    /// 1pt black outline.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(1.0)]),
            Operation::new("RG", vec![real(0.0), real(0.0), real(0.0)]),
            Operation::new("re", vec![real(x), real(y), real(width), real(height)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32, width: f32, height: f32) {
        let name = self.xobject_name(image.id);
        self.paint(name, [width, 0.0, 0.0, height, x, y]);
    }

    /// Draw an embedded page uniformly scaled with its lower-left corner at (x, y).
    pub fn draw_form(&mut self, form: &FormHandle, x: f32, y: f32, scale: f32) {
        let name = self.xobject_name(form.id);
        let tx = x - form.bbox[0] * scale;
        let ty = y - form.bbox[1] * scale;
        self.paint(name, [scale, 0.0, 0.0, scale, tx, ty]);
    }

    fn paint(&mut self, name: String, matrix: [f32; 6]) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("cm", matrix.iter().map(|v| real(*v)).collect()),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }
}

/// Incremental PDF builder over `lopdf`.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    fonts_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(standard_font("Helvetica"));
        let bold = doc.add_object(standard_font("Helvetica-Bold"));
        let fonts_id = doc.add_object(dictionary! {
            "F1" => regular,
            "F2" => bold,
        });

        Self {
            doc,
            pages_id,
            fonts_id,
            kids: Vec::new(),
        }
    }

    /// Decode a PNG/JPEG and embed it as RGB with an optional alpha mask.
    pub fn add_image(&mut self, bytes: &[u8]) -> Result<ImageHandle, ReportError> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        let smask = if decoded.color().has_alpha() {
            let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
            Some(self.doc.add_object(image_stream(width, height, "DeviceGray", &alpha, None)?))
        } else {
            None
        };

        let rgb = decoded.to_rgb8().into_raw();
        let id = self
            .doc
            .add_object(image_stream(width, height, "DeviceRGB", &rgb, smask)?);

        Ok(ImageHandle {
            id,
            width: width as f32,
            height: height as f32,
        })
    }

    /// Copy the first page of `bytes` into this document as a form XObject.
    pub fn embed_pdf_page(&mut self, bytes: &[u8]) -> Result<FormHandle, ReportError> {
        let mut source = Document::load_mem(bytes)?;
        source.renumber_objects_with(self.doc.max_id + 1);

        let page_id = *source
            .get_pages()
            .values()
            .next()
            .ok_or(ReportError::EmptyAttachment)?;
        let content = source.get_page_content(page_id)?;
        let resources = inherited(&source, page_id, b"Resources")
            .cloned()
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));
        let bbox = inherited(&source, page_id, b"MediaBox")
            .and_then(|media_box| rectangle(&source, media_box))
            .unwrap_or([0.0, 0.0, LETTER.0, LETTER.1]);

        self.doc.max_id = self.doc.max_id.max(source.max_id);
        self.doc.objects.extend(source.objects);

        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => bbox.iter().map(|v| real(*v)).collect::<Vec<Object>>(),
                "Resources" => resources,
            },
            content,
        );
        let id = self.doc.add_object(form);
        Ok(FormHandle { id, bbox })
    }

    pub fn add_page(&mut self, width: f32, height: f32, canvas: Canvas) -> Result<(), ReportError> {
        let content = Content {
            operations: canvas.operations,
        }
        .encode()?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut xobjects = Dictionary::new();
        for (name, id) in canvas.xobjects {
            xobjects.set(name, Object::Reference(id));
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(width), real(height)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => self.fonts_id,
                "XObject" => xobjects,
            },
        });
        self.kids.push(Object::Reference(page_id));
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    pub fn finish(mut self) -> Result<Vec<u8>, ReportError> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.prune_objects();
        self.doc.compress();

        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn standard_font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn image_stream(
    width: u32,
    height: u32,
    color_space: &str,
    samples: &[u8],
    smask: Option<ObjectId>,
) -> Result<Stream, ReportError> {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };
    if let Some(mask) = smask {
        dict.set("SMask", mask);
    }
    Ok(Stream::new(dict, deflate(samples)?).with_compression(false))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Page attribute, looked up through the page tree when not set on the page.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..32 {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn rectangle(doc: &Document, object: &Object) -> Option<[f32; 4]> {
    let object = match object {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let values: Vec<f32> = object
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| v.as_float().ok())
        .collect();
    match values.as_slice() {
        [x0, y0, x1, y1] => Some([*x0, *y0, *x1, *y1]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_pdf(width: f32, height: f32) -> Vec<u8> {
        let mut writer = PdfWriter::new();
        let mut canvas = Canvas::new();
        canvas.text(FontFace::Bold, 12.0, Rgb::BLACK, 10.0, 10.0, "Recibo N° 12");
        writer.add_page(width, height, canvas).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn writes_loadable_document() {
        let bytes = blank_pdf(300.0, 400.0);
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("/F2"));
        assert!(text.contains("Tj"));
    }

    #[test]
    fn embeds_foreign_page_with_its_media_box() {
        let receipt = blank_pdf(300.0, 400.0);
        let mut writer = PdfWriter::new();
        let form = writer.embed_pdf_page(&receipt).unwrap();
        assert_eq!(form.width(), 300.0);
        assert_eq!(form.height(), 400.0);

        let mut canvas = Canvas::new();
        canvas.draw_form(&form, 0.0, 0.0, 0.5);
        writer.add_page(612.0, 792.0, canvas).unwrap();
        assert_eq!(writer.page_count(), 1);

        let doc = Document::load_mem(&writer.finish().unwrap()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn garbage_pdf_is_rejected() {
        let mut writer = PdfWriter::new();
        assert!(writer.embed_pdf_page(b"%PDF-1.4 nonsense").is_err());
    }

    #[test]
    fn xobject_names_are_reused_per_canvas() {
        let mut canvas = Canvas::new();
        let a = canvas.xobject_name((7, 0));
        let b = canvas.xobject_name((8, 0));
        assert_eq!(canvas.xobject_name((7, 0)), a);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_text_emits_nothing() {
        let mut canvas = Canvas::new();
        canvas.text(FontFace::Regular, 10.0, Rgb::BLACK, 0.0, 0.0, "");
        assert!(canvas.operations.is_empty());
    }
}
