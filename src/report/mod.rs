// Liquidation report rendering
//
// A report is a header block (logo, title, code, case, total), a boxed table
// that flows over as many pages as it needs, a footer on every table page, a
// signature block on the last one, and one trailing page per receipt.

pub mod code;
pub mod document;
pub mod fonts;
pub mod format;
pub mod layout;

use document::{Canvas, FontFace, PdfWriter, Rgb};
use layout::{CELL_PADDING, FONT_SIZE, ROW_HEIGHT, TABLE_LEFT};

/// Colour of field labels in the header block.
pub const LABEL_COLOR: Rgb = Rgb(0.737, 0.549, 0.361);
pub const FOOTER_FONT_SIZE: f32 = 8.0;
pub const LETTER: (f32, f32) = (612.0, 792.0);
pub const WIDE: (f32, f32) = (1028.0, 650.0);

const LOGO_SCALE: f32 = 0.15;
const RECEIPT_IMAGE_SCALE: f32 = 0.3;
const RECEIPT_PDF_SHRINK: f32 = 1.1;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attached document has no pages")]
    EmptyAttachment,
}

/// Cell source of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Description,
    Details,
    User,
    Start,
    End,
    HoursWorked,
    HoursBilled,
    HourlyRate,
    Value,
    Client,
    Case,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub field: Field,
    pub width: f32,
}

const fn col(label: &'static str, field: Field, width: f32) -> Column {
    Column { label, field, width }
}

const BILLABLE_INTERNAL: [Column; 9] = [
    col("Fecha", Field::Date, 65.0),
    col("Descripción", Field::Description, 140.0),
    col("Usuario", Field::User, 140.0),
    col("Hora de inicio", Field::Start, 90.0),
    col("Hora de termino", Field::End, 90.0),
    col("Horas trabajadas", Field::HoursWorked, 90.0),
    col("Horas facturables", Field::HoursBilled, 90.0),
    col("Tarifa por hora", Field::HourlyRate, 90.0),
    col("Valor trabajo", Field::Value, 90.0),
];

const BILLABLE_CLIENT: [Column; 5] = [
    col("Fecha", Field::Date, 100.0),
    col("Descripción", Field::Description, 140.0),
    col("Nombre", Field::User, 100.0),
    col("Duración", Field::HoursBilled, 100.0),
    col("Valor", Field::Value, 90.0),
];

const PETTY_CASH_INTERNAL: [Column; 7] = [
    col("Fecha", Field::Date, 90.0),
    col("Descripción", Field::Description, 140.0),
    col("Detalles", Field::Details, 260.0),
    col("Usuario", Field::User, 120.0),
    col("Valor", Field::Value, 90.0),
    col("Cliente", Field::Client, 120.0),
    col("Caso", Field::Case, 120.0),
];

const PETTY_CASH_CLIENT: [Column; 5] = [
    col("Fecha", Field::Date, 80.0),
    col("Descripción", Field::Description, 100.0),
    col("Detalles", Field::Details, 150.0),
    col("Usuario", Field::User, 120.0),
    col("Valor", Field::Value, 90.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Billable hours, firm copy.
    BillableInternal,
    /// Billable hours, summary handed to the client.
    BillableClient,
    PettyCashInternal,
    PettyCashClient,
}

impl ReportKind {
    pub fn page_size(self) -> (f32, f32) {
        match self {
            ReportKind::BillableInternal | ReportKind::PettyCashInternal => WIDE,
            ReportKind::BillableClient | ReportKind::PettyCashClient => LETTER,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::BillableInternal | ReportKind::BillableClient => {
                "LIQUIDACIÓN DE HORAS FACTURABLES"
            }
            ReportKind::PettyCashInternal | ReportKind::PettyCashClient => "LIQUIDACIÓN DE CAJA CHICA",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            ReportKind::BillableInternal => &BILLABLE_INTERNAL,
            ReportKind::BillableClient => &BILLABLE_CLIENT,
            ReportKind::PettyCashInternal => &PETTY_CASH_INTERNAL,
            ReportKind::PettyCashClient => &PETTY_CASH_CLIENT,
        }
    }

    /// Left edge of each column.
    pub fn column_offsets(self) -> Vec<f32> {
        self.columns()
            .iter()
            .scan(TABLE_LEFT, |x, column| {
                let left = *x;
                *x += column.width;
                Some(left)
            })
            .collect()
    }
}

/// One table row, already formatted for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    pub date: String,
    pub description: String,
    pub details: String,
    pub user: String,
    pub start: String,
    pub end: String,
    pub hours_worked: String,
    pub hours_billed: String,
    pub hourly_rate: String,
    pub value: String,
    pub client: String,
    pub case: String,
}

impl ReportRow {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Description => &self.description,
            Field::Details => &self.details,
            Field::User => &self.user,
            Field::Start => &self.start,
            Field::End => &self.end,
            Field::HoursWorked => &self.hours_worked,
            Field::HoursBilled => &self.hours_billed,
            Field::HourlyRate => &self.hourly_rate,
            Field::Value => &self.value,
            Field::Client => &self.client,
            Field::Case => &self.case,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Pdf,
    Png,
    Jpeg,
}

impl AttachmentKind {
    /// Receipt types accepted as attachments, case-insensitive.
    pub fn from_file_type(file_type: &str) -> Option<Self> {
        match file_type.to_ascii_lowercase().as_str() {
            "pdf" => Some(AttachmentKind::Pdf),
            "png" => Some(AttachmentKind::Png),
            "jpg" | "jpeg" => Some(AttachmentKind::Jpeg),
            _ => None,
        }
    }
}

/// A receipt appended after the table.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub code: String,
    pub case_name: Option<String>,
    pub total: f64,
    pub rows: Vec<ReportRow>,
    /// PNG or JPEG logo drawn top-left on the first page.
    pub logo: Option<Vec<u8>>,
    pub attachments: Vec<Attachment>,
    pub footer_lines: Vec<String>,
    pub signature_lines: Vec<String>,
}

/// Render a report into PDF bytes.
pub fn render(report: &Report) -> Result<Vec<u8>, ReportError> {
    let kind = report.kind;
    let (width, height) = kind.page_size();
    let table = layout::layout_table(kind, &report.rows);
    let mut pdf = PdfWriter::new();

    let mut pages: Vec<Canvas> = (0..table.page_count).map(|_| Canvas::new()).collect();

    if let Some(first) = pages.first_mut() {
        if let Some(bytes) = &report.logo {
            let logo = pdf.add_image(bytes)?;
            let (w, h) = (logo.width * LOGO_SCALE, logo.height * LOGO_SCALE);
            first.draw_image(&logo, TABLE_LEFT, height - h - 20.0, w, h);
        }
        draw_header_block(first, report, height);
        draw_column_headers(first, kind, table.header_top);
    }

    let offsets = kind.column_offsets();
    for row in &table.rows {
        let canvas = &mut pages[row.page];
        for ((column, left), lines) in kind.columns().iter().zip(&offsets).zip(&row.cells) {
            canvas.stroke_rect(*left, row.top - row.height, column.width, row.height);
            for (i, line) in lines.iter().enumerate() {
                canvas.text(
                    FontFace::Regular,
                    FONT_SIZE,
                    Rgb::BLACK,
                    left + CELL_PADDING,
                    row.top - i as f32 * ROW_HEIGHT - 15.0,
                    line,
                );
            }
        }
    }

    let last = pages.len().saturating_sub(1);
    for (index, canvas) in pages.iter_mut().enumerate() {
        if index == last {
            draw_signature(canvas, &report.signature_lines);
        }
        draw_footer(canvas, &report.footer_lines, width);
    }

    for canvas in pages {
        pdf.add_page(width, height, canvas)?;
    }

    for attachment in &report.attachments {
        let (pw, ph) = LETTER;
        let mut canvas = Canvas::new();
        match attachment.kind {
            AttachmentKind::Pdf => {
                let form = pdf.embed_pdf_page(&attachment.bytes)?;
                let scale = (pw / RECEIPT_PDF_SHRINK) / form.width();
                canvas.draw_form(&form, 0.0, 0.0, scale);
            }
            AttachmentKind::Png | AttachmentKind::Jpeg => {
                let image = pdf.add_image(&attachment.bytes)?;
                let (w, h) = (image.width * RECEIPT_IMAGE_SCALE, image.height * RECEIPT_IMAGE_SCALE);
                canvas.draw_image(&image, pw / 2.0 - w / 2.0, ph / 2.0 - h + 250.0, w, h);
            }
        }
        pdf.add_page(pw, ph, canvas)?;
    }

    pdf.finish()
}

fn draw_header_block(canvas: &mut Canvas, report: &Report, height: f32) {
    let label = |canvas: &mut Canvas, x: f32, y: f32, text: &str| {
        canvas.text(FontFace::Regular, FONT_SIZE, LABEL_COLOR, x, y, text)
    };
    let value = |canvas: &mut Canvas, x: f32, y: f32, text: &str| {
        canvas.text(FontFace::Regular, FONT_SIZE, Rgb::BLACK, x, y, text)
    };

    label(canvas, TABLE_LEFT, height - 130.0, report.kind.title());

    label(canvas, TABLE_LEFT, height - 160.0, "CÓDIGO:");
    value(canvas, TABLE_LEFT, height - 180.0, &report.code);

    if let Some(case_name) = report.case_name.as_deref().filter(|c| !c.is_empty()) {
        label(canvas, 235.0, height - 160.0, "CASO:");
        value(canvas, 235.0, height - 180.0, case_name);
    }

    label(canvas, TABLE_LEFT, height - 200.0, "VALOR TOTAL DE LIQUIDACIÓN:");
    value(canvas, TABLE_LEFT, height - 220.0, &format::format_money(report.total));
}

fn draw_column_headers(canvas: &mut Canvas, kind: ReportKind, top: f32) {
    for (column, left) in kind.columns().iter().zip(kind.column_offsets()) {
        canvas.stroke_rect(left, top - ROW_HEIGHT, column.width, ROW_HEIGHT);
        canvas.text(
            FontFace::Regular,
            FONT_SIZE,
            Rgb::BLACK,
            left + CELL_PADDING,
            top - FONT_SIZE - 2.0,
            column.label,
        );
    }
}

/// Centred lines from y=50 downwards.
fn draw_footer(canvas: &mut Canvas, lines: &[String], page_width: f32) {
    let mut y = 50.0;
    for line in lines {
        let line = line.trim();
        let x = (page_width - fonts::text_width(line, FOOTER_FONT_SIZE)) / 2.0;
        canvas.text(FontFace::Regular, FOOTER_FONT_SIZE, Rgb::BLACK, x, y, line);
        y -= FOOTER_FONT_SIZE + 2.0;
    }
}

fn draw_signature(canvas: &mut Canvas, lines: &[String]) {
    let size = FOOTER_FONT_SIZE + 2.0;
    let mut y = 85.0;
    for line in lines {
        canvas.text(FontFace::Bold, size, Rgb::BLACK, TABLE_LEFT, y, line.trim());
        y -= size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(description: &str) -> ReportRow {
        ReportRow {
            date: "01/05/2024".to_string(),
            description: description.to_string(),
            user: "Ana Pérez".to_string(),
            value: "$10.00".to_string(),
            ..Default::default()
        }
    }

    fn report(kind: ReportKind, rows: Vec<ReportRow>) -> Report {
        Report {
            kind,
            code: "RFL-0999-05-2024-001".to_string(),
            case_name: Some("Caso Pérez".to_string()),
            total: 10.0,
            rows,
            logo: None,
            attachments: Vec::new(),
            footer_lines: vec!["Samborondón – Ecuador".to_string()],
            signature_lines: vec!["Ab. Responsable".to_string()],
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 128]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn column_widths_per_kind() {
        let widths = |kind: ReportKind| kind.columns().iter().map(|c| c.width).sum::<f32>();
        assert_eq!(widths(ReportKind::BillableInternal), 885.0);
        assert_eq!(widths(ReportKind::BillableClient), 530.0);
        assert_eq!(widths(ReportKind::PettyCashInternal), 940.0);
        assert_eq!(widths(ReportKind::PettyCashClient), 540.0);
        assert_eq!(ReportKind::PettyCashClient.column_offsets(), vec![35.0, 115.0, 215.0, 365.0, 485.0]);
    }

    #[test]
    fn page_sizes() {
        assert_eq!(ReportKind::BillableInternal.page_size(), (1028.0, 650.0));
        assert_eq!(ReportKind::PettyCashClient.page_size(), (612.0, 792.0));
    }

    #[test]
    fn attachment_kinds() {
        assert_eq!(AttachmentKind::from_file_type("PDF"), Some(AttachmentKind::Pdf));
        assert_eq!(AttachmentKind::from_file_type("jpeg"), Some(AttachmentKind::Jpeg));
        assert_eq!(AttachmentKind::from_file_type("JPG"), Some(AttachmentKind::Jpeg));
        assert_eq!(AttachmentKind::from_file_type("docx"), None);
    }

    #[test]
    fn renders_single_page_report() {
        let bytes = render(&report(ReportKind::BillableClient, vec![row("Audiencia")])).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_tables_flow_onto_more_pages() {
        let rows = (0..60).map(|i| row(&format!("Registro {}", i))).collect();
        let bytes = render(&report(ReportKind::BillableClient, rows)).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn logo_and_receipts_are_embedded() {
        let mut petty = report(ReportKind::PettyCashClient, vec![row("Copias")]);
        petty.logo = Some(png(40, 20));
        petty.attachments = vec![Attachment {
            kind: AttachmentKind::Png,
            bytes: png(10, 10),
        }];

        let receipt = render(&report(ReportKind::BillableClient, vec![row("Recibo")])).unwrap();
        petty.attachments.push(Attachment {
            kind: AttachmentKind::Pdf,
            bytes: receipt,
        });

        let bytes = render(&petty).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn broken_receipt_is_an_error() {
        let mut petty = report(ReportKind::PettyCashInternal, vec![row("Copias")]);
        petty.attachments = vec![Attachment {
            kind: AttachmentKind::Jpeg,
            bytes: b"not an image".to_vec(),
        }];
        assert!(matches!(render(&petty), Err(ReportError::Image(_))));
    }
}
