//! Printable estimate snapshot for a booking.
//!
//! The document is laid out as titled sections of label/value rows and
//! rendered with the PDF base-14 Helvetica fonts, so all text is reduced to
//! ASCII before it is written.

use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use shared_types::EstimateSnapshot;
use thiserror::Error;

use crate::schedule::{canonical_date, slot_start_iso};
use crate::summary::format_thousands;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 48;
const VALUE_COLUMN: i64 = 180;

const BODY_SIZE: i64 = 10;
const SECTION_SIZE: i64 = 12;
const TITLE_SIZE: i64 = 18;
const LEADING: i64 = 14;

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Error, Debug)]
pub enum QuotePdfError {
    #[error("failed to encode page content: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("failed to write document: {0}")]
    Write(#[from] std::io::Error),
}

/// Booking details printed on the quote, borrowed from a request or a stored booking
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteBooking<'a> {
    pub date_iso: &'a str,
    pub time_slot: &'a str,
    pub appointment_type: &'a str,
    pub contact_name: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub location_label: &'a str,
    pub location_note: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSection {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl QuoteSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, label: &str, value: impl Into<String>) {
        self.rows.push((label.to_string(), value.into()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDocument {
    pub generated_at: String,
    pub sections: Vec<QuoteSection>,
    pub footer: Vec<String>,
}

fn or_not_specified(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_SPECIFIED)
        .to_string()
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", format_thousands(v)),
        None => "-".to_string(),
    }
}

fn appointment_when(date_iso: &str, time_slot: &str) -> String {
    match canonical_date(date_iso) {
        Some(day) => format!("{} ({})", day.format("%b %d, %Y"), time_slot.trim()),
        None => slot_start_iso(date_iso, Some(time_slot)),
    }
}

impl QuoteDocument {
    pub fn for_booking(
        booking: &QuoteBooking<'_>,
        estimate: Option<&EstimateSnapshot>,
        generated_at: NaiveDateTime,
    ) -> Self {
        let mut details = QuoteSection::new("Booking Details");
        details.row("Appointment", appointment_when(booking.date_iso, booking.time_slot));
        details.row("Format", or_not_specified(Some(booking.appointment_type)));
        details.row("Contact name", or_not_specified(booking.contact_name));
        details.row("Contact email", or_not_specified(booking.contact_email));
        details.row("Contact phone", or_not_specified(booking.contact_phone));
        details.row("Location type", or_not_specified(Some(booking.location_label)));
        if let Some(note) = booking.location_note.map(str::trim).filter(|n| !n.is_empty()) {
            details.row("Location notes", note);
        }

        let mut overview = QuoteSection::new("Estimate Overview");
        let text = |pick: fn(&EstimateSnapshot) -> Option<&String>| {
            or_not_specified(estimate.and_then(pick).map(String::as_str))
        };
        overview.row("Project type", text(|e| e.project_type.as_ref()));
        overview.row(
            "Square footage",
            estimate
                .and_then(|e| e.square_footage)
                .filter(|v| *v > 0.0)
                .map(|v| format!("{} sq ft", format_thousands(v)))
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        );
        overview.row("Coverage profile", text(|e| e.coverage_profile.as_ref()));
        overview.row("Wi-Fi layout", text(|e| e.wifi_layout.as_ref()));
        overview.row("Doors / access", text(|e| e.doors_access.as_ref()));
        overview.row("Wiring style", text(|e| e.wiring_style.as_ref()));
        overview.row("Rack location", text(|e| e.rack_location.as_ref()));
        overview.row("Timeline", text(|e| e.timeline.as_ref()));

        let range = match estimate {
            Some(e) if e.rough_low.is_some() || e.rough_high.is_some() => {
                format!("{} - {}", money(e.rough_low), money(e.rough_high))
            }
            _ => "TBD after walkthrough".to_string(),
        };
        overview.row("Rough range", range);

        let mut scope = QuoteSection::new("Focus & Extras");
        let focus = estimate.map(|e| e.focus.join(", ")).unwrap_or_default();
        let extras = estimate.map(|e| e.extras.join(", ")).unwrap_or_default();
        scope.row(
            "Focus areas",
            if focus.is_empty() { NOT_SPECIFIED.to_string() } else { focus },
        );
        scope.row(
            "Extras",
            if extras.is_empty() { "None selected".to_string() } else { extras },
        );

        let mut sections = vec![details, overview, scope];

        if let Some(notes) = estimate
            .and_then(|e| e.notes.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            let mut special = QuoteSection::new("Special Notes");
            special.row("From your intake", notes);
            sections.push(special);
        }

        Self {
            generated_at: generated_at.format("%b %d, %Y %H:%M").to_string(),
            sections,
            footer: vec![
                "This PDF is a planning snapshot based on your SmartNET walkthrough request.".to_string(),
                "Estimates are preliminary and may change after the walkthrough based on site \
                 conditions and equipment requirements. We collect contact and project details \
                 only to provide estimates, schedule walkthroughs, and communicate regarding \
                 your request. We do not sell your data."
                    .to_string(),
                "smartnetinstallation.com".to_string(),
            ],
        }
    }

    /// `SmartNET-Estimate-2025-12-15.pdf`
    pub fn file_name(date_iso: &str) -> String {
        match canonical_date(date_iso) {
            Some(day) => format!("SmartNET-Estimate-{}.pdf", day.format("%Y-%m-%d")),
            None => "SmartNET-Estimate.pdf".to_string(),
        }
    }

    pub fn render(&self) -> Result<Vec<u8>, QuotePdfError> {
        let mut layout = Layout::new();

        layout.line("F2", TITLE_SIZE, MARGIN, "SmartNET Installation");
        layout.line(
            "F1",
            BODY_SIZE,
            MARGIN,
            "Cameras - Wi-Fi - Access Control - Low voltage planning",
        );
        layout.line(
            "F1",
            BODY_SIZE,
            MARGIN,
            &format!("Estimate snapshot generated {}", self.generated_at),
        );
        layout.rule();

        for section in &self.sections {
            layout.gap();
            layout.line("F2", SECTION_SIZE, MARGIN, &section.title);
            for (label, value) in &section.rows {
                layout.row(label, value);
            }
        }

        layout.gap();
        layout.rule();
        for text in &self.footer {
            layout.paragraph("F1", BODY_SIZE - 2, MARGIN, PAGE_WIDTH - MARGIN, text);
        }

        layout.finish()
    }
}

/// Replace characters the base-14 fonts cannot show
pub fn to_pdf_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '–' | '—' | '‑' | '−' => out.push('-'),
            '•' | '·' => out.push('*'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '…' => out.push_str("..."),
            '²' => out.push('2'),
            '\t' | '\n' | '\r' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap by character count. Helvetica averages about half an em per glyph.
fn wrap_text(text: &str, font_size: i64, width: i64) -> Vec<String> {
    let max_chars = ((width * 2) / font_size.max(1)).max(8) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let cut = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..cut].to_string());
            word = &word[cut..];
        }

        let word_len = word.chars().count();
        if current.is_empty() {
            current = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, height: i64) {
        if self.y - height < MARGIN {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text_at(&mut self, font: &str, size: i64, x: i64, text: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current
            .push(Operation::new("Tf", vec![font.into(), Object::Integer(size)]));
        self.current.push(Operation::new(
            "Td",
            vec![Object::Integer(x), Object::Integer(self.y)],
        ));
        self.current.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_pdf_ascii(text))],
        ));
        self.current.push(Operation::new("ET", vec![]));
    }

    fn line(&mut self, font: &str, size: i64, x: i64, text: &str) {
        let height = size.max(LEADING) + 4;
        self.ensure_room(height);
        self.y -= height;
        self.text_at(font, size, x, text);
    }

    fn paragraph(&mut self, font: &str, size: i64, x: i64, right: i64, text: &str) {
        for line in wrap_text(&to_pdf_ascii(text), size, right - x) {
            self.line(font, size, x, &line);
        }
    }

    fn row(&mut self, label: &str, value: &str) {
        let lines = wrap_text(&to_pdf_ascii(value), BODY_SIZE, PAGE_WIDTH - MARGIN - VALUE_COLUMN);
        for (i, line) in lines.iter().enumerate() {
            self.ensure_room(LEADING);
            self.y -= LEADING;
            if i == 0 {
                self.text_at("F2", BODY_SIZE, MARGIN, label);
            }
            self.text_at("F1", BODY_SIZE, VALUE_COLUMN, line);
        }
    }

    fn gap(&mut self) {
        self.y -= LEADING / 2;
    }

    fn rule(&mut self) {
        self.ensure_room(8);
        self.y -= 6;
        self.current.push(Operation::new(
            "m",
            vec![Object::Integer(MARGIN), Object::Integer(self.y)],
        ));
        self.current.push(Operation::new(
            "l",
            vec![Object::Integer(PAGE_WIDTH - MARGIN), Object::Integer(self.y)],
        ));
        self.current.push(Operation::new("S", vec![]));
    }

    fn finish(mut self) -> Result<Vec<u8>, QuotePdfError> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
