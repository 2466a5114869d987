//! Minimal PDF 1.4 writer for report export.
//!
//! Text is set in the standard Courier faces so column alignment from the
//! shared layout carries over unchanged. Content streams are uncompressed
//! and no timestamps are written, so identical reports give identical bytes.

use std::fmt::Write as _;

use super::layout::{LayoutLine, LineRole, LineStyle, layout};
use super::{ExportError, ExportOptions};
use crate::reports::ReportDto;

/// Upper bound on text lines per page, shared with configuration validation.
pub const MAX_LINES_PER_PAGE: usize = tally_shared::MAX_ROWS_PER_PAGE;

const LETTER_SHORT: usize = 612;
const LETTER_LONG: usize = 792;
const MARGIN: usize = 36;
const FOOTER_BASELINE: usize = 24;
const BODY_SIZE: usize = 9;
const TITLE_SIZE: usize = 11;
const LEADING: usize = 11;
/// Courier advance width in thousandths of the font size.
const COURIER_ADVANCE: usize = 600;
/// Prefix of a wrapped continuation line.
const WRAP_INDENT: &str = "  ";

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const REGULAR_FONT_ID: usize = 3;
const BOLD_FONT_ID: usize = 4;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

#[derive(Debug, Clone, Copy)]
struct PageSize {
    width: usize,
    height: usize,
}

impl PageSize {
    const PORTRAIT: Self = Self {
        width: LETTER_SHORT,
        height: LETTER_LONG,
    };
    const LANDSCAPE: Self = Self {
        width: LETTER_LONG,
        height: LETTER_SHORT,
    };

    /// Body characters that fit between the side margins.
    fn columns(self) -> usize {
        (self.width - 2 * MARGIN) * 1000 / (BODY_SIZE * COURIER_ADVANCE)
    }

    /// Text lines that fit between the top margin and the footer.
    fn lines(self) -> usize {
        (self.height - MARGIN - FOOTER_BASELINE - LEADING) / LEADING
    }

    fn top_baseline(self) -> usize {
        self.height - MARGIN - TITLE_SIZE
    }
}

/// Renders the report as a paginated PDF document.
///
/// Pages switch to landscape when the widest line would not fit portrait,
/// and lines still too wide are wrapped. The configured rows per page is
/// capped by what the page can hold. A section that continues onto a new
/// page gets its label and column header again.
pub fn write_pdf(report: &ReportDto, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    if options.rows_per_page == 0 || options.rows_per_page > MAX_LINES_PER_PAGE {
        return Err(ExportError::Layout(format!(
            "rows per page must be between 1 and {MAX_LINES_PER_PAGE}, got {}",
            options.rows_per_page
        )));
    }

    let lines = layout(report);
    let widest = lines
        .iter()
        .map(|line| line.text.chars().count())
        .max()
        .unwrap_or(0);
    let page = if widest > PageSize::PORTRAIT.columns() {
        PageSize::LANDSCAPE
    } else {
        PageSize::PORTRAIT
    };
    let lines = wrap_lines(lines, page.columns());
    let per_page = options.rows_per_page.min(page.lines());
    let pages = paginate(lines, per_page);

    let mut pdf = PdfBuffer::new();
    pdf.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    );

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect();
    pdf.object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );
    pdf.object(
        REGULAR_FONT_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>",
    );
    pdf.object(
        BOLD_FONT_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier-Bold /Encoding /WinAnsiEncoding >>",
    );
    pdf.object(
        INFO_ID,
        &format!(
            "<< /Title ({}) /Producer (Tally) >>",
            escape_text(report.title())
        ),
    );

    for (index, chunk) in pages.iter().enumerate() {
        let content_id = page_object_id(index) + 1;
        pdf.object(
            page_object_id(index),
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {REGULAR_FONT_ID} 0 R /F2 {BOLD_FONT_ID} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                page.width, page.height
            ),
        );
        let content = page_content(chunk, page, index + 1, pages.len());
        pdf.stream(content_id, &content);
    }

    Ok(pdf.finish())
}

/// Splits lines wider than `width` characters into indented continuation lines.
fn wrap_lines(lines: Vec<LayoutLine>, width: usize) -> Vec<LayoutLine> {
    let step = width.saturating_sub(WRAP_INDENT.len()).max(1);
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        if line.text.chars().count() <= width {
            wrapped.push(line);
            continue;
        }
        let LayoutLine { style, role, text } = line;
        let chars: Vec<char> = text.chars().collect();
        let (first, mut rest) = chars.split_at(width);
        wrapped.push(LayoutLine {
            style,
            role,
            text: first.iter().collect(),
        });
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(step.min(rest.len()));
            wrapped.push(LayoutLine {
                style,
                role,
                text: format!("{WRAP_INDENT}{}", chunk.iter().collect::<String>()),
            });
            rest = tail;
        }
    }
    wrapped
}

/// Breaks lines into pages of at most `per_page` lines.
///
/// When a page break falls inside a section, the next page opens with that
/// section's header lines, provided they leave room for content.
fn paginate(lines: Vec<LayoutLine>, per_page: usize) -> Vec<Vec<LayoutLine>> {
    let mut pages = Vec::new();
    let mut current: Vec<LayoutLine> = Vec::new();
    let mut header: Vec<LayoutLine> = Vec::new();
    let mut in_header = false;

    for line in lines {
        let is_header = line.role == LineRole::SectionHeader;
        if current.len() >= per_page {
            pages.push(std::mem::take(&mut current));
            if !is_header && header.len() < per_page {
                current.extend(header.iter().cloned());
            }
        }
        if is_header {
            if !in_header {
                header.clear();
            }
            header.push(line.clone());
        }
        in_header = is_header;
        if line.role == LineRole::SectionEnd {
            header.clear();
        }
        current.push(line);
    }
    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + 2 * index
}

fn page_content(lines: &[LayoutLine], page: PageSize, number: usize, total: usize) -> String {
    let mut out = String::new();
    out.push_str("BT\n");
    let _ = writeln!(out, "{LEADING} TL");
    let _ = writeln!(out, "{MARGIN} {} Td", page.top_baseline());

    let mut current: Option<LineStyle> = None;
    for line in lines {
        if current != Some(line.style) {
            let (font, size) = match line.style {
                LineStyle::Title => ("F2", TITLE_SIZE),
                LineStyle::Heading => ("F2", BODY_SIZE),
                LineStyle::Body => ("F1", BODY_SIZE),
            };
            let _ = writeln!(out, "/{font} {size} Tf");
            current = Some(line.style);
        }
        let _ = writeln!(out, "({}) Tj", escape_text(&line.text));
        out.push_str("T*\n");
    }
    out.push_str("ET\n");

    out.push_str("BT\n");
    let _ = writeln!(out, "/F1 8 Tf");
    let _ = writeln!(out, "{MARGIN} {FOOTER_BASELINE} Td");
    let _ = writeln!(out, "(Page {number} of {total}) Tj");
    out.push_str("ET\n");
    out
}

/// Escapes a PDF literal string for the WinAnsi-encoded Courier fonts.
///
/// Characters outside printable ASCII are written as octal escapes of their
/// WinAnsi code; anything WinAnsi cannot show becomes `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => match win_ansi_code(ch) {
                Some(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsi (Windows-1252) code of a non-ASCII character.
fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{a0}'..='\u{ff}' => return u8::try_from(u32::from(ch)).ok(),
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(code)
}

/// Byte buffer that tracks object offsets for the cross-reference table.
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        // Binary marker so transfer tools treat the file as binary.
        bytes.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets.push((id, self.bytes.len()));
        self.bytes
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &str) {
        self.offsets.push((id, self.bytes.len()));
        self.bytes.extend_from_slice(
            format!(
                "{id} 0 obj\n<< /Length {} >>\nstream\n{content}endstream\nendobj\n",
                content.len()
            )
            .as_bytes(),
        );
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_offset = self.bytes.len();

        let mut tail = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            let _ = writeln!(tail, "{offset:010} 00000 n ");
        }
        let _ = writeln!(
            tail,
            "trailer\n<< /Size {size} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF"
        );
        self.bytes.extend_from_slice(tail.as_bytes());
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{
        AccountSelection, DateRange, ReportRow, ReportSection, account_transaction_columns,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, Currency, LineId};

    fn report(row_count: usize, description: &str) -> ReportDto {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let rows: Vec<ReportRow> = (0..row_count)
            .map(|i| ReportRow {
                line_id: LineId::new(),
                account_id: AccountId::new(),
                account_name: "Cash".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                description: description.to_string(),
                debit: dec!(1),
                credit: dec!(0),
                balance: Decimal::from(i + 1),
            })
            .collect();
        let section = ReportSection {
            label: "Cash".to_string(),
            opening_balance: dec!(0),
            total_debit: Decimal::from(row_count),
            total_credit: dec!(0),
            closing_balance: Decimal::from(row_count),
            rows,
        };
        ReportDto::new(
            "Account Transactions",
            Currency::Usd,
            range,
            AccountSelection::All,
            account_transaction_columns(),
            vec![section],
        )
    }

    fn options(rows_per_page: usize) -> ExportOptions {
        ExportOptions { rows_per_page }
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_document_structure() {
        let bytes = write_pdf(&report(2, "Chairs"), &options(48)).unwrap();
        let body = text(&bytes);
        assert!(body.starts_with("%PDF-1.4\n"));
        assert!(body.ends_with("%%EOF\n"));
        assert!(body.contains("/BaseFont /Courier "));
        assert!(body.contains("/Count 1 "));
        assert!(
            body.lines()
                .any(|l| l.starts_with("(2024-01-02") && l.contains("Chairs") && l.ends_with(") Tj"))
        );
        assert!(body.contains("(Page 1 of 1) Tj"));
        assert!(body.contains("/MediaBox [0 0 612 792]"));
    }

    fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).rposition(|w| w == needle)
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = write_pdf(&report(30, "Chairs"), &options(10)).unwrap();

        let start = rfind(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = std::str::from_utf8(&bytes[start..]).unwrap();
        let xref_offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_offset..].starts_with(b"xref\n"));

        let table = std::str::from_utf8(&bytes[xref_offset..]).unwrap();
        let entries: Vec<&str> = table.lines().skip(3).collect();
        let objects = entries.iter().take_while(|l| l.ends_with(" n ")).count();
        assert!(objects > FIRST_PAGE_ID);
        for (i, entry) in entries.iter().take(objects).enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn test_paginates_by_rows_per_page() {
        // 39 laid-out lines; pages after the first repeat the 2 header lines.
        let body = text(&write_pdf(&report(30, "Chairs"), &options(10)).unwrap());
        assert!(body.contains("/Count 5 "));
        assert!(body.contains("(Page 5 of 5) Tj"));
    }

    fn tj_lines(body: &str) -> Vec<&str> {
        body.lines()
            .filter(|l| l.starts_with('(') && l.ends_with(") Tj"))
            .map(|l| &l[1..l.len() - 4])
            .collect()
    }

    #[test]
    fn test_continuation_pages_repeat_section_header() {
        let lines = layout(&report(30, "Chairs"));
        let total = lines.len();
        let pages = paginate(lines, 10);

        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|page| page.len() <= 10));
        for page in &pages[1..] {
            assert_eq!(page[0].text, "Cash");
            assert!(page[1].text.starts_with("Date"));
            assert_eq!(page[1].role, LineRole::SectionHeader);
        }
        let repeated = 2 * (pages.len() - 1);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), total + repeated);
        assert!(pages[4].last().unwrap().text.starts_with("Closing balance"));
    }

    #[test]
    fn test_small_pages_skip_header_repeat() {
        let lines = layout(&report(5, "Chairs"));
        let total = lines.len();
        let pages = paginate(lines, 2);
        assert!(pages.iter().all(|page| page.len() <= 2));
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), total);
    }

    #[test]
    fn test_long_lines_wrap_within_page() {
        let long = format!("{}END", "x".repeat(197));
        let body = text(&write_pdf(&report(1, &long), &options(48)).unwrap());
        assert!(body.contains("/MediaBox [0 0 792 612]"));

        let columns = PageSize::LANDSCAPE.columns();
        let lines = tj_lines(&body);
        assert!(lines.iter().all(|l| l.chars().count() <= columns));
        let kept: usize = lines.iter().map(|l| l.matches('x').count()).sum();
        assert_eq!(kept, 197);
        assert!(lines.iter().any(|l| l.starts_with("  ") && l.contains("END")));
    }

    #[test]
    fn test_latin_text_keeps_accents() {
        let body = text(&write_pdf(&report(1, "Caf\u{e9} Z\u{fc}rich"), &options(48)).unwrap());
        assert!(body.contains("Caf\\351 Z\\374rich"));
        assert!(!body.contains("Caf?"));
    }

    #[test]
    fn test_deterministic_output() {
        let dto = report(5, "Chairs");
        assert_eq!(
            write_pdf(&dto, &options(20)).unwrap(),
            write_pdf(&dto, &options(20)).unwrap()
        );
    }

    #[test]
    fn test_wide_reports_use_landscape() {
        let wide = "x".repeat(120);
        let body = text(&write_pdf(&report(1, &wide), &options(48)).unwrap());
        assert!(body.contains("/MediaBox [0 0 792 612]"));
    }

    #[test]
    fn test_rejects_bad_rows_per_page() {
        assert!(matches!(
            write_pdf(&report(1, "x"), &options(0)),
            Err(ExportError::Layout(_))
        ));
        assert!(matches!(
            write_pdf(&report(1, "x"), &options(MAX_LINES_PER_PAGE + 1)),
            Err(ExportError::Layout(_))
        ));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a(b)c\\d"), "a\\(b\\)c\\\\d");
        assert_eq!(escape_text("caf\u{e9}"), "caf\\351");
        assert_eq!(escape_text("\u{20ac}5 \u{2013} ok"), "\\2005 \\226 ok");
        assert_eq!(escape_text("\u{4e2d}"), "?");
    }
}
