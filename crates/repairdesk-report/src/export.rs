//! Spreadsheet (CSV) and document (Markdown) renderings of a request list.
//!
//! Both take an already-filtered sequence; nothing here filters or sorts.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use repairdesk_core::{person::Person, request::Request};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  i18n::{Key, Labelled, Language},
};

// ─── Format ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
  /// Spreadsheet: every column, one row per request.
  #[default]
  Csv,
  /// Document: a titled summary table.
  Markdown,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Csv => "csv",
      Self::Markdown => "md",
    }
  }

  pub fn media_type(self) -> &'static str {
    match self {
      Self::Csv => "text/csv; charset=utf-8",
      Self::Markdown => "text/markdown; charset=utf-8",
    }
  }

  /// `repair-requests-YYYY-MM-DD.<ext>`.
  pub fn file_name(self, date: NaiveDate) -> String {
    format!("repair-requests-{}.{}", date.format("%Y-%m-%d"), self.extension())
  }
}

impl fmt::Display for ExportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Csv => "csv",
      Self::Markdown => "markdown",
    })
  }
}

impl FromStr for ExportFormat {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "csv" | "spreadsheet" => Ok(Self::Csv),
      "markdown" | "md" | "document" => Ok(Self::Markdown),
      _ => Err(Error::UnknownFormat(s.to_owned())),
    }
  }
}

/// Render `requests` in `format`.
pub fn render<'a>(
  format: ExportFormat,
  requests: impl IntoIterator<Item = &'a Request>,
  persons: &[Person],
  lang: Language,
) -> String {
  match format {
    ExportFormat::Csv => to_csv(requests, persons, lang),
    ExportFormat::Markdown => to_markdown(requests, persons, lang),
  }
}

/// The responsible person's name, or the "N/A" label when the reference no
/// longer resolves.
pub fn responsible_name(persons: &[Person], id: Uuid, lang: Language) -> &str {
  persons
    .iter()
    .find(|p| p.id == id)
    .map_or_else(|| Key::NotAvailable.text(lang), |p| p.name.as_str())
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

const CSV_COLUMNS: [Key; 12] = [
  Key::RepairRequestNumber,
  Key::RepairRequestDate,
  Key::RepairRequester,
  Key::PhoneNumber,
  Key::CompanyName,
  Key::DeviceModel,
  Key::DeviceNumber,
  Key::Damage,
  Key::Note,
  Key::Warranty,
  Key::TaskStatus,
  Key::ResponsiblePerson,
];

/// Quote a field per RFC 4180 when it contains a delimiter, quote or line
/// break.
fn csv_field(s: &str) -> String {
  if s.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_owned()
  }
}

fn push_csv_record<'s>(out: &mut String, fields: impl IntoIterator<Item = &'s str>) {
  let line: Vec<String> = fields.into_iter().map(csv_field).collect();
  out.push_str(&line.join(","));
  out.push_str("\r\n");
}

/// CRLF-terminated CSV with a localized header row.
///
/// Starts with a UTF-8 byte-order mark; spreadsheet applications need it to
/// show Thai text correctly.
pub fn to_csv<'a>(
  requests: impl IntoIterator<Item = &'a Request>,
  persons: &[Person],
  lang: Language,
) -> String {
  let mut out = String::from('\u{feff}');
  push_csv_record(&mut out, CSV_COLUMNS.iter().map(|k| k.text(lang)));

  for r in requests {
    let date = r.request_date.format("%Y-%m-%d").to_string();
    push_csv_record(
      &mut out,
      [
        r.request_number.as_str(),
        date.as_str(),
        r.requester.as_str(),
        r.phone_number.as_str(),
        r.company_name.as_str(),
        r.device_model.as_str(),
        r.device_number.as_str(),
        r.damage.as_str(),
        r.note.as_str(),
        r.warranty.label(lang),
        r.status.label(lang),
        responsible_name(persons, r.responsible_person_id, lang),
      ],
    );
  }
  out
}

// ─── Markdown ────────────────────────────────────────────────────────────────

const DOCUMENT_COLUMNS: [Key; 7] = [
  Key::RepairRequestNumber,
  Key::RepairRequestDate,
  Key::RepairRequester,
  Key::CompanyName,
  Key::DeviceModel,
  Key::TaskStatus,
  Key::ResponsiblePerson,
];

fn md_cell(s: &str) -> String {
  s.replace('\\', "\\\\")
    .replace('|', "\\|")
    .replace("\r\n", "<br>")
    .replace('\n', "<br>")
}

fn push_md_row<'s>(out: &mut String, cells: impl IntoIterator<Item = &'s str>) {
  out.push('|');
  for cell in cells {
    out.push(' ');
    out.push_str(&md_cell(cell));
    out.push_str(" |");
  }
  out.push('\n');
}

/// A Markdown document: localized title, then a summary table.
pub fn to_markdown<'a>(
  requests: impl IntoIterator<Item = &'a Request>,
  persons: &[Person],
  lang: Language,
) -> String {
  let mut out = format!("# {}\n\n", Key::ReportTitle.text(lang));
  push_md_row(&mut out, DOCUMENT_COLUMNS.iter().map(|k| k.text(lang)));
  out.push('|');
  out.push_str(&" --- |".repeat(DOCUMENT_COLUMNS.len()));
  out.push('\n');

  for r in requests {
    let date = r.request_date.format("%Y-%m-%d").to_string();
    push_md_row(
      &mut out,
      [
        r.request_number.as_str(),
        date.as_str(),
        r.requester.as_str(),
        r.company_name.as_str(),
        r.device_model.as_str(),
        r.status.label(lang),
        responsible_name(persons, r.responsible_person_id, lang),
      ],
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};
  use repairdesk_core::request::{Status, Warranty};

  use super::*;

  fn person(name: &str) -> Person {
    Person {
      id:         Uuid::new_v4(),
      name:       name.into(),
      email:      "x@example.com".into(),
      phone:      "1".into(),
      department: "IT".into(),
      created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
    }
  }

  fn request(number: &str, person_id: Uuid) -> Request {
    let at = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    Request {
      id: Uuid::new_v4(),
      request_number: number.into(),
      request_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
      requester: "Alice Brown".into(),
      phone_number: "+66-81-123-4567".into(),
      company_name: "Tech Solutions, Ltd.".into(),
      device_model: "MacBook Pro 14\"".into(),
      device_number: "MB001234".into(),
      damage: "Screen cracked".into(),
      note: String::new(),
      warranty: Warranty::UnderWarranty,
      responsible_person_id: person_id,
      status: Status::InProgress,
      created_at: at,
      updated_at: at,
    }
  }

  #[test]
  fn csv_has_bom_header_and_quoted_fields() {
    let john = person("John Smith");
    let rs = [request("REQ-1", john.id)];
    let csv = to_csv(&rs, std::slice::from_ref(&john), Language::En);

    let body = csv.strip_prefix('\u{feff}').expect("BOM");
    let lines: Vec<&str> = body.split("\r\n").collect();
    assert_eq!(lines.len(), 3, "{csv:?}");
    assert!(lines[0].starts_with("Repair Request Number,Repair Request Date,"));
    assert!(lines[0].ends_with("Task Status,Responsible Person"));
    assert_eq!(
      lines[1],
      "REQ-1,2024-01-15,Alice Brown,+66-81-123-4567,\"Tech Solutions, Ltd.\",\
       \"MacBook Pro 14\"\"\",MB001234,Screen cracked,,Under warranty,In progress,John Smith"
    );
    assert_eq!(lines[2], "");
  }

  #[test]
  fn unresolved_person_renders_as_na() {
    let rs = [request("REQ-1", Uuid::new_v4())];
    let csv = to_csv(&rs, &[], Language::Th);
    assert!(csv.trim_end().ends_with(",N/A"), "{csv}");
    assert!(csv.contains("กำลังดำเนินการ"));
  }

  #[test]
  fn markdown_document_has_title_and_rows() {
    let john = person("John | Smith");
    let rs = [request("REQ-1", john.id), request("REQ-2", john.id)];
    let md = to_markdown(&rs, &[john], Language::En);

    let lines: Vec<&str> = md.lines().collect();
    assert_eq!(lines[0], "# Repair Requests Report");
    assert_eq!(lines[1], "");
    assert!(lines[2].starts_with("| Repair Request Number |"));
    assert_eq!(lines[3], "| --- | --- | --- | --- | --- | --- | --- |");
    assert_eq!(lines.len(), 6);
    assert!(lines[4].contains("John \\| Smith"), "{}", lines[4]);
  }

  #[test]
  fn empty_input_still_renders_headers() {
    let md = render(ExportFormat::Markdown, &[], &[], Language::Th);
    assert!(md.starts_with("# รายงานคำขอซ่อม"));
    let csv = render(ExportFormat::Csv, &[], &[], Language::En);
    assert_eq!(csv.matches("\r\n").count(), 1);
  }

  #[test]
  fn file_names_and_parsing() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(ExportFormat::Csv.file_name(day), "repair-requests-2024-03-09.csv");
    assert_eq!(ExportFormat::Markdown.file_name(day), "repair-requests-2024-03-09.md");
    assert_eq!("document".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
    assert!("pdf".parse::<ExportFormat>().is_err());
  }
}
