//! Plain-text tables for the terminal.

use repairdesk_core::{person::Person, request::Request};
use repairdesk_report::{Key, Labelled, Language, responsible_name};
use unicode_width::UnicodeWidthStr;

use crate::client::Summary;

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Widths are terminal columns, so Thai combining vowels and tone
/// marks take no space.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
  let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
  for row in rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.width());
    }
  }
  let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

  let mut out = String::new();
  push_line(&mut out, headers.iter().copied(), &widths);
  push_line(&mut out, rule.iter().map(String::as_str), &widths);
  for row in rows {
    push_line(&mut out, row.iter().map(String::as_str), &widths);
  }
  out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
  let padded: Vec<String> = cells
    .zip(widths)
    .map(|(c, &w)| format!("{c}{}", " ".repeat(w - c.width())))
    .collect();
  out.push_str(padded.join("  ").trim_end());
  out.push('\n');
}

pub fn requests_table(requests: &[Request], persons: &[Person], lang: Language) -> String {
  let headers = [
    "ID",
    Key::RepairRequestNumber.text(lang),
    Key::RepairRequestDate.text(lang),
    Key::RepairRequester.text(lang),
    Key::CompanyName.text(lang),
    Key::DeviceModel.text(lang),
    Key::TaskStatus.text(lang),
    Key::ResponsiblePerson.text(lang),
  ];
  let rows: Vec<Vec<String>> = requests
    .iter()
    .map(|r| {
      vec![
        r.id.to_string(),
        r.request_number.clone(),
        r.request_date.format("%Y-%m-%d").to_string(),
        r.requester.clone(),
        r.company_name.clone(),
        r.device_model.clone(),
        r.status.label(lang).to_owned(),
        responsible_name(persons, r.responsible_person_id, lang).to_owned(),
      ]
    })
    .collect();
  table(&headers, &rows)
}

/// Every field of one request, one per line.
pub fn request_detail(r: &Request, persons: &[Person], lang: Language) -> String {
  let date = r.request_date.format("%Y-%m-%d").to_string();
  let fields = [
    (Key::RepairRequestNumber, r.request_number.as_str()),
    (Key::RepairRequestDate, date.as_str()),
    (Key::RepairRequester, r.requester.as_str()),
    (Key::PhoneNumber, r.phone_number.as_str()),
    (Key::CompanyName, r.company_name.as_str()),
    (Key::DeviceModel, r.device_model.as_str()),
    (Key::DeviceNumber, r.device_number.as_str()),
    (Key::Damage, r.damage.as_str()),
    (Key::Note, r.note.as_str()),
    (Key::Warranty, r.warranty.label(lang)),
    (Key::TaskStatus, r.status.label(lang)),
    (Key::ResponsiblePerson, responsible_name(persons, r.responsible_person_id, lang)),
  ];
  let width = fields
    .iter()
    .map(|(k, _)| k.text(lang).width())
    .max()
    .unwrap_or(0);

  let id_pad = " ".repeat(width.saturating_sub("ID".len()));
  let mut out = format!("ID{id_pad}  {}\n", r.id);
  for (key, value) in fields {
    let label = key.text(lang);
    let pad = " ".repeat(width - label.width());
    out.push_str(&format!("{label}{pad}  {value}\n"));
  }
  out
}

pub fn persons_table(persons: &[Person], lang: Language) -> String {
  let headers = [
    "ID",
    Key::Name.text(lang),
    Key::Email.text(lang),
    Key::Phone.text(lang),
    Key::Department.text(lang),
  ];
  let rows: Vec<Vec<String>> = persons
    .iter()
    .map(|p| {
      vec![
        p.id.to_string(),
        p.name.clone(),
        p.email.clone(),
        p.phone.clone(),
        p.department.clone(),
      ]
    })
    .collect();
  table(&headers, &rows)
}

pub fn summary_table(summary: &Summary, lang: Language) -> String {
  let mut rows: Vec<Vec<String>> = summary
    .by_status
    .iter()
    .map(|s| {
      vec![
        s.status.label(lang).to_owned(),
        s.count.to_string(),
        format!("{:.1}%", s.percentage),
      ]
    })
    .collect();
  rows.push(vec![
    Key::TotalRequests.text(lang).to_owned(),
    summary.total.to_string(),
    String::new(),
  ]);
  table(&[Key::TaskStatus.text(lang), "#", "%"], &rows)
}
