//! English/Thai label table.
//!
//! A pure lookup from `(key, language)` to a display string. The core never
//! interprets languages; it only hands a [`Language`] through to here.

use std::{fmt, str::FromStr};

use repairdesk_core::request::{Status, Warranty};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Language ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Th,
}

impl Language {
  pub fn code(self) -> &'static str {
    match self {
      Self::En => "en",
      Self::Th => "th",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for Language {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "en" => Ok(Self::En),
      "th" => Ok(Self::Th),
      _ => Err(Error::UnknownLanguage(s.to_owned())),
    }
  }
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Every translatable label. The string form (`"repairRequestNumber"`, ...)
/// is what [`translate`] accepts. A few labels also answer to older key
/// spellings (`"exportPDF"`, `"exportExcel"`, `"unableToProced"`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Key {
  // ── Navigation ──────────────────────────────────────────────────────────
  Dashboard,
  NewRequest,
  Requests,
  ResponsiblePersons,
  Reports,

  // ── Common ──────────────────────────────────────────────────────────────
  Save,
  Cancel,
  Edit,
  Delete,
  Add,
  Search,
  Filter,
  Export,
  Actions,

  // ── Request fields ──────────────────────────────────────────────────────
  RepairRequestNumber,
  RepairRequestDate,
  RepairRequester,
  PhoneNumber,
  CompanyName,
  DeviceModel,
  DeviceNumber,
  Damage,
  Note,
  Warranty,
  ResponsiblePerson,
  TaskStatus,

  // ── Warranty options ────────────────────────────────────────────────────
  UnderWarranty,
  OutOfWarranty,
  #[strum(serialize = "underMAContract")]
  UnderMaContract,
  #[strum(serialize = "outOfMAContract")]
  OutOfMaContract,

  // ── Status options ──────────────────────────────────────────────────────
  InProgress,
  Completed,
  Cancelled,
  #[strum(to_string = "unableToProceed", serialize = "unableToProced")]
  UnableToProceed,

  // ── Person fields ───────────────────────────────────────────────────────
  Name,
  Email,
  Phone,
  Department,

  // ── Messages ────────────────────────────────────────────────────────────
  RequestCreated,
  RequestUpdated,
  RequestDeleted,
  PersonCreated,
  PersonUpdated,
  PersonDeleted,
  SelectResponsiblePerson,
  ConfirmDeleteRequest,
  ConfirmDeletePerson,

  // ── Reports ─────────────────────────────────────────────────────────────
  ReportTitle,
  TotalRequests,
  CompletedRequests,
  PendingRequests,
  #[strum(to_string = "exportDocument", serialize = "exportPDF")]
  ExportDocument,
  #[strum(to_string = "exportSpreadsheet", serialize = "exportExcel")]
  ExportSpreadsheet,
  NotAvailable,
}

impl Key {
  /// The key's string form, e.g. `"taskStatus"`.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn text(self, lang: Language) -> &'static str {
    let (en, th) = match self {
      Self::Dashboard => ("Dashboard", "แดชบอร์ด"),
      Self::NewRequest => ("New Request", "คำขอใหม่"),
      Self::Requests => ("Requests", "คำขอ"),
      Self::ResponsiblePersons => ("Responsible Persons", "ผู้รับผิดชอบ"),
      Self::Reports => ("Reports", "รายงาน"),

      Self::Save => ("Save", "บันทึก"),
      Self::Cancel => ("Cancel", "ยกเลิก"),
      Self::Edit => ("Edit", "แก้ไข"),
      Self::Delete => ("Delete", "ลบ"),
      Self::Add => ("Add", "เพิ่ม"),
      Self::Search => ("Search", "ค้นหา"),
      Self::Filter => ("Filter", "กรอง"),
      Self::Export => ("Export", "ส่งออก"),
      Self::Actions => ("Actions", "การดำเนินการ"),

      Self::RepairRequestNumber => ("Repair Request Number", "หมายเลขคำขอซ่อม"),
      Self::RepairRequestDate => ("Repair Request Date", "วันที่คำขอซ่อม"),
      Self::RepairRequester => ("Repair Requester", "ผู้ขอซ่อม"),
      Self::PhoneNumber => ("Phone Number", "หมายเลขโทรศัพท์"),
      Self::CompanyName => ("Company Name", "ชื่อบริษัท"),
      Self::DeviceModel => ("Device Model", "รุ่นอุปกรณ์"),
      Self::DeviceNumber => ("Device Number", "หมายเลขอุปกรณ์"),
      Self::Damage => ("Damage", "ความเสียหาย"),
      Self::Note => ("Note", "หมายเหตุ"),
      Self::Warranty => ("Warranty", "การรับประกัน"),
      Self::ResponsiblePerson => ("Responsible Person", "ผู้รับผิดชอบ"),
      Self::TaskStatus => ("Task Status", "สถานะงาน"),

      Self::UnderWarranty => ("Under warranty", "อยู่ในประกัน"),
      Self::OutOfWarranty => ("Out of warranty", "หมดประกัน"),
      Self::UnderMaContract => ("Under MA contract", "อยู่ในสัญญา MA"),
      Self::OutOfMaContract => ("Out of MA contract", "หมดสัญญา MA"),

      Self::InProgress => ("In progress", "กำลังดำเนินการ"),
      Self::Completed => ("Completed", "เสร็จสิ้น"),
      Self::Cancelled => ("Cancel operation", "ยกเลิกการดำเนินการ"),
      Self::UnableToProceed => ("Cannot be executed", "ไม่สามารถดำเนินการได้"),

      Self::Name => ("Name", "ชื่อ"),
      Self::Email => ("Email", "อีเมล"),
      Self::Phone => ("Phone", "โทรศัพท์"),
      Self::Department => ("Department", "แผนก"),

      Self::RequestCreated => ("Request created successfully", "สร้างคำขอเรียบร้อยแล้ว"),
      Self::RequestUpdated => ("Request updated successfully", "อัปเดตคำขอเรียบร้อยแล้ว"),
      Self::RequestDeleted => ("Request deleted successfully", "ลบคำขอเรียบร้อยแล้ว"),
      Self::PersonCreated => ("Person created successfully", "สร้างข้อมูลบุคคลเรียบร้อยแล้ว"),
      Self::PersonUpdated => ("Person updated successfully", "อัปเดตข้อมูลบุคคลเรียบร้อยแล้ว"),
      Self::PersonDeleted => ("Person deleted successfully", "ลบข้อมูลบุคคลเรียบร้อยแล้ว"),
      Self::SelectResponsiblePerson => {
        ("Please select a responsible person", "กรุณาเลือกผู้รับผิดชอบ")
      }
      Self::ConfirmDeleteRequest => (
        "Are you sure you want to delete this request?",
        "คุณแน่ใจหรือไม่ที่จะลบคำขอนี้?",
      ),
      Self::ConfirmDeletePerson => (
        "Are you sure you want to delete this person?",
        "คุณแน่ใจหรือไม่ที่จะลบบุคคลนี้?",
      ),

      Self::ReportTitle => ("Repair Requests Report", "รายงานคำขอซ่อม"),
      Self::TotalRequests => ("Total Requests", "คำขอทั้งหมด"),
      Self::CompletedRequests => ("Completed Requests", "คำขอที่เสร็จสิ้น"),
      Self::PendingRequests => ("Pending Requests", "คำขอที่รอดำเนินการ"),
      Self::ExportDocument => ("Export Document", "ส่งออกเอกสาร"),
      Self::ExportSpreadsheet => ("Export Spreadsheet", "ส่งออกสเปรดชีต"),
      Self::NotAvailable => ("N/A", "N/A"),
    };
    match lang {
      Language::En => en,
      Language::Th => th,
    }
  }
}

/// Look up a label by its string key; unknown keys come back unchanged.
pub fn translate(key: &str, lang: Language) -> &str {
  match key.parse::<Key>() {
    Ok(k) => k.text(lang),
    Err(_) => key,
  }
}

// ─── Enum labels ─────────────────────────────────────────────────────────────

/// Maps a domain enum onto its display label.
pub trait Labelled {
  fn label_key(&self) -> Key;

  fn label(&self, lang: Language) -> &'static str { self.label_key().text(lang) }
}

impl Labelled for Status {
  fn label_key(&self) -> Key {
    match self {
      Status::InProgress => Key::InProgress,
      Status::Completed => Key::Completed,
      Status::Cancelled => Key::Cancelled,
      Status::UnableToProceed => Key::UnableToProceed,
    }
  }
}

impl Labelled for Warranty {
  fn label_key(&self) -> Key {
    match self {
      Warranty::UnderWarranty => Key::UnderWarranty,
      Warranty::OutOfWarranty => Key::OutOfWarranty,
      Warranty::UnderMaContract => Key::UnderMaContract,
      Warranty::OutOfMaContract => Key::OutOfMaContract,
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn every_key_has_text_in_both_languages() {
    for key in Key::iter() {
      assert!(!key.text(Language::En).is_empty(), "{key:?}");
      assert!(!key.text(Language::Th).is_empty(), "{key:?}");
    }
  }

  #[test]
  fn translate_by_string_key() {
    assert_eq!(translate("taskStatus", Language::En), "Task Status");
    assert_eq!(translate("taskStatus", Language::Th), "สถานะงาน");
    assert_eq!(translate("underMAContract", Language::En), "Under MA contract");
  }

  #[test]
  fn unknown_key_falls_back_to_itself() {
    assert_eq!(translate("noSuchKey", Language::Th), "noSuchKey");
  }

  #[test]
  fn legacy_key_spellings_resolve() {
    assert_eq!(translate("exportPDF", Language::Th), "ส่งออกเอกสาร");
    assert_eq!(translate("exportExcel", Language::En), "Export Spreadsheet");
    assert_eq!(translate("unableToProced", Language::En), "Cannot be executed");
    assert_eq!(Key::UnableToProceed.as_str(), "unableToProceed");
  }

  #[test]
  fn key_string_forms_round_trip() {
    for key in Key::iter() {
      assert_eq!(key.as_str().parse::<Key>().unwrap(), key);
    }
  }

  #[test]
  fn status_labels() {
    assert_eq!(Status::UnableToProceed.label(Language::En), "Cannot be executed");
    assert_eq!(Status::Completed.label(Language::Th), "เสร็จสิ้น");
    assert_eq!(Warranty::OutOfWarranty.label(Language::Th), "หมดประกัน");
  }

  #[test]
  fn language_parsing() {
    assert_eq!("TH".parse::<Language>().unwrap(), Language::Th);
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(Language::default().to_string(), "en");
  }
}
