//! Demo records for a fresh session.

use chrono::NaiveDate;
use repairdesk_core::{
  Result, Store,
  person::PersonForm,
  request::{RequestForm, Status, Warranty},
};

/// Add two responsible persons and one open request, going through the same
/// validation as client input.
pub fn seed(store: &mut Store) -> Result<()> {
  let john = store.add(
    PersonForm {
      name:       "John Smith / จอห์น สมิธ".into(),
      email:      "john@company.com".into(),
      phone:      "+66-2-123-4567".into(),
      department: "IT Support / ฝ่ายสนับสนุน IT".into(),
    }
    .validate()?,
  );

  store.add(
    PersonForm {
      name:       "Sarah Johnson / ซาร่าห์ จอห์นสัน".into(),
      email:      "sarah@company.com".into(),
      phone:      "+66-2-234-5678".into(),
      department: "Technical / ฝ่ายเทคนิค".into(),
    }
    .validate()?,
  );

  store.add(
    RequestForm {
      request_number:        "REQ-2024-001".into(),
      request_date:          NaiveDate::from_ymd_opt(2024, 1, 15),
      requester:             "Alice Brown / อลิซ บราวน์".into(),
      phone_number:          "+66-81-123-4567".into(),
      company_name:          "Tech Solutions Ltd. / เทค โซลูชั่น จำกัด".into(),
      device_model:          "MacBook Pro 14\"".into(),
      device_number:         "MB001234".into(),
      damage:                "Screen cracked / หน้าจอแตก".into(),
      note:                  "Dropped from desk / ตกจากโต๊ะ".into(),
      warranty:              Some(Warranty::UnderWarranty),
      responsible_person_id: Some(john.id),
      status:                Some(Status::InProgress),
    }
    .validate()?,
  );

  tracing::info!(
    persons = store.persons().len(),
    requests = store.requests().len(),
    "seeded sample data"
  );
  Ok(())
}
