//! Localization and export for repairdesk.
//!
//! Pure and synchronous: given requests the core has already filtered, a
//! person list for name resolution, and a [`Language`], produce display
//! strings or a whole export file. No store access.
//!
//! # Quick start
//!
//! ```no_run
//! use repairdesk_core::{Store, filter::{Criteria, filter_requests}};
//! use repairdesk_report::{ExportFormat, Language, render};
//!
//! let store = Store::new();
//! let rows = filter_requests(store.requests(), &Criteria::default());
//! let csv = render(ExportFormat::Csv, rows, store.persons(), Language::Th);
//! println!("{csv}");
//! ```

pub mod error;
pub mod export;
pub mod i18n;

pub use error::{Error, Result};
pub use export::{ExportFormat, render, responsible_name};
pub use i18n::{Key, Labelled, Language, translate};
