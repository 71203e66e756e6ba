//! `repairdesk`: command-line client for the repairdesk server.
//!
//! # Usage
//!
//! ```text
//! repairdesk requests list --status in_progress -q acme
//! repairdesk requests add --requester "Alice Brown" --phone ... --person <id>
//! repairdesk report export --format markdown --lang th -o report.md
//! repairdesk --url http://desk.internal:8080 persons list
//! ```

mod client;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use repairdesk_core::{
  person::{PersonForm, PersonPatch},
  request::{RequestForm, RequestPatch, Status, Warranty},
};
use repairdesk_report::{ExportFormat, Key, Language};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "repairdesk", about = "Command-line client for the repairdesk server")]
struct Cli {
  /// Path to a TOML config file (url, lang).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the repairdesk server (default: http://localhost:8080).
  #[arg(long, env = "REPAIRDESK_URL", global = true)]
  url: Option<String>,

  /// Label language for table output: en or th.
  #[arg(long, env = "REPAIRDESK_LANG", global = true)]
  lang: Option<Language>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Repair requests.
  #[command(subcommand)]
  Requests(RequestsCommand),
  /// Responsible persons.
  #[command(subcommand)]
  Persons(PersonsCommand),
  /// Status summary and exports.
  #[command(subcommand)]
  Report(ReportCommand),
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
  /// List requests matching the filters, in insertion order.
  List(FilterArgs),
  /// The most recently added requests, newest first.
  Recent {
    #[arg(short, default_value_t = 5)]
    n: usize,
  },
  /// Show every field of one request.
  Show { id: Uuid },
  /// Create a request. The request number is generated when omitted.
  Add(RequestArgs),
  /// Change fields of an existing request.
  Update {
    id: Uuid,
    #[command(flatten)]
    fields: RequestArgs,
  },
  Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum PersonsCommand {
  List,
  Add(PersonArgs),
  Update {
    id: Uuid,
    #[command(flatten)]
    fields: PersonArgs,
  },
  /// Remove a person. Requests assigned to them keep the reference.
  Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
  /// Per-status counts and percentages.
  Summary(FilterArgs),
  /// Download a spreadsheet (csv) or document (markdown).
  Export {
    #[command(flatten)]
    filter: FilterArgs,
    #[arg(long, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
    /// Output file (default: repair-requests-<date>.<ext>).
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
  /// Case-insensitive search over number, requester and company.
  #[arg(short = 'q', long = "query")]
  text: Option<String>,
  /// A status, or `all`.
  #[arg(long)]
  status: Option<String>,
  /// Start of the request-date range (inclusive); needs --to.
  #[arg(long, requires = "to")]
  from: Option<NaiveDate>,
  /// End of the request-date range (inclusive); needs --from.
  #[arg(long, requires = "from")]
  to: Option<NaiveDate>,
  /// A responsible person's id, or `all`.
  #[arg(long = "person")]
  responsible_person: Option<String>,
}

impl FilterArgs {
  fn query(&self) -> Vec<(&'static str, String)> {
    let mut q = Vec::new();
    if let Some(text) = &self.text {
      q.push(("q", text.clone()));
    }
    if let Some(status) = &self.status {
      q.push(("status", status.clone()));
    }
    if let Some(from) = self.from {
      q.push(("from", from.to_string()));
    }
    if let Some(to) = self.to {
      q.push(("to", to.to_string()));
    }
    if let Some(person) = &self.responsible_person {
      q.push(("responsible_person_id", person.clone()));
    }
    q
  }
}

#[derive(Args, Debug, Default)]
struct RequestArgs {
  #[arg(long)]
  number:        Option<String>,
  /// Request date (default: today, for new requests).
  #[arg(long)]
  date:          Option<NaiveDate>,
  #[arg(long)]
  requester:     Option<String>,
  #[arg(long)]
  phone:         Option<String>,
  #[arg(long)]
  company:       Option<String>,
  #[arg(long)]
  device_model:  Option<String>,
  #[arg(long)]
  device_number: Option<String>,
  #[arg(long)]
  damage:        Option<String>,
  #[arg(long)]
  note:          Option<String>,
  #[arg(long)]
  warranty:      Option<Warranty>,
  #[arg(long)]
  status:        Option<Status>,
  /// Responsible person id.
  #[arg(long)]
  person:        Option<Uuid>,
}

impl RequestArgs {
  fn into_form(self, today: NaiveDate) -> RequestForm {
    RequestForm {
      request_number:        self.number.unwrap_or_default(),
      request_date:          Some(self.date.unwrap_or(today)),
      requester:             self.requester.unwrap_or_default(),
      phone_number:          self.phone.unwrap_or_default(),
      company_name:          self.company.unwrap_or_default(),
      device_model:          self.device_model.unwrap_or_default(),
      device_number:         self.device_number.unwrap_or_default(),
      damage:                self.damage.unwrap_or_default(),
      note:                  self.note.unwrap_or_default(),
      warranty:              self.warranty,
      responsible_person_id: self.person,
      status:                self.status,
    }
  }

  fn into_patch(self) -> RequestPatch {
    RequestPatch {
      request_number:        self.number,
      request_date:          self.date,
      requester:             self.requester,
      phone_number:          self.phone,
      company_name:          self.company,
      device_model:          self.device_model,
      device_number:         self.device_number,
      damage:                self.damage,
      note:                  self.note,
      warranty:              self.warranty,
      responsible_person_id: self.person,
      status:                self.status,
    }
  }
}

#[derive(Args, Debug, Default)]
struct PersonArgs {
  #[arg(long)]
  name:       Option<String>,
  #[arg(long)]
  email:      Option<String>,
  #[arg(long)]
  phone:      Option<String>,
  #[arg(long)]
  department: Option<String>,
}

impl PersonArgs {
  fn into_form(self) -> PersonForm {
    PersonForm {
      name:       self.name.unwrap_or_default(),
      email:      self.email.unwrap_or_default(),
      phone:      self.phone.unwrap_or_default(),
      department: self.department.unwrap_or_default(),
    }
  }

  fn into_patch(self) -> PersonPatch {
    PersonPatch {
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      department: self.department,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:  String,
  #[serde(default)]
  lang: Option<Language>,
}

impl ConfigFile {
  fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// CLI flags override the config file, which overrides defaults.
fn resolve(url: Option<String>, lang: Option<Language>, file: ConfigFile) -> (ApiConfig, Language) {
  let base_url = url
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let lang = lang.or(file.lang).unwrap_or_default();
  (ApiConfig { base_url }, lang)
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let file_cfg = match &cli.config {
    Some(path) => ConfigFile::read(path)?,
    None => ConfigFile::default(),
  };
  let (api_config, lang) = resolve(cli.url, cli.lang, file_cfg);
  let client = ApiClient::new(api_config)?;

  match cli.command {
    Command::Requests(cmd) => run_requests(&client, cmd, lang).await,
    Command::Persons(cmd) => run_persons(&client, cmd, lang).await,
    Command::Report(cmd) => run_report(&client, cmd, lang).await,
  }
}

async fn run_requests(client: &ApiClient, cmd: RequestsCommand, lang: Language) -> Result<()> {
  match cmd {
    RequestsCommand::List(filter) => {
      let requests = client.list_requests(&filter.query()).await?;
      let persons = client.list_persons().await?;
      print!("{}", output::requests_table(&requests, &persons, lang));
    }
    RequestsCommand::Recent { n } => {
      let requests = client.recent_requests(n).await?;
      let persons = client.list_persons().await?;
      print!("{}", output::requests_table(&requests, &persons, lang));
    }
    RequestsCommand::Show { id } => {
      let request = client.get_request(id).await?;
      let persons = client.list_persons().await?;
      print!("{}", output::request_detail(&request, &persons, lang));
    }
    RequestsCommand::Add(args) => {
      let form = args.into_form(Utc::now().date_naive());
      let request = client.create_request(&form).await?;
      println!("{} ({} {})", Key::RequestCreated.text(lang), request.request_number, request.id);
    }
    RequestsCommand::Update { id, fields } => {
      let request = client.update_request(id, &fields.into_patch()).await?;
      println!("{} ({})", Key::RequestUpdated.text(lang), request.id);
    }
    RequestsCommand::Delete { id } => {
      client.delete_request(id).await?;
      println!("{} ({id})", Key::RequestDeleted.text(lang));
    }
  }
  Ok(())
}

async fn run_persons(client: &ApiClient, cmd: PersonsCommand, lang: Language) -> Result<()> {
  match cmd {
    PersonsCommand::List => {
      let persons = client.list_persons().await?;
      print!("{}", output::persons_table(&persons, lang));
    }
    PersonsCommand::Add(args) => {
      let person = client.create_person(&args.into_form()).await?;
      println!("{} ({})", Key::PersonCreated.text(lang), person.id);
    }
    PersonsCommand::Update { id, fields } => {
      let person = client.update_person(id, &fields.into_patch()).await?;
      println!("{} ({})", Key::PersonUpdated.text(lang), person.id);
    }
    PersonsCommand::Delete { id } => {
      let deleted = client.delete_person(id).await?;
      println!("{} ({id})", Key::PersonDeleted.text(lang));
      if deleted.dangling_requests > 0 {
        eprintln!(
          "warning: {} request(s) still reference this person and will show {}",
          deleted.dangling_requests,
          Key::NotAvailable.text(lang),
        );
      }
    }
  }
  Ok(())
}

async fn run_report(client: &ApiClient, cmd: ReportCommand, lang: Language) -> Result<()> {
  match cmd {
    ReportCommand::Summary(filter) => {
      let summary = client.summary(&filter.query()).await?;
      print!("{}", output::summary_table(&summary, lang));
    }
    ReportCommand::Export { filter, format, output } => {
      let body = client.export(&filter.query(), format, lang).await?;
      let path = output.unwrap_or_else(|| PathBuf::from(format.file_name(Utc::now().date_naive())));
      std::fs::write(&path, &body)
        .with_context(|| format!("writing export to {}", path.display()))?;
      println!("{}: {}", Key::Export.text(lang), path.display());
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_definition_is_consistent() {
    use clap::CommandFactory as _;
    Cli::command().debug_assert();
  }

  #[test]
  fn flags_override_file_which_overrides_default() {
    let file = ConfigFile { url: "http://file:1".into(), lang: Some(Language::Th) };
    let (cfg, lang) = resolve(Some("http://flag:2".into()), None, file);
    assert_eq!(cfg.base_url, "http://flag:2");
    assert_eq!(lang, Language::Th);

    let (cfg, lang) = resolve(None, None, ConfigFile::default());
    assert_eq!(cfg.base_url, DEFAULT_URL);
    assert_eq!(lang, Language::En);
  }

  #[test]
  fn config_file_parses_from_toml() {
    let cfg: ConfigFile = toml::from_str("url = \"http://desk:8080\"\nlang = \"th\"\n").unwrap();
    assert_eq!(cfg.url, "http://desk:8080");
    assert_eq!(cfg.lang, Some(Language::Th));
  }

  #[test]
  fn filter_args_become_query_pairs() {
    let cli = Cli::try_parse_from([
      "repairdesk", "requests", "list", "-q", "acme", "--status", "completed", "--from",
      "2024-01-01", "--to", "2024-01-31",
    ])
    .unwrap();
    let Command::Requests(RequestsCommand::List(filter)) = cli.command else {
      panic!("expected requests list");
    };
    assert_eq!(
      filter.query(),
      [
        ("q", "acme".to_string()),
        ("status", "completed".to_string()),
        ("from", "2024-01-01".to_string()),
        ("to", "2024-01-31".to_string()),
      ]
    );
  }

  #[test]
  fn half_open_date_range_is_rejected_locally() {
    let parsed = Cli::try_parse_from(["repairdesk", "report", "summary", "--from", "2024-01-01"]);
    assert!(parsed.is_err());
  }

  #[test]
  fn add_defaults_request_date_to_today() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let form = RequestArgs { requester: Some("Alice".into()), ..Default::default() }.into_form(today);
    assert_eq!(form.request_date, Some(today));
    assert!(form.request_number.is_empty());
    assert_eq!(form.requester, "Alice");
  }

  #[test]
  fn update_sends_only_given_fields() {
    let cli = Cli::try_parse_from([
      "repairdesk",
      "requests",
      "update",
      "00000000-0000-0000-0000-000000000000",
      "--status",
      "cancelled",
    ])
    .unwrap();
    let Command::Requests(RequestsCommand::Update { fields, .. }) = cli.command else {
      panic!("expected requests update");
    };
    assert_eq!(fields.into_patch(), RequestPatch::status(Status::Cancelled));
  }
}
