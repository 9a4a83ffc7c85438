use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::notification::{ActionOperation, NotificationAction, NotificationCenter, NotificationKind, NotificationPayload};
use crate::sync::lock;

use super::console_models::Record;
use super::export::{export_csv, export_json, export_json_lines, select_fields, to_rows, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    JsonLines,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// What the export dialog submits. `fields: None` exports every field.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub filename: String,
    pub format: ExportFormat,
    pub fields: Option<Vec<String>>,
}

impl ExportRequest {
    pub fn new(filename: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
            fields: None,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub fields: Vec<String>,
    pub records: usize,
    pub content: String,
}

/// Fields offered for selection: the keys of the first record.
pub fn available_fields<T: Record>(records: &[T]) -> Result<Vec<String>> {
    Ok(to_rows(&records[..records.len().min(1)])?
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default())
}

/// Runs exports and keeps the most recent file, the way a browser
/// download would.
#[derive(Clone)]
pub struct ExportService {
    notifications: NotificationCenter,
    latest: Arc<Mutex<Option<ExportedFile>>>,
}

impl ExportService {
    pub fn new(notifications: NotificationCenter) -> Self {
        Self {
            notifications,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Export `records` and announce the outcome.
    ///
    /// Raises "Export Started", then either a success notification with an
    /// "Export Again" action plus a persistent "Export Analytics" summary, or
    /// a persistent failure notification with a "Retry" action. An empty
    /// field selection is rejected before anything is announced.
    pub fn export<T: Record>(&self, records: &[T], request: ExportRequest) -> Result<ExportedFile> {
        let job = ExportJob {
            rows: Arc::new(to_rows(records)?),
            request,
            latest: Arc::clone(&self.latest),
        };
        job.run(&self.notifications)
    }

    pub fn latest_export(&self) -> Option<ExportedFile> {
        lock(&self.latest).clone()
    }
}

/// A snapshot of the rows plus the request, so the same export can run
/// again from a notification action.
#[derive(Clone)]
struct ExportJob {
    rows: Arc<Vec<Row>>,
    request: ExportRequest,
    latest: Arc<Mutex<Option<ExportedFile>>>,
}

impl ExportJob {
    fn selected_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = match &self.request.fields {
            Some(fields) => fields.clone(),
            None => self
                .rows
                .first()
                .map(|row| row.keys().cloned().collect())
                .unwrap_or_default(),
        };
        let mut seen = std::collections::HashSet::new();
        fields.retain(|field| seen.insert(field.clone()));
        fields
    }

    fn run(&self, center: &NotificationCenter) -> Result<ExportedFile> {
        let fields = self.selected_fields();
        if fields.is_empty() {
            return Err(AppError::Validation("Select at least one field to export".to_string()));
        }
        center.ensure_accepting()?;

        let format = self.request.format;
        let records = self.rows.len();
        center.try_add_notification(
            NotificationPayload::new(
                "Export Started",
                format!("Preparing {} records for export in {} format", records, format),
                NotificationKind::Info,
            )
            .with_auto_close(true),
        );

        match self.render(&fields) {
            Ok(content) => {
                let file = ExportedFile {
                    file_name: format!("{}.{}", self.request.filename, format.extension()),
                    format,
                    fields,
                    records,
                    content,
                };
                *lock(&self.latest) = Some(file.clone());
                info!("Exported {} records to {}", records, file.file_name);

                center.try_add_notification(
                    NotificationPayload::new(
                        "Export completed successfully",
                        format!("{} records exported successfully as {}", records, file.file_name),
                        NotificationKind::Success,
                    )
                    .with_auto_close(true)
                    .with_action(NotificationAction::new("Export Again", RerunExport(self.clone()))),
                );
                center.try_add_notification(
                    NotificationPayload::new(
                        "Export Analytics",
                        format!(
                            "Export included {} fields from {} total records",
                            file.fields.len(),
                            records
                        ),
                        NotificationKind::Info,
                    )
                    .persistent(),
                );
                Ok(file)
            }
            Err(e) => {
                center.try_add_notification(
                    NotificationPayload::new(
                        "Export failed",
                        format!("Export failed: {}", e),
                        NotificationKind::Error,
                    )
                    .persistent()
                    .with_action(NotificationAction::new("Retry", RerunExport(self.clone()))),
                );
                Err(e)
            }
        }
    }

    fn render(&self, fields: &[String]) -> Result<String> {
        let rows = select_fields(&self.rows, fields)?;
        match self.request.format {
            ExportFormat::Json => export_json(&rows),
            ExportFormat::JsonLines => export_json_lines(&rows),
            ExportFormat::Csv => export_csv(&rows, fields),
        }
    }
}

/// "Export Again" and "Retry". A failed rerun has already raised its own
/// failure notification, so it is not reported a second time.
struct RerunExport(ExportJob);

impl ActionOperation for RerunExport {
    fn run(&self, center: &NotificationCenter) -> anyhow::Result<()> {
        if let Err(e) = self.0.run(center) {
            debug!("Export rerun of {} failed: {}", self.0.request.filename, e);
        }
        Ok(())
    }
}
