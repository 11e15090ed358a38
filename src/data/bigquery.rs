//! BigQuery REST integration (`jobs.query` + `jobs.getQueryResults`).
//!
//! Authentication is a plain OAuth bearer token read from the environment,
//! e.g. the output of `gcloud auth print-access-token`.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::DataSource;
use crate::domain::{FieldValue, RawRecord};
use crate::error::AppError;

const API_ROOT: &str = "https://bigquery.googleapis.com/bigquery/v2/projects";
const PAGE_SIZE: u32 = 10_000;
const QUERY_TIMEOUT_MS: u32 = 30_000;
/// `getQueryResults` calls allowed while waiting for `jobComplete`.
const MAX_COMPLETION_POLLS: usize = 20;

const ENV_PROJECT: &str = "MENTIONS_BQ_PROJECT";
const ENV_DATASET: &str = "MENTIONS_BQ_DATASET";
const ENV_TOKEN: &str = "MENTIONS_BQ_TOKEN";
const ENV_TOKEN_FALLBACK: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
const ENV_LOCATION: &str = "MENTIONS_BQ_LOCATION";

pub struct BigQueryClient {
    client: Client,
    project: String,
    dataset: String,
    token: String,
    location: Option<String>,
}

impl BigQueryClient {
    /// Build a client from `.env`/environment, letting explicit values win.
    pub fn from_env(project: Option<String>, dataset: Option<String>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let project = match project {
            Some(p) => p,
            None => std::env::var(ENV_PROJECT).map_err(|_| {
                AppError::config(format!("Missing {ENV_PROJECT} in environment (.env) and no --project given."))
            })?,
        };
        let dataset = match dataset {
            Some(d) => d,
            None => std::env::var(ENV_DATASET).map_err(|_| {
                AppError::config(format!("Missing {ENV_DATASET} in environment (.env) and no --dataset given."))
            })?,
        };
        let token = std::env::var(ENV_TOKEN)
            .or_else(|_| std::env::var(ENV_TOKEN_FALLBACK))
            .map_err(|_| {
                AppError::config(format!(
                    "Missing {ENV_TOKEN} in environment (.env). Try `gcloud auth print-access-token`."
                ))
            })?;
        let location = std::env::var(ENV_LOCATION).ok().filter(|l| !l.trim().is_empty());

        Ok(Self::new(project, dataset, token, location))
    }

    pub fn new(project: String, dataset: String, token: String, location: Option<String>) -> Self {
        Self {
            client: Client::new(),
            project,
            dataset,
            token,
            location,
        }
    }

    /// Fully qualified `project.dataset.table` id.
    pub fn table_id(&self, table: &str) -> String {
        format!("{}.{}.{}", self.project, self.dataset, table)
    }

    /// Run a standard-SQL query and collect every result row.
    pub fn query(&self, sql: &str) -> Result<Vec<RawRecord>, AppError> {
        let url = format!("{API_ROOT}/{}/queries", self.project);
        let body = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            timeout_ms: QUERY_TIMEOUT_MS,
            max_results: PAGE_SIZE,
            location: self.location.as_deref(),
        };
        let mut resp = send(self.client.post(&url).bearer_auth(&self.token).json(&body))?;

        let job_id = resp
            .job_reference
            .as_ref()
            .map(|j| j.job_id.clone())
            .ok_or_else(|| AppError::io("BigQuery response is missing jobReference."))?;

        let mut polls = 0usize;
        while !resp.job_complete.unwrap_or(true) {
            polls += 1;
            if polls > MAX_COMPLETION_POLLS {
                return Err(AppError::io(format!("BigQuery job {job_id} did not complete in time.")));
            }
            log::debug!("BigQuery job {job_id} still running (poll {polls})");
            resp = self.get_results(&job_id, None)?;
        }

        let schema = resp
            .schema
            .take()
            .ok_or_else(|| AppError::io("BigQuery response is missing a schema."))?;

        let mut out = Vec::new();
        append_rows(&schema, resp.rows.take().unwrap_or_default(), &mut out)?;

        while let Some(token) = resp.page_token.take() {
            resp = self.get_results(&job_id, Some(&token))?;
            append_rows(&schema, resp.rows.take().unwrap_or_default(), &mut out)?;
        }

        Ok(out)
    }

    fn get_results(&self, job_id: &str, page_token: Option<&str>) -> Result<QueryResponse, AppError> {
        let url = format!("{API_ROOT}/{}/queries/{job_id}", self.project);
        let mut req = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("maxResults", PAGE_SIZE.to_string()),
                ("timeoutMs", QUERY_TIMEOUT_MS.to_string()),
            ]);
        if let Some(token) = page_token {
            req = req.query(&[("pageToken", token)]);
        }
        if let Some(location) = &self.location {
            req = req.query(&[("location", location.as_str())]);
        }
        send(req)
    }
}

impl DataSource for BigQueryClient {
    fn describe(&self) -> String {
        format!("bigquery:{}.{}", self.project, self.dataset)
    }

    fn fetch(&self, table: &str) -> Result<Vec<RawRecord>, AppError> {
        let sql = format!("SELECT * FROM `{}`", self.table_id(table));
        log::debug!("BigQuery: {sql}");
        self.query(&sql)
    }
}

fn send(req: RequestBuilder) -> Result<QueryResponse, AppError> {
    let resp = req
        .send()
        .map_err(|e| AppError::io(format!("BigQuery request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let detail = resp
            .json::<ErrorResponse>()
            .map(|e| e.error.message)
            .unwrap_or_default();
        return Err(AppError::io(format!("BigQuery request failed with status {status}. {detail}")));
    }

    resp.json()
        .map_err(|e| AppError::io(format!("Failed to parse BigQuery response: {e}")))
}

fn append_rows(schema: &TableSchema, rows: Vec<TableRow>, out: &mut Vec<RawRecord>) -> Result<(), AppError> {
    out.reserve(rows.len());
    for row in rows {
        out.push(convert_row(schema, row)?);
    }
    Ok(())
}

/// Zip a row's cells with the schema, typing date-like columns.
fn convert_row(schema: &TableSchema, row: TableRow) -> Result<RawRecord, AppError> {
    if row.f.len() != schema.fields.len() {
        return Err(AppError::io(format!(
            "BigQuery row has {} cells but schema has {} fields.",
            row.f.len(),
            schema.fields.len()
        )));
    }

    let mut record = RawRecord::new();
    for (field, cell) in schema.fields.iter().zip(row.f) {
        record.insert(field.name.clone(), convert_cell(&field.kind, cell.v));
    }
    Ok(record)
}

fn convert_cell(kind: &str, v: Value) -> FieldValue {
    match v {
        Value::Null => FieldValue::Null,
        Value::String(s) => match kind {
            "TIMESTAMP" => parse_epoch_seconds(&s)
                .map(FieldValue::Timestamp)
                .unwrap_or(FieldValue::Text(s)),
            "DATE" => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Text(s)),
            _ => FieldValue::Text(s),
        },
        other => FieldValue::Text(other.to_string()),
    }
}

/// BigQuery renders `TIMESTAMP` cells as (possibly fractional) epoch seconds.
fn parse_epoch_seconds(s: &str) -> Option<DateTime<chrono::Utc>> {
    let secs: f64 = s.trim().parse().ok()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    timeout_ms: u32,
    max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    schema: Option<TableSchema>,
    rows: Option<Vec<TableRow>>,
    page_token: Option<String>,
    job_complete: Option<bool>,
    job_reference: Option<JobReference>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
struct TableField {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn schema() -> TableSchema {
        serde_json::from_value(json!({
            "fields": [
                {"name": "created_at", "type": "TIMESTAMP"},
                {"name": "Date", "type": "DATE"},
                {"name": "text", "type": "STRING"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn converts_typed_cells() {
        let row: TableRow = serde_json::from_value(json!({
            "f": [{"v": "1.7041032E9"}, {"v": "2024-01-01"}, {"v": null}]
        }))
        .unwrap();

        let record = convert_row(&schema(), row).unwrap();
        assert_eq!(
            record.get("created_at"),
            Some(&FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()))
        );
        assert_eq!(
            record.get("Date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        );
        assert_eq!(record.get("text"), Some(&FieldValue::Null));
    }

    #[test]
    fn unreadable_typed_cells_fall_back_to_text() {
        assert_eq!(
            convert_cell("TIMESTAMP", Value::String("soon".into())),
            FieldValue::Text("soon".into())
        );
        assert_eq!(
            convert_cell("STRING", json!(["a", "b"])),
            FieldValue::Text("[\"a\",\"b\"]".into())
        );
    }

    #[test]
    fn cell_count_mismatch_is_malformed() {
        let row: TableRow = serde_json::from_value(json!({"f": [{"v": "x"}]})).unwrap();
        assert!(convert_row(&schema(), row).is_err());
    }

    #[test]
    fn query_response_pages_deserialize() {
        let resp: QueryResponse = serde_json::from_value(json!({
            "kind": "bigquery#queryResponse",
            "jobReference": {"projectId": "p", "jobId": "job_1", "location": "US"},
            "jobComplete": true,
            "pageToken": "abc",
            "totalRows": "2"
        }))
        .unwrap();
        assert_eq!(resp.job_reference.unwrap().job_id, "job_1");
        assert_eq!(resp.page_token.as_deref(), Some("abc"));
        assert!(resp.rows.is_none());
    }

    #[test]
    fn table_id_is_fully_qualified() {
        let client = BigQueryClient::new("proj".into(), "ds".into(), "t".into(), None);
        assert_eq!(client.table_id("news_data"), "proj.ds.news_data");
        assert_eq!(client.describe(), "bigquery:proj.ds");
    }
}
