//! DuckDB-backed parse-run and feedback store.

use std::path::Path;

use arrow::array::{Array, Int64Array, LargeStringArray, StringArray, StringViewArray};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use cryptonews_core::{EvalCase, FeedbackSubmission};
use duckdb::{Connection, params};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{ParseRun, ParseStore, StoreError};

const SCHEMA: &str = "
CREATE SEQUENCE IF NOT EXISTS parse_runs_seq START 1;
CREATE TABLE IF NOT EXISTS parse_runs (
    id BIGINT PRIMARY KEY DEFAULT nextval('parse_runs_seq'),
    created_at BIGINT NOT NULL,
    input_id VARCHAR,
    source_url VARCHAR,
    source_name VARCHAR,
    source_published_at VARCHAR,
    text VARCHAR NOT NULL,
    response_json VARCHAR NOT NULL,
    schema_version VARCHAR NOT NULL,
    model_version VARCHAR NOT NULL
);
CREATE SEQUENCE IF NOT EXISTS feedback_seq START 1;
CREATE TABLE IF NOT EXISTS feedback (
    id BIGINT PRIMARY KEY DEFAULT nextval('feedback_seq'),
    created_at BIGINT NOT NULL,
    parse_run_id BIGINT,
    input_id VARCHAR,
    text VARCHAR,
    expected_json VARCHAR NOT NULL,
    notes VARCHAR
);
";

/// DuckDB store for parse runs and feedback.
///
/// Use [`open`](Self::open) for an ephemeral in-memory database and
/// [`open_persistent`](Self::open_persistent) for a file that survives
/// restarts. Both create the schema if it is missing.
pub struct DuckStore {
    conn: Connection,
}

impl DuckStore {
    /// Open an in-memory DuckDB database.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Open or create a persistent DuckDB database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "opened parse store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ── Counts ──

    pub fn parse_run_count(&self) -> Result<usize, StoreError> {
        self.count_table("parse_runs")
    }

    pub fn feedback_count(&self) -> Result<usize, StoreError> {
        self.count_table("feedback")
    }

    fn count_table(&self, table: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {table}");
        let batches = self.query_arrow(&sql)?;
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Lookups ──

    /// Latest run carrying the given caller-supplied input id.
    fn latest_run_for_input(&self, input_id: &str) -> Result<Option<(i64, String)>, StoreError> {
        let result = self.conn.query_row(
            "SELECT id, text FROM parse_runs WHERE input_id = ? ORDER BY id DESC LIMIT 1",
            [input_id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        );
        match result {
            Ok(found) => Ok(Some(found)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }
}

impl ParseStore for DuckStore {
    fn store_parse(&self, run: ParseRun<'_>) -> Result<i64, StoreError> {
        let response_json = serde_json::to_string(run.record)?;
        let id: i64 = self.conn.query_row(
            "INSERT INTO parse_runs (created_at, input_id, source_url, source_name, \
             source_published_at, text, response_json, schema_version, model_version) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
            params![
                Utc::now().timestamp(),
                run.meta.input_id,
                run.meta.source_url,
                run.meta.source_name,
                run.meta.source_published_at,
                run.text,
                response_json,
                run.record.schema_version,
                run.record.model_version,
            ],
            |row| row.get(0),
        )?;
        debug!(parse_id = id, "stored parse run");
        Ok(id)
    }

    fn load_text(&self, parse_id: i64) -> Result<Option<String>, StoreError> {
        let result = self.conn.query_row(
            "SELECT text FROM parse_runs WHERE id = ?",
            [parse_id],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(text) => Ok(Some(text)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store_feedback(&self, submission: &FeedbackSubmission) -> Result<i64, StoreError> {
        if !submission.is_correlated() {
            return Err(StoreError::Uncorrelated);
        }

        let input_id = submission
            .input_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (parse_run_id, text) = match (submission.parse_id, input_id) {
            (Some(id), _) => {
                let text = self.load_text(id)?.ok_or(StoreError::ParseNotFound(id))?;
                (Some(id), Some(text))
            }
            (None, Some(input_id)) => match self.latest_run_for_input(input_id)? {
                Some((id, text)) => (Some(id), Some(text)),
                None => (None, None),
            },
            (None, None) => return Err(StoreError::Uncorrelated),
        };

        let expected_json = serde_json::to_string(&submission.expected)?;
        let id: i64 = self.conn.query_row(
            "INSERT INTO feedback (created_at, parse_run_id, input_id, text, expected_json, notes) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            params![
                Utc::now().timestamp(),
                parse_run_id,
                input_id,
                text,
                expected_json,
                submission.notes,
            ],
            |row| row.get(0),
        )?;
        debug!(feedback_id = id, parse_run_id, "stored feedback");
        Ok(id)
    }

    fn export_feedback(&self) -> Result<Vec<EvalCase>, StoreError> {
        let batches = self.query_arrow(
            "SELECT f.id, COALESCE(f.text, p.text) AS text, f.expected_json \
             FROM feedback f LEFT JOIN parse_runs p ON p.id = f.parse_run_id \
             ORDER BY f.id",
        )?;

        let mut cases = Vec::new();
        for batch in &batches {
            let ids = batch
                .column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| StoreError::Other("feedback id column not i64".into()))?;
            for row in 0..batch.num_rows() {
                let Some(text) = get_string(batch.column(1).as_ref(), row) else {
                    continue;
                };
                let expected_json = get_string(batch.column(2).as_ref(), row)
                    .ok_or_else(|| StoreError::Other("feedback row missing expected_json".into()))?;
                let expected: Map<String, Value> = serde_json::from_str(&expected_json)?;
                cases.push(EvalCase {
                    id: format!("feedback-{}", ids.value(row)),
                    text,
                    expected,
                });
            }
        }
        info!(count = cases.len(), "exported feedback");
        Ok(cases)
    }
}

fn get_string(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    col.as_any()
        .downcast_ref::<StringArray>()
        .map(|arr| arr.value(row).to_string())
        .or_else(|| {
            col.as_any()
                .downcast_ref::<LargeStringArray>()
                .map(|arr| arr.value(row).to_string())
        })
        .or_else(|| {
            col.as_any()
                .downcast_ref::<StringViewArray>()
                .map(|arr| arr.value(row).to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptonews_core::{
        EventType, Jurisdiction, JurisdictionBasis, LegacyEventType, LegacyJurisdiction,
        ParseRecord, SCHEMA_VERSION, Sentiment, SourceMeta,
    };

    fn record() -> ParseRecord {
        ParseRecord {
            event_type: EventType::Unknown,
            legacy_event_type: LegacyEventType::Unknown,
            event_subtype: None,
            topics: vec![],
            assets: vec![],
            entities: vec![],
            jurisdiction: Jurisdiction::Global,
            jurisdiction_basis: JurisdictionBasis::None,
            jurisdiction_confidence: 0.5,
            legacy_jurisdiction: LegacyJurisdiction::Global,
            sentiment: Sentiment::Neutral,
            impact_score: 0.2,
            confidence: 0.4,
            market_direction: None,
            systemic_risk: None,
            retail_relevant: None,
            time_horizon: None,
            schema_version: SCHEMA_VERSION.into(),
            model_version: "test-model".into(),
        }
    }

    fn store_run(store: &DuckStore, text: &str, input_id: Option<&str>) -> i64 {
        let meta = SourceMeta {
            input_id: input_id.map(str::to_string),
            source_url: Some("https://example.com/a".into()),
            ..Default::default()
        };
        let record = record();
        store
            .store_parse(ParseRun {
                text,
                meta: &meta,
                record: &record,
            })
            .unwrap()
    }

    fn submission(parse_id: Option<i64>, input_id: Option<&str>) -> FeedbackSubmission {
        let mut expected = Map::new();
        expected.insert("event_type".into(), Value::from("SECURITY_INCIDENT"));
        FeedbackSubmission {
            parse_id,
            input_id: input_id.map(str::to_string),
            expected,
            notes: Some("missed the hack".into()),
        }
    }

    #[test]
    fn open_in_memory_creates_schema() {
        let store = DuckStore::open().unwrap();
        assert_eq!(store.parse_run_count().unwrap(), 0);
        assert_eq!(store.feedback_count().unwrap(), 0);
    }

    #[test]
    fn parse_runs_get_increasing_ids() {
        let store = DuckStore::open().unwrap();
        let a = store_run(&store, "first", None);
        let b = store_run(&store, "second", None);
        assert!(b > a);
        assert_eq!(store.load_text(a).unwrap().as_deref(), Some("first"));
        assert_eq!(store.load_text(9999).unwrap(), None);
        assert_eq!(store.parse_run_count().unwrap(), 2);
    }

    #[test]
    fn response_json_is_stored() {
        let store = DuckStore::open().unwrap();
        let id = store_run(&store, "text", None);
        let sql = format!("SELECT response_json, model_version FROM parse_runs WHERE id = {id}");
        let batches = store.query_arrow(&sql).unwrap();
        let json = get_string(batches[0].column(0).as_ref(), 0).unwrap();
        let stored: ParseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(stored, record());
        assert_eq!(get_string(batches[0].column(1).as_ref(), 0).as_deref(), Some("test-model"));
    }

    #[test]
    fn feedback_by_parse_id() {
        let store = DuckStore::open().unwrap();
        let run = store_run(&store, "Exchange drained overnight", None);
        let fb = store.store_feedback(&submission(Some(run), None)).unwrap();
        assert!(fb >= 1);
        assert_eq!(store.feedback_count().unwrap(), 1);
    }

    #[test]
    fn feedback_unknown_parse_id_is_not_found() {
        let store = DuckStore::open().unwrap();
        let err = store.store_feedback(&submission(Some(42), None)).unwrap_err();
        assert!(matches!(err, StoreError::ParseNotFound(42)));
        assert_eq!(store.feedback_count().unwrap(), 0);
    }

    #[test]
    fn feedback_requires_correlation() {
        let store = DuckStore::open().unwrap();
        let err = store.store_feedback(&submission(None, Some("  "))).unwrap_err();
        assert!(matches!(err, StoreError::Uncorrelated));
    }

    #[test]
    fn input_id_links_latest_run() {
        let store = DuckStore::open().unwrap();
        store_run(&store, "old text", Some("art-1"));
        store_run(&store, "new text", Some("art-1"));
        store.store_feedback(&submission(None, Some("art-1"))).unwrap();

        let cases = store.export_feedback().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].text, "new text");
    }

    #[test]
    fn export_skips_feedback_without_text() {
        let store = DuckStore::open().unwrap();
        let run = store_run(&store, "Exchange drained overnight", None);
        let linked = store.store_feedback(&submission(Some(run), None)).unwrap();
        store.store_feedback(&submission(None, Some("never-parsed"))).unwrap();

        let cases = store.export_feedback().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, format!("feedback-{linked}"));
        assert_eq!(cases[0].text, "Exchange drained overnight");
        assert_eq!(cases[0].expected["event_type"], "SECURITY_INCIDENT");
        assert_eq!(store.feedback_count().unwrap(), 2);
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("runs.duckdb");

        let store = DuckStore::open_persistent(&db_path).unwrap();
        let id = store_run(&store, "kept", None);
        drop(store);

        assert!(db_path.exists());
        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert_eq!(store.load_text(id).unwrap().as_deref(), Some("kept"));

        // Sequences continue rather than restarting.
        let next = store_run(&store, "later", None);
        assert!(next > id);
    }
}
