use chrono::NaiveDate;
use nl2sql_client::{Dispatcher, Nl2SqlClient, Outcome, RequestBuilder};
use std::fmt;
use tracing::{info, warn};

use crate::classify::{classify, missing_field, FieldPolicy, NO_RESPONSE_RECEIVED};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::{DatedReport, PersistOutcome};
use crate::source::load_queries;
use crate::types::{Query, ResultRecord};
use crate::util::preview;

const PREVIEW_CHARS: usize = 100;

/// Tally of how each query in a run concluded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub total: u32,
    pub succeeded: u32,
    pub timed_out: u32,
    pub api_errors: u32,
    pub invalid_json: u32,
    pub key_errors: u32,
}

impl RunStats {
    pub fn record(&mut self, outcome: &Outcome, policy: FieldPolicy) {
        self.total += 1;
        match outcome {
            Outcome::Success(_) if is_key_error(outcome, policy) => self.key_errors += 1,
            Outcome::Success(_) => self.succeeded += 1,
            Outcome::TimedOut => self.timed_out += 1,
            Outcome::TransportOrStatusError { .. } => self.api_errors += 1,
            Outcome::MalformedBody { .. } => self.invalid_json += 1,
        }
    }

    pub fn failed(&self) -> u32 {
        self.total - self.succeeded
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} succeeded={} timed_out={} api_errors={} invalid_json={} key_errors={}",
            self.total,
            self.succeeded,
            self.timed_out,
            self.api_errors,
            self.invalid_json,
            self.key_errors,
        )
    }
}

/// Records produced by one pass over the queries.
#[derive(Debug)]
pub struct HarnessRun {
    pub records: Vec<ResultRecord>,
    pub stats: RunStats,
}

/// Sends queries one at a time and classifies each outcome into a report row.
pub struct Harness<D> {
    builder: RequestBuilder,
    dispatcher: D,
    policy: FieldPolicy,
}

impl<D: Dispatcher> Harness<D> {
    pub fn new(builder: RequestBuilder, dispatcher: D, policy: FieldPolicy) -> Self {
        Self {
            builder,
            dispatcher,
            policy,
        }
    }

    /// One record per query, in input order. A failed query never stops the batch.
    pub async fn run(&self, queries: &[Query]) -> HarnessRun {
        let total = queries.len();
        let mut records = Vec::with_capacity(total);
        let mut stats = RunStats::default();

        for (i, query) in queries.iter().enumerate() {
            info!(index = i + 1, total, query = query.as_str(), "Processing query");

            let (payload, headers) = self.builder.build(query.as_str());
            let outcome = self.dispatcher.dispatch(&payload, &headers).await;
            let record = classify(query, &outcome, self.policy);

            log_outcome(query, &outcome, &record, self.policy);
            stats.record(&outcome, self.policy);
            records.push(record);
        }

        HarnessRun { records, stats }
    }
}

/// Whether `outcome` is a success body that the strict policy rejects.
fn is_key_error(outcome: &Outcome, policy: FieldPolicy) -> bool {
    match outcome {
        Outcome::Success(body) => policy == FieldPolicy::Strict && missing_field(body).is_some(),
        _ => false,
    }
}

fn log_outcome(query: &Query, outcome: &Outcome, record: &ResultRecord, policy: FieldPolicy) {
    match outcome {
        Outcome::Success(body) => {
            if is_key_error(outcome, policy) {
                warn!(
                    query = query.as_str(),
                    missing = missing_field(body).unwrap_or_default(),
                    response = %body,
                    "Missing expected key in response"
                );
            } else {
                info!(
                    generated_sql = %record.generated_sql,
                    db_response = %preview(&record.database_response, PREVIEW_CHARS),
                    "Received response"
                );
            }
        }
        Outcome::TimedOut => warn!(query = query.as_str(), "Request timed out"),
        Outcome::TransportOrStatusError { message, body } => warn!(
            query = query.as_str(),
            error = %message,
            response = body.as_deref().unwrap_or(NO_RESPONSE_RECEIVED),
            "Error sending request"
        ),
        Outcome::MalformedBody { raw } => warn!(
            query = query.as_str(),
            response = %preview(raw.as_deref().unwrap_or(NO_RESPONSE_RECEIVED), PREVIEW_CHARS),
            "Could not decode JSON response"
        ),
    }
}

/// Result of a complete run: what happened to each query and where it was saved.
#[derive(Debug)]
pub struct RunSummary {
    pub stats: RunStats,
    pub persisted: PersistOutcome,
}

/// Load queries, run them against the API, and merge the rows into the report for `date`.
pub async fn execute(config: &HarnessConfig, date: NaiveDate) -> Result<RunSummary, HarnessError> {
    let queries = load_queries(&config.input)?;

    let client = Nl2SqlClient::with_timeout(&config.api_url, config.timeout)?;
    let builder = RequestBuilder::new(config.payload.clone(), config.headers.clone());
    let harness = Harness::new(builder, client, config.field_policy);

    let run = harness.run(&queries).await;
    info!("Testing complete. {}", run.stats);

    let report = DatedReport::new(&config.output_dir, &config.report_name);
    let persisted = report.persist(date, run.records)?;
    match &persisted {
        PersistOutcome::Written { path, rows } => {
            info!(path = %path.display(), rows, "Results saved")
        }
        PersistOutcome::Empty => info!("No test results to save"),
    }

    Ok(RunSummary {
        stats: run.stats,
        persisted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{API_ERROR, REQUEST_TIMEOUT};
    use async_trait::async_trait;
    use nl2sql_client::{Headers, PayloadTemplate, RequestPayload};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes and remembers which queries it was sent.
    struct ScriptedDispatcher {
        outcomes: Mutex<VecDeque<Outcome>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedDispatcher {
        fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Dispatcher for ScriptedDispatcher {
        async fn dispatch(&self, payload: &RequestPayload, _headers: &Headers) -> Outcome {
            self.seen.lock().unwrap().push(payload.user_query.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("more dispatches than scripted outcomes")
        }
    }

    fn harness(outcomes: Vec<Outcome>, policy: FieldPolicy) -> Harness<ScriptedDispatcher> {
        Harness::new(
            RequestBuilder::new(PayloadTemplate::default(), Headers::default()),
            ScriptedDispatcher::new(outcomes),
            policy,
        )
    }

    fn queries(texts: &[&str]) -> Vec<Query> {
        texts.iter().filter_map(|t| Query::new(t)).collect()
    }

    #[tokio::test]
    async fn every_query_gets_a_record_in_order() {
        let h = harness(
            vec![
                Outcome::Success(json!({ "sql_query": "SELECT 1", "db_response": [1] })),
                Outcome::TransportOrStatusError {
                    message: "connection reset".to_string(),
                    body: None,
                },
                Outcome::MalformedBody { raw: None },
            ],
            FieldPolicy::Lenient,
        );
        let qs = queries(&["first", "second", "first"]);

        let run = h.run(&qs).await;

        let asked: Vec<&str> = run.records.iter().map(|r| r.original_query.as_str()).collect();
        assert_eq!(asked, vec!["first", "second", "first"]);
        assert_eq!(*h.dispatcher.seen.lock().unwrap(), vec!["first", "second", "first"]);
        assert_eq!(run.records[1].generated_sql, API_ERROR);
        assert_eq!(run.stats.total, 3);
        assert_eq!(run.stats.succeeded, 1);
        assert_eq!(run.stats.failed(), 2);
    }

    #[tokio::test]
    async fn timeout_does_not_stop_later_queries() {
        let h = harness(
            vec![
                Outcome::TimedOut,
                Outcome::Success(json!({ "sql_query": "SELECT 2", "db_response": "ok" })),
            ],
            FieldPolicy::Lenient,
        );

        let run = h.run(&queries(&["slow", "fast"])).await;

        assert_eq!(run.records[0].generated_sql, REQUEST_TIMEOUT);
        assert_eq!(run.records[0].database_response, REQUEST_TIMEOUT);
        assert_eq!(run.records[1], ResultRecord::new("fast", "SELECT 2", "ok"));
        assert_eq!(run.stats.timed_out, 1);
    }

    #[tokio::test]
    async fn strict_policy_counts_key_errors() {
        let h = harness(
            vec![Outcome::Success(json!({ "sql_query": "SELECT 1" }))],
            FieldPolicy::Strict,
        );

        let run = h.run(&queries(&["ping"])).await;

        assert_eq!(run.stats.key_errors, 1);
        assert_eq!(run.stats.succeeded, 0);
    }

    #[tokio::test]
    async fn lenient_sentinel_lookalike_sql_is_a_success() {
        let body = json!({ "sql_query": "Response Key Error", "db_response": [] });
        let h = harness(vec![Outcome::Success(body.clone())], FieldPolicy::Lenient);

        let run = h.run(&queries(&["echo"])).await;

        assert!(!is_key_error(&Outcome::Success(body), FieldPolicy::Lenient));
        assert_eq!(run.stats.succeeded, 1);
        assert_eq!(run.stats.key_errors, 0);
    }

    #[test]
    fn key_error_requires_strict_policy_and_missing_field() {
        let partial = Outcome::Success(json!({ "sql_query": "SELECT 1" }));
        let complete = Outcome::Success(json!({ "sql_query": "SELECT 1", "db_response": 1 }));

        assert!(is_key_error(&partial, FieldPolicy::Strict));
        assert!(!is_key_error(&partial, FieldPolicy::Lenient));
        assert!(!is_key_error(&complete, FieldPolicy::Strict));
        assert!(!is_key_error(&Outcome::TimedOut, FieldPolicy::Strict));
    }

    #[test]
    fn stats_display() {
        let mut stats = RunStats::default();
        stats.record(&Outcome::TimedOut, FieldPolicy::Lenient);
        assert_eq!(
            stats.to_string(),
            "total=1 succeeded=0 timed_out=1 api_errors=0 invalid_json=0 key_errors=0"
        );
    }
}
