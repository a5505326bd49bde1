// src/services/classifier.rs

//! Detail classifier.
//!
//! One attempt is a single bounded request whose result is folded into an
//! [`AttemptOutcome`]. [`DetailClassifier::classify`] drives the attempts,
//! sleeping for the configured backoff between them, and turns the first
//! usable record into a [`Classification`].

use std::fmt;

use crate::models::{CatalogEntry, ClassifierConfig, DetailPayload, DetailRecord};
use crate::services::{DetailResponse, DetailSource};
use crate::utils::{http, pause};

/// Result of a single detail attempt.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The payload reported success for the id
    Ok(DetailRecord),
    /// Well-formed payload, but no success for the id
    Unsuccessful,
    /// The attempt did not finish within its timeout
    TimedOut,
    /// Connection or body read failed
    Transport(String),
    /// Non-success HTTP status
    Status(u16),
    /// Response was not JSON
    InvalidContentType(Option<String>),
    /// JSON body that does not match the payload shape
    Malformed(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(_) => write!(f, "ok"),
            Self::Unsuccessful => write!(f, "payload did not report success"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::InvalidContentType(Some(ct)) => write!(f, "non-JSON response ({ct})"),
            Self::InvalidContentType(None) => write!(f, "response without content type"),
            Self::Malformed(e) => write!(f, "malformed payload: {e}"),
        }
    }
}

/// Final decision for one candidate.
#[derive(Debug, Clone)]
pub enum Classification {
    /// Declared type matches the target
    Accept,
    /// Reported success with another type, or a definitive non-success
    Skip { item_type: Option<String> },
    /// Every attempt failed
    Fail {
        attempts: u32,
        last: AttemptOutcome,
    },
}

/// Classifies catalog entries through the detail endpoint.
#[derive(Debug, Clone)]
pub struct DetailClassifier {
    config: ClassifierConfig,
}

impl DetailClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify one entry, retrying failed attempts up to the budget.
    pub async fn classify(&self, source: &dyn DetailSource, entry: &CatalogEntry) -> Classification {
        let max_attempts = self.config.max_attempts.max(1);
        let mut last = AttemptOutcome::TimedOut;

        for attempt in 1..=max_attempts {
            match self.attempt(source, entry.id).await {
                AttemptOutcome::Ok(record) => return self.decide(&record),
                AttemptOutcome::Unsuccessful if !self.config.retry_unsuccessful => {
                    return Classification::Skip { item_type: None };
                }
                outcome => {
                    log::warn!(
                        "Attempt {}/{} failed for {} ({}): {}",
                        attempt,
                        max_attempts,
                        entry.name,
                        entry.id,
                        outcome
                    );
                    last = outcome;
                }
            }

            if attempt < max_attempts {
                pause(self.config.retry_backoff()).await;
            }
        }

        Classification::Fail {
            attempts: max_attempts,
            last,
        }
    }

    /// Run a single attempt under the per-attempt timeout.
    pub async fn attempt(&self, source: &dyn DetailSource, id: u64) -> AttemptOutcome {
        match tokio::time::timeout(self.config.attempt_timeout(), source.fetch_detail(id)).await {
            Err(_) => AttemptOutcome::TimedOut,
            Ok(Err(e)) => AttemptOutcome::Transport(e.to_string()),
            Ok(Ok(response)) => Self::interpret(id, &response),
        }
    }

    /// Validate a raw response and pick out the record for `id`.
    pub fn interpret(id: u64, response: &DetailResponse) -> AttemptOutcome {
        if !(200..300).contains(&response.status) {
            return AttemptOutcome::Status(response.status);
        }
        if !http::is_json(response.content_type.as_deref()) {
            return AttemptOutcome::InvalidContentType(response.content_type.clone());
        }

        let mut payload: DetailPayload = match serde_json::from_str(&response.body) {
            Ok(payload) => payload,
            Err(e) => return AttemptOutcome::Malformed(e.to_string()),
        };

        match payload.remove(&id.to_string()) {
            Some(record) if record.success => AttemptOutcome::Ok(record),
            _ => AttemptOutcome::Unsuccessful,
        }
    }

    fn decide(&self, record: &DetailRecord) -> Classification {
        match record.item_type() {
            Some(kind) if kind == self.config.target_type => Classification::Accept,
            other => Classification::Skip {
                item_type: other.map(str::to_string),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a fixed list of responses, repeating the last one.
    struct Scripted {
        responses: Mutex<Vec<ScriptedReply>>,
        calls: Mutex<u32>,
    }

    #[derive(Clone)]
    enum ScriptedReply {
        Reply(DetailResponse),
        Error,
        Hang,
    }

    impl Scripted {
        fn new(responses: Vec<ScriptedReply>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl DetailSource for Scripted {
        async fn fetch_detail(&self, _id: u64) -> Result<DetailResponse> {
            *self.calls.lock().unwrap() += 1;
            let reply = {
                let mut responses = self.responses.lock().unwrap();
                if responses.len() > 1 {
                    responses.remove(0)
                } else {
                    responses[0].clone()
                }
            };
            match reply {
                ScriptedReply::Reply(r) => Ok(r),
                ScriptedReply::Error => Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))),
                ScriptedReply::Hang => std::future::pending().await,
            }
        }
    }

    fn classifier() -> DetailClassifier {
        DetailClassifier::new(ClassifierConfig::default())
    }

    fn typed(id: u64, kind: &str) -> ScriptedReply {
        ScriptedReply::Reply(DetailResponse::json(format!(
            r#"{{"{id}":{{"success":true,"data":{{"type":"{kind}"}}}}}}"#
        )))
    }

    #[test]
    fn test_interpret_success() {
        let response = DetailResponse::json(r#"{"42":{"success":true,"data":{"type":"game"}}}"#);
        assert!(matches!(
            DetailClassifier::interpret(42, &response),
            AttemptOutcome::Ok(_)
        ));
    }

    #[test]
    fn test_interpret_rejects_html() {
        let response = DetailResponse {
            status: 200,
            content_type: Some("text/html; charset=UTF-8".into()),
            body: "<html>Access Denied</html>".into(),
        };
        assert!(matches!(
            DetailClassifier::interpret(1, &response),
            AttemptOutcome::InvalidContentType(Some(_))
        ));
    }

    #[test]
    fn test_interpret_bad_status() {
        let mut response = DetailResponse::json("null");
        response.status = 429;
        assert!(matches!(
            DetailClassifier::interpret(1, &response),
            AttemptOutcome::Status(429)
        ));
    }

    #[test]
    fn test_interpret_malformed_and_missing_key() {
        let response = DetailResponse::json("null");
        assert!(matches!(
            DetailClassifier::interpret(1, &response),
            AttemptOutcome::Malformed(_)
        ));

        let response = DetailResponse::json(r#"{"2":{"success":true}}"#);
        assert!(matches!(
            DetailClassifier::interpret(1, &response),
            AttemptOutcome::Unsuccessful
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_accept_and_skip() {
        let source = Scripted::new(vec![typed(42, "game")]);
        let entry = CatalogEntry::new(42, "Portal");
        assert!(matches!(
            classifier().classify(&source, &entry).await,
            Classification::Accept
        ));

        let source = Scripted::new(vec![typed(42, "dlc")]);
        match classifier().classify(&source, &entry).await {
            Classification::Skip { item_type } => assert_eq!(item_type.as_deref(), Some("dlc")),
            other => panic!("expected skip, got {other:?}"),
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_retries_after_transport_error() {
        let source = Scripted::new(vec![ScriptedReply::Error, typed(5, "game")]);
        let start = tokio::time::Instant::now();

        let result = classifier().classify(&source, &CatalogEntry::new(5, "X")).await;

        assert!(matches!(result, Classification::Accept));
        assert_eq!(source.calls(), 2);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_retries_after_html_reply() {
        let html = ScriptedReply::Reply(DetailResponse {
            status: 200,
            content_type: Some("text/html; charset=UTF-8".into()),
            body: "<html>Access Denied</html>".into(),
        });
        let source = Scripted::new(vec![html, typed(11, "game")]);

        let result = classifier().classify(&source, &CatalogEntry::new(11, "Y")).await;

        assert!(matches!(result, Classification::Accept));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_retries_after_bad_status() {
        let mut throttled = DetailResponse::json("null");
        throttled.status = 429;
        let source = Scripted::new(vec![ScriptedReply::Reply(throttled), typed(12, "game")]);

        let result = classifier().classify(&source, &CatalogEntry::new(12, "Z")).await;

        assert!(matches!(result, Classification::Accept));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_classify_timeout_exhausts_budget() {
        let source = Scripted::new(vec![ScriptedReply::Hang]);
        let result = classifier().classify(&source, &CatalogEntry::new(7, "Slow")).await;

        match result {
            Classification::Fail { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(last, AttemptOutcome::TimedOut));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsuccessful_payload_policy() {
        let unsuccessful =
            ScriptedReply::Reply(DetailResponse::json(r#"{"9":{"success":false}}"#));
        let entry = CatalogEntry::new(9, "Delisted");

        let source = Scripted::new(vec![unsuccessful.clone()]);
        assert!(matches!(
            classifier().classify(&source, &entry).await,
            Classification::Fail { .. }
        ));
        assert_eq!(source.calls(), 2);

        let lenient = DetailClassifier::new(ClassifierConfig {
            retry_unsuccessful: false,
            ..ClassifierConfig::default()
        });
        let source = Scripted::new(vec![unsuccessful]);
        assert!(matches!(
            lenient.classify(&source, &entry).await,
            Classification::Skip { item_type: None }
        ));
        assert_eq!(source.calls(), 1);
    }
}
