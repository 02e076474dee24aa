//! Open Trivia DB question source.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::data::decode_text;
use crate::models::{Question, QuestionRecord};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur while fetching the question batch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The request did not complete in time.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The service answered but reported a problem in `response_code`.
    #[error("trivia API error {code}: {}", describe_response_code(.code))]
    Api { code: u8 },

    /// The body was not the expected JSON envelope.
    #[error("failed to parse response: {0}")]
    Decode(String),

    /// The batch contained no questions.
    #[error("the trivia API returned no questions")]
    Empty,
}

fn describe_response_code(code: &u8) -> &'static str {
    match *code {
        1 => "not enough questions for the query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited, try again in a few seconds",
        _ => "unknown response code",
    }
}

#[derive(Deserialize)]
struct TriviaResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<QuestionRecord>,
}

/// Client for the Open Trivia DB `api.php` endpoint.
pub struct OpenTdbClient {
    api_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenTdbClient {
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            api_url: api_url.to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch `amount` questions. Either the whole batch arrives or an error does.
    #[instrument(skip(self), fields(url = %self.api_url))]
    pub async fn fetch(&self, amount: usize) -> Result<Vec<Question>, FetchError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("amount", amount)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout_secs)
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, "trivia API returned an error status");
            return Err(error_from_status(status, &body));
        }

        let payload: TriviaResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if payload.response_code != 0 {
            warn!(code = payload.response_code, "trivia API rejected the request");
            return Err(FetchError::Api {
                code: payload.response_code,
            });
        }
        if payload.results.is_empty() {
            return Err(FetchError::Empty);
        }

        let questions = shuffle_records(payload.results);
        info!(count = questions.len(), "fetched questions");
        Ok(questions)
    }
}

/// Error statuses may still carry the API envelope, e.g. 429 with code 5.
fn error_from_status(status: u16, body: &str) -> FetchError {
    match serde_json::from_str::<TriviaResponse>(body) {
        Ok(payload) if payload.response_code != 0 => FetchError::Api {
            code: payload.response_code,
        },
        _ => FetchError::Http {
            status,
            body: body_snippet(body),
        },
    }
}

/// Plain-text head of an error body, short enough for the failure screen.
fn body_snippet(body: &str) -> String {
    let text = decode_text(body);
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{head}...")
    } else {
        text
    }
}

fn shuffle_records(records: Vec<QuestionRecord>) -> Vec<Question> {
    let mut rng = rand::thread_rng();
    records
        .into_iter()
        .map(|record| Question::from_record(record, &mut rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(n: usize) -> serde_json::Value {
        serde_json::json!({
            "type": "multiple",
            "difficulty": "easy",
            "category": "General Knowledge",
            "question": format!("Question &quot;{n}&quot;?"),
            "correct_answer": format!("right {n}"),
            "incorrect_answers": ["wrong a", "wrong b", "wrong c"]
        })
    }

    fn client_for(server: &MockServer) -> OpenTdbClient {
        OpenTdbClient::new(&format!("{}/api.php", server.uri()), 5).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_decodes_a_batch() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "response_code": 0,
            "results": (0..15).map(record).collect::<Vec<_>>()
        });

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let questions = client_for(&server).fetch(15).await.unwrap();

        assert_eq!(questions.len(), 15);
        assert_eq!(questions[3].prompt, "Question \"3\"?");
        assert_eq!(questions[3].correct_answer, "right 3");
        assert_eq!(questions[3].options.len(), 4);
        assert!(questions[3].options.contains(&"right 3".to_string()));
    }

    #[tokio::test]
    async fn non_zero_response_code_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 5, "results": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Api { code: 5 }));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        match err {
            FetchError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_status_keeps_the_api_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(serde_json::json!({"response_code": 5, "results": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Api { code: 5 }));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn html_error_page_is_shortened_to_text() {
        let server = MockServer::start().await;
        let page = format!(
            "<!DOCTYPE html><html><head><style>body {{ color: red }}</style></head>\
             <body><h1>Bad Gateway</h1><p>{}</p></body></html>",
            "x".repeat(4000)
        );

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(502).set_body_string(page))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        let FetchError::Http { status, body } = err else {
            panic!("expected an HTTP error");
        };
        assert_eq!(status, 502);
        assert!(body.starts_with("Bad Gateway"));
        assert!(!body.contains('<'));
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 0, "results": []}))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = OpenTdbClient::new(&format!("{}/api.php", server.uri()), 1).unwrap();
        let err = client.fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(1)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 0, "results": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Empty));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let client = OpenTdbClient::new("http://127.0.0.1:9/api.php", 5).unwrap();
        let err = client.fetch(15).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
