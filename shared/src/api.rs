use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CHECKOUT_ENDPOINT, QUIZ_ENDPOINT, STATS_ENDPOINT, WHEEL_ENDPOINT};
use crate::quiz::{Question, Reveal};
use crate::wheel::PointCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and hands back the raw reply. Implementations must not
/// treat non-2xx statuses as failures: the scoring service reports domain
/// errors inside JSON bodies.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[derive(Debug)]
pub enum ApiError {
    Network(String),
    Decode(serde_json::Error),
    Rejected(String),
    UnexpectedPoints(u32),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Decode(e) => write!(f, "Invalid response: {}", e),
            Self::Rejected(code) => write!(f, "Request rejected: {}", code),
            Self::UnexpectedPoints(points) => write!(f, "Unexpected wheel points: {}", points),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

// === Wire types ===

#[derive(Debug, Deserialize)]
struct QuizQuestionReply {
    question: String,
    choices: Vec<String>,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct QuizAnswerRequest<'a> {
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuizAnswerReply {
    is_correct: bool,
    correct: Vec<String>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WheelSpinReply {
    points: u32,
    token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    pub codes: Vec<String>,
    pub email: String,
    pub consent: bool,
}

#[derive(Debug, Deserialize)]
struct CheckoutReply {
    points: u32,
}

#[derive(Debug, Deserialize)]
struct StatsReply {
    total_points: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: ErrorCode,
}

#[derive(Debug, Deserialize)]
enum ErrorCode {
    NotFound,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Error(ErrorReply),
    Ok(T),
}

impl<T> Reply<T> {
    fn into_lookup(self) -> Result<Lookup<T>, ApiError> {
        match self {
            Reply::Ok(value) => Ok(Lookup::Found(value)),
            Reply::Error(ErrorReply { error: ErrorCode::NotFound }) => Ok(Lookup::NotFound),
            Reply::Error(ErrorReply { error: ErrorCode::Unknown }) => {
                Err(ApiError::Rejected("unknown error code".to_string()))
            }
        }
    }
}

/// Outcome of a call whose domain failure is "nothing there any more".
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// A result paired with the rotated token the server returned alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Authed<T> {
    pub value: T,
    pub token: Option<String>,
}

pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch_with_auth<R: DeserializeOwned>(
        &self,
        path: &str,
        authorization: Option<&str>,
        method: Method,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let mut headers = Vec::new();
        if let Some(authorization) = authorization {
            headers.push(("Authorization".to_string(), authorization.to_string()));
        }

        let body = match body {
            Some(body) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(&body)?)
            }
            None => None,
        };

        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };

        log::debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        log::trace!("status {}", response.status);

        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn stats(&self, authorization: Option<&str>) -> Result<u32, ApiError> {
        let reply: StatsReply = self
            .fetch_with_auth(STATS_ENDPOINT, authorization, Method::Get, None)
            .await?;
        Ok(reply.total_points)
    }

    pub async fn quiz_question(
        &self,
        quiz_name: &str,
        authorization: Option<&str>,
    ) -> Result<Authed<Lookup<Question>>, ApiError> {
        let path = format!("{}/{}", QUIZ_ENDPOINT, quiz_name);
        let reply: Reply<QuizQuestionReply> = self
            .fetch_with_auth(&path, authorization, Method::Get, None)
            .await?;

        Ok(match reply.into_lookup()? {
            Lookup::Found(reply) => Authed {
                value: Lookup::Found(Question {
                    text: reply.question,
                    choices: reply.choices,
                }),
                token: reply.token,
            },
            Lookup::NotFound => Authed { value: Lookup::NotFound, token: None },
        })
    }

    pub async fn submit_answer(
        &self,
        quiz_name: &str,
        answer: &str,
        authorization: Option<&str>,
    ) -> Result<Authed<Lookup<Reveal>>, ApiError> {
        let path = format!("{}/{}", QUIZ_ENDPOINT, quiz_name);
        let body = serde_json::to_value(QuizAnswerRequest { answer })?;
        let reply: Reply<QuizAnswerReply> = self
            .fetch_with_auth(&path, authorization, Method::Post, Some(body))
            .await?;

        Ok(match reply.into_lookup()? {
            Lookup::Found(reply) => Authed {
                value: Lookup::Found(Reveal {
                    is_correct: reply.is_correct,
                    correct: reply.correct.into_iter().collect(),
                }),
                token: reply.token,
            },
            Lookup::NotFound => Authed { value: Lookup::NotFound, token: None },
        })
    }

    pub async fn spin_wheel(
        &self,
        wheel_name: &str,
        authorization: Option<&str>,
    ) -> Result<Authed<Lookup<PointCategory>>, ApiError> {
        let path = format!("{}/{}", WHEEL_ENDPOINT, wheel_name);
        let reply: Reply<WheelSpinReply> = self
            .fetch_with_auth(
                &path,
                authorization,
                Method::Post,
                Some(Value::Object(Default::default())),
            )
            .await?;

        Ok(match reply.into_lookup()? {
            Lookup::Found(reply) => Authed {
                value: Lookup::Found(PointCategory::try_from(reply.points)?),
                token: reply.token,
            },
            Lookup::NotFound => Authed { value: Lookup::NotFound, token: None },
        })
    }

    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        authorization: Option<&str>,
    ) -> Result<Lookup<u32>, ApiError> {
        let body = serde_json::to_value(request)?;
        let reply: Reply<CheckoutReply> = self
            .fetch_with_auth(CHECKOUT_ENDPOINT, authorization, Method::Post, Some(body))
            .await?;

        Ok(match reply.into_lookup()? {
            Lookup::Found(reply) => Lookup::Found(reply.points),
            Lookup::NotFound => Lookup::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{block_on, FakeTransport};

    fn client(replies: &[&str]) -> ApiClient<FakeTransport> {
        ApiClient::new("http://scores.test/", FakeTransport::new(replies))
    }

    #[test]
    fn test_attaches_authorization_verbatim() {
        let api = client(&[r#"{"total_points": 12}"#]);
        let total = block_on(api.stats(Some("UserState abc"))).unwrap();
        assert_eq!(total, 12);

        let requests = api.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://scores.test/stats");
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].header("authorization"), Some("UserState abc"));
        assert_eq!(requests[0].header("content-type"), None);
        assert_eq!(requests[0].body, None);
    }

    #[test]
    fn test_omits_authorization_without_token() {
        let api = client(&[r#"{"total_points": 0}"#]);
        block_on(api.stats(None)).unwrap();
        assert_eq!(api.transport().requests()[0].header("Authorization"), None);
    }

    #[test]
    fn test_body_sets_json_content_type() {
        let api = client(&[r#"{"is_correct": true, "correct": ["Blue"], "token": "t2"}"#]);
        let reply = block_on(api.submit_answer("colors", "Blue", None)).unwrap();

        assert_eq!(reply.token.as_deref(), Some("t2"));
        match reply.value {
            Lookup::Found(reveal) => {
                assert!(reveal.is_correct);
                assert!(reveal.correct.contains("Blue"));
            }
            Lookup::NotFound => panic!("expected a reveal"),
        }

        let request = &api.transport().requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://scores.test/quiz/colors");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(r#"{"answer":"Blue"}"#));
    }

    #[test]
    fn test_not_found_payload_is_decoded_regardless_of_status() {
        let api = ApiClient::new(
            "http://scores.test",
            FakeTransport::with_status(404, &[r#"{"error": "NotFound"}"#]),
        );
        let reply = block_on(api.quiz_question("colors", None)).unwrap();
        assert_eq!(reply.value, Lookup::NotFound);
        assert_eq!(reply.token, None);
    }

    #[test]
    fn test_spin_sends_empty_object() {
        let api = client(&[r#"{"points": 40, "token": "t3"}"#]);
        let reply = block_on(api.spin_wheel("summer", None)).unwrap();
        assert_eq!(reply.value, Lookup::Found(PointCategory::Forty));

        let request = &api.transport().requests()[0];
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_unexpected_wheel_points_fail() {
        let api = client(&[r#"{"points": 35, "token": "t3"}"#]);
        let err = block_on(api.spin_wheel("summer", None)).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedPoints(35)));
    }

    #[test]
    fn test_non_json_body_is_a_decode_error() {
        let api = client(&["<html>bad gateway</html>"]);
        let err = block_on(api.stats(None)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_network_failure_propagates() {
        let api = client(&[]);
        let err = block_on(api.stats(None)).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
