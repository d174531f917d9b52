use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::context::{CapturedResponse, ScenarioContext};
use crate::error::HarnessResult;
use crate::logging::LogExt;

/// Declarative parts of a request
///
/// Headers and query parameters keep their insertion order; that order is
/// the order they appear in the URL and in the cURL description.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query_parameters: Vec<(String, Option<String>)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter; `None` values are dropped when the URL is built
    pub fn query<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.query_parameters
            .push((key.into(), value.map(|v| v.to_string())));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

/// One HTTP call relative to the scenario's base URL
///
/// The wrapper holds no state across calls; everything it learns is written
/// onto the [`ScenarioContext`] passed to [`execute`](Self::execute).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    path: String,
    method: Method,
    options: RequestOptions,
}

impl HttpRequest {
    pub fn new(path: impl Into<String>, method: Method, options: RequestOptions) -> Self {
        Self {
            path: path.into(),
            method,
            options,
        }
    }

    pub fn get(path: impl Into<String>, options: RequestOptions) -> Self {
        Self::new(path, Method::GET, options)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Base URL plus path plus the query string of every present parameter
    pub fn build_url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url, self.path);

        let query = self
            .options
            .query_parameters
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .map(|value| format!("{}={}", encode_component(key), encode_component(value)))
            })
            .collect::<Vec<_>>()
            .join("&");

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        url
    }

    /// Replayable cURL rendering of the call
    pub fn build_request_description(&self, base_url: &str) -> String {
        let mut curl = format!("curl -X {} \"{}\"", self.method, self.build_url(base_url));

        for (key, value) in &self.options.headers {
            curl.push_str(&format!(" \\\n  -H \"{key}: {value}\""));
        }

        if let Some(body) = self.body_string() {
            curl.push_str(&format!(" \\\n  -d '{body}'"));
        }

        curl
    }

    /// Body as sent on the wire; GET requests never carry one
    fn body_string(&self) -> Option<String> {
        if self.method == Method::GET {
            return None;
        }
        self.options.body.as_ref().map(|body| match body {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        })
    }

    /// Perform the call and record the outcome on `context`
    ///
    /// Transport failures are logged and returned unchanged. A body is parsed
    /// as JSON only when the response declares a JSON content type; anything
    /// else is kept as a JSON string.
    pub async fn execute(&self, context: &mut ScenarioContext) -> HarnessResult<CapturedResponse> {
        let url = self.build_url(&context.api_base_url);
        let description = self.build_request_description(&context.api_base_url);

        context.logger.info(format!("Making {} request to: {}", self.method, url));
        context.logger.info(format!("cURL: {description}"));

        let mut request = context.http().request(self.method.clone(), &url);
        for (key, value) in &self.options.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = self.body_string() {
            if !self.options.has_header(CONTENT_TYPE.as_str()) {
                request = request.header(CONTENT_TYPE, "application/json");
            }
            request = request.body(body);
        }

        let response = request.send().await.log_err(&context.logger, "Request failed")?;
        let status = response.status();
        let headers: HeaderMap = response.headers().clone();
        let body = response
            .text()
            .await
            .log_err(&context.logger, "Failed to read response body")?;

        let captured = CapturedResponse { status, headers, body };
        let is_json = captured
            .content_type()
            .is_some_and(|content_type| content_type.contains("application/json"));
        let parsed = if is_json {
            serde_json::from_str::<Value>(&captured.body)
                .log_err(&context.logger, "Response declared JSON but could not be parsed")?
        } else {
            Value::String(captured.body.clone())
        };

        context.logger.info(format!(
            "Response status: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        ));

        context.last_request_description = Some(description);
        context.response_body = Some(parsed);
        context.last_response = Some(captured.clone());

        Ok(captured)
    }
}

/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}
