// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A single-shot JSON transport for the IAM policy endpoints.
//!
//! Requests are sent exactly once. Retries and backoff belong to the caller.

use crate::config::Config;
use crate::model::Payload;
use crate::{Error, Result};
use std::time::Duration;

const USER_PROJECT_HEADER: &str = "x-goog-user-project";

/// Sends one JSON request and decodes the JSON response.
///
/// Returns `Ok(None)` when the service responds with no content. The request
/// carries `user_agent` as its `User-Agent` header, the configured access token
/// as a bearer token, and the billing project when the configuration enables
/// user project overrides.
///
/// The request is bounded by `timeout`, or by [Config::request_timeout] when
/// `timeout` is `None`. Without either the transport defaults apply.
pub async fn send_request(
    config: &Config,
    method: reqwest::Method,
    url: &str,
    user_agent: &str,
    body: Option<&Payload>,
    timeout: Option<Duration>,
) -> Result<Option<Payload>> {
    let mut builder = config
        .client()
        .request(method.clone(), url)
        .header(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_str(user_agent).map_err(Error::binding)?,
        );
    if let Some(token) = config.access_token() {
        builder = builder.bearer_auth(token);
    }
    if let Some(project) = user_project(config) {
        builder = builder.header(
            USER_PROJECT_HEADER,
            reqwest::header::HeaderValue::from_str(project).map_err(Error::binding)?,
        );
    }
    if let Some(body) = body {
        builder = builder.json(body);
    }
    builder = timeout
        .or(config.request_timeout())
        .into_iter()
        .fold(builder, |b, t| b.timeout(t));

    tracing::debug!(%method, url, ?timeout, "sending IAM policy request");
    let response = builder.send().await.map_err(map_send_error)?;
    tracing::debug!(%method, url, status = %response.status(), "received IAM policy response");
    if !response.status().is_success() {
        return to_http_error(response).await;
    }
    to_http_response(response).await
}

fn user_project(config: &Config) -> Option<&str> {
    if !config.user_project_override() {
        return None;
    }
    config.billing_project().filter(|p| !p.is_empty())
}

fn map_send_error(err: reqwest::Error) -> Error {
    match err {
        e if e.is_timeout() => Error::timeout(e),
        e => Error::io(e),
    }
}

async fn to_http_error<O>(response: reqwest::Response) -> Result<O> {
    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(map_send_error)?;
    Err(Error::http(status_code, headers, body))
}

async fn to_http_response(response: reqwest::Response) -> Result<Option<Payload>> {
    // 204 No Content has no body and throws EOF error if we try to parse with serde::json
    let no_content_status = response.status() == reqwest::StatusCode::NO_CONTENT;
    let body = response.bytes().await.map_err(map_send_error)?;
    if body.is_empty() && no_content_status {
        return Ok(None);
    }
    serde_json::from_slice::<Payload>(&body)
        .map(Some)
        .map_err(Error::deser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[tokio::test]
    async fn http_error_bytes() -> TestResult {
        let response = resp_from_code_content(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"error": {"code": 403, "message": "forbidden"}}"#,
        )?;
        assert!(response.status().is_client_error());
        let err = to_http_error::<()>(response).await.unwrap_err();
        assert!(err.is_transport(), "{err:?}");
        assert_eq!(err.http_status_code(), Some(403));
        let mut want = HeaderMap::new();
        want.insert("content-type", HeaderValue::from_static("application/json"));
        assert_eq!(err.http_headers(), Some(&want));
        assert_eq!(
            err.http_payload(),
            Some(bytes::Bytes::from(
                r#"{"error": {"code": 403, "message": "forbidden"}}"#
            ))
            .as_ref()
        );
        Ok(())
    }

    #[tokio::test]
    #[test_case(reqwest::StatusCode::OK, "{}"; "200 with empty object")]
    #[test_case(reqwest::StatusCode::NO_CONTENT, "{}"; "204 with empty object")]
    async fn empty_object(code: reqwest::StatusCode, content: &str) -> TestResult {
        let response = resp_from_code_content(code, content)?;
        let got = to_http_response(response).await?;
        assert_eq!(got, Some(Payload::new()));
        Ok(())
    }

    #[tokio::test]
    async fn no_content() -> TestResult {
        let response = resp_from_code_content(reqwest::StatusCode::NO_CONTENT, "")?;
        let got = to_http_response(response).await?;
        assert_eq!(got, None);
        Ok(())
    }

    #[tokio::test]
    #[test_case(reqwest::StatusCode::OK, ""; "200 with empty content")]
    #[test_case(reqwest::StatusCode::OK, "[1, 2]"; "200 with a list")]
    #[test_case(reqwest::StatusCode::OK, "{bad json"; "200 with bad json")]
    async fn bad_content(code: reqwest::StatusCode, content: &str) -> TestResult {
        let response = resp_from_code_content(code, content)?;
        let err = to_http_response(response).await.unwrap_err();
        assert!(err.is_deserialization(), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn payload() -> TestResult {
        let response = resp_from_code_content(
            reqwest::StatusCode::OK,
            r#"{"etag": "CAE=", "bindings": []}"#,
        )?;
        let got = to_http_response(response).await?;
        let want = serde_json::json!({"etag": "CAE=", "bindings": []});
        assert_eq!(got.map(serde_json::Value::Object), Some(want));
        Ok(())
    }

    #[test_case(false, Some("billing"), None)]
    #[test_case(true, Some("billing"), Some("billing"))]
    #[test_case(true, Some(""), None)]
    #[test_case(true, None, None)]
    fn user_project_header(enabled: bool, billing: Option<&str>, want: Option<&str>) {
        let config = billing
            .into_iter()
            .fold(Config::new(), |c, p| c.set_billing_project(p))
            .set_user_project_override(enabled);
        assert_eq!(user_project(&config), want);
    }

    fn resp_from_code_content(
        code: reqwest::StatusCode,
        content: &str,
    ) -> http::Result<reqwest::Response> {
        let http_resp = http::Response::builder()
            .header("Content-Type", "application/json")
            .status(code)
            .body(content.to_string())?;

        let response: reqwest::Response = http_resp.into();
        Ok(response)
    }
}
