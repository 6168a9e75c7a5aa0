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

//! Configuration shared by all the IAM updaters.

use crate::user_agent;
use std::time::Duration;

/// The default base path for the Cloud Storage JSON API.
pub const DEFAULT_STORAGE_BASE_PATH: &str = "https://storage.googleapis.com/storage/v1/";

/// The IAM policy format version requested when fetching policies.
///
/// Version 3 is required to read policies with conditional bindings.
pub const DEFAULT_IAM_POLICY_VERSION: i32 = 3;

pub(crate) const STORAGE_ENDPOINT_VAR: &str = "GOOGLE_STORAGE_CUSTOM_ENDPOINT";
pub(crate) const USER_AGENT_EXTENSION_VAR: &str = "GOOGLE_CLOUD_USERAGENT_EXTENSION";

/// The configuration for IAM updaters.
///
/// The default configuration should work for most applications. Some
/// applications may need to override the service endpoint (for example, to
/// use a private endpoint or an emulator), provide an access token, or bill
/// requests to a different project.
///
/// The configuration honors two environment variables when it is created:
/// `GOOGLE_STORAGE_CUSTOM_ENDPOINT` overrides the Cloud Storage base path, and
/// `GOOGLE_CLOUD_USERAGENT_EXTENSION` is appended to the `User-Agent` header.
///
/// # Example
/// ```
/// # use google_cloud_iam_updater::Config;
/// let config = Config::new()
///     .set_storage_base_path("https://storage.example.com/storage/v1")
///     .set_access_token("ya29.placeholder");
/// assert_eq!(config.storage_base_path(), "https://storage.example.com/storage/v1/");
/// ```
#[derive(Clone)]
pub struct Config {
    storage_base_path: String,
    iam_policy_version: i32,
    user_agent: String,
    access_token: Option<String>,
    project: Option<String>,
    billing_project: Option<String>,
    user_project_override: bool,
    request_timeout: Option<Duration>,
    client: reqwest::Client,
}

impl Config {
    /// Returns a default [Config], with any environment overrides applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The base path for the Cloud Storage JSON API, always ending in `/`.
    pub fn storage_base_path(&self) -> &str {
        &self.storage_base_path
    }

    /// The IAM policy format version requested when fetching policies.
    pub fn iam_policy_version(&self) -> i32 {
        self.iam_policy_version
    }

    /// The base `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The bearer token attached to each request, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The default project for resources that do not set one.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// The project billed for requests, if user project overrides are enabled.
    pub fn billing_project(&self) -> Option<&str> {
        self.billing_project.as_deref()
    }

    /// Whether requests send the billing project in `X-Goog-User-Project`.
    pub fn user_project_override(&self) -> bool {
        self.user_project_override
    }

    /// The timeout for requests that do not have a more specific one.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Sets an endpoint that overrides the default Cloud Storage base path.
    ///
    /// A trailing `/` is added if missing.
    pub fn set_storage_base_path<T: Into<String>>(mut self, v: T) -> Self {
        let mut path = v.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        self.storage_base_path = path;
        self
    }

    /// Sets the IAM policy format version requested when fetching policies.
    pub fn set_iam_policy_version(mut self, v: i32) -> Self {
        self.iam_policy_version = v;
        self
    }

    /// Replaces the base `User-Agent` header value.
    pub fn set_user_agent<T: Into<String>>(mut self, v: T) -> Self {
        self.user_agent = v.into();
        self
    }

    /// Configures a bearer token for all requests.
    pub fn set_access_token<T: Into<String>>(mut self, v: T) -> Self {
        self.access_token = Some(v.into());
        self
    }

    /// Configures the default project.
    pub fn set_project<T: Into<String>>(mut self, v: T) -> Self {
        self.project = Some(v.into());
        self
    }

    /// Configures the project billed for requests.
    pub fn set_billing_project<T: Into<String>>(mut self, v: T) -> Self {
        self.billing_project = Some(v.into());
        self
    }

    /// Enables (or disables) sending the billing project with each request.
    pub fn set_user_project_override(mut self, v: bool) -> Self {
        self.user_project_override = v;
        self
    }

    /// Configures the timeout for requests without a more specific one.
    pub fn set_request_timeout(mut self, v: Duration) -> Self {
        self.request_timeout = Some(v);
        self
    }

    /// Configures the HTTP client.
    pub fn set_http_client(mut self, v: reqwest::Client) -> Self {
        self.client = v;
        self
    }
}

impl std::default::Default for Config {
    fn default() -> Self {
        let storage_base_path = std::env::var(STORAGE_ENDPOINT_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_BASE_PATH.to_string());
        let user_agent = match std::env::var(USER_AGENT_EXTENSION_VAR) {
            Ok(ext) if !ext.is_empty() => format!("{} {ext}", user_agent::default_user_agent()),
            _ => user_agent::default_user_agent(),
        };
        Self {
            storage_base_path: String::new(),
            iam_policy_version: DEFAULT_IAM_POLICY_VERSION,
            user_agent,
            access_token: None,
            project: None,
            billing_project: None,
            user_project_override: false,
            request_timeout: None,
            client: reqwest::Client::new(),
        }
        .set_storage_base_path(storage_base_path)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("storage_base_path", &self.storage_base_path)
            .field("iam_policy_version", &self.iam_policy_version)
            .field("user_agent", &self.user_agent)
            .field("access_token", &self.access_token.as_ref().map(|_| "[censored]"))
            .field("project", &self.project)
            .field("billing_project", &self.billing_project)
            .field("user_project_override", &self.user_project_override)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
