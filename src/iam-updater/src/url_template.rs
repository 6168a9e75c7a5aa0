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

//! Build request URLs from templates such as `{{StorageBasePath}}b/{{bucket}}/iam`.

use crate::config::Config;
use crate::resource_data::ResourceData;
use crate::{Error, Result};

/// The variable expanded to [Config::storage_base_path].
pub const STORAGE_BASE_PATH_VAR: &str = "StorageBasePath";

/// Errors found while expanding a URL template.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum TemplateError {
    #[error("unterminated variable in URL template {0:?}")]
    Unterminated(String),
    #[error("cannot find a value for `{{{{{0}}}}}` in URL template {1:?}")]
    MissingValue(String, String),
    #[error("cannot parse URL {0:?}: {1}")]
    InvalidUrl(String, url::ParseError),
}

/// Expands every `{{name}}` variable in `template`.
///
/// `{{StorageBasePath}}` expands to the configured base path. `{{project}}`
/// expands to the `project` field of the resource, or the default project in
/// the configuration. Any other variable expands to the resource field with the
/// same name. The function fails with a binding error if a variable has no
/// value.
///
/// # Example
/// ```
/// # use google_cloud_iam_updater::{Config, url_template::replace_vars};
/// # use google_cloud_iam_updater::resource_data::MemoryResourceData;
/// # use google_cloud_iam_updater::schema::FieldSchema;
/// static SCHEMA: [FieldSchema; 1] = [FieldSchema::required("bucket")];
/// let config = Config::new().set_storage_base_path("https://storage.example.com/storage/v1/");
/// let data = MemoryResourceData::new(&SCHEMA).with_field("bucket", "my-bucket");
/// let url = replace_vars(&data, &config, "{{StorageBasePath}}b/{{bucket}}/iam")?;
/// assert_eq!(url, "https://storage.example.com/storage/v1/b/my-bucket/iam");
/// # Ok::<(), google_cloud_iam_updater::Error>(())
/// ```
pub fn replace_vars(data: &dyn ResourceData, config: &Config, template: &str) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let end = tail
            .find("}}")
            .ok_or_else(|| Error::binding(TemplateError::Unterminated(template.to_string())))?;
        let name = &tail[..end];
        let value = lookup(data, config, name).ok_or_else(|| {
            Error::binding(TemplateError::MissingValue(
                name.to_string(),
                template.to_string(),
            ))
        })?;
        output.push_str(&value);
        rest = &tail[end + 2..];
    }
    output.push_str(rest);
    Ok(output)
}

fn lookup(data: &dyn ResourceData, config: &Config, name: &str) -> Option<String> {
    match name {
        STORAGE_BASE_PATH_VAR => Some(config.storage_base_path().to_string()),
        "project" => data
            .get("project")
            .or_else(|| config.project().map(str::to_string)),
        _ => data.get(name),
    }
}

/// Appends `params` to the query string of `url`.
///
/// The parameters are percent-encoded and appended in the order given.
pub fn add_query_params(url: &str, params: &[(&str, String)]) -> Result<String> {
    let mut parsed = url::Url::parse(url)
        .map_err(|e| Error::binding(TemplateError::InvalidUrl(url.to_string(), e)))?;
    if params.is_empty() {
        return Ok(parsed.into());
    }
    parsed
        .query_pairs_mut()
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    Ok(parsed.into())
}
