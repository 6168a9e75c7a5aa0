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

//! `User-Agent` header helpers.

use crate::resource_data::ResourceData;

mod build_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/build_env.rs"));

    pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");
    pub(crate) const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// The default `User-Agent` header value.
///
/// It identifies this library and the compiler used to build it, for example
/// `google-cloud-iam-updater/0.1.0 gl-rust/1.85.0`.
pub fn default_user_agent() -> String {
    // Strip out the initial "rustc " string from `RUSTC_VERSION`. If not
    // found, leave RUSTC_VERSION unchanged.
    let rustc_version = build_info::RUSTC_VERSION;
    let rustc_version = rustc_version
        .strip_prefix("rustc ")
        .unwrap_or(build_info::RUSTC_VERSION);
    format!(
        "{}/{} gl-rust/{rustc_version}",
        build_info::PKG_NAME,
        build_info::PKG_VERSION
    )
}

/// Returns the `User-Agent` for requests on behalf of `data`.
///
/// Resources created from a module record the module name in their provider
/// metadata. The module name is appended to `base` so the service can
/// attribute the requests.
pub fn generate_user_agent_string(data: &dyn ResourceData, base: &str) -> String {
    match data.provider_meta().module_name {
        Some(name) if !name.is_empty() => format!("{base} {name}"),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_data::{MemoryResourceData, ProviderMeta};
    use crate::schema::FieldSchema;
    use std::collections::HashMap;

    static SCHEMA: &[FieldSchema] = &[FieldSchema::required("bucket")];

    fn breakdown(formatted: &str) -> HashMap<String, String> {
        formatted
            .split(" ")
            .filter_map(|v| v.find('/').map(|i| v.split_at(i)))
            .map(|(k, v)| (k.to_string(), v[1..].to_string()))
            .collect()
    }

    #[test]
    fn default_value() {
        let fields = breakdown(&default_user_agent());
        let got = fields.get(build_info::PKG_NAME).map(String::as_str);
        assert_eq!(got, Some(build_info::PKG_VERSION));

        let got = fields.get("gl-rust").map(String::to_owned);
        let want = build_info::RUSTC_VERSION;
        assert!(
            got.as_ref()
                .map(|s| want.contains(s) && !s.is_empty())
                .unwrap_or(false),
            "mismatched rustc version {want} and {got:?}"
        );
    }

    #[test]
    fn without_module() {
        let data = MemoryResourceData::new(SCHEMA);
        let got = generate_user_agent_string(&data, "base-agent/1.0");
        assert_eq!(got, "base-agent/1.0");
    }

    #[test]
    fn with_module() {
        let data = MemoryResourceData::new(SCHEMA)
            .with_provider_meta(ProviderMeta::new().set_module_name("blueprints/storage/v1"));
        let got = generate_user_agent_string(&data, "base-agent/1.0");
        assert_eq!(got, "base-agent/1.0 blueprints/storage/v1");
    }

    #[test]
    fn with_empty_module() {
        let data = MemoryResourceData::new(SCHEMA)
            .with_provider_meta(ProviderMeta::new().set_module_name(""));
        let got = generate_user_agent_string(&data, "base-agent/1.0");
        assert_eq!(got, "base-agent/1.0");
    }
}
