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

//! Google Cloud Client Libraries for Rust - IAM policy updaters.
//!
//! This crate contains the pieces shared by all resources whose IAM policies
//! are managed through an infrastructure-as-code workflow:
//!
//! * [ResourceIamUpdater][updater::ResourceIamUpdater], the capability to read
//!   and replace the IAM policy of one resource.
//! * [ResourceData][resource_data::ResourceData], the configuration record of a
//!   resource, and an in-memory implementation.
//! * [IdFormat][id_format::IdFormat], to resolve short and fully-qualified
//!   resource identifiers.
//! * A single-shot JSON transport, URL templates, and the IAM policy model.
//!
//! Resource-specific updaters live in their own crates.

pub mod config;
pub mod error;
pub mod http;
pub mod id_format;
pub mod model;
pub mod resource_data;
pub mod schema;
pub mod updater;
pub mod url_template;
pub mod user_agent;

pub use config::Config;
pub use error::Error;

/// The result type returned by IAM updaters and their helpers.
pub type Result<T> = std::result::Result<T, Error>;
