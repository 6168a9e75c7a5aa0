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

//! Google Cloud Client Libraries for Rust - IAM policies for Cloud Storage buckets.
//!
//! This crate manages the IAM policy of a single [Cloud Storage] bucket. The
//! bucket is identified by its name (`my-bucket`) or by its canonical
//! identifier (`b/my-bucket`). The canonical form is what gets stored.
//!
//! # Example
//! ```no_run
//! # use google_cloud_storage_bucket_iam::*;
//! # use iam_updater::Config;
//! # use iam_updater::model::Binding;
//! # use iam_updater::resource_data::MemoryResourceData;
//! # use std::sync::Arc;
//! # async fn sample() -> anyhow::Result<()> {
//! let data = Arc::new(
//!     MemoryResourceData::new(&STORAGE_BUCKET_IAM_SCHEMA).with_field("bucket", "my-bucket"),
//! );
//! let updater = storage_bucket_iam_updater_producer(data, Arc::new(Config::new()))?;
//! let mut policy = updater.fetch_policy().await?;
//! policy.bindings.push(
//!     Binding::new()
//!         .set_role("roles/storage.objectViewer")
//!         .set_members(["user:alice@example.com"]),
//! );
//! updater.replace_policy(policy).await?;
//! # Ok(()) }
//! ```
//!
//! [Cloud Storage]: https://cloud.google.com/storage

mod bucket;

pub use bucket::{
    BUCKET_FIELD, STORAGE_BUCKET_ID_FORMATS, STORAGE_BUCKET_IAM, STORAGE_BUCKET_IAM_SCHEMA,
    StorageBucketIamUpdater, storage_bucket_diff_suppress, storage_bucket_iam_updater_producer,
    storage_bucket_id_parse,
};
