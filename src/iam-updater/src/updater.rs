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

//! The capability shared by all resources with IAM policies.
//!
//! The orchestrator registers one [IamResource] per resource kind. For each
//! operation it calls the [UpdaterProducer] to build a [ResourceIamUpdater],
//! uses it to read or replace the policy, and then discards it.
//!
//! # Example
//! ```
//! # use google_cloud_iam_updater::updater::*;
//! # use google_cloud_iam_updater::model::Binding;
//! # async fn sample(updater: &dyn ResourceIamUpdater) -> google_cloud_iam_updater::Result<()> {
//! read_modify_write(updater, |mut policy| {
//!     policy.bindings.push(
//!         Binding::new()
//!             .set_role("roles/storage.objectViewer")
//!             .set_members(["user:alice@example.com"]),
//!     );
//!     Ok(Some(policy))
//! })
//! .await?;
//! # Ok(()) }
//! ```

use crate::config::Config;
use crate::model::Policy;
use crate::resource_data::ResourceData;
use crate::schema::FieldSchema;
use crate::Result;
use std::sync::Arc;

/// Reads and replaces the IAM policy of a single resource.
///
/// Implementations hold the resolved identity of one resource. They are
/// constructed per operation, and are immutable after construction.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ResourceIamUpdater: Send + Sync + std::fmt::Debug {
    /// Fetches the current policy.
    ///
    /// The policy is fetched on every call. Nothing is cached.
    async fn fetch_policy(&self) -> Result<Policy>;

    /// Replaces the policy with `policy`.
    ///
    /// This is a full replacement. Callers merge bindings before calling it,
    /// and should include the etag from [fetch_policy][Self::fetch_policy] to
    /// detect concurrent changes.
    async fn replace_policy(&self, policy: Policy) -> Result<()>;

    /// The canonical identifier of the resource.
    fn resource_id(&self) -> String;

    /// The key callers use to serialize policy changes on this resource.
    fn mutex_key(&self) -> String;

    /// A human-readable description of the resource, used in error messages.
    fn describe_resource(&self) -> String;
}

/// Builds an updater from the configuration of a resource.
///
/// Producers resolve the resource identity and store the canonical form back
/// in `data`.
pub type UpdaterProducer =
    fn(data: Arc<dyn ResourceData>, config: Arc<Config>) -> Result<Box<dyn ResourceIamUpdater>>;

/// Resolves an imported identifier.
///
/// Parsers read [ResourceData::id], populate the identifying fields, and set
/// the identifier to its canonical form.
pub type ResourceIdParser = fn(data: &dyn ResourceData, config: &Config) -> Result<()>;

/// The registration for one kind of IAM-managed resource.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct IamResource {
    /// The fields identifying the resource.
    pub schema: &'static [FieldSchema],
    /// Builds an updater from the resource configuration.
    pub producer: UpdaterProducer,
    /// Resolves imported identifiers.
    pub id_parser: ResourceIdParser,
}

impl IamResource {
    pub const fn new(
        schema: &'static [FieldSchema],
        producer: UpdaterProducer,
        id_parser: ResourceIdParser,
    ) -> Self {
        Self {
            schema,
            producer,
            id_parser,
        }
    }

    /// Builds an updater for the resource described by `data`.
    pub fn updater(
        &self,
        data: Arc<dyn ResourceData>,
        config: Arc<Config>,
    ) -> Result<Box<dyn ResourceIamUpdater>> {
        (self.producer)(data, config)
    }

    /// Resolves the imported identifier in `data`.
    pub fn import(&self, data: &dyn ResourceData, config: &Config) -> Result<()> {
        (self.id_parser)(data, config)
    }
}

impl std::fmt::Debug for IamResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<_> = self.schema.iter().map(|f| f.name).collect();
        f.debug_struct("IamResource")
            .field("schema", &fields)
            .finish_non_exhaustive()
    }
}

/// Fetches the policy, applies `modify`, and replaces the policy.
///
/// `modify` returns `Ok(None)` to leave the policy unchanged, in which case
/// nothing is written and the fetched policy is returned. The sequence runs
/// once. Callers that need protection from concurrent writers should hold the
/// lock named by [ResourceIamUpdater::mutex_key] and retry on etag conflicts.
pub async fn read_modify_write<F>(updater: &dyn ResourceIamUpdater, modify: F) -> Result<Policy>
where
    F: FnOnce(Policy) -> Result<Option<Policy>> + Send,
{
    let current = updater.fetch_policy().await?;
    let Some(updated) = modify(current.clone())? else {
        tracing::debug!(
            resource = %updater.describe_resource(),
            "IAM policy unchanged, skipping update"
        );
        return Ok(current);
    };
    updater.replace_policy(updated.clone()).await?;
    Ok(updated)
}
