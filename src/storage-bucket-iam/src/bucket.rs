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

use iam_updater::id_format::{IdFormat, Segment, import_id_qualifiers};
use iam_updater::model::Policy;
use iam_updater::resource_data::{ResourceData, TimeoutKind};
use iam_updater::schema::{FieldSchema, compare_resource_names};
use iam_updater::updater::{IamResource, ResourceIamUpdater};
use iam_updater::url_template::{add_query_params, replace_vars};
use iam_updater::user_agent::generate_user_agent_string;
use iam_updater::{Config, Error, Result};
use std::sync::Arc;

/// The configuration field naming the bucket.
pub const BUCKET_FIELD: &str = "bucket";

/// The configuration fields of a bucket IAM resource.
///
/// `bucket` is required. Changing it replaces the resource, unless the old and
/// new values name the same bucket.
pub static STORAGE_BUCKET_IAM_SCHEMA: [FieldSchema; 1] = [FieldSchema::required(BUCKET_FIELD)
    .with_force_new()
    .with_diff_suppress(storage_bucket_diff_suppress)];

/// The accepted bucket identifiers, in the order they are tried.
pub static STORAGE_BUCKET_ID_FORMATS: [IdFormat; 2] = [
    IdFormat::new(&[Segment::Literal("b/"), Segment::Field(BUCKET_FIELD)]),
    IdFormat::new(&[Segment::Field(BUCKET_FIELD)]),
];

/// The registration for bucket IAM resources.
pub static STORAGE_BUCKET_IAM: IamResource = IamResource::new(
    &STORAGE_BUCKET_IAM_SCHEMA,
    storage_bucket_iam_updater_producer,
    storage_bucket_id_parse,
);

/// Reads and replaces the IAM policy of a Cloud Storage bucket.
///
/// Use [storage_bucket_iam_updater_producer] to create instances.
pub struct StorageBucketIamUpdater {
    bucket: String,
    data: Arc<dyn ResourceData>,
    config: Arc<Config>,
}

/// Builds a [StorageBucketIamUpdater] from the `bucket` field of `data`.
///
/// The field may hold the bucket name or the canonical `b/<bucket>`
/// identifier. On success the field holds the canonical identifier.
pub fn storage_bucket_iam_updater_producer(
    data: Arc<dyn ResourceData>,
    config: Arc<Config>,
) -> Result<Box<dyn ResourceIamUpdater>> {
    let raw = data.get(BUCKET_FIELD).unwrap_or_default();
    let bucket = resolve_bucket(&raw)?;
    let updater = StorageBucketIamUpdater {
        bucket,
        data,
        config,
    };
    updater
        .data
        .set(BUCKET_FIELD, updater.resource_id())
        .map_err(|e| Error::write(BUCKET_FIELD, e))?;
    Ok(Box::new(updater))
}

/// Resolves an imported bucket identifier.
///
/// Sets the `bucket` field and the resource identifier to `b/<bucket>`.
pub fn storage_bucket_id_parse(data: &dyn ResourceData, _config: &Config) -> Result<()> {
    let bucket = resolve_bucket(&data.id())?;
    let resource_id = canonical_id(&bucket);
    data.set(BUCKET_FIELD, resource_id.clone())
        .map_err(|e| Error::write(BUCKET_FIELD, e))?;
    data.set_id(resource_id);
    Ok(())
}

/// Returns true when `old` and `new` name the same bucket.
///
/// ```
/// # use google_cloud_storage_bucket_iam::storage_bucket_diff_suppress;
/// assert!(storage_bucket_diff_suppress("my-bucket", "b/my-bucket"));
/// assert!(!storage_bucket_diff_suppress("my-bucket", "b/other-bucket"));
/// ```
pub fn storage_bucket_diff_suppress(old: &str, new: &str) -> bool {
    compare_resource_names(old, new)
}

fn resolve_bucket(id: &str) -> Result<String> {
    let mut qualifiers = import_id_qualifiers(&STORAGE_BUCKET_ID_FORMATS, id)?;
    qualifiers.remove(BUCKET_FIELD).ok_or_else(|| {
        Error::parse(format!(
            "{id:?} does not include a value for the {BUCKET_FIELD} field"
        ))
    })
}

fn canonical_id(bucket: &str) -> String {
    format!("b/{bucket}")
}

impl StorageBucketIamUpdater {
    /// The bucket name, without the `b/` prefix.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn qualify_bucket_url(&self, method_identifier: &str) -> Result<String> {
        replace_vars(
            self.data.as_ref(),
            &self.config,
            &format!("{{{{StorageBasePath}}}}b/{}/{method_identifier}", self.bucket),
        )
    }

    fn user_agent(&self) -> String {
        generate_user_agent_string(self.data.as_ref(), self.config.user_agent())
    }
}

#[async_trait::async_trait]
impl ResourceIamUpdater for StorageBucketIamUpdater {
    #[tracing::instrument(level = "debug", skip(self), fields(bucket = %self.bucket))]
    async fn fetch_policy(&self) -> Result<Policy> {
        let url = self.qualify_bucket_url("iam")?;
        let url = add_query_params(
            &url,
            &[(
                "optionsRequestedPolicyVersion",
                self.config.iam_policy_version().to_string(),
            )],
        )?;
        let description = self.describe_resource();
        let payload = iam_updater::http::send_request(
            &self.config,
            reqwest::Method::GET,
            &url,
            &self.user_agent(),
            None,
            None,
        )
        .await
        .map_err(|e| Error::fetch(&description, e))?;
        Policy::try_from_payload(payload.unwrap_or_default(), &description)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(bucket = %self.bucket))]
    async fn replace_policy(&self, policy: Policy) -> Result<()> {
        let description = self.describe_resource();
        let payload = policy.to_payload(&description)?;
        let url = self.qualify_bucket_url("iam")?;
        let timeout = self.data.timeout(TimeoutKind::Create);
        iam_updater::http::send_request(
            &self.config,
            reqwest::Method::PUT,
            &url,
            &self.user_agent(),
            Some(&payload),
            Some(timeout),
        )
        .await
        .map_err(|e| Error::update(&description, e))?;
        Ok(())
    }

    fn resource_id(&self) -> String {
        canonical_id(&self.bucket)
    }

    fn mutex_key(&self) -> String {
        format!("iam-storage-bucket-{}", self.resource_id())
    }

    fn describe_resource(&self) -> String {
        format!("storage bucket {:?}", self.resource_id())
    }
}

impl std::fmt::Debug for StorageBucketIamUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBucketIamUpdater")
            .field("bucket", &self.bucket)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
