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

//! The live configuration record of a managed resource.
//!
//! The lifecycle framework owns the configuration and state of each resource.
//! IAM updaters read their identifying fields from this record, and write
//! back the canonical form of those fields.

use crate::schema::{self, FieldSchema};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::Duration;

/// The timeout applied to each lifecycle operation unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// The lifecycle operation a timeout applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeoutKind {
    Create,
    Read,
    Update,
    Delete,
}

/// Metadata set by the module that declared the resource, if any.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ProviderMeta {
    /// The name of the module, appended to the `User-Agent` header.
    pub module_name: Option<String>,
}

impl ProviderMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_module_name<T: Into<String>>(mut self, v: T) -> Self {
        self.module_name = Some(v.into());
        self
    }
}

/// Errors writing to a [ResourceData] record.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SetFieldError {
    /// The field is not part of the resource schema.
    #[error("{0} is not defined in the resource schema")]
    UnknownField(String),

    /// The record does not accept writes.
    #[error("the resource record is read-only")]
    ReadOnly,
}

/// The configuration and state of one managed resource.
///
/// Implementations use interior mutability, so a record can be shared between
/// the framework and an updater.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceData: Send + Sync {
    /// Returns the value of `key`. Unset and empty fields both return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets the value of `key`.
    fn set(&self, key: &str, value: String) -> Result<(), SetFieldError>;

    /// The resource identifier (its primary key in the persisted state).
    fn id(&self) -> String;

    /// Changes the resource identifier.
    fn set_id(&self, id: String);

    /// The timeout configured for a lifecycle operation.
    fn timeout(&self, kind: TimeoutKind) -> Duration;

    /// The metadata set by the declaring module.
    fn provider_meta(&self) -> ProviderMeta;
}

/// An in-memory [ResourceData].
///
/// Writes are validated against the schema. Fields loaded with
/// [with_field][MemoryResourceData::with_field] are not, which lets callers
/// load any state they have.
///
/// # Example
/// ```
/// # use google_cloud_iam_updater::resource_data::{MemoryResourceData, ResourceData};
/// # use google_cloud_iam_updater::schema::FieldSchema;
/// static SCHEMA: &[FieldSchema] = &[FieldSchema::required("bucket")];
/// let data = MemoryResourceData::new(SCHEMA).with_field("bucket", "my-bucket");
/// assert_eq!(data.get("bucket").as_deref(), Some("my-bucket"));
/// assert!(data.set("unknown", "value".into()).is_err());
/// ```
#[derive(Debug)]
pub struct MemoryResourceData {
    schema: &'static [FieldSchema],
    state: RwLock<State>,
    timeouts: HashMap<TimeoutKind, Duration>,
    provider_meta: ProviderMeta,
    read_only: bool,
}

#[derive(Debug, Default)]
struct State {
    id: String,
    fields: BTreeMap<String, String>,
}

impl MemoryResourceData {
    /// Creates an empty record for a resource with the given schema.
    pub fn new(schema: &'static [FieldSchema]) -> Self {
        Self {
            schema,
            state: RwLock::new(State::default()),
            timeouts: HashMap::new(),
            provider_meta: ProviderMeta::default(),
            read_only: false,
        }
    }

    /// Loads a field value.
    pub fn with_field<K: Into<String>, V: Into<String>>(self, key: K, value: V) -> Self {
        self.write_state()
            .fields
            .insert(key.into(), value.into());
        self
    }

    /// Loads the resource identifier.
    pub fn with_id<T: Into<String>>(self, id: T) -> Self {
        self.write_state().id = id.into();
        self
    }

    /// Overrides the timeout for one lifecycle operation.
    pub fn with_timeout(mut self, kind: TimeoutKind, timeout: Duration) -> Self {
        self.timeouts.insert(kind, timeout);
        self
    }

    /// Sets the provider metadata.
    pub fn with_provider_meta(mut self, v: ProviderMeta) -> Self {
        self.provider_meta = v;
        self
    }

    /// Rejects all field writes with [SetFieldError::ReadOnly].
    ///
    /// Useful to load state that must not be modified, such as a plan.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// The schema of the resource.
    pub fn schema(&self) -> &'static [FieldSchema] {
        self.schema
    }

    /// A snapshot of all the field values.
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.read_state().fields.clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().expect("resource state lock is poisoned")
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().expect("resource state lock is poisoned")
    }
}

impl ResourceData for MemoryResourceData {
    fn get(&self, key: &str) -> Option<String> {
        self.read_state()
            .fields
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), SetFieldError> {
        if self.read_only {
            return Err(SetFieldError::ReadOnly);
        }
        if schema::find(self.schema, key).is_none() {
            return Err(SetFieldError::UnknownField(key.to_string()));
        }
        self.write_state().fields.insert(key.to_string(), value);
        Ok(())
    }

    fn id(&self) -> String {
        self.read_state().id.clone()
    }

    fn set_id(&self, id: String) {
        self.write_state().id = id;
    }

    fn timeout(&self, kind: TimeoutKind) -> Duration {
        self.timeouts
            .get(&kind)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn provider_meta(&self) -> ProviderMeta {
        self.provider_meta.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static SCHEMA: &[FieldSchema] = &[
        FieldSchema::required("bucket"),
        FieldSchema::optional("project"),
    ];

    #[test]
    fn get_and_set() -> anyhow::Result<()> {
        let data = MemoryResourceData::new(SCHEMA).with_field("bucket", "my-bucket");
        assert_eq!(data.get("bucket").as_deref(), Some("my-bucket"));
        assert_eq!(data.get("project"), None);

        data.set("bucket", "b/my-bucket".into())?;
        data.set("project", "".into())?;
        assert_eq!(data.get("bucket").as_deref(), Some("b/my-bucket"));
        assert_eq!(data.get("project"), None, "empty values are unset");

        let want = BTreeMap::from([
            ("bucket".to_string(), "b/my-bucket".to_string()),
            ("project".to_string(), "".to_string()),
        ]);
        assert_eq!(data.fields(), want);
        Ok(())
    }

    #[test]
    fn set_unknown_field() {
        let data = MemoryResourceData::new(SCHEMA);
        let err = data.set("zone", "us-central1-a".into()).unwrap_err();
        assert!(
            matches!(err, SetFieldError::UnknownField(ref f) if f == "zone"),
            "{err:?}"
        );
        assert!(err.to_string().contains("zone"), "{err}");
        assert_eq!(data.get("zone"), None);
    }

    #[test]
    fn set_read_only() {
        let data = MemoryResourceData::new(SCHEMA)
            .with_field("bucket", "my-bucket")
            .read_only();
        let err = data.set("bucket", "b/my-bucket".into()).unwrap_err();
        assert!(matches!(err, SetFieldError::ReadOnly), "{err:?}");
        assert_eq!(data.get("bucket").as_deref(), Some("my-bucket"));
    }

    #[test]
    fn id() {
        let data = MemoryResourceData::new(SCHEMA).with_id("my-bucket");
        assert_eq!(data.id(), "my-bucket");
        data.set_id("b/my-bucket".into());
        assert_eq!(data.id(), "b/my-bucket");
    }

    #[test]
    fn timeouts() {
        let data = MemoryResourceData::new(SCHEMA)
            .with_timeout(TimeoutKind::Create, Duration::from_secs(7));
        assert_eq!(data.timeout(TimeoutKind::Create), Duration::from_secs(7));
        assert_eq!(data.timeout(TimeoutKind::Update), DEFAULT_TIMEOUT);
        assert_eq!(data.timeout(TimeoutKind::Read), DEFAULT_TIMEOUT);
        assert_eq!(data.timeout(TimeoutKind::Delete), DEFAULT_TIMEOUT);
    }

    #[test]
    fn provider_meta() {
        let data = MemoryResourceData::new(SCHEMA);
        assert_eq!(data.provider_meta(), ProviderMeta::default());
        let data = data.with_provider_meta(ProviderMeta::new().set_module_name("my-module"));
        assert_eq!(
            data.provider_meta().module_name.as_deref(),
            Some("my-module")
        );
    }
}
