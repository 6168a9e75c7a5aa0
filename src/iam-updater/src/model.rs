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

//! The IAM policy types exchanged with the service.
//!
//! Updaters treat policies as opaque documents. These types only give the
//! document a shape, so callers can merge bindings before replacing a policy.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The generic representation of a JSON payload.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// An Identity and Access Management (IAM) policy.
///
/// A `Policy` is a collection of `bindings`. A `binding` binds one or more
/// `members`, or principals, to a single `role`. Each binding may include a
/// `condition`, a logical expression that limits when the binding applies.
///
/// Fields returned by the service but not modeled here (such as `kind` or
/// `resourceId` in Cloud Storage responses) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Policy {
    /// The policy format version. Policies with conditional bindings require
    /// version 3.
    #[serde(skip_serializing_if = "is_default")]
    pub version: i32,

    /// Associates a list of members with a role.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,

    /// Specifies cloud audit logging configuration for this policy.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit_configs: Vec<AuditConfig>,

    /// Used for optimistic concurrency control. The service rejects a policy
    /// replacement if the etag does not match the current policy.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [version][Policy::version].
    pub fn set_version<T: Into<i32>>(mut self, v: T) -> Self {
        self.version = v.into();
        self
    }

    /// Sets the value of [bindings][Policy::bindings].
    pub fn set_bindings<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<Binding>,
    {
        self.bindings = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [audit_configs][Policy::audit_configs].
    pub fn set_audit_configs<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<AuditConfig>,
    {
        self.audit_configs = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [etag][Policy::etag].
    pub fn set_etag<T: Into<String>>(mut self, v: T) -> Self {
        self.etag = v.into();
        self
    }

    /// Converts a generic payload into a policy.
    ///
    /// `description` names the resource in any error.
    pub fn try_from_payload(payload: Payload, description: &str) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(payload))
            .map_err(|e| Error::conversion(description, e))
    }

    /// Converts the policy into its generic payload.
    ///
    /// `description` names the resource in any error.
    pub fn to_payload(&self, description: &str) -> Result<Payload> {
        match serde_json::to_value(self).map_err(|e| Error::conversion(description, e))? {
            serde_json::Value::Object(map) => Ok(map),
            v => Err(Error::conversion(
                description,
                format!("expected a JSON object, got {v}"),
            )),
        }
    }
}

/// Associates `members`, or principals, with a `role`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Binding {
    /// Role that is assigned to the list of `members`, e.g. `roles/storage.admin`.
    pub role: String,

    /// The principals requesting access, e.g. `user:alice@example.com` or
    /// `serviceAccount:my-app@my-project.iam.gserviceaccount.com`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// The condition associated with this binding, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expr>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [role][Binding::role].
    pub fn set_role<T: Into<String>>(mut self, v: T) -> Self {
        self.role = v.into();
        self
    }

    /// Sets the value of [members][Binding::members].
    pub fn set_members<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.members = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [condition][Binding::condition].
    pub fn set_condition<T: Into<Expr>>(mut self, v: T) -> Self {
        self.condition = Some(v.into());
        self
    }
}

/// A textual expression in the Common Expression Language (CEL) syntax.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Expr {
    pub expression: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl Expr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [expression][Expr::expression].
    pub fn set_expression<T: Into<String>>(mut self, v: T) -> Self {
        self.expression = v.into();
        self
    }

    /// Sets the value of [title][Expr::title].
    pub fn set_title<T: Into<String>>(mut self, v: T) -> Self {
        self.title = v.into();
        self
    }

    /// Sets the value of [description][Expr::description].
    pub fn set_description<T: Into<String>>(mut self, v: T) -> Self {
        self.description = v.into();
        self
    }

    /// Sets the value of [location][Expr::location].
    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = v.into();
        self
    }
}

/// The audit logging configuration for a service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct AuditConfig {
    /// The service enabled for audit logging, e.g. `storage.googleapis.com`.
    /// `allServices` covers all services.
    pub service: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audit_log_configs: Vec<AuditLogConfig>,
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [service][AuditConfig::service].
    pub fn set_service<T: Into<String>>(mut self, v: T) -> Self {
        self.service = v.into();
        self
    }

    /// Sets the value of [audit_log_configs][AuditConfig::audit_log_configs].
    pub fn set_audit_log_configs<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<AuditLogConfig>,
    {
        self.audit_log_configs = v.into_iter().map(|i| i.into()).collect();
        self
    }
}

/// The configuration for one type of audit log.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct AuditLogConfig {
    /// One of `ADMIN_READ`, `DATA_WRITE`, or `DATA_READ`.
    pub log_type: String,

    /// Principals exempted from this type of logging.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exempted_members: Vec<String>,
}

impl AuditLogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [log_type][AuditLogConfig::log_type].
    pub fn set_log_type<T: Into<String>>(mut self, v: T) -> Self {
        self.log_type = v.into();
        self
    }

    /// Sets the value of [exempted_members][AuditLogConfig::exempted_members].
    pub fn set_exempted_members<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.exempted_members = v.into_iter().map(|i| i.into()).collect();
        self
    }
}

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}
