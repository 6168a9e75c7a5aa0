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

//! Describes the user-facing configuration fields of a resource.

/// Reports whether two values of a field refer to the same thing, even when
/// they are spelled differently.
pub type DiffSuppressFn = fn(old: &str, new: &str) -> bool;

/// The schema for one configuration field.
///
/// All fields are strings, which is all the IAM updaters need.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct FieldSchema {
    /// The field name, as used in the resource configuration.
    pub name: &'static str,
    /// The field must be set in the configuration.
    pub required: bool,
    /// Changing the field replaces the resource instead of updating it.
    pub force_new: bool,
    /// Suppresses spurious differences between equivalent values.
    pub diff_suppress: Option<DiffSuppressFn>,
}

impl FieldSchema {
    /// A required field, updated in place by default.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            force_new: false,
            diff_suppress: None,
        }
    }

    /// An optional field, updated in place by default.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            force_new: false,
            diff_suppress: None,
        }
    }

    /// Changes to this field force a new resource.
    pub const fn with_force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Uses `f` to suppress differences between equivalent values.
    pub const fn with_diff_suppress(mut self, f: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(f);
        self
    }

    /// Returns true if changing the field from `old` to `new` is not a change
    /// at all.
    pub fn suppresses_diff(&self, old: &str, new: &str) -> bool {
        old == new || self.diff_suppress.is_some_and(|f| f(old, new))
    }
}

/// Finds the schema for `name`, if any.
pub fn find<'a>(schema: &'a [FieldSchema], name: &str) -> Option<&'a FieldSchema> {
    schema.iter().find(|f| f.name == name)
}

/// Returns the last path segment of a resource name or self link.
///
/// ```
/// # use google_cloud_iam_updater::schema::resource_name_from_self_link;
/// assert_eq!(resource_name_from_self_link("b/my-bucket"), "my-bucket");
/// assert_eq!(resource_name_from_self_link("my-bucket"), "my-bucket");
/// ```
pub fn resource_name_from_self_link(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

/// Compares two resource names by their last path segment.
///
/// This treats short and fully-qualified names of the same resource as
/// equivalent.
///
/// ```
/// # use google_cloud_iam_updater::schema::compare_resource_names;
/// assert!(compare_resource_names("my-bucket", "b/my-bucket"));
/// assert!(!compare_resource_names("bucket-a", "bucket-b"));
/// ```
pub fn compare_resource_names(old: &str, new: &str) -> bool {
    resource_name_from_self_link(old) == resource_name_from_self_link(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("my-bucket", "my-bucket", true; "identical")]
    #[test_case("my-bucket", "b/my-bucket", true; "short and long")]
    #[test_case("b/my-bucket", "my-bucket", true; "long and short")]
    #[test_case("projects/_/buckets/my-bucket", "b/my-bucket", true; "full name")]
    #[test_case("bucket-a", "bucket-b", false; "different")]
    #[test_case("b/bucket-a", "b/bucket-b", false; "different long")]
    #[test_case("my-bucket/", "my-bucket", false; "trailing slash")]
    fn compare(old: &str, new: &str, want: bool) {
        assert_eq!(compare_resource_names(old, new), want, "{old} vs {new}");
    }

    #[test]
    fn builders() {
        let field = FieldSchema::required("bucket")
            .with_force_new()
            .with_diff_suppress(compare_resource_names);
        assert!(field.required, "{field:?}");
        assert!(field.force_new, "{field:?}");
        assert!(field.suppresses_diff("my-bucket", "b/my-bucket"), "{field:?}");
        assert!(!field.suppresses_diff("bucket-a", "bucket-b"), "{field:?}");

        let field = FieldSchema::optional("project");
        assert!(!field.required, "{field:?}");
        assert!(!field.force_new, "{field:?}");
        assert!(field.suppresses_diff("p", "p"), "{field:?}");
        assert!(!field.suppresses_diff("p", "projects/p"), "{field:?}");
    }

    #[test]
    fn find_field() {
        static SCHEMA: &[FieldSchema] = &[
            FieldSchema::required("bucket"),
            FieldSchema::optional("project"),
        ];
        assert!(find(SCHEMA, "bucket").is_some_and(|f| f.required));
        assert!(find(SCHEMA, "project").is_some_and(|f| !f.required));
        assert!(find(SCHEMA, "zone").is_none());
    }
}
