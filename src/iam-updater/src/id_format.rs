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

//! Match resource identifiers against their accepted formats.
//!
//! Resources may be referenced by a short name or by a fully-qualified path,
//! depending on where the identifier came from (explicit configuration or an
//! import). Each accepted form is an [IdFormat], a sequence of literal and
//! field [Segment]s. The formats are tried in order and the first match wins.

use crate::{Error, Result};
use std::collections::BTreeMap;

/// The fields extracted from an identifier, by field name.
pub type Qualifiers = BTreeMap<String, String>;

/// A segment in an identifier format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(&'static str),
    /// Captures one or more characters, excluding `/`, up to the next literal.
    Field(&'static str),
}

/// An accepted identifier format, e.g. `b/{bucket}`.
///
/// # Example
/// ```
/// # use google_cloud_iam_updater::id_format::{IdFormat, Segment};
/// use Segment::{Field, Literal};
/// const LONG: IdFormat = IdFormat::new(&[Literal("b/"), Field("bucket")]);
/// let got = LONG.try_match("b/my-bucket").unwrap();
/// assert_eq!(got.get("bucket").map(String::as_str), Some("my-bucket"));
/// assert!(LONG.try_match("my-bucket").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdFormat {
    segments: &'static [Segment],
}

impl IdFormat {
    pub const fn new(segments: &'static [Segment]) -> Self {
        Self { segments }
    }

    /// Matches the whole `id` against this format.
    ///
    /// Returns the captured fields, or `None` if any segment does not match or
    /// if there are unmatched characters left.
    pub fn try_match(&self, id: &str) -> Option<Qualifiers> {
        let mut remains = id;
        let mut qualifiers = Qualifiers::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let count = match segment {
                Segment::Literal(l) => consume_literal(remains, l)?,
                Segment::Field(name) => {
                    let count = consume_field(remains, self.segments.get(i + 1))?;
                    qualifiers.insert(name.to_string(), remains[..count].to_string());
                    count
                }
            };
            remains = &remains[count..];
        }
        remains.is_empty().then_some(qualifiers)
    }
}

impl std::fmt::Display for IdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in self.segments {
            match segment {
                Segment::Literal(l) => write!(f, "{l}")?,
                Segment::Field(name) => write!(f, "{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// Errors matching identifiers.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum IdFormatError {
    #[error("{id:?} doesn't match any of the id formats: [{formats}]")]
    NoMatch { id: String, formats: String },
}

/// Extracts the qualifiers from `id` using the first matching format.
///
/// # Example
/// ```
/// # use google_cloud_iam_updater::id_format::{IdFormat, Segment, import_id_qualifiers};
/// use Segment::{Field, Literal};
/// const FORMATS: &[IdFormat] = &[
///     IdFormat::new(&[Literal("b/"), Field("bucket")]),
///     IdFormat::new(&[Field("bucket")]),
/// ];
/// let got = import_id_qualifiers(FORMATS, "my-bucket")?;
/// assert_eq!(got.get("bucket").map(String::as_str), Some("my-bucket"));
/// assert!(import_id_qualifiers(FORMATS, "a/b/c").is_err());
/// # Ok::<(), google_cloud_iam_updater::Error>(())
/// ```
pub fn import_id_qualifiers(formats: &[IdFormat], id: &str) -> Result<Qualifiers> {
    for format in formats {
        if let Some(qualifiers) = format.try_match(id) {
            tracing::debug!(id, %format, "matched ID to IAM id format");
            return Ok(qualifiers);
        }
    }
    let formats = formats
        .iter()
        .map(IdFormat::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::parse(IdFormatError::NoMatch {
        id: id.to_string(),
        formats,
    }))
}

fn consume_literal(remains: &str, literal: &str) -> Option<usize> {
    remains.starts_with(literal).then_some(literal.len())
}

fn consume_field(remains: &str, next: Option<&Segment>) -> Option<usize> {
    let segment_end = remains.find('/').unwrap_or(remains.len());
    let segment = &remains[..segment_end];
    let i = match next {
        Some(Segment::Literal(l)) if !l.starts_with('/') && !l.is_empty() => {
            segment.find(l).unwrap_or(segment_end)
        }
        _ => segment_end,
    };
    (i != 0).then_some(i)
}
