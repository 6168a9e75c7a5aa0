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

//! The error type returned by IAM updaters and their helpers.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by IAM updaters.
///
/// Updaters report errors from several stages: the resource identifier may
/// not match any known format, the resolved identifier may not be stored back
/// in the resource configuration, the policy may not convert between its wire
/// and typed representations, or the service may reject the request. This
/// type offers predicates to tell those stages apart, and accessors for the
/// most common transport details.
///
/// Errors from the service are wrapped with a description of the resource,
/// [http_status_code][Error::http_status_code] and friends look through that
/// wrapping.
///
/// # Example
/// ```
/// use google_cloud_iam_updater::Error;
/// fn handle(e: Error) {
///     if e.is_fetch() && e.http_status_code() == Some(404) {
///         println!("the resource is gone: {e}");
///     } else if e.is_parse() {
///         println!("fix the resource identifier: {e}");
///     } else {
///         println!("some other error {e}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// The identifier does not match any of the accepted formats.
    pub fn parse<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Parse,
            source: Some(source.into()),
        }
    }

    /// The identifier could not be parsed.
    ///
    /// # Troubleshooting
    ///
    /// Check the identifier in the resource configuration, or the identifier
    /// used to import the resource. The error message lists the accepted
    /// formats.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse)
    }

    /// A resolved value could not be stored in the resource configuration.
    pub fn write<F, T>(field: F, source: T) -> Self
    where
        F: Into<String>,
        T: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::Write {
                field: field.into(),
            },
            source: Some(source.into()),
        }
    }

    /// The resource configuration rejected a write.
    pub fn is_write(&self) -> bool {
        matches!(self.kind, ErrorKind::Write { .. })
    }

    /// The policy could not be converted between its generic payload and its
    /// typed representation.
    pub fn conversion<D, T>(description: D, source: T) -> Self
    where
        D: Into<String>,
        T: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::Conversion {
                description: description.into(),
            },
            source: Some(source.into()),
        }
    }

    /// The policy payload did not convert, in either direction.
    pub fn is_conversion(&self) -> bool {
        matches!(self.kind, ErrorKind::Conversion { .. })
    }

    /// Wraps a transport error returned while retrieving a policy.
    pub fn fetch<D: Into<String>>(description: D, source: Error) -> Self {
        Self {
            kind: ErrorKind::Fetch {
                description: description.into(),
            },
            source: Some(source.into()),
        }
    }

    /// Retrieving the policy failed.
    ///
    /// The [source][std::error::Error::source] is the transport error.
    pub fn is_fetch(&self) -> bool {
        matches!(self.kind, ErrorKind::Fetch { .. })
    }

    /// Wraps a transport error returned while replacing a policy.
    pub fn update<D: Into<String>>(description: D, source: Error) -> Self {
        Self {
            kind: ErrorKind::Update {
                description: description.into(),
            },
            source: Some(source.into()),
        }
    }

    /// Replacing the policy failed.
    ///
    /// The [source][std::error::Error::source] is the transport error.
    pub fn is_update(&self) -> bool {
        matches!(self.kind, ErrorKind::Update { .. })
    }

    /// The description of the resource associated with this error, if any.
    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Conversion { description }
            | ErrorKind::Fetch { description }
            | ErrorKind::Update { description } => Some(description.as_str()),
            _ => None,
        }
    }

    /// The request URL could not be built.
    ///
    /// This is returned when a URL template references an unknown variable,
    /// or the resulting URL is not valid.
    pub fn binding<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Binding,
            source: Some(source.into()),
        }
    }

    /// The request URL or headers could not be built.
    pub fn is_binding(&self) -> bool {
        matches!(self.kind, ErrorKind::Binding)
    }

    /// Creates an error representing a timeout.
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The request could not be completed before its deadline.
    ///
    /// This predicate looks through the fetch and update wrappers.
    ///
    /// # Troubleshooting
    ///
    /// Policy replacements are bounded by the resource's create timeout.
    /// Consider increasing that timeout when the service is under load.
    pub fn is_timeout(&self) -> bool {
        matches!(self.transport_error().kind, ErrorKind::Timeout)
    }

    /// A problem reported by the transport layer before any HTTP response
    /// arrived, e.g. the connection could not be established.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The transport could not send the request or receive the response.
    pub fn is_io(&self) -> bool {
        matches!(self.transport_error().kind, ErrorKind::Io)
    }

    /// The response from the service could not be deserialized.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response body was not valid JSON.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.transport_error().kind, ErrorKind::Deserialization)
    }

    /// The service returned an HTTP error status.
    pub fn http(status_code: u16, headers: http::HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code,
            headers,
            payload,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: None,
        }
    }

    /// The service returned an HTTP error status.
    pub fn is_transport(&self) -> bool {
        matches!(self.transport_error().kind, ErrorKind::Transport(_))
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use google_cloud_iam_updater::Error;
    /// let e = Error::fetch(
    ///     "storage bucket \"b/my-bucket\"",
    ///     Error::http(403, http::HeaderMap::new(), bytes::Bytes::from_static(b"denied")),
    /// );
    /// assert_eq!(e.http_status_code(), Some(403));
    /// ```
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.transport_error().kind {
            ErrorKind::Transport(d) => Some(d.status_code),
            _ => None,
        }
    }

    /// The response headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.transport_error().kind {
            ErrorKind::Transport(d) => Some(&d.headers),
            _ => None,
        }
    }

    /// The response payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.transport_error().kind {
            ErrorKind::Transport(d) => Some(&d.payload),
            _ => None,
        }
    }

    // Fetch and update errors wrap the transport error, most accessors want
    // the wrapped error.
    fn transport_error(&self) -> &Error {
        match self.kind {
            ErrorKind::Fetch { .. } | ErrorKind::Update { .. } => self
                .source
                .as_ref()
                .and_then(|e| e.downcast_ref::<Error>())
                .map(Error::transport_error)
                .unwrap_or(self),
            _ => self,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Parse, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Write { field }, Some(e)) => write!(f, "Error setting {field}: {e}"),
            (ErrorKind::Conversion { description }, Some(e)) => {
                write!(f, "cannot convert the IAM policy for {description}: {e}")
            }
            (ErrorKind::Fetch { description }, Some(e)) => {
                write!(f, "Error retrieving IAM policy for {description}: {e}")
            }
            (ErrorKind::Update { description }, Some(e)) => {
                write!(f, "Error setting IAM policy for {description}: {e}")
            }
            (ErrorKind::Binding, Some(e)) => write!(f, "cannot build the request {e}"),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Io, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Transport(d), _) => d.display(f),
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Parse,
    Write { field: String },
    Conversion { description: String },
    Fetch { description: String },
    Update { description: String },
    Binding,
    Timeout,
    Io,
    Deserialization,
    Transport(Box<TransportDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: u16,
    headers: http::HeaderMap,
    payload: bytes::Bytes,
}

impl TransportDetails {
    fn display(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.status_code;
        match std::str::from_utf8(self.payload.as_ref()) {
            Ok(message) => write!(f, "the HTTP transport reports a [{code}] error: {message}"),
            Err(_) => write!(
                f,
                "the HTTP transport reports a [{code}] error: {:?}",
                self.payload
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    const DESCRIPTION: &str = r#"storage bucket "b/my-bucket""#;

    fn forbidden() -> Error {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            "content-type",
            http::HeaderValue::from_static("application/json"),
        );
        Error::http(403, headers, bytes::Bytes::from_static(b"access denied"))
    }

    #[test]
    fn parse() {
        let error = Error::parse("a/b/c doesn't match any of the id formats");
        assert!(error.is_parse(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.to_string().contains("a/b/c"), "{error}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        assert!(error.description().is_none(), "{error:?}");
    }

    #[test]
    fn write() {
        let source = std::io::Error::other("read-only record");
        let error = Error::write("bucket", source);
        assert!(error.is_write(), "{error:?}");
        assert!(!error.is_parse(), "{error:?}");
        assert_eq!(error.to_string(), "Error setting bucket: read-only record");
        let got = error
            .source()
            .and_then(|e| e.downcast_ref::<std::io::Error>());
        assert!(got.is_some(), "{error:?}");
    }

    #[test]
    fn conversion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::conversion(DESCRIPTION, source);
        assert!(error.is_conversion(), "{error:?}");
        assert_eq!(error.description(), Some(DESCRIPTION));
        assert!(error.to_string().contains(DESCRIPTION), "{error}");
    }

    #[test]
    fn fetch() {
        let error = Error::fetch(DESCRIPTION, forbidden());
        assert!(error.is_fetch(), "{error:?}");
        assert!(!error.is_update(), "{error:?}");
        assert!(error.is_transport(), "{error:?}");
        assert_eq!(error.description(), Some(DESCRIPTION));
        assert_eq!(error.http_status_code(), Some(403));
        assert_eq!(
            error.http_payload(),
            Some(&bytes::Bytes::from_static(b"access denied"))
        );
        let headers = error.http_headers().expect("headers are present");
        assert!(headers.contains_key("content-type"), "{headers:?}");
        let fmt = error.to_string();
        assert!(fmt.contains("Error retrieving IAM policy"), "{fmt}");
        assert!(fmt.contains(DESCRIPTION), "{fmt}");
        assert!(fmt.contains("[403]"), "{fmt}");
        let inner = error.source().and_then(|e| e.downcast_ref::<Error>());
        assert!(inner.is_some_and(|e| e.http_status_code() == Some(403)));
    }

    #[test]
    fn update() {
        let error = Error::update(DESCRIPTION, Error::timeout("deadline exceeded"));
        assert!(error.is_update(), "{error:?}");
        assert!(error.is_timeout(), "{error:?}");
        assert!(error.http_status_code().is_none(), "{error:?}");
        let fmt = error.to_string();
        assert!(fmt.contains("Error setting IAM policy"), "{fmt}");
        assert!(fmt.contains("deadline exceeded"), "{fmt}");
    }

    #[test]
    fn io_and_deser() {
        let error = Error::io("connection refused");
        assert!(error.is_io(), "{error:?}");
        assert!(!error.is_timeout(), "{error:?}");
        let error = Error::deser("not json");
        assert!(error.is_deserialization(), "{error:?}");
        assert!(error.to_string().contains("not json"), "{error}");
    }

    #[test]
    fn binding() {
        let error = Error::binding("missing variable");
        assert!(error.is_binding(), "{error:?}");
        assert!(error.http_headers().is_none(), "{error:?}");
        assert!(error.http_payload().is_none(), "{error:?}");
    }

    #[test]
    fn transport_binary_payload() {
        let error = Error::http(
            500,
            http::HeaderMap::new(),
            bytes::Bytes::from_static(&[0xff, 0xfe]),
        );
        assert!(error.to_string().contains("[500]"), "{error}");
    }
}
