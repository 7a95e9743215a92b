//! Multipart form data parser for package uploads.
//!
//! Parses `multipart/form-data` bodies into named fields and the uploaded
//! package part. This is a synchronous parser over the already-collected
//! body bytes — installer uploads arrive as one bounded body, not a stream.
//!
//! The upload policy (non-empty filename, accepted extension) is enforced by
//! the upload operation; the parser only reports what the client sent,
//! including an empty filename when the form submitted no file selection.

use std::collections::HashMap;

use bytes::Bytes;

use updatehub_core::UpdateError;

/// The form field carrying the uploaded package.
pub const FILE_FIELD: &str = "file";

/// A parsed multipart form-data submission.
#[derive(Debug)]
pub struct UploadForm {
    /// Non-file form fields (name → value).
    pub fields: HashMap<String, String>,
    /// The client-supplied filename of the file part, if any.
    pub file_name: Option<String>,
    /// The uploaded package bytes.
    pub file_data: Bytes,
    /// The Content-Type of the file part, if specified.
    pub file_content_type: Option<String>,
}

/// Extract the boundary string from a `Content-Type: multipart/form-data; boundary=...` header.
///
/// # Errors
///
/// Returns [`UpdateError::InvalidMultipart`] if the Content-Type is missing
/// multipart/form-data or the boundary parameter is absent.
pub fn extract_boundary(content_type: &str) -> Result<String, UpdateError> {
    if !content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return Err(UpdateError::InvalidMultipart {
            reason: format!("expected multipart/form-data, got: {content_type}"),
        });
    }

    for part in content_type.split(';') {
        let trimmed = part.trim();
        if let Some(val) = trimmed.strip_prefix("boundary=") {
            let boundary = val.trim_matches('"').to_owned();
            if boundary.is_empty() {
                return Err(UpdateError::InvalidMultipart {
                    reason: String::from("empty boundary in Content-Type"),
                });
            }
            return Ok(boundary);
        }
    }

    Err(UpdateError::InvalidMultipart {
        reason: String::from("missing boundary in Content-Type"),
    })
}

/// Parse a multipart/form-data body into form fields and the file part.
///
/// # Errors
///
/// Returns [`UpdateError::NoFile`] if the body contains no file part.
pub fn parse_upload_form(body: &[u8], boundary: &str) -> Result<UploadForm, UpdateError> {
    let delimiter = format!("--{boundary}");
    let end_delimiter = format!("--{boundary}--");

    let mut fields: HashMap<String, String> = HashMap::new();
    let mut file_name: Option<String> = None;
    let mut file_data: Option<Bytes> = None;
    let mut file_content_type: Option<String> = None;

    let parts = split_multipart_parts(body, delimiter.as_bytes(), end_delimiter.as_bytes());

    for part_bytes in parts {
        // Each part has headers separated from its body by \r\n\r\n.
        let Some((headers_section, part_body)) = split_headers_body(part_bytes) else {
            continue;
        };

        let disposition = parse_content_disposition(headers_section);
        let Some(field_name) = disposition.name else {
            continue;
        };

        if field_name == FILE_FIELD || disposition.filename.is_some() {
            file_name = disposition.filename;
            file_content_type = parse_part_content_type(headers_section);
            file_data = Some(Bytes::copy_from_slice(part_body));
        } else {
            let value = String::from_utf8_lossy(part_body).into_owned();
            fields.insert(field_name, value);
        }
    }

    let file_data = file_data.ok_or(UpdateError::NoFile)?;

    Ok(UploadForm {
        fields,
        file_name,
        file_data,
        file_content_type,
    })
}

/// Split the multipart body into individual parts by boundary.
fn split_multipart_parts<'a>(
    body: &'a [u8],
    delimiter: &[u8],
    end_delimiter: &[u8],
) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut remaining = body;

    // Skip the preamble (everything before the first delimiter).
    if let Some(pos) = find_bytes(remaining, delimiter) {
        remaining = &remaining[pos + delimiter.len()..];
        remaining = skip_crlf(remaining);
    } else {
        return parts;
    }

    loop {
        if remaining.starts_with(end_delimiter)
            || remaining
                .strip_prefix(b"\r\n")
                .is_some_and(|r| r.starts_with(end_delimiter))
        {
            break;
        }

        if let Some(pos) = find_bytes(remaining, delimiter) {
            // The part content is everything before the delimiter, minus trailing \r\n.
            let part = strip_trailing_crlf(&remaining[..pos]);
            parts.push(part);
            remaining = &remaining[pos + delimiter.len()..];
            remaining = skip_crlf(remaining);
        } else {
            // No more delimiters — treat the rest as the last part.
            let part = strip_trailing_crlf(remaining);
            if !part.is_empty() {
                parts.push(part);
            }
            break;
        }
    }

    parts
}

/// Split a part into headers section and body at the first \r\n\r\n boundary.
fn split_headers_body(part: &[u8]) -> Option<(&[u8], &[u8])> {
    let separator = b"\r\n\r\n";
    find_bytes(part, separator).map(|pos| (&part[..pos], &part[pos + separator.len()..]))
}

/// Parsed Content-Disposition header fields.
struct ContentDisposition {
    name: Option<String>,
    filename: Option<String>,
}

/// Parse a Content-Disposition header from a headers section.
fn parse_content_disposition(headers: &[u8]) -> ContentDisposition {
    let headers_str = String::from_utf8_lossy(headers);
    let mut name = None;
    let mut filename = None;

    for line in headers_str.split("\r\n") {
        let lower = line.to_ascii_lowercase();
        if !lower.starts_with("content-disposition:") {
            continue;
        }

        if let Some(n) = extract_quoted_param(line, "name") {
            name = Some(n);
        }
        if let Some(f) = extract_quoted_param(line, "filename") {
            filename = Some(f);
        }
    }

    ContentDisposition { name, filename }
}

/// Extract the Content-Type from a part's headers section.
fn parse_part_content_type(headers: &[u8]) -> Option<String> {
    let headers_str = String::from_utf8_lossy(headers);
    for line in headers_str.split("\r\n") {
        let lower = line.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("content-type:") {
            return Some(rest.trim().to_owned());
        }
    }
    None
}

/// Extract a quoted parameter value from a header line.
///
/// Looks for `param_name="value"` (or the unquoted form) and returns the
/// value. Quoted values may be empty — a form with no file selected submits
/// `filename=""`.
fn extract_quoted_param(header_line: &str, param_name: &str) -> Option<String> {
    let quoted_pattern = format!("{param_name}=\"");
    let unquoted_pattern = format!("{param_name}=");

    let lower_line = header_line.to_ascii_lowercase();

    if let Some(pos) = lower_line.find(&quoted_pattern) {
        let start = pos + quoted_pattern.len();
        let rest = &header_line[start..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_owned());
        }
    }

    if let Some(pos) = lower_line.find(&unquoted_pattern) {
        let start = pos + unquoted_pattern.len();
        let rest = &header_line[start..];
        let end = rest.find(';').unwrap_or(rest.len());
        let val = rest[..end].trim().to_owned();
        if !val.is_empty() {
            return Some(val);
        }
    }

    None
}

/// Find the position of a needle in a haystack.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Skip leading \r\n.
fn skip_crlf(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\r\n").unwrap_or(data)
}

/// Strip trailing \r\n.
fn strip_trailing_crlf(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n").unwrap_or(data)
}
