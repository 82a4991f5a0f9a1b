//! cgi
//!
//! CGI request and response envelope.
//!
//! The request body arrives on stdin, bounded by `CONTENT_LENGTH` when the
//! server sets it. The response is a `Status` header, a JSON content type
//! and the serialized body.

use std::io::{Read, Write};

use thiserror::Error;

use crate::handler::HandlerResponse;

/// Environment variable carrying the request body length.
pub const CONTENT_LENGTH_VAR: &str = "CONTENT_LENGTH";

/// Errors from the CGI envelope.
#[derive(Debug, Error)]
pub enum CgiError {
    #[error("invalid CONTENT_LENGTH '{0}'")]
    InvalidContentLength(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read the request body.
///
/// With a content length, at most that many bytes are read. An empty or
/// absent length reads to end of input.
pub fn read_request<R: Read>(reader: R, content_length: Option<&str>) -> Result<Vec<u8>, CgiError> {
    let mut body = Vec::new();
    match content_length.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let length: u64 = raw
                .parse()
                .map_err(|_| CgiError::InvalidContentLength(raw.to_string()))?;
            reader.take(length).read_to_end(&mut body)?;
        }
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut body)?;
        }
    }
    Ok(body)
}

/// Write the response envelope.
pub fn write_response<W: Write>(mut writer: W, response: &HandlerResponse) -> Result<(), CgiError> {
    let body = serde_json::to_string(&response.body)?;
    write!(
        writer,
        "Status: {} {}\r\nContent-Type: application/json\r\n\r\n{}\n",
        response.status,
        reason_phrase(response.status),
        body
    )?;
    writer.flush()?;
    Ok(())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::ValidationResponse;

    mod request {
        use super::*;

        #[test]
        fn content_length_bounds_body() {
            let body = read_request(&b"{\"a\":1}trailing"[..], Some("7")).unwrap();
            assert_eq!(body, b"{\"a\":1}");
        }

        #[test]
        fn missing_length_reads_all() {
            let body = read_request(&b"{}"[..], None).unwrap();
            assert_eq!(body, b"{}");
        }

        #[test]
        fn empty_length_reads_all() {
            let body = read_request(&b"{}"[..], Some("")).unwrap();
            assert_eq!(body, b"{}");
        }

        #[test]
        fn length_beyond_input_reads_what_is_there() {
            let body = read_request(&b"{}"[..], Some("100")).unwrap();
            assert_eq!(body, b"{}");
        }

        #[test]
        fn non_numeric_length_is_error() {
            let err = read_request(&b"{}"[..], Some("lots")).unwrap_err();
            assert!(matches!(err, CgiError::InvalidContentLength(ref v) if v == "lots"));
        }
    }

    mod response {
        use super::*;

        #[test]
        fn success_envelope() {
            let mut out = Vec::new();
            write_response(
                &mut out,
                &HandlerResponse {
                    status: 200,
                    body: ValidationResponse::success(),
                },
            )
            .unwrap();

            let text = String::from_utf8(out).unwrap();
            assert!(text.starts_with("Status: 200 OK\r\nContent-Type: application/json\r\n\r\n"));
            assert!(text.contains("\"status\":\"SUCCESS\""));
        }

        #[test]
        fn bad_request_envelope() {
            let mut out = Vec::new();
            let response = HandlerResponse::error(400, "invalid action", "nope");
            write_response(&mut out, &response).unwrap();

            let text = String::from_utf8(out).unwrap();
            assert!(text.starts_with("Status: 400 Bad Request\r\n"));
            assert!(text.contains("\"code\":400"));
        }
    }
}
