use crate::error::TransportError;

/// Longest raw body echoed back in an error message.
const MAX_ERROR_BODY: usize = 256;

/// Parse a non-2xx beacon API response into a structured `TransportError`.
///
/// The beacon API defines errors as `{"code": <int>, "message": <string>}`.
/// If the body matches that shape we surface its message; otherwise the
/// (truncated) raw body is used so the operator still sees what came back.
pub(super) fn parse_api_error(status: u16, body: &str) -> TransportError {
    #[derive(serde::Deserialize)]
    struct ApiErrorBody {
        message: String,
    }

    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "<empty body>".to_owned(),
        Err(_) => truncate(body.trim(), MAX_ERROR_BODY),
    };
    TransportError::Api { status, message }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_owned();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_standard_shape() {
        let err = parse_api_error(400, r#"{"code":400,"message":"Invalid epoch: x","stacktraces":[]}"#);
        assert!(matches!(
            err,
            TransportError::Api { status: 400, ref message } if message == "Invalid epoch: x"
        ));
    }

    #[test]
    fn parse_api_error_plain_text() {
        let err = parse_api_error(502, "Bad Gateway\n");
        assert!(matches!(
            err,
            TransportError::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn parse_api_error_empty_and_long_bodies() {
        let empty = parse_api_error(503, "");
        assert!(matches!(
            empty,
            TransportError::Api { ref message, .. } if message == "<empty body>"
        ));

        let long = parse_api_error(500, &"é".repeat(300));
        let TransportError::Api { message, .. } = long else {
            panic!("expected api error");
        };
        assert!(message.ends_with("..."));
        assert!(message.len() <= MAX_ERROR_BODY + 3);
    }
}
