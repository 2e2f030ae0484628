//! Shared utilities: secure token generation and HTTP response building.

pub mod crypto;
pub mod responses;

pub use responses::ResponseBuilder;

/// Detect whether a request originates from an interactive browser, used to
/// choose between a login redirect and a JSON 401 for protected paths.
#[must_use]
pub fn is_browser_request(req: &actix_web::HttpRequest) -> bool {
    req.headers()
        .get(actix_web::http::header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Validate a caller-supplied return path before echoing it into a redirect.
///
/// Only same-origin absolute paths survive: anything not starting with a
/// single `/` (protocol-relative `//` included) is dropped so the login
/// round-trip can never become an open redirect.
#[must_use]
pub fn sanitize_return_path(next: Option<&str>) -> Option<String> {
    let next = next?;
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        Some(next.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_return_path_allows_same_origin_paths() {
        assert_eq!(
            sanitize_return_path(Some("/dashboard")),
            Some("/dashboard".to_string())
        );
        assert_eq!(
            sanitize_return_path(Some("/portal/reports?page=2")),
            Some("/portal/reports?page=2".to_string())
        );
    }

    #[test]
    fn test_return_path_rejects_external_targets() {
        assert!(sanitize_return_path(Some("https://evil.example.com")).is_none());
        assert!(sanitize_return_path(Some("//evil.example.com")).is_none());
        assert!(sanitize_return_path(Some("/\\evil.example.com")).is_none());
        assert!(sanitize_return_path(None).is_none());
    }

    #[test]
    fn test_browser_detection_by_accept_header() {
        let browser = TestRequest::get()
            .insert_header(("Accept", "text/html,application/xhtml+xml"))
            .to_http_request();
        assert!(is_browser_request(&browser));

        let api = TestRequest::get()
            .insert_header(("Accept", "application/json"))
            .to_http_request();
        assert!(!is_browser_request(&api));

        let bare = TestRequest::get().to_http_request();
        assert!(!is_browser_request(&bare));
    }
}
