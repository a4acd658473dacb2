#![allow(dead_code)]

use axum::http::StatusCode;

use gymdesk::session::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};

use super::setup::TestResponse;

// ============================================================================
// Response assertions
// ============================================================================

pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert_eq!(response.body["error"], message);
}

/// Both session cookies are expired on the response
pub fn assert_session_cleared(response: &TestResponse) {
    let cookies = response.set_cookies();
    for name in [ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME] {
        let prefix = format!("{}=;", name);
        assert!(
            cookies
                .iter()
                .any(|c| c.starts_with(&prefix) && c.contains("Max-Age=0")),
            "{} not cleared in {:?}",
            name,
            cookies
        );
    }
}

/// Value the response sets for `name`, if any
pub fn set_cookie_value(response: &TestResponse, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.set_cookies().iter().find_map(|cookie| {
        cookie
            .strip_prefix(&prefix)
            .and_then(|rest| rest.split(';').next())
            .map(str::to_string)
    })
}
