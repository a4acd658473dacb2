use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use tracing::warn;

use crate::shared::AppState;

pub const ACCESS_COOKIE_NAME: &str = "gym_access_token";
pub const REFRESH_COOKIE_NAME: &str = "gym_refresh_token";

const EXPIRED_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes stamped onto every Set-Cookie the application emits
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CookieChange {
    Set { value: String, max_age: i64 },
    Remove,
}

/// Per-request cookie store.
///
/// Holds the cookies the client sent plus every change made while handling the request.
/// Whoever owns the jar at the end of the request is responsible for writing the changes
/// onto the outgoing response with [`CookieJar::apply`] (or by returning the jar as a
/// response part).
#[derive(Debug, Clone)]
pub struct CookieJar {
    original: Vec<(String, String)>,
    changes: Vec<(String, CookieChange)>,
    options: CookieOptions,
}

impl CookieJar {
    pub fn new(options: CookieOptions) -> Self {
        Self {
            original: Vec::new(),
            changes: Vec::new(),
            options,
        }
    }

    /// Parses every `Cookie` header on the request
    pub fn from_headers(headers: &HeaderMap, options: CookieOptions) -> Self {
        let mut jar = Self::new(options);

        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                warn!("Ignoring non-ASCII Cookie header");
                continue;
            };

            for pair in raw.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                let name = parts.next().unwrap_or_default().trim();
                let Some(value) = parts.next() else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }
                jar.original
                    .push((name.to_string(), value.trim().trim_matches('"').to_string()));
            }
        }

        jar
    }

    /// Current value of a cookie, including changes made during this request
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some((_, change)) = self.changes.iter().find(|(n, _)| n == name) {
            return match change {
                CookieChange::Set { value, .. } => Some(value.as_str()),
                CookieChange::Remove => None,
            };
        }

        self.original
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>, max_age_secs: i64) {
        self.record(
            name,
            CookieChange::Set {
                value: value.into(),
                max_age: max_age_secs,
            },
        );
    }

    pub fn remove(&mut self, name: &str) {
        self.record(name, CookieChange::Remove);
    }

    /// Removes both session cookies
    pub fn clear_session(&mut self) {
        self.remove(ACCESS_COOKIE_NAME);
        self.remove(REFRESH_COOKIE_NAME);
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    fn record(&mut self, name: &str, change: CookieChange) {
        match self.changes.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = change,
            None => self.changes.push((name.to_string(), change)),
        }
    }

    /// Re-serialises the jar as a request `Cookie` header value
    pub fn cookie_header(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();

        for (name, value) in &self.original {
            if self.changes.iter().any(|(n, _)| n == name) {
                continue;
            }
            pairs.push(format!("{}={}", name, value));
        }

        for (name, change) in &self.changes {
            if let CookieChange::Set { value, .. } = change {
                pairs.push(format!("{}={}", name, value));
            }
        }

        pairs.join("; ")
    }

    /// Renders every recorded change as a `Set-Cookie` header value
    pub fn set_cookie_values(&self) -> Vec<String> {
        self.changes
            .iter()
            .map(|(name, change)| {
                let mut rendered = match change {
                    CookieChange::Set { value, max_age } => {
                        format!("{}={}; Max-Age={}", name, value, max_age)
                    }
                    CookieChange::Remove => {
                        format!("{}=; Max-Age=0; Expires={}", name, EXPIRED_DATE)
                    }
                };
                rendered.push_str(&format!(
                    "; Path={}; HttpOnly; SameSite={}",
                    self.options.path,
                    self.options.same_site.as_str()
                ));
                if self.options.secure {
                    rendered.push_str("; Secure");
                }
                rendered
            })
            .collect()
    }

    /// Appends one `Set-Cookie` header per change
    pub fn apply(&self, headers: &mut HeaderMap) {
        for value in self.set_cookie_values() {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Dropping unrepresentable Set-Cookie value"),
            }
        }
    }
}

impl IntoResponseParts for CookieJar {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.apply(res.headers_mut());
        Ok(res)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CookieJar {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CookieJar::from_headers(
            &parts.headers,
            state.cookie_options.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn test_parse_cookie_header() {
        let headers = headers_with_cookie("gym_access_token=abc.def; theme=dark;  empty=");
        let jar = CookieJar::from_headers(&headers, CookieOptions::default());

        assert_eq!(jar.get(ACCESS_COOKIE_NAME), Some("abc.def"));
        assert_eq!(jar.get("theme"), Some("dark"));
        assert_eq!(jar.get("empty"), Some(""));
        assert_eq!(jar.get("missing"), None);
        assert!(!jar.has_changes());
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));
        let jar = CookieJar::from_headers(&headers, CookieOptions::default());

        assert_eq!(jar.get("a"), Some("1"));
        assert_eq!(jar.get("b"), Some("2"));
    }

    #[test]
    fn test_set_overrides_original_and_last_write_wins() {
        let headers = headers_with_cookie("gym_access_token=old");
        let mut jar = CookieJar::from_headers(&headers, CookieOptions::default());

        jar.set(ACCESS_COOKIE_NAME, "new", 3600);
        assert_eq!(jar.get(ACCESS_COOKIE_NAME), Some("new"));

        jar.remove(ACCESS_COOKIE_NAME);
        assert_eq!(jar.get(ACCESS_COOKIE_NAME), None);

        let values = jar.set_cookie_values();
        assert_eq!(values.len(), 1);
        assert!(values[0].starts_with("gym_access_token=; Max-Age=0"));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let mut jar = CookieJar::new(CookieOptions::default());
        jar.set(REFRESH_COOKIE_NAME, "refresh", 60);

        let values = jar.set_cookie_values();
        assert_eq!(
            values[0],
            "gym_refresh_token=refresh; Max-Age=60; Path=/; HttpOnly; SameSite=Lax; Secure"
        );

        let mut insecure = CookieJar::new(CookieOptions {
            secure: false,
            same_site: SameSite::Strict,
            path: "/".to_string(),
        });
        insecure.set("a", "b", 1);
        assert!(!insecure.set_cookie_values()[0].contains("Secure"));
        assert!(insecure.set_cookie_values()[0].contains("SameSite=Strict"));
    }

    #[test]
    fn test_clear_session_emits_two_removals() {
        let mut jar = CookieJar::new(CookieOptions::default());
        jar.clear_session();

        let mut headers = HeaderMap::new();
        jar.apply(&mut headers);
        let values: Vec<_> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
        assert!(values.iter().any(|v| v.starts_with(ACCESS_COOKIE_NAME)));
        assert!(values.iter().any(|v| v.starts_with(REFRESH_COOKIE_NAME)));
    }

    #[test]
    fn test_cookie_header_reflects_changes() {
        let headers = headers_with_cookie("gym_access_token=old; theme=dark");
        let mut jar = CookieJar::from_headers(&headers, CookieOptions::default());
        jar.set(ACCESS_COOKIE_NAME, "fresh", 3600);
        jar.set(REFRESH_COOKIE_NAME, "r2", 3600);

        assert_eq!(
            jar.cookie_header(),
            "theme=dark; gym_access_token=fresh; gym_refresh_token=r2"
        );
    }
}
