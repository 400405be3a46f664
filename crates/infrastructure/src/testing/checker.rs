//! Expectation checker.
//!
//! Checks expectations against a response in attachment order and reports the
//! first one that does not hold.

use assay_domain::{
    BodyMatcher, CaseFailure, CaseResult, Expectation, Matcher, ResponseSpec, StatusCode,
    StatusExpectation,
};

const PREVIEW_CHARS: usize = 100;

/// Checks HTTP expectations against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectationChecker;

impl ExpectationChecker {
    /// Create a new checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks every expectation in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::Expectation`] for the first expectation that
    /// does not hold.
    pub fn check_all(&self, expectations: &[Expectation], response: &ResponseSpec) -> CaseResult {
        expectations
            .iter()
            .try_for_each(|expectation| self.check(expectation, response))
    }

    /// Checks a single expectation.
    ///
    /// # Errors
    ///
    /// Returns [`CaseFailure::Expectation`] when the expectation does not hold.
    pub fn check(&self, expectation: &Expectation, response: &ResponseSpec) -> CaseResult {
        let outcome = match expectation {
            Expectation::Status(expected) => self.check_status(expected, response),
            Expectation::Header { name, matcher } => self.check_header(name, matcher, response),
            Expectation::Body(matcher) => self.check_body(matcher, response),
            Expectation::Custom(assert) => assert.check(response),
        };
        outcome.map_err(|message| CaseFailure::expectation(expectation.description(), message))
    }

    fn check_status(
        &self,
        expected: &StatusExpectation,
        response: &ResponseSpec,
    ) -> Result<(), String> {
        let actual = response.status_code();
        if expected.matches(actual.as_u16()) {
            return Ok(());
        }
        match expected {
            StatusExpectation::Exact(code) => Err(format!(
                "expected {}, got {actual}",
                StatusCode::new(*code)
            )),
            other => Err(format!(
                "expected status {}, got {actual}",
                other.description()
            )),
        }
    }

    fn check_header(
        &self,
        name: &str,
        matcher: &Matcher,
        response: &ResponseSpec,
    ) -> Result<(), String> {
        let Some(actual) = response.get_header(name) else {
            return Err(format!("expected \"{name}\" header field"));
        };
        if matcher.matches(actual) {
            return Ok(());
        }
        match matcher {
            Matcher::Literal(_) => Err(format!(
                "expected \"{name}\" of {matcher}, got \"{actual}\""
            )),
            Matcher::Pattern(_) => Err(format!(
                "expected \"{name}\" matching {matcher}, got \"{actual}\""
            )),
        }
    }

    fn check_body(&self, matcher: &BodyMatcher, response: &ResponseSpec) -> Result<(), String> {
        let body = &response.body;
        match matcher {
            BodyMatcher::Text(expected) if body == expected => Ok(()),
            BodyMatcher::Text(_) => Err(format!(
                "expected {matcher} response body, got '{}'",
                preview(body)
            )),
            BodyMatcher::Pattern(regex) if regex.is_match(body) => Ok(()),
            BodyMatcher::Pattern(_) => Err(format!(
                "expected body '{}' to match {matcher}",
                preview(body)
            )),
            BodyMatcher::Json(expected) => match response.body_as_json() {
                Some(actual) if &actual == expected => Ok(()),
                Some(actual) => Err(format!("expected {expected} response body, got {actual}")),
                None => Err(format!(
                    "expected {expected} response body, got non-JSON '{}'",
                    preview(body)
                )),
            },
        }
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assay_domain::ResponseAssert;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn response(status: u16, content_type: &str, body: &str) -> ResponseSpec {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        headers.insert("x-request-id".to_string(), "req-42".to_string());
        ResponseSpec::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(3))
    }

    fn message(result: CaseResult) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_status_exact() {
        let checker = ExpectationChecker::new();
        let ok = response(201, "application/json", "{}");
        let missing = response(404, "text/plain", "nope");

        assert_eq!(checker.check(&Expectation::Status(StatusExpectation::Exact(201)), &ok), Ok(()));
        assert_eq!(
            message(checker.check(&Expectation::Status(StatusExpectation::Exact(201)), &missing)),
            "expected 201 \"Created\", got 404 \"Not Found\""
        );
    }

    #[test]
    fn test_status_range() {
        let checker = ExpectationChecker::new();
        let expectation = Expectation::Status(StatusExpectation::success());

        assert_eq!(
            checker.check(&expectation, &response(204, "text/plain", "")),
            Ok(())
        );
        assert_eq!(
            message(checker.check(&expectation, &response(500, "text/plain", ""))),
            "expected status in 200-299, got 500 \"Internal Server Error\""
        );
    }

    #[test]
    fn test_content_type_pattern_cites_header() {
        let checker = ExpectationChecker::new();
        let expectation = Expectation::Header {
            name: "Content-Type".to_string(),
            matcher: Matcher::pattern("json").unwrap(),
        };

        let result = checker.check(&expectation, &response(200, "text/plain", "hi"));

        assert_eq!(
            result,
            Err(CaseFailure::expectation(
                "header 'Content-Type' matches /json/",
                "expected \"Content-Type\" matching /json/, got \"text/plain\""
            ))
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let checker = ExpectationChecker::new();
        let expectation = Expectation::Header {
            name: "X-Request-Id".to_string(),
            matcher: Matcher::literal("req-42"),
        };

        assert_eq!(
            checker.check(&expectation, &response(200, "text/plain", "")),
            Ok(())
        );
    }

    #[test]
    fn test_missing_header() {
        let checker = ExpectationChecker::new();
        let expectation = Expectation::Header {
            name: "ETag".to_string(),
            matcher: Matcher::literal("abc"),
        };

        assert_eq!(
            message(checker.check(&expectation, &response(200, "text/plain", ""))),
            "expected \"ETag\" header field"
        );
    }

    #[test]
    fn test_body_matchers() {
        let checker = ExpectationChecker::new();
        let json_response = response(200, "application/json", r#"{"id": 7, "tags": []}"#);

        assert_eq!(
            checker.check(
                &Expectation::Body(BodyMatcher::Json(json!({"tags": [], "id": 7}))),
                &json_response
            ),
            Ok(())
        );
        assert_eq!(
            checker.check(
                &Expectation::Body(BodyMatcher::pattern(r#""id":\s*7"#).unwrap()),
                &json_response
            ),
            Ok(())
        );
        assert_eq!(
            message(checker.check(
                &Expectation::Body(BodyMatcher::Text("ok".to_string())),
                &response(200, "text/plain", "not ok")
            )),
            "expected 'ok' response body, got 'not ok'"
        );
    }

    #[test]
    fn test_long_body_is_previewed() {
        let checker = ExpectationChecker::new();
        let body = "é".repeat(150);

        let text = message(checker.check(
            &Expectation::Body(BodyMatcher::Text("short".to_string())),
            &response(200, "text/plain", &body),
        ));

        assert!(text.ends_with("...'"), "{text}");
        assert_eq!(text.matches('é').count(), 100);
    }

    #[test]
    fn test_first_failure_wins() {
        let checker = ExpectationChecker::new();
        let expectations = vec![
            Expectation::Status(StatusExpectation::Exact(200)),
            Expectation::Header {
                name: "X-First".to_string(),
                matcher: Matcher::literal("1"),
            },
            Expectation::Header {
                name: "X-Second".to_string(),
                matcher: Matcher::literal("2"),
            },
        ];

        let result = checker.check_all(&expectations, &response(200, "text/plain", ""));

        assert_eq!(message(result), "expected \"X-First\" header field");
    }

    #[test]
    fn test_custom_assertion() {
        let checker = ExpectationChecker::new();
        let expectation = Expectation::Custom(ResponseAssert::new(|response| {
            if response.body.contains("ready") {
                Ok(())
            } else {
                Err(format!("body was '{}'", response.body))
            }
        }));

        assert_eq!(
            message(checker.check(&expectation, &response(200, "text/plain", "booting"))),
            "body was 'booting'"
        );
    }
}
