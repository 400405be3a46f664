//! HTTP case descriptors

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::expectation::{FieldExpectation, ResponseAssert, StatusExpectation};
use crate::fixture::Fixture;
use crate::matcher::{BodyMatcher, Matcher};
use crate::request::{HeaderEntry, HttpMethod};
use crate::response::ResponseSpec;

/// Data-only description of one HTTP request and the expectations checked
/// against its response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpCaseDescriptor {
    /// Display name.
    #[serde(default, alias = "desc")]
    pub label: String,
    /// Base URL, usually supplied by the suite fixture.
    #[serde(default)]
    pub host: Option<String>,
    /// Request path, appended to the host.
    pub path: String,
    /// Explicit verb (case-insensitive, `del` is accepted).
    #[serde(default)]
    pub verb: Option<String>,
    /// Request payload.
    #[serde(default)]
    pub send: Option<Value>,
    /// GET with payload.
    #[serde(default)]
    pub get: Option<Value>,
    /// POST with payload.
    #[serde(default)]
    pub post: Option<Value>,
    /// PUT with payload.
    #[serde(default)]
    pub put: Option<Value>,
    /// DELETE with payload.
    #[serde(default, alias = "del")]
    pub delete: Option<Value>,
    /// PATCH with payload.
    #[serde(default)]
    pub patch: Option<Value>,
    /// Basic-auth user.
    #[serde(default)]
    pub user: Option<String>,
    /// Basic-auth password.
    #[serde(default)]
    pub pass: Option<String>,
    /// Headers, applied in order.
    #[serde(default)]
    pub set: Vec<HeaderEntry>,
    /// Value of the `Accept` header.
    #[serde(default)]
    pub accept: Option<String>,
    /// Expected status.
    #[serde(default)]
    pub status: Option<StatusExpectation>,
    /// Expected `Content-Type`.
    #[serde(default, rename = "type")]
    pub content_type: Option<Matcher>,
    /// Expected body.
    #[serde(default)]
    pub body: Option<BodyMatcher>,
    /// Header expectations, checked in order.
    #[serde(default)]
    pub expect: Vec<FieldExpectation>,
    /// Final custom assertion over the whole response.
    #[serde(skip)]
    pub assert: Option<ResponseAssert>,
}

/// The subset of an HTTP case a fixture may supply.
#[derive(Debug, Default, Deserialize)]
struct HttpDefaults {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    verb: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    pass: Option<String>,
    #[serde(default)]
    set: Vec<HeaderEntry>,
    #[serde(default)]
    accept: Option<String>,
    #[serde(default)]
    status: Option<StatusExpectation>,
    #[serde(default, rename = "type")]
    content_type: Option<Matcher>,
    #[serde(default)]
    body: Option<BodyMatcher>,
    #[serde(default)]
    expect: Vec<FieldExpectation>,
}

impl HttpCaseDescriptor {
    /// Creates a GET case for `path`.
    #[must_use]
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the explicit verb.
    #[must_use]
    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    /// Sets the payload sent with the explicit verb.
    #[must_use]
    pub fn with_send(mut self, payload: Value) -> Self {
        self.send = Some(payload);
        self
    }

    /// Sets the verb-named payload property for `method`.
    #[must_use]
    pub fn with_payload(mut self, method: HttpMethod, payload: Value) -> Self {
        *self.verb_property_mut(method) = Some(payload);
        self
    }

    /// Sets the basic-auth user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the basic-auth password.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    /// Appends a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push(HeaderEntry::new(name, value));
        self
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Sets the expected status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<StatusExpectation>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the expected `Content-Type`.
    #[must_use]
    pub fn with_type(mut self, matcher: Matcher) -> Self {
        self.content_type = Some(matcher);
        self
    }

    /// Sets the expected body.
    #[must_use]
    pub fn with_body(mut self, matcher: BodyMatcher) -> Self {
        self.body = Some(matcher);
        self
    }

    /// Appends a header expectation.
    #[must_use]
    pub fn with_expect(mut self, field: impl Into<String>, matcher: Matcher) -> Self {
        self.expect.push(FieldExpectation::new(field, matcher));
        self
    }

    /// Sets the final custom assertion.
    #[must_use]
    pub fn with_assert<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResponseSpec) -> Result<(), String> + Send + Sync + 'static,
    {
        self.assert = Some(ResponseAssert::new(f));
        self
    }

    /// Name shown by the host: the label, or `VERB path` when unlabeled.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.label.trim().is_empty() {
            let verb = self
                .resolve_verb()
                .map_or_else(|_| "?".to_string(), |(method, _)| method.to_string());
            format!("{verb} {}", self.path)
        } else {
            self.label.clone()
        }
    }

    /// Payload stored under the property named after `method`.
    #[must_use]
    pub fn verb_property(&self, method: HttpMethod) -> Option<&Value> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }

    fn verb_property_mut(&mut self, method: HttpMethod) -> &mut Option<Value> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
        }
    }

    /// Verb properties present on this descriptor, in inference order.
    pub fn verb_properties(&self) -> impl Iterator<Item = (HttpMethod, &Value)> {
        HttpMethod::inference_order()
            .iter()
            .filter_map(|method| self.verb_property(*method).map(|payload| (*method, payload)))
    }

    /// Resolves the request verb and its payload.
    ///
    /// An explicit `verb` wins and sends `send` (or the matching verb
    /// property). Otherwise the first verb property present decides, in the
    /// order post, put, delete, patch, get. Otherwise the verb is GET.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedMethod`] for an unknown explicit verb.
    pub fn resolve_verb(&self) -> DomainResult<(HttpMethod, Option<Value>)> {
        if let Some(verb) = &self.verb {
            let method = HttpMethod::from_verb(verb)?;
            let payload = self
                .send
                .clone()
                .or_else(|| self.verb_property(method).cloned());
            return Ok((method, payload));
        }
        if let Some((method, payload)) = self.verb_properties().next() {
            return Ok((method, Some(payload.clone())));
        }
        Ok((HttpMethod::Get, self.send.clone()))
    }

    /// Returns a copy with fixture values filling in the fields this
    /// descriptor leaves unset. The descriptor's own values always win.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFixture`] when a fixture key named like an
    /// HTTP field holds a value of the wrong shape.
    pub fn merged_with(&self, fixture: &Fixture) -> DomainResult<Self> {
        if fixture.is_empty() {
            return Ok(self.clone());
        }
        let defaults: HttpDefaults =
            serde_json::from_value(Value::Object(fixture.as_map().clone()))
                .map_err(|e| DomainError::InvalidFixture(e.to_string()))?;

        let mut merged = self.clone();
        merged.host = merged.host.or(defaults.host);
        if merged.verb.is_none() && merged.verb_properties().next().is_none() {
            merged.verb = defaults.verb;
        }
        merged.user = merged.user.or(defaults.user);
        merged.pass = merged.pass.or(defaults.pass);
        if merged.set.is_empty() {
            merged.set = defaults.set;
        }
        merged.accept = merged.accept.or(defaults.accept);
        merged.status = merged.status.or(defaults.status);
        merged.content_type = merged.content_type.or(defaults.content_type);
        merged.body = merged.body.or(defaults.body);
        if merged.expect.is_empty() {
            merged.expect = defaults.expect;
        }
        Ok(merged)
    }

    /// Returns the base URL, or an error naming this case.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingHost`] when no host is set.
    pub fn require_host(&self) -> DomainResult<&str> {
        self.host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| DomainError::MissingHost(self.display_name()))
    }

    /// Basic-auth credentials, only when both halves are present.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.pass) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixture(value: Value) -> Fixture {
        Fixture::from_value(value).unwrap()
    }

    #[test]
    fn test_explicit_verb_with_send() {
        let case = HttpCaseDescriptor::new("post", "/items")
            .with_verb("post")
            .with_send(json!({}));
        assert_eq!(
            case.resolve_verb().unwrap(),
            (HttpMethod::Post, Some(json!({})))
        );
    }

    #[test]
    fn test_verb_inferred_from_property() {
        let case = HttpCaseDescriptor::new("put", "/items/1").with_payload(HttpMethod::Put, json!({}));
        assert_eq!(
            case.resolve_verb().unwrap(),
            (HttpMethod::Put, Some(json!({})))
        );
    }

    #[test]
    fn test_del_verb() {
        let case = HttpCaseDescriptor::new("del", "/items/1")
            .with_verb("DEL")
            .with_send(json!({}));
        assert_eq!(case.resolve_verb().unwrap().0, HttpMethod::Delete);
    }

    #[test]
    fn test_default_verb_is_get() {
        let case = HttpCaseDescriptor::new("list", "/items");
        assert_eq!(case.resolve_verb().unwrap(), (HttpMethod::Get, None));
    }

    #[test]
    fn test_unknown_verb() {
        let case = HttpCaseDescriptor::new("trace", "/").with_verb("trace");
        assert_eq!(
            case.resolve_verb(),
            Err(DomainError::UnsupportedMethod("trace".to_string()))
        );
    }

    #[test]
    fn test_property_order_prefers_post() {
        let case = HttpCaseDescriptor::new("both", "/")
            .with_payload(HttpMethod::Get, json!(1))
            .with_payload(HttpMethod::Post, json!(2));
        assert_eq!(
            case.resolve_verb().unwrap(),
            (HttpMethod::Post, Some(json!(2)))
        );
    }

    #[test]
    fn test_merge_fills_absent_fields_only() {
        let case = HttpCaseDescriptor::new("get", "/items").with_accept("text/html");
        let merged = case
            .merged_with(&fixture(json!({
                "host": "http://localhost:9000",
                "accept": "application/json",
                "pending": false,
                "unrelated": [1, 2, 3]
            })))
            .unwrap();

        assert_eq!(merged.host.as_deref(), Some("http://localhost:9000"));
        assert_eq!(merged.accept.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_merge_keeps_own_host() {
        let case = HttpCaseDescriptor::new("get", "/").with_host("http://own");
        let merged = case
            .merged_with(&fixture(json!({"host": "http://shared"})))
            .unwrap();
        assert_eq!(merged.host.as_deref(), Some("http://own"));
    }

    #[test]
    fn test_merge_verb_does_not_shadow_property() {
        let case = HttpCaseDescriptor::new("put", "/").with_payload(HttpMethod::Put, json!({}));
        let merged = case.merged_with(&fixture(json!({"verb": "post"}))).unwrap();
        assert_eq!(merged.resolve_verb().unwrap().0, HttpMethod::Put);
    }

    #[test]
    fn test_merge_rejects_malformed_fixture_field() {
        let case = HttpCaseDescriptor::new("get", "/");
        let result = case.merged_with(&fixture(json!({"host": 42})));
        assert!(matches!(result, Err(DomainError::InvalidFixture(_))));
    }

    #[test]
    fn test_credentials_need_both_halves() {
        let case = HttpCaseDescriptor::new("auth", "/").with_user("a@b.c");
        assert_eq!(case.credentials(), None);

        let case = case.with_pass("123456");
        assert_eq!(case.credentials(), Some(("a@b.c", "123456")));
    }

    #[test]
    fn test_missing_host() {
        let case = HttpCaseDescriptor::new("nowhere", "/");
        assert_eq!(
            case.require_host(),
            Err(DomainError::MissingHost("nowhere".to_string()))
        );
    }

    #[test]
    fn test_deserialize_full_case() {
        let case: HttpCaseDescriptor = serde_json::from_value(json!({
            "desc": "auth",
            "host": "http://localhost:9000",
            "path": "/api/path/",
            "user": "email@domain.com",
            "pass": "123456",
            "set": [{"X-Auth-Token": "d9aff2ca"}],
            "status": 200,
            "type": {"regex": "json"},
            "expect": [{"Content-Type": {"regex": "json"}}]
        }))
        .unwrap();

        assert_eq!(case.label, "auth");
        assert_eq!(case.set, vec![HeaderEntry::new("X-Auth-Token", "d9aff2ca")]);
        assert_eq!(case.status, Some(StatusExpectation::Exact(200)));
        assert_eq!(case.expect.len(), 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_value::<HttpCaseDescriptor>(json!({
            "path": "/", "stauts": 200
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_request_line() {
        let case = HttpCaseDescriptor::new("", "/items").with_payload(HttpMethod::Post, json!({}));
        assert_eq!(case.display_name(), "POST /items");
    }
}
