//! Authoring checks for HTTP case descriptors.
//!
//! Findings never change how a case runs; hosts report them as warnings.

use std::fmt;

use super::http::HttpCaseDescriptor;
use crate::request::HttpMethod;

/// Something suspicious about how an HTTP case was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    /// The label names a verb other than the one the case sends.
    LabelVerbMismatch {
        /// Verb named in the label.
        labeled: HttpMethod,
        /// Verb the request is sent with.
        resolved: HttpMethod,
    },
    /// More than one verb-named payload property is present.
    AmbiguousVerbProperties(Vec<HttpMethod>),
    /// An explicit `verb` hides a payload stored under another verb property.
    VerbShadowsProperty {
        /// Explicit verb.
        verb: HttpMethod,
        /// Ignored property.
        property: HttpMethod,
    },
    /// Only one of `user` / `pass` is present, so no auth is attached.
    IncompleteCredentials,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LabelVerbMismatch { labeled, resolved } => {
                write!(f, "label mentions {labeled} but the request is sent as {resolved}")
            }
            Self::AmbiguousVerbProperties(methods) => {
                let names: Vec<_> = methods.iter().map(|m| m.property_name()).collect();
                write!(
                    f,
                    "several verb properties present ({}), using '{}'",
                    names.join(", "),
                    names.first().copied().unwrap_or_default()
                )
            }
            Self::VerbShadowsProperty { verb, property } => write!(
                f,
                "explicit verb {verb} ignores the '{}' property",
                property.property_name()
            ),
            Self::IncompleteCredentials => {
                f.write_str("only one of user/pass is set, request is sent unauthenticated")
            }
        }
    }
}

impl HttpCaseDescriptor {
    /// Checks the descriptor for likely authoring mistakes.
    #[must_use]
    pub fn lint(&self) -> Vec<LintWarning> {
        let mut warnings = Vec::new();
        let properties: Vec<HttpMethod> = self.verb_properties().map(|(m, _)| m).collect();

        if properties.len() > 1 && self.verb.is_none() {
            warnings.push(LintWarning::AmbiguousVerbProperties(properties.clone()));
        }

        if let Ok((resolved, _)) = self.resolve_verb() {
            if self.verb.is_some() {
                for property in properties.iter().filter(|p| **p != resolved) {
                    warnings.push(LintWarning::VerbShadowsProperty {
                        verb: resolved,
                        property: *property,
                    });
                }
            }
            if let Some(labeled) = labeled_verb(&self.label)
                && labeled != resolved
            {
                warnings.push(LintWarning::LabelVerbMismatch { labeled, resolved });
            }
        }

        if self.user.is_some() != self.pass.is_some() {
            warnings.push(LintWarning::IncompleteCredentials);
        }

        warnings
    }
}

/// First word of the label that names a verb.
fn labeled_verb(label: &str) -> Option<HttpMethod> {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .find_map(|word| HttpMethod::from_verb(word).ok())
}
