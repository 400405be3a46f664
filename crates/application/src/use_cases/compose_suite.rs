//! Suite composer use case.

use assay_domain::{Assert, CaseDescriptor, Descriptor, Fixture};
use tracing::debug;

use crate::ports::{RequestAssertionClient, TestHost};
use crate::use_cases::dispatch_case::CaseDispatcher;
use crate::{ApplicationError, ApplicationResult};

/// Use case that walks a descriptor tree and registers it with a host.
///
/// Composition only declares groups and cases; nothing runs until the host
/// runs it.
pub struct SuiteComposer<C: RequestAssertionClient> {
    dispatcher: CaseDispatcher<C>,
}

impl<C: RequestAssertionClient + 'static> SuiteComposer<C> {
    /// Creates a new `SuiteComposer` sending HTTP cases through `client`.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            dispatcher: CaseDispatcher::new(client),
        }
    }

    /// Declares a group named `label` holding `descriptors`, in order.
    ///
    /// Nested suites get their own group and the same fixture. Under a
    /// pending fixture every leaf is registered as pending.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Registration`] for the first HTTP case
    /// that cannot be merged or planned. Registration of the suite stops there.
    pub fn compose(
        &self,
        host: &mut dyn TestHost,
        label: &str,
        descriptors: &[Descriptor],
        fixture: &Fixture,
    ) -> ApplicationResult<()> {
        debug!(suite = %label, entries = descriptors.len(), pending = fixture.is_pending(), "Composing suite");
        host.group(label, &mut |host: &mut dyn TestHost| {
            self.declare(host, label, descriptors, fixture)
        })
    }

    /// Declares a group holding exactly one plain case.
    ///
    /// # Errors
    ///
    /// Returns the host's error if the group cannot be declared.
    pub fn compose_single(
        &self,
        host: &mut dyn TestHost,
        label: &str,
        desc: &str,
        assert: Assert,
        fixture: &Fixture,
    ) -> ApplicationResult<()> {
        let case = CaseDescriptor {
            desc: desc.to_string(),
            assert,
        };
        host.group(label, &mut |host: &mut dyn TestHost| {
            if fixture.is_pending() {
                host.pending(&case.desc);
            } else {
                self.dispatcher.dispatch_case(host, &case, fixture);
            }
            Ok(())
        })
    }

    fn declare(
        &self,
        host: &mut dyn TestHost,
        label: &str,
        descriptors: &[Descriptor],
        fixture: &Fixture,
    ) -> ApplicationResult<()> {
        for descriptor in descriptors {
            match descriptor {
                Descriptor::Suite(suite) => {
                    self.compose(host, &suite.label, &suite.tests, fixture)?;
                }
                leaf if fixture.is_pending() => {
                    self.dispatcher.dispatch_pending(host, leaf);
                }
                Descriptor::Http(http) => {
                    let registration =
                        |source| ApplicationError::registration(label, http.display_name(), source);
                    let merged = http.merged_with(fixture).map_err(registration)?;
                    self.dispatcher
                        .dispatch_http(host, &merged)
                        .map_err(registration)?;
                }
                Descriptor::Case(case) => self.dispatcher.dispatch_case(host, case, fixture),
            }
        }
        Ok(())
    }
}
