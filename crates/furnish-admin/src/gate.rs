//! Token gate in front of every resource page
//!
//! The gate only checks that a credential is present. It does not validate
//! the token; the backend still rejects bad credentials.

use furnish_core::config::SessionConfig;
use furnish_core::{Credential, SessionContext};
use tracing::warn;

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A credential is present; render the page
    Allow(Credential),
    /// The current route is the login route; render it without a credential
    Public,
    /// No credential; send the user to the login route
    Redirect {
        /// Route to navigate to
        to: String,
    },
}

impl GateDecision {
    /// Whether the protected content may render
    pub const fn is_allowed(&self) -> bool {
        !matches!(self, Self::Redirect { .. })
    }
}

/// Presence check on the session credential
#[derive(Debug, Clone)]
pub struct TokenGate {
    session: SessionContext,
    login_route: String,
}

impl TokenGate {
    /// Gate over `session` redirecting to `login_route`
    pub fn new(session: SessionContext, login_route: impl Into<String>) -> Self {
        Self {
            session,
            login_route: login_route.into(),
        }
    }

    /// Gate configured from the `[session]` section
    pub fn from_config(session: SessionContext, config: &SessionConfig) -> Self {
        Self::new(session, config.login_route.clone())
    }

    /// Route unauthenticated views are sent to
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Session the gate reads from
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Check the credential for a protected view
    pub fn check(&self) -> GateDecision {
        match self.session.credential() {
            Some(credential) => GateDecision::Allow(credential),
            None => {
                warn!(to = %self.login_route, "No credential, redirecting");
                GateDecision::Redirect {
                    to: self.login_route.clone(),
                }
            }
        }
    }

    /// Check the credential for the view at `route`
    ///
    /// The login route itself always renders.
    pub fn check_route(&self, route: &str) -> GateDecision {
        if route == self.login_route {
            return self
                .session
                .credential()
                .map_or(GateDecision::Public, GateDecision::Allow);
        }
        self.check()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use furnish_core::MemoryCredentialStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn gate_with(token: Option<&str>) -> TokenGate {
        let store = token.map_or_else(MemoryCredentialStore::new, MemoryCredentialStore::with_token);
        TokenGate::new(SessionContext::new(Arc::new(store)), "/login")
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_absent_or_empty_credential_redirects(#[case] token: Option<&str>) {
        let decision = gate_with(token).check();

        assert_eq!(
            decision,
            GateDecision::Redirect {
                to: "/login".to_string()
            }
        );
        assert!(!decision.is_allowed());
    }

    #[rstest]
    #[case("not-even-a-jwt")]
    #[case("   ")]
    #[case("  tok  ")]
    fn test_any_non_empty_credential_allows_unchanged(#[case] token: &str) {
        match gate_with(Some(token)).check() {
            GateDecision::Allow(credential) => assert_eq!(credential.expose(), token),
            other => panic!("expected allow, got {other:?}"),
        }
    }

    #[test]
    fn test_login_route_always_renders() {
        let gate = gate_with(None);

        assert_eq!(gate.check_route("/login"), GateDecision::Public);
        assert!(!gate.check_route("/brands").is_allowed());
    }

    #[test]
    fn test_check_is_not_cached() {
        let gate = gate_with(None);
        assert!(!gate.check().is_allowed());

        gate.session().sign_in("fresh").unwrap();
        assert!(gate.check().is_allowed());

        gate.session().sign_out().unwrap();
        assert!(!gate.check().is_allowed());
    }

    #[test]
    fn test_from_config_uses_login_route() {
        let config = SessionConfig {
            login_route: "/signin".to_string(),
            ..SessionConfig::default()
        };
        let gate = TokenGate::from_config(SessionContext::in_memory(), &config);

        assert_eq!(gate.login_route(), "/signin");
        assert_eq!(
            gate.check(),
            GateDecision::Redirect {
                to: "/signin".to_string()
            }
        );
    }
}
