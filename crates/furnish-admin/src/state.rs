//! Application state management

use crate::gate::TokenGate;
use crate::page::{CrudPage, PageResult};
use furnish_client::{HttpResourceClient, build_http_client};
use furnish_core::{Config, FileCredentialStore, SessionContext, catalog};
use std::sync::Arc;

/// Application state holding configuration, the session and the shared HTTP client
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    session: SessionContext,
    http: reqwest::Client,
}

impl AppState {
    /// State backed by the configured credential file
    pub fn new(config: Config) -> PageResult<Self> {
        let store = FileCredentialStore::new(config.session.token_file.clone());
        Self::with_session(config, SessionContext::new(Arc::new(store)))
    }

    /// State over an explicit session
    pub fn with_session(config: Config, session: SessionContext) -> PageResult<Self> {
        let http = build_http_client(&config.api)?;
        Ok(Self {
            config,
            session,
            http,
        })
    }

    /// Session shared by the gate and every client
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Gate for protected pages
    pub fn gate(&self) -> TokenGate {
        TokenGate::from_config(self.session.clone(), &self.config.session)
    }

    /// Unloaded page for a resource named by path or label
    ///
    /// Resources feeding the page's select boxes get their own clients.
    pub fn page(&self, resource: &str) -> PageResult<CrudPage<HttpResourceClient>> {
        let schema = catalog::lookup(resource)?;
        let mut page = CrudPage::new(schema, self.client(schema.path)?);
        for (_, source) in schema.option_fields() {
            if source.path != schema.path {
                page = page.with_option_client(self.client(source.path)?);
            }
        }
        Ok(page)
    }

    fn client(&self, path: &str) -> PageResult<HttpResourceClient> {
        Ok(HttpResourceClient::new(
            self.http.clone(),
            &self.config.api.base_url,
            path,
            self.session.clone(),
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::page::PageError;
    use furnish_client::ResourceClient;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_resolves_labels() {
        let state = AppState::with_session(Config::default(), SessionContext::in_memory()).unwrap();

        let page = state.page("Tax Rules").unwrap();

        assert_eq!(page.schema().path, "tax-rules");
        assert!(page.collection().is_empty());
    }

    #[test]
    fn test_unknown_resource() {
        let state = AppState::with_session(Config::default(), SessionContext::in_memory()).unwrap();

        assert!(matches!(
            state.page("sofas"),
            Err(PageError::Core(furnish_core::Error::UnknownResource { .. }))
        ));
    }

    #[test]
    fn test_gate_shares_session() {
        let state = AppState::with_session(Config::default(), SessionContext::in_memory()).unwrap();
        let gate = state.gate();

        assert!(!gate.check().is_allowed());
        state.session().sign_in("abc").unwrap();
        assert!(gate.check().is_allowed());
        assert_eq!(gate.login_route(), "/login");
    }

    #[test]
    fn test_client_addresses_resource_path() {
        let mut config = Config::default();
        config.api.base_url = "http://admin.test/api/".to_string();
        let state = AppState::with_session(config, SessionContext::in_memory()).unwrap();

        let page = state.page("size uom").unwrap();

        assert_eq!(page.schema().singular, "Size UOM");
        assert_eq!(page.client().resource(), "size-uom");
    }
}
