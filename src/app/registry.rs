//! Named application lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::app::{Application, ApplicationError, EchoApp, StatusApp};

/// Registry of application objects, keyed by name.
#[derive(Clone, Default)]
pub struct Registry {
    apps: BTreeMap<String, Arc<dyn Application>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the applications shipped with the launcher.
    pub fn builtin() -> Self {
        Self::new().register(StatusApp).register(EchoApp)
    }

    /// Add an application, replacing any previous one with the same name.
    pub fn register<A: Application>(mut self, app: A) -> Self {
        self.apps.insert(app.name().to_string(), Arc::new(app));
        self
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Application>, ApplicationError> {
        self.apps
            .get(name)
            .cloned()
            .ok_or_else(|| ApplicationError::NotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.apps.keys().cloned().collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("apps", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppContext;
    use axum::Router;

    struct Broken;

    impl Application for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn router(&self, _ctx: &AppContext) -> Result<Router, ApplicationError> {
            Err(ApplicationError::Build {
                name: "broken".into(),
                reason: "missing DATABASE_URL".into(),
            })
        }
    }

    #[test]
    fn builtin_contains_status_and_echo() {
        assert_eq!(Registry::builtin().names(), vec!["echo", "status"]);
    }

    #[test]
    fn unknown_name_lists_available() {
        let err = Registry::builtin().resolve("main:app").err().unwrap();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "application 'main:app' is not registered (available: echo, status)"
        );
    }

    #[test]
    fn registered_app_resolves_and_reports_build_errors() {
        let registry = Registry::new().register(Broken);
        let app = registry.resolve("broken").unwrap();
        let err = app.router(&AppContext::default()).unwrap_err();
        assert!(err.to_string().contains("missing DATABASE_URL"));
    }
}
