//! Startup orchestration.
//!
//! # Responsibilities
//! - Apply routing configuration to the registry builder
//! - Register every candidate a source yields
//! - Freeze the registry and wire it into a configured dispatcher
//!
//! # Design Decisions
//! - Fail fast: the first registration error is returned and nothing is built
//! - An empty registry is allowed here; calls against it fail individually

use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::dispatch::Dispatcher;
use crate::error::RegistrationError;
use crate::observability::metrics;
use crate::registration::RegistrationSource;
use crate::routing::registry::HandlerRegistry;

/// Build a ready dispatcher from configuration and a registration source.
pub fn build_dispatcher(
    config: &DispatchConfig,
    source: &dyn RegistrationSource,
) -> Result<Dispatcher, RegistrationError> {
    let mut builder = HandlerRegistry::builder().with_base_path(&config.routing.base_path);
    builder.register_all(source)?;
    let registry = builder.build();

    if config.observability.metrics_enabled {
        metrics::set_registered_handlers(registry.len());
    }

    Ok(Dispatcher::new(Arc::new(registry)).with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ArgMap;
    use crate::handler::{handler_fn, Output};
    use crate::registration::HandlerCandidate;
    use crate::routing::route::RouteSpec;

    #[test]
    fn test_build_applies_base_path_and_envelope() {
        let mut config = DispatchConfig::default();
        config.routing.base_path = "/api".into();
        config.envelope.failure_code = "E1".into();

        let source = vec![HandlerCandidate::new("ping", handler_fn(|_| Ok(Output::from("pong"))))
            .route(RouteSpec::get("/ping"))];
        let dispatcher = build_dispatcher(&config, &source).unwrap();

        assert_eq!(dispatcher.registry().len(), 1);
        assert_eq!(dispatcher.try_dispatch("/api/ping", "GET", ArgMap::new()).unwrap(), "pong");
        assert!(dispatcher.dispatch("/ping", "GET", None).contains("\"E1\""));
    }

    #[test]
    fn test_build_stops_at_first_registration_error() {
        let source = vec![
            HandlerCandidate::new("ok", handler_fn(|_| Ok(Output::empty()))).route(RouteSpec::get("/ok")),
            HandlerCandidate::new("bad", handler_fn(|_| Ok(Output::empty()))),
        ];
        let err = build_dispatcher(&DispatchConfig::default(), &source).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingRoute { ref handler } if handler == "bad"));
    }
}
