//! Handler registry.
//!
//! # Responsibilities
//! - Compile registration candidates into handler definitions
//! - Reject malformed or duplicate registrations at startup
//! - Expose definitions in registration order for scanning
//!
//! # Design Decisions
//! - Built once by [`RegistryBuilder`], immutable afterwards (shared via `Arc`,
//!   read without locks)
//! - Definitions are equal when both the callable and the route match
//! - Path templates are compiled to [`PathPattern`] once, here

use std::fmt;
use std::sync::Arc;

use crate::binding::ParamSpec;
use crate::error::RegistrationError;
use crate::handler::HandlerFn;
use crate::registration::{HandlerCandidate, RegistrationSource};
use crate::routing::pattern::PathPattern;
use crate::routing::route::{RouteSpec, Verb};

/// A registered handler with its route and binding plan.
#[derive(Clone)]
pub struct HandlerDefinition {
    name: String,
    route: RouteSpec,
    pattern: PathPattern,
    handler: HandlerFn,
    params: Vec<ParamSpec>,
}

impl HandlerDefinition {
    pub fn new(name: &str, route: RouteSpec, handler: HandlerFn, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.to_string(),
            pattern: PathPattern::parse(route.path_template()),
            route,
            handler,
            params,
        }
    }

    /// Diagnostic name of the handler.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &RouteSpec {
        &self.route
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}

impl PartialEq for HandlerDefinition {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler) && self.route == other.route
    }
}

impl Eq for HandlerDefinition {}

impl fmt::Debug for HandlerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDefinition")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered set of handler definitions.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    definitions: Vec<HandlerDefinition>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All definitions in registration order.
    pub fn all(&self) -> &[HandlerDefinition] {
        &self.definitions
    }

    pub fn get(&self, index: usize) -> Option<&HandlerDefinition> {
        self.definitions.get(index)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// First definition whose template equals `path` literally and accepts `verb`.
    pub fn find_exact(&self, path: &str, verb: Verb) -> Option<&HandlerDefinition> {
        self.definitions
            .iter()
            .find(|d| d.route.path_template() == path && d.route.accepts(verb))
    }

    /// Indices of definitions accepting `verb` whose template matches `path`.
    pub fn matching(&self, path: &str, verb: Verb) -> Vec<usize> {
        self.definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.route.accepts(verb) && d.pattern.matches(path))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Build-phase collector for handler definitions.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<HandlerDefinition>,
    base_route: Option<RouteSpec>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group route applied to candidates that declare none of their own.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_route = (!base_path.is_empty()).then(|| RouteSpec::any(base_path));
        self
    }

    /// Append a definition; fails on an empty template or a duplicate.
    pub fn insert(
        &mut self,
        name: &str,
        handler: HandlerFn,
        route: RouteSpec,
        params: Vec<ParamSpec>,
    ) -> Result<(), RegistrationError> {
        if route.path_template().is_empty() {
            return Err(RegistrationError::EmptyPathTemplate {
                handler: name.to_string(),
            });
        }

        let definition = HandlerDefinition::new(name, route, handler, params);
        if self.definitions.contains(&definition) {
            return Err(RegistrationError::Duplicate {
                handler: name.to_string(),
                route: definition.route.to_string(),
            });
        }

        tracing::info!(
            handler = %definition.name,
            path = %definition.route.path_template(),
            verb = definition.route.verb_label(),
            params = definition.params.len(),
            "Registered remote handler"
        );
        self.definitions.push(definition);
        Ok(())
    }

    /// Resolve a candidate's effective route and parameter plan, then insert it.
    pub fn register(&mut self, candidate: HandlerCandidate) -> Result<(), RegistrationError> {
        let Some(member) = candidate.member_route.as_ref() else {
            tracing::error!(handler = %candidate.name, "Remote handler declares no route");
            return Err(RegistrationError::MissingRoute {
                handler: candidate.name,
            });
        };
        if member.path_template().is_empty() {
            tracing::error!(handler = %candidate.name, "Remote handler declares an empty route");
            return Err(RegistrationError::EmptyPathTemplate {
                handler: candidate.name,
            });
        }

        let route = match candidate.group_route.as_ref().or(self.base_route.as_ref()) {
            Some(group) => group.combine(member),
            None => member.clone(),
        };
        let params = ParamSpec::plan(&candidate.params);
        self.insert(&candidate.name, candidate.handler, route, params)
    }

    /// Register every candidate a source yields, stopping at the first error.
    pub fn register_all(&mut self, source: &dyn RegistrationSource) -> Result<(), RegistrationError> {
        for candidate in source.candidates() {
            self.register(candidate)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn build(self) -> HandlerRegistry {
        if self.definitions.is_empty() {
            tracing::warn!("No remote handlers registered; every dispatch will fail");
        } else {
            tracing::info!(count = self.definitions.len(), "Remote handler registration complete");
        }
        HandlerRegistry {
            definitions: self.definitions,
        }
    }
}
