//! Registration sources.
//!
//! The dispatcher never discovers handlers itself. A [`RegistrationSource`]
//! yields one [`HandlerCandidate`] per remotely callable handler, carrying its
//! declared routes and parameter metadata. Sources are consulted once, during
//! the build phase.

use std::fmt;

use crate::binding::ParamDecl;
use crate::handler::HandlerFn;
use crate::routing::route::RouteSpec;

/// Supplies handler candidates at startup.
pub trait RegistrationSource {
    fn candidates(&self) -> Vec<HandlerCandidate>;
}

/// A handler with its declared routing and parameter metadata.
#[derive(Clone)]
pub struct HandlerCandidate {
    pub name: String,
    /// Group-level route (e.g. shared by every handler of a controller).
    pub group_route: Option<RouteSpec>,
    /// Member-level route; required.
    pub member_route: Option<RouteSpec>,
    pub handler: HandlerFn,
    pub params: Vec<ParamDecl>,
}

impl HandlerCandidate {
    pub fn new(name: &str, handler: HandlerFn) -> Self {
        Self {
            name: name.to_string(),
            group_route: None,
            member_route: None,
            handler,
            params: Vec::new(),
        }
    }

    pub fn group(mut self, route: RouteSpec) -> Self {
        self.group_route = Some(route);
        self
    }

    pub fn route(mut self, route: RouteSpec) -> Self {
        self.member_route = Some(route);
        self
    }

    pub fn param(mut self, decl: ParamDecl) -> Self {
        self.params.push(decl);
        self
    }
}

impl fmt::Debug for HandlerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCandidate")
            .field("name", &self.name)
            .field("group_route", &self.group_route)
            .field("member_route", &self.member_route)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl RegistrationSource for Vec<HandlerCandidate> {
    fn candidates(&self) -> Vec<HandlerCandidate> {
        self.clone()
    }
}
