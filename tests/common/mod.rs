//! Shared fixtures for dispatcher integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use remote_dispatch::{
    handler_fn, ArgMap, Args, Dispatcher, HandlerCandidate, HandlerFn, HandlerRegistry, Output,
    ParamDecl, RegistrationSource, RouteSpec, TypeTag,
};

/// Build an argument map from literal pairs.
pub fn args(pairs: &[(&str, &str)]) -> ArgMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Handler answering with a fixed label, to tell matched routes apart.
pub fn label(name: &'static str) -> HandlerFn {
    handler_fn(move |_| Ok(Output::from(name)))
}

/// Handler answering with its bound text parameters as a JSON array.
pub fn echo_text() -> HandlerFn {
    handler_fn(|args: Args| {
        let values: Vec<Option<&str>> = (0..args.len()).map(|i| args.text(i)).collect();
        Output::json(&values)
    })
}

/// Dispatcher over `(name, route)` pairs, each answering with its own name.
pub fn labelled_dispatcher(routes: &[(&'static str, RouteSpec)]) -> Dispatcher {
    let mut builder = HandlerRegistry::builder();
    for (name, route) in routes.iter().cloned() {
        builder.insert(name, label(name), route, vec![]).unwrap();
    }
    Dispatcher::new(Arc::new(builder.build()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub status: Option<Status>,
    pub limit: Option<u32>,
}

/// A small order service registered the way an embedding application would.
pub struct OrderService;

impl RegistrationSource for OrderService {
    fn candidates(&self) -> Vec<HandlerCandidate> {
        let group = RouteSpec::any("/orders");
        vec![
            HandlerCandidate::new(
                "orders::get",
                handler_fn(|args: Args| {
                    let id = args.integer(0).ok_or("id missing")?;
                    Ok(Output::from(json!({ "id": id, "amount": 1200 })))
                }),
            )
            .group(group.clone())
            .route(RouteSpec::get("/{id}"))
            .param(ParamDecl::new("id", TypeTag::Integer).required()),
            HandlerCandidate::new(
                "orders::create",
                handler_fn(|args: Args| {
                    let amount = args.integer(0).ok_or("amount missing")?;
                    let currency = args.text(1).unwrap_or("EUR").to_string();
                    Ok(Output::from(format!("created {} {}", amount, currency)))
                }),
            )
            .group(group.clone())
            .route(RouteSpec::post("/"))
            .param(ParamDecl::new("amount", TypeTag::Integer).required())
            .param(ParamDecl::new("currency", TypeTag::Text).with_default("EUR")),
            HandlerCandidate::new(
                "orders::status",
                handler_fn(|mut args: Args| {
                    let status = args.take::<Status>(1);
                    Ok(Output::from(format!(
                        "{} -> {:?}",
                        args.integer(0).unwrap_or_default(),
                        status
                    )))
                }),
            )
            .group(group.clone())
            .route(RouteSpec::put("/{id}/status"))
            .param(ParamDecl::new("id", TypeTag::Integer).required())
            .param(ParamDecl::new("status", TypeTag::enumeration::<Status>()).named()),
            HandlerCandidate::new(
                "orders::fail",
                handler_fn(|_| Err("ledger is locked".into())),
            )
            .group(group)
            .route(RouteSpec::post("/fail")),
            HandlerCandidate::new(
                "users::search",
                handler_fn(|mut args: Args| {
                    let filter = args.take::<UserFilter>(0).ok_or("filter missing")?;
                    Ok(Output::from(format!("{:?} limit={:?}", filter.status, filter.limit)))
                }),
            )
            .route(RouteSpec::get("/users/search"))
            .param(ParamDecl::new("filter", TypeTag::structured::<UserFilter>())),
        ]
    }
}
