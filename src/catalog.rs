//! Sample order catalog served by the CLI.
//!
//! Exercises every binding style: path variables, required and defaulted
//! arguments, enum cases and a whole-map filter.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use remote_dispatch::{
    handler_fn, Args, HandlerCandidate, HandlerFn, HandlerResult, Output, ParamDecl,
    RegistrationSource, RouteSpec, TypeTag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub amount: i64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Filter bound from the whole argument map.
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub min_amount: Option<i64>,
}

impl OrderFilter {
    fn accepts(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| s == order.status)
            && self.min_amount.map_or(true, |min| order.amount >= min)
    }
}

type Store = Arc<Mutex<BTreeMap<i64, Order>>>;

/// In-memory order catalog, seeded with a few orders.
#[derive(Debug, Clone)]
pub struct OrderCatalog {
    store: Store,
}

impl OrderCatalog {
    pub fn seeded() -> Self {
        let orders = [
            (1, 1200, OrderStatus::Paid),
            (2, 350, OrderStatus::Pending),
            (3, 9900, OrderStatus::Shipped),
        ];
        let store = orders
            .into_iter()
            .map(|(id, amount, status)| {
                (
                    id,
                    Order {
                        id,
                        amount,
                        status,
                        note: None,
                    },
                )
            })
            .collect();
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

impl RegistrationSource for OrderCatalog {
    fn candidates(&self) -> Vec<HandlerCandidate> {
        let group = RouteSpec::any("/orders");
        vec![
            HandlerCandidate::new("ping", handler_fn(|_| Ok(Output::from("pong"))))
                .route(RouteSpec::any("/ping")),
            HandlerCandidate::new("orders::search", search(self.store.clone()))
                .group(group.clone())
                .route(RouteSpec::get("/search"))
                .param(ParamDecl::new("filter", TypeTag::structured::<OrderFilter>())),
            HandlerCandidate::new("orders::get", get(self.store.clone()))
                .group(group.clone())
                .route(RouteSpec::get("/{id}"))
                .param(ParamDecl::new("id", TypeTag::Integer).required()),
            HandlerCandidate::new("orders::create", create(self.store.clone()))
                .group(group.clone())
                .route(RouteSpec::post("/"))
                .param(ParamDecl::new("amount", TypeTag::Integer).required())
                .param(
                    ParamDecl::new("status", TypeTag::enumeration::<OrderStatus>())
                        .with_default("PENDING"),
                )
                .param(ParamDecl::new("note", TypeTag::Text).named()),
            HandlerCandidate::new("orders::set_status", set_status(self.store.clone()))
                .group(group)
                .route(RouteSpec::put("/{id}/status"))
                .param(ParamDecl::new("id", TypeTag::Integer).required())
                .param(ParamDecl::new("status", TypeTag::enumeration::<OrderStatus>()).required()),
        ]
    }
}

fn search(store: Store) -> HandlerFn {
    handler_fn(move |mut args: Args| -> HandlerResult {
        let filter = args.take::<OrderFilter>(0).unwrap_or_default();
        let orders = store.lock().map_err(|_| "order store is unavailable")?;
        let found: Vec<&Order> = orders.values().filter(|o| filter.accepts(o)).collect();
        Output::json(&found)
    })
}

fn get(store: Store) -> HandlerFn {
    handler_fn(move |args: Args| -> HandlerResult {
        let id = args.integer(0).ok_or("order id is required")?;
        let orders = store.lock().map_err(|_| "order store is unavailable")?;
        match orders.get(&id) {
            Some(order) => Output::json(order),
            None => Err(format!("order [{}] not found", id).into()),
        }
    })
}

fn create(store: Store) -> HandlerFn {
    handler_fn(move |mut args: Args| -> HandlerResult {
        let amount = args.integer(0).ok_or("amount is required")?;
        if amount <= 0 {
            return Err(format!("amount [{}] must be positive", amount).into());
        }
        let status = args.take::<OrderStatus>(1).unwrap_or(OrderStatus::Pending);
        let note = args.text(2).map(str::to_string);

        let mut orders = store.lock().map_err(|_| "order store is unavailable")?;
        let id = orders.keys().next_back().map_or(1, |last| last + 1);
        let order = Order {
            id,
            amount,
            status,
            note,
        };
        let body = Output::json(&order);
        orders.insert(id, order);
        body
    })
}

fn set_status(store: Store) -> HandlerFn {
    handler_fn(move |mut args: Args| -> HandlerResult {
        let id = args.integer(0).ok_or("order id is required")?;
        let status = args.take::<OrderStatus>(1).ok_or("status is required")?;
        let mut orders = store.lock().map_err(|_| "order store is unavailable")?;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| format!("order [{}] not found", id))?;
        order.status = status;
        Output::json(&*order)
    })
}
