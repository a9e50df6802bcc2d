//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch(path, verb, args)
//!     → Validating      (registry non-empty, path present, verb parses)
//!     → ExactScan       (literal template + verb, first by registration order)
//!     → PatternScan     (every template matching path + verb)
//!     → BestMatchSelect (specificity order)
//!     → VariableMerge   (path variables of tied templates into args)
//!     → Binding         (ParameterBinder over the plan)
//!     → Invoking        (handler call, panics contained)
//!     → Serializing     (text verbatim, structured via codec)
//!     → Done | Failed   (failures folded into a ResultEnvelope)
//! ```
//!
//! # Design Decisions
//! - The registry is shared read-only; each call owns its argument map, so
//!   concurrent calls need no locking
//! - `dispatch` never returns an error or unwinds; `try_dispatch` exposes the
//!   typed error for embedders that want it
//! - An exact match short-circuits pattern scanning entirely

pub mod envelope;

use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::binding::{ArgMap, ParameterBinder};
use crate::codec::{JsonCodec, StructuredCodec};
use crate::config::{DispatchConfig, EnvelopeConfig};
use crate::error::DispatchError;
use crate::handler::Output;
use crate::observability::metrics;
use crate::routing::pattern::SEPARATOR;
use crate::routing::registry::{HandlerDefinition, HandlerRegistry};
use crate::routing::route::Verb;

pub use envelope::ResultEnvelope;

/// Stages a single dispatch call moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchStage {
    #[default]
    Idle,
    Validating,
    ExactScan,
    PatternScan,
    BestMatchSelect,
    VariableMerge,
    Binding,
    Invoking,
    Serializing,
    Done,
    Failed,
}

impl DispatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStage::Idle => "idle",
            DispatchStage::Validating => "validating",
            DispatchStage::ExactScan => "exact_scan",
            DispatchStage::PatternScan => "pattern_scan",
            DispatchStage::BestMatchSelect => "best_match_select",
            DispatchStage::VariableMerge => "variable_merge",
            DispatchStage::Binding => "binding",
            DispatchStage::Invoking => "invoking",
            DispatchStage::Serializing => "serializing",
            DispatchStage::Done => "done",
            DispatchStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchStage::Done | DispatchStage::Failed)
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call progress tracker.
#[derive(Debug, Default)]
struct CallState {
    stage: DispatchStage,
}

impl CallState {
    fn advance(&mut self, next: DispatchStage) {
        tracing::trace!(from = %self.stage, to = %next, "Dispatch stage");
        self.stage = next;
    }
}

/// Strip a single trailing separator or `?`, keeping a lone root.
pub fn normalize_request_path(path: &str) -> &str {
    if path.len() <= 1 {
        return path;
    }
    path.strip_suffix(SEPARATOR)
        .or_else(|| path.strip_suffix('?'))
        .unwrap_or(path)
}

/// Routes calls to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    codec: Arc<dyn StructuredCodec>,
    envelope: EnvelopeConfig,
    log_arguments: bool,
    metrics_enabled: bool,
}

impl Dispatcher {
    /// Dispatcher over `registry` with the JSON codec and default settings.
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            codec: Arc::new(JsonCodec),
            envelope: EnvelopeConfig::default(),
            log_arguments: true,
            metrics_enabled: true,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn StructuredCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.envelope = config.envelope.clone();
        self.log_arguments = config.observability.log_arguments;
        self.metrics_enabled = config.observability.metrics_enabled;
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn envelope_config(&self) -> &EnvelopeConfig {
        &self.envelope
    }

    /// Serve one call. Never fails: errors come back as a serialized
    /// [`ResultEnvelope`].
    pub fn dispatch<A>(&self, path: &str, verb: &str, args: A) -> String
    where
        A: Into<Option<ArgMap>>,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, path, verb);
        let _guard = span.enter();

        let started = Instant::now();
        let args = args.into().unwrap_or_default();
        if self.log_arguments {
            tracing::debug!(args = ?args, "Remote call received");
        }

        let mut state = CallState::default();
        let outcome = self.run(&mut state, path, verb, args);
        let elapsed = started.elapsed();

        match outcome {
            Ok(body) => {
                state.advance(DispatchStage::Done);
                if self.metrics_enabled {
                    metrics::record_success(elapsed);
                }
                tracing::debug!(elapsed_us = elapsed.as_micros() as u64, "Remote call completed");
                body
            }
            Err(err) => {
                let failed_at = state.stage;
                state.advance(DispatchStage::Failed);
                if self.metrics_enabled {
                    metrics::record_failure(err.kind(), elapsed);
                }
                tracing::warn!(
                    kind = %err.kind(),
                    stage = %failed_at,
                    error = %err,
                    "Remote call failed"
                );
                self.render_failure(&err)
            }
        }
    }

    /// Serve one call, returning the typed error instead of an envelope.
    pub fn try_dispatch(&self, path: &str, verb: &str, args: ArgMap) -> Result<String, DispatchError> {
        self.run(&mut CallState::default(), path, verb, args)
    }

    fn run(
        &self,
        state: &mut CallState,
        path: &str,
        verb: &str,
        mut args: ArgMap,
    ) -> Result<String, DispatchError> {
        state.advance(DispatchStage::Validating);
        if self.registry.is_empty() {
            return Err(DispatchError::Configuration(
                "no remote handlers are registered".to_string(),
            ));
        }
        if path.trim().is_empty() {
            return Err(DispatchError::InvalidInput("url must not be empty".to_string()));
        }
        let verb: Verb = verb.parse()?;
        let path = normalize_request_path(path);

        let definition = self.resolve(state, path, verb, &mut args)?;

        state.advance(DispatchStage::Binding);
        let bound = ParameterBinder::new(self.codec.as_ref()).bind_all(definition, &args)?;

        state.advance(DispatchStage::Invoking);
        let handler = definition.handler();
        let output = match panic::catch_unwind(AssertUnwindSafe(|| handler(bound))) {
            Ok(result) => result.map_err(DispatchError::HandlerInvocation)?,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                return Err(DispatchError::HandlerInvocation(message.into()));
            }
        };

        state.advance(DispatchStage::Serializing);
        match output {
            Output::Text(text) => Ok(text),
            Output::Structured(value) => {
                self.codec
                    .encode(&value)
                    .map_err(|e| DispatchError::Conversion {
                        target: "response".to_string(),
                        cause: e.to_string(),
                    })
            }
        }
    }

    fn resolve(
        &self,
        state: &mut CallState,
        path: &str,
        verb: Verb,
        args: &mut ArgMap,
    ) -> Result<&HandlerDefinition, DispatchError> {
        state.advance(DispatchStage::ExactScan);
        if let Some(definition) = self.registry.find_exact(path, verb) {
            tracing::debug!(
                handler = definition.name(),
                route = %definition.route(),
                "Exact route matched"
            );
            return Ok(definition);
        }

        state.advance(DispatchStage::PatternScan);
        let matching = self.registry.matching(path, verb);
        if matching.is_empty() {
            return Err(DispatchError::NoRouteFound {
                path: path.to_string(),
                verb: verb.to_string(),
            });
        }

        state.advance(DispatchStage::BestMatchSelect);
        let candidates: Vec<&HandlerDefinition> = matching
            .iter()
            .filter_map(|&index| self.registry.get(index))
            .collect();
        let best = candidates
            .iter()
            .copied()
            .min_by(|a, b| a.pattern().compare_specificity(b.pattern(), path))
            .ok_or_else(|| DispatchError::InternalConsistency {
                path: path.to_string(),
                verb: verb.to_string(),
                template: "<none>".to_string(),
            })?;
        tracing::debug!(
            handler = best.name(),
            template = best.pattern().as_str(),
            candidates = candidates.len(),
            "Best pattern selected"
        );

        state.advance(DispatchStage::VariableMerge);
        for candidate in &candidates {
            if best.pattern().compare_specificity(candidate.pattern(), path) != Ordering::Equal {
                continue;
            }
            if let Some(vars) = candidate.pattern().extract_variables(path) {
                args.extend(vars);
            }
        }

        Ok(best)
    }

    fn render_failure(&self, err: &DispatchError) -> String {
        let envelope = ResultEnvelope::failed(&self.envelope, err);
        self.codec
            .encode(&envelope.to_value())
            .or_else(|_| serde_json::to_string(&envelope))
            .unwrap_or_default()
    }
}
