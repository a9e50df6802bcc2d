//! Route specifications.
//!
//! A [`RouteSpec`] is the trigger condition of a handler: a path template plus
//! an optional verb. `None` means the route accepts every verb.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::routing::pattern::{self, strip_trailing_separator};

/// Recognized HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
            Verb::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = match s {
            "GET" => Verb::Get,
            "HEAD" => Verb::Head,
            "POST" => Verb::Post,
            "PUT" => Verb::Put,
            "PATCH" => Verb::Patch,
            "DELETE" => Verb::Delete,
            "OPTIONS" => Verb::Options,
            "TRACE" => Verb::Trace,
            _ => {
                return Err(DispatchError::InvalidInput(format!(
                    "unrecognized http method [{}]",
                    s
                )))
            }
        };
        Ok(verb)
    }
}

/// Path template and verb filter of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RouteSpec {
    path_template: String,
    verb: Option<Verb>,
}

impl RouteSpec {
    /// Create a route. Trailing separators are stripped from the template.
    pub fn new(path_template: &str, verb: Option<Verb>) -> Self {
        Self {
            path_template: strip_trailing_separator(path_template).to_string(),
            verb,
        }
    }

    /// A route accepting every verb.
    pub fn any(path_template: &str) -> Self {
        Self::new(path_template, None)
    }

    pub fn get(path_template: &str) -> Self {
        Self::new(path_template, Some(Verb::Get))
    }

    pub fn post(path_template: &str) -> Self {
        Self::new(path_template, Some(Verb::Post))
    }

    pub fn put(path_template: &str) -> Self {
        Self::new(path_template, Some(Verb::Put))
    }

    pub fn delete(path_template: &str) -> Self {
        Self::new(path_template, Some(Verb::Delete))
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub fn verb(&self) -> Option<Verb> {
        self.verb
    }

    /// Whether this route is triggered by `verb`.
    pub fn accepts(&self, verb: Verb) -> bool {
        self.verb.map_or(true, |own| own == verb)
    }

    /// Overlay a member-level route onto this group-level route.
    ///
    /// The overlay's verb replaces ours when present; its template is joined
    /// onto ours when non-empty.
    pub fn combine(&self, overlay: &RouteSpec) -> RouteSpec {
        let path_template = if overlay.path_template.is_empty() {
            self.path_template.clone()
        } else {
            pattern::combine(&self.path_template, &overlay.path_template)
        };
        RouteSpec::new(&path_template, overlay.verb.or(self.verb))
    }

    /// Verb label used in diagnostics; `ANY` when unrestricted.
    pub fn verb_label(&self) -> &'static str {
        self.verb.map_or("ANY", |v| v.as_str())
    }
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb_label(), self.path_template)
    }
}
