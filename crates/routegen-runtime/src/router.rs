//! In-memory reference dispatcher.
//!
//! Patterns are matched segment by segment in registration order and the
//! first match wins. Path captures are percent-decoded; query values are
//! form-decoded. Other dispatchers are free to pick a different policy.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::call::{Call, Response};
use crate::error::{DispatchError, HandlerResult};
use crate::method::HttpMethod;
use crate::Dispatcher;

type BoxedHandler = Arc<dyn Fn(&mut Call) -> HandlerResult + Send + Sync>;

/// A piece of one path segment. `{name}` may appear anywhere in a segment,
/// so `/files/{name}.json` is a capture followed by a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Capture(String),
}

type Segment = Vec<Part>;

/// A registered route as seen from outside the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: HttpMethod,
    pub pattern: String,
    pub name: String,
}

struct RouteEntry {
    info: RouteInfo,
    segments: Vec<Segment>,
    handler: BoxedHandler,
}

/// A simple `Dispatcher` that can also serve requests.
#[derive(Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteInfo> {
        self.routes.iter().map(|r| &r.info)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `target` (path plus optional query string).
    ///
    /// Every failure is turned into a response carrying the error's status
    /// code, so a bad request never takes the caller down.
    pub fn handle(&self, method: HttpMethod, target: &str) -> Response {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        match self.dispatch(method, path, query) {
            Ok(response) => response,
            Err(err) => {
                let status = err.status_code();
                if status >= 500 {
                    tracing::warn!(%method, path, error = %err, "dispatch failed");
                } else {
                    tracing::debug!(%method, path, error = %err, "request rejected");
                }
                Response::text(status, err.to_string())
            }
        }
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&str>,
    ) -> Result<Response, DispatchError> {
        let request_segments = split_path(path);
        let mut path_matched = false;

        for route in &self.routes {
            let Some(captures) = match_segments(&route.segments, &request_segments) else {
                continue;
            };
            path_matched = true;
            if route.info.method != method {
                continue;
            }

            let mut call = Call::new(method, path)
                .with_path_params(captures)
                .with_query(parse_query(query.unwrap_or("")));
            (route.handler)(&mut call)?;
            return Ok(call.response);
        }

        if path_matched {
            Err(DispatchError::MethodNotAllowed {
                method,
                path: path.to_string(),
            })
        } else {
            Err(DispatchError::NotFound {
                method,
                path: path.to_string(),
            })
        }
    }
}

impl Dispatcher for Router {
    fn route<H>(&mut self, method: HttpMethod, pattern: &str, name: &str, handler: H)
    where
        H: Fn(&mut Call) -> HandlerResult + Send + Sync + 'static,
    {
        tracing::debug!(%method, pattern, name, "registering route");
        self.routes.push(RouteEntry {
            info: RouteInfo {
                method,
                pattern: pattern.to_string(),
                name: name.to_string(),
            },
            segments: parse_pattern(pattern),
            handler: Arc::new(handler),
        });
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_path(pattern).into_iter().map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Segment {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 && !after[..close].contains('{') => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    parts.push(Part::Literal(std::mem::take(&mut literal)));
                }
                parts.push(Part::Capture(after[..close].to_string()));
                rest = &after[close + 1..];
            }
            // A lone or empty brace is matched literally.
            _ => {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    parts
}

fn match_segments(pattern: &[Segment], request: &[&str]) -> Option<HashMap<String, String>> {
    if pattern.len() != request.len() {
        return None;
    }

    let mut raw = Vec::new();
    for (parts, actual) in pattern.iter().zip(request) {
        if !match_parts(parts, actual, &mut raw) {
            return None;
        }
    }
    Some(
        raw.into_iter()
            .map(|(name, value)| (name.to_string(), decode_path(value)))
            .collect(),
    )
}

/// Matches the parts of one segment against the raw request text.
///
/// Captures are non-empty and tried shortest first, backtracking until the
/// rest of the segment matches, so `{a}-{b}` on `x-y-z` gives `a = x`.
/// Values are decoded only after the whole segment matched.
fn match_parts<'p, 't>(
    parts: &'p [Part],
    text: &'t str,
    captures: &mut Vec<(&'p str, &'t str)>,
) -> bool {
    match parts.split_first() {
        None => text.is_empty(),
        Some((Part::Literal(literal), rest)) => text
            .strip_prefix(literal.as_str())
            .is_some_and(|remaining| match_parts(rest, remaining, captures)),
        Some((Part::Capture(name), rest)) => {
            let ends = text
                .char_indices()
                .map(|(i, _)| i)
                .skip(1)
                .chain(std::iter::once(text.len()))
                .filter(|end| *end > 0);
            for end in ends {
                captures.push((name.as_str(), &text[..end]));
                if match_parts(rest, &text[end..], captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_query(key), decode_query(value)),
            None => (decode_query(pair), String::new()),
        })
        .collect()
}

/// Percent-decoding only; `+` is a literal plus in a path.
fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Form encoding: `+` is a space, then percent-decoding.
fn decode_query(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
