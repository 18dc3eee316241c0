use std::{fmt, sync::Arc};

use http::Method;

use crate::{
    handler::{Handler, Params},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(segment: &str) -> Self {
        match segment.strip_prefix(':') {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Literal(segment.to_string()),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Literal(literal) if literal.is_empty())
    }
}

/// Parse a method token, normalizing it to uppercase first.
pub fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| Error::InvalidMethod(method.to_string()))
}

/// A single method + pattern binding.
///
/// Patterns are split on `/` into literal segments and `:name` parameter
/// segments. A parameter matches exactly one non-empty path segment; literals
/// must be equal byte for byte.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    segments: Box<[Segment]>,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn new<P, H>(method: &str, pattern: P, handler: H) -> Result<Self>
    where
        P: Into<String>,
        H: Handler,
    {
        Ok(Self::with_method(
            parse_method(method)?,
            pattern,
            Arc::new(handler),
        ))
    }

    pub(crate) fn with_method<P: Into<String>>(
        method: Method,
        pattern: P,
        handler: Arc<dyn Handler>,
    ) -> Self {
        let pattern = pattern.into();
        let segments = pattern.split('/').map(Segment::parse).collect();
        Self {
            method,
            pattern,
            segments,
            handler,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// Method tokens compare case-insensitively.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if !self.method.as_str().eq_ignore_ascii_case(method.as_str()) {
            return false;
        }
        let mut parts = path.split('/');
        for segment in self.segments.iter() {
            match (segment, parts.next()) {
                (Segment::Literal(literal), Some(part)) if literal == part => {}
                (Segment::Param(_), Some(part)) if !part.is_empty() => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }

    /// Bind parameter names to the path segments at the same position.
    ///
    /// Empty segments are skipped on both sides. Parameters with no segment
    /// left to bind to are omitted rather than bound to an empty value.
    pub fn extract_params(&self, path: &str) -> Params {
        self.segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .zip(path.split('/').filter(|part| !part.is_empty()))
            .filter_map(|(segment, part)| match segment {
                Segment::Param(name) => Some((name.clone(), part.to_string())),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
