//! Path template and mount prefix matching.
//!
//! # Responsibilities
//! - Parse path templates (`/pet/{petId}`) into literal and parameter segments
//! - Match a request path against a template, capturing parameters
//! - Match mount prefixes on segment boundaries
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A parameter captures exactly one non-empty segment
//! - Trailing slashes are significant (`/pet/` does not match `/pet`)
//! - No regex to guarantee O(n) matching in the number of segments
//! - Captured values are percent-decoded; literals compare against the raw path

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::percent_decode_str;

/// Error returned when a path template cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template must start with '/'")]
    MissingLeadingSlash,

    #[error("empty segment at position {0}")]
    EmptySegment(usize),

    #[error("malformed parameter segment `{0}`")]
    MalformedParam(String),

    #[error("parameter `{0}` appears more than once")]
    DuplicateParam(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed path template such as `/store/order/{orderId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Parameters are written `{name}` and must fill a whole segment.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let rest = template
            .strip_prefix('/')
            .ok_or(TemplateError::MissingLeadingSlash)?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for (position, raw) in rest.split('/').enumerate() {
                if raw.is_empty() {
                    return Err(TemplateError::EmptySegment(position));
                }

                if let Some(inner) = raw.strip_prefix('{') {
                    let name = inner
                        .strip_suffix('}')
                        .filter(|name| is_param_name(name))
                        .ok_or_else(|| TemplateError::MalformedParam(raw.to_string()))?;

                    let seen = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(p) if p == name));
                    if seen {
                        return Err(TemplateError::DuplicateParam(name.to_string()));
                    }
                    segments.push(Segment::Param(name.to_string()));
                } else if raw.contains(['{', '}']) {
                    return Err(TemplateError::MalformedParam(raw.to_string()));
                } else {
                    segments.push(Segment::Literal(raw.to_string()));
                }
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters, left to right.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// True when both templates match exactly the same set of paths,
    /// regardless of how their parameters are named.
    pub fn same_shape(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Match a request path, returning the captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut parts = (!rest.is_empty())
            .then(|| rest.split('/'))
            .into_iter()
            .flatten();

        let mut params = BTreeMap::new();
        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = percent_decode_str(part).decode_utf8_lossy().into_owned();
                    params.insert(name.clone(), value);
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(PathParams(params))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parameters captured from a matched path, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Matches the request path prefix under which a route table is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPrefix {
    prefix: String,
}

impl MountPrefix {
    /// Create a new mount prefix. A trailing '/' is dropped; `/` mounts at the root.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    /// True when `path` equals the prefix or continues it with a new segment.
    pub fn covers(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for MountPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
