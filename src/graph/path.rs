//! Attribute path expressions and their resolution against a vertex.
//!
//! Paths are dotted, with optional bracketed indices: `tags.env`,
//! `ingress.*.from_port`, `rules[0].action`, `rules.[*].action`.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::value::AttributeValue;

static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());

/// One step of an attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Mapping key. Over a sequence, a numeric key selects that index and
    /// any other key is applied to every element.
    Key(String),
    /// Bracketed index; only selects from sequences.
    Index(usize),
    /// Every element of a sequence or every entry of a mapping.
    Wildcard,
}

/// A parsed attribute path.
///
/// A path that failed to parse is kept (so it can still be reported) but
/// resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    raw: String,
    segments: Option<Vec<Segment>>,
}

/// A single resolution result: the concrete location and the value found there.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch<'a> {
    pub path: String,
    pub value: &'a AttributeValue,
}

impl AttributePath {
    pub fn parse(raw: &str) -> Self {
        let segments = parse_segments(raw);
        if segments.is_none() {
            tracing::debug!(path = raw, "malformed attribute path, it will never match");
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_valid(&self) -> bool {
        self.segments.is_some()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments
            .as_ref()
            .is_some_and(|segs| segs.contains(&Segment::Wildcard))
    }

    pub fn segments(&self) -> &[Segment] {
        self.segments.as_deref().unwrap_or(&[])
    }

    /// Resolve this path against a vertex's attribute mapping.
    ///
    /// Never fails: absent keys, type mismatches along the way, and malformed
    /// paths all yield an empty result.
    pub fn resolve<'a>(
        &self,
        attributes: &'a BTreeMap<String, AttributeValue>,
    ) -> Vec<PathMatch<'a>> {
        self.resolution(attributes).matches
    }

    /// Like [`resolve`](Self::resolve), also reporting whether any step fanned
    /// out over a collection.
    pub fn resolution<'a>(
        &self,
        attributes: &'a BTreeMap<String, AttributeValue>,
    ) -> Resolution<'a> {
        let mut resolution = Resolution::default();
        let Some(segments) = self.segments.as_deref() else {
            return resolution;
        };
        let Some((first, rest)) = segments.split_first() else {
            return resolution;
        };

        // The root is always a mapping, so the first segment must name a key
        // or be a wildcard over all of them.
        let mut frontier: Vec<(Vec<String>, &'a AttributeValue)> = match first {
            Segment::Key(key) => attributes
                .get(key)
                .map(|v| vec![(vec![key.clone()], v)])
                .unwrap_or_default(),
            Segment::Wildcard => {
                resolution.expanded = true;
                attributes
                    .iter()
                    .map(|(k, v)| (vec![k.clone()], v))
                    .collect()
            }
            Segment::Index(_) => Vec::new(),
        };

        for segment in rest {
            let mut next = Vec::new();
            for (location, value) in frontier {
                step(segment, location, value, &mut next, &mut resolution.expanded);
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }

        resolution.matches = frontier
            .into_iter()
            .map(|(location, value)| PathMatch {
                path: location.join("."),
                value,
            })
            .collect();
        resolution
    }
}

/// Matches of a path, plus whether resolution fanned out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    pub matches: Vec<PathMatch<'a>>,
    /// A wildcard, or a key applied across a list of blocks, was stepped
    /// through. Set even when the fan-out reached a single element.
    pub expanded: bool,
}

fn step<'a>(
    segment: &Segment,
    location: Vec<String>,
    value: &'a AttributeValue,
    out: &mut Vec<(Vec<String>, &'a AttributeValue)>,
    expanded: &mut bool,
) {
    match (segment, value) {
        (Segment::Key(key), AttributeValue::Mapping(map)) => {
            if let Some(child) = map.get(key) {
                out.push((extend(&location, key), child));
            }
        }
        (Segment::Key(key), AttributeValue::Sequence(items)) => {
            if let Ok(index) = key.parse::<usize>() {
                if let Some(child) = items.get(index) {
                    out.push((extend(&location, key), child));
                }
                return;
            }
            // List of blocks: apply the key to every element.
            *expanded = true;
            for (index, item) in items.iter().enumerate() {
                let location = extend(&location, &index.to_string());
                step(segment, location, item, out, expanded);
            }
        }
        (Segment::Index(index), AttributeValue::Sequence(items)) => {
            if let Some(child) = items.get(*index) {
                out.push((extend(&location, &index.to_string()), child));
            }
        }
        (Segment::Wildcard, AttributeValue::Sequence(items)) => {
            *expanded = true;
            for (index, item) in items.iter().enumerate() {
                out.push((extend(&location, &index.to_string()), item));
            }
        }
        (Segment::Wildcard, AttributeValue::Mapping(map)) => {
            *expanded = true;
            for (key, child) in map {
                out.push((extend(&location, key), child));
            }
        }
        _ => {}
    }
}

fn extend(location: &[String], part: &str) -> Vec<String> {
    let mut next = location.to_vec();
    next.push(part.to_string());
    next
}

fn parse_segments(raw: &str) -> Option<Vec<Segment>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for part in raw.split('.') {
        if part.is_empty() {
            return None;
        }

        let head_end = part.find('[').unwrap_or(part.len());
        let (head, brackets) = part.split_at(head_end);
        if head.contains(']') {
            return None;
        }
        match head {
            "" => {}
            "*" => segments.push(Segment::Wildcard),
            key => segments.push(Segment::Key(key.to_string())),
        }

        // Bracket groups must tile the remainder exactly.
        let mut consumed = 0;
        for cap in BRACKET_RE.captures_iter(brackets) {
            let whole = cap.get(0)?;
            if whole.start() != consumed {
                return None;
            }
            consumed = whole.end();
            let inner = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            match inner {
                "*" => segments.push(Segment::Wildcard),
                n => segments.push(Segment::Index(n.parse().ok()?)),
            }
        }
        if consumed != brackets.len() {
            return None;
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
