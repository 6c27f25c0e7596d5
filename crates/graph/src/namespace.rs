use std::fmt;
use std::hash::{Hash, Hasher};

/// Dotted namespace path (`Shop.Orders.Billing`).
///
/// Equality and hashing follow the dotted form, so two namespaces built from
/// different segmentations of the same text compare equal.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    parts: Vec<String>,
}

impl Namespace {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted name. Dots inside generic argument lists do not split.
    pub fn parse(full_name: &str) -> Self {
        if full_name.is_empty() {
            return Self::root();
        }
        Self {
            parts: split_segments(full_name),
        }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a type's full name into its namespace and its own segment
    pub fn split_type_name(full_name: &str) -> (Self, String) {
        let mut parts = split_segments(full_name);
        let own = parts.pop().unwrap_or_default();
        (Self { parts }, own)
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Last segment, empty for the root
    pub fn name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    /// All segments but the last; `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    pub fn append(&self, part: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(part.into());
        Self { parts }
    }

    pub fn full_name(&self) -> String {
        self.parts.join(".")
    }

    pub fn full_prefix(&self) -> String {
        format!("{}.", self.full_name())
    }

    /// Remove this namespace's dotted prefix from `full_name` if present.
    pub fn strip_prefix<'a>(&self, full_name: &'a str) -> &'a str {
        if self.is_root() {
            return full_name;
        }
        full_name
            .strip_prefix(self.full_prefix().as_str())
            .unwrap_or(full_name)
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

fn split_segments(full_name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in full_name.chars() {
        match ch {
            '<' | '[' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '.' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}
