use std::fmt;

/// Dotted address of a control, e.g. `expenseInformation.employers.0.employerName`.
///
/// Numeric segments index into repeated groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('.')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn join(&self, child: &str) -> Self {
        let mut joined = self.clone();
        joined.segments.extend(FieldPath::parse(child).segments);
        joined
    }

    pub fn join_index(&self, index: usize) -> Self {
        let mut joined = self.clone();
        joined.segments.push(index.to_string());
        joined
    }

    /// Splits into the parent path and the final segment.
    pub fn split_last(&self) -> Option<(FieldPath, &str)> {
        let (last, rest) = self.segments.split_last()?;
        Some((
            FieldPath {
                segments: rest.to_vec(),
            },
            last.as_str(),
        ))
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        FieldPath::parse(&raw)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_blank_segments() {
        let path = FieldPath::parse("a..b. c");
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(path.to_string(), "a.b.c");
    }

    #[test]
    fn split_last_yields_parent_and_leaf() {
        let path = FieldPath::parse("expenseInformation.employers.0.employerName");
        let (parent, leaf) = path.split_last().unwrap();
        assert_eq!(parent.to_string(), "expenseInformation.employers.0");
        assert_eq!(leaf, "employerName");
        assert!(FieldPath::root().split_last().is_none());
    }
}
