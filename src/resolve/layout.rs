//! Exercise sections configured up front.
//!
//! A layout lists the exercises the operator expects to see, optionally with
//! a heading for each. It is the fallback source of keys when no manifest is
//! available, and the third choice for a display label.

/// One configured exercise section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub heading: Option<String>,
}

impl Section {
    /// Parse `key` or `key=Heading`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, heading) = match raw.split_once('=') {
            Some((k, h)) => (k.trim(), Some(h.trim())),
            None => (raw.trim(), None),
        };
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            heading: heading.filter(|h| !h.is_empty()).map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    sections: Vec<Section>,
}

impl Layout {
    /// Build from `key[=Heading]` items; later duplicates of a key are ignored.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        for section in specs.into_iter().filter_map(Section::parse) {
            if !sections.iter().any(|s| s.key == section.key) {
                sections.push(section);
            }
        }
        Self { sections }
    }

    /// Parse a comma separated list, e.g. `broad_jump=Broad Jump,squat`.
    pub fn from_list(list: &str) -> Self {
        Self::from_specs(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.key.as_str())
    }

    pub fn heading(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.heading.as_deref())
    }

    pub fn merge(mut self, other: Layout) -> Self {
        for section in other.sections {
            if !self.sections.iter().any(|s| s.key == section.key) {
                self.sections.push(section);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_headings() {
        let layout = Layout::from_list("broad_jump=Broad Jump, squat ,,=orphan,squat=Dup");
        assert_eq!(layout.keys().collect::<Vec<_>>(), vec!["broad_jump", "squat"]);
        assert_eq!(layout.heading("broad_jump"), Some("Broad Jump"));
        assert_eq!(layout.heading("squat"), None);
        assert_eq!(layout.heading("missing"), None);
    }

    #[test]
    fn merge_keeps_first_definition() {
        let a = Layout::from_list("a=First");
        let b = Layout::from_list("a=Second,b");
        let merged = a.merge(b);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(merged.heading("a"), Some("First"));
    }
}
