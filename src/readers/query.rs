use std::fmt;

/// Sigil selecting a pattern query on the key.
pub const PATTERN_SIGIL: &str = ":r:";
/// Sigil selecting a full-text query on the rendered entries.
pub const FULLTEXT_SIGIL: &str = ":f:";

/// Lookup mode chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    Exact,
    Pattern,
    FullText,
}

/// A lowercased query, tagged with its lookup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Headword lookup
    Exact(String),
    /// Regular expression matched against every headword
    Pattern(String),
    /// Regular expression matched against every rendered entry line
    FullText(String),
}

impl Query {
    /// Parses a raw query string, honouring the `:r:` and `:f:` prefixes.
    ///
    /// The whole query is lowercased first, so `:R:` selects a pattern query too.
    ///
    /// # Examples
    ///
    /// ```
    /// use dictcc::readers::Query;
    ///
    /// assert_eq!(Query::parse("Haus"), Query::Exact("haus".into()));
    /// assert_eq!(Query::parse(":r:^Hau"), Query::Pattern("^hau".into()));
    /// assert_eq!(Query::parse(":f:feline"), Query::FullText("feline".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let query = raw.to_lowercase();
        if let Some(pattern) = query.strip_prefix(PATTERN_SIGIL) {
            Query::Pattern(pattern.to_string())
        } else if let Some(pattern) = query.strip_prefix(FULLTEXT_SIGIL) {
            Query::FullText(pattern.to_string())
        } else {
            Query::Exact(query)
        }
    }

    /// Builds a query for an explicit mode. Sigils in `text` are not interpreted.
    pub fn with_mode(mode: QueryMode, text: &str) -> Self {
        let text = text.to_lowercase();
        match mode {
            QueryMode::Exact => Query::Exact(text),
            QueryMode::Pattern => Query::Pattern(text),
            QueryMode::FullText => Query::FullText(text),
        }
    }

    pub fn mode(&self) -> QueryMode {
        match self {
            Query::Exact(_) => QueryMode::Exact,
            Query::Pattern(_) => QueryMode::Pattern,
            Query::FullText(_) => QueryMode::FullText,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Query::Exact(text) | Query::Pattern(text) | Query::FullText(text) => text,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Exact(text) => f.write_str(text),
            Query::Pattern(text) => write!(f, "{}{}", PATTERN_SIGIL, text),
            Query::FullText(text) => write!(f, "{}{}", FULLTEXT_SIGIL, text),
        }
    }
}
