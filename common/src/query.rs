use std::borrow::Cow;

/// Something a [`Query`] can be matched against.
pub trait Fields {
    /// Fields searched by terms without an explicit field name.
    const DEFAULT_FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Case-insensitive substring match on one field.
    Field { field: String, pattern: String },
    /// Case-insensitive substring match on any default field.
    Any(String),
    Not(Box<Term>),
}

impl Term {
    fn parse(term: &str) -> Term {
        if let Some(rest) = term.strip_prefix('^') {
            return Term::Not(Box::new(Term::parse(rest)));
        }
        match term.split_once(':') {
            Some((field, pattern))
                if !field.is_empty()
                    && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                Term::Field {
                    field: field.to_lowercase(),
                    pattern: pattern.to_lowercase(),
                }
            }
            _ => Term::Any(term.to_lowercase()),
        }
    }

    fn matches<T: Fields>(&self, obj: &T) -> bool {
        let contains = |name: &str, pattern: &str| {
            obj.field(name)
                .map_or(false, |v| v.to_lowercase().contains(pattern))
        };
        match self {
            Term::Field { field, pattern } => contains(field.as_str(), pattern.as_str()),
            Term::Any(pattern) => T::DEFAULT_FIELDS
                .iter()
                .any(|f| contains(*f, pattern.as_str())),
            Term::Not(term) => !term.matches(obj),
        }
    }
}

/// All terms must match. No terms match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    pub fn parse<S: AsRef<str>>(terms: &[S]) -> Query {
        Query {
            terms: terms
                .iter()
                .map(|t| t.as_ref().trim())
                .filter(|t| !t.is_empty())
                .map(Term::parse)
                .collect(),
        }
    }

    pub fn matches<T: Fields>(&self, obj: &T) -> bool {
        self.terms.iter().all(|t| t.matches(obj))
    }
}
