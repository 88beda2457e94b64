use crate::{
    error::Result,
    judge::{codeforces::Codeforces, zoj::Zoj, Judge},
};

type Factory = fn() -> Result<Box<dyn Judge>>;

/// One supported judge: its canonical name, accepted aliases and the adapter
/// constructor.
pub struct Entry {
    name: &'static str,
    aliases: &'static [&'static str],
    factory: Factory,
}

impl Entry {
    pub fn new(name: &'static str, aliases: &'static [&'static str], factory: Factory) -> Self {
        Entry {
            name,
            aliases,
            factory,
        }
    }

    fn matches(&self, requested: &str) -> bool {
        self.name.eq_ignore_ascii_case(requested)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(requested))
    }
}

fn build_codeforces() -> Result<Box<dyn Judge>> {
    Ok(Box::new(Codeforces::new()?))
}

fn build_zoj() -> Result<Box<dyn Judge>> {
    Ok(Box::new(Zoj::new()?))
}

/// Immutable name → adapter-factory mapping, populated exhaustively at
/// construction. Lookup is a case-insensitive exact match over names and
/// aliases; unknown names resolve to `None` rather than failing, which keeps
/// the controller's contract total.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new(entries: Vec<Entry>) -> Self {
        Registry { entries }
    }

    pub fn with_defaults() -> Self {
        Registry::new(vec![
            Entry::new("Codeforces", &["cf"], build_codeforces),
            Entry::new("ZOJ", &[], build_zoj),
        ])
    }

    /// Canonical name for a caller-supplied one, or `None` when unsupported.
    pub fn resolve(&self, requested: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.matches(requested))
            .map(|entry| entry.name)
    }

    /// `Ok(None)` for unknown names; `Err` only when the adapter itself
    /// cannot be constructed.
    pub fn build(&self, requested: &str) -> Result<Option<Box<dyn Judge>>> {
        match self.entries.iter().find(|entry| entry.matches(requested)) {
            Some(entry) => Ok(Some((entry.factory)()?)),
            None => Ok(None),
        }
    }

    pub fn supports(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}
