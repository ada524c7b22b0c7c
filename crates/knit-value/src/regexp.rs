//! Regular expressions.

use regex_lite::{Regex, RegexBuilder};
use std::rc::Rc;

use crate::ValueError;

#[derive(Debug, Clone)]
struct RegExpData {
    source: String,
    flags: String,
    compiled: Regex,
}

/// Shared handle to a compiled regular expression.
///
/// Only the `i`, `m` and `s` flags change matching. Other flags are kept
/// verbatim so a copy reports the same `flags`.
#[derive(Debug, Clone)]
pub struct RegExpRef(Rc<RegExpData>);

impl RegExpRef {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Result<Self, ValueError> {
        let source = source.into();
        let flags = flags.into();
        let compiled = RegexBuilder::new(&source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|e| ValueError::InvalidRegExp {
                pattern: source.clone(),
                message: e.to_string(),
            })?;
        Ok(Self(Rc::new(RegExpData {
            source,
            flags,
            compiled,
        })))
    }

    /// New handle with the same pattern and flags. Reuses the compiled
    /// program, so it cannot fail.
    pub fn duplicate(&self) -> Self {
        Self(Rc::new(RegExpData::clone(&self.0)))
    }

    pub fn source(&self) -> &str {
        &self.0.source
    }

    pub fn flags(&self) -> &str {
        &self.0.flags
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.compiled.is_match(haystack)
    }

    pub fn ptr_eq(&self, other: &RegExpRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}
