//! Mutable dates.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to a mutable instant.
#[derive(Clone)]
pub struct DateRef(Rc<Cell<DateTime<Utc>>>);

impl DateRef {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(instant)))
    }

    /// Build from milliseconds since the Unix epoch. `None` if out of range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self::new)
    }

    pub fn get(&self) -> DateTime<Utc> {
        self.0.get()
    }

    /// Move this date to another instant; every alias observes the change.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.0.set(instant);
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.get().timestamp_millis()
    }

    pub fn ptr_eq(&self, other: &DateRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_observes_set() {
        let date = DateRef::from_millis(0).unwrap();
        let alias = date.clone();
        alias.set(Utc.timestamp_millis_opt(86_400_000).unwrap());
        assert_eq!(date.timestamp_millis(), 86_400_000);
    }
}
