use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A mapping from resource kind (cpu, memory, gpu, ...) to quantity.
///
/// Keys absent from the map are implicitly zero. Subtraction may drive a
/// component negative: that represents over-commitment and is never
/// clamped. Callers must treat a negative component as "no spare
/// capacity" for that kind, not as a claimable amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceVector(BTreeMap<String, f64>);

impl ResourceVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Quantity for `kind`, zero when absent.
    pub fn get(&self, kind: &str) -> f64 {
        self.0.get(kind).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, kind: impl Into<String>, quantity: f64) {
        self.0.insert(kind.into(), quantity);
    }

    /// Pointwise addition of `other` into `self`.
    pub fn add(&mut self, other: &ResourceVector) {
        for (kind, quantity) in &other.0 {
            *self.0.entry(kind.clone()).or_insert(0.0) += quantity;
        }
    }

    /// Pointwise subtraction of `other` from `self`. Components are not
    /// clamped at zero.
    pub fn sub(&mut self, other: &ResourceVector) {
        for (kind, quantity) in &other.0 {
            *self.0.entry(kind.clone()).or_insert(0.0) -= quantity;
        }
    }

    /// True when at least one resource kind has a strictly positive
    /// quantity.
    pub fn has_spare(&self) -> bool {
        self.0.values().any(|quantity| *quantity > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(kind, quantity)| (kind.as_str(), *quantity))
    }
}

impl<S: Into<String>, const N: usize> From<[(S, f64); N]> for ResourceVector {
    fn from(entries: [(S, f64); N]) -> Self {
        Self(entries.into_iter().map(|(k, q)| (k.into(), q)).collect())
    }
}

impl std::fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (kind, quantity) in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{kind}={quantity}")?;
            first = false;
        }
        Ok(())
    }
}
