//! VM Memory Model
//!
//! Name-keyed tables mutated during execution: account balances and
//! program variables. Ordered maps keep diagnostics deterministic.

use std::collections::BTreeMap;

use crate::error::{VmError, VmResult};
use super::value::Value;

/// Account balance table. Entries only come from `ACCOUNT_INIT`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Accounts {
    balances: BTreeMap<String, f64>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or reset an account to zero
    pub fn init(&mut self, name: &str) {
        self.balances.insert(name.to_string(), 0.0);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.balances.contains_key(name)
    }

    pub fn balance(&self, name: &str) -> Option<f64> {
        self.balances.get(name).copied()
    }

    /// Check an account exists
    pub fn require(&self, name: &str) -> VmResult<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(VmError::UnknownAccount(name.to_string()))
        }
    }

    /// Mutable balance of an existing account
    pub fn balance_mut(&mut self, name: &str) -> VmResult<&mut f64> {
        self.balances
            .get_mut(name)
            .ok_or_else(|| VmError::UnknownAccount(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.balances
    }
}

/// Variable table. Entries are created on first store.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn store(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}
