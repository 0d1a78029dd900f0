//! Statement parameter bookkeeping
//!
//! This module provides:
//! - [`ParameterNameIndex`]: parameter label to ordinal lookup
//! - [`ParameterState`]: the per-statement descriptor set, value buffer and
//!   last-null flag
//! - [`ParameterIndex`]: addressing parameters by 1-based ordinal or by name

use std::sync::Arc;

use indexmap::IndexMap;

use crate::constants::ParameterMode;
use crate::error::{Error, Result};
use crate::row::Value;
use crate::statement::ParameterDescriptor;

/// Maps parameter labels to 0-based slots.
///
/// Lookup tries the name exactly as given first and the upper-cased name
/// second, so unquoted identifiers match regardless of case.
#[derive(Debug, Clone, Default)]
pub struct ParameterNameIndex {
    names: IndexMap<String, usize>,
}

impl ParameterNameIndex {
    /// Build the index from descriptor labels; empty labels are skipped and
    /// the first occurrence of a duplicate label wins
    pub fn from_descriptors(descriptors: &[ParameterDescriptor]) -> Self {
        let mut names = IndexMap::with_capacity(descriptors.len());
        for (slot, desc) in descriptors.iter().enumerate() {
            if !desc.name.is_empty() {
                names.entry(desc.name.clone()).or_insert(slot);
            }
        }
        Self { names }
    }

    /// 0-based slot for `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names
            .get(name)
            .or_else(|| self.names.get(name.to_uppercase().as_str()))
            .copied()
    }

    /// 1-based ordinal for `name`
    pub fn ordinal(&self, name: &str) -> Result<usize> {
        self.find(name)
            .map(|slot| slot + 1)
            .ok_or_else(|| Error::ParameterNotFound(name.to_string()))
    }

    /// Number of named parameters
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no parameter carries a label
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Labels in parameter order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

/// Mutable per-statement parameter state.
///
/// One value slot per descriptor. IN values are written by setters, OUT and
/// IN OUT slots are overwritten with the engine's values after each
/// execution.
#[derive(Debug, Clone)]
pub struct ParameterState {
    descriptors: Arc<[ParameterDescriptor]>,
    names: ParameterNameIndex,
    values: Vec<Value>,
    set: Vec<bool>,
    was_null: bool,
    closed: bool,
}

impl ParameterState {
    /// Create state for the given descriptor set
    pub fn new(descriptors: Arc<[ParameterDescriptor]>) -> Self {
        let count = descriptors.len();
        Self {
            names: ParameterNameIndex::from_descriptors(&descriptors),
            descriptors,
            values: vec![Value::Null; count],
            set: vec![false; count],
            was_null: false,
            closed: false,
        }
    }

    /// Fail with [`Error::StatementClosed`] once closed
    pub fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::StatementClosed);
        }
        Ok(())
    }

    /// Number of parameters
    pub fn count(&self) -> usize {
        self.descriptors.len()
    }

    /// All descriptors
    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    /// Descriptor for a 0-based slot
    pub fn descriptor(&self, slot: usize) -> &ParameterDescriptor {
        &self.descriptors[slot]
    }

    /// Name index
    pub fn names(&self) -> &ParameterNameIndex {
        &self.names
    }

    /// Translate a 1-based ordinal to a 0-based slot
    pub fn slot(&self, ordinal: usize) -> Result<usize> {
        if ordinal == 0 || ordinal > self.count() {
            return Err(Error::InvalidParameterIndex {
                index: ordinal,
                count: self.count(),
            });
        }
        Ok(ordinal - 1)
    }

    /// Current value of a slot
    pub fn value(&self, slot: usize) -> &Value {
        &self.values[slot]
    }

    /// Store an IN value
    pub fn set_value(&mut self, slot: usize, value: Value) {
        self.values[slot] = value;
        self.set[slot] = true;
    }

    /// Check if a slot has been bound
    pub fn is_set(&self, slot: usize) -> bool {
        self.set[slot]
    }

    /// Forget all bound values
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = Value::Null);
        self.set.iter_mut().for_each(|s| *s = false);
    }

    /// 1-based ordinal of the first input parameter that was never bound
    pub fn first_unset_input(&self) -> Option<usize> {
        self.descriptors
            .iter()
            .zip(&self.set)
            .position(|(desc, set)| desc.mode.is_input() && !set)
            .map(|slot| slot + 1)
    }

    /// Values to send with an execution; pure OUT slots travel as NULL
    pub fn bound_values(&self) -> Vec<Value> {
        self.descriptors
            .iter()
            .zip(&self.values)
            .map(|(desc, value)| {
                if desc.mode == ParameterMode::Out {
                    Value::Null
                } else {
                    value.clone()
                }
            })
            .collect()
    }

    /// Merge the engine's post-execution values into the output slots.
    ///
    /// The engine returns one value per parameter; any other length is a
    /// protocol violation.
    pub fn apply_out_values(&mut self, out_values: Vec<Value>) -> Result<()> {
        if out_values.is_empty() {
            return Ok(());
        }
        if out_values.len() != self.count() {
            return Err(Error::Protocol(format!(
                "engine returned {} parameter values for {} parameters",
                out_values.len(),
                self.count()
            )));
        }
        for (slot, value) in out_values.into_iter().enumerate() {
            if self.descriptors[slot].mode.is_output() {
                self.values[slot] = value;
            }
        }
        Ok(())
    }

    /// Record whether the value just read was SQL NULL
    pub fn record_null(&mut self, value: &Value) {
        self.was_null = value.is_null();
    }

    /// Whether the last value read was SQL NULL
    pub fn was_null(&self) -> bool {
        self.was_null
    }

    /// Release the name index and value buffer
    pub fn close(&mut self) {
        self.descriptors = Arc::from(Vec::new());
        self.names = ParameterNameIndex::default();
        self.values.clear();
        self.set.clear();
        self.was_null = false;
        self.closed = true;
    }

    /// Check if [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Addresses a statement parameter by 1-based ordinal or by name.
///
/// Names are resolved to their ordinal first, so both forms run the same
/// code path afterwards.
pub trait ParameterIndex {
    /// Resolve to a 0-based slot
    fn resolve(&self, params: &ParameterState) -> Result<usize>;
}

impl ParameterIndex for usize {
    fn resolve(&self, params: &ParameterState) -> Result<usize> {
        params.slot(*self)
    }
}

impl ParameterIndex for &str {
    fn resolve(&self, params: &ParameterState) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::NullArgument("parameter name"));
        }
        params.names().ordinal(self)?.resolve(params)
    }
}

impl ParameterIndex for String {
    fn resolve(&self, params: &ParameterState) -> Result<usize> {
        self.as_str().resolve(params)
    }
}

impl ParameterIndex for &String {
    fn resolve(&self, params: &ParameterState) -> Result<usize> {
        self.as_str().resolve(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SqlType;

    fn descriptors() -> Arc<[ParameterDescriptor]> {
        Arc::from(vec![
            ParameterDescriptor::new("A", SqlType::Integer, ParameterMode::In),
            ParameterDescriptor::new("Result", SqlType::Integer, ParameterMode::Out),
            ParameterDescriptor::new("", SqlType::VarChar, ParameterMode::InOut),
            ParameterDescriptor::new("A", SqlType::VarChar, ParameterMode::In),
        ])
    }

    #[test]
    fn test_name_index_lookup() {
        let index = ParameterNameIndex::from_descriptors(&descriptors());
        assert_eq!(index.len(), 2);
        assert_eq!(index.find("A"), Some(0));
        assert_eq!(index.find("a"), Some(0));
        assert_eq!(index.find("Result"), Some(1));
        assert_eq!(index.find("result"), None);
        assert_eq!(index.find(""), None);
        assert_eq!(index.ordinal("A").unwrap(), 1);
        assert!(matches!(
            index.ordinal("missing"),
            Err(Error::ParameterNotFound(name)) if name == "missing"
        ));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["A", "Result"]);
    }

    #[test]
    fn test_ordinal_bounds() {
        let state = ParameterState::new(descriptors());
        assert_eq!(1usize.resolve(&state).unwrap(), 0);
        assert_eq!(4usize.resolve(&state).unwrap(), 3);
        assert!(matches!(
            0usize.resolve(&state),
            Err(Error::InvalidParameterIndex { index: 0, count: 4 })
        ));
        assert!(5usize.resolve(&state).unwrap_err().is_argument_error());
    }

    #[test]
    fn test_name_resolves_through_ordinal() {
        let state = ParameterState::new(descriptors());
        assert_eq!("a".resolve(&state).unwrap(), 1usize.resolve(&state).unwrap());
        assert_eq!(String::from("Result").resolve(&state).unwrap(), 1);
        assert!("nope".resolve(&state).is_err());
    }

    #[test]
    fn test_unset_inputs() {
        let mut state = ParameterState::new(descriptors());
        assert_eq!(state.first_unset_input(), Some(1));
        state.set_value(0, Value::Integer(1));
        assert_eq!(state.first_unset_input(), Some(3));
        state.set_value(2, Value::from("x"));
        state.set_value(3, Value::Null);
        assert_eq!(state.first_unset_input(), None);

        state.clear();
        assert_eq!(state.first_unset_input(), Some(1));
        assert!(state.value(2).is_null());
    }

    #[test]
    fn test_bound_values_null_for_out() {
        let mut state = ParameterState::new(descriptors());
        state.set_value(0, Value::Integer(7));
        state.set_value(2, Value::from("io"));
        let bound = state.bound_values();
        assert_eq!(bound[0], Value::Integer(7));
        assert_eq!(bound[1], Value::Null);
        assert_eq!(bound[2], Value::from("io"));
    }

    #[test]
    fn test_apply_out_values() {
        let mut state = ParameterState::new(descriptors());
        state.set_value(0, Value::Integer(7));
        state
            .apply_out_values(vec![
                Value::Integer(99),
                Value::Integer(42),
                Value::from("changed"),
                Value::Null,
            ])
            .unwrap();
        assert_eq!(state.value(0), &Value::Integer(7));
        assert_eq!(state.value(1), &Value::Integer(42));
        assert_eq!(state.value(2), &Value::from("changed"));

        let err = state.apply_out_values(vec![Value::Null]).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_close_resets_state() {
        let mut state = ParameterState::new(descriptors());
        state.record_null(&Value::Null);
        assert!(state.was_null());
        state.close();
        assert!(state.is_closed());
        assert_eq!(state.count(), 0);
        assert!(state.names().is_empty());
        assert!(!state.was_null());
        assert!(matches!(state.check_open(), Err(Error::StatementClosed)));
    }
}
