//! Process-wide, flat symbol table. There is no scoping in brainrot: a
//! variable bound anywhere lives for the remainder of the run.
//!
//! The source used a bounded array (`MAX_VARS`, linear scan by name).
//! A hash map is the right data structure for a rewrite with no scoping
//! to preserve, but the soft capacity is kept so that "symbol table full"
//! remains an observable, testable soft error rather than something a
//! `HashMap` quietly allows forever.

use std::collections::HashMap;

use crate::ast::TypeModifiers;

pub const MAX_VARS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f32),
}

#[derive(Debug, Clone)]
struct SymbolEntry {
    value: Value,
    modifiers: TypeModifiers,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<String, SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn has_room_for(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.entries.len() < MAX_VARS
    }

    /// Binds `name` to an integer value, overwriting any prior binding
    /// (including switching it from float to int). Returns `false` iff
    /// the table is at capacity and `name` is not already present.
    pub fn set_int(&mut self, name: &str, value: i64, modifiers: TypeModifiers) -> bool {
        if !self.has_room_for(name) {
            return false;
        }
        self.entries.insert(
            name.to_string(),
            SymbolEntry {
                value: Value::Int(value),
                modifiers,
            },
        );
        true
    }

    /// Binds `name` to a float value. See `set_int`.
    pub fn set_float(&mut self, name: &str, value: f32, modifiers: TypeModifiers) -> bool {
        if !self.has_room_for(name) {
            return false;
        }
        self.entries.insert(
            name.to_string(),
            SymbolEntry {
                value: Value::Float(value),
                modifiers,
            },
        );
        true
    }

    /// Marks an already-bound variable's stored modifiers as boolean,
    /// without touching its value. Used by the executor when an
    /// assignment's RHS is boolean-shaped (see `executor::execute_assignment`).
    pub fn mark_boolean(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.modifiers.boolean = true;
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(|e| e.value)
    }

    pub fn is_float(&self, name: &str) -> bool {
        matches!(self.entries.get(name).map(|e| e.value), Some(Value::Float(_)))
    }

    /// Zeroed record for unknown names, per spec.
    pub fn get_modifiers(&self, name: &str) -> TypeModifiers {
        self.entries
            .get(name)
            .map(|e| e.modifiers)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_switches_is_float() {
        let mut table = SymbolTable::new();
        assert!(table.set_float("x", 1.5, TypeModifiers::default()));
        assert!(table.is_float("x"));
        assert!(table.set_int("x", 7, TypeModifiers::default()));
        assert!(!table.is_float("x"));
        assert_eq!(table.get("x"), Some(Value::Int(7)));
    }

    #[test]
    fn unknown_name_has_zeroed_modifiers() {
        let table = SymbolTable::new();
        assert_eq!(table.get_modifiers("ghost"), TypeModifiers::default());
        assert_eq!(table.get("ghost"), None);
    }

    #[test]
    fn set_fails_exactly_at_capacity() {
        let mut table = SymbolTable::new();
        for i in 0..MAX_VARS {
            assert!(table.set_int(&format!("v{i}"), i as i64, TypeModifiers::default()));
        }
        assert!(!table.set_int("overflow", 0, TypeModifiers::default()));
        // Re-binding an existing name still succeeds at capacity.
        assert!(table.set_int("v0", 99, TypeModifiers::default()));
    }
}
