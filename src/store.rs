//! The typed variable store.
//!
//! A variable goes through three steps before it can be read:
//!
//! ```text
//! total%alias = counters     # declare under an alias
//! total%type = int           # fix its type
//! total%value = 0            # assign a value of that type
//! ```
//!
//! All variables live in one script-global map; function bodies read and
//! write the same store as top-level code.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub alias: String,
    pub ty: Option<ValueType>,
    pub value: Option<Value>,
}

#[derive(Debug, Default)]
pub struct VariableStore {
    variables: HashMap<String, Variable>,
    /// Canonical names in declaration order.
    order: Vec<String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_alias(&mut self, alias: &str, name: &str) -> Result<()> {
        if let Some(existing) = self.variables.get(name) {
            return Err(Error::Declaration(format!(
                "variable '{}' is already declared under alias '{}'",
                name, existing.alias
            )));
        }
        self.variables.insert(
            name.to_string(),
            Variable {
                alias: alias.to_string(),
                ty: None,
                value: None,
            },
        );
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn declare_type(&mut self, name: &str, ty: ValueType) -> Result<()> {
        let var = self.variables.get_mut(name).ok_or_else(|| {
            Error::Declaration(format!(
                "variable '{}' needs an alias declaration before its type",
                name
            ))
        })?;
        if let Some(existing) = var.ty {
            return Err(Error::Declaration(format!(
                "variable '{}' already has type {}",
                name, existing
            )));
        }
        var.ty = Some(ty);
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        let var = self.variables.get_mut(name).ok_or_else(|| {
            Error::Declaration(format!("variable '{}' is not declared", name))
        })?;
        let ty = var.ty.ok_or_else(|| {
            Error::Declaration(format!("variable '{}' has no declared type", name))
        })?;
        if value.value_type() != ty {
            return Err(Error::type_mismatch(format!(
                "cannot assign {} value '{}' to {} variable '{}'",
                value.value_type(),
                value,
                ty,
                name
            )));
        }
        var.value = Some(value);
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<&Value> {
        let var = self
            .variables
            .get(name)
            .ok_or_else(|| Error::undefined(format!("variable '{}' is not declared", name)))?;
        if var.ty.is_none() {
            return Err(Error::Declaration(format!(
                "variable '{}' has no declared type",
                name
            )));
        }
        var.value
            .as_ref()
            .ok_or_else(|| Error::undefined(format!("variable '{}' has no value yet", name)))
    }

    pub fn alias_of(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(|v| v.alias.as_str())
    }

    pub fn type_of(&self, name: &str) -> Option<ValueType> {
        self.variables.get(name).and_then(|v| v.ty)
    }

    /// Canonical names grouped under `alias`, in declaration order.
    pub fn members(&self, alias: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| self.alias_of(name) == Some(alias))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(name: &str, ty: ValueType) -> VariableStore {
        let mut store = VariableStore::new();
        store.declare_alias("group", name).unwrap();
        store.declare_type(name, ty).unwrap();
        store
    }

    #[test]
    fn full_declaration_cycle() {
        let mut store = typed("n", ValueType::Integer);
        store.assign("n", Value::Integer(7)).unwrap();
        assert_eq!(store.read("n").unwrap(), &Value::Integer(7));
        assert_eq!(store.alias_of("n"), Some("group"));
        assert_eq!(store.type_of("n"), Some(ValueType::Integer));
    }

    #[test]
    fn double_alias_declaration_fails() {
        let mut store = VariableStore::new();
        store.declare_alias("a", "x").unwrap();
        assert!(matches!(
            store.declare_alias("b", "x"),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn type_requires_alias_and_is_set_once() {
        let mut store = VariableStore::new();
        assert!(matches!(
            store.declare_type("x", ValueType::Text),
            Err(Error::Declaration(_))
        ));
        store.declare_alias("a", "x").unwrap();
        store.declare_type("x", ValueType::Text).unwrap();
        assert!(matches!(
            store.declare_type("x", ValueType::Integer),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn assignment_requires_a_type() {
        let mut store = VariableStore::new();
        assert!(matches!(
            store.assign("x", Value::Integer(1)),
            Err(Error::Declaration(_))
        ));
        store.declare_alias("a", "x").unwrap();
        assert!(matches!(
            store.assign("x", Value::Integer(1)),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn no_coercion_between_numeric_kinds() {
        let mut store = typed("n", ValueType::Integer);
        assert!(matches!(
            store.assign("n", Value::Decimal(1.0)),
            Err(Error::TypeMismatch(_))
        ));
        let mut store = typed("d", ValueType::Decimal);
        assert!(matches!(
            store.assign("d", Value::Integer(1)),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn reading_unknown_or_unset_is_undefined() {
        let store = typed("n", ValueType::Integer);
        assert!(matches!(store.read("n"), Err(Error::UndefinedReference(_))));
        assert!(matches!(store.read("zz"), Err(Error::UndefinedReference(_))));
    }

    #[test]
    fn members_follow_declaration_order() {
        let mut store = VariableStore::new();
        store.declare_alias("people", "bob").unwrap();
        store.declare_alias("other", "x").unwrap();
        store.declare_alias("people", "alice").unwrap();
        assert_eq!(store.members("people"), vec!["bob", "alice"]);
    }
}
