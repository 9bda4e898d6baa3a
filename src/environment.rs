//! Runtime scope chain.
//!
//! Each frame stores variables two ways: by name in a hash map, for bindings
//! the resolver left unresolved (globals, mostly), and by index in a slot
//! array, for locals whose `(depth, index)` was computed statically.  A given
//! variable lives in exactly one of the two.
//!
//! Frames are shared through `Rc<RefCell<_>>` so that closures can keep their
//! defining scope alive after the block that created it has finished.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Contents of a variable.  `Uninitialized` marks "declared, initializer not
/// run yet" and is never handed out as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Uninitialized,
    Value(Value),
}

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
    slots: Vec<Option<Binding>>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Outermost (global) frame.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self::sized(Some(enclosing), 0)
    }

    /// Frame with `size` pre‑allocated slots; defining past the end grows it.
    pub fn sized(enclosing: Option<Rc<RefCell<Environment>>>, size: usize) -> Self {
        Environment {
            values: HashMap::new(),
            slots: vec![None; size],
            enclosing,
        }
    }

    pub fn enclosing(&self) -> Option<Rc<RefCell<Environment>>> {
        self.enclosing.clone()
    }

    // ───────────────────────────── definition ─────────────────────────────

    /// Bind `name` in this frame.  Redefinition overwrites.
    pub fn define(&mut self, name: &str, value: Value, slot: Option<usize>) {
        debug!("Defining '{}' (slot {:?}) = {}", name, slot, value);

        self.store(name, Binding::Value(value), slot);
    }

    /// Declare `name` without a value; reads fail until it is assigned.
    pub fn define_uninitialized(&mut self, name: &str, slot: Option<usize>) {
        debug!("Declaring '{}' (slot {:?}) uninitialized", name, slot);

        self.store(name, Binding::Uninitialized, slot);
    }

    fn store(&mut self, name: &str, binding: Binding, slot: Option<usize>) {
        match slot {
            Some(index) => {
                if index >= self.slots.len() {
                    self.slots.resize(index + 1, None);
                }
                self.slots[index] = Some(binding);
            }
            None => {
                self.values.insert(name.to_string(), binding);
            }
        }
    }

    // ───────────────────────────── lookup ─────────────────────────────────

    /// Read a variable.  A resolved slot is read directly from this frame;
    /// otherwise the name is searched from here outwards.
    pub fn get(&self, name: &Token<'_>, slot: Option<usize>) -> Result<Value> {
        if let Some(index) = slot {
            return match self.slots.get(index) {
                Some(Some(binding)) => Self::read(binding, name),
                _ => Err(undefined(name)),
            };
        }

        if let Some(binding) = self.values.get(name.lexeme) {
            return Self::read(binding, name);
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name, None),
            None => Err(undefined(name)),
        }
    }

    /// `get` on the frame exactly `distance` hops out.
    pub fn get_at(&self, distance: usize, name: &Token<'_>, slot: Option<usize>) -> Result<Value> {
        if distance == 0 {
            return self.get(name, slot);
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get_at(distance - 1, name, slot),
            None => Err(too_far(name, distance)),
        }
    }

    fn read(binding: &Binding, name: &Token<'_>) -> Result<Value> {
        match binding {
            Binding::Value(value) => Ok(value.clone()),
            Binding::Uninitialized => Err(LoxError::runtime(
                name.line,
                format!("Uninitialized variable access: {}.", name.lexeme),
            )),
        }
    }

    // ───────────────────────────── assignment ─────────────────────────────

    /// Overwrite an existing variable; never declares one.
    pub fn assign(&mut self, name: &Token<'_>, slot: Option<usize>, value: Value) -> Result<()> {
        debug!("Assigning '{}' (slot {:?}) = {}", name.lexeme, slot, value);

        if let Some(index) = slot {
            return match self.slots.get_mut(index) {
                Some(entry) if entry.is_some() => {
                    *entry = Some(Binding::Value(value));
                    Ok(())
                }
                _ => Err(undefined(name)),
            };
        }

        if let Some(binding) = self.values.get_mut(name.lexeme) {
            *binding = Binding::Value(value);
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, None, value),
            None => Err(undefined(name)),
        }
    }

    /// `assign` on the frame exactly `distance` hops out.
    pub fn assign_at(
        &mut self,
        distance: usize,
        slot: Option<usize>,
        name: &Token<'_>,
        value: Value,
    ) -> Result<()> {
        if distance == 0 {
            return self.assign(name, slot, value);
        }

        match &self.enclosing {
            Some(enclosing) => enclosing
                .borrow_mut()
                .assign_at(distance - 1, slot, name, value),
            None => Err(too_far(name, distance)),
        }
    }

    /// The frame `distance` hops out from `env`, if the chain is that long.
    pub fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut frame: Rc<RefCell<Environment>> = Rc::clone(env);

        for _ in 0..distance {
            let next = frame.borrow().enclosing.clone()?;
            frame = next;
        }

        Some(frame)
    }
}

fn undefined(name: &Token<'_>) -> LoxError {
    LoxError::runtime(
        name.line,
        format!("Undefined variable '{}'.", name.lexeme),
    )
}

fn too_far(name: &Token<'_>, distance: usize) -> LoxError {
    LoxError::runtime(
        name.line,
        format!(
            "No enclosing scope {} level(s) out for '{}'.",
            distance, name.lexeme
        ),
    )
}
