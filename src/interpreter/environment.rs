//=====================================================
// File: interpreter/environment.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Chained lexical scopes for the Glint evaluator
// Objective: Provide shared, reference-counted frames so closures keep their
//            defining scope alive while active calls read and write it
//=====================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::errors::RuntimeError;
use crate::ast::Node;

#[derive(Default)]
struct Frame {
    bindings: HashMap<String, Node>,
    parent: Option<Environment>,
}

/// Handle to one frame in the scope chain.
///
/// Cloning the handle shares the frame. A frame lives as long as the call or
/// loop iteration that created it, or any closure that captured it.
#[derive(Clone, Default)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh frame whose lookups fall back to `parent`.
    pub fn enclosed(parent: &Environment) -> Self {
        Self {
            frame: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: Some(parent.clone()),
            })),
        }
    }

    //Function: set_identifier
    //Purpose: Bind or overwrite a name in this frame only
    //Inputs: name, value
    //Returns: ()
    pub fn set_identifier(&self, name: impl Into<String>, value: Node) {
        self.frame.borrow_mut().bindings.insert(name.into(), value);
    }

    //Function: get_identifier
    //Purpose: Resolve a name through this frame and then each enclosing frame
    //Inputs: name, line of the reference for diagnostics
    //Returns: Result<Node, RuntimeError>
    pub fn get_identifier(&self, name: &str, line: usize) -> Result<Node, RuntimeError> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::undefined(line, name))
    }

    pub fn lookup(&self, name: &str) -> Option<Node> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let frame = env.frame.borrow();
            if let Some(value) = frame.bindings.get(name) {
                return Some(value.clone());
            }
            current = frame.parent.clone();
        }
        None
    }

    /// Assignment rule: overwrite the innermost frame that already binds
    /// `name`, otherwise create the binding in this frame.
    pub fn assign(&self, name: &str, value: Node) {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let mut frame = env.frame.borrow_mut();
            if let Some(slot) = frame.bindings.get_mut(name) {
                *slot = value;
                return;
            }
            current = frame.parent.clone();
        }
        self.set_identifier(name, value);
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.frame.borrow().bindings.contains_key(name)
    }

    /// Number of frames from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.frame.borrow().parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.frame.borrow().parent.clone();
        }
        depth
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// Frames can hold closures that capture the frame itself, so only names are shown.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        let mut names: Vec<&String> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .field("names", &names)
            .finish()
    }
}
