//! # Object Arena
//!
//! Every entity a callback can hold a handle to lives in one arena and is
//! addressed by a [`HandleId`].
//!
//! ```text
//!   HandleId ──▶ ObjectArena.slots[id] ──▶ Object
//!                                           ├── Scope       (module, task, function, named block)
//!                                           ├── Signal      (net / reg / integer)
//!                                           ├── Memory ──▶ MemoryWord ...
//!                                           ├── TaskCall    (system task / function call site)
//!                                           └── Iterator    (runtime owned, freed on exhaustion)
//! ```
//!
//! Parent to child edges are id lists owned by the parent (`ScopeObj::members`,
//! `MemoryObj::words`). Back references (signal to scope) are plain ids.

use std::fmt;

use crate::utils::{IDPool, StringInterner};
use crate::vpi_user::ObjectType;

mod iterator;
mod kind;
mod memory;
mod scope;
mod signal;
mod task_call;

pub use iterator::IteratorObj;
pub use kind::{Indexable, Iterable, KindContext, Navigable, PropertySource, ValueSink, ValueSource};
pub use memory::{MemoryObj, MemoryWordObj};
pub use scope::{ScopeKind, ScopeObj};
pub use signal::{SignalKind, SignalObj};
pub use task_call::{TaskCallKind, TaskCallObj};

/// Opaque identity of an object. Printed as `#<n>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u32);

impl HandleId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Trace rendering of an optional handle: `#<n>` or `null`.
pub(crate) struct OptHandle(pub Option<HandleId>);

impl fmt::Display for OptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("null"),
        }
    }
}

#[derive(Debug)]
pub enum Object {
    Scope(ScopeObj),
    Signal(SignalObj),
    Memory(MemoryObj),
    MemoryWord(MemoryWordObj),
    TaskCall(TaskCallObj),
    Iterator(IteratorObj),
}

// Kind descriptor: each accessor answers `None` when the kind lacks the
// capability, and callers turn that into the documented sentinel.
impl Object {
    pub fn type_code(&self) -> ObjectType {
        match self {
            Object::Scope(s) => s.kind.type_code(),
            Object::Signal(s) => s.kind.type_code(),
            Object::Memory(_) => ObjectType::Memory,
            Object::MemoryWord(_) => ObjectType::MemoryWord,
            Object::TaskCall(t) => t.kind.type_code(),
            Object::Iterator(_) => ObjectType::Iterator,
        }
    }

    /// A register flagged as an integer variable.
    pub fn is_int(&self) -> bool {
        matches!(self, Object::Signal(s) if s.is_int)
    }

    /// The type code callers see, with the integer-variable override applied.
    pub fn reported_type(&self) -> ObjectType {
        if self.is_int() {
            ObjectType::IntegerVar
        } else {
            self.type_code()
        }
    }

    pub fn properties(&self) -> Option<&dyn PropertySource> {
        match self {
            Object::Scope(s) => Some(s),
            Object::Signal(s) => Some(s),
            Object::Memory(m) => Some(m),
            Object::MemoryWord(w) => Some(w),
            Object::TaskCall(t) => Some(t),
            Object::Iterator(_) => None,
        }
    }

    pub fn value_source(&self) -> Option<&dyn ValueSource> {
        match self {
            Object::Signal(s) => Some(s),
            Object::MemoryWord(w) => Some(w),
            _ => None,
        }
    }

    pub fn value_sink(&mut self) -> Option<&mut dyn ValueSink> {
        match self {
            Object::Signal(s) => Some(s),
            Object::MemoryWord(w) => Some(w),
            _ => None,
        }
    }

    pub fn navigable(&self) -> Option<&dyn Navigable> {
        match self {
            Object::Scope(s) => Some(s),
            Object::Signal(s) => Some(s),
            Object::Memory(m) => Some(m),
            Object::MemoryWord(w) => Some(w),
            Object::TaskCall(t) => Some(t),
            Object::Iterator(_) => None,
        }
    }

    pub fn indexable(&self) -> Option<&dyn Indexable> {
        match self {
            Object::Memory(m) => Some(m),
            _ => None,
        }
    }

    pub fn iterable(&self) -> Option<&dyn Iterable> {
        match self {
            Object::Scope(s) => Some(s),
            Object::Memory(m) => Some(m),
            Object::TaskCall(t) => Some(t),
            _ => None,
        }
    }

    /// The scope this object is declared in. A scope's is its parent.
    pub fn owner_scope(&self) -> Option<HandleId> {
        match self {
            Object::Scope(s) => s.parent,
            Object::Signal(s) => Some(s.scope),
            Object::Memory(m) => Some(m.scope),
            Object::MemoryWord(w) => Some(w.scope),
            Object::TaskCall(t) => Some(t.scope),
            Object::Iterator(_) => None,
        }
    }

    pub fn name(&self) -> Option<crate::utils::Symbol> {
        match self {
            Object::Scope(s) => Some(s.name),
            Object::Signal(s) => Some(s.name),
            Object::Memory(m) => Some(m.name),
            Object::MemoryWord(w) => Some(w.name),
            Object::TaskCall(t) => Some(t.name),
            Object::Iterator(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectArena {
    slots: Vec<Option<Object>>,
    ids: IDPool,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, obj: Object) -> HandleId {
        let id = self.ids.alloc_id();
        let idx = id as usize;
        if idx == self.slots.len() {
            self.slots.push(Some(obj));
        } else {
            debug_assert!(self.slots[idx].is_none(), "slot {} reused while live", idx);
            self.slots[idx] = Some(obj);
        }
        HandleId(id)
    }

    pub fn remove(&mut self, id: HandleId) -> Option<Object> {
        let obj = self.slots.get_mut(id.index())?.take()?;
        self.ids.release_id(id.0);
        Some(obj)
    }

    #[inline]
    pub fn get(&self, id: HandleId) -> Option<&Object> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut Object> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn live_count(&self) -> usize {
        self.ids.in_use()
    }

    pub fn scope(&self, id: HandleId) -> Option<&ScopeObj> {
        match self.get(id)? {
            Object::Scope(s) => Some(s),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self, id: HandleId) -> Option<&mut ScopeObj> {
        match self.get_mut(id)? {
            Object::Scope(s) => Some(s),
            _ => None,
        }
    }

    pub fn memory_mut(&mut self, id: HandleId) -> Option<&mut MemoryObj> {
        match self.get_mut(id)? {
            Object::Memory(m) => Some(m),
            _ => None,
        }
    }

    /// Nearest module at or above `id` in the scope tree.
    pub fn module_of(&self, id: HandleId) -> Option<HandleId> {
        let mut cur = match self.get(id)? {
            Object::Scope(_) => Some(id),
            other => other.owner_scope(),
        };
        while let Some(scope_id) = cur {
            let scope = self.scope(scope_id)?;
            if scope.kind == ScopeKind::Module {
                return Some(scope_id);
            }
            cur = scope.parent;
        }
        None
    }

    /// Dotted path from the root scope down to `id`.
    pub fn full_name(&self, id: HandleId, strings: &StringInterner) -> Option<String> {
        let obj = self.get(id)?;
        let name = strings.resolve(obj.name()?);
        if matches!(obj, Object::TaskCall(_)) {
            return Some(name.to_string());
        }

        let mut parts = vec![name];
        let mut cur = obj.owner_scope();
        while let Some(scope_id) = cur {
            let scope = self.scope(scope_id)?;
            parts.push(strings.resolve(scope.name));
            cur = scope.parent;
        }
        parts.reverse();
        Some(parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterator_slots_are_recycled() {
        let mut arena = ObjectArena::new();
        let a = arena.insert(Object::Iterator(IteratorObj::new(vec![])));
        let b = arena.insert(Object::Iterator(IteratorObj::new(vec![])));
        assert_ne!(a, b);
        assert!(arena.remove(a).is_some());
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());

        let c = arena.insert(Object::Iterator(IteratorObj::new(vec![b])));
        assert_eq!(c, a);
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn test_handle_display() {
        let mut arena = ObjectArena::new();
        let id = arena.insert(Object::Iterator(IteratorObj::new(vec![])));
        assert_eq!(id.to_string(), "#0");
        assert_eq!(OptHandle(Some(id)).to_string(), "#0");
        assert_eq!(OptHandle(None).to_string(), "null");
    }
}
