use super::*;

impl VpiEnv {
    /// Resolves a dotted hierarchical name to a handle.
    ///
    /// With `scope` the search starts there (a generic `vpiScope` is first
    /// moved to its module). Without one, the scope is found by descending
    /// from the root modules. The scope's full name is stripped from the front
    /// of `name`, and the rest is matched against the members in order (with
    /// the words of member memories), then against the scope itself.
    pub fn handle_by_name(&mut self, name: &str, scope: Option<HandleId>) -> Option<HandleId> {
        let start = match scope {
            Some(id) if self.object(id).type_code() == ObjectType::Scope => {
                self.handle(ObjectType::Module, Some(id))
            }
            Some(id) => Some(id),
            None => self.find_scope(name),
        };

        let result = start.and_then(|scope| {
            let full = self.get_str(Property::FullName, Some(scope)).unwrap_or_default();
            let base = strip_scope(name, &full).unwrap_or(name);
            self.find_name(base, scope)
        });

        vpi_trace!(
            self.trace,
            "vpi_handle_by_name(\"{}\", {}) --> {}",
            name,
            OptHandle(scope),
            OptHandle(result)
        );
        result
    }

    /// Deepest scope whose full name is a `.`-terminated prefix of `name`. At
    /// the root level an exact match also counts. The first matching child
    /// wins at every level.
    fn find_scope(&mut self, name: &str) -> Option<HandleId> {
        let mut found = None;
        let mut level = self.iterate(ObjectType::Module, None);
        let mut at_root = true;

        while let Some(iter) = level.take() {
            while let Some(child) = self.scan(iter) {
                let full = self.get_str(Property::FullName, Some(child)).unwrap_or_default();
                let descend = strip_scope(name, &full).is_some();
                if descend || (at_root && full == name) {
                    self.free_object(iter);
                    found = Some(child);
                    if descend {
                        level = self.iterate(ObjectType::InternalScope, Some(child));
                    }
                    break;
                }
            }
            at_root = false;
        }

        found
    }

    fn find_name(&mut self, name: &str, scope: HandleId) -> Option<HandleId> {
        let members = match self.objects.scope(scope) {
            Some(s) => s.members.clone(),
            None => return None,
        };

        for member in members {
            if self.get_str(Property::Name, Some(member)).as_deref() == Some(name) {
                return Some(member);
            }

            if self.object(member).type_code() == ObjectType::Memory {
                if let Some(iter) = self.iterate(ObjectType::MemoryWord, Some(member)) {
                    while let Some(word) = self.scan(iter) {
                        if self.get_str(Property::Name, Some(word)).as_deref() == Some(name) {
                            self.free_object(iter);
                            return Some(word);
                        }
                    }
                }
            }
        }

        // Members shadow the scope's own name.
        if self.get_str(Property::Name, Some(scope)).as_deref() == Some(name) {
            return Some(scope);
        }
        None
    }
}

/// `name` with `scope_name.` removed from the front, if it starts that way.
fn strip_scope<'a>(name: &'a str, scope_name: &str) -> Option<&'a str> {
    name.strip_prefix(scope_name)?.strip_prefix('.')
}
