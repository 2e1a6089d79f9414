use super::*;

impl VpiEnv {
    /// Object related to `handle` by `relation`.
    ///
    /// `vpiSysTfCall` takes no reference handle and answers the system task
    /// call currently running. Every other relation needs one.
    pub fn handle(&mut self, relation: ObjectType, handle: Option<HandleId>) -> Option<HandleId> {
        if relation == ObjectType::SysTfCall {
            if let Some(id) = handle {
                crate::contract_violation!(
                    "vpi_handle({}, vpiSysTfCall): reference must be null",
                    id
                );
            }
            let task = self.current_task;
            vpi_trace!(self.trace, "vpi_handle(null, vpiSysTfCall) --> {}", OptHandle(task));
            return task;
        }

        let Some(id) = handle else {
            crate::contract_violation!("vpi_handle(null, {}): reference handle required", relation);
        };

        let result = {
            let cx = self.kind_context();
            self.object(id)
                .navigable()
                .and_then(|n| n.handle(relation, &cx))
        };

        vpi_trace!(self.trace, "vpi_handle({}, {}) --> {}", id, relation, OptHandle(result));
        result
    }

    pub fn handle_by_index(&mut self, handle: HandleId, index: i32) -> Option<HandleId> {
        let result = self
            .object(handle)
            .indexable()
            .and_then(|i| i.handle_by_index(index));

        vpi_trace!(
            self.trace,
            "vpi_handle_by_index({}, {}) --> {}",
            handle,
            index,
            OptHandle(result)
        );
        result
    }

    /// Starts an iteration over the objects related to `handle`. With no
    /// handle only `vpiModule` (the root scopes) is defined.
    ///
    /// Returns `None` rather than an iterator that would yield nothing.
    pub fn iterate(&mut self, relation: ObjectType, handle: Option<HandleId>) -> Option<HandleId> {
        match self.mode {
            PiMode::Uninitialized => crate::contract_violation!(
                "vpi_iterate({}, {}): called before the runtime was started",
                OptHandle(handle),
                relation
            ),
            PiMode::Registration => {
                log::error!(
                    "vpi_iterate({}, {}): the design is not available during registration",
                    OptHandle(handle),
                    relation
                );
                vpi_trace!(
                    self.trace,
                    "vpi_iterate({}, {}) --> null",
                    OptHandle(handle),
                    relation
                );
                return None;
            }
            PiMode::CompileTf | PiMode::Run => {}
        }

        let items = match handle {
            None if relation == ObjectType::Module => self.roots.clone(),
            None => Vec::new(),
            Some(id) => {
                let cx = self.kind_context();
                self.object(id)
                    .iterable()
                    .map(|it| it.related(relation, &cx))
                    .unwrap_or_default()
            }
        };

        let result = if items.is_empty() {
            None
        } else {
            Some(self.objects.insert(Object::Iterator(IteratorObj::new(items))))
        };

        #[cfg(feature = "debug")]
        log::debug!("[iterate] live objects => {}", self.objects.live_count());

        vpi_trace!(
            self.trace,
            "vpi_iterate({}, {}) --> {}",
            OptHandle(handle),
            relation,
            OptHandle(result)
        );
        result
    }

    /// Next element of `iter`. The iterator is freed when it runs dry and
    /// must not be used afterwards.
    pub fn scan(&mut self, iter: HandleId) -> Option<HandleId> {
        let next = match self.objects.get_mut(iter) {
            Some(Object::Iterator(it)) => it.next(),
            Some(other) => crate::contract_violation!(
                "vpi_scan({}): a {} is not an iterator",
                iter,
                other.type_code()
            ),
            None => crate::contract_violation!("vpi_scan({}): not a live iterator", iter),
        };

        if next.is_none() {
            self.objects.remove(iter);
        }

        vpi_trace!(self.trace, "vpi_scan({}) --> {}", iter, OptHandle(next));
        next
    }

    /// Releases `handle`. Only iterators are owned by the runtime; freeing
    /// anything else is a no-op that succeeds.
    pub fn free_object(&mut self, handle: HandleId) -> bool {
        if matches!(self.object(handle), Object::Iterator(_)) {
            self.objects.remove(handle);
        }

        vpi_trace!(self.trace, "vpi_free_object({}) --> 1", handle);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ScopeKind;
    use crate::vpi_callback::TickQueue;

    fn running_env() -> VpiEnv {
        let mut env = VpiEnv::with_kernel(TickQueue::new());
        env.set_mode(PiMode::Run);
        env
    }

    fn drain(env: &mut VpiEnv, iter: Option<HandleId>) -> Vec<HandleId> {
        let mut out = Vec::new();
        if let Some(iter) = iter {
            while let Some(h) = env.scan(iter) {
                out.push(h);
            }
        }
        out
    }

    #[test]
    fn test_iterate_members_by_relation() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        let clk = env.add_net(top, "clk", 0, 0, false);
        let a = env.add_reg(top, "a", 3, 0, false);
        let i = env.add_integer(top, "i");
        let sub = env.add_scope(top, ScopeKind::NamedBegin, "blk");

        let nets = env.iterate(ObjectType::Net, Some(top));
        assert_eq!(drain(&mut env, nets), vec![clk]);
        let regs = env.iterate(ObjectType::Reg, Some(top));
        assert_eq!(drain(&mut env, regs), vec![a, i]);
        let ints = env.iterate(ObjectType::IntegerVar, Some(top));
        assert_eq!(drain(&mut env, ints), vec![i]);
        let scopes = env.iterate(ObjectType::InternalScope, Some(top));
        assert_eq!(drain(&mut env, scopes), vec![sub]);

        assert_eq!(env.iterate(ObjectType::Memory, Some(top)), None);
        assert_eq!(env.iterate(ObjectType::Net, Some(clk)), None);
    }

    #[test]
    fn test_scan_frees_on_exhaustion() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        let live = env.live_objects();

        let iter = env.iterate(ObjectType::Module, None).unwrap();
        assert_eq!(env.live_objects(), live + 1);
        assert_eq!(env.scan(iter), Some(top));
        assert_eq!(env.scan(iter), None);
        assert_eq!(env.live_objects(), live);
    }

    #[test]
    fn test_free_iterator_early() {
        let mut env = running_env();
        env.add_root_module("a", "a", 0, 0);
        env.add_root_module("b", "b", 0, 0);
        let live = env.live_objects();

        let iter = env.iterate(ObjectType::Module, None).unwrap();
        env.scan(iter);
        assert!(env.free_object(iter));
        assert_eq!(env.live_objects(), live);
    }

    #[test]
    #[should_panic(expected = "not a live iterator")]
    fn test_scan_after_exhaustion_is_fatal() {
        let mut env = running_env();
        env.add_root_module("top", "top", 0, 0);
        let iter = env.iterate(ObjectType::Module, None).unwrap();
        while env.scan(iter).is_some() {}
        env.scan(iter);
    }

    #[test]
    fn test_global_iterate() {
        let mut env = running_env();
        assert_eq!(env.iterate(ObjectType::Module, None), None);
        env.add_root_module("top", "top", 0, 0);
        assert_eq!(env.iterate(ObjectType::Net, None), None);
    }

    #[test]
    fn test_iterate_during_registration_is_soft() {
        let mut env = VpiEnv::with_kernel(TickQueue::new());
        env.add_root_module("top", "top", 0, 0);
        env.set_mode(PiMode::Registration);
        assert_eq!(env.iterate(ObjectType::Module, None), None);
    }

    #[test]
    #[should_panic(expected = "before the runtime was started")]
    fn test_iterate_uninitialized_is_fatal() {
        let mut env = VpiEnv::with_kernel(TickQueue::new());
        env.add_root_module("top", "top", 0, 0);
        env.iterate(ObjectType::Module, None);
    }

    #[test]
    fn test_navigation() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        let sub = env.add_module(top, "sub", "child");
        let blk = env.add_scope(sub, ScopeKind::Generic, "g");
        let a = env.add_reg(blk, "a", 0, 0, false);

        assert_eq!(env.handle(ObjectType::Scope, Some(a)), Some(blk));
        assert_eq!(env.handle(ObjectType::Module, Some(a)), Some(sub));
        assert_eq!(env.handle(ObjectType::Module, Some(blk)), Some(sub));
        assert_eq!(env.handle(ObjectType::Module, Some(sub)), Some(top));
        assert_eq!(env.handle(ObjectType::Module, Some(top)), None);
        assert_eq!(env.handle(ObjectType::Net, Some(a)), None);
    }

    #[test]
    fn test_current_task() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        assert_eq!(env.handle(ObjectType::SysTfCall, None), None);

        let call =
            env.add_sys_task_call(top, crate::object::TaskCallKind::Task, "$hello", vec![], 3);
        env.set_current_task(Some(call));
        assert_eq!(env.handle(ObjectType::SysTfCall, None), Some(call));
        assert_eq!(env.get(Property::Type, Some(call)), ObjectType::SysTaskCall.code());
        assert_eq!(env.get_str(Property::Name, Some(call)).as_deref(), Some("$hello"));
        assert_eq!(env.handle(ObjectType::Scope, Some(call)), Some(top));
    }

    #[test]
    #[should_panic(expected = "reference must be null")]
    fn test_systf_with_reference_is_fatal() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        env.handle(ObjectType::SysTfCall, Some(top));
    }

    #[test]
    #[should_panic(expected = "reference handle required")]
    fn test_null_reference_is_fatal() {
        let mut env = running_env();
        env.handle(ObjectType::Scope, None);
    }

    #[test]
    fn test_memory_index() {
        let mut env = running_env();
        let top = env.add_root_module("top", "top", 0, 0);
        let mem = env.add_memory(top, "mem", 7, 0, 0, 3);
        let w2 = env.handle_by_index(mem, 2).unwrap();
        assert_eq!(env.get_str(Property::Name, Some(w2)).as_deref(), Some("mem[2]"));
        assert_eq!(env.get_str(Property::FullName, Some(w2)).as_deref(), Some("top.mem[2]"));
        assert_eq!(env.get(Property::Size, Some(w2)), 8);
        assert_eq!(env.handle(ObjectType::Memory, Some(w2)), Some(mem));
        assert_eq!(env.handle_by_index(mem, 4), None);
        assert_eq!(env.handle_by_index(mem, -1), None);
        assert_eq!(env.handle_by_index(top, 0), None);

        let words = env.iterate(ObjectType::MemoryWord, Some(mem));
        assert_eq!(drain(&mut env, words).len(), 4);
    }
}
