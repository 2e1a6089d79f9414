use super::HandleId;
use super::kind::{Iterable, KindContext, Navigable, PropertySource};
use crate::utils::Symbol;
use crate::vpi_user::{ObjectType, Property};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskCallKind {
    Task,
    Function,
}

impl TaskCallKind {
    pub fn type_code(self) -> ObjectType {
        match self {
            TaskCallKind::Task => ObjectType::SysTaskCall,
            TaskCallKind::Function => ObjectType::SysFuncCall,
        }
    }
}

/// A `$task(...)` call site in the design.
#[derive(Debug)]
pub struct TaskCallObj {
    pub kind: TaskCallKind,
    pub name: Symbol,
    pub scope: HandleId,
    pub args: Vec<HandleId>,
    pub file: Option<Symbol>,
    pub lineno: u32,
}

impl PropertySource for TaskCallObj {
    fn get(&self, prop: Property, _cx: &KindContext<'_>) -> Option<i32> {
        match prop {
            Property::LineNo => Some(self.lineno as i32),
            _ => None,
        }
    }

    fn get_str(&self, prop: Property, _self_id: HandleId, cx: &KindContext<'_>) -> Option<String> {
        match prop {
            Property::Name => Some(cx.strings.resolve(self.name).to_string()),
            Property::File => self.file.map(|f| cx.strings.resolve(f).to_string()),
            _ => None,
        }
    }
}

impl Navigable for TaskCallObj {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId> {
        match relation {
            ObjectType::Scope => Some(self.scope),
            ObjectType::Module => cx.objects.module_of(self.scope),
            _ => None,
        }
    }
}

impl Iterable for TaskCallObj {
    fn related(&self, relation: ObjectType, _cx: &KindContext<'_>) -> Vec<HandleId> {
        match relation {
            ObjectType::Argument => self.args.clone(),
            _ => Vec::new(),
        }
    }
}
