use super::kind::{Iterable, KindContext, Navigable, PropertySource};
use super::{HandleId, Object};
use crate::utils::Symbol;
use crate::vpi_user::{ObjectType, Property};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Task,
    Function,
    NamedBegin,
    NamedFork,
    /// Generate blocks and other unnamed-kind scopes.
    Generic,
}

impl ScopeKind {
    pub fn type_code(self) -> ObjectType {
        match self {
            ScopeKind::Module => ObjectType::Module,
            ScopeKind::Task => ObjectType::Task,
            ScopeKind::Function => ObjectType::Function,
            ScopeKind::NamedBegin => ObjectType::NamedBegin,
            ScopeKind::NamedFork => ObjectType::NamedFork,
            ScopeKind::Generic => ObjectType::Scope,
        }
    }
}

#[derive(Debug)]
pub struct ScopeObj {
    pub kind: ScopeKind,
    pub name: Symbol,
    /// Definition (module type) name. Only modules carry one.
    pub def_name: Option<Symbol>,
    pub parent: Option<HandleId>,
    pub members: Vec<HandleId>,
    pub time_units: i32,
    pub time_precision: i32,
}

impl ScopeObj {
    pub fn new(
        kind: ScopeKind,
        name: Symbol,
        parent: Option<HandleId>,
        time_units: i32,
        time_precision: i32,
    ) -> Self {
        Self {
            kind,
            name,
            def_name: None,
            parent,
            members: Vec::new(),
            time_units,
            time_precision,
        }
    }
}

impl PropertySource for ScopeObj {
    fn get(&self, prop: Property, _cx: &KindContext<'_>) -> Option<i32> {
        match prop {
            Property::TopModule => Some((self.parent.is_none()) as i32),
            Property::TimeUnit => Some(self.time_units),
            Property::TimePrecision => Some(self.time_precision),
            _ => None,
        }
    }

    fn get_str(&self, prop: Property, self_id: HandleId, cx: &KindContext<'_>) -> Option<String> {
        match prop {
            Property::Name => Some(cx.strings.resolve(self.name).to_string()),
            Property::FullName => cx.full_name(self_id),
            Property::DefName => self.def_name.map(|s| cx.strings.resolve(s).to_string()),
            _ => None,
        }
    }
}

impl Navigable for ScopeObj {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId> {
        match relation {
            ObjectType::Scope => self.parent,
            // The enclosing module, never the scope itself.
            ObjectType::Module => self.parent.and_then(|p| cx.objects.module_of(p)),
            _ => None,
        }
    }
}

impl Iterable for ScopeObj {
    fn related(&self, relation: ObjectType, cx: &KindContext<'_>) -> Vec<HandleId> {
        self.members
            .iter()
            .copied()
            .filter(|id| match cx.objects.get(*id) {
                Some(obj) => member_matches(obj, relation),
                None => false,
            })
            .collect()
    }
}

fn member_matches(obj: &Object, relation: ObjectType) -> bool {
    match relation {
        ObjectType::InternalScope | ObjectType::Scope => matches!(obj, Object::Scope(_)),
        ObjectType::IntegerVar => obj.is_int(),
        other => obj.type_code() == other,
    }
}
