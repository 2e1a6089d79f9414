use super::HandleId;
use super::kind::{
    Indexable, Iterable, KindContext, Navigable, PropertySource, ValueSink, ValueSource,
};
use crate::codec::{self, CodecError};
use crate::utils::Symbol;
use crate::value::ValueRecord;
use crate::vector4::{BitVector, Vector4};
use crate::vpi_user::{ObjectType, Property};

/// A word array. Address `first` is `words[0]`; the range may run downwards.
#[derive(Debug)]
pub struct MemoryObj {
    pub name: Symbol,
    pub scope: HandleId,
    pub first: i32,
    pub last: i32,
    pub words: Vec<HandleId>,
}

impl MemoryObj {
    pub fn word_count(&self) -> usize {
        self.last.abs_diff(self.first) as usize + 1
    }

    /// Every address in declaration order, matching `words`.
    pub fn addresses(&self) -> Vec<i32> {
        let step = if self.first <= self.last { 1 } else { -1 };
        (0..self.word_count() as i32)
            .map(|i| self.first + i * step)
            .collect()
    }
}

impl PropertySource for MemoryObj {
    fn get(&self, prop: Property, _cx: &KindContext<'_>) -> Option<i32> {
        match prop {
            Property::Size => Some(self.word_count() as i32),
            Property::LeftRange => Some(self.first),
            Property::RightRange => Some(self.last),
            _ => None,
        }
    }

    fn get_str(&self, prop: Property, self_id: HandleId, cx: &KindContext<'_>) -> Option<String> {
        match prop {
            Property::Name => Some(cx.strings.resolve(self.name).to_string()),
            Property::FullName => cx.full_name(self_id),
            _ => None,
        }
    }
}

impl Navigable for MemoryObj {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId> {
        match relation {
            ObjectType::Scope => Some(self.scope),
            ObjectType::Module => cx.objects.module_of(self.scope),
            _ => None,
        }
    }
}

impl Indexable for MemoryObj {
    fn handle_by_index(&self, index: i32) -> Option<HandleId> {
        let offset = if self.first <= self.last {
            index.checked_sub(self.first)?
        } else {
            self.first.checked_sub(index)?
        };
        usize::try_from(offset).ok().and_then(|o| self.words.get(o).copied())
    }
}

impl Iterable for MemoryObj {
    fn related(&self, relation: ObjectType, _cx: &KindContext<'_>) -> Vec<HandleId> {
        match relation {
            ObjectType::MemoryWord => self.words.clone(),
            _ => Vec::new(),
        }
    }
}

/// One word of a memory, named `mem[<address>]`.
#[derive(Debug)]
pub struct MemoryWordObj {
    pub name: Symbol,
    pub memory: HandleId,
    pub scope: HandleId,
    pub address: i32,
    pub bits: Vector4,
}

impl PropertySource for MemoryWordObj {
    fn get(&self, prop: Property, _cx: &KindContext<'_>) -> Option<i32> {
        match prop {
            Property::Size => Some(self.bits.size() as i32),
            _ => None,
        }
    }

    fn get_str(&self, prop: Property, self_id: HandleId, cx: &KindContext<'_>) -> Option<String> {
        match prop {
            Property::Name => Some(cx.strings.resolve(self.name).to_string()),
            Property::FullName => cx.full_name(self_id),
            _ => None,
        }
    }
}

impl ValueSource for MemoryWordObj {
    fn get_value(&self, record: &mut ValueRecord) {
        codec::vec4_get_value(&self.bits, self.bits.size(), false, record);
    }
}

impl ValueSink for MemoryWordObj {
    fn put_value(&mut self, record: &ValueRecord) -> Result<(), CodecError> {
        let width = self.bits.size();
        codec::vec4_from_value(record, &mut self.bits, width)
    }
}

impl Navigable for MemoryWordObj {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId> {
        match relation {
            ObjectType::Memory => Some(self.memory),
            ObjectType::Scope => Some(self.scope),
            ObjectType::Module => cx.objects.module_of(self.scope),
            _ => None,
        }
    }
}
