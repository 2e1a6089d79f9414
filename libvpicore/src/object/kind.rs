use super::{HandleId, ObjectArena};
use crate::codec::CodecError;
use crate::utils::StringInterner;
use crate::value::ValueRecord;
use crate::vpi_user::{ObjectType, Property};

/// Read-only view of the environment a kind may consult while answering.
pub struct KindContext<'a> {
    pub objects: &'a ObjectArena,
    pub strings: &'a StringInterner,
    pub precision: i32,
}

impl KindContext<'_> {
    pub fn full_name(&self, id: HandleId) -> Option<String> {
        self.objects.full_name(id, self.strings)
    }
}

/// Integer and string properties. `None` means "not answered here".
pub trait PropertySource {
    fn get(&self, prop: Property, cx: &KindContext<'_>) -> Option<i32>;
    fn get_str(&self, prop: Property, self_id: HandleId, cx: &KindContext<'_>) -> Option<String>;
}

pub trait ValueSource {
    fn get_value(&self, record: &mut ValueRecord);
}

/// Immediate write. A codec error leaves the object unchanged.
pub trait ValueSink {
    fn put_value(&mut self, record: &ValueRecord) -> Result<(), CodecError>;
}

pub trait Navigable {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId>;
}

pub trait Indexable {
    fn handle_by_index(&self, index: i32) -> Option<HandleId>;
}

/// Members related to the object by `relation`, in declaration order.
pub trait Iterable {
    fn related(&self, relation: ObjectType, cx: &KindContext<'_>) -> Vec<HandleId>;
}
