use super::HandleId;
use super::kind::{KindContext, Navigable, PropertySource, ValueSink, ValueSource};
use crate::codec::{self, CodecError};
use crate::utils::Symbol;
use crate::value::ValueRecord;
use crate::vector4::{Bit4, Vector4};
use crate::vpi_user::{ObjectType, Property};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Net,
    Reg,
}

impl SignalKind {
    pub fn type_code(self) -> ObjectType {
        match self {
            SignalKind::Net => ObjectType::Net,
            SignalKind::Reg => ObjectType::Reg,
        }
    }
}

/// A net or variable with a `[msb:lsb]` range.
#[derive(Debug)]
pub struct SignalObj {
    pub kind: SignalKind,
    pub name: Symbol,
    pub scope: HandleId,
    pub msb: i32,
    pub lsb: i32,
    pub signed: bool,
    /// Declared `integer`: reports `vpiIntegerVar` instead of `vpiReg`.
    pub is_int: bool,
    pub bits: Vector4,
}

impl SignalObj {
    pub fn new(
        kind: SignalKind,
        name: Symbol,
        scope: HandleId,
        msb: i32,
        lsb: i32,
        signed: bool,
    ) -> Self {
        let width = msb.abs_diff(lsb) as usize + 1;
        // Variables start unknown, undriven nets float.
        let init = match kind {
            SignalKind::Reg => Bit4::X,
            SignalKind::Net => Bit4::Z,
        };
        Self {
            kind,
            name,
            scope,
            msb,
            lsb,
            signed,
            is_int: false,
            bits: Vector4::new(width, init),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.msb.abs_diff(self.lsb) as usize + 1
    }
}

impl PropertySource for SignalObj {
    fn get(&self, prop: Property, _cx: &KindContext<'_>) -> Option<i32> {
        let width = self.width();
        match prop {
            Property::Size => Some(width as i32),
            Property::Signed => Some(self.signed as i32),
            Property::Scalar => Some((width == 1) as i32),
            Property::Vector => Some((width > 1) as i32),
            Property::LeftRange => Some(self.msb),
            Property::RightRange => Some(self.lsb),
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

impl ValueSource for SignalObj {
    fn get_value(&self, record: &mut ValueRecord) {
        codec::vec4_get_value(&self.bits, self.width(), self.signed, record);
    }
}

impl ValueSink for SignalObj {
    fn put_value(&mut self, record: &ValueRecord) -> Result<(), CodecError> {
        let width = self.width();
        codec::vec4_from_value(record, &mut self.bits, width)
    }
}

impl Navigable for SignalObj {
    fn handle(&self, relation: ObjectType, cx: &KindContext<'_>) -> Option<HandleId> {
        match relation {
            ObjectType::Scope => Some(self.scope),
            ObjectType::Module => cx.objects.module_of(self.scope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::StringInterner;
    use crate::vector4::BitVector;

    #[test]
    fn test_width_near_range_limits() {
        let mut strings = StringInterner::new();
        let name = strings.intern_name("edge");
        let scope = HandleId(0);

        let high = SignalObj::new(SignalKind::Reg, name, scope, i32::MAX, i32::MAX - 7, false);
        assert_eq!(high.width(), 8);
        assert_eq!(high.bits.size(), 8);

        let low = SignalObj::new(SignalKind::Net, name, scope, i32::MIN, i32::MIN + 3, false);
        assert_eq!(low.width(), 4);
    }
}
