//! Codes shared with callback code: object types, properties, value formats,
//! put flags, time types, control operations and error levels.
//!
//! Numeric values follow the standard `vpi_user.h` numbering so raw codes
//! coming from foreign callers keep their meaning.

#![allow(non_upper_case_globals)]

use std::borrow::Cow;
use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Property code passed to `get`/`get_str`.
///
/// Kept open (a newtype rather than an enum) because callers may ask for codes
/// this runtime does not know; those must still reach the kind tables and the
/// trace untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Property(pub i32);

impl Property {
    pub const Undefined: Property = Property(-1);
    pub const Type: Property = Property(1);
    pub const Name: Property = Property(2);
    pub const FullName: Property = Property(3);
    pub const Size: Property = Property(4);
    pub const File: Property = Property(5);
    pub const LineNo: Property = Property(6);
    pub const TopModule: Property = Property(7);
    pub const DefName: Property = Property(9);
    pub const TimeUnit: Property = Property(11);
    pub const TimePrecision: Property = Property(12);
    pub const Scalar: Property = Property(17);
    pub const Vector: Property = Property(18);
    pub const ConstType: Property = Property(40);
    pub const Signed: Property = Property(65);
    pub const LeftRange: Property = Property(79);
    pub const RightRange: Property = Property(83);

    /// Returned by `get` when a kind does not answer a property.
    pub const UNDEFINED_VALUE: i32 = -1;

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Property::Undefined => "vpiUndefined",
            Property::Type => "vpiType",
            Property::Name => "vpiName",
            Property::FullName => "vpiFullName",
            Property::Size => "vpiSize",
            Property::File => "vpiFile",
            Property::LineNo => "vpiLineNo",
            Property::TopModule => "vpiTopModule",
            Property::DefName => "vpiDefName",
            Property::TimeUnit => "vpiTimeUnit",
            Property::TimePrecision => "vpiTimePrecision",
            Property::Scalar => "vpiScalar",
            Property::Vector => "vpiVector",
            Property::ConstType => "vpiConstType",
            Property::Signed => "vpiSigned",
            Property::LeftRange => "vpiLeftRange",
            Property::RightRange => "vpiRightRange",
            _ => return None,
        })
    }

    /// Trace rendering: the symbolic name, or the raw number when unnamed.
    pub fn display_name(self) -> Cow<'static, str> {
        match self.name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.0.to_string()),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Object type codes. Also used as relation codes for `handle`/`iterate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ObjectType {
    Constant = 7,
    Function = 20,
    IntegerVar = 25,
    Iterator = 27,
    Memory = 29,
    MemoryWord = 30,
    Module = 32,
    NamedBegin = 33,
    NamedFork = 34,
    Net = 36,
    Parameter = 41,
    RealVar = 47,
    Reg = 48,
    SysFuncCall = 56,
    SysTaskCall = 57,
    Task = 59,
    TimeVar = 63,
    Scope = 84,
    SysTfCall = 85,
    Argument = 89,
    InternalScope = 92,
}

impl ObjectType {
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Constant => "vpiConstant",
            ObjectType::Function => "vpiFunction",
            ObjectType::IntegerVar => "vpiIntegerVar",
            ObjectType::Iterator => "vpiIterator",
            ObjectType::Memory => "vpiMemory",
            ObjectType::MemoryWord => "vpiMemoryWord",
            ObjectType::Module => "vpiModule",
            ObjectType::NamedBegin => "vpiNamedBegin",
            ObjectType::NamedFork => "vpiNamedFork",
            ObjectType::Net => "vpiNet",
            ObjectType::Parameter => "vpiParameter",
            ObjectType::RealVar => "vpiRealVar",
            ObjectType::Reg => "vpiReg",
            ObjectType::SysFuncCall => "vpiSysFuncCall",
            ObjectType::SysTaskCall => "vpiSysTaskCall",
            ObjectType::Task => "vpiTask",
            ObjectType::TimeVar => "vpiTimeVar",
            ObjectType::Scope => "vpiScope",
            ObjectType::SysTfCall => "vpiSysTfCall",
            ObjectType::Argument => "vpiArgument",
            ObjectType::InternalScope => "vpiInternalScope",
        }
    }

    pub fn code(self) -> i32 {
        self.into()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value record format tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ValueFormat {
    BinStr = 1,
    OctStr = 2,
    DecStr = 3,
    HexStr = 4,
    Scalar = 5,
    Int = 6,
    Real = 7,
    String = 8,
    Vector = 9,
    Strength = 10,
    Time = 11,
    ObjType = 12,
    Suppress = 13,
}

impl ValueFormat {
    pub fn name(self) -> &'static str {
        match self {
            ValueFormat::BinStr => "vpiBinStrVal",
            ValueFormat::OctStr => "vpiOctStrVal",
            ValueFormat::DecStr => "vpiDecStrVal",
            ValueFormat::HexStr => "vpiHexStrVal",
            ValueFormat::Scalar => "vpiScalarVal",
            ValueFormat::Int => "vpiIntVal",
            ValueFormat::Real => "vpiRealVal",
            ValueFormat::String => "vpiStringVal",
            ValueFormat::Vector => "vpiVectorVal",
            ValueFormat::Strength => "vpiStrengthVal",
            ValueFormat::Time => "vpiTimeVal",
            ValueFormat::ObjType => "vpiObjTypeVal",
            ValueFormat::Suppress => "vpiSuppressVal",
        }
    }
}

/// Scalar values carried by `ValueFormat::Scalar`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum Scalar {
    Zero = 0,
    One = 1,
    Z = 2,
    X = 3,
}

/// Flags for `put_value`. Anything but `NoDelay` takes the deferred path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum PutFlag {
    NoDelay = 1,
    InertialDelay = 2,
    TransportDelay = 3,
    PureTransportDelay = 4,
    Force = 5,
    Release = 6,
}

/// Time record types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum TimeType {
    ScaledRealTime = 1,
    SimTime = 2,
    SuppressTime = 3,
}

impl TimeType {
    pub fn name(self) -> &'static str {
        match self {
            TimeType::ScaledRealTime => "vpiScaledRealTime",
            TimeType::SimTime => "vpiSimTime",
            TimeType::SuppressTime => "vpiSuppressTime",
        }
    }
}

/// Raw simulation control operation codes.
pub const vpiStop: i32 = 66;
pub const vpiFinish: i32 = 67;

/// Severity of a recorded error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ErrorLevel {
    Notice = 1,
    Warning = 2,
    Error = 3,
    System = 4,
    Internal = 5,
}

/// Phase in which a recorded error was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ErrorPhase {
    Compile = 1,
    Pli = 2,
    Run = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_display_falls_back_to_number() {
        assert_eq!(Property::Size.to_string(), "vpiSize");
        assert_eq!(Property(4242).to_string(), "4242");
    }

    #[test]
    fn test_object_type_codes() {
        assert_eq!(ObjectType::Reg.code(), 48);
        assert_eq!(ObjectType::try_from(32).ok(), Some(ObjectType::Module));
        assert_eq!(ObjectType::try_from(36).ok().map(ObjectType::name), Some("vpiNet"));
        assert!(ObjectType::try_from(1000).is_err());
    }
}
