//! # libvpicore - Procedural Interface Runtime Core
//!
//! This library is the object-handle dispatch and value-marshalling layer of a
//! VPI (Verilog Procedural Interface) runtime. Callback code inspects and
//! mutates live simulation state through opaque handles; the simulator's own
//! representations stay behind the kind descriptors.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           vpicore Architecture                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐     ┌──────────────┐     ┌─────────────────────────┐   │
//! │  │  Callback   │────>│  vpi_access  │────>│  object (kind tables)   │   │
//! │  │    code     │<────│  (dispatch)  │<────│ scope/signal/memory/... │   │
//! │  └─────────────┘     └──────────────┘     └─────────────────────────┘   │
//! │                              │                         │                │
//! │         ┌────────────────────┼────────────────────┐    ▼                │
//! │         ▼                    ▼                    ▼   codec             │
//! │  ┌─────────────┐    ┌──────────────┐    ┌───────────────┐               │
//! │  │ name_lookup │    │   vpi_time   │    │ vpi_callback  │               │
//! │  │ (resolver)  │    │ (ticks/real) │    │   (kernel)    │               │
//! │  └─────────────┘    └──────────────┘    └───────────────┘               │
//! │                                                                         │
//! │                   ┌──────────────────────────────┐                      │
//! │                   │ VpiEnv: interner, trace,     │                      │
//! │                   │ error slot, mode, precision  │                      │
//! │                   └──────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - `vpi_env`: The environment object every entry point runs against
//! - `vpi_access`: Property, value, navigation, iteration and name lookup
//! - `codec`: 4-state vector to/from every external value format
//! - `vpi_time`: Simulation time in ticks and scaled reals
//! - `vpi_callback`: Kernel interface, deferred puts, simulation control
//! - `object`: Handle arena and the per-kind behavior tables
//! - `utils`: String interner and slot pool
//!

#![allow(non_upper_case_globals)]

pub mod codec;
mod config;
mod error;
pub mod object;
mod trace;
mod utils;
mod value;
mod vector4;
mod vpi_access;
mod vpi_callback;
mod vpi_env;
mod vpi_time;
pub mod vpi_user;

pub use codec::CodecError;
pub use config::VpiConfig;
pub use error::{ConfigError, ErrorClearPolicy, ErrorInfo};
pub use object::{HandleId, ScopeKind, SignalKind, TaskCallKind};
pub use trace::{TraceBuffer, TraceSink};
pub use utils::{StringInterner, Symbol};
pub use value::{Payload, ValueRecord, VecVal};
pub use vector4::{Bit4, BitVector, Vector4};
pub use vpi_access::PutOutcome;
pub use vpi_callback::{ControlCommand, PutValueEvent, ScheduledEvent, SimKernel, TickQueue};
pub use vpi_env::{PiMode, VlogInfo, VpiEnv};
pub use vpi_time::TimeRecord;

/// Logs the message at error level, then panics with it.
///
/// For misuse of the interface by callback code: a null handle where one is
/// required, a value format with no rule, an operation in the wrong mode.
macro_rules! contract_violation {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        log::error!("{}", msg);
        panic!("{}", msg)
    }};
}
pub(crate) use contract_violation;

// Initialize env_logger at static construction time
#[static_init::constructor(0)]
extern "C" fn init_env_logger() {
    let _ = env_logger::try_init();
}
