//! # Handle Dispatch Engine
//!
//! The boundary operations callback code uses, as methods on [`VpiEnv`]. Each
//! one looks up the handle's object, asks its kind descriptor for the needed
//! capability, and turns a missing capability into the documented sentinel:
//!
//! | operation        | missing capability             |
//! |------------------|--------------------------------|
//! | `get`            | `vpiUndefined` (-1)            |
//! | `get_str`        | `None`                         |
//! | `get_value`      | record becomes `vpiSuppressVal`|
//! | `put_value`      | `PutOutcome::Unsupported`      |
//! | `handle`         | `None`                         |
//! | `handle_by_index`| `None`                         |
//! | `iterate`        | `None`                         |
//! | `free_object`    | succeeds                       |
//!
//! With tracing on, every operation writes exactly one line before it
//! returns: operation, handle, decoded property, decoded result.

use crate::object::{HandleId, IteratorObj, Object, OptHandle};
use crate::trace::vpi_trace;
use crate::value::{Payload, ValueRecord};
use crate::vpi_env::{PiMode, VpiEnv};
use crate::vpi_user::*;

mod handle_getters;
mod meta_getters;
mod name_lookup;
mod value_getters;
mod value_setters;

pub use value_setters::PutOutcome;

/// Trace rendering of an optional string result.
fn quoted(value: &Option<String>) -> String {
    match value {
        Some(s) => format!("\"{}\"", s),
        None => "null".to_string(),
    }
}
