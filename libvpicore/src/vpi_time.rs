//! Ticks, unit-scaled integers and precision-scaled reals.
//!
//! `scaled_real = ticks × 10^(precision − units)`, where `units` belongs to
//! the scope that owns the handle and `precision` is the global resolution.

use std::fmt;

use crate::object::{HandleId, Object, OptHandle};
use crate::trace::vpi_trace;
use crate::utils::pow10;
use crate::vpi_env::VpiEnv;
use crate::vpi_user::TimeType;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeRecord {
    SimTime(u64),
    ScaledReal(f64),
    Suppress,
}

impl TimeRecord {
    pub fn time_type(&self) -> TimeType {
        match self {
            TimeRecord::SimTime(_) => TimeType::SimTime,
            TimeRecord::ScaledReal(_) => TimeType::ScaledRealTime,
            TimeRecord::Suppress => TimeType::SuppressTime,
        }
    }
}

impl fmt::Display for TimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRecord::SimTime(t) => write!(f, "simtime={}", t),
            TimeRecord::ScaledReal(r) => write!(f, "real={}", r),
            TimeRecord::Suppress => write!(f, "<suppress>"),
        }
    }
}

#[inline]
pub fn ticks_to_scaled(ticks: u64, units: i32, precision: i32) -> f64 {
    ticks as f64 * pow10(precision - units)
}

/// Rounds to the nearest tick. Negative times clamp to 0.
#[inline]
pub fn scaled_to_ticks(real: f64, units: i32, precision: i32) -> u64 {
    (real * pow10(units - precision)).round() as u64
}

impl VpiEnv {
    pub fn get_time(&mut self, handle: Option<HandleId>, ty: TimeType) -> TimeRecord {
        let ticks = self.kernel.sim_time();
        let record = match ty {
            TimeType::SimTime => TimeRecord::SimTime(ticks),
            TimeType::ScaledRealTime => {
                let units = self.time_units(handle);
                TimeRecord::ScaledReal(ticks_to_scaled(ticks, units, self.precision))
            }
            TimeType::SuppressTime => {
                crate::contract_violation!("vpi_get_time: vpiSuppressTime cannot be produced")
            }
        };

        vpi_trace!(
            self.trace,
            "vpi_get_time({}, {}) --> {}",
            OptHandle(handle),
            ty.name(),
            record
        );
        record
    }

    /// Like [`VpiEnv::get_time`] for an untyped time-type code.
    pub fn get_time_raw(&mut self, handle: Option<HandleId>, code: i32) -> TimeRecord {
        match TimeType::try_from(code) {
            Ok(ty) => self.get_time(handle, ty),
            Err(_) => crate::contract_violation!("vpi_get_time: unrecognised time type {}", code),
        }
    }

    /// Time units of the scope owning `handle`; the global precision without one.
    pub fn time_units(&self, handle: Option<HandleId>) -> i32 {
        let Some(id) = handle else {
            return self.precision;
        };

        let scope_id = match self.object(id) {
            Object::Scope(_) => id,
            Object::Signal(s) => s.scope,
            Object::TaskCall(t) => t.scope,
            other => crate::contract_violation!(
                "time units requested for a {} handle",
                other.type_code()
            ),
        };

        match self.objects.scope(scope_id) {
            Some(scope) => scope.time_units,
            None => crate::contract_violation!("{} is not owned by a scope", id),
        }
    }

    /// Ticks to wait before a deferred put to `handle` takes effect.
    pub fn delay_ticks(&self, handle: HandleId, when: &TimeRecord) -> u64 {
        match *when {
            TimeRecord::SimTime(ticks) => ticks,
            TimeRecord::ScaledReal(real) => {
                scaled_to_ticks(real, self.time_units(Some(handle)), self.precision)
            }
            TimeRecord::Suppress => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling() {
        // 1ns units, 1ps precision.
        assert!((ticks_to_scaled(1500, -9, -12) - 1.5).abs() < 1e-12);
        assert_eq!(scaled_to_ticks(1.5, -9, -12), 1500);
        assert_eq!(scaled_to_ticks(0.0016, -9, -12), 2);
        assert_eq!(scaled_to_ticks(-3.0, -9, -12), 0);
        assert!((ticks_to_scaled(7, -12, -12) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_record_types() {
        assert_eq!(TimeRecord::SimTime(3).time_type(), TimeType::SimTime);
        assert_eq!(TimeRecord::ScaledReal(0.5).time_type(), TimeType::ScaledRealTime);
        assert_eq!(TimeRecord::Suppress.to_string(), "<suppress>");
    }
}
