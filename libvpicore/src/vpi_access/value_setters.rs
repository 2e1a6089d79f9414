use std::fmt;

use super::*;
use crate::codec::CodecError;
use crate::vpi_callback::PutValueEvent;
use crate::vpi_time::TimeRecord;

/// What `put_value` did with the write.
#[derive(Clone, Debug, PartialEq)]
pub enum PutOutcome {
    Applied,
    /// Handed to the kernel; runs `delay` ticks from now.
    Scheduled { delay: u64 },
    /// The kind has no put-value. Nothing happened.
    Unsupported,
    /// The value did not encode. The target is unchanged and the error slot set.
    Rejected(CodecError),
}

impl PutOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, PutOutcome::Applied)
    }
}

impl fmt::Display for PutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutOutcome::Applied => write!(f, "applied"),
            PutOutcome::Scheduled { delay } => write!(f, "scheduled +{}", delay),
            PutOutcome::Unsupported => write!(f, "--X"),
            PutOutcome::Rejected(e) => write!(f, "rejected: {}", e),
        }
    }
}

impl VpiEnv {
    /// Writes `record` to `handle`.
    ///
    /// `NoDelay` writes now. Every other flag defers the write by the delay
    /// `when` describes and requires `when`.
    pub fn put_value(
        &mut self,
        handle: HandleId,
        record: &ValueRecord,
        when: Option<&TimeRecord>,
        flag: PutFlag,
    ) -> PutOutcome {
        let outcome = if self.object_mut(handle).value_sink().is_none() {
            PutOutcome::Unsupported
        } else if flag == PutFlag::NoDelay {
            self.put_value_now(handle, record)
        } else {
            let Some(when) = when else {
                crate::contract_violation!(
                    "vpi_put_value({}, {:?}): a delayed put needs a time",
                    handle,
                    flag
                );
            };
            let delay = self.delay_ticks(handle, when);
            self.kernel
                .schedule_generic(Box::new(PutValueEvent::new(handle, record.clone())), delay);
            PutOutcome::Scheduled { delay }
        };

        vpi_trace!(
            self.trace,
            "vpi_put_value({}, {}, {:?}) --> {}",
            handle,
            record,
            flag,
            outcome
        );
        outcome
    }

    /// The kind's immediate put. Used by `NoDelay` writes and by deferred
    /// writes when they come due; never traced on its own.
    pub(crate) fn put_value_now(&mut self, handle: HandleId, record: &ValueRecord) -> PutOutcome {
        let result = match self.object_mut(handle).value_sink() {
            Some(sink) => sink.put_value(record),
            None => return PutOutcome::Unsupported,
        };

        match result {
            Ok(()) => PutOutcome::Applied,
            Err(e) => {
                log::warn!("[put_value] {} rejected {}: {}", handle, record, e);
                self.report_error(ErrorLevel::Error, "vpi_put_value", e.to_string());
                PutOutcome::Rejected(e)
            }
        }
    }

    pub fn put_value_int(&mut self, handle: HandleId, value: i32) -> PutOutcome {
        self.put_value(handle, &ValueRecord::int(value), None, PutFlag::NoDelay)
    }
}

macro_rules! gen_put_value_str {
    ($($suffix:ident),* $(,)?) => {
        // Generate:
        //      put_value_<bin/oct/dec/hex>_str
        paste::paste! {
            impl VpiEnv {
                $(
                    pub fn [<put_value_ $suffix>](&mut self, handle: HandleId, value: &str) -> PutOutcome {
                        self.put_value(handle, &ValueRecord::$suffix(value), None, PutFlag::NoDelay)
                    }
                )*
            }
        }
    };
}

gen_put_value_str!(bin_str, oct_str, dec_str, hex_str);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vpi_callback::TickQueue;

    fn env_with_reg() -> (VpiEnv, HandleId, HandleId) {
        let mut env = VpiEnv::with_kernel(TickQueue::new());
        env.set_mode(PiMode::Run);
        let top = env.add_root_module("top", "top", 0, 0);
        let r = env.add_reg(top, "r", 7, 0, false);
        (env, top, r)
    }

    #[test]
    fn test_immediate_string_puts() {
        let (mut env, _, r) = env_with_reg();
        assert_eq!(env.put_value_hex_str(r, "a5"), PutOutcome::Applied);
        assert_eq!(env.get_value_bin_str(r).as_deref(), Some("10100101"));
        assert!(env.put_value_oct_str(r, "17").is_applied());
        assert_eq!(env.get_value_dec_str(r).as_deref(), Some("15"));
        assert!(env.put_value_bin_str(r, "z").is_applied());
        assert_eq!(env.get_value_hex_str(r).as_deref(), Some("zz"));
        assert!(env.put_value_dec_str(r, "-1").is_applied());
        assert_eq!(env.get_value_hex_str(r).as_deref(), Some("ff"));
    }

    #[test]
    fn test_rejected_put_sets_error() {
        let (mut env, _, r) = env_with_reg();
        env.put_value_int(r, 9);
        let outcome = env.put_value_hex_str(r, "4g");
        assert!(matches!(outcome, PutOutcome::Rejected(CodecError::BadDigit { ch: 'g', .. })));
        assert_eq!(env.get_value_int(r), Some(9));

        let err = env.chk_error().unwrap();
        assert_eq!(err.level, ErrorLevel::Error);
        assert_eq!(err.phase, ErrorPhase::Run);
        assert!(err.message.contains("'g'"));
    }

    #[test]
    fn test_unsupported_put_has_no_effect() {
        let (mut env, top, _) = env_with_reg();
        assert_eq!(env.put_value_int(top, 1), PutOutcome::Unsupported);
        let at = TimeRecord::SimTime(5);
        assert_eq!(
            env.put_value(top, &ValueRecord::int(1), Some(&at), PutFlag::InertialDelay),
            PutOutcome::Unsupported
        );
        assert!(env.chk_error().is_none());
    }

    #[test]
    #[should_panic(expected = "needs a time")]
    fn test_delayed_put_without_time() {
        let (mut env, _, r) = env_with_reg();
        env.put_value(r, &ValueRecord::int(1), None, PutFlag::TransportDelay);
    }

    #[test]
    fn test_suppress_time_schedules_now() {
        let (mut env, _, r) = env_with_reg();
        let outcome = env.put_value(
            r,
            &ValueRecord::int(1),
            Some(&TimeRecord::Suppress),
            PutFlag::InertialDelay,
        );
        assert_eq!(outcome, PutOutcome::Scheduled { delay: 0 });
        // Not applied until the kernel runs it.
        assert_eq!(env.get_value_bin_str(r).as_deref(), Some("xxxxxxxx"));
    }
}
