//! # Kernel Interface and Scheduled Mutation
//!
//! The runtime does not own simulated time. Everything time related goes
//! through a [`SimKernel`]: reading the current tick, handing over one-shot
//! events, and requesting stop/finish.
//!
//! ## Deferred put flow
//!
//! ```text
//!   put_value(h, rec, Some(time), InertialDelay)
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │ delay_ticks  │  scaled real → round(real × 10^(units − precision))
//!   └──────────────┘
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │ PutValueEvent│  owns `h` and a copy of `rec`
//!   └──────────────┘
//!          │  kernel.schedule_generic(event, delay)
//!          ▼
//!   ┌──────────────┐
//!   │  SimKernel   │  runs the event once, at or after now + delay
//!   └──────────────┘
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │ put_value_now│  kind's immediate put; never the delay path again
//!   └──────────────┘
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::object::HandleId;
use crate::trace::vpi_trace;
use crate::value::ValueRecord;
use crate::vpi_env::VpiEnv;
use crate::vpi_user::{vpiFinish, vpiStop};

/// A one-shot action the kernel runs at a future tick and then drops.
pub trait ScheduledEvent {
    fn run(self: Box<Self>, env: &mut VpiEnv);

    fn describe(&self) -> String {
        "event".to_string()
    }
}

/// The services consumed from the event-scheduling kernel.
pub trait SimKernel {
    fn sim_time(&self) -> u64;
    fn schedule_generic(&mut self, event: Box<dyn ScheduledEvent>, delay: u64);
    fn schedule_stop(&mut self, diag: i32);
    fn schedule_finish(&mut self, diag: i32);
}

/// Lets the caller keep a handle on the kernel it gave to the environment.
impl<K: SimKernel> SimKernel for Rc<RefCell<K>> {
    fn sim_time(&self) -> u64 {
        self.borrow().sim_time()
    }

    fn schedule_generic(&mut self, event: Box<dyn ScheduledEvent>, delay: u64) {
        self.borrow_mut().schedule_generic(event, delay)
    }

    fn schedule_stop(&mut self, diag: i32) {
        self.borrow_mut().schedule_stop(diag)
    }

    fn schedule_finish(&mut self, diag: i32) {
        self.borrow_mut().schedule_finish(diag)
    }
}

/// Deferred write: applies `record` to `target` through the immediate path.
#[derive(Debug)]
pub struct PutValueEvent {
    target: HandleId,
    record: ValueRecord,
}

impl PutValueEvent {
    pub fn new(target: HandleId, record: ValueRecord) -> Self {
        Self { target, record }
    }
}

impl ScheduledEvent for PutValueEvent {
    fn run(self: Box<Self>, env: &mut VpiEnv) {
        #[cfg(feature = "debug")]
        log::debug!("[PutValueEvent] {} <= {}", self.target, self.record);

        env.put_value_now(self.target, &self.record);
    }

    fn describe(&self) -> String {
        format!("put {} <= {}", self.target, self.record)
    }
}

/// Simulation control requests, each carrying its diagnostic level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Stop { diag: i32 },
    Finish { diag: i32 },
}

impl ControlCommand {
    pub fn from_raw(op: i32, diag: i32) -> Option<Self> {
        match op {
            vpiStop => Some(ControlCommand::Stop { diag }),
            vpiFinish => Some(ControlCommand::Finish { diag }),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ControlCommand::Stop { .. } => vpiStop,
            ControlCommand::Finish { .. } => vpiFinish,
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCommand::Stop { diag } => write!(f, "vpiStop, {}", diag),
            ControlCommand::Finish { diag } => write!(f, "vpiFinish, {}", diag),
        }
    }
}

impl VpiEnv {
    pub fn sim_control(&mut self, cmd: ControlCommand) {
        log::info!("[sim_control] {} at tick {}", cmd, self.kernel.sim_time());
        match cmd {
            ControlCommand::Stop { diag } => self.kernel.schedule_stop(diag),
            ControlCommand::Finish { diag } => self.kernel.schedule_finish(diag),
        }
        vpi_trace!(self.trace, "vpi_control({})", cmd);
    }

    /// Raw operation codes: only `vpiStop` and `vpiFinish` are accepted.
    pub fn sim_control_raw(&mut self, op: i32, diag: i32) {
        match ControlCommand::from_raw(op, diag) {
            Some(cmd) => self.sim_control(cmd),
            None => crate::contract_violation!("vpi_control: unsupported operation {}", op),
        }
    }
}

/// Reference kernel: a tick-ordered queue of one-shot events.
///
/// Events due at the same tick run in the order they were scheduled, including
/// events scheduled with zero delay by an event that is already running.
#[derive(Default)]
pub struct TickQueue {
    now: u64,
    pending: BTreeMap<u64, VecDeque<Box<dyn ScheduledEvent>>>,
    control: Vec<(u64, ControlCommand)>,
    finished: bool,
}

impl fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickQueue")
            .field("now", &self.now)
            .field("pending", &self.pending_events())
            .field("control", &self.control)
            .field("finished", &self.finished)
            .finish()
    }
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending_events(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }

    /// Stop/finish requests in the order received, with the tick they arrived at.
    pub fn control_log(&self) -> &[(u64, ControlCommand)] {
        &self.control
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn pop_due(&mut self, limit: u64) -> Option<Box<dyn ScheduledEvent>> {
        let mut entry = self.pending.first_entry()?;
        let tick = *entry.key();
        if tick > limit {
            return None;
        }

        let event = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        self.now = tick;
        event
    }

    /// Run every event due up to and including `tick`, then move time to
    /// `tick`. Returns the number of events run. A finish request halts the
    /// queue where it is.
    pub fn run_until(queue: &Rc<RefCell<Self>>, env: &mut VpiEnv, tick: u64) -> usize {
        let mut count = 0;
        loop {
            // The borrow must end before the event runs: it may schedule more.
            let event = {
                let mut q = queue.borrow_mut();
                if q.finished {
                    return count;
                }
                q.pop_due(tick)
            };

            match event {
                Some(event) => {
                    log::trace!("[TickQueue] run {}", event.describe());
                    event.run(env);
                    count += 1;
                }
                None => break,
            }
        }

        let mut q = queue.borrow_mut();
        if !q.finished {
            q.now = q.now.max(tick);
        }
        count
    }

    pub fn advance(queue: &Rc<RefCell<Self>>, env: &mut VpiEnv, ticks: u64) -> usize {
        let target = queue.borrow().now.saturating_add(ticks);
        Self::run_until(queue, env, target)
    }
}

impl SimKernel for TickQueue {
    fn sim_time(&self) -> u64 {
        self.now
    }

    fn schedule_generic(&mut self, event: Box<dyn ScheduledEvent>, delay: u64) {
        self.pending
            .entry(self.now.saturating_add(delay))
            .or_default()
            .push_back(event);
    }

    fn schedule_stop(&mut self, diag: i32) {
        self.control.push((self.now, ControlCommand::Stop { diag }));
    }

    fn schedule_finish(&mut self, diag: i32) {
        self.control.push((self.now, ControlCommand::Finish { diag }));
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mark(Rc<RefCell<Vec<(&'static str, u64)>>>, &'static str, Rc<RefCell<TickQueue>>);

    impl ScheduledEvent for Mark {
        fn run(self: Box<Self>, _env: &mut VpiEnv) {
            let now = self.2.borrow().now();
            self.0.borrow_mut().push((self.1, now));
        }
    }

    #[test]
    fn test_events_run_in_tick_order() {
        let queue = TickQueue::shared();
        let mut env = VpiEnv::with_kernel(queue.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, delay) in [("c", 5), ("a", 1), ("b", 1)] {
            queue
                .borrow_mut()
                .schedule_generic(Box::new(Mark(log.clone(), name, queue.clone())), delay);
        }
        assert_eq!(queue.borrow().pending_events(), 3);

        assert_eq!(TickQueue::run_until(&queue, &mut env, 4), 2);
        assert_eq!(queue.borrow().now(), 4);
        assert_eq!(TickQueue::advance(&queue, &mut env, 10), 1);
        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("c", 5)]);
        assert_eq!(queue.borrow().now(), 14);
    }

    #[test]
    fn test_finish_halts_queue() {
        let queue = TickQueue::shared();
        let mut env = VpiEnv::with_kernel(queue.clone());
        env.sim_control(ControlCommand::Finish { diag: 1 });
        assert!(queue.borrow().is_finished());
        assert_eq!(queue.borrow().control_log(), &[(0, ControlCommand::Finish { diag: 1 })]);
        assert_eq!(TickQueue::advance(&queue, &mut env, 10), 0);
    }

    #[test]
    fn test_raw_control_codes() {
        assert_eq!(
            ControlCommand::from_raw(66, 0),
            Some(ControlCommand::Stop { diag: 0 })
        );
        assert_eq!(ControlCommand::from_raw(67, 2).map(|c| c.code()), Some(67));
        assert_eq!(ControlCommand::from_raw(68, 0), None);
    }

    #[test]
    #[should_panic(expected = "unsupported operation")]
    fn test_raw_control_rejects_unknown() {
        let queue = TickQueue::shared();
        let mut env = VpiEnv::with_kernel(queue);
        env.sim_control_raw(68, 0);
    }
}
