//! # VPI Environment
//!
//! All state the runtime keeps between boundary calls lives in one
//! [`VpiEnv`], passed as `&mut` into every entry point:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          VpiEnv                            │
//! ├────────────────────────────────────────────────────────────┤
//! │  objects       ObjectArena     scopes, signals, iterators  │
//! │  strings       StringInterner  object names                │
//! │  trace         TraceSink       VPI_TRACE destination       │
//! │  errors        ErrorState      last reported error         │
//! │  mode          PiMode          registration / compile / run│
//! │  current_task  Option<id>      running system task call    │
//! │  precision     i32             global time precision       │
//! │  kernel        dyn SimKernel   time, events, stop/finish   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `add_*` methods build the design the runtime exposes. They stand in
//! for elaboration and are not traced.

use std::fmt;
use std::io::Write;

use crate::config::VpiConfig;
use crate::error::{ConfigError, ErrorInfo, ErrorState};
use crate::object::{
    HandleId, KindContext, MemoryObj, MemoryWordObj, Object, ObjectArena, ScopeKind, ScopeObj,
    SignalKind, SignalObj, TaskCallKind, TaskCallObj,
};
use crate::trace::{TraceSink, vpi_trace};
use crate::utils::StringInterner;
use crate::vector4::{Bit4, Vector4};
use crate::vpi_callback::SimKernel;
use crate::vpi_user::{ErrorLevel, ErrorPhase};

pub const DEFAULT_PRODUCT: &str = "vpicore";

/// Which phase of the callback protocol the runtime is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PiMode {
    /// Nothing registered yet. Iteration is a contract violation here.
    #[default]
    Uninitialized,
    /// Startup routines are registering callbacks; the design is not ready.
    Registration,
    CompileTf,
    Run,
}

/// Startup metadata registered by the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VlogInfo {
    pub product: String,
    pub version: String,
    pub argv: Vec<String>,
}

pub struct VpiEnv {
    pub(crate) objects: ObjectArena,
    pub(crate) strings: StringInterner,
    pub(crate) trace: TraceSink,
    pub(crate) errors: ErrorState,
    pub(crate) mode: PiMode,
    pub(crate) current_task: Option<HandleId>,
    pub(crate) precision: i32,
    pub(crate) roots: Vec<HandleId>,
    pub(crate) kernel: Box<dyn SimKernel>,
    vlog_info: Option<VlogInfo>,
}

impl fmt::Debug for VpiEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VpiEnv")
            .field("objects", &self.objects.live_count())
            .field("roots", &self.roots)
            .field("mode", &self.mode)
            .field("precision", &self.precision)
            .field("error_pending", &self.errors.is_set())
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

impl Drop for VpiEnv {
    fn drop(&mut self) {
        log::debug!("VpiEnv::drop()");
        self.trace.flush();
    }
}

impl VpiEnv {
    /// Builds an environment from `config`, opening the trace destination if
    /// one is configured.
    pub fn new(config: VpiConfig, kernel: Box<dyn SimKernel>) -> Result<Self, ConfigError> {
        let trace = match config.trace.as_deref() {
            Some(dest) => TraceSink::open(dest)?,
            None => TraceSink::disabled(),
        };
        Ok(Self::with_trace_sink(config, kernel, trace))
    }

    pub fn with_trace_sink(
        config: VpiConfig,
        kernel: Box<dyn SimKernel>,
        trace: TraceSink,
    ) -> Self {
        log::debug!("VpiEnv::new() {:?}", config);
        Self {
            objects: ObjectArena::new(),
            strings: StringInterner::with_chunk_size(config.string_chunk_size),
            trace,
            errors: ErrorState::new(config.error_policy),
            mode: PiMode::Uninitialized,
            current_task: None,
            precision: 0,
            roots: Vec::new(),
            kernel,
            vlog_info: None,
        }
    }

    /// Default configuration, tracing disabled.
    pub fn with_kernel(kernel: impl SimKernel + 'static) -> Self {
        Self::with_trace_sink(VpiConfig::default(), Box::new(kernel), TraceSink::disabled())
    }

    /// Reads the configuration from the process environment. An unusable
    /// `VPI_TRACE` destination terminates the process with status 1.
    pub fn from_env(kernel: impl SimKernel + 'static) -> Self {
        match Self::new(VpiConfig::from_env(), Box::new(kernel)) {
            Ok(env) => env,
            Err(e) => {
                log::error!("{e}");
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    #[inline]
    pub(crate) fn kind_context(&self) -> KindContext<'_> {
        KindContext {
            objects: &self.objects,
            strings: &self.strings,
            precision: self.precision,
        }
    }

    /// Looks up a live object. A stale or foreign id is a contract violation.
    #[inline]
    pub(crate) fn object(&self, id: HandleId) -> &Object {
        match self.objects.get(id) {
            Some(obj) => obj,
            None => crate::contract_violation!("{} is not a live handle", id),
        }
    }

    #[inline]
    pub(crate) fn object_mut(&mut self, id: HandleId) -> &mut Object {
        match self.objects.get_mut(id) {
            Some(obj) => obj,
            None => crate::contract_violation!("{} is not a live handle", id),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.strings
    }

    pub fn live_objects(&self) -> usize {
        self.objects.live_count()
    }

    pub fn mode(&self) -> PiMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PiMode) {
        log::debug!("[VpiEnv] mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    pub fn precision(&self) -> i32 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision;
    }

    /// The system task call whose callback is running, if any.
    pub fn set_current_task(&mut self, task: Option<HandleId>) {
        self.current_task = task;
    }

    // ------------------------------------------------------------------
    // Startup metadata
    // ------------------------------------------------------------------
    pub fn register_vlog_info(
        &mut self,
        product: impl Into<String>,
        version: impl Into<String>,
        argv: Vec<String>,
    ) {
        let info = VlogInfo {
            product: product.into(),
            version: version.into(),
            argv,
        };
        log::info!("[VpiEnv] {} {} argv={:?}", info.product, info.version, info.argv);
        self.vlog_info = Some(info);
    }

    pub fn get_vlog_info(&mut self) -> Option<VlogInfo> {
        let info = self.vlog_info.clone();
        vpi_trace!(
            self.trace,
            "vpi_get_vlog_info() --> {}",
            if info.is_some() { 1 } else { 0 }
        );
        info
    }

    // ------------------------------------------------------------------
    // Error slot
    // ------------------------------------------------------------------
    /// Error phase matching the current mode.
    pub fn error_phase(&self) -> ErrorPhase {
        match self.mode {
            PiMode::Uninitialized | PiMode::Registration => ErrorPhase::Pli,
            PiMode::CompileTf => ErrorPhase::Compile,
            PiMode::Run => ErrorPhase::Run,
        }
    }

    pub(crate) fn report_error(&mut self, level: ErrorLevel, code: &str, message: impl Into<String>) {
        let phase = self.error_phase();
        let message = message.into();
        log::debug!("[VpiEnv] error recorded: {code}: {message}");

        // Errors raised while a system task runs carry its source location.
        let site = self.current_task.and_then(|id| match self.objects.get(id) {
            Some(Object::TaskCall(call)) => call
                .file
                .map(|f| (self.strings.resolve(f).to_string(), call.lineno)),
            _ => None,
        });
        match site {
            Some((file, line)) => self.errors.report_at(level, phase, code, message, file, line),
            None => self.errors.report(level, phase, code, message),
        }
    }

    /// The last recorded error, stamped with the registered product name.
    pub fn chk_error(&mut self) -> Option<ErrorInfo> {
        let product = self
            .vlog_info
            .as_ref()
            .map_or(DEFAULT_PRODUCT, |i| i.product.as_str())
            .to_string();
        let info = self.errors.query(&product);
        vpi_trace!(
            self.trace,
            "vpi_chk_error() --> {}",
            match &info {
                Some(i) => i32::from(i.level),
                None => 0,
            }
        );
        info
    }

    pub fn clear_error(&mut self) {
        self.errors.clear();
    }

    /// User output: written to stdout and mirrored into the trace.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) -> usize {
        let text = args.to_string();
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(text.as_bytes()) {
            log::warn!("[printf] {e}");
            return 0;
        }
        if let Err(e) = stdout.flush() {
            log::warn!("[printf] flush failed: {e}");
        }
        vpi_trace!(self.trace, "vpi_printf: {}", text.trim_end_matches('\n'));
        text.len()
    }

    // ------------------------------------------------------------------
    // Design construction
    // ------------------------------------------------------------------
    fn attach(&mut self, scope: HandleId, member: HandleId) {
        match self.objects.scope_mut(scope) {
            Some(s) => s.members.push(member),
            None => crate::contract_violation!("{} is not a scope", scope),
        }
    }

    fn scope_timing(&self, scope: HandleId) -> (i32, i32) {
        match self.objects.scope(scope) {
            Some(s) => (s.time_units, s.time_precision),
            None => crate::contract_violation!("{} is not a scope", scope),
        }
    }

    /// Adds a top-level module. The first root sets the global precision;
    /// later roots lower it if theirs is finer.
    pub fn add_root_module(
        &mut self,
        name: &str,
        def_name: &str,
        time_units: i32,
        time_precision: i32,
    ) -> HandleId {
        let mut scope = ScopeObj::new(
            ScopeKind::Module,
            self.strings.intern_name(name),
            None,
            time_units,
            time_precision,
        );
        scope.def_name = Some(self.strings.intern_name(def_name));

        let id = self.objects.insert(Object::Scope(scope));
        self.precision = if self.roots.is_empty() {
            time_precision
        } else {
            self.precision.min(time_precision)
        };
        self.roots.push(id);
        id
    }

    /// Adds a nested scope. It inherits the parent's time units and precision.
    pub fn add_scope(&mut self, parent: HandleId, kind: ScopeKind, name: &str) -> HandleId {
        let (units, precision) = self.scope_timing(parent);
        let name = self.strings.intern_name(name);
        let scope = ScopeObj::new(kind, name, Some(parent), units, precision);
        let id = self.objects.insert(Object::Scope(scope));
        self.attach(parent, id);
        id
    }

    pub fn add_module(&mut self, parent: HandleId, name: &str, def_name: &str) -> HandleId {
        let id = self.add_scope(parent, ScopeKind::Module, name);
        let def = self.strings.intern_name(def_name);
        if let Some(s) = self.objects.scope_mut(id) {
            s.def_name = Some(def);
        }
        id
    }

    fn add_signal(&mut self, scope: HandleId, sig: SignalObj) -> HandleId {
        let id = self.objects.insert(Object::Signal(sig));
        self.attach(scope, id);
        id
    }

    pub fn add_net(
        &mut self,
        scope: HandleId,
        name: &str,
        msb: i32,
        lsb: i32,
        signed: bool,
    ) -> HandleId {
        let name = self.strings.intern_name(name);
        let sig = SignalObj::new(SignalKind::Net, name, scope, msb, lsb, signed);
        self.add_signal(scope, sig)
    }

    pub fn add_reg(
        &mut self,
        scope: HandleId,
        name: &str,
        msb: i32,
        lsb: i32,
        signed: bool,
    ) -> HandleId {
        let name = self.strings.intern_name(name);
        let sig = SignalObj::new(SignalKind::Reg, name, scope, msb, lsb, signed);
        self.add_signal(scope, sig)
    }

    /// `integer name;`: a signed 32-bit register flagged as an integer variable.
    pub fn add_integer(&mut self, scope: HandleId, name: &str) -> HandleId {
        let name = self.strings.intern_name(name);
        let mut sig = SignalObj::new(SignalKind::Reg, name, scope, 31, 0, true);
        sig.is_int = true;
        self.add_signal(scope, sig)
    }

    /// `reg [word_msb:word_lsb] name [first:last];`. Words start as X and are
    /// named `name[<address>]`.
    pub fn add_memory(
        &mut self,
        scope: HandleId,
        name: &str,
        word_msb: i32,
        word_lsb: i32,
        first: i32,
        last: i32,
    ) -> HandleId {
        let mem = MemoryObj {
            name: self.strings.intern_name(name),
            scope,
            first,
            last,
            words: Vec::new(),
        };
        let addresses = mem.addresses();
        let mem_id = self.objects.insert(Object::Memory(mem));

        let width = word_msb.abs_diff(word_lsb) as usize + 1;
        let mut words = Vec::with_capacity(addresses.len());
        for address in addresses {
            let word = MemoryWordObj {
                name: self.strings.intern_name(&format!("{}[{}]", name, address)),
                memory: mem_id,
                scope,
                address,
                bits: Vector4::new(width, Bit4::X),
            };
            words.push(self.objects.insert(Object::MemoryWord(word)));
        }
        if let Some(m) = self.objects.memory_mut(mem_id) {
            m.words = words;
        }

        self.attach(scope, mem_id);
        mem_id
    }

    /// A system task or function call site. Call sites are not scope members.
    pub fn add_sys_task_call(
        &mut self,
        scope: HandleId,
        kind: TaskCallKind,
        name: &str,
        args: Vec<HandleId>,
        lineno: u32,
    ) -> HandleId {
        if self.objects.scope(scope).is_none() {
            crate::contract_violation!("{} is not a scope", scope);
        }
        let call = TaskCallObj {
            kind,
            name: self.strings.intern_name(name),
            scope,
            args,
            file: None,
            lineno,
        };
        self.objects.insert(Object::TaskCall(call))
    }

    /// Source file of a call site, answered by `vpi_get_str(vpiFile)`.
    pub fn set_call_site_file(&mut self, call: HandleId, file: &str) {
        let file = self.strings.intern_name(file);
        match self.objects.get_mut(call) {
            Some(Object::TaskCall(c)) => c.file = Some(file),
            _ => crate::contract_violation!("{} is not a system task call", call),
        }
    }
}
