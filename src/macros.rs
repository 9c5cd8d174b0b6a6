//! Trace point macros.
//!
//! Thin wrappers over the [`ExecTracer`](crate::ExecTracer) trace points that
//! take the address and source line from the call site, so instrumented code
//! stays one line per trace point.
//!
//! # Usage
//!
//! ```rust,ignore
//! use exec_tracer::{trace_function, trace_function_exit, trace_line, trace_variable};
//!
//! const MODULE_ID: u16 = 3;
//!
//! fn motor_step(tracer: &mut Tracer) {
//!     trace_function!(tracer, motor_step);
//!     trace_line!(tracer, MODULE_ID);
//!     trace_variable!(tracer, STEP_COUNT);
//!     trace_function_exit!(tracer, motor_step);
//! }
//! ```

/// Record entry into the function `$func`.
///
/// `$func` names a function item; its address is encoded relative to the
/// configured flash base.
#[macro_export]
macro_rules! trace_function {
    ($tracer:expr, $func:path) => {
        $tracer.trace_function_entry($func as usize)
    };
}

/// Record exit from the function `$func`.
#[macro_export]
macro_rules! trace_function_exit {
    ($tracer:expr, $func:path) => {
        $tracer.trace_function_exit($func as usize)
    };
}

/// Record the current source line under the given module identifier.
///
/// Module ids are 12 bits and lines 16 bits; larger values are truncated.
#[macro_export]
macro_rules! trace_line {
    ($tracer:expr, $module_id:expr) => {
        $tracer.trace_line($module_id, line!())
    };
}

/// Record the address and current value of an integer variable.
///
/// The value is converted with `as u32`, so wider integers lose their upper
/// bits.
#[macro_export]
macro_rules! trace_variable {
    ($tracer:expr, $place:expr) => {{
        let value_ref = &$place;
        $tracer.trace_variable(value_ref as *const _ as usize, *value_ref as u32)
    }};
}

/// Record the address and current contents of a 32-bit peripheral register.
///
/// The register is read with `read_volatile`, so the macro must be invoked
/// inside an `unsafe` block with a pointer that is valid to read.
#[macro_export]
macro_rules! trace_sfr {
    ($tracer:expr, $register:expr) => {{
        let register: *const u32 = $register;
        $tracer.trace_sfr(register as usize, ::core::ptr::read_volatile(register))
    }};
}

/// Declare the firmware's trace store as a `#[no_mangle]` static.
///
/// With the `noinit` feature the store lands in the `.noinit` section, which
/// the linker script must keep out of the startup zeroing so the store
/// survives a warm reset.
///
/// ```rust,ignore
/// exec_tracer::trace_store!(pub EXEC_TRACE: 512);
///
/// let store = unsafe { &mut *core::ptr::addr_of_mut!(EXEC_TRACE) };
/// ```
#[cfg(feature = "noinit")]
#[macro_export]
macro_rules! trace_store {
    ($vis:vis $name:ident : $len:expr) => {
        $crate::trace_store!($vis $name: $len, $crate::DefaultPolicy);
    };
    ($vis:vis $name:ident : $len:expr, $policy:ty) => {
        #[no_mangle]
        #[link_section = ".noinit"]
        $vis static mut $name: $crate::TraceStore<{ $len }, $policy> = $crate::TraceStore::new();
    };
}

/// Declare the firmware's trace store as a `#[no_mangle]` static.
///
/// Without the `noinit` feature the store lives in ordinary zero-initialized
/// memory and every boot is a cold start.
#[cfg(not(feature = "noinit"))]
#[macro_export]
macro_rules! trace_store {
    ($vis:vis $name:ident : $len:expr) => {
        $crate::trace_store!($vis $name: $len, $crate::DefaultPolicy);
    };
    ($vis:vis $name:ident : $len:expr, $policy:ty) => {
        #[no_mangle]
        $vis static mut $name: $crate::TraceStore<{ $len }, $policy> = $crate::TraceStore::new();
    };
}
