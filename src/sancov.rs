use std::{
    cmp::Ordering,
    os::raw::{c_char, c_int},
};

use libc::c_void;
use once_cell::sync::OnceCell;

use crate::feedback::CompareFeedback;

type WeakHookStrncmpFn =
    unsafe extern "C" fn(usize, *const c_char, *const c_char, usize, c_int);
type TraceCmp8Fn = unsafe extern "C" fn(u64, u64);

static STRNCMP_HOOK: OnceCell<Option<WeakHookStrncmpFn>> = OnceCell::new();
static TRACE_CMP8: OnceCell<Option<TraceCmp8Fn>> = OnceCell::new();

/// Looks up `symbol` (NUL-terminated) in everything loaded into the process
fn lookup(symbol: &'static [u8]) -> Option<*mut c_void> {
    debug_assert_eq!(symbol.last(), Some(&0));

    let address = unsafe { libc::dlsym(libc::RTLD_DEFAULT, symbol.as_ptr() as *const c_char) };
    if address.is_null() {
        None
    } else {
        Some(address)
    }
}

fn strncmp_hook() -> Option<WeakHookStrncmpFn> {
    *STRNCMP_HOOK.get_or_init(|| {
        lookup(b"__sanitizer_weak_hook_strncmp\0")
            .map(|address| unsafe { std::mem::transmute::<*mut c_void, WeakHookStrncmpFn>(address) })
    })
}

fn trace_cmp8() -> Option<TraceCmp8Fn> {
    *TRACE_CMP8.get_or_init(|| {
        lookup(b"__sanitizer_cov_trace_cmp8\0")
            .map(|address| unsafe { std::mem::transmute::<*mut c_void, TraceCmp8Fn>(address) })
    })
}

/// Copies `s` into a NUL-terminated buffer
fn terminated(s: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(s.len() + 1);
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);

    buf
}

/// Hands both strings, whole, to a `strncmp` weak hook.
///
/// `n` covers the longer operand and each copy is terminated, so the runtime
/// sees the tail one side has and the other lacks. The site id stands in for
/// the caller pc so the engine keys its tables on the instrumentation site.
fn forward_strings(hook: WeakHookStrncmpFn, id: usize, a: &str, b: &str) {
    let result = match a.as_bytes().cmp(b.as_bytes()) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    let s1 = terminated(a);
    let s2 = terminated(b);

    unsafe {
        hook(
            id,
            s1.as_ptr() as *const c_char,
            s2.as_ptr() as *const c_char,
            a.len().max(b.len()),
            result,
        );
    }
}

/// Feedback channel that forwards into a libFuzzer-compatible runtime
/// (libFuzzer itself, or Fazi) through its SanitizerCoverage entry points.
///
/// The symbols are resolved at runtime on first use, so nothing needs to be
/// linked in. If the runtime isn't loaded the calls do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SanitizerFeedback;

impl SanitizerFeedback {
    pub fn new() -> Self {
        SanitizerFeedback
    }

    /// Whether both entry points were found in the process
    pub fn is_available(&self) -> bool {
        strncmp_hook().is_some() && trace_cmp8().is_some()
    }
}

impl CompareFeedback for SanitizerFeedback {
    fn trace_unequal_strings(&mut self, id: usize, a: &str, b: &str) {
        if let Some(hook) = strncmp_hook() {
            forward_strings(hook, id, a, b);
        }
    }

    fn trace_integer_compare(&mut self, _id: usize, a: i64, b: i64) {
        // trace_cmp8 takes its pc from the return address
        if let Some(trace_cmp8) = trace_cmp8() {
            unsafe { trace_cmp8(a as u64, b as u64) };
        }
    }
}
