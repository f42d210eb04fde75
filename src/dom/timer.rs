// setTimeout wrapper for controller follow-ups.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::error::{ControllerError, Result};

/// Run `f` once after `delay_ms`. The timer is never cancelled; callers drop
/// stale work themselves.
pub fn set_timeout(delay_ms: u32, f: impl FnOnce() + 'static) -> Result<i32> {
    let win = window().ok_or_else(|| ControllerError::Dom("no window".into()))?;
    let callback = Closure::once_into_js(f);
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms as i32,
    )
    .map_err(ControllerError::from)
}
