// Timed suspension for the sequencer.
// Browser builds resolve a promise through the global setTimeout; tests plug in their own clock.

use std::future::Future;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Source of timed yields.
pub trait Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// `setTimeout`-backed clock for the browser event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        let millis = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let global = js_sys::global();
            let scheduled = js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
                .map(|set_timeout| set_timeout.call2(&global, &resolve, &JsValue::from(millis)).is_ok())
                .unwrap_or(false);
            if !scheduled {
                // No timer available; resolve immediately rather than hang.
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        async move {
            let _ = JsFuture::from(promise).await;
        }
    }
}
