use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::show::{FrameHandle, FrameScheduler};

pub fn window() -> Window {
    web_sys::window().expect("no global window")
}

pub fn document() -> Document {
    window().document().expect("no document")
}

/// Monotonic milliseconds since page load
pub fn now_ms() -> f64 {
    window()
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn html_element(id: &str) -> Option<HtmlElement> {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_opacity(el: &HtmlElement, opacity: &str) {
    el.style().set_property("opacity", opacity).ok();
}

pub fn set_pointer_events(el: &HtmlElement, value: &str) {
    el.style().set_property("pointer-events", value).ok();
}

pub fn hide(el: &HtmlElement) {
    el.class_list().add_1("hidden").ok();
}

/// Unhide and force a reflow so the next opacity change animates
pub fn reveal(el: &HtmlElement) {
    el.class_list().remove_1("hidden").ok();
    let _ = el.offset_width();
}

/// Run `f` once after `ms` milliseconds
pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) {
    let closure = Closure::once(f);
    let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms,
    );
    closure.forget();
}

/// `requestAnimationFrame` scheduler; every frame calls `callback`
pub struct RafScheduler {
    callback: Rc<dyn Fn(f64)>,
}

impl RafScheduler {
    pub fn new(callback: Rc<dyn Fn(f64)>) -> Self {
        Self { callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.clone();
        let closure = Closure::once(move |time: f64| callback(time));
        let id = window()
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
            .ok()?;
        closure.forget();
        Some(FrameHandle(id as u64))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        window().cancel_animation_frame(handle.0 as i32).ok();
    }
}
