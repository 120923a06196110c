//! Browser host: web-sys DOM, the async Clipboard API, gloo timers.

use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::JsValue;
use web_sys::{Document, Element, HtmlElement};

use crate::config::{CONFIG_ATTRIBUTE, CopyConfig, ROOT_ELEMENT_ID};
use crate::controller::CopyController;
use crate::error::ClipboardError;
use crate::host::{Clipboard, Dom, Scheduler};

pub type BrowserController = CopyController<BrowserDom, BrowserClipboard, BrowserScheduler>;

#[derive(Clone, Copy, Default)]
pub struct BrowserDom;

impl Dom for BrowserDom {
    type Node = Element;

    fn elements_with_class(&self, root: &Element, class: &str) -> Vec<Element> {
        let collection = root.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn element_by_id(&self, node: &Element, id: &str) -> Option<Element> {
        node.owner_document()?.get_element_by_id(id)
    }

    fn previous_element_sibling(&self, node: &Element) -> Option<Element> {
        node.previous_element_sibling()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            log::warn!("Failed to set {}: {:?}", name, e);
        }
    }

    fn rendered_text(&self, node: &Element) -> String {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => el.inner_text(),
            None => node.text_content().unwrap_or_default(),
        }
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            log::warn!("Failed to add class {}: {:?}", class, e);
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            log::warn!("Failed to remove class {}: {:?}", class, e);
        }
    }

    fn on_click(&self, node: &Element, handler: Box<dyn FnMut()>) {
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        match node.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()) {
            // Listener stays attached for the page's lifetime.
            Ok(()) => closure.forget(),
            Err(e) => log::warn!("Failed to attach click listener: {:?}", e),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ClipboardError>> {
        let promise = web_sys::window()
            .ok_or_else(|| ClipboardError::Unavailable("no window".into()))
            .and_then(|window| {
                let navigator = window.navigator();
                // `navigator.clipboard` is undefined outside secure contexts.
                let has_clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
                    .map(|v| !v.is_undefined() && !v.is_null())
                    .unwrap_or(false);
                if !has_clipboard {
                    return Err(ClipboardError::Unavailable("navigator.clipboard is not available".into()));
                }
                Ok(navigator.clipboard().write_text(text))
            });

        Box::pin(async move {
            wasm_bindgen_futures::JsFuture::from(promise?)
                .await
                .map(|_| ())
                .map_err(|e| ClipboardError::Rejected(describe_js_error(&e)))
        })
    }
}

fn describe_js_error(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.to_string()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

#[derive(Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Bind copy buttons once the document is parsed: immediately if it already
/// is, otherwise on `DOMContentLoaded`.
pub fn init_on_ready() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document; copy buttons not bound");
        return;
    };

    if document.ready_state() != "loading" {
        init_document(&document);
        return;
    }

    let doc = document.clone();
    let on_ready = Closure::once_into_js(move || init_document(&doc));
    if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
        log::error!("Failed to wait for DOMContentLoaded: {:?}", e);
    }
}

fn init_document(document: &Document) {
    let Some(root) = document
        .get_element_by_id(ROOT_ELEMENT_ID)
        .or_else(|| document.document_element())
    else {
        return;
    };
    let config = CopyConfig::from_attribute(root.get_attribute(CONFIG_ATTRIBUTE).as_deref());

    let controller: BrowserController = CopyController::new(BrowserDom, BrowserClipboard, BrowserScheduler, config);
    let bound = controller.initialize(&root);
    log::info!("Copy buttons ready ({} bound)", bound);
}
