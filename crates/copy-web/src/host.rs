//! Capabilities the copy controller borrows from its host page.
//!
//! The browser implementations live in `crate::web`; unit tests use an
//! in-memory host. Everything here is single-threaded: handlers and tasks are
//! `'static` but not `Send`.

use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::error::ClipboardError;

/// Read/write access to the document tree.
pub trait Dom {
    type Node: Clone + 'static;

    /// All elements under `root` (excluding `root` itself) carrying `class`, in document order.
    fn elements_with_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

    /// Element with the given `id` attribute in the same document as `node`.
    fn element_by_id(&self, node: &Self::Node, id: &str) -> Option<Self::Node>;

    fn previous_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Rendered text, as a user would select it.
    fn rendered_text(&self, node: &Self::Node) -> String;

    fn inner_html(&self, node: &Self::Node) -> String;

    fn set_inner_html(&self, node: &Self::Node, html: &str);

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Attach a click listener that lives as long as the node.
    fn on_click(&self, node: &Self::Node, handler: Box<dyn FnMut()>);
}

/// Asynchronous text clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ClipboardError>>;
}

/// One-shot timers and local task spawning on the page's event loop.
pub trait Scheduler {
    /// Dropping the handle cancels the timer if it has not fired yet.
    type Handle: 'static;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
