//! Copy-button controller: binds copy buttons under a root element and runs
//! the copy → success → revert cycle for each click.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::{BOUND_ATTRIBUTE, CopyConfig, TARGET_ATTRIBUTE};
use crate::host::{Clipboard, Dom, Scheduler};

/// Identity assigned to a button when it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No preformatted source block for this button; nothing happened.
    NoSource,
    Copied,
    /// Clipboard write failed and was logged.
    Failed,
}

/// Revert task for one button plus the markup it restores.
struct PendingRevert<H> {
    original_markup: String,
    _timer: H,
}

struct Shared<D: Dom, C, S: Scheduler> {
    dom: D,
    clipboard: C,
    scheduler: S,
    config: CopyConfig,
    pending: RefCell<HashMap<ButtonId, PendingRevert<S::Handle>>>,
    next_id: Cell<usize>,
}

pub struct CopyController<D: Dom, C, S: Scheduler> {
    shared: Rc<Shared<D, C, S>>,
}

impl<D: Dom, C, S: Scheduler> Clone for CopyController<D, C, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<D, C, S> CopyController<D, C, S>
where
    D: Dom + 'static,
    C: Clipboard + 'static,
    S: Scheduler + 'static,
{
    pub fn new(dom: D, clipboard: C, scheduler: S, config: CopyConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                dom,
                clipboard,
                scheduler,
                config,
                pending: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &CopyConfig {
        &self.shared.config
    }

    /// Bind every copy button under `root` that is not bound yet. Returns how
    /// many were newly bound, so running it again over the same tree is a no-op.
    pub fn initialize(&self, root: &D::Node) -> usize {
        let dom = &self.shared.dom;
        let buttons: Vec<_> = dom
            .elements_with_class(root, &self.shared.config.button_class)
            .into_iter()
            .filter(|button| dom.attribute(button, BOUND_ATTRIBUTE).is_none())
            .collect();
        for button in &buttons {
            self.bind(button);
        }
        log::debug!("Bound {} copy button(s)", buttons.len());
        buttons.len()
    }

    /// Attach the click handler to a single button. A button already bound
    /// keeps its listener and id.
    pub fn bind(&self, button: &D::Node) -> ButtonId {
        let dom = &self.shared.dom;
        if let Some(id) = dom
            .attribute(button, BOUND_ATTRIBUTE)
            .and_then(|v| v.parse::<usize>().ok())
        {
            return ButtonId(id);
        }

        let id = ButtonId(self.shared.next_id.get());
        self.shared.next_id.set(id.0 + 1);
        dom.set_attribute(button, BOUND_ATTRIBUTE, &id.0.to_string());

        let controller = self.clone();
        let node = button.clone();
        dom.on_click(
            button,
            Box::new(move || {
                let task_controller = controller.clone();
                let button = node.clone();
                controller.shared.scheduler.spawn(Box::pin(async move {
                    task_controller.click(id, &button).await;
                }));
            }),
        );
        id
    }

    /// Copy the button's source text and flash the success state.
    pub async fn click(&self, id: ButtonId, button: &D::Node) -> ClickOutcome {
        let Some(source) = self.resolve_source(button) else {
            return ClickOutcome::NoSource;
        };
        let text = self.shared.dom.rendered_text(&source);

        match self.shared.clipboard.write_text(&text).await {
            Ok(()) => {
                self.show_success(id, button);
                ClickOutcome::Copied
            }
            Err(e) => {
                log::error!("Failed to copy text: {}", e);
                ClickOutcome::Failed
            }
        }
    }

    /// The explicit target attribute wins; unannotated buttons fall back to
    /// their preceding element sibling. Either way it must be a `source_tag`.
    fn resolve_source(&self, button: &D::Node) -> Option<D::Node> {
        let dom = &self.shared.dom;
        let config = &self.shared.config;

        let target = dom
            .attribute(button, TARGET_ATTRIBUTE)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let source = match target {
            Some(id) => dom.element_by_id(button, &id),
            None => dom.previous_element_sibling(button),
        }?;

        dom.tag_name(&source)
            .eq_ignore_ascii_case(&config.source_tag)
            .then_some(source)
    }

    fn show_success(&self, id: ButtonId, button: &D::Node) {
        let dom = &self.shared.dom;
        let config = &self.shared.config;

        // A revert still in flight already holds the true original markup;
        // dropping it cancels its timer.
        let previous = self.shared.pending.borrow_mut().remove(&id);
        let original_markup = match previous {
            Some(pending) => pending.original_markup,
            None => dom.inner_html(button),
        };

        dom.set_inner_html(button, &config.success_markup);
        dom.add_class(button, &config.success_class);

        let shared = Rc::downgrade(&self.shared);
        let node = button.clone();
        let timer = self.shared.scheduler.schedule(
            config.revert_delay(),
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.revert(id, &node);
                }
            }),
        );

        self.shared.pending.borrow_mut().insert(
            id,
            PendingRevert {
                original_markup,
                _timer: timer,
            },
        );
    }
}

impl<D: Dom, C, S: Scheduler> Shared<D, C, S> {
    fn revert(&self, id: ButtonId, button: &D::Node) {
        let Some(pending) = self.pending.borrow_mut().remove(&id) else {
            return;
        };
        self.dom.set_inner_html(button, &pending.original_markup);
        self.dom.remove_class(button, &self.config.success_class);
    }
}
