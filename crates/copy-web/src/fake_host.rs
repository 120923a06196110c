//! In-memory host for controller tests: a node arena standing in for the DOM,
//! a recording clipboard, a manual clock and a capturing logger.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::components::COPY_ICON;
use crate::config::CopyConfig;
use crate::controller::CopyController;
use crate::error::ClipboardError;
use crate::host::{Clipboard, Dom, Scheduler};

pub type NodeId = usize;

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct FakeNode {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Listener>,
}

// ── DOM ───────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FakeDom {
    nodes: Rc<RefCell<Vec<FakeNode>>>,
}

impl FakeDom {
    pub fn new() -> Self {
        let body = FakeNode {
            tag: "BODY".into(),
            ..Default::default()
        };
        Self {
            nodes: Rc::new(RefCell::new(vec![body])),
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.len();
        nodes.push(FakeNode {
            tag: tag.to_ascii_uppercase(),
            parent: Some(parent),
            ..Default::default()
        });
        nodes[parent].children.push(id);
        id
    }

    pub fn pre(&self, parent: NodeId, text: &str) -> NodeId {
        let node = self.append(parent, "pre");
        self.set_text(node, text);
        node
    }

    pub fn button(&self, parent: NodeId) -> NodeId {
        let node = self.append(parent, "button");
        self.add_class_name(node, crate::config::DEFAULT_BUTTON_CLASS);
        self.set_html(node, COPY_ICON);
        node
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node].text = text.into();
        nodes[node].html = text.into();
    }

    pub fn set_html(&self, node: NodeId, html: &str) {
        self.nodes.borrow_mut()[node].html = html.into();
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attributes = &mut nodes[node].attributes;
        attributes.retain(|(n, _)| n != name);
        attributes.push((name.into(), value.into()));
    }

    pub fn add_class_name(&self, node: NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes[node].classes.iter().any(|c| c == class) {
            nodes[node].classes.push(class.into());
        }
    }

    pub fn html(&self, node: NodeId) -> String {
        self.nodes.borrow()[node].html.clone()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.borrow()[node].classes.iter().any(|c| c == class)
    }

    /// Fire the node's click listeners.
    pub fn click(&self, node: NodeId) {
        let listeners = self.nodes.borrow()[node].listeners.clone();
        for listener in listeners {
            (listener.borrow_mut())();
        }
    }

    fn descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let children = self.nodes.borrow()[node].children.clone();
        for child in children {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

impl Dom for FakeDom {
    type Node = NodeId;

    fn elements_with_class(&self, root: &NodeId, class: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*root, &mut all);
        all.retain(|n| self.has_class(*n, class));
        all
    }

    fn element_by_id(&self, _node: &NodeId, id: &str) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| n.attributes.iter().any(|(k, v)| k == "id" && v == id))
    }

    fn previous_element_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let siblings = &nodes[nodes[*node].parent?].children;
        let index = siblings.iter().position(|n| n == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[*node]
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        FakeDom::set_attribute(self, *node, name, value);
    }

    fn rendered_text(&self, node: &NodeId) -> String {
        self.nodes.borrow()[*node].text.clone()
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.html(*node)
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.set_html(*node, html);
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.add_class_name(*node, class);
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[*node].classes.retain(|c| c != class);
    }

    fn on_click(&self, node: &NodeId, handler: Box<dyn FnMut()>) {
        self.nodes.borrow_mut()[*node]
            .listeners
            .push(Rc::new(RefCell::new(handler)));
    }
}

// ── Clipboard ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeClipboard {
    writes: Rc<RefCell<Vec<String>>>,
    failure: Rc<RefCell<Option<ClipboardError>>>,
}

impl FakeClipboard {
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn fail_with(&self, error: ClipboardError) {
        *self.failure.borrow_mut() = Some(error);
    }
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), ClipboardError>> {
        self.writes.borrow_mut().push(text.into());
        let result = match self.failure.borrow().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        };
        Box::pin(futures::future::ready(result))
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

struct Timer {
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

/// Cancels its timer on drop.
pub struct TimerHandle(Rc<Cell<bool>>);

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

#[derive(Clone)]
pub struct ManualScheduler {
    now: Rc<Cell<Duration>>,
    timers: Rc<RefCell<Vec<Timer>>>,
    spawner: LocalSpawner,
}

impl ManualScheduler {
    fn new(spawner: LocalSpawner) -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            timers: Rc::new(RefCell::new(Vec::new())),
            spawner,
        }
    }

    /// Timers scheduled and neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        self.timers.borrow().iter().filter(|t| !t.cancelled.get()).count()
    }

    /// Move the clock forward, firing due timers in order.
    fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                timers.retain(|t| !t.cancelled.get());
                let earliest = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                earliest.map(|i| timers.remove(i))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            (timer.task)();
        }
        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = TimerHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay,
            cancelled: Rc::clone(&cancelled),
            task,
        });
        TimerHandle(cancelled)
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(task) {
            panic!("fake executor shut down: {}", e);
        }
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

pub struct Harness {
    pub dom: FakeDom,
    pub clipboard: FakeClipboard,
    pub scheduler: ManualScheduler,
    pub controller: CopyController<FakeDom, FakeClipboard, ManualScheduler>,
    pool: LocalPool,
}

impl Harness {
    pub fn new(config: CopyConfig) -> Self {
        let pool = LocalPool::new();
        let dom = FakeDom::new();
        let clipboard = FakeClipboard::default();
        let scheduler = ManualScheduler::new(pool.spawner());
        let controller = CopyController::new(dom.clone(), clipboard.clone(), scheduler.clone(), config);
        Self {
            dom,
            clipboard,
            scheduler,
            controller,
            pool,
        }
    }

    pub fn init(&self) -> usize {
        self.controller.initialize(&self.dom.root())
    }

    /// Click and let the spawned copy task run to completion.
    pub fn click(&mut self, node: NodeId) {
        self.dom.click(node);
        self.pool.run_until_stalled();
    }

    pub fn advance(&mut self, ms: u64) {
        self.scheduler.advance(Duration::from_millis(ms));
        self.pool.run_until_stalled();
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Install the capturing logger and clear this thread's records.
pub fn capture_logs() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn logged(level: log::Level) -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    })
}
