//! In-memory Dom and Scheduler implementations.
//!
//! These back the CLI preview and the test suite: `HeadlessDom` records every
//! attribute write so dirty-check behavior is observable, and `StepScheduler`
//! advances its tweens one fixed-fps frame per `tick()` so tests control time
//! explicitly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    dom::{AttrSetter, Dom},
    schedule::{CompleteCallback, FrameCallback, Scheduler},
};

/// Handle into a [`HeadlessDom`]. Id 0 is the root container; path elements
/// follow in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementId(usize);

#[derive(Debug, Default)]
struct DomStore {
    attrs: Vec<HashMap<String, String>>,
    writes: Vec<usize>,
}

impl DomStore {
    fn write(&mut self, id: usize, name: &str, value: &str) {
        self.attrs[id].insert(name.to_string(), value.to_string());
        self.writes[id] += 1;
    }
}

#[derive(Debug)]
pub struct HeadlessDom {
    store: Rc<RefCell<DomStore>>,
    svg_selector: String,
    path_selector: String,
    path_count: usize,
    small_viewport: bool,
    coarse_pointer: bool,
    offer_quick_setters: bool,
}

impl HeadlessDom {
    pub fn builder() -> HeadlessDomBuilder {
        HeadlessDomBuilder::default()
    }

    /// Current value of an attribute on the `index`-th path element.
    pub fn path_attr(&self, index: usize, name: &str) -> Option<String> {
        self.store.borrow().attrs[index + 1].get(name).cloned()
    }

    /// Number of attribute writes the `index`-th path element has received.
    pub fn write_count(&self, index: usize) -> usize {
        self.store.borrow().writes[index + 1]
    }

    pub fn total_writes(&self) -> usize {
        self.store.borrow().writes.iter().sum()
    }
}

#[derive(Debug)]
pub struct HeadlessDomBuilder {
    svg_selector: String,
    path_selector: String,
    path_count: usize,
    small_viewport: bool,
    coarse_pointer: bool,
    offer_quick_setters: bool,
}

impl Default for HeadlessDomBuilder {
    fn default() -> Self {
        Self {
            svg_selector: "svg".to_string(),
            path_selector: "path".to_string(),
            path_count: 1,
            small_viewport: false,
            coarse_pointer: false,
            offer_quick_setters: true,
        }
    }
}

impl HeadlessDomBuilder {
    pub fn svg_selector(mut self, selector: impl Into<String>) -> Self {
        self.svg_selector = selector.into();
        self
    }

    pub fn path_selector(mut self, selector: impl Into<String>) -> Self {
        self.path_selector = selector.into();
        self
    }

    pub fn paths(mut self, count: usize) -> Self {
        self.path_count = count;
        self
    }

    pub fn small_viewport(mut self, yes: bool) -> Self {
        self.small_viewport = yes;
        self
    }

    pub fn coarse_pointer(mut self, yes: bool) -> Self {
        self.coarse_pointer = yes;
        self
    }

    /// When off, `quick_setter` returns `None` and the engine falls back to
    /// plain attribute writes.
    pub fn quick_setters(mut self, yes: bool) -> Self {
        self.offer_quick_setters = yes;
        self
    }

    pub fn build(self) -> HeadlessDom {
        let n = self.path_count + 1;
        HeadlessDom {
            store: Rc::new(RefCell::new(DomStore {
                attrs: vec![HashMap::new(); n],
                writes: vec![0; n],
            })),
            svg_selector: self.svg_selector,
            path_selector: self.path_selector,
            path_count: self.path_count,
            small_viewport: self.small_viewport,
            coarse_pointer: self.coarse_pointer,
            offer_quick_setters: self.offer_quick_setters,
        }
    }
}

/// Fast setter bound to one element and attribute name; shares the store
/// with its parent dom, so it stays valid without reacquisition per frame.
#[derive(Debug)]
pub struct HeadlessSetter {
    store: Rc<RefCell<DomStore>>,
    element: usize,
    name: String,
}

impl AttrSetter for HeadlessSetter {
    fn set(&mut self, value: &str) {
        self.store.borrow_mut().write(self.element, &self.name, value);
    }
}

impl Dom for HeadlessDom {
    type Element = ElementId;
    type Setter = HeadlessSetter;

    fn query(&self, selector: &str) -> Option<ElementId> {
        (selector == self.svg_selector).then_some(ElementId(0))
    }

    fn query_all(&self, root: &ElementId, selector: &str) -> Vec<ElementId> {
        if *root != ElementId(0) || selector != self.path_selector {
            return Vec::new();
        }
        (1..=self.path_count).map(ElementId).collect()
    }

    fn set_attr(&mut self, el: &ElementId, name: &str, value: &str) {
        self.store.borrow_mut().write(el.0, name, value);
    }

    fn quick_setter(&mut self, el: &ElementId, name: &str) -> Option<HeadlessSetter> {
        self.offer_quick_setters.then(|| HeadlessSetter {
            store: Rc::clone(&self.store),
            element: el.0,
            name: name.to_string(),
        })
    }

    fn media_matches(&self, query: &str) -> bool {
        query == crate::config::MOBILE_MEDIA && self.small_viewport
    }

    fn coarse_pointer(&self) -> bool {
        self.coarse_pointer
    }
}

struct StepTween {
    on_frame: FrameCallback,
    on_complete: Option<CompleteCallback>,
    duration_secs: f64,
    elapsed: f64,
    active: bool,
}

/// Fixed-timestep scheduler. Each `tick()` advances every active tween by one
/// frame at the configured fps.
pub struct StepScheduler {
    fps: f64,
    tweens: Vec<Option<StepTween>>,
}

impl StepScheduler {
    pub fn new(fps: f64) -> Self {
        Self {
            fps: fps.max(1.0),
            tweens: Vec::new(),
        }
    }

    /// Advances one frame. Returns true while any tween is still active.
    pub fn tick(&mut self) -> bool {
        let dt = 1.0 / self.fps;
        let mut any_active = false;

        for tween in self.tweens.iter_mut().flatten() {
            if !tween.active {
                continue;
            }
            tween.elapsed += dt;
            let progress = if tween.duration_secs <= 0.0 {
                1.0
            } else {
                (tween.elapsed / tween.duration_secs).min(1.0)
            };
            (tween.on_frame)(progress);
            if progress >= 1.0 {
                tween.active = false;
                if let Some(done) = tween.on_complete.take() {
                    done();
                }
            } else {
                any_active = true;
            }
        }

        any_active
    }

    /// Ticks until every tween has finished. Returns the frame count.
    pub fn run_to_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.tick() {
            frames += 1;
            assert!(frames < 1_000_000, "scheduler failed to reach idle");
        }
        frames + 1
    }

    fn tween(&self, id: usize) -> Option<&StepTween> {
        self.tweens.get(id).and_then(Option::as_ref)
    }

    fn tween_mut(&mut self, id: usize) -> Option<&mut StepTween> {
        self.tweens.get_mut(id).and_then(Option::as_mut)
    }
}

impl Scheduler for StepScheduler {
    type TweenId = usize;

    fn create(&mut self, on_frame: FrameCallback) -> usize {
        self.tweens.push(Some(StepTween {
            on_frame,
            on_complete: None,
            duration_secs: 0.0,
            elapsed: 0.0,
            active: false,
        }));
        self.tweens.len() - 1
    }

    fn rearm(&mut self, id: usize, duration_secs: f64) {
        if let Some(tween) = self.tween_mut(id) {
            tween.duration_secs = duration_secs;
            tween.elapsed = 0.0;
            tween.active = false;
            tween.on_complete = None;
        }
    }

    fn play(&mut self, id: usize, on_complete: CompleteCallback) {
        if let Some(tween) = self.tween_mut(id) {
            tween.elapsed = 0.0;
            tween.active = true;
            tween.on_complete = Some(on_complete);
        }
    }

    fn finish(&mut self, id: usize) {
        if let Some(tween) = self.tween_mut(id) {
            tween.elapsed = tween.duration_secs;
            tween.active = false;
            tween.on_complete = None;
            (tween.on_frame)(1.0);
        }
    }

    fn is_active(&self, id: usize) -> bool {
        self.tween(id).is_some_and(|t| t.active)
    }

    fn kill(&mut self, id: usize) {
        if let Some(tween) = self.tween_mut(id) {
            tween.active = false;
            tween.on_complete = None;
        }
    }

    fn remove(&mut self, id: usize) {
        if let Some(slot) = self.tweens.get_mut(id) {
            *slot = None;
        }
    }

    fn duration_secs(&self, id: usize) -> f64 {
        self.tween(id).map_or(0.0, |t| t.duration_secs)
    }
}
