use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, instrument, warn};

use crate::{
    completion::Completion,
    config::{MorphOptions, ResolvedConfig},
    curve,
    dom::{AttrSetter, Dom},
    eval::PointEvaluator,
    sampler::EaseSampler,
    schedule::Scheduler,
    stagger,
};

/// Per-path write strategy, resolved once at `init()`.
enum WriteStrategy<D: Dom> {
    Quick(D::Setter),
    Plain(D::Element),
}

struct PathState<D: Dom> {
    write: WriteStrategy<D>,
    prev_d: String,
}

/// Mutable render state, owned by the engine and shared with the frame
/// callback. Only the frame callback mutates it while a transition runs.
struct RenderState<D: Dom> {
    paths: Vec<PathState<D>>,
    point_delays: Vec<f64>,
    evaluator: PointEvaluator,
    is_opened: bool,
    points_count: usize,
    delay_paths: f64,
    total_secs: f64,
    render_stride: u32,
    frame_counter: u32,
    scratch_ys: Vec<u32>,
    scratch_d: String,
}

/// The per-frame body: evaluate every point of every path, rebuild the path
/// strings, and write only the ones that changed.
fn render_frame<D: Dom>(state: &mut RenderState<D>, dom: &mut D, progress: f64) {
    if state.paths.is_empty() {
        return;
    }

    // Stride throttling never drops the terminal frame, so rest states and
    // transition endpoints always reach the document.
    if state.render_stride > 1 && progress < 1.0 {
        state.frame_counter = state.frame_counter.wrapping_add(1);
        if state.frame_counter % state.render_stride != 0 {
            return;
        }
    }

    let RenderState {
        paths,
        point_delays,
        evaluator,
        is_opened,
        points_count,
        delay_paths,
        total_secs,
        scratch_ys,
        scratch_d,
        ..
    } = state;

    let path_count = paths.len();
    for (i, path) in paths.iter_mut().enumerate() {
        // Closing proceeds in reverse visual order from opening.
        let order = if *is_opened { i } else { path_count - 1 - i };
        let path_delay = *delay_paths * order as f64;

        scratch_ys.clear();
        for j in 0..*points_count {
            scratch_ys.push(evaluator.eval_y10(progress, *total_secs, point_delays[j], path_delay));
        }

        curve::write_path_d(scratch_d, scratch_ys, *is_opened);
        if *scratch_d != path.prev_d {
            std::mem::swap(&mut path.prev_d, scratch_d);
            match &mut path.write {
                WriteStrategy::Quick(setter) => setter.set(&path.prev_d),
                WriteStrategy::Plain(el) => dom.set_attr(el, "d", &path.prev_d),
            }
        }
    }
}

/// Liquid morph engine for a set of SVG curtain paths.
///
/// The document and the animation scheduler are injected capabilities, shared
/// with the host through `Rc<RefCell<..>>` handles: the host keeps driving its
/// frame loop, the engine only arms and plays a progress tween on it.
///
/// Lifecycle: [`init`](Self::init) discovers targets and renders the resting
/// frame; [`entry`](Self::entry)/[`leave`](Self::leave)/[`toggle`](Self::toggle)
/// run one transition at a time; [`destroy`](Self::destroy) detaches
/// everything and is idempotent. None of these fail: a missing root or an
/// empty selection leaves an inert engine that absorbs every call.
pub struct MorphEngine<D: Dom, S: Scheduler> {
    options: MorphOptions,
    cfg: ResolvedConfig,
    dom: Rc<RefCell<D>>,
    scheduler: Rc<RefCell<S>>,
    state: Rc<RefCell<RenderState<D>>>,
    rng: SmallRng,
    tween: Option<S::TweenId>,
}

impl<D: Dom + 'static, S: Scheduler> MorphEngine<D, S> {
    pub fn new(options: MorphOptions, dom: Rc<RefCell<D>>, scheduler: Rc<RefCell<S>>) -> Self {
        let cfg = ResolvedConfig::resolve(&options, &*dom.borrow());

        let sampler = if cfg.use_lut {
            EaseSampler::with_lut(cfg.ease, cfg.lut_samples)
        } else {
            EaseSampler::direct(cfg.ease)
        };

        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let state = RenderState {
            paths: Vec::new(),
            point_delays: Vec::new(),
            evaluator: PointEvaluator::new(cfg.duration, cfg.snap_step10, sampler),
            is_opened: cfg.is_opened,
            points_count: cfg.points_count,
            delay_paths: cfg.delay_paths,
            total_secs: 0.0,
            render_stride: cfg.render_stride,
            frame_counter: 0,
            scratch_ys: Vec::with_capacity(cfg.points_count),
            scratch_d: String::new(),
        };

        Self {
            options,
            cfg,
            dom,
            scheduler,
            state: Rc::new(RefCell::new(state)),
            rng,
            tween: None,
        }
    }

    /// Discovers the DOM targets and renders the resting frame. Re-running
    /// resets the engine first. Missing targets are reported and leave the
    /// engine inert rather than failing.
    #[instrument(skip(self))]
    pub fn init(&mut self) {
        if self.tween.is_some() {
            self.destroy();
        }

        let elements = {
            let dom = self.dom.borrow();
            let Some(root) = dom.query(&self.options.svg_el) else {
                warn!(selector = %self.options.svg_el, "svg root not found, engine stays inert");
                return;
            };
            dom.query_all(&root, &self.options.path_el)
        };
        if elements.is_empty() {
            warn!(selector = %self.options.path_el, "no path elements matched, engine stays inert");
            return;
        }

        {
            let mut dom = self.dom.borrow_mut();
            let mut state = self.state.borrow_mut();
            state.paths = elements
                .into_iter()
                .map(|el| {
                    let write = match dom.quick_setter(&el, "d") {
                        Some(setter) => WriteStrategy::Quick(setter),
                        None => WriteStrategy::Plain(el),
                    };
                    PathState {
                        write,
                        prev_d: String::new(),
                    }
                })
                .collect();
            state.is_opened = self.cfg.is_opened;
        }

        let state = Rc::clone(&self.state);
        let dom = Rc::clone(&self.dom);
        let id = self.scheduler.borrow_mut().create(Box::new(move |progress| {
            render_frame(&mut state.borrow_mut(), &mut dom.borrow_mut(), progress);
        }));
        self.tween = Some(id);

        self.arm_timeline();
        // Jump straight to the resting frame; nothing animates yet.
        self.scheduler.borrow_mut().finish(id);
    }

    /// Transition to the opened state.
    pub fn entry(&mut self) -> Completion {
        self.transition_to(true)
    }

    /// Transition to the closed state.
    pub fn leave(&mut self) -> Completion {
        self.transition_to(false)
    }

    /// Transition to the flipped state.
    pub fn toggle(&mut self) -> Completion {
        let opened = self.state.borrow().is_opened;
        self.transition_to(!opened)
    }

    /// Currently configured total duration in whole milliseconds; zero while
    /// uninitialized.
    pub fn total_duration(&self) -> u64 {
        match self.tween {
            Some(id) => (self.scheduler.borrow().duration_secs(id) * 1000.0).round() as u64,
            None => 0,
        }
    }

    /// Forcibly kills an in-flight transition. Its completion handle never
    /// settles.
    pub fn stop_timeline_if_active(&mut self) {
        if let Some(id) = self.tween
            && self.scheduler.borrow().is_active(id)
        {
            self.scheduler.borrow_mut().kill(id);
        }
    }

    /// Detaches the frame callback and clears all per-path state. Safe to
    /// call repeatedly; every lifecycle method afterwards is a no-op.
    pub fn destroy(&mut self) {
        if let Some(id) = self.tween.take() {
            self.scheduler.borrow_mut().remove(id);
        }
        let mut state = self.state.borrow_mut();
        state.paths.clear();
        state.point_delays.clear();
        state.total_secs = 0.0;
        state.frame_counter = 0;
    }

    pub fn is_opened(&self) -> bool {
        self.state.borrow().is_opened
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.cfg
    }

    #[instrument(skip(self))]
    fn transition_to(&mut self, opened: bool) -> Completion {
        let Some(id) = self.tween else {
            return Completion::resolved();
        };
        // One transition at a time; late requests resolve without effect.
        if self.scheduler.borrow().is_active(id) {
            return Completion::resolved();
        }

        self.state.borrow_mut().is_opened = opened;
        self.arm_timeline();

        let (tx, done) = Completion::pair();
        self.scheduler.borrow_mut().play(
            id,
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        done
    }

    /// Rerandomizes the point delays, rebuilds the LUT, and re-arms the tween
    /// with the recomputed total duration.
    fn arm_timeline(&mut self) {
        let Some(id) = self.tween else {
            return;
        };

        let total = {
            let mut state = self.state.borrow_mut();
            state.point_delays = stagger::randomize_point_delays(
                &mut self.rng,
                self.cfg.points_count,
                self.cfg.delay_points,
            );
            if self.cfg.use_lut {
                state.evaluator.sampler_mut().rebuild();
            }

            let max_point_delay = state.point_delays.iter().copied().fold(0.0, f64::max);
            let max_path_delay = self.cfg.delay_paths * state.paths.len().saturating_sub(1) as f64;
            let total = self.cfg.duration + max_point_delay + max_path_delay;
            state.total_secs = total;
            state.frame_counter = 0;
            total
        };

        self.scheduler.borrow_mut().rearm(id, total);
        debug!(total_secs = total, "timeline armed");
    }
}

impl<D: Dom, S: Scheduler> Drop for MorphEngine<D, S> {
    fn drop(&mut self) {
        if let Some(id) = self.tween.take()
            && let Ok(mut scheduler) = self.scheduler.try_borrow_mut()
        {
            scheduler.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDom, StepScheduler};

    fn harness(
        options: MorphOptions,
        paths: usize,
    ) -> (
        MorphEngine<HeadlessDom, StepScheduler>,
        Rc<RefCell<HeadlessDom>>,
        Rc<RefCell<StepScheduler>>,
    ) {
        let dom = Rc::new(RefCell::new(HeadlessDom::builder().paths(paths).build()));
        let sched = Rc::new(RefCell::new(StepScheduler::new(60.0)));
        let engine = MorphEngine::new(options, Rc::clone(&dom), Rc::clone(&sched));
        (engine, dom, sched)
    }

    fn base_options() -> MorphOptions {
        MorphOptions {
            number_points: Some(3),
            delay_points: 0.0,
            delay_paths: 0.0,
            seed: Some(11),
            ..MorphOptions::default()
        }
    }

    #[test]
    fn init_renders_closed_resting_frame() {
        let (mut engine, dom, _sched) = harness(base_options(), 1);
        engine.init();
        assert_eq!(
            dom.borrow().path_attr(0, "d").unwrap(),
            "M 0 0 C 25 0 25 0 50 0 C 75 0 75 0 100 0 V 0 H 0"
        );
    }

    #[test]
    fn init_renders_opened_resting_frame() {
        let options = MorphOptions {
            is_opened: true,
            ..base_options()
        };
        let (mut engine, dom, _sched) = harness(options, 1);
        engine.init();
        assert_eq!(
            dom.borrow().path_attr(0, "d").unwrap(),
            "M 0 0 V 0 C 25 0 25 0 50 0 C 75 0 75 0 100 0 V 100 H 0"
        );
    }

    #[test]
    fn missing_root_leaves_engine_inert() {
        let options = MorphOptions {
            svg_el: ".nope".to_string(),
            ..base_options()
        };
        let (mut engine, dom, _sched) = harness(options, 2);
        engine.init();
        assert_eq!(engine.total_duration(), 0);
        assert_eq!(dom.borrow().total_writes(), 0);
        let mut done = engine.entry();
        assert!(done.try_resolved());
    }

    #[test]
    fn zero_matched_paths_leaves_engine_inert() {
        let (mut engine, _dom, _sched) = harness(base_options(), 0);
        engine.init();
        assert_eq!(engine.total_duration(), 0);
        assert!(engine.toggle().try_resolved());
    }

    #[test]
    fn total_duration_accounts_for_path_stagger() {
        let options = MorphOptions {
            delay_paths: 0.25,
            duration: 1.0,
            ..base_options()
        };
        let (mut engine, _dom, _sched) = harness(options, 3);
        engine.init();
        // delay_points is 0, so total = 1.0 + 0.25 * 2.
        assert_eq!(engine.total_duration(), 1500);
    }

    #[test]
    fn second_transition_is_a_noop_while_first_runs() {
        let (mut engine, _dom, sched) = harness(base_options(), 1);
        engine.init();

        let mut first = engine.entry();
        assert!(engine.is_opened());
        let mut second = engine.leave();
        assert!(second.try_resolved());
        assert!(engine.is_opened(), "guarded call must not flip state");

        sched.borrow_mut().run_to_idle();
        assert!(first.try_resolved());
        assert!(engine.is_opened());
    }

    #[test]
    fn destroy_is_idempotent_and_absorbs_calls() {
        let (mut engine, _dom, _sched) = harness(base_options(), 2);
        engine.init();
        engine.destroy();
        engine.destroy();
        assert_eq!(engine.total_duration(), 0);
        assert!(engine.entry().try_resolved());
        engine.stop_timeline_if_active();
    }

    #[test]
    fn stopped_transition_never_settles_and_engine_recovers() {
        let (mut engine, _dom, sched) = harness(base_options(), 1);
        engine.init();

        let mut done = engine.entry();
        sched.borrow_mut().tick();
        engine.stop_timeline_if_active();
        sched.borrow_mut().run_to_idle();
        assert!(!done.try_resolved());

        // A new transition can start after the kill.
        let mut next = engine.leave();
        sched.borrow_mut().run_to_idle();
        assert!(next.try_resolved());
    }

    #[test]
    fn reinit_resets_to_configured_rest_state() {
        let (mut engine, dom, sched) = harness(base_options(), 1);
        engine.init();
        let mut done = engine.entry();
        sched.borrow_mut().run_to_idle();
        assert!(done.try_resolved());
        assert!(engine.is_opened());

        engine.init();
        assert!(!engine.is_opened());
        assert_eq!(
            dom.borrow().path_attr(0, "d").unwrap(),
            "M 0 0 C 25 0 25 0 50 0 C 75 0 75 0 100 0 V 0 H 0"
        );
    }
}
