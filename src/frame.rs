//! Per-frame tasks
//!
//! A `FrameLoop` re-requests a frame from its scheduler after every run until
//! it is cancelled. Cancelling flips the loop's token and withdraws the frame
//! request that is still pending, so a cancelled loop never runs again and two
//! loops can never end up drawing into the same frame by accident.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Identifies one pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub i64);

pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Source of "next frame" callbacks (`requestAnimationFrame` in the browser)
pub trait FrameScheduler {
    /// Run `callback` once, on the next frame, with a timestamp in ms
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;
    /// Drop a request that has not run yet. Unknown ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Shared cancelled flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct LoopState {
    scheduler: Rc<dyn FrameScheduler>,
    token: CancelToken,
    pending: Cell<Option<FrameRequestId>>,
    body: RefCell<Box<dyn FnMut(f64)>>,
}

fn schedule(state: &Rc<LoopState>) {
    let next = Rc::clone(state);
    let id = state.scheduler.request_frame(Box::new(move |time| {
        next.pending.set(None);
        if next.token.is_cancelled() {
            return;
        }
        {
            let mut body = next.body.borrow_mut();
            (*body)(time);
        }
        if !next.token.is_cancelled() {
            schedule(&next);
        }
    }));
    state.pending.set(Some(id));
}

/// A repeating per-frame task. Dropping it cancels it.
pub struct FrameLoop {
    state: Rc<LoopState>,
}

impl FrameLoop {
    /// Start running `body` once per frame, beginning with the next frame
    pub fn start(scheduler: Rc<dyn FrameScheduler>, body: impl FnMut(f64) + 'static) -> Self {
        let state = Rc::new(LoopState {
            scheduler,
            token: CancelToken::new(),
            pending: Cell::new(None),
            body: RefCell::new(Box::new(body)),
        });
        schedule(&state);
        Self { state }
    }

    pub fn token(&self) -> CancelToken {
        self.state.token.clone()
    }

    pub fn cancel(&self) {
        self.state.token.cancel();
        if let Some(id) = self.state.pending.take() {
            self.state.scheduler.cancel_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.token.is_cancelled()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler driven by hand: frames run when `run_frame` is called.
///
/// Used by the native build and by tests in place of the display refresh.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<i64>,
    queue: RefCell<Vec<(FrameRequestId, FrameCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests waiting for the next frame
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every callback requested before this call; returns how many ran.
    /// Requests made while running wait for the following frame.
    pub fn run_frame(&self, time: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(time);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = FrameRequestId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}

/// Owners of outstanding frame callbacks, by request id.
///
/// A callback that fired reports its id through `fired_log`; it is released
/// on the next `request` or `cancel`, never while it is still running.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) struct RequestRegistry<T> {
    pending: RefCell<HashMap<i32, T>>,
    fired: Rc<RefCell<Vec<i32>>>,
}

impl<T> Default for RequestRegistry<T> {
    fn default() -> Self {
        Self {
            pending: RefCell::new(HashMap::new()),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<T> RequestRegistry<T> {
    pub(crate) fn fired_log(&self) -> Rc<RefCell<Vec<i32>>> {
        Rc::clone(&self.fired)
    }

    /// Release every callback that has already run
    pub(crate) fn release_fired(&self) {
        let ids: Vec<i32> = self.fired.borrow_mut().drain(..).collect();
        let released: Vec<T> = {
            let mut pending = self.pending.borrow_mut();
            ids.iter().filter_map(|id| pending.remove(id)).collect()
        };
        // Dropped outside the borrow: a callback may own a FrameLoop whose
        // drop cancels through this registry
        drop(released);
    }

    pub(crate) fn insert(&self, id: i32, owner: T) {
        self.release_fired();
        self.pending.borrow_mut().insert(id, owner);
    }

    /// Release a callback that will never run
    pub(crate) fn cancel(&self, id: i32) {
        self.release_fired();
        let removed = self.pending.borrow_mut().remove(&id);
        drop(removed);
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Scheduler backed by `window.requestAnimationFrame`
#[cfg(target_arch = "wasm32")]
pub struct BrowserScheduler {
    window: web_sys::Window,
    requests: RequestRegistry<wasm_bindgen::closure::Closure<dyn FnMut(f64)>>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            requests: RequestRegistry::default(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl FrameScheduler for BrowserScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let own_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let fired = self.requests.fired_log();
        let slot = Rc::clone(&own_id);
        let closure: Closure<dyn FnMut(f64)> = Closure::once(move |time: f64| {
            callback(time);
            if let Some(id) = slot.get() {
                fired.borrow_mut().push(id);
            }
        });

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => {
                own_id.set(Some(id));
                self.requests.insert(id, closure);
                FrameRequestId(id as i64)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                FrameRequestId(-1)
            }
        }
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        if id.0 >= 0 {
            let _ = self.window.cancel_animation_frame(id.0 as i32);
            self.requests.cancel(id.0 as i32);
        }
    }
}
