use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use crate::constants::SPIN_DURATION_MS;

/// Raised-cosine easing: 0 -> 0, 1 -> 1, flat at both ends.
pub fn ease(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    (1.0 - (PI * progress).cos()) / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub target_angle: f64,
    pub started_at: f64,
    pub duration_ms: f64,
}

impl SpinAnimation {
    pub fn new(target_angle: f64, started_at: f64) -> Self {
        Self {
            target_angle,
            started_at,
            duration_ms: SPIN_DURATION_MS,
        }
    }

    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn angle_at(&self, now: f64) -> f64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            self.target_angle
        } else {
            ease(progress) * self.target_angle
        }
    }
}

/// Source of display-refresh callbacks. Dropping a returned frame cancels it
/// if it has not fired yet, matching `gloo_render::AnimationFrame`.
pub trait FrameScheduler {
    type Frame;

    /// Current time on the same clock as the timestamps passed to callbacks.
    fn now(&self) -> f64;

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Frame;
}

struct Running<F: FrameScheduler> {
    scheduler: F,
    animation: SpinAnimation,
    on_frame: Box<dyn Fn(f64)>,
    on_finish: RefCell<Option<Box<dyn FnOnce()>>>,
    cancelled: Cell<bool>,
    finished: Cell<bool>,
    frame: RefCell<Option<F::Frame>>,
    retired: RefCell<Option<F::Frame>>,
}

/// Owns a running animation. Cancelling or dropping the handle stops it
/// before the next frame.
pub struct AnimationHandle<F: FrameScheduler> {
    running: Rc<Running<F>>,
}

impl<F: FrameScheduler> AnimationHandle<F> {
    pub fn animation(&self) -> SpinAnimation {
        self.running.animation
    }

    pub fn is_active(&self) -> bool {
        !self.running.cancelled.get() && !self.running.finished.get()
    }

    pub fn cancel(&self) {
        if self.running.cancelled.replace(true) {
            return;
        }
        self.running.on_finish.borrow_mut().take();
        self.running.frame.borrow_mut().take();
        self.running.retired.borrow_mut().take();
    }
}

impl<F: FrameScheduler> Drop for AnimationHandle<F> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts driving `animation`: renders its first angle immediately, then once
/// per frame until it finishes.
pub fn animate<F>(
    scheduler: F,
    animation: SpinAnimation,
    on_frame: impl Fn(f64) + 'static,
    on_finish: impl FnOnce() + 'static,
) -> AnimationHandle<F>
where
    F: FrameScheduler + 'static,
{
    let running = Rc::new(Running {
        scheduler,
        animation,
        on_frame: Box::new(on_frame),
        on_finish: RefCell::new(Some(Box::new(on_finish))),
        cancelled: Cell::new(false),
        finished: Cell::new(false),
        frame: RefCell::new(None),
        retired: RefCell::new(None),
    });

    let now = running.scheduler.now();
    step(&running, now);

    AnimationHandle { running }
}

fn schedule<F: FrameScheduler + 'static>(running: &Rc<Running<F>>) {
    let next = Rc::clone(running);
    let frame = running
        .scheduler
        .request_frame(Box::new(move |timestamp| step(&next, timestamp)));

    let previous = running.frame.borrow_mut().replace(frame);
    // The frame currently executing must outlive its own callback.
    *running.retired.borrow_mut() = previous;
}

fn step<F: FrameScheduler + 'static>(running: &Rc<Running<F>>, timestamp: f64) {
    if running.cancelled.get() || running.finished.get() {
        return;
    }

    (running.on_frame)(running.animation.angle_at(timestamp));

    if running.animation.is_finished(timestamp) {
        running.finished.set(true);
        let on_finish = running.on_finish.borrow_mut().take();
        if let Some(on_finish) = on_finish {
            on_finish();
        }
    } else {
        schedule(running);
    }
}
