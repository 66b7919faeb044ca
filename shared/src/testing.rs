use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

pub use futures::executor::block_on;
pub use futures::future::join;

use crate::animation::FrameScheduler;
use crate::api::{ApiError, HttpRequest, HttpResponse, Transport};

/// Pending on the first poll, ready on the second.
#[derive(Default)]
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Replays canned bodies in order and records every request it sees.
/// Runs out into a network error.
pub struct FakeTransport {
    status: u16,
    stalls: Cell<u32>,
    replies: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new(replies: &[&str]) -> Self {
        Self::with_status(200, replies)
    }

    pub fn with_status(status: u16, replies: &[&str]) -> Self {
        Self {
            status,
            stalls: Cell::new(0),
            replies: RefCell::new(replies.iter().map(|reply| reply.to_string()).collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Makes the next request yield once before it is answered, leaving
    /// room for a competing call to run.
    pub fn stall_next(&self) {
        self.stalls.set(self.stalls.get() + 1);
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.borrow_mut().push_back(reply.to_string());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        if self.stalls.get() > 0 {
            self.stalls.set(self.stalls.get() - 1);
            YieldOnce::default().await;
        }
        let body = self
            .replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Network("connection refused".to_string()))?;
        Ok(HttpResponse { status: self.status, body })
    }
}

type PendingFrame = (Rc<Cell<bool>>, Box<dyn FnOnce(f64)>);

/// Frame scheduler driven by hand from tests.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    now: Rc<Cell<f64>>,
    pending: Rc<RefCell<Vec<PendingFrame>>>,
}

pub struct ManualFrame(Rc<Cell<bool>>);

impl Drop for ManualFrame {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_now(&self, now: f64) {
        self.now.set(now);
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().iter().filter(|(alive, _)| alive.get()).count()
    }

    /// Moves the clock to `now` and fires every frame that was requested
    /// before this call and is still alive.
    pub fn advance_to(&self, now: f64) {
        self.now.set(now);
        let frames: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for (alive, callback) in frames {
            if alive.get() {
                callback(now);
            }
        }
    }
}

impl FrameScheduler for ManualScheduler {
    type Frame = ManualFrame;

    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> ManualFrame {
        let alive = Rc::new(Cell::new(true));
        self.pending.borrow_mut().push((alive.clone(), callback));
        ManualFrame(alive)
    }
}
