use std::cell::{Cell, RefCell};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::animation::{animate, AnimationHandle, FrameScheduler, SpinAnimation};
use crate::api::{ApiClient, ApiError, Lookup, Transport};
use crate::constants::{
    ALREADY_SPUN_NOTICE, MAX_EXTRA_TURNS, MIN_EXTRA_TURNS, SECTOR_WIDTH, SPIN_JITTER_FRACTION,
    WHEEL_SECTORS,
};
use crate::flight::InFlight;
use crate::points::PointsDisplay;
use crate::token::{KeyValueStorage, TokenStore};

/// Sectors that carry a drawn label. The 60 sector is left unlabelled.
pub const SECTOR_LABELS: [(usize, &str); 2] = [(0, "20"), (1, "40")];
/// Sector whose rim position carries the prize image.
pub const PRIZE_SECTOR: usize = 5;

/// Reward bucket assigned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointCategory {
    Twenty,
    Forty,
    Sixty,
}

impl PointCategory {
    pub fn points(self) -> u32 {
        match self {
            PointCategory::Twenty => 20,
            PointCategory::Forty => 40,
            PointCategory::Sixty => 60,
        }
    }

    /// Indices of the sectors that display this category. Twenty takes every
    /// other sector; forty and sixty split the rest.
    pub fn sectors(self) -> &'static [usize] {
        match self {
            PointCategory::Twenty => &[0, 2, 4],
            PointCategory::Forty => &[1, 3],
            PointCategory::Sixty => &[5],
        }
    }
}

impl TryFrom<u32> for PointCategory {
    type Error = ApiError;

    fn try_from(points: u32) -> Result<Self, Self::Error> {
        match points {
            20 => Ok(PointCategory::Twenty),
            40 => Ok(PointCategory::Forty),
            60 => Ok(PointCategory::Sixty),
            other => Err(ApiError::UnexpectedPoints(other)),
        }
    }
}

/// Wheel rotation (radians) that puts the center of `sector` under the pointer.
pub fn sector_center(sector: usize) -> f64 {
    (sector % WHEEL_SECTORS) as f64 * SECTOR_WIDTH
}

/// Canvas angle of a sector center once the wheel is rotated by `rotation`.
/// The pointer sits at the top of the canvas.
pub fn face_angle(sector: usize, rotation: f64) -> f64 {
    rotation - sector_center(sector) - FRAC_PI_2
}

/// Canvas angles of the three diameters separating the six sectors.
pub fn spoke_angles(rotation: f64) -> [f64; 3] {
    let half = SECTOR_WIDTH / 2.0;
    [0, 1, 2].map(|k| face_angle(k, rotation) + half)
}

pub fn sector_under_pointer(rotation: f64) -> usize {
    let normalized = rotation.rem_euclid(2.0 * PI);
    (normalized / SECTOR_WIDTH).round() as usize % WHEEL_SECTORS
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelOutcome {
    pub wheel_name: String,
    pub category: PointCategory,
    pub sector: usize,
    pub jitter: f64,
    pub extra_turns: u32,
    pub target_angle: f64,
}

impl WheelOutcome {
    pub fn resolve<R: Rng>(wheel_name: &str, category: PointCategory, rng: &mut R) -> Self {
        let sector = *category
            .sectors()
            .choose(rng)
            .unwrap_or(&category.sectors()[0]);

        let bound = SECTOR_WIDTH * SPIN_JITTER_FRACTION;
        let jitter = rng.gen_range(-bound..=bound);
        let extra_turns = rng.gen_range(MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS);

        let target_angle = extra_turns as f64 * 2.0 * PI + sector_center(sector) + jitter;

        Self {
            wheel_name: wheel_name.to_string(),
            category,
            sector,
            jitter,
            extra_turns,
            target_angle,
        }
    }

    pub fn sector_center(&self) -> f64 {
        sector_center(self.sector)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinResult {
    AlreadySpun,
    Spinning(WheelOutcome),
}

#[derive(Debug)]
pub enum WheelError {
    Busy,
    Api(ApiError),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "A spin is already in progress"),
            Self::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WheelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for WheelError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

pub struct WheelEngine<T, S, F: FrameScheduler> {
    name: String,
    api: Rc<ApiClient<T>>,
    tokens: Rc<TokenStore<S>>,
    points: Rc<PointsDisplay<T, S>>,
    scheduler: F,
    renderer: Option<Rc<dyn Fn(f64)>>,
    on_stop: Option<Rc<dyn Fn(PointCategory)>>,
    angle: Rc<Cell<f64>>,
    animation: RefCell<Option<AnimationHandle<F>>>,
    in_flight: Cell<bool>,
    notice: RefCell<Option<String>>,
}

impl<T, S, F> WheelEngine<T, S, F>
where
    T: Transport,
    S: KeyValueStorage,
    F: FrameScheduler + Clone + 'static,
{
    pub fn new(
        name: impl Into<String>,
        api: Rc<ApiClient<T>>,
        tokens: Rc<TokenStore<S>>,
        points: Rc<PointsDisplay<T, S>>,
        scheduler: F,
    ) -> Self {
        Self {
            name: name.into(),
            api,
            tokens,
            points,
            scheduler,
            renderer: None,
            on_stop: None,
            angle: Rc::new(Cell::new(0.0)),
            animation: RefCell::new(None),
            in_flight: Cell::new(false),
            notice: RefCell::new(None),
        }
    }

    /// Called with the wheel angle on every animation frame.
    pub fn with_renderer(mut self, renderer: impl Fn(f64) + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    /// Called with the landed category once a spin animation runs to its
    /// end. Cancelled spins never report.
    pub fn with_stop_listener(mut self, on_stop: impl Fn(PointCategory) + 'static) -> Self {
        self.on_stop = Some(Rc::new(on_stop));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Angle of the last rendered frame.
    pub fn angle(&self) -> f64 {
        self.angle.get()
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animation
            .borrow()
            .as_ref()
            .map_or(false, |handle| handle.is_active())
    }

    pub async fn spin<R: Rng>(&self, rng: &mut R) -> Result<SpinResult, WheelError> {
        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            log::debug!("ignoring spin on {} while a request is in flight", self.name);
            return Err(WheelError::Busy);
        };
        self.notice.replace(None);

        let authorization = self.tokens.get();
        let reply = self
            .api
            .spin_wheel(&self.name, authorization.as_deref())
            .await?;
        self.tokens.set(reply.token.as_deref());

        match reply.value {
            Lookup::NotFound => {
                log::info!("wheel {} was already spun", self.name);
                self.notice.replace(Some(ALREADY_SPUN_NOTICE.to_string()));
                Ok(SpinResult::AlreadySpun)
            }
            Lookup::Found(category) => {
                let outcome = WheelOutcome::resolve(&self.name, category, rng);
                log::debug!(
                    "wheel {} landed on {} points, target {:.3} rad",
                    self.name,
                    category.points(),
                    outcome.target_angle
                );
                self.start_animation(&outcome);

                if let Err(err) = self.points.refresh().await {
                    log::warn!("failed to refresh points after spin: {}", err);
                }
                Ok(SpinResult::Spinning(outcome))
            }
        }
    }

    fn start_animation(&self, outcome: &WheelOutcome) {
        // Drops and thereby cancels whatever was still running.
        self.cancel();

        let animation = SpinAnimation::new(outcome.target_angle, self.scheduler.now());
        let angle = self.angle.clone();
        let renderer = self.renderer.clone();
        let on_stop = self.on_stop.clone();
        let category = outcome.category;
        let name = self.name.clone();

        let handle = animate(
            self.scheduler.clone(),
            animation,
            move |current| {
                angle.set(current);
                if let Some(renderer) = &renderer {
                    renderer(current);
                }
            },
            move || {
                log::debug!("wheel {} stopped", name);
                if let Some(on_stop) = &on_stop {
                    on_stop(category);
                }
            },
        );
        self.animation.replace(Some(handle));
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.animation.borrow_mut().take() {
            handle.cancel();
        }
    }
}

impl<T, S, F: FrameScheduler> Drop for WheelEngine<T, S, F> {
    fn drop(&mut self) {
        if let Some(handle) = self.animation.get_mut().take() {
            handle.cancel();
        }
    }
}
