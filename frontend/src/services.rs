use std::rc::Rc;

use gloo_net::http::Request;
use gloo_render::{request_animation_frame, AnimationFrame};
use shared::animation::FrameScheduler;
use shared::api::{ApiClient, ApiError, HttpRequest, HttpResponse, Method, Transport};
use shared::checkout::Checkout;
use shared::points::PointsDisplay;
use shared::quiz::QuizEngine;
use shared::token::{KeyValueStorage, TokenStore};
use shared::wheel::WheelEngine;
use web_sys::{window, Storage};

use crate::base::dispatch_points_event;

pub type Api = ApiClient<GlooTransport>;
pub type Tokens = TokenStore<BrowserStorage>;
pub type Points = PointsDisplay<GlooTransport, BrowserStorage>;
pub type Quiz = QuizEngine<GlooTransport, BrowserStorage>;
pub type Wheel = WheelEngine<GlooTransport, BrowserStorage, RafScheduler>;
pub type CheckoutService = Checkout<GlooTransport, BrowserStorage>;

/// `window.localStorage`, with failures logged and otherwise ignored.
pub struct BrowserStorage;

fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set_item(&self, key: &str, value: &str) {
        match local_storage() {
            Some(storage) => {
                if let Err(err) = storage.set_item(key, value) {
                    log::warn!("Failed to write {} to local storage: {:?}", key, err);
                }
            }
            None => log::warn!("Local storage unavailable, dropping {}", key),
        }
    }

    fn remove_item(&self, key: &str) {
        match local_storage() {
            Some(storage) => {
                if let Err(err) = storage.remove_item(key) {
                    log::warn!("Failed to remove {} from local storage: {:?}", key, err);
                }
            }
            None => log::warn!("Local storage unavailable, cannot remove {}", key),
        }
    }
}

pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Drives animations from `requestAnimationFrame`, timed by `performance.now()`.
#[derive(Clone, Copy, Default)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    type Frame = AnimationFrame;

    fn now(&self) -> f64 {
        window()
            .and_then(|w| w.performance())
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> AnimationFrame {
        request_animation_frame(callback)
    }
}

/// Everything the widgets on one page share: a single client, token store and
/// points projection.
#[derive(Clone)]
pub struct Services {
    pub api: Rc<Api>,
    pub tokens: Rc<Tokens>,
    pub points: Rc<Points>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.api, &other.api)
    }
}

impl Services {
    pub fn new(base_url: String) -> Self {
        let api = Rc::new(ApiClient::new(base_url, GlooTransport));
        let tokens = Rc::new(TokenStore::new(BrowserStorage));
        let points = Rc::new(PointsDisplay::new(api.clone(), tokens.clone()));
        points.subscribe(dispatch_points_event);

        Self { api, tokens, points }
    }

    pub fn quiz(&self, quiz_name: &str) -> Quiz {
        QuizEngine::new(quiz_name, self.api.clone(), self.tokens.clone(), self.points.clone())
    }

    pub fn wheel(&self, wheel_name: &str) -> Wheel {
        WheelEngine::new(
            wheel_name,
            self.api.clone(),
            self.tokens.clone(),
            self.points.clone(),
            RafScheduler,
        )
    }

    pub fn checkout(&self) -> CheckoutService {
        Checkout::new(self.api.clone(), self.tokens.clone())
    }
}
