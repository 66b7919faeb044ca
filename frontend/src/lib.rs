pub mod base;
pub mod components;
pub mod config;
pub mod hooks;
pub mod services;
pub mod styles;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Document, Element};
use yew::Renderer;

use crate::base::{dispatch_open_quiz, Base, BaseProps};
use crate::components::{
    CheckoutForm, CheckoutFormProps, PointsBadge, PointsBadgeProps, PrizeWheel, PrizeWheelProps,
};
use crate::config::{get_api_base_url, get_asset_url};
use crate::services::Services;

pub const QUIZ_TRIGGER_ATTR: &str = "data-promo-quiz";
pub const WHEEL_MOUNT_ATTR: &str = "data-promo-wheel";
pub const PRIZE_IMAGE_ATTR: &str = "data-prize-image";
pub const CHECKOUT_MOUNT_ATTR: &str = "data-promo-checkout";
pub const POINTS_MOUNT_ATTR: &str = "data-promo-points";

fn elements_with(document: &Document, attribute: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(&format!("[{}]", attribute)) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Wires every widget affordance found on the page to one shared set of
/// services.
pub fn mount() {
    let Some(document) = window().and_then(|w| w.document()) else {
        log::error!("No document available, widgets not mounted");
        return;
    };

    let services = Services::new(get_api_base_url());
    log::info!("Promo widgets talking to {}", services.api.base_url());
    if services.tokens.migrate_legacy() {
        log::info!("Migrated visitor token from the legacy storage key");
    }

    match (document.create_element("div"), document.body()) {
        (Ok(host), Some(body)) => match body.append_child(&host) {
            Ok(_) => {
                let props = BaseProps { services: services.clone() };
                Renderer::<Base>::with_root_and_props(host, props).render();
            }
            Err(err) => log::error!("Could not attach the quiz popup host: {:?}", err),
        },
        _ => log::error!("Could not create the quiz popup host"),
    }

    for trigger in elements_with(&document, QUIZ_TRIGGER_ATTR) {
        let Some(quiz_name) = trigger.get_attribute(QUIZ_TRIGGER_ATTR) else {
            continue;
        };
        gloo_events::EventListener::new(&trigger, "click", move |_| dispatch_open_quiz(&quiz_name))
            .forget();
    }

    for root in elements_with(&document, WHEEL_MOUNT_ATTR) {
        let wheel_name = root.get_attribute(WHEEL_MOUNT_ATTR).unwrap_or_default();
        let prize_image = root
            .get_attribute(PRIZE_IMAGE_ATTR)
            .map(|path| get_asset_url(&path));
        Renderer::<PrizeWheel>::with_root_and_props(
            root,
            PrizeWheelProps {
                services: services.clone(),
                wheel_name,
                prize_image,
            },
        )
        .render();
    }

    for root in elements_with(&document, CHECKOUT_MOUNT_ATTR) {
        Renderer::<CheckoutForm>::with_root_and_props(
            root,
            CheckoutFormProps { services: services.clone() },
        )
        .render();
    }

    for root in elements_with(&document, POINTS_MOUNT_ATTR) {
        Renderer::<PointsBadge>::with_root_and_props(
            root,
            PointsBadgeProps { services: services.clone() },
        )
        .render();
    }

    spawn_local(async move {
        if let Err(err) = services.points.refresh().await {
            log::warn!("Initial points refresh failed: {}", err);
        }
    });
}
