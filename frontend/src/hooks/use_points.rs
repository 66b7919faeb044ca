use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{window, CustomEvent, Event};
use yew::prelude::*;

use crate::base::POINTS_UPDATE_EVENT;
use crate::services::Services;

/// Current point total, kept in sync with every refresh of the shared
/// `PointsDisplay`.
#[hook]
pub fn use_points(services: &Services) -> Option<u32> {
    let total = use_state(|| services.points.total());

    {
        let total = total.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|window| {
                EventListener::new(&window, POINTS_UPDATE_EVENT, move |event: &Event| {
                    if let Some(custom_event) = event.dyn_ref::<CustomEvent>() {
                        if let Some(new_total) = custom_event.detail().as_f64() {
                            total.set(Some(new_total as u32));
                        }
                    }
                })
            });
            move || drop(listener)
        });
    }

    *total
}
