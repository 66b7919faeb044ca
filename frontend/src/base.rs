use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CustomEvent, CustomEventInit, Event};
use yew::prelude::*;

use crate::components::QuizPopup;
use crate::services::Services;

pub const POINTS_UPDATE_EVENT: &str = "promoPointsUpdate";
pub const OPEN_QUIZ_EVENT: &str = "promoOpenQuiz";

fn dispatch(name: &str, detail: &JsValue) {
    if let Some(window) = window() {
        let event_init = CustomEventInit::new();
        event_init.set_detail(detail);
        match CustomEvent::new_with_event_init_dict(name, &event_init) {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(err) => log::error!("Failed to create {} event: {:?}", name, err),
        }
    }
}

pub fn dispatch_points_event(total: u32) {
    dispatch(POINTS_UPDATE_EVENT, &JsValue::from_f64(total as f64));
}

pub fn dispatch_open_quiz(quiz_name: &str) {
    dispatch(OPEN_QUIZ_EVENT, &JsValue::from_str(quiz_name));
}

#[derive(Properties, PartialEq)]
pub struct BaseProps {
    pub services: Services,
}

/// Page-level host for the quiz popup. Trigger elements ask it to open a quiz
/// through `OPEN_QUIZ_EVENT`.
#[function_component(Base)]
pub fn base(props: &BaseProps) -> Html {
    // Bumped on every open so a reopened quiz starts a fresh session
    let sessions = use_mut_ref(|| 0u32);
    let open_quiz = use_state(|| None::<(String, u32)>);

    {
        let open_quiz = open_quiz.clone();
        let sessions = sessions.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|window| {
                EventListener::new(&window, OPEN_QUIZ_EVENT, move |event: &Event| {
                    if let Some(custom_event) = event.dyn_ref::<CustomEvent>() {
                        if let Some(quiz_name) = custom_event.detail().as_string() {
                            log::debug!("Opening quiz {}", quiz_name);
                            let mut sessions = sessions.borrow_mut();
                            *sessions += 1;
                            open_quiz.set(Some((quiz_name, *sessions)));
                        }
                    }
                })
            });
            move || drop(listener)
        });
    }

    let on_close = {
        let open_quiz = open_quiz.clone();
        Callback::from(move |_| open_quiz.set(None))
    };

    match &*open_quiz {
        Some((quiz_name, session)) => html! {
            <QuizPopup
                key={format!("{}-{}", quiz_name, session)}
                services={props.services.clone()}
                quiz_name={quiz_name.clone()}
                on_close={on_close}
            />
        },
        None => html! {},
    }
}
