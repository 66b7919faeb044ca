use shared::constants::NETWORK_ERROR;
use shared::quiz::{ChoiceMark, QuizError, QuizState};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::Services;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct QuizPopupProps {
    pub services: Services,
    pub quiz_name: String,
    pub on_close: Callback<()>,
}

fn choice_class(mark: ChoiceMark, selectable: bool) -> Classes {
    let mark_class = match mark {
        ChoiceMark::Neutral => styles::CHOICE_NEUTRAL,
        ChoiceMark::Selected => styles::CHOICE_SELECTED,
        ChoiceMark::Correct => styles::CHOICE_CORRECT,
        ChoiceMark::Wrong => styles::CHOICE_WRONG,
    };
    classes!(
        styles::CHOICE_BASE,
        mark_class,
        (!selectable).then_some(styles::CHOICE_LOCKED)
    )
}

/// Error text for a failed quiz call, if the visitor should see one.
fn failure_message(err: &QuizError) -> Option<String> {
    match err {
        QuizError::Busy => None,
        QuizError::Api(e) => {
            log::error!("Quiz request failed: {}", e);
            Some(NETWORK_ERROR.to_string())
        }
        other => {
            log::warn!("Ignored quiz input: {}", other);
            None
        }
    }
}

#[function_component(QuizPopup)]
pub fn quiz_popup(props: &QuizPopupProps) -> Html {
    let engine = use_memo(
        (props.services.clone(), props.quiz_name.clone()),
        |(services, quiz_name)| services.quiz(quiz_name),
    );
    let update = use_force_update();
    let error = use_state(|| None::<String>);

    let open = {
        let engine = engine.clone();
        let update = update.clone();
        let error = error.clone();
        Callback::from(move |_: ()| {
            let engine = engine.clone();
            let update = update.clone();
            let error = error.clone();
            error.set(None);
            spawn_local(async move {
                if let Err(err) = engine.open().await {
                    error.set(failure_message(&err));
                }
                update.force_update();
            });
        })
    };

    {
        let open = open.clone();
        use_effect_with((), move |_| {
            open.emit(());
            || ()
        });
    }

    let on_select = {
        let engine = engine.clone();
        let update = update.clone();
        Callback::from(move |choice: String| {
            if let Err(err) = engine.select(&choice) {
                log::debug!("Selection of {} ignored: {}", choice, err);
            }
            update.force_update();
        })
    };

    let on_continue = {
        let engine = engine.clone();
        let update = update.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let engine = engine.clone();
            let update = update.clone();
            let error = error.clone();
            error.set(None);
            let async_update = update.clone();
            spawn_local(async move {
                if let Err(err) = engine.press_continue().await {
                    error.set(failure_message(&err));
                }
                async_update.force_update();
            });
            update.force_update();
        })
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let state = engine.state();
    let busy = engine.is_busy();

    let body = match &state {
        QuizState::Completed => html! {
            <div class="text-center space-y-4">
                <h2 class={styles::TEXT_H2}>{"All done!"}</h2>
                <p class={styles::TEXT_BODY}>{"You have answered every question in this quiz."}</p>
                <button class={styles::BUTTON_PRIMARY} onclick={on_close.clone()}>{"Close"}</button>
            </div>
        },
        QuizState::Loading => html! {
            <div class="flex flex-col items-center space-y-4">
                if error.is_some() {
                    <button class={styles::BUTTON_SECONDARY} onclick={open.reform(|_: MouseEvent| ())}>
                        {"Try again"}
                    </button>
                } else {
                    <svg class={styles::LOADING_SPINNER} xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24">
                        <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                        <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"></path>
                    </svg>
                }
            </div>
        },
        _ => {
            let selectable = state.choices_selectable() && !busy;
            let question = state.question().cloned().unwrap_or_default();
            let continue_label = if matches!(state, QuizState::Revealed { .. }) {
                "Next question"
            } else {
                "Continue"
            };

            html! {
                <div class="space-y-6">
                    <h3 class={styles::TEXT_H3}>{question.text.clone()}</h3>
                    <div class="space-y-3">
                        { for question.choices.iter().map(|choice| {
                            let on_select = on_select.clone();
                            let value = choice.clone();
                            let onclick = Callback::from(move |_: MouseEvent| {
                                on_select.emit(value.clone())
                            });
                            html! {
                                <button
                                    key={choice.clone()}
                                    class={choice_class(state.mark(choice), selectable)}
                                    disabled={!selectable}
                                    onclick={onclick}
                                >
                                    {choice.clone()}
                                </button>
                            }
                        })}
                    </div>
                    {
                        match state.is_correct() {
                            Some(true) => html! { <div class={styles::ALERT_SUCCESS}>{"Correct!"}</div> },
                            Some(false) => html! { <div class={styles::ALERT_ERROR}>{"Not quite."}</div> },
                            None => html! {},
                        }
                    }
                    <div class="flex justify-end">
                        <button
                            class={styles::BUTTON_PRIMARY}
                            disabled={!engine.can_continue()}
                            onclick={on_continue}
                        >
                            {continue_label}
                        </button>
                    </div>
                </div>
            }
        }
    };

    html! {
        <div class={styles::POPUP_OVERLAY}>
            <div class={styles::POPUP_CARD}>
                <button class={styles::POPUP_CLOSE} onclick={on_close} aria-label="Close">
                    <svg class="w-5 h-5" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12" />
                    </svg>
                </button>
                if let Some(message) = &*error {
                    <div class={classes!(styles::ALERT_ERROR, "mb-4")}>{message.clone()}</div>
                }
                {body}
            </div>
        </div>
    }
}
