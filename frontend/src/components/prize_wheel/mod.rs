mod wheel_canvas;
mod wheel_utils;

use gloo_events::EventListener;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use shared::constants::{NETWORK_ERROR, WHEEL_CANVAS_SIZE};
use shared::wheel::{PointCategory, SpinResult, WheelError};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlImageElement;
use yew::prelude::*;

use crate::services::Services;
use crate::styles;
use wheel_canvas::draw_into;
use wheel_utils::{ResultDisplay, SpinButton};

#[derive(Properties, PartialEq)]
pub struct PrizeWheelProps {
    pub services: Services,
    pub wheel_name: String,
    #[prop_or_default]
    pub prize_image: Option<String>,
}

#[function_component(PrizeWheel)]
pub fn prize_wheel(props: &PrizeWheelProps) -> Html {
    let canvas_ref = use_node_ref();
    let prize = use_mut_ref(|| None::<HtmlImageElement>);
    let spinning = use_state(|| false);
    let result = use_state(|| None::<PointCategory>);
    let message = use_state(|| None::<String>);

    let engine = {
        let canvas_ref = canvas_ref.clone();
        let prize = prize.clone();
        let spinning = spinning.clone();
        let result = result.clone();
        use_memo(
            (props.services.clone(), props.wheel_name.clone()),
            move |(services, wheel_name)| {
                services
                    .wheel(wheel_name)
                    .with_renderer(move |angle| {
                        draw_into(&canvas_ref, prize.borrow().as_ref(), angle)
                    })
                    .with_stop_listener(move |category| {
                        result.set(Some(category));
                        spinning.set(false);
                    })
            },
        )
    };

    // First paint, then again once the prize image has loaded
    {
        let canvas_ref = canvas_ref.clone();
        let prize = prize.clone();
        let engine = engine.clone();
        use_effect_with(props.prize_image.clone(), move |prize_image| {
            draw_into(&canvas_ref, None, engine.angle());

            let listener = prize_image.as_ref().and_then(|src| {
                let image = HtmlImageElement::new().ok()?;
                let listener = {
                    let prize = prize.clone();
                    EventListener::new(&image, "load", move |_| {
                        draw_into(&canvas_ref, prize.borrow().as_ref(), engine.angle());
                    })
                };
                image.set_src(src);
                *prize.borrow_mut() = Some(image);
                Some(listener)
            });
            move || drop(listener)
        });
    }

    {
        let engine = engine.clone();
        use_effect_with((), move |_| move || engine.cancel());
    }

    let on_spin = {
        let engine = engine.clone();
        let spinning = spinning.clone();
        let result = result.clone();
        let message = message.clone();

        Callback::from(move |_: MouseEvent| {
            if engine.is_busy() {
                return;
            }

            spinning.set(true);
            result.set(None);
            message.set(None);

            let engine = engine.clone();
            let spinning = spinning.clone();
            let message = message.clone();
            spawn_local(async move {
                let mut rng = SmallRng::from_entropy();
                match engine.spin(&mut rng).await {
                    // The stop listener reports the result once the wheel settles
                    Ok(SpinResult::Spinning(_)) => {}
                    Ok(SpinResult::AlreadySpun) => {
                        message.set(engine.notice());
                        spinning.set(false);
                    }
                    Err(WheelError::Busy) => {
                        log::debug!("Spin on {} already in flight", engine.name());
                        spinning.set(engine.is_busy() || engine.is_animating());
                    }
                    Err(WheelError::Api(err)) => {
                        log::error!("Spin on {} failed: {}", engine.name(), err);
                        message.set(Some(NETWORK_ERROR.to_string()));
                        spinning.set(false);
                    }
                }
            });
        })
    };

    let size = WHEEL_CANVAS_SIZE.to_string();

    html! {
        <div class="flex flex-col items-center space-y-6">
            <canvas
                ref={canvas_ref}
                width={size.clone()}
                height={size}
                class="w-full max-w-[600px] h-auto rounded-full shadow-lg"
            />
            <div class="w-full max-w-xs">
                <SpinButton
                    is_spinning={*spinning}
                    disabled={*spinning}
                    onclick={on_spin}
                />
            </div>
            if let Some(message) = &*message {
                <div class={styles::ALERT_WARNING}>{message.clone()}</div>
            }
            <ResultDisplay category={*result} />
        </div>
    }
}
