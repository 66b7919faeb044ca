use shared::checkout::{CheckoutError, CheckoutOutcome};
use shared::constants::{CHECKOUT_REJECTED_ERROR, INVALID_EMAIL_ERROR, NETWORK_ERROR};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, SubmitEvent};
use yew::prelude::*;

use crate::services::Services;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct CheckoutFormProps {
    pub services: Services,
}

/// Lets a visitor register coupon codes against their email address.
#[function_component(CheckoutForm)]
pub fn checkout_form(props: &CheckoutFormProps) -> Html {
    let checkout = use_memo(props.services.clone(), |services| services.checkout());
    let error = use_state(String::new);
    let success = use_state(String::new);
    let loading = use_state(|| false);
    let codes_ref = use_node_ref();
    let email_ref = use_node_ref();
    let consent_ref = use_node_ref();

    let handle_submit = {
        let checkout = checkout.clone();
        let error = error.clone();
        let success = success.clone();
        let loading = loading.clone();
        let codes_ref = codes_ref.clone();
        let email_ref = email_ref.clone();
        let consent_ref = consent_ref.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if *loading {
                return;
            }

            let value_of = |node: &NodeRef| {
                node.cast::<HtmlInputElement>()
                    .map(|input| input.value())
                    .unwrap_or_default()
            };
            let codes = value_of(&codes_ref);
            let email = value_of(&email_ref);
            let consent = consent_ref
                .cast::<HtmlInputElement>()
                .map_or(false, |input| input.checked());

            loading.set(true);
            error.set(String::new());
            success.set(String::new());

            let checkout = checkout.clone();
            let error = error.clone();
            let success = success.clone();
            let loading = loading.clone();
            spawn_local(async move {
                match checkout.submit(&codes, &email, consent).await {
                    Ok(CheckoutOutcome::Accepted { points }) => success.set(format!(
                        "Thanks! Your entry is registered with {} points.",
                        points
                    )),
                    Ok(CheckoutOutcome::Rejected) => {
                        error.set(CHECKOUT_REJECTED_ERROR.to_string())
                    }
                    Err(CheckoutError::InvalidEmail(_)) => {
                        error.set(INVALID_EMAIL_ERROR.to_string())
                    }
                    Err(CheckoutError::Busy) => {}
                    Err(CheckoutError::Api(err)) => {
                        log::error!("Checkout request failed: {}", err);
                        error.set(NETWORK_ERROR.to_string());
                    }
                }
                loading.set(false);
            });
        })
    };

    html! {
        <div class={styles::CARD}>
            <h2 class={styles::TEXT_H2}>{"Register your codes"}</h2>
            <p class={styles::TEXT_BODY}>{"Enter the codes from your purchase to collect your points."}</p>

            if !error.is_empty() {
                <div class={classes!(styles::ALERT_ERROR, "mt-4")}>{(*error).clone()}</div>
            }
            if !success.is_empty() {
                <div class={classes!(styles::ALERT_SUCCESS, "mt-4")}>{(*success).clone()}</div>
            }

            <form class={styles::FORM} onsubmit={handle_submit}>
                <div>
                    <label for="promo-codes" class={styles::TEXT_LABEL}>{"Codes"}</label>
                    <input
                        ref={codes_ref}
                        id="promo-codes"
                        type="text"
                        class={styles::INPUT}
                        placeholder="SUMMER10, WINTER5"
                        disabled={*loading}
                    />
                    <p class={styles::TEXT_HINT}>{"Separate several codes with commas or spaces."}</p>
                </div>
                <div>
                    <label for="promo-email" class={styles::TEXT_LABEL}>{"Email"}</label>
                    <input
                        ref={email_ref}
                        id="promo-email"
                        type="email"
                        class={styles::INPUT}
                        placeholder="you@example.com"
                        disabled={*loading}
                    />
                </div>
                <label class="flex items-center gap-2 text-sm text-gray-700 dark:text-gray-300">
                    <input ref={consent_ref} type="checkbox" disabled={*loading} />
                    {"Keep me informed about future promotions"}
                </label>
                <button type="submit" class={styles::BUTTON_PRIMARY} disabled={*loading}>
                    { if *loading { "Sending..." } else { "Submit" } }
                </button>
            </form>
        </div>
    }
}
