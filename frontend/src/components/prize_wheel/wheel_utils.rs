use shared::wheel::PointCategory;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ResultDisplayProps {
    pub category: Option<PointCategory>,
}

#[function_component(ResultDisplay)]
pub fn result_display(props: &ResultDisplayProps) -> Html {
    let Some(category) = props.category else {
        return html! {};
    };

    let (gradient_classes, animation_class) = match category {
        PointCategory::Sixty => (
            "from-orange-400 to-orange-600 border-orange-300",
            "animate-bounce",
        ),
        PointCategory::Forty => ("from-blue-400 to-blue-600 border-blue-300", "animate-pulse"),
        PointCategory::Twenty => (
            "from-violet-400 to-violet-600 border-violet-300",
            "animate-pulse",
        ),
    };

    html! {
        <div class="mt-8 mb-4 flex flex-col items-center justify-center">
            <div class={classes!(
                "flex",
                "items-center",
                "justify-center",
                "px-6",
                "py-4",
                "rounded-xl",
                "bg-gradient-to-r",
                "text-white",
                "font-bold",
                "text-xl",
                "shadow-lg",
                "border-2",
                "transition-all",
                "duration-500",
                animation_class,
                gradient_classes
            )}>
                <span>{format!("You won {} points!", category.points())}</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub disabled: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let button_text = if props.is_spinning { "Spinning..." } else { "Spin" };

    let button_class = if props.disabled {
        "bg-gradient-to-r from-gray-400 to-gray-500 opacity-75 cursor-not-allowed text-white"
    } else {
        "bg-gradient-to-r from-yellow-400 to-orange-500 hover:from-yellow-500 hover:to-orange-600 text-white shadow-lg hover:shadow-xl"
    };

    let spin_icon_class = if props.is_spinning {
        "inline-block mr-2 animate-spin"
    } else {
        "hidden"
    };

    html! {
        <div class={classes!("relative", "overflow-hidden", "rounded-full", "w-full", button_class)}>
            <button
                onclick={props.onclick.clone()}
                disabled={props.disabled}
                class="relative w-full px-8 py-4 font-bold text-lg bg-transparent focus:outline-none focus:ring-4 focus:ring-yellow-300"
            >
                <div class="flex items-center justify-center">
                    <svg class={spin_icon_class} xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
                        <circle cx="12" cy="12" r="10" />
                        <path d="M12 6v6l4 2" />
                    </svg>
                    <span>{button_text}</span>
                </div>
            </button>
        </div>
    }
}
