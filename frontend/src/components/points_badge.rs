use yew::prelude::*;

use crate::hooks::use_points;
use crate::services::Services;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct PointsBadgeProps {
    pub services: Services,
}

#[function_component(PointsBadge)]
pub fn points_badge(props: &PointsBadgeProps) -> Html {
    let total = use_points(&props.services);

    html! {
        <span class={styles::POINTS_BADGE}>
            {
                match total {
                    Some(total) => format!("{} points", total),
                    None => "… points".to_string(),
                }
            }
        </span>
    }
}
