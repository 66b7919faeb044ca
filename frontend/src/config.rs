use shared::constants::DEFAULT_API_BASE_URL;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlMetaElement};

const API_BASE_META: &str = "meta[name=\"promo-api-base\"]";

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        // An explicit <meta name="promo-api-base"> wins over everything else
        let configured = window
            .document()
            .and_then(|document| document.query_selector(API_BASE_META).ok().flatten())
            .and_then(|element| element.dyn_into::<HtmlMetaElement>().ok())
            .map(|meta| meta.content())
            .filter(|content| !content.trim().is_empty());
        if let Some(configured) = configured {
            return configured.trim().to_string();
        }

        // Otherwise talk to the host that served the page
        if let Ok(origin) = window.location().origin() {
            if origin.starts_with("http") {
                return origin;
            }
        }
    }

    DEFAULT_API_BASE_URL.to_string()
}

pub fn get_asset_url(path: &str) -> String {
    if path.starts_with("http") || path.starts_with("data:") {
        path.to_string()
    } else {
        format!("{}{}", get_api_base_url(), path)
    }
}
