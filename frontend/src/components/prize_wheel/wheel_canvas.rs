use std::f64::consts::{FRAC_PI_2, PI};

use shared::wheel::{face_angle, spoke_angles, PRIZE_SECTOR, SECTOR_LABELS};
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use yew::NodeRef;

const RIM_MARGIN: f64 = 30.0;
const LABEL_RADIUS: f64 = 0.62;
const PRIZE_RADIUS: f64 = 0.7;
const PRIZE_SIZE: f64 = 90.0;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn is_dark_mode() -> bool {
    window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
        .map(|el| el.class_list().contains("dark"))
        .unwrap_or(false)
}

/// Redraws the wheel behind `canvas_ref`, if it is mounted.
pub fn draw_into(canvas_ref: &NodeRef, prize: Option<&HtmlImageElement>, rotation: f64) {
    if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
        draw_wheel(&canvas, prize, rotation);
    }
}

/// Draws one frame of the wheel turned by `rotation` radians. The pointer
/// stays fixed at the top.
pub fn draw_wheel(canvas: &HtmlCanvasElement, prize: Option<&HtmlImageElement>, rotation: f64) {
    let Some(context) = context_2d(canvas) else {
        log::warn!("Wheel canvas has no 2d context");
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = width.min(height) / 2.0 - RIM_MARGIN;
    let dark = is_dark_mode();
    let ink = if dark { "#f3f4f6" } else { "#1f2937" };

    context.clear_rect(0.0, 0.0, width, height);

    // Rim
    context.begin_path();
    context.set_fill_style_str(if dark { "#1a1c2e" } else { "#f0f2ff" });
    let _ = context.arc(center_x, center_y, radius, 0.0, 2.0 * PI);
    context.fill();
    context.set_stroke_style_str(if dark {
        "rgba(180, 130, 255, 0.7)"
    } else {
        "rgba(130, 100, 255, 0.7)"
    });
    context.set_line_width(6.0);
    context.stroke();

    // Spokes, each one a full diameter
    context.set_stroke_style_str(ink);
    context.set_line_width(3.0);
    for angle in spoke_angles(rotation) {
        let (dx, dy) = (radius * angle.cos(), radius * angle.sin());
        context.begin_path();
        context.move_to(center_x - dx, center_y - dy);
        context.line_to(center_x + dx, center_y + dy);
        context.stroke();
    }

    context.set_text_align("center");
    context.set_text_baseline("middle");
    context.set_font("bold 36px 'Segoe UI', Roboto, system-ui, sans-serif");
    context.set_fill_style_str(ink);
    for (sector, label) in SECTOR_LABELS {
        let angle = face_angle(sector, rotation);
        context.save();
        let _ = context.translate(
            center_x + radius * LABEL_RADIUS * angle.cos(),
            center_y + radius * LABEL_RADIUS * angle.sin(),
        );
        let _ = context.rotate(angle + FRAC_PI_2);
        let _ = context.fill_text(label, 0.0, 0.0);
        context.restore();
    }

    if let Some(image) = prize.filter(|image| image.complete() && image.natural_width() > 0) {
        let angle = face_angle(PRIZE_SECTOR, rotation);
        context.save();
        let _ = context.translate(
            center_x + radius * PRIZE_RADIUS * angle.cos(),
            center_y + radius * PRIZE_RADIUS * angle.sin(),
        );
        let _ = context.rotate(angle + FRAC_PI_2);
        let _ = context.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            -PRIZE_SIZE / 2.0,
            -PRIZE_SIZE / 2.0,
            PRIZE_SIZE,
            PRIZE_SIZE,
        );
        context.restore();
    }

    // Hub
    context.begin_path();
    context.set_fill_style_str(if dark { "#2d3142" } else { "#8b5cf6" });
    let _ = context.arc(center_x, center_y, radius * 0.08, 0.0, 2.0 * PI);
    context.fill();

    // Pointer, fixed at the top and pointing down into the wheel
    let pointer_width = 20.0;
    let pointer_height = 30.0;
    context.begin_path();
    context.move_to(center_x, center_y - radius + 10.0);
    context.line_to(center_x - pointer_width, center_y - radius - pointer_height + 10.0);
    context.line_to(center_x + pointer_width, center_y - radius - pointer_height + 10.0);
    context.close_path();
    context.set_fill_style_str("#f59e0b");
    context.fill();
    context.set_stroke_style_str("#e69500");
    context.set_line_width(1.5);
    context.stroke();
}
