pub mod checkout_form;
pub mod points_badge;
pub mod prize_wheel;
pub mod quiz_popup;

pub use checkout_form::{CheckoutForm, CheckoutFormProps};
pub use points_badge::{PointsBadge, PointsBadgeProps};
pub use prize_wheel::{PrizeWheel, PrizeWheelProps};
pub use quiz_popup::{QuizPopup, QuizPopupProps};
