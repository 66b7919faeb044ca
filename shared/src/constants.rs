use std::f64::consts::PI;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3030";

pub const STATS_ENDPOINT: &str = "/stats";
pub const QUIZ_ENDPOINT: &str = "/quiz";
pub const WHEEL_ENDPOINT: &str = "/wheel";
pub const CHECKOUT_ENDPOINT: &str = "/checkout";

/// Storage key holding the raw bearer token.
pub const TOKEN_STORAGE_KEY: &str = "promo.userState";
/// Key used by earlier releases of the widgets, copied forward once on mount.
pub const LEGACY_TOKEN_STORAGE_KEY: &str = "quizToken";
pub const AUTH_SCHEME: &str = "UserState";

pub const WHEEL_CANVAS_SIZE: u32 = 600;
pub const WHEEL_SECTORS: usize = 6;
pub const SECTOR_WIDTH: f64 = 2.0 * PI / WHEEL_SECTORS as f64;
/// Jitter bound as a fraction of the sector width; must stay below one half.
pub const SPIN_JITTER_FRACTION: f64 = 0.4;
pub const MIN_EXTRA_TURNS: u32 = 3;
pub const MAX_EXTRA_TURNS: u32 = 5;
pub const SPIN_DURATION_MS: f64 = 5000.0;

pub const ALREADY_SPUN_NOTICE: &str = "You have already spun this wheel.";
pub const NETWORK_ERROR: &str = "Something went wrong. Please try again later.";
pub const INVALID_EMAIL_ERROR: &str = "Please enter a valid email address";
pub const CHECKOUT_REJECTED_ERROR: &str = "Your entry could not be registered.";
