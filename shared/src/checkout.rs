use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use validator::ValidationError;

use crate::api::{ApiClient, ApiError, CheckoutRequest, Lookup, Transport};
use crate::flight::InFlight;
use crate::token::{KeyValueStorage, TokenStore};
use crate::validation::{parse_codes, validate_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Accepted { points: u32 },
    Rejected,
}

#[derive(Debug)]
pub enum CheckoutError {
    Busy,
    InvalidEmail(ValidationError),
    Api(ApiError),
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "A submission is already in progress"),
            Self::InvalidEmail(e) => write!(f, "Invalid email: {}", e.code),
            Self::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CheckoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for CheckoutError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

pub struct Checkout<T, S> {
    api: Rc<ApiClient<T>>,
    tokens: Rc<TokenStore<S>>,
    in_flight: Cell<bool>,
}

impl<T: Transport, S: KeyValueStorage> Checkout<T, S> {
    pub fn new(api: Rc<ApiClient<T>>, tokens: Rc<TokenStore<S>>) -> Self {
        Self {
            api,
            tokens,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub async fn submit(
        &self,
        codes: &str,
        email: &str,
        consent: bool,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        validate_email(email).map_err(CheckoutError::InvalidEmail)?;

        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            return Err(CheckoutError::Busy);
        };

        let request = CheckoutRequest {
            codes: parse_codes(codes),
            email: email.trim().to_string(),
            consent,
        };
        let authorization = self.tokens.get();

        match self.api.checkout(&request, authorization.as_deref()).await? {
            Lookup::Found(points) => {
                log::info!("checkout registered {} points", points);
                Ok(CheckoutOutcome::Accepted { points })
            }
            Lookup::NotFound => {
                log::info!("checkout rejected by the scoring service");
                Ok(CheckoutOutcome::Rejected)
            }
        }
    }
}
