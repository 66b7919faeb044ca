pub mod animation;
pub mod api;
pub mod checkout;
pub mod constants;
mod flight;
pub mod points;
pub mod quiz;
pub mod token;
pub mod validation;
pub mod wheel;

#[cfg(test)]
mod testing;
