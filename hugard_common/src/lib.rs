mod cents;
mod helpers;
mod secret;

pub use cents::{Cents, CentsConversionError, CURRENCY_CODE, MINIMUM_CHARGE};
pub use helpers::{parse_boolean_flag, sanitize_display_name};
pub use secret::Secret;
