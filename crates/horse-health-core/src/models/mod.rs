//! Domain models for horse health records.

mod fields;
mod form;
mod horse;
mod record;

pub use fields::*;
pub use form::*;
pub use horse::*;
pub use record::*;
