//! Hand-rolled number-to-text conversion used by the emitter.

mod dtoa;
mod itoa;

pub use dtoa::{dtoa, F64_BUFFER_LEN};
pub use itoa::{i32toa, I32_BUFFER_LEN};
