pub mod kind;

pub use calx_error::Error;
