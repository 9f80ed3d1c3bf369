mod handler;

pub use handler::{FALLBACK_RESPONSE, risky_endpoint};
