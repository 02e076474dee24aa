mod loader;
mod sanitize;

pub use loader::{FetchError, OpenTdbClient};
pub use sanitize::decode_text;
