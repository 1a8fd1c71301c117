mod client;
mod errors;
pub mod fetch;
pub mod request;
mod token;
pub mod types;

pub use self::client::{backoff_delay, CancelSource, CancelToken, Client, RetryPolicy};
pub use self::errors::Error;
pub use self::token::{StaticToken, TokenSource};
