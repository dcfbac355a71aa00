pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod time;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::Error;
pub use models::RewriteService;
pub use source::HeadlineSource;
pub use types::{Article, Rewrite, RewrittenItem, DEGRADED_CATEGORY};

pub type Result<T> = std::result::Result<T, Error>;
