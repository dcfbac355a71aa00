pub mod manager;
pub mod newsapi;

pub use manager::{Briefing, HeadlineManager, Outcome, Policy, StatusReport};
pub use newsapi::{NewsApiSource, SourceConfig};

pub mod prelude {
    pub use super::manager::{Briefing, HeadlineManager, Outcome, Policy};
    pub use super::newsapi::{NewsApiSource, SourceConfig};
    pub use hl_core::{Article, Error, HeadlineSource, Result};
}
