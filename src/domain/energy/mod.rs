// Energy readings and the insights derived from them
pub mod types;

pub use types::{Insight, Reading, Recommendation, RecommendationKind, parse_timestamp};
