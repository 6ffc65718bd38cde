// Alert rules applied to window metrics
pub mod recommendation;

pub use recommendation::{recommend, round_to_cents, RecommendationRule};
