//! Player and unit ratings.
pub mod composite;
pub mod effective;
pub mod weights;

pub use composite::{RatedPlayer, TeamCompositeRatings, UnitKind, UnitRating, weak_link_penalty};
pub use effective::{
    EffectiveRatingCalculator, RatingBreakdown, RatingContext, SchemeAssignment,
    calculate_weather_modifier,
};
pub use weights::PositionWeightTables;
