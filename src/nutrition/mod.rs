pub mod math;
pub mod targets;

pub use math::{aggregate, scale, Macros, MealTotals, Portion};
pub use targets::{recommended_intake, BodyProfile, DailyTargets};
