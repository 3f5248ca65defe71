//! Flight Feature Builder
//!
//! Turns raw flight records into the fixed-width feature vectors consumed by
//! the delay classifier, with optional delay-label derivation for training.

mod calendar;
mod error;
mod features;
mod record;

pub use calendar::{is_high_season, period_of_day, PeriodOfDay};
pub use error::FeatureError;
pub use features::{build_features, FeatureVector, FEATURE_COLUMNS, FEATURE_DIMENSION};
pub use record::{FlightRecord, FlightType, DELAY_THRESHOLD_MINUTES};
