//! Feature Vector Assembly

use crate::error::FeatureError;
use crate::record::{FlightRecord, FlightType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of feature slots the trained model consumes
pub const FEATURE_DIMENSION: usize = 10;

/// Column names of the model input, in slot order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "OPERA_Latin American Wings",
    "MES_7",
    "MES_10",
    "OPERA_Grupo LATAM",
    "MES_12",
    "TIPOVUELO_I",
    "MES_4",
    "MES_11",
    "OPERA_Sky Airline",
    "OPERA_Copa Air",
];

/// One-hot indicator backing a feature slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indicator {
    /// `OPERA_*`: airline equals the given name
    Airline(&'static str),
    /// `MES_*`: month equals the given value
    Month(u8),
    /// `TIPOVUELO_I`: flight is international
    International,
}

// Slot layout selected offline during model development. The order is the
// trained model's input contract and must match FEATURE_COLUMNS.
const FEATURE_SLOTS: [Indicator; FEATURE_DIMENSION] = [
    Indicator::Airline("Latin American Wings"),
    Indicator::Month(7),
    Indicator::Month(10),
    Indicator::Airline("Grupo LATAM"),
    Indicator::Month(12),
    Indicator::International,
    Indicator::Month(4),
    Indicator::Month(11),
    Indicator::Airline("Sky Airline"),
    Indicator::Airline("Copa Air"),
];

/// Fixed-width model input derived from one flight record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Indicator values in `FEATURE_COLUMNS` order, each 0.0 or 1.0
    pub values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Project one record onto the fixed slot contract
    ///
    /// Categories outside the contract contribute 0 to every slot; they are
    /// never an error.
    pub fn from_record(record: &FlightRecord) -> Self {
        let mut values = [0.0; FEATURE_DIMENSION];
        for (slot, value) in FEATURE_SLOTS.iter().zip(values.iter_mut()) {
            let hit = match slot {
                Indicator::Airline(name) => record.airline == *name,
                Indicator::Month(month) => record.month == *month,
                Indicator::International => record.flight_type == FlightType::International,
            };
            if hit {
                *value = 1.0;
            }
        }
        Self { values }
    }
}

/// Build feature vectors for a batch of records
///
/// With `with_labels` set, also derives the binary delay label per record
/// from its departure timestamps; records missing those timestamps fail with
/// [`FeatureError::MissingField`].
pub fn build_features(
    records: &[FlightRecord],
    with_labels: bool,
) -> Result<(Vec<FeatureVector>, Option<Vec<u8>>), FeatureError> {
    let features: Vec<FeatureVector> = records.iter().map(FeatureVector::from_record).collect();

    let labels = if with_labels {
        Some(
            records
                .iter()
                .map(FlightRecord::delay_label)
                .collect::<Result<Vec<u8>, FeatureError>>()?,
        )
    } else {
        None
    };

    debug!(
        "Built {} feature vectors (labels derived: {})",
        features.len(),
        with_labels
    );

    Ok((features, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contract_shape() {
        assert_eq!(FEATURE_COLUMNS.len(), FEATURE_DIMENSION);
        let record = FlightRecord::new("Avianca", FlightType::National, 7);
        assert_eq!(FeatureVector::from_record(&record).values.len(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_month_slot_only() {
        // Avianca is not a contract airline, N sets no flight-type slot, so
        // only MES_7 lights up.
        let record = FlightRecord::new("Avianca", FlightType::National, 7);
        let vector = FeatureVector::from_record(&record);
        assert_eq!(vector.values, [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_multiple_slots() {
        let record = FlightRecord::new("Grupo LATAM", FlightType::International, 12);
        let vector = FeatureVector::from_record(&record);
        // OPERA_Grupo LATAM, MES_12 and TIPOVUELO_I
        assert_eq!(vector.values, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unseen_categories_yield_all_zeros() {
        let record = FlightRecord::new("Andes Air", FlightType::National, 2);
        let vector = FeatureVector::from_record(&record);
        assert!(vector.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_build_features_without_labels() {
        let records = vec![
            FlightRecord::new("Sky Airline", FlightType::National, 4),
            FlightRecord::new("Copa Air", FlightType::International, 1),
        ];
        let (features, labels) = build_features(&records, false).unwrap();
        assert_eq!(features.len(), 2);
        assert!(labels.is_none());
        // No departure timestamps needed when labels are not requested.
        assert_eq!(features[0].values[6], 1.0); // MES_4
        assert_eq!(features[0].values[8], 1.0); // OPERA_Sky Airline
    }

    #[test]
    fn test_build_features_with_labels() {
        let mut delayed = FlightRecord::new("Grupo LATAM", FlightType::National, 1);
        delayed.scheduled_departure = Some("2023-01-01 10:00:00".to_string());
        delayed.actual_departure = Some("2023-01-01 10:40:00".to_string());

        let mut on_time = FlightRecord::new("Grupo LATAM", FlightType::National, 1);
        on_time.scheduled_departure = Some("2023-01-02 08:00:00".to_string());
        on_time.actual_departure = Some("2023-01-02 08:05:00".to_string());

        let (features, labels) = build_features(&[delayed, on_time], true).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(labels.unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_build_features_with_labels_requires_timestamps() {
        let records = vec![FlightRecord::new("Avianca", FlightType::National, 7)];
        match build_features(&records, true) {
            Err(FeatureError::MissingField(field)) => assert_eq!(field, "Fecha-I"),
            other => panic!("expected missing field error, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn feature_vectors_are_always_binary(
            airline in "[A-Za-z. ]{0,24}",
            month in 0u8..=13,
            international in any::<bool>(),
        ) {
            let flight_type = if international {
                FlightType::International
            } else {
                FlightType::National
            };
            let record = FlightRecord::new(airline, flight_type, month);
            let vector = FeatureVector::from_record(&record);

            prop_assert_eq!(vector.values.len(), FEATURE_DIMENSION);
            for &value in vector.values.iter() {
                prop_assert!(value == 0.0 || value == 1.0);
            }
        }

        #[test]
        fn national_flights_never_set_the_flight_type_slot(
            airline in "[A-Za-z ]{0,16}",
            month in 1u8..=12,
        ) {
            let record = FlightRecord::new(airline, FlightType::National, month);
            let vector = FeatureVector::from_record(&record);
            prop_assert_eq!(vector.values[5], 0.0); // TIPOVUELO_I
        }
    }
}
