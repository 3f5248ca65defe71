//! Startup Training Bootstrap
//!
//! Loads the historical dataset, builds features with labels, and fits the
//! classifier before the service starts accepting requests. Any failure here
//! is fatal to startup.

use crate::settings::Settings;
use anyhow::Context;
use delay_classifier::DelayClassifier;
use feature_builder::{build_features, FlightRecord, FlightType};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// One row of the historical dataset; columns the pipeline does not consume
/// are ignored by the deserializer
#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "OPERA")]
    opera: String,
    #[serde(rename = "TIPOVUELO")]
    tipovuelo: String,
    #[serde(rename = "MES")]
    mes: u8,
    #[serde(rename = "Fecha-I")]
    fecha_i: String,
    #[serde(rename = "Fecha-O")]
    fecha_o: String,
}

impl DatasetRow {
    fn into_record(self) -> anyhow::Result<FlightRecord> {
        let flight_type = match self.tipovuelo.as_str() {
            "I" => FlightType::International,
            "N" => FlightType::National,
            other => anyhow::bail!("Unknown TIPOVUELO '{}' in dataset", other),
        };

        Ok(FlightRecord {
            airline: self.opera,
            flight_type,
            month: self.mes,
            scheduled_departure: Some(self.fecha_i),
            actual_departure: Some(self.fecha_o),
        })
    }
}

fn load_records(path: &Path) -> anyhow::Result<Vec<FlightRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open dataset at {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<DatasetRow>() {
        let row = row.context("Malformed dataset row")?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

/// Train the delay classifier from the configured historical dataset
pub fn train_from_dataset(settings: &Settings) -> anyhow::Result<DelayClassifier> {
    let records = load_records(Path::new(&settings.dataset_path))?;
    info!(
        "Loaded {} historical flights from {}",
        records.len(),
        settings.dataset_path
    );

    let high_season = records
        .iter()
        .filter(|r| matches!(r.is_high_season(), Ok(true)))
        .count();
    debug!(
        "Dataset profile: {}/{} flights scheduled in high season",
        high_season,
        records.len()
    );

    let (features, labels) = build_features(&records, true)?;
    let labels = labels.context("Label derivation returned no labels")?;

    let mut model = DelayClassifier::new(settings.training.to_config());
    model
        .fit(&features, &labels)
        .context("Failed to fit delay classifier")?;
    info!("Delay classifier fitted on {} samples", features.len());

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const DATASET_HEADER: &str = "Fecha-I,Vlo-I,Ori-I,Des-I,Emp-I,Fecha-O,Vlo-O,Ori-O,Des-O,Emp-O,DIA,MES,AÑO,DIANOM,TIPOVUELO,OPERA,SIGLAORI,SIGLADES";

    /// Temp dataset file removed on drop
    struct TempCsv {
        path: PathBuf,
    }

    impl TempCsv {
        fn new(name: &str, rows: &[&str]) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!("delay-pipeline-{}-{}.csv", std::process::id(), name));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "{}", DATASET_HEADER).unwrap();
            for row in rows {
                writeln!(file, "{}", row).unwrap();
            }
            Self { path }
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn row(opera: &str, tipovuelo: &str, mes: u8, scheduled: &str, actual: &str) -> String {
        format!(
            "{scheduled},100,SCL,LIM,XX,{actual},100,SCL,LIM,XX,1,{mes},2023,Lunes,{tipovuelo},{opera},Santiago,Lima"
        )
    }

    #[test]
    fn test_train_from_dataset() {
        let rows: Vec<String> = (0..10)
            .flat_map(|i| {
                vec![
                    row(
                        "Grupo LATAM",
                        "I",
                        7,
                        &format!("2023-07-{:02} 10:00:00", i + 1),
                        &format!("2023-07-{:02} 10:40:00", i + 1),
                    ),
                    row(
                        "Austral",
                        "N",
                        2,
                        &format!("2023-02-{:02} 08:00:00", i + 1),
                        &format!("2023-02-{:02} 08:05:00", i + 1),
                    ),
                ]
            })
            .collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let dataset = TempCsv::new("train", &row_refs);

        let mut settings = Settings::load().unwrap();
        settings.dataset_path = dataset.path.display().to_string();

        let model = train_from_dataset(&settings).unwrap();
        assert!(model.is_fitted());
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let mut settings = Settings::load().unwrap();
        settings.dataset_path = "/nonexistent/data.csv".to_string();
        assert!(train_from_dataset(&settings).is_err());
    }

    #[test]
    fn test_bad_timestamp_in_dataset_is_fatal() {
        let bad = row("Grupo LATAM", "I", 7, "07/01/2023 10:00", "2023-07-01 10:40:00");
        let dataset = TempCsv::new("bad-timestamp", &[bad.as_str()]);

        let mut settings = Settings::load().unwrap();
        settings.dataset_path = dataset.path.display().to_string();
        assert!(train_from_dataset(&settings).is_err());
    }
}
