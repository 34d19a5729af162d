use crate::adapters::csv_codec;
use crate::core::assignment::{AssignmentConfig, AssignmentEngine};
use crate::core::formatter;
use crate::core::{ConfigProvider, ExchangeInput, ExchangeResult, Pipeline, Storage};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Reads the roster and history through `S`, assigns, and writes the report
/// and the grown history log back.
pub struct ExchangePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    engine: AssignmentEngine,
}

impl<S: Storage, C: ConfigProvider> ExchangePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let engine = AssignmentEngine::new(AssignmentConfig {
            max_attempts: config.max_attempts(),
        });
        Self {
            storage,
            config,
            engine,
        }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed() {
            Some(seed) => {
                tracing::debug!("Using fixed RNG seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExchangePipeline<S, C> {
    async fn extract(&self) -> Result<ExchangeInput> {
        tracing::debug!("Reading participants from {}", self.config.participants_file());
        let data = self
            .storage
            .read_file(self.config.participants_file())
            .await?;
        let participants = csv_codec::decode_participants(&data)?;

        let history_log = match self
            .storage
            .read_file_if_exists(self.config.history_file())
            .await?
        {
            Some(data) => csv_codec::decode_history(&data)?,
            None => {
                tracing::info!(
                    "No history file at {}, starting with empty history",
                    self.config.history_file()
                );
                Vec::new()
            }
        };

        Ok(ExchangeInput {
            participants,
            history_log,
        })
    }

    async fn transform(&self, input: ExchangeInput) -> Result<ExchangeResult> {
        let mut history = csv_codec::history_from_entries(&input.history_log);
        tracing::debug!(
            "History holds {} pairings for {} givers",
            history.pair_count(),
            history.giver_count()
        );

        let mut rng = self.rng();
        let assignment = self
            .engine
            .assign_with_rng(&input.participants, &history, &mut rng)?;
        assignment.verify(&input.participants, &history)?;

        let report = formatter::format_assignment(&assignment, &input.participants)?;

        let history_entries_added = history.merge(&assignment);
        tracing::debug!("Merged {} new pairings into history", history_entries_added);

        let new_entries = formatter::history_entries(&report, &self.config.period());
        let history_log = csv_codec::append_history(input.history_log, new_entries);

        Ok(ExchangeResult {
            assignment,
            report,
            history_log,
            history_entries_added,
        })
    }

    /// The history is written before the report, so a report never exists
    /// without its pairings on record. If the report write then fails, the
    /// history is put back to the rows it had before this period.
    async fn load(&self, result: ExchangeResult) -> Result<String> {
        let output_file = self.config.output_file();
        let history_file = self.config.history_file();

        let report = csv_codec::encode_report(&result.report, self.config.output_format())?;
        let history = csv_codec::encode_history(&result.history_log)?;
        let previous_len = result
            .history_log
            .len()
            .saturating_sub(result.history_entries_added);
        let previous_history = csv_codec::encode_history(&result.history_log[..previous_len])?;

        tracing::debug!(
            "Writing history ({} rows, {} new) to {}",
            result.history_log.len(),
            result.history_entries_added,
            history_file
        );
        self.storage.write_file(history_file, &history).await?;

        tracing::debug!("Writing report ({} bytes) to {}", report.len(), output_file);
        if let Err(e) = self.storage.write_file(output_file, &report).await {
            tracing::error!("Report write failed, restoring {}: {}", history_file, e);
            if let Err(restore) = self.storage.write_file(history_file, &previous_history).await {
                tracing::error!("Could not restore {}: {}", history_file, restore);
            }
            return Err(e);
        }

        Ok(output_file.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OutputFormat;
    use crate::utils::error::SantaError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const PARTICIPANTS: &str = "Employee_Name,Employee_EmailID\n\
                                Alice,alice@example.com\n\
                                Bob,bob@example.com\n\
                                Charlie,charlie@example.com\n";

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        failing_path: Option<&'static str>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
                failing_path: None,
            }
        }

        fn failing_on(path: &'static str) -> Self {
            Self {
                failing_path: Some(path),
                ..Self::new()
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SantaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn read_file_if_exists(&self, path: &str) -> Result<Option<Vec<u8>>> {
            let files = self.files.lock().await;
            Ok(files.get(path).cloned())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.failing_path == Some(path) {
                return Err(SantaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_format: OutputFormat,
        max_attempts: usize,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                output_format: OutputFormat::Csv,
                max_attempts: 100,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn participants_file(&self) -> &str {
            "employees.csv"
        }

        fn history_file(&self) -> &str {
            "history.csv"
        }

        fn output_file(&self) -> &str {
            "assignments.csv"
        }

        fn output_format(&self) -> OutputFormat {
            self.output_format
        }

        fn max_attempts(&self) -> usize {
            self.max_attempts
        }

        fn seed(&self) -> Option<u64> {
            Some(42)
        }

        fn period(&self) -> String {
            "2026".to_string()
        }
    }

    #[tokio::test]
    async fn test_extract_without_history_file() {
        let storage = MockStorage::new();
        storage.put("employees.csv", PARTICIPANTS).await;
        let pipeline = ExchangePipeline::new(storage, MockConfig::new());

        let input = pipeline.extract().await.unwrap();

        assert_eq!(input.participants.len(), 3);
        assert!(input.history_log.is_empty());
    }

    #[tokio::test]
    async fn test_extract_missing_participants_is_io_error() {
        let pipeline = ExchangePipeline::new(MockStorage::new(), MockConfig::new());

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, SantaError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_avoids_history_and_appends_it() {
        let storage = MockStorage::new();
        storage.put("employees.csv", PARTICIPANTS).await;
        storage
            .put(
                "history.csv",
                "Employee_EmailID,Secret_Child_EmailID\n\
                 alice@example.com,bob@example.com\n\
                 bob@example.com,charlie@example.com\n\
                 charlie@example.com,alice@example.com\n",
            )
            .await;
        let pipeline = ExchangePipeline::new(storage, MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.assignment.recipient_of("alice@example.com"), Some("charlie@example.com"));
        assert_eq!(result.assignment.recipient_of("bob@example.com"), Some("alice@example.com"));
        assert_eq!(result.assignment.recipient_of("charlie@example.com"), Some("bob@example.com"));
        assert_eq!(result.report.len(), 3);
        assert_eq!(result.history_log.len(), 6);
        assert_eq!(result.history_entries_added, 3);
        assert_eq!(result.history_log[5].period.as_deref(), Some("2026"));
    }

    #[tokio::test]
    async fn test_transform_single_participant_fails_fast() {
        let storage = MockStorage::new();
        storage
            .put("employees.csv", "Employee_Name,Employee_EmailID\nAlice,alice@example.com\n")
            .await;
        let pipeline = ExchangePipeline::new(storage, MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();

        assert!(matches!(err, SantaError::InputError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_report_and_history() {
        let storage = MockStorage::new();
        storage.put("employees.csv", PARTICIPANTS).await;
        let pipeline = ExchangePipeline::new(storage.clone(), MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "assignments.csv");

        let report = storage.get_file("assignments.csv").await.unwrap();
        let report = String::from_utf8(report).unwrap();
        assert_eq!(report.lines().count(), 4); // header + 3 pairings

        let history = storage.get_file("history.csv").await.unwrap();
        let entries = csv_codec::decode_history(&history).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_load_json_report() {
        let storage = MockStorage::new();
        storage.put("employees.csv", PARTICIPANTS).await;
        let mut config = MockConfig::new();
        config.output_format = OutputFormat::Json;
        let pipeline = ExchangePipeline::new(storage.clone(), config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        pipeline.load(result).await.unwrap();

        let report = storage.get_file("assignments.csv").await.unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&report).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_same_seed_gives_same_assignment() {
        let storage = MockStorage::new();
        storage
            .put(
                "employees.csv",
                "Employee_Name,Employee_EmailID\n\
                 A,a@example.com\nB,b@example.com\nC,c@example.com\n\
                 D,d@example.com\nE,e@example.com\nF,f@example.com\n",
            )
            .await;
        let pipeline = ExchangePipeline::new(storage, MockConfig::new());

        let first = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();
        let second = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();

        assert_eq!(first.assignment, second.assignment);
    }

    const CYCLE_HISTORY: &str = "Employee_EmailID,Secret_Child_EmailID\n\
                                 alice@example.com,bob@example.com\n\
                                 bob@example.com,charlie@example.com\n\
                                 charlie@example.com,alice@example.com\n";

    fn pairs_of(history: &[u8]) -> Vec<(String, String)> {
        csv_codec::decode_history(history)
            .unwrap()
            .into_iter()
            .map(|e| (e.giver_id, e.recipient_id))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_history_write_leaves_no_report() {
        let storage = MockStorage::failing_on("history.csv");
        storage.put("employees.csv", PARTICIPANTS).await;
        storage.put("history.csv", CYCLE_HISTORY).await;
        let pipeline = ExchangePipeline::new(storage.clone(), MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(err, SantaError::IoError(_)));
        assert!(storage.get_file("assignments.csv").await.is_none());
        assert_eq!(
            storage.get_file("history.csv").await.unwrap(),
            CYCLE_HISTORY.as_bytes()
        );
    }

    #[tokio::test]
    async fn test_failed_report_write_restores_history() {
        let storage = MockStorage::failing_on("assignments.csv");
        storage.put("employees.csv", PARTICIPANTS).await;
        storage.put("history.csv", CYCLE_HISTORY).await;
        let pipeline = ExchangePipeline::new(storage.clone(), MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(err, SantaError::IoError(_)));
        assert!(storage.get_file("assignments.csv").await.is_none());
        let history = storage.get_file("history.csv").await.unwrap();
        assert_eq!(pairs_of(&history), pairs_of(CYCLE_HISTORY.as_bytes()));
    }

    #[tokio::test]
    async fn test_written_report_pairings_are_all_in_history() {
        let storage = MockStorage::new();
        storage.put("employees.csv", PARTICIPANTS).await;
        storage.put("history.csv", CYCLE_HISTORY).await;
        let pipeline = ExchangePipeline::new(storage.clone(), MockConfig::new());

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        pipeline.load(result).await.unwrap();

        let report = storage.get_file("assignments.csv").await.unwrap();
        let history = pairs_of(&storage.get_file("history.csv").await.unwrap());
        for (giver, recipient) in pairs_of(&report) {
            assert!(history.contains(&(giver, recipient)));
        }
        assert_eq!(history.len(), 6);
    }
}
