use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use num_bigint::BigInt;
use serde_json::Value;
use tracing::{info, warn};

use crate::case::CaseProcessor;
use crate::document::TestCase;
use crate::error::{DocumentError, ReconstructError, ReconstructResult};

/// Where raw test-case documents come from.
pub trait DocumentSource {
    fn load(&self, id: &str) -> Result<Value, DocumentError>;
}

/// Reads JSON files, relative to `root` when one is set.
#[derive(Clone, Debug, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        FileSource { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FileSource {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(id),
            None => Path::new(id).to_path_buf(),
        }
    }
}

impl DocumentSource for FileSource {
    fn load(&self, id: &str) -> Result<Value, DocumentError> {
        let path = self.resolve(id);
        let text = fs::read_to_string(&path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Documents held in memory under a name.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, document: Value) {
        self.documents.insert(id.into(), document);
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, id: &str) -> Result<Value, DocumentError> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }
}

/// Runs many test cases, one failure never stopping the rest.
#[derive(Clone, Debug, Default)]
pub struct BatchRunner {
    processor: CaseProcessor,
}

impl BatchRunner {
    pub fn new(processor: CaseProcessor) -> Self {
        BatchRunner { processor }
    }

    pub fn reconstruct(&self, document: &Value) -> ReconstructResult<BigInt> {
        let case = TestCase::from_value(document)?;
        self.processor.process(&case)
    }

    pub fn reconstruct_all(&self, documents: &[Value]) -> Vec<ReconstructResult<BigInt>> {
        documents.iter().map(|doc| self.reconstruct(doc)).collect()
    }

    /// One formatted line per document, in input order.
    pub fn run_all(&self, documents: &[Value]) -> Vec<String> {
        format_reports(&self.reconstruct_all(documents))
    }

    /// Loads every identifier through `source`; load errors count against
    /// that case only.
    pub fn run_sources<S, I>(&self, source: &S, ids: I) -> Vec<String>
    where
        S: DocumentSource + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let results: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                info!(id, "processing test case");
                source
                    .load(id)
                    .map_err(ReconstructError::from)
                    .and_then(|doc| self.reconstruct(&doc))
            })
            .collect();
        format_reports(&results)
    }
}

/// `index` is 1-based.
pub fn format_report(index: usize, result: &ReconstructResult<BigInt>) -> String {
    match result {
        Ok(secret) => format!("Test Case {index} Secret (c): {secret}"),
        Err(e) => {
            warn!(index, error = %e, "test case failed");
            format!("Test Case {index} Error: {e}")
        }
    }
}

pub fn format_reports(results: &[ReconstructResult<BigInt>]) -> Vec<String> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| format_report(i + 1, result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        // f(x) = 7 + 3x
        json!({
            "keys": { "n": 3, "k": 2 },
            "1": { "base": "10", "value": "10" },
            "2": { "base": "16", "value": "d" },
            "3": { "base": "2", "value": "10000" }
        })
    }

    #[test]
    fn test_run_all_isolates_failures() {
        let documents = vec![valid_document(), json!({ "keys": { "n": 1, "k": 2 } })];
        let results = BatchRunner::default().run_all(&documents);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "Test Case 1 Secret (c): 7");
        assert_eq!(
            results[1],
            "Test Case 2 Error: invalid input: n (1) must be greater than or equal to k (2)"
        );
    }

    #[test]
    fn test_failure_first_does_not_abort() {
        let documents = vec![json!("not a document"), valid_document()];
        let results = BatchRunner::default().run_all(&documents);
        assert_eq!(
            results,
            vec![
                "Test Case 1 Error: document is not a JSON object".to_string(),
                "Test Case 2 Secret (c): 7".to_string(),
            ]
        );
    }

    #[test]
    fn test_threshold_error_wins_over_bad_share_entry() {
        let documents = vec![
            json!({ "keys": { "n": 1, "k": 2 }, "1": { "base": "ten", "value": "5" } }),
            json!({ "keys": { "n": 1, "k": 2 }, "1.5": { "base": 10, "value": "5" } }),
            json!({ "keys": { "n": 1, "k": 2 }, "1": { "base": 10, "value": [5] } }),
        ];
        let expected = "invalid input: n (1) must be greater than or equal to k (2)";
        let results = BatchRunner::default().run_all(&documents);
        assert_eq!(results.len(), 3);
        for (i, line) in results.iter().enumerate() {
            assert_eq!(line, &format!("Test Case {} Error: {expected}", i + 1));
        }
    }

    #[test]
    fn test_reconstruct_all_keeps_structured_results() {
        let documents = vec![valid_document(), json!({})];
        let results = BatchRunner::default().reconstruct_all(&documents);
        assert_eq!(results[0].as_ref().unwrap(), &BigInt::from(7));
        assert!(matches!(
            results[1],
            Err(ReconstructError::Document(DocumentError::MissingKeys))
        ));
    }

    #[test]
    fn test_run_sources_with_missing_document() {
        let mut source = MemorySource::new();
        source.insert("good", valid_document());
        let results = BatchRunner::default().run_sources(&source, ["missing", "good"]);
        assert_eq!(
            results,
            vec![
                "Test Case 1 Error: no document named \"missing\"".to_string(),
                "Test Case 2 Secret (c): 7".to_string(),
            ]
        );
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("case.json"),
            serde_json::to_string(&valid_document()).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ \"keys\": ").unwrap();

        let source = FileSource::with_root(dir.path());
        let results =
            BatchRunner::default().run_sources(&source, ["case.json", "broken.json", "absent.json"]);
        assert_eq!(results[0], "Test Case 1 Secret (c): 7");
        assert!(results[1].starts_with("Test Case 2 Error: malformed JSON"));
        assert!(results[2].starts_with("Test Case 3 Error: failed to read"));
    }
}
