use crate::config::IngestionOptions;
use crate::error::IngestError;
use crate::extractor::{extract_document, PdfExtractor};
use crate::models::PdfDocument;
use crate::traits::VectorIndex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All regular files under `folder` with a `.pdf` extension, matched
/// case-insensitively. Sorted so the submission order is deterministic.
pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort_unstable();
    files
}

pub struct FailedExtraction {
    pub path: PathBuf,
    pub reason: String,
}

pub struct IngestionReport {
    /// Documents submitted to the store, in discovery order. Files that
    /// failed extraction are included with sentinel content.
    pub documents: Vec<PdfDocument>,
    pub failed_extractions: Vec<FailedExtraction>,
    pub batches_submitted: usize,
}

/// Walks `folder`, extracts every discovered PDF, and submits the
/// documents to the store in fixed-size batches.
///
/// Per-file extraction failures never abort the run; they are recorded
/// in the report and the sentinel document is still submitted. A missing
/// or non-directory root and any store failure propagate: when a batch
/// insert fails, earlier batches stay stored and later ones are not
/// attempted.
pub async fn ingest_folder<S: VectorIndex>(
    store: &S,
    extractor: &dyn PdfExtractor,
    folder: &Path,
    options: &IngestionOptions,
) -> Result<IngestionReport, IngestError> {
    let metadata = std::fs::metadata(folder)?;
    if !metadata.is_dir() {
        return Err(IngestError::NotADirectory(folder.display().to_string()));
    }

    let files = discover_pdf_files(folder);

    let mut documents = Vec::with_capacity(files.len());
    let mut failed_extractions = Vec::new();

    for path in files {
        let extracted = extract_document(extractor, &path, options.max_text_length);
        if let Some(reason) = extracted.failure {
            failed_extractions.push(FailedExtraction { path, reason });
        }
        documents.push(extracted.document);
    }

    let batch_size = options.batch_size.max(1);
    let mut batches_submitted = 0;
    for batch in documents.chunks(batch_size) {
        store.insert_documents(batch).await?;
        batches_submitted += 1;
    }

    Ok(IngestionReport {
        documents,
        failed_extractions,
        batches_submitted,
    })
}

#[cfg(test)]
mod tests {
    use super::{discover_pdf_files, ingest_folder};
    use crate::config::IngestionOptions;
    use crate::error::{IngestError, StoreError};
    use crate::extractor::{PdfExtractor, PARSE_FAILURE_TEXT};
    use crate::models::{PdfDocument, SearchHit};
    use crate::traits::VectorIndex;
    use async_trait::async_trait;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Extracts canned text per file name; files named `broken*` fail.
    struct FakeExtractor;

    impl PdfExtractor for FakeExtractor {
        fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
            let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
            if name.starts_with("broken") {
                Err(IngestError::PdfParse(format!("unreadable: {name}")))
            } else {
                Ok("hello world foo bar".to_string())
            }
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        batches: Mutex<Vec<Vec<PdfDocument>>>,
    }

    #[async_trait]
    impl VectorIndex for RecordingStore {
        async fn ensure_collection(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_documents(&self, documents: &[PdfDocument]) -> Result<(), StoreError> {
            self.batches
                .lock()
                .expect("batch log should not be poisoned")
                .push(documents.to_vec());
            Ok(())
        }

        async fn near_text(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<SearchHit>, StoreError> {
            Ok(Vec::new())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl VectorIndex for FailingStore {
        async fn ensure_collection(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert_documents(&self, _documents: &[PdfDocument]) -> Result<(), StoreError> {
            Err(StoreError::Submission("store is down".to_string()))
        }

        async fn near_text(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<SearchHit>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn discovery_is_recursive_and_sorted() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        let nested = base.join("nested");
        fs::create_dir(&nested)?;

        File::create(base.join("b.pdf")).and_then(|mut file| file.write_all(b"%PDF-1.4"))?;
        File::create(nested.join("a.PDF")).and_then(|mut file| file.write_all(b"%PDF-1.4"))?;
        File::create(base.join("notes.txt")).and_then(|mut file| file.write_all(b"text"))?;

        let files = discover_pdf_files(base);
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_files_become_sentinel_documents_in_the_same_batch(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.pdf"), b"%PDF-1.4")?;
        fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4")?;

        let store = RecordingStore::default();
        let report = ingest_folder(
            &store,
            &FakeExtractor,
            dir.path(),
            &IngestionOptions::default(),
        )
        .await?;

        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.batches_submitted, 1);
        assert_eq!(report.failed_extractions.len(), 1);

        let batches = store.batches.lock().expect("batch log");
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].filename, "a.pdf");
        assert_eq!(batches[0][0].content, "hello world foo bar");
        assert_eq!(batches[0][1].filename, "broken.pdf");
        assert_eq!(batches[0][1].content, PARSE_FAILURE_TEXT);
        Ok(())
    }

    #[tokio::test]
    async fn documents_are_submitted_in_fixed_size_batches(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        for index in 0..25 {
            fs::write(dir.path().join(format!("doc{index:02}.pdf")), b"%PDF-1.4")?;
        }

        let store = RecordingStore::default();
        let report = ingest_folder(
            &store,
            &FakeExtractor,
            dir.path(),
            &IngestionOptions::default(),
        )
        .await?;

        assert_eq!(report.documents.len(), 25);
        assert_eq!(report.batches_submitted, 3);

        let batches = store.batches.lock().expect("batch log");
        assert_eq!(batches[0].len(), 10);
        assert_eq!(batches[1].len(), 10);
        assert_eq!(batches[2].len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn empty_folder_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecordingStore::default();

        let report = ingest_folder(
            &store,
            &FakeExtractor,
            dir.path(),
            &IngestionOptions::default(),
        )
        .await?;

        assert_eq!(report.documents.len(), 0);
        assert_eq!(report.batches_submitted, 0);
        Ok(())
    }

    #[tokio::test]
    async fn non_directory_root_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("not-a-dir.pdf");
        fs::write(&file_path, b"%PDF-1.4")?;

        let store = RecordingStore::default();
        let result = ingest_folder(
            &store,
            &FakeExtractor,
            &file_path,
            &IngestionOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(IngestError::NotADirectory(_))));
        Ok(())
    }

    #[tokio::test]
    async fn missing_root_is_rejected() {
        let store = RecordingStore::default();
        let result = ingest_folder(
            &store,
            &FakeExtractor,
            Path::new("/nonexistent/folder"),
            &IngestionOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(IngestError::Io(_))));
    }

    #[tokio::test]
    async fn submission_failure_propagates() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.pdf"), b"%PDF-1.4")?;

        let result = ingest_folder(
            &FailingStore,
            &FakeExtractor,
            dir.path(),
            &IngestionOptions::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(IngestError::Store(StoreError::Submission(_)))
        ));
        Ok(())
    }
}
