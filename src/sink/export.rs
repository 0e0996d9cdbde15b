use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PersistenceError;
use crate::sink::PersistSummary;

/// Spreadsheet tools need the byte-order mark to detect UTF-8.
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Writes each run to `<dir>/<file>`, replacing any earlier export.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub async fn write<R: Serialize>(
        &self,
        file_name: &str,
        records: &[R],
    ) -> Result<PersistSummary, PersistenceError> {
        let bytes = encode(records)?;
        let path = self.path_for(file_name);
        write_file(&path, bytes).await?;

        tracing::info!("Wrote {} records to {}", records.len(), path.display());
        Ok(PersistSummary {
            written: records.len(),
            failed: 0,
        })
    }
}

/// BOM, header row from the record's field names, one row per record.
pub fn encode<R: Serialize>(records: &[R]) -> Result<Vec<u8>, PersistenceError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.as_bytes().to_vec());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| PersistenceError::Csv(e.into_error().into()))
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<(), PersistenceError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| PersistenceError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::{ListingRecord, Salary};

    fn listing(title: &str, salary: Salary) -> ListingRecord {
        ListingRecord {
            company: "에이콤, 주식회사".to_string(),
            title: title.to_string(),
            detail_link: "https://www.saramin.co.kr/zf_user/jobs/relay/view?rec_idx=1".to_string(),
            location: "서울".to_string(),
            experience: String::new(),
            education: String::new(),
            employment_type: "정규직".to_string(),
            deadline: "상시채용".to_string(),
            sector: None,
            salary,
        }
    }

    #[test]
    fn encodes_bom_header_and_rows() {
        let bytes = encode(&[
            listing("백엔드", Salary::Unavailable),
            listing("프론트엔드", Salary::Value("3000".to_string())),
        ])
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with(UTF8_BOM));
        let mut lines = text.trim_start_matches(UTF8_BOM).lines();
        assert_eq!(
            lines.next(),
            Some("회사명,제목,공고링크,지역,경력,학력,마감일,고용형태,연봉정보")
        );
        assert_eq!(
            lines.next(),
            Some("\"에이콤, 주식회사\",백엔드,https://www.saramin.co.kr/zf_user/jobs/relay/view?rec_idx=1,서울,,,상시채용,정규직,정보 없음")
        );
        assert!(lines.next().unwrap().ends_with(",3000"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn recruit_layout_has_sector_after_deadline() {
        let mut record = listing("백엔드", Salary::Unspecified);
        record.sector = Some("Java, Spring".to_string());
        let text = String::from_utf8(encode(&[record]).unwrap()).unwrap();

        let mut lines = text.trim_start_matches(UTF8_BOM).lines();
        assert_eq!(
            lines.next(),
            Some("회사명,제목,공고링크,지역,경력,학력,고용형태,마감일,직무분야,연봉정보")
        );
        assert!(
            lines
                .next()
                .unwrap()
                .ends_with(",서울,,,정규직,상시채용,\"Java, Spring\",회사내규에 따름")
        );
    }

    #[tokio::test]
    async fn writes_to_fixed_path_in_dir() {
        let dir = std::env::temp_dir().join(format!("jobboard-csv-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let sink = CsvSink::new(&dir);

        let summary = sink
            .write("saramin_jobs.csv", &[listing("백엔드", Salary::Unspecified)])
            .await
            .unwrap();
        assert_eq!(summary.written, 1);

        let written = tokio::fs::read_to_string(dir.join("saramin_jobs.csv"))
            .await
            .unwrap();
        assert!(written.starts_with(UTF8_BOM));
        assert!(written.contains("회사내규에 따름"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn unwritable_dir_is_a_persistence_error() {
        let dir = std::env::temp_dir().join(format!("jobboard-missing-{}", uuid::Uuid::new_v4()));
        let sink = CsvSink::new(&dir);

        let err = sink
            .write("saramin_jobs.csv", &[listing("백엔드", Salary::Unspecified)])
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
