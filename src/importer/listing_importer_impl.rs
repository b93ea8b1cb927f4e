// ==========================================
// 房源导入系统 - 房源导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 初始化去重索引 → 逐行校验 → 去重 → 暂存 → 单次提交 → 批次记录
// 红线: 行按文件顺序处理；提交在最后一行之后恰好一次
// ==========================================

use crate::domain::{AcceptedRow, ImportBatch, ImportReport, Listing};
use crate::importer::address_resolver::AddressResolver;
use crate::importer::conflict_handler::DedupIndex;
use crate::importer::error::ImportResult;
use crate::importer::listing_importer_trait::{
    AddressDirectory, DataCleaner, FileParser, ListingImporter,
};
use crate::importer::row_validator::{RowValidator, RowVerdict};
use crate::repository::ListingImportRepository;
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ListingImporterImpl - 房源导入器实现
// ==========================================
pub struct ListingImporterImpl<R, D>
where
    R: ListingImportRepository,
    D: AddressDirectory,
{
    // 数据访问层
    import_repo: R,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    data_cleaner: Box<dyn DataCleaner>,
    resolver: AddressResolver<D>,
}

impl<R, D> ListingImporterImpl<R, D>
where
    R: ListingImportRepository,
    D: AddressDirectory,
{
    /// 创建新的 ListingImporter 实例
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - file_parser: 文件解析器
    /// - data_cleaner: 字段清洗器
    /// - directory: 街道目录（地址纠正）
    pub fn new(
        import_repo: R,
        file_parser: Box<dyn FileParser>,
        data_cleaner: Box<dyn DataCleaner>,
        directory: D,
    ) -> Self {
        Self {
            import_repo,
            file_parser,
            data_cleaner,
            resolver: AddressResolver::new(directory),
        }
    }

    pub fn repository(&self) -> &R {
        &self.import_repo
    }

    pub fn resolver(&self) -> &AddressResolver<D> {
        &self.resolver
    }
}

#[async_trait::async_trait]
impl<R, D> ListingImporter for ListingImporterImpl<R, D>
where
    R: ListingImportRepository + Send + Sync,
    D: AddressDirectory + Send + Sync,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let path = file_path.as_ref();
        let file_path_str = path.display().to_string();
        info!(batch_id = %batch_id, file_path = %file_path_str, "开始导入房源数据");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = self.file_parser.parse_to_raw_rows(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();
        info!(total_rows = total_rows, "文件解析完成");

        // === 步骤 2: 以已落库房源初始化去重索引 ===
        debug!("步骤 2: 加载已落库房源");
        let existing = self.import_repo.find_all_listings().await?;
        let mut dedup_index = DedupIndex::seed(&existing);
        debug!(existing = existing.len(), keys = dedup_index.len(), "去重索引初始化完成");

        // === 步骤 3: 逐行校验 + 去重 ===
        debug!("步骤 3: 逐行校验");
        let validator = RowValidator::new(self.data_cleaner.as_ref(), &self.resolver);
        let mut staged: Vec<Listing> = Vec::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut duplicate_rows = 0usize;
        let mut skipped_rows = 0usize;

        for row in &raw_rows {
            match validator.validate(row).await {
                RowVerdict::Skipped => skipped_rows += 1,
                RowVerdict::Rejected(rejection) => {
                    warn!(
                        row_number = rejection.row_number,
                        reasons = %rejection.reasons(),
                        "行校验失败"
                    );
                    rejected.push(rejection);
                }
                RowVerdict::Valid(listing) => {
                    if !dedup_index.check_and_insert(&listing) {
                        debug!(row_number = row.line_number, key = %listing.dedup_key(), "重复房源，跳过");
                        duplicate_rows += 1;
                        continue;
                    }
                    accepted.push(AcceptedRow {
                        row_number: row.line_number,
                        raw_data: row.joined(),
                        corrected_data: listing.to_string(),
                    });
                    staged.push(listing);
                }
            }
        }
        info!(
            accepted = accepted.len(),
            rejected = rejected.len(),
            duplicates = duplicate_rows,
            skipped = skipped_rows,
            "逐行校验完成"
        );

        // === 步骤 4: 单事务提交 ===
        debug!("步骤 4: 提交暂存房源");
        let inserted = self.import_repo.batch_insert_listings(staged).await?;
        info!(count = inserted, "房源提交完成");

        // === 步骤 5: 记录批次信息 ===
        let elapsed = start_time.elapsed();
        let report_json = json!({
            "accepted": &accepted,
            "rejected": &rejected,
        });
        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            file_path: Some(file_path_str.clone()),
            total_rows: total_rows as i32,
            accepted_rows: accepted.len() as i32,
            rejected_rows: rejected.len() as i32,
            duplicate_rows: duplicate_rows as i32,
            skipped_rows: skipped_rows as i32,
            imported_at: Some(Utc::now()),
            elapsed_ms: Some(elapsed.as_millis() as i32),
            report_json: Some(serde_json::to_string(&report_json)?),
        };
        self.import_repo.insert_batch(batch.clone()).await?;

        info!(
            batch_id = %batch_id,
            file_path = %file_path_str,
            accepted = accepted.len(),
            rejected = rejected.len(),
            duplicates = duplicate_rows,
            elapsed_ms = elapsed.as_millis() as u64,
            "房源数据导入完成"
        );

        Ok(ImportReport {
            batch,
            accepted,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AddressCandidate;
    use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
    use crate::importer::error::{AddressError, ImportError};
    use crate::importer::file_parser::CsvParser;
    use crate::importer::street_directory::StreetQuery;
    use crate::repository::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// 内存仓储，记录提交次数
    #[derive(Default)]
    struct InMemoryRepo {
        listings: Mutex<Vec<Listing>>,
        batches: Mutex<Vec<ImportBatch>>,
        commits: Mutex<usize>,
        fail_commit: bool,
    }

    #[async_trait]
    impl ListingImportRepository for InMemoryRepo {
        async fn find_all_listings(&self) -> RepositoryResult<Vec<Listing>> {
            Ok(self.listings.lock().unwrap().clone())
        }

        async fn batch_insert_listings(&self, listings: Vec<Listing>) -> RepositoryResult<usize> {
            if self.fail_commit {
                return Err(RepositoryError::DatabaseTransactionError(
                    "disk full".to_string(),
                ));
            }
            *self.commits.lock().unwrap() += 1;
            let count = listings.len();
            self.listings.lock().unwrap().extend(listings);
            Ok(count)
        }

        async fn insert_batch(&self, batch: ImportBatch) -> RepositoryResult<()> {
            self.batches.lock().unwrap().push(batch);
            Ok(())
        }

        async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
            let batches = self.batches.lock().unwrap();
            Ok(batches.iter().rev().take(limit).cloned().collect())
        }

        async fn count_listings(&self) -> RepositoryResult<usize> {
            Ok(self.listings.lock().unwrap().len())
        }
    }

    /// 每个查询都返回与输入一致的唯一候选
    struct EchoDirectory;

    #[async_trait]
    impl AddressDirectory for EchoDirectory {
        async fn find_streets(
            &self,
            query: &StreetQuery,
        ) -> Result<Vec<AddressCandidate>, AddressError> {
            let name = query.name.trim_start_matches('^').trim_end_matches('$');
            let name = if query.name.ends_with('$') {
                name.to_string()
            } else {
                format!("{}.", name)
            };
            Ok(vec![AddressCandidate {
                name,
                locality: query
                    .locality
                    .as_deref()
                    .map(|l| l.trim_start_matches('^').trim_end_matches('$').to_string())
                    .unwrap_or_default(),
                postal_code: query.postal_code.clone().unwrap_or_default(),
            }])
        }
    }

    fn write_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    fn importer(repo: InMemoryRepo) -> ListingImporterImpl<InMemoryRepo, EchoDirectory> {
        ListingImporterImpl::new(
            repo,
            Box::new(CsvParser::default()),
            Box::new(DataCleanerImpl),
            EchoDirectory,
        )
    }

    const HEADER: &str = "street;postalCode;city;coldRent;warmRent;area;rooms\n";

    #[tokio::test]
    async fn test_import_accepts_rejects_and_commits_once() {
        let file = write_csv(&format!(
            "{HEADER}Hauptstraße 5;10115;Berlin;800;950,5;62;2\n;10115;Berlin;800;950;62;2\n"
        ));
        let importer = importer(InMemoryRepo::default());

        let report = importer.import_from_csv(file.path()).await.unwrap();

        assert_eq!(report.accepted_count(), 1);
        assert_eq!(report.accepted[0].row_number, 2);
        assert_eq!(
            report.accepted[0].corrected_data,
            "Hauptstr. 5; 10115; Berlin; 800; 950.5; 62; 2"
        );
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.rejected[0].row_number, 3);
        assert_eq!(report.rejected[0].errors, vec!["Street is empty".to_string()]);

        let repo = importer.repository();
        assert_eq!(*repo.commits.lock().unwrap(), 1);
        assert_eq!(repo.count_listings().await.unwrap(), 1);
        assert_eq!(repo.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_counted_only_in_batch() {
        let file = write_csv(&format!(
            "{HEADER}Ring 1;50667;Köln;500;600;40;1\nRing 1;50667;Köln;500;600;40;1\nx\n"
        ));
        let importer = importer(InMemoryRepo::default());

        let report = importer.import_from_csv(file.path()).await.unwrap();

        assert_eq!(report.accepted_count(), 1);
        assert_eq!(report.rejected_count(), 0);
        assert_eq!(report.batch.total_rows, 3);
        assert_eq!(report.batch.duplicate_rows, 1);
        assert_eq!(report.batch.skipped_rows, 1);
    }

    #[tokio::test]
    async fn test_already_persisted_listing_is_duplicate() {
        let repo = InMemoryRepo::default();
        repo.listings
            .lock()
            .unwrap()
            .push(Listing::new("Ring 1", "50667", "Köln", 500.0, 600.0, 40.0, 1));
        let file = write_csv(&format!("{HEADER}Ring 1;50667;Köln;500;600;40;1\n"));
        let importer = importer(repo);

        let report = importer.import_from_csv(file.path()).await.unwrap();

        assert_eq!(report.accepted_count(), 0);
        assert_eq!(report.batch.duplicate_rows, 1);
        assert_eq!(importer.repository().count_listings().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_records_nothing() {
        let file = write_csv(HEADER);
        let importer = importer(InMemoryRepo::default());

        let result = importer.import_from_csv(file.path()).await;

        assert!(matches!(result, Err(ImportError::EmptyFile(_))));
        let repo = importer.repository();
        assert_eq!(*repo.commits.lock().unwrap(), 0);
        assert!(repo.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_commit_fails_run() {
        let repo = InMemoryRepo {
            fail_commit: true,
            ..Default::default()
        };
        let file = write_csv(&format!("{HEADER}Ring 1;50667;Köln;500;600;40;1\n"));
        let importer = importer(repo);

        let result = importer.import_from_csv(file.path()).await;

        assert!(matches!(result, Err(ImportError::DatabaseError(_))));
        assert!(importer.repository().batches.lock().unwrap().is_empty());
    }
}
