// ==========================================
// 房源导入系统 - 房源导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{ImportBatch, Listing};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::listing_import_repo::ListingImportRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ListingImportRepositoryImpl
// ==========================================
pub struct ListingImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ListingImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表结构需已由 db::ensure_schema 创建）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 以共享连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入房源
    fn batch_insert_listings_tx(tx: &Transaction, listings: &[Listing]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO listing (
                street, postal_code, city, cold_rent, warm_rent, area, rooms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        let mut count = 0;
        for listing in listings {
            stmt.execute(params![
                listing.street(),
                listing.postal_code(),
                listing.city(),
                listing.cold_rent(),
                listing.warm_rent(),
                listing.area(),
                listing.rooms(),
            ])?;
            count += 1;
        }

        Ok(count)
    }

    fn map_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
        Ok(Listing::new(
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }

    fn map_batch(row: &Row<'_>) -> rusqlite::Result<ImportBatch> {
        Ok(ImportBatch {
            batch_id: row.get(0)?,
            file_name: row.get(1)?,
            file_path: row.get(2)?,
            total_rows: row.get(3)?,
            accepted_rows: row.get(4)?,
            rejected_rows: row.get(5)?,
            duplicate_rows: row.get(6)?,
            skipped_rows: row.get(7)?,
            imported_at: row
                .get::<_, Option<String>>(8)?
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc)),
            elapsed_ms: row.get(9)?,
            report_json: row.get(10)?,
        })
    }
}

#[async_trait]
impl ListingImportRepository for ListingImportRepositoryImpl {
    async fn find_all_listings(&self) -> RepositoryResult<Vec<Listing>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT street, postal_code, city, cold_rent, warm_rent, area, rooms
            FROM listing
            ORDER BY id
            "#,
        )?;

        let listings = stmt
            .query_map([], Self::map_listing)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    async fn count_listings(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM listing", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 批量插入房源（事务化）
    async fn batch_insert_listings(&self, listings: Vec<Listing>) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::batch_insert_listings_tx(&tx, &listings)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn insert_batch(&self, batch: ImportBatch) -> RepositoryResult<()> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, file_path,
                total_rows, accepted_rows, rejected_rows, duplicate_rows, skipped_rows,
                imported_at, elapsed_ms, report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.accepted_rows,
                batch.rejected_rows,
                batch.duplicate_rows,
                batch.skipped_rows,
                batch.imported_at.map(|dt| dt.to_rfc3339()),
                batch.elapsed_ms,
                batch.report_json,
            ],
        )?;

        Ok(())
    }

    /// 查询最近的导入批次
    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, file_path,
                   total_rows, accepted_rows, rejected_rows, duplicate_rows, skipped_rows,
                   imported_at, elapsed_ms, report_json
            FROM import_batch
            ORDER BY imported_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit as i64], Self::map_batch)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(batches)
    }
}
