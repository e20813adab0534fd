use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row, SqlParam};
use crate::models::format;

const CACHE_TTL: Duration = Duration::from_secs(180);

/// Office formats listed when no extension filter is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

/// Extensions a caller may filter on. Anything else is rejected before it
/// reaches the SQL text.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "jpg", "jpeg", "png",
    "gif", "mp4", "mp3", "txt",
];

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub file_name: String,
    pub folder_path: String,
    pub extension: String,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub size_bytes: i64,
    pub size_kb: f64,
    pub size_mb: f64,
    pub size_formatted: String,
    pub modified_formatted: String,
    pub is_checked_out: bool,
    pub checked_out_to: String,
    pub author_name: String,
    pub download_url: String,
    pub icon: &'static str,
}

impl Document {
    pub fn from_row(row: &Row, site_url: &str) -> Self {
        let size_bytes = row.int("SizeBytes");
        let file_name = row.text("FileName");
        let folder_path = row.text("FolderPath");
        let extension = row.text("Extension");
        Document {
            id: row.text("Id"),
            download_url: format::document_url(site_url, &folder_path, &file_name),
            icon: format::file_icon(&extension),
            file_name,
            folder_path,
            extension,
            created: row.datetime("Created"),
            modified: row.datetime("Modified"),
            size_bytes,
            size_kb: round2(size_bytes as f64 / 1024.0),
            size_mb: round2(size_bytes as f64 / 1_048_576.0),
            size_formatted: format::format_file_size(size_bytes as f64),
            modified_formatted: format::format_date(row.get("Modified")),
            is_checked_out: !row.is_null("CheckoutUserId"),
            checked_out_to: row.text("CheckedOutTo"),
            author_name: row.text("AuthorName"),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Normalize a user-supplied extension filter against [`ALLOWED_EXTENSIONS`].
/// Returns `None` for anything outside the allow-list.
pub fn validate_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext)
}

/// Most recently modified files of the given extensions, skipping SharePoint's
/// `_vti_` system folders. `extensions` must already be validated.
pub async fn find_recent(
    db: &Database,
    site_url: &str,
    limit: i64,
    extensions: Option<&[&str]>,
) -> Result<Vec<Document>, DbError> {
    let extensions = extensions.filter(|e| !e.is_empty()).unwrap_or(DEFAULT_EXTENSIONS);

    // @P1 is the row limit; one placeholder per extension follows.
    let placeholders: Vec<String> = (0..extensions.len()).map(|i| format!("@P{}", i + 2)).collect();
    let sql = format!(
        "SELECT TOP (@P1) \
                D.Id, \
                D.LeafName AS FileName, \
                D.DirName AS FolderPath, \
                D.Extension, \
                D.TimeCreated AS Created, \
                D.TimeLastModified AS Modified, \
                D.Size AS SizeBytes, \
                D.CheckoutUserId, \
                U.tp_Title AS AuthorName, \
                CU.tp_Title AS CheckedOutTo \
         FROM AllDocs D WITH (NOLOCK) \
         LEFT JOIN UserInfo U WITH (NOLOCK) ON D.AuthorId = U.tp_ID \
         LEFT JOIN UserInfo CU WITH (NOLOCK) ON D.CheckoutUserId = CU.tp_ID \
         WHERE D.Type = 0 \
           AND D.DeleteTransactionId = 0x \
           AND D.Extension IN ({}) \
           AND D.DirName NOT LIKE '%[_]vti[_]%' \
         ORDER BY D.TimeLastModified DESC",
        placeholders.join(", ")
    );

    let mut params = vec![SqlParam::Int(limit)];
    params.extend(extensions.iter().map(|e| SqlParam::from(*e)));

    let cache_key = format!("documents_{limit}_{}", extensions.join(","));
    let rows = db.execute(&sql, &params, Some(&cache_key), CACHE_TTL).await?;

    let documents: Vec<Document> = rows.iter().map(|row| Document::from_row(row, site_url)).collect();
    log::info!("Fetched {} documents", documents.len());
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlValue;

    #[test]
    fn extension_filter_is_allow_listed() {
        assert_eq!(validate_extension("PDF"), Some("pdf"));
        assert_eq!(validate_extension(".docx"), Some("docx"));
        assert_eq!(validate_extension("pdf') OR 1=1 --"), None);
        assert_eq!(validate_extension("exe"), None);
    }

    #[test]
    fn row_mapping_derives_fields() {
        let row = Row::new()
            .with("Id", SqlValue::Text("6f1c".into()))
            .with("FileName", SqlValue::Text("budget.xlsx".into()))
            .with("FolderPath", SqlValue::Text("sites/fin/Shared Documents".into()))
            .with("Extension", SqlValue::Text("xlsx".into()))
            .with("SizeBytes", SqlValue::Int(1_572_864))
            .with("CheckoutUserId", SqlValue::Null);
        let doc = Document::from_row(&row, "http://portal");
        assert_eq!(doc.size_formatted, "1.50 MB");
        assert_eq!(doc.size_mb, 1.5);
        assert_eq!(doc.size_kb, 1536.0);
        assert!(!doc.is_checked_out);
        assert_eq!(doc.icon, "📊");
        assert_eq!(doc.download_url, "http://portal/sites/fin/Shared Documents/budget.xlsx");
    }
}
