use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{Database, DbError, Row, SqlParam, DEFAULT_TTL};
use crate::models::format;

/// Keywords shorter than this never reach the database.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Default number of rows taken from each source.
pub const DEFAULT_LIMIT: i64 = 50;

/// Characters of context either side of the first hit in a snippet.
const SNIPPET_CONTEXT: usize = 100;

/// Which sources a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Items,
    Documents,
}

impl SearchScope {
    /// Parse the `type` query parameter. Unknown values are rejected so no
    /// caller-chosen text decides which SQL runs.
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim).unwrap_or("all") {
            "" | "all" => Some(SearchScope::All),
            "items" => Some(SearchScope::Items),
            "documents" => Some(SearchScope::Documents),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Items => "items",
            SearchScope::Documents => "documents",
        }
    }

    fn includes_items(self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Items)
    }

    fn includes_documents(self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Documents)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultKind {
    ListItem,
    Document,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub id: String,
    pub title: String,
    pub title_highlighted: String,
    pub content: String,
    pub content_snippet: String,
    pub location: String,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub created_formatted: String,
    pub modified_formatted: String,
    pub author: String,
}

impl SearchResult {
    pub fn from_row(row: &Row, kind: ResultKind, keyword: &str) -> Self {
        let title = row.text("Title");
        let content = match kind {
            ResultKind::ListItem => format::clean_html(&row.text("Content")),
            ResultKind::Document => row.text("Content"),
        };
        SearchResult {
            kind,
            id: row.text("Id"),
            title_highlighted: format::highlight(&title, keyword),
            title,
            content_snippet: format::highlight(
                &format::snippet(&content, keyword, SNIPPET_CONTEXT),
                keyword,
            ),
            content,
            location: row.text("Location"),
            created: row.datetime("Created"),
            modified: row.datetime("Modified"),
            created_formatted: format::format_date(row.get("Created")),
            modified_formatted: format::format_date(row.get("Modified")),
            author: row.text("Author"),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            ResultKind::ListItem => "ListItem",
            ResultKind::Document => "Document",
        }
    }
}

/// Whether `keyword` is long enough to search for.
pub fn is_searchable(keyword: &str) -> bool {
    keyword.chars().count() >= MIN_KEYWORD_CHARS
}

/// `%keyword%` with LIKE's own wildcards taken literally.
pub fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 4);
    pattern.push('%');
    for c in keyword.chars() {
        match c {
            '%' | '_' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('%');
    pattern
}

/// Keyword search across visible list items and documents. Short keywords
/// return nothing without querying.
pub async fn search(
    db: &Database,
    keyword: &str,
    scope: SearchScope,
    limit: i64,
) -> Result<Vec<SearchResult>, DbError> {
    if !is_searchable(keyword) {
        return Ok(Vec::new());
    }

    let term = like_pattern(keyword);
    let mut results = Vec::new();

    if scope.includes_items() {
        let rows = db
            .execute(
                "SELECT TOP (@P1) \
                        'ListItem' AS Type, \
                        UD.tp_ID AS Id, \
                        UD.nvarchar1 AS Title, \
                        UD.ntext2 AS Content, \
                        L.tp_Title AS Location, \
                        UD.tp_Created AS Created, \
                        UD.tp_Modified AS Modified, \
                        U.tp_Title AS Author \
                 FROM AllUserData UD WITH (NOLOCK) \
                 INNER JOIN AllLists L WITH (NOLOCK) ON UD.tp_ListId = L.tp_ID \
                 LEFT JOIN UserInfo U WITH (NOLOCK) ON UD.tp_Author = U.tp_ID \
                 WHERE (UD.nvarchar1 LIKE @P2 OR UD.ntext2 LIKE @P2) \
                   AND UD.tp_DeleteTransactionId = 0x \
                   AND L.tp_Hidden = 0 \
                 ORDER BY UD.tp_Modified DESC",
                &[SqlParam::Int(limit), SqlParam::Text(term.clone())],
                None,
                DEFAULT_TTL,
            )
            .await?;
        results.extend(rows.iter().map(|r| SearchResult::from_row(r, ResultKind::ListItem, keyword)));
    }

    if scope.includes_documents() {
        let rows = db
            .execute(
                "SELECT TOP (@P1) \
                        'Document' AS Type, \
                        D.Id, \
                        D.LeafName AS Title, \
                        D.DirName AS Content, \
                        'Documents' AS Location, \
                        D.TimeCreated AS Created, \
                        D.TimeLastModified AS Modified, \
                        U.tp_Title AS Author \
                 FROM AllDocs D WITH (NOLOCK) \
                 LEFT JOIN UserInfo U WITH (NOLOCK) ON D.AuthorId = U.tp_ID \
                 WHERE D.LeafName LIKE @P2 \
                   AND D.Type = 0 \
                   AND D.DeleteTransactionId = 0x \
                 ORDER BY D.TimeLastModified DESC",
                &[SqlParam::Int(limit), SqlParam::Text(term)],
                None,
                DEFAULT_TTL,
            )
            .await?;
        results.extend(rows.iter().map(|r| SearchResult::from_row(r, ResultKind::Document, keyword)));
    }

    log::info!("Search for '{keyword}' returned {} results", results.len());
    Ok(results)
}
