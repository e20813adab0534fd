use askama::Template;

use super::PageContext;
use crate::models::announcement::Announcement;
use crate::models::document::Document;
use crate::models::pagination::Page;
use crate::models::search::SearchResult;

#[derive(Template)]
#[template(path = "announcements.html")]
pub struct AnnouncementListTemplate {
    pub ctx: PageContext,
    pub page_obj: Page<Announcement>,
}

#[derive(Template)]
#[template(path = "documents.html")]
pub struct DocumentListTemplate {
    pub ctx: PageContext,
    pub page_obj: Page<Document>,
    pub current_filter: String, // empty when unfiltered
    pub extensions: &'static [&'static str],
}

impl DocumentListTemplate {
    pub fn is_current(&self, ext: &str) -> bool {
        self.current_filter == ext
    }

    /// Query-string prefix that keeps the filter across page links.
    pub fn page_query(&self) -> String {
        if self.current_filter.is_empty() {
            String::new()
        } else {
            format!("ext={}&", self.current_filter)
        }
    }
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub ctx: PageContext,
    pub query: String,
    pub scope: String,
    pub results: Vec<SearchResult>,
    pub result_count: usize,
}
