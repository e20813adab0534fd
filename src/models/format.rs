//! Stateless formatting helpers applied to rows after they come back from
//! the database. Nothing here touches the database or the clock; callers
//! pass `now` explicitly where it matters.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{Regex, RegexBuilder};

use crate::db::SqlValue;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid tag pattern"));

const FILE_SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Characters kept from the head of the content when the keyword is not found.
const SNIPPET_FALLBACK_LEN: usize = 200;

/// `YYYY/MM/DD`. Absent values give an empty string; text that does not parse
/// as a timestamp is returned as-is.
pub fn format_date(value: Option<&SqlValue>) -> String {
    format_with(value, "%Y/%m/%d")
}

/// `YYYY/MM/DD HH:MM`, same rules as [`format_date`].
pub fn format_datetime(value: Option<&SqlValue>) -> String {
    format_with(value, "%Y/%m/%d %H:%M")
}

fn format_with(value: Option<&SqlValue>, pattern: &str) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };
    match value.as_datetime() {
        Some(dt) => dt.format(pattern).to_string(),
        None => value.as_text().unwrap_or_default(),
    }
}

/// Age of `ts` relative to `now`, using only the largest applicable unit.
pub fn relative_time(ts: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(ts) = ts else {
        return String::new();
    };
    let total = (now - ts).num_seconds();
    if total < 0 {
        return "just now".to_string();
    }
    let days = total / 86_400;
    let seconds = total % 86_400;

    if days > 30 {
        plural(days / 30, "month")
    } else if days > 0 {
        plural(days, "day")
    } else if seconds >= 3_600 {
        plural(seconds / 3_600, "hour")
    } else if seconds >= 60 {
        plural(seconds / 60, "minute")
    } else {
        "just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Human-readable size with two decimals, e.g. `1.50 MB`.
pub fn format_file_size(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0 B".to_string();
    }
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.2} {}", FILE_SIZE_UNITS[unit])
}

/// Plain text from SharePoint rich-text fields: entities decoded, tags
/// removed, runs of whitespace collapsed.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let decoded = html_escape::decode_html_entities(html);
    let stripped = TAG.replace_all(&decoded, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .ok()
}

/// HTML-escape `text` and wrap every case-insensitive occurrence of `keyword`
/// in `<mark>`, keeping the text's own casing.
pub fn highlight(text: &str, keyword: &str) -> String {
    let pattern = match keyword_pattern(keyword) {
        Some(p) if !keyword.is_empty() => p,
        _ => return html_escape::encode_text(text).into_owned(),
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in pattern.find_iter(text) {
        out.push_str(&html_escape::encode_text(&text[last..m.start()]));
        out.push_str("<mark>");
        out.push_str(&html_escape::encode_text(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&html_escape::encode_text(&text[last..]));
    out
}

/// Window of `context` characters either side of the first match of
/// `keyword`, with `...` where the content was cut. Without a match the first
/// 200 characters are returned untouched.
pub fn snippet(content: &str, keyword: &str, context: usize) -> String {
    let head = || content.chars().take(SNIPPET_FALLBACK_LEN).collect::<String>();
    if content.is_empty() || keyword.is_empty() {
        return head();
    }
    let Some(found) = keyword_pattern(keyword).and_then(|p| p.find(content)) else {
        return head();
    };

    let total = content.chars().count();
    let match_start = content[..found.start()].chars().count();
    let match_len = found.as_str().chars().count();

    let start = match_start.saturating_sub(context);
    let end = (match_start + match_len + context).min(total);

    let mut out: String = content.chars().skip(start).take(end - start).collect();
    if start > 0 {
        out.insert_str(0, "...");
    }
    if end < total {
        out.push_str("...");
    }
    out
}

pub fn file_icon(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "📄",
        "doc" | "docx" => "📝",
        "xls" | "xlsx" => "📊",
        "ppt" | "pptx" => "📽️",
        "zip" | "rar" => "🗜️",
        "jpg" | "jpeg" | "png" | "gif" => "🖼️",
        "mp4" => "🎬",
        "mp3" => "🎵",
        "txt" => "📃",
        _ => "📎",
    }
}

/// Display name for a SharePoint list server template id.
pub fn list_template_name(template: i64) -> &'static str {
    match template {
        100 => "Custom List",
        101 => "Document Library",
        102 => "Survey",
        103 => "Links",
        104 => "Announcements",
        105 => "Contacts",
        106 => "Events",
        107 => "Tasks",
        108 => "Discussion Board",
        109 => "Picture Library",
        _ => "Unknown",
    }
}

pub fn list_icon(template: i64) -> &'static str {
    match template {
        100 => "📋",
        101 => "📁",
        102 => "📊",
        103 => "🔗",
        104 => "📢",
        105 => "👥",
        106 => "📅",
        107 => "✓",
        108 => "💬",
        109 => "🖼️",
        _ => "📄",
    }
}

/// `John Smith` → `JS`, `admin` → `AD`, empty → `?`.
pub fn initials(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    match parts.as_slice() {
        [] => "?".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let mut s = String::new();
            s.extend(first.chars().next());
            s.extend(last.chars().next());
            s.to_uppercase()
        }
    }
}

/// `CONTOSO\jdoe` → `CONTOSO`; logins without a backslash have no domain.
pub fn login_domain(login: &str) -> String {
    login
        .split_once('\\')
        .map(|(domain, _)| domain.to_string())
        .unwrap_or_default()
}

/// Length of an event in its largest unit: days, else hours, else minutes.
pub fn event_duration(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let total = (end - start).num_seconds();
    if total < 0 {
        return String::new();
    }
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    if days > 0 {
        format!("{days} day(s)")
    } else if hours > 0 {
        format!("{hours} hour(s)")
    } else {
        format!("{minutes} minute(s)")
    }
}

/// Absolute download link for a document in the site's folder structure.
pub fn document_url(site_url: &str, folder: &str, file_name: &str) -> String {
    let path = format!("{folder}/{file_name}").replace("//", "/");
    format!("{}/{}", site_url.trim_end_matches('/'), path.trim_matches('/'))
}

/// Sort rank used by the task list: High, Normal, Low, then everything else.
pub fn priority_rank(priority: &str) -> u8 {
    match priority {
        "High" => 1,
        "Normal" => 2,
        "Low" => 3,
        _ => 4,
    }
}

/// Bootstrap contextual colour for a task priority.
pub fn priority_color(priority: &str) -> &'static str {
    match priority {
        "High" => "danger",
        "Normal" => "warning",
        "Low" => "info",
        _ => "secondary",
    }
}
