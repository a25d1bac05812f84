//! Column layouts for every record type the dashboard lists.

use chatdash_core::{
    AnalysisDetails, AnalysisSummary, Chat, HourOfDay, LogEntry, MISSING_VALUE, Message, Page, Prompt,
    User,
};

use crate::format::{dollars, local_timestamp, one_line, or_missing};
use crate::table::Table;

const MAX_TEXT_CHARS: usize = 80;

/// A record that knows how to lay itself out as a table row.
pub trait TableRow {
    /// Column titles, without the row-number column.
    const HEADERS: &'static [&'static str];
    /// Shown instead of rows when nothing matched.
    const EMPTY_MESSAGE: &'static str = "No results.";

    fn cells(&self) -> Vec<String>;
}

impl TableRow for LogEntry {
    const HEADERS: &'static [&'static str] = &["Level", "Message", "Date"];
    const EMPTY_MESSAGE: &'static str = "No logs found.";

    fn cells(&self) -> Vec<String> {
        vec![
            or_missing(self.level.as_deref()),
            or_missing(self.message.as_deref()),
            local_timestamp(self.logged_at()),
        ]
    }
}

impl TableRow for AnalysisSummary {
    const HEADERS: &'static [&'static str] = &["ID", "Prompt", "Filters", "Created"];
    const EMPTY_MESSAGE: &'static str = "No analyses available.";

    fn cells(&self) -> Vec<String> {
        vec![
            self.analysis_id.clone(),
            or_missing(self.prompt_name.as_deref()),
            filters_cell(self.filters.as_ref()),
            local_timestamp(self.created_at()),
        ]
    }
}

impl TableRow for Message {
    const HEADERS: &'static [&'static str] = &["Date", "User", "Chat", "Text", "Attachment"];
    const EMPTY_MESSAGE: &'static str = "No messages found.";

    fn cells(&self) -> Vec<String> {
        vec![
            local_timestamp(self.sent_at()),
            or_missing(self.user_id.as_deref()),
            or_missing(self.chat_id.as_deref()),
            self.text.as_deref().map_or_else(|| MISSING_VALUE.to_owned(), |t| one_line(t, MAX_TEXT_CHARS)),
            self.attachment().unwrap_or("-").to_owned(),
        ]
    }
}

impl TableRow for Chat {
    const HEADERS: &'static [&'static str] =
        &["Chat ID", "Name", "Prompt", "Scheduled", "Analysis at", "Send at"];
    const EMPTY_MESSAGE: &'static str = "No chats.";

    fn cells(&self) -> Vec<String> {
        vec![
            self.chat_id.clone(),
            self.chat_name.as_deref().map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Unnamed").to_owned(),
            or_missing(self.default_prompt_id.as_deref()),
            if self.schedule_analysis { "yes" } else { "no" }.to_owned(),
            hour_cell(self.analysis_hour()),
            hour_cell(self.send_hour()),
        ]
    }
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["User ID", "Login", "Name"];
    const EMPTY_MESSAGE: &'static str = "No users.";

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.clone(),
            or_missing(self.login.as_deref()),
            or_missing(self.username.as_deref()),
        ]
    }
}

impl TableRow for Prompt {
    const HEADERS: &'static [&'static str] = &["Prompt ID", "Name"];
    const EMPTY_MESSAGE: &'static str = "No prompts.";

    fn cells(&self) -> Vec<String> {
        vec![self.prompt_id.clone(), or_missing(self.prompt_name.as_deref())]
    }
}

fn hour_cell(hour: Option<HourOfDay>) -> String {
    hour.map_or_else(|| MISSING_VALUE.to_owned(), HourOfDay::as_time)
}

fn filters_cell(filters: Option<&serde_json::Value>) -> String {
    match filters {
        None | Some(serde_json::Value::Null) => MISSING_VALUE.to_owned(),
        Some(value) => one_line(&value.to_string(), MAX_TEXT_CHARS),
    }
}

/// One page of a listing, numbered from the page offset, with a position footer.
#[must_use]
pub fn page_table<T: TableRow>(page: &Page<T>) -> Table {
    let mut table = Table::new(std::iter::once("#").chain(T::HEADERS.iter().copied()))
        .with_empty_message(T::EMPTY_MESSAGE);
    for (index, item) in page.items.iter().enumerate() {
        let mut cells = vec![page.row_number(index).to_string()];
        cells.extend(item.cells());
        table.push_row(cells);
    }
    if page.no_results() {
        return table;
    }
    table.with_footer(format!(
        "Page {} of {} ({} total)",
        page.current_page(),
        page.total_pages(),
        page.total_count
    ))
}

/// Unpaginated list (chats, users, prompts).
#[must_use]
pub fn list_table<T: TableRow>(items: &[T]) -> Table {
    let mut table = Table::new(T::HEADERS.iter().copied()).with_empty_message(T::EMPTY_MESSAGE);
    for item in items {
        table.push_row(item.cells());
    }
    table
}

/// Key/value summary of one analysis, including token costs.
#[must_use]
pub fn analysis_details_table(details: &AnalysisDetails) -> Table {
    let input = details.input_cost();
    let output = details.output_cost();
    let tokens = |n: Option<u64>| n.map_or_else(|| MISSING_VALUE.to_owned(), |n| n.to_string());
    let mut table = Table::new(["Field", "Value"]);
    for (field, value) in [
        ("Prompt", or_missing(details.prompt_name.as_deref())),
        ("Created", local_timestamp(details.created_at())),
        ("Filters", filters_cell(details.filters.as_ref())),
        ("Input tokens", tokens(details.tokens_input)),
        ("Output tokens", tokens(details.tokens_output)),
        ("Input cost", dollars(input)),
        ("Output cost", dollars(output)),
        ("Total cost", dollars(input + output)),
    ] {
        table.push_row(vec![field.to_owned(), value]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use chatdash_core::{Listing, PageQuery};
    use serde_json::json;

    use super::*;

    fn log(level: &str, message: &str) -> LogEntry {
        serde_json::from_value(json!({"level": level, "message": message})).unwrap()
    }

    #[test]
    fn test_page_table_numbers_rows_from_offset() {
        let query = PageQuery::for_page(3, NonZeroU32::new(10).unwrap());
        let page = Page::from_listing(Listing::new(vec![log("INFO", "a"), log("ERROR", "b")], 22), query);
        let table = page_table(&page);

        assert_eq!(table.headers(), ["#", "Level", "Message", "Date"]);
        assert_eq!(table.rows()[0][0], "21");
        assert_eq!(table.rows()[1][0], "22");
        assert_eq!(table.rows()[1][1], "ERROR");
        assert_eq!(table.rows()[1][3], "N/A");
        assert_eq!(table.footer(), Some("Page 3 of 3 (22 total)"));
    }

    #[test]
    fn test_empty_page_has_no_results_row() {
        let query = PageQuery::for_page(1, NonZeroU32::new(10).unwrap());
        let page: Page<LogEntry> = Page::from_listing(Listing::new(vec![], 0), query);
        let table = page_table(&page);
        assert!(table.is_empty());
        assert!(table.footer().is_none());
        assert!(table.to_text().contains("No logs found."));
    }

    #[test]
    fn test_analysis_summary_cells() {
        let summary: AnalysisSummary = serde_json::from_value(json!({
            "analysis_id": 7,
            "prompt_name": null,
            "filters": {"chat_id": "-100"},
            "timestamp": null
        }))
        .unwrap();
        assert_eq!(summary.cells(), vec!["7", "N/A", r#"{"chat_id":"-100"}"#, "N/A"]);
    }

    #[test]
    fn test_message_cells_flatten_text_and_mark_attachment() {
        let message: Message = serde_json::from_value(json!({
            "user_id": 5,
            "chat_id": -100,
            "text": "line one\nline two",
            "s3_key": "files/a.pdf"
        }))
        .unwrap();
        let cells = message.cells();
        assert_eq!(cells[1], "5");
        assert_eq!(cells[2], "-100");
        assert_eq!(cells[3], "line one line two");
        assert_eq!(cells[4], "files/a.pdf");
    }

    #[test]
    fn test_chat_cells() {
        let chat: Chat = serde_json::from_value(json!({
            "chat_id": -1001,
            "chat_name": "",
            "schedule_analysis": true,
            "analysis_time": "09:00:00"
        }))
        .unwrap();
        assert_eq!(chat.cells(), vec!["-1001", "Unnamed", "N/A", "yes", "09:00", "N/A"]);
    }

    #[test]
    fn test_list_table_for_users() {
        let users: Vec<User> = serde_json::from_value(json!([
            {"user_id": 1, "login": "alice", "username": "Alice"},
            {"user_id": "2", "login": null}
        ]))
        .unwrap();
        let table = list_table(&users);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1], vec!["2", "N/A", "N/A"]);
        assert!(list_table::<User>(&[]).to_text().contains("No users."));
    }

    #[test]
    fn test_analysis_details_costs() {
        let details: AnalysisDetails = serde_json::from_value(json!({
            "prompt_name": "Digest",
            "tokens_input": 2000,
            "tokens_output": 500
        }))
        .unwrap();
        let table = analysis_details_table(&details);
        let value = |field: &str| {
            table.rows().iter().find(|r| r[0] == field).map(|r| r[1].clone()).unwrap()
        };
        assert_eq!(value("Input tokens"), "2000");
        assert_eq!(value("Input cost"), "$0.06");
        assert_eq!(value("Output cost"), "$0.03");
        assert_eq!(value("Total cost"), "$0.09");
        assert_eq!(value("Created"), "N/A");
    }
}
