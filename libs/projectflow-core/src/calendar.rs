//! iCalendar (RFC 5545) feed of project deadlines and task due dates.

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::TaskStatus;

const MAX_LINE_OCTETS: usize = 75;

/// A single all-day calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub date: NaiveDate,
}

impl CalendarEvent {
    /// Event on a project's deadline.
    pub fn project(id: i64, title: &str, progress: i32, deadline: NaiveDate) -> Self {
        Self {
            uid: format!("project-{id}@projectflow"),
            summary: format!("Project: {title}"),
            description: format!("Project deadline. Progress: {progress}%"),
            date: deadline,
        }
    }

    /// Event on a task's due date.
    pub fn task(
        id: i64,
        title: &str,
        project_title: Option<&str>,
        status: TaskStatus,
        due_date: NaiveDate,
    ) -> Self {
        let summary = match project_title {
            Some(project) => format!("Task: {title} ({project})"),
            None => format!("Task: {title}"),
        };
        Self {
            uid: format!("task-{id}@projectflow"),
            summary,
            description: format!("Task status: {status}"),
            date: due_date,
        }
    }
}

/// Render events into a complete `VCALENDAR` document.
///
/// `stamp` becomes the DTSTAMP of every event.
pub fn render_calendar(events: &[CalendarEvent], stamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//ProjectFlow//Calendar//EN");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, "X-WR-CALNAME:ProjectFlow");

    for event in events {
        let end = event.date.succ_opt().unwrap_or(event.date);
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", event.uid));
        push_line(&mut out, &format!("DTSTAMP:{dtstamp}"));
        push_line(
            &mut out,
            &format!("DTSTART;VALUE=DATE:{}", event.date.format("%Y%m%d")),
        );
        push_line(&mut out, &format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.summary)));
        push_line(
            &mut out,
            &format!("DESCRIPTION:{}", escape_text(&event.description)),
        );
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Escape a TEXT property value.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Append a content line, folding at 75 octets without splitting a
/// UTF-8 sequence.
fn push_line(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out.push_str("\r\n");
}
