//! Placeholder substitution for rendered log lines
//!
//! Recognized tokens: `{{LEVEL}}`, `{{BODY}}`, `{{MESSAGE}}`, `{{REPORTERNAME}}`
//! and the timestamp parts `{{hh}}`, `{{mm}}`, `{{ss}}`, `{{ms}}`, `{{DD}}`,
//! `{{MM}}`, `{{YYYY}}`. Anything else between braces is copied verbatim.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde_json::Value;

use crate::level::{Level, LevelNames};

/// Everything a line depends on besides the value itself
#[derive(Debug, Clone, Copy)]
pub struct RenderFields<'a> {
    pub level: Level,
    pub level_names: &'a LevelNames,
    pub reporter_name: &'a str,
    /// Wall-clock time used for the timestamp tokens
    pub at: NaiveDateTime,
}

impl RenderFields<'_> {
    fn substitute(&self, token: &str, value: &Value) -> Option<String> {
        let at = &self.at;
        let s = match token {
            "LEVEL" => self.level.name(self.level_names),
            "REPORTERNAME" => self.reporter_name.to_string(),
            "BODY" | "MESSAGE" => value.to_string(),
            "hh" => format!("{:02}", at.hour()),
            "mm" => format!("{:02}", at.minute()),
            "ss" => format!("{:02}", at.second()),
            "ms" => format!("{:03}", (at.nanosecond() / 1_000_000) % 1000),
            "DD" => format!("{:02}", at.day()),
            "MM" => format!("{:02}", at.month()),
            "YYYY" => format!("{:04}", at.year()),
            _ => return None,
        };
        Some(s)
    }
}

/// Render one value through `template`
///
/// Substitution is a single left-to-right pass, so text coming from the value
/// is never scanned for tokens again.
pub fn render(template: &str, fields: &RenderFields<'_>, value: &Value) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        match fields.substitute(&after[..close], value) {
            Some(replacement) => {
                out.push_str(&replacement);
                rest = &after[close + 2..];
            }
            None => {
                // Keep the braces and rescan right after them
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render each value on its own line
pub fn render_all(template: &str, fields: &RenderFields<'_>, values: &[Value]) -> Vec<String> {
    values.iter().map(|v| render(template, fields, v)).collect()
}
