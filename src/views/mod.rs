//! Admin views for employee records.
//!
//! A view is bound to a route. Activation dispatches a fetch into the
//! [`Store`](crate::store::Store); rendering reads only from the store and
//! produces a view model that can be turned into HTML.

mod detail;
mod list;

pub use detail::DetailView;
pub use list::ListView;

use std::fmt::Write;

use chrono::{DateTime, Utc};

/// Route prefix the employee views are mounted under.
pub const EMPLOYEE_ROUTE: &str = "/employee";

/// Display format for instants, `DD/MM/YY HH:mm`.
pub const APP_DATE_FORMAT: &str = "%d/%m/%y %H:%M";

/// A navigation target with its visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

impl Link {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }

    fn write_html(&self, out: &mut String, class: &str) {
        let _ = write!(
            out,
            r#"<a class="{}" href="{}">{}</a>"#,
            class,
            html_escape::encode_double_quoted_attribute(&self.href),
            html_escape::encode_text(&self.text)
        );
    }
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format(APP_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn id_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Wrap a rendered fragment into a standalone page.
pub fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        html_escape::encode_text(title),
        body
    )
}
