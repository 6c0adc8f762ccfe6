//! Employee detail view.

use std::fmt::Write;

use super::{format_date, id_text, number, text, Link, EMPLOYEE_ROUTE};
use crate::client::EntityApi;
use crate::models::Employee;
use crate::store::Store;

/// The detail view for one route id.
#[derive(Debug, Clone)]
pub struct DetailView {
    id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub heading: &'static str,
    pub fields: Vec<DetailField>,
    pub back_link: Link,
    pub edit_link: Link,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl DetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Issue the single fetch for the route id.
    pub async fn activate(&self, store: &mut Store, api: &dyn EntityApi<Employee>) {
        tracing::debug!(id = %self.id, "Activating employee detail");
        store.fetch_employee(api, &self.id).await;
    }

    pub fn render(&self, store: &Store) -> DetailPage {
        let state = &store.employee;
        let entity = &state.entity;

        // Until the fetch lands, the edit link still points at the routed record.
        let edit_id = entity
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.id.clone());

        DetailPage {
            heading: "Employee",
            fields: fields(entity),
            back_link: Link::new(EMPLOYEE_ROUTE, "Back"),
            edit_link: Link::new(format!("{}/{}/edit", EMPLOYEE_ROUTE, edit_id), "Edit"),
            loading: state.loading,
            error_message: state.error_message(),
        }
    }
}

fn fields(entity: &Employee) -> Vec<DetailField> {
    let field = |label, value| DetailField { label, value };
    vec![
        field("ID", id_text(entity.id)),
        field("First Name", text(entity.first_name.as_deref())),
        field("Last Name", text(entity.last_name.as_deref())),
        field("Date Of Hiring", format_date(entity.date_of_hiring)),
        field("Salary", number(entity.salary)),
        field("Department", id_text(entity.department_id())),
    ]
}

#[cfg(test)]
impl DetailPage {
    /// Value shown for a label, if the label exists.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

impl DetailPage {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"row justify-content-center\" aria-busy=\"{}\">\n<div class=\"col-md-8\">\n<h2 data-cy=\"employeeDetailsHeading\">{}</h2>\n",
            self.loading, self.heading
        );

        if let Some(message) = &self.error_message {
            let _ = writeln!(
                out,
                r#"<div class="alert alert-danger">{}</div>"#,
                html_escape::encode_text(message)
            );
        }

        out.push_str("<dl class=\"jh-entity-details\">\n");
        for field in &self.fields {
            let _ = writeln!(
                out,
                "<dt><span>{}</span></dt>\n<dd>{}</dd>",
                field.label,
                html_escape::encode_text(&field.value)
            );
        }
        out.push_str("</dl>\n");

        self.back_link.write_html(&mut out, "btn btn-info");
        out.push('\n');
        self.edit_link.write_html(&mut out, "btn btn-primary");
        out.push_str("\n</div>\n</div>");
        out
    }
}
