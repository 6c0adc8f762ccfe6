//! Employee list view.

use std::fmt::Write;

use super::{format_date, id_text, number, text, Link};
use crate::client::EntityApi;
use crate::models::Employee;
use crate::store::Store;

/// The list view bound to a route prefix such as `/employee`.
#[derive(Debug, Clone)]
pub struct ListView {
    match_url: String,
}

/// What the list view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub heading: &'static str,
    pub refresh_disabled: bool,
    pub refresh_spinning: bool,
    pub refresh_link: Link,
    pub create_link: Link,
    pub body: ListBody,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListBody {
    /// One row per record, in the order received.
    Table(Vec<ListRow>),
    /// Nothing loaded and nothing in flight.
    NotFound,
    /// Empty while the fetch is pending; nothing is shown.
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: Link,
    pub first_name: String,
    pub last_name: String,
    pub date_of_hiring: String,
    pub salary: String,
    pub department: Option<Link>,
    pub view: Link,
    pub edit: Link,
    pub delete: Link,
}

pub const COLUMNS: [&str; 6] = [
    "ID",
    "First Name",
    "Last Name",
    "Date Of Hiring",
    "Salary",
    "Department",
];

pub const NOT_FOUND_MESSAGE: &str = "No Employees found";

impl ListView {
    pub fn new(match_url: impl Into<String>) -> Self {
        let match_url: String = match_url.into();
        Self {
            match_url: match_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the collection when the view is entered.
    pub async fn activate(&self, store: &mut Store, api: &dyn EntityApi<Employee>) {
        tracing::debug!(url = %self.match_url, "Activating employee list");
        store.fetch_employees(api).await;
    }

    /// User-triggered re-fetch. The served page reaches it by reloading.
    #[allow(dead_code)]
    pub async fn refresh(&self, store: &mut Store, api: &dyn EntityApi<Employee>) {
        store.fetch_employees(api).await;
    }

    pub fn render(&self, store: &Store) -> ListPage {
        let state = &store.employee;

        let body = if !state.entities.is_empty() {
            ListBody::Table(state.entities.iter().map(|e| self.row(e)).collect())
        } else if state.loading {
            ListBody::Pending
        } else {
            ListBody::NotFound
        };

        ListPage {
            heading: "Employees",
            refresh_disabled: state.loading,
            refresh_spinning: state.loading,
            refresh_link: Link::new(self.match_url.clone(), "Refresh List"),
            create_link: Link::new(format!("{}/new", self.match_url), "Create new Employee"),
            body,
            error_message: state.error_message(),
        }
    }

    fn row(&self, employee: &Employee) -> ListRow {
        let id = id_text(employee.id);
        let detail = format!("{}/{}", self.match_url, id);

        ListRow {
            id: Link::new(detail.clone(), id),
            first_name: text(employee.first_name.as_deref()),
            last_name: text(employee.last_name.as_deref()),
            date_of_hiring: format_date(employee.date_of_hiring),
            salary: number(employee.salary),
            department: employee
                .department_id()
                .map(|d| Link::new(format!("department/{}", d), d.to_string())),
            view: Link::new(detail.clone(), "View"),
            edit: Link::new(format!("{}/edit", detail), "Edit"),
            delete: Link::new(format!("{}/delete", detail), "Delete"),
        }
    }
}

#[cfg(test)]
impl ListPage {
    pub fn rows(&self) -> &[ListRow] {
        match &self.body {
            ListBody::Table(rows) => rows,
            _ => &[],
        }
    }

    pub fn shows_not_found(&self) -> bool {
        matches!(self.body, ListBody::NotFound)
    }
}

impl ListPage {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<div>\n<h2 id=\"employee-heading\">");
        out.push_str(self.heading);
        out.push_str("\n<div class=\"d-flex justify-content-end\">");
        let spin = if self.refresh_spinning { " fa-spin" } else { "" };
        let _ = write!(out, r#"<i class="fa fa-sync{}"></i>"#, spin);
        if self.refresh_disabled {
            let _ = write!(
                out,
                r#"<span class="btn btn-info disabled" aria-disabled="true">{}</span>"#,
                html_escape::encode_text(&self.refresh_link.text)
            );
        } else {
            self.refresh_link.write_html(&mut out, "btn btn-info");
        }
        self.create_link
            .write_html(&mut out, "btn btn-primary jh-create-entity");
        out.push_str("</div>\n</h2>\n");

        if let Some(message) = &self.error_message {
            let _ = writeln!(
                out,
                r#"<div class="alert alert-danger">{}</div>"#,
                html_escape::encode_text(message)
            );
        }

        out.push_str("<div class=\"table-responsive\">\n");
        match &self.body {
            ListBody::Table(rows) => {
                out.push_str("<table class=\"table\">\n<thead><tr>");
                for column in COLUMNS {
                    let _ = write!(out, "<th>{}</th>", column);
                }
                out.push_str("<th></th></tr></thead>\n<tbody>\n");
                for row in rows {
                    row.write_html(&mut out);
                }
                out.push_str("</tbody>\n</table>\n");
            }
            ListBody::NotFound => {
                let _ = writeln!(
                    out,
                    r#"<div class="alert alert-warning">{}</div>"#,
                    NOT_FOUND_MESSAGE
                );
            }
            ListBody::Pending => {}
        }
        out.push_str("</div>\n</div>");
        out
    }
}

impl ListRow {
    fn write_html(&self, out: &mut String) {
        out.push_str("<tr data-cy=\"entityTable\"><td>");
        self.id.write_html(out, "btn btn-link btn-sm");
        for cell in [
            &self.first_name,
            &self.last_name,
            &self.date_of_hiring,
            &self.salary,
        ] {
            let _ = write!(out, "</td><td>{}", html_escape::encode_text(cell));
        }
        out.push_str("</td><td>");
        if let Some(department) = &self.department {
            department.write_html(out, "");
        }
        out.push_str("</td><td class=\"text-end\"><div class=\"btn-group\">");
        self.view.write_html(out, "btn btn-info btn-sm");
        self.edit.write_html(out, "btn btn-primary btn-sm");
        self.delete.write_html(out, "btn btn-danger btn-sm");
        out.push_str("</div></td></tr>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::Department;
    use crate::store::tests::FakeApi;
    use crate::store::Action;

    fn employee(id: i64) -> Employee {
        Employee {
            id: Some(id),
            first_name: Some(format!("E{}", id)),
            ..Employee::default()
        }
    }

    #[tokio::test]
    async fn test_single_row_shows_blank_optional_cells() {
        let api = FakeApi::with_collection(vec![Employee {
            id: Some(1),
            first_name: Some("Ann".to_string()),
            salary: Some(5000.0),
            ..Employee::default()
        }]);
        let view = ListView::new("/employee");
        let mut store = Store::new();

        view.activate(&mut store, &api).await;
        let page = view.render(&store);

        assert_eq!(page.rows().len(), 1);
        let row = &page.rows()[0];
        assert_eq!(row.id.text, "1");
        assert_eq!(row.id.href, "/employee/1");
        assert_eq!(row.first_name, "Ann");
        assert_eq!(row.last_name, "");
        assert_eq!(row.date_of_hiring, "");
        assert_eq!(row.salary, "5000");
        assert!(row.department.is_none());
        assert_eq!(row.edit.href, "/employee/1/edit");
        assert_eq!(row.delete.href, "/employee/1/delete");
    }

    #[tokio::test]
    async fn test_rows_follow_received_order() {
        let api = FakeApi::with_collection(vec![employee(3), employee(1), employee(2)]);
        let view = ListView::new("/employee/");
        let mut store = Store::new();

        view.activate(&mut store, &api).await;
        let ids: Vec<String> = view
            .render(&store)
            .rows()
            .iter()
            .map(|r| r.id.text.clone())
            .collect();

        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(api.calls(), vec!["fetch_collection"]);
    }

    #[tokio::test]
    async fn test_refresh_fetches_again() {
        let api = FakeApi::with_collection(vec![employee(1)]);
        let view = ListView::new("/employee");
        let mut store = Store::new();

        view.activate(&mut store, &api).await;
        view.refresh(&mut store, &api).await;

        assert_eq!(api.calls().len(), 2);
        assert_eq!(view.render(&store).rows().len(), 1);
    }

    #[test]
    fn test_not_found_only_when_not_loading() {
        let view = ListView::new("/employee");
        let mut store = Store::new();
        assert!(view.render(&store).shows_not_found());

        store.dispatch::<Employee>(Action::FetchListPending(1));
        let page = view.render(&store);
        assert_eq!(page.body, ListBody::Pending);
        assert!(page.refresh_disabled);
        assert!(page.to_html().contains("fa-sync fa-spin"));
        assert!(!page.to_html().contains(NOT_FOUND_MESSAGE));

        store.dispatch::<Employee>(Action::FetchListFulfilled(1, Vec::new()));
        let page = view.render(&store);
        assert!(page.shows_not_found());
        assert!(page.to_html().contains(NOT_FOUND_MESSAGE));
        assert!(!page.to_html().contains("fa-spin"));
    }

    #[test]
    fn test_department_cell_links_to_department() {
        let view = ListView::new("/employee");
        let mut store = Store::new();
        store.dispatch::<Employee>(Action::FetchListFulfilled(
            0,
            vec![Employee {
                id: Some(4),
                department: Some(Department::reference(3)),
                ..Employee::default()
            }],
        ));

        let page = view.render(&store);
        let department = page.rows()[0].department.clone().unwrap();
        assert_eq!(department, Link::new("department/3", "3"));
        assert!(page.to_html().contains(r#"href="department/3">3</a>"#));
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_not_found_and_error() {
        let api = FakeApi::<Employee>::failing(AppError::Transport("gateway down".to_string()));
        let view = ListView::new("/employee");
        let mut store = Store::new();

        view.activate(&mut store, &api).await;
        let page = view.render(&store);

        assert!(page.shows_not_found());
        assert_eq!(page.error_message.as_deref(), Some("gateway down"));
    }

    #[test]
    fn test_html_escapes_cell_text() {
        let view = ListView::new("/employee");
        let mut store = Store::new();
        store.dispatch::<Employee>(Action::FetchListFulfilled(
            0,
            vec![Employee {
                id: Some(1),
                first_name: Some("<script>".to_string()),
                ..Employee::default()
            }],
        ));

        let html = view.render(&store).to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches("data-cy=\"entityTable\"").count(), 1);
    }
}
