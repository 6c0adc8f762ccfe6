//! Admin pages rendered from the employee views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};

use crate::models::Employee;
use crate::store::{EntityState, LoadStatus, Store};
use crate::views::{html_document, DetailView, ListView, EMPLOYEE_ROUTE};
use crate::AppState;

/// GET /employee - Employee list page.
pub async fn employee_list_page(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    let view = ListView::new(EMPLOYEE_ROUTE);
    let mut store = Store::new();
    view.activate(&mut store, &*state.employees).await;

    let page = view.render(&store);
    let status = page_status(&store.employee);
    (status, Html(html_document(page.heading, &page.to_html())))
}

/// GET /employee/:id - Employee detail page.
pub async fn employee_detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    let view = DetailView::new(id);
    let mut store = Store::new();
    view.activate(&mut store, &*state.employees).await;

    let page = view.render(&store);
    let status = page_status(&store.employee);
    (status, Html(html_document(page.heading, &page.to_html())))
}

fn page_status(state: &EntityState<Employee>) -> StatusCode {
    match (&state.status, &state.error) {
        (LoadStatus::Failed, Some(error)) => error.status_code(),
        _ => StatusCode::OK,
    }
}
