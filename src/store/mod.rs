//! Client-side state store for the admin views.
//!
//! [`Store`] is the application state passed explicitly into every view
//! operation. It is changed only through [`reduce`]; the `fetch_*` helpers
//! dispatch a pending action, await the API and dispatch the outcome.

use crate::client::EntityApi;
use crate::errors::AppError;
use crate::models::{Department, Employee, Entity};

/// Monotonic tag for issued fetches. A completion carrying an id older than
/// the latest issued fetch of the same kind is dropped.
pub type RequestId = u64;

/// Load lifecycle shared by the list and detail views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// State slice for one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    pub status: LoadStatus,
    pub loading: bool,
    pub error: Option<AppError>,
    pub entities: Vec<E>,
    pub entity: E,
    // Set by the write thunks.
    #[allow(dead_code)]
    pub updating: bool,
    #[allow(dead_code)]
    pub update_success: bool,
    latest_list_request: RequestId,
    latest_entity_request: RequestId,
}

impl<E: Default> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            loading: false,
            error: None,
            entities: Vec::new(),
            entity: E::default(),
            updating: false,
            update_success: false,
            latest_list_request: 0,
            latest_entity_request: 0,
        }
    }
}

impl<E> EntityState<E> {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(AppError::message)
    }

    fn begin(&mut self) {
        self.status = LoadStatus::Loading;
        self.loading = true;
        self.error = None;
        self.update_success = false;
    }

    /// Ids are unique across both kinds, so a rejection is current only if it
    /// belongs to the latest list or the latest entity fetch.
    fn is_current_rejection(&self, request: RequestId) -> bool {
        request == self.latest_list_request
            || request == self.latest_entity_request
            || request > self.latest_list_request.max(self.latest_entity_request)
    }
}

/// Everything that can happen to an [`EntityState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action<E> {
    FetchListPending(RequestId),
    FetchListFulfilled(RequestId, Vec<E>),
    FetchEntityPending(RequestId),
    FetchEntityFulfilled(RequestId, E),
    FetchRejected(RequestId, AppError),
    UpdatePending,
    UpdateFulfilled(E),
    DeleteFulfilled,
    UpdateRejected(AppError),
    Reset,
}

/// Apply an action to a state slice.
pub fn reduce<E: Default>(mut state: EntityState<E>, action: Action<E>) -> EntityState<E> {
    match action {
        Action::FetchListPending(request) => {
            state.latest_list_request = state.latest_list_request.max(request);
            state.begin();
        }
        Action::FetchEntityPending(request) => {
            state.latest_entity_request = state.latest_entity_request.max(request);
            state.begin();
        }
        Action::FetchListFulfilled(request, entities) => {
            if request < state.latest_list_request {
                tracing::debug!(request, latest = state.latest_list_request, "Dropping stale list response");
                return state;
            }
            state.status = LoadStatus::Loaded;
            state.loading = false;
            state.entities = entities;
        }
        Action::FetchEntityFulfilled(request, entity) => {
            if request < state.latest_entity_request {
                tracing::debug!(request, latest = state.latest_entity_request, "Dropping stale entity response");
                return state;
            }
            state.status = LoadStatus::Loaded;
            state.loading = false;
            state.entity = entity;
        }
        Action::FetchRejected(request, error) => {
            if !state.is_current_rejection(request) {
                tracing::debug!(request, "Dropping stale rejection");
                return state;
            }
            state.status = LoadStatus::Failed;
            state.loading = false;
            state.updating = false;
            state.update_success = false;
            state.error = Some(error);
        }
        Action::UpdatePending => {
            state.error = None;
            state.update_success = false;
            state.updating = true;
        }
        Action::UpdateFulfilled(entity) => {
            state.updating = false;
            state.loading = false;
            state.update_success = true;
            state.entity = entity;
        }
        Action::DeleteFulfilled => {
            state.updating = false;
            state.update_success = true;
            state.entity = E::default();
        }
        Action::UpdateRejected(error) => {
            state.loading = false;
            state.updating = false;
            state.update_success = false;
            state.error = Some(error);
        }
        Action::Reset => {
            let (list, entity) = (state.latest_list_request, state.latest_entity_request);
            state = EntityState::default();
            state.latest_list_request = list;
            state.latest_entity_request = entity;
        }
    }
    state
}

/// Which state slice an entity type lives in.
pub trait Slice: Entity {
    fn slice_mut(store: &mut Store) -> &mut EntityState<Self>;
}

impl Slice for Employee {
    fn slice_mut(store: &mut Store) -> &mut EntityState<Self> {
        &mut store.employee
    }
}

impl Slice for Department {
    fn slice_mut(store: &mut Store) -> &mut EntityState<Self> {
        &mut store.department
    }
}

/// Application state for the admin views.
#[derive(Debug, Default)]
pub struct Store {
    pub employee: EntityState<Employee>,
    pub department: EntityState<Department>,
    next_request: RequestId,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the tag for the next fetch.
    pub fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    pub fn dispatch<E: Slice>(&mut self, action: Action<E>) {
        let slice = E::slice_mut(self);
        *slice = reduce(std::mem::take(slice), action);
    }

    /// Fetch the whole collection into `entities`.
    pub async fn fetch_entities<E: Slice>(&mut self, api: &dyn EntityApi<E>) {
        let request = self.next_request_id();
        self.dispatch::<E>(Action::FetchListPending(request));
        match api.fetch_collection().await {
            Ok(entities) => self.dispatch(Action::FetchListFulfilled(request, entities)),
            Err(e) => {
                tracing::warn!("Failed to fetch {} list: {}", E::ENTITY_NAME, e);
                self.dispatch::<E>(Action::FetchRejected(request, e));
            }
        }
    }

    /// Fetch one record into `entity`.
    pub async fn fetch_entity<E: Slice>(&mut self, api: &dyn EntityApi<E>, id: &str) {
        let request = self.next_request_id();
        self.dispatch::<E>(Action::FetchEntityPending(request));
        match api.fetch_by_id(id).await {
            Ok(entity) => self.dispatch(Action::FetchEntityFulfilled(request, entity)),
            Err(e) => {
                tracing::warn!("Failed to fetch {} {}: {}", E::ENTITY_NAME, id, e);
                self.dispatch::<E>(Action::FetchRejected(request, e));
            }
        }
    }

    // Shorthands for the employee slice.

    pub async fn fetch_employees(&mut self, api: &dyn EntityApi<Employee>) {
        self.fetch_entities(api).await
    }

    pub async fn fetch_employee(&mut self, api: &dyn EntityApi<Employee>, id: &str) {
        self.fetch_entity(api, id).await
    }
}

/// Write thunks used by the create, edit and delete flows.
#[allow(dead_code)]
impl Store {
    pub fn reset<E: Slice>(&mut self) {
        self.dispatch::<E>(Action::Reset);
    }

    pub async fn create_entity<E: Slice>(&mut self, api: &dyn EntityApi<E>, entity: &E) {
        self.dispatch::<E>(Action::UpdatePending);
        let outcome = api.create(entity).await;
        self.finish_write(outcome);
    }

    pub async fn update_entity<E: Slice>(&mut self, api: &dyn EntityApi<E>, entity: &E) {
        self.dispatch::<E>(Action::UpdatePending);
        let outcome = api.update(entity).await;
        self.finish_write(outcome);
    }

    pub async fn partial_update_entity<E: Slice>(&mut self, api: &dyn EntityApi<E>, entity: &E) {
        self.dispatch::<E>(Action::UpdatePending);
        let outcome = api.partial_update(entity).await;
        self.finish_write(outcome);
    }

    pub async fn delete_entity<E: Slice>(&mut self, api: &dyn EntityApi<E>, id: i64) {
        self.dispatch::<E>(Action::UpdatePending);
        match api.delete(id).await {
            Ok(()) => self.dispatch::<E>(Action::DeleteFulfilled),
            Err(e) => self.dispatch::<E>(Action::UpdateRejected(e)),
        }
    }

    fn finish_write<E: Slice>(&mut self, outcome: Result<E, AppError>) {
        match outcome {
            Ok(entity) => self.dispatch(Action::UpdateFulfilled(entity)),
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", E::ENTITY_NAME, e);
                self.dispatch::<E>(Action::UpdateRejected(e));
            }
        }
    }

    pub async fn create_employee(&mut self, api: &dyn EntityApi<Employee>, employee: &Employee) {
        self.create_entity(api, employee).await
    }

    pub async fn update_employee(&mut self, api: &dyn EntityApi<Employee>, employee: &Employee) {
        self.update_entity(api, employee).await
    }

    pub async fn delete_employee(&mut self, api: &dyn EntityApi<Employee>, id: i64) {
        self.delete_entity(api, id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory [`EntityApi`] that records the calls it receives.
    pub(crate) struct FakeApi<E> {
        pub collection: Result<Vec<E>, AppError>,
        pub records: Vec<E>,
        pub calls: Mutex<Vec<String>>,
    }

    impl<E: Entity> FakeApi<E> {
        pub fn with_collection(collection: Vec<E>) -> Self {
            Self {
                records: collection.clone(),
                collection: Ok(collection),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: AppError) -> Self {
            Self {
                collection: Err(error),
                records: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl<E: Entity> Default for FakeApi<E> {
        fn default() -> Self {
            Self::with_collection(Vec::new())
        }
    }

    #[async_trait]
    impl<E: Entity> EntityApi<E> for FakeApi<E> {
        async fn fetch_collection(&self) -> Result<Vec<E>, AppError> {
            self.record("fetch_collection".to_string());
            self.collection.clone()
        }

        async fn fetch_by_id(&self, id: &str) -> Result<E, AppError> {
            self.record(format!("fetch_by_id:{}", id));
            self.records
                .iter()
                .find(|e| e.id().map(|i| i.to_string()).as_deref() == Some(id))
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("{} not found", id)))
        }

        async fn create(&self, entity: &E) -> Result<E, AppError> {
            self.record("create".to_string());
            Ok(entity.clone())
        }

        async fn update(&self, entity: &E) -> Result<E, AppError> {
            self.record("update".to_string());
            Ok(entity.clone())
        }

        async fn partial_update(&self, entity: &E) -> Result<E, AppError> {
            self.record("partial_update".to_string());
            Ok(entity.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), AppError> {
            self.record(format!("delete:{}", id));
            Ok(())
        }
    }

    fn employee(id: i64, first_name: &str) -> Employee {
        Employee {
            id: Some(id),
            first_name: Some(first_name.to_string()),
            ..Employee::default()
        }
    }

    #[test]
    fn test_pending_then_fulfilled() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchListPending(1));
        assert!(state.loading);
        assert_eq!(state.status, LoadStatus::Loading);

        let state = reduce(state, Action::FetchListFulfilled(1, vec![employee(1, "Ann")]));
        assert!(!state.loading);
        assert_eq!(state.status, LoadStatus::Loaded);
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_rejected_records_error() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchEntityPending(1));
        let state = reduce(
            state,
            Action::FetchRejected(1, AppError::NotFound("gone".to_string())),
        );

        assert_eq!(state.status, LoadStatus::Failed);
        assert!(!state.loading);
        assert_eq!(state.error_message().as_deref(), Some("gone"));
    }

    #[test]
    fn test_stale_response_does_not_overwrite_newer_one() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchListPending(1));
        let state = reduce(state, Action::FetchListPending(2));
        let state = reduce(state, Action::FetchListFulfilled(2, vec![employee(2, "New")]));
        let state = reduce(state, Action::FetchListFulfilled(1, vec![employee(1, "Old")]));

        assert_eq!(state.entities, vec![employee(2, "New")]);
        assert_eq!(state.status, LoadStatus::Loaded);
    }

    #[test]
    fn test_refresh_stays_loading_until_latest_completes() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchListPending(1));
        let state = reduce(state, Action::FetchListPending(2));
        let state = reduce(state, Action::FetchListFulfilled(1, vec![]));

        assert!(state.loading);
        assert_eq!(state.status, LoadStatus::Loading);
    }

    #[test]
    fn test_delete_resets_entity() {
        let mut state = EntityState::<Employee>::default();
        state.entity = employee(4, "Di");
        let state = reduce(state, Action::UpdatePending);
        assert!(state.updating);

        let state = reduce(state, Action::DeleteFulfilled);
        assert!(state.update_success);
        assert_eq!(state.entity, Employee::default());
    }

    #[test]
    fn test_entity_fetch_does_not_drop_earlier_list_response() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchListPending(1));
        let state = reduce(state, Action::FetchEntityPending(2));
        let state = reduce(state, Action::FetchListFulfilled(1, vec![employee(1, "Ann")]));
        let state = reduce(state, Action::FetchEntityFulfilled(2, employee(1, "Ann")));

        assert_eq!(state.entities, vec![employee(1, "Ann")]);
        assert_eq!(state.entity, employee(1, "Ann"));
        assert_eq!(state.status, LoadStatus::Loaded);
        assert!(!state.loading);
    }

    #[test]
    fn test_rejection_of_superseded_fetch_is_dropped() {
        let state = reduce(EntityState::<Employee>::default(), Action::FetchListPending(1));
        let state = reduce(state, Action::FetchListPending(3));
        let state = reduce(state, Action::FetchEntityPending(4));
        let state = reduce(
            state,
            Action::FetchRejected(1, AppError::Transport("late".to_string())),
        );
        assert!(state.error.is_none());
        assert!(state.loading);

        let state = reduce(
            state,
            Action::FetchRejected(3, AppError::Transport("down".to_string())),
        );
        assert_eq!(state.status, LoadStatus::Failed);
        assert_eq!(state.error_message().as_deref(), Some("down"));
    }

    #[test]
    fn test_reset_keeps_request_counters() {
        let mut store = Store::new();
        store.dispatch::<Employee>(Action::FetchListPending(5));
        store.dispatch::<Employee>(Action::FetchListFulfilled(5, vec![employee(1, "Ann")]));

        store.reset::<Employee>();
        assert!(store.employee.entities.is_empty());
        assert_eq!(store.employee.status, LoadStatus::Idle);

        store.dispatch::<Employee>(Action::FetchListFulfilled(4, vec![employee(2, "Old")]));
        assert!(store.employee.entities.is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_goes_through_api() {
        let api = FakeApi::<Employee>::default();
        let mut store = Store::new();
        let patch = Employee {
            id: Some(3),
            last_name: Some("Lee".to_string()),
            ..Employee::default()
        };

        store.partial_update_entity(&api, &patch).await;

        assert!(store.employee.update_success);
        assert!(!store.employee.updating);
        assert_eq!(store.employee.entity, patch);
        assert_eq!(api.calls(), vec!["partial_update"]);
    }

    #[tokio::test]
    async fn test_fetch_employees_fills_store() {
        let api = FakeApi::with_collection(vec![employee(1, "Ann"), employee(2, "Bo")]);
        let mut store = Store::new();

        store.fetch_employees(&api).await;

        assert_eq!(store.employee.entities.len(), 2);
        assert_eq!(store.employee.status, LoadStatus::Loaded);
        assert_eq!(api.calls(), vec!["fetch_collection"]);
    }

    #[tokio::test]
    async fn test_fetch_departments_uses_department_slice() {
        let api = FakeApi::with_collection(vec![Department::reference(3)]);
        let mut store = Store::new();

        store.fetch_entities::<Department>(&api).await;

        assert_eq!(store.department.entities, vec![Department::reference(3)]);
        assert!(store.employee.entities.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_collection() {
        let mut store = Store::new();
        store
            .fetch_employees(&FakeApi::with_collection(vec![employee(1, "Ann")]))
            .await;

        store
            .fetch_employees(&FakeApi::failing(AppError::Transport("down".to_string())))
            .await;

        assert_eq!(store.employee.entities.len(), 1);
        assert_eq!(store.employee.status, LoadStatus::Failed);
        assert_eq!(store.employee.error_message().as_deref(), Some("down"));
    }

    #[tokio::test]
    async fn test_write_helpers() {
        let api = FakeApi::<Employee>::default();
        let mut store = Store::new();

        store.create_employee(&api, &employee(5, "Eve")).await;
        assert!(store.employee.update_success);
        assert_eq!(store.employee.entity, employee(5, "Eve"));

        store.update_employee(&api, &employee(5, "Eva")).await;
        assert_eq!(store.employee.entity.first_name.as_deref(), Some("Eva"));

        store.delete_employee(&api, 5).await;
        assert_eq!(store.employee.entity, Employee::default());
        assert_eq!(api.calls(), vec!["create", "update", "delete:5"]);
    }
}
