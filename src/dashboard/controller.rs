//! Dashboard controller.
//!
//! Owns the transient UI state and turns user actions into API calls.
//!
//! # State transitions
//! ```text
//! mount ──▶ load_cars ──▶ keep selection / select first / none
//!                              │ (selection changed)
//!                              ▼
//!                         load_history(selected)
//!
//! submit_service_record ─ validate ─▶ create ─▶ close dialog ─▶ history + cars (joined)
//! submit_car            ─ validate ─▶ create ─▶ close dialog ─▶ cars ─▶ select created
//! delete_selected_car   ─ confirm  ─▶ delete ─▶ drop locally ─▶ select first ─▶ cars
//! ```
//!
//! Any API failure lands in `state.error` and leaves the rest of the state as
//! it was. Loading flags are indicators, not locks.

use chrono::{Local, NaiveDate};

use crate::api::{ApiError, ApiResult, FleetApi};
use crate::dashboard::forms::{CarForm, FormError, ServiceForm};
use crate::model::{Car, ServiceRecord};
use crate::view;

/// Open/submitting flags plus the form behind a dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dialog<F> {
    pub open: bool,
    pub submitting: bool,
    pub form: F,
}

/// Everything the dashboard renders from.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub cars: Vec<Car>,
    pub cars_loading: bool,
    pub selected_car_id: Option<i64>,
    pub history: Vec<ServiceRecord>,
    pub history_loading: bool,
    pub query: String,
    pub error: Option<String>,
    pub service_dialog: Dialog<ServiceForm>,
    pub car_dialog: Dialog<CarForm>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Drives the dashboard against any [`FleetApi`].
pub struct DashboardController<A> {
    api: A,
    state: DashboardState,
    today: fn() -> NaiveDate,
}

impl<A: FleetApi> DashboardController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: DashboardState::default(),
            today: local_today,
        }
    }

    /// Replace the clock used for form dates and overdue checks.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    // ---- derived view state ----

    pub fn selected_car(&self) -> Option<&Car> {
        let id = self.state.selected_car_id?;
        self.state.cars.iter().find(|car| car.id == id)
    }

    pub fn filtered_cars(&self) -> Vec<&Car> {
        view::filter_cars(&self.state.cars, &self.state.query)
    }

    pub fn sorted_history(&self) -> Vec<&ServiceRecord> {
        view::sort_history(&self.state.history)
    }

    pub fn next_service_km(&self) -> Option<i64> {
        self.selected_car().and_then(view::suggested_next_service_km)
    }

    pub fn is_overdue(&self, car: &Car) -> bool {
        view::is_overdue(car, self.today())
    }

    pub fn selected_overdue(&self) -> bool {
        self.selected_car().is_some_and(|car| self.is_overdue(car))
    }

    // ---- loading ----

    /// Initial load.
    pub async fn mount(&mut self) {
        self.load_cars().await;
    }

    /// Fetch the car list and reconcile the selection with it.
    pub async fn load_cars(&mut self) {
        self.state.error = None;
        self.fetch_cars().await;
    }

    /// Fetch the service history of `car_id`.
    pub async fn load_history(&mut self, car_id: i64) {
        self.state.error = None;
        self.fetch_history(car_id).await;
    }

    /// Select a car; its history is loaded when the selection changes.
    pub async fn select_car(&mut self, car_id: i64) {
        if self.state.selected_car_id != Some(car_id) {
            self.state.error = None;
        }
        self.set_selection(Some(car_id)).await;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
    }

    // fetch_* never clear `state.error`; only the public entry points do.

    /// Returns `true` when the list was refreshed.
    async fn fetch_cars(&mut self) -> bool {
        self.state.cars_loading = true;
        let result = self.api.list_cars().await;
        self.finish_cars(result).await
    }

    async fn fetch_history(&mut self, car_id: i64) {
        self.state.history_loading = true;
        let result = self.api.list_service_history(car_id).await;
        self.finish_history(result);
    }

    async fn set_selection(&mut self, next: Option<i64>) {
        if next == self.state.selected_car_id {
            return;
        }
        tracing::debug!(from = ?self.state.selected_car_id, to = ?next, "Selection changed");
        self.state.selected_car_id = next;
        match next {
            Some(id) => self.fetch_history(id).await,
            None => self.state.history.clear(),
        }
    }

    async fn finish_cars(&mut self, result: ApiResult<Vec<Car>>) -> bool {
        self.state.cars_loading = false;
        match result {
            Ok(cars) => {
                let keep = self
                    .state
                    .selected_car_id
                    .filter(|id| cars.iter().any(|car| car.id == *id));
                let next = keep.or_else(|| cars.first().map(|car| car.id));
                tracing::debug!(count = cars.len(), "Cars loaded");
                self.state.cars = cars;
                self.set_selection(next).await;
                true
            }
            Err(err) => {
                self.report(&err, "Failed to load cars");
                false
            }
        }
    }

    fn finish_history(&mut self, result: ApiResult<Vec<ServiceRecord>>) {
        self.state.history_loading = false;
        match result {
            Ok(records) => self.state.history = records,
            Err(err) => {
                self.state.history.clear();
                self.report(&err, "Failed to load history");
            }
        }
    }

    /// Refresh history and the car list together after a write.
    async fn refresh_after_record(&mut self, car_id: i64) {
        self.state.history_loading = true;
        self.state.cars_loading = true;
        let (history, cars) = tokio::join!(
            self.api.list_service_history(car_id),
            self.api.list_cars()
        );
        self.finish_history(history);
        self.finish_cars(cars).await;
    }

    fn report(&mut self, err: &ApiError, fallback: &str) {
        let message = err.user_message(fallback);
        tracing::warn!(status = ?err.status(), error = %err, "{}", fallback);
        self.state.error = Some(message);
    }

    fn reject(&mut self, err: FormError) {
        tracing::debug!(error = %err, "Form rejected");
        self.state.error = Some(err.to_string());
    }

    // ---- service record dialog ----

    /// Open the service record dialog with a fresh form.
    pub fn open_service_dialog(&mut self) {
        self.open_service_dialog_with(|_| {});
    }

    /// Open the service record dialog, letting `defaults` adjust the fresh form.
    pub fn open_service_dialog_with(&mut self, defaults: impl FnOnce(&mut ServiceForm)) {
        let mut form = ServiceForm::blank(self.selected_car(), self.today());
        defaults(&mut form);
        self.state.service_dialog = Dialog {
            open: true,
            submitting: false,
            form,
        };
    }

    pub fn service_form_mut(&mut self) -> &mut ServiceForm {
        &mut self.state.service_dialog.form
    }

    pub fn close_service_dialog(&mut self) {
        self.state.service_dialog.open = false;
    }

    /// Validate and create a service record for the selected car.
    ///
    /// Returns `true` when the record was created.
    pub async fn submit_service_record(&mut self) -> bool {
        let Some(car_id) = self.selected_car().map(|car| car.id) else {
            self.reject(FormError::NoCarSelected);
            return false;
        };
        let payload = match self.state.service_dialog.form.validate() {
            Ok(payload) => payload,
            Err(err) => {
                self.reject(err);
                return false;
            }
        };

        self.state.service_dialog.submitting = true;
        self.state.error = None;
        let created = match self.api.create_service_record(car_id, &payload).await {
            Ok(_) => {
                tracing::info!(car_id, kind = %payload.kind, "Service record created");
                self.state.service_dialog.open = false;
                self.refresh_after_record(car_id).await;
                true
            }
            Err(err) => {
                self.report(&err, "Failed to create record");
                false
            }
        };
        self.state.service_dialog.submitting = false;
        created
    }

    // ---- car dialog ----

    pub fn open_car_dialog(&mut self) {
        self.open_car_dialog_with(|_| {});
    }

    pub fn open_car_dialog_with(&mut self, defaults: impl FnOnce(&mut CarForm)) {
        let mut form = CarForm::default();
        defaults(&mut form);
        self.state.car_dialog = Dialog {
            open: true,
            submitting: false,
            form,
        };
    }

    pub fn car_form_mut(&mut self) -> &mut CarForm {
        &mut self.state.car_dialog.form
    }

    pub fn close_car_dialog(&mut self) {
        self.state.car_dialog.open = false;
    }

    /// Validate and create a car, then select it.
    ///
    /// Returns `true` when the car was created.
    pub async fn submit_car(&mut self) -> bool {
        let payload = match self.state.car_dialog.form.validate() {
            Ok(payload) => payload,
            Err(err) => {
                self.reject(err);
                return false;
            }
        };

        self.state.car_dialog.submitting = true;
        self.state.error = None;
        let created = match self.api.create_car(&payload).await {
            Ok(car) => {
                tracing::info!(reg_number = %payload.reg_number, id = ?car.as_ref().map(|c| c.id), "Car created");
                self.state.car_dialog.open = false;
                if self.fetch_cars().await {
                    if let Some(car) = car {
                        self.set_selection(Some(car.id)).await;
                    }
                }
                true
            }
            Err(err) => {
                self.report(&err, "Failed to create car");
                false
            }
        };
        self.state.car_dialog.submitting = false;
        created
    }

    // ---- deletion ----

    /// Delete the selected car after `confirm` accepts the prompt.
    ///
    /// Returns `true` when the car was deleted.
    pub async fn delete_selected_car(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        let Some(car) = self.selected_car().cloned() else {
            return false;
        };
        let prompt = format!("Delete {}? This cannot be undone.", car.reg_number);
        if !confirm(&prompt) {
            return false;
        }

        self.state.error = None;
        match self.api.delete_car(car.id).await {
            Ok(()) => {
                tracing::info!(id = car.id, reg_number = %car.reg_number, "Car deleted");
                self.state.cars.retain(|c| c.id != car.id);
                self.state.history.clear();
                let next = self.state.cars.first().map(|c| c.id);
                self.set_selection(next).await;
                self.fetch_cars().await;
                true
            }
            Err(err) => {
                self.report(&err, "Failed to delete car");
                false
            }
        }
    }
}
