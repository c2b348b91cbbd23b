//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;

use fleet_dashboard::config::{DashboardConfig, UpstreamTarget};
use fleet_dashboard::http::HttpServer;
use fleet_dashboard::model::{Car, CarCreate, RecordId, ServiceRecord, ServiceRecordCreate};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Canned answer from a programmable backend.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body).header("content-type", "application/json")
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

pub type Recorded = Arc<Mutex<Vec<Captured>>>;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start a backend that records every request and answers via `respond`.
pub async fn start_programmable_backend<F>(respond: F) -> (SocketAddr, Recorded)
where
    F: Fn(&Captured) -> Reply + Send + Sync + 'static,
{
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let log = recorded.clone();
    let router = Router::new().fallback(move |request: Request| {
        let log = log.clone();
        let respond = respond.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            let captured = Captured {
                method: parts.method.to_string(),
                path_and_query: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default(),
                headers: parts.headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            };
            let reply = respond(&captured);
            log.lock().unwrap().push(captured);

            let mut builder = Response::builder().status(reply.status);
            for (name, value) in reply.headers {
                builder = builder.header(name, value);
            }
            builder.body(Body::from(reply.body)).unwrap()
        }
    });

    (serve(router).await, recorded)
}

/// Start a backend that answers every request with the same reply.
pub async fn start_mock_backend(reply: Reply) -> (SocketAddr, Recorded) {
    start_programmable_backend(move |_| reply.clone()).await
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the dashboard proxy in front of `backend`.
pub async fn start_proxy(backend: SocketAddr) -> SocketAddr {
    start_proxy_with(backend, DashboardConfig::default()).await
}

pub async fn start_proxy_with(backend: SocketAddr, config: DashboardConfig) -> SocketAddr {
    let upstream = UpstreamTarget::resolve(Some(&format!("http://{backend}")));
    let server = HttpServer::new(config, upstream).unwrap();
    serve(server.router()).await
}

#[derive(Default)]
struct FleetStore {
    next_car_id: i64,
    next_record_id: i64,
    cars: Vec<Car>,
    history: HashMap<i64, Vec<ServiceRecord>>,
}

type Store = Arc<Mutex<FleetStore>>;

/// Start an in-memory fleet backend under `/api`.
///
/// Only `POST /api/cars` creates cars, so clients relying on `/car` hit a
/// 404 first.
pub async fn start_fleet_backend(cars: Vec<Car>) -> SocketAddr {
    let next_car_id = cars.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let store: Store = Arc::new(Mutex::new(FleetStore {
        next_car_id,
        next_record_id: 1,
        cars,
        history: HashMap::new(),
    }));

    let router = Router::new()
        .route("/api/cars", get(list_cars).post(create_car))
        .route("/api/cars/{id}", get(get_car).delete(delete_car))
        .route("/api/cars/{id}/service-history", get(list_history))
        .route("/api/cars/{id}/service-records", post(create_record))
        .with_state(store);

    serve(router).await
}

async fn list_cars(State(store): State<Store>) -> Json<Vec<Car>> {
    Json(store.lock().unwrap().cars.clone())
}

async fn create_car(State(store): State<Store>, Json(payload): Json<CarCreate>) -> (StatusCode, Json<Car>) {
    let mut store = store.lock().unwrap();
    let mut car = Car::new(store.next_car_id, payload.reg_number, payload.model);
    car.mileage = payload.mileage;
    car.release_year = payload.release_year;
    car.owner = payload.owner;
    store.next_car_id += 1;
    store.cars.push(car.clone());
    (StatusCode::CREATED, Json(car))
}

async fn get_car(State(store): State<Store>, Path(id): Path<i64>) -> Result<Json<Car>, StatusCode> {
    let store = store.lock().unwrap();
    store
        .cars
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_car(State(store): State<Store>, Path(id): Path<i64>) -> StatusCode {
    let mut store = store.lock().unwrap();
    let before = store.cars.len();
    store.cars.retain(|c| c.id != id);
    store.history.remove(&id);
    if store.cars.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn list_history(State(store): State<Store>, Path(id): Path<i64>) -> Json<Vec<ServiceRecord>> {
    let store = store.lock().unwrap();
    Json(store.history.get(&id).cloned().unwrap_or_default())
}

async fn create_record(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceRecordCreate>,
) -> Result<(StatusCode, Json<ServiceRecord>), StatusCode> {
    let mut store = store.lock().unwrap();
    let Some(car) = store.cars.iter_mut().find(|c| c.id == id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    if car.mileage.map_or(true, |m| m < payload.mileage) {
        car.mileage = Some(payload.mileage);
    }

    let record = ServiceRecord {
        id: RecordId::Number(store.next_record_id),
        car_id: Some(id),
        date: Some(payload.date),
        kind: Some(payload.kind),
        mileage: Some(payload.mileage),
        notes: payload.notes,
        cost: Some(payload.cost),
    };
    store.next_record_id += 1;
    store.history.entry(id).or_default().push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}
