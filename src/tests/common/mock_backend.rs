//! In-process stand-in for the booking REST service, served over a real
//! socket so the reqwest client can be exercised end to end.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const VALID_TOKEN: &str = "good-token";
pub const VALID_PASSWORD: &str = "secret";

/// Date with bookable slots
pub const OPEN_DATE: &str = "2024-06-15";
/// Date for which the server fails with a 500
pub const FAILING_DATE: &str = "1999-01-01";
/// Date for which the server answers 200 with a malformed body
pub const GARBLED_DATE: &str = "2000-01-01";
/// Bookings for this team get only `{ booking: { id, status } }` back
pub const MINIMAL_REPLY_TEAM: &str = "Minimal";

#[derive(Default)]
pub struct BackendState {
    pub bookings: Mutex<Vec<Value>>,
    pub slot_queries: Mutex<Vec<String>>,
    pub booking_requests: Mutex<usize>,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub fn booking_requests(&self) -> usize {
        *self.state.booking_requests.lock().unwrap()
    }

    pub fn slot_queries(&self) -> Vec<String> {
        self.state.slot_queries.lock().unwrap().clone()
    }
}

pub async fn spawn() -> MockBackend {
    let state = Arc::new(BackendState::default());

    let app = Router::new()
        .route("/api/available-slots", get(available_slots))
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/user", get(user_bookings))
        .route("/api/login", post(login))
        .route("/api/calculate-price", post(calculate_price))
        .route("/api/initiate-payment", post(initiate_payment))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false)
}

async fn available_slots(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let date = params.get("date").cloned().unwrap_or_default();
    state.slot_queries.lock().unwrap().push(date.clone());

    match date.as_str() {
        FAILING_DATE => message(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching slots"),
        GARBLED_DATE => Json(json!({ "slots": "soon" })).into_response(),
        OPEN_DATE => {
            let booked: Vec<String> = state
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b["booking_date"] == OPEN_DATE)
                .filter_map(|b| b["start_time"].as_str().map(str::to_string))
                .collect();

            let slots: Vec<Value> = [
                json!({ "start_time": "6:00 AM", "end_time": "8:00 AM", "sports": ["Football", "Cricket"] }),
                json!({ "start_time": "6:00 PM", "end_time": "7:00 PM", "sports": ["Football"] }),
            ]
            .into_iter()
            .filter(|slot| {
                !booked
                    .iter()
                    .any(|start| slot["start_time"].as_str() == Some(start.as_str()))
            })
            .collect();
            Json(Value::Array(slots)).into_response()
        }
        _ => Json(json!([])).into_response(),
    }
}

async fn create_booking(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *state.booking_requests.lock().unwrap() += 1;

    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let sport = body["sport"].as_str().unwrap_or_default();
    if sport.is_empty() || body["team_name"].as_str().unwrap_or_default().is_empty() {
        return message(StatusCode::BAD_REQUEST, "Missing required fields");
    }

    let mut bookings = state.bookings.lock().unwrap();
    let booking = json!({
        "id": bookings.len() as i64 + 1,
        "sport": sport,
        "booking_date": body["booking_date"],
        "start_time": body["start_time"],
        "end_time": body["end_time"],
        "status": "pending",
    });
    bookings.push(booking.clone());

    if body["team_name"] == MINIMAL_REPLY_TEAM {
        return (
            StatusCode::CREATED,
            Json(json!({ "booking": { "id": booking["id"], "status": "pending" } })),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Booking created successfully", "booking": booking })),
    )
        .into_response()
}

async fn user_bookings(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let bookings = state.bookings.lock().unwrap().clone();
    Json(Value::Array(bookings)).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != VALID_PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    Json(json!({
        "token": VALID_TOKEN,
        "user": {
            "id": 1,
            "username": body["username"],
            "team_name": "Eagles",
            "is_admin": false
        }
    }))
    .into_response()
}

async fn calculate_price(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if body["timeSlot"].as_str().unwrap_or_default().is_empty() {
        return message(StatusCode::BAD_REQUEST, "Missing time slot");
    }
    Json(json!({
        "basePrice": 1500,
        "discounts": [{ "name": "Early bird", "amount": 450 }],
        "finalAmount": 1050,
        "currency": "INR"
    }))
    .into_response()
}

async fn initiate_payment(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return message(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let amount = body["amount"].as_i64().unwrap_or_default();
    let booking_id = body["bookingDetails"]["bookingId"].as_i64().unwrap_or_default();
    Json(json!({
        "upiLinks": {
            "default": format!("upi://pay?pa=turfzone@ybl&am={}&tr={}", amount, booking_id),
            "gpay": format!("gpay://upi/pay?pa=turfzone@ybl&am={}&tr={}", amount, booking_id)
        },
        "merchantDetails": {
            "name": "TurfZone",
            "upiId": "turfzone@ybl",
            "amount": amount,
            "note": format!("Booking {}", booking_id)
        }
    }))
    .into_response()
}
