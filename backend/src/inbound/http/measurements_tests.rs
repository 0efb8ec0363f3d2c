//! Tests for measurement HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockMeasurementCommand, MockMeasurementQuery};
use crate::domain::{
    Error, Measurement, MeasurementDate, MeasurementId, NewMeasurement, TRACE_ID_HEADER,
};
use crate::inbound::http::test_utils::test_app;

fn stored_from(request: RecordMeasurementRequest) -> Measurement {
    let date = request
        .date
        .unwrap_or_else(|| "2023-11-05T10:00:00.000Z".to_owned());
    Measurement::create(
        MeasurementId::from_uuid(Uuid::nil()),
        NewMeasurement {
            user_id: request.user_id,
            reading: request.reading,
            date: MeasurementDate::from_parts(date, None),
        },
    )
}

async fn post_reading(command: MockMeasurementCommand, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(command, MockMeasurementQuery::new())).await;
    let request = actix_test::TestRequest::post()
        .uri("/bp/user1")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

#[rstest]
#[actix_web::test]
async fn record_returns_created_with_stored_measurement() {
    let mut command = MockMeasurementCommand::new();
    command
        .expect_record()
        .times(1)
        .withf(|request| {
            request.user_id.to_string() == "user1"
                && request.reading.systolic() == 120
                && request.reading.diastolic() == 80
                && request.reading.pulse() == Some(72)
        })
        .returning(|request| Ok(stored_from(request)));

    let (status, body) = post_reading(
        command,
        json!({"systolic": 120, "diastolic": "80", "pulse": 72}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "message": "המדידה נשמרה",
            "measurement": {
                "id": "00000000-0000-0000-0000-000000000000",
                "userId": "user1",
                "systolic": 120,
                "diastolic": 80,
                "pulse": 72,
                "date": "2023-11-05T10:00:00.000Z",
            }
        })
    );
}

#[rstest]
#[actix_web::test]
async fn record_passes_submitted_date_through() {
    let mut command = MockMeasurementCommand::new();
    command
        .expect_record()
        .times(1)
        .withf(|request| request.date.as_deref() == Some("2023-11-01"))
        .returning(|request| Ok(stored_from(request)));

    let (status, body) = post_reading(
        command,
        json!({"systolic": 120, "diastolic": 80, "date": "2023-11-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["measurement"]["date"], json!("2023-11-01"));
    assert_eq!(body["measurement"]["pulse"], Value::Null);
}

#[rstest]
#[case(json!({"systolic": 0, "diastolic": 80}), "חייב לשלוח ערך גבוה ונמוך")]
#[case(json!({"diastolic": 80}), "חייב לשלוח ערך גבוה ונמוך")]
#[case(json!({"systolic": "abc", "diastolic": 80}), "הערכים חייבים להיות מספרים")]
#[case(json!({"systolic": 120, "diastolic": 80, "pulse": "x"}), "הערכים חייבים להיות מספרים")]
#[case(json!({"systolic": 300, "diastolic": 80}), "הערכים לא הגיוניים")]
#[actix_web::test]
async fn record_rejects_invalid_readings(#[case] payload: Value, #[case] message: &str) {
    let mut command = MockMeasurementCommand::new();
    command.expect_record().never();

    let (status, body) = post_reading(command, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": message}));
}

#[rstest]
#[actix_web::test]
async fn record_maps_storage_failure_to_500() {
    let mut command = MockMeasurementCommand::new();
    command
        .expect_record()
        .times(1)
        .returning(|_| Err(Error::internal("שגיאה בשמירה")));

    let (status, body) = post_reading(command, json!({"systolic": 120, "diastolic": 80})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "שגיאה בשמירה"}));
}

#[rstest]
#[actix_web::test]
async fn record_rejects_malformed_json_with_trace_header() {
    let mut command = MockMeasurementCommand::new();
    command.expect_record().never();
    let app = actix_test::init_service(test_app(command, MockMeasurementQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/bp/user1")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"systolic\": ")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(response).await;
    assert!(body.get("error").and_then(Value::as_str).is_some());
}

#[rstest]
#[actix_web::test]
async fn list_returns_measurements_for_user() {
    let mut query = MockMeasurementQuery::new();
    query
        .expect_list_measurements()
        .times(1)
        .returning(|user_id| {
            Ok(vec![Measurement {
                id: MeasurementId::from_uuid(Uuid::nil()),
                user_id: user_id.clone(),
                systolic: 118,
                diastolic: 76,
                pulse: Some(64),
                date: MeasurementDate::from_parts("2023-11-05T10:00:00.000Z", None),
            }])
        });
    let app = actix_test::init_service(test_app(MockMeasurementCommand::new(), query)).await;

    let request = actix_test::TestRequest::get().uri("/bp/user1").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["userId"], json!("user1"));
    assert_eq!(body["measurements"][0]["systolic"], json!(118));
    assert_eq!(body["measurements"][0]["pulse"], json!(64));
}

#[rstest]
#[actix_web::test]
async fn list_maps_not_found() {
    let mut query = MockMeasurementQuery::new();
    query
        .expect_list_measurements()
        .times(1)
        .returning(|_| Err(Error::not_found("אין נתונים למשתמש הזה")));
    let app = actix_test::init_service(test_app(MockMeasurementCommand::new(), query)).await;

    let request = actix_test::TestRequest::get()
        .uri("/bp/unknownUser")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"error": "אין נתונים למשתמש הזה"}));
}
