//! Tests for the measurement service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::MockMeasurementRepository;
use crate::domain::{CohortAverages, ErrorCode, RawReading, ValidatedReading, validate_reading};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 5, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn user_id() -> UserId {
    UserId::new("user1").expect("valid id")
}

fn make_service(
    repo: MockMeasurementRepository,
    now: DateTime<Utc>,
) -> MeasurementService<MockMeasurementRepository> {
    MeasurementService::new(Arc::new(repo), Arc::new(FixtureClock { utc_now: now }))
}

fn reading(systolic: i64, diastolic: i64) -> ValidatedReading {
    validate_reading(&RawReading {
        systolic: Some(json!(systolic)),
        diastolic: Some(json!(diastolic)),
        pulse: None,
    })
    .expect("reading accepted")
}

fn stored(user_id: &UserId, systolic: i32, diastolic: i32, date: &str) -> Measurement {
    Measurement {
        id: MeasurementId::random(),
        user_id: user_id.clone(),
        systolic,
        diastolic,
        pulse: None,
        date: MeasurementDate::parse_in(date, &Utc),
    }
}

#[rstest]
#[tokio::test]
async fn record_defaults_date_to_clock(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_append().times(1).returning(|_| Ok(()));
    let service = make_service(repo, now);

    let measurement = service
        .record(RecordMeasurementRequest {
            user_id: user_id.clone(),
            reading: reading(120, 80),
            date: None,
        })
        .await
        .expect("record succeeds");

    assert_eq!(measurement.user_id, user_id);
    assert_eq!(measurement.date.as_str(), "2023-11-05T10:00:00.000Z");
    assert_eq!(measurement.date.instant(), Some(now));
}

#[rstest]
#[tokio::test]
async fn record_treats_empty_date_as_absent(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_append().times(1).returning(|_| Ok(()));
    let service = make_service(repo, now);

    let measurement = service
        .record(RecordMeasurementRequest {
            user_id,
            reading: reading(120, 80),
            date: Some(String::new()),
        })
        .await
        .expect("record succeeds");

    assert_eq!(measurement.date.as_str(), "2023-11-05T10:00:00.000Z");
}

#[rstest]
#[tokio::test]
async fn record_keeps_submitted_date_verbatim(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_append()
        .times(1)
        .withf(|m| m.date.as_str() == "2023-10-01T08:30:00Z")
        .returning(|_| Ok(()));
    let service = make_service(repo, now);

    let measurement = service
        .record(RecordMeasurementRequest {
            user_id,
            reading: reading(120, 80),
            date: Some("2023-10-01T08:30:00Z".to_owned()),
        })
        .await
        .expect("record succeeds");

    let expected = Utc
        .with_ymd_and_hms(2023, 10, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp");
    assert_eq!(measurement.date.instant(), Some(expected));
}

#[rstest]
#[tokio::test]
async fn record_maps_storage_failure_to_generic_message(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_append()
        .times(1)
        .returning(|_| Err(MeasurementRepositoryError::query("relation missing")));
    let service = make_service(repo, now);

    let error = service
        .record(RecordMeasurementRequest {
            user_id,
            reading: reading(120, 80),
            date: None,
        })
        .await
        .expect_err("storage failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), WRITE_FAILURE_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn list_returns_not_found_for_unknown_user(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let service = make_service(repo, now);

    let error = service
        .list_measurements(&user_id)
        .await
        .expect_err("no measurements");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), NO_MEASUREMENTS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn list_reads_without_window(user_id: UserId, now: DateTime<Utc>) {
    let rows = vec![stored(&user_id, 120, 80, "2023-11-01T08:00:00Z")];
    let expected = rows.clone();
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .withf(|_, range| range.is_none())
        .return_once(move |_, _| Ok(rows));
    let service = make_service(repo, now);

    let measurements = service
        .list_measurements(&user_id)
        .await
        .expect("measurements listed");

    assert_eq!(measurements, expected);
}

#[rstest]
#[tokio::test]
async fn list_maps_storage_failure_to_read_message(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .returning(|_, _| Err(MeasurementRepositoryError::connection("refused")));
    let service = make_service(repo, now);

    let error = service
        .list_measurements(&user_id)
        .await
        .expect_err("storage failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), READ_FAILURE_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn history_highlights_relative_to_window(user_id: UserId, now: DateTime<Utc>) {
    let rows = vec![
        stored(&user_id, 120, 80, "2023-11-01T08:00:00Z"),
        stored(&user_id, 120, 80, "2023-11-02T08:00:00Z"),
        stored(&user_id, 120, 80, "2023-11-03T08:00:00Z"),
        stored(&user_id, 180, 80, "2023-11-04T08:00:00Z"),
    ];
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .return_once(move |_, _| Ok(rows));
    let service = make_service(repo, now);

    let history = service
        .history(&user_id, HistoryBounds::default())
        .await
        .expect("history built");

    assert_eq!(history.user_id, user_id);
    assert_eq!(
        history.averages,
        CohortAverages {
            systolic: 135.0,
            diastolic: 80.0
        }
    );
    let flags: Vec<bool> = history.measurements.iter().map(|m| m.highlight).collect();
    assert_eq!(flags, vec![false, false, false, true]);
}

#[rstest]
#[tokio::test]
async fn history_passes_window_when_both_bounds_present(user_id: UserId, now: DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(2023, 11, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    let end = Utc
        .with_ymd_and_hms(2023, 11, 2, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    let rows = vec![stored(&user_id, 120, 80, "2023-11-01T08:00:00Z")];
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .withf(move |_, range| *range == Some(DateRange::new(start, end)))
        .return_once(move |_, _| Ok(rows));
    let service = make_service(repo, now);

    let history = service
        .history(
            &user_id,
            HistoryBounds {
                start_date: Some("2023-11-01T00:00:00Z".to_owned()),
                end_date: Some("2023-11-02T00:00:00Z".to_owned()),
            },
        )
        .await
        .expect("history built");

    assert_eq!(history.measurements.len(), 1);
}

#[rstest]
#[case(Some("2023-11-01"), None)]
#[case(None, Some("2023-11-30"))]
#[case(Some(""), Some("2023-11-30"))]
#[tokio::test]
async fn history_ignores_single_bound(
    user_id: UserId,
    now: DateTime<Utc>,
    #[case] start_date: Option<&str>,
    #[case] end_date: Option<&str>,
) {
    let rows = vec![stored(&user_id, 120, 80, "2023-11-01T08:00:00Z")];
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .withf(|_, range| range.is_none())
        .return_once(move |_, _| Ok(rows));
    let service = make_service(repo, now);

    let history = service
        .history(
            &user_id,
            HistoryBounds {
                start_date: start_date.map(str::to_owned),
                end_date: end_date.map(str::to_owned),
            },
        )
        .await
        .expect("history built");

    assert_eq!(history.measurements.len(), 1);
}

#[rstest]
#[tokio::test]
async fn history_with_unreadable_bound_is_not_found(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user().never();
    let service = make_service(repo, now);

    let error = service
        .history(
            &user_id,
            HistoryBounds {
                start_date: Some("yesterday".to_owned()),
                end_date: Some("2023-11-30".to_owned()),
            },
        )
        .await
        .expect_err("unreadable bound matches nothing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), NO_MEASUREMENTS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn history_of_empty_window_is_not_found(user_id: UserId, now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_find_by_user()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let service = make_service(repo, now);

    let error = service
        .history(&user_id, HistoryBounds::default())
        .await
        .expect_err("empty cohort");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn summary_reports_zero_entry_for_idle_user(now: DateTime<Utc>) {
    let idle = UserId::new("idle").expect("valid id");
    let listed = idle.clone();
    let mut repo = MockMeasurementRepository::new();
    repo.expect_list_user_ids()
        .times(1)
        .return_once(move || Ok(vec![listed]));
    repo.expect_find_by_user()
        .times(1)
        .withf(|_, range| range.is_some())
        .returning(|_, _| Ok(Vec::new()));
    let service = make_service(repo, now);
    let month: YearMonth = "2099-01".parse().expect("valid month");

    let summary = service.monthly_summary(month).await.expect("summary built");

    assert_eq!(summary.month, month);
    assert_eq!(
        summary.entries,
        vec![SummaryEntry::Summary(UserSummary {
            user_id: idle,
            averages: CohortAverages::ZERO,
            outlier_count: 0,
        })]
    );
}

#[rstest]
#[tokio::test]
async fn summary_degrades_failed_user_only(now: DateTime<Utc>) {
    let healthy = UserId::new("healthy").expect("valid id");
    let broken = UserId::new("broken").expect("valid id");
    let listed = vec![healthy.clone(), broken.clone()];
    let failing = broken.clone();
    let rows = vec![
        stored(&healthy, 100, 70, "2023-11-10T12:00:00Z"),
        stored(&healthy, 100, 70, "2023-11-11T12:00:00Z"),
        stored(&healthy, 100, 70, "2023-11-12T12:00:00Z"),
        stored(&healthy, 160, 70, "2023-11-13T12:00:00Z"),
    ];
    let mut repo = MockMeasurementRepository::new();
    repo.expect_list_user_ids()
        .times(1)
        .return_once(move || Ok(listed));
    repo.expect_find_by_user()
        .times(2)
        .returning(move |user_id, _| {
            if user_id == &failing {
                Err(MeasurementRepositoryError::query("timeout"))
            } else {
                Ok(rows.clone())
            }
        });
    let service = make_service(repo, now);
    let month: YearMonth = "2023-11".parse().expect("valid month");

    let summary = service.monthly_summary(month).await.expect("summary built");

    assert_eq!(summary.entries.len(), 2);
    let SummaryEntry::Summary(first) = &summary.entries[0] else {
        panic!("healthy user should be summarised");
    };
    assert_eq!(first.user_id, healthy);
    assert_eq!(first.averages.systolic, 115.0);
    assert_eq!(first.outlier_count, 1);
    assert_eq!(
        summary.entries[1],
        SummaryEntry::Unavailable {
            user_id: broken,
            message: READ_FAILURE_MESSAGE.to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn summary_fails_when_users_cannot_be_listed(now: DateTime<Utc>) {
    let mut repo = MockMeasurementRepository::new();
    repo.expect_list_user_ids()
        .times(1)
        .returning(|| Err(MeasurementRepositoryError::connection("refused")));
    let service = make_service(repo, now);
    let month: YearMonth = "2023-11".parse().expect("valid month");

    let error = service
        .monthly_summary(month)
        .await
        .expect_err("listing failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), READ_FAILURE_MESSAGE);
}
