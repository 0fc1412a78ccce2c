use chrono::NaiveDate;
use rust_decimal::Decimal;

use rydroo_domain::pagination::PageRequest;
use rydroo_domain::trip::{TripStatus, Weekday};
use rydroo_trips::error::TripsServiceError;
use rydroo_trips::usecase::trip::{
    BookSeatsInput, BookSeatsUseCase, CancelTripUseCase, CreateTripInput, CreateTripUseCase,
    GetTripUseCase, ListTripsUseCase, Numeric, UpdateTripInput, UpdateTripUseCase,
};

use crate::helpers::{MockTripRepo, test_trip, trip_at};

fn cairo_giza_input() -> CreateTripInput {
    CreateTripInput {
        source: Some("Cairo".into()),
        destination: Some("Giza".into()),
        date: Some("2024-05-01".into()),
        time: Some("10:00".into()),
        available_seats: Some(Numeric::Value(4)),
        price: Some(Decimal::new(50, 0).into()),
        currency: None,
    }
}

// ── create / get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_active_trip_and_read_it_back() {
    let repo = MockTripRepo::empty();
    let create = CreateTripUseCase { repo: repo.clone() };

    let created = create.execute(cairo_giza_input()).await.unwrap();
    assert_eq!(created.status, TripStatus::Active);
    assert_eq!(created.day, Weekday::Wednesday, "2024-05-01 is a Wednesday");

    let get = GetTripUseCase { repo };
    let fetched = get.execute(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.day, Weekday::Wednesday);
}

#[tokio::test]
async fn should_reject_second_identical_create() {
    let uc = CreateTripUseCase {
        repo: MockTripRepo::empty(),
    };
    uc.execute(cairo_giza_input()).await.unwrap();

    let result = uc.execute(cairo_giza_input()).await;
    assert!(
        matches!(result, Err(TripsServiceError::DuplicateTrip)),
        "expected DuplicateTrip, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_all_fields_on_create() {
    let uc = CreateTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let input = CreateTripInput {
        destination: Some("   ".into()),
        ..cairo_giza_input()
    };

    let result = uc.execute(input).await;
    assert!(
        matches!(result, Err(TripsServiceError::MissingFields)),
        "expected MissingFields, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_non_positive_price() {
    let uc = CreateTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let input = CreateTripInput {
        price: Some(Decimal::ZERO.into()),
        ..cairo_giza_input()
    };

    let result = uc.execute(input).await;
    assert!(
        matches!(result, Err(TripsServiceError::InvalidPrice)),
        "expected InvalidPrice, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_id_before_lookup() {
    let uc = GetTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let result = uc.execute("not-a-uuid").await;
    assert!(
        matches!(result, Err(TripsServiceError::InvalidIdentifier)),
        "expected InvalidIdentifier, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_trip() {
    let uc = GetTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let result = uc.execute(&test_trip(1).id.to_string()).await;
    assert!(
        matches!(result, Err(TripsServiceError::TripNotFound)),
        "expected TripNotFound, got {result:?}"
    );
}

// ── list ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_active_trips_in_schedule_order() {
    let may_2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let may_1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let late = trip_at(may_2, "09:00");
    let early = trip_at(may_1, "18:00");
    let mut cancelled = trip_at(may_1, "07:00");
    cancelled.status = TripStatus::Cancelled;

    let uc = ListTripsUseCase {
        repo: MockTripRepo::new(vec![late.clone(), cancelled, early.clone()]),
    };
    let trips = uc.execute(PageRequest::default()).await.unwrap();

    let ids: Vec<_> = trips.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![early.id, late.id]);
}

#[tokio::test]
async fn should_paginate_active_trips() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let trips: Vec<_> = (0..5)
        .map(|h| trip_at(date, &format!("1{h}:00")))
        .collect();
    let uc = ListTripsUseCase {
        repo: MockTripRepo::new(trips.clone()),
    };

    let page = uc.execute(PageRequest::from_query(Some(2), Some(2))).await.unwrap();
    let times: Vec<_> = page.iter().map(|t| t.time.as_str()).collect();
    assert_eq!(times, vec!["12:00", "13:00"]);

    let beyond = uc.execute(PageRequest::from_query(Some(2), Some(9))).await.unwrap();
    assert!(beyond.is_empty(), "pages past the end are empty, not errors");
}

// ── update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_update_without_allowed_fields() {
    let trip = test_trip(4);
    let uc = UpdateTripUseCase {
        repo: MockTripRepo::new(vec![trip.clone()]),
    };

    let result = uc
        .execute(&trip.id.to_string(), UpdateTripInput::default())
        .await;
    assert!(
        matches!(result, Err(TripsServiceError::NoValidFields)),
        "expected NoValidFields, got {result:?}"
    );
}

#[tokio::test]
async fn should_check_identifier_before_fields_on_update() {
    let uc = UpdateTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let result = uc.execute("bogus", UpdateTripInput::default()).await;
    assert!(
        matches!(result, Err(TripsServiceError::InvalidIdentifier)),
        "expected InvalidIdentifier, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_negative_seats_on_update() {
    let trip = test_trip(4);
    let uc = UpdateTripUseCase {
        repo: MockTripRepo::new(vec![trip.clone()]),
    };
    let result = uc
        .execute(
            &trip.id.to_string(),
            UpdateTripInput {
                available_seats: Some(Numeric::Value(-1)),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(TripsServiceError::InvalidSeats)),
        "expected InvalidSeats, got {result:?}"
    );
}

#[tokio::test]
async fn should_rederive_day_when_date_is_updated() {
    let trip = test_trip(4);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let uc = UpdateTripUseCase { repo: repo.clone() };

    let updated = uc
        .execute(
            &trip.id.to_string(),
            UpdateTripInput {
                date: Some("2024-05-03".into()),
                price: Some(Decimal::new(7550, 2).into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.day, Weekday::Friday);
    assert_eq!(updated.price, Decimal::new(7550, 2));
    assert_eq!(repo.get(trip.id).unwrap(), updated);
}

#[tokio::test]
async fn should_return_not_found_when_updating_unknown_trip() {
    let uc = UpdateTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let result = uc
        .execute(
            &test_trip(1).id.to_string(),
            UpdateTripInput {
                time: Some("11:00".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(TripsServiceError::TripNotFound)),
        "expected TripNotFound, got {result:?}"
    );
}

// ── cancel ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_once_then_report_already_cancelled() {
    let trip = test_trip(4);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let uc = CancelTripUseCase { repo: repo.clone() };
    let id = trip.id.to_string();

    let cancelled = uc.execute(&id).await.unwrap();
    assert_eq!(cancelled.status, TripStatus::Cancelled);
    let after_first = repo.get(trip.id).unwrap();

    let result = uc.execute(&id).await;
    assert!(
        matches!(result, Err(TripsServiceError::AlreadyCancelled)),
        "expected AlreadyCancelled, got {result:?}"
    );
    assert_eq!(repo.get(trip.id).unwrap(), after_first, "second cancel must not touch the trip");
}

#[tokio::test]
async fn should_allow_cancelling_completed_trip() {
    let mut trip = test_trip(0);
    trip.status = TripStatus::Completed;
    let uc = CancelTripUseCase {
        repo: MockTripRepo::new(vec![trip.clone()]),
    };

    let cancelled = uc.execute(&trip.id.to_string()).await.unwrap();
    assert_eq!(cancelled.status, TripStatus::Cancelled);
}

#[tokio::test]
async fn should_return_not_found_when_cancelling_unknown_trip() {
    let uc = CancelTripUseCase {
        repo: MockTripRepo::empty(),
    };
    let result = uc.execute(&test_trip(1).id.to_string()).await;
    assert!(
        matches!(result, Err(TripsServiceError::TripNotFound)),
        "expected TripNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_update_of_cancelled_trip() {
    let mut trip = test_trip(4);
    trip.status = TripStatus::Cancelled;
    let uc = UpdateTripUseCase {
        repo: MockTripRepo::new(vec![trip.clone()]),
    };

    let result = uc
        .execute(
            &trip.id.to_string(),
            UpdateTripInput {
                status: Some("active".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(TripsServiceError::TripCancelled)),
        "expected TripCancelled, got {result:?}"
    );
}

// ── book ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_book_seats_and_report_remaining() {
    let trip = test_trip(4);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let uc = BookSeatsUseCase { repo: repo.clone() };

    let receipt = uc
        .execute(&trip.id.to_string(), BookSeatsInput { seats: Some(3) })
        .await
        .unwrap();

    assert_eq!(receipt.trip_id, trip.id);
    assert_eq!(receipt.remaining_seats, 1);
    assert_eq!(repo.get(trip.id).unwrap().status, TripStatus::Active);
}

#[tokio::test]
async fn should_complete_trip_when_booking_every_seat() {
    let trip = test_trip(4);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let uc = BookSeatsUseCase { repo: repo.clone() };

    let receipt = uc
        .execute(&trip.id.to_string(), BookSeatsInput { seats: Some(4) })
        .await
        .unwrap();

    assert_eq!(receipt.remaining_seats, 0);
    let stored = repo.get(trip.id).unwrap();
    assert_eq!(stored.status, TripStatus::Completed);
    assert_eq!(stored.available_seats, 0);
}

#[tokio::test]
async fn should_leave_trip_unchanged_when_booking_one_seat_too_many() {
    let trip = test_trip(4);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let uc = BookSeatsUseCase { repo: repo.clone() };

    let result = uc
        .execute(&trip.id.to_string(), BookSeatsInput { seats: Some(5) })
        .await;

    assert!(
        matches!(result, Err(TripsServiceError::BookingUnavailable)),
        "expected BookingUnavailable, got {result:?}"
    );
    assert_eq!(repo.get(trip.id).unwrap(), trip);
}

#[tokio::test]
async fn should_not_distinguish_missing_from_inactive_when_booking() {
    let mut cancelled = test_trip(4);
    cancelled.status = TripStatus::Cancelled;
    let uc = BookSeatsUseCase {
        repo: MockTripRepo::new(vec![cancelled.clone()]),
    };

    let on_cancelled = uc
        .execute(&cancelled.id.to_string(), BookSeatsInput { seats: Some(1) })
        .await;
    let on_missing = uc
        .execute(&test_trip(4).id.to_string(), BookSeatsInput { seats: Some(1) })
        .await;

    assert!(matches!(on_cancelled, Err(TripsServiceError::BookingUnavailable)));
    assert!(matches!(on_missing, Err(TripsServiceError::BookingUnavailable)));
}

#[tokio::test]
async fn should_reject_non_positive_seat_count() {
    let trip = test_trip(4);
    let uc = BookSeatsUseCase {
        repo: MockTripRepo::new(vec![trip.clone()]),
    };

    for seats in [None, Some(0), Some(-2)] {
        let result = uc
            .execute(&trip.id.to_string(), BookSeatsInput { seats })
            .await;
        assert!(
            matches!(result, Err(TripsServiceError::InvalidSeatCount)),
            "seats={seats:?}: expected InvalidSeatCount, got {result:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_never_oversell_under_concurrent_bookings() {
    let trip = test_trip(5);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let trip_id = trip.id.to_string();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let uc = BookSeatsUseCase { repo: repo.clone() };
            let trip_id = trip_id.clone();
            tokio::spawn(async move {
                uc.execute(&trip_id, BookSeatsInput { seats: Some(2) }).await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(TripsServiceError::BookingUnavailable) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    // 5 seats fit two bookings of 2; the last seat can never satisfy a third.
    assert_eq!(succeeded, 2);
    let stored = repo.get(trip.id).unwrap();
    assert_eq!(stored.available_seats, 1);
    assert_eq!(stored.status, TripStatus::Active);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_give_last_seat_to_exactly_one_booker() {
    let trip = test_trip(1);
    let repo = MockTripRepo::new(vec![trip.clone()]);
    let trip_id = trip.id.to_string();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let uc = BookSeatsUseCase { repo: repo.clone() };
            let trip_id = trip_id.clone();
            tokio::spawn(async move {
                uc.execute(&trip_id, BookSeatsInput { seats: Some(1) }).await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 1);
    let stored = repo.trips_handle().lock().unwrap()[0].clone();
    assert_eq!(stored.available_seats, 0);
    assert_eq!(stored.status, TripStatus::Completed);
}
