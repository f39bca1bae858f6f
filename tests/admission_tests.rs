//! Admission engine tests against the in-memory repository.

mod support;

use std::sync::Arc;

use parkade_rust::db::repository::ReservationRepository;
use parkade_rust::models::{Role, SlotStatus};
use parkade_rust::services::admission::{
    admit_reservation, cancel_reservation, list_all_reservations, list_reservations_for_user,
};
use parkade_rust::services::{ReservationNotifier, ReservationRequest, ServiceError};

use support::*;

fn notifier() -> Arc<dyn ReservationNotifier> {
    Arc::new(parkade_rust::services::LogNotifier)
}

#[tokio::test]
async fn admits_a_valid_reservation() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let request = reservation_request(slot.id, hours_from_now(1), hours_from_now(2));
    let reservation = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap();

    assert_eq!(reservation.user_id, user.id);
    assert_eq!(reservation.slot_id, slot.id);
    assert!(!reservation.canceled);
}

#[tokio::test]
async fn back_to_back_windows_both_admit() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let boundary = hours_from_now(11);
    let first = reservation_request(slot.id, hours_from_now(10), boundary);
    admit_reservation(&repo, &notifier(), user.id, first)
        .await
        .unwrap();

    // [10:00, 11:00) then [11:00, 12:00): the shared endpoint is free.
    let second =
        reservation_request(slot.id, boundary, boundary + chrono::Duration::hours(1));
    admit_reservation(&repo, &notifier(), user.id, second)
        .await
        .unwrap();
}

#[tokio::test]
async fn overlapping_window_is_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let base = hours_from_now(10);
    let first = reservation_request(slot.id, base, base + chrono::Duration::hours(1));
    admit_reservation(&repo, &notifier(), user.id, first)
        .await
        .unwrap();

    // [10:30, 11:30) against [10:00, 11:00)
    let overlapping = reservation_request(
        slot.id,
        base + chrono::Duration::minutes(30),
        base + chrono::Duration::minutes(90),
    );
    let err = admit_reservation(&repo, &notifier(), user.id, overlapping)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn past_start_time_is_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    // End time far in the future does not rescue a past start.
    let request = reservation_request(slot.id, hours_from_now(-1), hours_from_now(48));
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn inverted_or_empty_range_is_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let inverted = reservation_request(slot.id, hours_from_now(5), hours_from_now(4));
    let err = admit_reservation(&repo, &notifier(), user.id, inverted)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let instant = hours_from_now(5);
    let empty = reservation_request(slot.id, instant, instant);
    let err = admit_reservation(&repo, &notifier(), user.id, empty)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;

    let request = ReservationRequest {
        slot_id: None,
        start_time: Some(hours_from_now(1).to_rfc3339()),
        end_time: Some(hours_from_now(2).to_rfc3339()),
    };
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn unparseable_times_are_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let request = ReservationRequest {
        slot_id: Some(slot.id.to_string()),
        start_time: Some("tomorrow at noon".to_string()),
        end_time: Some(hours_from_now(2).to_rfc3339()),
    };
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn unavailable_slot_is_rejected_even_with_empty_calendar() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Unavailable).await;

    let request = reservation_request(slot.id, hours_from_now(1), hours_from_now(2));
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn limited_time_slot_is_rejected() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::LimitedTime).await;

    let request = reservation_request(slot.id, hours_from_now(1), hours_from_now(2));
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn unknown_slot_is_not_found() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;

    let request = reservation_request(
        parkade_rust::models::SlotId::new(),
        hours_from_now(1),
        hours_from_now(2),
    );
    let err = admit_reservation(&repo, &notifier(), user.id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn cancel_requires_ownership() {
    let repo = local_repository();
    let (owner, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (intruder, _) = seed_user(&repo, "Bob", "bob@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let request = reservation_request(slot.id, hours_from_now(1), hours_from_now(2));
    let reservation = admit_reservation(&repo, &notifier(), owner.id, request)
        .await
        .unwrap();

    let err = cancel_reservation(&repo, intruder.id, reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)), "got {:?}", err);

    // Still active for the owner.
    let found = repo.find_reservation(reservation.id).await.unwrap().unwrap();
    assert!(!found.canceled);
}

#[tokio::test]
async fn canceled_window_becomes_reusable() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let start = hours_from_now(3);
    let end = hours_from_now(4);
    let reservation =
        admit_reservation(&repo, &notifier(), user.id, reservation_request(slot.id, start, end))
            .await
            .unwrap();

    let canceled = cancel_reservation(&repo, user.id, reservation.id)
        .await
        .unwrap();
    assert!(canceled.canceled);

    // The canceled booking no longer blocks the window.
    admit_reservation(&repo, &notifier(), user.id, reservation_request(slot.id, start, end))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    let reservation = admit_reservation(
        &repo,
        &notifier(),
        user.id,
        reservation_request(slot.id, hours_from_now(1), hours_from_now(2)),
    )
    .await
    .unwrap();

    let first = cancel_reservation(&repo, user.id, reservation.id).await.unwrap();
    let second = cancel_reservation(&repo, user.id, reservation.id).await.unwrap();
    assert!(first.canceled);
    assert!(second.canceled);
}

#[tokio::test]
async fn cancel_unknown_reservation_is_not_found() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;

    let err = cancel_reservation(&repo, user.id, parkade_rust::models::ReservationId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn my_reservations_are_ordered_by_start_time() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (_, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    // Booked out of order on purpose.
    for (start, end) in [(6, 7), (2, 3), (4, 5)] {
        admit_reservation(
            &repo,
            &notifier(),
            user.id,
            reservation_request(slot.id, hours_from_now(start), hours_from_now(end)),
        )
        .await
        .unwrap();
    }

    let mine = list_reservations_for_user(&repo, user.id).await.unwrap();
    assert_eq!(mine.len(), 3);
    assert!(mine
        .windows(2)
        .all(|pair| pair[0].reservation.start_time <= pair[1].reservation.start_time));
}

#[tokio::test]
async fn admin_listing_is_newest_first_and_joined() {
    let repo = local_repository();
    let (user, _) = seed_user(&repo, "Ana", "ana@example.com", Role::User).await;
    let (location, slot) = seed_slot(&repo, "A-1", SlotStatus::Available).await;

    for (start, end) in [(1, 2), (3, 4)] {
        admit_reservation(
            &repo,
            &notifier(),
            user.id,
            reservation_request(slot.id, hours_from_now(start), hours_from_now(end)),
        )
        .await
        .unwrap();
    }

    let all = list_all_reservations(&repo).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all
        .windows(2)
        .all(|pair| pair[0].reservation.created_at >= pair[1].reservation.created_at));
    assert_eq!(all[0].user.email, "ana@example.com");
    assert_eq!(all[0].slot.id, slot.id);
    assert_eq!(all[0].location.id, location.id);
}
