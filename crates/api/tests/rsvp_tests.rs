#![cfg(feature = "db_integration")]

mod common;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use api::auth::Role;
use api::error::AppError;
use api::routes::rsvps::{self, RsvpPayload};
use common::*;

#[tokio::test]
async fn rsvp_upsert_is_idempotent() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "RSVP XI").await;
    let email = format!("rsvp_self_{}@test.local", Uuid::new_v4().simple());
    let member = create_test_member(&state, team, &email).await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let event = create_test_event(&state, team, season, format, "Idempotent Match").await;

    let claims = claims_for(Role::Viewer, &email);

    for _ in 0..2 {
        let Json(body) = rsvps::upsert_rsvp(
            State(state.clone()),
            Extension(claims.clone()),
            Path(event),
            Json(RsvpPayload {
                member_id: member,
                status: "yes".to_string(),
            }),
        )
        .await
        .expect("self RSVP should succeed");
        assert_eq!(body.data.status, "yes");
    }

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM rsvps WHERE event_id = $1 AND member_id = $2",
    )
    .bind(event)
    .bind(member)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(count, 1, "upsert must never duplicate the row");
}

#[tokio::test]
async fn invalid_status_values_are_rejected() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "RSVP Status XI").await;
    let email = format!("rsvp_status_{}@test.local", Uuid::new_v4().simple());
    let member = create_test_member(&state, team, &email).await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let event = create_test_event(&state, team, season, format, "Status Match").await;

    let result = rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims_for(Role::Viewer, &email)),
        Path(event),
        Json(RsvpPayload {
            member_id: member,
            status: "perhaps".to_string(),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn cross_team_rsvps_are_forbidden() {
    let state = setup_test_db().await;
    let team_a = create_test_team(&state, "RSVP Team A").await;
    let team_b = create_test_team(&state, "RSVP Team B").await;
    let email = format!("rsvp_cross_{}@test.local", Uuid::new_v4().simple());
    let outsider = create_test_member(&state, team_b, &email).await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let event = create_test_event(&state, team_a, season, format, "Cross Team Match").await;

    // Even an admin cannot move a member onto another team's event.
    let result = rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims_for(Role::Admin, "boss@test.local")),
        Path(event),
        Json(RsvpPayload {
            member_id: outsider,
            status: "yes".to_string(),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn non_admins_cannot_answer_for_others() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "RSVP Proxy XI").await;
    let email = format!("rsvp_proxy_{}@test.local", Uuid::new_v4().simple());
    let member = create_test_member(&state, team, &email).await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let event = create_test_event(&state, team, season, format, "Proxy Match").await;

    let result = rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims_for(Role::Editor, "someoneelse@test.local")),
        Path(event),
        Json(RsvpPayload {
            member_id: member,
            status: "no".to_string(),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // An admin may.
    rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims_for(Role::Admin, "boss@test.local")),
        Path(event),
        Json(RsvpPayload {
            member_id: member,
            status: "no".to_string(),
        }),
    )
    .await
    .expect("admin proxy RSVP should succeed");
}

#[tokio::test]
async fn status_changes_fan_out_to_admins_but_failures_never_block_the_write() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "RSVP Notify XI").await;
    let email = format!("rsvp_notify_{}@test.local", Uuid::new_v4().simple());
    let member = create_test_member(&state, team, &email).await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let event = create_test_event(&state, team, season, format, "Notify Match").await;
    let admin_email = format!("rsvp_admin_{}@test.local", Uuid::new_v4().simple());
    let admin_id = create_admin_access(&state, &admin_email).await;

    let claims = claims_for(Role::Viewer, &email);

    // The mailer points at a dead port, so the email leg of the fan-out
    // fails; the RSVP write and the audit rows must land regardless.
    rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims.clone()),
        Path(event),
        Json(RsvpPayload {
            member_id: member,
            status: "yes".to_string(),
        }),
    )
    .await
    .expect("RSVP write must succeed despite a dead mailer");

    let audit_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE admin_id = $1 AND event_id = $2",
    )
    .bind(admin_id)
    .bind(event)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(audit_rows, 1, "first response must create one audit row");

    // Same status again: no change, no further fan-out.
    rsvps::upsert_rsvp(
        State(state.clone()),
        Extension(claims),
        Path(event),
        Json(RsvpPayload {
            member_id: member,
            status: "yes".to_string(),
        }),
    )
    .await
    .unwrap();

    let audit_rows_after: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE admin_id = $1 AND event_id = $2",
    )
    .bind(admin_id)
    .bind(event)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(audit_rows_after, 1, "an unchanged status must not notify again");
}
