#![cfg(feature = "db_integration")]

mod common;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{Duration, Local};
use uuid::Uuid;

use api::auth::Role;
use api::error::AppError;
use api::routes::dues::{self, NewDuesPayload, UpdateDuesPayload};
use api::routes::members;
use common::*;

fn payload(member_id: Uuid, format_ids: Vec<Uuid>) -> NewDuesPayload {
    NewDuesPayload {
        member_id,
        year: 2033,
        tournament_format_ids: format_ids,
        season_dues_cents: 10000,
        extra_jersey_dues_cents: 2000,
        extra_trouser_dues_cents: 0,
        credit_adjustment_cents: 1000,
        due_date: Local::now().date_naive(),
        comments: None,
    }
}

#[tokio::test]
async fn total_is_the_straight_sum_of_the_four_amounts() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "Dues Total XI").await;
    let member = create_test_member(
        &state,
        team,
        &format!("dues_total_{}@test.local", Uuid::new_v4().simple()),
    )
    .await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;

    let Json(created) = dues::create(
        State(state.clone()),
        Extension(claims_for(Role::Editor, "editor@test.local")),
        Json(payload(member, vec![format])),
    )
    .await
    .expect("dues creation should succeed");

    // 100 + 20 + 0 + 10 = 130: the adjustment is added, not subtracted.
    assert_eq!(created.data.total_dues_cents, 13000);
    assert_eq!(created.data.payment_status, "Not Paid");
}

#[tokio::test]
async fn past_due_dates_are_rejected_but_today_is_accepted() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "Dues Dates XI").await;
    let member = create_test_member(
        &state,
        team,
        &format!("dues_dates_{}@test.local", Uuid::new_v4().simple()),
    )
    .await;
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "One Day").await;

    let mut past = payload(member, vec![format]);
    past.due_date = Local::now().date_naive() - Duration::days(1);
    let result = dues::create(
        State(state.clone()),
        Extension(claims_for(Role::Editor, "editor@test.local")),
        Json(past),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Today itself is inside the boundary.
    let today = payload(member, vec![format]);
    dues::create(
        State(state.clone()),
        Extension(claims_for(Role::Editor, "editor@test.local")),
        Json(today),
    )
    .await
    .expect("a due date of today should be accepted");
}

#[tokio::test]
async fn overlapping_unpaid_dues_are_blocked_until_settled() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "Dues Dup XI").await;
    let member = create_test_member(
        &state,
        team,
        &format!("dues_dup_{}@test.local", Uuid::new_v4().simple()),
    )
    .await;
    let season = create_test_season(&state, 2033).await;
    let t20 = create_test_format(&state, season, "T20").await;
    let one_day = create_test_format(&state, season, "One Day").await;

    let editor = claims_for(Role::Editor, "editor@test.local");

    let Json(first) = dues::create(
        State(state.clone()),
        Extension(editor.clone()),
        Json(payload(member, vec![t20, one_day])),
    )
    .await
    .expect("first dues row should succeed");

    // Partial overlap on the format set is enough to block.
    let result = dues::create(
        State(state.clone()),
        Extension(editor.clone()),
        Json(payload(member, vec![t20])),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Settle the first row, then the same format set goes through.
    dues::update(
        State(state.clone()),
        Extension(editor.clone()),
        Path(first.data.id),
        Json(UpdateDuesPayload {
            season_dues_cents: 10000,
            extra_jersey_dues_cents: 2000,
            extra_trouser_dues_cents: 0,
            credit_adjustment_cents: 1000,
            due_date: first.data.due_date,
            payment_status: "Paid".to_string(),
            settlement_date: Some(Local::now().date_naive()),
            comments: None,
        }),
    )
    .await
    .expect("settlement should succeed");

    dues::create(
        State(state.clone()),
        Extension(editor),
        Json(payload(member, vec![t20])),
    )
    .await
    .expect("a new unpaid row is allowed once the old one is paid");
}

#[tokio::test]
async fn missing_formats_and_members_are_rejected() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "Dues Refs XI").await;
    let member = create_test_member(
        &state,
        team,
        &format!("dues_refs_{}@test.local", Uuid::new_v4().simple()),
    )
    .await;
    let editor = claims_for(Role::Editor, "editor@test.local");

    // Unknown format id.
    let result = dues::create(
        State(state.clone()),
        Extension(editor.clone()),
        Json(payload(member, vec![Uuid::new_v4()])),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Empty format set.
    let result = dues::create(
        State(state.clone()),
        Extension(editor.clone()),
        Json(payload(member, vec![])),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Unknown member.
    let season = create_test_season(&state, 2033).await;
    let format = create_test_format(&state, season, "T20").await;
    let result = dues::create(
        State(state.clone()),
        Extension(editor),
        Json(payload(Uuid::new_v4(), vec![format])),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn editors_cannot_delete_members() {
    let state = setup_test_db().await;
    let team = create_test_team(&state, "Delete Gate XI").await;
    let member = create_test_member(
        &state,
        team,
        &format!("delete_gate_{}@test.local", Uuid::new_v4().simple()),
    )
    .await;

    let result = members::delete(
        State(state.clone()),
        Extension(claims_for(Role::Editor, "editor@test.local")),
        Path(member),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // An admin can.
    members::delete(
        State(state.clone()),
        Extension(claims_for(Role::Admin, "boss@test.local")),
        Path(member),
    )
    .await
    .expect("admin delete should succeed");
}
