#![cfg(feature = "db_integration")]

mod common;

use axum::extract::State;
use axum::{Extension, Json};
use uuid::Uuid;

use api::auth::Role;
use api::error::AppError;
use api::routes::access::{self, UpsertAccessPayload};
use common::*;
use infra::repos::AccessRepo;

fn unique_email(prefix: &str) -> String {
    format!("{prefix}_{}@test.local", Uuid::new_v4().simple())
}

#[tokio::test]
async fn assigning_then_revoking_keeps_the_row() {
    let state = setup_test_db().await;
    let admin = claims_for(Role::Admin, "boss@test.local");
    let email = unique_email("revoke");

    let Json(created) = access::upsert(
        State(state.clone()),
        Extension(admin.clone()),
        Json(UpsertAccessPayload {
            email: email.clone(),
            name: "New Editor".to_string(),
            role: Some("editor".to_string()),
        }),
    )
    .await
    .expect("assignment should succeed");
    assert_eq!(created.data.role.as_deref(), Some("editor"));

    // Revoke twice; both calls must succeed and the row must survive.
    for _ in 0..2 {
        let Json(revoked) = access::upsert(
            State(state.clone()),
            Extension(admin.clone()),
            Json(UpsertAccessPayload {
                email: email.clone(),
                name: "New Editor".to_string(),
                role: None,
            }),
        )
        .await
        .expect("revocation should succeed");
        assert_eq!(revoked.data.role, None);
    }

    let row = AccessRepo::new(state.db.clone())
        .get_by_email(&email)
        .await
        .unwrap()
        .expect("row must still exist after revocation");
    assert_eq!(row.role, None);
    assert_eq!(Role::from_db(row.role.as_deref()), Role::None);
}

#[tokio::test]
async fn email_join_is_case_insensitive() {
    let state = setup_test_db().await;
    let admin = claims_for(Role::Admin, "boss@test.local");
    let email = unique_email("case");
    let mixed = email.to_uppercase();

    access::upsert(
        State(state.clone()),
        Extension(admin),
        Json(UpsertAccessPayload {
            email: mixed,
            name: "Mixed Case".to_string(),
            role: Some("viewer".to_string()),
        }),
    )
    .await
    .expect("assignment should succeed");

    let row = AccessRepo::new(state.db.clone())
        .get_by_email(&email)
        .await
        .unwrap();
    assert!(row.is_some(), "lowercase lookup must find the row");
}

#[tokio::test]
async fn only_admin_may_manage_access() {
    let state = setup_test_db().await;

    for role in [Role::Editor, Role::Viewer] {
        let result = access::upsert(
            State(state.clone()),
            Extension(claims_for(role, "notadmin@test.local")),
            Json(UpsertAccessPayload {
                email: unique_email("denied"),
                name: "Should Fail".to_string(),
                role: Some("viewer".to_string()),
            }),
        )
        .await;
        assert!(
            matches!(result, Err(AppError::Forbidden(_))),
            "{role:?} must not manage access"
        );
    }
}

#[tokio::test]
async fn unknown_roles_are_rejected() {
    let state = setup_test_db().await;
    let result = access::upsert(
        State(state.clone()),
        Extension(claims_for(Role::Admin, "boss@test.local")),
        Json(UpsertAccessPayload {
            email: unique_email("badrole"),
            name: "Bad Role".to_string(),
            role: Some("owner".to_string()),
        }),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
