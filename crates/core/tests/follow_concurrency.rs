//! Concurrency property tests for the follow engine.
//!
//! These run against a real PostgreSQL instance because the properties
//! under test live in the store: the unique pair constraints and row
//! locks that decide races cannot be exercised by a mock.
//!
//! Run with: cargo test -p shelfmark-core --test follow_concurrency -- --ignored
//!
//! Requires PostgreSQL (e.g. via docker-compose) and honors the
//! TEST_DB_* environment variables from shelfmark-db.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sea_orm::{DatabaseConnection, Set, SqlxPostgresConnector};
use shelfmark_common::{AppError, Clock, IdGenerator, Identity, SystemClock};
use shelfmark_core::{
    AutoAcceptPolicy, BlockGuard, BlockService, FollowOptions, FollowOutcome, FollowService,
    FollowStatus, IdentityResolver, RequestKind,
};
use shelfmark_db::entities::member;
use shelfmark_db::repositories::{BlockRepository, MemberRepository};
use shelfmark_db::test_utils::TestDatabase;

const LOCAL_DOMAIN: &str = "books.example";

async fn setup() -> (TestDatabase, FollowService, BlockService) {
    let test_db = TestDatabase::create_unique().await.unwrap();
    shelfmark_db::migrate(test_db.connection()).await.unwrap();

    // `DatabaseConnection` is not `Clone` while sea-orm's `mock` feature is
    // enabled (the unit tests need it), so share the underlying pool instead;
    // this is exactly what the derived `Clone` would produce.
    let db = Arc::new(SqlxPostgresConnector::from_sqlx_postgres_pool(
        test_db.connection().get_postgres_connection_pool().clone(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let follow = FollowService::new(
        db.clone(),
        IdentityResolver::new(db.clone(), MemberRepository::new()),
        BlockGuard::new(BlockRepository::new()),
        AutoAcceptPolicy::new(MemberRepository::new(), LOCAL_DOMAIN.to_string()),
        clock.clone(),
    );
    let block = BlockService::new(db, clock);

    (test_db, follow, block)
}

async fn seed_member(db: &DatabaseConnection, handle: &str, auto_accept: bool) {
    MemberRepository::new()
        .create(
            db,
            member::ActiveModel {
                id: Set(IdGenerator::new().generate()),
                handle: Set(handle.to_string()),
                display_name: Set(None),
                auto_accept_follows: Set(auto_accept),
                created_at: Set(chrono::Utc::now().into()),
            },
        )
        .await
        .unwrap();
}

fn identity(handle: &str) -> Identity {
    Identity::parse(handle).unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_follow_requests_yield_one_row() {
    let (test_db, follow, _block) = setup().await;
    seed_member(test_db.connection(), "alice@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", false).await;

    let alice = identity("alice@books.example");
    let carol = identity("carol@books.example");

    let (first, second) = tokio::join!(
        follow.request_follow(&alice, &carol, FollowOptions::default()),
        follow.request_follow(&alice, &carol, FollowOptions::default()),
    );
    let outcomes = [first.unwrap(), second.unwrap()];

    let filed = outcomes
        .iter()
        .filter(|o| matches!(o, FollowOutcome::Pending { .. }))
        .count();
    let repeats = outcomes
        .iter()
        .filter(|o| matches!(o, FollowOutcome::AlreadyPending))
        .count();
    assert_eq!(filed, 1, "exactly one call files the request: {outcomes:?}");
    assert_eq!(repeats, 1, "the other observes the repeat: {outcomes:?}");

    let requests = follow
        .list_requests(&carol, RequestKind::Received, 10, None)
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_accept_reject_race_resolves_once() {
    let (test_db, follow, _block) = setup().await;
    seed_member(test_db.connection(), "alice@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", false).await;

    let alice = identity("alice@books.example");
    let carol = identity("carol@books.example");

    let outcome = follow
        .request_follow(&alice, &carol, FollowOptions::default())
        .await
        .unwrap();
    let FollowOutcome::Pending { id } = outcome else {
        panic!("Expected a pending request, got {outcome:?}");
    };

    let (accepted, rejected) = tokio::join!(
        follow.accept_follow(&carol, &id),
        follow.reject_follow(&carol, &id),
    );

    let winners = usize::from(accepted.is_ok()) + usize::from(rejected.is_ok());
    assert_eq!(winners, 1, "exactly one terminal operation wins");

    // The loser observes the resolved request as missing.
    if let Err(e) = &accepted {
        assert!(matches!(e, AppError::NotFound(_)), "unexpected: {e:?}");
    }
    if let Err(e) = &rejected {
        assert!(matches!(e, AppError::NotFound(_)), "unexpected: {e:?}");
    }

    // The request row is gone either way.
    assert!(follow.find_request(&alice, &carol).await.unwrap().is_none());

    // An edge exists iff the accept won.
    let status = follow.follow_status(&alice, &carol).await.unwrap();
    if accepted.is_ok() {
        assert!(matches!(status, FollowStatus::Accepted { .. }));
    } else {
        assert_eq!(status, FollowStatus::NotFound);
    }

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_block_vetoes_new_requests_in_both_directions() {
    let (test_db, follow, block) = setup().await;
    seed_member(test_db.connection(), "dave@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", false).await;

    let dave = identity("dave@books.example");
    let carol = identity("carol@books.example");

    block.block(&carol, &dave).await.unwrap();

    let outcome = follow
        .request_follow(&dave, &carol, FollowOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, FollowOutcome::Blocked);

    // The block is directional in storage but symmetric in effect.
    let outcome = follow
        .request_follow(&carol, &dave, FollowOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, FollowOutcome::Blocked);

    let requests = follow
        .list_requests(&carol, RequestKind::Received, 10, None)
        .await
        .unwrap();
    assert!(requests.is_empty(), "no row may be written for a vetoed pair");

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_block_voids_existing_edge_without_deleting_it() {
    let (test_db, follow, block) = setup().await;
    seed_member(test_db.connection(), "alice@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", true).await;

    let alice = identity("alice@books.example");
    let carol = identity("carol@books.example");

    let outcome = follow
        .request_follow(&alice, &carol, FollowOptions::default())
        .await
        .unwrap();
    assert!(matches!(outcome, FollowOutcome::Accepted { .. }));

    block.block(&carol, &alice).await.unwrap();

    // Pair status reads as voided while the row survives in the store.
    let status = follow.follow_status(&alice, &carol).await.unwrap();
    assert_eq!(status, FollowStatus::NotFound);

    let followers = follow.list_followers(&carol, 10, None).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].requester, "alice@books.example");

    // Lifting the block reveals the edge again.
    block.unblock(&carol, &alice).await.unwrap();
    let status = follow.follow_status(&alice, &carol).await.unwrap();
    assert!(matches!(status, FollowStatus::Accepted { .. }));

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_accept_preserves_requested_flags() {
    let (test_db, follow, _block) = setup().await;
    seed_member(test_db.connection(), "alice@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", false).await;

    let alice = identity("alice@books.example");
    let carol = identity("carol@books.example");

    let outcome = follow
        .request_follow(
            &alice,
            &carol,
            FollowOptions {
                reblogs: false,
                notify: true,
            },
        )
        .await
        .unwrap();
    let FollowOutcome::Pending { id } = outcome else {
        panic!("Expected a pending request, got {outcome:?}");
    };

    let edge = follow.accept_follow(&carol, &id).await.unwrap();
    assert!(!edge.reblogs);
    assert!(edge.notifications);

    let status = follow.follow_status(&alice, &carol).await.unwrap();
    assert_eq!(
        status,
        FollowStatus::Accepted {
            reblogs: false,
            notify: true,
            accept_time: edge.created_at,
        }
    );

    test_db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_remove_follower_allows_a_fresh_start() {
    let (test_db, follow, _block) = setup().await;
    seed_member(test_db.connection(), "alice@books.example", false).await;
    seed_member(test_db.connection(), "carol@books.example", true).await;

    let alice = identity("alice@books.example");
    let carol = identity("carol@books.example");

    let outcome = follow
        .request_follow(&alice, &carol, FollowOptions::default())
        .await
        .unwrap();
    assert!(matches!(outcome, FollowOutcome::Accepted { .. }));

    follow.remove_follower(&alice, &carol).await.unwrap();
    let status = follow.follow_status(&alice, &carol).await.unwrap();
    assert_eq!(status, FollowStatus::NotFound);

    // The pair constraint no longer holds a row, so following again
    // succeeds.
    let outcome = follow
        .request_follow(&alice, &carol, FollowOptions::default())
        .await
        .unwrap();
    assert!(matches!(outcome, FollowOutcome::Accepted { .. }));

    test_db.drop_database().await.unwrap();
}
