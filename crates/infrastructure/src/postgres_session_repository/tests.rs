use chrono::{TimeDelta, Utc};
use peoplehub_application::{NewSession, NewUser, SessionRepository, UserRepository};
use peoplehub_core::Role;
use peoplehub_domain::{SessionId, UserId};
use sha2::{Digest, Sha256};

use super::PostgresSessionRepository;
use crate::PostgresUserRepository;
use crate::test_database::{test_pool, unique};

fn token_hash(seed: &str) -> String {
    hex::encode(Sha256::digest(seed.as_bytes()))
}

async fn fixture_user(repository: &PostgresUserRepository) -> UserId {
    repository
        .create(NewUser {
            username: unique("sess"),
            display_name: "Session Fixture".to_owned(),
            password_hash: "sha256$00$00".to_owned(),
            role: Role::Employee,
            employee_id: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!())
}

fn new_session(user_id: UserId, token_hash: String, minutes_from_now: i64) -> NewSession {
    let now = Utc::now();
    NewSession {
        id: SessionId::new(),
        user_id,
        token_hash,
        created_at: now,
        expires_at: now + TimeDelta::minutes(minutes_from_now),
        absolute_expires_at: now + TimeDelta::hours(12),
        ip_address: Some("203.0.113.9".to_owned()),
        user_agent: Some("repository-test".to_owned()),
    }
}

#[tokio::test]
async fn sessions_are_found_by_token_hash_and_touched() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let repository = PostgresSessionRepository::new(pool);
    let user_id = fixture_user(&users).await;
    let hash = token_hash(&unique("touch"));
    let session = new_session(user_id, hash.clone(), 30);
    let session_id = session.id;

    assert!(repository.create(session).await.is_ok());

    let later = Utc::now() + TimeDelta::minutes(5);
    let extended = later + TimeDelta::minutes(30);
    assert!(repository.touch(session_id, later, extended).await.is_ok());

    let found = repository
        .find_by_token_hash(&hash)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(found.id, session_id);
    assert_eq!(found.user_id, user_id);
    assert!(found.expires_at > found.created_at + TimeDelta::minutes(30));
    assert!(found.revoked_at.is_none());
}

#[tokio::test]
async fn revoke_all_keeps_excepted_session() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let repository = PostgresSessionRepository::new(pool);
    let user_id = fixture_user(&users).await;

    let keep = new_session(user_id, token_hash(&unique("keep")), 30);
    let keep_id = keep.id;
    let keep_hash = keep.token_hash.clone();
    let drop_hash = token_hash(&unique("drop"));
    assert!(repository.create(keep).await.is_ok());
    assert!(repository.create(new_session(user_id, drop_hash.clone(), 30)).await.is_ok());

    let revoked = repository
        .revoke_all_for_user(user_id, Some(keep_id), Utc::now())
        .await;
    assert!(matches!(revoked, Ok(1)));

    let kept = repository.find_by_token_hash(&keep_hash).await.unwrap_or_default();
    assert!(kept.is_some_and(|session| session.revoked_at.is_none()));
    let dropped = repository.find_by_token_hash(&drop_hash).await.unwrap_or_default();
    assert!(dropped.is_some_and(|session| session.revoked_at.is_some()));
}

#[tokio::test]
async fn purge_removes_only_stale_sessions() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let repository = PostgresSessionRepository::new(pool);
    let user_id = fixture_user(&users).await;

    let live_hash = token_hash(&unique("live"));
    let stale_hash = token_hash(&unique("stale"));
    let mut stale = new_session(user_id, stale_hash.clone(), 30);
    stale.created_at -= TimeDelta::days(3);
    stale.expires_at = Utc::now() - TimeDelta::days(2);
    stale.absolute_expires_at = stale.expires_at;
    assert!(repository.create(stale).await.is_ok());
    assert!(repository.create(new_session(user_id, live_hash.clone(), 30)).await.is_ok());

    let purged = repository
        .purge_expired(Utc::now() - TimeDelta::days(1))
        .await
        .unwrap_or_default();
    assert!(purged >= 1);

    assert!(matches!(repository.find_by_token_hash(&stale_hash).await, Ok(None)));
    assert!(matches!(repository.find_by_token_hash(&live_hash).await, Ok(Some(_))));
}
