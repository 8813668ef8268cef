mod support;

use ::common::crypto::REFRESH_TOKEN_LEN;
use time::{Duration, OffsetDateTime};

use sharegate_daemon::database::{Session, Share};
use sharegate_daemon::shares::{NewShare, RequestContext, ShareCredentials, ShareError};
use support::{article, auth_config, Harness};

fn credentials(share: uuid::Uuid, password: Option<&str>) -> ShareCredentials {
    ShareCredentials {
        share,
        password: password.map(str::to_string),
    }
}

fn context() -> RequestContext {
    RequestContext {
        ip: Some("203.0.113.7".to_string()),
        user_agent: Some("integration-test".to_string()),
    }
}

#[tokio::test]
async fn test_login_issues_tokens_and_records_use() {
    let h = Harness::new().await;
    let share = h.share(article("1")).await;

    let before = OffsetDateTime::now_utc();
    let tokens = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await
        .unwrap();

    assert_eq!(tokens.refresh_token.len(), REFRESH_TOKEN_LEN);
    assert_eq!(tokens.expires_in, std::time::Duration::from_secs(15 * 60));

    let claims = h.shares.signing_key().verify(&tokens.access_token).unwrap();
    assert_eq!(claims.share, share.id);
    assert_eq!(claims.share_scope.collection, "articles");
    assert_eq!(claims.share_scope.item, "1");
    assert!(!claims.app_access);
    assert!(!claims.admin_access);
    assert_eq!(claims.exp - claims.iat, 15 * 60);

    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 1);

    let sessions = Session::list_for_share(share.id, h.db()).await.unwrap();
    assert_eq!(sessions.len(), 1);
    let session = &sessions[0];
    assert_eq!(session.token, tokens.refresh_token.as_str());
    assert_eq!(session.ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(session.user_agent.as_deref(), Some("integration-test"));

    let expected = before + Duration::days(7);
    let drift = (session.expires.unix_timestamp() - expected.unix_timestamp()).abs();
    assert!(drift <= 5, "session expiry off by {}s", drift);
}

#[tokio::test]
async fn test_two_logins_mint_two_sessions() {
    let h = Harness::new().await;
    let share = h.share(article("2")).await;

    let first = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await
        .unwrap();
    let second = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await
        .unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(
        Session::list_for_share(share.id, h.db())
            .await
            .unwrap()
            .len(),
        2
    );
    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 2);
}

#[tokio::test]
async fn test_expired_share_is_rejected_regardless_of_password() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            password: Some("secret".to_string()),
            date_end: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
            ..article("3")
        })
        .await;

    for password in [Some("secret"), Some("wrong"), None] {
        let result = h
            .shares
            .login(&credentials(share.id, password), &context())
            .await;
        assert!(matches!(result, Err(ShareError::InvalidCredentials)));
    }
    assert_eq!(h.session_count().await, 0);
}

#[tokio::test]
async fn test_share_not_yet_valid_is_rejected() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            date_start: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
            ..article("4")
        })
        .await;

    let result = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await;
    assert!(matches!(result, Err(ShareError::InvalidCredentials)));
}

#[tokio::test]
async fn test_spent_quota_is_rejected() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            password: Some("secret".to_string()),
            max_uses: Some(3),
            ..article("5")
        })
        .await;
    h.set_times_used(share.id, 3).await;

    for password in [Some("secret"), None] {
        let result = h
            .shares
            .login(&credentials(share.id, password), &context())
            .await;
        assert!(matches!(result, Err(ShareError::InvalidCredentials)));
    }

    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 3);
}

#[tokio::test]
async fn test_password_must_match_exactly() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            password: Some("secret".to_string()),
            ..article("6")
        })
        .await;

    for password in [Some("Secret"), Some("secret "), Some(""), None] {
        let result = h
            .shares
            .login(&credentials(share.id, password), &context())
            .await;
        assert!(
            matches!(result, Err(ShareError::InvalidCredentials)),
            "password {:?} should be rejected",
            password
        );
    }

    h.shares
        .login(&credentials(share.id, Some("secret")), &context())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_open_share_ignores_supplied_password() {
    let h = Harness::new().await;
    let share = h.share(article("7")).await;

    for password in [None, Some(""), Some("anything at all")] {
        h.shares
            .login(&credentials(share.id, password), &context())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_unknown_share_looks_like_bad_credentials() {
    let h = Harness::new().await;
    let result = h
        .shares
        .login(&credentials(uuid::Uuid::new_v4(), None), &context())
        .await;
    assert!(matches!(result, Err(ShareError::InvalidCredentials)));
}

#[tokio::test]
async fn test_single_use_share() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            max_uses: Some(1),
            ..article("8")
        })
        .await;

    h.shares
        .login(&credentials(share.id, None), &context())
        .await
        .unwrap();

    let second = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await;
    assert!(matches!(second, Err(ShareError::InvalidCredentials)));

    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 1);
    assert_eq!(h.session_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_logins_cannot_exceed_quota() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            max_uses: Some(1),
            ..article("9")
        })
        .await;

    let creds = credentials(share.id, None);
    let ctx = context();
    let (a, b) = tokio::join!(
        h.shares.login(&creds, &ctx),
        h.shares.login(&creds, &ctx)
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 1);
    assert_eq!(h.session_count().await, 1);
}

#[tokio::test]
async fn test_login_sweeps_only_expired_sessions() {
    let h = Harness::new().await;
    let other = h.share(article("10")).await;
    let share = h.share(article("11")).await;

    let now = OffsetDateTime::now_utc();
    h.insert_session("expired-other-share", now - Duration::hours(1), Some(other.id))
        .await;
    h.insert_session("expired-user-session", now - Duration::days(2), None)
        .await;
    h.insert_session("live-other-share", now + Duration::hours(1), Some(other.id))
        .await;

    let tokens = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await
        .unwrap();

    assert!(Session::get("expired-other-share", h.db())
        .await
        .unwrap()
        .is_none());
    assert!(Session::get("expired-user-session", h.db())
        .await
        .unwrap()
        .is_none());
    assert!(Session::get("live-other-share", h.db())
        .await
        .unwrap()
        .is_some());
    assert!(Session::get(tokens.refresh_token.as_str(), h.db())
        .await
        .unwrap()
        .is_some());
    assert_eq!(h.session_count().await, 2);
}

#[tokio::test]
async fn test_rejected_login_sweeps_nothing() {
    let h = Harness::new().await;
    let share = h
        .share(NewShare {
            password: Some("secret".to_string()),
            ..article("12")
        })
        .await;
    h.insert_session(
        "expired",
        OffsetDateTime::now_utc() - Duration::hours(1),
        None,
    )
    .await;

    let result = h
        .shares
        .login(&credentials(share.id, Some("nope")), &context())
        .await;
    assert!(matches!(result, Err(ShareError::InvalidCredentials)));
    assert_eq!(h.session_count().await, 1);
}

#[tokio::test]
async fn test_unrepresentable_session_expiry_fails_cleanly() {
    let h = Harness::with_auth(sharegate_daemon::service_config::AuthConfig {
        refresh_token_ttl: std::time::Duration::from_secs(100_000 * 365 * 24 * 3600),
        ..auth_config()
    })
    .await;
    let share = h.share(article("13")).await;

    let result = h
        .shares
        .login(&credentials(share.id, None), &context())
        .await;
    assert!(matches!(result, Err(ShareError::Unavailable(_))));

    let stored = Share::get(share.id, h.db()).await.unwrap().unwrap();
    assert_eq!(stored.times_used, 0);
    assert_eq!(h.session_count().await, 0);
}
