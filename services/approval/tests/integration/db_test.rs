use chrono::{Duration, Utc};
use futures::future::join_all;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use fanpage_approval::domain::repository::{ApprovalCodeRepository, ProfileRepository};
use fanpage_approval::domain::types::{Profile, RedeemOutcome};
use fanpage_approval::infra::db::{DbApprovalCodeRepository, DbProfileRepository};

use crate::helpers::{code_row, seed_profile, sqlite_db, test_banned, test_profile};

const CODE: &str = "ABCD2345XY";

fn repos(db: &DatabaseConnection) -> (DbProfileRepository, DbApprovalCodeRepository) {
    (
        DbProfileRepository { db: db.clone() },
        DbApprovalCodeRepository { db: db.clone() },
    )
}

async fn setup(profiles: &[Profile]) -> (DbProfileRepository, DbApprovalCodeRepository) {
    let db = sqlite_db().await;
    for profile in profiles {
        seed_profile(&db, profile).await;
    }
    repos(&db)
}

// ── redeem ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn redeem_should_consume_code_and_approve_profile() {
    let fan = test_profile(1);
    let (profiles, codes) = setup(&[fan.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(fan.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();

    let redeem_at = now + Duration::minutes(5);
    let outcome = codes.redeem(CODE, fan.id, redeem_at).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::Redeemed { subject_id: fan.id });

    let profile = profiles.find_by_id(fan.id).await.unwrap().unwrap();
    assert!(profile.approved);
    assert_eq!(profile.approved_at, Some(redeem_at));
    let rows = codes.list_by_subject(fan.id).await.unwrap();
    assert_eq!(rows[0].used_at, Some(redeem_at));

    let again = codes
        .redeem(CODE, fan.id, redeem_at + Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(again, RedeemOutcome::Invalid);
}

#[tokio::test]
async fn redeem_should_not_touch_store_for_banned_profile() {
    let banned = test_banned(3);
    let (profiles, codes) = setup(&[banned.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(banned.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();

    let outcome = codes.redeem(CODE, banned.id, now).await.unwrap();

    assert_eq!(outcome, RedeemOutcome::Banned);
    assert!(codes.list_by_subject(banned.id).await.unwrap()[0].used_at.is_none());
    let profile = profiles.find_by_id(banned.id).await.unwrap().unwrap();
    assert!(!profile.approved);
    assert!(profile.approved_at.is_none());
}

#[tokio::test]
async fn redeem_should_be_invalid_for_unknown_caller() {
    let (_profiles, codes) = setup(&[]).await;

    let outcome = codes
        .redeem(CODE, test_profile(9).id, Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome, RedeemOutcome::Invalid);
}

#[tokio::test]
async fn redeem_should_reject_expired_and_foreign_codes() {
    let owner = test_profile(1);
    let other = test_profile(2);
    let (profiles, codes) = setup(&[owner.clone(), other.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(owner.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();

    let foreign = codes.redeem(CODE, other.id, now).await.unwrap();
    let expired = codes
        .redeem(CODE, owner.id, now + Duration::minutes(60))
        .await
        .unwrap();

    assert_eq!(foreign, RedeemOutcome::Invalid);
    assert_eq!(expired, RedeemOutcome::Invalid);
    assert!(codes.list_by_subject(owner.id).await.unwrap()[0].used_at.is_none());
    assert!(!profiles.find_by_id(other.id).await.unwrap().unwrap().approved);
    assert!(!profiles.find_by_id(owner.id).await.unwrap().unwrap().approved);
}

#[tokio::test]
async fn redeem_should_leave_profile_alone_when_consume_hits_no_row() {
    let fan = test_profile(1);
    let db = sqlite_db().await;
    seed_profile(&db, &fan).await;
    let (profiles, codes) = repos(&db);
    let now = Utc::now();
    codes
        .create(&code_row(fan.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();
    // Another consumer wins between lookup and update: the guarded update
    // then affects no row.
    db.execute_unprepared(
        "CREATE TRIGGER consumed_elsewhere BEFORE UPDATE OF used_at ON approval_codes \
         BEGIN SELECT RAISE(IGNORE); END",
    )
    .await
    .unwrap();

    let outcome = codes.redeem(CODE, fan.id, now).await.unwrap();

    assert_eq!(outcome, RedeemOutcome::Invalid);
    let profile = profiles.find_by_id(fan.id).await.unwrap().unwrap();
    assert!(!profile.approved);
    assert!(profile.approved_at.is_none());
}

#[tokio::test]
async fn redeem_should_keep_first_approval_time() {
    let fan = test_profile(1);
    let (profiles, codes) = setup(&[fan.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(fan.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();
    codes
        .create(&code_row(fan.id, "ZZZZ2222ZZ", now, Duration::minutes(60)))
        .await
        .unwrap();

    let first = now + Duration::minutes(1);
    codes.redeem(CODE, fan.id, first).await.unwrap();
    let outcome = codes
        .redeem("ZZZZ2222ZZ", fan.id, now + Duration::minutes(10))
        .await
        .unwrap();

    assert_eq!(outcome, RedeemOutcome::Redeemed { subject_id: fan.id });
    let profile = profiles.find_by_id(fan.id).await.unwrap().unwrap();
    assert_eq!(profile.approved_at, Some(first));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn redeem_should_succeed_once_under_concurrency() {
    const ATTEMPTS: usize = 16;

    let fan = test_profile(1);
    let (profiles, codes) = setup(&[fan.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(fan.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();

    let handles = (0..ATTEMPTS).map(|_| {
        let codes = codes.clone();
        let caller = fan.id;
        tokio::spawn(async move { codes.redeem(CODE, caller, Utc::now()).await })
    });
    let outcomes: Vec<RedeemOutcome> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let redeemed = outcomes
        .iter()
        .filter(|o| matches!(o, RedeemOutcome::Redeemed { .. }))
        .count();
    assert_eq!(redeemed, 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == RedeemOutcome::Invalid)
            .count(),
        ATTEMPTS - 1
    );
    assert!(profiles.find_by_id(fan.id).await.unwrap().unwrap().approved);
}

// ── list / mark_sent ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_by_subject_should_return_newest_first() {
    let fan = test_profile(1);
    let other = test_profile(2);
    let (_profiles, codes) = setup(&[fan.clone(), other.clone()]).await;
    let now = Utc::now();
    let older = code_row(fan.id, "AAAA2222AA", now - Duration::minutes(10), Duration::minutes(60));
    let newer = code_row(fan.id, "BBBB3333BB", now, Duration::minutes(60));
    codes.create(&older).await.unwrap();
    codes.create(&newer).await.unwrap();
    codes
        .create(&code_row(other.id, "CCCC4444CC", now, Duration::minutes(60)))
        .await
        .unwrap();

    let rows = codes.list_by_subject(fan.id).await.unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(rows[0].code, "BBBB3333BB");
    assert_eq!(rows[1].expires_at, older.expires_at);
}

#[tokio::test]
async fn mark_sent_should_stamp_newest_unredeemed_code() {
    let fan = test_profile(1);
    let (_profiles, codes) = setup(&[fan.clone()]).await;
    let now = Utc::now();
    let older = code_row(fan.id, "AAAA2222AA", now - Duration::minutes(10), Duration::minutes(60));
    let newer = code_row(fan.id, "BBBB3333BB", now, Duration::minutes(60));
    codes.create(&older).await.unwrap();
    codes.create(&newer).await.unwrap();

    let stamped = codes
        .mark_sent(fan.id, "fan1@example.com", now)
        .await
        .unwrap();

    assert!(stamped);
    let rows = codes.list_by_subject(fan.id).await.unwrap();
    assert_eq!(rows[0].id, newer.id);
    assert_eq!(rows[0].sent_to_email.as_deref(), Some("fan1@example.com"));
    assert_eq!(rows[0].sent_at, Some(now));
    assert!(rows[1].sent_at.is_none());
}

#[tokio::test]
async fn mark_sent_should_report_when_nothing_is_outstanding() {
    let fan = test_profile(1);
    let (_profiles, codes) = setup(&[fan.clone()]).await;
    let now = Utc::now();
    codes
        .create(&code_row(fan.id, CODE, now, Duration::minutes(60)))
        .await
        .unwrap();
    codes.redeem(CODE, fan.id, now).await.unwrap();

    let stamped = codes
        .mark_sent(fan.id, "fan1@example.com", now)
        .await
        .unwrap();

    assert!(!stamped);
    assert!(codes.list_by_subject(fan.id).await.unwrap()[0].sent_at.is_none());
}

// ── profiles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_ban_should_toggle_flag_and_reason() {
    let fan = test_profile(1);
    let (profiles, _codes) = setup(&[fan.clone()]).await;

    assert!(profiles.set_ban(fan.id, true, Some("spam")).await.unwrap());
    let banned = profiles.find_by_id(fan.id).await.unwrap().unwrap();
    assert!(banned.banned);
    assert_eq!(banned.ban_reason.as_deref(), Some("spam"));

    assert!(profiles.set_ban(fan.id, false, None).await.unwrap());
    let lifted = profiles.find_by_id(fan.id).await.unwrap().unwrap();
    assert!(!lifted.banned);
    assert!(lifted.ban_reason.is_none());
}

#[tokio::test]
async fn set_ban_should_report_missing_profile() {
    let (profiles, _codes) = setup(&[]).await;

    let found = profiles
        .set_ban(test_profile(4).id, true, None)
        .await
        .unwrap();
    assert!(!found);
    assert!(profiles.find_by_id(test_profile(4).id).await.unwrap().is_none());
}
