//! Repository behaviour against SQLite.

#[path = "test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;

use chrono::Duration;
use job_tracker::goals::GoalUpdate;
use job_tracker::models::{
    AchievementCategory, ApplicationStatus, CandidateGoal, RejectionInitiator,
};
use job_tracker::repositories::{
    AchievementRepository, InterviewRepository, JobRepository, OfferFields, OfferRepository,
    RejectionFields, RejectionRepository, SessionRepository, UserRepository,
};
use test_utils::*;

#[tokio::test]
async fn definitions_are_upserted_by_name() {
    let db = setup_test_db_arc().await.unwrap();
    let repo = AchievementRepository::new(Arc::clone(&db));

    let first = repo
        .upsert_definition("Committed", "Target met for 1 week in a row", AchievementCategory::Streak)
        .await
        .unwrap();
    let second = repo
        .upsert_definition("Committed", "a different description", AchievementCategory::Streak)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.description, "Target met for 1 week in a row");
}

#[tokio::test]
async fn awarding_twice_is_a_no_op() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    let repo = AchievementRepository::new(Arc::clone(&db));
    let definition = repo
        .upsert_definition("Applied to 10 Jobs", "Awarded for applying to 10 jobs", AchievementCategory::Job)
        .await
        .unwrap();
    let now = at("2025-06-20T12:00:00-08:00");

    assert!(repo.award(user.id, definition.id, now).await.unwrap());
    assert!(!repo.award(user.id, definition.id, now).await.unwrap());

    let awarded = repo.awarded_for_user(user.id).await.unwrap();
    assert_eq!(awarded.len(), 1);
    assert_eq!(awarded[0].category, AchievementCategory::Job);
    assert_eq!(awarded[0].awarded_at, now);
}

#[tokio::test]
async fn applied_jobs_skip_saved_ones_and_are_ordered() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    insert_applied_jobs(
        &db,
        user.id,
        &["2025-06-03T09:00:00-08:00", "2025-06-01T09:00:00-08:00"],
    )
    .await
    .unwrap();
    insert_jobs(
        &db,
        user.id,
        ApplicationStatus::Saved,
        &["2025-06-02T09:00:00-08:00"],
    )
    .await
    .unwrap();
    insert_jobs(
        &db,
        user.id,
        ApplicationStatus::Rejected,
        &["2025-06-04T09:00:00-08:00"],
    )
    .await
    .unwrap();

    let repo = JobRepository::new(Arc::clone(&db));
    let applied = repo.applied_jobs(user.id).await.unwrap();
    let times: Vec<_> = applied.iter().map(|job| job.created_at).collect();
    assert_eq!(
        times,
        [
            at("2025-06-01T09:00:00-08:00"),
            at("2025-06-03T09:00:00-08:00"),
            at("2025-06-04T09:00:00-08:00"),
        ]
    );

    let tracked = repo
        .with_status_between(
            user.id,
            &[ApplicationStatus::Applied, ApplicationStatus::Interview],
            at("2025-06-01T00:00:00-08:00"),
            at("2025-06-07T23:59:59-08:00"),
        )
        .await
        .unwrap();
    assert_eq!(tracked.len(), 2);
}

#[tokio::test]
async fn interviews_without_a_date_are_not_scheduled() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    let repo = InterviewRepository::new(Arc::clone(&db));
    repo.create(user.id, None, at("2025-06-01T09:00:00-08:00"), None)
        .await
        .unwrap();
    repo.create(
        user.id,
        None,
        at("2025-06-02T09:00:00-08:00"),
        Some(at("2025-06-10T09:00:00-08:00")),
    )
    .await
    .unwrap();

    assert_eq!(repo.scheduled_for_user(user.id).await.unwrap().len(), 1);
    assert_eq!(
        repo.count_scheduled_between(
            user.id,
            at("2025-06-01T00:00:00-08:00"),
            at("2025-06-30T23:59:59-08:00"),
        )
        .await
        .unwrap(),
        1
    );
}

#[tokio::test]
async fn expired_sessions_are_not_found() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    let repo = SessionRepository::new(Arc::clone(&db));
    let now = at("2025-06-20T12:00:00-08:00");

    repo.create(user.id, "live".to_string(), now + Duration::hours(1))
        .await
        .unwrap();
    repo.create(user.id, "stale".to_string(), now - Duration::hours(1))
        .await
        .unwrap();

    let live = repo.find_active("live", now).await.unwrap().unwrap();
    assert_eq!(live.user_id, user.id);
    assert!(repo.find_active("stale", now).await.unwrap().is_none());
    assert!(repo.find_active("unknown", now).await.unwrap().is_none());
}

#[tokio::test]
async fn goal_updates_replace_the_single_offer_date_with_a_range() {
    let db = setup_test_db_arc().await.unwrap();
    let users = UserRepository::new(Arc::clone(&db));
    let user = create_user(&db, None).await.unwrap();

    let user = users
        .update_goals(
            user,
            &GoalUpdate {
                offer_received_by: Some(at("2025-09-01T00:00:00Z")),
                candidate_goal: Some(CandidateGoal::ReceiveAnOffer),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.offer_received_by_date_goal, Some(at("2025-09-01T00:00:00Z")));

    let user = users
        .update_goals(
            user,
            &GoalUpdate {
                weekly_range: Some((5, 10)),
                offer_range: Some((at("2025-08-01T00:00:00Z"), at("2025-10-01T00:00:00Z"))),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.offer_received_by_date_goal, None);
    assert_eq!(
        user.offer_received_by_date_goal_start,
        Some(at("2025-08-01T00:00:00Z"))
    );
    assert_eq!(user.jobs_applied_to_weekly_goal_min, Some(5));
    assert_eq!(user.jobs_applied_to_weekly_goal_max, Some(10));
    assert_eq!(user.candidate_goal, Some(CandidateGoal::ReceiveAnOffer));
}

#[tokio::test]
async fn offers_are_owner_scoped_and_unique_per_job() {
    let db = setup_test_db_arc().await.unwrap();
    let owner = create_user(&db, None).await.unwrap();
    let other = create_user(&db, None).await.unwrap();
    let job = insert_jobs(&db, owner.id, ApplicationStatus::Offer, &["2025-06-01T09:00:00-08:00"])
        .await
        .unwrap()
        .remove(0);
    let repo = OfferRepository::new(Arc::clone(&db));
    let fields = OfferFields {
        offer_date: at("2025-06-10T00:00:00Z"),
        offer_deadline: at("2025-06-20T00:00:00Z"),
        salary: "$100,000".to_string(),
    };

    let offer = repo.create(owner.id, job.id, fields.clone()).await.unwrap();
    assert!(repo.create(owner.id, job.id, fields.clone()).await.is_err());

    let (found, found_job) = repo.find_for_user(owner.id, offer.id).await.unwrap().unwrap();
    assert_eq!(found.salary, "$100,000");
    assert_eq!(found_job.map(|job| job.company), Some("Company 0".to_string()));
    assert!(repo.find_for_user(other.id, offer.id).await.unwrap().is_none());
    assert!(repo.update(other.id, offer.id, fields).await.unwrap().is_none());
    assert!(!repo.delete(other.id, offer.id).await.unwrap());

    assert!(repo.delete(owner.id, offer.id).await.unwrap());
    assert!(repo.list_for_user(owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejection_updates_keep_notes_unless_replaced() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    let job = insert_jobs(&db, user.id, ApplicationStatus::Rejected, &["2025-06-01T09:00:00-08:00"])
        .await
        .unwrap()
        .remove(0);
    let repo = RejectionRepository::new(Arc::clone(&db));

    let rejection = repo
        .create(
            user.id,
            job.id,
            RejectionFields {
                date: at("2025-06-12T00:00:00Z"),
                initiated_by: RejectionInitiator::Company,
                notes: Some("Position filled".to_string()),
            },
        )
        .await
        .unwrap();

    let updated = repo
        .update(
            user.id,
            rejection.id,
            RejectionFields {
                date: at("2025-06-13T00:00:00Z"),
                initiated_by: RejectionInitiator::Candidate,
                notes: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.initiated_by, RejectionInitiator::Candidate);
    assert_eq!(updated.date, at("2025-06-13T00:00:00Z"));
    assert_eq!(updated.notes.as_deref(), Some("Position filled"));
}

#[tokio::test]
async fn interviewed_jobs_are_collected_once() {
    let db = setup_test_db_arc().await.unwrap();
    let user = create_user(&db, None).await.unwrap();
    let job = insert_applied_jobs(&db, user.id, &["2025-06-01T09:00:00-08:00"])
        .await
        .unwrap()
        .remove(0);
    let repo = InterviewRepository::new(Arc::clone(&db));
    for job_id in [Some(job.id), Some(job.id), None] {
        repo.create(user.id, job_id, at("2025-06-02T09:00:00-08:00"), None)
            .await
            .unwrap();
    }

    let interviewed = repo.interviewed_job_ids(user.id).await.unwrap();
    assert_eq!(interviewed.len(), 1);
    assert!(interviewed.contains(&job.id));
}
