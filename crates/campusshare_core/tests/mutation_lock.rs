use campusshare_core::db::open_db_in_memory;
use campusshare_core::service::resource_service::{ResourceService, ResourceServiceError};
use campusshare_core::service::review_service::{ReviewService, ReviewServiceError};
use campusshare_core::{
    FixedClock, NewResource, Profile, ProfileRepository, Resource, ResourceKind,
    SqliteProfileRepository, SqliteResourceRepository, SqliteReviewRepository, Viewer,
    Visibility, LOCK_WINDOW_MS,
};
use rusqlite::Connection;
use uuid::Uuid;

const T0: i64 = 1_700_000_000_000;

fn seed_viewer(conn: &Connection, affiliation: &str) -> Viewer {
    let viewer = Viewer::new(Uuid::new_v4(), affiliation);
    let repo = SqliteProfileRepository::try_new(conn).unwrap();
    repo.create_profile(&Profile::new(viewer.id, "someone", affiliation, "cse", 2, T0))
        .unwrap();
    viewer
}

fn spec(title: &str) -> NewResource {
    NewResource {
        title: title.to_string(),
        description: String::new(),
        course: "cs101".to_string(),
        branch: "cse".to_string(),
        semester: 3,
        kind: ResourceKind::Notes,
        year: 2026,
        visibility: Visibility::Public,
        content_pointer: String::new(),
    }
}

fn create_resource(conn: &Connection, owner: &Viewer, created_at: i64) -> Resource {
    let repo = SqliteResourceRepository::try_new(conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(created_at));
    service.create_resource(owner, spec("locked")).unwrap()
}

fn update_resource_at(
    conn: &Connection,
    viewer: &Viewer,
    id: Uuid,
    now: i64,
) -> Result<Resource, ResourceServiceError> {
    let repo = SqliteResourceRepository::try_new(conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(now));
    service.update_resource(viewer, id, spec("renamed"))
}

fn delete_resource_at(
    conn: &Connection,
    viewer: &Viewer,
    id: Uuid,
    now: i64,
) -> Result<(), ResourceServiceError> {
    let repo = SqliteResourceRepository::try_new(conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(now));
    service.delete_resource(viewer, id)
}

#[test]
fn owner_may_mutate_inside_the_24h_window() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    let updated =
        update_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS - 1_000).unwrap();
    assert_eq!(updated.title, "renamed");
    // The anchor stays at the original creation time.
    assert_eq!(updated.created_at, T0);

    delete_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS - 1_000).unwrap();
}

#[test]
fn mutation_one_second_past_the_window_is_lock_expired() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    let err =
        update_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS + 1_000).unwrap_err();
    assert!(matches!(err, ResourceServiceError::LockExpired(id) if id == resource.id));

    let err =
        delete_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS + 1_000).unwrap_err();
    assert!(matches!(err, ResourceServiceError::LockExpired(_)));
}

#[test]
fn editing_does_not_renew_the_lock_window() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    // An edit late in the window succeeds...
    update_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS - 60_000).unwrap();

    // ...but does not push the window past the original anchor.
    let err =
        update_resource_at(&conn, &owner, resource.id, T0 + LOCK_WINDOW_MS + 1_000).unwrap_err();
    assert!(matches!(err, ResourceServiceError::LockExpired(_)));
}

#[test]
fn non_owner_mutation_is_rejected_regardless_of_window() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let stranger = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    let err = update_resource_at(&conn, &stranger, resource.id, T0 + 1_000).unwrap_err();
    assert!(matches!(err, ResourceServiceError::NotOwner(id) if id == resource.id));

    let err = delete_resource_at(&conn, &stranger, resource.id, T0 + 1_000).unwrap_err();
    assert!(matches!(err, ResourceServiceError::NotOwner(_)));
}

#[test]
fn review_lock_window_follows_the_review_not_the_resource() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let reviewer = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    // The review is created well after the resource; its window anchors to
    // its own creation time.
    let review_created = T0 + 10 * LOCK_WINDOW_MS;
    let review = {
        let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
        let mut service = ReviewService::new(repo, FixedClock::new(review_created));
        service
            .submit_review(&reviewer, resource.id, 4, "solid")
            .unwrap()
    };

    {
        let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
        let mut service =
            ReviewService::new(repo, FixedClock::new(review_created + LOCK_WINDOW_MS));
        service
            .update_review(&reviewer, review.id, 5, "even better")
            .unwrap();
    }

    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::new(
        repo,
        FixedClock::new(review_created + LOCK_WINDOW_MS + 1_000),
    );
    let err = service.delete_review(&reviewer, review.id).unwrap_err();
    assert!(matches!(err, ReviewServiceError::LockExpired(id) if id == review.id));
}

#[test]
fn review_mutation_by_non_author_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let reviewer = seed_viewer(&conn, "X");
    let other = seed_viewer(&conn, "X");
    let resource = create_resource(&conn, &owner, T0);

    let review = {
        let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
        let mut service = ReviewService::new(repo, FixedClock::new(T0));
        service.submit_review(&reviewer, resource.id, 3, "").unwrap()
    };

    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::new(repo, FixedClock::new(T0 + 1_000));
    let err = service.update_review(&other, review.id, 5, "").unwrap_err();
    assert!(matches!(err, ReviewServiceError::NotOwner(id) if id == review.id));
}
