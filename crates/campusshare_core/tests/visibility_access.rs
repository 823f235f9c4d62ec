use campusshare_core::db::open_db_in_memory;
use campusshare_core::service::resource_service::{ResourceService, ResourceServiceError};
use campusshare_core::{
    FixedClock, NewResource, Profile, ProfileRepository, Resource, ResourceKind,
    ResourceListQuery, SqliteProfileRepository, SqliteResourceRepository, Viewer, Visibility,
};
use rusqlite::Connection;
use uuid::Uuid;

const T0: i64 = 1_700_000_000_000;

fn seed_viewer(conn: &Connection, affiliation: &str) -> Viewer {
    let viewer = Viewer::new(Uuid::new_v4(), affiliation);
    let repo = SqliteProfileRepository::try_new(conn).unwrap();
    repo.create_profile(&Profile::new(
        viewer.id,
        "someone",
        affiliation,
        "cse",
        2,
        T0,
    ))
    .unwrap();
    viewer
}

fn spec(title: &str, visibility: Visibility) -> NewResource {
    NewResource {
        title: title.to_string(),
        description: "unit notes".to_string(),
        course: "cs101".to_string(),
        branch: "cse".to_string(),
        semester: 3,
        kind: ResourceKind::Notes,
        year: 2026,
        visibility,
        content_pointer: "blob://x".to_string(),
    }
}

fn create_resource(
    conn: &Connection,
    owner: &Viewer,
    title: &str,
    visibility: Visibility,
    created_at: i64,
) -> Resource {
    let repo = SqliteResourceRepository::try_new(conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(created_at));
    service.create_resource(owner, spec(title, visibility)).unwrap()
}

#[test]
fn private_resource_is_visible_to_same_affiliation_only() {
    let conn = open_db_in_memory().unwrap();
    let owner_a = seed_viewer(&conn, "X");
    let viewer_b = seed_viewer(&conn, "X");
    let viewer_c = seed_viewer(&conn, "Y");

    let resource = create_resource(&conn, &owner_a, "private notes", Visibility::Private, T0);

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    assert!(service.get_resource(Some(&owner_a), resource.id).is_ok());
    assert!(service.get_resource(Some(&viewer_b), resource.id).is_ok());

    let err = service
        .get_resource(Some(&viewer_c), resource.id)
        .unwrap_err();
    assert!(matches!(err, ResourceServiceError::AccessDenied(id) if id == resource.id));

    let err = service.get_resource(None, resource.id).unwrap_err();
    assert!(matches!(err, ResourceServiceError::AccessDenied(_)));
}

#[test]
fn access_denied_is_distinct_from_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let outsider = seed_viewer(&conn, "Y");

    let resource = create_resource(&conn, &owner, "hidden", Visibility::Private, T0);

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    let missing_id = Uuid::new_v4();
    assert!(matches!(
        service.get_resource(Some(&outsider), missing_id).unwrap_err(),
        ResourceServiceError::NotFound(id) if id == missing_id
    ));
    assert!(matches!(
        service.get_resource(Some(&outsider), resource.id).unwrap_err(),
        ResourceServiceError::AccessDenied(id) if id == resource.id
    ));
}

#[test]
fn public_resources_are_listed_for_anonymous_viewers() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");

    create_resource(&conn, &owner, "open notes", Visibility::Public, T0);
    create_resource(&conn, &owner, "campus only", Visibility::Private, T0 + 1_000);

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    let listed = service
        .list_resources(None, &ResourceListQuery::default(), None, 0)
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "open notes");
}

#[test]
fn listing_orders_newest_first_and_paginates_after_visibility_filtering() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let outsider = seed_viewer(&conn, "Y");

    // Oldest to newest; the private row sits in the middle of the display
    // order and must not shift page boundaries for viewers who cannot see
    // it.
    create_resource(&conn, &owner, "first", Visibility::Public, T0);
    create_resource(&conn, &owner, "hidden", Visibility::Private, T0 + 1_000);
    create_resource(&conn, &owner, "second", Visibility::Public, T0 + 2_000);
    create_resource(&conn, &owner, "third", Visibility::Public, T0 + 3_000);

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    let page = service
        .list_resources(Some(&outsider), &ResourceListQuery::default(), Some(2), 1)
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "second");
    assert_eq!(page[1].title, "first");
}

#[test]
fn query_filters_restrict_the_candidate_set() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");

    create_resource(&conn, &owner, "dsp notes", Visibility::Public, T0);
    let mut other = spec("math paper", Visibility::Public);
    other.course = "ma201".to_string();
    other.kind = ResourceKind::Paper;
    {
        let repo = SqliteResourceRepository::try_new(&conn).unwrap();
        let service = ResourceService::new(repo, FixedClock::new(T0 + 1_000));
        service.create_resource(&owner, other).unwrap();
    }

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    let by_course = service
        .list_resources(
            None,
            &ResourceListQuery {
                course: Some("ma201".to_string()),
                ..ResourceListQuery::default()
            },
            None,
            0,
        )
        .unwrap();
    assert_eq!(by_course.len(), 1);
    assert_eq!(by_course[0].title, "math paper");

    let by_search = service
        .list_resources(
            None,
            &ResourceListQuery {
                search: Some("  dsp \t ".to_string()),
                ..ResourceListQuery::default()
            },
            None,
            0,
        )
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].title, "dsp notes");
}

#[test]
fn resource_affiliation_is_a_creation_time_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn, "X");
    let colleague = seed_viewer(&conn, "X");

    let resource = create_resource(&conn, &owner, "snapshot", Visibility::Private, T0);

    // The owner later changes colleges; the resource keeps its snapshot,
    // so the old-college colleague still sees it.
    {
        let repo = SqliteProfileRepository::try_new(&conn).unwrap();
        let mut profile = repo.get_profile(owner.id).unwrap().unwrap();
        profile.affiliation = "Z".to_string();
        repo.update_profile(&profile).unwrap();
    }

    let repo = SqliteResourceRepository::try_new(&conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(T0));

    assert!(service.get_resource(Some(&colleague), resource.id).is_ok());
    let reloaded = service.get_resource(Some(&owner), resource.id).unwrap();
    assert_eq!(reloaded.affiliation, "X");
}
