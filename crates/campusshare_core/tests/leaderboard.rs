use campusshare_core::db::open_db_in_memory;
use campusshare_core::service::leaderboard::LeaderboardService;
use campusshare_core::service::resource_service::ResourceService;
use campusshare_core::{
    FixedClock, NewResource, Profile, ProfileRepository, ResourceKind, SqliteProfileRepository,
    SqliteResourceRepository, Viewer, Visibility,
};
use rusqlite::Connection;
use uuid::Uuid;

const T0: i64 = 1_700_000_000_000;

fn seed_viewer(conn: &Connection) -> Viewer {
    let viewer = Viewer::new(Uuid::new_v4(), "X");
    let repo = SqliteProfileRepository::try_new(conn).unwrap();
    repo.create_profile(&Profile::new(viewer.id, "someone", "X", "cse", 2, T0))
        .unwrap();
    viewer
}

fn upload(conn: &Connection, owner: &Viewer, visibility: Visibility, created_at: i64) {
    let repo = SqliteResourceRepository::try_new(conn).unwrap();
    let service = ResourceService::new(repo, FixedClock::new(created_at));
    service
        .create_resource(
            owner,
            NewResource {
                title: "contribution".to_string(),
                description: String::new(),
                course: "cs101".to_string(),
                branch: "cse".to_string(),
                semester: 3,
                kind: ResourceKind::Notes,
                year: 2026,
                visibility,
                content_pointer: String::new(),
            },
        )
        .unwrap();
}

#[test]
fn leaderboard_scores_uploads_and_ranks_contributors() {
    let conn = open_db_in_memory().unwrap();
    let busy = seed_viewer(&conn);
    let casual = seed_viewer(&conn);
    let lurker = seed_viewer(&conn);

    // busy: one public + one private = 15; casual: one private = 5.
    upload(&conn, &busy, Visibility::Public, T0);
    upload(&conn, &busy, Visibility::Private, T0 + 1_000);
    upload(&conn, &casual, Visibility::Private, T0 + 2_000);

    let service = LeaderboardService::new(
        SqliteProfileRepository::try_new(&conn).unwrap(),
        SqliteResourceRepository::try_new(&conn).unwrap(),
    );
    let entries = service.leaderboard().unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].profile_id, busy.id);
    assert_eq!(entries[0].points, 15);
    assert_eq!(entries[1].profile_id, casual.id);
    assert_eq!(entries[1].points, 5);
    // Registered contributors with no uploads still appear.
    assert_eq!(entries[2].profile_id, lurker.id);
    assert_eq!(entries[2].points, 0);
}

#[test]
fn deleting_a_resource_removes_its_points() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_viewer(&conn);

    let resource = {
        let repo = SqliteResourceRepository::try_new(&conn).unwrap();
        let service = ResourceService::new(repo, FixedClock::new(T0));
        service
            .create_resource(
                &owner,
                NewResource {
                    title: "short lived".to_string(),
                    description: String::new(),
                    course: "cs101".to_string(),
                    branch: "cse".to_string(),
                    semester: 3,
                    kind: ResourceKind::Notes,
                    year: 2026,
                    visibility: Visibility::Public,
                    content_pointer: String::new(),
                },
            )
            .unwrap()
    };

    {
        let repo = SqliteResourceRepository::try_new(&conn).unwrap();
        let service = ResourceService::new(repo, FixedClock::new(T0 + 1_000));
        service.delete_resource(&owner, resource.id).unwrap();
    }

    let service = LeaderboardService::new(
        SqliteProfileRepository::try_new(&conn).unwrap(),
        SqliteResourceRepository::try_new(&conn).unwrap(),
    );
    let entries = service.leaderboard().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, 0);
}
