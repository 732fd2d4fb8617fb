use topics_core::model::{
    Activity, ActivityId, CompletionState, Course, CourseId, FormatSettings, Section, Viewer,
};
use topics_core::navigation::{self, Destination};
use topics_core::progress::SectionProgress;
use topics_core::time::fixed_now;
use url::Url;

use storage::repository::{CompletionRepository, CourseRepository};
use storage::sqlite::SqliteRepository;

fn activity(id: u64, name: &str) -> Activity {
    let url = Url::parse(&format!("https://lms.example.edu/mod/page/view.php?id={id}")).unwrap();
    Activity::new(ActivityId::new(id), name, Some(url))
        .unwrap()
        .with_completion_tracking(true)
}

fn build_course() -> Course {
    let label = Activity::new(ActivityId::new(13), "Label", None).unwrap();
    let hidden = activity(14, "Hidden quiz").with_visibility(false);
    Course::new(
        CourseId::new(5),
        "Algebra Basics",
        "ALG101",
        Url::parse("https://lms.example.edu/course/view.php?id=5").unwrap(),
        vec![
            Section::new(0, None),
            Section::new(1, Some("Numbers".to_string()))
                .with_activities(vec![activity(11, "Intro"), label, activity(12, "Quiz")]),
            Section::new(2, None)
                .with_visibility(false, false)
                .with_availability(false, Some("Opens next week".to_string()))
                .with_activities(vec![hidden]),
        ],
    )
    .unwrap()
    .with_marker(Some(1))
}

#[tokio::test]
async fn sqlite_roundtrips_course_structure() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_structure?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let course = build_course();
    repo.upsert_course(&course).await.unwrap();

    let fetched = repo.get_course(course.id).await.unwrap().expect("course");
    assert_eq!(fetched, course);

    assert!(
        repo.get_course(CourseId::new(99)).await.unwrap().is_none(),
        "unknown course id should come back empty"
    );
}

#[tokio::test]
async fn sqlite_completion_survives_structure_refresh() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_completion?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let course = build_course();
    repo.upsert_course(&course).await.unwrap();

    let now = fixed_now();
    repo.set_activity_state(course.id, ActivityId::new(11), CompletionState::Complete, now)
        .await
        .unwrap();
    repo.set_activity_state(
        course.id,
        ActivityId::new(12),
        CompletionState::Incomplete,
        now,
    )
    .await
    .unwrap();

    // Refreshing the structure must not discard recorded states.
    repo.upsert_course(&course).await.unwrap();

    let index = repo.completion_index(course.id).await.unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(
        index.state(ActivityId::new(11)),
        Some(CompletionState::Complete)
    );

    let record = repo
        .activity_state(course.id, ActivityId::new(11))
        .await
        .unwrap()
        .expect("tracked");
    assert_eq!(record.updated_at, now);

    // Overwrite and confirm the upsert semantics.
    repo.set_activity_state(
        course.id,
        ActivityId::new(11),
        CompletionState::CompleteFail,
        now,
    )
    .await
    .unwrap();
    let index = repo.completion_index(course.id).await.unwrap();
    assert_eq!(
        index.state(ActivityId::new(11)),
        Some(CompletionState::CompleteFail)
    );
}

#[tokio::test]
async fn fetched_course_drives_progress_and_navigation() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_drive?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let course = build_course();
    repo.upsert_course(&course).await.unwrap();
    repo.set_activity_state(
        course.id,
        ActivityId::new(11),
        CompletionState::CompletePass,
        fixed_now(),
    )
    .await
    .unwrap();

    let course = repo.get_course(course.id).await.unwrap().expect("course");
    let index = repo.completion_index(course.id).await.unwrap();
    let settings = FormatSettings::default();
    let viewer = Viewer::default();

    let progress = SectionProgress::build(course.section(1).unwrap(), &settings, &viewer);
    assert_eq!(progress.activities().len(), 2);
    assert!(progress.is_complete(&index));

    let result = navigation::resolve(&course, ActivityId::new(11), &settings, &viewer);
    assert_eq!(result.previous, Some(Destination::CourseRoot));
    match result.next {
        Some(Destination::Activity { id, .. }) => assert_eq!(id, ActivityId::new(12)),
        other => panic!("expected activity destination, got {other:?}"),
    }
}
