use std::sync::Arc;

use url::Url;

use services::{CompletionService, CourseService, NavigationService};
use storage::repository::{CourseRepository, InMemoryRepository};
use topics_core::model::{
    Activity, ActivityId, CompletionState, Course, CourseId, FormatSettings, Section, Viewer,
};
use topics_core::time::fixed_clock;

fn activity(id: u64, name: &str) -> Activity {
    let url = Url::parse(&format!("https://lms.example.edu/mod/page/view.php?id={id}")).unwrap();
    Activity::new(ActivityId::new(id), name, Some(url))
        .unwrap()
        .with_completion_tracking(true)
}

fn build_course() -> Course {
    Course::new(
        CourseId::new(5),
        "Algebra Basics",
        "ALG101",
        Url::parse("https://lms.example.edu/course/view.php?id=5").unwrap(),
        vec![
            Section::new(0, None),
            Section::new(1, Some("Numbers".to_string()))
                .with_activities(vec![activity(11, "Intro"), activity(12, "Counting quiz")]),
            Section::new(2, None),
            Section::new(3, Some("Fractions".to_string()))
                .with_activities(vec![activity(31, "Fractions intro")]),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn walking_next_links_visits_every_activity_in_order() {
    let repo = InMemoryRepository::new();
    repo.upsert_course(&build_course()).await.unwrap();

    let navigation = NavigationService::new(Arc::new(repo.clone()));
    let settings = FormatSettings::default();
    let viewer = Viewer::default();

    let mut visited = Vec::new();
    let mut current = ActivityId::new(11);
    visited.push(current);

    loop {
        let links = navigation
            .links_for_activity(CourseId::new(5), Some(current), &settings, &viewer)
            .await
            .unwrap();
        let Some(next) = links.next else {
            break;
        };
        let id: u64 = next
            .url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .and_then(|(_, value)| value.parse().ok())
            .expect("activity link carries its id");
        current = ActivityId::new(id);
        visited.push(current);
    }

    assert_eq!(
        visited,
        vec![ActivityId::new(11), ActivityId::new(12), ActivityId::new(31)],
        "forward walk crosses the empty section and stops at the course end"
    );

    // The first activity links back to the course root page.
    let first = navigation
        .links_for_activity(CourseId::new(5), Some(ActivityId::new(11)), &settings, &viewer)
        .await
        .unwrap();
    let previous = first.previous.expect("previous link");
    assert_eq!(previous.label, "ALG101");
    assert_eq!(
        previous.url.as_str(),
        "https://lms.example.edu/course/view.php?id=5"
    );
}

#[tokio::test]
async fn completing_activities_completes_the_section_summary() {
    let repo = InMemoryRepository::new();
    repo.upsert_course(&build_course()).await.unwrap();

    let completion = CompletionService::new(fixed_clock(), Arc::new(repo.clone()));
    let courses = CourseService::new(Arc::new(repo.clone()), Arc::new(repo));
    let settings = FormatSettings::default();
    let viewer = Viewer::default();

    let before = courses
        .section_summaries(CourseId::new(5), &settings, &viewer)
        .await
        .unwrap();
    assert!(before.iter().all(|item| !item.completed));

    completion
        .mark(CourseId::new(5), ActivityId::new(11), CompletionState::Complete)
        .await
        .unwrap();
    completion
        .mark(CourseId::new(5), ActivityId::new(12), CompletionState::CompletePass)
        .await
        .unwrap();

    let after = courses
        .section_summaries(CourseId::new(5), &settings, &viewer)
        .await
        .unwrap();
    let numbers = after.iter().find(|item| item.ordinal == 1).unwrap();
    let fractions = after.iter().find(|item| item.ordinal == 3).unwrap();
    assert!(numbers.completed);
    assert!(!fractions.completed, "untouched section stays incomplete");
}
