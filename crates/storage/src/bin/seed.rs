use std::fmt;

use chrono::Duration;
use url::Url;

use storage::repository::Storage;
use topics_core::Clock;
use topics_core::model::{Activity, ActivityId, CompletionState, Course, CourseId, Section};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    course_id: CourseId,
    full_name: String,
    short_name: String,
    sections: u32,
    activities: u32,
    completed: u32,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCourseId { raw: String },
    InvalidCount { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course-id value: {raw}"),
            ArgsError::InvalidCount { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_count(flag: &'static str, raw: &str) -> Result<u32, ArgsError> {
    raw.parse::<u32>().map_err(|_| ArgsError::InvalidCount {
        flag,
        raw: raw.to_string(),
    })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("TOPICS_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut course_id = std::env::var("TOPICS_COURSE_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| CourseId::new(1), CourseId::new);
        let mut full_name = "Algebra Basics".to_string();
        let mut short_name = "ALG101".to_string();
        let mut sections = 4;
        let mut activities = 3;
        let mut completed = 2;

        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(&mut iter, "--db")?,
                "--course-id" => {
                    let raw = require_value(&mut iter, "--course-id")?;
                    course_id = raw
                        .parse::<u64>()
                        .map(CourseId::new)
                        .map_err(|_| ArgsError::InvalidCourseId { raw })?;
                }
                "--name" => full_name = require_value(&mut iter, "--name")?,
                "--short-name" => short_name = require_value(&mut iter, "--short-name")?,
                "--sections" => {
                    let raw = require_value(&mut iter, "--sections")?;
                    sections = parse_count("--sections", &raw)?;
                }
                "--activities" => {
                    let raw = require_value(&mut iter, "--activities")?;
                    activities = parse_count("--activities", &raw)?;
                }
                "--completed" => {
                    let raw = require_value(&mut iter, "--completed")?;
                    completed = parse_count("--completed", &raw)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        Ok(Self {
            db_url,
            course_id,
            full_name,
            short_name,
            sections,
            activities,
            completed,
        })
    }
}

fn print_usage() {
    eprintln!("Seed a demo course into a SQLite database.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <url>           Database URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --course-id <id>     Course id to upsert (default: 1)");
    eprintln!("  --name <name>        Course full name");
    eprintln!("  --short-name <name>  Course short name");
    eprintln!("  --sections <n>       Number of topic sections (default: 4)");
    eprintln!("  --activities <n>     Activities per section (default: 3)");
    eprintln!("  --completed <n>      Activities to mark complete (default: 2)");
}

fn demo_course(args: &Args) -> Result<Course, Box<dyn std::error::Error>> {
    let base = "https://lms.example.edu";
    let mut sections = vec![Section::new(0, None)];

    for ordinal in 1..=args.sections {
        let mut section_activities = Vec::new();
        for slot in 1..=args.activities {
            let id = u64::from(ordinal) * 100 + u64::from(slot);
            let url = Url::parse(&format!("{base}/mod/page/view.php?id={id}"))?;
            let activity = Activity::new(
                ActivityId::new(id),
                format!("Unit {ordinal}.{slot}"),
                Some(url),
            )?
            .with_completion_tracking(true);
            section_activities.push(activity);
        }
        sections.push(Section::new(ordinal, None).with_activities(section_activities));
    }

    let url = Url::parse(&format!(
        "{base}/course/view.php?id={}",
        args.course_id.value()
    ))?;
    Ok(Course::new(
        args.course_id,
        args.full_name.clone(),
        args.short_name.clone(),
        url,
        sections,
    )?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().inspect_err(|_| print_usage())?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = Clock::default().now();

    let course = demo_course(&args)?;
    storage.courses.upsert_course(&course).await?;

    let tracked: Vec<ActivityId> = course
        .sections
        .iter()
        .flat_map(|s| s.activities.iter())
        .filter(|a| a.completion_tracked)
        .map(|a| a.id)
        .collect();

    for (i, activity_id) in tracked.iter().take(args.completed as usize).enumerate() {
        let updated_at = now - Duration::days(i64::try_from(tracked.len() - i).unwrap_or(0));
        storage
            .completion
            .set_activity_state(
                course.id,
                *activity_id,
                CompletionState::Complete,
                updated_at,
            )
            .await?;
    }

    println!(
        "Seeded course {} with {} sections, {} activities each, {} completed into {}",
        course.id.value(),
        args.sections,
        args.activities,
        args.completed.min(u32::try_from(tracked.len()).unwrap_or(u32::MAX)),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
