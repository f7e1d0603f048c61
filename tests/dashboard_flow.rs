//! End-to-end flow: load, filter, card clicks, add/edit, switch entity type.

use std::collections::HashMap;
use std::sync::Arc;

use dashboard::error::AppError;
use dashboard::models::{
    DashboardState, DepartmentRecord, EntityRecord, EntityType, FilterValue, StatValue,
};
use dashboard::pipeline::{DashboardController, FormPopupController, FormState, fetch_snapshot};
use dashboard::services::forms::FormData;
use dashboard::storage::{EntityDataSource, MemoryDataSource};

fn student(id: i64, name: &str, department: &str, status: &str, gpa: f64) -> EntityRecord {
    EntityRecord::new(id)
        .with("name", name)
        .with("email", format!("{}@uni.edu", name.to_lowercase()))
        .with("department", department)
        .with("academicYear", "Year 1")
        .with("status", status)
        .with("gpa", gpa)
}

fn seeded() -> Arc<MemoryDataSource> {
    Arc::new(MemoryDataSource::with_records(
        HashMap::from([
            (
                EntityType::Students,
                vec![
                    student(1, "Ada", "Math", "Active", 3.9),
                    student(2, "Alan", "CS", "Graduated", 3.1),
                    student(3, "Grace", "CS", "Active", 3.6),
                ],
            ),
            (
                EntityType::Lecturers,
                vec![
                    EntityRecord::new(1)
                        .with("name", "Knuth")
                        .with("department", "CS")
                        .with("employmentType", "Full-time")
                        .with("rating", 4.0),
                    EntityRecord::new(2)
                        .with("name", "Curie")
                        .with("department", "Physics")
                        .with("employmentType", "Part-time")
                        .with("rating", 5.0),
                ],
            ),
        ]),
        vec![DepartmentRecord::new("Math"), DepartmentRecord::new("CS")],
    ))
}

fn form_data(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn filters_and_cards_drive_the_view() {
    let mut dashboard = DashboardController::new(seeded());
    dashboard.load("students").await.unwrap();

    assert_eq!(dashboard.state(), &DashboardState::Ready);
    assert_eq!(dashboard.primary_options(), vec!["All", "Math", "CS"]);
    assert_eq!(dashboard.view().stats["activeStudents"], StatValue::Count(2));

    assert!(dashboard.set_primary_filter("CS"));
    assert_eq!(dashboard.view().filtered.len(), 2);

    assert!(dashboard.card_click("active"));
    let names: Vec<_> = dashboard
        .view()
        .filtered
        .iter()
        .map(|r| r.display_name())
        .collect();
    assert_eq!(names, vec!["Grace"]);

    assert_eq!(dashboard.view().stats["totalStudents"], StatValue::Count(1));
    assert_eq!(dashboard.view().stats["topPerformers"], StatValue::Count(1));

    assert!(dashboard.card_click("total"));
    assert_eq!(dashboard.view().primary_filter, FilterValue::All);
    assert_eq!(dashboard.view().filtered.len(), 3);
}

#[tokio::test]
async fn add_then_edit_round_trip() {
    let source = seeded();
    let mut dashboard = DashboardController::new(source.clone());
    dashboard.load("students").await.unwrap();

    let config = dashboard.config().unwrap();
    let mut form = FormPopupController::new(source.clone(), config);

    form.open_for_add().await;
    assert_eq!(form.department_options(), vec!["Math", "CS"]);

    let missing = form
        .submit(form_data(&[("name", "Emmy")]), &mut dashboard)
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::Validation { .. }));
    assert_eq!(source.fetch_records(EntityType::Students).await.unwrap().len(), 3);

    let created = form
        .submit(
            form_data(&[
                ("name", "Emmy"),
                ("email", "emmy@uni.edu"),
                ("department", "Math"),
                ("academicYear", "Year 3"),
                ("status", "Active"),
                ("gpa", "3.8"),
            ]),
            &mut dashboard,
        )
        .await
        .unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(form.state(), &FormState::Closed);
    assert_eq!(dashboard.view().stats["topPerformers"], StatValue::Count(3));

    form.open_for_edit(created.clone()).await;
    let mut data = form.data().clone();
    data.insert("status".into(), "Graduated".into());
    form.submit(data, &mut dashboard).await.unwrap();

    assert_eq!(dashboard.view().stats["graduatedStudents"], StatValue::Count(2));
    let route = dashboard.go_to_profile(&created).unwrap();
    assert_eq!(route.path(), "/students/4");
}

#[tokio::test]
async fn switching_types_and_stale_loads() {
    let source = seeded();
    let mut dashboard = DashboardController::new(source.clone());
    dashboard.load("students").await.unwrap();

    let stale = dashboard.begin_load("students").unwrap();
    let stale_outcome = fetch_snapshot(source.as_ref(), stale.entity_type()).await;

    dashboard.load("lecturers").await.unwrap();
    assert!(!dashboard.finish_load(stale, stale_outcome));
    assert_eq!(dashboard.entity_type(), Some(EntityType::Lecturers));
    assert_eq!(dashboard.view().stats["averageRating"], StatValue::Text("4.5".into()));
    assert_eq!(dashboard.view().stats["fullTimeLecturers"], StatValue::Count(1));

    assert!(matches!(
        dashboard.load("courses").await,
        Err(AppError::UnknownEntityType(_))
    ));
    assert_eq!(dashboard.entity_type(), Some(EntityType::Lecturers));
}

#[tokio::test]
async fn record_failure_then_retry() {
    let source = seeded();
    let mut dashboard = DashboardController::new(source.clone());

    source.fail_records(true);
    dashboard.load("students").await.unwrap();
    assert!(matches!(dashboard.state(), DashboardState::Error(_)));
    assert!(dashboard.view().records.is_empty());

    source.fail_records(false);
    dashboard.retry().await.unwrap();
    assert_eq!(dashboard.state(), &DashboardState::Ready);
    assert_eq!(dashboard.view().records.len(), 3);
}
