use approx::assert_relative_eq;
use coursegraph_core::{Catalog, Category, Course, LayoutConfig};
use coursegraph_progress::{
    AcademicYear, CurriculumSession, FileSnapshotStore, LayoutFilter, LockReason,
    MemorySnapshotStore, ProgressError, ProgressSnapshot, RoadmapLayout, SnapshotStore,
    ToggleOutcome,
};
use tempfile::TempDir;

fn scenario_session() -> CurriculumSession {
    CurriculumSession::from_catalog(Catalog::from_courses(vec![
        Course::new("A", "Course A", 5, Category::Basic),
        Course::new("B", "Course B", 5, Category::Basic).with_prerequisites(["A"]),
        Course::new("C", "Course C", 6, Category::Basic)
            .with_prerequisites(["B"])
            .with_min_credits(8),
    ]))
}

fn bundled_session() -> CurriculumSession {
    CurriculumSession::from_catalog(Catalog::bundled().unwrap())
}

#[test]
fn test_walkthrough_scenario() {
    let mut session = scenario_session();

    let err = session.toggle("B").unwrap_err();
    match &err {
        ProgressError::Locked { id, reason } => {
            assert_eq!(id, "B");
            assert_eq!(
                reason,
                &LockReason::MissingPrerequisites {
                    ids: vec!["A".into()],
                    names: vec!["Course A".into()],
                }
            );
        }
        other => panic!("expected a locked rejection, got {other:?}"),
    }
    assert!(err.to_string().contains("Course A"));

    assert_eq!(session.toggle("A").unwrap(), ToggleOutcome::Completed);
    assert_eq!(session.total_credits(), 5);

    assert_eq!(session.toggle("B").unwrap(), ToggleOutcome::Completed);
    assert_eq!(session.total_credits(), 10);

    assert!(session.is_eligible("C"));
    assert_eq!(session.toggle("C").unwrap(), ToggleOutcome::Completed);
    assert_eq!(session.total_credits(), 16);
}

#[test]
fn test_eligibility_requires_every_condition() {
    let mut session = CurriculumSession::from_catalog(Catalog::from_courses(vec![
        Course::new("X", "X", 40, Category::Basic),
        Course::new("Y", "Y", 40, Category::Basic),
        Course::new("F", "Filler", 30, Category::General),
        Course::new("T", "Target", 5, Category::Specialized)
            .with_prerequisites(["X", "Y"])
            .with_min_credits(100),
    ]));

    session.toggle("X").unwrap();
    session.toggle("F").unwrap();
    assert!(!session.is_eligible("T"));

    session.toggle("Y").unwrap();
    assert_eq!(session.total_credits(), 110);
    assert!(session.is_eligible("T"));

    session.toggle("F").unwrap();
    assert_eq!(session.total_credits(), 80);
    assert!(!session.is_eligible("T"));
    assert_eq!(
        session.eligibility("T").unwrap().lock_reason(),
        Some(&LockReason::InsufficientCredits {
            required: 100,
            current: 80
        })
    );
}

#[test]
fn test_rejected_toggle_leaves_state_unchanged() {
    let mut session = scenario_session();

    for _ in 0..2 {
        assert!(session.toggle("C").is_err());
        assert!(session.state().is_empty());
        assert_eq!(session.total_credits(), 0);
    }
}

#[test]
fn test_locked_completed_course_cannot_be_toggled() {
    let mut session = scenario_session();
    session.toggle("A").unwrap();
    session.toggle("B").unwrap();
    assert_eq!(session.toggle("A").unwrap(), ToggleOutcome::Uncompleted);

    let status = session.course_status("B").unwrap();
    assert!(status.is_completed);
    assert!(status.is_locked());

    let err = session.toggle("B").unwrap_err();
    assert!(matches!(err, ProgressError::Locked { ref id, .. } if id == "B"));
    assert_eq!(session.snapshot().ids(), &["B"]);
    assert_eq!(session.total_credits(), 5);

    // Completing the prerequisite again unlocks B for removal.
    session.toggle("A").unwrap();
    assert_eq!(session.toggle("B").unwrap(), ToggleOutcome::Uncompleted);
    assert_eq!(session.snapshot().ids(), &["A"]);
}

#[test]
fn test_toggle_twice_restores_state() {
    let mut session = scenario_session();
    session.toggle("A").unwrap();
    let before = session.snapshot();

    assert_eq!(session.toggle("B").unwrap(), ToggleOutcome::Completed);
    assert_eq!(session.toggle("B").unwrap(), ToggleOutcome::Uncompleted);

    assert_eq!(session.snapshot(), before);
    assert_eq!(session.total_credits(), 5);
}

#[test]
fn test_bulk_select_is_single_generation() {
    let mut session = CurriculumSession::from_catalog(Catalog::from_courses(vec![
        Course::new("A", "A", 5, Category::Basic),
        Course::new("B", "B", 5, Category::Basic).with_prerequisites(["A"]),
        Course::new("C", "C", 5, Category::Basic).with_prerequisites(["B"]),
    ]));
    session.toggle("A").unwrap();

    assert_eq!(session.select_all_eligible(Category::Basic), 1);
    assert!(session.is_completed("B"));
    assert!(!session.is_completed("C"));

    assert_eq!(session.select_all_eligible(Category::Basic), 1);
    assert!(session.is_completed("C"));
    assert_eq!(session.select_all_eligible(Category::Basic), 0);
}

#[test]
fn test_bulk_select_on_bundled_catalog() {
    let mut session = bundled_session();

    assert_eq!(session.select_all_eligible(Category::General), 6);
    assert_eq!(session.total_credits(), 25);
    assert!(!session.is_completed("GTW301"));

    assert_eq!(session.select_all_eligible(Category::General), 4);
    assert!(session.is_completed("GTW301"));
    assert_eq!(session.select_all_eligible(Category::Project), 0);
}

#[test]
fn test_credit_aggregation() {
    let mut session = CurriculumSession::from_catalog(Catalog::from_courses(vec![
        Course::new("P", "P", 5, Category::General),
        Course::new("Q", "Q", 6, Category::General),
    ]));
    session.toggle("P").unwrap();
    session.toggle("Q").unwrap();
    assert_eq!(session.total_credits(), 11);
}

#[test]
fn test_year_status_boundaries() {
    let courses = vec![
        Course::new("C40", "C40", 40, Category::General),
        Course::new("C59", "C59", 59, Category::General),
        Course::new("C201", "C201", 201, Category::General),
    ];
    let mut session = CurriculumSession::from_catalog(Catalog::from_courses(courses));

    assert_eq!(session.year_status().year, AcademicYear::First);

    session.toggle("C40").unwrap();
    let status = session.year_status();
    assert_eq!(status.year, AcademicYear::Second);
    assert_relative_eq!(status.progress, 0.0);

    session.toggle("C40").unwrap();
    session.toggle("C59").unwrap();
    session.toggle("C40").unwrap();
    assert_eq!(session.total_credits(), 99);
    let status = session.year_status();
    assert_eq!(status.year, AcademicYear::Second);
    assert!(status.progress > 0.98 && status.progress < 1.0);

    session.toggle("C201").unwrap();
    assert_eq!(session.total_credits(), 300);
    let status = session.year_status();
    assert_eq!(status.year, AcademicYear::Fifth);
    assert_relative_eq!(status.progress, 1.0);
    assert_eq!(session.remaining_credits(), 0);
    assert_relative_eq!(session.graduation_progress(), 1.0);
}

#[test]
fn test_project_gated_by_credits_on_bundled_catalog() {
    let session = bundled_session();
    let reason = session.eligibility("BPR601").unwrap();
    assert!(matches!(
        reason.lock_reason(),
        Some(LockReason::MissingPrerequisites { ids, .. }) if ids == &["BIS601"]
    ));
    assert!(matches!(
        session.eligibility("GHOST"),
        Err(ProgressError::UnknownCourse(_))
    ));
}

#[test]
fn test_restore_drops_unknown_ids() {
    let mut session = bundled_session();
    let snapshot = ProgressSnapshot::new(vec![
        "GCS301".into(),
        "RETIRED999".into(),
        "BPG401".into(),
    ]);

    let report = session.restore(&snapshot);

    assert_eq!(report.restored, 2);
    assert_eq!(report.dropped, vec!["RETIRED999"]);
    assert_eq!(session.total_credits(), 9);
    assert_eq!(session.snapshot().ids(), &["GCS301", "BPG401"]);
}

#[test]
fn test_file_store_persists_between_sessions() {
    let dir = TempDir::new().unwrap();
    let mut store = FileSnapshotStore::new(dir.path().join("progress.json"));

    let mut session = bundled_session();
    session.toggle("BPG401").unwrap();
    session.toggle("BPG402").unwrap();
    session.save_to(&mut store).unwrap();

    let mut reopened = bundled_session();
    let report = reopened.load_from(&store);
    assert_eq!(report.restored, 2);
    assert_eq!(reopened.total_credits(), 10);
    assert!(reopened.is_completed("BPG402"));

    std::fs::write(store.path(), "[\"BPG401\"").unwrap();
    let mut recovered = bundled_session();
    let report = recovered.load_from(&store);
    assert_eq!(report.restored, 0);
    assert!(recovered.state().is_empty());
}

#[test]
fn test_memory_store_and_reset() {
    let mut store = MemorySnapshotStore::new();
    let mut session = scenario_session();
    session.toggle("A").unwrap();
    session.save_to(&mut store).unwrap();
    assert_eq!(store.load().unwrap().ids(), &["A"]);

    session.reset();
    assert!(session.state().is_empty());
    assert_eq!(session.total_credits(), 0);

    session.load_from(&store);
    assert!(session.is_completed("A"));
}

#[test]
fn test_bundled_layout_contract() {
    let mut session = bundled_session();
    session.toggle("BPG401").unwrap();

    let layout = RoadmapLayout::compute(&session, &LayoutConfig::default(), LayoutFilter::All);

    assert_eq!(layout.nodes.len(), session.catalog().len());
    assert_eq!(
        layout.connections.len(),
        session.graph().unlock_map().edge_count()
    );

    let node = layout.node("BPG402").unwrap();
    assert_eq!(node.rank, 1);
    assert!(node.is_available);
    assert!(!node.is_locked);
    assert_eq!(node.unlocks, session.graph().unlocks_of("BPG402"));

    let project = layout.node("BPR602").unwrap();
    assert_eq!(project.rank, 6);
    assert!(project.is_locked);
}
