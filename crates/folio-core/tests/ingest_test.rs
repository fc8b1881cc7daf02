use folio_core::{
    CalendarDate, ItemKind, SkipReason, YearMonth, ingest, parse_experience_feed, parse_skill_feed,
};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn read_fixture(parts: &[&str]) -> String {
    let mut path = workspace_root().join("fixtures");
    for p in parts {
        path = path.join(p);
    }
    std::fs::read_to_string(&path).expect("fixture")
}

#[test]
fn portfolio_fixture_ingests_all_dated_records() {
    let records = parse_experience_feed(&read_fixture(&["experience", "portfolio.json"]))
        .expect("feed parses");
    assert_eq!(records.len(), 7);

    let out = ingest(&records);
    assert_eq!(out.items.len(), 6);
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].index, 6);
    assert_eq!(
        out.skipped[0].reason,
        SkipReason::InvalidStartDate("TBD".to_string())
    );

    let schools = out
        .items
        .iter()
        .filter(|i| i.kind == ItemKind::School)
        .count();
    assert_eq!(schools, 1);

    let staff = out
        .items
        .iter()
        .find(|i| i.label == "Staff Engineer")
        .expect("staff engineer entry");
    assert!(staff.is_current);
    assert_eq!(staff.start.to_string(), "2023-03-01");
    assert_eq!(staff.start.epoch_month(), 2023 * 12 + 2);

    let ta = out
        .items
        .iter()
        .find(|i| i.label == "Teaching Assistant")
        .expect("teaching assistant entry");
    assert!(!ta.is_current);
    let today = YearMonth::new(2025, 1).expect("valid month");
    assert_eq!(
        ta.effective_end(today),
        CalendarDate::parse("2020-04-30").expect("valid date")
    );
    assert_eq!(ta.duration_months(today), 8);
}

#[test]
fn skills_fixture_dedupes_case_insensitively() {
    let tags = parse_skill_feed(&read_fixture(&["skills", "skills.json"])).expect("feed parses");
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Rust",
            "TypeScript",
            "React",
            "PostgreSQL",
            "WebGL",
            "Docker",
            "Kubernetes",
            "C++"
        ]
    );
    assert_eq!(tags[4].color.as_deref(), Some("#990000"));
}
