use folio_core::{CalendarDate, ItemKind, TimelineItem, YearMonth, ingest, parse_experience_feed};
use folio_layout::svg::{SvgOptions, render_timeline_svg};
use folio_layout::{TimelineConfig, TimelineLayoutOptions, assign, layout_timeline};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn today() -> YearMonth {
    YearMonth::new(2025, 6).expect("valid month")
}

fn job(label: &str, start: &str, end: Option<&str>) -> TimelineItem {
    let end = end.map(|e| CalendarDate::parse(e).expect("valid end"));
    TimelineItem {
        kind: ItemKind::Job,
        label: label.to_string(),
        subtitle: Some("Acme".to_string()),
        location: None,
        gpa: None,
        start: CalendarDate::parse(start).expect("valid start"),
        end,
        is_current: end.is_none(),
        description: String::new(),
    }
}

/// Deterministic pseudo random items spread over a few years, mixing month and full dates.
fn generated_items(seed: u64, n: usize) -> Vec<TimelineItem> {
    let mut state = seed.max(1);
    let mut next = move |upper: u64| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state % upper
    };
    (0..n)
        .map(|i| {
            let start = 2015 * 12 + next(96) as i64;
            let len = next(30) as i64;
            let (start_full, start_day) = (next(3) == 0, 1 + next(28));
            let has_end = next(6) != 0;
            let (end_full, end_day) = (next(3) == 0, 1 + next(28));
            let date = |epoch_month: i64, full: bool, day: u64| {
                let ym = YearMonth::from_epoch_month(epoch_month).expect("valid month");
                if full {
                    format!("{ym}-{day:02}")
                } else {
                    ym.to_string()
                }
            };
            let start_date = date(start, start_full, start_day);
            let end = has_end.then(|| date(start + len, end_full, end_day));
            job(&format!("job-{i}"), &start_date, end.as_deref())
        })
        .collect()
}

/// Whether two items share at least one month of the timeline.
fn overlaps(a: &TimelineItem, b: &TimelineItem) -> bool {
    let (a_start, a_end) = (a.start.epoch_month(), a.effective_end(today()).epoch_month());
    let (b_start, b_end) = (b.start.epoch_month(), b.effective_end(today()).epoch_month());
    a_start <= b_end && b_start <= a_end
}

fn month_day(date: CalendarDate) -> chrono::NaiveDate {
    date.year_month().first_day()
}

#[test]
fn overlapping_items_never_share_a_slot() {
    let config = TimelineConfig::default();
    for seed in 1..20u64 {
        let items = generated_items(seed, 24);
        let out = assign(&items, &config, today());
        for a in &items {
            for b in &items {
                if a.id() == b.id() || !overlaps(a, b) {
                    continue;
                }
                assert_ne!(
                    out[&a.id()].slot,
                    out[&b.id()].slot,
                    "seed {seed}: {} and {} overlap",
                    a.id(),
                    b.id()
                );
            }
        }
    }
}

#[test]
fn colors_differ_within_the_cooldown() {
    let config = TimelineConfig::default();
    for seed in 1..20u64 {
        let items = generated_items(seed, 12);
        let out = assign(&items, &config, today());
        for a in &items {
            for b in &items {
                if a.id() == b.id() || a.start.epoch_month() > b.start.epoch_month() {
                    continue;
                }
                let a_end = month_day(a.effective_end(today()));
                let cooled = a_end + chrono::Days::new(config.color_cooldown_days);
                let (ca, cb) = (&out[&a.id()].color, &out[&b.id()].color);
                if cooled >= month_day(b.start) && ca != &config.fallback_color {
                    assert_ne!(ca, cb, "seed {seed}: {} and {}", a.id(), b.id());
                }
            }
        }
    }
}

#[test]
fn nearby_cards_never_overlap_horizontally() {
    let options = TimelineLayoutOptions::new(today());
    for seed in 1..20u64 {
        let items = generated_items(seed, 30);
        let layout = layout_timeline(&items, &options).expect("layout");
        for (i, a) in layout.entries.iter().enumerate() {
            for b in &layout.entries[i + 1..] {
                let months = (a.start.epoch_month() - b.start.epoch_month()).abs();
                if months <= options.config.nearby_window_months {
                    assert!(
                        (a.card.x - b.card.x).abs() >= options.config.card_width,
                        "seed {seed}: {} and {} collide",
                        a.id,
                        b.id
                    );
                }
            }
        }
    }
}

#[test]
fn overlapping_jobs_get_separate_lanes_and_colors() {
    let items = vec![
        job("Job A", "2023-01", Some("2023-06")),
        job("Job B", "2023-03", Some("2023-09")),
    ];
    let layout = layout_timeline(&items, &TimelineLayoutOptions::new(today())).expect("layout");
    assert_eq!(layout.lanes, 2);
    let a = &layout.entries[0];
    let b = &layout.entries[1];
    assert_eq!((a.slot, b.slot), (0, 1));
    assert_ne!(a.color, b.color);
    assert!((a.card.x - b.card.x).abs() >= 320.0);
    assert!(b.bar.y < a.bar.y, "the later job ends higher up the axis");
}

fn bars_collide(a: &folio_layout::model::BarLayout, b: &folio_layout::model::BarLayout) -> bool {
    a.y < b.y + b.height && b.y < a.y + a.height
}

#[test]
fn bars_in_one_lane_never_overlap() {
    let options = TimelineLayoutOptions::new(today());
    for seed in 1..20u64 {
        let items = generated_items(seed, 30);
        let layout = layout_timeline(&items, &options).expect("layout");
        for (i, a) in layout.entries.iter().enumerate() {
            for b in &layout.entries[i + 1..] {
                if a.slot == b.slot {
                    assert!(
                        !bars_collide(&a.bar, &b.bar),
                        "seed {seed}: {} and {} overlap in lane {}",
                        a.id,
                        b.id,
                        a.slot
                    );
                }
            }
        }
    }
}

#[test]
fn job_starting_mid_month_after_another_ends_gets_its_own_lane() {
    let items = vec![
        job("A", "2023-01", Some("2023-06")),
        job("B", "2023-06-15", Some("2023-09")),
    ];
    let layout = layout_timeline(&items, &TimelineLayoutOptions::new(today())).expect("layout");
    let (a, b) = (&layout.entries[0], &layout.entries[1]);
    assert_eq!((a.slot, b.slot), (0, 1));
    assert!(bars_collide(&a.bar, &b.bar), "both bars cover 2023-06");
}

#[test]
fn open_ended_bars_sharing_a_lane_get_distinct_gradients() {
    // The second item starts after today, so the first no longer holds lane 0.
    let items = vec![job("Now", "2024-01", None), job("Next", "2026-01", None)];
    let layout = layout_timeline(&items, &TimelineLayoutOptions::new(today())).expect("layout");
    assert_eq!(layout.entries[0].slot, layout.entries[1].slot);

    let svg = render_timeline_svg(&layout, &SvgOptions::default());
    assert_eq!(svg.matches(r#"<linearGradient id="timeline-fade-0""#).count(), 1);
    assert_eq!(svg.matches(r#"<linearGradient id="timeline-fade-1""#).count(), 1);
    assert!(svg.contains("url(#timeline-fade-1)"));
}

#[test]
fn duplicate_items_are_laid_out_once() {
    let items = vec![
        job("Engineer", "2022-01", Some("2022-06")),
        job("Engineer", "2022-01", Some("2022-12")),
        job("Lead", "2022-03", None),
    ];
    let options = TimelineLayoutOptions::new(today());
    let layout = layout_timeline(&items, &options).expect("layout");
    let ids: Vec<&str> = layout.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["job:Engineer:2022-01", "job:Lead:2022-03"]);
    assert_eq!(layout.entries[0].end, items[0].end);
    assert_eq!(layout.lanes, 2);

    let assigned = assign(&items, &options.config, today());
    assert_eq!(assigned.len(), layout.entries.len());
    for entry in &layout.entries {
        let a = assigned
            .iter()
            .find(|(id, _)| id.to_string() == entry.id)
            .map(|(_, a)| a)
            .expect("assigned");
        assert_eq!((a.slot, &a.color), (entry.slot, &entry.color));
    }
}

#[test]
fn layout_is_idempotent() {
    let items = generated_items(7, 20);
    let options = TimelineLayoutOptions::new(today());
    let first = layout_timeline(&items, &options).expect("layout");
    let second = layout_timeline(&items, &options).expect("layout");
    assert_eq!(first, second);
}

#[test]
fn empty_input_renders_empty_state() {
    let layout = layout_timeline(&[], &TimelineLayoutOptions::new(today())).expect("layout");
    assert!(layout.is_empty());
    assert_eq!(layout.lanes, 0);
    let svg = render_timeline_svg(&layout, &SvgOptions::default());
    assert!(svg.contains("No experience to show yet."));
}

#[test]
fn invalid_config_is_rejected() {
    let options = TimelineLayoutOptions::new(today()).with_config(TimelineConfig {
        month_height: -1.0,
        ..Default::default()
    });
    assert!(layout_timeline(&[job("A", "2020-01", None)], &options).is_err());
}

#[test]
fn portfolio_fixture_lays_out_and_renders() {
    let path = workspace_root()
        .join("fixtures")
        .join("experience")
        .join("portfolio.json");
    let text = std::fs::read_to_string(&path).expect("fixture");
    let records = parse_experience_feed(&text).expect("feed");
    let ingested = ingest(&records);

    let layout = layout_timeline(&ingested.items, &TimelineLayoutOptions::new(today()))
        .expect("layout");
    assert_eq!(layout.entries.len(), 6);
    assert!(layout.lanes >= 2);

    for e in &layout.entries {
        assert!(e.bar.height > 0.0);
        assert!(e.card.y >= 0.0);
        assert!(e.connector.x2 > e.connector.x1);
        assert!(e.card.x + e.card.width <= layout.bounds.max_x + 1e-9);
        assert!(e.bar.y + e.bar.height <= layout.bounds.max_y + 1e-9);
    }
    let starts: Vec<_> = layout.entries.iter().map(|e| e.start.epoch_month()).collect();
    assert!(starts.windows(2).all(|w| w[0] <= w[1]));

    let json = serde_json::to_string(&layout).expect("serialize");
    assert!(json.contains("\"Staff Engineer\""));

    let svg = render_timeline_svg(&layout, &SvgOptions::default());
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches(r#"class="timeline-entry""#).count(), 6);
    assert!(svg.contains("2023-03 – present"));
}
