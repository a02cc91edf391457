use std::path::Path;
use std::time::{Duration, Instant};

use hatvp_dataviz::data::aggregate::{self, AgeBands};
use hatvp_dataviz::data::loader::load_file;
use hatvp_dataviz::data::sample::{self, DEFAULT_SEED};
use hatvp_dataviz::data::task::{LoadPoll, LoadTask};
use hatvp_dataviz::data::{LoadError, Row, TopN};
use hatvp_dataviz::views::diverging::diverging_bars;
use hatvp_dataviz::views::{ViewKind, ViewParams};

fn write_resource(dir: &Path, view: ViewKind, body: &str) {
    std::fs::write(dir.join(view.resource()), body).unwrap();
}

fn labels<'a>(rows: &[&'a Row], field: &str) -> Vec<&'a str> {
    rows.iter().map(|r| r.text(field)).collect()
}

#[test]
fn organization_view_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        ViewKind::OrganizationMentions,
        "organization,mentions\nA,5\nB,0\nC,12\n",
    );

    let view = ViewKind::OrganizationMentions;
    let ds = load_file(&dir.path().join(view.resource()), &view.schema()).unwrap();
    let params = ViewParams {
        search: String::new(),
        top_n: TopN::new(2),
    };
    let out = view.derive(&ds, &params).unwrap();

    assert_eq!(labels(&out, "organization"), ["C", "A"]);
    assert_eq!(out[0].number("mentions"), 12.0);
    assert_eq!(out[1].number("mentions"), 5.0);
    assert_eq!(ds.len(), 3);
}

#[test]
fn pyramid_view_orders_oldest_first_and_diverges() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        ViewKind::AgePyramid,
        "age_band,male,female\n20-29,-24,14\n60-69,398,149\n40-49,-248.0,123.0\n",
    );

    let view = ViewKind::AgePyramid;
    let ds = load_file(&dir.path().join(view.resource()), &view.schema()).unwrap();
    let out = view.derive(&ds, &ViewParams::default()).unwrap();
    assert_eq!(labels(&out, "age_band"), ["60-69", "40-49", "20-29"]);

    let bars = diverging_bars(&out, "age_band", "male", "female");
    assert!(bars.iter().all(|b| b.left <= 0.0 && b.right >= 0.0));
    assert_eq!(bars[0].left, -398.0);
}

#[test]
fn generated_summaries_load_back_through_their_views() {
    let dir = tempfile::tempdir().unwrap();
    let people: Vec<Row> = [(25.0, "female"), (44.0, "male"), (47.0, "male"), (63.0, "female")]
        .into_iter()
        .map(|(age, gender)| Row::new().with("age", age).with("gender", gender))
        .collect();
    let people: Vec<&Row> = people.iter().collect();
    let bands = AgeBands::default();

    for dataset in [
        aggregate::age_band_counts(&people, "age", &bands),
        aggregate::age_pyramid(&people, "age", "gender", &bands),
        aggregate::gender_counts(&people, "gender"),
    ] {
        let file = std::fs::File::create(dir.path().join(dataset.name())).unwrap();
        aggregate::write_csv(&dataset, file).unwrap();
    }

    let view = ViewKind::AgePyramid;
    let ds = load_file(&dir.path().join(view.resource()), &view.schema()).unwrap();
    let forties = ds.rows().iter().find(|r| r.text("age_band") == "40-49").unwrap();
    assert_eq!(forties.number("male"), -2.0);
    assert_eq!(forties.number("female"), 0.0);

    let view = ViewKind::GenderDistribution;
    let ds = load_file(&dir.path().join(view.resource()), &view.schema()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.rows().iter().map(|r| r.number("count")).sum::<f64>(), 4.0);
}

#[test]
fn background_load_reports_missing_resource() {
    let dir = tempfile::tempdir().unwrap();
    let view = ViewKind::MandateDelay;
    let mut task = LoadTask::spawn(dir.path().join(view.resource()), view.schema());

    let deadline = Instant::now() + Duration::from_secs(5);
    let outcome = loop {
        match task.poll() {
            LoadPoll::Pending if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(5))
            }
            other => break other,
        }
    };
    assert!(matches!(outcome, LoadPoll::Ready(Err(LoadError::Io { .. }))));
}

#[test]
fn bundled_data_matches_view_schemas() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    for view in ViewKind::ALL {
        let ds = load_file(&data_dir.join(view.resource()), &view.schema())
            .unwrap_or_else(|e| panic!("{view:?}: {e}"));
        assert!(!ds.is_empty(), "{view:?}");
        view.derive(&ds, &ViewParams::default())
            .unwrap_or_else(|e| panic!("{view:?}: {e}"));
    }
}

#[test]
fn bundled_data_is_what_the_generator_writes() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let generated = sample::generate(DEFAULT_SEED);
    assert_eq!(generated.len(), ViewKind::ALL.len());

    for dataset in generated {
        let mut written = Vec::new();
        aggregate::write_csv(&dataset, &mut written).unwrap();
        let bundled = std::fs::read(data_dir.join(dataset.name()))
            .unwrap_or_else(|e| panic!("{}: {e}", dataset.name()));
        assert_eq!(
            String::from_utf8_lossy(&written),
            String::from_utf8_lossy(&bundled),
            "{} is stale; rerun `cargo run --bin generate_sample`",
            dataset.name()
        );
        assert_eq!(written, bundled, "{}", dataset.name());
    }
}
