use super::*;

use kapper_cluster::{diff_layers, ClusterSplitter, MarkerLayer, ZoomThresholdTable};
use kapper_core::{Coordinate, Point};

#[test]
fn parses_markers_command() {
    let cli = Cli::try_parse_from(["kapper-cli", "markers", "--zoom", "10.5"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Markers {
            zoom,
            name: None,
            price_range: None,
            json: false,
        }) => assert!((zoom - 10.5).abs() < f64::EPSILON),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_markers_filters_and_json() {
    let cli = Cli::try_parse_from([
        "kapper-cli",
        "markers",
        "--zoom",
        "12",
        "--name",
        "fade",
        "--price-range",
        "€€",
        "--json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Markers {
            name: Some(ref n),
            price_range: Some(ref p),
            json: true,
            ..
        }) if n == "fade" && p == "€€"
    ));
}

#[test]
fn markers_requires_zoom() {
    assert!(Cli::try_parse_from(["kapper-cli", "markers"]).is_err());
}

#[test]
fn nearest_accepts_negative_longitude() {
    let cli = Cli::try_parse_from(["kapper-cli", "nearest", "--lat", "40.4", "--lng", "-3.7"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Nearest { lat, lng }) => {
            assert!((lat - 40.4).abs() < f64::EPSILON);
            assert!((lng + 3.7).abs() < f64::EPSILON);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_transition_command() {
    let cli = Cli::try_parse_from(["kapper-cli", "transition", "--from", "10", "--to", "13"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Transition { json: false, .. })
    ));
}

#[test]
fn providers_flag_is_global() {
    let cli = Cli::try_parse_from([
        "kapper-cli",
        "validate",
        "--providers",
        "/tmp/barbers.json",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.providers, PathBuf::from("/tmp/barbers.json"));
    assert!(matches!(cli.command, Some(Commands::Validate)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["kapper-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn zoom_table_subcommand_parses() {
    let cli = Cli::try_parse_from(["kapper-cli", "zoom-table", "--zoom-table", "bands.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::ZoomTable)));
    assert_eq!(cli.zoom_table, Some(PathBuf::from("bands.yaml")));
}

#[test]
fn format_zoom_table_lists_every_band() {
    let text = commands::format_zoom_table(
        &ZoomThresholdTable::default(),
        &ClusterSplitter::default(),
    );
    assert!(text.starts_with("zoom < 7: single cluster\n"));
    assert!(text.contains("radius 0.15"));
    assert!(text.contains("zoom >= 14: individual markers"));
    assert!(text.contains("clusters of <= 2 explode from zoom 12"));
    assert_eq!(text.lines().count(), 10);
}

#[test]
fn format_nearest_handles_empty_set() {
    assert_eq!(
        commands::format_nearest(None),
        "nearest: no providers with coordinates"
    );
}

#[test]
fn format_nearest_reports_rounded_meters() {
    let points = vec![
        Point::new("ams", "Studio Sharp", Coordinate::new(52.37, 4.90)),
        Point::new("rtm", "Kapper Noord", Coordinate::new(51.92, 4.48)),
    ];
    let hit = kapper_cluster::nearest(Coordinate::new(52.37, 4.91), &points);
    let text = commands::format_nearest(hit);
    assert!(text.starts_with("nearest: Studio Sharp (ams) at "));
    assert!(text.ends_with(" m"));
}

#[test]
fn format_markers_and_transition_describe_split() {
    let points = vec![
        Point::new("ams-1", "Studio Sharp", Coordinate::new(52.3676, 4.9041)),
        Point::new("ams-2", "Fade Factory", Coordinate::new(52.3680, 4.9050)),
    ];
    let layer = MarkerLayer::default();
    let at_ten = layer.render(&points, 10.0);
    let at_thirteen = layer.render(&points, 13.0);

    let text = commands::format_markers(&at_ten, 10.0, "city level", 2);
    assert!(text.starts_with("zoom 10 (city level): 2 providers -> 1 markers\n"));
    assert!(text.contains("count=2 [ams-1, ams-2]"));

    let diff = diff_layers(&at_ten, &at_thirteen);
    let text = commands::format_transition(&diff, 10.0, 13.0);
    assert!(text.starts_with("zoom 10 -> 13: +2 -1 =0\n"));
    assert!(text.contains("  - cluster [ams-1, ams-2]"));
    assert!(text.contains("  + point ams-1"));
    assert!(text.contains("  + point ams-2"));
}

fn write_providers(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("kapper-cli-{}-{name}.yaml", std::process::id()));
    std::fs::write(&path, content).expect("write providers file");
    path
}

#[test]
fn validate_fails_on_malformed_providers_file() {
    let path = write_providers("malformed", "providers: [ {id: ");
    let ctx = commands::Context::load(&path, None).expect("context without zoom table");

    let err = commands::validate(&ctx).expect_err("malformed file must fail");
    assert!(format!("{err:#}").contains("loading providers"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn validate_fails_on_missing_providers_file() {
    let path = std::env::temp_dir().join("kapper-cli-does-not-exist.yaml");
    let ctx = commands::Context::load(&path, None).expect("context without zoom table");
    assert!(commands::validate(&ctx).is_err());
}

#[test]
fn validate_accepts_file_with_skipped_records() {
    let path = write_providers(
        "skipped",
        "providers:\n  - id: ams\n    name: Studio Sharp\n    latitude: 52.37\n    longitude: 4.90\n  - id: ghost\n    name: No Coordinates\n",
    );
    let ctx = commands::Context::load(&path, None).expect("context without zoom table");

    assert!(commands::validate(&ctx).is_ok());

    std::fs::remove_file(&path).ok();
}
