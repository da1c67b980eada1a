use std::fs;

use wayfind_core::{NavError, SolverConfig, SpaceConfig, Vec2};

#[test]
fn defaults_are_valid() {
    let config = SolverConfig::default();
    assert_eq!(config.resolution, 10.0);
    assert_eq!(config.discount, 0.99);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("solver.yaml");
    fs::write(&path, "resolution: 5.0\ndiscount: 0.95\nmax_iterations: 50\n").expect("write");

    let config = SolverConfig::load(&path).expect("load");
    assert_eq!(config.resolution, 5.0);
    assert_eq!(config.discount, 0.95);
    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.step_cost, SolverConfig::default().step_cost);
    assert_eq!(config.snap_radius, SolverConfig::default().snap_radius);
}

#[test]
fn out_of_range_values_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("solver.yaml");
    fs::write(&path, "discount: 1.0\n").expect("write");
    assert!(SolverConfig::load(&path).is_err());

    let bad_resolution = SolverConfig::default().with_resolution(0.0);
    assert!(matches!(
        bad_resolution.validate(),
        Err(NavError::InvalidConfig(_))
    ));

    let nan_epsilon = SolverConfig {
        epsilon: f32::NAN,
        ..SolverConfig::default()
    };
    assert!(nan_epsilon.validate().is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = SolverConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read solver config"));
}

const SPACE_YAML: &str = r#"
image_width: 100.0
image_height: 20.0
corridors:
  - id: hall
    floor: 0
    kind: lobby
    polygon:
      - { x: 0.0, y: 0.0 }
      - { x: 100.0, y: 0.0 }
      - { x: 100.0, y: 20.0 }
      - { x: 0.0, y: 20.0 }
destinations:
  - id: exit
    name: Main exit
    floor: 0
    x: 90.0
    y: 10.0
"#;

#[test]
fn space_loads_from_yaml_and_json() {
    let dir = tempfile::tempdir().expect("tempdir");

    let yaml_path = dir.path().join("space.yaml");
    fs::write(&yaml_path, SPACE_YAML).expect("write");
    let from_yaml = SpaceConfig::load(&yaml_path).expect("yaml");

    assert_eq!(from_yaml.corridors.len(), 1);
    assert_eq!(from_yaml.corridors[0].kind, "lobby");
    assert_eq!(from_yaml.corridors[0].polygon[2], Vec2::new(100.0, 20.0));
    assert_eq!(
        from_yaml.destination("exit").map(|d| d.name.as_str()),
        Some("Main exit")
    );
    assert_eq!(from_yaml.floors(), vec![0]);

    let json_path = dir.path().join("space.json");
    fs::write(
        &json_path,
        serde_json::to_string(&from_yaml).expect("serialize"),
    )
    .expect("write");
    let from_json = SpaceConfig::load(&json_path).expect("json");
    assert_eq!(from_json, from_yaml);
}

#[test]
fn corridor_kind_defaults_when_omitted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("space.json");
    fs::write(
        &path,
        r#"{"image_width": 10.0, "image_height": 10.0,
            "corridors": [{"id": "c", "floor": 2, "polygon": []}]}"#,
    )
    .expect("write");

    let space = SpaceConfig::load(&path).expect("json");
    assert_eq!(space.corridors[0].kind, "corridor");
    assert!(space.destinations.is_empty());
}
