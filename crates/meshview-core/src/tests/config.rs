use crate::*;
use serde_json::json;

#[test]
fn default_config_matches_the_page_setup() {
    let cfg = MeshViewConfig::default();
    assert_eq!(cfg.endpoint, "http://localhost:8080");
    assert_eq!(cfg.request_mode, RequestMode::NoCors);
    assert_eq!(cfg.timeout_ms, None);
    assert_eq!(cfg.style.class, "mesh");
    assert_eq!(cfg.style.stroke, "steelblue");
    assert_eq!(cfg.style.stroke_width, 1.5);
    assert_eq!(cfg.style.fill, "none");
    assert_eq!(cfg.curve, "linearClosed");
    assert_eq!(cfg.padding_cells, 2.0);
    cfg.validate().unwrap();
}

#[test]
fn overrides_merge_onto_defaults() {
    let cfg = MeshViewConfig::from_overrides(&json!({
        "style": { "stroke": "crimson" },
        "canvas": { "width": 960 },
        "requestMode": "cors"
    }))
    .unwrap();
    assert_eq!(cfg.style.stroke, "crimson");
    assert_eq!(cfg.style.stroke_width, 1.5);
    assert_eq!(cfg.canvas.width, 960.0);
    assert_eq!(cfg.canvas.height, 600.0);
    assert_eq!(cfg.request_mode, RequestMode::Cors);
}

#[test]
fn yaml_config_is_accepted() {
    let cfg = MeshViewConfig::from_yaml_str(
        "endpoint: http://127.0.0.1:9000/grid\ntimeoutMs: 250\nincludeLattice: true\n",
    )
    .unwrap();
    assert_eq!(cfg.endpoint_url().unwrap().port(), Some(9000));
    assert_eq!(cfg.timeout_ms, Some(250));
    assert!(cfg.include_lattice);
}

#[test]
fn config_rejects_bad_endpoint_and_canvas() {
    let err = MeshViewConfig::from_json_str(r#"{"endpoint": "ftp://localhost"}"#).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));

    let err = MeshViewConfig::from_json_str(r#"{"canvas": {"height": 0}}"#).unwrap_err();
    assert!(err.to_string().contains("canvas size"));

    let err = MeshViewConfig::from_json_str("[]").unwrap_err();
    assert!(err.to_string().contains("must be an object"));
}
