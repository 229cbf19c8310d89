use crate::*;
use serde_json::json;

const PARABOLA: &str = include_str!("../../../../fixtures/grid/parabola.json");
const EMPTY_MESH: &str = include_str!("../../../../fixtures/grid/empty_mesh.json");
const MISSING_MESH: &str = include_str!("../../../../fixtures/grid/missing_mesh.json");

fn schema_path(err: Error) -> String {
    match err {
        Error::SchemaMismatch { path, .. } => path,
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn parse_grid_reads_dimensions_segments_and_neighborhoods() {
    let grid = parse_grid(PARABOLA).unwrap();
    assert_eq!(grid.nx, 10);
    assert_eq!(grid.ny, 10);
    assert_eq!(grid.dx, 1.2);
    assert_eq!(grid.dy, 1.2);
    assert_eq!(grid.segments().len(), 11);
    assert_eq!(grid.segments()[0].a, Point::new(0.0, 12.0));
    assert_eq!(grid.segments()[0].b, Some(Point::new(1.2, 7.68)));
    assert_eq!(grid.u_neighborhoods.len(), 2);
    assert_eq!(grid.u_neighborhoods[0].p.variable, "u_3_4");
    assert!(grid.u_neighborhoods[1].p.is_boundary());
}

#[test]
fn parse_grid_accepts_empty_segment_list() {
    let grid = parse_grid(EMPTY_MESH).unwrap();
    assert!(grid.segments().is_empty());
    assert!(grid.u_neighborhoods.is_empty());
}

#[test]
fn parse_grid_reports_missing_mesh() {
    let err = parse_grid(MISSING_MESH).unwrap_err();
    assert!(err.is_schema_mismatch());
    assert_eq!(schema_path(err), "mesh");
}

#[test]
fn parse_grid_reports_each_missing_dimension() {
    for key in ["nx", "ny", "dx", "dy"] {
        let mut value = json!({
            "nx": 4, "ny": 4, "dx": 1.0, "dy": 1.0,
            "mesh": { "segments": [] }
        });
        value.as_object_mut().unwrap().remove(key);
        let err = parse_grid_value(&value).unwrap_err();
        assert_eq!(schema_path(err), key);
    }
}

#[test]
fn parse_grid_names_the_offending_segment_coordinate() {
    let value = json!({
        "nx": 4, "ny": 4, "dx": 1.0, "dy": 1.0,
        "mesh": { "segments": [
            { "a": { "x": 0.0, "y": 0.0 } },
            { "a": { "x": 1.0, "y": "north" } }
        ] }
    });
    let err = parse_grid_value(&value).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Schema mismatch at `mesh.segments[1].a.y`: expected a finite number"
    );
}

#[test]
fn parse_grid_rejects_segments_that_are_not_an_array() {
    let value = json!({
        "nx": 4, "ny": 4, "dx": 1.0, "dy": 1.0,
        "mesh": { "segments": { "a": { "x": 0.0, "y": 0.0 } } }
    });
    assert_eq!(schema_path(parse_grid_value(&value).unwrap_err()), "mesh.segments");
}

#[test]
fn parse_grid_rejects_negative_and_fractional_counts() {
    for nx in [json!(-1), json!(2.5), json!("10")] {
        let value = json!({
            "nx": nx, "ny": 4, "dx": 1.0, "dy": 1.0,
            "mesh": { "segments": [] }
        });
        assert_eq!(schema_path(parse_grid_value(&value).unwrap_err()), "nx");
    }
}

#[test]
fn parse_grid_accepts_integral_float_counts() {
    let value = json!({
        "nx": 10.0, "ny": 3, "dx": 1, "dy": 0.5,
        "mesh": { "segments": [] }
    });
    let grid = parse_grid_value(&value).unwrap();
    assert_eq!((grid.nx, grid.ny, grid.dx, grid.dy), (10, 3, 1.0, 0.5));
}

#[test]
fn parse_grid_rejects_non_json_body() {
    let err = parse_grid("<html>opaque</html>").unwrap_err();
    assert!(matches!(err, Error::InvalidJson { .. }));
}

#[test]
fn parse_grid_rejects_non_object_root() {
    let err = parse_grid("[1, 2, 3]").unwrap_err();
    assert_eq!(schema_path(err), "$");
}

#[test]
fn parse_grid_validates_neighborhood_control_point() {
    let value = json!({
        "nx": 4, "ny": 4, "dx": 1.0, "dy": 1.0,
        "mesh": { "segments": [] },
        "u_neighborhoods": [ { "volume": 1.0, "p": { "x": 1.0 } } ]
    });
    assert_eq!(
        schema_path(parse_grid_value(&value).unwrap_err()),
        "u_neighborhoods[0].p.y"
    );
}

#[test]
fn grid_extent_pads_by_cells() {
    let grid = Grid::new(10, 8, 1.0, 0.5, Vec::new());
    assert_eq!(grid.x_extent(2.0), (-2.0, 12.0));
    assert_eq!(grid.y_extent(2.0), (-1.0, 9.0));
    assert_eq!(grid.x_extent(0.0), (0.0, 10.0));
}

#[test]
fn grid_serializes_without_empty_neighborhoods() {
    let grid = Grid::new(
        2,
        2,
        1.0,
        1.0,
        vec![Segment::starting_at(Point::new(0.5, 0.5))],
    );
    assert_eq!(
        serde_json::to_value(&grid).unwrap(),
        json!({
            "nx": 2, "ny": 2, "dx": 1.0, "dy": 1.0,
            "mesh": { "segments": [ { "a": { "x": 0.5, "y": 0.5 } } ] }
        })
    );
}
