//! Validating parse of the grid server response.
//!
//! The server contract is informal, so the body is first decoded into a JSON value and then
//! walked field by field. The first missing or mistyped field aborts the parse with
//! [`Error::SchemaMismatch`] naming its JSON path; unknown fields are ignored.

use crate::model::{ControlPoint, Grid, Mesh, Neighborhood, Point, Segment};
use crate::{Error, Result};
use serde_json::{Map, Value};

pub fn parse_grid(text: &str) -> Result<Grid> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidJson {
        message: e.to_string(),
    })?;
    parse_grid_value(&value)
}

pub fn parse_grid_value(value: &Value) -> Result<Grid> {
    let root = as_object(value, "$")?;

    let nx = count_field(root, "nx", "nx")?;
    let ny = count_field(root, "ny", "ny")?;
    let dx = number_field(root, "dx", "dx")?;
    let dy = number_field(root, "dy", "dy")?;

    let mesh = as_object(field(root, "mesh", "mesh")?, "mesh")?;
    let raw_segments = field(mesh, "segments", "mesh.segments")?
        .as_array()
        .ok_or_else(|| Error::schema("mesh.segments", "an array of segments"))?;

    let mut segments = Vec::with_capacity(raw_segments.len());
    for (idx, raw) in raw_segments.iter().enumerate() {
        segments.push(segment(raw, &format!("mesh.segments[{idx}]"))?);
    }

    let u_neighborhoods = match root.get("u_neighborhoods") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, raw) in items.iter().enumerate() {
                out.push(neighborhood(raw, &format!("u_neighborhoods[{idx}]"))?);
            }
            out
        }
        Some(_) => {
            return Err(Error::schema(
                "u_neighborhoods",
                "an array of neighborhoods",
            ));
        }
    };

    Ok(Grid {
        nx,
        ny,
        dx,
        dy,
        mesh: Mesh { segments },
        u_neighborhoods,
    })
}

fn segment(value: &Value, path: &str) -> Result<Segment> {
    let obj = as_object(value, path)?;
    let a = point(field(obj, "a", &format!("{path}.a"))?, &format!("{path}.a"))?;
    let b = match obj.get("b") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(point(raw, &format!("{path}.b"))?),
    };
    Ok(Segment { a, b })
}

fn point(value: &Value, path: &str) -> Result<Point> {
    let obj = as_object(value, path)?;
    Ok(Point {
        x: number_field(obj, "x", &format!("{path}.x"))?,
        y: number_field(obj, "y", &format!("{path}.y"))?,
    })
}

fn neighborhood(value: &Value, path: &str) -> Result<Neighborhood> {
    let obj = as_object(value, path)?;
    let volume = number_field(obj, "volume", &format!("{path}.volume"))?;

    let p_path = format!("{path}.p");
    let p = as_object(field(obj, "p", &p_path)?, &p_path)?;
    let phi = match p.get("phi") {
        None | Some(Value::Null) => 0.0,
        Some(_) => number_field(p, "phi", &format!("{p_path}.phi"))?,
    };
    let variable = match p.get("variable") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(Error::schema(format!("{p_path}.variable"), "a string")),
    };

    Ok(Neighborhood {
        volume,
        p: ControlPoint {
            x: number_field(p, "x", &format!("{p_path}.x"))?,
            y: number_field(p, "y", &format!("{p_path}.y"))?,
            phi,
            variable,
        },
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::schema(path, "an object"))
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(Error::schema(path, "a value (field is missing)")),
        Some(v) => Ok(v),
    }
}

fn number_field(obj: &Map<String, Value>, key: &str, path: &str) -> Result<f64> {
    field(obj, key, path)?
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::schema(path, "a finite number"))
}

fn count_field(obj: &Map<String, Value>, key: &str, path: &str) -> Result<u32> {
    let raw = field(obj, key, path)?;
    if let Some(n) = raw.as_u64() {
        return u32::try_from(n).map_err(|_| Error::schema(path, "a non-negative integer"));
    }
    // Integral floats such as `10.0` are accepted.
    match raw.as_f64() {
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(Error::schema(path, "a non-negative integer")),
    }
}
