//! Validating converter from untrusted JSON into the topology model.
//!
//! Structural problems fail the whole conversion with the first violation
//! found. Cross references (surface ids, point keys) are not checked here;
//! geometry reconstruction skips whatever does not resolve.

use crate::error::ConversionError;
use crate::model::{Building, CoSurface, Level, Point, Space, Surface, Unit, UnitProperties};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::info;

type Result<T> = std::result::Result<T, ConversionError>;

pub fn convert(raw: &Value) -> Result<Building> {
    let root = raw.as_object().ok_or(ConversionError::NotAnObject)?;

    let raw_levels = root
        .get("levels")
        .and_then(Value::as_array)
        .ok_or(ConversionError::LevelsNotArray)?;
    let levels = raw_levels
        .iter()
        .enumerate()
        .map(|(index, level)| convert_level(index, level))
        .collect::<Result<Vec<_>>>()?;

    let raw_units = root
        .get("units")
        .and_then(Value::as_array)
        .ok_or(ConversionError::UnitsNotArray)?;
    let units = raw_units
        .iter()
        .enumerate()
        .map(|(index, unit)| convert_unit(index, unit))
        .collect::<Result<Vec<_>>>()?;

    info!(levels = levels.len(), units = units.len(), "converted graph building");
    Ok(Building { levels, units })
}

/// Parse JSON text and convert it. Syntax errors surface as `serde_json::Error`.
pub fn convert_str(text: &str) -> std::result::Result<Building, crate::error::IngestFailure> {
    let raw: Value = serde_json::from_str(text)?;
    Ok(convert(&raw)?)
}

/// A point must be a 2-element array of numbers.
pub fn validate_point(level: usize, key: &str, value: &Value) -> Result<Point> {
    let invalid = || ConversionError::InvalidPoint {
        level,
        key: key.to_string(),
        raw: value.to_string(),
    };
    match value.as_array().map(Vec::as_slice) {
        Some([x, y]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

fn convert_level(index: usize, raw: &Value) -> Result<Level> {
    let level = raw
        .as_object()
        .ok_or(ConversionError::InvalidLevel { level: index })?;

    let height = level
        .get("height")
        .and_then(Value::as_f64)
        .filter(|h| h.is_finite() && *h > 0.0)
        .ok_or(ConversionError::InvalidHeight { level: index })?;

    let points = convert_points(index, level.get("points"))?;

    let raw_surfaces = level
        .get("surfaces")
        .and_then(Value::as_array)
        .ok_or(ConversionError::SurfacesNotArray { level: index })?;
    let raw_spaces = level
        .get("spaces")
        .and_then(Value::as_array)
        .ok_or(ConversionError::SpacesNotArray { level: index })?;

    let surfaces = raw_surfaces
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let s = s
                .as_object()
                .ok_or(ConversionError::InvalidSurface { level: index, index: i })?;
            Ok(Surface {
                id: coerce_string(s.get("id")),
                point_a: coerce_string(s.get("pointA")),
                point_b: coerce_string(s.get("pointB")),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let spaces = raw_spaces
        .iter()
        .enumerate()
        .map(|(i, s)| convert_space(index, i, s))
        .collect::<Result<Vec<_>>>()?;

    Ok(Level {
        height,
        points,
        surfaces,
        spaces,
    })
}

fn convert_points(level: usize, raw: Option<&Value>) -> Result<BTreeMap<String, Point>> {
    match raw {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| Ok((key.clone(), validate_point(level, key, value)?)))
            .collect(),
        Some(_) => Err(ConversionError::InvalidPoints { level }),
    }
}

fn convert_space(level: usize, index: usize, raw: &Value) -> Result<Space> {
    let space = raw
        .as_object()
        .ok_or(ConversionError::InvalidSpace { level, index })?;

    let outer = space
        .get("outerLoop")
        .and_then(Value::as_array)
        .ok_or(ConversionError::InvalidOuterLoop { level, space: index })?;
    let outer_loop = convert_loop(outer, |k| {
        format!("levels[{level}].spaces[{index}].outerLoop[{k}]")
    })?;

    let inner_loops = match space.get("innerLoops") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(loops)) => loops
            .iter()
            .enumerate()
            .map(|(m, l)| {
                let entries = l
                    .as_array()
                    .ok_or(ConversionError::InvalidInnerLoops { level, space: index })?;
                convert_loop(entries, |k| {
                    format!("levels[{level}].spaces[{index}].innerLoops[{m}][{k}]")
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(ConversionError::InvalidInnerLoops { level, space: index }),
    };

    Ok(Space {
        id: coerce_string(space.get("id")),
        outer_loop,
        inner_loops,
    })
}

fn convert_loop(entries: &[Value], path: impl Fn(usize) -> String) -> Result<Vec<CoSurface>> {
    entries
        .iter()
        .enumerate()
        .map(|(k, entry)| {
            let entry = entry
                .as_object()
                .ok_or_else(|| ConversionError::InvalidLoopEntry { path: path(k) })?;
            Ok(convert_co_surface(entry))
        })
        .collect()
}

fn convert_co_surface(entry: &Map<String, Value>) -> CoSurface {
    let partner = entry.get("partnerId");
    CoSurface {
        id: coerce_string(entry.get("id")),
        partner_id: truthy(partner).then(|| coerce_string(partner)),
        surface_id: coerce_string(entry.get("surfaceId")),
        direction_a_to_b: truthy(entry.get("directionAToB")),
    }
}

fn convert_unit(index: usize, raw: &Value) -> Result<Unit> {
    let unit = raw
        .as_object()
        .ok_or(ConversionError::InvalidUnit { unit: index })?;

    let space_ids = unit
        .get("spaceIds")
        .and_then(Value::as_array)
        .ok_or(ConversionError::InvalidSpaceIds { unit: index })?
        .iter()
        .map(|id| coerce_string(Some(id)))
        .collect();

    let properties = unit
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(ConversionError::MissingProperties { unit: index })?;

    Ok(Unit {
        id: coerce_string(unit.get("id")),
        space_ids,
        properties: UnitProperties {
            function: coerce_string(properties.get("function")),
            program: coerce_string(properties.get("program")),
        },
    })
}

/// JavaScript `Number#toString`: plain decimals inside `[1e-6, 1e21)`,
/// exponent form with an explicit sign outside it.
fn format_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&f.abs()) {
        return f.to_string();
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// String coercion in the manner of JavaScript `String(x)`, except that
/// absent and `null` values become the empty string.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// JavaScript truthiness. Absent counts as falsy.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
