//! A minimal demonstration of a host-defined packed type living in a
//! `TypedList` next to the built-in numeric dtypes.

use arrex::list::TypedList;
use arrex::value::Value;
use arrex::Element;

#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, arrex_derive::Dtype)]
#[repr(C)]
#[arrex(layout = "hh")]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

/// Builds a list of `Point`s and a parallel list of plain `i64` weights,
/// showing the registry-backed host type and a built-in numeric dtype
/// coexisting in the same program.
pub fn example() -> arrex::Result<(TypedList, TypedList)> {
    arrex::numbers::install();
    let point_codec = Point::register()?;
    let mut points = TypedList::new(point_codec);
    for (x, y) in [(0, 0), (1, 1), (2, 4), (3, 9)] {
        points.append(&Point { x, y }.to_value())?;
    }

    let weight_codec =
        arrex::registry::declared(&arrex::registry::DtypeKey::Layout("l".into()))?;
    let weights = TypedList::from_iterable(
        (0..points.len() as i64).map(Value::I64),
        Some(weight_codec),
    )?;

    Ok((points, weights))
}
