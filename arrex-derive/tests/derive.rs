use arrex::{list::TypedList, value::Value, Element};

#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, arrex_derive::Dtype)]
#[repr(C)]
#[arrex(layout = "ii")]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn derived_element_round_trips() {
    let value = Value::Tuple(vec![Value::I32(3), Value::I32(-4)]);
    let point = Point::from_value(&value).unwrap();
    assert_eq!(point.x, 3);
    assert_eq!(point.y, -4);
    assert_eq!(point.to_value(), value);
}

#[test]
fn derived_layout_matches_struct_size() {
    assert_eq!(
        arrex::layout::size_of(Point::LAYOUT).unwrap(),
        std::mem::size_of::<Point>()
    );
}

#[test]
fn register_builds_a_usable_codec() {
    let codec = Point::register().unwrap();
    let mut points = TypedList::new(codec);
    points
        .append(&Value::Tuple(vec![Value::I32(1), Value::I32(2)]))
        .unwrap();
    let unpacked = points.get(0).unwrap();
    assert_eq!(unpacked, Value::Tuple(vec![Value::I32(1), Value::I32(2)]));
}

#[test]
fn rejects_a_tuple_of_the_wrong_arity() {
    let bad = Value::Tuple(vec![Value::I32(1)]);
    assert!(Point::from_value(&bad).is_err());
}
