// Missing the required `#[arrex(layout = "...")]` attribute.
#[derive(arrex_derive::Dtype)]
struct Point {
    x: i32,
    y: i32,
}

fn main() {}
