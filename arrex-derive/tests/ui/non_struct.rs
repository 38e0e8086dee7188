// `Dtype` only derives for structs with named fields, not enums.
#[derive(arrex_derive::Dtype)]
#[arrex(layout = "i")]
enum Direction {
    Up,
    Down,
}

fn main() {}
