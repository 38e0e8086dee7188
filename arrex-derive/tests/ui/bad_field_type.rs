// `Dtype` only supports plain integer/float fields, not a `String`.
#[derive(arrex_derive::Dtype)]
#[arrex(layout = "ib")]
struct Label {
    id: i32,
    name: String,
}

fn main() {}
