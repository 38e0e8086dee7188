//! Compile-time diagnostics from `#[derive(Dtype)]` itself, exercised via
//! `trybuild` rather than a unit test against an inner function: the macro
//! now reports errors through `syn::Error::to_compile_error()`, so there is
//! no plain function left to call directly and assert on.

#[test]
fn rejects_malformed_input() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/*.rs");
}
