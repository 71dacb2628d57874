/// Formats a number the way JavaScript's `Number#toString()` does (`0.4` -> `"0.4"`, `3.0` ->
/// `"3"`).
///
/// Labels derived from numbers (tick values, branch probabilities) use this so configurations
/// written for browsers render the same text.
pub fn js_number(v: f64) -> String {
    let mut buf = ryu_js::Buffer::new();
    buf.format(v).to_string()
}
