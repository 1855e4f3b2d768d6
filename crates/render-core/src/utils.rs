/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Formats a coordinate the way content streams expect: at most three
/// decimals, no trailing zeros.
pub fn fmt_pt(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}
