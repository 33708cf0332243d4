/// Shade ramp from darkest to brightest.
const SHADES: &[u8] = b" .:-=+*#%@";

/// Renders intensities in `[0, 1]` as rows of `width` shade characters.
///
/// Values outside the range are clamped. A trailing partial row is kept.
pub fn render_ascii(pixels: &[f64], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let top = (SHADES.len() - 1) as f64;
    pixels
        .chunks(width)
        .map(|row| {
            row.iter()
                .map(|&v| {
                    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
                    SHADES[(v * top).round() as usize] as char
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Side length for a square image of `len` pixels, if `len` is a perfect
/// square.
pub fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}
