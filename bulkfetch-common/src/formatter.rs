//! String and number formatting used for progress labels and result printing.
use std::fmt::Display;

const SIZE_UNITS: [&str; 11] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y", "R", "Q"];
const NUM_UNITS: [&str; 11] = ["", "K", "M", "B", "T", "Q", "Qu", "S", "Sp", "O", "N"];

/// Shortens `text` to at most `max_len` characters, marking the cut with `affix`.
///
/// With `front` set the beginning of the string is kept (`affix` goes at the end), otherwise
/// the end is kept, which suits file paths where the name matters most.
///
/// ```
/// use bulkfetch_common::formatter::trunc_str;
///
/// assert_eq!(trunc_str("downloads/some_long_name.bin", 12, false, "..."), "..._name.bin");
/// assert_eq!(trunc_str("short", 12, false, "..."), "short");
/// ```
pub fn trunc_str(text: &str, max_len: usize, front: bool, affix: &str) -> String {
    let len = text.chars().count();
    if len <= max_len {
        return text.to_string();
    }

    let affix_len = affix.chars().count();
    if max_len <= affix_len {
        return if front {
            text.chars().take(max_len).collect()
        } else {
            text.chars().skip(len - max_len).collect()
        };
    }

    let keep = max_len - affix_len;
    if front {
        let head: String = text.chars().take(keep).collect();
        format!("{head}{affix}")
    } else {
        let tail: String = text.chars().skip(len - keep).collect();
        format!("{affix}{tail}")
    }
}

/// Scales a byte count down by 1024 until it is below 1024.
///
/// Returns the scaled value and its unit, e.g. `(1.2384, "MB")` for `1_298_562`.
pub fn convert_size(size: u64) -> (f64, String) {
    let (value, unit) = scale(size as f64, 1024.0, &SIZE_UNITS);
    (value, format!("{unit}B"))
}

/// Scales a number down by 1000 until its magnitude is below 1000.
///
/// `convert_num(1_234_567.0)` gives `(1.234567, "M")`.
pub fn convert_num(num: f64) -> (f64, &'static str) {
    scale(num, 1000.0, &NUM_UNITS)
}

fn scale(mut value: f64, div: f64, units: &[&'static str]) -> (f64, &'static str) {
    let mut idx = 0;
    while value.abs() >= div && idx < units.len() - 1 {
        value /= div;
        idx += 1;
    }
    (value, units[idx])
}

/// Joins the items with `sep` and appends `end`.
pub fn arr2str<T: Display>(items: &[T], sep: &str, end: &str) -> String {
    let joined = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep);
    format!("{joined}{end}")
}
