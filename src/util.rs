use crate::chart::normalize_score;

/// Compact count with a metric suffix, e.g. `12.3K`.
pub fn format_compact(value: f64) -> String {
    const UNITS: [&str; 4] = ["", "K", "M", "B"];

    if !value.is_finite() {
        return "0".to_owned();
    }

    // Step up while the printed value would round to 1000 (`999.95K` -> `1.0M`).
    let rolls_over = |scaled: f64, unit: usize| {
        let limit = if unit == 0 { 999.5 } else { 999.95 };
        scaled >= limit
    };

    let mut scaled = value.abs();
    let mut unit = 0usize;
    while rolls_over(scaled, unit) && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if unit == 0 {
        format!("{sign}{scaled:.0}")
    } else {
        format!("{sign}{scaled:.1}{}", UNITS[unit])
    }
}

/// Scores and coverage arrive either as fractions or percentages.
pub fn format_percent(raw: f64) -> String {
    format!("{:.0}%", normalize_score(raw) * 100.0)
}

pub fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }

    let kept: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
