/// Format a USD amount for display: two decimals, thousands separators,
/// minus sign ahead of the dollar sign.
///
/// The calculation engine performs no rounding; display precision is decided
/// here at the presentation edge.
pub fn format_usd(value: f64) -> String {
    let magnitude = grouped_two_decimals(value.abs());
    if value < 0.0 {
        format!("-${}", magnitude)
    } else {
        format!("${}", magnitude)
    }
}

/// Format a profit figure with an explicit sign, so gains and losses read
/// unambiguously next to each other.
pub fn format_usd_signed(value: f64) -> String {
    if value < 0.0 {
        format_usd(value)
    } else {
        format!("+{}", format_usd(value))
    }
}

fn grouped_two_decimals(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let mut parts = formatted.splitn(2, '.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next().unwrap_or("00");

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}.{}", grouped, frac_part)
}
