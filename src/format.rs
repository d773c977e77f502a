// 🖨️ Display Formatting - rupiah, kilograms, Indonesian dates
//
// Output matches what the id-ID locale produces for the same values:
// "Rp 37.500", "2.5 kg", "01 Jan", "17 Agustus 2024".

use chrono::{DateTime, Datelike, FixedOffset, Utc};

const MONTHS_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agt", "Sep", "Okt", "Nov", "Des",
];

// ============================================================================
// NUMBERS
// ============================================================================

/// Rupiah with zero decimals and `.` as thousands separator
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }

    let rounded = amount.round();
    let grouped = group_thousands(&format!("{:.0}", rounded.abs()));

    if rounded < 0.0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Like `format_currency`, but an absent amount renders as "-"
pub fn format_optional_currency(amount: Option<f64>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "-".to_string())
}

/// Kilograms to one decimal, dropped when the rounded value is integral
pub fn format_weight(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} kg", rounded)
    } else {
        format!("{:.1} kg", rounded)
    }
}

/// Insert `.` every three digits of an unsigned decimal string
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// DATES
// ============================================================================

/// "dd MMM" label, e.g. "01 Jan". No year.
pub fn format_day_month(at: &DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!("{:02} {}", local.day(), MONTHS_SHORT[local.month0() as usize])
}

/// "dd MMMM yyyy" label, e.g. "17 Agustus 2024"
pub fn format_long_date(at: &DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!(
        "{:02} {} {}",
        local.day(),
        MONTHS_LONG[local.month0() as usize],
        local.year()
    )
}

// ============================================================================
// TESTS
// ============================================================================
