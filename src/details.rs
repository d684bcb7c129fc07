// src/details.rs

use std::collections::HashMap;
use tracing::warn;
//
use crate::supplier::DetailValue;

/// Detail keys that are displayed, in display order.
pub const DETAIL_FIELDS: [&str; 6] = [
    "Buyer name",
    "Contract value",
    "Contract start",
    "Contract end",
    "Reported spend",
    "Suggested email",
];

/// Keys whose values are money and are shown in pounds sterling.
pub const CURRENCY_FIELDS: [&str; 2] = ["Contract value", "Reported spend"];

pub const BUYER_FIELD: &str = "Buyer name";

/// Substituted into the draft email when a supplier has no buyer recorded.
pub const MISSING_BUYER: &str = "[Buyer name]";

const SIGN_OFF: &str = "Crown Commercial Service";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

/// Everything the details panel shows for one supplier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailsView {
    pub name: String,
    pub rows: Vec<DetailRow>,
    pub draft_email: String,
}

pub fn label_for(key: &str) -> &str {
    match key {
        "Suggested email" => "Email Address",
        other => other,
    }
}

/// Formats an amount the way `en-GB` formats GBP: `£1,234.50`, `-£12.00`.
///
/// Rounding works on the shortest decimal form of `value`, half away from
/// zero, so `1.005` is `£1.01`. Negative zero keeps its sign.
pub fn format_gbp(value: f64) -> String {
    if value.is_nan() {
        return "£NaN".to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{}£∞", sign);
    }

    let (pounds, pence) = round_to_pence(&value.abs().to_string());
    format!("{}£{}.{}", sign, group_thousands(&pounds), pence)
}

/// Splits a plain decimal string into whole pounds and two pence digits.
fn round_to_pence(decimal: &str) -> (String, String) {
    let (int, frac) = decimal.split_once('.').unwrap_or((decimal, ""));

    let mut digits: Vec<u8> = int
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(2))
        .collect();

    if frac.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - 2;
    let pounds = digits[..split].iter().map(|&d| d as char).collect();
    let pence = digits[split..].iter().map(|&d| d as char).collect();

    (pounds, pence)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

fn display_value(key: &str, value: &DetailValue) -> String {
    if CURRENCY_FIELDS.contains(&key) {
        match value {
            DetailValue::Null => return format_gbp(0.0),
            other => {
                if let Some(amount) = other.as_number() {
                    return format_gbp(amount);
                }
            }
        }
    }
    value.to_string()
}

pub fn draft_email(name: &str, buyer: &str) -> String {
    format!(
        "Dear {name},\n\nWe are writing to you regarding your agreement with {buyer}.\n\nPlease can you check your records for any unreported spend.\n\nBest regards,\n{SIGN_OFF}"
    )
}

/// Builds the panel contents for `name` from its detail map.
///
/// Only keys in [`DETAIL_FIELDS`] are shown, in that order; anything else in
/// the map is ignored.
pub fn render_details(name: &str, details: &HashMap<String, DetailValue>) -> DetailsView {
    let rows = DETAIL_FIELDS
        .iter()
        .filter_map(|key| {
            details.get(*key).map(|value| DetailRow {
                label: label_for(key).to_string(),
                value: display_value(key, value),
            })
        })
        .collect();

    let buyer = match details.get(BUYER_FIELD).map(ToString::to_string) {
        Some(buyer) if !buyer.trim().is_empty() => buyer,
        _ => {
            warn!(supplier = name, "no buyer recorded, draft email uses a placeholder");
            MISSING_BUYER.to_string()
        }
    };

    DetailsView {
        name: name.to_string(),
        draft_email: draft_email(name, &buyer),
        rows,
    }
}

impl DetailsView {
    pub fn to_html(&self) -> String {
        let mut html = format!("<h2>{}</h2>", escape_html(&self.name));

        for row in &self.rows {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>",
                escape_html(&row.label),
                escape_html(&row.value)
            ));
        }

        html.push_str("<p><strong>Draft Email:</strong></p>");
        html.push_str(&format!(
            "<textarea readonly class=\"draft-email\">{}</textarea>",
            escape_html(&self.draft_email)
        ));

        html
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
