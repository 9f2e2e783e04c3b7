use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Accepts a number, a numeric string, or anything else (which becomes `None`).
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        LooseValue::Number(n) => Some(n),
        LooseValue::Text(s) => parse_number(&s),
        LooseValue::Other(_) => None,
    }))
}

/// Accepts a string or a number; blank strings and other shapes become `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        LooseValue::Number(n) => Some(n.to_string()),
        LooseValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        LooseValue::Other(_) => None,
    }))
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let sanitized = raw
        .trim()
        .trim_start_matches('₱')
        .replace([',', '_'], "");
    sanitized.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_number;

    #[test]
    fn parses_formatted_amounts() {
        assert_eq!(parse_number("12,500"), Some(12_500.0));
        assert_eq!(parse_number(" ₱8_000.50 "), Some(8_000.5));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
    }
}
