use serde::{Deserialize, Deserializer};
use std::fmt;

/// One disposition code in the MDES.
///
/// Loaded verbatim from the per-version disposition data. The spreadsheet
/// extraction writes `category_code` as an integer and some codes as bare
/// numbers, so every field also accepts a YAML number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DispositionCode {
    #[serde(deserialize_with = "string_or_number")]
    pub event: String,
    #[serde(deserialize_with = "string_or_number")]
    pub final_category: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sub_category: String,
    #[serde(deserialize_with = "string_or_number")]
    pub disposition: String,
    #[serde(deserialize_with = "string_or_number")]
    pub interim_code: String,
    #[serde(deserialize_with = "string_or_number")]
    pub final_code: String,
    #[serde(deserialize_with = "string_or_number")]
    pub category_code: String,
}

impl DispositionCode {
    /// True when the final category signifies successful completion.
    pub fn is_success(&self) -> bool {
        self.final_category.starts_with("Complete")
    }
}

impl fmt::Display for DispositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event={:?} disposition={:?} status_code={}/{}",
            self.event, self.disposition, self.interim_code, self.final_code
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Integer(i)) => i.to_string(),
        Some(Scalar::Float(x)) => x.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_only_for_complete_categories() {
        let mut code = DispositionCode {
            final_category: "Complete Interview".into(),
            ..DispositionCode::default()
        };
        assert!(code.is_success());

        code.final_category = "Not Complete".into();
        assert!(!code.is_success());
    }

    #[test]
    fn test_deserializes_numeric_codes() {
        let code: DispositionCode = serde_json::from_str(
            r#"{"event": "Household Enumeration Event", "category_code": 1,
                "interim_code": "010", "final_code": 510, "disposition": "Completed"}"#,
        )
        .unwrap();
        assert_eq!(code.category_code, "1");
        assert_eq!(code.final_code, "510");
        assert_eq!(code.interim_code, "010");
        assert_eq!(code.sub_category, "");
    }

    #[test]
    fn test_display() {
        let code = DispositionCode {
            event: "Pregnancy Screener Event".into(),
            disposition: "Out of Sample".into(),
            interim_code: "050".into(),
            final_code: "550".into(),
            ..DispositionCode::default()
        };
        assert_eq!(
            code.to_string(),
            "event=\"Pregnancy Screener Event\" disposition=\"Out of Sample\" status_code=050/550"
        );
    }
}
