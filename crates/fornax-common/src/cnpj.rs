use crate::error::{FornaxError, Result};

pub const CNPJ_DIGITS: usize = 14;

/// Strips punctuation from a CNPJ, keeping digits only. Both the formatted
/// (`00.000.000/0001-00`) and the bare form are accepted by every entry point.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate(raw: &str) -> Result<String> {
    let digits = normalize(raw);
    if digits.len() != CNPJ_DIGITS {
        return Err(FornaxError::InvalidCnpj(raw.to_string()));
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::{normalize, validate};

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("12.345.678/0001-95"), "12345678000195");
        assert_eq!(normalize("12345678000195"), "12345678000195");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn validate_requires_fourteen_digits() {
        assert!(validate("12.345.678/0001-95").is_ok());
        assert!(validate("12345").is_err());
        assert!(validate("").is_err());
    }
}
