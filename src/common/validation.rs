// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Mantém só os dígitos de um CNPJ ("11.111.111/0001-11" -> "11111111000111").
pub fn cnpj_digits(cnpj: &str) -> String {
    cnpj.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Aceita o CNPJ com ou sem pontuação, desde que sobrem 14 dígitos.
pub fn validate_cnpj(cnpj: &str) -> Result<(), ValidationError> {
    let only_allowed = cnpj
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '));

    if !only_allowed || cnpj_digits(cnpj).len() != 14 {
        let mut err = ValidationError::new("cnpj");
        err.message = Some("O CNPJ deve conter 14 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

/// Forma canônica gravada no banco: 00.000.000/0000-00.
/// Assim a restrição UNIQUE não depende de como o usuário digitou.
pub fn format_cnpj(cnpj: &str) -> String {
    let d = cnpj_digits(cnpj);
    if d.len() != 14 {
        return cnpj.trim().to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    )
}

pub fn validate_nota(nota: &Decimal) -> Result<(), ValidationError> {
    if *nota < Decimal::ZERO || *nota > Decimal::TEN {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0);
        err.add_param("max".into(), &10);
        err.message = Some("A nota deve estar entre 0 e 10.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cnpj_accepts_formatted_and_plain() {
        assert!(validate_cnpj("11.111.111/0001-11").is_ok());
        assert!(validate_cnpj("11111111000111").is_ok());
    }

    #[test]
    fn cnpj_rejects_wrong_length_or_letters() {
        assert!(validate_cnpj("11.111.111/0001").is_err());
        assert!(validate_cnpj("AB.111.111/0001-11").is_err());
    }

    #[test]
    fn cnpj_is_normalized() {
        assert_eq!(format_cnpj("11111111000111"), "11.111.111/0001-11");
        assert_eq!(format_cnpj(" 11.111.111/0001-11 "), "11.111.111/0001-11");
    }

    #[test]
    fn nota_range() {
        assert!(validate_nota(&Decimal::from_str("7.5").unwrap()).is_ok());
        assert!(validate_nota(&Decimal::ZERO).is_ok());
        assert!(validate_nota(&Decimal::TEN).is_ok());
        assert!(validate_nota(&Decimal::from_str("10.01").unwrap()).is_err());
        assert!(validate_nota(&Decimal::from_str("-1").unwrap()).is_err());
    }
}
