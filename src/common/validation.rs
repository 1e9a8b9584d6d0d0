// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::crm::DocumentType;

/// Remove tudo que não for dígito ("123.456.789-00" -> "12345678900").
pub fn clean_document(document: &str) -> String {
    document.chars().filter(char::is_ascii_digit).collect()
}

/// Validação simplificada: só confere a quantidade de dígitos
/// (CPF = 11, CNPJ = 14). Dígitos verificadores não são calculados.
pub fn validate_document(document: &str, document_type: DocumentType) -> bool {
    clean_document(document).len() == document_type.digit_count()
}

// --- Funções custom para o `validator` ---

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::new(1, 2) {
        return Err(validation_error("min_price", "O preço deve ser no mínimo 0,01."));
    }
    Ok(())
}

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(validation_error("negative", "O valor não pode ser negativo."));
    }
    Ok(())
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(validation_error("not_positive", "O valor deve ser maior que zero."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_needs_eleven_digits() {
        assert!(validate_document("123.456.789-00", DocumentType::Cpf));
        assert!(!validate_document("123.456.789-0", DocumentType::Cpf));
        assert!(!validate_document("12.345.678/0001-90", DocumentType::Cpf));
    }

    #[test]
    fn cnpj_needs_fourteen_digits() {
        assert!(validate_document("12.345.678/0001-90", DocumentType::Cnpj));
        assert!(validate_document("12345678000190", DocumentType::Cnpj));
        assert!(!validate_document("abc", DocumentType::Cnpj));
    }

    #[test]
    fn price_lower_bound_is_one_cent() {
        assert!(validate_price(&Decimal::new(1, 2)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_non_negative(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative(&Decimal::new(-1, 0)).is_err());
        assert!(validate_positive(&Decimal::ZERO).is_err());
    }
}
