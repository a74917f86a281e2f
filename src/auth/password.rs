/// Password Hashing and Verification
///
/// Handles password hashing with bcrypt and the registration-time password
/// policy. Stored hashes are only ever compared through `verify_password`.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

use crate::error::{AppError, AuthError, CryptoError, ValidationError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash a password using bcrypt
///
/// Each call draws a fresh salt, so hashing the same password twice yields
/// different strings.
///
/// # Errors
/// Returns `HashingFailure` if bcrypt cannot produce a hash
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Crypto(CryptoError::HashingFailure(e.to_string())))
}

/// Verify a password against its hash
///
/// # Arguments
/// * `password` - Plain text password to verify
/// * `hash` - Bcrypt hash to verify against
///
/// # Errors
/// - `PasswordMismatch` if the password does not match
/// - `UnsupportedHash` if `hash` is not a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::Auth(AuthError::PasswordMismatch)),
        Err(BcryptError::InvalidPrefix(_)) | Err(BcryptError::InvalidHash(_)) => {
            Err(AppError::Auth(AuthError::UnsupportedHash))
        }
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            Err(AppError::Auth(AuthError::UnsupportedHash))
        }
    }
}

/// Validate password strength requirements for new accounts
///
/// Requirements:
/// - Minimum 8 characters
/// - Maximum 128 characters
/// - At least one digit
/// - At least one lowercase letter
/// - At least one uppercase letter
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        )));
    }

    // bcrypt only looks at the first 72 bytes; the cap also bounds hashing work
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }

    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());

    if !has_digit || !has_lowercase || !has_uppercase {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "password must contain at least one digit, one lowercase letter, and one uppercase letter"
                .to_string(),
        )));
    }

    Ok(())
}
