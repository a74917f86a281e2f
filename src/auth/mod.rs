/// Authentication module
///
/// Password hashing, access token signing/validation, bearer header
/// extraction and refresh token lifecycle management.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;

pub use bearer::get_bearer_token;
pub use claims::ISSUER;
pub use jwt::make_access_token;
pub use jwt::validate_access_token;
pub use password::hash_password;
pub use password::validate_password_strength;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::revoke_refresh_token;
pub use refresh_token::save_refresh_token;
pub use refresh_token::validate_refresh_token;
