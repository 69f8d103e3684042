/*!
 * # Credentials
 *
 * Password hashing and verification for back-office accounts. Sessions are not
 * issued here; `/api/v1/auth/verify` only answers whether a credential pair is valid.
 */

pub mod password;

pub use password::{is_legacy, PasswordCheck, PasswordEncoder};
