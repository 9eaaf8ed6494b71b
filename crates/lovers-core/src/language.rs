//! Two-letter ISO 639-1 language codes.

use crate::{Error, Result};

/// Accepts exactly two lowercase ASCII letters, e.g. `"fi"` or `"en"`.
pub fn validate_language(code: &str) -> Result<()> {
  let bytes = code.as_bytes();
  if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_lowercase) {
    Ok(())
  } else {
    Err(Error::InvalidLanguage(code.to_owned()))
  }
}
