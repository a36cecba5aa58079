use chrono::Utc;
use rand::Rng;

use crate::error::AppError;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const IMAGE_PREFIX: &str = "menu";

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 6;

pub fn validate_image(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::malformed(
            "Invalid file type. Only JPEG, PNG, and WebP are allowed.",
        ));
    }

    if size > MAX_IMAGE_BYTES {
        return Err(AppError::malformed("File too large. Maximum size is 10MB."));
    }

    Ok(())
}

/// `menu/<unix millis>-<6 char suffix>.<mime subtype>`
pub fn image_key(content_type: &str) -> String {
    let extension = content_type.split('/').nth(1).unwrap_or("bin");

    format!(
        "{IMAGE_PREFIX}/{}-{}.{extension}",
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}

pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{key}", base.trim_end_matches('/'))
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();

    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Compares without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_types() {
        assert!(validate_image("image/jpeg", 1024).is_ok());
        assert!(validate_image("image/jpg", 1024).is_ok());
        assert!(validate_image("image/png", 1024).is_ok());
        assert!(validate_image("image/webp", MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_rejected_types() {
        assert!(validate_image("text/plain", 10).is_err());
        assert!(validate_image("image/gif", 10).is_err());
        assert!(validate_image("", 10).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(validate_image("image/png", MAX_IMAGE_BYTES + 1).is_err());
        assert!(validate_image("image/png", 15 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_image_key_shape() {
        let key = image_key("image/webp");
        let name = key.strip_prefix("menu/").unwrap();
        let (stem, extension) = name.rsplit_once('.').unwrap();
        let (millis, suffix) = stem.split_once('-').unwrap();

        assert_eq!(extension, "webp");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 6);
        assert!(suffix.bytes().all(|b| SUFFIX_CHARSET.contains(&b)));
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("https://images.example.com/", "menu/1-abc.png"),
            "https://images.example.com/menu/1-abc.png"
        );
        assert_eq!(public_url("/images", "menu/1-abc.png"), "/images/menu/1-abc.png");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hunter2", b"hunter2"));
        assert!(!constant_time_eq(b"hunter2", b"hunter3"));
        assert!(!constant_time_eq(b"hunter2", b"hunter22"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
