// Version information for the card scanning service

/// Version string reported by the health endpoint
pub const VERSION: &str = "1.0";

/// Semantic version number of the crate
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Languages the recognition engine is built for
pub const OCR_LANGUAGES: &[&str] = &["en", "ar"];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("cardscan {} (api {})", VERSION_NUMBER, VERSION)
}
