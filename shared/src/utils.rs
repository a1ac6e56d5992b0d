//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! Ethereum-style addresses (`0x` + 40 hex chars) are too long for the navbar:
//! - [`format_address`] - keep the first N and last M characters
//! - [`truncate_address`] - navbar format, `0x` prefix plus 4 hex chars each side
//!
//! ```rust
//! use shared::utils::truncate_address;
//!
//! let address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
//! assert_eq!(truncate_address(address), "0x5aAe...eAed");
//! ```

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// Returned unchanged when it is too short to shorten, or not ASCII (slicing
/// by byte would otherwise risk a char boundary).
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
/// assert_eq!(format_address(addr, 6, 4), "0x5aAe...eAed");
/// assert_eq!(format_address("0x01", 6, 4), "0x01");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let len = address.len();
    if !address.is_ascii() || len <= prefix_len + suffix_len {
        return address.to_string();
    }
    format!("{}...{}", &address[..prefix_len], &address[len - suffix_len..])
}

/// Navbar-sized address: `0x` plus four characters, ellipsis, last four.
pub fn truncate_address(address: &str) -> String {
    let prefix_len = if address.starts_with("0x") { 6 } else { 4 };
    format_address(address, prefix_len, 4)
}
