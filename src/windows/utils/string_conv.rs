//! String conversion utilities for Windows API

/// Convert a Rust string to a NUL-terminated Windows wide string (UTF-16)
pub fn string_to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert Windows wide string (UTF-16) to Rust string, stopping at the first NUL
pub fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let wide = string_to_wide("SeDebugPrivilege");
        assert_eq!(wide.len(), "SeDebugPrivilege".len() + 1);
        assert_eq!(*wide.last().unwrap(), 0);
        assert_eq!(wide_to_string(&wide), "SeDebugPrivilege");
    }

    #[test]
    fn test_without_terminator() {
        let wide: Vec<u16> = "BUILTIN".encode_utf16().collect();
        assert_eq!(wide_to_string(&wide), "BUILTIN");
        assert_eq!(wide_to_string(&[]), "");
    }
}
