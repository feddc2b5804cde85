//! Stable per-name colors.
//!
//! A name always hashes to the same palette entry, within a session and
//! across runs, so speakers stay recognizable.

/// SGR foreground codes a name can be painted with.
pub const PALETTE: [u8; 15] = [31, 32, 33, 34, 35, 36, 91, 92, 93, 94, 95, 96, 37, 90, 97];

/// Rolling `h * 31 + c` hash over the characters, truncated to 32 bits.
pub fn name_hash(name: &str) -> u32 {
    name.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}

pub fn color_index(name: &str) -> usize {
    name_hash(name) as usize % PALETTE.len()
}

/// Render `name` as `< name >` with its palette color.
pub fn colorize(name: &str) -> String {
    format!("< \x1b[{}m{}\x1b[0m >", PALETTE[color_index(name)], name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_known_values() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_hash_truncates_to_32_bits() {
        let long = "z".repeat(64);
        let expected = long
            .chars()
            .fold(0u64, |h, c| (h * 31 + c as u64) & 0xFFFF_FFFF);
        assert_eq!(name_hash(&long) as u64, expected);
    }

    #[test]
    fn test_color_is_deterministic() {
        for name in ["alice", "bob", "Guest", "NickServ", "ünïcødé", ""] {
            assert_eq!(color_index(name), color_index(name));
            assert_eq!(colorize(name), colorize(name));
            assert!(color_index(name) < PALETTE.len());
        }
    }

    #[test]
    fn test_colorize_format() {
        // "a" hashes to 97, 97 % 15 == 7
        assert_eq!(colorize("a"), "< \x1b[92ma\x1b[0m >");
    }
}
