//! Output file naming for accepted selections.
//!
//! The downstream tuning workflow parses the selection back out of the
//! filename, so the basename packs the user, scene id, and rectangle
//! corners into a fixed comma-separated form:
//! `user,scene,x0,y0,x1,y1`.

use graypatch_core::SelectionRect;

/// Characters that would break the comma-separated basename or the
/// filesystem.
pub const INVALID_CHARS: &str = "<>:\"/\\|?*,'";

/// Whether a user or scene component is safe to embed in a filename.
pub fn is_valid_component(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(|c| INVALID_CHARS.contains(c))
}

/// Build the output basename for an accepted selection. The rectangle is
/// encoded as its min and max corners in image pixels.
pub fn output_basename(user: &str, scene: &str, rect: SelectionRect) -> String {
    format!(
        "{user},{scene},{},{},{},{}",
        rect.x,
        rect.y,
        rect.right(),
        rect.bottom()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_packs_corners() {
        let rect = SelectionRect { x: 10, y: 20, width: 30, height: 40 };
        assert_eq!(output_basename("alice", "kitchen", rect), "alice,kitchen,10,20,40,60");
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(is_valid_component("scene-01"));
        assert!(is_valid_component("desk_lamp"));
        for bad in ["a,b", "a/b", "a*b", "it's", ""] {
            assert!(!is_valid_component(bad), "{bad:?} should be rejected");
        }
    }
}
