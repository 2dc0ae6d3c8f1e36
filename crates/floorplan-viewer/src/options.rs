//! Construction options of the viewer

use serde::{Deserialize, Serialize};

/// Options accepted when constructing a [`Viewer`](crate::Viewer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Size the viewport to the window height below its offset
    pub resize: bool,
    /// Kept for design-file compatibility; the viewer never navigates
    pub push_href: bool,
    /// Auto-spin flag (accepted, no effect)
    pub spin: bool,
    /// Auto-spin speed (accepted, no effect)
    pub spin_speed: f32,
    /// Secondary-button drag pans the camera
    pub click_pan: bool,
    /// Fixed items may be dragged
    pub can_move_fixed_items: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            resize: true,
            push_href: false,
            spin: true,
            spin_speed: 0.00002,
            click_pan: true,
            can_move_fixed_items: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewerOptions::default();
        assert!(options.resize);
        assert!(!options.push_href);
        assert!(options.click_pan);
        assert!(!options.can_move_fixed_items);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let options: ViewerOptions = ron::from_str("(can_move_fixed_items: true)").unwrap();
        assert!(options.can_move_fixed_items);
        assert!(options.resize);
        assert_eq!(options.spin_speed, 0.00002);
    }
}
