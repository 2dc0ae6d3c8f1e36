//! Geometry of the element the viewer is mounted in

/// Layout of the host element, in pixels.
///
/// Mirrors what a host toolkit reports for the panel the viewport lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountGeometry {
    /// Distance from the top of the window to the element
    pub offset_top: f32,
    pub offset_left: f32,
    pub client_width: f32,
    pub client_height: f32,
    /// Inner height of the hosting window
    pub window_inner_height: f32,
}

impl MountGeometry {
    /// Geometry of an element filling a window of the given size
    pub fn fill(width: f32, height: f32) -> Self {
        Self {
            offset_top: 0.0,
            offset_left: 0.0,
            client_width: width,
            client_height: height,
            window_inner_height: height,
        }
    }

    /// Viewport size in whole pixels, never zero.
    ///
    /// With `resize_to_window` the height runs from the element's top offset
    /// to the bottom of the window; otherwise the element's own height is used.
    pub fn viewport_size(&self, resize_to_window: bool) -> (u32, u32) {
        let height = if resize_to_window {
            self.window_inner_height - self.offset_top
        } else {
            self.client_height
        };
        (to_pixels(self.client_width), to_pixels(height))
    }
}

fn to_pixels(value: f32) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.round() as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_to_window_uses_window_height() {
        let geometry = MountGeometry {
            offset_top: 60.0,
            offset_left: 200.0,
            client_width: 800.0,
            client_height: 300.0,
            window_inner_height: 700.0,
        };
        assert_eq!(geometry.viewport_size(true), (800, 640));
        assert_eq!(geometry.viewport_size(false), (800, 300));
    }

    #[test]
    fn test_degenerate_sizes_clamp_to_one() {
        let geometry = MountGeometry {
            offset_top: 900.0,
            offset_left: 0.0,
            client_width: 0.0,
            client_height: f32::NAN,
            window_inner_height: 700.0,
        };
        assert_eq!(geometry.viewport_size(true), (1, 1));
        assert_eq!(geometry.viewport_size(false), (1, 1));
    }
}
