//! Audio frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Quantize a float stereo pair, rounding and clipping to i16 range.
    pub fn from_f32(left: f32, right: f32) -> Self {
        Self {
            left: quantize(left),
            right: quantize(right),
        }
    }

    /// Returns true if both sides are zero.
    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

fn quantize(value: f32) -> i16 {
    libm::roundf(value * 32767.0).clamp(-32768.0, 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_values_map_to_extremes() {
        assert_eq!(Frame::from_f32(1.0, -1.0), Frame { left: 32767, right: -32767 });
    }

    #[test]
    fn overdriven_values_clip() {
        let frame = Frame::from_f32(3.5, -3.5);
        assert_eq!(frame.left, 32767);
        assert_eq!(frame.right, -32768);
    }

    #[test]
    fn rounds_to_nearest() {
        // 0.5 / 32767 rounds away from zero
        let frame = Frame::from_f32(0.5 / 32767.0, 0.49 / 32767.0);
        assert_eq!(frame.left, 1);
        assert_eq!(frame.right, 0);
    }
}
