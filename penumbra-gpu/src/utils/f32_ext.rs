pub trait F32Ext {
    fn sqr(self) -> Self;

    /// Clamps this value into `[0, 1]`.
    fn saturate(self) -> Self;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate() {
        assert_eq!(0.0, (-0.5f32).saturate());
        assert_eq!(0.25, 0.25f32.saturate());
        assert_eq!(1.0, 7.0f32.saturate());
    }
}
