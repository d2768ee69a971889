//! Ground height queries.

/// Terrain height at a world XZ position.
pub type HeightFn = Box<dyn Fn(f32, f32) -> f32>;

/// Borrowed view of the optional height callback. Without one the ground is
/// flat at height 0 and slope tests are skipped.
#[derive(Clone, Copy, Default)]
pub struct Ground<'a> {
    height_fn: Option<&'a dyn Fn(f32, f32) -> f32>,
}

impl<'a> Ground<'a> {
    pub fn new(height_fn: Option<&'a dyn Fn(f32, f32) -> f32>) -> Self {
        Self { height_fn }
    }

    pub fn from_fn(height_fn: &'a dyn Fn(f32, f32) -> f32) -> Self {
        Self { height_fn: Some(height_fn) }
    }

    pub fn flat() -> Self {
        Self::default()
    }

    pub fn has_terrain(&self) -> bool {
        self.height_fn.is_some()
    }

    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.height_fn.map_or(0.0, |f| f(x, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let ground = Ground::flat();
        assert!(!ground.has_terrain());
        assert_eq!(ground.height(10.0, -4.0), 0.0);
    }

    #[test]
    fn test_callback() {
        let f: HeightFn = Box::new(|x, z| x + z);
        let ground = Ground::new(Some(f.as_ref()));
        assert!(ground.has_terrain());
        assert_eq!(ground.height(1.0, 2.0), 3.0);
    }
}
