use catalog::MapImage;
use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Camera transform at one instant.
///
/// `center` is in image pixels, `size` is the container size in screen
/// pixels, and the scale from image to screen pixels is `2^zoom`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub center: Vec2,
    pub zoom: f64,
    pub size: Vec2,
}

impl ViewportState {
    pub fn scale(&self) -> f64 {
        self.zoom.exp2()
    }

    /// The image-space rectangle currently on screen.
    pub fn visible_rect(&self) -> Aabb2 {
        Aabb2::from_center_size(self.center, self.size / self.scale())
    }
}

/// Flat pixel-plane mapping between the raster image and the container.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordinateSystem {
    bounds: Aabb2,
}

impl CoordinateSystem {
    pub fn new(bounds: Aabb2) -> Self {
        Self { bounds }
    }

    pub fn for_image(image: &MapImage) -> Self {
        Self::new(image.bounds())
    }

    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    pub fn to_screen(&self, pixel: Vec2, state: &ViewportState) -> Vec2 {
        (pixel - state.center) * state.scale() + state.size * 0.5
    }

    pub fn to_pixel(&self, screen: Vec2, state: &ViewportState) -> Vec2 {
        (screen - state.size * 0.5) / state.scale() + state.center
    }
}
