use catalog::PoiId;
use foundation::math::Vec2;
use foundation::time::{Time, TimeSpan};

/// Ease-out curve `1 - (1 - t)^p` with `p = 1 / max(linearity, 0.2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Easing {
    power: f64,
}

impl Easing {
    pub fn ease_out(linearity: f64) -> Self {
        Self {
            power: 1.0 / linearity.max(0.2),
        }
    }

    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        1.0 - (1.0 - t).powf(self.power)
    }
}

/// One interpolated camera sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSample {
    pub center: Vec2,
    pub zoom: f64,
    pub finished: bool,
}

/// Fixed-duration eased camera move toward a point.
///
/// Zoom is interpolated linearly in log space so the perceived speed is even.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyTo {
    pub target: Option<PoiId>,
    from_center: Vec2,
    from_zoom: f64,
    to_center: Vec2,
    to_zoom: f64,
    span: TimeSpan,
    easing: Easing,
}

impl FlyTo {
    pub fn new(
        from: (Vec2, f64),
        to: (Vec2, f64),
        start: Time,
        duration_s: f64,
        easing: Easing,
    ) -> Self {
        Self {
            target: None,
            from_center: from.0,
            from_zoom: from.1,
            to_center: to.0,
            to_zoom: to.1,
            span: TimeSpan::starting_at(start, duration_s),
            easing,
        }
    }

    pub fn toward(mut self, target: PoiId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn destination(&self) -> (Vec2, f64) {
        (self.to_center, self.to_zoom)
    }

    pub fn sample(&self, now: Time) -> CameraSample {
        let t = self.span.progress(now);
        if t >= 1.0 {
            return CameraSample {
                center: self.to_center,
                zoom: self.to_zoom,
                finished: true,
            };
        }
        let k = self.easing.apply(t);
        CameraSample {
            center: self.from_center.lerp(self.to_center, k),
            zoom: self.from_zoom + (self.to_zoom - self.from_zoom) * k,
            finished: false,
        }
    }
}
