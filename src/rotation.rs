//! Memoized meteor rotations.
//!
//! Rotating a sprite and rebuilding its mask every frame is the most
//! expensive thing a meteor does. Angles are quantized to a fixed step and
//! each bucket is rotated once, then shared by every meteor.

use std::collections::HashMap;
use std::rc::Rc;

use crate::sprite::{Mask, Sprite};

/// A rotated image together with its collision mask.
#[derive(Debug)]
pub struct RotatedFrame {
    pub sprite: Sprite,
    pub mask: Mask,
}

#[derive(Debug)]
pub struct RotationCache {
    step_deg: f32,
    buckets: u32,
    frames: HashMap<u32, Rc<RotatedFrame>>,
    rotations: usize,
}

impl RotationCache {
    /// `step_deg` must divide 360 (checked by config validation).
    pub fn new(step_deg: f32) -> Self {
        let step_deg = if step_deg > 0.0 { step_deg } else { 1.0 };
        Self {
            step_deg,
            buckets: (360.0 / step_deg).round().max(1.0) as u32,
            frames: HashMap::new(),
            rotations: 0,
        }
    }

    /// Bucket index for `angle`: rounded down to the step, wrapped to a turn.
    pub fn bucket(&self, angle: f32) -> u32 {
        let wrapped = angle.rem_euclid(360.0);
        ((wrapped / self.step_deg).floor() as u32) % self.buckets
    }

    /// Rotated copy of `base` for the bucket containing `angle`.
    ///
    /// The cache assumes one base image per cache instance.
    pub fn get_frame(&mut self, base: &Sprite, angle: f32) -> Rc<RotatedFrame> {
        let bucket = self.bucket(angle);
        if let Some(frame) = self.frames.get(&bucket) {
            return Rc::clone(frame);
        }
        let sprite = base.rotated(bucket as f32 * self.step_deg);
        let mask = sprite.mask();
        let frame = Rc::new(RotatedFrame { sprite, mask });
        self.rotations += 1;
        tracing::trace!(bucket, "cached meteor rotation");
        self.frames.insert(bucket, Rc::clone(&frame));
        frame
    }

    /// How many rotations have actually been computed.
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    pub fn bucket_count(&self) -> u32 {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Rgb;

    #[test]
    fn buckets_round_down_and_wrap() {
        let cache = RotationCache::new(5.0);
        assert_eq!(cache.bucket(0.0), 0);
        assert_eq!(cache.bucket(4.99), 0);
        assert_eq!(cache.bucket(5.0), 1);
        assert_eq!(cache.bucket(359.9), 71);
        assert_eq!(cache.bucket(360.0), 0);
        assert_eq!(cache.bucket(-1.0), 71);
        assert_eq!(cache.bucket_count(), 72);
    }

    #[test]
    fn same_bucket_returns_same_frame() {
        let base = Sprite::solid(5, 3, Rgb::WHITE);
        let mut cache = RotationCache::new(5.0);
        let a = cache.get_frame(&base, 11.0);
        let b = cache.get_frame(&base, 14.9);
        let c = cache.get_frame(&base, 371.0);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&a, &c));
        assert_eq!(cache.rotations(), 1);
    }

    #[test]
    fn rotations_bounded_by_bucket_count() {
        let base = Sprite::solid(4, 4, Rgb::WHITE);
        let mut cache = RotationCache::new(5.0);
        let mut angle = 0.0f32;
        for _ in 0..5000 {
            cache.get_frame(&base, angle);
            angle += 0.37;
        }
        assert_eq!(cache.rotations(), 72);
    }

    #[test]
    fn mask_matches_rotated_sprite() {
        let base = Sprite::parse("WW.\n.WW").unwrap();
        let mut cache = RotationCache::new(5.0);
        let frame = cache.get_frame(&base, 90.0);
        assert_eq!(frame.mask, frame.sprite.mask());
        assert_eq!(frame.sprite.width(), 2);
    }
}
