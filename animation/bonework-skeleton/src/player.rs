//! Playback state for one animated model
//!
//! The player keeps track of which clip is running and how far into it the
//! model is. Time is advanced by the caller every frame and poses are sampled
//! on demand; the player never owns the skeleton.

use crate::error::Result;
use crate::pose::Pose;
use crate::skeleton::Skeleton;

/// Current animation and playback time
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    /// Index of the running animation, `None` shows the bind pose
    animation: Option<usize>,
    /// Seconds since the animation started
    time: f32,
    /// Playback speed multiplier
    speed: f32,
    /// Blend between adjacent frames when sampling
    smooth: bool,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            animation: None,
            time: 0.0,
            speed: 1.0,
            smooth: true,
        }
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Start the animation called `name` from the beginning
    ///
    /// Returns false and leaves the player untouched if the skeleton has no
    /// such animation.
    pub fn play(&mut self, skeleton: &Skeleton, name: &str) -> bool {
        match skeleton.animation_index(name) {
            Some(index) => {
                self.play_index(index);
                true
            }
            None => {
                log::debug!("No animation named '{name}', keeping current state");
                false
            }
        }
    }

    /// Start the animation at `index` from the beginning
    pub fn play_index(&mut self, index: usize) {
        self.animation = Some(index);
        self.time = 0.0;
    }

    /// Return to the bind pose
    pub fn stop(&mut self) {
        self.animation = None;
        self.time = 0.0;
    }

    /// Move playback forward by `dt` seconds, scaled by the speed
    pub fn advance(&mut self, dt: f32) {
        self.time = (self.time + dt * self.speed).max(0.0);
    }

    /// Jump to an absolute playback time
    pub fn seek(&mut self, time: f32) {
        self.time = time.max(0.0);
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn animation(&self) -> Option<usize> {
        self.animation
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn is_playing(&self) -> bool {
        self.animation.is_some()
    }

    /// Check whether a non-looping animation has reached its last frame
    ///
    /// Looping animations and the bind pose never finish.
    pub fn is_finished(&self, skeleton: &Skeleton) -> bool {
        self.animation
            .and_then(|index| skeleton.animation(index))
            .is_some_and(|anim| !anim.looping && self.time >= anim.duration())
    }

    /// Sample the pose for the current state
    pub fn pose<'a>(&self, skeleton: &'a Skeleton) -> Result<Pose<'a>> {
        Pose::sample(skeleton, self.animation, self.time, self.smooth)
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}
