// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based property animations.
//!
//! An [`Animation`] drives one scalar property of some context `C` (the
//! [`World`](crate::World) for animations it schedules) from its current
//! value to `current + delta` over `duration` milliseconds. At time `t` the
//! setter receives
//!
//! ```text
//! destination - delta * easing(1 - fraction),   fraction = clamp((t - start) / duration, 0, 1)
//! ```
//!
//! so the easing shapes the distance still to travel. The first step after
//! the end time writes the exact destination, fires the completion callback
//! once and deactivates the animation.

use core::f64::consts::PI;
use core::fmt;

/// Direction variant of an [`Easing`] curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ease {
    /// Slow start.
    In,
    /// Slow end.
    Out,
    /// Slow start and end.
    InOut,
}

/// A map from `[0, 1]` to progress, `0 → 0` and `1 → 1`.
///
/// [`Easing::Elastic`] and [`Easing::Back`] overshoot the unit range on the way.
#[derive(Copy, Clone, Debug)]
pub enum Easing {
    /// Identity.
    Linear,
    /// Quarter sine wave.
    Sine(Ease),
    /// `t²`.
    Quad(Ease),
    /// `t³`.
    Cubic(Ease),
    /// `t⁴`.
    Quart(Ease),
    /// `t⁵`.
    Quint(Ease),
    /// `2^(10(t-1))`.
    Expo(Ease),
    /// Damped spring.
    Elastic(Ease),
    /// Pulls back before moving on.
    Back(Ease),
    /// Caller-provided map.
    Custom(fn(f64) -> f64),
}

impl Default for Easing {
    fn default() -> Self {
        Self::Sine(Ease::InOut)
    }
}

impl Easing {
    /// Look an easing up by name, e.g. `"linear"`, `"cubic"`, `"quad_out"`.
    ///
    /// Bare curve names mean the in-out variant. Unknown names fall back to
    /// the default sinusoidal easing.
    ///
    /// ```
    /// use morphic_world::animation::{Ease, Easing};
    /// assert!(matches!(Easing::from_name("elastic_in"), Easing::Elastic(Ease::In)));
    /// assert!(matches!(Easing::from_name("wobbly"), Easing::Sine(Ease::InOut)));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let (curve, ease) = match name.rsplit_once('_') {
            Some((c, "in")) => (c, Ease::In),
            Some((c, "out")) => (c, Ease::Out),
            Some((c, "inout")) => (c, Ease::InOut),
            _ => (name, Ease::InOut),
        };
        match curve {
            "linear" => Self::Linear,
            "sine" | "sinusoidal" => Self::Sine(ease),
            "quad" | "quadratic" => Self::Quad(ease),
            "cubic" => Self::Cubic(ease),
            "quart" | "quartic" => Self::Quart(ease),
            "quint" | "quintic" => Self::Quint(ease),
            "expo" | "exponential" => Self::Expo(ease),
            "elastic" => Self::Elastic(ease),
            "back" => Self::Back(ease),
            _ => {
                log::debug!("unknown easing {name:?}, using sinusoidal");
                Self::default()
            }
        }
    }

    /// Evaluate the easing at `t` (clamped to `0..=1`).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let ease = match self {
            Self::Linear => return t,
            Self::Custom(f) => return f(t),
            Self::Sine(e)
            | Self::Quad(e)
            | Self::Cubic(e)
            | Self::Quart(e)
            | Self::Quint(e)
            | Self::Expo(e)
            | Self::Elastic(e)
            | Self::Back(e) => e,
        };
        match ease {
            Ease::In => self.curve_in(t),
            Ease::Out => 1.0 - self.curve_in(1.0 - t),
            Ease::InOut if t < 0.5 => self.curve_in(2.0 * t) / 2.0,
            Ease::InOut => 1.0 - self.curve_in(2.0 - 2.0 * t) / 2.0,
        }
    }

    /// The "in" shape of the curve.
    fn curve_in(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Custom(f) => f(t),
            Self::Sine(_) => sine_in(t),
            Self::Quad(_) => t * t,
            Self::Cubic(_) => t * t * t,
            Self::Quart(_) => t * t * t * t,
            Self::Quint(_) => t * t * t * t * t,
            Self::Expo(_) => expo_in(t),
            Self::Elastic(_) => elastic_in(t),
            Self::Back(_) => back_in(t),
        }
    }
}

fn sine_in(t: f64) -> f64 {
    1.0 - (t * PI / 2.0).cos()
}

fn expo_in(t: f64) -> f64 {
    if t <= 0.0 { 0.0 } else { 2_f64.powf(10.0 * t - 10.0) }
}

fn elastic_in(t: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let c4 = 2.0 * PI / 3.0;
    -(2_f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
}

fn back_in(t: f64) -> f64 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    c3 * t * t * t - c1 * t * t
}

type Setter<C> = Box<dyn FnMut(&mut C, f64)>;
type Getter<C> = Box<dyn Fn(&C) -> f64>;
type Completion<C> = Box<dyn FnOnce(&mut C)>;

/// Handle of an animation scheduled on a [`World`](crate::World).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub(crate) u64);

/// One running property animation over a context `C`.
///
/// ```
/// use morphic_world::animation::{Animation, Easing};
///
/// let mut x = 0.0_f64;
/// let mut anim = Animation::new(&x, |x| *x, |x, v| *x = v, 100.0, 1000.0, Easing::Linear, 0.0);
/// anim.step(&mut x, 500.0);
/// assert_eq!(x, 50.0);
/// anim.step(&mut x, 1001.0);
/// assert_eq!(x, 100.0);
/// assert!(!anim.is_active());
/// ```
pub struct Animation<C> {
    setter: Setter<C>,
    getter: Getter<C>,
    delta: f64,
    duration: f64,
    easing: Easing,
    start_time: f64,
    destination: f64,
    is_active: bool,
    on_complete: Option<Completion<C>>,
}

impl<C> fmt::Debug for Animation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("delta", &self.delta)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("start_time", &self.start_time)
            .field("destination", &self.destination)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl<C> Animation<C> {
    /// Start animating the property read by `getter` and written by `setter`
    /// by `delta` over `duration` milliseconds, beginning at `now`.
    pub fn new(
        ctx: &C,
        getter: impl Fn(&C) -> f64 + 'static,
        setter: impl FnMut(&mut C, f64) + 'static,
        delta: f64,
        duration: f64,
        easing: Easing,
        now: f64,
    ) -> Self {
        let mut anim = Self {
            setter: Box::new(setter),
            getter: Box::new(getter),
            delta,
            duration: duration.max(0.0),
            easing,
            start_time: now,
            destination: 0.0,
            is_active: false,
            on_complete: None,
        };
        anim.start(ctx, now);
        anim
    }

    /// Run `f` once when the animation reaches its destination.
    #[must_use]
    pub fn with_on_complete(mut self, f: impl FnOnce(&mut C) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Restart from the property's current value.
    pub fn start(&mut self, ctx: &C, now: f64) {
        self.start_time = now;
        self.destination = (self.getter)(ctx) + self.delta;
        self.is_active = true;
    }

    /// Whether the animation still advances.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Value the property ends at.
    pub fn destination(&self) -> f64 {
        self.destination
    }

    /// Time after which the next step completes the animation.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Stop advancing without reaching the destination.
    pub fn cancel(&mut self) {
        self.is_active = false;
    }

    /// Advance to `now`.
    pub fn step(&mut self, ctx: &mut C, now: f64) {
        if !self.is_active {
            return;
        }
        if now > self.end_time() {
            self.is_active = false;
            (self.setter)(ctx, self.destination);
            if let Some(done) = self.on_complete.take() {
                done(ctx);
            }
            return;
        }
        let fraction = if self.duration > 0.0 {
            ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let value = self.destination - self.delta * self.easing.apply(1.0 - fraction);
        (self.setter)(ctx, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 9] = [
        Easing::Linear,
        Easing::Sine(Ease::InOut),
        Easing::Quad(Ease::In),
        Easing::Cubic(Ease::Out),
        Easing::Quart(Ease::InOut),
        Easing::Quint(Ease::In),
        Easing::Expo(Ease::Out),
        Easing::Elastic(Ease::InOut),
        Easing::Back(Ease::Out),
    ];

    #[test]
    fn easings_pin_their_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-3, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-3, "{e:?} at 1");
        }
    }

    #[test]
    fn back_and_elastic_overshoot() {
        assert!(Easing::Back(Ease::In).apply(0.2) < 0.0);
        let peak = (1..100)
            .map(|i| Easing::Elastic(Ease::Out).apply(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn custom_easing_is_used() {
        let step = Easing::Custom(|t| if t < 0.5 { 0.0 } else { 1.0 });
        assert_eq!(step.apply(0.4), 0.0);
        assert_eq!(step.apply(0.6), 1.0);
    }

    #[test]
    fn linear_scenario() {
        let mut x = 0.0_f64;
        let mut a = Animation::new(&x, |x| *x, |x, v| *x = v, 100.0, 1000.0, Easing::Linear, 0.0);
        a.step(&mut x, 0.0);
        assert_eq!(x, 0.0);
        a.step(&mut x, 500.0);
        assert_eq!(x, 50.0);
        a.step(&mut x, 1000.0);
        assert_eq!(x, 100.0);
        assert!(a.is_active(), "completes only after the end time");
        a.step(&mut x, 1001.0);
        assert_eq!(x, 100.0);
        assert!(!a.is_active());
    }

    #[test]
    fn terminates_exactly_once_at_destination() {
        struct Ctx {
            value: f64,
            completions: u32,
        }
        for easing in ALL {
            let mut ctx = Ctx {
                value: 10.0,
                completions: 0,
            };
            let mut a = Animation::new(
                &ctx,
                |c: &Ctx| c.value,
                |c: &mut Ctx, v| c.value = v,
                -4.0,
                300.0,
                easing,
                1000.0,
            )
            .with_on_complete(|c| c.completions += 1);
            let mut t = 1000.0;
            while t < 1400.0 {
                a.step(&mut ctx, t);
                t += 16.0;
            }
            a.step(&mut ctx, 5000.0);
            assert_eq!(ctx.value, 6.0, "{easing:?}");
            assert_eq!(ctx.completions, 1, "{easing:?}");
        }
    }

    #[test]
    fn cancelled_animation_stops() {
        let mut x = 0.0_f64;
        let mut a = Animation::new(&x, |x| *x, |x, v| *x = v, 10.0, 100.0, Easing::Linear, 0.0);
        a.step(&mut x, 50.0);
        a.cancel();
        a.step(&mut x, 500.0);
        assert_eq!(x, 5.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let mut x = 1.0_f64;
        let mut a = Animation::new(&x, |x| *x, |x, v| *x = v, 1.0, 0.0, Easing::default(), 0.0);
        a.step(&mut x, 0.0);
        assert_eq!(x, 2.0);
        a.step(&mut x, 1.0);
        assert!(!a.is_active());
    }

    #[test]
    fn unknown_names_fall_back() {
        assert!(matches!(Easing::from_name("linear"), Easing::Linear));
        assert!(matches!(Easing::from_name("quad_out"), Easing::Quad(Ease::Out)));
        assert!(matches!(Easing::from_name(""), Easing::Sine(Ease::InOut)));
    }
}
