//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses the thread-local RNG.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_float(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }

    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Settable clock for testing elapsed-time rules.
#[cfg(test)]
pub struct ManualClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(std::sync::Mutex::new(start))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.0.lock().unwrap();
        *now += chrono::Duration::minutes(minutes);
    }
}

#[cfg(test)]
impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Fixed random for testing: every float roll returns `.0`, every integer
/// roll returns `.1` clamped into the requested range.
#[cfg(test)]
pub struct FixedRandom(pub f64, pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_float(&self) -> f64 {
        self.0
    }

    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.1.clamp(min, max.max(min))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Scripted random for testing: floats and integers are served from
/// separate queues; an exhausted queue falls back to the last value served
/// (or 0.5 / `min`).
#[cfg(test)]
pub struct SequenceRandom {
    floats: std::sync::Mutex<std::collections::VecDeque<f64>>,
    ints: std::sync::Mutex<std::collections::VecDeque<i32>>,
    last_float: std::sync::Mutex<f64>,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(floats: &[f64], ints: &[i32]) -> Self {
        Self {
            floats: std::sync::Mutex::new(floats.iter().copied().collect()),
            ints: std::sync::Mutex::new(ints.iter().copied().collect()),
            last_float: std::sync::Mutex::new(0.5),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_float(&self) -> f64 {
        let mut last = self.last_float.lock().unwrap();
        if let Some(next) = self.floats.lock().unwrap().pop_front() {
            *last = next;
        }
        *last
    }

    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.ints
            .lock()
            .unwrap()
            .pop_front()
            .map(|v| v.clamp(min, max.max(min)))
            .unwrap_or(min)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
