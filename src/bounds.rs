//! Numeric interval reasoning for the type possibility analyzer.
//!
//! A `Bound` is the interval derived from `minimum` / `maximum` /
//! `exclusiveMinimum` / `exclusiveMaximum`, covering both the draft-06+
//! numeric form of the exclusive keywords and the legacy draft-04 boolean
//! flags. Bounds are transient: they exist only during type analysis and
//! are never serialized back into a schema.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub lo: Option<f64>,
    pub lo_exclusive: bool,
    pub hi: Option<f64>,
    pub hi_exclusive: bool,
}

impl Bound {
    pub fn unbounded() -> Self {
        Bound {
            lo: None,
            lo_exclusive: false,
            hi: None,
            hi_exclusive: false,
        }
    }

    /// Extract the numeric bound from a keyword mapping.
    ///
    /// A boolean `exclusiveMinimum`/`exclusiveMaximum` flag (draft-04)
    /// promotes the corresponding inclusive bound to exclusive; a numeric
    /// one (draft-06+) is a bound of its own. When both forms constrain the
    /// same side, the tighter one wins.
    pub fn from_map(map: &Map<String, Value>) -> Bound {
        let mut bound = Bound::unbounded();

        if let Some(min) = map.get("minimum").and_then(Value::as_f64) {
            let exclusive = map.get("exclusiveMinimum") == Some(&Value::Bool(true));
            bound.tighten_lo(min, exclusive);
        }
        if let Some(exmin) = map.get("exclusiveMinimum").and_then(Value::as_f64) {
            bound.tighten_lo(exmin, true);
        }
        if let Some(max) = map.get("maximum").and_then(Value::as_f64) {
            let exclusive = map.get("exclusiveMaximum") == Some(&Value::Bool(true));
            bound.tighten_hi(max, exclusive);
        }
        if let Some(exmax) = map.get("exclusiveMaximum").and_then(Value::as_f64) {
            bound.tighten_hi(exmax, true);
        }

        bound
    }

    fn tighten_lo(&mut self, value: f64, exclusive: bool) {
        match self.lo {
            Some(lo) if value < lo || (value == lo && !exclusive) => {}
            _ => {
                self.lo = Some(value);
                self.lo_exclusive = exclusive;
            }
        }
    }

    fn tighten_hi(&mut self, value: f64, exclusive: bool) {
        match self.hi {
            Some(hi) if value > hi || (value == hi && !exclusive) => {}
            _ => {
                self.hi = Some(value);
                self.hi_exclusive = exclusive;
            }
        }
    }

    /// An inverted bound admits no value at all.
    pub fn is_inverted(&self) -> bool {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => {
                lo > hi || (lo == hi && (self.lo_exclusive || self.hi_exclusive))
            }
            _ => false,
        }
    }

    /// The single admitted value, when the bound pins exactly one.
    pub fn single_value(&self) -> Option<f64> {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) if lo == hi && !self.lo_exclusive && !self.hi_exclusive => {
                Some(lo)
            }
            _ => None,
        }
    }

    /// Tighten the bound inward to the nearest integers. Exclusive endpoints
    /// that are already integral step by one; everything else rounds via
    /// `ceil`/`floor`. The result is always inclusive.
    pub fn to_integral(&self) -> Bound {
        let lo = self.lo.map(|lo| {
            if self.lo_exclusive && lo.fract() == 0.0 {
                lo + 1.0
            } else {
                lo.ceil()
            }
        });
        let hi = self.hi.map(|hi| {
            if self.hi_exclusive && hi.fract() == 0.0 {
                hi - 1.0
            } else {
                hi.floor()
            }
        });
        Bound {
            lo,
            lo_exclusive: false,
            hi,
            hi_exclusive: false,
        }
    }

    /// Whether any multiple of `step` lies within the bound. Unbounded sides
    /// always admit a multiple (for positive `step`).
    pub fn contains_multiple_of(&self, step: f64) -> bool {
        debug_assert!(step > 0.0);
        let (Some(lo), Some(hi)) = (self.lo, self.hi) else {
            return true;
        };

        // An open interval wider than one step always straddles a multiple,
        // and it keeps the quotients below out of the overflow range for
        // tiny steps.
        if hi - lo > step {
            return true;
        }

        let mut k_min = (lo / step).ceil();
        let mut k_max = (hi / step).floor();
        // Past 2^53 the quotient grid is coarser than 1, so the correction
        // loops cannot make progress; the multiples are then denser than
        // the representable numbers around the bound and one always fits.
        const SATURATED: f64 = 9_007_199_254_740_992.0;
        if !k_min.is_finite()
            || !k_max.is_finite()
            || k_min.abs() >= SATURATED
            || k_max.abs() >= SATURATED
        {
            return true;
        }
        while k_min * step < lo || (self.lo_exclusive && k_min * step == lo) {
            k_min += 1.0;
        }
        while k_max * step > hi || (self.hi_exclusive && k_max * step == hi) {
            k_max -= 1.0;
        }
        k_min <= k_max
    }
}
