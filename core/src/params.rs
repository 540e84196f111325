//! Parameter store and the widget-level controls that guard it.
//!
//! RULE: Bounds are enforced by `ControlSpec::accept` (the input widget).
//! `ParameterSet::set` trusts its caller and never re-validates.

use crate::error::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single adjustable value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Flag(_)   => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b)   => Some(*b),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self { Self::Number(v) }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self { Self::Flag(b) }
}

/// Declared shape of one input widget.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlSpec {
    pub name:  &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind:  ControlKind,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ControlKind {
    Slider {
        min:     f64,
        max:     f64,
        step:    f64,
        default: f64,
    },
    Toggle {
        default: bool,
    },
}

impl ControlSpec {
    pub fn slider(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Self {
        debug_assert!(min <= default && default <= max, "default outside bounds for {name}");
        Self { name, label, kind: ControlKind::Slider { min, max, step, default } }
    }

    pub fn toggle(name: &'static str, label: &'static str, default: bool) -> Self {
        Self { name, label, kind: ControlKind::Toggle { default } }
    }

    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ControlKind::Slider { default, .. } => ParamValue::Number(default),
            ControlKind::Toggle { default }     => ParamValue::Flag(default),
        }
    }

    /// Validate raw widget input. Out-of-bounds and mistyped values are
    /// rejected; in-bounds numbers are snapped onto the step grid.
    pub fn accept(&self, raw: ParamValue) -> VizResult<ParamValue> {
        match (self.kind.clone(), raw) {
            (ControlKind::Toggle { .. }, ParamValue::Flag(b)) => Ok(ParamValue::Flag(b)),
            (ControlKind::Toggle { .. }, ParamValue::Number(_)) => {
                Err(VizError::ParameterTypeMismatch { name: self.name.into(), expected: "boolean" })
            }
            (ControlKind::Slider { .. }, ParamValue::Flag(_)) => {
                Err(VizError::ParameterTypeMismatch { name: self.name.into(), expected: "numeric" })
            }
            (ControlKind::Slider { min, max, step, .. }, ParamValue::Number(v)) => {
                if !v.is_finite() || v < min || v > max {
                    return Err(VizError::ParameterOutOfBounds {
                        name: self.name.into(),
                        value: v,
                        min,
                        max,
                    });
                }
                Ok(ParamValue::Number(snap_to_step(v, min, max, step)))
            }
        }
    }
}

fn snap_to_step(v: f64, min: f64, max: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return v;
    }
    let steps = (v - min) / step;
    // Values already on the grid pass through untouched so that
    // get() returns exactly what the widget sent.
    if (steps - steps.round()).abs() < 1e-9 {
        return v;
    }
    let snapped = min + steps.round() * step;
    let factor = 10f64.powi(step_decimals(step));
    ((snapped * factor).round() / factor).clamp(min, max)
}

/// Decimal places needed to write `step` exactly, capped at 9.
fn step_decimals(step: f64) -> i32 {
    (0..9)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-9
        })
        .unwrap_or(9)
}

/// Current values for one concept instance, keyed by parameter name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// Build a set seeded with each control's default.
    pub fn from_controls(controls: &[ControlSpec]) -> Self {
        let values = controls
            .iter()
            .map(|c| (c.name.to_string(), c.default_value()))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// Store a value. The key must already exist; parameter keys are
    /// fixed per concept.
    pub fn set(&mut self, name: &str, value: ParamValue) -> VizResult<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VizError::UnknownParameter { name: name.into() }),
        }
    }

    /// Numeric value, or 0.0 if absent or boolean.
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    /// Boolean value, or false if absent or numeric.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}
