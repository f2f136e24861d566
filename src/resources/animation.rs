//! Keyframed float curves.

use std::fmt::Write;

use crate::{error::ConfigError, resources::config::ConfigNode, resources::safe_parse_f32};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Keys sorted by time; no two keys share a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatCurve {
    keys: Vec<Keyframe>,
}

impl FloatCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight line from (0, 0) to (1, 1).
    pub fn linear() -> Self {
        let mut curve = Self::new();
        curve.add_with_tangents(0.0, 0.0, 1.0, 1.0);
        curve.add_with_tangents(1.0, 1.0, 1.0, 1.0);
        curve
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Adds a key with flat tangents.
    pub fn add(&mut self, time: f32, value: f32) -> bool {
        self.add_with_tangents(time, value, 0.0, 0.0)
    }

    /// Inserts a key in time order. Returns `false` if a key already exists at `time`
    /// or `time` is NaN.
    pub fn add_with_tangents(
        &mut self,
        time: f32,
        value: f32,
        in_tangent: f32,
        out_tangent: f32,
    ) -> bool {
        if time.is_nan() {
            return false;
        }
        match self.keys.binary_search_by(|key| key.time.total_cmp(&time)) {
            Ok(_) => false,
            Err(idx) => {
                self.keys
                    .insert(idx, Keyframe::new(time, value, in_tangent, out_tangent));
                true
            }
        }
    }

    /// Cubic Hermite interpolation between the surrounding keys; clamped to
    /// the first and last values outside the key range.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }
        let next = self.keys.partition_point(|key| key.time <= time);
        let (Some(k0), Some(k1)) = (
            next.checked_sub(1).and_then(|prev| self.keys.get(prev)),
            self.keys.get(next),
        ) else {
            return last.value;
        };
        let dt = k1.time - k0.time;
        let t = (time - k0.time) / dt;
        let (t2, t3) = (t * t, t * t * t);
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * k0.value + h10 * dt * k0.out_tangent + h01 * k1.value + h11 * dt * k1.in_tangent
    }

    /// `time,value,in,out` groups joined by `:`.
    pub fn to_single_line(&self) -> String {
        self.keys
            .iter()
            .map(|key| {
                format!(
                    "{},{},{},{}",
                    key.time, key.value, key.in_tangent, key.out_tangent
                )
            })
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Appends the keys of a single-line curve. Nothing is added unless every
    /// group parses.
    pub fn load_single_line(&mut self, input: &str) -> Result<(), ConfigError> {
        if input.trim().is_empty() {
            return Ok(());
        }
        let keys = input
            .split(':')
            .map(parse_group)
            .collect::<Result<Vec<_>, _>>()?;
        for key in keys {
            if !self.add_with_tangents(key.time, key.value, key.in_tangent, key.out_tangent) {
                log::warn!("Curve key at time {} ignored", key.time);
            }
        }
        Ok(())
    }

    pub fn from_single_line(input: &str) -> Result<Self, ConfigError> {
        let mut curve = Self::new();
        curve.load_single_line(input)?;
        Ok(curve)
    }

    /// Reads repeated `key = time value [in out]` entries of `node`.
    pub fn from_node(node: &ConfigNode) -> Self {
        let mut curve = Self::new();
        for entry in node.values("key") {
            let fields: Vec<&str> = entry.split_whitespace().collect();
            match fields[..] {
                [time, value] => {
                    curve.add(safe_parse_f32(time), safe_parse_f32(value));
                }
                [time, value, in_tangent, ref rest @ ..] => {
                    let out_tangent = rest.first().copied().map(safe_parse_f32).unwrap_or(0.0);
                    curve.add_with_tangents(
                        safe_parse_f32(time),
                        safe_parse_f32(value),
                        safe_parse_f32(in_tangent),
                        out_tangent,
                    );
                }
                _ => log::warn!(
                    "Curve key '{}' in '{}' needs at least 2 values",
                    entry,
                    node.name
                ),
            }
        }
        curve
    }

    /// A node named `name` with one `key` entry per keyframe.
    pub fn to_node(&self, name: &str) -> ConfigNode {
        let mut node = ConfigNode::new(name);
        for key in &self.keys {
            node.add_value(
                "key",
                format!(
                    "{} {} {} {}",
                    key.time, key.value, key.in_tangent, key.out_tangent
                ),
            );
        }
        node
    }

    /// One newline-prefixed `time value in out` line per key.
    pub fn print(&self) -> String {
        let mut output = String::new();
        for key in &self.keys {
            let _ = write!(
                output,
                "\n{} {} {} {}",
                key.time, key.value, key.in_tangent, key.out_tangent
            );
        }
        output
    }
}

fn parse_group(group: &str) -> Result<Keyframe, ConfigError> {
    let values = group
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::invalid(field, "float"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values[..] {
        [time, value, in_tangent, out_tangent, ..] => {
            Ok(Keyframe::new(time, value, in_tangent, out_tangent))
        }
        _ => Err(ConfigError::TooFewFields {
            value: group.to_string(),
            expected: 4,
            found: values.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_stay_sorted_and_unique() {
        let mut curve = FloatCurve::new();
        assert!(curve.add(1.0, 10.0));
        assert!(curve.add(0.0, 5.0));
        assert!(!curve.add(1.0, 99.0));
        let times: Vec<f32> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0]);
    }

    #[test]
    fn evaluate_clamps_and_hits_keys() {
        let curve = FloatCurve::linear();
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(2.0), 1.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn short_group_is_rejected() {
        assert!(matches!(
            parse_group("1,2,3"),
            Err(ConfigError::TooFewFields { found: 3, .. })
        ));
    }
}
