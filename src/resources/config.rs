//! Config-node store and typed accessors.
//!
//! A [`ConfigNode`] is a named bag of `key = value` pairs (keys may repeat)
//! plus nested child nodes, parsed from brace-delimited text:
//!
//! ```text
//! PART
//! {
//!     name = tank
//!     node_stack_top = 0, 1.5, 0, 0, 1, 0, 2
//!     heightCurve
//!     {
//!         key = 0 0 0 0
//!         key = 1 2 0 0
//!     }
//! }
//! ```
//!
//! A value runs to the end of its line or a `//` comment, so braces inside a
//! value are plain text.
//!
//! Typed reads never fail: a missing key yields the caller's default, and a
//! value that does not parse is logged and replaced by the default.

use std::{fmt, str::FromStr};

use cgmath::Vector3;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace1, none_of, not_line_ending, space0},
    combinator::{cut, map, not, recognize, value},
    error::{VerboseError, VerboseErrorKind, context},
    multi::{fold_many0, many0_count},
    sequence::{pair, preceded, terminated},
};

use crate::{
    error::ConfigError,
    resources::{
        animation::FloatCurve, safe_parse_bool, safe_parse_f32, safe_parse_f64, safe_parse_i32,
    },
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigNode {
    pub name: String,
    values: Vec<(String, String)>,
    nodes: Vec<ConfigNode>,
}

/// A kind of value that can be read out of a [`ConfigNode`].
pub trait ConfigValue: Sized {
    /// Human readable kind, used in diagnostics.
    const KIND: &'static str;

    fn parse_value(raw: &str) -> Result<Self, ConfigError>;
}

impl ConfigNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parses config text into an unnamed root node holding the top-level
    /// values and nodes.
    pub fn parse(text: &str) -> Result<ConfigNode, ConfigError> {
        match terminated(body, ws_or_comment)(text) {
            Ok(("", root)) => Ok(root),
            Ok((rest, _)) => Err(syntax(line_of(text, rest), stray_message(rest))),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(syntax_from(text, &e)),
            Err(nom::Err::Incomplete(_)) => {
                Err(syntax(line_of(text, ""), "incomplete config text".to_string()))
            }
        }
    }

    pub fn add_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.push((key.into(), value.into()));
    }

    /// Overwrites the first value stored under `key`, or adds it.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.into(),
            None => self.add_value(key, value),
        }
    }

    pub fn add_node(&mut self, node: ConfigNode) -> &mut ConfigNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.iter().any(|node| node.name == name)
    }

    /// First value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in file order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn node(&self, name: &str) -> Option<&ConfigNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn nodes(&self, name: &str) -> impl Iterator<Item = &ConfigNode> {
        self.nodes.iter().filter(move |node| node.name == name)
    }

    pub fn all_nodes(&self) -> &[ConfigNode] {
        &self.nodes
    }

    /// `None` when `key` is absent, otherwise the parse result of its first value.
    pub fn try_get<T: ConfigValue>(&self, key: &str) -> Option<Result<T, ConfigError>> {
        self.value(key).map(T::parse_value)
    }

    pub fn get<T: ConfigValue>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            None => default,
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                log::warn!(
                    "Config '{}' key '{}' is not a valid {}: {}. Using the default.",
                    self.name,
                    key,
                    T::KIND,
                    e
                );
                default
            }
        }
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or(default).to_string()
    }

    pub fn string_values(&self, key: &str, reverse: bool) -> Vec<String> {
        let mut values: Vec<String> = self.values(key).into_iter().map(str::to_string).collect();
        if reverse {
            values.reverse();
        }
        values
    }

    pub fn string_values_or(&self, key: &str, defaults: &[&str], reverse: bool) -> Vec<String> {
        if self.has_value(key) {
            return self.string_values(key, reverse);
        }
        defaults.iter().map(|s| s.to_string()).collect()
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default)
    }

    /// One bool per repeated `key`, each parsed leniently.
    pub fn bool_values(&self, key: &str) -> Vec<bool> {
        self.values(key).into_iter().map(safe_parse_bool).collect()
    }

    pub fn float(&self, key: &str, default: f32) -> f32 {
        self.get(key, default)
    }

    pub fn double(&self, key: &str, default: f64) -> f64 {
        self.get(key, default)
    }

    pub fn int(&self, key: &str, default: i32) -> i32 {
        self.get(key, default)
    }

    /// One int per repeated `key`, each parsed leniently.
    pub fn int_values(&self, key: &str, defaults: &[i32]) -> Vec<i32> {
        let values = self.values(key);
        if values.is_empty() {
            return defaults.to_vec();
        }
        values.into_iter().map(safe_parse_i32).collect()
    }

    /// Comma separated floats; unparsable elements become 0.
    pub fn float_values(&self, key: &str, defaults: &[f32]) -> Vec<f32> {
        match self.value(key) {
            Some(value) if !value.is_empty() => value.split(',').map(safe_parse_f32).collect(),
            _ => defaults.to_vec(),
        }
    }

    /// Comma separated floats; any unparsable element discards the whole value.
    pub fn float_values_csv(&self, key: &str, defaults: &[f32]) -> Vec<f32> {
        if !self.has_value(key) {
            return defaults.to_vec();
        }
        self.get(key, defaults.to_vec())
    }

    pub fn vector3(&self, key: &str, default: Vector3<f32>) -> Vector3<f32> {
        let Some(value) = self.value(key) else {
            return default;
        };
        let fields: Vec<&str> = value.split(',').collect();
        if fields.len() < 3 {
            log::error!(
                "Could not parse a vector from '{}' for key '{}': found fewer than 3 values",
                value,
                key
            );
            return default;
        }
        Vector3::new(
            safe_parse_f64(fields[0]) as f32,
            safe_parse_f64(fields[1]) as f32,
            safe_parse_f64(fields[2]) as f32,
        )
    }

    pub fn color(&self, key: &str, default: Color) -> Color {
        self.color_channels(key)
            .map(|[r, g, b, a]| Color::new(r, g, b, a))
            .unwrap_or(default)
    }

    /// Color stored as 0-255 channel values.
    pub fn color_from_bytes(&self, key: &str, default: Color) -> Color {
        self.color_channels(key)
            .map(|[r, g, b, a]| Color::from_bytes(r, g, b, a))
            .unwrap_or(default)
    }

    pub fn axis(&self, key: &str, default: Axis) -> Axis {
        self.get(key, default)
    }

    /// Reads the child node `name` as a float curve, falling back to a copy
    /// of `default` or to the linear curve from (0, 0) to (1, 1).
    pub fn float_curve(&self, name: &str, default: Option<&FloatCurve>) -> FloatCurve {
        match (self.node(name), default) {
            (Some(node), _) => FloatCurve::from_node(node),
            (None, Some(default)) => default.clone(),
            (None, None) => FloatCurve::linear(),
        }
    }

    fn color_channels(&self, key: &str) -> Option<[f32; 4]> {
        if !self.has_value(key) {
            return None;
        }
        let channels = self.float_values_csv(key, &[]);
        match channels[..] {
            [r, g, b, a, ..] => Some([r, g, b, a]),
            _ => {
                log::error!(
                    "Color '{}' in config '{}' needs 4 channels, found {}",
                    key,
                    self.name,
                    channels.len()
                );
                None
            }
        }
    }
}

impl fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write_body(f, self, 0)
        } else {
            write_node(f, self, 0)
        }
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &ConfigNode, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);
    writeln!(f, "{indent}{}", node.name)?;
    writeln!(f, "{indent}{{")?;
    write_body(f, node, depth + 1)?;
    writeln!(f, "{indent}}}")
}

fn write_body(f: &mut fmt::Formatter<'_>, node: &ConfigNode, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);
    for (key, value) in &node.values {
        writeln!(f, "{indent}{key} = {value}")?;
    }
    for child in &node.nodes {
        write_node(f, child, depth)?;
    }
    Ok(())
}

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

enum Entry {
    Value(String, String),
    Node(ConfigNode),
}

fn comment(input: &str) -> ParseResult<'_, ()> {
    value((), pair(tag("//"), not_line_ending))(input)
}

fn ws_or_comment(input: &str) -> ParseResult<'_, ()> {
    value((), many0_count(alt((value((), multispace1), comment))))(input)
}

/// A value key or node name, up to the `=` or `{` that follows it.
fn key_or_name(input: &str) -> ParseResult<'_, &str> {
    map(
        take_while1(|c: char| !matches!(c, '=' | '{' | '}' | '/' | '\n' | '\r')),
        str::trim,
    )(input)
}

/// Rest of the line up to a trailing comment. Braces here are plain text.
fn line_value(input: &str) -> ParseResult<'_, String> {
    map(
        recognize(many0_count(preceded(not(tag("//")), none_of("\r\n")))),
        |raw: &str| raw.trim().to_string(),
    )(input)
}

fn node_body(input: &str) -> ParseResult<'_, ConfigNode> {
    preceded(
        pair(ws_or_comment, char('{')),
        cut(terminated(
            body,
            preceded(
                ws_or_comment,
                context("expected '}' to close the node", char('}')),
            ),
        )),
    )(input)
}

fn entry(input: &str) -> ParseResult<'_, Entry> {
    let (input, key) = key_or_name(input)?;
    let (input, _) = space0(input)?;
    cut(context(
        "expected '=' or '{' after a name",
        alt((
            map(preceded(char('='), line_value), |raw| {
                Entry::Value(key.to_string(), raw)
            }),
            map(node_body, |mut node| {
                node.name = key.to_string();
                Entry::Node(node)
            }),
        )),
    ))(input)
}

fn body(input: &str) -> ParseResult<'_, ConfigNode> {
    fold_many0(
        preceded(ws_or_comment, entry),
        ConfigNode::default,
        |mut node, entry| {
            match entry {
                Entry::Value(key, value) => node.add_value(key, value),
                Entry::Node(child) => node.nodes.push(child),
            }
            node
        },
    )(input)
}

/// 1-based line of `rest` inside `text`; the last line when only
/// whitespace is left.
fn line_of(text: &str, rest: &str) -> usize {
    if rest.trim().is_empty() {
        return text.lines().count().max(1);
    }
    let consumed = &text[..text.len() - rest.len()];
    consumed.matches('\n').count() + 1
}

fn stray_message(rest: &str) -> String {
    match rest.chars().next() {
        Some('}') => "unmatched '}'".to_string(),
        Some('{') => "'{' without a node name".to_string(),
        Some('=') => "value without a key".to_string(),
        _ => format!("unexpected text '{}'", rest.lines().next().unwrap_or_default()),
    }
}

/// Reports the innermost failure position with the innermost context message.
fn syntax_from(text: &str, err: &VerboseError<&str>) -> ConfigError {
    let at = err.errors.first().map(|(input, _)| *input).unwrap_or_default();
    let message = err
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(message) => Some(*message),
            _ => None,
        })
        .unwrap_or("malformed config text");
    syntax(line_of(text, at), message.to_string())
}

fn syntax(line: usize, message: String) -> ConfigError {
    ConfigError::Syntax { line, message }
}

/// Splits a comma separated value into at least `expected` strictly parsed floats.
fn parse_fields(raw: &str, expected: usize) -> Result<Vec<f32>, ConfigError> {
    let fields = raw
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::invalid(field, f32::KIND))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fields.len() < expected {
        return Err(ConfigError::TooFewFields {
            value: raw.to_string(),
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

impl ConfigValue for String {
    const KIND: &'static str = "string";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        Ok(raw.to_string())
    }
}

impl ConfigValue for bool {
    const KIND: &'static str = "bool";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConfigError::invalid(raw, Self::KIND))
        }
    }
}

macro_rules! numeric_config_value {
    ($ty:ty, $kind:literal) => {
        impl ConfigValue for $ty {
            const KIND: &'static str = $kind;

            fn parse_value(raw: &str) -> Result<Self, ConfigError> {
                raw.trim()
                    .parse::<$ty>()
                    .map_err(|_| ConfigError::invalid(raw, Self::KIND))
            }
        }
    };
}

numeric_config_value!(f32, "float");
numeric_config_value!(f64, "double");
numeric_config_value!(i32, "int");

impl ConfigValue for Vec<f32> {
    const KIND: &'static str = "float list";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        parse_fields(raw, 0)
    }
}

impl ConfigValue for Vector3<f32> {
    const KIND: &'static str = "vector";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        let fields = parse_fields(raw, 3)?;
        Ok(Vector3::new(fields[0], fields[1], fields[2]))
    }
}

impl ConfigValue for Color {
    const KIND: &'static str = "color";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        let fields = parse_fields(raw, 4)?;
        Ok(Color::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

impl ConfigValue for Axis {
    const KIND: &'static str = "axis";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        raw.parse()
    }
}

impl ConfigValue for FloatCurve {
    const KIND: &'static str = "float curve";

    fn parse_value(raw: &str) -> Result<Self, ConfigError> {
        FloatCurve::from_single_line(raw)
    }
}

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(r / 255.0, g / 255.0, b / 255.0, a / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A signed principal axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    XPlus,
    XNeg,
    YPlus,
    YNeg,
    #[default]
    ZPlus,
    ZNeg,
}

impl Axis {
    pub const ALL: [Axis; 6] = [
        Axis::XPlus,
        Axis::XNeg,
        Axis::YPlus,
        Axis::YNeg,
        Axis::ZPlus,
        Axis::ZNeg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Axis::XPlus => "XPlus",
            Axis::XNeg => "XNeg",
            Axis::YPlus => "YPlus",
            Axis::YNeg => "YNeg",
            Axis::ZPlus => "ZPlus",
            Axis::ZNeg => "ZNeg",
        }
    }

    /// Unit vector of this axis in local space.
    pub fn local_vector(self) -> Vector3<f32> {
        match self {
            Axis::XPlus => Vector3::new(1.0, 0.0, 0.0),
            Axis::XNeg => Vector3::new(-1.0, 0.0, 0.0),
            Axis::YPlus => Vector3::new(0.0, 1.0, 0.0),
            Axis::YNeg => Vector3::new(0.0, -1.0, 0.0),
            Axis::ZPlus => Vector3::new(0.0, 0.0, 1.0),
            Axis::ZNeg => Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

impl FromStr for Axis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Axis::ALL
            .into_iter()
            .find(|axis| axis.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::UnknownVariant {
                value: s.to_string(),
                kind: "axis",
            })
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
