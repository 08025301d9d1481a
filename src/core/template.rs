//! Flat `{name}` / `{name:spec}` template substitution.
//!
//! Unbound placeholders and malformed templates are reported as
//! [`TemplateError`].

use std::collections::HashMap;

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::ui::formatters::{float_format4w, pow_format5w, PowAlign, PowFormat};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("positional argument {0} is out of range")]
    PositionalOutOfRange(usize),

    #[error("unterminated placeholder starting at byte {0}")]
    UnterminatedPlaceholder(usize),

    #[error("unmatched '}}' at byte {0}")]
    UnmatchedClose(usize),

    #[error("invalid format spec {spec:?} for {{{name}}}")]
    InvalidSpec { name: String, spec: String },
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// Rendered through [`float_format4w`], then padded like a string.
    Fixed4(f64),
    /// Rendered through [`pow_format5w`], then padded like a string.
    Bytes5 { bytes: u64, binary: bool },
    /// Rendered through [`PowFormat`]; the spec is `[:][<>=][width]` and
    /// only the alignment character is used.
    Pow(PowFormat),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Str(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Str(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Int(value)
    }
}

impl From<i32> for TemplateValue {
    fn from(value: i32) -> Self {
        TemplateValue::Int(i64::from(value))
    }
}

impl From<u32> for TemplateValue {
    fn from(value: u32) -> Self {
        TemplateValue::Int(i64::from(value))
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Float(value)
    }
}

impl From<PowFormat> for TemplateValue {
    fn from(value: PowFormat) -> Self {
        TemplateValue::Pow(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        }
    }
}

/// `[[fill]align][width][.precision][type]`
#[derive(Debug, Clone, PartialEq)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    width: Option<usize>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut pos = 0;
        let mut fill = ' ';
        let mut align = None;

        if chars.len() >= 2 && Align::from_char(chars[1]).is_some() {
            fill = chars[0];
            align = Align::from_char(chars[1]);
            pos = 2;
        } else if let Some(a) = chars.first().and_then(|c| Align::from_char(*c)) {
            align = Some(a);
            pos = 1;
        }

        let width = take_number(&chars, &mut pos);

        let mut precision = None;
        if chars.get(pos) == Some(&'.') {
            pos += 1;
            precision = Some(take_number(&chars, &mut pos)?);
        }

        let mut kind = None;
        if let Some(c) = chars.get(pos) {
            if !matches!(c, 'f' | 'd' | 's') {
                return None;
            }
            kind = Some(*c);
            pos += 1;
        }

        if pos != chars.len() {
            return None;
        }

        Some(Self {
            fill,
            align,
            width,
            precision,
            kind,
        })
    }

    fn pad(&self, text: String, default_align: Align) -> String {
        let width = match self.width {
            Some(w) => w,
            None => return text,
        };
        let len = UnicodeWidthStr::width(text.as_str());
        if len >= width {
            return text;
        }
        let missing = width - len;
        let fill = |n: usize| self.fill.to_string().repeat(n);
        match self.align.unwrap_or(default_align) {
            Align::Left => format!("{}{}", text, fill(missing)),
            Align::Right => format!("{}{}", fill(missing), text),
            Align::Center => {
                let left = missing / 2;
                format!("{}{}{}", fill(left), text, fill(missing - left))
            }
        }
    }
}

/// `[:][<>=][width]`, every part optional.
fn is_pow_spec(spec: &str) -> bool {
    let spec = spec.strip_prefix(':').unwrap_or(spec);
    let spec = spec
        .strip_prefix(|c: char| PowAlign::from_char(c).is_some())
        .unwrap_or(spec);
    spec.chars().all(|c| c.is_ascii_digit())
}

fn take_number(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while chars.get(*pos).is_some_and(|c| c.is_ascii_digit()) {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    chars[start..*pos].iter().collect::<String>().parse().ok()
}

impl TemplateValue {
    /// Render this value for a placeholder called `name` with `spec`.
    pub fn format(&self, name: &str, spec: &str) -> Result<String, TemplateError> {
        let invalid = || TemplateError::InvalidSpec {
            name: name.to_string(),
            spec: spec.to_string(),
        };

        let parsed = || FormatSpec::parse(spec).ok_or_else(invalid);

        let text_spec = |text: &str| -> Result<String, TemplateError> {
            let fs = parsed()?;
            if !matches!(fs.kind, None | Some('s')) {
                return Err(invalid());
            }
            let text = match fs.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text.to_string(),
            };
            Ok(fs.pad(text, Align::Left))
        };

        match self {
            TemplateValue::Fixed4(v) => text_spec(&float_format4w(*v)),
            TemplateValue::Bytes5 { bytes, binary } => text_spec(&pow_format5w(*bytes, *binary)),
            TemplateValue::Pow(pf) => {
                if !is_pow_spec(spec) {
                    return Err(invalid());
                }
                Ok(pf.render(PowAlign::parse_spec(spec)))
            }
            TemplateValue::Str(s) => text_spec(s),
            TemplateValue::Int(i) => {
                let fs = parsed()?;
                let text = match (fs.kind, fs.precision) {
                    (None | Some('d'), None) => i.to_string(),
                    (Some('d'), Some(_)) | (Some('s'), _) => return Err(invalid()),
                    (_, precision) => format!("{:.*}", precision.unwrap_or(6), *i as f64),
                };
                Ok(fs.pad(text, Align::Right))
            }
            TemplateValue::Float(f) => {
                let fs = parsed()?;
                let text = match (fs.kind, fs.precision) {
                    (Some('d') | Some('s'), _) => return Err(invalid()),
                    (None, None) => f.to_string(),
                    (Some(_), None) => format!("{:.6}", f),
                    (_, Some(p)) => format!("{:.*}", p, f),
                };
                Ok(fs.pad(text, Align::Right))
            }
        }
    }
}

/// Values bound for one render: positional (`{}`, `{0}`) and named.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    positional: Vec<TemplateValue>,
    named: HashMap<String, TemplateValue>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<V: Into<TemplateValue>>(&mut self, value: V) -> &mut Self {
        self.positional.push(value.into());
        self
    }

    pub fn insert<K: Into<String>, V: Into<TemplateValue>>(&mut self, name: K, value: V) -> &mut Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.named.get(name)
    }

    pub fn positional(&self, index: usize) -> Option<&TemplateValue> {
        self.positional.get(index)
    }
}

/// Substitute every placeholder in `template` with its bound value.
pub fn render(template: &str, args: &TemplateArgs) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    let mut next_positional = 0;

    while let Some((start, c)) = chars.next() {
        match c {
            '{' => {
                if chars.peek().map(|(_, c)| *c) == Some('{') {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut field = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    field.push(c);
                }
                if !closed {
                    return Err(TemplateError::UnterminatedPlaceholder(start));
                }

                let (name, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                let value = if name.is_empty() {
                    let index = next_positional;
                    next_positional += 1;
                    args.positional(index)
                        .ok_or(TemplateError::PositionalOutOfRange(index))?
                } else if let Ok(index) = name.parse::<usize>() {
                    args.positional(index)
                        .ok_or(TemplateError::PositionalOutOfRange(index))?
                } else {
                    args.get(name)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?
                };
                out.push_str(&value.format(name, spec)?);
            }
            '}' => {
                if chars.peek().map(|(_, c)| *c) == Some('}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose(start));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
