//! Numeric presentation helpers used by the template renderer.
//!
//! Three conventions are supported:
//! - [`PowFormat`]: SI/binary prefix scaling with optional alignment
//! - [`float_format4w`]: any float squeezed into exactly four characters
//! - [`pow_format5w`]: byte counts as a four character number plus a unit letter

const PREFIXES_DECIMAL: [&str; 6] = ["", "k", "M", "G", "T", "P"];
const PREFIXES_BINARY: [&str; 6] = ["", "K", "M", "G", "T", "P"];
const SIZE_UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Alignment requested through the `>`, `<` or `=` format-spec character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowAlign {
    /// `>`: pad the whole string on the left to the maximum width
    Right,
    /// `<`: pad the whole string on the right to the maximum width
    Left,
    /// `=`: pad the coefficient so the decimal point stays in place
    Explicit,
}

impl PowAlign {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(PowAlign::Right),
            '<' => Some(PowAlign::Left),
            '=' => Some(PowAlign::Explicit),
            _ => None,
        }
    }

    /// Parse a template spec such as `>`, `:=`, or `>9`.
    ///
    /// A trailing width is ignored; the padded width always comes from the
    /// unit.
    pub fn parse_spec(spec: &str) -> Option<Self> {
        let spec = spec.strip_prefix(':').unwrap_or(spec);
        spec.chars().next().and_then(Self::from_char)
    }
}

/// A magnitude rendered with a scaled SI (`k`, `M`, ...) or binary
/// (`Ki`, `Mi`, ...) prefix and one decimal digit.
#[derive(Debug, Clone, PartialEq)]
pub struct PowFormat {
    pub value: i64,
    pub unit: String,
    pub binary: bool,
}

impl PowFormat {
    pub fn new<S: Into<String>>(value: i64, unit: S, binary: bool) -> Self {
        Self {
            value,
            unit: unit.into(),
            binary,
        }
    }

    fn base(&self) -> f64 {
        if self.binary {
            1024.0
        } else {
            1000.0
        }
    }

    /// Scale the value down, returning the coefficient and the prefix index.
    pub fn scaled(&self) -> (f64, usize) {
        let base = self.base();
        let mut fraction = self.value as f64;
        let mut pow = 0;
        while pow + 1 < PREFIXES_DECIMAL.len() && fraction / base >= 1.0 {
            fraction /= base;
            pow += 1;
        }
        (fraction, pow)
    }

    fn prefix(&self, pow: usize) -> String {
        if self.binary {
            let mut prefix = PREFIXES_BINARY[pow].to_string();
            if pow > 0 {
                prefix.push('i');
            }
            prefix
        } else {
            PREFIXES_DECIMAL[pow].to_string()
        }
    }

    /// Characters reserved for the coefficient (`{:.1}` plus a possible 4th
    /// integer digit in binary mode).
    pub fn number_width(&self) -> usize {
        5 + usize::from(self.binary)
    }

    /// Widest string this value can produce for its unit.
    pub fn max_width(&self) -> usize {
        self.number_width() + 1 + usize::from(self.binary) + self.unit.chars().count()
    }

    pub fn render(&self, align: Option<PowAlign>) -> String {
        let (fraction, pow) = self.scaled();
        let prefix = self.prefix(pow);
        match align {
            None => format!("{:.1}{}{}", fraction, prefix, self.unit),
            Some(PowAlign::Right) => {
                format!("{:>width$}", self.render(None), width = self.max_width())
            }
            Some(PowAlign::Left) => {
                format!("{:<width$}", self.render(None), width = self.max_width())
            }
            Some(PowAlign::Explicit) => {
                let padding = match (pow, self.binary) {
                    (0, true) => "  ",
                    (0, false) => " ",
                    _ => "",
                };
                format!(
                    "{:<width$.1}{}{}{}",
                    fraction,
                    padding,
                    prefix,
                    self.unit,
                    width = self.number_width()
                )
            }
        }
    }
}

impl std::fmt::Display for PowFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Render a float into exactly four characters.
///
/// `>= 100` has no decimals, `[10, 100)` one, below 10 two. Longer results are
/// truncated and shorter ones are left-padded with spaces.
pub fn float_format4w(value: f64) -> String {
    let formatted = if value >= 100.0 {
        format!("{:.0}", value.round())
    } else if value >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    };

    let len = formatted.chars().count();
    if len > 4 {
        formatted.chars().take(4).collect()
    } else {
        format!("{:>4}", formatted)
    }
}

/// Render a byte count as `<4 chars><unit letter>`, e.g. `" 1.5G"`.
///
/// Anything below 10 bytes is shown as `0.00K`.
pub fn pow_format5w(bytes: u64, binary: bool) -> String {
    let base = if binary { 1024.0 } else { 1000.0 };
    let mut size = bytes as f64;

    if size < 10.0 {
        return "0.00K".to_string();
    }

    let mut unit_idx: Option<usize> = None;
    while size >= base && unit_idx.map_or(true, |idx| idx < SIZE_UNITS.len() - 1) {
        size /= base;
        unit_idx = Some(unit_idx.map_or(0, |idx| idx + 1));
    }

    let unit_idx = match unit_idx {
        Some(idx) => idx,
        None => {
            size /= base;
            0
        }
    };

    format!("{}{}", float_format4w(size), SIZE_UNITS[unit_idx])
}
