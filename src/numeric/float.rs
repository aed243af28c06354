use num_bigint::BigUint;

/// IEEE 754 bit layout constants for one binary float format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatSpec {
    pub exp_bits: u32,
    pub mantissa_bits: u32,
    pub bias: i32,
}

/// binary16: 1 sign + 5 exponent + 10 mantissa bits
pub const F16_SPEC: FloatSpec = FloatSpec {
    exp_bits: 5,
    mantissa_bits: 10,
    bias: 15,
};

/// binary32: 1 sign + 8 exponent + 23 mantissa bits
pub const F32_SPEC: FloatSpec = FloatSpec {
    exp_bits: 8,
    mantissa_bits: 23,
    bias: 127,
};

/// binary64: 1 sign + 11 exponent + 52 mantissa bits
pub const F64_SPEC: FloatSpec = FloatSpec {
    exp_bits: 11,
    mantissa_bits: 52,
    bias: 1023,
};

impl FloatSpec {
    pub fn exp_mask(&self) -> u64 {
        (1u64 << self.exp_bits) - 1
    }

    pub fn mantissa_mask(&self) -> u64 {
        (1u64 << self.mantissa_bits) - 1
    }

    pub fn mantissa_msb_mask(&self) -> u64 {
        1u64 << (self.mantissa_bits - 1)
    }
}

/// Decoded components of one floating point bit pattern.
///
/// For finite values the invariant holds exactly:
/// `value = (-1)^sign * significand * 2^real_exponent`.
///
/// Normal numbers restore the implicit leading 1 into the significand and
/// use `raw_exp - bias - mantissa_bits` as the real exponent. Subnormals
/// keep the mantissa as-is (implicit leading 0) and use the minimum
/// exponent, `1 - bias - mantissa_bits`.
#[derive(Debug, Clone, Copy)]
pub struct FloatInfo {
    pub spec: FloatSpec,
    pub negative: bool,
    pub raw_exponent: u32,
    pub mantissa: u64,
    pub real_exponent: i32,
    pub significand: u64,
}

/// Classification of a bit pattern before numeric rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatClass {
    Finite,
    Infinity,
    QuietNaN,
    SignalingNaN,
}

impl FloatInfo {
    /// Decode a raw bit pattern under the given layout. The pattern sits in
    /// the low `1 + exp_bits + mantissa_bits` bits of `bits`.
    pub fn from_bits(bits: u64, spec: FloatSpec) -> FloatInfo {
        let sign_shift = spec.exp_bits + spec.mantissa_bits;
        let negative = (bits >> sign_shift) & 1 == 1;
        let raw_exponent = ((bits >> spec.mantissa_bits) & spec.exp_mask()) as u32;
        let mantissa = bits & spec.mantissa_mask();

        let subnormal = raw_exponent == 0;
        let real_exponent = raw_exponent as i32 - spec.bias
            + if subnormal { 1 } else { 0 }
            - spec.mantissa_bits as i32;
        let significand = if subnormal {
            mantissa
        } else {
            (1u64 << spec.mantissa_bits) | mantissa
        };

        FloatInfo {
            spec,
            negative,
            raw_exponent,
            mantissa,
            real_exponent,
            significand,
        }
    }

    pub fn classify(&self) -> FloatClass {
        if self.raw_exponent as u64 != self.spec.exp_mask() {
            FloatClass::Finite
        } else if self.mantissa == 0 {
            FloatClass::Infinity
        } else if self.mantissa & self.spec.mantissa_msb_mask() != 0 {
            FloatClass::QuietNaN
        } else {
            FloatClass::SignalingNaN
        }
    }

    pub fn is_subnormal(&self) -> bool {
        self.raw_exponent == 0 && self.mantissa != 0
    }

    /// Approximate value for the pattern-based (non-exact) formatting
    /// modes. Exact for every f16 and f32 input since f64 subsumes them.
    pub fn approx(&self) -> f64 {
        let magnitude = self.significand as f64 * (self.real_exponent as f64).exp2();
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

pub fn analyze_f32(value: f32) -> FloatInfo {
    FloatInfo::from_bits(value.to_bits() as u64, F32_SPEC)
}

pub fn analyze_f64(value: f64) -> FloatInfo {
    FloatInfo::from_bits(value.to_bits(), F64_SPEC)
}

pub fn analyze_f16_bits(bits: u16) -> FloatInfo {
    FloatInfo::from_bits(bits as u64, F16_SPEC)
}

/// The rendering for non-finite patterns, if the pattern is non-finite.
/// NaN payloads print the raw mantissa in unpadded uppercase hex, with the
/// quiet/signaling split taken from the mantissa's most significant bit.
pub fn special_form(info: &FloatInfo) -> Option<String> {
    match info.classify() {
        FloatClass::Finite => None,
        FloatClass::Infinity => Some(if info.negative {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        }),
        FloatClass::QuietNaN => Some(format!("QuietNaN(0x{:X})", info.mantissa)),
        FloatClass::SignalingNaN => Some(format!("SignalingNaN(0x{:X})", info.mantissa)),
    }
}

/// Exact decimal rendering: `D.DDD...E±EEE` with no binary-to-decimal
/// rounding. Reconstructs `significand * 2^real_exponent` in
/// arbitrary-precision integer arithmetic; a negative real exponent turns
/// the power of two into a power of five with a shifted decimal point
/// (`s * 2^-k = s * 5^k * 10^-k`). Subnormal doubles legitimately produce
/// hundreds of digits; nothing here truncates.
pub fn exact_decimal(info: &FloatInfo) -> String {
    let sign = if info.negative { "-" } else { "" };
    if info.significand == 0 {
        return format!("{}0.0E+000", sign);
    }

    let (digits, dec_exp) = if info.real_exponent >= 0 {
        let n = BigUint::from(info.significand) << info.real_exponent as u32;
        let s = n.to_string();
        let exp = s.len() as i32 - 1;
        (s, exp)
    } else {
        let k = (-info.real_exponent) as u32;
        let n = BigUint::from(info.significand) * BigUint::from(5u32).pow(k);
        let s = n.to_string();
        let exp = s.len() as i32 - 1 - k as i32;
        (s, exp)
    };

    let (first, rest) = digits.split_at(1);
    let rest = rest.trim_end_matches('0');
    let frac = if rest.is_empty() { "0" } else { rest };
    format!("{}{}.{}E{:+04}", sign, first, frac, dec_exp)
}

/// Hex-power rendering: `0x1.<mantissa hex>p±<exp>` for normals,
/// `0x0.<mantissa hex>p±<exp>` for subnormals and zero. Mirrors the binary
/// layout directly: the mantissa is left-aligned into whole hex digits and
/// the exponent is the unbiased power of two of the leading digit.
pub fn hex_power(info: &FloatInfo) -> String {
    let sign = if info.negative { "-" } else { "" };
    let nibbles = info.spec.mantissa_bits.div_ceil(4) as usize;
    let shift = nibbles as u32 * 4 - info.spec.mantissa_bits;
    let frac = info.mantissa << shift;

    let subnormal = info.raw_exponent == 0;
    let lead = if subnormal { '0' } else { '1' };
    let exp = if subnormal {
        1 - info.spec.bias
    } else {
        info.raw_exponent as i32 - info.spec.bias
    };

    format!(
        "{}0x{}.{:0width$X}p{:+04}",
        sign,
        lead,
        frac,
        exp,
        width = nibbles
    )
}

/// Numeric formatting style for floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    /// Shortest round-trip decimal, the `{}` rendering.
    Shortest,
    /// Bit-exact decimal scientific form (`EX`).
    Exact,
    /// IEEE 754 hex-power form (`HP`).
    HexPower,
    /// Fixed-point with the given number of fraction digits (`F2`).
    Fixed(usize),
    /// Scientific with the given number of fraction digits (`E5`).
    Scientific(usize),
    /// Fixed-point with group separators (`N2`).
    Grouped(usize),
}

impl Default for FloatStyle {
    fn default() -> Self {
        FloatStyle::Shortest
    }
}

impl FloatStyle {
    pub fn parse(spec: &str) -> FloatStyle {
        match spec {
            "" | "G" | "g" => return FloatStyle::Shortest,
            "EX" => return FloatStyle::Exact,
            "HP" => return FloatStyle::HexPower,
            _ => {}
        }
        let mut chars = spec.chars();
        let head = match chars.next() {
            Some(c) => c,
            None => return FloatStyle::Shortest,
        };
        let precision = chars.as_str().parse::<usize>().unwrap_or(2);
        match head {
            'F' | 'f' => FloatStyle::Fixed(precision),
            'E' | 'e' => FloatStyle::Scientific(precision),
            'N' | 'n' => FloatStyle::Grouped(precision),
            _ => FloatStyle::Shortest,
        }
    }
}

/// Separator pair consumed by the pattern-based float styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal: char,
    pub group: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale {
            decimal: '.',
            group: ',',
        }
    }
}

/// Pattern-based (human friendly, non-exact) decimal formatting.
pub fn pattern_decimal(value: f64, style: &FloatStyle, locale: &NumberLocale) -> String {
    match *style {
        FloatStyle::Fixed(p) => localize(format!("{:.prec$}", value, prec = p), locale, false),
        FloatStyle::Scientific(p) => {
            let raw = format!("{:.prec$e}", value, prec = p);
            let formatted = match raw.split_once('e') {
                Some((mantissa, exp)) => {
                    let exp: i32 = exp.parse().unwrap_or(0);
                    format!("{}E{:+04}", mantissa, exp)
                }
                None => raw,
            };
            localize(formatted, locale, false)
        }
        FloatStyle::Grouped(p) => localize(format!("{:.prec$}", value, prec = p), locale, true),
        _ => format!("{}", value),
    }
}

fn localize(rendered: String, locale: &NumberLocale, grouped: bool) -> String {
    if !grouped && locale.decimal == '.' {
        return rendered;
    }
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let int_digits = if grouped {
        group_digits(digits, locale.group)
    } else {
        digits.to_string()
    };

    match frac_part {
        Some(frac) => format!("{}{}{}{}", sign, int_digits, locale.decimal, frac),
        None => format!("{}{}", sign, int_digits),
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}
