use num_bigint::BigInt;
use num_bigint::Sign;

/// Integer rendering style: radix plus optional zero-pad width.
///
/// Parsed from the compact specifier syntax used by the config surface:
/// `D` (decimal), `B`/`b` (binary), `Q`/`q` (quaternary), `O`/`o` (octal),
/// `X`/`x` (hex, case controls digit case), each optionally followed by a
/// pad width, e.g. `X4` renders 42 as `0x002A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntStyle {
    Decimal { width: usize },
    Binary { width: usize },
    Quaternary { width: usize },
    Octal { width: usize },
    Hex { upper: bool, width: usize },
}

impl Default for IntStyle {
    fn default() -> Self {
        IntStyle::Decimal { width: 0 }
    }
}

impl IntStyle {
    /// Parse a format specifier string. Unrecognized specifiers fall back
    /// to decimal, matching the permissive behavior of the config layer.
    pub fn parse(spec: &str) -> IntStyle {
        let mut chars = spec.chars();
        let head = match chars.next() {
            Some(c) => c,
            None => return IntStyle::default(),
        };
        let width = chars.as_str().parse::<usize>().unwrap_or(0);
        match head {
            'D' | 'd' => IntStyle::Decimal { width },
            'B' | 'b' => IntStyle::Binary { width },
            'Q' | 'q' => IntStyle::Quaternary { width },
            'O' | 'o' => IntStyle::Octal { width },
            'X' => IntStyle::Hex { upper: true, width },
            'x' => IntStyle::Hex { upper: false, width },
            _ => IntStyle::default(),
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            IntStyle::Decimal { .. } => "",
            IntStyle::Binary { .. } => "0b",
            IntStyle::Quaternary { .. } => "0q",
            IntStyle::Octal { .. } => "0o",
            IntStyle::Hex { .. } => "0x",
        }
    }

    fn width(&self) -> usize {
        match self {
            IntStyle::Decimal { width }
            | IntStyle::Binary { width }
            | IntStyle::Quaternary { width }
            | IntStyle::Octal { width }
            | IntStyle::Hex { width, .. } => *width,
        }
    }
}

/// Render a sign-and-magnitude integer. Negative values are a leading `-`
/// followed by the unsigned magnitude in the chosen radix, never
/// two's-complement text.
pub fn format_integer(negative: bool, magnitude: u128, style: &IntStyle) -> String {
    let digits = match style {
        IntStyle::Decimal { .. } => magnitude.to_string(),
        IntStyle::Binary { .. } => format!("{:b}", magnitude),
        IntStyle::Quaternary { .. } => quaternary_digits(magnitude),
        IntStyle::Octal { .. } => format!("{:o}", magnitude),
        IntStyle::Hex { upper: true, .. } => format!("{:X}", magnitude),
        IntStyle::Hex { upper: false, .. } => format!("{:x}", magnitude),
    };
    assemble(negative, digits, style)
}

/// Render an arbitrary-precision integer through the same radix paths.
pub fn format_big_integer(value: &BigInt, style: &IntStyle) -> String {
    let negative = value.sign() == Sign::Minus;
    let mag = value.magnitude();
    let digits = match style {
        IntStyle::Decimal { .. } => mag.to_string(),
        IntStyle::Binary { .. } => mag.to_str_radix(2),
        IntStyle::Quaternary { .. } => mag.to_str_radix(4),
        IntStyle::Octal { .. } => mag.to_str_radix(8),
        IntStyle::Hex { upper, .. } => {
            let s = mag.to_str_radix(16);
            if *upper {
                s.to_uppercase()
            } else {
                s
            }
        }
    };
    assemble(negative, digits, style)
}

fn assemble(negative: bool, mut digits: String, style: &IntStyle) -> String {
    let width = style.width();
    if digits.len() < width {
        let mut padded = "0".repeat(width - digits.len());
        padded.push_str(&digits);
        digits = padded;
    }
    let sign = if negative { "-" } else { "" };
    format!("{}{}{}", sign, style.prefix(), digits)
}

fn quaternary_digits(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(b'0' + (n & 3) as u8);
        n >>= 2;
    }
    digits.reverse();
    // Digits are always ASCII 0-3
    String::from_utf8_lossy(&digits).into_owned()
}
