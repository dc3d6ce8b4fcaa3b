//! Text layout helpers shared by the matrix and alignment printers.
//!
//! [`elastic_tabs`] resolves tab-separated cells into space-padded columns
//! (elastic tab stops), and [`format_g`] formats floats in the compact `%g`
//! style used for scores.

// ---------------------------------------------------------------------------
// Elastic tab stops
// ---------------------------------------------------------------------------

/// Align tab-separated cells into columns.
///
/// Each line is split on `\t`. Every cell except the last one on a line is
/// terminated, and terminated cells in the same column form a *column block*
/// for as long as consecutive lines keep a terminated cell in that column.
/// All cells of a block are left-aligned and padded with spaces to the block
/// width, `max(min_width, widest cell + padding)`. The trailing cell of a
/// line is never padded. Blocks nest: a column block is only formed among
/// lines that belong to the same block one column to the left.
///
/// ```
/// use pal_align::render::elastic_tabs;
///
/// let text = "Query\t1\tACGT\nSubject\t10\tAC-T";
/// assert_eq!(elastic_tabs(text, 1, 1), "Query   1  ACGT\nSubject 10 AC-T");
/// ```
pub fn elastic_tabs(text: &str, min_width: usize, padding: usize) -> String {
    let lines: Vec<Vec<&str>> = text
        .split('\n')
        .map(|line| line.split('\t').collect())
        .collect();
    let mut layout = TabLayout {
        lines: &lines,
        min_width,
        padding,
        widths: Vec::new(),
        out: String::with_capacity(text.len() * 2),
    };
    layout.format(0, lines.len());
    layout.out
}

struct TabLayout<'a> {
    lines: &'a [Vec<&'a str>],
    min_width: usize,
    padding: usize,
    widths: Vec<usize>,
    out: String,
}

impl TabLayout<'_> {
    /// Number of terminated cells on a line.
    fn terminated(&self, line: usize) -> usize {
        self.lines[line].len() - 1
    }

    fn format(&mut self, mut line0: usize, line1: usize) {
        let column = self.widths.len();
        let mut this = line0;
        while this < line1 {
            if column >= self.terminated(this) {
                this += 1;
                continue;
            }
            // A block starts here: flush everything above it at the current depth.
            self.write_lines(line0, this);
            line0 = this;

            let mut width = self.min_width;
            while this < line1 && column < self.terminated(this) {
                let cell = self.lines[this][column];
                width = width.max(cell.chars().count() + self.padding);
                this += 1;
            }

            self.widths.push(width);
            self.format(line0, this);
            self.widths.pop();
            line0 = this;
        }
        self.write_lines(line0, line1);
    }

    fn write_lines(&mut self, line0: usize, line1: usize) {
        for i in line0..line1 {
            let cells = &self.lines[i];
            for (j, cell) in cells.iter().enumerate() {
                self.out.push_str(cell);
                if j + 1 < cells.len() && j < self.widths.len() {
                    let pad = self.widths[j].saturating_sub(cell.chars().count());
                    self.out.extend(std::iter::repeat(' ').take(pad));
                }
            }
            if i + 1 < self.lines.len() {
                self.out.push('\n');
            }
        }
    }
}

// ---------------------------------------------------------------------------
// %g float formatting
// ---------------------------------------------------------------------------

/// Format a float the way C's `%g` conversion does.
///
/// With `precision = Some(p)` the value is rounded to `p` significant digits;
/// with `None` the shortest representation that round-trips is used. Trailing
/// zeros are dropped. Exponent form (`1.5e+07`, at least two exponent digits)
/// is chosen when the decimal exponent is below -4 or at least the
/// precision (6 for the shortest form).
///
/// ```
/// use pal_align::render::format_g;
///
/// assert_eq!(format_g(19.0, None), "19");
/// assert_eq!(format_g(1000.0, Some(3)), "1e+03");
/// assert_eq!(format_g(-0.5, Some(3)), "-0.5");
/// ```
pub fn format_g(value: f64, precision: Option<usize>) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = match precision {
        Some(p) => format!("{:.*e}", p.max(1) - 1, value.abs()),
        None => format!("{:e}", value.abs()),
    };
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: Vec<u8> = mantissa.bytes().filter(|&b| b != b'.').collect();
    let nd = digits
        .iter()
        .rposition(|&b| b != b'0')
        .map_or(1, |last| last + 1);
    let digits = &digits[..nd];

    let nd = nd as i32;
    let dp = exponent + 1;
    let prec = precision.map_or(nd, |p| p.max(1) as i32);
    let mut eprec = prec;
    if eprec > nd && nd >= dp {
        eprec = nd;
    }
    if precision.is_none() {
        eprec = 6;
    }

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    if exponent < -4 || exponent >= eprec {
        push_exponent_form(&mut out, digits, prec.min(nd) - 1, exponent);
    } else {
        let prec = if prec > dp { nd } else { prec };
        push_fixed_form(&mut out, digits, dp, (prec - dp).max(0));
    }
    out
}

fn digit_at(digits: &[u8], index: i32) -> char {
    if index >= 0 && (index as usize) < digits.len() {
        digits[index as usize] as char
    } else {
        '0'
    }
}

fn push_exponent_form(out: &mut String, digits: &[u8], decimals: i32, exponent: i32) {
    out.push(digit_at(digits, 0));
    if decimals > 0 {
        out.push('.');
        for k in 1..=decimals {
            out.push(digit_at(digits, k));
        }
    }
    out.push('e');
    out.push(if exponent < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", exponent.abs()));
}

fn push_fixed_form(out: &mut String, digits: &[u8], dp: i32, decimals: i32) {
    if dp > 0 {
        for k in 0..dp {
            out.push(digit_at(digits, k));
        }
    } else {
        out.push('0');
    }
    if decimals > 0 {
        out.push('.');
        for k in 0..decimals {
            out.push(digit_at(digits, dp + k));
        }
    }
}

/// `word` with `suffix` appended unless `count` is exactly one.
pub(crate) fn plural(word: &str, suffix: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}{suffix}")
    }
}
