//! Global configuration for chromsweep runtime behavior.
//!
//! The chromosome order is a process-wide default set once at startup from
//! the command line. Components that compare chromosome labels read it when
//! they are constructed, never inside the sweep loop.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};

use clap::ValueEnum;

/// Total order used to decide which chromosome "comes first".
///
/// Both inputs must be sorted with the same order the sweep uses, otherwise
/// the fast-forward logic skips records it should have counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChromOrder {
    /// Byte-wise string comparison (`sort -k1,1`): chr1, chr10, chr2.
    #[default]
    Lexicographic,
    /// Digit runs compared numerically (`sort -k1,1V`): chr1, chr2, chr10.
    Natural,
}

impl ChromOrder {
    /// Compare two chromosome labels under this order.
    #[inline]
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            ChromOrder::Lexicographic => a.cmp(b),
            ChromOrder::Natural => natural_cmp(a, b),
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ChromOrder::Lexicographic => 0,
            ChromOrder::Natural => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ChromOrder::Natural,
            _ => ChromOrder::Lexicographic,
        }
    }
}

static CHROM_ORDER: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide chromosome order.
///
/// # Example
///
/// ```
/// use chromsweep::config::{self, ChromOrder};
///
/// // Set at startup before any sweep is constructed
/// config::set_chrom_order(ChromOrder::Natural);
/// assert_eq!(config::chrom_order(), ChromOrder::Natural);
/// config::set_chrom_order(ChromOrder::Lexicographic);
/// ```
#[inline]
pub fn set_chrom_order(order: ChromOrder) {
    CHROM_ORDER.store(order.to_u8(), AtomicOrdering::Release);
}

/// Current process-wide chromosome order.
#[inline]
pub fn chrom_order() -> ChromOrder {
    ChromOrder::from_u8(CHROM_ORDER.load(AtomicOrdering::Acquire))
}

/// Natural ("version") comparison of chromosome labels.
///
/// Runs of ASCII digits compare by numeric value, everything else byte-wise.
/// Labels that tie numerically (e.g. `chr01` vs `chr1`) fall back to plain
/// string order so the comparison stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut x, mut y) = (a.as_bytes(), b.as_bytes());

    while !x.is_empty() && !y.is_empty() {
        if x[0].is_ascii_digit() && y[0].is_ascii_digit() {
            let xd = digit_run(x);
            let yd = digit_run(y);
            let xn = trim_zeros(&x[..xd]);
            let yn = trim_zeros(&y[..yd]);
            let ord = xn.len().cmp(&yn.len()).then_with(|| xn.cmp(yn));
            if ord != Ordering::Equal {
                return ord;
            }
            x = &x[xd..];
            y = &y[yd..];
        } else {
            match x[0].cmp(&y[0]) {
                Ordering::Equal => {
                    x = &x[1..];
                    y = &y[1..];
                }
                ord => return ord,
            }
        }
    }

    x.len().cmp(&y.len()).then_with(|| a.cmp(b))
}

#[inline]
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[inline]
fn trim_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&b| b == b'0').count();
    &digits[zeros..]
}
