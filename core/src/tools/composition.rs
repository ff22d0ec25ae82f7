use std::collections::BTreeMap;

use crate::error::{ConvertError, Result};

/// Builds a reduced composition string such as `Fe2O3`.
///
/// Counts of repeated symbols are merged, symbols are listed alphabetically and
/// the counts are divided by their greatest common divisor. A count of one is
/// left out and symbols with a count of zero are skipped.
pub fn composition_str<S: AsRef<str>>(
    symbols: impl IntoIterator<Item = S>,
    counts: impl IntoIterator<Item = usize>,
) -> Result<String> {
    let symbols = symbols.into_iter().collect::<Vec<_>>();
    let counts = counts.into_iter().collect::<Vec<_>>();

    if symbols.len() != counts.len() {
        return Err(ConvertError::LengthMismatch {
            what: "counts",
            expected: symbols.len(),
            found: counts.len(),
        });
    }

    let mut merged = BTreeMap::<&str, usize>::new();
    for (symbol, &count) in symbols.iter().zip(&counts) {
        *merged.entry(symbol.as_ref()).or_default() += count;
    }
    merged.retain(|_, count| *count > 0);

    let divisor = merged.values().copied().fold(0, gcd);
    if divisor == 0 {
        return Err(ConvertError::invalid("composition needs at least one atom"));
    }

    Ok(merged
        .into_iter()
        .map(|(symbol, count)| match count / divisor {
            1 => symbol.to_owned(),
            reduced => format!("{symbol}{reduced}"),
        })
        .collect())
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
