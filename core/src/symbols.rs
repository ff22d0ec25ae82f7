use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConvertError, Result},
    source::AtomSource,
};

/// Element symbols for each atom type. Entry 0 belongs to atype 1.
///
/// Entries may be unset until the table is used for a conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable(Vec<Option<String>>);

impl SymbolTable {
    pub fn new(entries: Vec<Option<String>>) -> Self {
        Self(entries)
    }

    /// A table of `ntypes` unset entries
    pub fn unset(ntypes: usize) -> Self {
        Self(vec![None; ntypes])
    }

    /// A fully assigned table
    pub fn from_symbols<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self(symbols.into_iter().map(|s| Some(s.into())).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The symbol of a 1-based atom type, if it is set
    pub fn get(&self, atype: usize) -> Option<&str> {
        self.0.get(atype.checked_sub(1)?)?.as_deref()
    }

    pub fn entries(&self) -> &[Option<String>] {
        &self.0
    }

    /// Fails on the first entry that has no symbol.
    pub fn validate(&self) -> Result<()> {
        match self.0.iter().position(Option::is_none) {
            Some(index) => Err(ConvertError::MissingSymbol { atype: index + 1 }),
            None => Ok(()),
        }
    }

    /// Maps every atom type onto its symbol.
    ///
    /// The whole table must be assigned, including types that no atom uses.
    pub fn expand(&self, atypes: &[usize]) -> Result<Vec<String>> {
        self.validate()?;

        atypes
            .iter()
            .enumerate()
            .map(|(atom, &atype)| match atype {
                0 => Err(ConvertError::InvalidAtype { atom }),
                _ => self
                    .get(atype)
                    .map(str::to_owned)
                    .ok_or(ConvertError::AtypeOutOfRange {
                        atom,
                        atype,
                        ntypes: self.len(),
                    }),
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = Option<S>>>(iter: T) -> Self {
        Self(iter.into_iter().map(|s| s.map(Into::into)).collect())
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            if let Some(symbol) = entry {
                f.write_str(symbol)?;
            }
        }
        Ok(())
    }
}

/// Parses a comma separated list such as `Fe,O`. Blank entries stay unset.
impl FromStr for SymbolTable {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(s.split(',')
            .map(str::trim)
            .map(|symbol| (!symbol.is_empty()).then_some(symbol))
            .collect())
    }
}

/// Picks the explicit table when one is given, otherwise the one carried by `source`.
pub fn resolve<'a>(
    explicit: Option<&'a SymbolTable>,
    source: &'a impl AtomSource,
) -> &'a SymbolTable {
    explicit.unwrap_or_else(|| source.symbols())
}
