use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Number of wells in a clone label bank, e.g. `A1` to `A12`.
pub const CLONE_BANK_SIZE: usize = 12;

/// Spreadsheet style column label for a 1-based column number, e.g. `1` = `A`, `27` = `AA`.
///
/// Uses bijective base-26 numeration, there is no digit representing zero.
pub fn column_label(number: usize) -> String {
    assert!(number > 0, "column numbers are 1-based");

    let mut remaining = number;
    let mut label = vec![];
    while remaining > 0 {
        let remainder = (remaining - 1) % 26;
        remaining = (remaining - 1) / 26;
        label.push(char::from(b'A' + remainder as u8));
    }

    label.iter().rev().collect()
}

/// Inverse of [`column_label`], `None` if the value contains anything other than `A`-`Z`.
///
/// An empty value is `Some(0)`.
fn column_number(letters: &str) -> Option<usize> {
    letters.chars().try_fold(0_usize, |acc, c| {
        c.is_ascii_uppercase()
            .then(|| acc * 26 + (c as usize - 'A' as usize + 1))
    })
}

/// Label for the clone with the given 0-based rank within a column, e.g. `0` = `A1`, `12` = `B1`.
pub fn clone_label(rank: usize) -> String {
    let bank = rank / CLONE_BANK_SIZE;
    let number = rank % CLONE_BANK_SIZE + 1;

    format!("{}{}", column_label(bank + 1), number)
}

/// Natural sort key for clone labels, orders `A2` before `A12` and `A12` before `B1`.
///
/// Purely numeric labels (row numbers) have a bank of `0` and sort before lettered labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelKey {
    pub bank: usize,
    pub number: u64,
}

impl Display for LabelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.bank {
            0 => write!(f, "{}", self.number),
            bank => write!(f, "{}{}", column_label(bank), self.number),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label has no number. label: '{0}'")]
    MissingNumber(String),
    #[error("Label has invalid characters. label: '{0}'")]
    InvalidLabel(String),
}

pub fn label_to_key(value: &str) -> Result<LabelKey, LabelError> {
    let split_at = value
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| LabelError::MissingNumber(value.to_string()))?;

    let (letters, digits) = value.split_at(split_at);

    let bank = column_number(&letters.to_uppercase()).ok_or_else(|| LabelError::InvalidLabel(value.to_string()))?;
    let number = digits
        .parse::<u64>()
        .map_err(|_| LabelError::InvalidLabel(value.to_string()))?;

    Ok(LabelKey {
        bank,
        number,
    })
}

#[cfg(test)]
mod label_tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, "A")]
    #[case(2, "B")]
    #[case(26, "Z")]
    #[case(27, "AA")]
    #[case(52, "AZ")]
    #[case(53, "BA")]
    #[case(702, "ZZ")]
    #[case(703, "AAA")]
    fn column_labels(#[case] number: usize, #[case] expected: &str) {
        assert_eq!(column_label(number), expected);
    }

    #[rstest]
    #[case("A", Some(1))]
    #[case("AZ", Some(52))]
    #[case("", Some(0))]
    #[case("a", None)]
    #[case("A-", None)]
    fn column_numbers(#[case] letters: &str, #[case] expected: Option<usize>) {
        assert_eq!(column_number(letters), expected);
    }

    #[rstest]
    #[case(0, "A1")]
    #[case(1, "A2")]
    #[case(11, "A12")]
    #[case(12, "B1")]
    #[case(95, "H12")]
    #[case(311, "Z12")]
    #[case(312, "AA1")]
    fn clone_labels(#[case] rank: usize, #[case] expected: &str) {
        assert_eq!(clone_label(rank), expected);
    }

    #[rstest]
    #[case("A1", 1, 1)]
    #[case("a12", 1, 12)]
    #[case("B1", 2, 1)]
    #[case("17", 0, 17)]
    #[case("AA3", 27, 3)]
    fn label_keys(#[case] label: &str, #[case] bank: usize, #[case] number: u64) {
        assert_eq!(label_to_key(label), Ok(LabelKey { bank, number }));
    }

    #[test]
    fn label_without_number() {
        assert_eq!(label_to_key("AB"), Err(LabelError::MissingNumber("AB".to_string())));
    }

    #[test]
    fn label_with_trailing_garbage() {
        assert_eq!(label_to_key("A1x"), Err(LabelError::InvalidLabel("A1x".to_string())));
    }

    #[test]
    fn natural_ordering() {
        // given
        let mut labels = vec!["B1", "A12", "A2", "A1", "3"];

        // when
        labels.sort_by_key(|label| label_to_key(label).unwrap());

        // then
        assert_eq!(labels, vec!["3", "A1", "A2", "A12", "B1"]);
    }

    #[test]
    fn clone_label_round_trips_through_key() {
        for rank in [0, 5, 11, 12, 40, 320] {
            let label = clone_label(rank);
            let key = label_to_key(&label).unwrap();
            assert_eq!(key.to_string(), label);
        }
    }
}
