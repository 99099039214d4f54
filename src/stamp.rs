//! Evidential stamps
//!
//! A stamp records where a sentence's evidence came from and when it holds:
//! an ordered evidential base of (nar-id, input-serial) entries, a creation
//! time, an occurrence time, and a tense tag. Two sentences whose stamps
//! share an evidence entry must not be combined by revision.

use std::fmt;

use crate::config::MAX_EVIDENTIAL_BASE_LENGTH;
use crate::time::Clock;

/// Occurrence time of sentences that hold outside time.
pub const ETERNAL: i64 = i32::MIN as i64;

/// Tense tag of an input sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tense {
    Past,
    Present,
    Future,
    Eternal,
    None,
}

/// Direction of the temporal interval added when deriving a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMark {
    /// Sequential conjunction and predictive copulas look forward.
    Advance,
    /// The retrospective implication looks backward.
    Recede,
}

/// One entry of the evidential base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evident {
    pub nar: i64,
    pub serial: i64,
}

impl fmt::Display for Evident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.nar, self.serial)
    }
}

/// Evidence provenance plus temporal metadata of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stamp {
    base: Vec<Evident>,
    creation: i64,
    occurrence: i64,
    tense: Tense,
}

impl Stamp {
    /// Stamp a fresh input sentence: one new evidence entry, occurrence
    /// time derived from the tense.
    pub fn input(clock: &Clock, tense: Tense, duration: i64) -> Self {
        let now = clock.now();
        let occurrence = match tense {
            Tense::Past => now - duration,
            Tense::Present => now,
            Tense::Future => now + duration,
            Tense::Eternal | Tense::None => ETERNAL,
        };
        Stamp {
            base: vec![Evident {
                nar: clock.nar_id(),
                serial: clock.next_serial(),
            }],
            creation: now,
            occurrence,
            tense,
        }
    }

    /// Combine two parent stamps into a derived stamp.
    ///
    /// The evidential bases are interleaved (zip then flatten) and cut to
    /// the maximum base length. The occurrence time is the later of the
    /// parents' (when both are temporal), shifted by the connector
    /// interval and the bias.
    pub fn derive(
        a: &Stamp,
        b: &Stamp,
        now: i64,
        mark: Option<TimeMark>,
        reverse_order: bool,
        time_bias: i64,
        duration: i64,
    ) -> Self {
        let mut base = Vec::with_capacity((a.base.len() + b.base.len()).min(
            MAX_EVIDENTIAL_BASE_LENGTH,
        ));
        let mut left = a.base.iter();
        let mut right = b.base.iter();
        loop {
            let l = left.next();
            let r = right.next();
            if l.is_none() && r.is_none() {
                break;
            }
            if let Some(e) = l {
                base.push(*e);
            }
            if let Some(e) = r {
                base.push(*e);
            }
            if base.len() >= MAX_EVIDENTIAL_BASE_LENGTH {
                base.truncate(MAX_EVIDENTIAL_BASE_LENGTH);
                break;
            }
        }

        let mut occurrence = match (a.occurrence == ETERNAL, b.occurrence == ETERNAL) {
            (true, true) => ETERNAL,
            (true, false) => b.occurrence,
            (false, true) => a.occurrence,
            (false, false) => a.occurrence.max(b.occurrence),
        };
        if occurrence != ETERNAL {
            let mut interval = match mark {
                Some(TimeMark::Advance) => duration,
                Some(TimeMark::Recede) => -duration,
                None => 0,
            };
            if reverse_order {
                interval = -interval;
            }
            occurrence += interval + time_bias;
        }

        let tense = if occurrence == ETERNAL {
            Tense::Eternal
        } else {
            a.tense
        };
        Stamp {
            base,
            creation: now,
            occurrence,
            tense,
        }
    }

    pub fn base(&self) -> &[Evident] {
        &self.base
    }

    pub fn creation(&self) -> i64 {
        self.creation
    }

    pub fn occurrence(&self) -> i64 {
        self.occurrence
    }

    pub fn tense(&self) -> Tense {
        self.tense
    }

    pub fn is_eternal(&self) -> bool {
        self.occurrence == ETERNAL
    }

    /// Whether the two evidential bases share an entry.
    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.base
            .iter()
            .any(|e| other.base.iter().any(|o| e.to_string() == o.to_string()))
    }

    /// Compare two stamps on the selected dimensions.
    pub fn equals(&self, other: &Stamp, creation: bool, occurrence: bool, evidence: bool) -> bool {
        (!creation || self.creation == other.creation)
            && (!occurrence || self.occurrence == other.occurrence)
            && (!evidence || self.base == other.base)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, e) in self.base.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "}}@{}", self.creation)?;
        if !self.is_eternal() {
            write!(f, ":{}", self.occurrence)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(entries: &[(i64, i64)], occurrence: i64) -> Stamp {
        Stamp {
            base: entries
                .iter()
                .map(|&(nar, serial)| Evident { nar, serial })
                .collect(),
            creation: 0,
            occurrence,
            tense: if occurrence == ETERNAL {
                Tense::Eternal
            } else {
                Tense::Present
            },
        }
    }

    #[test]
    fn test_input_stamp_tenses() {
        let clock = Clock::with_seed(7);
        assert_eq!(Stamp::input(&clock, Tense::None, 5).occurrence(), ETERNAL);
        assert_eq!(Stamp::input(&clock, Tense::Eternal, 5).occurrence(), ETERNAL);
        assert_eq!(Stamp::input(&clock, Tense::Present, 5).occurrence(), 0);
        assert_eq!(Stamp::input(&clock, Tense::Future, 5).occurrence(), 5);
        assert_eq!(Stamp::input(&clock, Tense::Past, 5).occurrence(), -5);
    }

    #[test]
    fn test_serials_are_distinct() {
        let clock = Clock::with_seed(7);
        let a = Stamp::input(&clock, Tense::None, 5);
        let b = Stamp::input(&clock, Tense::None, 5);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = stamp(&[(1, 1), (1, 2)], ETERNAL);
        let b = stamp(&[(1, 2), (1, 3)], ETERNAL);
        let c = stamp(&[(1, 4)], ETERNAL);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_derive_interleaves() {
        let a = stamp(&[(1, 1), (1, 3)], ETERNAL);
        let b = stamp(&[(1, 2), (1, 4)], ETERNAL);
        let d = Stamp::derive(&a, &b, 9, None, false, 0, 5);
        let serials: Vec<i64> = d.base().iter().map(|e| e.serial).collect();
        assert_eq!(serials, vec![1, 2, 3, 4]);
        assert_eq!(d.creation(), 9);
        assert!(d.is_eternal());
    }

    #[test]
    fn test_derive_occurrence_and_interval() {
        let a = stamp(&[(1, 1)], 10);
        let b = stamp(&[(1, 2)], 4);
        let plain = Stamp::derive(&a, &b, 0, None, false, 0, 5);
        assert_eq!(plain.occurrence(), 10);
        let ahead = Stamp::derive(&a, &b, 0, Some(TimeMark::Advance), false, 0, 5);
        assert_eq!(ahead.occurrence(), 15);
        let behind = Stamp::derive(&a, &b, 0, Some(TimeMark::Recede), false, 0, 5);
        assert_eq!(behind.occurrence(), 5);
        let reversed = Stamp::derive(&a, &b, 0, Some(TimeMark::Advance), true, 0, 5);
        assert_eq!(reversed.occurrence(), 5);
        let biased = Stamp::derive(&a, &b, 0, None, false, 3, 5);
        assert_eq!(biased.occurrence(), 13);
    }

    #[test]
    fn test_derive_with_one_eternal_parent() {
        let a = stamp(&[(1, 1)], ETERNAL);
        let b = stamp(&[(1, 2)], 7);
        assert_eq!(Stamp::derive(&a, &b, 0, None, false, 0, 5).occurrence(), 7);
    }

    #[test]
    fn test_equals_dimensions() {
        let a = stamp(&[(1, 1)], 5);
        let mut b = a.clone();
        b.creation = 99;
        assert!(a.equals(&b, false, true, true));
        assert!(!a.equals(&b, true, true, true));
        let c = stamp(&[(1, 2)], 5);
        assert!(!a.equals(&c, false, true, true));
    }
}
