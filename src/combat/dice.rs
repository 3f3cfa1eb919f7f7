//! Dice expressions like "1d8", "2d6+1" or a flat "3"
//!
//! Serialized as their canonical text so data files stay readable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::rng::RandomStream;
use crate::core::error::CombatError;

/// Upper bound on dice per expression
pub const MAX_DICE: u32 = 100;

/// Upper bound on faces per die
pub const MAX_SIDES: u32 = 1000;

/// Dice count, die size and flat modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Result<Self, CombatError> {
        if count > MAX_DICE {
            return Err(CombatError::InvalidDice(format!(
                "at most {} dice allowed, got {}",
                MAX_DICE, count
            )));
        }
        if count > 0 && sides == 0 {
            return Err(CombatError::InvalidDice("die size must be at least 1".into()));
        }
        if sides > MAX_SIDES {
            return Err(CombatError::InvalidDice(format!(
                "at most {} sides allowed, got {}",
                MAX_SIDES, sides
            )));
        }
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// A flat amount with no dice
    pub fn flat(modifier: i32) -> Self {
        Self {
            count: 0,
            sides: 0,
            modifier,
        }
    }

    /// Parse "XdY", "XdY+Z", "XdY-Z", "dY" or a bare integer
    pub fn parse(input: &str) -> Result<Self, CombatError> {
        let text = input.trim().to_lowercase();
        if text.is_empty() {
            return Err(CombatError::InvalidDice("empty expression".into()));
        }

        let Some(d_pos) = text.find('d') else {
            let flat: i32 = text
                .parse()
                .map_err(|_| CombatError::InvalidDice(format!("not a number: '{}'", text)))?;
            return Ok(Self::flat(flat));
        };

        let count_str = &text[..d_pos];
        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| CombatError::InvalidDice(format!("bad dice count: '{}'", count_str)))?
        };

        let rest = &text[d_pos + 1..];
        let (sides_str, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(pos) => {
                let bad_modifier =
                    || CombatError::InvalidDice(format!("bad modifier: '{}'", &rest[pos..]));
                let digits = &rest[pos + 1..];
                if !digits.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(bad_modifier());
                }
                let amount: i32 = digits.parse().map_err(|_| bad_modifier())?;
                let modifier = if rest[pos..].starts_with('-') {
                    amount.checked_neg().ok_or_else(bad_modifier)?
                } else {
                    amount
                };
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| CombatError::InvalidDice(format!("bad die size: '{}'", sides_str)))?;

        Self::new(count, sides, modifier)
    }

    /// Smallest possible total
    pub fn min(&self) -> i32 {
        if self.count == 0 {
            return self.modifier;
        }
        clamp_total(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Largest possible total
    pub fn max(&self) -> i32 {
        clamp_total(i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier))
    }

    /// Roll the expression once
    pub fn roll(&self, stream: &mut RandomStream) -> i32 {
        self.roll_with_multiplier(stream, 1)
    }

    /// Roll `multiplier` times the dice, adding the modifier once
    pub fn roll_with_multiplier(&self, stream: &mut RandomStream, multiplier: u32) -> i32 {
        let dice = self.count.saturating_mul(multiplier.max(1));
        let total: i64 = (0..dice).map(|_| i64::from(stream.roll_die(self.sides))).sum();
        clamp_total(total + i64::from(self.modifier))
    }
}

fn clamp_total(total: i64) -> i32 {
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DiceExpr> for String {
    fn from(value: DiceExpr) -> Self {
        value.to_string()
    }
}
