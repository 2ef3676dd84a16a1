//! Sampling shape and fill direction policies, and the match context they
//! combine into.

use crate::errors::{Error, InvalidParameter};
use std::{convert::TryFrom, fmt, str::FromStr};

/// Which part of the surroundings of the selection may be sampled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFrom {
    AllAround,
    /// Only the pixels to the left and right of the selection
    Sides,
    /// Only the pixels above and below the selection
    TopAndBottom,
}

/// The order in which the selected pixels are synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillDirection {
    Random,
    InwardToCenter,
    OutwardFromCenter,
}

/// The combined sampling shape and fill direction, controls the visiting
/// order of target pixels and whether the surroundings are used as context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchContext {
    /// Pure synthesis, pixels around the selection are not matched against
    None,
    Random,
    InwardConcentric,
    InwardHorizontal,
    InwardVertical,
    OutwardConcentric,
    OutwardHorizontal,
    OutwardVertical,
}

impl MatchContext {
    pub fn from_policy(sample_from: SampleFrom, fill_direction: FillDirection) -> Self {
        match (fill_direction, sample_from) {
            (FillDirection::Random, _) => Self::Random,
            (FillDirection::InwardToCenter, SampleFrom::AllAround) => Self::InwardConcentric,
            (FillDirection::InwardToCenter, SampleFrom::Sides) => Self::InwardHorizontal,
            (FillDirection::InwardToCenter, SampleFrom::TopAndBottom) => Self::InwardVertical,
            (FillDirection::OutwardFromCenter, SampleFrom::AllAround) => Self::OutwardConcentric,
            (FillDirection::OutwardFromCenter, SampleFrom::Sides) => Self::OutwardHorizontal,
            (FillDirection::OutwardFromCenter, SampleFrom::TopAndBottom) => Self::OutwardVertical,
        }
    }

    /// Whether unselected pixels are seeded as already having a value
    #[inline]
    pub fn uses_context(self) -> bool {
        self != Self::None
    }
}

macro_rules! named_enum {
    ($ty:ident, $param:expr, $expected:expr, { $($name:literal => $variant:ident = $num:literal),+ $(,)? }) => {
        impl $ty {
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Error> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(Error::InvalidParameter(InvalidParameter {
                        name: $param,
                        value: other.to_owned(),
                        expected: $expected,
                    })),
                }
            }
        }

        impl TryFrom<i32> for $ty {
            type Error = Error;

            fn try_from(v: i32) -> Result<Self, Error> {
                match v {
                    $($num => Ok(Self::$variant),)+
                    other => Err(Error::InvalidParameter(InvalidParameter {
                        name: $param,
                        value: other.to_string(),
                        expected: $expected,
                    })),
                }
            }
        }
    };
}

named_enum!(SampleFrom, "sample-from", "'all-around', 'sides', 'top-and-bottom' (0-2)", {
    "all-around" => AllAround = 0,
    "sides" => Sides = 1,
    "top-and-bottom" => TopAndBottom = 2,
});

named_enum!(FillDirection, "fill-direction", "'random', 'inward', 'outward' (0-2)", {
    "random" => Random = 0,
    "inward" => InwardToCenter = 1,
    "outward" => OutwardFromCenter = 2,
});

named_enum!(MatchContext, "match-context", "a match context name (0-7)", {
    "none" => None = 0,
    "random" => Random = 1,
    "inward-concentric" => InwardConcentric = 2,
    "inward-horizontal" => InwardHorizontal = 3,
    "inward-vertical" => InwardVertical = 4,
    "outward-concentric" => OutwardConcentric = 5,
    "outward-horizontal" => OutwardHorizontal = 6,
    "outward-vertical" => OutwardVertical = 7,
});

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn policy_table() {
        use super::FillDirection as F;
        use super::SampleFrom as S;

        let shapes = [S::AllAround, S::Sides, S::TopAndBottom];
        for shape in shapes.iter() {
            assert_eq!(MatchContext::from_policy(*shape, F::Random), MatchContext::Random);
        }

        assert_eq!(
            MatchContext::from_policy(S::AllAround, F::InwardToCenter),
            MatchContext::InwardConcentric
        );
        assert_eq!(
            MatchContext::from_policy(S::Sides, F::InwardToCenter),
            MatchContext::InwardHorizontal
        );
        assert_eq!(
            MatchContext::from_policy(S::TopAndBottom, F::OutwardFromCenter),
            MatchContext::OutwardVertical
        );
        assert!(!MatchContext::None.uses_context());
        assert!(MatchContext::OutwardHorizontal.uses_context());
    }

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("sides".parse::<SampleFrom>().unwrap(), SampleFrom::Sides);
        assert_eq!(
            FillDirection::try_from(2).unwrap(),
            FillDirection::OutwardFromCenter
        );
        assert_eq!(
            MatchContext::InwardVertical.to_string().parse::<MatchContext>().unwrap(),
            MatchContext::InwardVertical
        );

        match "diagonal".parse::<SampleFrom>() {
            Err(Error::InvalidParameter(ip)) => {
                assert_eq!(ip.name, "sample-from");
                assert_eq!(ip.value, "diagonal");
            }
            _ => panic!("expected an invalid parameter error"),
        }
        assert!(FillDirection::try_from(3).is_err());
        assert!(MatchContext::try_from(-1).is_err());
    }
}
