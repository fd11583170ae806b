//! Interpolation kind used by blink correction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Highest spline degree accepted
pub const MAX_SPLINE_ORDER: u8 = 9;

/// How blink samples are corrected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "InterpSpec", into = "InterpSpec")]
pub enum InterpKind {
    /// Replace blink samples with NaN only
    #[default]
    NanMask,
    /// Piecewise linear
    Linear,
    /// Nearest valid anchor
    Nearest,
    /// Previous valid anchor
    ZeroOrderHold,
    /// Interpolating B-spline of the given degree (>= 1)
    Spline(u8),
}

impl InterpKind {
    /// Build from an explicit spline degree; degree 0 is zero-order hold
    pub fn from_order(order: u8) -> Result<Self, ContractError> {
        match order {
            0 => Ok(Self::ZeroOrderHold),
            o if o <= MAX_SPLINE_ORDER => Ok(Self::Spline(o)),
            o => Err(ContractError::contract_violation(
                "interp",
                format!("spline order must be <= {MAX_SPLINE_ORDER}, got {o}"),
            )),
        }
    }

    /// Minimum number of valid anchors needed to fit
    pub fn min_anchors(&self) -> usize {
        match self {
            Self::NanMask => 0,
            Self::Nearest | Self::ZeroOrderHold => 1,
            Self::Linear => 2,
            Self::Spline(order) => *order as usize + 1,
        }
    }

    #[inline]
    pub fn is_nan_mask(&self) -> bool {
        matches!(self, Self::NanMask)
    }
}

impl FromStr for InterpKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "nan" => Ok(Self::NanMask),
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "zero" | "zero-order-hold" | "previous" => Ok(Self::ZeroOrderHold),
            "slinear" => Ok(Self::Spline(1)),
            "quadratic" => Ok(Self::Spline(2)),
            "cubic" => Ok(Self::Spline(3)),
            other => {
                let digits = other.strip_prefix("spline-").unwrap_or(other);
                digits
                    .parse::<u8>()
                    .map_err(|_| {
                        ContractError::contract_violation(
                            "interp",
                            format!("unknown interpolation kind '{s}'"),
                        )
                    })
                    .and_then(Self::from_order)
            }
        }
    }
}

impl fmt::Display for InterpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NanMask => write!(f, "nan"),
            Self::Linear => write!(f, "linear"),
            Self::Nearest => write!(f, "nearest"),
            Self::ZeroOrderHold => write!(f, "zero-order-hold"),
            Self::Spline(order) => write!(f, "spline-{order}"),
        }
    }
}

/// Wire form: a name or a bare spline degree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum InterpSpec {
    Order(u8),
    Name(String),
}

impl TryFrom<InterpSpec> for InterpKind {
    type Error = ContractError;

    fn try_from(spec: InterpSpec) -> Result<Self, Self::Error> {
        match spec {
            InterpSpec::Order(order) => Self::from_order(order),
            InterpSpec::Name(name) => name.parse(),
        }
    }
}

impl From<InterpKind> for InterpSpec {
    fn from(kind: InterpKind) -> Self {
        InterpSpec::Name(kind.to_string())
    }
}
