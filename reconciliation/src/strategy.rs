//! Selectors consumed by the encode/decode harness.

use std::{fmt, str::FromStr};

use crate::error::ConfigError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ConfigError::UnknownStrategy {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum!(
    /// Which blocks receive parity checks in a round.
    IndicesToEncodeStrategy, "indices-to-encode" {
        AllMultiCandidateBlocks => "all_multi_candidate_blocks",
        MostCandidateBlocks => "most_candidate_blocks",
    }
);

wire_enum!(
    CodeGenerationStrategy, "code-generation" {
        Linear => "linear",
        Ldpc => "ldpc",
    }
);

wire_enum!(
    /// How the decoder discards candidates.
    PruningStrategy, "pruning" {
        RadiiProbabilities => "radii_probabilities",
        RelativeWeights => "relative_weights",
    }
);

wire_enum!(
    /// Representation of a linear code's parity checks.
    LinearCodeFormat, "linear-code-format" {
        Matrix => "matrix",
        AffineSubspace => "affine_subspace",
    }
);
