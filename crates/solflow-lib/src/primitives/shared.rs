/// Macro to generate FromStr implementations for ValueEnum types
///
/// Matching goes through clap's `PossibleValue`, so every alias declared on a
/// variant is accepted by `str::parse` as well as on the command line.
macro_rules! impl_fromstr_for_value_enum {
    ($enum_type:ty, $error_reason:expr) => {
        impl std::str::FromStr for $enum_type {
            type Err = $crate::primitives::ConfigError;

            fn from_str(s: &str) -> Result<Self, $crate::primitives::ConfigError> {
                for variant in <Self as clap::ValueEnum>::value_variants() {
                    if let Some(possible_value) = clap::ValueEnum::to_possible_value(variant) {
                        if possible_value.matches(s, true) {
                            return Ok(*variant);
                        }
                    }
                }

                Err($crate::primitives::ConfigError::ParseError {
                    value: s.to_string(),
                    reason: $error_reason.to_string(),
                })
            }
        }
    };
}

pub(crate) use impl_fromstr_for_value_enum;
