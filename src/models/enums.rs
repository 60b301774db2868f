use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde representation matches `as_str`.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Which path produced a result. Observability only: callers must not
    /// branch on it for correctness.
    ResultSource {
        /// The remote processing service answered.
        Remote => "remote",
        /// The local AI call returned a valid table.
        LocalAi => "local-ai",
        /// The AI path failed and the line heuristic ran.
        HeuristicFallback => "heuristic-fallback",
        /// No backend produced a result; the table describes the failure.
        ErrorFallback => "error-fallback",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn result_source_round_trips_through_str() {
        for source in [
            ResultSource::Remote,
            ResultSource::LocalAi,
            ResultSource::HeuristicFallback,
            ResultSource::ErrorFallback,
        ] {
            assert_eq!(ResultSource::from_str(source.as_str()).unwrap(), source);
        }
    }

    #[test]
    fn result_source_serializes_kebab_case() {
        let json = serde_json::to_string(&ResultSource::HeuristicFallback).unwrap();
        assert_eq!(json, "\"heuristic-fallback\"");
    }

    #[test]
    fn unknown_source_is_invalid_enum() {
        let err = ResultSource::from_str("cloud").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
