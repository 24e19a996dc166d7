use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same wire strings as `as_str`, so JSON, database and
/// API tokens never disagree.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
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

// Bloom's cognitive levels, merged 5-level scheme.
// K5 folds Evaluate and Create into one tier.
str_enum!(KlLevel {
    K1 => "K1",
    K2 => "K2",
    K3 => "K3",
    K4 => "K4",
    K5 => "K5",
});

impl KlLevel {
    /// Human-readable taxonomy tier name.
    pub fn tier_name(&self) -> &'static str {
        match self {
            Self::K1 => "Remembering",
            Self::K2 => "Understanding",
            Self::K3 => "Applying",
            Self::K4 => "Analyzing",
            Self::K5 => "Evaluating/Creating",
        }
    }
}

str_enum!(ReviewStatus {
    Approved => "APPROVED",
    Suggested => "SUGGESTED",
});

str_enum!(PaperStatus {
    Pending => "PENDING",
    InProgress => "IN_PROGRESS",
    NeedsRevision => "NEEDS_REVISION",
    Approved => "APPROVED",
});

str_enum!(ExamFormat {
    Cat => "CAT",
    Sat => "SAT",
    Sem => "SEM",
});
