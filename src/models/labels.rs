use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Declares a closed set of display labels stored verbatim as TEXT.
///
/// Parsing ignores case and treats `-` and `_` as spaces, so `in-progress`
/// and `IN_PROGRESS` both name "In Progress".
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $variant:ident => $label:literal ),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.as_str()) == wanted)
                    .ok_or_else(|| ValidationError::UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

labeled_enum! {
    /// Lifecycle state of a project
    ProjectStatus("project status") {
        Planned => "Planned",
        InProgress => "In Progress",
        OnHold => "On Hold",
        Completed => "Completed",
    }
    default = Planned
}

labeled_enum! {
    TaskStatus("task status") {
        ToDo => "To Do",
        InProgress => "In Progress",
        Blocked => "Blocked",
        Done => "Done",
    }
    default = ToDo
}

labeled_enum! {
    /// What an expense was spent on
    ExpenseCategory("expense category") {
        Materials => "Materials",
        Subcontractor => "Subcontractor",
        Labor => "Labor",
        Tools => "Tools",
        Disposal => "Disposal",
        Permits => "Permits",
        Fuel => "Fuel",
        Other => "Other",
    }
    default = Other
}

labeled_enum! {
    PaymentMethod("payment method") {
        BusinessCard => "Business Card",
        Cash => "Cash",
        Check => "Check",
        Ach => "ACH",
        Other => "Other",
    }
    default = Other
}
