//! Permission category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Functional areas of the library platform a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "permission_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    /// Catalog records: books, serials, holdings.
    Catalog,
    /// Circulation: loans, returns, holds, fines.
    Circulation,
    /// Member accounts and registrations.
    Membership,
    /// Report tables and exports.
    Reporting,
    /// Platform administration: users, roles, settings.
    Administration,
}

impl PermissionCategory {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Circulation => "circulation",
            Self::Membership => "membership",
            Self::Reporting => "reporting",
            Self::Administration => "administration",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionCategory {
    type Err = shelfmark_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "circulation" => Ok(Self::Circulation),
            "membership" => Ok(Self::Membership),
            "reporting" => Ok(Self::Reporting),
            "administration" => Ok(Self::Administration),
            _ => Err(shelfmark_core::AppError::validation(format!(
                "Invalid permission category: '{s}'. Expected one of: catalog, circulation, \
                 membership, reporting, administration"
            ))),
        }
    }
}
