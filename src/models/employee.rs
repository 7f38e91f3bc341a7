//! Employee model and related types.
//!
//! This module defines the Employee struct and the closed Category enum
//! that drives the salary bonus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Rut;

/// Salary category of an employee.
///
/// The set is closed: parsing anything other than `A`, `B` or `C` fails
/// with [`EngineError::UnknownCategory`].
///
/// # Example
///
/// ```
/// use payroll_engine::models::Category;
///
/// assert_eq!("b".parse::<Category>().unwrap(), Category::B);
/// assert!("D".parse::<Category>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Category A.
    A,
    /// Category B.
    B,
    /// Category C.
    C,
}

impl Category {
    /// Every category, in order.
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    /// The single-letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
        }
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Category::A),
            "B" => Ok(Category::B),
            "C" => Ok(Category::C),
            _ => Err(EngineError::UnknownCategory {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an employee in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Roster-assigned identifier.
    pub id: u64,
    /// National identifier, unique across the roster.
    pub rut: Rut,
    /// Full name.
    pub name: String,
    /// Monthly base salary in whole currency units.
    pub salary: i64,
    /// Number of dependent children.
    pub children: u32,
    /// Salary category.
    pub category: Category,
}

impl Employee {
    /// Checks the field-level rules a roster record must satisfy.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Category, Employee, Rut};
    ///
    /// let mut employee = Employee {
    ///     id: 1,
    ///     rut: Rut::parse("12.345.678-5").unwrap(),
    ///     name: "Ana Rojas".to_string(),
    ///     salary: 1_000_000,
    ///     children: 2,
    ///     category: Category::A,
    /// };
    /// assert!(employee.validate().is_ok());
    ///
    /// employee.salary = 0;
    /// assert!(employee.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        validate_fields(&self.name, self.salary)
    }
}

/// An employee that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// National identifier.
    pub rut: Rut,
    /// Full name.
    pub name: String,
    /// Monthly base salary in whole currency units.
    pub salary: i64,
    /// Number of dependent children.
    pub children: u32,
    /// Salary category.
    pub category: Category,
}

impl NewEmployee {
    /// Checks the same rules as [`Employee::validate`].
    pub fn validate(&self) -> EngineResult<()> {
        validate_fields(&self.name, self.salary)
    }

    /// Attaches an identifier.
    pub fn with_id(self, id: u64) -> Employee {
        Employee {
            id,
            rut: self.rut,
            name: self.name,
            salary: self.salary,
            children: self.children,
            category: self.category,
        }
    }
}

fn validate_fields(name: &str, salary: i64) -> EngineResult<()> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidEmployee {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if salary <= 0 {
        return Err(EngineError::InvalidEmployee {
            field: "salary".to_string(),
            message: format!("must be positive, got {}", salary),
        });
    }
    Ok(())
}
