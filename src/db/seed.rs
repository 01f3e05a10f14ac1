//! Demo datasets loaded into a fresh store.
//!
//! `staff` is a single `employees` table with the department stored inline.
//! `company` splits departments into their own table so questions need joins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const STAFF_SCHEMA: &str = "CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    department TEXT,
    salary REAL
)";

const STAFF_ROWS: &str = "INSERT INTO employees (id, name, department, salary) VALUES
    (1, '张伟', 'IT', 75000),
    (2, '王芳', 'HR', 65000),
    (3, '李斯', '销售', 80000),
    (4, '赵辉', '市场', 70000),
    (5, '陈明', 'IT', 72000),
    (6, '杨丽', 'HR', 68000),
    (7, '周浩', '销售', 82000),
    (8, '吴娜', '市场', 71000),
    (9, '刘洋', 'IT', 76000),
    (10, '孙琳', 'HR', 67000),
    (11, '朱峰', '销售', 81000),
    (12, '徐婷', '市场', 72000),
    (13, '郭震', 'IT', 74000),
    (14, '马梅', 'HR', 66000),
    (15, '胡勇', '销售', 83000),
    (16, '林梅', '市场', 73000),
    (17, '韩磊', 'IT', 77000),
    (18, '董芳', 'HR', 69000),
    (19, '萧峰', '销售', 84000),
    (20, '沈丹', '市场', 74000)";

const COMPANY_DEPARTMENTS_SCHEMA: &str = "CREATE TABLE departments (
    id INTEGER PRIMARY KEY,
    name TEXT,
    location TEXT
)";

const COMPANY_EMPLOYEES_SCHEMA: &str = "CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    department_id INTEGER REFERENCES departments(id),
    salary REAL
)";

const COMPANY_DEPARTMENT_ROWS: &str = "INSERT INTO departments (id, name, location) VALUES
    (1, 'IT', '北京'),
    (2, 'HR', '上海'),
    (3, '销售', '广州'),
    (4, '市场', '深圳')";

const COMPANY_EMPLOYEE_ROWS: &str =
    "INSERT INTO employees (id, name, department_id, salary) VALUES
    (1, '张伟', 1, 75000),
    (2, '王芳', 2, 65000),
    (3, '李斯', 3, 80000),
    (4, '赵静', 4, 70000),
    (5, '陈明', 1, 72000),
    (6, '杨丽', 2, 68000),
    (7, '周浩', 3, 82000),
    (8, '吴娜', 4, 71000),
    (9, '刘洋', 1, 76000),
    (10, '孙琳', 2, 67000)";

/// Built-in dataset to seed a new store with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Single `employees` table, 20 rows.
    Staff,
    /// `employees` (10 rows) referencing `departments` (4 rows).
    #[default]
    Company,
    /// Leave the store untouched.
    None,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Company => "company",
            Self::None => "none",
        }
    }

    /// Statements that create and fill the dataset, in execution order.
    pub fn statements(&self) -> &'static [&'static str] {
        match self {
            Self::Staff => &[STAFF_SCHEMA, STAFF_ROWS],
            Self::Company => &[
                COMPANY_DEPARTMENTS_SCHEMA,
                COMPANY_EMPLOYEES_SCHEMA,
                COMPANY_DEPARTMENT_ROWS,
                COMPANY_EMPLOYEE_ROWS,
            ],
            Self::None => &[],
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "staff" => Ok(Self::Staff),
            "company" => Ok(Self::Company),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Unknown dataset: {s}. Expected: staff, company, or none"
            )),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_from_str() {
        assert_eq!("staff".parse::<Dataset>().unwrap(), Dataset::Staff);
        assert_eq!("COMPANY".parse::<Dataset>().unwrap(), Dataset::Company);
        assert_eq!("none".parse::<Dataset>().unwrap(), Dataset::None);
        assert!("payroll".parse::<Dataset>().is_err());
    }

    #[test]
    fn test_dataset_statements() {
        assert_eq!(Dataset::Staff.statements().len(), 2);
        assert_eq!(Dataset::Company.statements().len(), 4);
        assert!(Dataset::None.statements().is_empty());
        // departments must exist before employees references it
        assert!(Dataset::Company.statements()[0].contains("departments"));
    }
}
