//! `GET /api/employees`: employee directory with team and tenure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use endurance_core::math::round2;
use endurance_stores::PostgresStore;
use serde::Serialize;
use serde_json::Value;

use crate::{MetricsError, Outcome};

const UNASSIGNED: &str = "Unassigned";

const QUERY: &str = "\
SELECT e.id::bigint AS id,
       COALESCE(e.name, '') AS name,
       COALESCE(e.email, '') AS email,
       COALESCE(e.role, '') AS role,
       COALESCE(e.department, '') AS department,
       COALESCE(t.name, '') AS team,
       COALESCE(e.location, '') AS location,
       e.hire_date
FROM employees e
LEFT JOIN teams t ON t.id = e.team_id";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub team: String,
    pub location: String,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Employee {
    id: i64,
    name: String,
    email: String,
    role: String,
    department: String,
    team: String,
    location: String,
    hire_date: Option<String>,
    tenure_years: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeesPayload {
    employees: Vec<Employee>,
    total_count: usize,
    by_department: BTreeMap<String, u64>,
}

/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn load(store: &PostgresStore, today: NaiveDate) -> Result<Outcome, MetricsError> {
    let rows: Vec<EmployeeRow> = sqlx::query_as(&format!("{QUERY} ORDER BY e.name"))
        .fetch_all(store.pool())
        .await?;
    compose(rows, today)
}

/// One employee by id, shaped like an entry of the directory.
///
/// # Errors
///
/// Returns [`MetricsError`] if the query fails.
pub async fn profile(
    store: &PostgresStore,
    id: i64,
    today: NaiveDate,
) -> Result<Option<Value>, MetricsError> {
    let row: Option<EmployeeRow> = sqlx::query_as(&format!("{QUERY} WHERE e.id = $1"))
        .bind(id)
        .fetch_optional(store.pool())
        .await?;
    row.map(|r| serde_json::to_value(employee(r, today)).map_err(MetricsError::from))
        .transpose()
}

/// # Errors
///
/// Returns [`MetricsError::Encode`] if the payload fails to serialize.
pub fn compose(rows: Vec<EmployeeRow>, today: NaiveDate) -> Result<Outcome, MetricsError> {
    if rows.is_empty() {
        return Ok(Outcome::Empty);
    }

    let mut by_department: BTreeMap<String, u64> = BTreeMap::new();
    let employees: Vec<Employee> = rows
        .into_iter()
        .map(|row| {
            let employee = employee(row, today);
            *by_department.entry(employee.department.clone()).or_default() += 1;
            employee
        })
        .collect();

    Outcome::live(&EmployeesPayload {
        total_count: employees.len(),
        employees,
        by_department,
    })
}

fn employee(row: EmployeeRow, today: NaiveDate) -> Employee {
    let department = if row.department.trim().is_empty() {
        UNASSIGNED.to_string()
    } else {
        row.department
    };
    Employee {
        id: row.id,
        name: row.name,
        email: row.email,
        role: row.role,
        department,
        team: row.team,
        location: row.location,
        hire_date: row.hire_date.map(|d| d.to_string()),
        tenure_years: row.hire_date.map_or(0.0, |d| tenure_years(d, today)),
    }
}

/// Whole years since `hired`, to two decimals; future dates count as 0.
fn tenure_years(hired: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - hired).num_days().max(0);
    #[allow(clippy::cast_precision_loss)]
    let years = days as f64 / 365.25;
    round2(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(id: i64, name: &str, department: &str, hired: Option<&str>) -> EmployeeRow {
        EmployeeRow {
            id,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: "Engineer".into(),
            department: department.into(),
            team: "Platform".into(),
            location: "Remote".into(),
            hire_date: hired.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn empty_rows_are_empty() {
        assert!(compose(Vec::new(), today()).unwrap().is_empty());
    }

    #[test]
    fn groups_by_department_and_computes_tenure() {
        let rows = vec![
            row(1, "Ada", "Engineering", Some("2024-01-01")),
            row(2, "Grace", "Engineering", None),
            row(3, "Linus", "", Some("2030-01-01")),
        ];
        let Outcome::Live(body) = compose(rows, today()).unwrap() else {
            panic!("expected live payload");
        };

        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["byDepartment"], json!({"Engineering": 2, "Unassigned": 1}));
        assert_eq!(body["employees"][0]["tenureYears"], 2.0);
        assert_eq!(body["employees"][0]["hireDate"], "2024-01-01");
        assert_eq!(body["employees"][1]["hireDate"], json!(null));
        assert_eq!(body["employees"][1]["tenureYears"], 0.0);
        assert_eq!(body["employees"][2]["tenureYears"], 0.0);
    }
}
