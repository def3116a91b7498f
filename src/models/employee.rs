use chrono::NaiveDate;
use serde::Serialize;

/// Header names of the upload format, in their documented order.
pub const COL_DATE: &str = "Date";
pub const COL_EMPLOYEE_ID: &str = "Employee_ID";
pub const COL_EMPLOYEE_NAME: &str = "Employee_Name";
pub const COL_DEPARTMENT: &str = "Department";
pub const COL_JOB_TITLE: &str = "Job_Title";
pub const COL_GENDER: &str = "Gender";
pub const COL_PROJECT: &str = "Project";
pub const COL_YEARS_AT_COMPANY: &str = "Years_At_Company";
pub const COL_PERFORMANCE_SCORE: &str = "Performance_Score";
pub const COL_MONTHLY_SALARY: &str = "Monthly_Salary";
pub const COL_CLOCKED_HOURS: &str = "Clocked_Hours";
pub const COL_PRODUCTIVE_HOURS: &str = "Productive_Hours";
pub const COL_TASKS_COMPLETED: &str = "Tasks_Completed";
pub const COL_MEETINGS: &str = "Meetings";
pub const COL_BREAK_HOURS: &str = "Break_Hours";
pub const COL_TRAINING_HOURS: &str = "Training_Hours";
pub const COL_OVERTIME_HOURS: &str = "Overtime_Hours";
pub const COL_REMOTE_WORK_FREQUENCY: &str = "Remote_Work_Frequency";
pub const COL_SATISFACTION_SCORE: &str = "Employee_Satisfaction_Score";

pub const REQUIRED_COLUMNS: [&str; 19] = [
    COL_DATE,
    COL_EMPLOYEE_ID,
    COL_EMPLOYEE_NAME,
    COL_DEPARTMENT,
    COL_JOB_TITLE,
    COL_GENDER,
    COL_PROJECT,
    COL_YEARS_AT_COMPANY,
    COL_PERFORMANCE_SCORE,
    COL_MONTHLY_SALARY,
    COL_CLOCKED_HOURS,
    COL_PRODUCTIVE_HOURS,
    COL_TASKS_COMPLETED,
    COL_MEETINGS,
    COL_BREAK_HOURS,
    COL_TRAINING_HOURS,
    COL_OVERTIME_HOURS,
    COL_REMOTE_WORK_FREQUENCY,
    COL_SATISFACTION_SCORE,
];

/// Columns parsed as numbers. A cell that fails to parse becomes `None`.
pub const NUMERIC_COLUMNS: [&str; 12] = [
    COL_YEARS_AT_COMPANY,
    COL_PERFORMANCE_SCORE,
    COL_MONTHLY_SALARY,
    COL_CLOCKED_HOURS,
    COL_PRODUCTIVE_HOURS,
    COL_TASKS_COMPLETED,
    COL_MEETINGS,
    COL_BREAK_HOURS,
    COL_TRAINING_HOURS,
    COL_OVERTIME_HOURS,
    COL_REMOTE_WORK_FREQUENCY,
    COL_SATISFACTION_SCORE,
];

/// One validated daily observation for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub date: NaiveDate,
    pub employee_id: String,
    pub employee_name: String,
    pub department: String,
    pub job_title: String,
    pub gender: String,
    pub project: String,
    pub years_at_company: Option<f64>,
    pub performance_score: Option<f64>,
    pub monthly_salary: Option<f64>,
    pub clocked_hours: Option<f64>,
    pub productive_hours: Option<f64>,
    pub tasks_completed: Option<f64>,
    pub meetings: Option<f64>,
    pub break_hours: Option<f64>,
    pub training_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
    pub remote_work_frequency: Option<f64>,
    pub employee_satisfaction_score: Option<f64>,
}

/// A record together with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityRecord {
    #[serde(flatten)]
    pub record: EmployeeRecord,
    /// `None` when clocked hours are zero or either input is missing.
    pub productivity: Option<f64>,
    pub year: i32,
}

impl ProductivityRecord {
    pub fn employee_id(&self) -> &str {
        &self.record.employee_id
    }

    pub fn department(&self) -> &str {
        &self.record.department
    }

    pub fn date(&self) -> NaiveDate {
        self.record.date
    }
}
