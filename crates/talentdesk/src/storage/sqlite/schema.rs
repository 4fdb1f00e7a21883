//! SQLite schema definitions and SQL query constants.
//!
//! All SQL used by the SQLite repository lives here as pure data. The schema
//! is created idempotently at open; the status lookup tables are seeded the
//! same way. Partial updates are assembled at runtime by the `SetClause`
//! builder in `conversions`, so no UPDATE statements appear here except the
//! fixed-shape ones.

/// SQL statement to create all tables and seed the lookup tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL
);

-- Companies table. Names are unique case-insensitively.
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL COLLATE NOCASE UNIQUE,
    spoc TEXT NOT NULL,
    email_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL
);

-- Company points of contact
CREATE TABLE IF NOT EXISTS spocs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    email_id TEXT NOT NULL,
    location TEXT,
    status TEXT NOT NULL DEFAULT 'active',
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

-- Requirement status lookup
CREATE TABLE IF NOT EXISTS requirement_statuses (
    id INTEGER PRIMARY KEY,
    status TEXT NOT NULL UNIQUE
);

-- Requirements (open positions)
CREATE TABLE IF NOT EXISTS requirements (
    requirement_id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL,
    key_skill TEXT NOT NULL,
    jd TEXT NOT NULL,
    status_id INTEGER NOT NULL,
    recruiter_name TEXT,
    budget REAL,
    expected_billing_date TEXT,
    location TEXT,
    remarks TEXT,
    req_cust_ref_id TEXT,
    closed_date TEXT,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (company_id) REFERENCES companies(id),
    FOREIGN KEY (status_id) REFERENCES requirement_statuses(id)
);

-- Profile stage lookup
CREATE TABLE IF NOT EXISTS profile_statuses (
    id INTEGER PRIMARY KEY,
    stage TEXT NOT NULL UNIQUE
);

-- Candidate profiles
CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email_id TEXT NOT NULL,
    phone TEXT NOT NULL,
    key_skills TEXT NOT NULL,
    experience_years REAL,
    current_ctc REAL,
    expected_ctc REAL,
    notice_period TEXT,
    status INTEGER NOT NULL,
    remarks TEXT,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (status) REFERENCES profile_statuses(id)
);

-- Requirement/profile pipeline rows
CREATE TABLE IF NOT EXISTS process_profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requirement_id INTEGER NOT NULL,
    profile_id INTEGER,
    recruiter_name TEXT NOT NULL,
    status INTEGER,
    actively_working TEXT NOT NULL DEFAULT 'No',
    remarks TEXT,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (requirement_id) REFERENCES requirements(requirement_id),
    FOREIGN KEY (profile_id) REFERENCES profiles(id)
);

-- Invoices
CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_number TEXT NOT NULL UNIQUE,
    reference TEXT,
    company_id INTEGER NOT NULL,
    po_number TEXT,
    amount REAL NOT NULL,
    raised_date TEXT NOT NULL,
    due_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    remarks TEXT,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (company_id) REFERENCES companies(id)
);

-- Leave requests
CREATE TABLE IF NOT EXISTS leaves (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    leave_type TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    days INTEGER NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    approver_comments TEXT,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL
);

-- Leave balances, one row per user
CREATE TABLE IF NOT EXISTS leave_balances (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    annual_leave INTEGER NOT NULL DEFAULT 0,
    sick_leave INTEGER NOT NULL DEFAULT 0,
    casual_leave INTEGER NOT NULL DEFAULT 0,
    year INTEGER NOT NULL,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL
);

-- Financial years
CREATE TABLE IF NOT EXISTS financial_years (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL UNIQUE,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL
);

-- Holiday calendars
CREATE TABLE IF NOT EXISTS holidays (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    financial_year_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    is_mandatory INTEGER NOT NULL DEFAULT 1,
    created_date TEXT NOT NULL,
    updated_date TEXT NOT NULL,
    FOREIGN KEY (financial_year_id) REFERENCES financial_years(id)
);

-- Per-user optional holiday selections
CREATE TABLE IF NOT EXISTS holiday_selections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    holiday_id INTEGER NOT NULL,
    financial_year_id INTEGER NOT NULL,
    created_date TEXT NOT NULL,
    FOREIGN KEY (holiday_id) REFERENCES holidays(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_spocs_company_id ON spocs(company_id);
CREATE INDEX IF NOT EXISTS idx_requirements_company_id ON requirements(company_id);
CREATE INDEX IF NOT EXISTS idx_requirements_status_id ON requirements(status_id);
CREATE INDEX IF NOT EXISTS idx_profiles_created_date ON profiles(created_date);
CREATE INDEX IF NOT EXISTS idx_process_profiles_requirement_id ON process_profiles(requirement_id);
CREATE INDEX IF NOT EXISTS idx_process_profiles_profile_id ON process_profiles(profile_id);
CREATE INDEX IF NOT EXISTS idx_invoices_company_id ON invoices(company_id);
CREATE INDEX IF NOT EXISTS idx_leaves_username ON leaves(username);
CREATE INDEX IF NOT EXISTS idx_leaves_status ON leaves(status);
CREATE INDEX IF NOT EXISTS idx_holidays_financial_year_id ON holidays(financial_year_id);
CREATE INDEX IF NOT EXISTS idx_holiday_selections_username ON holiday_selections(username, financial_year_id);

-- Seed the status lookups
INSERT OR IGNORE INTO requirement_statuses (id, status) VALUES
    (1, 'Open'),
    (2, 'In Progress'),
    (3, 'On Hold'),
    (4, 'Closed'),
    (5, 'Fulfilled');

INSERT OR IGNORE INTO profile_statuses (id, stage) VALUES
    (1, 'Sourced'),
    (2, 'Screening'),
    (3, 'Interview'),
    (4, 'Offer'),
    (5, 'Joined'),
    (6, 'Rejected');
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (username, hashed_password)
VALUES (?1, ?2)
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, hashed_password
FROM users
WHERE username = ?1
"#;

pub const SELECT_USERS: &str = r#"
SELECT id, username, hashed_password
FROM users
"#;

// Company queries
pub const INSERT_COMPANY: &str = r#"
INSERT INTO companies (name, spoc, email_id, status, created_date, updated_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_COMPANY_BY_ID: &str = r#"
SELECT id, name, spoc, email_id, status, created_date, updated_date
FROM companies
WHERE id = ?1
"#;

// The name column collates NOCASE, so equality here is case-insensitive.
pub const SELECT_COMPANY_BY_NAME: &str = r#"
SELECT id, name, spoc, email_id, status, created_date, updated_date
FROM companies
WHERE name = ?1
"#;

pub const SELECT_COMPANIES: &str = r#"
SELECT id, name, spoc, email_id, status, created_date, updated_date
FROM companies
"#;

pub const SELECT_ACTIVE_COMPANIES: &str = r#"
SELECT id, name, spoc, email_id, status, created_date, updated_date
FROM companies
WHERE status = 'active'
"#;

// SPOC queries
pub const INSERT_SPOC: &str = r#"
INSERT INTO spocs (company_id, name, phone, email_id, location, status, created_date, updated_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_SPOC_BY_ID: &str = r#"
SELECT id, company_id, name, phone, email_id, location, status, created_date, updated_date
FROM spocs
WHERE id = ?1
"#;

pub const SELECT_SPOCS: &str = r#"
SELECT id, company_id, name, phone, email_id, location, status, created_date, updated_date
FROM spocs
"#;

pub const SELECT_SPOCS_BY_COMPANY: &str = r#"
SELECT id, company_id, name, phone, email_id, location, status, created_date, updated_date
FROM spocs
WHERE company_id = ?1
"#;

// Requirement queries
pub const INSERT_REQUIREMENT: &str = r#"
INSERT INTO requirements (
    company_id, key_skill, jd, status_id, recruiter_name, budget,
    expected_billing_date, location, remarks, req_cust_ref_id,
    closed_date, created_date, updated_date
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL, ?11, ?12)
"#;

pub const SELECT_REQUIREMENT_BY_ID: &str = r#"
SELECT requirement_id, company_id, key_skill, jd, status_id, recruiter_name,
       budget, expected_billing_date, location, remarks, req_cust_ref_id,
       closed_date, created_date, updated_date
FROM requirements
WHERE requirement_id = ?1
"#;

pub const SELECT_REQUIREMENTS: &str = r#"
SELECT requirement_id, company_id, key_skill, jd, status_id, recruiter_name,
       budget, expected_billing_date, location, remarks, req_cust_ref_id,
       closed_date, created_date, updated_date
FROM requirements
"#;

pub const SELECT_REQUIREMENT_STATUSES: &str = r#"
SELECT id, status
FROM requirement_statuses
ORDER BY id
"#;

pub const SELECT_OPEN_REQUIREMENTS_BY_COMPANY: &str = r#"
SELECT requirement_id, company_id, key_skill, jd, status_id, recruiter_name,
       budget, expected_billing_date, location, remarks, req_cust_ref_id,
       closed_date, created_date, updated_date
FROM requirements
WHERE company_id = ?1 AND status_id IN (?2, ?3, ?4)
"#;

pub const SELECT_OPEN_REQUIREMENTS_BY_COMPANY_AND_RECRUITER: &str = r#"
SELECT DISTINCT r.requirement_id, r.company_id, r.key_skill, r.jd, r.status_id,
       r.recruiter_name, r.budget, r.expected_billing_date, r.location,
       r.remarks, r.req_cust_ref_id, r.closed_date, r.created_date, r.updated_date
FROM requirements r
INNER JOIN process_profiles pp ON pp.requirement_id = r.requirement_id
WHERE r.company_id = ?1 AND r.status_id IN (?2, ?3, ?4) AND pp.recruiter_name = ?5
"#;

// Profile queries
pub const INSERT_PROFILE: &str = r#"
INSERT INTO profiles (
    name, email_id, phone, key_skills, experience_years, current_ctc,
    expected_ctc, notice_period, status, remarks, created_date, updated_date
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

pub const SELECT_PROFILE_BY_ID: &str = r#"
SELECT id, name, email_id, phone, key_skills, experience_years, current_ctc,
       expected_ctc, notice_period, status, remarks, created_date, updated_date
FROM profiles
WHERE id = ?1
"#;

pub const SELECT_PROFILES: &str = r#"
SELECT id, name, email_id, phone, key_skills, experience_years, current_ctc,
       expected_ctc, notice_period, status, remarks, created_date, updated_date
FROM profiles
"#;

pub const SELECT_PROFILE_STAGES: &str = r#"
SELECT id, stage
FROM profile_statuses
ORDER BY id
"#;

// Upper bound is exclusive: callers pass the day after the range end so the
// text comparison covers every datetime on the final day.
pub const SELECT_PLACEMENTS_BY_DATE_RANGE: &str = r#"
SELECT p.id, p.status, p.name, pp.recruiter_name, pp.requirement_id, c.name
FROM profiles p
LEFT JOIN process_profiles pp ON pp.profile_id = p.id
LEFT JOIN requirements r ON r.requirement_id = pp.requirement_id
LEFT JOIN companies c ON c.id = r.company_id
WHERE p.created_date >= ?1 AND p.created_date < ?2
ORDER BY p.created_date ASC
"#;

pub const SELECT_PLACEMENTS_BY_DATE_RANGE_AND_RECRUITER: &str = r#"
SELECT p.id, p.status, p.name, pp.recruiter_name, pp.requirement_id, c.name
FROM profiles p
LEFT JOIN process_profiles pp ON pp.profile_id = p.id
LEFT JOIN requirements r ON r.requirement_id = pp.requirement_id
LEFT JOIN companies c ON c.id = r.company_id
WHERE p.created_date >= ?1 AND p.created_date < ?2 AND pp.recruiter_name = ?3
ORDER BY p.created_date ASC
"#;

// Process profile queries
pub const INSERT_PROCESS_PROFILE: &str = r#"
INSERT INTO process_profiles (
    requirement_id, profile_id, recruiter_name, status, actively_working,
    remarks, created_date, updated_date
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_PROCESS_PROFILE_BY_REQ_AND_RECRUITER: &str = r#"
SELECT id, requirement_id, profile_id, recruiter_name, status, actively_working,
       remarks, created_date, updated_date
FROM process_profiles
WHERE requirement_id = ?1 AND recruiter_name = ?2
"#;

pub const SELECT_PROCESS_PROFILE_BY_REQ_AND_PROFILE: &str = r#"
SELECT id, requirement_id, profile_id, recruiter_name, status, actively_working,
       remarks, created_date, updated_date
FROM process_profiles
WHERE requirement_id = ?1 AND profile_id = ?2
"#;

// The unassigned placeholder row an upsert may claim before inserting fresh.
pub const SELECT_UNASSIGNED_PROCESS_PROFILE: &str = r#"
SELECT id, requirement_id, profile_id, recruiter_name, status, actively_working,
       remarks, created_date, updated_date
FROM process_profiles
WHERE requirement_id = ?1 AND (profile_id IS NULL OR profile_id = 0)
"#;

pub const UPDATE_PROCESS_PROFILE_FULL: &str = r#"
UPDATE process_profiles
SET profile_id = ?2, recruiter_name = ?3, status = ?4, actively_working = ?5,
    remarks = ?6, updated_date = ?7
WHERE id = ?1
"#;

pub const UPDATE_RECRUITER_BY_REQUIREMENT: &str = r#"
UPDATE process_profiles
SET recruiter_name = ?2, updated_date = ?3
WHERE requirement_id = ?1
"#;

pub const UPDATE_PROFILE_BY_REQUIREMENT: &str = r#"
UPDATE process_profiles
SET profile_id = ?2, updated_date = ?3
WHERE requirement_id = ?1
"#;

pub const UPDATE_ACTIVELY_WORKING: &str = r#"
UPDATE process_profiles
SET actively_working = ?3, updated_date = ?4
WHERE requirement_id = ?1 AND profile_id = ?2
"#;

// The relational side of the enrichment join: the INNER JOIN drops pipeline
// rows whose profile is absent, the IFNULL supplies the stage fallback.
pub const SELECT_PIPELINE_BY_REQUIREMENT: &str = r#"
SELECT pp.id, pp.requirement_id, pp.recruiter_name, pp.actively_working,
       p.id, p.name, p.email_id, p.phone, p.key_skills, p.experience_years,
       p.current_ctc, p.expected_ctc, p.notice_period, p.status, p.remarks,
       p.created_date, p.updated_date,
       IFNULL(ps.stage, 'Unknown')
FROM process_profiles pp
INNER JOIN profiles p ON p.id = pp.profile_id
LEFT JOIN profile_statuses ps ON ps.id = p.status
WHERE pp.requirement_id = ?1
"#;

pub const SELECT_ACTIVE_BY_REQUIREMENT: &str = r#"
SELECT id, requirement_id, profile_id, recruiter_name, status, actively_working,
       remarks, created_date, updated_date
FROM process_profiles
WHERE requirement_id = ?1 AND actively_working = 'Yes'
"#;

// Invoice queries
pub const INSERT_INVOICE: &str = r#"
INSERT INTO invoices (
    invoice_number, reference, company_id, po_number, amount, raised_date,
    due_date, status, remarks, created_date, updated_date
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const SELECT_INVOICE_BY_ID: &str = r#"
SELECT id, invoice_number, reference, company_id, po_number, amount,
       raised_date, due_date, status, remarks, created_date, updated_date
FROM invoices
WHERE id = ?1
"#;

pub const SELECT_INVOICE_BY_NUMBER: &str = r#"
SELECT id, invoice_number, reference, company_id, po_number, amount,
       raised_date, due_date, status, remarks, created_date, updated_date
FROM invoices
WHERE invoice_number = ?1
"#;

pub const SELECT_INVOICES: &str = r#"
SELECT id, invoice_number, reference, company_id, po_number, amount,
       raised_date, due_date, status, remarks, created_date, updated_date
FROM invoices
"#;

pub const SELECT_INVOICES_BY_COMPANY: &str = r#"
SELECT id, invoice_number, reference, company_id, po_number, amount,
       raised_date, due_date, status, remarks, created_date, updated_date
FROM invoices
WHERE company_id = ?1
"#;

// Leave queries
pub const INSERT_LEAVE: &str = r#"
INSERT INTO leaves (
    username, leave_type, start_date, end_date, days, reason, status,
    approver_comments, created_date, updated_date
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)
"#;

pub const SELECT_LEAVE_BY_ID: &str = r#"
SELECT id, username, leave_type, start_date, end_date, days, reason, status,
       approver_comments, created_date, updated_date
FROM leaves
WHERE id = ?1
"#;

pub const SELECT_LEAVES: &str = r#"
SELECT id, username, leave_type, start_date, end_date, days, reason, status,
       approver_comments, created_date, updated_date
FROM leaves
ORDER BY created_date DESC
"#;

pub const SELECT_LEAVES_BY_USER: &str = r#"
SELECT id, username, leave_type, start_date, end_date, days, reason, status,
       approver_comments, created_date, updated_date
FROM leaves
WHERE username = ?1
ORDER BY created_date DESC
"#;

pub const SELECT_PENDING_LEAVES: &str = r#"
SELECT id, username, leave_type, start_date, end_date, days, reason, status,
       approver_comments, created_date, updated_date
FROM leaves
WHERE status = 'pending'
ORDER BY created_date DESC
"#;

pub const INSERT_LEAVE_BALANCE: &str = r#"
INSERT INTO leave_balances (
    username, annual_leave, sick_leave, casual_leave, year, created_date, updated_date
)
VALUES (?1, 0, 0, 0, ?2, ?3, ?4)
"#;

pub const SELECT_LEAVE_BALANCE_BY_USER: &str = r#"
SELECT id, username, annual_leave, sick_leave, casual_leave, year,
       created_date, updated_date
FROM leave_balances
WHERE username = ?1
"#;

// Financial year queries
pub const INSERT_FINANCIAL_YEAR: &str = r#"
INSERT INTO financial_years (year, start_date, end_date, is_active, created_date, updated_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_FINANCIAL_YEAR_BY_ID: &str = r#"
SELECT id, year, start_date, end_date, is_active, created_date, updated_date
FROM financial_years
WHERE id = ?1
"#;

pub const SELECT_FINANCIAL_YEAR_BY_YEAR: &str = r#"
SELECT id, year, start_date, end_date, is_active, created_date, updated_date
FROM financial_years
WHERE year = ?1
"#;

pub const SELECT_FINANCIAL_YEARS: &str = r#"
SELECT id, year, start_date, end_date, is_active, created_date, updated_date
FROM financial_years
ORDER BY year
"#;

pub const SELECT_ACTIVE_FINANCIAL_YEAR: &str = r#"
SELECT id, year, start_date, end_date, is_active, created_date, updated_date
FROM financial_years
WHERE is_active = 1
"#;

pub const DEACTIVATE_FINANCIAL_YEARS: &str = r#"
UPDATE financial_years
SET is_active = 0, updated_date = ?1
WHERE is_active = 1
"#;

pub const ACTIVATE_FINANCIAL_YEAR: &str = r#"
UPDATE financial_years
SET is_active = 1, updated_date = ?1
WHERE id = ?2
"#;

// Holiday queries
pub const INSERT_HOLIDAY: &str = r#"
INSERT INTO holidays (financial_year_id, name, date, is_mandatory, created_date, updated_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_HOLIDAY_BY_ID: &str = r#"
SELECT id, financial_year_id, name, date, is_mandatory, created_date, updated_date
FROM holidays
WHERE id = ?1
"#;

pub const SELECT_HOLIDAYS_BY_YEAR: &str = r#"
SELECT id, financial_year_id, name, date, is_mandatory, created_date, updated_date
FROM holidays
WHERE financial_year_id = ?1
ORDER BY date ASC
"#;

pub const SELECT_MANDATORY_HOLIDAYS: &str = r#"
SELECT id, financial_year_id, name, date, is_mandatory, created_date, updated_date
FROM holidays
WHERE financial_year_id = ?1 AND is_mandatory = 1
ORDER BY date ASC
"#;

pub const SELECT_OPTIONAL_HOLIDAYS: &str = r#"
SELECT id, financial_year_id, name, date, is_mandatory, created_date, updated_date
FROM holidays
WHERE financial_year_id = ?1 AND is_mandatory = 0
ORDER BY date ASC
"#;

pub const DELETE_HOLIDAY: &str = r#"
DELETE FROM holidays
WHERE id = ?1
"#;

pub const DELETE_HOLIDAY_SELECTIONS: &str = r#"
DELETE FROM holiday_selections
WHERE username = ?1 AND financial_year_id = ?2
"#;

pub const INSERT_HOLIDAY_SELECTION: &str = r#"
INSERT INTO holiday_selections (username, holiday_id, financial_year_id, created_date)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_SELECTED_HOLIDAYS: &str = r#"
SELECT h.id, h.financial_year_id, h.name, h.date, h.is_mandatory,
       h.created_date, h.updated_date, s.created_date
FROM holiday_selections s
INNER JOIN holidays h ON h.id = s.holiday_id
WHERE s.username = ?1 AND s.financial_year_id = ?2
ORDER BY h.date ASC
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_covers_every_entity() {
        for table in [
            "users",
            "companies",
            "spocs",
            "requirement_statuses",
            "requirements",
            "profile_statuses",
            "profiles",
            "process_profiles",
            "invoices",
            "leaves",
            "leave_balances",
            "financial_years",
            "holidays",
            "holiday_selections",
        ] {
            assert!(
                CREATE_TABLES.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table: {table}"
            );
        }
    }

    #[test]
    fn test_company_name_uniqueness_is_case_insensitive() {
        assert!(CREATE_TABLES.contains("COLLATE NOCASE UNIQUE"));
    }

    #[test]
    fn test_lookup_tables_are_seeded() {
        assert!(CREATE_TABLES.contains("INSERT OR IGNORE INTO requirement_statuses"));
        assert!(CREATE_TABLES.contains("INSERT OR IGNORE INTO profile_statuses"));
        assert!(CREATE_TABLES.contains("'Interview'"));
    }

    #[test]
    fn test_pipeline_join_drops_missing_profiles() {
        assert!(SELECT_PIPELINE_BY_REQUIREMENT.contains("INNER JOIN profiles"));
        assert!(SELECT_PIPELINE_BY_REQUIREMENT.contains("IFNULL(ps.stage, 'Unknown')"));
    }

    #[test]
    fn test_placement_queries_join_company_context() {
        assert!(SELECT_PLACEMENTS_BY_DATE_RANGE.contains("LEFT JOIN companies"));
        assert!(SELECT_PLACEMENTS_BY_DATE_RANGE_AND_RECRUITER.contains("pp.recruiter_name = ?3"));
    }
}
