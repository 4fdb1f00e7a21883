use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selects the DynamoDB backend when true, SQLite otherwise
    /// (default: false). Read once at connect time; the backend is never
    /// switched afterwards.
    pub use_dynamodb: bool,
    /// Path to the SQLite database file (default: "talentdesk.db").
    pub sqlite_path: String,
    /// Deployment environment name (default: "dev"). The dev environment
    /// suffixes every DynamoDB table name with "-dev".
    pub environment: String,
    /// DynamoDB table names.
    pub tables: TableNames,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `USE_DYNAMODB` - "true" selects the DynamoDB backend (default: false)
    /// - `SQLITE_PATH` - SQLite database path (default: "talentdesk.db")
    /// - `ENVIRONMENT` - deployment environment (default: "dev")
    /// - `*_TABLE` - per-entity DynamoDB table name overrides
    ///
    /// AWS region and credentials ride the SDK's default chain and are not
    /// configured here.
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let tables = TableNames::from_env(table_suffix(&environment));

        Self {
            use_dynamodb: env::var("USE_DYNAMODB")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "talentdesk.db".to_string()),
            environment,
            tables,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Table-name suffix for an environment: "-dev" in dev, nothing elsewhere.
fn table_suffix(environment: &str) -> &'static str {
    if environment == "dev" {
        "-dev"
    } else {
        ""
    }
}

/// DynamoDB table names, one per entity plus the shared ID counter table.
#[derive(Debug, Clone)]
pub struct TableNames {
    pub companies: String,
    pub spocs: String,
    pub requirements: String,
    pub requirement_statuses: String,
    pub profiles: String,
    pub profile_statuses: String,
    pub process_profiles: String,
    pub invoices: String,
    pub leaves: String,
    pub leave_balances: String,
    pub financial_years: String,
    pub holidays: String,
    pub holiday_selections: String,
    pub users: String,
    pub counters: String,
}

impl TableNames {
    /// Resolve table names from the environment, falling back to the
    /// suffixed defaults.
    pub fn from_env(suffix: &str) -> Self {
        Self {
            companies: table_name("COMPANIES_TABLE", "talentdesk-companies", suffix),
            spocs: table_name("SPOCS_TABLE", "talentdesk-spocs", suffix),
            requirements: table_name("REQUIREMENTS_TABLE", "talentdesk-requirements", suffix),
            requirement_statuses: table_name(
                "REQUIREMENT_STATUSES_TABLE",
                "talentdesk-requirement-statuses",
                suffix,
            ),
            profiles: table_name("PROFILES_TABLE", "talentdesk-profiles", suffix),
            profile_statuses: table_name(
                "PROFILE_STATUSES_TABLE",
                "talentdesk-profile-statuses",
                suffix,
            ),
            process_profiles: table_name(
                "PROCESS_PROFILES_TABLE",
                "talentdesk-process-profiles",
                suffix,
            ),
            invoices: table_name("INVOICES_TABLE", "talentdesk-invoices", suffix),
            leaves: table_name("LEAVES_TABLE", "talentdesk-leaves", suffix),
            leave_balances: table_name(
                "LEAVE_BALANCES_TABLE",
                "talentdesk-leave-balances",
                suffix,
            ),
            financial_years: table_name(
                "FINANCIAL_YEARS_TABLE",
                "talentdesk-financial-years",
                suffix,
            ),
            holidays: table_name("HOLIDAYS_TABLE", "talentdesk-holidays", suffix),
            holiday_selections: table_name(
                "USER_HOLIDAY_SELECTIONS_TABLE",
                "talentdesk-user-holiday-selections",
                suffix,
            ),
            users: table_name("USERS_TABLE", "talentdesk-users", suffix),
            counters: table_name("COUNTERS_TABLE", "talentdesk-counters", suffix),
        }
    }
}

fn table_name(var: &str, default_base: &str, suffix: &str) -> String {
    env::var(var).unwrap_or_else(|_| format!("{default_base}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_environment_suffixes_tables() {
        assert_eq!(table_suffix("dev"), "-dev");
        assert_eq!(table_suffix("prod"), "");
        assert_eq!(table_suffix("staging"), "");
    }

    #[test]
    fn test_default_table_names_carry_suffix() {
        let tables = TableNames::from_env("-dev");

        assert_eq!(tables.companies, "talentdesk-companies-dev");
        assert_eq!(tables.counters, "talentdesk-counters-dev");
        assert_eq!(
            tables.holiday_selections,
            "talentdesk-user-holiday-selections-dev"
        );
    }

    #[test]
    fn test_production_table_names_have_no_suffix() {
        let tables = TableNames::from_env("");

        assert_eq!(tables.companies, "talentdesk-companies");
        assert_eq!(tables.requirements, "talentdesk-requirements");
    }
}
