//! Check REST API endpoint constants.

/// Base URL for the Business.Ru check open API.
pub const CHECK_BASE_URL: &str = "https://check.business.ru/open-api/v1";

/// Obtain an integration token.
pub const TOKEN: &str = "/Token/";

/// Current user / account.
pub const USER: &str = "/User/";

/// Fiscal registrar commands. Append `/{id}` for a single command.
pub const COMMAND: &str = "/Command";

/// System state.
pub const STATE_SYSTEM: &str = "/StateSystem/";

/// Shifts.
pub const SHIFT: &str = "/Shift/";
