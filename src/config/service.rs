/// HTTP surface defaults
pub struct ServiceConfig {
    pub bind: &'static str,
    pub port: u16,
    /// Title reported by `GET /`
    pub title: &'static str,
    /// false = every failure is a 500, true = typed failures get their own status
    pub distinct_status_codes: bool,
    /// Rows shown at each end by `GET /validate-data` when no limit is given
    pub validate_rows: u32,
}

pub const SERVICE: ServiceConfig = ServiceConfig {
    bind: "0.0.0.0",
    port: 8000,
    title: "Profit Horizon - price forecast API",
    distinct_status_codes: false,
    validate_rows: 5,
};
