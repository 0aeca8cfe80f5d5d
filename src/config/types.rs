use serde::Deserialize;

/// Main configuration structure for Dapo-Harvest
///
/// Every section is optional in the TOML file; omitted values fall back to the
/// registry defaults the harvester was first written against.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
    pub targets: TargetConfig,
}

/// Upstream registry endpoints and HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Host serving the `/rekap/*` JSON endpoints
    pub base_url: String,

    /// Host serving the `/sekolah/{id}` HTML profile pages
    pub profile_base_url: String,

    /// Semester identifier passed to every structured query (e.g. "20251")
    pub semester_id: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// The registry has shipped broken certificate chains before
    pub accept_invalid_certs: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dapo.kemendikdasmen.go.id".to_string(),
            profile_base_url: "https://dapo.dikdasmen.go.id".to_string(),
            semester_id: "20251".to_string(),
            request_timeout_secs: 10,
            accept_invalid_certs: true,
            user_agent: concat!("dapo-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Backoff shape between retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffStrategy {
    Fixed,
    Exponential,
}

/// Retry behavior for every upstream request
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    pub strategy: BackoffStrategy,

    /// Delay before each retry (fixed) or before the first retry (exponential)
    pub backoff_ms: u64,

    /// Cap for exponential growth
    pub max_backoff_ms: u64,

    /// Total attempts per request; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffStrategy::Fixed,
            backoff_ms: 500,
            max_backoff_ms: 30_000,
            max_attempts: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV sink
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "result/data_sekolah_combined.csv".to_string(),
        }
    }
}

/// Which parts of the registry to harvest
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TargetConfig {
    /// City/regency name fragments, matched case-insensitively
    pub cities: Vec<String>,

    /// Accepted `bentuk_pendidikan` values
    pub education_forms: Vec<String>,

    /// Accepted `status_sekolah` values
    pub ownership_statuses: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            cities: ["BANDUNG", "YOGYAKARTA", "BOGOR", "SURABAYA", "SIDOARJO", "MALANG"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            education_forms: ["SD", "SMP", "SMA", "SMK"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ownership_statuses: vec!["Negeri".to_string(), "Swasta".to_string()],
        }
    }
}
