//! Global subscriber installation.

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives for the MDES crates.
///
/// Read before `RUST_LOG`, so a host application can keep its own
/// `RUST_LOG` and still tune the schema reader separately.
pub const LOG_ENV_VAR: &str = "MDES_LOG";

/// Output flavor of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines, operation boundaries included
    Development,
    /// One JSON object per record
    Production,
    /// Compact lines on stderr, schema warnings and errors only
    Quiet,
}

impl Profile {
    fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => "mdes_core=debug,mdes_store=debug",
            Profile::Production => "mdes_core=info,mdes_store=info",
            Profile::Quiet => "mdes_core=warn,mdes_store=warn",
        }
    }
}

fn filter_for(profile: Profile) -> EnvFilter {
    std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(profile.default_directives()))
}

/// Installs the global subscriber for `profile`.
///
/// Returns `false` when a global subscriber was already set, either by an
/// earlier call or by the embedding application; the existing one stays.
pub fn init(profile: Profile) -> bool {
    let filter = filter_for(profile);
    let installed = match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        Profile::Quiet => tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init(),
    };
    installed.is_ok()
}
