/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (with `#[serde(default = ...)]` for
/// optional settings) and call `Config::from_env()` at startup. Field names map
/// to upper-cased env vars: `code_ttl_minutes` reads `CODE_TTL_MINUTES`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit set of variables instead of the process env.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
