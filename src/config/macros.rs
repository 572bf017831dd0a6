//! Configuration macros for zero-repetition config definitions

/// Define a configuration struct with embedded defaults
///
/// Each field carries its type and default value in one place. The macro
/// generates:
/// - The struct with public fields
/// - The Default implementation
/// - Serde support with `#[serde(default)]`, so partial TOML files load
///
/// # Example
/// ```
/// recency_cache::config_struct! {
///     pub struct WarmupConfig {
///         preload_keys: usize = 256,
///         enabled: bool = true,
///     }
/// }
///
/// let config = WarmupConfig::default();
/// assert_eq!(config.preload_keys, 256);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
