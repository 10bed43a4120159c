//! The bundling strategy shared by identity resolution and the nested compile.
//!
//! Host-side resolution is a no-op only because the nested compile resolves the
//! whole module graph itself. Both halves read from one [`BundlingStrategy`], so
//! they cannot be configured independently.

use lamina_config::{BuildSettings, Platform};

/// How the host pipeline resolves module specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// Return every specifier unchanged and let the nested compile resolve it.
    #[default]
    Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlingStrategy {
    pub resolution: Resolution,
    /// Package names kept as runtime references (exact name or `name/...` subpath)
    pub externals: Vec<String>,
    pub platform: Platform,
    pub minify: bool,
    pub sourcemap: bool,
}

impl BundlingStrategy {
    pub fn from_settings(settings: &BuildSettings) -> Self {
        Self {
            resolution: Resolution::Identity,
            externals: settings.externals.clone(),
            platform: settings.platform,
            minify: settings.minify,
            sourcemap: settings.sourcemap,
        }
    }

    /// Resolve a specifier according to the strategy's resolution policy.
    pub fn resolve(&self, specifier: &str, _importer: Option<&str>) -> Option<String> {
        match self.resolution {
            Resolution::Identity => Some(specifier.to_string()),
        }
    }

    /// Whether `specifier` names an excluded package or one of its subpaths.
    pub fn is_external(&self, specifier: &str) -> bool {
        self.externals.iter().any(|name| {
            specifier == name
                || specifier
                    .strip_prefix(name.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl Default for BundlingStrategy {
    fn default() -> Self {
        Self::from_settings(&BuildSettings::default())
    }
}
