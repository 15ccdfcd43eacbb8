//! Variable interpolation for descriptor values.
//!
//! Supports variables like:
//! - `${flutter.compileSdkVersion}` - Compile SDK supplied by the version provider
//! - `${flutter.minSdkVersion}` - Minimum SDK
//! - `${flutter.targetSdkVersion}` - Target SDK
//! - `${flutter.versionCode}` - Version code
//! - `${flutter.versionName}` - Version name
//! - `${flutter.ndkVersion}` - NDK version
//! - `${env.VAR_NAME}` - Environment variable
//! - `${name}` - Custom variable
//!
//! `$${...}` is an escape and yields the literal text `${...}`.

use droidconf_core::VersionProvider;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Variable context containing all available variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    /// Values supplied by the version provider, keyed by Flutter property name
    pub flutter: HashMap<String, String>,
    /// Environment variables
    pub env: HashMap<String, String>,
    /// Custom variables defined by the caller
    pub custom: HashMap<String, String>,
}

// Regex for matching ${...} variables, with an optional leading `$` escape
static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\$)?\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)?)\}").unwrap()
});

impl VariableContext {
    /// Create a new empty variable context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context exposing every value the provider supplies under
    /// the `flutter` namespace.
    pub fn from_provider(provider: &dyn VersionProvider) -> Self {
        let mut ctx = Self::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                ctx.flutter.insert(key.to_string(), value);
            }
        };

        put(
            "compileSdkVersion",
            provider.compile_sdk().map(|v| v.to_string()),
        );
        put("minSdkVersion", provider.min_sdk().map(|v| v.to_string()));
        put(
            "targetSdkVersion",
            provider.target_sdk().map(|v| v.to_string()),
        );
        put("versionCode", provider.version_code().map(|v| v.to_string()));
        put("versionName", provider.version_name());
        put("ndkVersion", provider.ndk_version());

        ctx
    }

    /// Populate environment variables from the current process environment.
    pub fn populate_env(&mut self) {
        for (key, value) in std::env::vars() {
            self.env.insert(key, value);
        }
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, var_name: &str) -> Option<String> {
        let parts: Vec<&str> = var_name.split('.').collect();

        match parts.as_slice() {
            ["flutter", key] => self.flutter.get(*key).cloned(),
            ["env", name] => self.env.get(*name).cloned(),

            // Single-part names check custom variables
            [name] => self.custom.get(*name).cloned(),

            _ => None,
        }
    }

    /// Interpolate all variables in a string.
    ///
    /// Fails with the name of the first variable that cannot be resolved.
    pub fn try_interpolate(&self, input: &str) -> Result<String, String> {
        let mut output = String::with_capacity(input.len());
        let mut last = 0;

        for caps in VAR_REGEX.captures_iter(input) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            output.push_str(&input[last..whole.start()]);

            let var_name = &caps[2];
            if caps.get(1).is_some() {
                output.push_str(&format!("${{{}}}", var_name));
            } else {
                let value = self.resolve(var_name).ok_or_else(|| var_name.to_string())?;
                output.push_str(&value);
            }
            last = whole.end();
        }

        output.push_str(&input[last..]);
        Ok(output)
    }

    /// Escape text so that interpolation reproduces it unchanged.
    pub fn escape(input: &str) -> String {
        VAR_REGEX
            .replace_all(input, |caps: &regex::Captures| format!("${}", &caps[0]))
            .to_string()
    }

    /// Names of all unescaped variables referenced in a string.
    pub fn references(input: &str) -> Vec<String> {
        VAR_REGEX
            .captures_iter(input)
            .filter(|caps| caps.get(1).is_none())
            .map(|caps| caps[2].to_string())
            .collect()
    }
}

/// Builder for creating VariableContext.
pub struct VariableContextBuilder {
    ctx: VariableContext,
}

impl VariableContextBuilder {
    pub fn new() -> Self {
        Self {
            ctx: VariableContext::new(),
        }
    }

    pub fn with_flutter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ctx.flutter.insert(key.into(), value.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ctx.env.insert(key.into(), value.into());
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ctx.custom.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> VariableContext {
        self.ctx
    }
}

impl Default for VariableContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
