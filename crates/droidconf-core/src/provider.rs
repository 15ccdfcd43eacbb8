//! Version provider abstraction.
//!
//! SDK levels and version metadata are owned by the surrounding Flutter
//! tooling rather than the descriptor. Loaders ask a [`VersionProvider`] for
//! them so they can be swapped out in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::Result;

/// Default compile SDK bundled with the Flutter Gradle plugin.
pub const FLUTTER_COMPILE_SDK: u32 = 34;

/// Default minimum SDK bundled with the Flutter Gradle plugin.
pub const FLUTTER_MIN_SDK: u32 = 21;

/// Default target SDK bundled with the Flutter Gradle plugin.
pub const FLUTTER_TARGET_SDK: u32 = 34;

/// Default NDK version bundled with the Flutter Gradle plugin.
pub const FLUTTER_NDK_VERSION: &str = "23.1.7779620";

/// Version code used when `local.properties` does not set one.
pub const FLUTTER_VERSION_CODE: u32 = 1;

/// Version name used when `local.properties` does not set one.
pub const FLUTTER_VERSION_NAME: &str = "1.0";

/// Location of the properties file relative to the project root.
pub const LOCAL_PROPERTIES_PATH: &str = "android/local.properties";

/// Source of externally managed version values.
pub trait VersionProvider {
    fn compile_sdk(&self) -> Option<u32>;

    fn min_sdk(&self) -> Option<u32>;

    fn target_sdk(&self) -> Option<u32>;

    fn version_code(&self) -> Option<u32>;

    fn version_name(&self) -> Option<String>;

    fn ndk_version(&self) -> Option<String> {
        None
    }
}

/// Fixed values, for embedding and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticVersions {
    pub compile_sdk: Option<u32>,
    pub min_sdk: Option<u32>,
    pub target_sdk: Option<u32>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
    pub ndk_version: Option<String>,
}

impl StaticVersions {
    /// A provider that supplies nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The values the Flutter Gradle plugin falls back to.
    pub fn flutter_defaults() -> Self {
        Self {
            compile_sdk: Some(FLUTTER_COMPILE_SDK),
            min_sdk: Some(FLUTTER_MIN_SDK),
            target_sdk: Some(FLUTTER_TARGET_SDK),
            version_code: Some(FLUTTER_VERSION_CODE),
            version_name: Some(FLUTTER_VERSION_NAME.to_string()),
            ndk_version: Some(FLUTTER_NDK_VERSION.to_string()),
        }
    }

    pub fn with_compile_sdk(mut self, level: u32) -> Self {
        self.compile_sdk = Some(level);
        self
    }

    pub fn with_min_sdk(mut self, level: u32) -> Self {
        self.min_sdk = Some(level);
        self
    }

    pub fn with_target_sdk(mut self, level: u32) -> Self {
        self.target_sdk = Some(level);
        self
    }

    pub fn with_version_code(mut self, code: u32) -> Self {
        self.version_code = Some(code);
        self
    }

    pub fn with_version_name(mut self, name: impl Into<String>) -> Self {
        self.version_name = Some(name.into());
        self
    }

    pub fn with_ndk_version(mut self, version: impl Into<String>) -> Self {
        self.ndk_version = Some(version.into());
        self
    }
}

impl VersionProvider for StaticVersions {
    fn compile_sdk(&self) -> Option<u32> {
        self.compile_sdk
    }

    fn min_sdk(&self) -> Option<u32> {
        self.min_sdk
    }

    fn target_sdk(&self) -> Option<u32> {
        self.target_sdk
    }

    fn version_code(&self) -> Option<u32> {
        self.version_code
    }

    fn version_name(&self) -> Option<String> {
        self.version_name.clone()
    }

    fn ndk_version(&self) -> Option<String> {
        self.ndk_version.clone()
    }
}

/// Values read from a Flutter project's `local.properties`, backed by the
/// Flutter plugin defaults.
#[derive(Debug, Clone, Default)]
pub struct LocalProperties {
    properties: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl LocalProperties {
    /// Parse Java properties text.
    ///
    /// Keys end at the first unescaped `=`, `:` or whitespace. `#` and `!`
    /// start comments, a trailing `\` continues the line, and backslash
    /// escapes such as `\\`, `\:` or `\uXXXX` are decoded.
    pub fn parse(content: &str) -> Self {
        let mut properties = HashMap::new();

        for line in logical_lines(content) {
            if line.is_empty() {
                continue;
            }
            let (key, value) = split_property(&line);
            properties.insert(unescape(key), unescape(value));
        }

        Self {
            properties,
            path: None,
        }
    }

    /// Read a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut props = Self::parse(&content);
        props.path = Some(path.to_path_buf());
        Ok(props)
    }

    /// Read `android/local.properties` under a project root.
    ///
    /// A missing file is not an error; only the plugin defaults apply then.
    pub fn for_project(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(LOCAL_PROPERTIES_PATH);
        if !path.exists() {
            debug!(path = %path.display(), "No local.properties, using Flutter defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Raw property lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// File the properties were read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn get_u32(&self, key: &str) -> Option<u32> {
        let raw = self.get(key)?;
        match raw.trim().parse::<u32>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key = %key, value = %raw, "Ignoring non-numeric property");
                None
            }
        }
    }
}

impl VersionProvider for LocalProperties {
    fn compile_sdk(&self) -> Option<u32> {
        self.get_u32("flutter.compileSdkVersion")
            .or(Some(FLUTTER_COMPILE_SDK))
    }

    fn min_sdk(&self) -> Option<u32> {
        self.get_u32("flutter.minSdkVersion").or(Some(FLUTTER_MIN_SDK))
    }

    fn target_sdk(&self) -> Option<u32> {
        self.get_u32("flutter.targetSdkVersion")
            .or(Some(FLUTTER_TARGET_SDK))
    }

    fn version_code(&self) -> Option<u32> {
        self.get_u32("flutter.versionCode")
            .or(Some(FLUTTER_VERSION_CODE))
    }

    fn version_name(&self) -> Option<String> {
        Some(
            self.get("flutter.versionName")
                .unwrap_or(FLUTTER_VERSION_NAME)
                .to_string(),
        )
    }

    fn ndk_version(&self) -> Option<String> {
        Some(
            self.get("flutter.ndkVersion")
                .unwrap_or(FLUTTER_NDK_VERSION)
                .to_string(),
        )
    }
}

// Join continued lines and drop comments. Leading whitespace is stripped from
// every physical line.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in content.lines() {
        let piece = raw.trim_start();
        let mut line = match pending.take() {
            Some(mut head) => {
                head.push_str(piece);
                head
            }
            None if piece.starts_with('#') || piece.starts_with('!') => continue,
            None => piece.to_string(),
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            line.pop();
            pending = Some(line);
        } else {
            lines.push(line);
        }
    }

    lines.extend(pending);
    lines
}

fn split_property(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        warn!(escape = %hex, "Keeping malformed unicode escape");
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}
