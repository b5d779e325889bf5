use std::fmt;

use serde::Serialize;

/// A resolved build flag carried by a compile request.
///
/// Only some flags map directly onto a `kotlinc` argument; the rest are
/// carried for the benefit of other build actions and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// The label of the target being built.
    Label,
    Classpath,
    KotlinApiVersion,
    KotlinLanguageVersion,
    KotlinJvmTarget,
}

impl Flag {
    /// The `kotlinc` argument this flag maps to, if any.
    pub fn kotlin_flag(self) -> Option<&'static str> {
        match self {
            Flag::Label => None,
            Flag::Classpath => Some("-cp"),
            Flag::KotlinApiVersion => Some("-api-version"),
            Flag::KotlinLanguageVersion => Some("-language-version"),
            Flag::KotlinJvmTarget => Some("-jvm-target"),
        }
    }

    /// The flag name as it appears in request files.
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Label => "label",
            Flag::Classpath => "classpath",
            Flag::KotlinApiVersion => "api_version",
            Flag::KotlinLanguageVersion => "language_version",
            Flag::KotlinJvmTarget => "jvm_target",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kotlin_flag_mapping() {
        assert_eq!(Flag::Classpath.kotlin_flag(), Some("-cp"));
        assert_eq!(Flag::KotlinJvmTarget.kotlin_flag(), Some("-jvm-target"));
        assert_eq!(Flag::Label.kotlin_flag(), None);
    }
}
