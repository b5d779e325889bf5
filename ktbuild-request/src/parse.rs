//! Request parsing from files and strings.

use std::{path::Path, str::FromStr};

use crate::{Error, Request, Result, error::SourceContext, validate::validate_request};

/// Filename used in diagnostics when parsing from a string.
const DEFAULT_FILENAME: &str = "request.toml";

impl FromStr for Request {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_request(s, DEFAULT_FILENAME)
    }
}

impl Request {
    /// Parse a request file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_request(&content, &path.display().to_string())
    }

    /// Parse a request from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_request(content, filename)
    }
}

/// Parse a request from content with the given filename for error reporting.
pub fn parse_request(content: &str, filename: &str) -> Result<Request> {
    let source_ctx = SourceContext::new(content, filename);
    let request: Request = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_request(&request, &source_ctx)?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use ktbuild_core::{Flag, keys};

    use super::*;

    const FULL_REQUEST: &str = r#"
        label = "//app:lib"
        sources = ["src/Main.kt", "src/Util.kt"]

        [flags]
        classpath = "lib/a.jar:lib/b.jar"
        jvm_target = "1.8"
        api_version = "1.2"

        [directories]
        classes = "out/classes"
        annotation_processing_sources = "out/kapt/sources"
        annotation_processing_classes = "out/kapt/classes"
        annotation_processing_stubs = "out/kapt/stubs"
        annotation_processing_incremental_data = "out/kapt/incremental"

        [[annotation_processing.processors]]
        processor_class = "com.example.A"
        class_path = ["lib/p1.jar", "lib/p2.jar"]

        [[annotation_processing.processors]]
        processor_class = "com.example.B"
        class_path = ["lib/p3.jar"]

        [toolchain]
        compiler = "/opt/kotlinc/bin/kotlinc"
        kapt_jar = "lib/kotlin-annotation-processing.jar"
    "#;

    fn validation_message(err: &Error) -> &str {
        match err {
            Error::Validation { message, .. } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_request() {
        let request: Request = FULL_REQUEST.parse().expect("request should parse");

        assert_eq!(request.label.as_deref(), Some("//app:lib"));
        assert_eq!(request.processor_count(), 2);
        assert_eq!(
            request.toolchain.kapt_jar.as_deref(),
            Some("lib/kotlin-annotation-processing.jar")
        );

        let flags: Vec<_> = request.flags().into_iter().collect();
        assert_eq!(
            flags,
            [
                (Flag::Label, "//app:lib".to_string()),
                (Flag::Classpath, "lib/a.jar:lib/b.jar".to_string()),
                (Flag::KotlinApiVersion, "1.2".to_string()),
                (Flag::KotlinJvmTarget, "1.8".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_to_context() {
        let request: Request = FULL_REQUEST.parse().unwrap();
        let ctx = request.to_context().unwrap();

        assert_eq!(ctx.flag(Flag::KotlinJvmTarget), Some("1.8"));
        assert_eq!(
            ctx.get(&keys::ALL_SOURCES).unwrap(),
            &vec!["src/Main.kt".to_string(), "src/Util.kt".to_string()]
        );
        assert_eq!(
            ctx.get(&keys::COMPILE_DIRECTORIES).unwrap().classes,
            "out/classes"
        );

        let descriptor = ctx.get(&keys::PLUGIN_DESCRIPTORS).unwrap();
        let class_path: Vec<_> = descriptor.class_path().collect();
        assert_eq!(class_path, ["lib/p1.jar", "lib/p2.jar", "lib/p3.jar"]);
    }

    #[test]
    fn test_minimal_request_defaults() {
        let request: Request = r#"
            [directories]
            classes = "out/classes"
        "#
        .parse()
        .unwrap();

        assert_eq!(request.toolchain.compiler, Path::new("kotlinc"));
        assert!(request.sources.is_none());

        let ctx = request.to_context().unwrap();
        assert!(!ctx.contains(&keys::ALL_SOURCES));
        assert!(!ctx.contains(&keys::PLUGIN_DESCRIPTORS));
    }

    #[test]
    fn test_absent_and_empty_processors_are_distinct() {
        let empty: Request = r#"
            sources = ["a.kt"]
            [directories]
            classes = "out/classes"
            [annotation_processing]
            processors = []
        "#
        .parse()
        .unwrap();

        let ctx = empty.to_context().unwrap();
        let descriptor = ctx.get(&keys::PLUGIN_DESCRIPTORS).expect("descriptor present");
        assert!(descriptor.is_empty());
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = r#"
            [directories]
            classes = "out/classes"
            [flags]
            jvm_targte = "1.8"
        "#
        .parse::<Request>()
        .unwrap_err();

        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let content = r#"
            sources = ["a.kt", ""]
            [directories]
            classes = "out/classes"
        "#;
        let err = content.parse::<Request>().unwrap_err();

        assert_eq!(validation_message(&err), "source path must not be empty");
        let Error::Validation { span: Some(span), .. } = *err else {
            panic!("expected a span");
        };
        assert_eq!(&content[span.offset()..span.offset() + span.len()], "\"\"");
    }

    #[test]
    fn test_processors_require_annotation_processing_directories() {
        let err = r#"
            sources = ["a.kt"]
            [directories]
            classes = "out/classes"
            [[annotation_processing.processors]]
            processor_class = "com.example.A"
        "#
        .parse::<Request>()
        .unwrap_err();

        assert_eq!(
            validation_message(&err),
            "annotation processors are configured but 'directories.annotation_processing_sources' is missing"
        );
    }

    #[test]
    fn test_processor_class_with_comma_is_rejected() {
        let err = r#"
            [directories]
            classes = "out/classes"
            annotation_processing_sources = "s"
            annotation_processing_classes = "c"
            annotation_processing_stubs = "t"
            annotation_processing_incremental_data = "i"
            [[annotation_processing.processors]]
            processor_class = "com.example.A,com.example.B"
        "#
        .parse::<Request>()
        .unwrap_err();

        assert_eq!(
            validation_message(&err),
            "processor class must not contain ','"
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.toml");
        std::fs::write(&path, FULL_REQUEST).unwrap();

        let request = Request::from_file(&path).unwrap();
        assert_eq!(request.processor_count(), 2);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Request::from_file("/nonexistent/request.toml").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
