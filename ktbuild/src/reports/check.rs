//! Check command report.

use std::path::{Path, PathBuf};

use ktbuild_compile::{CompilePhase, CompilePlan};
use ktbuild_request::Request;

use super::output::{Output, Report};

/// Summary of a validated compile request.
#[derive(Debug)]
pub struct CheckReport {
    pub request_path: PathBuf,
    pub label: Option<String>,
    /// `None` when the request lists no sources at all.
    pub source_count: Option<usize>,
    /// `None` when annotation processing is not configured.
    pub processors: Option<Vec<String>>,
    pub plan: Option<CompilePlan>,
}

impl CheckReport {
    pub fn new(path: &Path, request: &Request, plan: Option<CompilePlan>) -> Self {
        Self {
            request_path: path.to_path_buf(),
            label: request.label.clone(),
            source_count: request.sources.as_ref().map(Vec::len),
            processors: request.annotation_processing.as_ref().map(|ap| {
                ap.processors
                    .iter()
                    .map(|p| p.processor_class.get_ref().clone())
                    .collect()
            }),
            plan,
        }
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.request_path.display()));
        out.newline();

        if let Some(label) = &self.label {
            out.key_value_indented("label", label);
        }
        let sources = match self.source_count {
            Some(count) => count.to_string(),
            None => "missing".to_string(),
        };
        out.key_value_indented("sources", &sources);

        match &self.processors {
            None => out.key_value_indented("annotation processing", "not configured"),
            Some(processors) if processors.is_empty() => {
                out.key_value_indented("annotation processing", "nothing to run")
            }
            Some(processors) => {
                out.key_value_indented(
                    "annotation processing",
                    &format!("{} processor(s)", processors.len()),
                );
                for processor in processors {
                    out.list_item(processor);
                }
            }
        }

        let Some(plan) = &self.plan else {
            return;
        };
        if let Some(args) = &plan.annotation_processing {
            out.newline();
            out.divider(&CompilePhase::AnnotationProcessing.to_string());
            out.preformatted(&args.join(" "));
        }
        out.newline();
        out.divider(&CompilePhase::Main.to_string());
        out.preformatted(&plan.main.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl Output for Lines {
        fn key_value_indented(&mut self, key: &str, value: &str) {
            self.0.push(format!("  {key}: {value}"));
        }

        fn list_item(&mut self, text: &str) {
            self.0.push(format!("  - {text}"));
        }

        fn divider(&mut self, label: &str) {
            self.0.push(format!("-- {label} --"));
        }

        fn preformatted(&mut self, text: &str) {
            self.0.push(text.to_string());
        }

        fn newline(&mut self) {
            self.0.push(String::new());
        }
    }

    #[test]
    fn test_render_with_plan() {
        let request: Request = r#"
            label = "//app:lib"
            sources = ["Main.kt"]
            [directories]
            classes = "out"
            annotation_processing_sources = "s"
            annotation_processing_classes = "c"
            annotation_processing_stubs = "t"
            annotation_processing_incremental_data = "i"
            [[annotation_processing.processors]]
            processor_class = "com.example.A"
        "#
        .parse()
        .unwrap();
        let plan = CompilePlan {
            annotation_processing: Some(vec!["-d".into(), "out".into(), "-Xplugin=kapt.jar".into()]),
            main: vec!["-d".into(), "out".into(), "Main.kt".into()],
        };

        let mut lines = Lines::default();
        CheckReport::new(Path::new("request.toml"), &request, Some(plan)).render(&mut lines);

        assert_eq!(
            lines.0,
            [
                "✓ request.toml is valid",
                "",
                "  label: //app:lib",
                "  sources: 1",
                "  annotation processing: 1 processor(s)",
                "  - com.example.A",
                "",
                "-- annotation processing --",
                "-d out -Xplugin=kapt.jar",
                "",
                "-- kotlin compile --",
                "-d out Main.kt",
            ]
        );
    }

    #[test]
    fn test_render_without_sources_or_processors() {
        let request: Request = r#"
            [directories]
            classes = "out"
        "#
        .parse()
        .unwrap();

        let mut lines = Lines::default();
        CheckReport::new(Path::new("r.toml"), &request, None).render(&mut lines);

        assert_eq!(
            lines.0,
            [
                "✓ r.toml is valid",
                "",
                "  sources: missing",
                "  annotation processing: not configured",
            ]
        );
    }
}
