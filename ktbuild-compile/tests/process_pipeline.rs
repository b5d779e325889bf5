//! End-to-end run of a compile request against a stand-in `kotlinc` script.

#![cfg(unix)]

use std::{
    fs,
    io::{self, Write},
    os::unix::fs::PermissionsExt,
    path::Path,
    sync::{Arc, Mutex},
};

use indexmap::IndexMap;
use ktbuild_compile::{
    ActionRunner, Toolchain, compiler::ProcessCompiler, diagnostics::ConsoleSink,
    plugin_args::PluginIdentity,
};
use ktbuild_core::{
    CompileDirectories, Context, ExitCode, Flag, Processor, ProcessorDescriptor, keys,
};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a script that generates a Java source when loaded with a plugin
/// and otherwise fails the compilation after echoing its arguments.
fn write_fake_kotlinc(dir: &Path, generated_dir: &Path) -> std::path::PathBuf {
    let script = format!(
        r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -Xplugin=*) kapt=1 ;;
  esac
done
if [ -n "$kapt" ]; then
  mkdir -p "{gen}"
  echo 'class Gen {{}}' > "{gen}/Gen.java"
  echo "info: kapt finished"
  exit 0
fi
echo "info: compiling $*"
echo "src/Main.kt:1:1: error: unresolved reference: missing" >&2
exit 1
"#,
        gen = generated_dir.display()
    );

    let path = dir.join("kotlinc");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_kapt_then_deferred_compile_error() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    let directories = CompileDirectories {
        classes: root.join("classes").display().to_string(),
        annotation_processing_sources: root.join("kapt/sources").display().to_string(),
        annotation_processing_classes: root.join("kapt/classes").display().to_string(),
        annotation_processing_stubs: root.join("kapt/stubs").display().to_string(),
        annotation_processing_incremental_data: root.join("kapt/incremental").display().to_string(),
    };
    let generated_dir = root.join("kapt/sources/gen");
    let kotlinc = write_fake_kotlinc(root, &generated_dir);

    let buffer = SharedBuffer::default();
    let toolchain = Toolchain::new(
        Arc::new(ProcessCompiler::new(kotlinc)),
        Arc::new(ConsoleSink::new(buffer.clone())),
    )
    .with_kapt(PluginIdentity::kapt("kapt.jar"));

    let mut flags = IndexMap::new();
    flags.insert(Flag::KotlinJvmTarget, "1.8".to_string());
    let mut ctx = Context::new(flags);
    ctx.put(&keys::COMPILE_DIRECTORIES, directories).unwrap();
    ctx.put(&keys::ALL_SOURCES, vec!["src/Main.kt".to_string()])
        .unwrap();
    ctx.put(
        &keys::PLUGIN_DESCRIPTORS,
        ProcessorDescriptor::new(vec![Processor::new("com.example.A", ["a.jar"])]),
    )
    .unwrap();

    let code = ActionRunner::kotlin_jvm(&toolchain).run(&mut ctx).unwrap();

    assert_eq!(code, ExitCode::COMPILATION_ERROR);
    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[0], "info: kapt finished");
    assert!(lines[1].starts_with("info: compiling -jvm-target 1.8 -d "));
    assert!(lines[1].ends_with(&format!(
        "src/Main.kt {}",
        generated_dir.join("Gen.java").display()
    )));
    assert_eq!(
        lines[2],
        "src/Main.kt:1:1: error: unresolved reference: missing"
    );
}
