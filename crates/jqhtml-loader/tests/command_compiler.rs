//! Tests for the subprocess compiler, using `sh -c` scripts as stand-ins
//! for a real jqhtml compiler executable.

#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use jqhtml_build::{Loader, Location, Message, OnLoadResult, PluginBuild};
use jqhtml_loader::{
    create_plugin, CommandCompiler, CommandConfig, CommandError, CompileError, CompileOptions,
    ModuleFormat, PluginOptions, TemplateCompiler,
};
use pretty_assertions::assert_eq;

fn script(body: &str) -> CommandCompiler {
    CommandCompiler::discover(CommandConfig::with_program("sh").arg("-c").arg(body)).unwrap()
}

fn esm(sourcemap: bool) -> CompileOptions {
    CompileOptions {
        format: ModuleFormat::Esm,
        sourcemap,
    }
}

#[tokio::test]
async fn success_response() {
    let compiler = script(
        r#"cat > /dev/null; printf '%s' '{"code":"const x = 1;","componentName":"Foo"}'"#,
    );
    let compiled = compiler
        .compile("<Define:Foo/>", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap();
    assert_eq!(compiled.code, "const x = 1;");
    assert_eq!(compiled.component_name, "Foo");
}

#[tokio::test]
async fn source_is_passed_on_stdin() {
    let compiler =
        script(r#"src=$(cat); printf '{"code":"%s","componentName":"Echo"}' "$src""#);
    let compiled = compiler
        .compile("hello template", Path::new("/src/Echo.jqhtml"), &esm(true))
        .await
        .unwrap();
    assert_eq!(compiled.code, "hello template");
}

#[tokio::test]
async fn sourcemap_flag_follows_options() {
    let body = r#"case " $0 $* " in *" --sourcemap "*) sm=on;; *) sm=off;; esac; cat > /dev/null; printf '{"code":"%s","componentName":"Foo"}' "$sm""#;
    let compiler = script(body);
    let path = Path::new("/src/Foo.jqhtml");

    let on = compiler.compile("", path, &esm(true)).await.unwrap();
    assert_eq!(on.code, "on");

    let off = compiler.compile("", path, &esm(false)).await.unwrap();
    assert_eq!(off.code, "off");
}

#[tokio::test]
async fn error_response_is_structured() {
    let compiler = script(
        r#"cat > /dev/null; printf '%s' '{"error":{"message":"Unexpected token","line":4,"column":10}}'"#,
    );
    let err = compiler
        .compile("<", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap_err();
    assert_eq!(err, CompileError::new("Unexpected token").at(4, 10));
}

#[tokio::test]
async fn error_response_survives_non_zero_exit() {
    let compiler = script(
        r#"cat > /dev/null; printf '%s' '{"error":{"message":"Unexpected token","line":4,"column":10}}'; echo failed >&2; exit 1"#,
    );
    let path = Path::new("/src/Foo.jqhtml");

    let err = compiler.compile("<", path, &esm(true)).await.unwrap_err();
    assert_eq!(err, CompileError::new("Unexpected token").at(4, 10));

    let plugin = create_plugin(PluginOptions::default(), compiler);
    let result = plugin.interceptor().compile("<", path).await;
    assert_eq!(
        result,
        OnLoadResult::error(
            Message::new("Unexpected token").with_location(Location::new(path, 4, 10))
        )
    );
}

#[tokio::test]
async fn success_output_with_non_zero_exit_is_an_exit_error() {
    let compiler = script(
        r#"cat > /dev/null; printf '%s' '{"code":"x","componentName":"Foo"}'; exit 2"#,
    );
    let err = compiler
        .run("", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::NonZeroExit { exit_code: 2, .. }));
}

#[tokio::test]
async fn non_zero_exit_reports_stderr() {
    let compiler = script("cat > /dev/null; echo boom >&2; exit 3");
    let path = Path::new("/src/Foo.jqhtml");

    let err = compiler.run("", path, &esm(true)).await.unwrap_err();
    assert!(matches!(err, CommandError::NonZeroExit { exit_code: 3, ref stderr } if stderr == "boom"));

    let err = compiler.compile("", path, &esm(true)).await.unwrap_err();
    let text = err.message.unwrap();
    assert!(text.contains("status 3"));
    assert!(text.contains("boom"));
    assert_eq!(err.line, None);
}

#[tokio::test]
async fn malformed_output_fails_fast() {
    let compiler = script("cat > /dev/null; echo 'not json'");
    let err = compiler
        .run("", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::MalformedOutput(_)));
}

#[tokio::test]
async fn missing_component_name_fails_fast() {
    let compiler = script(r#"cat > /dev/null; printf '%s' '{"code":"x"}'"#);
    let err = compiler
        .compile("", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap_err();
    assert!(err.message.unwrap().contains("malformed output"));
    assert_eq!(err.line, None);
}

#[tokio::test]
async fn slow_compiler_times_out() {
    let config = CommandConfig::with_program("sh")
        .arg("-c")
        .arg("sleep 5")
        .timeout(Duration::from_millis(200));
    let compiler = CommandCompiler::discover(config).unwrap();

    let err = compiler
        .run("", Path::new("/src/Foo.jqhtml"), &esm(true))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Timeout { timeout } if timeout == Duration::from_millis(200)));
    assert!(err.to_string().ends_with("timed out after 200ms"));
}

#[tokio::test]
async fn plugin_with_command_compiler() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("Foo.jqhtml");
    let bad = dir.path().join("Bad.jqhtml");
    std::fs::write(&good, "<Define:Foo/>").unwrap();
    std::fs::write(&bad, "BROKEN").unwrap();

    let body = r#"src=$(cat); if [ "$src" = "BROKEN" ]; then printf '%s' '{"error":{"message":"Bad tag","context":"<div","suggestion":"Close the tag"}}'; else printf '%s' '{"code":"const x = 1;","componentName":"Foo"}'; fi"#;
    let plugin = create_plugin(PluginOptions::default(), script(body));
    let mut build = PluginBuild::new();
    build.register(&plugin);

    let result = build.load(&good).await.unwrap().unwrap();
    assert_eq!(
        result,
        OnLoadResult::contents(
            "\nconst x = 1;\n\n// Export component name for manual registration\nexport const __jqhtml_component_name = \"Foo\";\n",
            Loader::Js
        )
    );

    let result = build.load(&bad).await.unwrap().unwrap();
    assert_eq!(
        result,
        OnLoadResult::error(Message::new(
            "Bad tag\n\nContext: <div\nSuggestion: Close the tag"
        ))
    );
}

#[tokio::test]
async fn command_error_location_is_never_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Crash.jqhtml");
    std::fs::write(&path, "").unwrap();

    let plugin = create_plugin(PluginOptions::default(), script("cat > /dev/null; exit 1"));
    let result = plugin.interceptor().load(&path).await.unwrap();
    let errors = result.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].location, None::<Location>);
    assert!(errors[0].text.contains("exited with status 1"));
}
