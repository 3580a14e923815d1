use serial_test::serial;
use std::fs;
use tempfile::TempDir;
use treetest::prelude::*;
use treetest_config::ConfigLoader;

fn load(content: &str) -> (TempDir, treetest_config::Config) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("treetest.toml"), content).unwrap();
    let mut loader = ConfigLoader::with_global_config_path(temp_dir.path().join("none.toml"));
    let config = loader.load_from_directory(temp_dir.path()).unwrap();
    (temp_dir, config)
}

#[test]
#[serial]
fn test_failing_suite_without_exit() {
    let (_dir, config) = load(
        r#"
[runner]
exit_on_failure = false

[reporter]
color = false
"#,
    );

    let mut manager = Manager::from_config(&config);
    manager.test_section("s", |s| {
        s.test("bad", |t, _| {
            t.assert(false, "ko");
            Ok(())
        });
        Ok(())
    });

    // the process keeps running and the code is still reported
    assert_eq!(manager.execute().unwrap(), 1);
}

#[test]
#[serial]
fn test_hosted_flag_drives_running_context() {
    let (_dir, config) = load("[runner]\nhosted = true\nexit_on_failure = false\n");

    let mut manager = Manager::from_config(&config);
    manager.test_section("s", |s| {
        s.test("inside", |t, _| {
            t.set_running_context(RunningContext::InsideOnly);
            t.assert(true, "runs when hosted");
            Ok(())
        });
        s.test("outside", |t, _| {
            t.set_running_context(RunningContext::OutsideOnly);
            t.assert(false, "skipped when hosted");
            Ok(())
        });
        Ok(())
    });

    assert_eq!(manager.execute().unwrap(), 0);
    assert_eq!(manager.info().passed_assertion_count(), 1);
    assert_eq!(manager.info().failed_assertion_count(), 0);
}

#[test]
#[serial]
fn test_message_prefix_from_config() {
    let (_dir, config) = load("[runner]\nmessage_prefix = \"[cfg] \"\n");

    let mut manager = Manager::from_config(&config);
    manager.test_section("s", |s| {
        s.test("prefixed", |t, _| {
            let inherited = t.message_prefix() == "[cfg] ";
            t.assert(inherited, "prefix inherited");
            Ok(())
        });
        Ok(())
    });

    assert_eq!(manager.execute().unwrap(), 0);
}
