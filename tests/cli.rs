use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn bundler_runs_with_defaults() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    let store = root.join("store");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("habits.ts"), "export const habits = [];\n").unwrap();
    std::fs::write(root.join("app.vue"), "<template/>\n").unwrap();
    std::fs::write(root.join("readme.md"), "# nope\n").unwrap();

    let vendored = root.join("node_modules");
    std::fs::create_dir_all(&vendored).unwrap();
    std::fs::write(vendored.join("mod.ts"), "// vendored\n").unwrap();

    Command::cargo_bin("src2prompt")
        .unwrap()
        .current_dir(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("app.vue"))
        .stdout(predicate::str::contains("store/habits.ts"))
        .stdout(predicate::str::contains("Total files added: 2"))
        .stdout(predicate::str::contains("Saved to: project.txt"));

    let bundle = std::fs::read_to_string(root.join("project.txt")).unwrap();
    assert!(bundle.contains("// app.vue"));
    assert!(bundle.contains("export const habits = [];"));
    assert!(!bundle.contains("readme.md"));
    assert!(!bundle.contains("vendored"));
}

#[test]
fn bundler_honors_flags() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    std::fs::write(root.join("keep.py"), "print('keep')\n").unwrap();
    let skipped = root.join("skipme");
    std::fs::create_dir_all(&skipped).unwrap();
    std::fs::write(skipped.join("hidden.py"), "print('hidden')\n").unwrap();

    Command::cargo_bin("src2prompt")
        .unwrap()
        .current_dir(root)
        .args(["--include", ".py"])
        .args(["--exclude", "*skip*"])
        .arg("--force-include")
        .args(["-o", "custom.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files added: 1"))
        .stdout(predicate::str::contains("Saved to: custom.txt"));

    let bundle = std::fs::read_to_string(root.join("custom.txt")).unwrap();
    assert!(bundle.contains("// keep.py"));
    assert!(!bundle.contains("hidden"));
}

#[test]
fn unbundler_fails_without_input() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    Command::cargo_bin("prompt2src")
        .unwrap()
        .current_dir(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));

    // Nothing may be created on the failure path.
    assert_eq!(std::fs::read_dir(root).unwrap().count(), 0);
}

#[test]
fn unbundler_restores_a_bundle() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    std::fs::write(root.join("input.txt"), "// a/b.py\n```\nprint(1)\n```\n").unwrap();

    Command::cargo_bin("prompt2src")
        .unwrap()
        .current_dir(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created file: a/b.py"))
        .stdout(predicate::str::contains("All files created successfully."));

    let restored = std::fs::read_to_string(root.join("a/b.py")).unwrap();
    assert_eq!(restored, "print(1)\n");
}

#[test]
fn unbundler_skips_bad_records_and_exits_nonzero() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    let bundle = "// evil.exe\n```\nboom\n```\n\n// ok.py\n```\nfine\n```\n";
    std::fs::write(root.join("input.txt"), bundle).unwrap();

    Command::cargo_bin("prompt2src")
        .unwrap()
        .current_dir(root)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Created file: ok.py"))
        .stderr(predicate::str::contains("could not be restored"));

    assert_eq!(
        std::fs::read_to_string(root.join("ok.py")).unwrap(),
        "fine\n"
    );
    assert!(!root.join("evil.exe").exists());
}

#[test]
fn binaries_roundtrip_a_tree() {
    let temp_dir = tempdir().unwrap();
    let source_root = temp_dir.path().join("project");
    let src = source_root.join("src");
    std::fs::create_dir_all(&src).unwrap();

    let app = "let x = 1;\nlet y = 2;\n";
    std::fs::write(src.join("app.ts"), app).unwrap();
    let util = "def util():\n    return 42\n";
    std::fs::write(source_root.join("util.py"), util).unwrap();

    Command::cargo_bin("src2prompt")
        .unwrap()
        .current_dir(&source_root)
        .args(["--include", ".ts", ".py"])
        .args(["-o", "input.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files added: 2"));

    let restore_root = temp_dir.path().join("restored");
    std::fs::create_dir_all(&restore_root).unwrap();
    std::fs::copy(source_root.join("input.txt"), restore_root.join("input.txt")).unwrap();

    Command::cargo_bin("prompt2src")
        .unwrap()
        .current_dir(&restore_root)
        .assert()
        .success()
        .stdout(predicate::str::contains("All files created successfully."));

    assert_eq!(
        std::fs::read_to_string(restore_root.join("src/app.ts")).unwrap(),
        app
    );
    assert_eq!(
        std::fs::read_to_string(restore_root.join("util.py")).unwrap(),
        util
    );
}
