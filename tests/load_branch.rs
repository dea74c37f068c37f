use flate2::{write::GzEncoder, Compression};
use mbc::{compare_versions, load_repositories, Config, Detail, LoadWarning};
use std::{fs, io::Write, path::Path};
use tar::{Builder, Header};
use tempfile::TempDir;

fn write_db(dir: &Path, repo: &str, pkgs: &[(&str, &str, &str)]) {
    let mut builder = Builder::new(Vec::new());
    for (name, version, desc) in pkgs {
        let content = format!(
            "%NAME%\n{name}\n\n%VERSION%\n{version}\n\n%DESC%\n{desc}\n\n%BUILDDATE%\n1700000000\n\n"
        );
        let mut header = Header::new_gnu();
        header.set_mode(0o644);
        header.set_size(content.len() as u64);
        builder
            .append_data(
                &mut header,
                format!("{name}-{version}/desc"),
                content.as_bytes(),
            )
            .unwrap();
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&builder.into_inner().unwrap()).unwrap();
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{repo}.db")), encoder.finish().unwrap()).unwrap();
}

#[test]
fn compare_two_branches() {
    let cache = TempDir::new().unwrap();
    let config = Config::from_toml(&format!(
        "cache_dir = {:?}\nbranches = [\"stable\", \"unstable\"]\nrepos = [\"core\", \"extra\"]\n",
        cache.path().display().to_string()
    ))
    .unwrap();

    let stable = config.sync_dir("stable");
    write_db(&stable, "core", &[("linux", "6.12.1-1", "The Linux kernel")]);
    write_db(&stable, "extra", &[("firefox", "133.0-1", "Web browser")]);
    let unstable = config.sync_dir("unstable");
    write_db(&unstable, "core", &[("linux", "6.13rc1-1", "The Linux kernel")]);
    write_db(&unstable, "extra", &[("firefox", "133.0.3-1", "Web browser")]);

    let (stable, warnings) = config.load_branch("stable", Detail::Long).into_parts();
    assert!(warnings.is_empty());
    let (unstable, _) = config.load_branch("unstable", Detail::Long).into_parts();

    assert_eq!(stable["firefox"].description, "Web browser");
    assert_eq!(
        compare_versions(&stable["firefox"].version, &unstable["firefox"].version),
        -1
    );
    // A release candidate is older than the release it leads to
    assert_eq!(compare_versions(&unstable["linux"].version, "6.13-1"), -1);
    assert_eq!(stable["linux"].cmp_version(&unstable["linux"]), std::cmp::Ordering::Less);

    // Upstream has no databases here
    let loaded = config.load_branch("archlinux", Detail::Short);
    assert!(loaded.packages.is_empty());
    assert_eq!(loaded.warnings.len(), 2);
    assert!(loaded
        .warnings
        .iter()
        .all(|w| matches!(w, LoadWarning::Unreadable { .. })));
}

#[test]
fn loading_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut pkgs = Vec::new();
    let names: Vec<String> = (0..200).map(|i| format!("pkg{i:03}")).collect();
    for (i, name) in names.iter().enumerate() {
        pkgs.push((name.as_str(), if i % 2 == 0 { "1.0-1" } else { "2:0.1-3" }, "x"));
    }
    write_db(dir.path(), "core", &pkgs[..150]);
    write_db(dir.path(), "extra", &pkgs[100..]);

    let first = load_repositories(dir.path(), &["core", "extra"], "testing", Detail::Short);
    let second = load_repositories(dir.path(), &["core", "extra"], "testing", Detail::Short);
    assert_eq!(first.packages, second.packages);
    assert_eq!(first.warning_lines(), second.warning_lines());

    assert_eq!(first.packages.len(), 200);
    assert_eq!(first.warnings.len(), 50);
    assert_eq!(
        first.warning_lines()[0],
        "ignore duplicate: pkg100 (testing.extra), keeping testing.core"
    );
    assert!(first.packages.values().all(|p| p.description.is_empty()));
    assert_eq!(first.packages["pkg120"].repo, "core");
    assert_eq!(first.packages["pkg199"].repo, "extra");
}
