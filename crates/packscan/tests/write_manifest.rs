//! Writing manifests through the public facade and reading them back.

use packscan::{Metadata, MetadataValue, Package, all, read_package, write_manifest};
use packscan_test_util::{TempRepo, sorted};

fn build_pack(dependencies: &[&str], metadata: Metadata) -> Package {
    let mut package = Package::new("packs/example_pack");
    package.enforce_dependencies = true;
    package.enforce_privacy = true;
    package.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
    package.metadata = metadata;
    package
}

#[test]
fn writes_a_simple_package() {
    let repo = TempRepo::new();
    let package = build_pack(&[], Metadata::new());

    let path = write_manifest(repo.root(), &package).expect("write");
    assert!(path.ends_with("packs/example_pack/package.yml"));
    assert_eq!(
        repo.read("packs/example_pack/package.yml"),
        "enforce_dependencies: true\nenforce_privacy: true\n"
    );

    let packages = all(repo.root()).expect("all");
    assert_eq!(packages, vec![package]);
}

#[test]
fn writes_a_package_with_dependencies() {
    let repo = TempRepo::new();
    let package = build_pack(&["my_other_pack1", "my_other_pack2"], Metadata::new());

    write_manifest(repo.root(), &package).expect("write");
    assert_eq!(
        repo.read("packs/example_pack/package.yml"),
        "enforce_dependencies: true\n\
         enforce_privacy: true\n\
         dependencies:\n  \
           - my_other_pack1\n  \
           - my_other_pack2\n"
    );

    let packages = all(repo.root()).expect("all");
    assert_eq!(packages, vec![package]);
}

#[test]
fn writes_a_package_with_metadata() {
    let repo = TempRepo::new();
    let mut protections = Metadata::new();
    protections.insert("prevent_untyped_api".into(), "fail_if_any".into());
    protections.insert("prevent_violations".into(), false.into());
    let mut metadata = Metadata::new();
    metadata.insert("owner".into(), "Mission > Team".into());
    metadata.insert("protections".into(), MetadataValue::Mapping(protections));
    let package = build_pack(&[], metadata);

    write_manifest(repo.root(), &package).expect("write");
    assert_eq!(
        repo.read("packs/example_pack/package.yml"),
        "enforce_dependencies: true\n\
         enforce_privacy: true\n\
         metadata:\n  \
           owner: Mission > Team\n  \
           protections:\n    \
             prevent_untyped_api: fail_if_any\n    \
             prevent_violations: false\n"
    );

    let packages = all(repo.root()).expect("all");
    assert_eq!(packages, vec![package]);
}

#[test]
fn writing_overwrites_existing_manifest_entirely() {
    let repo = TempRepo::new();
    repo.write(
        "packs/example_pack/package.yml",
        "# hand written\nenforce_dependencies: false\npublic_path: lib/\n",
    );
    let package = build_pack(&[], Metadata::new());

    write_manifest(repo.root(), &package).expect("write");
    assert_eq!(
        repo.read("packs/example_pack/package.yml"),
        "enforce_dependencies: true\nenforce_privacy: true\n"
    );
}

#[test]
fn root_package_round_trips() {
    let repo = TempRepo::new();
    let mut package = Package::new(".");
    package.dependencies = vec!["packs/a".to_string()];

    let path = write_manifest(repo.root(), &package).expect("write");
    assert_eq!(path, repo.root().join("package.yml"));

    let read = read_package(repo.root(), &package.directory()).expect("read");
    assert_eq!(read, package);
}

#[test]
fn written_packages_are_all_discovered() {
    let repo = TempRepo::new();
    for name in [".", "packs/a", "packs/b", "components/c"] {
        write_manifest(repo.root(), &Package::new(name)).expect("write");
    }

    let packages = all(repo.root()).expect("all");
    assert_eq!(
        sorted(packages.iter().map(|p| p.name.as_str())),
        vec![".", "components/c", "packs/a", "packs/b"]
    );
}

#[test]
fn write_fails_when_parent_cannot_be_created() {
    let repo = TempRepo::new();
    // A file where the package directory should go.
    repo.write("packs", "not a directory");

    let err = write_manifest(repo.root(), &Package::new("packs/a")).unwrap_err();
    assert!(matches!(err, packscan::Error::Io { .. }));
}

#[test]
fn strings_that_look_typed_survive_write_and_read() {
    let repo = TempRepo::new();
    let mut metadata = Metadata::new();
    for (key, value) in [
        ("answer", "no"),
        ("count", "123"),
        ("tag", "#x"),
        ("budget", "1_000"),
        ("released", "2024-01-01"),
        ("mode", "0777"),
        ("size", "n"),
    ] {
        metadata.insert(key.into(), value.into());
    }
    metadata.insert("enabled".into(), false.into());
    let package = build_pack(&["no", "packs/a"], metadata);

    write_manifest(repo.root(), &package).expect("write");
    let text = repo.read("packs/example_pack/package.yml");
    assert!(text.contains("  answer: 'no'\n"), "{text}");
    assert!(text.contains("  size: n\n"), "{text}");
    assert!(text.contains("  enabled: false\n"), "{text}");

    assert_eq!(all(repo.root()).expect("all"), vec![package]);
}
