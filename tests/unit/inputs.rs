use super::*;

#[test]
fn output_sits_next_to_source_by_default() {
    let out = output_path(Path::new("dir/name.mmd"), None).unwrap();
    assert_eq!(out, PathBuf::from("dir/name.svg"));
}

#[test]
fn out_dir_uses_base_name() {
    let out = output_path(Path::new("dir/name.mmd"), Some(Path::new("out"))).unwrap();
    assert_eq!(out, PathBuf::from("out/name.svg"));
}

#[test]
fn dotted_stems_survive_out_dir() {
    let out = output_path(Path::new("a/v1.2.mmd"), Some(Path::new("out"))).unwrap();
    assert_eq!(out, PathBuf::from("out/v1.2.svg"));
    let out = output_path(Path::new("a/v1.2.mmd"), None).unwrap();
    assert_eq!(out, PathBuf::from("a/v1.2.svg"));
}

#[test]
fn wrong_extension_is_rejected() {
    for bad in ["dir/name.md", "dir/name", "name.mmd.txt", "name.MMD"] {
        let err = output_path(Path::new(bad), None).unwrap_err();
        assert!(matches!(err, MermaidError::Argument(_)), "{bad}");
        assert!(err.to_string().contains(".mmd"), "{bad}");
    }
}

#[test]
fn resolve_preserves_order() {
    let pairs = resolve_pairs(["c.mmd", "a.mmd", "b/b.mmd"], None).unwrap();
    let sources: Vec<_> = pairs.iter().map(|p| p.source.clone()).collect();
    assert_eq!(
        sources,
        vec![
            PathBuf::from("c.mmd"),
            PathBuf::from("a.mmd"),
            PathBuf::from("b/b.mmd")
        ]
    );
    assert_eq!(pairs[2].output, PathBuf::from("b/b.svg"));
}

#[test]
fn resolve_fails_on_any_bad_input() {
    let err = resolve_pairs(["a.mmd", "b.txt", "c.mmd"], None).unwrap_err();
    assert!(err.to_string().contains("b.txt"));
}

#[test]
fn resolve_rejects_colliding_outputs() {
    let err = resolve_pairs(["x/flow.mmd", "y/flow.mmd"], Some(Path::new("out"))).unwrap_err();
    assert!(matches!(err, MermaidError::Argument(_)));
    assert!(err.to_string().contains("out/flow.svg"));

    // Without an out dir the same names live in different directories.
    assert!(resolve_pairs(["x/flow.mmd", "y/flow.mmd"], None).is_ok());
}

#[test]
fn repeated_input_is_not_a_collision() {
    let pairs = resolve_pairs(["a.mmd", "b.mmd", "a.mmd"], Some(Path::new("out"))).unwrap();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0], pairs[2]);
}

#[test]
fn collision_names_both_inputs() {
    let err = resolve_pairs(["x/flow.mmd", "x/flow.mmd", "y/flow.mmd"], Some(Path::new("out")))
        .unwrap_err()
        .to_string();
    assert!(err.contains("y/flow.mmd"), "{err}");
    assert!(err.contains("x/flow.mmd"), "{err}");
}

#[test]
fn bare_suffix_file_name_is_accepted() {
    let out = output_path(Path::new("dir/.mmd"), None).unwrap();
    assert_eq!(out, PathBuf::from("dir/.svg"));
    let out = output_path(Path::new(".mmd"), Some(Path::new("out"))).unwrap();
    assert_eq!(out, PathBuf::from("out/.svg"));
}
