use super::*;

#[test]
fn frame_path_is_zero_padded() {
    assert_eq!(frame_path("anim/hug", 0), "anim/hug/frame_000.png");
    assert_eq!(frame_path("anim/hug", 80), "anim/hug/frame_080.png");
    assert_eq!(frame_path("anim/hug", 1234), "anim/hug/frame_1234.png");
}

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("anim/male/idle").unwrap(), "anim/male/idle");
    assert_eq!(normalize_rel_path("anim\\male\\idle").unwrap(), "anim/male/idle");
    assert_eq!(normalize_rel_path("./anim//heart/").unwrap(), "anim/heart");
    assert!(normalize_rel_path("../x").is_err());
    assert!(normalize_rel_path("/anim/hug").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn dir_source_reads_relative_to_root() {
    let tmp = std::env::temp_dir().join(format!("embrace_dir_source_{}", std::process::id()));
    std::fs::create_dir_all(tmp.join("a")).unwrap();
    std::fs::write(tmp.join("a/frame_000.png"), b"xyz").unwrap();

    let src = DirFrameSource::new(&tmp);
    assert_eq!(src.fetch("a/frame_000.png").unwrap(), b"xyz");
    let err = src.fetch("a/frame_001.png").unwrap_err();
    assert!(format!("{err:#}").contains("frame_001.png"));

    std::fs::remove_dir_all(&tmp).ok();
}
