use std::path::{Component, Path};

use pathtag::{FieldKind, FieldValues, GenerateOptions, NoMatch, Pattern, TagMap};
use rstest::rstest;

fn tags(pairs: &[(&str, &str)]) -> TagMap {
    pairs.iter().copied().collect()
}

/// Fields of `tags` named by `pattern`, as the matcher reports them
fn expected_fields(pattern: &Pattern, tags: &TagMap) -> FieldValues {
    pattern
        .fields()
        .filter_map(|kind| tags.first(kind.name()).map(|v| (kind, v.to_string())))
        .collect()
}

#[rstest]
#[case("%a/%l/%n - %t.flac")]
#[case("%a - %d - %l/%i-%n %t.flac")]
#[case("Live/%a/%d %g/%n. %t [%c].flac")]
#[case("%n%t.flac")]
#[case("%t")]
#[case("%a/%t%n.flac")]
#[case("/%a/%l/%n - %t.flac")]
#[case("%a/%l/%t/")]
#[case("Live/%a/%t.flac")]
fn generate_then_match_restores_tags(#[case] source: &str) {
    let pattern = Pattern::compile(source);
    let tags = tags(&[
        ("artist", "Grateful Dead"),
        ("album", "Cornell"),
        ("tracknumber", "07"),
        ("title", "Scarlet Begonias"),
        ("date", "1977-05-08"),
        ("genre", "Rock"),
        ("composer", "Garcia"),
        ("discnumber", "2"),
        ("comment", "not in any pattern"),
    ]);

    let name = pattern.generate(&tags, &GenerateOptions::new()).unwrap();
    let matched = pattern.match_path(&format!("/library/{name}")).unwrap();
    assert_eq!(matched, expected_fields(&pattern, &tags), "generated {name:?}");

    // a second pass sees the same result
    assert_eq!(pattern.match_path(&name).unwrap(), matched);
}

#[rstest]
#[case("..")]
#[case(".")]
#[case("../..")]
#[case("/")]
fn values_never_climb_out_of_the_directory(#[case] artist: &str) {
    let pattern = Pattern::compile("/%a/%t.flac");
    let name = pattern
        .generate(&tags(&[("artist", artist), ("title", "Ghost")]), &GenerateOptions::new())
        .unwrap();
    assert!(
        Path::new(&name).components().all(|c| matches!(c, Component::Normal(_))),
        "generated {name:?}"
    );
}

#[test]
fn justified_names_round_trip_to_padded_numbers() {
    let pattern = Pattern::compile("%n - %t.flac");
    let options = GenerateOptions::new().with_justify(12).with_strip("!?");
    let name = pattern
        .generate(&tags(&[("tracknumber", "1"), ("title", "Wow!?")]), &options)
        .unwrap();
    assert_eq!(name, "01 - Wow.flac");

    let matched = pattern.match_path(&name).unwrap();
    assert_eq!(matched[&FieldKind::Tracknumber], "01");
    assert_eq!(matched[&FieldKind::Title], "Wow");
}

#[test]
fn one_pattern_serves_a_whole_batch() {
    let pattern = Pattern::compile("%a/%l/%n - %t.flac");
    let paths = [
        "/music/Live/Artist/Album/01 - Title.flac",
        "/music/Live/Artist/Album/AB - Title.flac",
        "Artist/Album/02 - Other.flac",
    ];

    let results: Vec<Result<FieldValues, NoMatch>> =
        paths.iter().map(|path| pattern.match_path(path)).collect();

    assert_eq!(results[0].as_ref().unwrap()[&FieldKind::Tracknumber], "01");
    assert!(matches!(
        results[1],
        Err(NoMatch::Field { field: FieldKind::Tracknumber, .. })
    ));
    assert_eq!(results[2].as_ref().unwrap()[&FieldKind::Title], "Other");
}

#[test]
fn pattern_is_shareable_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Pattern>();

    let pattern = Pattern::compile("%n - %t.flac");
    std::thread::scope(|scope| {
        for n in 1..=4 {
            let pattern = &pattern;
            scope.spawn(move || {
                let fields = pattern.match_path(&format!("0{n} - T.flac")).unwrap();
                assert_eq!(fields[&FieldKind::Tracknumber], format!("0{n}"));
            });
        }
    });
}
