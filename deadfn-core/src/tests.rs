//! Whole-pipeline test suite for deadfn-core.
//!
//! Exercises observation → extraction → classification → merge → report as
//! one flow, the way the executor drives it, including the permutation and
//! idempotence properties the parallel merge depends on.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn def_at(id: &str, name: &str, file: &str, line: u32) -> DefEvent {
    DefEvent {
        id: SymbolId::from(id),
        pattern_id: None,
        name: name.to_string(),
        file: PathBuf::from(file),
        line,
        has_body: true,
        is_weak: false,
        in_system_header: false,
        in_primary_file: true,
        is_virtual_override: false,
        is_destructor: false,
        is_entry_point: false,
        runtime_invoked: false,
        declarations: Vec::new(),
    }
}

fn use_of(id: &str) -> UseEvent {
    UseEvent {
        id: SymbolId::from(id),
        pattern_id: None,
        in_system_header: false,
    }
}

fn tu(file: &str, definitions: Vec<DefEvent>, uses: Vec<UseEvent>) -> TuObservations {
    TuObservations {
        tu: PathBuf::from(file),
        definitions,
        uses,
    }
}

/// Run the full pipeline over in-memory TUs and return the rendered report.
fn run_report(tus: &[TuObservations]) -> String {
    let (records, _) = analyze_all(tus, |t| Ok(t.clone()), None).unwrap();
    render_plain(&collect_findings(&records))
}

// Scenario: helper() defined in TU1, never referenced anywhere.
#[test]
fn test_unused_helper_is_reported_once() {
    let tus = vec![
        tu(
            "/src/tu1.cpp",
            vec![def_at("c:@F@helper#", "helper", "/src/tu1.cpp", 7)],
            vec![],
        ),
        tu("/src/tu2.cpp", vec![], vec![]),
        tu("/src/tu3.cpp", vec![], vec![]),
    ];

    let report = run_report(&tus);
    assert_eq!(
        report,
        "/src/tu1.cpp:7: warning: Function 'helper' is unused\n"
    );
}

// Scenario: helper() defined in TU1, called only from TU2.
#[test]
fn test_external_use_suppresses_finding() {
    let tus = vec![
        tu(
            "/src/tu1.cpp",
            vec![def_at("c:@F@helper#", "helper", "/src/tu1.cpp", 7)],
            vec![],
        ),
        tu("/src/tu2.cpp", vec![], vec![use_of("c:@F@helper#")]),
    ];

    assert!(run_report(&tus).is_empty());
}

// Scenario: D::m() overrides a non-pure virtual C::m() and is never called.
#[test]
fn test_virtual_override_never_reported() {
    let mut overrider = def_at("c:@S@D@F@m#", "D::m", "/src/tu2.cpp", 4);
    overrider.is_virtual_override = true;

    let tus = vec![tu("/src/tu2.cpp", vec![overrider], vec![])];
    assert!(run_report(&tus).is_empty());
}

#[test]
fn test_entry_point_and_destructor_never_reported() {
    let mut main_fn = def_at("c:@F@main#", "main", "/src/main.cpp", 1);
    main_fn.is_entry_point = true;
    let mut dtor = def_at("c:@S@C@F@~C#", "C::~C", "/src/main.cpp", 9);
    dtor.is_destructor = true;

    let tus = vec![tu("/src/main.cpp", vec![main_fn, dtor], vec![])];
    assert!(run_report(&tus).is_empty());
}

#[test]
fn test_bodyless_declarations_never_reported() {
    let mut deleted = def_at("c:@F@gone#", "gone", "/src/a.cpp", 2);
    deleted.has_body = false;

    let tus = vec![tu("/src/a.cpp", vec![deleted], vec![])];
    assert!(run_report(&tus).is_empty());
}

// Weak definition in TU A, strong definition in TU B, call in TU C: the use
// must reach the strong definition even though the weak TU "has" a local def.
#[test]
fn test_weak_override_routes_use_to_strong_definition() {
    let mut weak = def_at("c:@F@f#", "f", "/src/weak.cpp", 3);
    weak.is_weak = true;
    let strong = def_at("c:@F@f#", "f", "/src/strong.cpp", 5);

    let tus = vec![
        tu("/src/weak.cpp", vec![weak], vec![use_of("c:@F@f#")]),
        tu("/src/strong.cpp", vec![strong], vec![]),
        tu("/src/caller.cpp", vec![], vec![use_of("c:@F@f#")]),
    ];

    // weak.cpp's own use of f is not absorbed by the weak definition, so the
    // strong definition ends with two counted uses and no finding appears.
    let (records, _) = analyze_all(&tus, |t| Ok(t.clone()), None).unwrap();
    assert_eq!(records[&SymbolId::from("c:@F@f#")].use_count, 2);
    assert!(collect_findings(&records).is_empty());
}

// The weak-symbol self-interaction corner: a weak definition unused in its
// own TU is a candidate, and an external use from any other TU clears it.
#[test]
fn test_weak_candidate_cleared_by_external_use() {
    let mut weak = def_at("c:@F@w#", "w", "/src/weak.cpp", 3);
    weak.is_weak = true;

    let alone = vec![tu("/src/weak.cpp", vec![weak.clone()], vec![])];
    assert_eq!(
        run_report(&alone),
        "/src/weak.cpp:3: warning: Function 'w' is unused\n"
    );

    let with_caller = vec![
        tu("/src/weak.cpp", vec![weak], vec![]),
        tu("/src/caller.cpp", vec![], vec![use_of("c:@F@w#")]),
    ];
    assert!(run_report(&with_caller).is_empty());
}

#[test]
fn test_template_uses_count_toward_pattern_definition() {
    let pattern = def_at("c:@FT@max#", "max<T>", "/src/algo.cpp", 11);
    let mut use_int = use_of("c:@F@max<#I>#");
    use_int.pattern_id = Some(SymbolId::from("c:@FT@max#"));

    let tus = vec![
        tu("/src/algo.cpp", vec![pattern], vec![]),
        tu("/src/user.cpp", vec![], vec![use_int]),
    ];
    assert!(run_report(&tus).is_empty());
}

// Merging results in any TU order must yield an identical report.
#[test]
fn test_report_is_invariant_under_tu_permutation() {
    let base = vec![
        tu(
            "/src/a.cpp",
            vec![
                def_at("c:@F@dead1#", "dead1", "/src/a.cpp", 1),
                def_at("c:@F@live#", "live", "/src/a.cpp", 8),
            ],
            vec![],
        ),
        tu(
            "/src/b.cpp",
            vec![def_at("c:@F@dead2#", "dead2", "/src/b.cpp", 2)],
            vec![use_of("c:@F@live#")],
        ),
        tu("/src/c.cpp", vec![], vec![use_of("c:@F@extern#")]),
    ];

    let forward = run_report(&base);
    let mut reversed = base.clone();
    reversed.reverse();
    let backward = run_report(&reversed);

    assert_eq!(forward, backward);
    assert!(forward.contains("'dead1' is unused"));
    assert!(forward.contains("'dead2' is unused"));
    assert!(!forward.contains("'live'"));
    assert!(!forward.contains("extern"));
}

// Merge is pure accumulation: replaying a TU adds exactly its observed uses.
#[test]
fn test_merge_is_pure_accumulation() {
    let observations = tu(
        "/src/b.cpp",
        vec![],
        vec![use_of("c:@F@f#"), use_of("c:@F@f#")],
    );

    let table = SymbolTable::new();
    let once = classify(collect_facts(&observations));
    let again = classify(collect_facts(&observations));
    table.merge(once);
    table.merge(again);

    let records = table.into_records();
    assert_eq!(records[&SymbolId::from("c:@F@f#")].use_count, 4);
}

#[test]
fn test_declaration_notes_follow_the_warning() {
    let mut helper = def_at("c:@F@helper#", "helper", "/src/impl.cpp", 30);
    helper.declarations = vec![
        DeclSite {
            file: PathBuf::from("/include/api.h"),
            line: 12,
        },
        DeclSite {
            file: PathBuf::from("/include/compat.h"),
            line: 40,
        },
    ];

    let report = run_report(&[tu("/src/impl.cpp", vec![helper], vec![])]);
    assert_eq!(
        report,
        "/src/impl.cpp:30: warning: Function 'helper' is unused\n\
         /include/api.h:12: note: declared here\n\
         /include/compat.h:40: note: declared here\n"
    );
}

// End-to-end through the filesystem: observation files on disk, discovered
// by scan, loaded by the same closure the CLI uses.
#[test]
fn test_pipeline_from_observation_files() {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let root = std::env::temp_dir()
        .join("deadfn_pipeline_test")
        .join(format!("{}_{}", std::process::id(), id));
    if root.exists() {
        fs::remove_dir_all(&root).ok();
    }
    fs::create_dir_all(&root).unwrap();

    let write_obs = |name: &str, obs: &TuObservations| {
        let text = serde_json::to_string(obs).unwrap();
        fs::write(root.join(name), text).unwrap();
    };

    write_obs(
        "tu1.json",
        &tu(
            "/src/tu1.cpp",
            vec![
                def_at("c:@F@orphan#", "orphan", "/src/tu1.cpp", 4),
                def_at("c:@F@called#", "called", "/src/tu1.cpp", 20),
            ],
            vec![],
        ),
    );
    write_obs(
        "tu2.json",
        &tu("/src/tu2.cpp", vec![], vec![use_of("c:@F@called#")]),
    );
    fs::write(root.join("garbage.json"), "not json at all").unwrap();

    let files = gather_observation_files(&root, &[]).unwrap();
    assert_eq!(files.len(), 3);

    let (records, summary) = analyze_all(
        &files,
        |path: &PathBuf| load_observations(path),
        Some(2),
    )
    .unwrap();

    assert_eq!(summary.tus_failed, 1); // the garbage file
    let report = render_plain(&collect_findings(&records));
    assert_eq!(
        report,
        "/src/tu1.cpp:4: warning: Function 'orphan' is unused\n"
    );

    fs::remove_dir_all(&root).ok();
}

fn load_observations(path: &Path) -> anyhow::Result<TuObservations> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
