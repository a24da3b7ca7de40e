mod fixtures;

use fixtures::*;

use pretty_assertions::assert_eq;
use std::ops::ControlFlow;
use winres::{
    Comparison, DiffCounts, DiffOp, LangId, LocaleNames, ResError, ResFile, Resource,
    ResourceKind, ResourceRows, StringOrId, diff_sequences, languages,
};

fn sample() -> ResFile {
    ResFile::from_buffer(sample_container().bytes())
}

#[test]
fn test_enumerate_covers_the_whole_file() {
    ensure_env_logger_initialized();
    let file = sample();

    let mut next_offset = 0;
    let mut blocks = 0;
    let stopped = file
        .enumerate(|header, payload_offset| {
            assert_eq!(header.offset as usize, next_offset);
            assert_eq!(payload_offset, next_offset + header.header_size as usize);
            next_offset += header.footprint();
            blocks += 1;
            ControlFlow::Continue(())
        })
        .unwrap();

    assert!(!stopped);
    assert_eq!(blocks, 10);
    assert_eq!(next_offset, file.data().len());
}

#[test]
fn test_enumerate_can_stop_early() {
    let file = sample();
    let mut seen = 0;
    let stopped = file
        .enumerate(|_, _| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert!(stopped);
    assert_eq!(seen, 3);
}

#[test]
fn test_lookup_requires_all_three_fields() {
    let file = sample();
    let dialog = StringOrId::Ordinal(ResourceKind::RT_DIALOG);

    let block = file
        .lookup(&dialog, &StringOrId::Ordinal(100), GERMAN)
        .unwrap();
    assert_eq!(block.header.language, GERMAN);
    assert_eq!(block.data.len(), block.header.data_size as usize);

    assert!(matches!(
        file.lookup(&dialog, &StringOrId::Ordinal(101), GERMAN),
        Err(ResError::NotFound { .. })
    ));
    assert!(matches!(
        file.lookup(&dialog, &StringOrId::Ordinal(102), ENGLISH),
        Err(ResError::NotFound { .. })
    ));
    // Neutral German is not a fallback for German (Germany).
    assert!(matches!(
        file.lookup(&dialog, &StringOrId::Ordinal(100), GERMAN.base()),
        Err(ResError::NotFound { .. })
    ));
}

#[test]
fn test_lookup_by_name_ignores_case() {
    let file = sample();
    let block = file
        .lookup(&StringOrId::text("MYDATA"), &StringOrId::text("blob"), ENGLISH)
        .unwrap();
    assert_eq!(block.data, &[1, 2, 3]);

    let err = file
        .lookup(&StringOrId::text("MYDATA"), &StringOrId::text("BLOB2"), ENGLISH)
        .unwrap_err();
    assert!(err.is_missing());
    assert_eq!(err.to_string(), "resource MYDATA/BLOB2/009:01 not found in container");
}

#[test]
fn test_rejects_undersized_block_header() {
    let mut data = sample_container().bytes();
    // Header size of the first (empty) block.
    data[4..8].copy_from_slice(&8u32.to_le_bytes());
    let file = ResFile::from_buffer(data);

    assert!(matches!(
        file.enumerate(|_, _| ControlFlow::Continue(())),
        Err(ResError::CorruptContainer { offset: 0, .. })
    ));
}

#[test]
fn test_rejects_truncated_payload() {
    let mut data = sample_container().bytes();
    data.truncate(data.len() - 8);
    let file = ResFile::from_buffer(data);

    let results: Vec<_> = file.blocks().collect();
    assert_eq!(results.len(), 10);
    assert!(results[..9].iter().all(Result::is_ok));
    assert!(matches!(
        results[9],
        Err(ResError::CorruptContainer { .. })
    ));
}

#[test]
fn test_loads_string_table() {
    let file = sample();
    let (header, resource) =
        Resource::load(&file, ResourceKind::RT_STRING, &StringOrId::Ordinal(1), ENGLISH).unwrap();
    assert_eq!(header.language, ENGLISH);

    let Resource::StringTable(table) = resource else {
        panic!("expected a string table");
    };
    assert_eq!(table.get_string(0).unwrap(), &[0x4F, 0x70, 0x65, 0x6E]);
    assert_eq!(table.get_string(5).unwrap(), &[] as &[u16]);
}

#[test]
fn test_rejects_unsupported_types() {
    let file = sample();
    assert!(matches!(
        Resource::load(&file, 16, &StringOrId::Ordinal(1), ENGLISH),
        Err(ResError::UnsupportedResourceType { code: 16 })
    ));
}

#[test]
fn test_compares_string_tables() {
    let file = sample();
    let cmp = Comparison::load(
        &file,
        ResourceKind::RT_STRING,
        &StringOrId::Ordinal(1),
        GERMAN,
        LangId::MASTER,
    )
    .unwrap();

    let rows = cmp.rows();
    assert_eq!(rows.len(), 16);
    assert!(!rows[0].error);
    assert!(rows[1].error);
    assert_eq!(rows[1].left.as_deref(), Some("empty"));
    assert_eq!(rows[1].right.as_deref(), Some("\"Close\""));
    assert_eq!(
        cmp.diff_counts(),
        DiffCounts {
            errors: 1,
            warnings: 1
        }
    );
}

#[test]
fn test_compares_menus() {
    let file = sample();
    let cmp = Comparison::load(
        &file,
        ResourceKind::RT_MENU,
        &StringOrId::Ordinal(1),
        GERMAN,
        ENGLISH,
    )
    .unwrap();

    let (Resource::Menu(translated), Resource::Menu(master)) = (&cmp.resource, &cmp.master) else {
        panic!("expected menus");
    };
    let ops = diff_sequences(translated.items(), master.items(), |a, b| a.aligns_with(b));
    assert_eq!(ops, vec![DiffOp::MatchBoth, DiffOp::MatchBoth, DiffOp::LeftOnly]);

    let flagged: Vec<bool> = cmp.rows().iter().map(|r| r.error).collect();
    assert_eq!(flagged, vec![false, false, true]);
    assert_eq!(translated.diff_counts(master), cmp.diff_counts());
}

#[test]
fn test_compares_dialogs() {
    let file = sample();
    let cmp = Comparison::load(
        &file,
        ResourceKind::RT_DIALOG,
        &StringOrId::Ordinal(100),
        GERMAN,
        ENGLISH,
    )
    .unwrap();

    assert_eq!(cmp.resource.item_count(), 2);
    // "OK" is left untranslated, which only the pedantic check reports.
    assert_eq!(
        cmp.diff_counts(),
        DiffCounts {
            errors: 0,
            warnings: 1
        }
    );
}

#[test]
fn test_dialogex_code_reads_dialog_blocks() {
    let file = sample();
    let (header, resource) = Resource::load(
        &file,
        ResourceKind::RES_DIALOGEX,
        &StringOrId::Ordinal(101),
        ENGLISH,
    )
    .unwrap();
    assert_eq!(header.res_type, StringOrId::Ordinal(ResourceKind::RT_DIALOG));

    let Resource::Dialog(dialog) = resource else {
        panic!("expected a dialog");
    };
    assert!(!dialog.extended);
    assert_eq!(dialog.title, StringOrId::text("Options"));
}

#[test]
fn test_missing_reference_is_reported_separately() {
    let file = sample();

    let missing_master = Comparison::load(
        &file,
        ResourceKind::RT_STRING,
        &StringOrId::Ordinal(257),
        GERMAN,
        ENGLISH,
    );
    assert!(matches!(
        missing_master,
        Err(ResError::ResourceMissingForCompare { .. })
    ));

    let missing_translation = Comparison::load(
        &file,
        ResourceKind::RT_DIALOG,
        &StringOrId::Ordinal(101),
        GERMAN,
        ENGLISH,
    );
    assert!(matches!(missing_translation, Err(ResError::NotFound { .. })));
}

#[test]
fn test_locale_names() {
    let file = sample();
    let names = LocaleNames::from_res_file(&file).unwrap();

    assert_eq!(names.name(ENGLISH), Some("English (United States)"));
    assert_eq!(names.name(GERMAN), Some("Deutsch (Deutschland)"));
    assert_eq!(names.name(GERMAN.base()), Some("Deutsch (Neutral)"));
    assert_eq!(names.sublangs(GERMAN.base()), vec![GERMAN]);

    assert_eq!(
        languages(&file).unwrap(),
        vec![LangId::from_raw(0), GERMAN, ENGLISH]
    );
}

#[test]
fn test_opens_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_container().write_to(&dir.path().join("sample.res"));

    let file = ResFile::open(&path).unwrap();
    assert_eq!(file.path(), Some(path.as_path()));
    assert_eq!(file.blocks().count(), 10);

    assert!(matches!(
        ResFile::open(dir.path().join("missing.res")),
        Err(ResError::FailedToOpenFile { .. })
    ));
}
