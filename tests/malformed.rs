use std::error::Error;

use bddtool::{BddEntry, BddExtractor};

fn archive_with(entry: BddEntry, size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    entry.write_to(&mut data, 0).unwrap();
    data
}

#[tokio::test]
async fn payload_past_end_is_out_of_bounds() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let data = archive_with(BddEntry::new(b"big", b"bin", 48, 100, 0), 64);

    let err = BddExtractor::new(data)
        .unpack_to(tmp.path())
        .await
        .unwrap_err();

    match err {
        bddtool::Error::OutOfBounds {
            name,
            offset,
            length,
            archive_len,
        } => {
            assert_eq!(name, "big.bin");
            assert_eq!((offset, length, archive_len), (48, 100, 64));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!tmp.path().join("big.bin").exists());

    Ok(())
}

#[tokio::test]
async fn negative_length_is_out_of_bounds() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let data = archive_with(BddEntry::new(b"neg", b"bin", 48, -4, 0), 64);

    let result = BddExtractor::new(data).unpack_to(tmp.path()).await;
    assert!(matches!(result, Err(bddtool::Error::OutOfBounds { .. })));

    Ok(())
}

#[tokio::test]
async fn directory_without_terminator_is_truncated() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let mut data = archive_with(BddEntry::new(b"a", b"b", 0, 0, 0), BddEntry::SIZE);
    data.push(b'z');

    let result = BddExtractor::new(data).unpack_to(tmp.path()).await;
    assert!(matches!(
        result,
        Err(bddtool::Error::TruncatedRecord { offset: 44, .. })
    ));

    Ok(())
}

#[tokio::test]
async fn invalid_file_time_is_rejected() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let data = archive_with(BddEntry::new(b"old", b"txt", 48, 0, -5), 48);

    let result = BddExtractor::new(data).unpack_to(tmp.path()).await;
    assert!(matches!(result, Err(bddtool::Error::InvalidFileTime(-5))));

    Ok(())
}

#[tokio::test]
async fn names_cannot_leave_output_dir() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");

    let names: [(&[u8], &[u8]); 5] = [
        (b"/tmp/escape", b"x"),
        (b"../escape", b"y"),
        (b"sub/file", b"txt"),
        (b"back\\slash", b"txt"),
        (b".", b""),
    ];

    for (name, extension) in names {
        let mut data = vec![0u8; 256];
        BddEntry::new(name, extension, 128, 4, 0).write_to(&mut data, 0)?;
        data[128..132].copy_from_slice(b"evil");

        let result = BddExtractor::new(data).unpack_to(&out).await;
        assert!(
            matches!(result, Err(bddtool::Error::InvalidName { .. })),
            "{:?}",
            result
        );
    }

    assert!(!tmp.path().join("escape.y").exists());
    assert_eq!(std::fs::read_dir(&out)?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn invalid_name_stops_before_any_write() -> Result<(), Box<dyn Error>> {
    let tmp = tempfile::tempdir()?;
    let mut data = vec![0u8; 256];
    BddEntry::new(b"fine", b"txt", 128, 4, 0).write_to(&mut data, 0)?;
    BddEntry::new(b"../bad", b"txt", 144, 4, 0).write_to(&mut data, BddEntry::SIZE)?;

    let result = BddExtractor::new(data).unpack_to(tmp.path()).await;
    assert!(matches!(result, Err(bddtool::Error::InvalidName { .. })));
    assert!(!tmp.path().join("fine.txt").exists());

    Ok(())
}
