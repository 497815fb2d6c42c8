//! Property-based tests for the PAK codec and the session pipeline

use binpak::codec::record_len;
use binpak::prelude::{
    transform_dataset, ChannelSelection, Dataset, DatasetBuilder, DatasetName, GaussianFilter,
    Identity, PakError, PakReader, PakWriter, Session, SessionConfig,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ .-]{0,64}"
}

/// A valid dataset with random shape and flags
fn arb_dataset() -> impl Strategy<Value = Dataset> {
    (
        name(),
        0usize..24,
        0usize..4,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_flat_map(|(name, nx, nz, xc, yc, zc)| {
            let width = |c: bool| if c { 2 } else { 1 };
            (
                Just(name),
                prop::collection::vec(finite(), nx * width(xc)),
                prop::collection::vec(finite(), nz * width(zc)),
                prop::collection::vec(prop::collection::vec(finite(), nx * width(yc)), nz),
                Just((xc, yc, zc)),
            )
        })
        .prop_map(|(name, x, z, y, (xc, yc, zc))| {
            DatasetBuilder::new(DatasetName::new(&name).unwrap())
                .x(x, xc)
                .z(z, zc)
                .y_rows(y, yc)
                .build()
                .unwrap()
        })
}

fn arb_groups() -> impl Strategy<Value = Vec<Vec<Dataset>>> {
    prop::collection::vec(prop::collection::vec(arb_dataset(), 0..3), 0..3)
}

fn encode(groups: &[Vec<Dataset>]) -> Vec<u8> {
    let mut writer = PakWriter::new(Vec::new());
    writer.write_file_header(groups.len() as i16).unwrap();
    for group in groups {
        writer.write_dataset_group_header(group.len()).unwrap();
        for ds in group {
            writer.write_dataset(ds).unwrap();
        }
    }
    writer.finish().unwrap()
}

fn decode(bytes: &[u8]) -> binpak::Result<Vec<Vec<Dataset>>> {
    let mut reader = PakReader::new(bytes)?;
    let mut groups = Vec::new();
    for _ in 0..reader.array_count() {
        let count = reader.read_dataset_group_header()?;
        let mut group = Vec::new();
        for _ in 0..count {
            group.push(reader.read_dataset()?);
        }
        groups.push(group);
    }
    Ok(groups)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Decoding an encoded file gives back every dataset unchanged
    #[test]
    fn test_codec_round_trip(groups in arb_groups()) {
        let bytes = encode(&groups);
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(decoded, groups);
    }

    /// Every record occupies exactly the bytes its counts and flags predict
    #[test]
    fn test_record_length(ds in arb_dataset()) {
        let bytes = encode(&[vec![ds.clone()]]);
        let expected = record_len(
            ds.x_count(),
            ds.z_count(),
            ds.x_is_complex(),
            ds.y_is_complex(),
            ds.z_is_complex(),
        );
        prop_assert_eq!(bytes.len() as u64, 2 + 4 + expected);
    }

    /// Any proper prefix of a file with content fails as truncated
    #[test]
    fn test_prefix_is_truncated(ds in arb_dataset(), cut in any::<prop::sample::Index>()) {
        let bytes = encode(&[vec![ds]]);
        let end = cut.index(bytes.len());
        match decode(&bytes[..end]) {
            Err(PakError::Truncated(_)) => {}
            other => prop_assert!(false, "expected Truncated, got {:?}", other.map(|g| g.len())),
        }
    }

    /// An identity session reproduces its input byte for byte
    #[test]
    fn test_identity_session_is_byte_exact(groups in arb_groups()) {
        let bytes = encode(&groups);
        let session = Session::new(
            PakReader::new(bytes.as_slice()).unwrap(),
            PakWriter::new(Vec::new()),
            SessionConfig::default().allow_multi_row(),
        );
        let (_, output) = session.execute(&Identity).unwrap();
        prop_assert_eq!(output, bytes);
    }

    /// A Y-only transform keeps both axes and the row shape
    #[test]
    fn test_y_transform_keeps_axes(ds in arb_dataset(), sigma in 0.5f64..8.0) {
        let config = SessionConfig::default()
            .allow_multi_row()
            .with_channels(ChannelSelection::y_only());
        let out = transform_dataset(&ds, &GaussianFilter::new(sigma), &config).unwrap();

        prop_assert_eq!(out.x_values(), ds.x_values());
        prop_assert_eq!(out.z_values(), ds.z_values());
        prop_assert_eq!(out.y_values().len(), ds.y_values().len());
        prop_assert!(out.validate().is_ok());
    }
}
