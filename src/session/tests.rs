use super::*;
use crate::dataset::DatasetName;
use crate::transform::{GaussianFilter, Identity};

fn dataset(name: &str, x: Vec<f64>, z: Vec<f64>, y: Vec<Vec<f64>>) -> Dataset {
    DatasetBuilder::new(DatasetName::new(name).unwrap())
        .x(x, false)
        .z(z, false)
        .y_rows(y, false)
        .build()
        .unwrap()
}

fn sin52() -> Dataset {
    dataset(
        "sin52",
        vec![0.0, 1.0, 2.0, 3.0],
        vec![0.0],
        vec![vec![0.0, 0.0, 0.0, 0.0]],
    )
}

fn encode(array_count: i16, groups: &[Vec<Dataset>]) -> Vec<u8> {
    let mut writer = PakWriter::new(Vec::new());
    writer.write_file_header(array_count).unwrap();
    for group in groups {
        writer.write_dataset_group_header(group.len()).unwrap();
        for ds in group {
            writer.write_dataset(ds).unwrap();
        }
    }
    writer.finish().unwrap()
}

fn session(input: &[u8], config: SessionConfig) -> Session<&[u8], Vec<u8>> {
    Session::new(
        PakReader::new(input).unwrap(),
        PakWriter::new(Vec::new()),
        config,
    )
}

fn decode_all(bytes: &[u8]) -> Vec<Vec<Dataset>> {
    let mut reader = PakReader::new(bytes).unwrap();
    let mut groups = Vec::new();
    for _ in 0..reader.array_count() {
        let count = reader.read_dataset_group_header().unwrap();
        groups.push((0..count).map(|_| reader.read_dataset().unwrap()).collect());
    }
    groups
}

fn every_other(values: &[f64]) -> Vec<f64> {
    values.iter().step_by(2).copied().collect()
}

fn repeat_each(values: &[f64]) -> Vec<f64> {
    values.iter().flat_map(|v| [*v, *v]).collect()
}

#[test]
fn test_identity_session_is_byte_identical() {
    let input = encode(1, &[vec![sin52()]]);
    let (stats, output) = session(&input, SessionConfig::default())
        .execute(&Identity)
        .unwrap();

    assert_eq!(output, input);
    assert_eq!(stats.groups, 1);
    assert_eq!(stats.datasets, 1);
    assert_eq!(stats.values_read, 9);
    assert_eq!(stats.values_written, 9);
    assert_eq!(stats.bytes_written, input.len() as u64);
}

#[test]
fn test_state_after_run() {
    let input = encode(1, &[vec![sin52()]]);
    let mut session = session(&input, SessionConfig::default());
    assert_eq!(session.state(), SessionState::OutputOpened);

    session.run(&Identity).unwrap();
    assert_eq!(session.state(), SessionState::DatasetWritten);
    assert_eq!(session.close().unwrap(), input);
}

#[test]
fn test_y_only_smoothing() {
    let spike = dataset(
        "spike",
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![7.0],
        vec![vec![0.0, 0.0, 10.0, 0.0, 0.0]],
    );
    let input = encode(1, &[vec![spike]]);
    let config = SessionConfig::default().with_channels(ChannelSelection::y_only());
    let filter = GaussianFilter::new(1.0);

    let (_, output) = session(&input, config).execute(&filter).unwrap();
    let groups = decode_all(&output);
    let result = &groups[0][0];

    assert_eq!(result.x_values(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(result.z_values(), &[7.0]);
    let row = result.y_row(0).unwrap();
    assert_eq!(row, filter.apply(&[0.0, 0.0, 10.0, 0.0, 0.0]).as_slice());
    assert!(row[2] < 10.0 && row[1] > 0.0);
}

#[test]
fn test_multi_row_rejected_by_default() {
    let wide = dataset(
        "wide",
        vec![1.0, 2.0],
        vec![0.0, 1.0, 2.0],
        vec![vec![0.0, 0.0]; 3],
    );
    let input = encode(1, &[vec![wide]]);

    let mut session = session(&input, SessionConfig::default());
    match session.run(&Identity) {
        Err(PakError::UnsupportedShape { name, nz }) => {
            assert_eq!(name, "wide");
            assert_eq!(nz, 3);
        }
        other => panic!("expected UnsupportedShape, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::DatasetRead);
    // file header and group header only
    assert_eq!(session.close().unwrap().len(), 6);
}

#[test]
fn test_multi_row_allowed() {
    let wide = dataset(
        "wide",
        vec![1.0, 2.0],
        vec![0.0, 1.0, 2.0],
        vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
    );
    let input = encode(1, &[vec![wide.clone()]]);
    let config = SessionConfig::default().allow_multi_row();

    let (_, output) = session(&input, config).execute(&Identity).unwrap();
    assert_eq!(decode_all(&output)[0][0], wide);
}

#[test]
fn test_halving_transform_keeps_shape() {
    let input = encode(1, &[vec![sin52()]]);
    let transform = |v: &[f64]| every_other(v);

    let (_, output) = session(&input, SessionConfig::default())
        .execute(&transform)
        .unwrap();
    let result = &decode_all(&output)[0][0];

    assert_eq!(result.x_count(), 2);
    assert_eq!(result.z_count(), 1);
    assert_eq!(result.x_values(), &[0.0, 2.0]);
    assert_eq!(result.y_values(), &[vec![0.0, 0.0]]);
    assert!(result.validate().is_ok());
}

#[test]
fn test_doubling_transform_keeps_shape() {
    let input = encode(1, &[vec![sin52()]]);
    let transform = |v: &[f64]| repeat_each(v);
    let config = SessionConfig::default().with_channels("x,y".parse().unwrap());

    let (_, output) = session(&input, config).execute(&transform).unwrap();
    let result = &decode_all(&output)[0][0];

    assert_eq!(result.x_count(), 8);
    assert_eq!(result.y_row(0).unwrap().len(), 8);
    assert!(result.validate().is_ok());
}

#[test]
fn test_inconsistent_transform_is_invalid() {
    // doubling z gives nz = 2 while Y still has one row
    let input = encode(1, &[vec![sin52()]]);
    let transform = |v: &[f64]| repeat_each(v);

    let mut session = session(&input, SessionConfig::default());
    assert!(matches!(
        session.run(&transform),
        Err(PakError::InvalidDataset(_))
    ));
    assert_eq!(session.state(), SessionState::DatasetRead);
    assert_eq!(session.stats().datasets, 0);
}

#[test]
fn test_missing_group_is_truncated() {
    let input = encode(2, &[vec![sin52()]]);
    let mut session = session(&input, SessionConfig::default());

    assert!(matches!(
        session.run(&Identity),
        Err(PakError::Truncated("dataset group header"))
    ));
    assert_eq!(session.stats().groups, 1);
    assert_eq!(session.stats().datasets, 1);
}

#[test]
fn test_groups_and_datasets_keep_order() {
    let a = sin52();
    let b = dataset("b", vec![5.0], vec![1.0], vec![vec![2.0]]);
    let c = dataset("c", vec![], vec![3.0], vec![vec![]]);
    let input = encode(2, &[vec![a.clone(), b.clone()], vec![c.clone()]]);

    let negate = |v: &[f64]| v.iter().map(|x| -x).collect::<Vec<_>>();
    let (stats, output) = session(&input, SessionConfig::default())
        .execute(&negate)
        .unwrap();
    assert_eq!(stats.groups, 2);
    assert_eq!(stats.datasets, 3);

    let groups = decode_all(&output);
    let names: Vec<Vec<String>> = groups
        .iter()
        .map(|g| g.iter().map(|d| d.name().as_str().into_owned()).collect())
        .collect();
    assert_eq!(names, vec![vec!["sin52", "b"], vec!["c"]]);
    assert_eq!(groups[0][1].x_values(), &[-5.0]);
    assert_eq!(groups[1][0].z_values(), &[-3.0]);
}

#[test]
fn test_empty_group() {
    let input = encode(1, &[vec![]]);
    let (stats, output) = session(&input, SessionConfig::default())
        .execute(&Identity)
        .unwrap();
    assert_eq!(stats.datasets, 0);
    assert_eq!(output, input);
}

#[test]
fn test_transform_dataset_leaves_source_untouched() {
    let source = sin52();
    let scaled = transform_dataset(
        &source,
        &|v: &[f64]| v.iter().map(|x| x * 10.0).collect::<Vec<_>>(),
        &SessionConfig::default(),
    )
    .unwrap();

    assert_eq!(source.x_values(), &[0.0, 1.0, 2.0, 3.0]);
    assert_eq!(scaled.x_values(), &[0.0, 10.0, 20.0, 30.0]);
    assert_eq!(scaled.name(), source.name());
    assert_eq!(scaled.ownership(), crate::dataset::Ownership::CallerBuilt);
}

#[test]
fn test_complex_channel_with_odd_output_is_invalid() {
    let cplx = DatasetBuilder::new(DatasetName::new("cplx").unwrap())
        .x(vec![1.0, 0.0, 2.0, 0.0], true)
        .z(vec![0.0], false)
        .y_row(vec![1.0, 1.0], false)
        .build()
        .unwrap();

    let result = transform_dataset(
        &cplx,
        &crate::transform::Diff,
        &SessionConfig::default().with_channels("x".parse().unwrap()),
    );
    assert!(matches!(result, Err(PakError::InvalidDataset(_))));
}

#[test]
fn test_channel_selection_parse_and_display() {
    let selection: ChannelSelection = "y, x".parse().unwrap();
    assert!(selection.x && selection.y && !selection.z);
    assert_eq!(selection.to_string(), "x,y");
    assert!("x,q".parse::<ChannelSelection>().is_err());
    assert_eq!(ChannelSelection::all().to_string(), "x,y,z");
}

#[test]
fn test_config_from_toml() {
    let config: SessionConfig = toml::from_str(
        r#"
        require_single_row = false
        channels = ["y"]
        "#,
    )
    .unwrap();
    assert!(!config.require_single_row);
    assert_eq!(config.channels, ChannelSelection::y_only());
    assert!(config.atomic_output);
}
