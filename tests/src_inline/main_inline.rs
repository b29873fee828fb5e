use super::*;

use cg_scoreview::input::load_dataset_from_reader;

const CSV: &str = "COMP_NAME,INSURANCE_TYPE,COMP_SIZE,ROE,EWS_GROUP,total_weighted_score,cat1_weighted_score,cat2_weighted_score,cat3_weighted_score,cat4_weighted_score,cat5_weighted_score
Alpha,Nonlife,S,low,G1,10,1,2,3,4,5
Beta,Nonlife,M,high,G2,30,1,2,3,4,5
Gamma,Nonlife,M,low,G1,20,1,2,3,4,5
";

fn board() -> ViewBoard {
    let profile = ViewProfile::nonlife_v1();
    let ds = load_dataset_from_reader(CSV.as_bytes(), &profile).unwrap();
    ViewBoard::from_profile(ds, &profile).unwrap()
}

#[test]
fn test_parse_event() {
    assert_eq!(parse_event("size=M"), Some(("size", "M")));
    assert_eq!(parse_event(" roe = high "), Some(("roe", "high")));
    assert_eq!(parse_event("size==all"), Some(("size", "=all")));
    assert_eq!(parse_event("=M"), None);
    assert_eq!(parse_event("size"), None);
}

#[test]
fn test_replay_rejected_events_keep_last_view() {
    let mut b = board();
    let events = "# comment\nsize=M\n\nsize=XL\nbank=1\nroe=high\n";
    let (applied, rejected) = replay_events(&mut b, events).unwrap();
    assert_eq!(applied, 2);
    assert_eq!(rejected, 2);
    assert_eq!(b.controller("size").unwrap().snapshot().table.len(), 2);
    assert_eq!(b.controller("roe").unwrap().snapshot().table.len(), 1);
    assert_eq!(b.controller("ews").unwrap().snapshot().table.len(), 3);
}

#[test]
fn test_replay_malformed_line_aborts() {
    let mut b = board();
    assert!(matches!(
        replay_events(&mut b, "size=M\nnonsense\n"),
        Err(Error::Usage(_))
    ));
}

#[test]
fn test_cli_parses_view() {
    let cli = Cli::try_parse_from([
        "cg-scoreview",
        "-v",
        "view",
        "--input",
        "data.csv",
        "--group",
        "size",
        "--select",
        "M",
        "--sort",
        "ROE:desc",
        "--bins",
        "5",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 1);
    match cli.command {
        Command::View {
            data,
            group,
            select,
            sort,
            format,
            ..
        } => {
            assert_eq!(data.input, PathBuf::from("data.csv"));
            assert_eq!(data.profile, "nonlife");
            assert_eq!(data.bins, Some(5));
            assert_eq!(group, "size");
            assert_eq!(select, "M");
            assert_eq!(sort, vec!["ROE:desc"]);
            assert_eq!(format, OutputFormat::Text);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_resolve_profile_overrides() {
    let data = DataArgs {
        input: PathBuf::from("x.csv"),
        profile: "life".to_string(),
        profile_file: None,
        bins: Some(4),
        allow_missing_primary: true,
    };
    let profile = resolve_profile(&data).unwrap();
    assert_eq!(profile.bin_count, 4);
    assert!(profile.allow_missing_primary);
    assert_eq!(profile.population.unwrap().value, "Life");

    let data = DataArgs {
        bins: Some(0),
        ..data
    };
    assert!(resolve_profile(&data).is_err());
}

#[test]
fn test_rejected_selection_keeps_view() {
    let mut b = board();
    assert!(!select_or_keep(&mut b, "size", "XL").unwrap());
    assert_eq!(b.controller("size").unwrap().snapshot().table.len(), 3);

    assert!(select_or_keep(&mut b, "size", "M").unwrap());
    assert!(!select_or_keep(&mut b, "size", "XL").unwrap());
    let snapshot = b.controller("size").unwrap().snapshot();
    assert_eq!(snapshot.table.len(), 2);
    assert_eq!(snapshot.selection.to_string(), "M");
}

#[test]
fn test_unknown_group_is_an_error() {
    let mut b = board();
    assert!(matches!(
        select_or_keep(&mut b, "bank", "M"),
        Err(Error::View(ViewError::Selection(SelectionError::UnknownGroup(_))))
    ));
}
